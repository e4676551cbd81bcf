//! Tails an external access log and turns appended lines into raw events.

mod parse;

#[cfg(test)]
mod tests;

pub use parse::{ParsedLine, parse_line, parse_log_time};

use crate::conf::LogSourceConfig;
use crate::ingest::RawEventSink;
use crate::shutdown::ShutdownSignal;
use std::fs::Metadata;
use std::io::{ErrorKind, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no access log found among {candidates:?}")]
    NotFound { candidates: Vec<PathBuf> },

    #[error("access log I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SourceError {
    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Bytes before the read position remembered to spot an in-place rewrite.
const TAIL_LEN: usize = 64;

/// Owns one open access log and the read position within it.
///
/// Only bytes appended after [`attach`](LogSourceReader::attach) are ever
/// reported. A trailing line without its newline stays buffered until the
/// rest of it is written.
#[derive(Debug)]
pub struct LogSourceReader {
    path: PathBuf,
    file: File,
    offset: u64,
    file_id: Option<u64>,
    // Last bytes before `offset`; `tail.len() <= offset` always.
    tail: Vec<u8>,
    pending: Vec<u8>,
    poll_interval: Duration,
}

impl LogSourceReader {
    /// First candidate that exists and is a regular file.
    pub fn locate(candidates: &[PathBuf]) -> Result<PathBuf, SourceError> {
        candidates
            .iter()
            .find(|p| p.is_file())
            .cloned()
            .ok_or_else(|| SourceError::NotFound {
                candidates: candidates.to_vec(),
            })
    }

    /// Open `path` positioned at its current end.
    pub async fn attach(path: &Path, poll_interval: Duration) -> Result<Self, SourceError> {
        let mut file = File::open(path).await.map_err(SourceError::io(path))?;
        let meta = file.metadata().await.map_err(SourceError::io(path))?;
        let offset = meta.len();

        let tail_len = offset.min(TAIL_LEN as u64);
        let mut tail = vec![0; tail_len as usize];
        file.seek(SeekFrom::Start(offset - tail_len))
            .await
            .map_err(SourceError::io(path))?;
        file.read_exact(&mut tail)
            .await
            .map_err(SourceError::io(path))?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
            offset,
            file_id: file_id(&meta),
            tail,
            pending: Vec::new(),
            poll_interval,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Complete lines appended since the previous poll, oldest first.
    ///
    /// A rotated path drains the rest of the old file before the new file is
    /// read from its start. A file truncated in place is read from its start,
    /// even when it already grew back past the old position.
    pub async fn poll_lines(&mut self) -> Result<Vec<String>, SourceError> {
        let meta = match tokio::fs::metadata(&self.path).await {
            Ok(meta) => meta,
            // Between rename and re-create: keep reading the old handle.
            Err(e) if e.kind() == ErrorKind::NotFound => return self.read_appended().await,
            Err(e) => return Err(SourceError::io(&self.path)(e)),
        };

        if file_id(&meta) != self.file_id {
            let mut lines = self.read_appended().await?;
            self.reopen(&meta).await?;
            lines.extend(self.read_appended().await?);
            return Ok(lines);
        }

        if self.was_truncated(meta.len()).await? {
            info!(path = %self.path.display(), "access log truncated, reading from start");
            self.reset_position();
        }

        self.read_appended().await
    }

    async fn read_appended(&mut self) -> Result<Vec<String>, SourceError> {
        let path = self.path.clone();

        self.file
            .seek(SeekFrom::Start(self.offset))
            .await
            .map_err(SourceError::io(&path))?;

        let mut buf = Vec::new();
        let read = self
            .file
            .read_to_end(&mut buf)
            .await
            .map_err(SourceError::io(&path))?;

        self.offset += read as u64;
        self.tail.extend_from_slice(&buf);
        let excess = self.tail.len().saturating_sub(TAIL_LEN);
        self.tail.drain(..excess);
        self.pending.extend_from_slice(&buf);

        Ok(self.take_complete_lines())
    }

    fn take_complete_lines(&mut self) -> Vec<String> {
        let Some(last_newline) = self.pending.iter().rposition(|b| *b == b'\n') else {
            return Vec::new();
        };

        let rest = self.pending.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.pending, rest);

        complete
            .split(|b| *b == b'\n')
            .map(|line| String::from_utf8_lossy(line).trim_end_matches('\r').to_string())
            .filter(|line| !line.is_empty())
            .collect()
    }

    /// The file shrank below the read position, or the bytes just before it
    /// no longer match what was read there (truncated, then regrown).
    async fn was_truncated(&mut self, len: u64) -> Result<bool, SourceError> {
        if len < self.offset {
            return Ok(true);
        }
        if self.tail.is_empty() {
            return Ok(false);
        }

        let mut current = vec![0; self.tail.len()];
        self.file
            .seek(SeekFrom::Start(self.offset - self.tail.len() as u64))
            .await
            .map_err(SourceError::io(&self.path))?;

        match self.file.read_exact(&mut current).await {
            Ok(_) => Ok(current != self.tail),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(true),
            Err(e) => Err(SourceError::io(&self.path)(e)),
        }
    }

    async fn reopen(&mut self, meta: &Metadata) -> Result<(), SourceError> {
        self.file = File::open(&self.path)
            .await
            .map_err(SourceError::io(&self.path))?;
        self.file_id = file_id(meta);
        self.reset_position();

        info!(path = %self.path.display(), "access log rotated, reopened");
        Ok(())
    }

    fn reset_position(&mut self) {
        self.offset = 0;
        self.tail.clear();
        self.pending.clear();
    }

    /// Poll until shutdown, emitting one raw event per well-formed line.
    ///
    /// Malformed lines are skipped. An I/O error ends the loop and is returned.
    pub async fn run(
        mut self,
        sink: RawEventSink,
        mut shutdown: ShutdownSignal,
    ) -> Result<(), SourceError> {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    debug!(path = %self.path.display(), "log source stopping");
                    return Ok(());
                }
                _ = ticker.tick() => {}
            }

            for line in self.poll_lines().await? {
                let Some(parsed) = parse_line(&line) else {
                    debug!(line = %line, "skipping malformed access log line");
                    continue;
                };

                if !sink.emit(parsed.into_raw_event()).await {
                    debug!("ingestion channel closed, log source stopping");
                    return Ok(());
                }
            }
        }
    }
}

/// Start tailing the first configured candidate, if any.
///
/// The reader is attached before this returns, so every line written
/// afterwards is reported. Returns `None` (inert source) when disabled, when
/// no candidate exists, or when the file cannot be opened.
pub async fn spawn_log_source(
    cfg: &LogSourceConfig,
    sink: RawEventSink,
    shutdown: ShutdownSignal,
) -> Option<JoinHandle<()>> {
    if !cfg.enable {
        info!("log source disabled");
        return None;
    }

    let path = match LogSourceReader::locate(&cfg.candidates) {
        Ok(path) => path,
        Err(e) => {
            info!(error = %e, "log source inert");
            return None;
        }
    };

    let reader = match LogSourceReader::attach(&path, cfg.poll_interval()).await {
        Ok(reader) => reader,
        Err(e) => {
            warn!(error = %e, "log source unavailable");
            return None;
        }
    };

    info!(path = %reader.path().display(), "tailing access log");

    Some(tokio::spawn(async move {
        if let Err(e) = reader.run(sink, shutdown).await {
            warn!(error = %e, "log source stopped");
        }
    }))
}

#[cfg(unix)]
fn file_id(meta: &Metadata) -> Option<u64> {
    use std::os::unix::fs::MetadataExt;
    Some(meta.ino())
}

#[cfg(not(unix))]
fn file_id(_meta: &Metadata) -> Option<u64> {
    None
}
