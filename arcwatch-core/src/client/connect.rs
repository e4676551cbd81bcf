use crate::client::QueueWriter;
use crate::event::ViewerMessage;
use crate::shutdown::ShutdownSignal;
use futures_util::StreamExt;
use std::time::Duration;
use thiserror::Error;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("viewer stream transport error: {0}")]
    Transport(#[from] tungstenite::Error),

    #[error("undecodable viewer message: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Consumes the viewer stream and reconnects after a fixed backoff whenever
/// the transport is lost. Each reconnect starts with a fresh init batch.
#[derive(Debug, Clone)]
pub struct ViewerClient {
    url: String,
    backoff: Duration,
}

impl ViewerClient {
    pub fn new(url: impl Into<String>, backoff: Duration) -> Self {
        Self {
            url: url.into(),
            backoff,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn run(&self, writer: QueueWriter, mut shutdown: ShutdownSignal) {
        loop {
            tokio::select! {
                _ = shutdown.recv() => return,
                result = self.session(&writer) => match result {
                    Ok(()) => info!(url = %self.url, "viewer stream closed by server"),
                    Err(e) => warn!(url = %self.url, error = %e, "viewer stream lost"),
                },
            }

            info!(
                backoff_ms = self.backoff.as_millis() as u64,
                "reconnecting to viewer stream"
            );

            tokio::select! {
                _ = shutdown.recv() => return,
                _ = tokio::time::sleep(self.backoff) => {}
            }
        }
    }

    /// One connection, until the server closes it or the transport fails.
    pub async fn session(&self, writer: &QueueWriter) -> Result<(), ClientError> {
        let (mut ws, _) = connect_async(self.url.as_str()).await?;
        info!(url = %self.url, "connected to viewer stream");

        while let Some(message) = ws.next().await {
            match message? {
                Message::Text(text) => match decode(&text) {
                    Ok(decoded) => writer.push(decoded),
                    Err(e) => warn!(error = %e, "dropping viewer message"),
                },
                Message::Close(frame) => {
                    debug!(?frame, "close frame received");
                    break;
                }
                _ => {}
            }
        }

        Ok(())
    }
}

fn decode(text: &str) -> Result<ViewerMessage, ClientError> {
    Ok(ViewerMessage::decode(text)?)
}
