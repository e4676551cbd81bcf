use crate::conf::{ArcwatchConfig, ConfigError, ValidationErrors};
use std::net::SocketAddr;

#[derive(Default)]
struct ValidationCtx {
    errors: Vec<ConfigError>,
}

impl ValidationCtx {
    fn push(&mut self, err: ConfigError) {
        self.errors.push(err);
    }

    fn require_positive(&mut self, value: u64, field: &'static str) {
        if value == 0 {
            self.push(ConfigError::ZeroValue { field });
        }
    }

    fn into_result(self) -> Result<(), ConfigError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(ValidationErrors(self.errors)))
        }
    }
}

/// Semantic validation. Collects every problem instead of stopping at the first.
pub fn validate(cfg: &ArcwatchConfig) -> Result<(), ConfigError> {
    let mut ctx = ValidationCtx::default();

    //--------------------------------------------------------------------------
    // Server
    //--------------------------------------------------------------------------
    let server = &cfg.server;
    if server.listen.parse::<SocketAddr>().is_err() {
        ctx.push(ConfigError::InvalidListen {
            addr: server.listen.clone(),
        });
    }

    if !server.stream_path.starts_with('/') {
        ctx.push(ConfigError::InvalidStreamPath {
            path: server.stream_path.clone(),
        });
    }

    let location = &server.location;
    if !(-90.0..=90.0).contains(&location.latitude) {
        ctx.push(ConfigError::InvalidLatitude {
            value: location.latitude,
        });
    }
    if !(-180.0..=180.0).contains(&location.longitude) {
        ctx.push(ConfigError::InvalidLongitude {
            value: location.longitude,
        });
    }

    if let Some(dir) = &server.static_dir {
        if !dir.is_dir() {
            ctx.push(ConfigError::MissingStaticDir { path: dir.clone() });
        }
    }

    ctx.require_positive(server.ingest_buffer as u64, "server.ingest_buffer");

    //--------------------------------------------------------------------------
    // History / viewer
    //--------------------------------------------------------------------------
    ctx.require_positive(cfg.history.capacity as u64, "history.capacity");
    ctx.require_positive(cfg.viewer.display_capacity as u64, "viewer.display_capacity");
    ctx.require_positive(cfg.viewer.send_buffer as u64, "viewer.send_buffer");
    ctx.require_positive(cfg.viewer.reconnect_backoff_secs, "viewer.reconnect_backoff_secs");

    //--------------------------------------------------------------------------
    // Identity
    //--------------------------------------------------------------------------
    for entry in &cfg.identity.trusted_proxies {
        if crate::enrichment::parse_trusted_proxies(&[entry]).is_err() {
            ctx.push(ConfigError::InvalidTrustedProxy {
                entry: entry.clone(),
            });
        }
    }

    //--------------------------------------------------------------------------
    // Log source
    //--------------------------------------------------------------------------
    if cfg.log_source.enable {
        ctx.require_positive(cfg.log_source.poll_interval_ms, "log_source.poll_interval_ms");
    }

    ctx.into_result()
}
