use crate::conf::{ArcwatchConfig, ConfigError, ValidationErrors, validate};

fn errors(cfg: &ArcwatchConfig) -> Vec<ConfigError> {
    match validate(cfg) {
        Err(ConfigError::Validation(ValidationErrors(errs))) => errs,
        other => panic!("expected validation errors, got {other:?}"),
    }
}

#[test]
fn default_config_is_valid() {
    assert!(validate(&ArcwatchConfig::default()).is_ok());
}

#[test]
fn all_problems_are_reported_together() {
    // Arrange
    let mut cfg = ArcwatchConfig::default();
    cfg.server.listen = "not-an-addr".to_string();
    cfg.server.stream_path = "stream".to_string();
    cfg.server.location.latitude = 91.0;
    cfg.server.location.longitude = -181.0;
    cfg.history.capacity = 0;
    cfg.identity.trusted_proxies = vec!["10.0.0.0/33".to_string()];

    // Act
    let errs = errors(&cfg);

    // Assert
    assert_eq!(errs.len(), 6, "{errs:?}");
    assert!(matches!(errs[0], ConfigError::InvalidListen { .. }));
    assert!(matches!(errs[1], ConfigError::InvalidStreamPath { .. }));
    assert!(matches!(errs[2], ConfigError::InvalidLatitude { .. }));
    assert!(matches!(errs[3], ConfigError::InvalidLongitude { .. }));
    assert!(matches!(
        errs[4],
        ConfigError::ZeroValue {
            field: "history.capacity"
        }
    ));
    assert!(matches!(errs[5], ConfigError::InvalidTrustedProxy { .. }));
}

#[test]
fn missing_static_dir_is_reported() {
    let mut cfg = ArcwatchConfig::default();
    cfg.server.static_dir = Some("/definitely/not/here".into());

    let errs = errors(&cfg);

    assert!(matches!(errs[0], ConfigError::MissingStaticDir { .. }));
}

#[test]
fn poll_interval_only_matters_when_log_source_is_enabled() {
    let mut cfg = ArcwatchConfig::default();
    cfg.log_source.poll_interval_ms = 0;
    assert!(validate(&cfg).is_err());

    cfg.log_source.enable = false;
    assert!(validate(&cfg).is_ok());
}

#[test]
fn validation_error_message_lists_every_problem() {
    let mut cfg = ArcwatchConfig::default();
    cfg.viewer.display_capacity = 0;
    cfg.viewer.send_buffer = 0;

    let message = validate(&cfg).unwrap_err().to_string();

    assert!(message.contains("viewer.display_capacity must be greater than zero"));
    assert!(message.contains("viewer.send_buffer must be greater than zero"));
}

#[test]
fn zero_reconnect_backoff_is_rejected() {
    let mut cfg = ArcwatchConfig::default();
    cfg.viewer.reconnect_backoff_secs = 0;

    let errs = errors(&cfg);

    assert_eq!(errs.len(), 1, "{errs:?}");
    assert!(matches!(
        errs[0],
        ConfigError::ZeroValue {
            field: "viewer.reconnect_backoff_secs"
        }
    ));
}
