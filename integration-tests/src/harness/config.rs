use arcwatch_core::conf::{ArcwatchConfig, load_config};
use std::path::{Path, PathBuf};

/// Load `fixtures/config/<name>.hcl`.
pub fn load_fixture(name: &str) -> ArcwatchConfig {
    let path = fixture_path(name);

    assert!(path.exists(), "fixture config does not exist: {path:?}");

    load_config(&path).expect("failed to load fixture config")
}

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("config")
        .join(format!("{name}.hcl"))
}

/// Point the log source at `log_file` and make it poll quickly.
pub fn patch_log_source(mut cfg: ArcwatchConfig, log_file: &Path) -> ArcwatchConfig {
    cfg.log_source.enable = true;
    cfg.log_source.candidates = vec![log_file.to_path_buf()];
    cfg.log_source.poll_interval_ms = 20;
    cfg
}
