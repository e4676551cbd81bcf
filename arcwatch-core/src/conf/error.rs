use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    //-------------------------------------------------------------------------
    // IO / Parsing
    //-------------------------------------------------------------------------
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration file: {path}\n\n{source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: hcl::Error,
    },

    #[error("failed to write config file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    //-------------------------------------------------------------------------
    // Semantic validation
    //-------------------------------------------------------------------------
    #[error("invalid listen address '{addr}'")]
    InvalidListen { addr: String },

    #[error("invalid stream path '{path}': must start with '/'")]
    InvalidStreamPath { path: String },

    #[error("invalid latitude {value}: must be within [-90, 90]")]
    InvalidLatitude { value: f64 },

    #[error("invalid longitude {value}: must be within [-180, 180]")]
    InvalidLongitude { value: f64 },

    #[error("{field} must be greater than zero")]
    ZeroValue { field: &'static str },

    #[error("invalid trusted proxy '{entry}': expected an IP address or CIDR")]
    InvalidTrustedProxy { entry: String },

    #[error("static directory does not exist: {path}")]
    MissingStaticDir { path: PathBuf },

    #[error("{0}")]
    Validation(ValidationErrors),
}

impl ConfigError {
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteFile {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: hcl::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }
}

/// Every semantic error found in one pass, in the order they were found.
#[derive(Debug, Error)]
#[error(
    "configuration validation failed:\n{}",
    .0.iter().map(|e| format!("  - {e}")).collect::<Vec<_>>().join("\n")
)]
pub struct ValidationErrors(pub Vec<ConfigError>);
