use crate::conf::validation::validate;
use crate::conf::{ArcwatchConfig, ConfigError};
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "arcwatch.hcl";

/// Read, parse and validate an `arcwatch.hcl` file.
pub fn load_config(path: &Path) -> Result<ArcwatchConfig, ConfigError> {
    //--------------------------------------------------------------------------
    // Hard fail: IO
    //--------------------------------------------------------------------------
    let src = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;

    parse_config(&src, path)
}

/// Parse and validate HCL source. `origin` is only used for error reporting.
pub fn parse_config(src: &str, origin: &Path) -> Result<ArcwatchConfig, ConfigError> {
    //--------------------------------------------------------------------------
    // Hard fail: parsing
    //--------------------------------------------------------------------------
    let cfg: ArcwatchConfig = hcl::from_str(src).map_err(|e| ConfigError::parse(origin, e))?;

    //--------------------------------------------------------------------------
    // Semantic validation (aggregate all semantic errors)
    //--------------------------------------------------------------------------
    validate(&cfg)?;

    Ok(cfg)
}
