mod error;
mod loader;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::{ConfigError, ValidationErrors};
pub use loader::{DEFAULT_CONFIG_PATH, load_config, parse_config};
pub use types::*;
pub use validation::validate;
