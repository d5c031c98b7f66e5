mod error;
mod loader;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::ConfigError;
pub use loader::{CONFIG_FILE_NAME, load_config, parse_config};
pub use types::*;
pub use validation::{Severity, ValidationIssue, ValidationReport, validate_config};
