use crate::conf::{ConfigError, EdgewayConfig, validate_config};
use std::fs;
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "edgeway.hcl";

/// Load, resolve and validate `<dir>/edgeway.hcl`.
///
/// Warnings do not fail the load; they are logged.
pub fn load_config(dir: &Path) -> Result<EdgewayConfig, ConfigError> {
    let file = dir.join(CONFIG_FILE_NAME);

    //--------------------------------------------------------------------------
    // Hard fail: IO and parsing
    //--------------------------------------------------------------------------
    let source = fs::read_to_string(&file).map_err(|e| ConfigError::read_file(&file, e))?;
    let mut config = parse_config(&source).map_err(|e| ConfigError::parse(&file, e))?;

    if config.bucket.root.is_relative() {
        config.bucket.root = dir.join(&config.bucket.root);
    }

    //--------------------------------------------------------------------------
    // Semantic validation (aggregate all errors)
    //--------------------------------------------------------------------------
    let report = validate_config(&config, &file);
    if !report.errors.is_empty() {
        return Err(ConfigError::Validation { report });
    }

    for warning in &report.warnings {
        tracing::warn!(section = %warning.section, "{}", warning.message);
    }

    Ok(config)
}

/// Parse config text without touching the filesystem or validating it.
pub fn parse_config(source: &str) -> Result<EdgewayConfig, hcl::Error> {
    hcl::from_str(source)
}
