//! Configuration loading from files (std only).

use std::fs;
use std::path::Path;

use crate::error::{name, ConfigError, Error, Result};

use super::ScannerConfig;

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
///
/// # Example
///
/// ```rust,ignore
/// use nfs_scan::load_config;
///
/// let config = load_config("scanner.toml")?;
/// let pattern = config.build_pattern()?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ScannerConfig> {
    let content = fs::read_to_string(path.as_ref())
        .map_err(|e| Error::Config(ConfigError::IoError(name(&e.to_string()))))?;

    parse_config(&content)
}

/// Parse configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or fails validation.
pub fn parse_config(content: &str) -> Result<ScannerConfig> {
    let config: ScannerConfig = toml::from_str(content)
        .map_err(|e| Error::Config(ConfigError::ParseError(name(e.message()))))?;

    super::validation::validate_config(&config)?;

    tracing::info!(
        pattern = config.pattern.kind.as_str(),
        axes = config.axes.len(),
        "configuration loaded"
    );

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let toml = r#"
[pattern]
type = "spherical"

[pattern.parameters]
nr_of_points = 100
radius = 500.0
"#;

        let config = parse_config(toml).unwrap();
        assert_eq!(config.pattern.kind.as_str(), "spherical");
        assert_eq!(config.pattern.parameters.get("nr_of_points"), Some(100.0));
        assert!(config.device.is_none());
        assert!(config.build_pattern().is_ok());
    }

    #[test]
    fn test_parse_with_axes() {
        let toml = r#"
[pattern]
type = "cylindrical"

[axes.angular]
kind = "rotary"
steps_per_revolution = 200
microsteps = 16
max_velocity = 30.0
max_acceleration = 60.0
"#;

        let config = parse_config(toml).unwrap();
        let angular = config.axis("angular").unwrap();
        assert_eq!(angular.resolved_units_per_revolution(), Some(360.0));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_config("/definitely/not/here.toml"),
            Err(Error::Config(ConfigError::IoError(_)))
        ));
    }

    #[test]
    fn test_syntax_error() {
        assert!(matches!(
            parse_config("[pattern"),
            Err(Error::Config(ConfigError::ParseError(_)))
        ));
    }
}
