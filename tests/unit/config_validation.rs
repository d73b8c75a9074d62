//! Unit tests for configuration validation.

use nfs_scan::config::{parse_config, validate_config, ScannerConfig};
use nfs_scan::error::{ConfigError, Error};

const DEVICE: &str = r#"
[pattern]
type = "cylindrical"

[device]
width = 270.0
depth = 195.0
height = 375.0
"#;

/// Test validation of a valid configuration.
#[test]
fn test_valid_config_passes_validation() {
    let toml_str = format!("{DEVICE}\n[motion]\nevasive_radius = 200.0\nsafe_radius = 450.0\n");

    let config: ScannerConfig = toml::from_str(&toml_str).expect("Failed to parse TOML");
    assert!(validate_config(&config).is_ok());
}

/// Test that an evasive radius inside the device footprint is rejected.
#[test]
fn test_evasive_radius_inside_device() {
    // Circumradius of 270 x 195 is about 166.5 mm.
    let toml_str = format!("{DEVICE}\n[motion]\nevasive_radius = 150.0\n");

    let result = parse_config(&toml_str);
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::EvasiveRadiusTooSmall { .. }))
    ));
}

/// Test that a non-positive safe radius is rejected.
#[test]
fn test_zero_safe_radius() {
    let result = parse_config("[pattern]\ntype = \"spherical\"\n\n[motion]\nsafe_radius = 0.0\n");
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidSafeRadius(_)))
    ));
}

/// Test that a device with a zero dimension is rejected.
#[test]
fn test_flat_device() {
    let toml_str = r#"
[pattern]
type = "cylindrical"

[device]
width = 270.0
depth = 0.0
height = 375.0
"#;

    assert!(matches!(
        parse_config(toml_str),
        Err(Error::Config(ConfigError::InvalidDevice { .. }))
    ));
}

/// Test that a linear axis needs its travel per revolution.
#[test]
fn test_linear_axis_without_pitch() {
    let toml_str = r#"
[pattern]
type = "spherical"

[axes.radial]
steps_per_revolution = 200
max_velocity = 25.0
max_acceleration = 50.0
"#;

    assert_eq!(
        parse_config(toml_str).unwrap_err(),
        Error::Config(ConfigError::MissingField("units_per_revolution"))
    );
}

/// Test validation of invalid soft limits.
#[test]
fn test_invalid_soft_limits() {
    let toml_str = r#"
[pattern]
type = "spherical"

[axes.vertical]
steps_per_revolution = 200
units_per_revolution = 8.0
max_velocity = 20.0
max_acceleration = 40.0

[axes.vertical.limits]
min = 100.0
max = -100.0
"#;

    assert!(matches!(
        parse_config(toml_str),
        Err(Error::Config(ConfigError::InvalidSoftLimits { .. }))
    ));
}

/// Test validation of a non-positive acceleration.
#[test]
fn test_negative_acceleration() {
    let toml_str = r#"
[pattern]
type = "spherical"

[axes.angular]
kind = "rotary"
steps_per_revolution = 200
max_velocity = 30.0
max_acceleration = -1.0
"#;

    assert!(matches!(
        parse_config(toml_str),
        Err(Error::Config(ConfigError::InvalidMaxAcceleration(_)))
    ));
}
