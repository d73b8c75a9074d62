//! Unit tests for TOML configuration parsing.

use nfs_scan::config::{load_config, LimitPolicy, ScannerConfig};
use nfs_scan::{AxisKind, Microsteps};

/// Test parsing a full scanner configuration.
#[test]
fn test_parse_scanner_config() {
    let toml_str = r#"
[pattern]
type = "cylindrical"

[pattern.parameters]
nr_of_angular_points = 36
nr_of_radial_cap_points = 5
nr_of_vertical_points = 20
cap_spacing = 10.0
wall_spacing = 0.0
radius = 300.0
height = 600.0

[device]
width = 270.0
depth = 195.0
height = 375.0
center_height = 250.0

[motion]
evasive_radius = 400.0

[axes.radial]
steps_per_revolution = 200
microsteps = 8
units_per_revolution = 5.0
max_velocity = 25.0
max_acceleration = 50.0

[axes.angular]
kind = "rotary"
steps_per_revolution = 200
microsteps = 16
max_velocity = 30.0
max_acceleration = 60.0
invert_direction = true
"#;

    let config: ScannerConfig = toml::from_str(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.pattern.kind.as_str(), "cylindrical");
    assert_eq!(config.pattern.parameters.len(), 7);
    assert_eq!(config.pattern.parameters.get("radius"), Some(300.0));

    let device = config.device.as_ref().expect("Device not found");
    assert_eq!(device.center_height, 250.0);
    assert_eq!(config.motion.evasive_radius, Some(400.0));
    assert_eq!(config.motion.safe_radius, None);

    let radial = config.axis("radial").expect("Axis not found");
    assert_eq!(radial.kind, AxisKind::Linear);
    assert_eq!(radial.microsteps, Microsteps::EIGHTH);
    assert_eq!(radial.steps_per_unit(), Some(320.0));

    let angular = config.axis("angular").expect("Axis not found");
    assert_eq!(angular.kind, AxisKind::Rotary);
    assert!(angular.invert_direction);

    let mut names: Vec<&str> = config.axis_names().collect();
    names.sort_unstable();
    assert_eq!(names, vec!["angular", "radial"]);
}

/// Test parsing an axis with soft limits.
#[test]
fn test_parse_axis_with_limits() {
    let toml_str = r#"
[pattern]
type = "spherical"

[axes.vertical]
steps_per_revolution = 200
units_per_revolution = 8.0
max_velocity = 20.0
max_acceleration = 40.0

[axes.vertical.limits]
min = -400.0
max = 400.0
policy = "clamp"
"#;

    let config: ScannerConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let vertical = config.axis("vertical").expect("Axis not found");

    let limits = vertical.limits.as_ref().expect("Limits not found");
    assert_eq!(limits.min, -400.0);
    assert_eq!(limits.max, 400.0);
    assert_eq!(limits.policy, LimitPolicy::Clamp);
}

/// Test that pattern parameters default to an empty map.
#[test]
fn test_pattern_without_parameters() {
    let config: ScannerConfig =
        toml::from_str("[pattern]\ntype = \"spherical_arcs\"\n").expect("Failed to parse TOML");

    assert!(config.pattern.parameters.is_empty());
    assert!(config.axes.is_empty());
    assert!(config.build_pattern().is_err());
}

/// Test that invalid microstep values are rejected during parsing.
#[test]
fn test_invalid_microsteps_rejected() {
    let toml_str = r#"
[pattern]
type = "spherical"

[axes.radial]
steps_per_revolution = 200
microsteps = 12
units_per_revolution = 5.0
max_velocity = 25.0
max_acceleration = 50.0
"#;

    let result: Result<ScannerConfig, _> = toml::from_str(toml_str);
    assert!(result.is_err(), "Should reject non-power-of-2 microsteps");
}

/// Test that a missing pattern section is a parse error.
#[test]
fn test_missing_pattern_rejected() {
    let result: Result<ScannerConfig, _> = toml::from_str("[motion]\nsafe_radius = 10.0\n");
    assert!(result.is_err());
}

/// Test loading a configuration file from disk.
#[test]
fn test_load_config_from_file() {
    let path = std::env::temp_dir().join("nfs_scan_load_config_test.toml");
    std::fs::write(
        &path,
        "[pattern]\ntype = \"spherical\"\n\n[pattern.parameters]\nnr_of_points = 50\nradius = 250.0\n",
    )
    .expect("Failed to write config");

    let config = load_config(&path).expect("Failed to load config");
    let _ = std::fs::remove_file(&path);

    assert_eq!(config.pattern.kind.as_str(), "spherical");
    assert!(config.build_pattern().is_ok());
}
