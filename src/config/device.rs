//! Device-under-test and motion configuration from TOML.

use serde::Deserialize;

use crate::safety::DeviceFootprint;

/// Outer dimensions of the device under test, in millimeters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeviceConfig {
    /// Extent along y.
    pub width: f64,
    /// Extent along x.
    pub depth: f64,
    /// Extent along z.
    pub height: f64,
    /// Height of the device centre above the scanner origin.
    #[serde(default)]
    pub center_height: f64,
}

impl DeviceConfig {
    /// Keep-out box for the motion safety checks.
    pub fn footprint(&self) -> DeviceFootprint {
        DeviceFootprint::from_dimensions(self.width, self.depth, self.height)
            .centered_at(self.center_height)
    }
}

/// Motion planning settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MotionConfig {
    /// Radius at which the cylindrical controller travels vertically when rerouting.
    #[serde(default)]
    pub evasive_radius: Option<f64>,

    /// Shell radius the spherical manager starts from.
    #[serde(default)]
    pub safe_radius: Option<f64>,
}
