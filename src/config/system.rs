//! Scanner configuration - root configuration structure.

use heapless::{FnvIndexMap, String};
use serde::Deserialize;

use crate::error::Result;
use crate::pattern::{PatternParameters, PatternRegistry, ScanPattern};
use crate::safety::DeviceFootprint;

use super::axis::AxisConfig;
use super::device::{DeviceConfig, MotionConfig};

/// Maximum number of configured axes.
pub const MAX_AXES: usize = 8;

/// Scan pattern selection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PatternConfig {
    /// Registered pattern name, e.g. `cylindrical` or `spherical_sorted`.
    #[serde(rename = "type")]
    pub kind: String<32>,

    /// Numeric parameters handed to the pattern constructor.
    #[serde(default)]
    pub parameters: PatternParameters,
}

impl PatternConfig {
    /// Build the configured pattern from a registry.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownPattern` for unregistered names, or the
    /// pattern constructor's error.
    pub fn build(&self, registry: &PatternRegistry) -> Result<ScanPattern> {
        registry.create(self.kind.as_str(), &self.parameters)
    }
}

/// Root configuration structure from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct ScannerConfig {
    /// Scan pattern.
    pub pattern: PatternConfig,

    /// Device under test; without it no collision checks can be made.
    #[serde(default)]
    pub device: Option<DeviceConfig>,

    /// Motion planning settings.
    #[serde(default)]
    pub motion: MotionConfig,

    /// Named axis configurations (`radial`, `angular`, `vertical`, ...).
    #[serde(default)]
    pub axes: FnvIndexMap<String<32>, AxisConfig, MAX_AXES>,
}

impl ScannerConfig {
    /// Get an axis configuration by name.
    pub fn axis(&self, name: &str) -> Option<&AxisConfig> {
        self.axes
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v)
    }

    /// List all axis names.
    pub fn axis_names(&self) -> impl Iterator<Item = &str> {
        self.axes.keys().map(|s| s.as_str())
    }

    /// Keep-out box of the configured device, if any.
    pub fn footprint(&self) -> Option<DeviceFootprint> {
        self.device.as_ref().map(DeviceConfig::footprint)
    }

    /// Build the configured pattern with the built-in registry.
    ///
    /// # Errors
    ///
    /// See [`PatternConfig::build`].
    pub fn build_pattern(&self) -> Result<ScanPattern> {
        self.pattern.build(&PatternRegistry::with_builtin())
    }
}
