//! Unit types for axis configuration.
//!
//! Axis positions are configured in millimeters (linear axes) or degrees (the
//! turntable) and converted to motor [`Steps`] once, at the driver boundary.

use serde::Deserialize;

use crate::error::ConfigError;

/// What an axis moves: the unit its positions are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisKind {
    /// Lead screw or belt axis, positions in millimeters.
    #[default]
    Linear,
    /// Turntable, positions in degrees.
    Rotary,
}

impl AxisKind {
    /// Unit label for diagnostics.
    pub const fn unit(self) -> &'static str {
        match self {
            AxisKind::Linear => "mm",
            AxisKind::Rotary => "deg",
        }
    }

    /// Travel per output revolution when the configuration leaves it out.
    ///
    /// Only a turntable has a natural value.
    pub const fn default_units_per_revolution(self) -> Option<f32> {
        match self {
            AxisKind::Linear => None,
            AxisKind::Rotary => Some(360.0),
        }
    }
}

/// Motor position in steps (absolute from origin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Steps(pub i64);

impl Steps {
    /// Create a new Steps value.
    #[inline]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Nearest whole step for a position in axis units.
    #[inline]
    pub fn from_units(units: f64, steps_per_unit: f32) -> Self {
        Self(libm::round(units * steps_per_unit as f64) as i64)
    }

    /// Position in axis units.
    #[inline]
    pub fn to_units(self, steps_per_unit: f32) -> f64 {
        self.0 as f64 / steps_per_unit as f64
    }
}

/// Microstep divisor (1, 2, 4, 8, 16, 32, 64, 128, 256).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Microsteps(u16);

impl Microsteps {
    /// Full step.
    pub const FULL: Self = Self(1);
    /// Eighth step.
    pub const EIGHTH: Self = Self(8);
    /// Sixteenth step.
    pub const SIXTEENTH: Self = Self(16);
    /// Thirty-second step.
    pub const THIRTY_SECOND: Self = Self(32);

    /// Create a microstep divisor.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidMicrosteps` unless the value is a power of
    /// two between 1 and 256.
    pub fn new(value: u16) -> Result<Self, ConfigError> {
        if value.is_power_of_two() && value <= 256 {
            Ok(Self(value))
        } else {
            Err(ConfigError::InvalidMicrosteps(value))
        }
    }

    /// Get the raw divisor value.
    #[inline]
    pub const fn value(self) -> u16 {
        self.0
    }
}

impl Default for Microsteps {
    fn default() -> Self {
        Self::FULL
    }
}

impl TryFrom<u16> for Microsteps {
    type Error = ConfigError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for Microsteps {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use core::fmt::Write;
        let value = u16::deserialize(deserializer)?;
        Microsteps::new(value).map_err(|e| {
            let mut buf = heapless::String::<128>::new();
            let _ = write!(buf, "{}", e);
            serde::de::Error::custom(buf.as_str())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_microsteps_powers_of_two() {
        for shift in 0..=8 {
            assert!(Microsteps::new(1 << shift).is_ok());
        }
        for bad in [0, 3, 17, 512] {
            assert_eq!(Microsteps::new(bad), Err(ConfigError::InvalidMicrosteps(bad)));
        }
    }

    #[test]
    fn test_steps_round_to_nearest() {
        assert_eq!(Steps::from_units(10.04, 10.0), Steps(100));
        assert_eq!(Steps::from_units(10.06, 10.0), Steps(101));
        assert_eq!(Steps::from_units(-2.5, 2.0), Steps(-5));
    }

    #[test]
    fn test_steps_to_units() {
        let steps_per_unit = 3200.0 / 360.0;
        assert!((Steps(3200).to_units(steps_per_unit) - 360.0).abs() < 1e-3);
    }

    #[test]
    fn test_rotary_default_travel() {
        assert_eq!(AxisKind::Rotary.default_units_per_revolution(), Some(360.0));
        assert_eq!(AxisKind::Linear.default_units_per_revolution(), None);
    }
}
