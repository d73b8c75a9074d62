//! Axis configuration from TOML.

use serde::Deserialize;

use super::limits::SoftLimits;
use super::units::{AxisKind, Microsteps};

/// Configuration of one step/dir driven axis.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AxisConfig {
    /// Linear (millimeters) or rotary (degrees).
    #[serde(default)]
    pub kind: AxisKind,

    /// Base steps per revolution (typically 200 for 1.8° motors).
    pub steps_per_revolution: u16,

    /// Microstep setting (1, 2, 4, 8, 16, 32, etc.).
    #[serde(default)]
    pub microsteps: Microsteps,

    /// Axis travel per output revolution: lead screw pitch in millimeters, or
    /// degrees of turntable rotation. Rotary axes default to 360.
    #[serde(default)]
    pub units_per_revolution: Option<f32>,

    /// Maximum velocity in units per second.
    pub max_velocity: f32,

    /// Maximum acceleration in units per second squared.
    pub max_acceleration: f32,

    /// Invert direction pin logic.
    #[serde(default)]
    pub invert_direction: bool,

    /// Optional soft limits in axis units.
    #[serde(default)]
    pub limits: Option<SoftLimits>,
}

impl AxisConfig {
    /// Total steps per output revolution.
    pub fn total_steps_per_revolution(&self) -> u32 {
        self.steps_per_revolution as u32 * self.microsteps.value() as u32
    }

    /// Travel per output revolution, falling back to the axis kind's default.
    pub fn resolved_units_per_revolution(&self) -> Option<f32> {
        self.units_per_revolution
            .or(self.kind.default_units_per_revolution())
    }

    /// Steps per millimeter or per degree.
    ///
    /// Returns `None` when the travel per revolution is unknown.
    pub fn steps_per_unit(&self) -> Option<f32> {
        self.resolved_units_per_revolution()
            .map(|units| self.total_steps_per_revolution() as f32 / units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turntable() -> AxisConfig {
        AxisConfig {
            kind: AxisKind::Rotary,
            steps_per_revolution: 200,
            microsteps: Microsteps::SIXTEENTH,
            units_per_revolution: None,
            max_velocity: 30.0,
            max_acceleration: 60.0,
            invert_direction: false,
            limits: None,
        }
    }

    #[test]
    fn test_rotary_defaults_to_full_circle() {
        let config = turntable();
        assert_eq!(config.total_steps_per_revolution(), 3200);
        let steps_per_degree = config.steps_per_unit().unwrap();
        assert!((steps_per_degree - 3200.0 / 360.0).abs() < 1e-4);
    }

    #[test]
    fn test_linear_needs_pitch() {
        let mut config = AxisConfig {
            kind: AxisKind::Linear,
            ..turntable()
        };
        assert_eq!(config.steps_per_unit(), None);

        config.units_per_revolution = Some(8.0);
        // 3200 steps per 8 mm lead screw turn
        assert_eq!(config.steps_per_unit(), Some(400.0));
    }
}
