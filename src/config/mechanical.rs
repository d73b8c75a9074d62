//! Mechanical constraints derived from axis configuration.

use super::axis::AxisConfig;
use super::limits::{LimitCheck, StepLimits};
use super::units::Steps;
use crate::error::{ConfigError, Result};

/// Step-domain parameters of an axis, computed once at initialization.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisConstraints {
    /// Steps per millimeter or per degree.
    pub steps_per_unit: f32,

    /// Maximum velocity in steps per second.
    pub max_velocity_steps_per_sec: f32,

    /// Maximum acceleration in steps per second squared.
    pub max_acceleration_steps_per_sec2: f32,

    /// Minimum step interval in nanoseconds (at max velocity).
    pub min_step_interval_ns: u32,

    /// Soft limits in steps (if configured).
    pub limits: Option<StepLimits>,
}

impl AxisConstraints {
    /// Compute constraints from raw drive parameters.
    pub fn new(
        steps_per_unit: f32,
        max_velocity: f32,
        max_acceleration: f32,
        limits: Option<StepLimits>,
    ) -> Self {
        let max_velocity_steps_per_sec = max_velocity * steps_per_unit;
        let max_acceleration_steps_per_sec2 = max_acceleration * steps_per_unit;

        let min_step_interval_ns = if max_velocity_steps_per_sec > 0.0 {
            (1_000_000_000.0 / max_velocity_steps_per_sec) as u32
        } else {
            u32::MAX
        };

        Self {
            steps_per_unit,
            max_velocity_steps_per_sec,
            max_acceleration_steps_per_sec2,
            min_step_interval_ns,
            limits,
        }
    }

    /// Compute constraints from an axis configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` when a linear axis has no travel per
    /// revolution.
    pub fn from_config(config: &AxisConfig) -> Result<Self> {
        let steps_per_unit = config
            .steps_per_unit()
            .ok_or(ConfigError::MissingField("units_per_revolution"))?;

        let limits = config
            .limits
            .as_ref()
            .map(|l| StepLimits::from_soft_limits(l, steps_per_unit));

        Ok(Self::new(
            steps_per_unit,
            config.max_velocity,
            config.max_acceleration,
            limits,
        ))
    }

    /// Convert a position in axis units to steps.
    #[inline]
    pub fn units_to_steps(&self, units: f64) -> Steps {
        Steps::from_units(units, self.steps_per_unit)
    }

    /// Convert steps to a position in axis units.
    #[inline]
    pub fn steps_to_units(&self, steps: Steps) -> f64 {
        steps.to_units(self.steps_per_unit)
    }

    /// Check a step target against the soft limits.
    pub fn check_limits(&self, steps: i64) -> LimitCheck {
        match &self.limits {
            Some(limits) => limits.check(steps),
            None => LimitCheck::Within(steps),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::limits::{LimitPolicy, SoftLimits};
    use crate::config::units::{AxisKind, Microsteps};
    use crate::error::Error;

    fn vertical() -> AxisConfig {
        AxisConfig {
            kind: AxisKind::Linear,
            steps_per_revolution: 200,
            microsteps: Microsteps::SIXTEENTH,
            units_per_revolution: Some(8.0),
            max_velocity: 20.0,
            max_acceleration: 40.0,
            invert_direction: false,
            limits: Some(SoftLimits::new(-400.0, 400.0, LimitPolicy::Reject)),
        }
    }

    #[test]
    fn test_step_rates() {
        let c = AxisConstraints::from_config(&vertical()).unwrap();

        // 3200 steps per 8 mm
        assert_eq!(c.steps_per_unit, 400.0);
        assert_eq!(c.max_velocity_steps_per_sec, 8000.0);
        assert_eq!(c.max_acceleration_steps_per_sec2, 16000.0);
        assert_eq!(c.min_step_interval_ns, 125_000);
    }

    #[test]
    fn test_limits_in_steps() {
        let c = AxisConstraints::from_config(&vertical()).unwrap();
        assert_eq!(c.check_limits(160_000), LimitCheck::Within(160_000));
        assert_eq!(c.check_limits(160_001), LimitCheck::Rejected(160_000));
    }

    #[test]
    fn test_unit_conversion() {
        let c = AxisConstraints::from_config(&vertical()).unwrap();
        assert_eq!(c.units_to_steps(12.5), Steps(5000));
        assert!((c.steps_to_units(Steps(5000)) - 12.5).abs() < 1e-9);
    }

    #[test]
    fn test_linear_axis_without_pitch() {
        let config = AxisConfig {
            units_per_revolution: None,
            ..vertical()
        };
        assert_eq!(
            AxisConstraints::from_config(&config),
            Err(Error::Config(ConfigError::MissingField("units_per_revolution")))
        );
    }
}
