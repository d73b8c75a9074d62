//! Builder pattern for StepperAxis.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use tracing::debug;

use crate::config::units::{AxisKind, Microsteps};
use crate::config::{validate_axis, AxisConfig, AxisConstraints, ScannerConfig, SoftLimits};
use crate::error::{name, ConfigError, Error, Result};

use super::stepper::StepperAxis;

/// Builder for creating StepperAxis instances.
pub struct StepperAxisBuilder<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    step_pin: Option<STEP>,
    dir_pin: Option<DIR>,
    delay: Option<DELAY>,
    name: Option<heapless::String<32>>,
    kind: AxisKind,
    steps_per_revolution: Option<u16>,
    microsteps: Microsteps,
    units_per_revolution: Option<f32>,
    max_velocity: Option<f32>,
    max_acceleration: Option<f32>,
    invert_direction: bool,
    limits: Option<SoftLimits>,
}

impl<STEP, DIR, DELAY> Default for StepperAxisBuilder<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<STEP, DIR, DELAY> StepperAxisBuilder<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            step_pin: None,
            dir_pin: None,
            delay: None,
            name: None,
            kind: AxisKind::Linear,
            steps_per_revolution: None,
            microsteps: Microsteps::FULL,
            units_per_revolution: None,
            max_velocity: None,
            max_acceleration: None,
            invert_direction: false,
            limits: None,
        }
    }

    /// Set the STEP pin.
    pub fn step_pin(mut self, pin: STEP) -> Self {
        self.step_pin = Some(pin);
        self
    }

    /// Set the DIR pin.
    pub fn dir_pin(mut self, pin: DIR) -> Self {
        self.dir_pin = Some(pin);
        self
    }

    /// Set the delay provider.
    pub fn delay(mut self, delay: DELAY) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set the axis name (truncated to 32 bytes).
    pub fn name(mut self, axis_name: &str) -> Self {
        self.name = Some(name(axis_name));
        self
    }

    /// Set whether the axis is linear or rotary.
    pub fn kind(mut self, kind: AxisKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set steps per revolution (base motor steps before microstepping).
    pub fn steps_per_revolution(mut self, steps: u16) -> Self {
        self.steps_per_revolution = Some(steps);
        self
    }

    /// Set microstep configuration.
    pub fn microsteps(mut self, microsteps: Microsteps) -> Self {
        self.microsteps = microsteps;
        self
    }

    /// Set axis travel per output revolution.
    pub fn units_per_revolution(mut self, units: f32) -> Self {
        self.units_per_revolution = Some(units);
        self
    }

    /// Set maximum velocity in units per second.
    pub fn max_velocity(mut self, velocity: f32) -> Self {
        self.max_velocity = Some(velocity);
        self
    }

    /// Set maximum acceleration in units per second squared.
    pub fn max_acceleration(mut self, acceleration: f32) -> Self {
        self.max_acceleration = Some(acceleration);
        self
    }

    /// Set direction inversion.
    pub fn invert_direction(mut self, invert: bool) -> Self {
        self.invert_direction = invert;
        self
    }

    /// Set soft limits in axis units.
    pub fn limits(mut self, limits: SoftLimits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Configure from an AxisConfig.
    pub fn from_axis_config(mut self, config: &AxisConfig) -> Self {
        self.kind = config.kind;
        self.steps_per_revolution = Some(config.steps_per_revolution);
        self.microsteps = config.microsteps;
        self.units_per_revolution = config.units_per_revolution;
        self.max_velocity = Some(config.max_velocity);
        self.max_acceleration = Some(config.max_acceleration);
        self.invert_direction = config.invert_direction;
        self.limits = config.limits.clone();
        self
    }

    /// Configure from ScannerConfig by axis name.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::AxisNotFound` when no axis has that name.
    pub fn from_config(self, config: &ScannerConfig, axis_name: &str) -> Result<Self> {
        let axis_config = config
            .axis(axis_name)
            .ok_or_else(|| Error::Config(ConfigError::AxisNotFound(name(axis_name))))?;

        let mut builder = self.from_axis_config(axis_config);
        if builder.name.is_none() {
            builder.name = Some(name(axis_name));
        }
        Ok(builder)
    }

    /// Build the StepperAxis.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` if required fields are missing, and
    /// the same errors as [`validate_config`](crate::config::validate_config)
    /// for out-of-range velocity, acceleration, travel or limits.
    pub fn build(self) -> Result<StepperAxis<STEP, DIR, DELAY>> {
        let axis_name = self.name.unwrap_or_else(|| name("axis"));
        let config = AxisConfig {
            kind: self.kind,
            steps_per_revolution: self
                .steps_per_revolution
                .ok_or(ConfigError::MissingField("steps_per_revolution"))?,
            microsteps: self.microsteps,
            units_per_revolution: self.units_per_revolution,
            max_velocity: self
                .max_velocity
                .ok_or(ConfigError::MissingField("max_velocity"))?,
            max_acceleration: self
                .max_acceleration
                .ok_or(ConfigError::MissingField("max_acceleration"))?,
            invert_direction: self.invert_direction,
            limits: self.limits,
        };
        validate_axis(&axis_name, &config)?;
        let constraints = AxisConstraints::from_config(&config)?;

        let step_pin = self.step_pin.ok_or(ConfigError::MissingField("step_pin"))?;
        let dir_pin = self.dir_pin.ok_or(ConfigError::MissingField("dir_pin"))?;
        let delay = self.delay.ok_or(ConfigError::MissingField("delay"))?;

        debug!(
            axis = axis_name.as_str(),
            unit = config.kind.unit(),
            steps_per_unit = constraints.steps_per_unit,
            "axis configured"
        );

        Ok(StepperAxis::new(
            step_pin,
            dir_pin,
            delay,
            constraints,
            axis_name,
            config.invert_direction,
        ))
    }
}
