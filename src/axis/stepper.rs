//! Step/dir stepper axis.
//!
//! Generic over embedded-hal 1.0 pin types; every move blocks until the last
//! step pulse has been sent.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use tracing::{debug, warn};

use crate::config::units::Steps;
use crate::config::{AxisConstraints, LimitCheck};
use crate::error::{AxisError, Result};
use crate::motion::AxisMover;

use super::profile::{Direction, MotionProfile};

/// Width of the STEP pulse in microseconds.
const PULSE_WIDTH_US: u32 = 2;

/// Stepper driven axis.
///
/// Generic over:
/// - `STEP`: STEP pin type (must implement `OutputPin`)
/// - `DIR`: DIR pin type (must implement `OutputPin`)
/// - `DELAY`: Delay provider (must implement `DelayNs`)
pub struct StepperAxis<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    step_pin: STEP,
    dir_pin: DIR,
    delay: DELAY,

    /// Absolute position in steps.
    position: Steps,

    /// Direction last written to the DIR pin.
    current_direction: Option<Direction>,

    constraints: AxisConstraints,
    name: heapless::String<32>,
    invert_direction: bool,
}

impl<STEP, DIR, DELAY> StepperAxis<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    pub(crate) fn new(
        step_pin: STEP,
        dir_pin: DIR,
        delay: DELAY,
        constraints: AxisConstraints,
        name: heapless::String<32>,
        invert_direction: bool,
    ) -> Self {
        Self {
            step_pin,
            dir_pin,
            delay,
            position: Steps::default(),
            current_direction: None,
            constraints,
            name,
            invert_direction,
        }
    }

    /// Get the axis name.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Get current position in steps.
    #[inline]
    pub fn position_steps(&self) -> Steps {
        self.position
    }

    /// Get the step-domain constraints.
    #[inline]
    pub fn constraints(&self) -> &AxisConstraints {
        &self.constraints
    }

    /// Move to an absolute step position and return the step the axis ended
    /// on, which is the clamped target under a clamping soft limit.
    ///
    /// # Errors
    ///
    /// Returns [`AxisError::LimitExceeded`] when the target violates a
    /// rejecting soft limit, and [`AxisError::PinError`] when a pin write fails.
    pub fn move_to_steps(&mut self, target: Steps) -> Result<Steps> {
        let target = match self.constraints.check_limits(target.value()) {
            LimitCheck::Within(steps) => steps,
            LimitCheck::Clamped(steps) => {
                warn!(axis = self.name(), requested = target.value(), clamped = steps, "target clamped to soft limit");
                steps
            }
            LimitCheck::Rejected(limit) => {
                warn!(axis = self.name(), requested = target.value(), limit, "target outside soft limits");
                return Err(AxisError::LimitExceeded {
                    position: target.value(),
                    limit,
                }
                .into());
            }
        };

        let delta = target - self.position.value();
        if delta == 0 {
            return Ok(self.position);
        }

        let profile = MotionProfile::trapezoidal(
            delta,
            self.constraints.max_velocity_steps_per_sec,
            self.constraints.max_acceleration_steps_per_sec2,
        );
        debug!(axis = self.name(), from = self.position.value(), to = target, "stepping");

        self.set_direction(profile.direction)?;
        for interval_ns in profile.intervals() {
            self.pulse()?;
            self.position = Steps(self.position.value() + profile.direction.sign());
            self.delay
                .delay_ns(interval_ns.saturating_sub(PULSE_WIDTH_US * 1000));
        }

        Ok(self.position)
    }

    /// Give the pins and the delay provider back.
    pub fn release(self) -> (STEP, DIR, DELAY) {
        (self.step_pin, self.dir_pin, self.delay)
    }

    fn pulse(&mut self) -> Result<()> {
        self.step_pin.set_high().map_err(|_| AxisError::PinError)?;
        self.delay.delay_us(PULSE_WIDTH_US);
        self.step_pin.set_low().map_err(|_| AxisError::PinError)?;
        Ok(())
    }

    fn set_direction(&mut self, direction: Direction) -> Result<()> {
        if self.current_direction == Some(direction) {
            return Ok(());
        }

        let pin_high = match direction {
            Direction::Positive => !self.invert_direction,
            Direction::Negative => self.invert_direction,
        };

        if pin_high {
            self.dir_pin.set_high().map_err(|_| AxisError::PinError)?;
        } else {
            self.dir_pin.set_low().map_err(|_| AxisError::PinError)?;
        }

        self.current_direction = Some(direction);
        Ok(())
    }
}

impl<STEP, DIR, DELAY> AxisMover for StepperAxis<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    fn move_to(&mut self, position: f64) -> Result<f64> {
        let target = self.constraints.units_to_steps(position);
        let landed = self.move_to_steps(target)?;
        if landed == target {
            // Sub-step remainders are not a shortfall.
            Ok(position)
        } else {
            Ok(self.constraints.steps_to_units(landed))
        }
    }

    fn set_as_zero(&mut self) -> Result<()> {
        self.position = Steps::default();
        Ok(())
    }

    fn position(&self) -> Option<f64> {
        Some(self.constraints.steps_to_units(self.position))
    }
}

impl<STEP, DIR, DELAY> core::fmt::Debug for StepperAxis<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StepperAxis")
            .field("name", &self.name)
            .field("position", &self.position)
            .field("direction", &self.current_direction)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::StepperAxisBuilder;
    use crate::config::{LimitPolicy, SoftLimits};
    use crate::error::Error;
    use alloc::vec::Vec;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction};

    fn pulses(n: usize) -> Vec<Transaction> {
        let mut t = Vec::new();
        for _ in 0..n {
            t.push(Transaction::set(State::High));
            t.push(Transaction::set(State::Low));
        }
        t
    }

    /// One step per unit, so positions map one to one onto pulses.
    fn axis(
        step: &[Transaction],
        dir: &[Transaction],
        limits: Option<SoftLimits>,
    ) -> StepperAxis<PinMock, PinMock, NoopDelay> {
        let mut builder = StepperAxisBuilder::new()
            .name("radial")
            .step_pin(PinMock::new(step))
            .dir_pin(PinMock::new(dir))
            .delay(NoopDelay::new())
            .steps_per_revolution(200)
            .units_per_revolution(200.0)
            .max_velocity(100.0)
            .max_acceleration(200.0);
        if let Some(limits) = limits {
            builder = builder.limits(limits);
        }
        builder.build().unwrap()
    }

    fn done(axis: StepperAxis<PinMock, PinMock, NoopDelay>) {
        let (mut step, mut dir, _) = axis.release();
        step.done();
        dir.done();
    }

    #[test]
    fn test_move_forward_and_back() {
        let mut step = pulses(4);
        step.extend(pulses(3));
        let dir = [Transaction::set(State::High), Transaction::set(State::Low)];

        let mut a = axis(&step, &dir, None);
        a.move_to(4.0).unwrap();
        assert_eq!(a.position(), Some(4.0));
        a.move_to(1.0).unwrap();
        assert_eq!(a.position_steps(), Steps(1));
        done(a);
    }

    #[test]
    fn test_direction_pin_written_once_per_change() {
        let step = pulses(5);
        let dir = [Transaction::set(State::High)];

        let mut a = axis(&step, &dir, None);
        a.move_to(2.0).unwrap();
        a.move_to(5.0).unwrap();
        done(a);
    }

    #[test]
    fn test_move_in_place_sends_nothing() {
        let mut a = axis(&[], &[], None);
        a.move_to(0.0).unwrap();
        a.move_to(0.2).unwrap();
        done(a);
    }

    #[test]
    fn test_rejecting_limit() {
        let limits = SoftLimits::new(0.0, 3.0, LimitPolicy::Reject);
        let mut a = axis(&[], &[], Some(limits));

        let err = a.move_to(5.0).unwrap_err();
        assert_eq!(
            err,
            Error::Axis(AxisError::LimitExceeded {
                position: 5,
                limit: 3
            })
        );
        assert_eq!(a.position_steps(), Steps(0));
        done(a);
    }

    #[test]
    fn test_clamping_limit() {
        let limits = SoftLimits::new(0.0, 3.0, LimitPolicy::Clamp);
        let step = pulses(3);
        let dir = [Transaction::set(State::High)];

        let mut a = axis(&step, &dir, Some(limits));
        assert_eq!(a.move_to(10.0).unwrap(), 3.0);
        assert_eq!(a.position(), Some(3.0));
        done(a);
    }

    #[test]
    fn test_set_as_zero() {
        let step = pulses(2);
        let dir = [Transaction::set(State::High)];

        let mut a = axis(&step, &dir, None);
        a.move_to(2.0).unwrap();
        a.set_as_zero().unwrap();
        assert_eq!(a.position(), Some(0.0));
        done(a);
    }
}
