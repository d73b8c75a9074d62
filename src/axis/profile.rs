//! Trapezoidal step timing.
//!
//! Step intervals follow the constant-acceleration law `v = sqrt(2 a n)`:
//! the n-th step of the ramp is taken at the velocity reached after `n`
//! steps of acceleration, capped at the cruise velocity. The ramp down mirrors
//! the ramp up, counted from the end of the move.

use libm::sqrtf;

/// Direction of axis motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Towards increasing positions.
    Positive,
    /// Towards decreasing positions.
    Negative,
}

impl Direction {
    /// Direction of a signed step count.
    #[inline]
    pub fn from_steps(steps: i64) -> Self {
        if steps >= 0 {
            Direction::Positive
        } else {
            Direction::Negative
        }
    }

    /// Sign of a single step.
    #[inline]
    pub fn sign(self) -> i64 {
        match self {
            Direction::Positive => 1,
            Direction::Negative => -1,
        }
    }
}

/// Phase of a step within the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionPhase {
    /// Ramping up.
    Accelerating,
    /// At cruise velocity.
    Cruising,
    /// Ramping down.
    Decelerating,
}

/// Symmetric trapezoidal profile for one move.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionProfile {
    /// Total steps to move (absolute value).
    pub total_steps: u32,
    /// Direction of motion.
    pub direction: Direction,
    /// Steps in the ramp up (and, mirrored, the ramp down).
    pub ramp_steps: u32,
    /// Cruise step interval in nanoseconds.
    pub cruise_interval_ns: u32,
    acceleration: f32,
}

impl MotionProfile {
    /// Plan a move of `delta_steps` with the given limits in steps/s and steps/s².
    pub fn trapezoidal(delta_steps: i64, max_velocity: f32, acceleration: f32) -> Self {
        let direction = Direction::from_steps(delta_steps);
        let total_steps = delta_steps.unsigned_abs().min(u32::MAX as u64) as u32;

        if total_steps == 0 || !(max_velocity > 0.0) || !(acceleration > 0.0) {
            return Self {
                total_steps: 0,
                direction,
                ramp_steps: 0,
                cruise_interval_ns: u32::MAX,
                acceleration: 0.0,
            };
        }

        // Distance needed to reach cruise velocity: v² / 2a
        let full_ramp = (max_velocity * max_velocity / (2.0 * acceleration)) as u32;
        let ramp_steps = full_ramp.max(1).min(total_steps / 2);

        Self {
            total_steps,
            direction,
            ramp_steps,
            cruise_interval_ns: (1_000_000_000.0 / max_velocity) as u32,
            acceleration,
        }
    }

    /// True when the profile moves nothing.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.total_steps == 0
    }

    /// Steps at cruise velocity.
    #[inline]
    pub fn cruise_steps(&self) -> u32 {
        self.total_steps - 2 * self.ramp_steps
    }

    /// Phase of step `step` (0-based).
    pub fn phase_at(&self, step: u32) -> MotionPhase {
        if step < self.ramp_steps {
            MotionPhase::Accelerating
        } else if step < self.total_steps - self.ramp_steps {
            MotionPhase::Cruising
        } else {
            MotionPhase::Decelerating
        }
    }

    /// Delay before step `step` in nanoseconds.
    pub fn interval_at(&self, step: u32) -> u32 {
        let ramp_position = match self.phase_at(step) {
            MotionPhase::Cruising => return self.cruise_interval_ns,
            MotionPhase::Accelerating => step + 1,
            MotionPhase::Decelerating => self.total_steps - step,
        };

        let velocity = sqrtf(2.0 * self.acceleration * ramp_position as f32);
        let interval = (1_000_000_000.0 / velocity) as u32;
        interval.max(self.cruise_interval_ns)
    }

    /// Delays for every step of the move, in order.
    pub fn intervals(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.total_steps).map(move |step| self.interval_at(step))
    }
}
