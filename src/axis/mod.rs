//! Step/dir driven scanner axes.
//!
//! A [`StepperAxis`] implements [`AxisMover`](crate::motion::AxisMover), so
//! three of them drive a [`CylindricalController`](crate::motion::CylindricalController)
//! directly.

mod builder;
mod profile;
mod stepper;

pub use builder::StepperAxisBuilder;
pub use profile::{Direction, MotionPhase, MotionProfile};
pub use stepper::StepperAxis;

impl<STEP, DIR, DELAY> StepperAxis<STEP, DIR, DELAY>
where
    STEP: embedded_hal::digital::OutputPin,
    DIR: embedded_hal::digital::OutputPin,
    DELAY: embedded_hal::delay::DelayNs,
{
    /// Create a builder for a new axis.
    pub fn builder() -> StepperAxisBuilder<STEP, DIR, DELAY> {
        StepperAxisBuilder::new()
    }
}
