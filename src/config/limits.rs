//! Soft limit configuration and types.

use serde::Deserialize;

use super::units::Steps;

/// Policy for handling limit violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitPolicy {
    /// Reject moves that would exceed limits.
    #[default]
    Reject,
    /// Clamp target to nearest limit.
    Clamp,
}

/// Soft limits in axis units (from configuration).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SoftLimits {
    /// Minimum allowed position.
    pub min: f32,

    /// Maximum allowed position.
    pub max: f32,

    /// What to do when a limit is exceeded.
    #[serde(default)]
    pub policy: LimitPolicy,
}

impl SoftLimits {
    /// Create new soft limits.
    pub fn new(min: f32, max: f32, policy: LimitPolicy) -> Self {
        Self { min, max, policy }
    }

    /// Check if limits are valid (min < max).
    pub fn is_valid(&self) -> bool {
        self.min < self.max
    }

    /// Check if a position is within limits.
    pub fn contains(&self, position: f32) -> bool {
        position >= self.min && position <= self.max
    }
}

/// Soft limits converted to steps (for runtime use).
#[derive(Debug, Clone, PartialEq)]
pub struct StepLimits {
    /// Minimum position in steps.
    pub min_steps: i64,
    /// Maximum position in steps.
    pub max_steps: i64,
    /// Limit policy.
    pub policy: LimitPolicy,
}

/// Outcome of checking a target against [`StepLimits`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitCheck {
    /// Target is inside the limits.
    Within(i64),
    /// Target was outside and has been clamped to this limit.
    Clamped(i64),
    /// Target is outside and the policy rejects it; carries the violated limit.
    Rejected(i64),
}

impl StepLimits {
    /// Create step limits from soft limits and steps per axis unit.
    pub fn from_soft_limits(soft: &SoftLimits, steps_per_unit: f32) -> Self {
        Self {
            min_steps: Steps::from_units(soft.min as f64, steps_per_unit).value(),
            max_steps: Steps::from_units(soft.max as f64, steps_per_unit).value(),
            policy: soft.policy,
        }
    }

    /// Check if a position is within limits.
    pub fn contains(&self, steps: i64) -> bool {
        steps >= self.min_steps && steps <= self.max_steps
    }

    /// Apply the limit policy to a target position.
    pub fn check(&self, target: i64) -> LimitCheck {
        if self.contains(target) {
            return LimitCheck::Within(target);
        }

        let limit = if target < self.min_steps {
            self.min_steps
        } else {
            self.max_steps
        };

        match self.policy {
            LimitPolicy::Reject => LimitCheck::Rejected(limit),
            LimitPolicy::Clamp => LimitCheck::Clamped(limit),
        }
    }
}
