//! Error types for nfs-scan.
//!
//! Provides unified error handling across configuration, scan-path generation and
//! axis motion.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all nfs-scan operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Scan-path generator construction or protocol error
    Pattern(PatternError),
    /// Axis mover failure
    Axis(AxisError),
    /// Measurement capture failure
    Capture(heapless::String<64>),
}

impl Error {
    /// Capture failure with a message, truncated to 64 bytes.
    pub fn capture(message: &str) -> Self {
        Error::Capture(name(message))
    }
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Invalid microstep value (must be power of 2: 1, 2, 4, 8, 16, 32, 64, 128, 256)
    InvalidMicrosteps(u16),
    /// Pattern identifier has no registered constructor
    UnknownPattern(heapless::String<32>),
    /// Pattern registry has no room for another constructor
    RegistryFull,
    /// Pattern name does not fit the registry key (32 bytes)
    InvalidName(heapless::String<64>),
    /// Required pattern parameter is absent
    MissingParameter(heapless::String<32>),
    /// Pattern parameter is present but out of range
    InvalidParameter {
        /// Parameter name
        name: heapless::String<32>,
        /// Offending value
        value: f64,
    },
    /// Axis name not found in configuration
    AxisNotFound(heapless::String<32>),
    /// Invalid units per revolution (must be > 0)
    InvalidUnitsPerRevolution(f32),
    /// Invalid max velocity (must be > 0)
    InvalidMaxVelocity(f32),
    /// Invalid max acceleration (must be > 0)
    InvalidMaxAcceleration(f32),
    /// Invalid soft limits (min must be < max)
    InvalidSoftLimits {
        /// Minimum limit value
        min: f32,
        /// Maximum limit value
        max: f32,
    },
    /// Device dimensions must all be positive
    InvalidDevice {
        /// Device width
        width: f64,
        /// Device depth
        depth: f64,
        /// Device height
        height: f64,
    },
    /// Evasive radius does not clear the device footprint
    EvasiveRadiusTooSmall {
        /// Configured evasive radius
        radius: f64,
        /// Required minimum (footprint circumradius)
        minimum: f64,
    },
    /// Safe starting radius for shell scans must be > 0
    InvalidSafeRadius(f64),
    /// Required builder field was not provided
    MissingField(&'static str),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Scan-path generator errors.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternError {
    /// Parameters produce an empty point sequence
    NoPoints,
    /// Precomputed points fall inside the device under test
    PointsInsideDevice {
        /// Number of offending points
        count: usize,
    },
    /// `next()` called after the pattern reported ready
    Exhausted,
    /// Generator reached a state its transition table cannot produce
    InvariantViolation(&'static str),
}

/// Axis mover errors.
#[derive(Debug, Clone, PartialEq)]
pub enum AxisError {
    /// Pin operation failed
    PinError,
    /// Target exceeds soft limits
    LimitExceeded {
        /// Requested position in steps
        position: i64,
        /// Limit that was exceeded (min or max)
        limit: i64,
    },
    /// Transport or controller reported a failure
    Fault(heapless::String<64>),
    /// Axis stopped short of a position the route depends on
    Unreached {
        /// Requested position in axis units
        requested: f64,
        /// Position actually reached
        reached: f64,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Pattern(e) => write!(f, "Scan pattern error: {}", e),
            Error::Axis(e) => write!(f, "Axis error: {}", e),
            Error::Capture(msg) => write!(f, "Capture error: {}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidMicrosteps(v) => {
                write!(f, "Invalid microsteps: {}. Valid values: 1, 2, 4, 8, 16, 32, 64, 128, 256", v)
            }
            ConfigError::UnknownPattern(name) => write!(f, "Unknown scan pattern '{}'", name),
            ConfigError::RegistryFull => write!(f, "Pattern registry is full"),
            ConfigError::InvalidName(name) => {
                write!(f, "Pattern name '{}' is longer than 32 bytes", name)
            }
            ConfigError::MissingParameter(name) => write!(f, "Missing pattern parameter '{}'", name),
            ConfigError::InvalidParameter { name, value } => {
                write!(f, "Invalid value {} for pattern parameter '{}'", value, name)
            }
            ConfigError::AxisNotFound(name) => write!(f, "Axis '{}' not found", name),
            ConfigError::InvalidUnitsPerRevolution(v) => {
                write!(f, "Invalid units per revolution: {}. Must be > 0", v)
            }
            ConfigError::InvalidMaxVelocity(v) => write!(f, "Invalid max velocity: {}. Must be > 0", v),
            ConfigError::InvalidMaxAcceleration(v) => write!(f, "Invalid max acceleration: {}. Must be > 0", v),
            ConfigError::InvalidSoftLimits { min, max } => {
                write!(f, "Invalid soft limits: min ({}) must be < max ({})", min, max)
            }
            ConfigError::InvalidDevice { width, depth, height } => {
                write!(f, "Invalid device size {} x {} x {}: all dimensions must be > 0", width, depth, height)
            }
            ConfigError::EvasiveRadiusTooSmall { radius, minimum } => {
                write!(f, "Evasive radius {} does not clear the device (minimum {})", radius, minimum)
            }
            ConfigError::InvalidSafeRadius(v) => write!(f, "Invalid safe radius: {}. Must be > 0", v),
            ConfigError::MissingField(field) => write!(f, "{} is required", field),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::NoPoints => write!(f, "Pattern parameters produce no measurement points"),
            PatternError::PointsInsideDevice { count } => {
                write!(f, "{} points inside device volume", count)
            }
            PatternError::Exhausted => write!(f, "next() called on a finished pattern"),
            PatternError::InvariantViolation(what) => write!(f, "Generator invariant violated: {}", what),
        }
    }
}

impl fmt::Display for AxisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisError::PinError => write!(f, "GPIO pin operation failed"),
            AxisError::LimitExceeded { position, limit } => {
                write!(f, "Position {} exceeds limit {}", position, limit)
            }
            AxisError::Fault(msg) => write!(f, "Axis fault: {}", msg),
            AxisError::Unreached { requested, reached } => {
                write!(f, "Axis stopped at {} instead of {}", reached, requested)
            }
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<PatternError> for Error {
    fn from(e: PatternError) -> Self {
        Error::Pattern(e)
    }
}

impl From<AxisError> for Error {
    fn from(e: AxisError) -> Self {
        Error::Axis(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for PatternError {}

#[cfg(feature = "std")]
impl std::error::Error for AxisError {}

/// Build a heapless name, truncating to capacity instead of failing.
pub(crate) fn name<const N: usize>(s: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
