//! Cylindrical scanner coordinates.
//!
//! Every measurement point and every controller cache is a [`Position`]:
//! radius from the central axis, angle in degrees, and signed height.

use core::fmt;

use libm::{atan2, cos, sin, sqrt};

/// Position in cylindrical coordinates (radius, angle, height).
///
/// Value type: generators hand out fresh copies and controllers keep their own
/// copy as the "current position" cache.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Position {
    r: f64,
    t: f64,
    z: f64,
}

/// Position in cartesian coordinates, millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cartesian {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Z coordinate.
    pub z: f64,
}

impl Position {
    /// Origin of the cylindrical scanner.
    pub const ORIGIN: Self = Self { r: 0.0, t: 0.0, z: 0.0 };

    /// Create a new position.
    ///
    /// A negative radius describes the point on the opposite side of the axis and is
    /// stored as `(|r|, t + 180, z)`.
    pub fn new(r: f64, t: f64, z: f64) -> Self {
        if r < 0.0 {
            Self { r: -r, t: t + 180.0, z }
        } else {
            Self { r, t, z }
        }
    }

    /// Build a position from cartesian coordinates. The angle is returned in `[0, 360)`.
    pub fn from_cartesian(p: Cartesian) -> Self {
        let r = sqrt(p.x * p.x + p.y * p.y);
        let t = normalize_degrees(atan2(p.y, p.x).to_degrees());
        Self { r, t, z: p.z }
    }

    /// Radius from the central axis.
    #[inline]
    pub fn r(&self) -> f64 {
        self.r
    }

    /// Angle in degrees.
    #[inline]
    pub fn t(&self) -> f64 {
        self.t
    }

    /// Height along the axis.
    #[inline]
    pub fn z(&self) -> f64 {
        self.z
    }

    /// Copy with a different radius.
    #[inline]
    pub fn with_r(self, r: f64) -> Self {
        Self::new(r, self.t, self.z)
    }

    /// Copy with a different angle.
    #[inline]
    pub fn with_t(self, t: f64) -> Self {
        Self { t, ..self }
    }

    /// Copy with a different height.
    #[inline]
    pub fn with_z(self, z: f64) -> Self {
        Self { z, ..self }
    }

    /// Distance from the origin in the (r, z) half-plane.
    ///
    /// For points on a meridian this is the spherical radius.
    #[inline]
    pub fn length(&self) -> f64 {
        sqrt(self.r * self.r + self.z * self.z)
    }

    /// Convert to cartesian coordinates.
    pub fn to_cartesian(&self) -> Cartesian {
        let t = self.t.to_radians();
        Cartesian {
            x: self.r * cos(t),
            y: self.r * sin(t),
            z: self.z,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.r, self.t, self.z)
    }
}

/// Map an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(t: f64) -> f64 {
    let wrapped = libm::fmod(t, 360.0);
    let wrapped = if wrapped < 0.0 { wrapped + 360.0 } else { wrapped };
    // fmod(-1e-17, 360) + 360 rounds to exactly 360
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
