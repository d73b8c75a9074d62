//! Collision checks against the device under test.
//!
//! The device is modelled as an axis-aligned box centred on the scanner axis:
//! half-depth along x, half-width along y and half-height along z around
//! `center_z`. Both predicates are pure; they only emit diagnostic events.

use libm::{fabs, sqrt};
use tracing::{debug, trace};

use crate::position::{Cartesian, Position};

/// Keep-out box of the device under test.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceFootprint {
    /// Half extent along y.
    pub half_width: f64,
    /// Half extent along x.
    pub half_depth: f64,
    /// Half extent along z.
    pub half_height: f64,
    /// Height of the box centre.
    pub center_z: f64,
}

impl DeviceFootprint {
    /// Create a footprint from full device dimensions, centred at height 0.
    pub fn from_dimensions(width: f64, depth: f64, height: f64) -> Self {
        Self {
            half_width: width / 2.0,
            half_depth: depth / 2.0,
            half_height: height / 2.0,
            center_z: 0.0,
        }
    }

    /// Move the box centre to another height.
    pub fn centered_at(mut self, center_z: f64) -> Self {
        self.center_z = center_z;
        self
    }

    /// Height of the upper boundary plane.
    #[inline]
    pub fn top(&self) -> f64 {
        self.center_z + self.half_height
    }

    /// Height of the lower boundary plane.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.center_z - self.half_height
    }

    /// Radius of the smallest cylinder around the axis that contains the box.
    #[inline]
    pub fn circumradius(&self) -> f64 {
        sqrt(self.half_width * self.half_width + self.half_depth * self.half_depth)
    }

    /// Whether a horizontal projection lies over the box (boundary included).
    #[inline]
    pub fn covers(&self, x: f64, y: f64) -> bool {
        fabs(x) <= self.half_depth && fabs(y) <= self.half_width
    }

    /// Whether a point lies strictly inside the box.
    #[inline]
    pub fn contains_strictly(&self, p: Cartesian) -> bool {
        fabs(p.x) < self.half_depth
            && fabs(p.y) < self.half_width
            && fabs(p.z - self.center_z) < self.half_height
    }

    /// Check a straight vertical move from `current` to `target_z` against the
    /// horizontal plane at `boundary_z`.
    ///
    /// Unsafe when the vertical line through `current` pierces the plane over the
    /// box and the piercing height lies between `current.z()` and `target_z`.
    pub fn vertical_move_safe(&self, current: &Position, target_z: f64, boundary_z: f64) -> bool {
        let start = current.to_cartesian();
        let crossing = line_plane_intersection(
            [0.0, 0.0, 1.0],
            [0.0, 0.0, boundary_z],
            [0.0, 0.0, 1.0],
            [start.x, start.y, start.z],
        );

        let Some([x, y, z]) = crossing else {
            return true;
        };

        let unsafe_move = self.covers(x, y) && is_between(current.z(), z, target_z);
        if unsafe_move {
            debug!(
                from = current.z(),
                to = target_z,
                boundary = boundary_z,
                "vertical move crosses device boundary"
            );
        } else {
            trace!(from = current.z(), to = target_z, boundary = boundary_z, "vertical move clear");
        }
        !unsafe_move
    }

    /// Check a radial move from `current` to `target_r` at the current height.
    ///
    /// Unsafe when the probe is level with the box and the target radius lies
    /// inside the box circumradius.
    pub fn radial_move_safe(&self, current: &Position, target_r: f64) -> bool {
        let level = fabs(current.z() - self.center_z) <= self.half_height;
        let unsafe_move = level && target_r < self.circumradius();
        if unsafe_move {
            debug!(
                z = current.z(),
                to = target_r,
                limit = self.circumradius(),
                "radial move enters device footprint"
            );
        }
        !unsafe_move
    }
}

/// Whether `b` lies in the closed interval bounded by `a` and `c`, in either order.
#[inline]
pub fn is_between(a: f64, b: f64, c: f64) -> bool {
    (a <= b && b <= c) || (c <= b && b <= a)
}

/// Intersection of a line with a plane.
///
/// Returns `None` when the line is parallel to the plane.
pub fn line_plane_intersection(
    plane_normal: [f64; 3],
    plane_point: [f64; 3],
    line_direction: [f64; 3],
    line_point: [f64; 3],
) -> Option<[f64; 3]> {
    let denom = dot(plane_normal, line_direction);
    if fabs(denom) < 1e-12 {
        return None;
    }

    let w = [
        line_point[0] - plane_point[0],
        line_point[1] - plane_point[1],
        line_point[2] - plane_point[2],
    ];
    let s = -dot(plane_normal, w) / denom;

    Some([
        line_point[0] + s * line_direction[0],
        line_point[1] + s * line_direction[1],
        line_point[2] + s * line_direction[2],
    ])
}

#[inline]
fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}
