//! Equal-area latitude rings on the unit sphere.

use alloc::vec::Vec;
use core::f64::consts::PI;

use libm::{cos, round, sin, sqrt};

use crate::error::{name, ConfigError, Error, PatternError, Result};
use crate::position::{Cartesian, Position};

/// One latitude ring of the equal-area grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereRing {
    /// Polar angle of the ring in radians, measured from +z.
    pub theta: f64,
    /// Number of points on the ring.
    pub count: usize,
}

impl SphereRing {
    /// Azimuth of point `k` on this ring, in radians.
    #[inline]
    pub fn phi(&self, k: usize) -> f64 {
        2.0 * PI * k as f64 / self.count as f64
    }
}

/// Ring partition of a sphere into approximately `n` cells of equal area.
///
/// Each cell is treated as a square of side `sqrt(4π/n)`; the polar extent is
/// rounded to a whole number of rings and every ring gets as many points as fit
/// its circumference.
#[derive(Debug, Clone, PartialEq)]
pub struct RingLayout {
    rings: Vec<SphereRing>,
}

impl RingLayout {
    /// Compute the layout for a target point count.
    ///
    /// Rings that round to zero points are left out.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::NoPoints`] when the layout is empty.
    pub fn new(n: f64) -> Result<Self> {
        if !(n > 0.0) || !n.is_finite() {
            return Err(PatternError::NoPoints.into());
        }

        let area = 4.0 * PI / n;
        let side = sqrt(area);
        let m_theta = round(PI / side) as usize;
        if m_theta == 0 {
            return Err(PatternError::NoPoints.into());
        }

        let d_theta = PI / m_theta as f64;
        let d_phi = area / d_theta;

        let rings: Vec<SphereRing> = (0..m_theta)
            .map(|m| {
                let theta = PI * (m as f64 + 0.5) / m_theta as f64;
                let count = round(2.0 * PI * sin(theta) / d_phi) as usize;
                SphereRing { theta, count }
            })
            .filter(|ring| ring.count > 0)
            .collect();

        if rings.is_empty() {
            return Err(PatternError::NoPoints.into());
        }

        Ok(Self { rings })
    }

    /// The non-empty rings, from the +z pole downwards.
    #[inline]
    pub fn rings(&self) -> &[SphereRing] {
        &self.rings
    }

    /// Total number of points over all rings.
    pub fn total(&self) -> usize {
        self.rings.iter().map(|r| r.count).sum()
    }

    /// Every (theta, phi) pair of the grid, ring by ring.
    pub fn angles(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.rings
            .iter()
            .flat_map(|ring| (0..ring.count).map(move |k| (ring.theta, ring.phi(k))))
    }
}

/// Cartesian point on a sphere of the given radius centred at the origin.
#[inline]
pub(crate) fn spherical_to_cartesian(radius: f64, theta: f64, phi: f64) -> Cartesian {
    Cartesian {
        x: radius * sin(theta) * cos(phi),
        y: radius * sin(theta) * sin(phi),
        z: radius * cos(theta),
    }
}

/// Round to two decimals, the resolution the sorted point lists are kept at.
#[inline]
pub(crate) fn round2(v: f64) -> f64 {
    round(v * 100.0) / 100.0
}

/// Cylindrical coordinates of a cartesian point with the angle rounded to 0.01 degree.
#[inline]
pub(crate) fn to_cylindrical_rounded(p: Cartesian) -> Position {
    let exact = Position::from_cartesian(p);
    let mut t = round2(libm::atan2(p.y, p.x).to_degrees());
    if t == -180.0 {
        t = 180.0;
    }
    Position::new(exact.r(), t, exact.z())
}

/// Shell radii must be finite and positive.
pub(crate) fn check_shell(radius: f64, wall_spacing: f64) -> Result<()> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidParameter {
            name: name("radius"),
            value: radius,
        }));
    }
    if !(wall_spacing >= 0.0 && wall_spacing < radius) {
        return Err(Error::Config(ConfigError::InvalidParameter {
            name: name("wall_spacing"),
            value: wall_spacing,
        }));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_approximates_target() {
        for n in [50.0, 200.0, 1000.0, 5000.0] {
            let layout = RingLayout::new(n).unwrap();
            let total = layout.total() as f64;
            let relative = (total - n).abs() / n;
            assert!(relative < 0.1, "n = {}, total = {}", n, total);
        }
    }

    #[test]
    fn test_rings_are_symmetric_about_equator() {
        let layout = RingLayout::new(400.0).unwrap();
        let rings = layout.rings();
        let m = rings.len();
        for i in 0..m / 2 {
            assert_eq!(rings[i].count, rings[m - 1 - i].count);
            assert!((rings[i].theta + rings[m - 1 - i].theta - PI).abs() < 1e-12);
        }
    }

    #[test]
    fn test_angles_match_total() {
        let layout = RingLayout::new(300.0).unwrap();
        assert_eq!(layout.angles().count(), layout.total());
    }

    #[test]
    fn test_zero_points_rejected() {
        assert!(RingLayout::new(0.0).is_err());
        assert!(RingLayout::new(-3.0).is_err());
        assert!(RingLayout::new(0.01).is_err());
    }

    #[test]
    fn test_shell_radius_checked() {
        assert!(check_shell(500.0, 20.0).is_ok());
        assert!(check_shell(500.0, 0.0).is_ok());
        for radius in [f64::NAN, f64::INFINITY, 0.0, -100.0] {
            assert!(matches!(
                check_shell(radius, 0.0),
                Err(Error::Config(ConfigError::InvalidParameter { ref name, .. })) if name == "radius"
            ));
        }
        for wall_spacing in [f64::NAN, -1.0, 500.0] {
            assert!(matches!(
                check_shell(500.0, wall_spacing),
                Err(Error::Config(ConfigError::InvalidParameter { ref name, .. })) if name == "wall_spacing"
            ));
        }
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.23456), 1.23);
        assert_eq!(round2(-1.23556), -1.24);
    }
}
