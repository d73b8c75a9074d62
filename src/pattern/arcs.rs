//! Precomputed shell points, sorted by angle so the shell manager can sweep each
//! meridian with arc moves.
//!
//! Three flavours share one walker:
//!
//! - plain: a double shell at `radius` and `radius - wall_spacing`
//! - random: every point at its own radius inside the shell wall
//! - sorted: the double shell, refused when a point falls inside the device

use alloc::vec::Vec;
use core::cmp::Ordering;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::error::{PatternError, Result};
use crate::position::Position;
use crate::safety::DeviceFootprint;

use super::grid::{check_shell, round2, spherical_to_cartesian, to_cylindrical_rounded, RingLayout};
use super::ScanPath;

/// Default clearance kept around the central pole by the random variant, in millimeters.
pub const DEFAULT_POLE_CLEARANCE: f64 = 30.0;

#[cfg(not(feature = "std"))]
const FALLBACK_SEED: u64 = 0x5eed_a5c5_0000_0001;

/// Parameters of the plain double shell.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcsConfig {
    /// Total number of points over both shells.
    pub nr_of_points: usize,
    /// Distance between the outer and inner shell.
    pub wall_spacing: f64,
    /// Outer shell radius.
    pub radius: f64,
}

/// Parameters of the randomised-radius shell.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomArcsConfig {
    /// Number of grid points before the pole clearance is applied.
    pub nr_of_points: usize,
    /// Thickness of the shell wall radii are drawn from.
    pub wall_spacing: f64,
    /// Outer shell radius.
    pub radius: f64,
    /// Points closer than this to the axis are dropped.
    pub minimum_radius: f64,
    /// Seed for reproducible radii; entropy when absent.
    pub seed: Option<u64>,
}

/// Parameters of the box-checked double shell.
#[derive(Debug, Clone, PartialEq)]
pub struct SortedArcsConfig {
    /// Total number of points over both shells.
    pub nr_of_points: usize,
    /// Distance between the outer and inner shell.
    pub wall_spacing: f64,
    /// Outer shell radius.
    pub radius: f64,
    /// Device extent along y.
    pub speaker_width: f64,
    /// Device extent along x.
    pub speaker_depth: f64,
    /// Device extent along z.
    pub speaker_height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArcsKind {
    Plain,
    Random,
    Sorted,
}

/// Walker over a precomputed, angle-sorted point list.
#[derive(Debug, Clone)]
pub struct ShellArcs {
    kind: ArcsKind,
    radius: f64,
    points: Vec<Position>,
    index: usize,
}

impl ShellArcs {
    /// Double shell of `n / 2` grid points at `radius` and `radius - wall_spacing`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::NoPoints`] when the grid is empty.
    pub fn new_arcs(config: ArcsConfig) -> Result<Self> {
        let cartesian = double_shell(config.nr_of_points, config.radius, config.wall_spacing)?;
        let mut points: Vec<Position> = cartesian.into_iter().map(to_cylindrical_rounded).collect();
        sort_by_angle_then_height(&mut points);

        Self::from_points(ArcsKind::Plain, config.radius, points)
    }

    /// `n` grid points, each at a uniformly drawn radius in `[radius - wall_spacing, radius]`.
    ///
    /// # Errors
    ///
    /// Returns an invalid-parameter error for a non-finite or non-positive
    /// radius or a wall spacing outside `[0, radius)`, and
    /// [`PatternError::NoPoints`] when nothing survives the pole clearance.
    pub fn new_random(config: RandomArcsConfig) -> Result<Self> {
        check_shell(config.radius, config.wall_spacing)?;

        let layout = RingLayout::new(config.nr_of_points as f64)?;
        let mut rng = make_rng(config.seed);
        let inner = config.radius - config.wall_spacing;

        let mut points: Vec<Position> = layout
            .angles()
            .map(|(theta, phi)| {
                let radius = rng.gen_range(inner..=config.radius);
                to_cylindrical_rounded(spherical_to_cartesian(radius, theta, phi))
            })
            .collect();
        sort_by_angle_then_height(&mut points);

        let before = points.len();
        points.retain(|p| p.r() > config.minimum_radius);
        debug!(dropped = before - points.len(), "pole clearance applied");

        Self::from_points(ArcsKind::Random, config.radius, points)
    }

    /// Double shell like [`new_arcs`](Self::new_arcs) with every coordinate
    /// rounded to 0.01, refused when any point lies strictly inside the device box.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::PointsInsideDevice`] with the number of offending
    /// points, or [`PatternError::NoPoints`] when the grid is empty.
    pub fn new_sorted(config: SortedArcsConfig) -> Result<Self> {
        let cartesian = double_shell(config.nr_of_points, config.radius, config.wall_spacing)?;

        let device = DeviceFootprint::from_dimensions(
            config.speaker_width,
            config.speaker_depth,
            config.speaker_height,
        );
        let inside = cartesian.iter().filter(|c| device.contains_strictly(**c)).count();
        if inside != 0 {
            tracing::warn!(count = inside, "shell points inside device volume");
            return Err(PatternError::PointsInsideDevice { count: inside }.into());
        }

        let mut points: Vec<Position> = cartesian
            .into_iter()
            .map(|c| {
                let p = to_cylindrical_rounded(c);
                Position::new(round2(p.r()), p.t(), round2(p.z()))
            })
            .collect();
        sort_by_angle_then_height(&mut points);

        Self::from_points(ArcsKind::Sorted, config.radius, points)
    }

    fn from_points(kind: ArcsKind, radius: f64, points: Vec<Position>) -> Result<Self> {
        if points.is_empty() {
            return Err(PatternError::NoPoints.into());
        }

        info!(kind = ?kind, points = points.len(), radius, "shell point list ready");

        Ok(Self {
            kind,
            radius,
            points,
            index: 0,
        })
    }

    /// Outer shell radius.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// The precomputed points in emission order.
    pub fn points(&self) -> &[Position] {
        &self.points
    }
}

impl ScanPath for ShellArcs {
    fn next(&mut self) -> Result<Position> {
        let position = *self.points.get(self.index).ok_or(PatternError::Exhausted)?;
        self.index += 1;
        Ok(position)
    }

    fn ready(&self) -> bool {
        self.index >= self.points.len()
    }

    fn need_to_do_evasive_move(&self) -> bool {
        // Only the box-checked variant flags anything: a drop in height after
        // the point just emitted marks the start of a new meridian.
        if self.kind != ArcsKind::Sorted || self.index < 2 {
            return false;
        }
        self.points[self.index - 1].z() < self.points[self.index - 2].z()
    }

    fn reset(&mut self) {
        self.index = 0;
    }

    fn len_hint(&self) -> Option<usize> {
        Some(self.points.len())
    }
}

/// Grid of `n / 2` directions placed on the outer and the inner shell.
fn double_shell(
    nr_of_points: usize,
    radius: f64,
    wall_spacing: f64,
) -> Result<Vec<crate::position::Cartesian>> {
    check_shell(radius, wall_spacing)?;
    let layout = RingLayout::new(nr_of_points as f64 / 2.0)?;
    let inner = radius - wall_spacing;

    let mut out = Vec::with_capacity(2 * layout.total());
    out.extend(layout.angles().map(|(theta, phi)| spherical_to_cartesian(radius, theta, phi)));
    out.extend(layout.angles().map(|(theta, phi)| spherical_to_cartesian(inner, theta, phi)));
    Ok(out)
}

/// Stable sort by rounded angle, ties broken by height.
fn sort_by_angle_then_height(points: &mut [Position]) {
    points.sort_by(|a, b| match a.t().total_cmp(&b.t()) {
        Ordering::Equal => a.z().total_cmp(&b.z()),
        other => other,
    });
}

fn make_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        #[cfg(feature = "std")]
        None => SmallRng::from_entropy(),
        #[cfg(not(feature = "std"))]
        None => SmallRng::seed_from_u64(FALLBACK_SEED),
    }
}
