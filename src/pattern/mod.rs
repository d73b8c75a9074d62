//! Scan-path generators.
//!
//! Each generator enumerates the measurement points of one scan geometry. They
//! all follow the same protocol: call [`ScanPath::next`] until
//! [`ScanPath::ready`] returns true, asking [`ScanPath::need_to_do_evasive_move`]
//! after every point whether the move to it must be rerouted.

use alloc::boxed::Box;

use crate::error::Result;
use crate::position::Position;

mod arcs;
mod cylindrical;
mod equal_area;
mod grid;
pub mod registry;

pub use arcs::{ArcsConfig, RandomArcsConfig, ShellArcs, SortedArcsConfig};
pub use cylindrical::{CylindricalConfig, CylindricalRaster, RasterPhase};
pub use equal_area::{EqualAreaConfig, EqualAreaSphere};
pub use grid::{RingLayout, SphereRing};
pub use registry::{PatternConstructor, PatternParameters, PatternRegistry, MAX_PATTERNS};

/// Shared contract of all scan-path generators.
pub trait ScanPath {
    /// Advance and return the next measurement point.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::Exhausted`](crate::error::PatternError::Exhausted)
    /// when called after [`ready`](Self::ready) reported true.
    fn next(&mut self) -> Result<Position>;

    /// True once the last point has been handed out.
    fn ready(&self) -> bool;

    /// True when the move to the point last returned must take the evasive route.
    fn need_to_do_evasive_move(&self) -> bool;

    /// Rewind to the first point.
    fn reset(&mut self);

    /// Total number of points the pattern emits, when known up front.
    fn len_hint(&self) -> Option<usize> {
        None
    }
}

/// The built-in generator family plus room for externally registered ones.
pub enum ScanPattern {
    /// Cylindrical raster: caps and wall per angular slice.
    Cylindrical(CylindricalRaster),
    /// Equal-area sampled sphere, ring by ring.
    EqualArea(EqualAreaSphere),
    /// Precomputed, angle-sorted shell points (plain, randomised or box-checked).
    Arcs(ShellArcs),
    /// Generator supplied at startup through the registry.
    Custom(Box<dyn ScanPath>),
}

impl core::fmt::Debug for ScanPattern {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ScanPattern::Cylindrical(p) => f.debug_tuple("Cylindrical").field(p).finish(),
            ScanPattern::EqualArea(p) => f.debug_tuple("EqualArea").field(p).finish(),
            ScanPattern::Arcs(p) => f.debug_tuple("Arcs").field(p).finish(),
            ScanPattern::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl ScanPath for ScanPattern {
    fn next(&mut self) -> Result<Position> {
        match self {
            ScanPattern::Cylindrical(p) => p.next(),
            ScanPattern::EqualArea(p) => p.next(),
            ScanPattern::Arcs(p) => p.next(),
            ScanPattern::Custom(p) => p.next(),
        }
    }

    fn ready(&self) -> bool {
        match self {
            ScanPattern::Cylindrical(p) => p.ready(),
            ScanPattern::EqualArea(p) => p.ready(),
            ScanPattern::Arcs(p) => p.ready(),
            ScanPattern::Custom(p) => p.ready(),
        }
    }

    fn need_to_do_evasive_move(&self) -> bool {
        match self {
            ScanPattern::Cylindrical(p) => p.need_to_do_evasive_move(),
            ScanPattern::EqualArea(p) => p.need_to_do_evasive_move(),
            ScanPattern::Arcs(p) => p.need_to_do_evasive_move(),
            ScanPattern::Custom(p) => p.need_to_do_evasive_move(),
        }
    }

    fn reset(&mut self) {
        match self {
            ScanPattern::Cylindrical(p) => p.reset(),
            ScanPattern::EqualArea(p) => p.reset(),
            ScanPattern::Arcs(p) => p.reset(),
            ScanPattern::Custom(p) => p.reset(),
        }
    }

    fn len_hint(&self) -> Option<usize> {
        match self {
            ScanPattern::Cylindrical(p) => p.len_hint(),
            ScanPattern::EqualArea(p) => p.len_hint(),
            ScanPattern::Arcs(p) => p.len_hint(),
            ScanPattern::Custom(p) => p.len_hint(),
        }
    }
}

impl<P: ScanPath + ?Sized> ScanPath for &mut P {
    fn next(&mut self) -> Result<Position> {
        (**self).next()
    }

    fn ready(&self) -> bool {
        (**self).ready()
    }

    fn need_to_do_evasive_move(&self) -> bool {
        (**self).need_to_do_evasive_move()
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn len_hint(&self) -> Option<usize> {
        (**self).len_hint()
    }
}

impl From<CylindricalRaster> for ScanPattern {
    fn from(p: CylindricalRaster) -> Self {
        ScanPattern::Cylindrical(p)
    }
}

impl From<EqualAreaSphere> for ScanPattern {
    fn from(p: EqualAreaSphere) -> Self {
        ScanPattern::EqualArea(p)
    }
}

impl From<ShellArcs> for ScanPattern {
    fn from(p: ShellArcs) -> Self {
        ScanPattern::Arcs(p)
    }
}
