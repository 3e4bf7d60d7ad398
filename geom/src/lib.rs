//! Planar geometry used to stitch road centerlines together. Coordinates are plain (x, y) pairs;
//! nothing here cares whether they're world-space meters or projected lon/lat.

#[macro_use]
extern crate anyhow;

mod distance;
mod line;
mod polyline;
mod pt;

pub use crate::distance::Distance;
pub use crate::line::{Line, LineCrossing};
pub use crate::polyline::{Crossing, PolyLine};
pub use crate::pt::{HashablePt2D, Pt2D};

/// Points closer than this are treated as the same vertex, unless a caller passes in something
/// else.
pub const EPSILON_DIST: Distance = Distance::const_meters(1e-7);
