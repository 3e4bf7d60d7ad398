//! Stitches a set of named roads into one closed boundary, the way a city's limits might be traced
//! along the highways surrounding it.
//!
//! Roads that cross each other get a shared vertex at the crossing. Roads that share a vertex are
//! connected, and the goal is a cycle through the road graph passing through every road. When no
//! such cycle exists, roads are greedily connected to each other at their closest points until
//! one does, or until no single new connection helps.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use abstutil::Timer;
use geom::Distance;

pub use self::connect::{graft_connection, nearest_vertices, VertexPosition};
pub use self::connectivity::ConnectivityMatrix;
pub use self::crossings::{insert_crossings, insert_crossings_along};
pub use self::cycles::{fundamental_cycles, is_valid_cycle, longest_cycle, longest_cycle_len};
pub use self::extend::{extend_cycle, Extension};
pub use self::road_set::{Road, RoadSet, Segment, SegmentRef, VertexArena, VertexID};

mod connect;
mod connectivity;
mod crossings;
mod cycles;
mod extend;
mod io;
mod road_set;

/// Options controlling how roads are assembled into a boundary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Points closer than this many meters are treated as the same vertex.
    pub snap_tolerance: f64,
    /// Give up after adding this many synthetic connections.
    pub max_extensions: Option<usize>,
    /// Try candidate connections on a thread pool.
    pub parallel: bool,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            snap_tolerance: 1e-7,
            max_extensions: None,
            parallel: false,
        }
    }
}

impl Options {
    pub fn threshold(&self) -> Result<Distance> {
        if !self.snap_tolerance.is_finite() || self.snap_tolerance < 0.0 {
            bail!("Bad snap_tolerance {}", self.snap_tolerance);
        }
        Ok(Distance::meters(self.snap_tolerance))
    }
}

/// The outcome of `assemble_boundary`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Assembly {
    /// Road indices, in order around the best cycle found. Empty if there's no cycle at all.
    pub cycle: Vec<usize>,
    /// Does the cycle pass through every road?
    pub complete: bool,
    /// How many new vertices were created where roads cross, including crossings with grafted
    /// connections.
    pub crossings_inserted: usize,
    /// Pairs of roads synthetically connected, in the order they were added.
    pub connections: Vec<(usize, usize)>,
    pub warnings: Vec<String>,
}

/// Inserts crossing vertices, then connects roads until some cycle passes through all of them.
/// The roads are modified in place; trace the boundary from their segments afterwards.
pub fn assemble_boundary(
    roads: &mut RoadSet,
    opts: &Options,
    timer: &mut Timer,
) -> Result<Assembly> {
    roads.validate()?;
    let threshold = opts.threshold()?;

    timer.start("assemble boundary");
    timer.start("inserting crossings");
    let crossings_inserted = insert_crossings(roads, threshold, timer);
    timer.stop("inserting crossings");

    let mut matrix = ConnectivityMatrix::from_road_set(roads);
    debug!("Roads touching each other:\n{}", matrix);

    timer.start("extending cycle");
    let ext = extend_cycle(roads, &mut matrix, threshold, opts, timer);
    timer.stop("extending cycle");
    timer.stop("assemble boundary");

    let cycle = ext.cycle.unwrap_or_default();
    debug_assert!(is_valid_cycle(&matrix, &cycle));
    let complete = cycle.len() == roads.roads.len();
    if complete {
        info!(
            "Boundary passes through all {} roads, with {} synthetic connections",
            cycle.len(),
            ext.connections.len()
        );
    }

    Ok(Assembly {
        cycle,
        complete,
        crossings_inserted: crossings_inserted + ext.crossings_inserted,
        connections: ext.connections,
        warnings: ext.warnings,
    })
}
