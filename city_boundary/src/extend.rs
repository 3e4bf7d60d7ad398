use abstutil::Timer;
use geom::Distance;

use crate::connect::graft_connection;
use crate::crossings::insert_crossings_along;
use crate::cycles::longest_cycle;
use crate::{ConnectivityMatrix, Options, RoadSet};

/// What happened while trying to extend the cycle.
pub struct Extension {
    /// The best cycle found at the end, if any.
    pub cycle: Option<Vec<usize>>,
    /// Pairs of roads synthetically connected, in order.
    pub connections: Vec<(usize, usize)>,
    /// New vertices allocated where grafted segments cross other roads.
    pub crossings_inserted: usize,
    /// At most one warning, explaining why the cycle doesn't span every road.
    pub warnings: Vec<String>,
}

/// Greedily adds synthetic connections between roads until some cycle passes through all of
/// them.
///
/// Each round, every missing connection is tried on its own copy of the matrix. The one producing
/// the longest cycle wins; ties go to the lowest (i, j) pair. The winner is committed to the
/// matrix and grafted onto the roads at their closest vertices. A grafted segment has a new line,
/// which might cross other roads, so crossings are inserted along it and any roads it now touches
/// are connected in the matrix too. If no single connection makes the cycle longer, give up with
/// a warning.
///
/// This always terminates, since the cycle grows every round and can't exceed the number of
/// roads.
pub fn extend_cycle(
    roads: &mut RoadSet,
    matrix: &mut ConnectivityMatrix,
    threshold: Distance,
    opts: &Options,
    timer: &mut Timer,
) -> Extension {
    let num_roads = roads.roads.len();
    let mut best = longest_cycle(matrix);
    let mut connections = Vec::new();
    let mut crossings_inserted = 0;
    let mut warnings = Vec::new();

    loop {
        let current_len = best.as_ref().map(|c| c.len()).unwrap_or(0);
        if current_len >= num_roads {
            break;
        }
        if let Some(cap) = opts.max_extensions {
            if connections.len() >= cap {
                let warning = format!(
                    "Cycle of {}/{} roads can't be extended within {} synthetic connections",
                    current_len, num_roads, cap
                );
                timer.warn(warning.clone());
                warnings.push(warning);
                break;
            }
        }

        let candidates = matrix.missing_edges();
        let trials = try_connections(matrix, candidates.clone(), opts.parallel, timer);
        let mut winner: Option<((usize, usize), Vec<usize>)> = None;
        for (pair, cycle) in candidates.into_iter().zip(trials) {
            if let Some(cycle) = cycle {
                if winner
                    .as_ref()
                    .map(|(_, best_cycle)| cycle.len() > best_cycle.len())
                    .unwrap_or(true)
                {
                    winner = Some((pair, cycle));
                }
            }
        }

        match winner {
            Some(((r1, r2), cycle)) if cycle.len() > current_len => {
                matrix.connect(r1, r2);
                let (seg1, seg2) = graft_connection(roads, r1, r2);
                let grafted: Vec<_> = seg1.into_iter().chain(seg2).collect();
                if grafted.is_empty() {
                    debug!(
                        "Connected {} and {} in the graph only; the closest vertices are both \
                         interior",
                        roads.roads[r1].name, roads.roads[r2].name
                    );
                } else {
                    crossings_inserted += insert_crossings_along(roads, &grafted, threshold);
                    matrix.absorb(&ConnectivityMatrix::from_road_set(roads));
                }
                connections.push((r1, r2));
                info!(
                    "Connecting {} and {} makes a cycle of {}/{} roads",
                    roads.roads[r1].name,
                    roads.roads[r2].name,
                    cycle.len(),
                    num_roads
                );

                // The matrix only gained connections, so the winning cycle is still valid. New
                // crossings might reveal a longer one.
                best = match longest_cycle(matrix) {
                    Some(found) if found.len() > cycle.len() => Some(found),
                    _ => Some(cycle),
                };
            }
            _ => {
                let warning = if best.is_none() {
                    format!(
                        "No cycle found among {} roads, and it can't be extended by connecting any \
                         one pair of roads",
                        num_roads
                    )
                } else {
                    format!(
                        "Cycle of {}/{} roads can't be extended by connecting any one more pair \
                         of roads",
                        current_len, num_roads
                    )
                };
                timer.warn(warning.clone());
                warnings.push(warning);
                break;
            }
        }
    }

    Extension {
        cycle: best,
        connections,
        crossings_inserted,
        warnings,
    }
}

// For each candidate pair, the longest cycle if just that pair was connected. None means there'd
// still be no cycle at all. Results line up with the candidates.
fn try_connections(
    matrix: &ConnectivityMatrix,
    candidates: Vec<(usize, usize)>,
    parallel: bool,
    timer: &mut Timer,
) -> Vec<Option<Vec<usize>>> {
    let trial = |(r1, r2): (usize, usize)| {
        let mut copy = matrix.clone();
        copy.connect(r1, r2);
        longest_cycle(&copy)
    };

    if parallel {
        return timer.parallelize("try connecting roads", candidates, trial);
    }

    timer.start_iter("try connecting roads", candidates.len());
    candidates
        .into_iter()
        .map(|pair| {
            timer.next();
            trial(pair)
        })
        .collect()
}
