use geom::Distance;

use crate::{RoadSet, SegmentRef, VertexID};

/// Where a vertex sits within a road.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexPosition {
    pub segment: SegmentRef,
    pub idx: usize,
    pub id: VertexID,
}

/// Out of every pair of vertices between two roads, finds the closest. Ties go to the first pair,
/// walking the first road's vertices in order, then the second's.
pub fn nearest_vertices(
    roads: &RoadSet,
    r1: usize,
    r2: usize,
) -> Option<(VertexPosition, VertexPosition, Distance)> {
    let vertices2 = roads.road_vertices(r2);
    let mut best: Option<(VertexPosition, VertexPosition, Distance)> = None;
    for (segment, idx, id) in roads.road_vertices(r1) {
        let pt1 = roads.pt(id);
        for (other_segment, other_idx, other_id) in &vertices2 {
            let dist = pt1.dist_to(roads.pt(*other_id));
            if best.as_ref().map(|(_, _, d)| dist < *d).unwrap_or(true) {
                best = Some((
                    VertexPosition {
                        segment,
                        idx,
                        id,
                    },
                    VertexPosition {
                        segment: *other_segment,
                        idx: *other_idx,
                        id: *other_id,
                    },
                    dist,
                ));
            }
        }
    }
    best
}

/// Synthetically links two roads at their closest pair of vertices. Each road gets the other's
/// vertex spliced in right next to its own, but only when its own vertex is the first or last of
/// its segment. Grafting onto the middle of a segment would break its ordering, and the interior
/// is already connected through the rest of the segment anyway.
///
/// Returns the segment of each road that was grafted onto, if any.
pub fn graft_connection(
    roads: &mut RoadSet,
    r1: usize,
    r2: usize,
) -> (Option<SegmentRef>, Option<SegmentRef>) {
    let (v1, v2, dist) = match nearest_vertices(roads, r1, r2) {
        Some(pair) => pair,
        None => {
            return (None, None);
        }
    };
    debug!(
        "Connecting {} and {} between {} and {}, {} apart",
        roads.roads[r1].name, roads.roads[r2].name, v1.id, v2.id, dist
    );
    let grafted1 = graft_terminal(roads, v1, v2.id);
    let grafted2 = graft_terminal(roads, v2, v1.id);
    (grafted1, grafted2)
}

fn graft_terminal(
    roads: &mut RoadSet,
    at: VertexPosition,
    new_vertex: VertexID,
) -> Option<SegmentRef> {
    let segment = &mut roads.roads[at.segment.road].segments[at.segment.segment];
    if at.idx == 0 {
        segment.vertices.insert(0, new_vertex);
    } else if at.idx == segment.vertices.len() - 1 {
        segment.vertices.push(new_vertex);
    } else {
        return None;
    }
    Some(at.segment)
}
