use abstutil::Timer;
use geom::{Crossing, Distance, Pt2D};

use crate::{RoadSet, SegmentRef};

/// Finds every place where segments of two different roads cross, and makes sure both segments
/// have a vertex at exactly that position. Usually that's one new vertex spliced into both.
/// Returns the number of newly allocated vertices.
///
/// Collinear overlaps don't have a single crossing point; they're skipped.
pub fn insert_crossings(roads: &mut RoadSet, threshold: Distance, timer: &mut Timer) -> usize {
    let mut new_vertices = 0;
    timer.start_iter("find crossings per road", roads.roads.len());
    for road in 0..roads.roads.len() {
        timer.next();
        for segment in 0..roads.roads[road].segments.len() {
            new_vertices += cross_segment(roads, SegmentRef { road, segment }, threshold);
        }
    }
    new_vertices
}

/// Like `insert_crossings`, but only checks the given segments against every other road. Used
/// after a segment grows.
pub fn insert_crossings_along(
    roads: &mut RoadSet,
    segments: &[SegmentRef],
    threshold: Distance,
) -> usize {
    segments
        .iter()
        .map(|seg| cross_segment(roads, *seg, threshold))
        .sum()
}

fn cross_segment(roads: &mut RoadSet, seg: SegmentRef, threshold: Distance) -> usize {
    let mut new_vertices = 0;
    let candidates: Vec<SegmentRef> = roads
        .all_segments()
        .into_iter()
        .filter(|other| other.road != seg.road)
        .collect();
    for other in candidates {
        // Both polylines may have grown since the last check
        let pl1 = roads.segment_polyline(seg);
        let pl2 = roads.segment_polyline(other);
        let pts = match pl1.crossing(&pl2, threshold) {
            Crossing::None => {
                continue;
            }
            Crossing::Overlapping => {
                debug!(
                    "{} and {} overlap; not inserting crossings between them",
                    roads.roads[seg.road].name, roads.roads[other.road].name
                );
                continue;
            }
            // Even when the crossing is already a vertex of this segment, the other segment might
            // only have its own vertex nearby
            Crossing::AtVertex(pts) | Crossing::NotAtVertex(pts) => pts,
        };
        for pt in pts {
            if insert_crossing(roads, seg, other, pt, threshold) {
                new_vertices += 1;
            }
        }
    }
    new_vertices
}

// Returns true if a new vertex was allocated. If either segment already has a vertex at this
// point, it's reused, so both roads wind up sharing it.
fn insert_crossing(
    roads: &mut RoadSet,
    seg1: SegmentRef,
    seg2: SegmentRef,
    pt: Pt2D,
    threshold: Distance,
) -> bool {
    match (
        roads.find_vertex(seg1, pt, threshold),
        roads.find_vertex(seg2, pt, threshold),
    ) {
        (None, None) => {
            let id = roads.alloc_vertex(pt);
            roads.splice_vertex(seg1, id, threshold);
            roads.splice_vertex(seg2, id, threshold);
            debug!(
                "{} and {} cross at {}; inserted {}",
                roads.roads[seg1.road].name, roads.roads[seg2.road].name, pt, id
            );
            true
        }
        (Some(id), None) => {
            roads.splice_vertex(seg2, id, threshold);
            false
        }
        (None, Some(id)) => {
            roads.splice_vertex(seg1, id, threshold);
            false
        }
        (Some(id1), Some(id2)) => {
            // Each segment has its own vertex near the crossing. Unless the first segment already
            // has a vertex exactly where the second one's is, give the second segment the first
            // one's vertex too.
            let target = roads.pt(id2);
            let already_shared = roads
                .segment(seg1)
                .vertices
                .iter()
                .any(|v| roads.pt(*v) == target);
            if !already_shared && roads.merge_vertex(seg2, id1, threshold) {
                debug!(
                    "{} and {} cross near {} and {}; sharing {}",
                    roads.roads[seg1.road].name, roads.roads[seg2.road].name, id1, id2, id1
                );
            }
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConnectivityMatrix, VertexID};
    use geom::EPSILON_DIST;

    fn road(name: &str, segments: Vec<Vec<(f64, f64)>>) -> (String, Vec<Vec<Pt2D>>) {
        (
            name.to_string(),
            segments
                .into_iter()
                .map(|seg| seg.into_iter().map(|(x, y)| Pt2D::new(x, y)).collect())
                .collect(),
        )
    }

    #[test]
    fn test_simple_crossing() {
        let mut roads = RoadSet::new(vec![
            road("A", vec![vec![(0.0, 0.0), (2.0, 0.0)]]),
            road("B", vec![vec![(1.0, -1.0), (1.0, 2.0)]]),
        ])
        .unwrap();
        let inserted = insert_crossings(&mut roads, EPSILON_DIST, &mut Timer::throwaway());
        assert_eq!(inserted, 1);
        // The new vertex is shared and sits in the middle of both
        assert_eq!(
            roads.roads[0].segments[0].vertices,
            vec![VertexID(0), VertexID(4), VertexID(1)]
        );
        assert_eq!(
            roads.roads[1].segments[0].vertices,
            vec![VertexID(2), VertexID(4), VertexID(3)]
        );
        assert!(roads
            .pt(VertexID(4))
            .approx_eq(Pt2D::new(1.0, 0.0), EPSILON_DIST));
    }

    #[test]
    fn test_existing_vertex_is_reused() {
        // B already has a vertex where it crosses A
        let mut roads = RoadSet::new(vec![
            road("A", vec![vec![(0.0, 0.0), (2.0, 0.0)]]),
            road("B", vec![vec![(1.0, -1.0), (1.0, 0.0), (1.0, 2.0)]]),
        ])
        .unwrap();
        let inserted = insert_crossings(&mut roads, EPSILON_DIST, &mut Timer::throwaway());
        assert_eq!(inserted, 0);
        assert_eq!(
            roads.roads[0].segments[0].vertices,
            vec![VertexID(0), VertexID(3), VertexID(1)]
        );
        assert_eq!(roads.vertices().len(), 5);
    }

    #[test]
    fn test_crossing_one_segment_twice() {
        let mut roads = RoadSet::new(vec![
            road("A", vec![vec![(-1.0, 0.0), (3.0, 0.0)]]),
            road("B", vec![vec![(0.0, -1.0), (1.0, 1.0), (2.0, -1.0)]]),
        ])
        .unwrap();
        let inserted = insert_crossings(&mut roads, EPSILON_DIST, &mut Timer::throwaway());
        assert_eq!(inserted, 2);
        assert_eq!(
            roads.roads[0].segments[0].vertices,
            vec![VertexID(0), VertexID(5), VertexID(6), VertexID(1)]
        );
        assert_eq!(
            roads.roads[1].segments[0].vertices,
            vec![VertexID(2), VertexID(5), VertexID(3), VertexID(6), VertexID(4)]
        );
    }

    #[test]
    fn test_nearby_vertices_are_shared() {
        // Each road has its own vertex within the threshold of the crossing, at different spots
        let mut roads = RoadSet::new(vec![
            road("A", vec![vec![(0.0, 0.0), (1.0, 5e-8), (2.0, 0.0)]]),
            road("B", vec![vec![(1.0, -1.0), (1.0 + 5e-8, 0.0), (1.0, 2.0)]]),
        ])
        .unwrap();
        assert!(!ConnectivityMatrix::from_road_set(&roads).is_connected(0, 1));

        let inserted = insert_crossings(&mut roads, EPSILON_DIST, &mut Timer::throwaway());
        assert_eq!(inserted, 0);
        assert!(ConnectivityMatrix::from_road_set(&roads).is_connected(0, 1));
        // A's vertex is shared with B; A itself is untouched
        assert_eq!(
            roads.roads[0].segments[0].vertices,
            vec![VertexID(0), VertexID(1), VertexID(2)]
        );
        assert_eq!(
            roads.roads[1].segments[0].vertices,
            vec![VertexID(3), VertexID(1), VertexID(4), VertexID(5)]
        );

        let before = roads.clone();
        assert_eq!(
            insert_crossings(&mut roads, EPSILON_DIST, &mut Timer::throwaway()),
            0
        );
        assert_eq!(roads, before);
    }

    #[test]
    fn test_crossings_along_grown_segment() {
        let mut roads = RoadSet::new(vec![
            road("A", vec![vec![(0.0, 0.0), (10.0, 0.0)]]),
            road("B", vec![vec![(5.0, 1.0), (5.0, 5.0)]]),
        ])
        .unwrap();
        assert_eq!(
            insert_crossings(&mut roads, EPSILON_DIST, &mut Timer::throwaway()),
            0
        );

        // Extend B down past A
        let id = roads.alloc_vertex(Pt2D::new(5.0, -5.0));
        roads.roads[1].segments[0].vertices.insert(0, id);
        let seg = SegmentRef {
            road: 1,
            segment: 0,
        };
        assert_eq!(insert_crossings_along(&mut roads, &[seg], EPSILON_DIST), 1);
        assert_eq!(
            roads.roads[0].segments[0].vertices,
            vec![VertexID(0), VertexID(5), VertexID(1)]
        );
        assert_eq!(
            roads.roads[1].segments[0].vertices,
            vec![VertexID(4), VertexID(5), VertexID(2), VertexID(3)]
        );
    }

    #[test]
    fn test_overlap_is_skipped() {
        let mut roads = RoadSet::new(vec![
            road("A", vec![vec![(0.0, 0.0), (2.0, 0.0)]]),
            road("B", vec![vec![(1.0, 0.0), (5.0, 0.0)]]),
        ])
        .unwrap();
        let before = roads.clone();
        let inserted = insert_crossings(&mut roads, EPSILON_DIST, &mut Timer::throwaway());
        assert_eq!(inserted, 0);
        assert_eq!(roads, before);
    }

    #[test]
    fn test_only_other_roads() {
        // Two segments of the same road crossing each other stay untouched
        let mut roads = RoadSet::new(vec![road(
            "A",
            vec![
                vec![(0.0, 0.0), (2.0, 0.0)],
                vec![(1.0, -1.0), (1.0, 2.0)],
            ],
        )])
        .unwrap();
        let inserted = insert_crossings(&mut roads, EPSILON_DIST, &mut Timer::throwaway());
        assert_eq!(inserted, 0);
    }
}
