use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use geom::{Distance, PolyLine, Pt2D};

/// Identifies one vertex across the entire `RoadSet`. IDs are handed out in increasing order and
/// never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexID(pub usize);

impl fmt::Display for VertexID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Vertex #{}", self.0)
    }
}

/// Owns the position of every vertex, and allocates new ones. Roads and segments only refer to
/// vertices by ID, so the same vertex can appear in many roads.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VertexArena {
    pts: Vec<Pt2D>,
}

impl VertexArena {
    pub fn new() -> VertexArena {
        VertexArena::default()
    }

    /// Always returns an ID greater than any returned before.
    pub fn alloc(&mut self, pt: Pt2D) -> VertexID {
        self.pts.push(pt);
        VertexID(self.pts.len() - 1)
    }

    pub fn get(&self, id: VertexID) -> Pt2D {
        self.pts[id.0]
    }

    pub fn contains(&self, id: VertexID) -> bool {
        id.0 < self.pts.len()
    }

    /// How many vertices have been allocated so far. This is also the next ID to be handed out.
    pub fn len(&self) -> usize {
        self.pts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pts.is_empty()
    }
}

/// One contiguous polyline within a road.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub vertices: Vec<VertexID>,
}

/// A named road, made of segments that might not touch each other.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Road {
    pub name: String,
    pub segments: Vec<Segment>,
}

/// Addresses one segment of one road.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct SegmentRef {
    pub road: usize,
    pub segment: usize,
}

/// Every road being stitched into a boundary, plus the vertices they share. The order of roads
/// matters; road indices are how everything else refers to roads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoadSet {
    pub roads: Vec<Road>,
    vertices: VertexArena,
}

impl RoadSet {
    /// Builds from named roads, each a list of segments, each a list of points. Vertex IDs are
    /// assigned in input order.
    pub fn new(input: Vec<(String, Vec<Vec<Pt2D>>)>) -> Result<RoadSet> {
        let mut vertices = VertexArena::new();
        let mut roads = Vec::new();
        for (name, raw_segments) in input {
            let segments = raw_segments
                .into_iter()
                .map(|pts| Segment {
                    vertices: pts.into_iter().map(|pt| vertices.alloc(pt)).collect(),
                })
                .collect();
            roads.push(Road { name, segments });
        }
        let road_set = RoadSet { roads, vertices };
        road_set.validate()?;
        Ok(road_set)
    }

    /// Catches anything the algorithms can't handle. Deserialized input should be checked with
    /// this too.
    pub fn validate(&self) -> Result<()> {
        if self.roads.is_empty() {
            bail!("No roads");
        }
        for (idx, road) in self.roads.iter().enumerate() {
            if road.segments.is_empty() {
                bail!("Road {} ({}) has no segments", idx, road.name);
            }
            for (seg_idx, segment) in road.segments.iter().enumerate() {
                if segment.vertices.len() < 2 {
                    bail!(
                        "Segment {} of road {} ({}) has {} vertices; need at least 2",
                        seg_idx,
                        idx,
                        road.name,
                        segment.vertices.len()
                    );
                }
                for id in &segment.vertices {
                    if !self.vertices.contains(*id) {
                        bail!("Road {} ({}) refers to unknown {}", idx, road.name, id);
                    }
                    let pt = self.vertices.get(*id);
                    if Pt2D::maybe_new(pt.x(), pt.y()).is_none() {
                        bail!("Road {} ({}) has a non-finite point at {}", idx, road.name, id);
                    }
                }
            }
        }
        Ok(())
    }

    pub fn vertices(&self) -> &VertexArena {
        &self.vertices
    }

    pub fn pt(&self, id: VertexID) -> Pt2D {
        self.vertices.get(id)
    }

    pub fn alloc_vertex(&mut self, pt: Pt2D) -> VertexID {
        self.vertices.alloc(pt)
    }

    pub fn segment(&self, seg: SegmentRef) -> &Segment {
        &self.roads[seg.road].segments[seg.segment]
    }

    /// The ordered coordinates of one segment. This is what external consumers trace boundaries
    /// with.
    pub fn segment_pts(&self, seg: SegmentRef) -> Vec<Pt2D> {
        self.segment(seg)
            .vertices
            .iter()
            .map(|id| self.pt(*id))
            .collect()
    }

    pub fn segment_polyline(&self, seg: SegmentRef) -> PolyLine {
        // Validated segments always have at least 2 vertices
        PolyLine::must_new(self.segment_pts(seg))
    }

    /// Every segment of every road, in order.
    pub fn all_segments(&self) -> Vec<SegmentRef> {
        let mut result = Vec::new();
        for (road, r) in self.roads.iter().enumerate() {
            for segment in 0..r.segments.len() {
                result.push(SegmentRef { road, segment });
            }
        }
        result
    }

    /// Every vertex of a road, in segment order, along with where it lives.
    pub fn road_vertices(&self, road: usize) -> Vec<(SegmentRef, usize, VertexID)> {
        let mut result = Vec::new();
        for (segment, s) in self.roads[road].segments.iter().enumerate() {
            for (idx, id) in s.vertices.iter().enumerate() {
                result.push((SegmentRef { road, segment }, idx, *id));
            }
        }
        result
    }

    /// Splices an existing vertex into a segment, keeping the segment's order. Returns false and
    /// does nothing if the segment already has a vertex within `threshold` of that point.
    pub fn splice_vertex(&mut self, seg: SegmentRef, id: VertexID, threshold: Distance) -> bool {
        let pt = self.pt(id);
        let pl = self.segment_polyline(seg);
        if pl.has_vertex(pt, threshold) {
            return false;
        }
        let idx = pl.insertion_index(pt, threshold);
        self.roads[seg.road].segments[seg.segment]
            .vertices
            .insert(idx, id);
        true
    }

    /// Splices an existing vertex into a segment even when the segment has a different vertex
    /// within `threshold`, so that both share a position exactly. Returns false and does nothing
    /// if the segment already has a vertex at exactly that position.
    pub fn merge_vertex(&mut self, seg: SegmentRef, id: VertexID, threshold: Distance) -> bool {
        let pt = self.pt(id);
        if self.segment(seg).vertices.iter().any(|v| self.pt(*v) == pt) {
            return false;
        }
        let idx = self.segment_polyline(seg).insertion_index(pt, threshold);
        self.roads[seg.road].segments[seg.segment]
            .vertices
            .insert(idx, id);
        true
    }

    /// Finds a vertex of the segment within `threshold` of `pt`.
    pub fn find_vertex(&self, seg: SegmentRef, pt: Pt2D, threshold: Distance) -> Option<VertexID> {
        let pl = self.segment_polyline(seg);
        let (idx, dist) = pl.nearest_vertex(pt);
        if dist <= threshold {
            Some(self.segment(seg).vertices[idx])
        } else {
            None
        }
    }
}
