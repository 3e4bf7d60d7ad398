use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::{Distance, Line, LineCrossing, Pt2D};

/// An open, ordered sequence of at least two points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolyLine {
    pts: Vec<Pt2D>,
}

/// How one polyline meets another. Everything is judged from the point of view of the first
/// polyline's vertices.
#[derive(Clone, Debug, PartialEq)]
pub enum Crossing {
    None,
    /// The polylines meet at these points, and every one of them is already a vertex of the first
    /// polyline.
    AtVertex(Vec<Pt2D>),
    /// The polylines meet at these points, and at least one of them isn't a vertex of the first
    /// polyline yet.
    NotAtVertex(Vec<Pt2D>),
    /// Some lines of the two polylines are collinear and overlap. The intersection isn't a set of
    /// points, so there's nothing sensible to insert.
    Overlapping,
}

impl PolyLine {
    pub fn new(pts: Vec<Pt2D>) -> Result<PolyLine> {
        if pts.len() < 2 {
            bail!("Need at least two points for a PolyLine, got {}", pts.len());
        }
        Ok(PolyLine { pts })
    }

    pub fn must_new(pts: Vec<Pt2D>) -> PolyLine {
        PolyLine::new(pts).unwrap()
    }

    pub fn points(&self) -> &Vec<Pt2D> {
        &self.pts
    }

    pub fn into_points(self) -> Vec<Pt2D> {
        self.pts
    }

    pub fn lines(&self) -> impl Iterator<Item = Line> + '_ {
        self.pts.windows(2).map(|pair| Line::new(pair[0], pair[1]))
    }

    /// Returns the index and distance of the vertex closest to `pt`. The first one wins ties.
    pub fn nearest_vertex(&self, pt: Pt2D) -> (usize, Distance) {
        let mut best = (0, self.pts[0].dist_to(pt));
        for (idx, vertex) in self.pts.iter().enumerate().skip(1) {
            let dist = vertex.dist_to(pt);
            if dist < best.1 {
                best = (idx, dist);
            }
        }
        best
    }

    /// Does this polyline have a vertex within `threshold` of `pt`?
    pub fn has_vertex(&self, pt: Pt2D, threshold: Distance) -> bool {
        self.nearest_vertex(pt).1 <= threshold
    }

    /// Where should `pt` be spliced into this polyline? The result is an index into `points()`;
    /// inserting there shifts everything from that index onwards. Nothing is re-sorted, so
    /// existing vertices keep their relative order.
    ///
    /// The primary rule: if `pt` lies on one of the lines (within `threshold`), it goes between
    /// that line's endpoints. Crossing points always satisfy this.
    ///
    /// Points off every line use the nearest vertex instead: if `pt` is closer to the previous
    /// vertex than the nearest vertex is, it belongs before the nearest vertex; otherwise after.
    /// At the ends, the single neighbor decides between going just inside the end or extending
    /// past it.
    pub fn insertion_index(&self, pt: Pt2D, threshold: Distance) -> usize {
        if let Some(idx) = self.lines().position(|l| l.dist_to_pt(pt) <= threshold) {
            return idx + 1;
        }
        self.nearest_insertion_index(pt)
    }

    fn nearest_insertion_index(&self, pt: Pt2D) -> usize {
        let (nearest, _) = self.nearest_vertex(pt);
        let last = self.pts.len() - 1;
        let closer_than_nearest = |neighbor: usize| {
            pt.dist_to(self.pts[neighbor]) < self.pts[nearest].dist_to(self.pts[neighbor])
        };

        if nearest == 0 {
            if closer_than_nearest(1) {
                1
            } else {
                0
            }
        } else if nearest == last {
            if closer_than_nearest(last - 1) {
                last
            } else {
                last + 1
            }
        } else if closer_than_nearest(nearest - 1) {
            nearest
        } else {
            nearest + 1
        }
    }

    /// Intersects every line of this polyline against every line of `other`. Crossing points are
    /// deduplicated using `threshold`, and reported in the order they're found along `self`.
    pub fn crossing(&self, other: &PolyLine, threshold: Distance) -> Crossing {
        let mut hits: Vec<Pt2D> = Vec::new();
        for l1 in self.lines() {
            for l2 in other.lines() {
                match l1.crossing(&l2) {
                    Some(LineCrossing::Point(pt)) => {
                        if !hits.iter().any(|x| x.approx_eq(pt, threshold)) {
                            hits.push(pt);
                        }
                    }
                    Some(LineCrossing::Overlap(_, _)) => {
                        return Crossing::Overlapping;
                    }
                    None => {}
                }
            }
        }
        if hits.is_empty() {
            return Crossing::None;
        }

        if hits.iter().all(|pt| self.has_vertex(*pt, threshold)) {
            Crossing::AtVertex(hits)
        } else {
            Crossing::NotAtVertex(hits)
        }
    }
}

impl fmt::Display for PolyLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "PolyLine::new(vec![")?;
        for pt in &self.pts {
            writeln!(f, "  Pt2D::new({}, {}),", pt.x(), pt.y())?;
        }
        write!(f, "])")
    }
}
