use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use serde::{Deserialize, Serialize};

use crate::{Distance, Pt2D};

/// A line segment between two points.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Line(Pt2D, Pt2D);

/// How two line segments touch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LineCrossing {
    /// The segments meet at exactly one point, possibly an endpoint of either.
    Point(Pt2D),
    /// The segments are collinear and share a stretch of positive length.
    Overlap(Pt2D, Pt2D),
}

impl Line {
    pub fn new(pt1: Pt2D, pt2: Pt2D) -> Line {
        Line(pt1, pt2)
    }

    /// The shortest distance from `pt` to any point on this segment.
    pub fn dist_to_pt(&self, pt: Pt2D) -> Distance {
        let dx = self.1.x() - self.0.x();
        let dy = self.1.y() - self.0.y();
        let len_squared = dx * dx + dy * dy;
        if len_squared == 0.0 {
            return self.0.dist_to(pt);
        }
        let t = (((pt.x() - self.0.x()) * dx + (pt.y() - self.0.y()) * dy) / len_squared)
            .clamp(0.0, 1.0);
        Pt2D::new(self.0.x() + t * dx, self.0.y() + t * dy).dist_to(pt)
    }

    /// Calculates where two segments meet, if at all. Robust against nearly parallel lines and
    /// touching endpoints; `geo` does the heavy lifting.
    pub fn crossing(&self, other: &Line) -> Option<LineCrossing> {
        match line_intersection(self.to_geo(), other.to_geo())? {
            LineIntersection::SinglePoint { intersection, .. } => Some(LineCrossing::Point(
                Pt2D::new(intersection.x, intersection.y),
            )),
            LineIntersection::Collinear { intersection } => {
                let pt1 = Pt2D::new(intersection.start.x, intersection.start.y);
                let pt2 = Pt2D::new(intersection.end.x, intersection.end.y);
                if pt1 == pt2 {
                    Some(LineCrossing::Point(pt1))
                } else {
                    Some(LineCrossing::Overlap(pt1, pt2))
                }
            }
        }
    }

    fn to_geo(self) -> geo::Line<f64> {
        geo::Line::new(self.0.to_coord(), self.1.to_coord())
    }
}
