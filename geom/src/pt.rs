use std::fmt;

use ordered_float::NotNan;
use serde::{Deserialize, Serialize};

use crate::Distance;

/// A point in the plane. This isn't opinionated about what the (x, y) represents.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pt2D {
    x: f64,
    y: f64,
}

impl Pt2D {
    pub fn new(x: f64, y: f64) -> Pt2D {
        if !x.is_finite() || !y.is_finite() {
            panic!("Bad Pt2D {}, {}", x, y);
        }

        Pt2D { x, y }
    }

    /// Like `new`, but for untrusted input.
    pub fn maybe_new(x: f64, y: f64) -> Option<Pt2D> {
        if x.is_finite() && y.is_finite() {
            Some(Pt2D { x, y })
        } else {
            None
        }
    }

    pub fn x(self) -> f64 {
        self.x
    }

    pub fn y(self) -> f64 {
        self.y
    }

    pub fn raw_dist_to(self, to: Pt2D) -> f64 {
        ((self.x - to.x).powi(2) + (self.y - to.y).powi(2)).sqrt()
    }

    pub fn dist_to(self, to: Pt2D) -> Distance {
        Distance::meters(self.raw_dist_to(to))
    }

    /// True if the points are within `threshold` of each other.
    pub fn approx_eq(self, other: Pt2D, threshold: Distance) -> bool {
        self.dist_to(other) <= threshold
    }

    pub fn to_hashable(self) -> HashablePt2D {
        HashablePt2D::from(self)
    }

    pub(crate) fn to_coord(self) -> (f64, f64) {
        (self.x, self.y)
    }
}

impl fmt::Display for Pt2D {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Pt2D({0}, {1})", self.x(), self.y())
    }
}

/// An exact, hashable version of `Pt2D`. Two points only match if their coordinates are
/// bit-for-bit identical.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct HashablePt2D {
    x_nan: NotNan<f64>,
    y_nan: NotNan<f64>,
}

impl From<Pt2D> for HashablePt2D {
    fn from(pt: Pt2D) -> Self {
        // Pt2D is always finite
        HashablePt2D {
            x_nan: NotNan::new(pt.x()).unwrap(),
            y_nan: NotNan::new(pt.y()).unwrap(),
        }
    }
}
