use std::collections::{BTreeSet, HashMap};
use std::fmt;

use geom::HashablePt2D;

use crate::RoadSet;

/// Which roads touch which. Symmetric; the diagonal is never set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectivityMatrix {
    num_roads: usize,
    cells: Vec<bool>,
}

impl ConnectivityMatrix {
    pub fn new(num_roads: usize) -> ConnectivityMatrix {
        ConnectivityMatrix {
            num_roads,
            cells: vec![false; num_roads * num_roads],
        }
    }

    /// Two roads are connected if any vertex position appears in both. Since crossings share one
    /// vertex, this also catches different vertices that happen to sit at the exact same spot.
    pub fn from_road_set(roads: &RoadSet) -> ConnectivityMatrix {
        let mut roads_per_pt: HashMap<HashablePt2D, BTreeSet<usize>> = HashMap::new();
        for (idx, road) in roads.roads.iter().enumerate() {
            for segment in &road.segments {
                for id in &segment.vertices {
                    roads_per_pt
                        .entry(roads.pt(*id).to_hashable())
                        .or_insert_with(BTreeSet::new)
                        .insert(idx);
                }
            }
        }

        let mut matrix = ConnectivityMatrix::new(roads.roads.len());
        for touching in roads_per_pt.into_values() {
            let touching: Vec<usize> = touching.into_iter().collect();
            for (i, r1) in touching.iter().enumerate() {
                for r2 in touching.iter().skip(i + 1) {
                    matrix.connect(*r1, *r2);
                }
            }
        }
        matrix
    }

    pub fn num_roads(&self) -> usize {
        self.num_roads
    }

    pub fn is_connected(&self, r1: usize, r2: usize) -> bool {
        self.cells[r1 * self.num_roads + r2]
    }

    pub fn connect(&mut self, r1: usize, r2: usize) {
        assert_ne!(r1, r2, "Can't connect road {} to itself", r1);
        self.cells[r1 * self.num_roads + r2] = true;
        self.cells[r2 * self.num_roads + r1] = true;
    }

    /// Keeps every connection, and adds the ones from `other`. Both must cover the same roads.
    pub fn absorb(&mut self, other: &ConnectivityMatrix) {
        assert_eq!(self.num_roads, other.num_roads);
        for (cell, connected) in self.cells.iter_mut().zip(&other.cells) {
            *cell |= *connected;
        }
    }

    /// All connected pairs (i, j) with i < j, in row-major order.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        self.upper_triangle()
            .filter(|(i, j)| self.is_connected(*i, *j))
            .collect()
    }

    /// All unconnected pairs (i, j) with i < j, in row-major order.
    pub fn missing_edges(&self) -> Vec<(usize, usize)> {
        self.upper_triangle()
            .filter(|(i, j)| !self.is_connected(*i, *j))
            .collect()
    }

    fn upper_triangle(&self) -> impl Iterator<Item = (usize, usize)> {
        let n = self.num_roads;
        (0..n).flat_map(move |i| ((i + 1)..n).map(move |j| (i, j)))
    }
}

impl fmt::Display for ConnectivityMatrix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for i in 0..self.num_roads {
            for j in 0..self.num_roads {
                let cell = if i == j {
                    '\\'
                } else if self.is_connected(i, j) {
                    'X'
                } else {
                    '.'
                };
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geom::Pt2D;

    #[test]
    fn test_shared_points() {
        let pt = |x, y| Pt2D::new(x, y);
        let roads = RoadSet::new(vec![
            ("A".to_string(), vec![vec![pt(0.0, 0.0), pt(1.0, 0.0)]]),
            // Shares (1, 0) with A
            ("B".to_string(), vec![vec![pt(1.0, 0.0), pt(1.0, 1.0)]]),
            // Shares (1, 1) with B in its second segment
            (
                "C".to_string(),
                vec![
                    vec![pt(5.0, 5.0), pt(6.0, 6.0)],
                    vec![pt(1.0, 1.0), pt(0.0, 1.0)],
                ],
            ),
            ("D".to_string(), vec![vec![pt(9.0, 9.0), pt(9.0, 8.0)]]),
        ])
        .unwrap();
        let matrix = ConnectivityMatrix::from_road_set(&roads);
        assert_eq!(matrix.edges(), vec![(0, 1), (1, 2)]);
        assert!(matrix.is_connected(1, 0));
        assert!(!matrix.is_connected(0, 2));
        assert_eq!(
            matrix.missing_edges(),
            vec![(0, 2), (0, 3), (1, 3), (2, 3)]
        );
        assert_eq!(matrix.to_string(), "\\X..\nX\\X.\n.X\\.\n...\\\n");
    }

    #[test]
    fn test_absorb() {
        let mut matrix = ConnectivityMatrix::new(3);
        matrix.connect(0, 1);
        let mut other = ConnectivityMatrix::new(3);
        other.connect(1, 2);
        matrix.absorb(&other);
        assert_eq!(matrix.edges(), vec![(0, 1), (1, 2)]);
    }
}
