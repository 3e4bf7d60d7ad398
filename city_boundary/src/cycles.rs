use petgraph::graphmap::UnGraphMap;
use petgraph::visit::{depth_first_search, DfsEvent};

use abstutil::wraparound_get;

use crate::ConnectivityMatrix;

/// Finds the fundamental cycles of the road graph, using one depth-first spanning tree per
/// connected component. Every non-tree edge closes exactly one cycle: the tree path between its
/// endpoints, plus the edge itself. Each cycle is listed from the ancestor down to the descendant.
///
/// Roads are visited in index order and neighbors in ascending order, so the result is
/// deterministic. A depth-first tree (rather than breadth-first) tends to produce long cycles; in
/// a complete graph, the tree is a path through every road.
pub fn fundamental_cycles(matrix: &ConnectivityMatrix) -> Vec<Vec<usize>> {
    let mut graph: UnGraphMap<usize, ()> = UnGraphMap::new();
    for r in 0..matrix.num_roads() {
        graph.add_node(r);
    }
    for (r1, r2) in matrix.edges() {
        graph.add_edge(r1, r2, ());
    }

    let mut parent: Vec<Option<usize>> = vec![None; matrix.num_roads()];
    let mut cycles = Vec::new();
    depth_first_search(&graph, graph.nodes(), |event| match event {
        DfsEvent::TreeEdge(u, v) => {
            parent[v] = Some(u);
        }
        // In an undirected graph, the tree edge back to the parent also shows up here
        DfsEvent::BackEdge(u, ancestor) if parent[u] != Some(ancestor) => {
            let mut cycle = vec![u];
            let mut current = u;
            while current != ancestor {
                // The ancestor is still being explored, so it's on the tree path from u
                current = parent[current].unwrap();
                cycle.push(current);
            }
            cycle.reverse();
            cycles.push(cycle);
        }
        _ => {}
    });
    cycles
}

/// The longest fundamental cycle, measured in roads. Ties go to the first one found.
///
/// Some degenerate cases also count:
/// - A single road is trivially a cycle by itself.
/// - If there are no real cycles, but two roads are connected, it's possible to go out along one
///   and come back along the other. That's a cycle of 2 roads.
///
/// Returns `None` when nothing is connected at all.
pub fn longest_cycle(matrix: &ConnectivityMatrix) -> Option<Vec<usize>> {
    if matrix.num_roads() == 1 {
        return Some(vec![0]);
    }

    let mut best: Option<Vec<usize>> = None;
    for cycle in fundamental_cycles(matrix) {
        if best.as_ref().map(|b| cycle.len() > b.len()).unwrap_or(true) {
            best = Some(cycle);
        }
    }
    if best.is_none() {
        if let Some((r1, r2)) = matrix.edges().into_iter().next() {
            return Some(vec![r1, r2]);
        }
    }
    best
}

/// The length of the longest cycle, or 0 if there isn't one.
pub fn longest_cycle_len(matrix: &ConnectivityMatrix) -> usize {
    longest_cycle(matrix).map(|c| c.len()).unwrap_or(0)
}

/// Checks that every consecutive pair of roads in the cycle (wrapping around at the end) is
/// connected.
pub fn is_valid_cycle(matrix: &ConnectivityMatrix, cycle: &[usize]) -> bool {
    if cycle.len() < 2 {
        return true;
    }
    (0..cycle.len()).all(|idx| {
        let r1 = cycle[idx];
        let r2 = *wraparound_get(cycle, idx as isize + 1);
        r1 == r2 || matrix.is_connected(r1, r2)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(num_roads: usize, edges: Vec<(usize, usize)>) -> ConnectivityMatrix {
        let mut m = ConnectivityMatrix::new(num_roads);
        for (r1, r2) in edges {
            m.connect(r1, r2);
        }
        m
    }

    fn complete(num_roads: usize) -> ConnectivityMatrix {
        let mut m = ConnectivityMatrix::new(num_roads);
        for (r1, r2) in m.missing_edges() {
            m.connect(r1, r2);
        }
        m
    }

    #[test]
    fn test_complete_graphs_span_everything() {
        for n in 3..8 {
            let m = complete(n);
            let cycle = longest_cycle(&m).unwrap();
            assert_eq!(cycle.len(), n);
            assert!(is_valid_cycle(&m, &cycle));
        }
    }

    #[test]
    fn test_fundamental_cycles_of_k4() {
        assert_eq!(
            fundamental_cycles(&complete(4)),
            vec![vec![0, 1, 2], vec![0, 1, 2, 3], vec![1, 2, 3]]
        );
    }

    #[test]
    fn test_degenerate_cases() {
        assert_eq!(longest_cycle(&matrix(1, Vec::new())), Some(vec![0]));
        assert_eq!(longest_cycle(&matrix(3, Vec::new())), None);
        assert_eq!(longest_cycle_len(&matrix(3, Vec::new())), 0);
        // A path has no cycle, but out-and-back along two roads counts
        assert_eq!(
            longest_cycle(&matrix(3, vec![(1, 2), (0, 1)])),
            Some(vec![0, 1])
        );
    }

    #[test]
    fn test_components() {
        // A triangle and a square, not touching each other
        let m = matrix(
            7,
            vec![(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (5, 6), (3, 6)],
        );
        assert_eq!(fundamental_cycles(&m).len(), 2);
        let cycle = longest_cycle(&m).unwrap();
        assert_eq!(cycle, vec![3, 4, 5, 6]);
        assert!(is_valid_cycle(&m, &cycle));
    }

    #[test]
    fn test_pendant_road_is_excluded() {
        // Road 3 only touches road 0
        let m = matrix(4, vec![(0, 1), (1, 2), (0, 2), (0, 3)]);
        assert_eq!(longest_cycle_len(&m), 3);
        assert!(!is_valid_cycle(&m, &[0, 1, 2, 3]));
    }
}
