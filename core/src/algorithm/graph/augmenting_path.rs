//! Breadth-first augmenting path search (Edmonds-Karp)
//!
//! Each queue entry carries the bottleneck of the path explored so far,
//! seeded with `Capacity::MAX` at the source. Since every real capacity is a
//! finite `i64`, the sentinel is never smaller than a path bottleneck.
//!
//! The search returns the first path that reaches the sink in BFS order, not
//! the path with the largest bottleneck. Neighbour order is the insertion
//! order of the residual network, which makes the chosen path deterministic.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::VecDeque;

use crate::algorithm::traits::{Capacity, NodeId};
use crate::data_structures::residual::ResidualNetwork;

/// A source-to-sink path with strictly positive residual capacity on every arc
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AugmentingPath {
    /// Minimum residual capacity along the path
    pub bottleneck: Capacity,
    /// Vertices from source to sink inclusive
    pub vertices: Vec<NodeId>,
}

impl AugmentingPath {
    /// Arcs of the path as `(from, to)` pairs
    pub fn arcs(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.vertices.windows(2).map(|arc| (arc[0], arc[1]))
    }

    pub fn len(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Reusable BFS state so repeated searches do not reallocate
#[derive(Debug, Default)]
pub struct AugmentingPathFinder {
    parent: Vec<Option<NodeId>>,
    visited: Vec<bool>,
    queue: VecDeque<(NodeId, Capacity)>,
    explored: usize,
}

impl AugmentingPathFinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vertices dequeued during the last search
    pub fn explored(&self) -> usize {
        self.explored
    }

    /// Parent of `vertex` recorded by the last search
    pub fn parent(&self, vertex: NodeId) -> Option<NodeId> {
        self.parent.get(vertex).copied().flatten()
    }

    /// Find the first augmenting path from `source` to `sink`.
    ///
    /// Returns `None` when the sink is unreachable through arcs with positive
    /// residual capacity, when either endpoint is out of range, and when
    /// `source == sink` (the sink is visited before any arc is examined).
    pub fn find(
        &mut self,
        network: &ResidualNetwork,
        source: NodeId,
        sink: NodeId,
    ) -> Option<AugmentingPath> {
        let vertex_count = network.vertex_count();
        self.explored = 0;
        if source >= vertex_count || sink >= vertex_count {
            return None;
        }

        self.parent.clear();
        self.parent.resize(vertex_count, None);
        self.visited.clear();
        self.visited.resize(vertex_count, false);
        self.queue.clear();

        self.visited[source] = true;
        self.queue.push_back((source, Capacity::MAX));

        while let Some((current, bottleneck)) = self.queue.pop_front() {
            self.explored += 1;

            for &next in network.neighbors(current) {
                let residual = network.capacity(current, next);
                if self.visited[next] || residual <= 0 {
                    continue;
                }

                self.parent[next] = Some(current);
                self.visited[next] = true;
                let narrowed = bottleneck.min(residual);

                if next == sink {
                    return Some(AugmentingPath {
                        bottleneck: narrowed,
                        vertices: self.trace_back(source, sink),
                    });
                }
                self.queue.push_back((next, narrowed));
            }
        }

        None
    }

    fn trace_back(&self, source: NodeId, sink: NodeId) -> Vec<NodeId> {
        let mut vertices = vec![sink];
        let mut current = sink;
        while current != source {
            match self.parent[current] {
                Some(previous) => {
                    vertices.push(previous);
                    current = previous;
                }
                None => break,
            }
        }
        vertices.reverse();
        vertices
    }
}

/// One-shot search without keeping the finder around
pub fn find_augmenting_path(
    network: &ResidualNetwork,
    source: NodeId,
    sink: NodeId,
) -> Option<AugmentingPath> {
    AugmentingPathFinder::new().find(network, source, sink)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> ResidualNetwork {
        ResidualNetwork::from_edges(4, [(0, 1, 3), (0, 2, 2), (1, 3, 2), (2, 3, 3)]).unwrap()
    }

    #[test]
    fn test_first_found_path_in_bfs_order() {
        let network = diamond();
        let path = find_augmenting_path(&network, 0, 3).unwrap();

        assert_eq!(path.vertices, vec![0, 1, 3]);
        assert_eq!(path.bottleneck, 2);
        assert_eq!(path.len(), 2);
        assert!(!path.is_empty());
        assert_eq!(path.arcs().collect::<Vec<_>>(), vec![(0, 1), (1, 3)]);
    }

    #[test]
    fn test_first_found_is_not_widest() {
        // 0 -> 1 -> 3 is found before the wider 0 -> 2 -> 3
        let network =
            ResidualNetwork::from_edges(4, [(0, 1, 1), (0, 2, 10), (1, 3, 1), (2, 3, 10)])
                .unwrap();
        let path = find_augmenting_path(&network, 0, 3).unwrap();

        assert_eq!(path.vertices, vec![0, 1, 3]);
        assert_eq!(path.bottleneck, 1);
    }

    #[test]
    fn test_zero_capacity_arc_is_not_traversed() {
        let network = ResidualNetwork::from_edges(3, [(0, 1, 0), (1, 2, 5)]).unwrap();
        let mut finder = AugmentingPathFinder::new();

        assert!(finder.find(&network, 0, 2).is_none());
        assert_eq!(finder.explored(), 1);
        assert_eq!(finder.parent(1), None);
    }

    #[test]
    fn test_reverse_arcs_are_not_forward_paths() {
        let network = ResidualNetwork::from_edges(2, [(1, 0, 5)]).unwrap();
        assert!(find_augmenting_path(&network, 0, 1).is_none());
    }

    #[test]
    fn test_degenerate_endpoints() {
        let network = diamond();
        assert!(find_augmenting_path(&network, 0, 0).is_none());
        assert!(find_augmenting_path(&network, 0, 9).is_none());
    }

    #[test]
    fn test_single_vertex_path_is_empty() {
        let path = AugmentingPath {
            bottleneck: Capacity::MAX,
            vertices: vec![0],
        };
        assert!(path.is_empty());
        assert_eq!(path.arcs().count(), 0);
    }

    #[test]
    fn test_finder_is_reusable() {
        let network = diamond();
        let mut finder = AugmentingPathFinder::new();

        let first = finder.find(&network, 0, 3).unwrap();
        let second = finder.find(&network, 0, 3).unwrap();
        assert_eq!(first, second);
        assert_eq!(finder.parent(3), Some(1));
    }
}
