//! Minimum cut extraction from a saturated residual network
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::{BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{Capacity, NodeId};
use crate::data_structures::residual::ResidualNetwork;

/// Original edge crossing from the source side to the sink side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub capacity: Capacity,
}

/// Source/sink partition and the edges it severs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinCut {
    /// Vertices reachable from the source in the residual graph
    pub source_side: BTreeSet<NodeId>,
    /// Original edges leaving `source_side`, ordered by `(from, to)`
    pub cut_edges: Vec<CutEdge>,
    /// Sum of the original capacities of `cut_edges`
    pub capacity: Capacity,
}

impl MinCut {
    pub fn contains(&self, vertex: NodeId) -> bool {
        self.source_side.contains(&vertex)
    }

    pub fn is_cut_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.cut_edges
            .iter()
            .any(|edge| edge.from == from && edge.to == to)
    }

    /// Keep only vertices below `vertex_limit` and edges between them
    pub fn restricted_to(&self, vertex_limit: usize) -> MinCut {
        let source_side = self
            .source_side
            .iter()
            .copied()
            .filter(|&vertex| vertex < vertex_limit)
            .collect();
        let cut_edges: Vec<CutEdge> = self
            .cut_edges
            .iter()
            .copied()
            .filter(|edge| edge.from < vertex_limit && edge.to < vertex_limit)
            .collect();
        let capacity = cut_edges.iter().map(|edge| edge.capacity).sum();
        MinCut {
            source_side,
            cut_edges,
            capacity,
        }
    }
}

/// Compute the cut induced by residual reachability from `source`.
///
/// Meaningful once `network` has been solved: the returned capacity then
/// equals the flow leaving `source`.
pub fn min_cut(network: &ResidualNetwork, source: NodeId) -> MinCut {
    let mut source_side = BTreeSet::new();
    if source >= network.vertex_count() {
        return MinCut::default();
    }

    let mut queue = VecDeque::from([source]);
    source_side.insert(source);
    while let Some(current) = queue.pop_front() {
        for &next in network.neighbors(current) {
            if network.capacity(current, next) > 0 && source_side.insert(next) {
                queue.push_back(next);
            }
        }
    }

    let mut cut_edges: Vec<CutEdge> = network
        .original_edges()
        .iter()
        .filter(|(from, to)| source_side.contains(from) && !source_side.contains(to))
        .map(|&(from, to)| CutEdge {
            from,
            to,
            capacity: network.original_capacity(from, to),
        })
        .collect();
    cut_edges.sort_by_key(|edge| (edge.from, edge.to));
    let capacity = cut_edges.iter().map(|edge| edge.capacity).sum();

    MinCut {
        source_side,
        cut_edges,
        capacity,
    }
}
