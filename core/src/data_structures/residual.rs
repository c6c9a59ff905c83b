//! Residual network with a parallel flow ledger
//!
//! The network owns every piece of mutable solver state: residual capacity
//! per ordered pair, net flow per ordered pair, traversal adjacency and the
//! set of edges the caller added explicitly. Lookups for pairs that were never
//! touched return zero, so reverse residual arcs need no separate allocation.
//!
//! # Invariants
//! - `capacity(u, v) >= 0` for every pair at every point in time
//! - `flow(u, v) == -flow(v, u)` for every touched pair
//! - `capacity(u, v) + flow(u, v)` equals the capacity the caller assigned
//!   to `(u, v)` (zero for pairs that are not original edges)
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::algorithm::graph::max_flow::{FlowError, FlowResult};
use crate::algorithm::traits::{Capacity, Flow, NodeId};

/// Directed capacitated graph in residual form
#[derive(Debug, Clone, Default)]
pub struct ResidualNetwork {
    /// Number of vertices, fixed at construction
    vertex_count: usize,
    /// Residual capacity of each touched ordered pair
    capacity: HashMap<(NodeId, NodeId), Capacity>,
    /// Net flow of each touched ordered pair
    flow: HashMap<(NodeId, NodeId), Flow>,
    /// Forward and reverse neighbours, in insertion order
    adjacency: Vec<Vec<NodeId>>,
    /// Caller-added edges, in insertion order
    original_edges: Vec<(NodeId, NodeId)>,
    /// Membership index over `original_edges`
    original_index: HashSet<(NodeId, NodeId)>,
}

impl ResidualNetwork {
    /// Create an empty network over `vertex_count` vertices
    pub fn new(vertex_count: usize) -> Self {
        Self {
            vertex_count,
            capacity: HashMap::new(),
            flow: HashMap::new(),
            adjacency: vec![Vec::new(); vertex_count],
            original_edges: Vec::new(),
            original_index: HashSet::new(),
        }
    }

    /// Build a network from `(u, v, capacity)` triples, failing on the first invalid edge
    pub fn from_edges<I>(vertex_count: usize, edges: I) -> FlowResult<Self>
    where
        I: IntoIterator<Item = (NodeId, NodeId, Capacity)>,
    {
        let mut network = Self::new(vertex_count);
        for (from, to, capacity) in edges {
            network.add_edge(from, to, capacity)?;
        }
        debug!(
            "Built residual network: {} vertices, {} edges",
            network.vertex_count,
            network.original_edges.len()
        );
        Ok(network)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of distinct caller-added edges
    pub fn edge_count(&self) -> usize {
        self.original_edges.len()
    }

    /// Add or overwrite the edge `from -> to`.
    ///
    /// Re-adding an existing ordered pair replaces its capacity instead of
    /// summing it. The reverse residual arc is left untouched, so a fresh
    /// edge starts with zero reverse capacity.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, capacity: Capacity) -> FlowResult<()> {
        self.check_vertex(from)?;
        self.check_vertex(to)?;
        if capacity < 0 {
            return Err(FlowError::NegativeCapacity { from, to, capacity });
        }

        self.capacity.insert((from, to), capacity);
        if self.original_index.insert((from, to)) {
            self.original_edges.push((from, to));
        }
        self.link(from, to);
        self.link(to, from);
        Ok(())
    }

    /// Residual capacity of the arc `from -> to`, zero if never touched
    pub fn capacity(&self, from: NodeId, to: NodeId) -> Capacity {
        self.capacity.get(&(from, to)).copied().unwrap_or(0)
    }

    /// Net flow on the arc `from -> to`, zero if never touched
    pub fn flow(&self, from: NodeId, to: NodeId) -> Flow {
        self.flow.get(&(from, to)).copied().unwrap_or(0)
    }

    /// Capacity assigned by the caller, recovered from the residual state
    pub fn original_capacity(&self, from: NodeId, to: NodeId) -> Capacity {
        self.capacity(from, to) + self.flow(from, to)
    }

    /// Neighbours reachable by a forward or reverse residual arc
    pub fn neighbors(&self, vertex: NodeId) -> &[NodeId] {
        self.adjacency
            .get(vertex)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Caller-added edges in insertion order
    pub fn original_edges(&self) -> &[(NodeId, NodeId)] {
        &self.original_edges
    }

    pub fn is_original_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.original_index.contains(&(from, to))
    }

    /// Every pair with a recorded residual capacity
    pub fn residual_arcs(&self) -> impl Iterator<Item = ((NodeId, NodeId), Capacity)> + '_ {
        self.capacity.iter().map(|(&pair, &capacity)| (pair, capacity))
    }

    /// Every pair that has carried flow at some point
    pub fn flow_arcs(&self) -> impl Iterator<Item = ((NodeId, NodeId), Flow)> + '_ {
        self.flow.iter().map(|(&pair, &flow)| (pair, flow))
    }

    /// Net flow leaving `vertex`
    pub fn net_outflow(&self, vertex: NodeId) -> Flow {
        self.flow
            .iter()
            .filter(|((from, _), _)| *from == vertex)
            .map(|(_, &flow)| flow)
            .sum()
    }

    /// Fail with `InvalidVertexIndex` unless `vertex < vertex_count`
    pub fn check_vertex(&self, vertex: NodeId) -> FlowResult<()> {
        if vertex < self.vertex_count {
            Ok(())
        } else {
            Err(FlowError::InvalidVertexIndex {
                vertex,
                vertex_count: self.vertex_count,
            })
        }
    }

    /// Push `amount` units along consecutive arcs of `path`.
    ///
    /// All arithmetic is checked before the first arc is touched, so an
    /// overflow leaves the network unchanged.
    pub(crate) fn push_along(&mut self, path: &[NodeId], amount: Capacity) -> FlowResult<()> {
        for arc in path.windows(2) {
            let (from, to) = (arc[0], arc[1]);
            self.capacity(to, from)
                .checked_add(amount)
                .ok_or(FlowError::CapacityOverflow)?;
            self.flow(from, to)
                .checked_add(amount)
                .ok_or(FlowError::CapacityOverflow)?;
            debug_assert!(self.capacity(from, to) >= amount);
        }

        for arc in path.windows(2) {
            let (from, to) = (arc[0], arc[1]);
            *self.capacity.entry((from, to)).or_insert(0) -= amount;
            *self.capacity.entry((to, from)).or_insert(0) += amount;
            *self.flow.entry((from, to)).or_insert(0) += amount;
            *self.flow.entry((to, from)).or_insert(0) -= amount;
        }
        Ok(())
    }

    fn link(&mut self, from: NodeId, to: NodeId) {
        let neighbours = &mut self.adjacency[from];
        if !neighbours.contains(&to) {
            neighbours.push(to);
        }
    }
}
