//! Flow Correctness Verification
//!
//! Checks the invariants a solved residual network must satisfy and offers a
//! brute-force minimum cut for cross-checking solver results on small graphs.
//!
//! # Checked properties
//! - Antisymmetry: `flow(u, v) == -flow(v, u)` for every touched pair
//! - Capacity bounds: `capacity(u, v) >= 0` and `flow(u, v)` never exceeds the
//!   capacity the pair had before solving
//! - Residual symmetry: `capacity(u, v) + capacity(v, u)` is unchanged by solving
//! - Conservation: net outflow is zero at every vertex except source and sink
//! - Optimality: the residual cut reachable from the source has capacity equal
//!   to the flow value
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::HashMap;

use rayon::prelude::*;
use thiserror::Error;

use crate::algorithm::graph::min_cut::min_cut;
use crate::algorithm::traits::{Capacity, Flow, NodeId};
use crate::data_structures::residual::ResidualNetwork;

/// Largest vertex count accepted by [`brute_force_min_cut`]
pub const BRUTE_FORCE_VERTEX_LIMIT: usize = 16;

/// Invariant violations found in a residual network
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("flow({from}, {to}) = {forward} but flow({to}, {from}) = {backward}")]
    Antisymmetry {
        from: NodeId,
        to: NodeId,
        forward: Flow,
        backward: Flow,
    },

    #[error("residual capacity of {from} -> {to} is negative ({capacity})")]
    NegativeResidual {
        from: NodeId,
        to: NodeId,
        capacity: Capacity,
    },

    #[error("flow {flow} on {from} -> {to} exceeds capacity {capacity}")]
    CapacityExceeded {
        from: NodeId,
        to: NodeId,
        flow: Flow,
        capacity: Capacity,
    },

    #[error("residual capacities of {from} <-> {to} sum to {actual}, expected {expected}")]
    ResidualDrift {
        from: NodeId,
        to: NodeId,
        expected: Capacity,
        actual: Capacity,
    },

    #[error("vertex {vertex} has net outflow {imbalance}")]
    Conservation { vertex: NodeId, imbalance: Flow },

    #[error("flow value {flow} differs from residual cut capacity {cut}")]
    CutMismatch { flow: Flow, cut: Capacity },

    #[error("brute-force cut enumeration supports at most {limit} vertices, got {vertex_count}")]
    TooLarge { vertex_count: usize, limit: usize },

    #[error("vertex {vertex} is outside [0, {vertex_count})")]
    InvalidVertex { vertex: NodeId, vertex_count: usize },
}

/// Result type for verification operations
pub type VerificationResult<T> = Result<T, VerificationError>;

pub fn check_antisymmetry(network: &ResidualNetwork) -> VerificationResult<()> {
    for ((from, to), forward) in network.flow_arcs() {
        let backward = network.flow(to, from);
        if forward != -backward {
            return Err(VerificationError::Antisymmetry {
                from,
                to,
                forward,
                backward,
            });
        }
    }
    Ok(())
}

/// Compare a solved network against its state before solving
pub fn check_capacity_bounds(
    baseline: &ResidualNetwork,
    network: &ResidualNetwork,
) -> VerificationResult<()> {
    for ((from, to), capacity) in network.residual_arcs() {
        if capacity < 0 {
            return Err(VerificationError::NegativeResidual { from, to, capacity });
        }

        let expected = baseline.capacity(from, to) + baseline.capacity(to, from);
        let actual = capacity + network.capacity(to, from);
        if expected != actual {
            return Err(VerificationError::ResidualDrift {
                from,
                to,
                expected,
                actual,
            });
        }
    }

    for ((from, to), flow) in network.flow_arcs() {
        let added = flow - baseline.flow(from, to);
        let capacity = baseline.capacity(from, to);
        if added > capacity {
            return Err(VerificationError::CapacityExceeded {
                from,
                to,
                flow: added,
                capacity,
            });
        }
    }
    Ok(())
}

pub fn check_conservation(
    network: &ResidualNetwork,
    source: NodeId,
    sink: NodeId,
) -> VerificationResult<()> {
    let mut imbalance: HashMap<NodeId, Flow> = HashMap::new();
    for ((from, _), flow) in network.flow_arcs() {
        *imbalance.entry(from).or_insert(0) += flow;
    }

    let mut offenders: Vec<(NodeId, Flow)> = imbalance
        .into_iter()
        .filter(|&(vertex, net)| vertex != source && vertex != sink && net != 0)
        .collect();
    offenders.sort_unstable();
    match offenders.first() {
        Some(&(vertex, imbalance)) => Err(VerificationError::Conservation { vertex, imbalance }),
        None => Ok(()),
    }
}

/// Run every invariant check on a network solved from `baseline`
pub fn verify_solution(
    baseline: &ResidualNetwork,
    network: &ResidualNetwork,
    source: NodeId,
    sink: NodeId,
) -> VerificationResult<()> {
    check_antisymmetry(network)?;
    check_capacity_bounds(baseline, network)?;
    check_conservation(network, source, sink)?;

    let flow = network.net_outflow(source);
    let cut = min_cut(network, source).capacity;
    if flow != cut {
        return Err(VerificationError::CutMismatch { flow, cut });
    }
    Ok(())
}

/// Minimum `source`/`sink` cut capacity by exhaustive enumeration.
///
/// Later duplicates of an ordered pair overwrite earlier ones, matching
/// [`ResidualNetwork::add_edge`]. Partitions are enumerated in parallel.
pub fn brute_force_min_cut(
    vertex_count: usize,
    edges: &[(NodeId, NodeId, Capacity)],
    source: NodeId,
    sink: NodeId,
) -> VerificationResult<Capacity> {
    if vertex_count > BRUTE_FORCE_VERTEX_LIMIT {
        return Err(VerificationError::TooLarge {
            vertex_count,
            limit: BRUTE_FORCE_VERTEX_LIMIT,
        });
    }
    let endpoints = edges.iter().flat_map(|&(from, to, _)| [from, to]);
    for vertex in [source, sink].into_iter().chain(endpoints) {
        if vertex >= vertex_count {
            return Err(VerificationError::InvalidVertex {
                vertex,
                vertex_count,
            });
        }
    }

    let mut capacities: HashMap<(NodeId, NodeId), Capacity> = HashMap::new();
    for &(from, to, capacity) in edges {
        capacities.insert((from, to), capacity);
    }
    let arcs: Vec<(NodeId, NodeId, Capacity)> = capacities
        .into_iter()
        .map(|((from, to), capacity)| (from, to, capacity))
        .collect();

    let free: Vec<NodeId> = (0..vertex_count)
        .filter(|&vertex| vertex != source && vertex != sink)
        .collect();

    let best = (0usize..1usize << free.len())
        .into_par_iter()
        .map(|mask| {
            let mut on_source_side = vec![false; vertex_count];
            on_source_side[source] = true;
            for (bit, &vertex) in free.iter().enumerate() {
                if mask & (1 << bit) != 0 {
                    on_source_side[vertex] = true;
                }
            }
            arcs.iter()
                .filter(|&&(from, to, _)| on_source_side[from] && !on_source_side[to])
                .map(|&(_, _, capacity)| capacity)
                .sum::<Capacity>()
        })
        .min()
        .unwrap_or(0);
    Ok(best)
}
