//! Maximum Flow Algorithm Implementation
//!
//! This module implements the Ford-Fulkerson method with breadth-first
//! augmenting paths (Edmonds-Karp) over a [`ResidualNetwork`].
//!
//! # Termination
//! Every augmentation raises the total flow by a positive integer and the
//! total is bounded by the capacity of any source/sink cut, so the loop stops
//! after finitely many rounds; with BFS paths the bound is O(V·E²) residual
//! operations. When no augmenting path remains the flow is maximum
//! (max-flow/min-cut theorem).
//!
//! Solving mutates the network in place. Solving the same network again
//! finds no augmenting path and returns 0; clone the network first to solve
//! a fresh copy.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::algorithm::graph::augmenting_path::AugmentingPathFinder;
use crate::algorithm::traits::{
    parse_bool_parameter, Algorithm, AlgorithmComplexity, AlgorithmError, AlgorithmId,
    AlgorithmMetrics, AlgorithmParameter, AlgorithmProfiler, Capacity, Flow, NodeId,
    ParameterType,
};
use crate::config::SolverConfig;
use crate::data_structures::residual::ResidualNetwork;
use crate::validation::correctness::{verify_solution, VerificationError};

/// Flow algorithm errors
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("Vertex {vertex} is outside [0, {vertex_count})")]
    InvalidVertexIndex { vertex: NodeId, vertex_count: usize },

    #[error("Negative capacity {capacity} on arc {from} -> {to}")]
    NegativeCapacity {
        from: NodeId,
        to: NodeId,
        capacity: Capacity,
    },

    #[error("Expected {expected} {what}, got {actual}")]
    ArityMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Source and sink are the same vertex {0}")]
    SourceEqualsSink(NodeId),

    #[error("Vertex {0} is listed more than once as a terminal")]
    DuplicateTerminal(NodeId),

    #[error("Flow value exceeds the representable capacity range")]
    CapacityOverflow,

    #[error("Flow invariant violated: {0}")]
    Verification(#[from] VerificationError),
}

/// Result type for flow operations
pub type FlowResult<T> = Result<T, FlowError>;

/// Flow algorithm performance metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowMetrics {
    /// Number of augmenting paths applied
    pub augmentations: usize,
    /// Vertices dequeued across all path searches
    pub vertices_explored: usize,
    /// Wall-clock time of the solve
    pub execution_time: Duration,
}

impl From<AlgorithmMetrics> for FlowMetrics {
    fn from(metrics: AlgorithmMetrics) -> Self {
        Self {
            augmentations: metrics.steps_executed,
            vertices_explored: metrics.nodes_explored,
            execution_time: metrics.execution_time,
        }
    }
}

/// Edmonds-Karp maximum flow solver
#[derive(Debug, Clone, Default)]
pub struct EdmondsKarp {
    config: SolverConfig,
    metrics: FlowMetrics,
}

impl EdmondsKarp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self {
            config,
            metrics: FlowMetrics::default(),
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Metrics of the most recent solve
    pub fn metrics(&self) -> &FlowMetrics {
        &self.metrics
    }

    /// Augment `network` until no path from `source` to `sink` remains.
    ///
    /// Returns the flow added by this call. Endpoints are validated before
    /// the network is touched.
    pub fn compute_max_flow(
        &mut self,
        network: &mut ResidualNetwork,
        source: NodeId,
        sink: NodeId,
    ) -> FlowResult<Flow> {
        network.check_vertex(source)?;
        network.check_vertex(sink)?;
        if source == sink {
            return Err(FlowError::SourceEqualsSink(source));
        }

        let baseline = self.config.verify_invariants.then(|| network.clone());
        let mut profiler = AlgorithmProfiler::new();
        let mut finder = AugmentingPathFinder::new();
        let mut total: Flow = 0;
        profiler.start();

        loop {
            let path = finder.find(network, source, sink);
            profiler.record_nodes_explored(finder.explored());
            let Some(path) = path else { break };

            let next_total = total
                .checked_add(path.bottleneck)
                .ok_or(FlowError::CapacityOverflow)?;
            network.push_along(&path.vertices, path.bottleneck)?;
            total = next_total;
            profiler.record_step();

            if self.config.log_augmentations {
                trace!(
                    "Augmented {} units along {:?}",
                    path.bottleneck,
                    path.vertices
                );
            }
        }

        profiler.stop();
        self.metrics = profiler.get_metrics().into();
        debug!(
            "Edmonds-Karp {} -> {}: flow {} after {} augmentations ({} vertices explored, {:?})",
            source,
            sink,
            total,
            self.metrics.augmentations,
            self.metrics.vertices_explored,
            self.metrics.execution_time
        );

        if let Some(baseline) = baseline {
            verify_solution(&baseline, network, source, sink)?;
        }
        Ok(total)
    }
}

impl ResidualNetwork {
    /// Solve in place with a default-configured [`EdmondsKarp`]
    pub fn compute_max_flow(&mut self, source: NodeId, sink: NodeId) -> FlowResult<Flow> {
        EdmondsKarp::new().compute_max_flow(self, source, sink)
    }
}

impl Algorithm for EdmondsKarp {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::new("edmonds_karp")
    }

    fn name(&self) -> &'static str {
        "Edmonds-Karp"
    }

    fn category(&self) -> &'static str {
        "max_flow"
    }

    fn description(&self) -> String {
        "Ford-Fulkerson maximum flow with breadth-first augmenting paths over integer capacities"
            .to_string()
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity {
            time_complexity: "O(V·E²)".to_string(),
            space_complexity: "O(V + E)".to_string(),
        }
    }

    fn parameters(&self) -> Vec<AlgorithmParameter> {
        vec![
            AlgorithmParameter {
                name: "sink_capacity".to_string(),
                value: self.config.sink_capacity.to_string(),
                value_type: ParameterType::Integer,
                description: "Capacity of each sink to super-sink arc".to_string(),
            },
            AlgorithmParameter {
                name: "verify_invariants".to_string(),
                value: self.config.verify_invariants.to_string(),
                value_type: ParameterType::Boolean,
                description: "Check flow invariants after solving".to_string(),
            },
            AlgorithmParameter {
                name: "log_augmentations".to_string(),
                value: self.config.log_augmentations.to_string(),
                value_type: ParameterType::Boolean,
                description: "Trace every augmenting path".to_string(),
            },
        ]
    }

    fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), AlgorithmError> {
        match name {
            "sink_capacity" => {
                let capacity = value.trim().parse::<Capacity>().map_err(|_| {
                    AlgorithmError::InvalidParameter {
                        name: name.to_string(),
                        reason: "sink_capacity must be an integer".to_string(),
                    }
                })?;
                if capacity < 0 {
                    return Err(AlgorithmError::InvalidParameter {
                        name: name.to_string(),
                        reason: "sink_capacity must be non-negative".to_string(),
                    });
                }
                self.config.sink_capacity = capacity;
                Ok(())
            }
            "verify_invariants" => {
                self.config.verify_invariants = parse_bool_parameter(name, value)?;
                Ok(())
            }
            "log_augmentations" => {
                self.config.log_augmentations = parse_bool_parameter(name, value)?;
                Ok(())
            }
            _ => Err(AlgorithmError::InvalidParameter {
                name: name.to_string(),
                reason: "unknown parameter".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_a() -> ResidualNetwork {
        ResidualNetwork::from_edges(4, [(0, 1, 3), (0, 2, 2), (1, 3, 2), (2, 3, 3)]).unwrap()
    }

    fn textbook_network() -> ResidualNetwork {
        ResidualNetwork::from_edges(
            6,
            [
                (0, 1, 16),
                (0, 2, 13),
                (1, 2, 10),
                (2, 1, 4),
                (1, 3, 12),
                (3, 2, 9),
                (2, 4, 14),
                (4, 3, 7),
                (3, 5, 20),
                (4, 5, 4),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_scenario_a_max_flow() {
        let mut network = scenario_a();
        assert_eq!(network.compute_max_flow(0, 3).unwrap(), 4);

        assert_eq!(network.flow(0, 1), 2);
        assert_eq!(network.flow(0, 2), 2);
        assert_eq!(network.flow(1, 3), 2);
        assert_eq!(network.flow(2, 3), 2);
        assert_eq!(network.flow(3, 1), -2);
    }

    #[test]
    fn test_textbook_network() {
        let mut network = textbook_network();
        assert_eq!(network.compute_max_flow(0, 5).unwrap(), 23);
    }

    #[test]
    fn test_resolve_is_not_idempotent() {
        let mut network = textbook_network();
        let mut fresh = network.clone();

        assert_eq!(network.compute_max_flow(0, 5).unwrap(), 23);
        assert_eq!(network.compute_max_flow(0, 5).unwrap(), 0);
        assert_eq!(fresh.compute_max_flow(0, 5).unwrap(), 23);
    }

    #[test]
    fn test_disconnected_yields_zero() {
        let mut network = ResidualNetwork::from_edges(4, [(0, 1, 5), (2, 3, 5)]).unwrap();
        assert_eq!(network.compute_max_flow(0, 3).unwrap(), 0);
        assert_eq!(network.flow(0, 1), 0);
        assert_eq!(network.flow(2, 3), 0);
    }

    #[test]
    fn test_zero_capacity_edge_never_carries_flow() {
        let mut network =
            ResidualNetwork::from_edges(3, [(0, 1, 4), (1, 2, 4), (0, 2, 0)]).unwrap();
        assert_eq!(network.compute_max_flow(0, 2).unwrap(), 4);
        assert_eq!(network.flow(0, 2), 0);
    }

    #[test]
    fn test_self_loop_carries_nothing() {
        let mut network =
            ResidualNetwork::from_edges(3, [(0, 1, 4), (1, 1, 9), (1, 2, 3)]).unwrap();
        assert_eq!(network.compute_max_flow(0, 2).unwrap(), 3);
        assert_eq!(network.flow(1, 1), 0);
    }

    #[test]
    fn test_source_equals_sink_is_rejected() {
        let mut network = scenario_a();
        let err = network.compute_max_flow(2, 2).unwrap_err();
        assert!(matches!(err, FlowError::SourceEqualsSink(2)));
    }

    #[test]
    fn test_out_of_range_endpoint_is_rejected() {
        let mut network = scenario_a();
        let err = network.compute_max_flow(0, 4).unwrap_err();
        assert!(matches!(
            err,
            FlowError::InvalidVertexIndex { vertex: 4, vertex_count: 4 }
        ));
        assert_eq!(network.capacity(0, 1), 3);
    }

    #[test]
    fn test_metrics_count_augmentations() {
        let mut network = scenario_a();
        let mut solver = EdmondsKarp::new();
        solver.compute_max_flow(&mut network, 0, 3).unwrap();

        assert_eq!(solver.metrics().augmentations, 2);
        assert!(solver.metrics().vertices_explored >= 3);
    }

    #[test]
    fn test_verified_solve() {
        let mut network = textbook_network();
        let mut solver = EdmondsKarp::with_config(SolverConfig {
            verify_invariants: true,
            log_augmentations: true,
            ..SolverConfig::default()
        });
        assert_eq!(solver.compute_max_flow(&mut network, 0, 5).unwrap(), 23);
    }

    #[test]
    fn test_solver_identity() {
        let solver = EdmondsKarp::new();
        assert_eq!(solver.name(), "Edmonds-Karp");
        assert_eq!(solver.category(), "max_flow");
        assert_eq!(solver.id(), AlgorithmId::new("edmonds_karp"));
        assert_eq!(solver.complexity().time_complexity, "O(V·E²)");
    }

    #[test]
    fn test_parameter_setting() {
        let mut solver = EdmondsKarp::new();

        assert!(solver.set_parameter("sink_capacity", "250").is_ok());
        assert_eq!(solver.get_parameter("sink_capacity"), Some("250".to_string()));
        assert_eq!(solver.config().sink_capacity, 250);

        assert!(solver.set_parameter("verify_invariants", "true").is_ok());
        assert_eq!(
            solver.get_parameters().get("verify_invariants"),
            Some(&"true".to_string())
        );

        assert!(solver.set_parameter("unknown", "1").is_err());
        assert!(solver.set_parameter("sink_capacity", "-3").is_err());
        assert!(solver.set_parameter("sink_capacity", "lots").is_err());
        assert!(solver.set_parameter("log_augmentations", "maybe").is_err());
    }
}
