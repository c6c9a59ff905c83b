//! Multi-source / multi-sink reduction
//!
//! A problem with several supply-bounded sources and several sinks is reduced
//! to a single-source / single-sink instance on a fresh, larger residual
//! network: vertex `n` becomes the super-source and `n + 1` the super-sink,
//! where `n` is the vertex count of the caller's graph.
//!
//! - super-source -> `sources[i]` gets capacity `source_capacities[i]`
//! - `sinks[i]` -> super-sink gets the configured
//!   [`sink_capacity`](crate::config::SolverConfig::sink_capacity), or
//!   `sink_capacities[i]` when the problem carries per-sink bounds
//!
//! The caller's graph is never mutated. The augmented network is discarded
//! once the flow value, edge report and cut have been extracted.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::{BTreeMap, HashSet};

use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::algorithm::graph::max_flow::{EdmondsKarp, FlowError, FlowMetrics, FlowResult};
use crate::algorithm::graph::min_cut::{min_cut, MinCut};
use crate::algorithm::traits::{Capacity, Flow, NodeId};
use crate::config::SolverConfig;
use crate::data_structures::residual::ResidualNetwork;

/// Terminals of a multi-source / multi-sink problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiTerminalProblem {
    pub sources: Vec<NodeId>,
    pub sinks: Vec<NodeId>,
    /// Supply bound of each source, parallel to `sources`
    pub source_capacities: Vec<Capacity>,
    /// Optional demand bound of each sink, parallel to `sinks`
    #[serde(default)]
    pub sink_capacities: Option<Vec<Capacity>>,
}

impl MultiTerminalProblem {
    pub fn new(
        sources: Vec<NodeId>,
        sinks: Vec<NodeId>,
        source_capacities: Vec<Capacity>,
    ) -> Self {
        Self {
            sources,
            sinks,
            source_capacities,
            sink_capacities: None,
        }
    }

    /// Bound each sink individually instead of using the configured constant
    pub fn with_sink_capacities(mut self, sink_capacities: Vec<Capacity>) -> Self {
        self.sink_capacities = Some(sink_capacities);
        self
    }

    /// Check every precondition against a graph of `vertex_count` vertices
    pub fn validate(&self, vertex_count: usize, config: &SolverConfig) -> FlowResult<()> {
        if self.sources.len() != self.source_capacities.len() {
            return Err(FlowError::ArityMismatch {
                what: "source capacities",
                expected: self.sources.len(),
                actual: self.source_capacities.len(),
            });
        }
        if let Some(sink_capacities) = &self.sink_capacities {
            if self.sinks.len() != sink_capacities.len() {
                return Err(FlowError::ArityMismatch {
                    what: "sink capacities",
                    expected: self.sinks.len(),
                    actual: sink_capacities.len(),
                });
            }
        }

        for &vertex in self.sources.iter().chain(&self.sinks) {
            if vertex >= vertex_count {
                return Err(FlowError::InvalidVertexIndex {
                    vertex,
                    vertex_count,
                });
            }
        }
        check_distinct(&self.sources)?;
        check_distinct(&self.sinks)?;

        let super_source = vertex_count;
        let super_sink = vertex_count + 1;
        for (&source, &capacity) in self.sources.iter().zip(&self.source_capacities) {
            if capacity < 0 {
                return Err(FlowError::NegativeCapacity {
                    from: super_source,
                    to: source,
                    capacity,
                });
            }
        }
        for (index, &sink) in self.sinks.iter().enumerate() {
            let capacity = self.sink_capacity(index, config);
            if capacity < 0 {
                return Err(FlowError::NegativeCapacity {
                    from: sink,
                    to: super_sink,
                    capacity,
                });
            }
        }
        Ok(())
    }

    fn sink_capacity(&self, index: usize, config: &SolverConfig) -> Capacity {
        self.sink_capacities
            .as_ref()
            .and_then(|capacities| capacities.get(index).copied())
            .unwrap_or(config.sink_capacity)
    }
}

fn check_distinct(vertices: &[NodeId]) -> FlowResult<()> {
    let mut seen = HashSet::with_capacity(vertices.len());
    for &vertex in vertices {
        if !seen.insert(vertex) {
            return Err(FlowError::DuplicateTerminal(vertex));
        }
    }
    Ok(())
}

/// Residual network extended with a super-source and a super-sink
#[derive(Debug, Clone)]
pub struct AugmentedNetwork {
    network: ResidualNetwork,
    original_vertex_count: usize,
}

impl AugmentedNetwork {
    /// Validate `problem` and wire it onto a copy of `graph`
    pub fn build(
        graph: &ResidualNetwork,
        problem: &MultiTerminalProblem,
        config: &SolverConfig,
    ) -> FlowResult<Self> {
        let vertex_count = graph.vertex_count();
        problem.validate(vertex_count, config)?;

        let (super_source, super_sink) = (vertex_count, vertex_count + 1);
        let mut network = ResidualNetwork::new(vertex_count + 2);
        for &(from, to) in graph.original_edges() {
            network.add_edge(from, to, graph.capacity(from, to))?;
        }

        for (&source, &capacity) in problem.sources.iter().zip(&problem.source_capacities) {
            if capacity == 0 {
                warn!("Source {} has zero supply and cannot contribute flow", source);
            }
            network.add_edge(super_source, source, capacity)?;
        }
        for (index, &sink) in problem.sinks.iter().enumerate() {
            let capacity = problem.sink_capacity(index, config);
            if capacity == 0 {
                warn!("Sink {} has zero capacity and cannot absorb flow", sink);
            }
            network.add_edge(sink, super_sink, capacity)?;
        }

        debug!(
            "Augmented network: {} vertices, {} edges ({} sources, {} sinks)",
            network.vertex_count(),
            network.edge_count(),
            problem.sources.len(),
            problem.sinks.len()
        );
        Ok(Self {
            network,
            original_vertex_count: vertex_count,
        })
    }

    pub fn super_source(&self) -> NodeId {
        self.original_vertex_count
    }

    pub fn super_sink(&self) -> NodeId {
        self.original_vertex_count + 1
    }

    pub fn network(&self) -> &ResidualNetwork {
        &self.network
    }
}

/// Flow and capacity of one original edge after solving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeFlow {
    pub from: NodeId,
    pub to: NodeId,
    /// Net flow on `from -> to`
    pub flow: Flow,
    /// Capacity the caller assigned
    pub capacity: Capacity,
}

impl EdgeFlow {
    pub fn is_saturated(&self) -> bool {
        self.capacity > 0 && self.flow >= self.capacity
    }
}

/// Post-solve `(flow, capacity)` of exactly the caller's edges, keyed by `(from, to)`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<EdgeFlow>", from = "Vec<EdgeFlow>")]
pub struct EdgeReport {
    edges: BTreeMap<(NodeId, NodeId), (Flow, Capacity)>,
}

impl EdgeReport {
    /// Snapshot `solved` for every original edge of `graph`
    pub fn from_networks(graph: &ResidualNetwork, solved: &ResidualNetwork) -> Self {
        let edges = graph
            .original_edges()
            .iter()
            .map(|&(from, to)| ((from, to), (solved.flow(from, to), graph.capacity(from, to))))
            .collect();
        Self { edges }
    }

    pub fn get(&self, from: NodeId, to: NodeId) -> Option<EdgeFlow> {
        self.edges
            .get(&(from, to))
            .map(|&(flow, capacity)| EdgeFlow {
                from,
                to,
                flow,
                capacity,
            })
    }

    /// Edges ordered by `(from, to)`
    pub fn iter(&self) -> impl Iterator<Item = EdgeFlow> + '_ {
        self.edges
            .iter()
            .map(|(&(from, to), &(flow, capacity))| EdgeFlow {
                from,
                to,
                flow,
                capacity,
            })
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn saturated(&self) -> impl Iterator<Item = EdgeFlow> + '_ {
        self.iter().filter(EdgeFlow::is_saturated)
    }
}

impl From<EdgeReport> for Vec<EdgeFlow> {
    fn from(report: EdgeReport) -> Self {
        report.iter().collect()
    }
}

impl From<Vec<EdgeFlow>> for EdgeReport {
    fn from(edges: Vec<EdgeFlow>) -> Self {
        let edges = edges
            .into_iter()
            .map(|edge| ((edge.from, edge.to), (edge.flow, edge.capacity)))
            .collect();
        Self { edges }
    }
}

/// Everything a request layer or renderer needs from one solve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiTerminalSolution {
    pub max_flow: Flow,
    pub edge_report: EdgeReport,
    /// Residual cut restricted to the caller's vertices and edges
    pub min_cut: MinCut,
    pub metrics: FlowMetrics,
}

impl EdmondsKarp {
    /// Reduce `problem` onto a copy of `graph` and solve it
    pub fn solve_multi_terminal(
        &mut self,
        graph: &ResidualNetwork,
        problem: &MultiTerminalProblem,
    ) -> FlowResult<MultiTerminalSolution> {
        let augmented = AugmentedNetwork::build(graph, problem, self.config())?;
        let (super_source, super_sink) = (augmented.super_source(), augmented.super_sink());
        let mut network = augmented.network;

        let max_flow = self.compute_max_flow(&mut network, super_source, super_sink)?;
        let edge_report = EdgeReport::from_networks(graph, &network);
        let cut = min_cut(&network, super_source).restricted_to(graph.vertex_count());

        info!(
            "Solved multi-terminal flow: {} vertices, {} edges, {} sources, {} sinks -> {}",
            graph.vertex_count(),
            graph.edge_count(),
            problem.sources.len(),
            problem.sinks.len(),
            max_flow
        );
        Ok(MultiTerminalSolution {
            max_flow,
            edge_report,
            min_cut: cut,
            metrics: self.metrics().clone(),
        })
    }
}

/// Solve with the default configuration
pub fn solve_multi_terminal(
    graph: &ResidualNetwork,
    problem: &MultiTerminalProblem,
) -> FlowResult<MultiTerminalSolution> {
    EdmondsKarp::new().solve_multi_terminal(graph, problem)
}

/// Solve independent problems in parallel, preserving input order
pub fn solve_batch(
    instances: &[(ResidualNetwork, MultiTerminalProblem)],
    config: &SolverConfig,
) -> Vec<FlowResult<MultiTerminalSolution>> {
    instances
        .par_iter()
        .map(|(graph, problem)| {
            EdmondsKarp::with_config(config.clone()).solve_multi_terminal(graph, problem)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_b() -> (ResidualNetwork, MultiTerminalProblem) {
        let graph = ResidualNetwork::from_edges(4, [(0, 2, 5), (1, 2, 5), (2, 3, 4)]).unwrap();
        let problem = MultiTerminalProblem::new(vec![0, 1], vec![3], vec![3, 3]);
        (graph, problem)
    }

    #[test]
    fn test_scenario_b_bounded_by_sink_side_edge() {
        let (graph, problem) = scenario_b();
        let solution = solve_multi_terminal(&graph, &problem).unwrap();

        assert_eq!(solution.max_flow, 4);
        assert_eq!(solution.edge_report.len(), 3);
        assert_eq!(solution.edge_report.get(2, 3).unwrap().flow, 4);
        assert!(solution.edge_report.get(2, 3).unwrap().is_saturated());
        let saturated: Vec<_> = solution
            .edge_report
            .saturated()
            .map(|edge| (edge.from, edge.to))
            .collect();
        assert_eq!(saturated, vec![(2, 3)]);

        let into_hub: Flow = solution
            .edge_report
            .iter()
            .filter(|edge| edge.to == 2)
            .map(|edge| edge.flow)
            .sum();
        assert_eq!(into_hub, 4);
        assert!(solution.min_cut.is_cut_edge(2, 3));
        assert_eq!(solution.min_cut.capacity, 4);
    }

    #[test]
    fn test_source_capacities_bound_supply() {
        let graph = ResidualNetwork::from_edges(3, [(0, 2, 10), (1, 2, 10)]).unwrap();
        let problem = MultiTerminalProblem::new(vec![0, 1], vec![2], vec![2, 5]);
        let solution = solve_multi_terminal(&graph, &problem).unwrap();

        assert_eq!(solution.max_flow, 7);
        assert_eq!(solution.edge_report.get(0, 2).unwrap().flow, 2);
        assert_eq!(solution.edge_report.get(1, 2).unwrap().flow, 5);
    }

    #[test]
    fn test_scenario_c_disconnected() {
        let graph = ResidualNetwork::from_edges(4, [(0, 1, 5), (2, 3, 5)]).unwrap();
        let problem = MultiTerminalProblem::new(vec![0], vec![3], vec![10]);
        let solution = solve_multi_terminal(&graph, &problem).unwrap();

        assert_eq!(solution.max_flow, 0);
        assert!(solution.edge_report.iter().all(|edge| edge.flow == 0));
        assert_eq!(solution.edge_report.len(), 2);
    }

    #[test]
    fn test_scenario_d_zero_capacity_edge() {
        let graph = ResidualNetwork::from_edges(3, [(0, 1, 0), (0, 2, 3), (1, 2, 8)]).unwrap();
        let problem = MultiTerminalProblem::new(vec![0], vec![2], vec![100]);
        let solution = solve_multi_terminal(&graph, &problem).unwrap();

        assert_eq!(solution.max_flow, 3);
        assert_eq!(solution.edge_report.get(0, 1).unwrap().flow, 0);
        assert_eq!(solution.edge_report.get(1, 2).unwrap().flow, 0);
    }

    #[test]
    fn test_report_excludes_super_nodes_and_keeps_graph_untouched() {
        let (graph, problem) = scenario_b();
        let before = graph.clone();
        let solution = solve_multi_terminal(&graph, &problem).unwrap();

        assert!(solution
            .edge_report
            .iter()
            .all(|edge| edge.from < 4 && edge.to < 4));
        assert!(solution.min_cut.source_side.iter().all(|&vertex| vertex < 4));
        assert_eq!(graph.capacity(2, 3), before.capacity(2, 3));
        assert_eq!(graph.flow(2, 3), 0);
    }

    #[test]
    fn test_default_sink_capacity_caps_total() {
        let graph = ResidualNetwork::from_edges(2, [(0, 1, 1_000_000)]).unwrap();
        let problem = MultiTerminalProblem::new(vec![0], vec![1], vec![1_000_000]);
        let solution = solve_multi_terminal(&graph, &problem).unwrap();

        assert_eq!(solution.max_flow, 100_000);
    }

    #[test]
    fn test_per_sink_capacities() {
        let graph = ResidualNetwork::from_edges(3, [(0, 1, 10), (0, 2, 10)]).unwrap();
        let problem = MultiTerminalProblem::new(vec![0], vec![1, 2], vec![20])
            .with_sink_capacities(vec![3, 4]);
        let solution = solve_multi_terminal(&graph, &problem).unwrap();

        assert_eq!(solution.max_flow, 7);
        assert_eq!(solution.edge_report.get(0, 1).unwrap().flow, 3);
        assert_eq!(solution.edge_report.get(0, 2).unwrap().flow, 4);
    }

    #[test]
    fn test_vertex_both_source_and_sink() {
        let graph = ResidualNetwork::from_edges(2, [(0, 1, 5)]).unwrap();
        let problem = MultiTerminalProblem::new(vec![0], vec![0, 1], vec![4]);
        let solution = solve_multi_terminal(&graph, &problem).unwrap();

        assert_eq!(solution.max_flow, 4);
        assert_eq!(solution.edge_report.get(0, 1).unwrap().flow, 0);
    }

    #[test]
    fn test_validation_errors() {
        let graph = ResidualNetwork::from_edges(3, [(0, 1, 1), (1, 2, 1)]).unwrap();

        let arity = MultiTerminalProblem::new(vec![0, 1], vec![2], vec![1]);
        assert!(matches!(
            solve_multi_terminal(&graph, &arity),
            Err(FlowError::ArityMismatch { expected: 2, actual: 1, .. })
        ));

        let out_of_range = MultiTerminalProblem::new(vec![0], vec![7], vec![1]);
        assert!(matches!(
            solve_multi_terminal(&graph, &out_of_range),
            Err(FlowError::InvalidVertexIndex { vertex: 7, vertex_count: 3 })
        ));

        let negative = MultiTerminalProblem::new(vec![0], vec![2], vec![-1]);
        assert!(matches!(
            solve_multi_terminal(&graph, &negative),
            Err(FlowError::NegativeCapacity { from: 3, to: 0, capacity: -1 })
        ));

        let duplicate = MultiTerminalProblem::new(vec![0, 0], vec![2], vec![1, 1]);
        assert!(matches!(
            solve_multi_terminal(&graph, &duplicate),
            Err(FlowError::DuplicateTerminal(0))
        ));

        let sink_arity =
            MultiTerminalProblem::new(vec![0], vec![2], vec![1]).with_sink_capacities(vec![]);
        assert!(matches!(
            solve_multi_terminal(&graph, &sink_arity),
            Err(FlowError::ArityMismatch { what: "sink capacities", .. })
        ));
    }

    #[test]
    fn test_augmented_network_wiring() {
        let (graph, problem) = scenario_b();
        let augmented =
            AugmentedNetwork::build(&graph, &problem, &SolverConfig::default()).unwrap();
        let network = augmented.network();

        assert_eq!(augmented.super_source(), 4);
        assert_eq!(augmented.super_sink(), 5);
        assert_eq!(network.vertex_count(), 6);
        assert_eq!(network.capacity(4, 0), 3);
        assert_eq!(network.capacity(4, 1), 3);
        assert_eq!(network.capacity(3, 5), 100_000);
        assert_eq!(network.capacity(2, 3), 4);
        assert_eq!(network.edge_count(), 6);
    }

    #[test]
    fn test_verified_multi_terminal_solve() {
        let (graph, problem) = scenario_b();
        let mut solver = EdmondsKarp::with_config(SolverConfig {
            verify_invariants: true,
            ..SolverConfig::default()
        });
        let solution = solver.solve_multi_terminal(&graph, &problem).unwrap();
        assert_eq!(solution.max_flow, 4);
        assert!(solution.metrics.augmentations >= 1);
    }

    #[test]
    fn test_solve_batch_preserves_order() {
        let (graph_b, problem_b) = scenario_b();
        let graph_a =
            ResidualNetwork::from_edges(4, [(0, 1, 3), (0, 2, 2), (1, 3, 2), (2, 3, 3)]).unwrap();
        let problem_a = MultiTerminalProblem::new(vec![0], vec![3], vec![100]);
        let broken = MultiTerminalProblem::new(vec![0], vec![9], vec![1]);

        let results = solve_batch(
            &[
                (graph_a.clone(), problem_a),
                (graph_b, problem_b),
                (graph_a, broken),
            ],
            &SolverConfig::default(),
        );

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().max_flow, 4);
        assert_eq!(results[1].as_ref().unwrap().max_flow, 4);
        assert!(results[2].is_err());
    }

    #[test]
    fn test_edge_report_serializes_as_list() {
        let (graph, problem) = scenario_b();
        let solution = solve_multi_terminal(&graph, &problem).unwrap();
        let json = serde_json::to_value(&solution.edge_report).unwrap();

        let edges = json.as_array().unwrap();
        assert_eq!(edges.len(), 3);
        assert_eq!(edges[2]["from"], 2);
        assert_eq!(edges[2]["to"], 3);
        assert_eq!(edges[2]["flow"], 4);
        assert_eq!(edges[2]["capacity"], 4);

        let restored: EdgeReport = serde_json::from_value(json).unwrap();
        assert_eq!(restored, solution.edge_report);
    }
}
