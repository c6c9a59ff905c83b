//! Core algorithm trait definitions for Flowscope
//!
//! This module establishes the shared vocabulary of the flow solvers: vertex
//! and capacity types, solver identity and complexity descriptions, string
//! parameters, and the profiling counters every solver run reports.
//!
//! # Numeric model
//! Capacities and flows are signed 64-bit integers. Signedness is needed
//! because net flow is antisymmetric (`flow[u][v] == -flow[v][u]`) and because
//! negative caller input must be representable to be rejected. No floating
//! point arithmetic takes part in any solver.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::HashMap;
use std::fmt::Debug;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Vertex index in `[0, vertex_count)`
pub type NodeId = usize;

/// Capacity of a directed arc
pub type Capacity = i64;

/// Net flow carried by a directed arc
pub type Flow = i64;

/// Universal algorithm identifier for type-safe dispatch
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmId(String);

impl AlgorithmId {
    pub fn new(name: &str) -> Self {
        Self(name.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Algorithm parameter with its current value rendered as a string
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmParameter {
    pub name: String,
    pub value: String,
    pub value_type: ParameterType,
    pub description: String,
}

/// Parameter type enumeration for type-safe parameter handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterType {
    Integer,
    Boolean,
}

/// Errors raised by the generic algorithm surface
#[derive(Debug, thiserror::Error)]
pub enum AlgorithmError {
    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },
}

/// Algorithm complexity information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmComplexity {
    pub time_complexity: String,
    pub space_complexity: String,
}

/// Counters collected while a solver runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmMetrics {
    pub steps_executed: usize,
    pub nodes_explored: usize,
    pub execution_time: Duration,
}

/// Common surface of every solver in the crate
///
/// Solvers are configured through string parameters so that request layers
/// can forward user-supplied settings without knowing the concrete solver.
pub trait Algorithm: Debug + Send + Sync {
    /// Returns the algorithm's unique identifier
    fn id(&self) -> AlgorithmId;

    /// Returns the algorithm's descriptive name
    fn name(&self) -> &'static str;

    /// Returns the algorithm's category (e.g., max_flow)
    fn category(&self) -> &'static str;

    /// Returns the algorithm's description
    fn description(&self) -> String;

    /// Returns the algorithm's asymptotic complexity in Big-O notation
    fn complexity(&self) -> AlgorithmComplexity;

    /// Returns supported parameters with their current values
    fn parameters(&self) -> Vec<AlgorithmParameter>;

    /// Sets algorithm parameter with type validation
    fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), AlgorithmError>;

    /// Gets algorithm parameter value
    fn get_parameter(&self, name: &str) -> Option<String> {
        self.parameters()
            .into_iter()
            .find(|parameter| parameter.name == name)
            .map(|parameter| parameter.value)
    }

    /// Returns all parameters as a name/value map
    fn get_parameters(&self) -> HashMap<String, String> {
        self.parameters()
            .into_iter()
            .map(|parameter| (parameter.name, parameter.value))
            .collect()
    }
}

/// Performance profiling for a single solver run
#[derive(Debug, Default)]
pub struct AlgorithmProfiler {
    metrics: AlgorithmMetrics,
    start_time: Option<Instant>,
}

impl AlgorithmProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn stop(&mut self) {
        if let Some(start) = self.start_time.take() {
            self.metrics.execution_time = start.elapsed();
        }
    }

    pub fn record_nodes_explored(&mut self, count: usize) {
        self.metrics.nodes_explored += count;
    }

    pub fn record_step(&mut self) {
        self.metrics.steps_executed += 1;
    }

    pub fn get_metrics(&self) -> AlgorithmMetrics {
        self.metrics.clone()
    }
}

/// Parses a boolean parameter value the way request layers spell it
pub(crate) fn parse_bool_parameter(name: &str, value: &str) -> Result<bool, AlgorithmError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(AlgorithmError::InvalidParameter {
            name: name.to_string(),
            reason: format!("expected a boolean, got {value:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_id_uniqueness() {
        let id1 = AlgorithmId::new("edmonds_karp");
        let id2 = AlgorithmId::new("dinic");
        let id3 = AlgorithmId::new("edmonds_karp");

        assert_ne!(id1, id2);
        assert_eq!(id1, id3);
        assert_eq!(id1.as_str(), "edmonds_karp");
    }

    #[test]
    fn test_profiler_counts() {
        let mut profiler = AlgorithmProfiler::new();
        profiler.start();
        profiler.record_step();
        profiler.record_step();
        profiler.record_nodes_explored(5);
        profiler.stop();

        let metrics = profiler.get_metrics();
        assert_eq!(metrics.steps_executed, 2);
        assert_eq!(metrics.nodes_explored, 5);
    }

    #[test]
    fn test_bool_parameter_parsing() {
        assert!(parse_bool_parameter("verify", "true").unwrap());
        assert!(parse_bool_parameter("verify", " ON ").unwrap());
        assert!(!parse_bool_parameter("verify", "0").unwrap());
        assert!(parse_bool_parameter("verify", "maybe").is_err());
    }
}
