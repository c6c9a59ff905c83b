//! Flowscope core
//!
//! Maximum flow in directed, capacitated graphs with several bounded sources
//! and several sinks. A [`ResidualNetwork`] holds capacities and the flow
//! ledger, [`EdmondsKarp`] augments it along breadth-first paths, and
//! [`solve_multi_terminal`] reduces multi-terminal problems to a single
//! super-source / super-sink pair before solving.
//!
//! ```
//! use flowscope_core::{solve_multi_terminal, MultiTerminalProblem, ResidualNetwork};
//!
//! let graph = ResidualNetwork::from_edges(4, [(0, 2, 5), (1, 2, 5), (2, 3, 4)])?;
//! let problem = MultiTerminalProblem::new(vec![0, 1], vec![3], vec![3, 3]);
//! let solution = solve_multi_terminal(&graph, &problem)?;
//! assert_eq!(solution.max_flow, 4);
//! # Ok::<(), flowscope_core::FlowError>(())
//! ```
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod algorithm;
pub mod config;
pub mod data_structures;
pub mod validation;

pub use self::algorithm::*;
pub use self::config::{ConfigError, SolverConfig, DEFAULT_SINK_CAPACITY};
pub use self::data_structures::ResidualNetwork;
