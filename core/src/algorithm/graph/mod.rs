//! Maximum flow over residual networks
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod augmenting_path;
pub mod max_flow;
pub mod min_cut;
pub mod multi_terminal;

pub use self::augmenting_path::{find_augmenting_path, AugmentingPath, AugmentingPathFinder};
pub use self::max_flow::{EdmondsKarp, FlowError, FlowMetrics, FlowResult};
pub use self::min_cut::{min_cut, CutEdge, MinCut};
pub use self::multi_terminal::{
    solve_batch, solve_multi_terminal, AugmentedNetwork, EdgeFlow, EdgeReport,
    MultiTerminalProblem, MultiTerminalSolution,
};
