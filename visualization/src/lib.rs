//! Flowscope visualization
//!
//! Renders the edge report of a solved flow network as a Graphviz diagram.
//! Only caller-visible vertices and edges are drawn; the synthetic
//! super-source and super-sink never reach this crate.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod view;

pub use self::view::graph_view::{FlowDiagram, RenderError, RenderResult};
