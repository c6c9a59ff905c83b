//! Diagram views over solved networks

pub mod graph_view;
