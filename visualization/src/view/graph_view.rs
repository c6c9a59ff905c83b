//! Graph view of a solved flow network
//!
//! Produces a Graphviz `digraph` in which every caller vertex is a node and
//! every caller edge is labelled `flow/capacity`. Sources are drawn as red
//! double circles and sinks as blue double circles; a vertex that is both is
//! styled as a source. Output is deterministic: nodes by index, edges by
//! `(from, to)`. The text is produced by [`petgraph::dot::Dot`] over the
//! graph returned by [`FlowDiagram::graph`].
//!
//! PNG output shells out to the Graphviz `dot` executable.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

use log::debug;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{Graph, NodeIndex};
use thiserror::Error;

use flowscope_core::{
    EdgeFlow, EdgeReport, MinCut, MultiTerminalProblem, MultiTerminalSolution, NodeId,
};

/// Diagram rendering errors
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to write diagram: {0}")]
    Io(#[from] io::Error),

    #[error("Graphviz executable `{program}` could not be started: {source}")]
    GraphvizUnavailable { program: String, source: io::Error },

    #[error("Graphviz exited with {status}: {stderr}")]
    GraphvizFailed { status: ExitStatus, stderr: String },
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Styling role of a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    Source,
    Sink,
    Interior,
}

/// Renderable snapshot of a solved network
#[derive(Debug, Clone)]
pub struct FlowDiagram {
    vertex_count: usize,
    edges: Vec<EdgeFlow>,
    sources: BTreeSet<NodeId>,
    sinks: BTreeSet<NodeId>,
    saturated: BTreeSet<(NodeId, NodeId)>,
    cut_edges: BTreeSet<(NodeId, NodeId)>,
    highlight_saturated: bool,
    title: Option<String>,
}

impl FlowDiagram {
    pub fn new(
        vertex_count: usize,
        report: &EdgeReport,
        sources: &[NodeId],
        sinks: &[NodeId],
    ) -> Self {
        Self {
            vertex_count,
            edges: report.iter().collect(),
            sources: sources.iter().copied().collect(),
            sinks: sinks.iter().copied().collect(),
            saturated: report.saturated().map(|edge| (edge.from, edge.to)).collect(),
            cut_edges: BTreeSet::new(),
            highlight_saturated: false,
            title: None,
        }
    }

    pub fn from_solution(
        vertex_count: usize,
        problem: &MultiTerminalProblem,
        solution: &MultiTerminalSolution,
    ) -> Self {
        Self::new(
            vertex_count,
            &solution.edge_report,
            &problem.sources,
            &problem.sinks,
        )
    }

    /// Draw saturated edges bold
    pub fn highlight_saturated(mut self, enabled: bool) -> Self {
        self.highlight_saturated = enabled;
        self
    }

    /// Draw the edges of `cut` dashed
    pub fn with_min_cut(mut self, cut: &MinCut) -> Self {
        self.cut_edges = cut.cut_edges.iter().map(|edge| (edge.from, edge.to)).collect();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn role(&self, vertex: NodeId) -> NodeRole {
        if self.sources.contains(&vertex) {
            NodeRole::Source
        } else if self.sinks.contains(&vertex) {
            NodeRole::Sink
        } else {
            NodeRole::Interior
        }
    }

    /// Graph of the caller's vertices and edges; node `i` is vertex `i`
    pub fn graph(&self) -> Graph<NodeId, EdgeFlow> {
        let node_count = self
            .edges
            .iter()
            .map(|edge| edge.from.max(edge.to) + 1)
            .fold(self.vertex_count, usize::max);

        let mut graph = Graph::with_capacity(node_count, self.edges.len());
        for vertex in 0..node_count {
            graph.add_node(vertex);
        }
        for edge in &self.edges {
            graph.add_edge(NodeIndex::new(edge.from), NodeIndex::new(edge.to), *edge);
        }
        graph
    }

    pub fn to_dot(&self) -> String {
        let graph = self.graph();
        let edge_attrs = |_, edge: petgraph::graph::EdgeReference<'_, _>| self.edge_attributes(edge.weight());
        let node_attrs = |_, (_, &vertex): (NodeIndex, &usize)| self.node_attributes(vertex);
        let body = Dot::with_attr_getters(
            &graph,
            &[
                Config::GraphContentOnly,
                Config::NodeNoLabel,
                Config::EdgeNoLabel,
            ],
            &edge_attrs,
            &node_attrs,
        );

        let mut dot = String::from("digraph flow {\n");
        if let Some(title) = &self.title {
            dot.push_str(&format!("    label = \"{}\"\n", escape(title)));
        }
        dot.push_str(&format!("{:?}", body));
        dot.push_str("}\n");
        dot
    }

    fn node_attributes(&self, vertex: NodeId) -> String {
        let style = match self.role(vertex) {
            NodeRole::Source => ", color = red, shape = doublecircle",
            NodeRole::Sink => ", color = blue, shape = doublecircle",
            NodeRole::Interior => "",
        };
        format!("label = \"Node {vertex}\"{style}")
    }

    fn edge_attributes(&self, edge: &EdgeFlow) -> String {
        let mut styles = Vec::new();
        if self.highlight_saturated && self.saturated.contains(&(edge.from, edge.to)) {
            styles.push("bold");
        }
        if self.cut_edges.contains(&(edge.from, edge.to)) {
            styles.push("dashed");
        }

        let label = format!("label = \"{}/{}\"", edge.flow, edge.capacity);
        if styles.is_empty() {
            label
        } else {
            format!("{label}, style = \"{}\"", styles.join(","))
        }
    }

    pub fn write_dot(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        fs::write(path.as_ref(), self.to_dot())?;
        debug!("Wrote DOT diagram to {}", path.as_ref().display());
        Ok(())
    }

    /// Render a PNG image through the `dot` executable
    pub fn render_png(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        self.render_with("dot", "png", path)
    }

    /// Pipe the diagram through a Graphviz layout `program` into `path`
    pub fn render_with(
        &self,
        program: &str,
        format: &str,
        path: impl AsRef<Path>,
    ) -> RenderResult<()> {
        let mut child = Command::new(program)
            .arg(format!("-T{format}"))
            .arg("-o")
            .arg(path.as_ref())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RenderError::GraphvizUnavailable {
                program: program.to_string(),
                source,
            })?;

        // stdin is fed from its own thread while stderr is drained here
        let writer = child.stdin.take().map(|mut stdin| {
            let dot = self.to_dot();
            thread::spawn(move || stdin.write_all(dot.as_bytes()))
        });
        let output = child.wait_with_output()?;
        let fed = match writer {
            Some(writer) => writer.join().unwrap_or_else(|_| {
                Err(io::Error::other("diagram writer panicked"))
            }),
            None => Ok(()),
        };

        let mut stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if let Err(err) = fed {
            if stderr.is_empty() {
                stderr = format!("failed to write diagram: {err}");
            }
            return Err(RenderError::GraphvizFailed {
                status: output.status,
                stderr,
            });
        }
        if !output.status.success() {
            return Err(RenderError::GraphvizFailed {
                status: output.status,
                stderr,
            });
        }

        debug!("Rendered {} diagram to {}", format, path.as_ref().display());
        Ok(())
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
