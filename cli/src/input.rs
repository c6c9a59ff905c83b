//! Text form of a multi-terminal flow problem
//!
//! ```text
//! 4            vertex count (first token of the line)
//! 3            edge count (first token of the line)
//! 0 2 5        one `u v capacity` line per edge
//! 1 2 5
//! 2 3 4
//! 0 1          sources
//! 3            sinks
//! 3 3          supply of each source
//! ```
//!
//! Blank lines are skipped. Only syntax and the vertex count bound are
//! checked here: vertex ranges, arity and capacity signs are validated by
//! the core when the problem is built and solved.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use flowscope_core::{Capacity, FlowResult, MultiTerminalProblem, NodeId, ResidualNetwork};

/// Largest vertex count accepted from text input
pub const MAX_VERTEX_COUNT: usize = 1 << 20;

/// Input decoding errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("missing {0} line")]
    MissingSection(&'static str),

    #[error("expected {expected} edge lines, found {found}")]
    TooFewEdges { expected: usize, found: usize },
}

/// Result type for input decoding
pub type InputResult<T> = Result<T, InputError>;

/// Typed problem decoded from text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowInput {
    pub vertex_count: usize,
    pub edges: Vec<(NodeId, NodeId, Capacity)>,
    pub sources: Vec<NodeId>,
    pub sinks: Vec<NodeId>,
    pub source_capacities: Vec<Capacity>,
}

impl FlowInput {
    pub fn parse(text: &str) -> InputResult<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        let (line, header) = lines.next().ok_or(InputError::MissingSection("vertex count"))?;
        let vertex_count: usize = parse_leading(line, header, "vertex count")?;
        if vertex_count > MAX_VERTEX_COUNT {
            return Err(InputError::Parse {
                line,
                message: format!("vertex count {vertex_count} exceeds {MAX_VERTEX_COUNT}"),
            });
        }

        let (line, header) = lines.next().ok_or(InputError::MissingSection("edge count"))?;
        let edge_count: usize = parse_leading(line, header, "edge count")?;

        let mut edges = Vec::new();
        for found in 0..edge_count {
            let (line, text) = lines.next().ok_or(InputError::TooFewEdges {
                expected: edge_count,
                found,
            })?;
            edges.push(parse_edge(line, text)?);
        }

        let (line, text) = lines.next().ok_or(InputError::MissingSection("sources"))?;
        let sources = parse_list(line, text, "source")?;
        let (line, text) = lines.next().ok_or(InputError::MissingSection("sinks"))?;
        let sinks = parse_list(line, text, "sink")?;
        let (line, text) = lines
            .next()
            .ok_or(InputError::MissingSection("source capacities"))?;
        let source_capacities = parse_list(line, text, "source capacity")?;

        if let Some((line, _)) = lines.next() {
            return Err(InputError::Parse {
                line,
                message: "unexpected input after the source capacities".to_string(),
            });
        }

        Ok(Self {
            vertex_count,
            edges,
            sources,
            sinks,
            source_capacities,
        })
    }

    /// Build the residual network; fails on out-of-range or negative edges
    pub fn network(&self) -> FlowResult<ResidualNetwork> {
        ResidualNetwork::from_edges(self.vertex_count, self.edges.iter().copied())
    }

    pub fn problem(&self) -> MultiTerminalProblem {
        MultiTerminalProblem::new(
            self.sources.clone(),
            self.sinks.clone(),
            self.source_capacities.clone(),
        )
    }
}

impl FromStr for FlowInput {
    type Err = InputError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

fn parse_token<T>(line: usize, token: &str, what: &str) -> InputResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    token.parse().map_err(|err| InputError::Parse {
        line,
        message: format!("invalid {what} {token:?}: {err}"),
    })
}

fn parse_leading<T>(line: usize, text: &str, what: &str) -> InputResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    let token = text.split_whitespace().next().unwrap_or_default();
    parse_token(line, token, what)
}

fn parse_edge(line: usize, text: &str) -> InputResult<(NodeId, NodeId, Capacity)> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    match tokens.as_slice() {
        [from, to, capacity] => Ok((
            parse_token(line, from, "edge endpoint")?,
            parse_token(line, to, "edge endpoint")?,
            parse_token(line, capacity, "edge capacity")?,
        )),
        _ => Err(InputError::Parse {
            line,
            message: format!("expected `u v capacity`, got {} tokens", tokens.len()),
        }),
    }
}

fn parse_list<T>(line: usize, text: &str, what: &str) -> InputResult<Vec<T>>
where
    T: FromStr,
    T::Err: Display,
{
    text.split_whitespace()
        .map(|token| parse_token(line, token, what))
        .collect()
}
