use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use env_logger::Env;
use log::{info, warn};

use flowscope_cli::input::FlowInput;
use flowscope_cli::options::{Options, SolveOptions};
use flowscope_core::{Algorithm, EdmondsKarp};
use flowscope_visualization::{FlowDiagram, RenderError};

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let options = Options::parse_from_args(std::env::args_os()).unwrap_or_else(|err| err.exit());
    log::debug!("Flowscope options: {:?}", options);

    match options {
        Options::Solve(solve) => run_solve(&solve),
    }
}

fn run_solve(options: &SolveOptions) -> Result<()> {
    let text = read_input(options.input.as_deref())?;
    let input = FlowInput::parse(&text).context("failed to parse flow problem")?;
    let config = options
        .solver_config()
        .context("failed to load solver configuration")?;

    let graph = input.network().context("invalid edge list")?;
    let problem = input.problem();
    let mut solver = EdmondsKarp::with_config(config);
    info!(
        "Solving with {} ({})",
        solver.name(),
        solver.complexity().time_complexity
    );
    let solution = solver
        .solve_multi_terminal(&graph, &problem)
        .context("failed to solve flow problem")?;

    if options.dot.is_some() || options.png.is_some() {
        let diagram = FlowDiagram::from_solution(graph.vertex_count(), &problem, &solution)
            .highlight_saturated(true)
            .with_min_cut(&solution.min_cut);

        if let Some(path) = &options.dot {
            diagram
                .write_dot(path)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        if let Some(path) = &options.png {
            render_png(&diagram, path)?;
        }
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&solution)?);
    } else {
        println!("max flow: {}", solution.max_flow);
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read standard input")?;
            Ok(text)
        }
    }
}

/// Falls back to a DOT file beside `path` when Graphviz is not installed
fn render_png(diagram: &FlowDiagram, path: &Path) -> Result<()> {
    match diagram.render_png(path) {
        Ok(()) => Ok(()),
        Err(RenderError::GraphvizUnavailable { program, source }) => {
            let fallback = path.with_extension("dot");
            warn!(
                "`{}` unavailable ({}); writing {} instead",
                program,
                source,
                fallback.display()
            );
            diagram
                .write_dot(&fallback)
                .with_context(|| format!("failed to write {}", fallback.display()))
        }
        Err(err) => Err(err).with_context(|| format!("failed to render {}", path.display())),
    }
}
