//! Parsing Options.
//!
//! `flowscope solve [INPUT] [--config FILE] [--sink-capacity N] [--verify]
//! [--dot FILE] [--png FILE] [--json]`

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, Command};

use flowscope_core::config::ConfigResult;
use flowscope_core::{Capacity, SolverConfig};

pub fn make_options_parser() -> Command {
    Command::new("flowscope")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Maximum flow for networks with several bounded sources and several sinks")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("solve")
                .about("Solve a flow problem given in the text form")
                .arg(
                    Arg::new("input")
                        .value_name("INPUT")
                        .help("Problem file, or `-` for standard input")
                        .default_value("-"),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .value_name("FILE")
                        .help("JSON solver configuration")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("sink-capacity")
                        .long("sink-capacity")
                        .value_name("N")
                        .help("Capacity of every sink to super-sink arc")
                        .value_parser(value_parser!(Capacity)),
                )
                .arg(
                    Arg::new("verify")
                        .long("verify")
                        .help("Check flow invariants after solving")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("dot")
                        .long("dot")
                        .value_name("FILE")
                        .help("Write the solved network as a Graphviz DOT file")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("png")
                        .long("png")
                        .value_name("FILE")
                        .help("Render the solved network to PNG with Graphviz `dot`")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the full solution as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Options {
    Solve(SolveOptions),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolveOptions {
    /// `None` reads standard input
    pub input: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub sink_capacity: Option<Capacity>,
    pub verify: bool,
    pub dot: Option<PathBuf>,
    pub png: Option<PathBuf>,
    pub json: bool,
}

impl Options {
    /// Parse a full argument vector, binary name first
    pub fn parse_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = make_options_parser().try_get_matches_from(args)?;
        match matches.subcommand() {
            Some(("solve", matches)) => {
                let input = matches
                    .get_one::<String>("input")
                    .filter(|input| input.as_str() != "-")
                    .map(PathBuf::from);
                Ok(Options::Solve(SolveOptions {
                    input,
                    config: matches.get_one::<PathBuf>("config").cloned(),
                    sink_capacity: matches.get_one::<Capacity>("sink-capacity").copied(),
                    verify: matches.get_flag("verify"),
                    dot: matches.get_one::<PathBuf>("dot").cloned(),
                    png: matches.get_one::<PathBuf>("png").cloned(),
                    json: matches.get_flag("json"),
                }))
            }
            _ => Err(make_options_parser().error(
                clap::error::ErrorKind::MissingSubcommand,
                "a subcommand is required",
            )),
        }
    }
}

impl SolveOptions {
    /// Configuration file values with command-line overrides applied
    pub fn solver_config(&self) -> ConfigResult<SolverConfig> {
        let mut config = match &self.config {
            Some(path) => SolverConfig::from_file(path)?,
            None => SolverConfig::default(),
        };
        if let Some(sink_capacity) = self.sink_capacity {
            config.sink_capacity = sink_capacity;
        }
        if self.verify {
            config.verify_invariants = true;
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solve(args: &[&str]) -> SolveOptions {
        let args = std::iter::once("flowscope").chain(args.iter().copied());
        match Options::parse_from_args(args).unwrap() {
            Options::Solve(options) => options,
        }
    }

    #[test]
    fn test_solve_defaults_to_stdin() {
        let options = solve(&["solve"]);
        assert_eq!(options, SolveOptions::default());
    }

    #[test]
    fn test_solve_with_all_flags() {
        let options = solve(&[
            "solve",
            "problem.txt",
            "--config",
            "flow.json",
            "--sink-capacity",
            "42",
            "--verify",
            "--dot",
            "out.dot",
            "--png",
            "out.png",
            "--json",
        ]);

        assert_eq!(options.input, Some(PathBuf::from("problem.txt")));
        assert_eq!(options.config, Some(PathBuf::from("flow.json")));
        assert_eq!(options.sink_capacity, Some(42));
        assert!(options.verify);
        assert_eq!(options.dot, Some(PathBuf::from("out.dot")));
        assert_eq!(options.png, Some(PathBuf::from("out.png")));
        assert!(options.json);
    }

    #[test]
    fn test_parse_errors() {
        assert!(Options::parse_from_args(["flowscope"]).is_err());
        assert!(Options::parse_from_args(["flowscope", "frobnicate"]).is_err());
        let args = ["flowscope", "solve", "--sink-capacity", "lots"];
        assert!(Options::parse_from_args(args).is_err());
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let options = SolveOptions {
            sink_capacity: Some(7),
            verify: true,
            ..SolveOptions::default()
        };
        let config = options.solver_config().unwrap();

        assert_eq!(config.sink_capacity, 7);
        assert!(config.verify_invariants);
        assert!(!config.log_augmentations);
    }

    #[test]
    fn test_negative_override_rejected() {
        let options = SolveOptions {
            sink_capacity: Some(-1),
            ..SolveOptions::default()
        };
        assert!(options.solver_config().is_err());
    }
}
