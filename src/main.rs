mod camera;
mod commands;
mod graph;
mod highlight;
mod parser;
mod pathway;
mod search;
mod session;
mod teaching;
mod tooltip;
mod tui;
mod view;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::parser::config;

const LOG_ENV: &str = "PATHMAP_LOG";

#[derive(Parser)]
#[command(
    name = "pathmap",
    about = "Interactive map of a biochemical reaction network"
)]
struct Cli {
    /// Reaction network JSON (defaults to the built-in dataset)
    #[arg(long, global = true, value_name = "PATH")]
    dataset: Option<PathBuf>,
    /// Settings file (defaults to $PATHMAP_CONFIG, then ./pathmap.conf)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open the interactive map
    View {
        /// Start in teaching mode (playback and quiz)
        #[arg(long)]
        teaching: bool,
    },
    /// List reactions grouped by pathway
    List,
    /// Search nodes and reactions by name, formula, EC number or exam note
    Search {
        query: String,
    },
    /// Query the loaded network
    #[command(
        group(
            ArgGroup::new("inspect_query")
                .args(["dropped", "node", "edge"])
                .required(true)
                .multiple(false)
        )
    )]
    Inspect {
        /// List reactions dropped at load because an endpoint is missing
        #[arg(long)]
        dropped: bool,
        /// Show a node and every reaction touching it
        #[arg(long, value_name = "ID")]
        node: Option<String>,
        /// Show one reaction in full, including its exam note
        #[arg(long, value_name = "INDEX")]
        edge: Option<usize>,
    },
    /// Open the TUI settings panel
    Setup,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let (cfg, config_path) = config::load(cli.config.as_deref())?;

    let interactive = matches!(cli.command, Command::View { .. } | Command::Setup);
    init_tracing(interactive.then(|| cfg.log_path()).as_deref())?;

    let dataset = cli.dataset.as_deref();
    match cli.command {
        Command::View { teaching } => commands::view::run(dataset, cfg, config_path, teaching),
        Command::List => commands::list::run(dataset),
        Command::Search { query } => commands::search::run(dataset, &query),
        Command::Inspect {
            dropped,
            node,
            edge,
        } => {
            if dropped {
                commands::inspect::run_dropped(dataset)
            } else if let Some(id) = node {
                commands::inspect::run_node(dataset, &id)
            } else if let Some(index) = edge {
                commands::inspect::run_edge(dataset, index)
            } else {
                eprintln!("Specify one of: --dropped, --node <id>, --edge <index>");
                Ok(())
            }
        }
        Command::Setup => commands::view::run_setup(dataset, cfg, config_path),
    }
}

/// Log to stderr, or to `log_file` while the terminal is in the alternate screen.
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| "pathmap=warn".into());
    let registry = tracing_subscriber::registry().with(filter);
    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            registry
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .init();
        }
        None => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn inspect_rejects_multiple_query_flags() {
        let parsed = Cli::try_parse_from(["pathmap", "inspect", "--dropped", "--edge", "3"]);
        assert!(
            parsed.is_err(),
            "inspect flags should be mutually exclusive"
        );
        let err = parsed.err().expect("expected clap parse error");
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn inspect_requires_a_query_flag() {
        let parsed = Cli::try_parse_from(["pathmap", "inspect"]);
        let err = parsed.err().expect("expected clap parse error");
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn inspect_accepts_single_query_flag() {
        let cli = Cli::try_parse_from(["pathmap", "inspect", "--node", "pfk"])
            .expect("single inspect flag should parse");
        match cli.command {
            Command::Inspect { node, dropped, .. } => {
                assert_eq!(node.as_deref(), Some("pfk"));
                assert!(!dropped);
            }
            _ => panic!("expected inspect command"),
        }
    }

    #[test]
    fn global_options_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "pathmap",
            "view",
            "--teaching",
            "--dataset",
            "net.json",
            "--config",
            "my.conf",
        ])
        .expect("view with global options should parse");
        assert_eq!(cli.dataset, Some(PathBuf::from("net.json")));
        assert_eq!(cli.config, Some(PathBuf::from("my.conf")));
        assert!(matches!(cli.command, Command::View { teaching: true }));
    }

    #[test]
    fn search_takes_a_positional_query() {
        let cli = Cli::try_parse_from(["pathmap", "search", "ATP"]).expect("search should parse");
        match cli.command {
            Command::Search { query } => assert_eq!(query, "ATP"),
            _ => panic!("expected search command"),
        }
    }
}
