mod config;
mod logging;

use std::env;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use clap::error::ErrorKind;
use oscal_cli_core::{Dispatcher, ErrorCategory, ExitStatus, build_command_tree};
use oscal_cli_engine::OscalEngine;
use tracing::debug;

use crate::config::{CONFIG_ENV, CliConfig};

const PROGRAM: &str = "oscal-cli";

/// Global options. Everything from the first command token on is handed to
/// the dispatcher untouched.
#[derive(Debug, Parser)]
#[command(name = PROGRAM, version)]
#[command(about = "Validate and convert OSCAL documents between JSON and YAML")]
#[command(disable_help_flag = true, disable_help_subcommand = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
    /// Configuration file (default: $OSCAL_CLI_CONFIG, then ./.oscal-cli.yml).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Command path followed by the command's own arguments.
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    command: Vec<String>,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            let status = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitStatus::SUCCESS,
                _ => ExitStatus::from(ErrorCategory::Usage),
            };
            process::exit(status.code());
        }
    };
    process::exit(run(cli).code());
}

fn run(cli: Cli) -> ExitStatus {
    let working_dir = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let config =
        match CliConfig::discover(cli.config.as_deref(), env::var_os(CONFIG_ENV), &working_dir) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("error: {err}");
                return ExitStatus::from(err.category());
            }
        };
    logging::init(cli.verbose, cli.quiet, config.logging.level);
    debug!(?config, "Configuration loaded");

    let engine = OscalEngine::new();
    let tree = match build_command_tree(PROGRAM, &engine) {
        Ok(tree) => tree,
        Err(err) => {
            eprintln!("error: invalid command tree: {err}");
            return ExitStatus::from(err.category());
        }
    };

    Dispatcher::new(&tree, &engine)
        .with_defaults(config.to_defaults())
        .with_working_dir(working_dir)
        .dispatch(&cli.command)
}
