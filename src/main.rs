use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use structlint::cli::setup::{configure_thread_pool, worker_count};
use structlint::cli::{Cli, Commands};
use structlint::commands::{self, CheckConfig, CheckSelection};
use structlint::formatting::FormattingConfig;
use structlint::observability::init_logging;
use tracing::{debug, error};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbosity);

    match run(cli) {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::from(1),
        Err(e) => {
            error!(error = %e, "structlint failed");
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

/// Returns whether problems were found.
fn run(cli: Cli) -> Result<bool> {
    configure_thread_pool(cli.jobs);
    debug!(workers = worker_count(cli.jobs), "Configured thread pool");

    let command = cli.command.clone().unwrap_or(Commands::All);
    match command {
        Commands::Init { force } => {
            let path = commands::init_config(&cli.root, force)?;
            println!("Created {}", path.display());
            Ok(false)
        }
        Commands::Config => {
            print!("{}", commands::show_config(&cli.root, cli.config.as_deref())?);
            Ok(false)
        }
        other => {
            let selection = other.selection().unwrap_or(CheckSelection::All);
            commands::handle_check(CheckConfig {
                start: cli.root,
                config: cli.config,
                selection,
                format: cli.format.into(),
                output: cli.output,
                formatting: create_formatting_config(cli.plain),
            })
        }
    }
}

fn create_formatting_config(plain: bool) -> FormattingConfig {
    if plain {
        FormattingConfig::plain()
    } else {
        FormattingConfig::from_env()
    }
}
