//! Command-line interface definition.

pub mod setup;

use crate::commands::CheckSelection;
use crate::io::writers::OutputFormat as WriterFormat;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "structlint")]
#[command(
    about = "Structure linter for Python projects",
    long_about = "Checks method order inside classes, the layout of unit tests and \
                  documentation pages against the package, and import rules. \
                  Runs every check when no command is given."
)]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to structlint.toml, then pyproject.toml)
    #[arg(short, long, global = true, env = "STRUCTLINT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory inside the project to check
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "terminal")]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub plain: bool,

    /// Number of worker threads (0 = all cores)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    pub jobs: usize,

    /// Increase log verbosity (-v info, -vv debug with timings, -vvv trace)
    #[arg(short = 'v', long = "verbose", global = true, action = clap::ArgAction::Count)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run all checks: methods, docs, tests, imports
    All,
    /// Check method order inside classes
    Methods,
    /// Check documentation pages against the package
    Docs,
    /// Check unit tests against the package
    Tests,
    /// Check import rules
    Imports,
    /// Write a starter structlint.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the resolved configuration
    Config,
}

impl Commands {
    /// The checks this command runs, if it runs any.
    pub fn selection(&self) -> Option<CheckSelection> {
        match self {
            Self::All => Some(CheckSelection::All),
            Self::Methods => Some(CheckSelection::Methods),
            Self::Docs => Some(CheckSelection::Docs),
            Self::Tests => Some(CheckSelection::Tests),
            Self::Imports => Some(CheckSelection::Imports),
            Self::Init { .. } | Self::Config => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
}

impl From<OutputFormat> for WriterFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Terminal => WriterFormat::Terminal,
            OutputFormat::Json => WriterFormat::Json,
        }
    }
}
