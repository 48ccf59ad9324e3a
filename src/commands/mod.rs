//! CLI command implementations.
//!
//! - **check**: run one or all checks and render the reports
//! - **init**: write a starter `structlint.toml`
//! - **show_config**: print the resolved configuration

pub mod check;
pub mod init;
pub mod show_config;

pub use check::{handle_check, run_checks, CheckConfig, CheckSelection};
pub use init::init_config;
pub use show_config::show_config;
