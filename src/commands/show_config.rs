use crate::config::Configuration;
use anyhow::Result;
use std::path::Path;
use tracing::debug;

/// The configuration for the project containing `start`, with every
/// default filled in, as `structlint.toml` text.
pub fn show_config(start: &Path, explicit: Option<&Path>) -> Result<String> {
    let configuration = Configuration::discover(start, explicit)?;
    debug!(root = %configuration.root_dir.display(), "Resolved configuration");
    Ok(configuration.to_toml()?)
}
