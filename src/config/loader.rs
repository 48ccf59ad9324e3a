use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::core::{PyProject, StructlintConfig};
use crate::core::{Error, Result};

pub const PYPROJECT_FILE: &str = "pyproject.toml";
pub const STRUCTLINT_FILE: &str = "structlint.toml";

/// Maximum number of directories searched upwards for a project root.
const MAX_TRAVERSAL_DEPTH: usize = 32;

/// A configuration table together with what the project file says about
/// the package.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub table: StructlintConfig,
    /// `[project].name` from `pyproject.toml`, if any
    pub project_name: Option<String>,
    /// File the table came from, `None` when defaults are used
    pub source: Option<PathBuf>,
}

pub(crate) fn read_config_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Parse a `structlint.toml` (top-level keys) or `pyproject.toml`
/// (`[tool.structlint]`) depending on the file name.
pub fn parse_config(path: &Path, contents: &str) -> Result<LoadedConfig> {
    let is_pyproject = path
        .file_name()
        .is_some_and(|name| name == PYPROJECT_FILE);

    let loaded = if is_pyproject {
        let pyproject: PyProject = toml::from_str(contents)?;
        LoadedConfig {
            project_name: pyproject.project.and_then(|p| p.name),
            table: pyproject
                .tool
                .and_then(|t| t.structlint)
                .unwrap_or_default(),
            source: Some(path.to_path_buf()),
        }
    } else {
        LoadedConfig {
            table: toml::from_str(contents)?,
            project_name: None,
            source: Some(path.to_path_buf()),
        }
    };

    Ok(loaded)
}

/// Directories from `start` upwards, at most `max_depth` of them.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Nearest ancestor holding a `pyproject.toml` or `structlint.toml`.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .find(|dir| dir.join(PYPROJECT_FILE).is_file() || dir.join(STRUCTLINT_FILE).is_file())
}

/// Load the configuration for `project_root`.
///
/// An explicit file wins; otherwise `structlint.toml` is preferred over
/// `pyproject.toml`. With neither present, defaults apply. The project
/// name is always taken from `pyproject.toml` when it exists.
pub fn load_config(project_root: &Path, explicit: Option<&Path>) -> Result<LoadedConfig> {
    let pyproject_path = project_root.join(PYPROJECT_FILE);
    let pyproject = if pyproject_path.is_file() {
        Some(parse_config(&pyproject_path, &read_config_file(&pyproject_path)?)?)
    } else {
        None
    };
    let project_name = pyproject.as_ref().and_then(|p| p.project_name.clone());

    let candidate = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => Some(project_root.join(STRUCTLINT_FILE)).filter(|p| p.is_file()),
    };

    let mut loaded = match candidate {
        Some(path) if path == pyproject_path => pyproject.unwrap_or_default(),
        Some(path) => parse_config(&path, &read_config_file(&path)?)?,
        None => pyproject.unwrap_or_default(),
    };

    loaded.project_name = loaded.project_name.or(project_name);
    match &loaded.source {
        Some(source) => debug!(source = %source.display(), "Loaded configuration"),
        None => debug!("No configuration file found; using defaults"),
    }
    Ok(loaded)
}
