pub mod walker;
pub mod writers;

pub use walker::{find_files, FileWalker};

use crate::core::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Read a file the walk already listed; failing here is fatal.
pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| Error::io(path, e))
}

pub fn file_exists(path: &Path) -> bool {
    path.exists() && path.is_file()
}

/// Express `path` relative to `root` when it lives under it.
pub fn relative_to(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}
