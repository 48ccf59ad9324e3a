use crate::core::Result;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Deterministic walk of one directory tree for files of one extension.
pub struct FileWalker {
    root: PathBuf,
    extension: String,
}

impl FileWalker {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            extension: "py".to_string(),
        }
    }

    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Files sorted by path, so ordinals and reports are reproducible.
    /// A missing root yields no files.
    pub fn walk(&self) -> Result<Vec<PathBuf>> {
        if !self.root.exists() {
            warn!(root = %self.root.display(), "Directory does not exist; nothing to collect");
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();

            if entry.file_type().is_file() && self.should_process(path) {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }

    fn should_process(&self, path: &Path) -> bool {
        path.extension()
            .is_some_and(|ext| ext.to_string_lossy() == self.extension)
    }
}

pub fn find_files(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    FileWalker::new(root.to_path_buf())
        .with_extension(extension)
        .walk()
}
