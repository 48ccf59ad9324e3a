//! Path rewriting between a source tree and a target tree.

use crate::core::{path_to_wire, Error, Result};
use regex::Regex;
use std::path::{Component, Path, PathBuf};

/// Move `path` from under `source_root` to under `target_root`.
///
/// A relative path may start partway into the source root (for example
/// `pkg/mod.py` against `src/pkg`); the overlapping segments are joined
/// first. An absolute path outside the source root cannot be relocated.
pub fn move_path(path: &Path, source_root: &Path, target_root: &Path) -> Result<PathBuf> {
    let mut path = path.to_path_buf();
    if path.is_relative() {
        if let Some(joined) = join_on_overlap(source_root, &path) {
            path = joined;
        }
    }

    let relative = match path.strip_prefix(source_root) {
        Ok(rest) => rest.to_path_buf(),
        Err(_) if path.is_absolute() => {
            return Err(Error::PathRelocation {
                path,
                base: source_root.to_path_buf(),
            })
        }
        Err(_) => path,
    };

    Ok(target_root.join(relative))
}

/// Join `path` onto `base` when the last `i` segments of `base` equal the
/// first `i` segments of `path`, taking the smallest such `i`.
fn join_on_overlap(base: &Path, path: &Path) -> Option<PathBuf> {
    let base_parts: Vec<Component> = base.components().collect();
    let path_parts: Vec<Component> = path.components().collect();
    let max_len = base_parts.len().min(path_parts.len());

    (1..max_len)
        .find(|&i| base_parts[base_parts.len() - i..] == path_parts[..i])
        .map(|i| {
            let mut joined = base.to_path_buf();
            joined.extend(&path_parts[i..]);
            joined
        })
}

/// The shortest ancestor of `path` matching `pattern`, else `path` itself
/// if it matches.
pub fn path_matches(path: &Path, pattern: &Regex) -> Option<PathBuf> {
    let mut ancestors: Vec<&Path> = path
        .ancestors()
        .skip(1)
        .filter(|a| !a.as_os_str().is_empty() && *a != Path::new("."))
        .collect();
    ancestors.reverse();

    ancestors
        .into_iter()
        .chain(std::iter::once(path))
        .find(|candidate| pattern.is_match(&path_to_wire(candidate)))
        .map(Path::to_path_buf)
}

/// `__init__.py` and `__main__.py` lose their underscores.
pub fn fix_dunder_filename(path: &Path) -> PathBuf {
    match path.file_name().and_then(|n| n.to_str()) {
        Some("__init__.py") => path.with_file_name("init.py"),
        Some("__main__.py") => path.with_file_name("main.py"),
        _ => path.to_path_buf(),
    }
}

fn stem_of(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.strip_suffix(".py").map(str::to_string).unwrap_or(name)
}

/// Name of the test module for a source module.
pub fn test_filename(path: &Path, use_suffix_convention: bool) -> PathBuf {
    let path = fix_dunder_filename(path);
    let stem = stem_of(&path);
    let name = if use_suffix_convention {
        format!("{stem}_test.py")
    } else {
        format!("test_{stem}.py")
    };
    path.with_file_name(name)
}

/// Name of the documentation page for a source module.
pub fn doc_filename(path: &Path) -> PathBuf {
    let path = fix_dunder_filename(path);
    let stem = stem_of(&path);
    path.with_file_name(format!("{stem}.md"))
}
