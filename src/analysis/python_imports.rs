//! Python import graph built from `import` statements.
//!
//! A line scanner rather than a parser: it recognises
//! - plain imports (`import a.b`, `import a as b, c`)
//! - from-imports (`from a.b import c`), including parenthesised lists
//!   spanning several lines
//! - relative imports (`from . import x`, `from ..a import y`)
//!
//! Imports nested in functions or conditional blocks count like top-level
//! ones. Names imported from a package resolve to the submodule when one
//! exists, else to the package.

use super::imports::ImportGraph;
use crate::core::Result;
use crate::extraction::neutralize;
use crate::io;
use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::Path;
use tracing::{debug, info_span};

static PLAIN_IMPORT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*import\s+(.+)$").unwrap());
static FROM_IMPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*from\s+(\.*)([\w.]*)\s+import\s+(.+)$").unwrap());

/// One import statement, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportStatement {
    /// `import module`
    Direct { module: String },
    /// `from module import names`, with `level` leading dots
    From {
        level: usize,
        module: String,
        names: Vec<String>,
    },
}

/// Scan one module's text for import statements.
pub fn scan_imports(source: &str) -> Vec<ImportStatement> {
    let source = neutralize(source);
    let mut statements = Vec::new();
    let mut lines = source.lines();

    while let Some(line) = lines.next() {
        let line = strip_comment(line);
        if let Some(caps) = FROM_IMPORT.captures(line) {
            let mut names = caps[3].to_string();
            if names.contains('(') && !names.contains(')') {
                for continuation in lines.by_ref() {
                    let continuation = strip_comment(continuation);
                    names.push(' ');
                    names.push_str(continuation);
                    if continuation.contains(')') {
                        break;
                    }
                }
            }
            statements.push(ImportStatement::From {
                level: caps[1].len(),
                module: caps[2].to_string(),
                names: split_names(&names),
            });
        } else if let Some(caps) = PLAIN_IMPORT.captures(line) {
            statements.extend(
                split_names(&caps[1])
                    .into_iter()
                    .map(|module| ImportStatement::Direct { module }),
            );
        }
    }

    statements
}

fn strip_comment(line: &str) -> &str {
    line.split('#').next().unwrap_or(line).trim_end()
}

/// `a as b, (c, d)` becomes `[a, c, d]`.
fn split_names(list: &str) -> Vec<String> {
    list.trim_end_matches('\\')
        .split(',')
        .map(|part| part.trim().trim_matches(|c| c == '(' || c == ')').trim())
        .filter_map(|part| part.split_whitespace().next())
        .filter(|name| *name != "*")
        .map(str::to_string)
        .collect()
}

/// Import graph over one package's modules, optionally with one node per
/// external top-level package.
#[derive(Debug, Clone, Default)]
pub struct PythonImportGraph {
    adjacency: BTreeMap<String, BTreeSet<String>>,
    packages: BTreeSet<String>,
}

impl PythonImportGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_module(&mut self, module: String) {
        self.adjacency.entry(module).or_default();
    }

    pub fn add_dependency(&mut self, from: String, to: String) {
        if from == to {
            return;
        }
        self.add_module(to.clone());
        self.adjacency.entry(from).or_default().insert(to);
    }

    pub fn module_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn dependency_count(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).sum()
    }

    /// Scan every `.py` file under `module_root`, naming modules under
    /// `package`.
    pub fn build(module_root: &Path, package: &str, include_external: bool) -> Result<Self> {
        let _span = info_span!("build_import_graph", package, include_external).entered();

        let files = io::find_files(module_root, "py")?;
        let scanned: Vec<(String, bool, Vec<ImportStatement>)> = files
            .par_iter()
            .map(|file| {
                let text = io::read_file(file)?;
                let (name, is_package) = module_name(module_root, file, package);
                Ok((name, is_package, scan_imports(&text)))
            })
            .collect::<Result<_>>()?;

        let mut graph = Self::new();
        for (name, is_package, _) in &scanned {
            graph.add_module(name.clone());
            if *is_package {
                graph.packages.insert(name.clone());
            }
        }
        let internal: BTreeSet<String> = graph.adjacency.keys().cloned().collect();

        for (name, is_package, statements) in scanned {
            for target in statements
                .iter()
                .flat_map(|s| resolve(s, &name, is_package, &internal))
            {
                if internal.contains(&target) {
                    graph.add_dependency(name.clone(), target);
                } else if include_external {
                    let top = target.split('.').next().unwrap_or(&target).to_string();
                    if !top.is_empty() && top != package {
                        graph.add_dependency(name.clone(), top);
                    }
                }
            }
        }

        debug!(
            modules = graph.module_count(),
            imports = graph.dependency_count(),
            "Built import graph"
        );
        Ok(graph)
    }
}

impl ImportGraph for PythonImportGraph {
    fn modules(&self) -> BTreeSet<String> {
        self.adjacency.keys().cloned().collect()
    }

    fn upstream_modules(&self, module: &str) -> BTreeSet<String> {
        let mut seen = BTreeSet::new();
        let mut queue: VecDeque<&str> = VecDeque::from([module]);

        while let Some(current) = queue.pop_front() {
            for next in self.adjacency.get(current).into_iter().flatten() {
                if next != module && seen.insert(next.clone()) {
                    queue.push_back(next);
                }
            }
        }

        seen
    }

    fn contains(&self, module: &str) -> bool {
        self.adjacency.contains_key(module)
    }
}

/// Dotted module name for `file`, and whether it is a package `__init__`.
fn module_name(module_root: &Path, file: &Path, package: &str) -> (String, bool) {
    let relative = file.strip_prefix(module_root).unwrap_or(file);
    let mut parts: Vec<String> = vec![package.to_string()];
    parts.extend(
        relative
            .with_extension("")
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );

    let is_package = parts.last().is_some_and(|last| last == "__init__");
    if is_package {
        parts.pop();
    }
    (parts.join("."), is_package)
}

/// Candidate module names an import statement refers to.
fn resolve(
    statement: &ImportStatement,
    importer: &str,
    importer_is_package: bool,
    internal: &BTreeSet<String>,
) -> Vec<String> {
    match statement {
        ImportStatement::Direct { module } => vec![longest_known_prefix(module, internal)],
        ImportStatement::From {
            level,
            module,
            names,
        } => {
            let base = if *level == 0 {
                module.clone()
            } else {
                let Some(anchor) = relative_anchor(importer, importer_is_package, *level) else {
                    return Vec::new();
                };
                [anchor, module.clone()]
                    .into_iter()
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
                    .join(".")
            };

            let submodules: Vec<String> = names
                .iter()
                .map(|name| format!("{base}.{name}"))
                .filter(|candidate| internal.contains(candidate))
                .collect();

            if submodules.is_empty() {
                vec![longest_known_prefix(&base, internal)]
            } else {
                submodules
            }
        }
    }
}

/// The package a relative import with `level` dots is anchored at.
fn relative_anchor(importer: &str, importer_is_package: bool, level: usize) -> Option<String> {
    let mut parts: Vec<&str> = importer.split('.').collect();
    let strip = if importer_is_package { level - 1 } else { level };
    if strip >= parts.len() {
        return None;
    }
    parts.truncate(parts.len() - strip);
    Some(parts.join("."))
}

/// The longest dotted prefix of `name` that is a known module, else `name`.
fn longest_known_prefix(name: &str, internal: &BTreeSet<String>) -> String {
    let mut candidate = name;
    loop {
        if internal.contains(candidate) {
            return candidate.to_string();
        }
        match candidate.rsplit_once('.') {
            Some((parent, _)) => candidate = parent,
            None => return name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_imports() {
        let source = indoc! {r#"
            """Module docs: import nothing from here."""
            import os, sys as system
            from pathlib import Path
            from . import sibling  # trailing
            from ..core import (
                errors,
                identifier,
            )

            def f():
                import json
        "#};
        assert_eq!(
            scan_imports(source),
            vec![
                ImportStatement::Direct { module: "os".into() },
                ImportStatement::Direct { module: "sys".into() },
                ImportStatement::From {
                    level: 0,
                    module: "pathlib".into(),
                    names: vec!["Path".into()]
                },
                ImportStatement::From {
                    level: 1,
                    module: "".into(),
                    names: vec!["sibling".into()]
                },
                ImportStatement::From {
                    level: 2,
                    module: "core".into(),
                    names: vec!["errors".into(), "identifier".into()]
                },
                ImportStatement::Direct { module: "json".into() },
            ]
        );
    }

    #[test]
    fn test_relative_anchor() {
        assert_eq!(relative_anchor("pkg.sub.mod", false, 1), Some("pkg.sub".into()));
        assert_eq!(relative_anchor("pkg.sub.mod", false, 2), Some("pkg".into()));
        assert_eq!(relative_anchor("pkg.sub", true, 1), Some("pkg.sub".into()));
        assert_eq!(relative_anchor("pkg", false, 3), None);
    }

    fn write_package(dir: &Path) {
        let root = dir.join("src/pkg");
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("__init__.py"), "").unwrap();
        fs::write(root.join("utils.py"), "import re\n").unwrap();
        fs::write(root.join("sub/__init__.py"), "from . import deep\n").unwrap();
        fs::write(root.join("sub/deep.py"), "from ..utils import helper\n").unwrap();
        fs::write(
            root.join("cli.py"),
            "import click\nfrom pkg.sub import deep\nfrom pkg import utils\n",
        )
        .unwrap();
    }

    #[test]
    fn test_build_internal_graph() {
        let dir = TempDir::new().unwrap();
        write_package(dir.path());
        let graph = PythonImportGraph::build(&dir.path().join("src/pkg"), "pkg", false).unwrap();

        assert_eq!(
            graph.modules(),
            ["pkg", "pkg.cli", "pkg.sub", "pkg.sub.deep", "pkg.utils"]
                .into_iter()
                .map(String::from)
                .collect::<BTreeSet<_>>()
        );
        assert_eq!(
            graph.upstream_modules("pkg.cli"),
            ["pkg.sub.deep", "pkg.utils"]
                .into_iter()
                .map(String::from)
                .collect::<BTreeSet<_>>()
        );
        assert_eq!(
            graph.upstream_modules("pkg.sub"),
            ["pkg.sub.deep", "pkg.utils"]
                .into_iter()
                .map(String::from)
                .collect::<BTreeSet<_>>()
        );
    }

    #[test]
    fn test_build_with_external_packages() {
        let dir = TempDir::new().unwrap();
        write_package(dir.path());
        let graph = PythonImportGraph::build(&dir.path().join("src/pkg"), "pkg", true).unwrap();

        assert!(graph.contains("click"));
        assert!(graph.contains("re"));
        assert!(graph.upstream_modules("pkg.cli").contains("re"));
    }
}
