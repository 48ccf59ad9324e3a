//! Identifier collections built from a directory tree.
//!
//! A collection is built once per check from the extracted definitions of
//! every file under one root. Inheritance is resolved at construction and
//! the collection is read-only afterwards; every view renders canonical
//! identifiers.

pub mod inheritance;

pub use inheritance::{resolve_inherited_methods, INHERITANCE_ROUNDS};

use crate::core::{format_identifier, path_to_wire, Result};
use crate::extraction::{
    extract_documented_objects, extract_python, ExtractedClass, ExtractedFunction,
    MethodSignature, PythonExtraction,
};
use crate::io;
use rayon::prelude::*;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, info_span};

/// A top-level function, or a documented object in a Markdown page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFunction {
    pub path: PathBuf,
    pub ordinal: usize,
    pub name: String,
}

impl SourceFunction {
    pub fn new(path: impl Into<PathBuf>, ordinal: usize, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ordinal,
            name: name.into(),
        }
    }

    pub fn identifier(&self) -> String {
        format_identifier(&self.path, self.ordinal, &self.name)
    }
}

/// A class as declared in its file, before inheritance is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceClass {
    pub path: PathBuf,
    pub ordinal: usize,
    pub name: String,
    pub methods: Vec<String>,
    pub signatures: Vec<MethodSignature>,
    pub superclasses: Vec<String>,
}

impl SourceClass {
    pub fn new(path: impl Into<PathBuf>, ordinal: usize, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ordinal,
            name: name.into(),
            methods: Vec::new(),
            signatures: Vec::new(),
            superclasses: Vec::new(),
        }
    }

    /// Declared methods as `(name, signature text)` pairs.
    pub fn with_methods<I>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, text) in methods {
            if self.methods.contains(&name) {
                continue;
            }
            self.methods.push(name.clone());
            self.signatures.push(MethodSignature { name, text });
        }
        self
    }

    pub fn with_superclasses<I>(mut self, superclasses: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.superclasses.extend(superclasses);
        self
    }

    fn from_extracted(path: &Path, class: ExtractedClass) -> Self {
        Self {
            path: path.to_path_buf(),
            ordinal: class.ordinal,
            name: class.name,
            methods: class.methods,
            signatures: class.signatures,
            superclasses: class.superclasses,
        }
    }

    pub fn identifier(&self) -> String {
        format_identifier(&self.path, self.ordinal, &self.name)
    }
}

/// A class together with its effective (own plus inherited) method names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedClass {
    pub class: SourceClass,
    pub methods: Vec<String>,
}

/// All functions and classes found under one root.
#[derive(Debug, Clone, Default)]
pub struct IdentifierCollection {
    functions: Vec<SourceFunction>,
    classes: Vec<ResolvedClass>,
}

impl IdentifierCollection {
    pub fn new(functions: Vec<SourceFunction>, classes: Vec<SourceClass>) -> Self {
        let effective = resolve_inherited_methods(&classes);
        let classes = classes
            .into_iter()
            .zip(effective)
            .map(|(class, methods)| ResolvedClass { class, methods })
            .collect();
        Self { functions, classes }
    }

    pub fn functions(&self) -> &[SourceFunction] {
        &self.functions
    }

    pub fn classes(&self) -> &[ResolvedClass] {
        &self.classes
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty() && self.classes.is_empty()
    }

    pub fn function_identifiers(&self) -> Vec<String> {
        self.functions.iter().map(SourceFunction::identifier).collect()
    }

    /// `Class.method` identifiers, classes in path order, methods in
    /// resolved order.
    pub fn method_identifiers(&self) -> Vec<String> {
        self.classes_by_path()
            .into_iter()
            .flat_map(|resolved| {
                let class = &resolved.class;
                resolved.methods.iter().map(move |method| {
                    format_identifier(
                        &class.path,
                        class.ordinal,
                        &format!("{}.{}", class.name, method),
                    )
                })
            })
            .collect()
    }

    /// Methods followed by functions.
    pub fn identifiers(&self) -> Vec<String> {
        let mut all = self.method_identifiers();
        all.extend(self.function_identifiers());
        all
    }

    /// One identifier per class, sorted by path, without duplicates.
    pub fn class_identifiers(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.classes.iter().map(|c| c.class.identifier()).collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Classes followed by functions.
    pub fn identifiers_without_methods(&self) -> Vec<String> {
        let mut all = self.class_identifiers();
        all.extend(self.function_identifiers());
        all
    }

    /// Classes with no own or inherited methods.
    pub fn methodless_identifiers(&self) -> Vec<String> {
        self.classes
            .iter()
            .filter(|c| c.methods.is_empty())
            .map(|c| c.class.identifier())
            .collect()
    }

    /// Project identifiers with `project`, dropping empty projections.
    ///
    /// Identifiers whose path matches `ignore` are skipped. With
    /// `classes_only`, classes stand in for their methods. The first
    /// projection error aborts the whole application.
    pub fn apply<F>(
        &self,
        mut project: F,
        ignore: Option<&Regex>,
        classes_only: bool,
    ) -> Result<Vec<String>>
    where
        F: FnMut(&str) -> Result<String>,
    {
        let identifiers = if classes_only {
            self.identifiers_without_methods()
        } else {
            self.identifiers()
        };

        let mut projected = Vec::with_capacity(identifiers.len());
        for identifier in identifiers.iter().filter(|id| !is_ignored(id, ignore)) {
            let target = project(identifier)?;
            if !target.is_empty() {
                projected.push(target);
            }
        }
        Ok(projected)
    }

    fn classes_by_path(&self) -> Vec<&ResolvedClass> {
        let mut classes: Vec<&ResolvedClass> = self.classes.iter().collect();
        classes.sort_by(|a, b| a.class.path.cmp(&b.class.path));
        classes
    }
}

fn is_ignored(identifier: &str, ignore: Option<&Regex>) -> bool {
    let Some(pattern) = ignore else {
        return false;
    };
    let path = identifier.split(':').next().unwrap_or(identifier);
    pattern.is_match(path)
}

/// Resolve a configured root against the project root.
fn absolute_root(root: &Path, project_root: &Path) -> PathBuf {
    if root.is_absolute() {
        root.to_path_buf()
    } else {
        project_root.join(root)
    }
}

/// Read every listed file in parallel, keeping walk order.
fn read_all<T, F>(files: &[PathBuf], project_root: &Path, parse: F) -> Result<Vec<(PathBuf, T)>>
where
    T: Send,
    F: Fn(&str) -> T + Sync,
{
    files
        .par_iter()
        .map(|file| {
            let text = io::read_file(file)?;
            Ok((io::relative_to(file, project_root), parse(&text)))
        })
        .collect()
}

/// Collect functions and classes from every `.py` file under `source_root`.
/// Identifier paths are relative to `project_root`.
pub fn collect_source(source_root: &Path, project_root: &Path) -> Result<IdentifierCollection> {
    let root = absolute_root(source_root, project_root);
    let _span = info_span!("collect_source", root = %path_to_wire(&root)).entered();

    let files = io::find_files(&root, "py")?;
    let extracted: Vec<(PathBuf, PythonExtraction)> =
        read_all(&files, project_root, extract_python)?;

    let mut functions = Vec::new();
    let mut classes = Vec::new();
    for (path, extraction) in extracted {
        functions.extend(
            extraction
                .functions
                .into_iter()
                .map(|f| SourceFunction::new(path.clone(), f.ordinal, f.name)),
        );
        classes.extend(
            extraction
                .classes
                .into_iter()
                .map(|c| SourceClass::from_extracted(&path, c)),
        );
    }

    debug!(
        files = files.len(),
        functions = functions.len(),
        classes = classes.len(),
        "Collected source definitions"
    );
    Ok(IdentifierCollection::new(functions, classes))
}

/// Collect documented objects from every `.md` file under `docs_root`.
pub fn collect_docs(docs_root: &Path, project_root: &Path) -> Result<IdentifierCollection> {
    let root = absolute_root(docs_root, project_root);
    let _span = info_span!("collect_docs", root = %path_to_wire(&root)).entered();

    let files = io::find_files(&root, "md")?;
    let extracted: Vec<(PathBuf, Vec<ExtractedFunction>)> =
        read_all(&files, project_root, extract_documented_objects)?;

    let functions: Vec<SourceFunction> = extracted
        .into_iter()
        .flat_map(|(path, objects)| {
            objects
                .into_iter()
                .map(move |o| SourceFunction::new(path.clone(), o.ordinal, o.name))
        })
        .collect();

    debug!(files = files.len(), objects = functions.len(), "Collected documented objects");
    Ok(IdentifierCollection::new(functions, Vec::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn sample() -> IdentifierCollection {
        let functions = vec![
            SourceFunction::new("src/pkg/util.py", 0, "helper"),
            SourceFunction::new("src/pkg/a.py", 2, "run"),
        ];
        let classes = vec![
            SourceClass::new("src/pkg/b.py", 0, "Child")
                .with_methods([("child".to_string(), "def child(self)".to_string())])
                .with_superclasses(["Base".to_string()]),
            SourceClass::new("src/pkg/a.py", 0, "Base")
                .with_methods([("base".to_string(), "def base(self)".to_string())]),
            SourceClass::new("src/pkg/a.py", 1, "Empty"),
        ];
        IdentifierCollection::new(functions, classes)
    }

    #[test]
    fn test_method_identifiers_sorted_by_path_and_resolved() {
        assert_eq!(
            sample().method_identifiers(),
            vec![
                "src/pkg/a.py:000:Base.base",
                "src/pkg/b.py:000:Child.child",
                "src/pkg/b.py:000:Child.base",
            ]
        );
    }

    #[test]
    fn test_identifiers_put_methods_before_functions() {
        let ids = sample().identifiers();
        assert_eq!(ids.len(), 5);
        assert_eq!(ids[3], "src/pkg/util.py:000:helper");
        assert_eq!(ids[4], "src/pkg/a.py:002:run");
    }

    #[test]
    fn test_class_views() {
        let collection = sample();
        assert_eq!(
            collection.class_identifiers(),
            vec![
                "src/pkg/a.py:000:Base",
                "src/pkg/a.py:001:Empty",
                "src/pkg/b.py:000:Child",
            ]
        );
        assert_eq!(collection.methodless_identifiers(), vec!["src/pkg/a.py:001:Empty"]);
        assert_eq!(collection.identifiers_without_methods().len(), 5);
    }

    #[test]
    fn test_apply_drops_empty_and_ignored() {
        let collection = sample();
        let ignore = Regex::new("util").unwrap();
        let projected = collection
            .apply(
                |id| Ok(if id.ends_with("Empty") { String::new() } else { id.to_uppercase() }),
                Some(&ignore),
                true,
            )
            .unwrap();
        assert_eq!(
            projected,
            vec!["SRC/PKG/A.PY:000:BASE", "SRC/PKG/B.PY:000:CHILD", "SRC/PKG/A.PY:002:RUN"]
        );
    }

    #[test]
    fn test_apply_ignore_only_looks_at_path() {
        let collection = sample();
        let ignore = Regex::new("helper").unwrap();
        let projected = collection.apply(|id| Ok(id.to_string()), Some(&ignore), true).unwrap();
        assert!(projected.contains(&"src/pkg/util.py:000:helper".to_string()));
    }

    #[test]
    fn test_apply_propagates_errors() {
        let result = sample().apply(
            |id| Err(crate::core::Error::MalformedIdentifier(id.to_string())),
            None,
            false,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_collect_source_from_tree() {
        let dir = TempDir::new().unwrap();
        let pkg = dir.path().join("src/pkg");
        fs::create_dir_all(&pkg).unwrap();
        fs::write(
            pkg.join("mod.py"),
            "class Thing:\n    def __init__(self):\n        pass\n\n    def run(self):\n        pass\n\n\ndef helper():\n    pass\n",
        )
        .unwrap();

        let collection = collect_source(Path::new("src/pkg"), dir.path()).unwrap();
        assert_eq!(
            collection.identifiers(),
            vec![
                "src/pkg/mod.py:000:Thing.__init__",
                "src/pkg/mod.py:000:Thing.run",
                "src/pkg/mod.py:001:helper",
            ]
        );
    }

    #[test]
    fn test_collect_docs_from_tree() {
        let dir = TempDir::new().unwrap();
        let md = dir.path().join("docs/md/pkg");
        fs::create_dir_all(&md).unwrap();
        fs::write(md.join("mod.md"), "# pkg.mod\n\n## ::: pkg.mod.Thing\n\n## ::: pkg.mod.helper\n").unwrap();

        let collection = collect_docs(Path::new("docs/md"), dir.path()).unwrap();
        assert_eq!(
            collection.identifiers_without_methods(),
            vec!["docs/md/pkg/mod.md:000:Thing", "docs/md/pkg/mod.md:001:helper"]
        );
    }

    #[test]
    fn test_missing_root_yields_empty_collection() {
        let dir = TempDir::new().unwrap();
        let collection = collect_source(Path::new("src/absent"), dir.path()).unwrap();
        assert!(collection.is_empty());
    }
}
