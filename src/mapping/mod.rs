//! Projection of source identifiers into the identifiers expected in a
//! parallel tree.
//!
//! Every source identifier has exactly one expected counterpart in the test
//! tree and one in the documentation tree, or none at all (an empty string).
//! The projection is pure: path relocation, at most one restructuring rule,
//! filename conventions, then name conventions.

pub mod paths;

pub use paths::{doc_filename, fix_dunder_filename, move_path, path_matches, test_filename};

use crate::core::{
    is_dunder, path_to_wire, Error, ParsedIdentifier, QualifiedName, Result, ORDINAL_WIDTH,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

static UNDERSCORE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"__+").unwrap());

/// Which parallel tree identifiers are projected into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Tests,
    Docs,
}

/// Rules for one target tree.
#[derive(Debug, Clone)]
pub struct MappingRules {
    pub project_root: PathBuf,
    pub source_root: PathBuf,
    pub target_root: PathBuf,
    /// `<stem>_test.py` when set, `test_<stem>.py` otherwise
    pub use_suffix_convention: bool,
    pub file_per_class: Option<Regex>,
    pub file_per_directory: Option<Regex>,
    pub collapse_double_underscores: bool,
}

impl MappingRules {
    pub fn new(source_root: impl Into<PathBuf>, target_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: PathBuf::new(),
            source_root: source_root.into(),
            target_root: target_root.into(),
            use_suffix_convention: true,
            file_per_class: None,
            file_per_directory: None,
            collapse_double_underscores: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NamingMapper {
    kind: TargetKind,
    rules: MappingRules,
}

impl NamingMapper {
    pub fn new(kind: TargetKind, rules: MappingRules) -> Self {
        Self { kind, rules }
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    /// The identifier expected in the target tree, or `""` when the source
    /// identifier has no counterpart there.
    pub fn map_to_target(&self, identifier: &str) -> Result<String> {
        let parsed = ParsedIdentifier::parse(identifier)?;
        let qualified = parsed.qualified_name();

        let Some(name) = self.target_name(qualified) else {
            return Ok(String::new());
        };

        let path = self.relocate(Path::new(parsed.path))?;
        let path = self.restructure(path, qualified);
        let path = match self.kind {
            TargetKind::Tests => test_filename(&path, self.rules.use_suffix_convention),
            TargetKind::Docs => doc_filename(&path),
        };

        let mapped = format!(
            "{}:{:0>width$}:{}",
            path_to_wire(&path),
            parsed.ordinal,
            name,
            width = ORDINAL_WIDTH
        );

        if self.rules.collapse_double_underscores {
            Ok(UNDERSCORE_RUN.replace_all(&mapped, "_").into_owned())
        } else {
            Ok(mapped)
        }
    }

    fn target_name(&self, qualified: QualifiedName<'_>) -> Option<String> {
        match (self.kind, qualified) {
            (TargetKind::Tests, QualifiedName::Method { class, method }) => {
                Some(format!("Test{class}.{}", test_method_name(method)))
            }
            (TargetKind::Docs, QualifiedName::Method { class, .. }) => Some(class.to_string()),
            (TargetKind::Tests, bare @ QualifiedName::Bare(name)) => {
                bare.class_name().is_none().then(|| format!("test_{name}"))
            }
            (TargetKind::Docs, QualifiedName::Bare(name)) => Some(name.to_string()),
        }
    }

    fn relocate(&self, path: &Path) -> Result<PathBuf> {
        let moved = move_path(path, &self.rules.source_root, &self.rules.target_root)?;
        if moved.is_absolute() {
            return moved
                .strip_prefix(&self.rules.project_root)
                .map(Path::to_path_buf)
                .map_err(|_| Error::PathRelocation {
                    path: moved.clone(),
                    base: self.rules.project_root.clone(),
                });
        }
        Ok(moved)
    }

    fn restructure(&self, path: PathBuf, qualified: QualifiedName<'_>) -> PathBuf {
        if let (Some(class), Some(pattern)) = (qualified.class_name(), &self.rules.file_per_class) {
            if path_matches(&path, pattern).is_some() {
                let stem = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                return path.with_file_name(stem).join(class.to_lowercase());
            }
        }

        self.rules
            .file_per_directory
            .as_ref()
            .and_then(|pattern| path_matches(&path, pattern))
            .unwrap_or(path)
    }
}

/// `test_<name>`, or `test_dunder_<core>` for `__x__` methods.
pub fn test_method_name(method: &str) -> String {
    if is_dunder(method) {
        format!("test_dunder_{}", &method[2..method.len() - 2])
    } else {
        format!("test_{method}")
    }
}

pub fn map_to_test(identifier: &str, rules: &MappingRules) -> Result<String> {
    NamingMapper::new(TargetKind::Tests, rules.clone()).map_to_target(identifier)
}

pub fn map_to_doc(identifier: &str, rules: &MappingRules) -> Result<String> {
    NamingMapper::new(TargetKind::Docs, rules.clone()).map_to_target(identifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn test_rules() -> MappingRules {
        MappingRules {
            project_root: PathBuf::from("/home/frodo/projects/ring"),
            source_root: PathBuf::from("/home/frodo/projects/ring/src/hello_world"),
            target_root: PathBuf::from("tests/unit_tests"),
            use_suffix_convention: true,
            file_per_class: Some(Regex::new("expand_me").unwrap()),
            file_per_directory: Some(Regex::new("collapse_me").unwrap()),
            collapse_double_underscores: true,
        }
    }

    fn doc_rules() -> MappingRules {
        MappingRules {
            target_root: PathBuf::from("docs/markdown"),
            ..test_rules()
        }
    }

    #[test]
    fn test_test_method_name() {
        assert_eq!(test_method_name("some_method"), "test_some_method");
        assert_eq!(test_method_name("__eq__"), "test_dunder_eq");
        assert_eq!(test_method_name("__mangled"), "test___mangled");
    }

    #[test]
    fn test_map_function_to_test() {
        assert_eq!(
            map_to_test("src/hello_world/submodule/file.py:001:greet", &test_rules()).unwrap(),
            "tests/unit_tests/submodule/file_test.py:001:test_greet"
        );
    }

    #[test]
    fn test_map_prefix_convention() {
        let rules = MappingRules {
            use_suffix_convention: false,
            ..test_rules()
        };
        assert_eq!(
            map_to_test("src/hello_world/submodule/file.py:001:greet", &rules).unwrap(),
            "tests/unit_tests/submodule/test_file.py:001:test_greet"
        );
    }

    #[test]
    fn test_bare_class_has_no_test_but_has_doc() {
        assert_eq!(
            map_to_test("src/hello_world/_file.py:001:Greeting", &test_rules()).unwrap(),
            ""
        );
        assert_eq!(
            map_to_doc("src/hello_world/_file.py:001:Greeting", &doc_rules()).unwrap(),
            "docs/markdown/_file.md:001:Greeting"
        );
    }

    #[test]
    fn test_collapse_underscores_over_whole_identifier() {
        assert_eq!(
            map_to_test("src/hello_world/__hello.py:999:__mangled", &test_rules()).unwrap(),
            "tests/unit_tests/_hello_test.py:999:test_mangled"
        );
        assert_eq!(
            map_to_doc("_.py:999:__mangled", &doc_rules()).unwrap(),
            "docs/markdown/_.md:999:_mangled"
        );
    }

    #[test]
    fn test_method_maps_to_class() {
        assert_eq!(
            map_to_doc("path/file.py:001:Greet.greeter", &doc_rules()).unwrap(),
            "docs/markdown/path/file.md:001:Greet"
        );
        assert_eq!(
            map_to_test("path/file.py:001:Greet.__eq__", &test_rules()).unwrap(),
            "tests/unit_tests/path/file_test.py:001:TestGreet.test_dunder_eq"
        );
    }

    #[test]
    fn test_file_per_class() {
        assert_eq!(
            map_to_test("some/expand_me/to/file.py:1:CoolClass.cool_method", &test_rules())
                .unwrap(),
            "tests/unit_tests/some/expand_me/to/file/coolclass_test.py:001:TestCoolClass.test_cool_method"
        );
        assert_eq!(
            map_to_doc("some/expand_me/to/file.py:1:CoolClass", &doc_rules()).unwrap(),
            "docs/markdown/some/expand_me/to/file/coolclass.md:001:CoolClass"
        );
    }

    #[test]
    fn test_file_per_class_skips_functions() {
        assert_eq!(
            map_to_doc("some/expand_me/file.py:003:helper", &doc_rules()).unwrap(),
            "docs/markdown/some/expand_me/file.md:003:helper"
        );
    }

    #[test]
    fn test_file_per_directory() {
        assert_eq!(
            map_to_doc("some/path/collapse_me/to/file.py:2:CoolClass", &doc_rules()).unwrap(),
            "docs/markdown/some/path/collapse_me.md:002:CoolClass"
        );
        assert_eq!(
            map_to_test("some/collapse_me/to/file.py:99:cool_function", &test_rules()).unwrap(),
            "tests/unit_tests/some/collapse_me_test.py:099:test_cool_function"
        );
    }

    #[test]
    fn test_dunder_filenames() {
        let rules = MappingRules::new("src/pkg", "tests/unit");
        assert_eq!(
            map_to_test("src/pkg/__init__.py:000:setup", &rules).unwrap(),
            "tests/unit/init_test.py:000:test_setup"
        );
        let rules = MappingRules::new("src/pkg", "docs/md");
        assert_eq!(
            map_to_doc("src/pkg/sub/__main__.py:000:main", &rules).unwrap(),
            "docs/md/sub/main.md:000:main"
        );
    }

    #[test]
    fn test_malformed_identifier_is_error() {
        let err = map_to_test("no_colons_here", &test_rules()).unwrap_err();
        assert!(matches!(err, Error::MalformedIdentifier(_)));
        assert!(map_to_doc("a:b:c:d", &doc_rules()).is_err());
    }

    #[test]
    fn test_absolute_path_outside_root_is_error() {
        let err = map_to_doc("/unrelated/file.py:000:f", &doc_rules()).unwrap_err();
        assert!(matches!(err, Error::PathRelocation { .. }));
    }
}
