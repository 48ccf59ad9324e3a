#![allow(dead_code)]

use indoc::indoc;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const PYPROJECT: &str = indoc! {r#"
    [project]
    name = "pkg"
    version = "0.1.0"
"#};

pub const UTIL_SOURCE: &str = indoc! {r#"
    """Utilities."""


    class ClassA:
        """A class."""

        def __init__(self):
            self.value = 1

        def run(self):
            return self.value


    def helper():
        return ClassA()
"#};

pub const UTIL_TESTS: &str = indoc! {r#"
    from pkg.util import ClassA, helper


    class TestClassA:
        def test_dunder_init(self):
            assert ClassA().value == 1

        def test_run(self):
            assert ClassA().run() == 1


    def test_helper():
        assert helper()
"#};

pub const UTIL_DOCS: &str = indoc! {r#"
    # pkg.util

    ## ::: pkg.util.ClassA

    ## ::: pkg.util.helper
"#};

pub fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// A small project whose tests and docs mirror the package exactly.
pub fn clean_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "pyproject.toml", PYPROJECT);
    write(root, "src/pkg/__init__.py", "");
    write(root, "src/pkg/util.py", UTIL_SOURCE);
    write(root, "tests/unit/util_test.py", UTIL_TESTS);
    write(root, "docs/md/util.md", UTIL_DOCS);
    dir
}
