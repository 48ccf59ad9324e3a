use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// The `structlint` table as written in a configuration file.
///
/// Every value is optional; an absent key means "use the default", never
/// "falsy". Defaults are applied when the file is resolved into a
/// [`super::Configuration`].
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StructlintConfig {
    /// Importable package name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_name: Option<String>,

    /// Directory holding the package sources, relative to the project root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_root_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs: Option<DocsSection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests: Option<TestsSection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub methods: Option<MethodsSection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imports: Option<ImportsSection>,
}

/// `allow_additional`: `true` allows everything, `false` nothing, a string
/// is a pattern.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AllowAdditional {
    Flag(bool),
    Pattern(String),
}

/// Pattern keys shared by the docs and tests sections.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LayoutPatterns {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_additional: Option<AllowAdditional>,

    /// Paths to leave out of the check
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore: Option<String>,

    /// Paths whose classes each get their own file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_per_class: Option<String>,

    /// Directories collapsed into a single file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_per_directory: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace_double_underscore: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DocsSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md_dir: Option<PathBuf>,

    #[serde(flatten)]
    pub patterns: LayoutPatterns,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TestsSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_dir: Option<PathBuf>,

    /// `<stem>_test.py` when true, `test_<stem>.py` when false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_filename_suffix: Option<bool>,

    #[serde(flatten)]
    pub patterns: LayoutPatterns,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MethodsSection {
    /// Rank overrides by builtin label, plus `normal`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub builtins_order: Option<BTreeMap<String, f64>>,

    /// Pattern to rank, in file order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_order: Option<toml::Table>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ImportsSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_allowed_everywhere: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_allowed_everywhere: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_allowed: Option<BTreeMap<String, Vec<String>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_disallowed: Option<BTreeMap<String, Vec<String>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_allowed: Option<BTreeMap<String, Vec<String>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_disallowed: Option<BTreeMap<String, Vec<String>>>,
}

/// The parts of `pyproject.toml` structlint reads.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PyProject {
    #[serde(default)]
    pub project: Option<ProjectTable>,

    #[serde(default)]
    pub tool: Option<ToolTable>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectTable {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ToolTable {
    #[serde(default)]
    pub structlint: Option<StructlintConfig>,
}
