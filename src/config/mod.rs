//! Configuration: file tables ([`core`]), file discovery ([`loader`]) and
//! the resolved [`Configuration`] every check runs against.

mod core;
mod loader;

pub use self::core::{
    AllowAdditional, DocsSection, ImportsSection, LayoutPatterns, MethodsSection, PyProject,
    StructlintConfig, TestsSection,
};
pub use loader::{
    directory_ancestors, find_project_root, load_config, parse_config, LoadedConfig,
    PYPROJECT_FILE, STRUCTLINT_FILE,
};

use crate::analysis::{
    builtin_rules, ImportPolicy, MethodOrdering, ModuleMap, OrderingRule, BUILTIN_RULES,
    NORMAL_RANK,
};
use crate::core::{Error, Result};
use crate::mapping::{MappingRules, TargetKind};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_MD_DIR: &str = "docs/md";
pub const DEFAULT_UNIT_DIR: &str = "tests/unit";

/// Pattern value that never matches.
const MATCH_NOTHING: &str = "(?!)";
const MATCH_EVERYTHING: &str = ".+";

static BACKSLASH_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\+").unwrap());

/// Compile a configured pattern. Runs of backslashes (left over from
/// escaping in TOML) collapse to one; an empty pattern or `(?!)` matches
/// nothing and yields `None`.
pub fn compile_pattern(field: &str, pattern: &str) -> Result<Option<Regex>> {
    let pattern = BACKSLASH_RUN.replace_all(pattern, r"\");
    if pattern.is_empty() || pattern == MATCH_NOTHING {
        return Ok(None);
    }
    Regex::new(&pattern)
        .map(Some)
        .map_err(|e| Error::invalid_pattern(field, pattern.to_string(), e))
}

fn compile_optional(field: &str, pattern: Option<&str>) -> Result<Option<Regex>> {
    pattern.map_or(Ok(None), |p| compile_pattern(field, p))
}

fn compile_allow_additional(
    field: &str,
    value: Option<&AllowAdditional>,
) -> Result<Option<Regex>> {
    match value {
        None | Some(AllowAdditional::Flag(false)) => Ok(None),
        Some(AllowAdditional::Flag(true)) => compile_pattern(field, MATCH_EVERYTHING),
        Some(AllowAdditional::Pattern(p)) => compile_pattern(field, p),
    }
}

/// Layout rules for one target tree (tests or docs).
#[derive(Debug, Clone)]
pub struct TargetConfig {
    /// Root of the target tree, relative to the project root
    pub root_dir: PathBuf,
    pub use_suffix_convention: bool,
    pub allow_additional: Option<Regex>,
    pub ignore: Option<Regex>,
    pub file_per_class: Option<Regex>,
    pub file_per_directory: Option<Regex>,
    pub collapse_double_underscores: bool,
}

impl TargetConfig {
    fn resolve(
        section: &str,
        root_dir: PathBuf,
        use_suffix_convention: bool,
        patterns: &LayoutPatterns,
    ) -> Result<Self> {
        let field = |key: &str| format!("{section}.{key}");
        Ok(Self {
            root_dir,
            use_suffix_convention,
            allow_additional: compile_allow_additional(
                &field("allow_additional"),
                patterns.allow_additional.as_ref(),
            )?,
            ignore: compile_optional(&field("ignore"), patterns.ignore.as_deref())?,
            file_per_class: compile_optional(
                &field("file_per_class"),
                patterns.file_per_class.as_deref(),
            )?,
            file_per_directory: compile_optional(
                &field("file_per_directory"),
                patterns.file_per_directory.as_deref(),
            )?,
            collapse_double_underscores: patterns.replace_double_underscore.unwrap_or(false),
        })
    }

    fn patterns(&self) -> LayoutPatterns {
        let text = |re: &Option<Regex>| re.as_ref().map(|r| r.as_str().to_string());
        LayoutPatterns {
            allow_additional: Some(match &self.allow_additional {
                None => AllowAdditional::Flag(false),
                Some(re) if re.as_str() == MATCH_EVERYTHING => AllowAdditional::Flag(true),
                Some(re) => AllowAdditional::Pattern(re.as_str().to_string()),
            }),
            ignore: text(&self.ignore),
            file_per_class: text(&self.file_per_class),
            file_per_directory: text(&self.file_per_directory),
            replace_double_underscore: Some(self.collapse_double_underscores),
        }
    }
}

/// Import restrictions, with names already qualified by the package.
#[derive(Debug, Clone, Default)]
pub struct ImportsConfig {
    pub internal: ImportPolicy,
    pub external: ImportPolicy,
    pub internal_allowed_everywhere: BTreeSet<String>,
    pub external_allowed_everywhere: BTreeSet<String>,
}

impl ImportsConfig {
    fn resolve(section: &ImportsSection, package: &str) -> Result<Self> {
        let qualify = |name: &String| prepend_module_name(name, package);
        let internal_map = |rules: &BTreeMap<String, Vec<String>>| -> ModuleMap {
            rules
                .iter()
                .map(|(k, v)| (qualify(k), v.iter().map(qualify).collect()))
                .collect()
        };
        let external_map = |rules: &BTreeMap<String, Vec<String>>| -> ModuleMap {
            rules
                .iter()
                .map(|(k, v)| (qualify(k), v.iter().cloned().collect()))
                .collect()
        };

        Ok(Self {
            internal: policy(
                "internal",
                section.internal_allowed.as_ref().map(internal_map),
                section.internal_disallowed.as_ref().map(internal_map),
            )?,
            external: policy(
                "external",
                section.external_allowed.as_ref().map(external_map),
                section.external_disallowed.as_ref().map(external_map),
            )?,
            internal_allowed_everywhere: section
                .internal_allowed_everywhere
                .iter()
                .flatten()
                .map(qualify)
                .collect(),
            external_allowed_everywhere: section
                .external_allowed_everywhere
                .iter()
                .flatten()
                .cloned()
                .collect(),
        })
    }

    fn section(&self) -> ImportsSection {
        fn listed(map: &ModuleMap) -> BTreeMap<String, Vec<String>> {
            map.iter()
                .map(|(k, v)| (k.clone(), v.iter().cloned().collect()))
                .collect()
        }
        let split = |policy: &ImportPolicy| match policy {
            ImportPolicy::Unrestricted => (None, None),
            ImportPolicy::Allowed(map) => (Some(listed(map)), None),
            ImportPolicy::Disallowed(map) => (None, Some(listed(map))),
        };
        let (internal_allowed, internal_disallowed) = split(&self.internal);
        let (external_allowed, external_disallowed) = split(&self.external);

        ImportsSection {
            internal_allowed_everywhere: Some(
                self.internal_allowed_everywhere.iter().cloned().collect(),
            ),
            external_allowed_everywhere: Some(
                self.external_allowed_everywhere.iter().cloned().collect(),
            ),
            internal_allowed,
            internal_disallowed,
            external_allowed,
            external_disallowed,
        }
    }
}

/// Only one of the two rule kinds may be given for a scope; empty tables
/// count as absent.
fn policy(
    scope: &str,
    allowed: Option<ModuleMap>,
    disallowed: Option<ModuleMap>,
) -> Result<ImportPolicy> {
    let allowed = allowed.filter(|m| !m.is_empty());
    let disallowed = disallowed.filter(|m| !m.is_empty());
    match (allowed, disallowed) {
        (Some(_), Some(_)) => Err(Error::ConflictingImportRules {
            scope: scope.to_string(),
        }),
        (Some(map), None) => Ok(ImportPolicy::Allowed(map)),
        (None, Some(map)) => Ok(ImportPolicy::Disallowed(map)),
        (None, None) => Ok(ImportPolicy::Unrestricted),
    }
}

/// `name` qualified with the package unless it already starts with it.
pub fn prepend_module_name(name: &str, module_name: &str) -> String {
    if name.starts_with(module_name) {
        name.to_string()
    } else {
        format!("{module_name}.{name}")
    }
}

fn resolve_methods(section: Option<&MethodsSection>) -> Result<MethodOrdering> {
    let Some(section) = section else {
        return Ok(MethodOrdering::default());
    };

    let overrides = section.builtins_order.clone().unwrap_or_default();
    for label in overrides.keys() {
        if label != "normal" && !BUILTIN_RULES.iter().any(|rule| rule.label == label.as_str()) {
            warn!(label = %label, "Unknown builtin method category; ignoring");
        }
    }
    let normal = overrides.get("normal").copied().unwrap_or(NORMAL_RANK);
    let builtins = builtin_rules(|label| overrides.get(label).copied());

    let mut custom = Vec::new();
    for (pattern, value) in section.custom_order.iter().flatten() {
        let field = format!("methods.custom_order.{pattern:?}");
        let rank = match value {
            toml::Value::Integer(i) => *i as f64,
            toml::Value::Float(f) => *f,
            other => {
                return Err(Error::config(
                    field,
                    format!("rank must be a number, found {}", other.type_str()),
                ))
            }
        };
        if let Some(regex) = compile_pattern(&field, pattern)? {
            custom.push(OrderingRule::custom(regex, rank));
        }
    }

    Ok(MethodOrdering::new(custom, builtins, normal))
}

/// Everything the checks need, with defaults applied and patterns compiled.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub root_dir: PathBuf,
    pub module_name: String,
    /// Package sources, relative to `root_dir`
    pub module_root_dir: PathBuf,
    pub docs: TargetConfig,
    pub tests: TargetConfig,
    pub methods: MethodOrdering,
    pub imports: ImportsConfig,
}

impl Configuration {
    /// Discover the project from `start` and load its configuration.
    pub fn discover(start: &Path, explicit: Option<&Path>) -> Result<Self> {
        let root_dir = find_project_root(start).unwrap_or_else(|| start.to_path_buf());
        let loaded = load_config(&root_dir, explicit)?;
        Self::resolve(root_dir, loaded)
    }

    /// Apply defaults and compile every pattern. Any invalid value is an
    /// error here, before a check runs.
    pub fn resolve(root_dir: PathBuf, loaded: LoadedConfig) -> Result<Self> {
        let table = loaded.table;

        let module_name = match table.module_name {
            Some(name) => name,
            None => loaded
                .project_name
                .map(|name| name.replace('-', "_"))
                .or_else(|| first_source_package(&root_dir))
                .ok_or_else(|| {
                    Error::config(
                        "module_name",
                        "not set, no [project].name in pyproject.toml and no package under src/",
                    )
                })?,
        };

        let module_root_dir = match table.module_root_dir {
            Some(dir) if dir.is_absolute() => dir
                .strip_prefix(&root_dir)
                .map(Path::to_path_buf)
                .map_err(|_| {
                    Error::config("module_root_dir", "must lie inside the project root")
                })?,
            Some(dir) => dir,
            None => Path::new("src").join(&module_name),
        };

        let docs_section = table.docs.unwrap_or_default();
        let docs = TargetConfig::resolve(
            "docs",
            docs_section
                .md_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MD_DIR)),
            true,
            &docs_section.patterns,
        )?;

        let tests_section = table.tests.unwrap_or_default();
        let tests = TargetConfig::resolve(
            "tests",
            tests_section
                .unit_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UNIT_DIR)),
            tests_section.use_filename_suffix.unwrap_or(true),
            &tests_section.patterns,
        )?;

        let methods = resolve_methods(table.methods.as_ref())?;
        let imports = ImportsConfig::resolve(&table.imports.unwrap_or_default(), &module_name)?;

        Ok(Self {
            root_dir,
            module_name,
            module_root_dir,
            docs,
            tests,
            methods,
            imports,
        })
    }

    pub fn target(&self, kind: TargetKind) -> &TargetConfig {
        match kind {
            TargetKind::Tests => &self.tests,
            TargetKind::Docs => &self.docs,
        }
    }

    /// Naming rules projecting package sources into a target tree.
    pub fn mapping_rules(&self, kind: TargetKind) -> MappingRules {
        let target = self.target(kind);
        MappingRules {
            project_root: self.root_dir.clone(),
            source_root: self.module_root_dir.clone(),
            target_root: target.root_dir.clone(),
            use_suffix_convention: target.use_suffix_convention,
            file_per_class: target.file_per_class.clone(),
            file_per_directory: target.file_per_directory.clone(),
            collapse_double_underscores: target.collapse_double_underscores,
        }
    }

    /// The resolved configuration as a `structlint.toml` table.
    pub fn to_table(&self) -> StructlintConfig {
        let builtins_order: BTreeMap<String, f64> = self
            .methods
            .rules
            .iter()
            .filter_map(|rule| rule.label.map(|label| (label.to_string(), rule.rank)))
            .chain(std::iter::once(("normal".to_string(), self.methods.normal)))
            .collect();
        let custom_order: toml::Table = self
            .methods
            .rules
            .iter()
            .filter(|rule| rule.label.is_none())
            .map(|rule| (rule.pattern.as_str().to_string(), toml::Value::Float(rule.rank)))
            .collect();

        StructlintConfig {
            module_name: Some(self.module_name.clone()),
            module_root_dir: Some(self.module_root_dir.clone()),
            docs: Some(DocsSection {
                md_dir: Some(self.docs.root_dir.clone()),
                patterns: self.docs.patterns(),
            }),
            tests: Some(TestsSection {
                unit_dir: Some(self.tests.root_dir.clone()),
                use_filename_suffix: Some(self.tests.use_suffix_convention),
                patterns: self.tests.patterns(),
            }),
            methods: Some(MethodsSection {
                builtins_order: Some(builtins_order),
                custom_order: Some(custom_order).filter(|t| !t.is_empty()),
            }),
            imports: Some(self.imports.section()),
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(&self.to_table())?)
    }
}

/// First directory under `<root>/src`, in name order.
fn first_source_package(root_dir: &Path) -> Option<String> {
    let mut dirs: Vec<String> = fs::read_dir(root_dir.join("src"))
        .ok()?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| !name.starts_with('.') && !name.ends_with(".egg-info"))
        .collect();
    dirs.sort();
    dirs.into_iter().next()
}
