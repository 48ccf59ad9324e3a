//! Allow/deny rules for imports between modules.
//!
//! Rules are evaluated against any [`ImportGraph`]; matching between rule
//! entries and upstream module names is by substring, so `pkg.io` also
//! covers `pkg.io.walker`.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// Module name to a set of module names.
pub type ModuleMap = BTreeMap<String, BTreeSet<String>>;

/// Read-only view of a module import graph.
pub trait ImportGraph {
    /// Every module known to the graph.
    fn modules(&self) -> BTreeSet<String>;

    /// Every module `module` imports, directly or transitively, excluding
    /// itself.
    fn upstream_modules(&self, module: &str) -> BTreeSet<String>;

    fn contains(&self, module: &str) -> bool {
        self.modules().contains(module)
    }
}

/// Import restrictions for one scope (internal or external).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportPolicy {
    #[default]
    Unrestricted,
    /// Listed modules may import only these (plus their own submodules and
    /// anything allowed everywhere)
    Allowed(ModuleMap),
    /// Listed modules must not import any of these
    Disallowed(ModuleMap),
}

impl ImportPolicy {
    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Self::Unrestricted)
    }
}

/// Offending upstream modules per restricted module; modules without
/// violations are left out.
pub fn compute_disallowed(
    policy: &ImportPolicy,
    allowed_everywhere: &BTreeSet<String>,
    graph: &dyn ImportGraph,
) -> ModuleMap {
    let rules = match policy {
        ImportPolicy::Unrestricted => return ModuleMap::new(),
        ImportPolicy::Allowed(rules) | ImportPolicy::Disallowed(rules) => rules,
    };
    let known = graph.modules();
    let mut violations = ModuleMap::new();

    for (module, listed) in rules {
        if !known.contains(module) {
            warn!(module = %module, "Not a module or not on the import tree; skipping");
            continue;
        }
        let upstream = graph.upstream_modules(module);

        let offending: BTreeSet<String> = match policy {
            ImportPolicy::Allowed(_) => {
                let mut permitted: BTreeSet<&str> = listed.iter().map(String::as_str).collect();
                permitted.insert(module.as_str());
                permitted.extend(allowed_everywhere.iter().map(String::as_str));
                permitted.extend(
                    upstream
                        .iter()
                        .filter(|up| up.contains(module.as_str()))
                        .map(String::as_str),
                );
                upstream
                    .iter()
                    .filter(|up| !contains_any(up, &permitted))
                    .cloned()
                    .collect()
            }
            ImportPolicy::Disallowed(_) => {
                let forbidden: BTreeSet<&str> = listed.iter().map(String::as_str).collect();
                upstream
                    .iter()
                    .filter(|up| contains_any(up, &forbidden))
                    .cloned()
                    .collect()
            }
            ImportPolicy::Unrestricted => BTreeSet::new(),
        };

        if !offending.is_empty() {
            violations.insert(module.clone(), offending);
        }
    }

    violations
}

fn contains_any(haystack: &str, needles: &BTreeSet<&str>) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Graph whose upstream sets are given directly.
    struct FixedGraph(ModuleMap);

    impl ImportGraph for FixedGraph {
        fn modules(&self) -> BTreeSet<String> {
            self.0.keys().cloned().collect()
        }

        fn upstream_modules(&self, module: &str) -> BTreeSet<String> {
            self.0.get(module).cloned().unwrap_or_default()
        }
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn graph() -> FixedGraph {
        let mut map = ModuleMap::new();
        map.insert(
            "pkg.cli".into(),
            set(&["pkg.checks", "pkg.utils", "pkg.cli.args", "click"]),
        );
        map.insert("pkg.utils".into(), set(&["re", "pathlib"]));
        map.insert("pkg.checks".into(), set(&["pkg.utils", "re"]));
        for leaf in ["pkg.cli.args", "click", "re", "pathlib"] {
            map.insert(leaf.into(), BTreeSet::new());
        }
        FixedGraph(map)
    }

    fn rules(module: &str, imports: &[&str]) -> ModuleMap {
        let mut map = ModuleMap::new();
        map.insert(module.to_string(), set(imports));
        map
    }

    #[test]
    fn test_unrestricted_reports_nothing() {
        let result = compute_disallowed(&ImportPolicy::Unrestricted, &BTreeSet::new(), &graph());
        assert!(result.is_empty());
    }

    #[test]
    fn test_allowed_flags_everything_else() {
        let policy = ImportPolicy::Allowed(rules("pkg.cli", &["pkg.checks"]));
        let result = compute_disallowed(&policy, &set(&["click"]), &graph());
        assert_eq!(result.get("pkg.cli"), Some(&set(&["pkg.utils"])));
    }

    #[test]
    fn test_allowed_own_submodules_are_permitted() {
        let policy =
            ImportPolicy::Allowed(rules("pkg.cli", &["pkg.checks", "pkg.utils", "click"]));
        assert!(compute_disallowed(&policy, &BTreeSet::new(), &graph()).is_empty());
    }

    #[test]
    fn test_disallowed_uses_substring_match() {
        let policy = ImportPolicy::Disallowed(rules("pkg.checks", &["pkg.util"]));
        let result = compute_disallowed(&policy, &BTreeSet::new(), &graph());
        assert_eq!(result.get("pkg.checks"), Some(&set(&["pkg.utils"])));
    }

    #[test]
    fn test_clean_modules_are_omitted() {
        let policy = ImportPolicy::Disallowed(rules("pkg.utils", &["click"]));
        assert!(compute_disallowed(&policy, &BTreeSet::new(), &graph()).is_empty());
    }

    #[test]
    fn test_unknown_module_is_skipped() {
        let policy = ImportPolicy::Disallowed(rules("pkg.absent", &["re"]));
        assert!(compute_disallowed(&policy, &BTreeSet::new(), &graph()).is_empty());
    }
}
