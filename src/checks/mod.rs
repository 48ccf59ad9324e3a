//! The four checks, each turning collections into a serializable report.
//!
//! Checks never print; rendering lives in `io::writers`.

use crate::analysis::{
    analyze_discrepancies, compute_disallowed, ordering_mismatches, ImportGraph, MethodOrdering,
    ModuleMap, OrderingPair,
};
use crate::collection::IdentifierCollection;
use crate::config::{Configuration, ImportsConfig};
use crate::core::{deduplicate_ordered, path_to_wire, sort_on_path, Result};
use crate::mapping::{NamingMapper, TargetKind};
use serde::Serialize;
use tracing::{debug, info};

/// A class whose declared method order differs from the canonical one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodOrderFinding {
    pub path: String,
    pub class: String,
    pub declared: Vec<String>,
    pub expected: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MethodOrderReport {
    pub findings: Vec<MethodOrderFinding>,
}

impl MethodOrderReport {
    pub fn has_problems(&self) -> bool {
        !self.findings.is_empty()
    }
}

/// Compare every class's own method order with the canonical order of its
/// own signatures. Inherited methods take no part.
pub fn check_method_order(
    ordering: &MethodOrdering,
    source: &IdentifierCollection,
) -> MethodOrderReport {
    let findings: Vec<MethodOrderFinding> = source
        .classes()
        .iter()
        .filter_map(|resolved| {
            let class = &resolved.class;
            let expected = ordering.classify(&class.signatures);
            (class.methods != expected).then(|| MethodOrderFinding {
                path: path_to_wire(&class.path),
                class: class.name.clone(),
                declared: class.methods.clone(),
                expected,
            })
        })
        .collect();

    info!(classes = source.classes().len(), out_of_order = findings.len(), "Checked method order");
    MethodOrderReport { findings }
}

/// Expected against actual layout of one target tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructureReport {
    pub target: String,
    /// Root of the target tree as configured
    pub target_root: String,
    pub missing: Vec<String>,
    pub unexpected: Vec<String>,
    /// Aligned pairs over the overlap; empty when the order agrees
    pub ordering: Vec<OrderingPair>,
    #[serde(skip)]
    pub expected: Vec<String>,
    #[serde(skip)]
    pub actual: Vec<String>,
}

impl StructureReport {
    /// Ordering differences are reported but do not count as problems.
    pub fn has_problems(&self) -> bool {
        !self.missing.is_empty() || !self.unexpected.is_empty()
    }

    fn build(
        target: &str,
        config: &Configuration,
        kind: TargetKind,
        expected: Vec<String>,
        actual: Vec<String>,
    ) -> Self {
        let target_config = config.target(kind);
        let discrepancies =
            analyze_discrepancies(&expected, &actual, target_config.allow_additional.as_ref());
        let ordering = ordering_mismatches(&expected, &actual, &discrepancies.overlap);

        info!(
            check = target,
            expected = expected.len(),
            actual = actual.len(),
            missing = discrepancies.missing.len(),
            unexpected = discrepancies.unexpected.len(),
            "Checked structure"
        );

        Self {
            target: target.to_string(),
            target_root: path_to_wire(&target_config.root_dir),
            missing: discrepancies.missing,
            unexpected: discrepancies.unexpected,
            ordering,
            expected,
            actual,
        }
    }
}

/// Every class and function needs a documentation entry; methods are
/// covered by their class.
pub fn check_docs_structure(
    config: &Configuration,
    source: &IdentifierCollection,
    docs: &IdentifierCollection,
) -> Result<StructureReport> {
    let mapper = NamingMapper::new(TargetKind::Docs, config.mapping_rules(TargetKind::Docs));
    let projected = source.apply(
        |id| mapper.map_to_target(id),
        config.docs.ignore.as_ref(),
        true,
    )?;
    let expected = sort_on_path(deduplicate_ordered(projected));
    let actual = sort_on_path(docs.identifiers_without_methods());
    debug!(expected = expected.len(), "Projected documentation identifiers");

    Ok(StructureReport::build("documentation", config, TargetKind::Docs, expected, actual))
}

/// Every method and function needs a unit test.
pub fn check_tests_structure(
    config: &Configuration,
    source: &IdentifierCollection,
    tests: &IdentifierCollection,
) -> Result<StructureReport> {
    let mapper = NamingMapper::new(TargetKind::Tests, config.mapping_rules(TargetKind::Tests));
    let expected = sort_on_path(source.apply(
        |id| mapper.map_to_target(id),
        config.tests.ignore.as_ref(),
        false,
    )?);
    let actual = sort_on_path(tests.identifiers());
    debug!(expected = expected.len(), "Projected test identifiers");

    Ok(StructureReport::build("tests", config, TargetKind::Tests, expected, actual))
}

/// Violations of internal and external import rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportsReport {
    pub internal: ModuleMap,
    pub external: ModuleMap,
}

impl ImportsReport {
    pub fn has_problems(&self) -> bool {
        !self.internal.is_empty() || !self.external.is_empty()
    }
}

/// Internal rules run on the package-only graph, external rules on the
/// graph that includes third-party packages.
pub fn check_imports(
    imports: &ImportsConfig,
    internal_graph: &dyn ImportGraph,
    external_graph: &dyn ImportGraph,
) -> ImportsReport {
    let report = ImportsReport {
        internal: compute_disallowed(
            &imports.internal,
            &imports.internal_allowed_everywhere,
            internal_graph,
        ),
        external: compute_disallowed(
            &imports.external,
            &imports.external_allowed_everywhere,
            external_graph,
        ),
    };
    info!(
        internal = report.internal.len(),
        external = report.external.len(),
        "Checked imports"
    );
    report
}

/// The result of any one check.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum CheckReport {
    MethodOrder(MethodOrderReport),
    Structure(StructureReport),
    Imports(ImportsReport),
}

impl CheckReport {
    pub fn has_problems(&self) -> bool {
        match self {
            Self::MethodOrder(report) => report.has_problems(),
            Self::Structure(report) => report.has_problems(),
            Self::Imports(report) => report.has_problems(),
        }
    }
}
