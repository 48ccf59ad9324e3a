//! Analysis over collected identifiers and import graphs.
//!
//! - set comparison of expected against actual identifiers
//! - canonical method ordering
//! - import allow/deny rules and the Python import graph they run on

pub mod discrepancy;
pub mod imports;
pub mod method_order;
pub mod python_imports;

pub use discrepancy::{analyze_discrepancies, ordering_mismatches, Discrepancies, OrderingPair};
pub use imports::{compute_disallowed, ImportGraph, ImportPolicy, ModuleMap};
pub use method_order::{
    builtin_rules, classify, rank, BuiltinRule, MethodOrdering, OrderingRule, BUILTIN_RULES,
    NORMAL_RANK,
};
pub use python_imports::{scan_imports, ImportStatement, PythonImportGraph};
