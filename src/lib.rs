//! Structure linter for Python projects.
//!
//! Checks that methods inside classes follow a canonical order, that unit
//! tests and documentation pages mirror the package layout, and that
//! modules respect configured import rules.

pub mod analysis;
pub mod checks;
pub mod cli;
pub mod collection;
pub mod commands;
pub mod config;
pub mod core;
pub mod extraction;
pub mod formatting;
pub mod io;
pub mod mapping;
pub mod observability;

pub use crate::core::errors;
pub use crate::core::{Error, Result};

pub use crate::analysis::{ImportGraph, ImportPolicy, MethodOrdering, PythonImportGraph};
pub use crate::checks::{
    check_docs_structure, check_imports, check_method_order, check_tests_structure, CheckReport,
    ImportsReport, MethodOrderReport, StructureReport,
};
pub use crate::collection::{collect_docs, collect_source, IdentifierCollection};
pub use crate::config::Configuration;
pub use crate::mapping::{NamingMapper, TargetKind};
