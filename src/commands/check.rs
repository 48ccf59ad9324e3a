use crate::analysis::PythonImportGraph;
use crate::checks::{
    check_docs_structure, check_imports, check_method_order, check_tests_structure, CheckReport,
};
use crate::collection::{collect_docs, collect_source, IdentifierCollection};
use crate::config::Configuration;
use crate::core::Result;
use crate::formatting::FormattingConfig;
use crate::io::writers::{create_writer, OutputFormat};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info_span;

/// Which checks a run includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckSelection {
    All,
    Methods,
    Docs,
    Tests,
    Imports,
}

impl CheckSelection {
    fn includes(self, check: CheckSelection) -> bool {
        self == CheckSelection::All || self == check
    }
}

pub struct CheckConfig {
    pub start: PathBuf,
    pub config: Option<PathBuf>,
    pub selection: CheckSelection,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub formatting: FormattingConfig,
}

/// Collect what the selected checks need and run them, in the order
/// methods, docs, tests, imports.
pub fn run_checks(config: &Configuration, selection: CheckSelection) -> Result<Vec<CheckReport>> {
    let _span = info_span!("run_checks", ?selection).entered();
    let root = &config.root_dir;

    let source = if selection == CheckSelection::Imports {
        IdentifierCollection::default()
    } else {
        collect_source(&config.module_root_dir, root)?
    };

    let (tests, docs) = rayon::join(
        || {
            selection
                .includes(CheckSelection::Tests)
                .then(|| collect_source(&config.tests.root_dir, root))
                .transpose()
        },
        || {
            selection
                .includes(CheckSelection::Docs)
                .then(|| collect_docs(&config.docs.root_dir, root))
                .transpose()
        },
    );
    let (tests, docs) = (tests?, docs?);

    let mut reports = Vec::new();
    if selection.includes(CheckSelection::Methods) {
        reports.push(CheckReport::MethodOrder(check_method_order(
            &config.methods,
            &source,
        )));
    }
    if let Some(docs) = docs {
        reports.push(CheckReport::Structure(check_docs_structure(
            config, &source, &docs,
        )?));
    }
    if let Some(tests) = tests {
        reports.push(CheckReport::Structure(check_tests_structure(
            config, &source, &tests,
        )?));
    }
    if selection.includes(CheckSelection::Imports) {
        let package_root = root.join(&config.module_root_dir);
        let (internal, external) = rayon::join(
            || PythonImportGraph::build(&package_root, &config.module_name, false),
            || PythonImportGraph::build(&package_root, &config.module_name, true),
        );
        reports.push(CheckReport::Imports(check_imports(
            &config.imports,
            &internal?,
            &external?,
        )));
    }

    Ok(reports)
}

/// Run the selected checks and write their reports. Returns whether any
/// check found a problem.
pub fn handle_check(config: CheckConfig) -> anyhow::Result<bool> {
    let configuration = Configuration::discover(&config.start, config.config.as_deref())?;
    let reports = run_checks(&configuration, config.selection)?;

    match &config.output {
        Some(path) => {
            let file = BufWriter::new(File::create(path)?);
            create_writer(config.format, FormattingConfig::plain(), file).write_reports(&reports)?;
        }
        None => {
            let stdout = std::io::stdout().lock();
            create_writer(config.format, config.formatting, stdout).write_reports(&reports)?;
        }
    }

    Ok(reports.iter().any(CheckReport::has_problems))
}
