use super::ReportWriter;
use crate::analysis::ModuleMap;
use crate::checks::{CheckReport, ImportsReport, MethodOrderReport, StructureReport};
use crate::formatting::OutputFormatter;
use std::io::Write;

const WIDTH: usize = 80;
const METHOD_COLUMN: usize = 30;
const CLEAN: &str = "    No problems detected.";

fn double_bar(title: &str) -> String {
    format!("{:═^width$}", format!(" {title} "), width = WIDTH)
}

fn bar(title: &str) -> String {
    format!("{:─^width$}", format!(" {title} "), width = WIDTH)
}

/// `text` followed by a `─` leader up to `width` columns.
fn leader(text: &str, width: usize) -> String {
    let used = text.chars().count() + 2;
    format!("{text}  {}", "─".repeat(width.saturating_sub(used)))
}

/// Human-readable reports for a terminal.
pub struct TerminalWriter<W: Write> {
    writer: W,
    formatter: Box<dyn OutputFormatter>,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W, formatter: Box<dyn OutputFormatter>) -> Self {
        Self { writer, formatter }
    }

    fn write_clean(&mut self) -> std::io::Result<()> {
        writeln!(self.writer, "{}", self.formatter.success(CLEAN))
    }

    fn write_method_order(&mut self, report: &MethodOrderReport) -> std::io::Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", self.formatter.header(&double_bar("METHOD ORDER")))?;
        if !report.has_problems() {
            writeln!(self.writer)?;
            return self.write_clean();
        }

        for finding in &report.findings {
            writeln!(self.writer)?;
            writeln!(self.writer, "{}", self.formatter.error(&bar(&finding.class)))?;
            writeln!(self.writer, "{}", finding.path)?;
            writeln!(self.writer)?;
            for (declared, expected) in finding.declared.iter().zip(&finding.expected) {
                if declared == expected {
                    writeln!(self.writer, "    {declared}")?;
                } else {
                    writeln!(
                        self.writer,
                        "    {}  {}",
                        leader(declared, METHOD_COLUMN),
                        self.formatter.error(expected)
                    )?;
                }
            }
        }
        Ok(())
    }

    /// Target root plain, rest of the path highlighted, name as an error.
    fn paint_identifier(&self, root: &str, identifier: &str) -> String {
        let (path, name) = identifier.rsplit_once(':').unwrap_or((identifier, ""));
        let prefix = format!("{root}/");
        let (plain, rest) = match path.strip_prefix(&prefix) {
            Some(rest) => (prefix.as_str(), rest),
            None => ("", path),
        };
        format!(
            "{plain}{}:{}",
            self.formatter.info(rest),
            self.formatter.error(name)
        )
    }

    fn write_identifiers(&mut self, title: &str, root: &str, ids: &[String]) -> std::io::Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "{}", self.formatter.error(&bar(title)))?;
        writeln!(self.writer)?;
        for id in ids {
            let line = self.paint_identifier(root, id);
            writeln!(self.writer, "    {line}")?;
        }
        writeln!(self.writer)
    }

    fn write_structure(&mut self, report: &StructureReport) -> std::io::Result<()> {
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "{}",
            self.formatter.header(&double_bar(&report.target.to_uppercase()))
        )?;
        writeln!(self.writer)?;
        if !report.has_problems() && report.ordering.is_empty() {
            return self.write_clean();
        }

        let root = report.target_root.as_str();
        self.write_identifiers("MISSING", root, &report.missing)?;
        self.write_identifiers("UNEXPECTED", root, &report.unexpected)?;

        if !report.ordering.is_empty() {
            let width = report
                .ordering
                .iter()
                .map(|pair| pair.actual.chars().count())
                .max()
                .unwrap_or_default()
                + 4;
            writeln!(self.writer, "{}", self.formatter.error(&bar("ORDERING MISMATCH")))?;
            writeln!(self.writer)?;
            for pair in &report.ordering {
                if pair.in_place() {
                    writeln!(self.writer, "    {}", pair.actual)?;
                } else {
                    let expected_name = pair.expected.rsplit(':').next().unwrap_or_default();
                    writeln!(
                        self.writer,
                        "    {}  {}",
                        leader(&pair.actual, width),
                        self.formatter.error(expected_name)
                    )?;
                }
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn write_violations(&mut self, violations: &ModuleMap) -> std::io::Result<()> {
        if violations.is_empty() {
            return self.write_clean();
        }
        for (module, offending) in violations {
            writeln!(self.writer, "    {}", self.formatter.info(module))?;
            writeln!(self.writer)?;
            for upstream in offending {
                writeln!(self.writer, "        {}", self.formatter.error(upstream))?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn write_imports(&mut self, report: &ImportsReport) -> std::io::Result<()> {
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "{}",
            self.formatter.header(&double_bar("INTERNAL MODULE IMPORTS"))
        )?;
        writeln!(self.writer)?;
        self.write_violations(&report.internal)?;
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", self.formatter.header(&double_bar("EXTERNAL IMPORTS")))?;
        writeln!(self.writer)?;
        self.write_violations(&report.external)
    }
}

impl<W: Write> ReportWriter for TerminalWriter<W> {
    fn write_reports(&mut self, reports: &[CheckReport]) -> anyhow::Result<()> {
        for report in reports {
            match report {
                CheckReport::MethodOrder(r) => self.write_method_order(r)?,
                CheckReport::Structure(r) => self.write_structure(r)?,
                CheckReport::Imports(r) => self.write_imports(r)?,
            }
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::OrderingPair;
    use crate::checks::MethodOrderFinding;
    use crate::formatting::FormattingConfig;
    use std::collections::BTreeSet;

    fn render(reports: &[CheckReport]) -> String {
        let mut buffer = Vec::new();
        TerminalWriter::new(&mut buffer, FormattingConfig::plain().formatter())
            .write_reports(reports)
            .unwrap();
        String::from_utf8(buffer).unwrap()
    }

    fn structure(missing: &[&str], ordering: Vec<OrderingPair>) -> StructureReport {
        StructureReport {
            target: "tests".into(),
            target_root: "tests/unit".into(),
            missing: missing.iter().map(|s| s.to_string()).collect(),
            unexpected: vec![],
            ordering,
            expected: vec![],
            actual: vec![],
        }
    }

    #[test]
    fn test_bars_span_the_full_width() {
        assert_eq!(double_bar("TESTS").chars().count(), WIDTH);
        assert!(bar("MISSING").contains("─ MISSING ─"));
    }

    #[test]
    fn test_clean_report() {
        let out = render(&[CheckReport::Structure(structure(&[], vec![]))]);
        assert!(out.contains(" TESTS "));
        assert!(out.contains("No problems detected."));
    }

    #[test]
    fn test_missing_and_ordering_sections() {
        let ordering = vec![
            OrderingPair {
                actual: "tests/unit/a_test.py:test_g".into(),
                expected: "tests/unit/a_test.py:test_f".into(),
            },
            OrderingPair {
                actual: "tests/unit/a_test.py:test_f".into(),
                expected: "tests/unit/a_test.py:test_g".into(),
            },
        ];
        let out = render(&[CheckReport::Structure(structure(
            &["tests/unit/b_test.py:test_h"],
            ordering,
        ))]);

        assert!(out.contains(" MISSING "));
        assert!(out.contains("    tests/unit/b_test.py:test_h"));
        assert!(!out.contains(" UNEXPECTED "));
        assert!(out.contains(" ORDERING MISMATCH "));
        assert!(out.contains("tests/unit/a_test.py:test_g  ──"));
        assert!(out.contains("──  test_f"));
        assert!(!out.contains("No problems detected."));
    }

    #[test]
    fn test_ordering_alone_is_still_shown() {
        let ordering = vec![
            OrderingPair {
                actual: "docs/md/sub.md:f1".into(),
                expected: "docs/md/sub.md:g0".into(),
            },
            OrderingPair {
                actual: "docs/md/sub.md:g0".into(),
                expected: "docs/md/sub.md:f1".into(),
            },
        ];
        let out = render(&[CheckReport::Structure(structure(&[], ordering))]);
        assert!(out.contains(" ORDERING MISMATCH "));
        assert!(!out.contains(" MISSING "));
        assert!(!out.contains("No problems detected."));
    }

    #[test]
    fn test_method_order_lines() {
        let report = MethodOrderReport {
            findings: vec![MethodOrderFinding {
                path: "src/pkg/a.py".into(),
                class: "Thing".into(),
                declared: vec!["__init__".into(), "_p".into(), "run".into()],
                expected: vec!["__init__".into(), "run".into(), "_p".into()],
            }],
        };
        let out = render(&[CheckReport::MethodOrder(report)]);
        let lines: Vec<&str> = out.lines().collect();

        assert!(out.contains(" Thing "));
        assert!(lines.contains(&"src/pkg/a.py"));
        assert!(lines.contains(&"    __init__"));
        assert!(lines.contains(&format!("    {}  run", leader("_p", METHOD_COLUMN)).as_str()));
    }

    #[test]
    fn test_imports_sections() {
        let mut report = ImportsReport::default();
        report.external.insert(
            "pkg.core".into(),
            BTreeSet::from(["requests".to_string()]),
        );
        let out = render(&[CheckReport::Imports(report)]);

        let internal = out.find("INTERNAL MODULE IMPORTS").unwrap();
        let external = out.find("EXTERNAL IMPORTS").unwrap();
        let clean = out.find("No problems detected.").unwrap();
        assert!(internal < clean && clean < external);
        assert!(out.contains("    pkg.core\n\n        requests\n"));
    }
}
