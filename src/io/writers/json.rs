use super::ReportWriter;
use crate::checks::CheckReport;
use serde_json::json;
use std::io::Write;

/// One JSON document with every report and an overall verdict.
pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ReportWriter for JsonWriter<W> {
    fn write_reports(&mut self, reports: &[CheckReport]) -> anyhow::Result<()> {
        let document = json!({
            "problems": reports.iter().any(CheckReport::has_problems),
            "reports": reports,
        });
        serde_json::to_writer_pretty(&mut self.writer, &document)?;
        writeln!(self.writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::{ImportsReport, MethodOrderReport};
    use std::collections::BTreeSet;

    #[test]
    fn test_json_document_shape() {
        let mut imports = ImportsReport::default();
        imports
            .internal
            .insert("pkg.core".into(), BTreeSet::from(["pkg.cli".to_string()]));
        let reports = vec![
            CheckReport::MethodOrder(MethodOrderReport::default()),
            CheckReport::Imports(imports),
        ];

        let mut buffer = Vec::new();
        JsonWriter::new(&mut buffer).write_reports(&reports).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

        assert_eq!(value["problems"], true);
        assert_eq!(value["reports"][0]["check"], "method_order");
        assert_eq!(value["reports"][1]["internal"]["pkg.core"][0], "pkg.cli");
    }
}
