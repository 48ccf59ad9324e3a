//! Rendering of check reports.

pub mod json;
pub mod terminal;

pub use json::JsonWriter;
pub use terminal::TerminalWriter;

use crate::checks::CheckReport;
use crate::formatting::FormattingConfig;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Terminal,
    Json,
}

pub trait ReportWriter {
    fn write_reports(&mut self, reports: &[CheckReport]) -> anyhow::Result<()>;
}

pub fn create_writer<'a, W: Write + 'a>(
    format: OutputFormat,
    formatting: FormattingConfig,
    out: W,
) -> Box<dyn ReportWriter + 'a> {
    match format {
        OutputFormat::Terminal => Box::new(TerminalWriter::new(out, formatting.formatter())),
        OutputFormat::Json => Box::new(JsonWriter::new(out)),
    }
}
