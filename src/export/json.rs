//! JSON export of the full analysis report.
//!
//! The report is wrapped in an envelope that records the format version and
//! when and by what it was produced, so archived exports stay interpretable.

use std::io::Write;

use chrono::Utc;
use serde::Serialize;

use crate::api::{AnalysisReport, MacroAnalyzer};
use crate::error::Result;

use super::Exporter;

/// Envelope format version.
pub const EXPORT_VERSION: &str = "1";

/// JSON exporter.
#[derive(Debug, Clone)]
pub struct JsonExporter {
    /// Pretty-print the JSON output.
    pretty: bool,
    /// Wrap the report in an envelope with metadata.
    use_envelope: bool,
}

impl Default for JsonExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonExporter {
    /// Create a new JSON exporter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pretty: false,
            use_envelope: true,
        }
    }

    /// Enable pretty-printing.
    #[must_use]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Use envelope wrapper.
    #[must_use]
    pub fn with_envelope(mut self, use_envelope: bool) -> Self {
        self.use_envelope = use_envelope;
        self
    }

    fn write_json<W: Write, T: Serialize>(&self, writer: &mut W, value: &T) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, value)?;
        } else {
            serde_json::to_writer(&mut *writer, value)?;
        }
        writeln!(writer)?;
        Ok(())
    }
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, analyzer: &MacroAnalyzer, writer: &mut W) -> Result<()> {
        let report = analyzer.report();
        if self.use_envelope {
            self.write_json(writer, &ReportExport::new(report))
        } else {
            self.write_json(writer, &report)
        }
    }
}

/// Exporting tool information.
#[derive(Debug, Clone, Serialize)]
pub struct ExporterInfo {
    /// Tool name.
    pub name: String,
    /// Tool version.
    pub version: String,
}

/// Complete report export with envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportExport {
    /// Export format version.
    pub version: String,
    /// Export timestamp (RFC 3339, UTC).
    pub exported_at: String,
    /// Export tool information.
    pub exporter: ExporterInfo,
    /// The analysis.
    pub report: AnalysisReport,
}

impl ReportExport {
    fn new(report: AnalysisReport) -> Self {
        Self {
            version: EXPORT_VERSION.to_string(),
            exported_at: Utc::now().to_rfc3339(),
            exporter: ExporterInfo {
                name: crate::NAME.to_string(),
                version: crate::VERSION.to_string(),
            },
            report,
        }
    }
}
