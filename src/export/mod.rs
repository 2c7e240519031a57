//! Export of analysis results.
//!
//! This module provides two formats:
//! - JSON: the full report wrapped in an envelope with export metadata
//! - CSV: one table (macros, entries, hotkeys, or daily counts) for spreadsheets
//!
//! Exporters write to any [`Write`]; [`export_to_file`] adds an atomic write
//! on top so an interrupted export never leaves a truncated file behind.

mod csv;
mod json;

pub use csv::*;
pub use json::*;

use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::api::MacroAnalyzer;
use crate::error::Result;
use crate::util::atomic_write;

/// Export format specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// JSON report.
    Json,
    /// Pretty-printed JSON report.
    JsonPretty,
    /// CSV table.
    Csv,
}

impl ExportFormat {
    /// Get the file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Json | Self::JsonPretty => "json",
            Self::Csv => "csv",
        }
    }

    /// Parse format from string.
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "json-pretty" | "jsonpretty" => Some(Self::JsonPretty),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Write the analyzer's selected views to `writer`.
    fn export<W: Write>(&self, analyzer: &MacroAnalyzer, writer: &mut W) -> Result<()>;
}

/// Export to a string.
pub fn export_to_string(
    analyzer: &MacroAnalyzer,
    format: ExportFormat,
    table: CsvTable,
) -> Result<String> {
    let mut buffer = Vec::new();
    export_to_writer(analyzer, format, table, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| crate::error::MacroLensError::export(e.to_string()))
}

/// Export to any writer.
pub fn export_to_writer<W: Write>(
    analyzer: &MacroAnalyzer,
    format: ExportFormat,
    table: CsvTable,
    writer: &mut W,
) -> Result<()> {
    match format {
        ExportFormat::Json => JsonExporter::new().export(analyzer, writer),
        ExportFormat::JsonPretty => JsonExporter::new().pretty(true).export(analyzer, writer),
        ExportFormat::Csv => CsvExporter::new().with_table(table).export(analyzer, writer),
    }
}

/// Export to a file.
///
/// The content is rendered in memory first and then written atomically.
pub fn export_to_file(
    analyzer: &MacroAnalyzer,
    path: impl AsRef<Path>,
    format: ExportFormat,
    table: CsvTable,
) -> Result<()> {
    let path = path.as_ref();
    let mut buffer = Vec::new();
    export_to_writer(analyzer, format, table, &mut buffer)?;
    atomic_write(path, &buffer)?;
    debug!(path = %path.display(), bytes = buffer.len(), "Export written");
    Ok(())
}
