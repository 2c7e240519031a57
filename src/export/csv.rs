//! CSV export for spreadsheet analysis.
//!
//! One table per export; [`CsvTable`] picks which.

use std::io::Write;

use crate::api::MacroAnalyzer;
use crate::error::Result;
use crate::model::{DATE_FORMAT, TIMESTAMP_FORMAT};

use super::Exporter;

/// Which table a CSV export contains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CsvTable {
    /// One row per selected macro.
    #[default]
    Macros,
    /// One row per selected execution.
    Entries,
    /// One row per key, modifier, and combination.
    Hotkeys,
    /// One row per calendar date.
    Daily,
}

/// CSV exporter.
#[derive(Debug, Clone)]
pub struct CsvExporter {
    /// Table to export.
    table: CsvTable,
    /// Include header row.
    include_header: bool,
    /// Field delimiter.
    delimiter: char,
    /// Quote character.
    quote_char: char,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvExporter {
    /// Create a new CSV exporter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: CsvTable::Macros,
            include_header: true,
            delimiter: ',',
            quote_char: '"',
        }
    }

    /// Set the table to export.
    #[must_use]
    pub fn with_table(mut self, table: CsvTable) -> Self {
        self.table = table;
        self
    }

    /// Include or exclude header row.
    #[must_use]
    pub fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Set the field delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delim: char) -> Self {
        self.delimiter = delim;
        self
    }

    /// Escape a field value for CSV.
    fn escape_field(&self, value: &str) -> String {
        let needs_quoting = value.contains(self.delimiter)
            || value.contains(self.quote_char)
            || value.contains('\n')
            || value.contains('\r');

        if needs_quoting {
            let escaped = value.replace(
                self.quote_char,
                &format!("{}{}", self.quote_char, self.quote_char),
            );
            format!("{}{}{}", self.quote_char, escaped, self.quote_char)
        } else {
            value.to_string()
        }
    }

    /// Write a CSV row.
    fn write_row<W: Write>(&self, writer: &mut W, fields: &[&str]) -> Result<()> {
        let line: Vec<String> = fields.iter().map(|f| self.escape_field(f)).collect();
        writeln!(writer, "{}", line.join(&self.delimiter.to_string()))?;
        Ok(())
    }

    fn write_header<W: Write>(&self, writer: &mut W, fields: &[&str]) -> Result<()> {
        if self.include_header {
            self.write_row(writer, fields)?;
        }
        Ok(())
    }

    fn export_macros<W: Write>(&self, analyzer: &MacroAnalyzer, writer: &mut W) -> Result<()> {
        self.write_header(
            writer,
            &["name", "count", "avg_per_day", "first_seen", "last_seen", "days", "triggers"],
        )?;
        for stat in analyzer.selected_stats() {
            self.write_row(
                writer,
                &[
                    &stat.name,
                    &stat.count.to_string(),
                    &stat.avg_per_day,
                    &stat.first_seen.format(TIMESTAMP_FORMAT).to_string(),
                    &stat.last_seen.format(TIMESTAMP_FORMAT).to_string(),
                    &stat.days_diff.to_string(),
                    &stat.triggers,
                ],
            )?;
        }
        Ok(())
    }

    fn export_entries<W: Write>(&self, analyzer: &MacroAnalyzer, writer: &mut W) -> Result<()> {
        self.write_header(writer, &["timestamp", "macro", "trigger"])?;
        for entry in analyzer.selected_entries() {
            self.write_row(
                writer,
                &[
                    &entry.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                    &entry.macro_name,
                    &entry.trigger,
                ],
            )?;
        }
        Ok(())
    }

    fn export_hotkeys<W: Write>(&self, analyzer: &MacroAnalyzer, writer: &mut W) -> Result<()> {
        let hotkeys = analyzer.hotkeys();
        let max = hotkeys.max_key_count();
        self.write_header(writer, &["kind", "value", "count", "intensity"])?;

        for (key, count) in &hotkeys.key_stats {
            let intensity = crate::analytics::key_intensity(*count, max);
            self.write_row(
                writer,
                &["key", key, &count.to_string(), &format!("{intensity:.3}")],
            )?;
        }
        for (modifier, count) in &hotkeys.modifier_stats {
            self.write_row(writer, &["modifier", modifier.name(), &count.to_string(), ""])?;
        }
        for (combination, count) in &hotkeys.combination_stats {
            self.write_row(writer, &["combination", combination, &count.to_string(), ""])?;
        }
        Ok(())
    }

    fn export_daily<W: Write>(&self, analyzer: &MacroAnalyzer, writer: &mut W) -> Result<()> {
        self.write_header(writer, &["date", "weekday", "count"])?;
        for bucket in analyzer.time_buckets().daily {
            self.write_row(
                writer,
                &[
                    &bucket.date.format(DATE_FORMAT).to_string(),
                    &bucket.date.format("%a").to_string(),
                    &bucket.count.to_string(),
                ],
            )?;
        }
        Ok(())
    }
}

impl Exporter for CsvExporter {
    fn export<W: Write>(&self, analyzer: &MacroAnalyzer, writer: &mut W) -> Result<()> {
        match self.table {
            CsvTable::Macros => self.export_macros(analyzer, writer),
            CsvTable::Entries => self.export_entries(analyzer, writer),
            CsvTable::Hotkeys => self.export_hotkeys(analyzer, writer),
            CsvTable::Daily => self.export_daily(analyzer, writer),
        }
    }
}
