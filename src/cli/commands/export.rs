//! Export command implementation.
//!
//! Writes the selected analysis as JSON or CSV to stdout or a file.

use std::io::{self, Write};

use crate::cli::{Cli, ExportArgs};
use crate::config::Config;
use crate::error::{MacroLensError, Result};
use crate::export::{export_to_file, export_to_writer, CsvTable, ExportFormat};

use super::load_analyzer;

/// Run the export command.
pub fn run(cli: &Cli, config: &Config, args: &ExportArgs) -> Result<()> {
    let (analyzer, _) = load_analyzer(config, &args.analysis)?;
    let format = ExportFormat::from(args.format);
    let table = CsvTable::from(args.table);

    match &args.out {
        Some(path) => {
            export_to_file(&analyzer, path, format, table)?;
            if !cli.quiet {
                eprintln!("Exported to {}", path.display());
            }
        }
        None => {
            let stdout = io::stdout();
            let mut writer = io::BufWriter::new(stdout.lock());
            export_to_writer(&analyzer, format, table, &mut writer)?;
            writer
                .flush()
                .map_err(|e| MacroLensError::io("Failed to flush stdout", e))?;
        }
    }

    Ok(())
}
