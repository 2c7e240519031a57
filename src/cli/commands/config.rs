//! Config command implementation.
//!
//! View and modify macrolens configuration settings. `--config` selects the
//! file to act on; otherwise the default location is used.

use std::path::{Path, PathBuf};

use crate::cli::{Cli, ConfigAction, ConfigArgs, OutputFormat};
use crate::config::{default_config_path, Config, CONFIG_KEYS};
use crate::error::Result;

use super::print_json;

/// Run the config command.
pub fn run(cli: &Cli, args: &ConfigArgs) -> Result<()> {
    let path = config_path(cli)?;
    match &args.action {
        ConfigAction::Show => show_config(cli, &path),
        ConfigAction::Get { key } => get_config_value(cli, &path, key),
        ConfigAction::Set { key, value } => set_config_value(cli, &path, key, value),
        ConfigAction::Path => {
            println!("{}", path.display());
            Ok(())
        }
        ConfigAction::Init => init_config(&path),
        ConfigAction::Reset => reset_config(&path),
    }
}

/// The file this invocation reads and writes.
fn config_path(cli: &Cli) -> Result<PathBuf> {
    match &cli.config {
        Some(path) => Ok(path.clone()),
        None => default_config_path(),
    }
}

/// Load the file at `path`, or defaults if it does not exist yet.
fn load(path: &Path) -> Result<Config> {
    if path.exists() {
        Config::load_from(path)
    } else {
        Ok(Config::default())
    }
}

/// Show full configuration.
fn show_config(cli: &Cli, path: &Path) -> Result<()> {
    let config = load(path)?;

    match cli.effective_output() {
        OutputFormat::Json => print_json(&config)?,
        OutputFormat::Tsv => {
            println!("key\tvalue");
            for key in CONFIG_KEYS {
                println!("{key}\t{}", config.get_value(key)?);
            }
        }
        _ => {
            println!("macrolens configuration ({})", path.display());
            println!();

            println!("[analysis]");
            println!("  deduplicate = {}", config.analysis.deduplicate);
            println!("  window_ms = {}", config.analysis.window_ms);
            println!("  max_lines = {}", config.analysis.max_lines);
            println!();

            println!("[display]");
            println!("  top = {}", config.display.top);
            println!("  color = {}", config.display.color);
            println!("  show_triggers = {}", config.display.show_triggers);
        }
    }

    Ok(())
}

/// Get a specific configuration value.
fn get_config_value(cli: &Cli, path: &Path, key: &str) -> Result<()> {
    let value = load(path)?.get_value(key)?;

    match cli.effective_output() {
        OutputFormat::Json => println!("{}", serde_json::json!({ key: value })),
        _ => println!("{value}"),
    }

    Ok(())
}

/// Set a configuration value.
fn set_config_value(cli: &Cli, path: &Path, key: &str, value: &str) -> Result<()> {
    let mut config = load(path)?;
    config.set_value(key, value)?;
    config.save_to(path)?;

    if !cli.quiet {
        println!("Set {key} = {}", config.get_value(key)?);
    }
    Ok(())
}

/// Initialize configuration file with defaults.
fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Configuration file already exists at: {}", path.display());
        println!("Use 'macrolens config reset' to reset to defaults.");
        return Ok(());
    }

    Config::default().save_to(path)?;
    println!("Created configuration file at: {}", path.display());
    Ok(())
}

/// Reset configuration to defaults.
fn reset_config(path: &Path) -> Result<()> {
    if !path.exists() {
        println!("No configuration file exists. Use 'macrolens config init' to create one.");
        return Ok(());
    }

    Config::default().save_to(path)?;
    println!("Reset configuration to defaults at: {}", path.display());
    Ok(())
}
