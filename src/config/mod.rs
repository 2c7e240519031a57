//! Configuration management for macrolens.
//!
//! Handles:
//! - Analysis defaults (deduplication, window, line ceiling)
//! - Display preferences for text output
//!
//! Configuration lives in `<config dir>/macrolens/config.toml`. A
//! `.macrolens.toml` next to an analysed log overrides it for that directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{MacroLensError, Result};
use crate::options::{AnalysisOptions, DEFAULT_DEDUP_WINDOW_MS, DEFAULT_MAX_LINES, MAX_DEDUP_WINDOW_MS};
use crate::util::atomic_write;

/// Directory-local configuration filename.
pub const PROJECT_CONFIG_FILENAME: &str = ".macrolens.toml";

/// Every key accepted by [`Config::get_value`] and [`Config::set_value`].
pub const CONFIG_KEYS: &[&str] = &[
    "analysis.deduplicate",
    "analysis.window_ms",
    "analysis.max_lines",
    "display.top",
    "display.color",
    "display.show_triggers",
];

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Analysis defaults.
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Display options.
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Config {
    /// Load configuration from the default location, or defaults if absent.
    pub fn load() -> Result<Self> {
        let config_path = default_config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration with directory-local overrides.
    ///
    /// A `.macrolens.toml` in `dir`, if present, is merged on top of `self`.
    pub fn with_directory_overrides(mut self, dir: &Path) -> Result<Self> {
        let local = dir.join(PROJECT_CONFIG_FILENAME);
        if local.exists() {
            debug!(path = %local.display(), "Applying directory config");
            let overrides = ConfigOverrides::load_from(&local)?;
            self.apply(&overrides);
        }
        Ok(self)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = read_config_file(path)?;
        parse_config(path, &content)
    }

    /// Apply overrides. Only keys present in `overrides` change.
    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        let analysis = &overrides.analysis;
        if let Some(deduplicate) = analysis.deduplicate {
            self.analysis.deduplicate = deduplicate;
        }
        if let Some(window_ms) = analysis.window_ms {
            self.analysis.window_ms = window_ms;
        }
        if let Some(max_lines) = analysis.max_lines {
            self.analysis.max_lines = max_lines;
        }

        let display = &overrides.display;
        if let Some(top) = display.top {
            self.display.top = top;
        }
        if let Some(color) = display.color {
            self.display.color = color;
        }
        if let Some(show_triggers) = display.show_triggers {
            self.display.show_triggers = show_triggers;
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        let config_path = default_config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to a specific path.
    ///
    /// Uses an atomic write so a failed save never leaves a half-written file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| MacroLensError::InvalidConfig {
            message: format!("Failed to serialize config: {e}"),
        })?;

        atomic_write(path, content.as_bytes())
    }

    /// Analysis options implied by this configuration.
    #[must_use]
    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions::default()
            .with_deduplicate(self.analysis.deduplicate)
            .with_window_ms(self.analysis.effective_window_ms())
    }

    /// Read a value by dotted key.
    pub fn get_value(&self, key: &str) -> Result<String> {
        let value = match key {
            "analysis.deduplicate" => self.analysis.deduplicate.to_string(),
            "analysis.window_ms" => self.analysis.window_ms.to_string(),
            "analysis.max_lines" => self.analysis.max_lines.to_string(),
            "display.top" => self.display.top.to_string(),
            "display.color" => self.display.color.to_string(),
            "display.show_triggers" => self.display.show_triggers.to_string(),
            _ => return Err(unknown_key(key)),
        };
        Ok(value)
    }

    /// Set a value by dotted key.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "analysis.deduplicate" => self.analysis.deduplicate = parse_bool(value)?,
            "analysis.window_ms" => self.analysis.window_ms = parse_u64(value)?,
            "analysis.max_lines" => self.analysis.max_lines = parse_usize(value)?,
            "display.top" => self.display.top = parse_usize(value)?,
            "display.color" => self.display.color = parse_bool(value)?,
            "display.show_triggers" => self.display.show_triggers = parse_bool(value)?,
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

/// Partial configuration read from a directory file.
///
/// Keys left out of the file stay `None` and leave the base untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConfigOverrides {
    /// Analysis overrides.
    #[serde(default)]
    pub analysis: AnalysisOverrides,
    /// Display overrides.
    #[serde(default)]
    pub display: DisplayOverrides,
}

impl ConfigOverrides {
    /// Load overrides from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = read_config_file(path)?;
        parse_config(path, &content)
    }
}

/// `[analysis]` keys present in a directory file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AnalysisOverrides {
    /// Collapse rapid repeats.
    pub deduplicate: Option<bool>,
    /// Deduplication window in milliseconds.
    pub window_ms: Option<u64>,
    /// Line ceiling.
    pub max_lines: Option<usize>,
}

/// `[display]` keys present in a directory file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DisplayOverrides {
    /// Rows shown in ranked tables.
    pub top: Option<usize>,
    /// Use color output.
    pub color: Option<bool>,
    /// Show the trigger column.
    pub show_triggers: Option<bool>,
}

/// Analysis defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Collapse rapid repeats by default.
    #[serde(default)]
    pub deduplicate: bool,
    /// Deduplication window in milliseconds.
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
    /// Line ceiling for loaded logs.
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,
}

impl AnalysisConfig {
    /// Window with out-of-range values clamped.
    #[must_use]
    pub fn effective_window_ms(&self) -> u64 {
        if self.window_ms > MAX_DEDUP_WINDOW_MS {
            warn!(
                window_ms = self.window_ms,
                max = MAX_DEDUP_WINDOW_MS,
                "Configured deduplication window clamped"
            );
            return MAX_DEDUP_WINDOW_MS;
        }
        self.window_ms
    }

    /// Line ceiling, with zero meaning the default.
    #[must_use]
    pub fn effective_max_lines(&self) -> usize {
        if self.max_lines == 0 {
            DEFAULT_MAX_LINES
        } else {
            self.max_lines
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            deduplicate: false,
            window_ms: DEFAULT_DEDUP_WINDOW_MS,
            max_lines: DEFAULT_MAX_LINES,
        }
    }
}

/// Display configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Rows shown in ranked tables.
    #[serde(default = "default_top")]
    pub top: usize,
    /// Use color output.
    #[serde(default = "default_true")]
    pub color: bool,
    /// Show the trigger column in macro tables.
    #[serde(default = "default_true")]
    pub show_triggers: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            top: default_top(),
            color: true,
            show_triggers: true,
        }
    }
}

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_window_ms() -> u64 {
    DEFAULT_DEDUP_WINDOW_MS
}

fn default_max_lines() -> usize {
    DEFAULT_MAX_LINES
}

fn default_top() -> usize {
    20
}

/// Get the default configuration path.
pub fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or_else(|| MacroLensError::Unsupported {
        feature: "config directory discovery".to_string(),
    })?;

    Ok(config_dir.join("macrolens").join("config.toml"))
}

fn read_config_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        MacroLensError::io(format!("Failed to read config file: {}", path.display()), e)
    })
}

fn parse_config<T: serde::de::DeserializeOwned>(path: &Path, content: &str) -> Result<T> {
    toml::from_str(content).map_err(|e| MacroLensError::InvalidConfig {
        message: format!("{}: {e}", path.display()),
    })
}

fn unknown_key(key: &str) -> MacroLensError {
    MacroLensError::ConfigError {
        message: format!(
            "Unknown configuration key: {key} (expected one of: {})",
            CONFIG_KEYS.join(", ")
        ),
    }
}

/// Parse boolean value.
fn parse_bool(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(MacroLensError::ConfigError {
            message: format!("Invalid boolean value: {s}. Use true/false."),
        }),
    }
}

/// Parse usize value.
fn parse_usize(s: &str) -> Result<usize> {
    s.trim().parse().map_err(|_| MacroLensError::ConfigError {
        message: format!("Invalid number: {s}"),
    })
}

/// Parse u64 value.
fn parse_u64(s: &str) -> Result<u64> {
    s.trim().parse().map_err(|_| MacroLensError::ConfigError {
        message: format!("Invalid number: {s}"),
    })
}
