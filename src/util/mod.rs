//! Utility functions for common operations.
//!
//! This module provides shared utilities used across the crate:
//! - Atomic file writes for config and exports
//! - Universal-newline splitting and line-count capping of loaded text
//! - Small text formatting helpers for terminal output

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{MacroLensError, Result};

/// Atomically write content to a file.
///
/// The content goes to a temporary file in the target's directory, which is
/// then renamed over the target. If any step fails the original file (if it
/// exists) remains unchanged.
///
/// # Example
///
/// ```rust,no_run
/// use macrolens::util::atomic_write;
///
/// atomic_write("config.toml", b"[analysis]\ndeduplicate = true\n").unwrap();
/// ```
pub fn atomic_write(path: impl AsRef<Path>, content: &[u8]) -> Result<()> {
    atomic_write_with(path, |writer| writer.write_all(content))
}

/// Atomically write a file using a writer function.
///
/// # Example
///
/// ```rust,no_run
/// use macrolens::util::atomic_write_with;
/// use std::io::Write;
///
/// atomic_write_with("macros.csv", |writer| {
///     writeln!(writer, "name,count")
/// }).unwrap();
/// ```
pub fn atomic_write_with<F>(path: impl AsRef<Path>, write_fn: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let path = path.as_ref();

    // A bare file name has an empty parent, meaning the current directory
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        Some(_) => Path::new("."),
        None => {
            return Err(MacroLensError::IoError {
                context: format!("Cannot determine parent directory for: {}", path.display()),
                source: io::Error::new(io::ErrorKind::InvalidInput, "No parent directory"),
            })
        }
    };

    if !parent.exists() {
        std::fs::create_dir_all(parent).map_err(|e| {
            MacroLensError::io(format!("Failed to create directory: {}", parent.display()), e)
        })?;
    }

    // Same directory keeps the final rename on one filesystem
    let mut temp_file = NamedTempFile::new_in(parent).map_err(|e| {
        MacroLensError::io(
            format!("Failed to create temporary file in: {}", parent.display()),
            e,
        )
    })?;

    write_fn(&mut temp_file).map_err(|e| {
        MacroLensError::io(format!("Failed to write content for: {}", path.display()), e)
    })?;

    temp_file.flush().map_err(|e| {
        MacroLensError::io(
            format!("Failed to flush temporary file for: {}", path.display()),
            e,
        )
    })?;

    temp_file.persist(path).map_err(|e| {
        MacroLensError::io(format!("Failed to atomically write file: {}", path.display()), e.error)
    })?;

    Ok(())
}

/// Split on `\r\n`, `\n`, or a lone `\r`.
pub fn split_universal_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(text);
    std::iter::from_fn(move || {
        let current = rest?;
        match current.find(['\r', '\n']) {
            Some(pos) => {
                let skip = if current[pos..].starts_with("\r\n") { 2 } else { 1 };
                rest = Some(&current[pos + skip..]);
                Some(&current[..pos])
            }
            None => {
                rest = None;
                Some(current)
            }
        }
    })
}

/// Byte offsets just past each line break, under the same rule as
/// [`split_universal_lines`].
fn line_starts(text: &str) -> impl Iterator<Item = usize> + '_ {
    let bytes = text.as_bytes();
    bytes.iter().enumerate().filter_map(move |(i, &b)| match b {
        b'\n' => Some(i + 1),
        b'\r' if bytes.get(i + 1) != Some(&b'\n') => Some(i + 1),
        _ => None,
    })
}

/// Keep only the last `max_lines` lines of `text`.
///
/// Returns the kept slice and the number of lines dropped from the front.
/// Lines end at `\r\n`, `\n`, or a lone `\r`. Trailing line breaks do not
/// count as an extra line. `max_lines == 0` disables the cap.
pub fn tail_lines(text: &str, max_lines: usize) -> (&str, usize) {
    let body = text.trim_end_matches(['\r', '\n']);
    if max_lines == 0 || body.is_empty() {
        return (text, 0);
    }

    let total = line_starts(body).count() + 1;
    if total <= max_lines {
        return (text, 0);
    }

    let dropped = total - max_lines;
    let start = line_starts(body).nth(dropped - 1).unwrap_or(0);
    (&body[start..], dropped)
}

/// Format a count with comma separators.
#[must_use]
pub fn format_count(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let chars: Vec<char> = s.chars().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }
    result
}

/// Horizontal bar proportional to `value / max`.
#[must_use]
pub fn bar(value: usize, max: usize, width: usize) -> String {
    if max == 0 || value == 0 {
        return String::new();
    }
    let filled = ((value as f64 / max as f64) * width as f64).ceil() as usize;
    "█".repeat(filled.min(width))
}

/// Shorten `s` to at most `max_chars` characters, marking the cut with `…`.
#[must_use]
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{kept}…")
}
