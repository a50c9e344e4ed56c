//! Output formatters for CLI commands.
//!
//! Provides consistent formatting across all commands for JSON, text, and
//! pretty output modes.

use crate::cli::OutputFormat;
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

/// Formats data according to the specified output format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Examples
///
/// ```
/// use ovfs_cli::cli::OutputFormat;
/// use ovfs_cli::formatters::format_output;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Entry {
///     name: String,
///     size: u64,
/// }
///
/// let entry = Entry { name: "app.css".to_string(), size: 6 };
///
/// let output = format_output(&entry, OutputFormat::Json)?;
/// assert!(output.contains("\"name\""));
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn format_output<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::format(data),
        OutputFormat::Text => text::format(data),
        OutputFormat::Pretty => pretty::format(data),
    }
}

/// JSON output formatting.
pub mod json {
    use super::{Result, Serialize};

    /// Formats data as JSON with 2-space indentation.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }

    /// Formats data as compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn format_compact<T: Serialize>(data: &T) -> Result<String> {
        Ok(serde_json::to_string(data)?)
    }
}

/// Plain text output formatting.
pub mod text {
    use super::{Result, Serialize, json};

    /// Formats data as a single line without colors, suitable for piping.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        json::format_compact(data)
    }
}

/// Pretty (human-readable) output formatting.
pub mod pretty {
    use super::{Colorize, Result, Serialize};
    use serde_json::Value;
    use std::fmt::Write;

    /// Formats data as colorized, indented output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        let mut out = String::new();
        write_value(&mut out, &value, 0)?;
        Ok(out)
    }

    fn write_value(out: &mut String, value: &Value, indent: usize) -> Result<()> {
        let pad = "  ".repeat(indent);
        let inner = "  ".repeat(indent + 1);

        match value {
            Value::Null => write!(out, "{}", "null".dimmed())?,
            Value::Bool(b) => write!(out, "{}", b.to_string().yellow())?,
            Value::Number(n) => write!(out, "{}", n.to_string().cyan())?,
            Value::String(s) => write!(out, "\"{}\"", s.green())?,
            Value::Array(items) if items.is_empty() => out.push_str("[]"),
            Value::Array(items) => {
                out.push_str("[\n");
                for (i, item) in items.iter().enumerate() {
                    out.push_str(&inner);
                    write_value(out, item, indent + 1)?;
                    if i + 1 < items.len() {
                        out.push(',');
                    }
                    out.push('\n');
                }
                write!(out, "{pad}]")?;
            }
            Value::Object(fields) if fields.is_empty() => out.push_str("{}"),
            Value::Object(fields) => {
                out.push_str("{\n");
                for (i, (key, val)) in fields.iter().enumerate() {
                    write!(out, "{inner}\"{}\": ", key.blue().bold())?;
                    write_value(out, val, indent + 1)?;
                    if i + 1 < fields.len() {
                        out.push(',');
                    }
                    out.push('\n');
                }
                write!(out, "{pad}}}")?;
            }
        }
        Ok(())
    }
}
