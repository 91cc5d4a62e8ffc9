//! Output format selection for the message table.
//!
//! Library-level enum with no CLI dependency; the binary maps its clap
//! value onto it.
//!
//! # Example
//!
//! ```rust
//! use chattopics::format::OutputFormat;
//!
//! let format = OutputFormat::from_path("topics.jsonl").unwrap();
//! assert_eq!(format, OutputFormat::Jsonl);
//! assert_eq!(format.extension(), "jsonl");
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ChatTopicsError, Result};
use crate::parser::Corpus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    /// Comma-separated table with a header row
    #[default]
    Csv,
    /// Pretty-printed JSON array
    Json,
    /// One JSON object per line
    Jsonl,
}

impl OutputFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Jsonl => "jsonl",
        }
    }

    pub fn all_names() -> &'static [&'static str] {
        &["csv", "json", "jsonl", "ndjson"]
    }

    pub fn all() -> &'static [OutputFormat] {
        &[OutputFormat::Csv, OutputFormat::Json, OutputFormat::Jsonl]
    }

    /// Detects the format from a file extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        ext.parse()
            .map_err(|message| ChatTopicsError::config("format", message))
    }

    fn required_feature(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv-output",
            OutputFormat::Json | OutputFormat::Jsonl => "json-output",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "CSV"),
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Jsonl => write!(f, "JSONL"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            _ => Err(format!(
                "unknown format '{}', expected one of: {}",
                s,
                OutputFormat::all_names().join(", ")
            )),
        }
    }
}

/// Writes the message table in the given format.
///
/// # Errors
///
/// Fails if the format's feature is disabled or the file cannot be written.
#[allow(unused_variables)]
pub fn write_to_format(corpus: &Corpus, path: impl AsRef<Path>, format: OutputFormat) -> Result<()> {
    match format {
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::write_csv(corpus, path),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::core::output::write_json(corpus, path),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => crate::core::output::write_jsonl(corpus, path),
        #[allow(unreachable_patterns)]
        _ => Err(feature_disabled(format)),
    }
}

/// Renders the message table in the given format.
#[allow(unused_variables)]
pub fn to_format_string(corpus: &Corpus, format: OutputFormat) -> Result<String> {
    match format {
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::to_csv(corpus),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::core::output::to_json(corpus),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => crate::core::output::to_jsonl(corpus),
        #[allow(unreachable_patterns)]
        _ => Err(feature_disabled(format)),
    }
}

#[allow(dead_code)]
fn feature_disabled(format: OutputFormat) -> ChatTopicsError {
    ChatTopicsError::config(
        "format",
        format!(
            "{format} output requires the '{}' feature",
            format.required_feature()
        ),
    )
}
