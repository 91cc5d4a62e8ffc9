//! JSON output writer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::TopicRow;
use crate::error::Result;
use crate::parser::Corpus;

/// Writes the message table to a JSON file as an array.
///
/// # Format
/// ```json
/// [
///   {"date": "2023-01-01 10:00:00", "user": "Alice", "message": "Hello", "month": "January", ...},
///   {"date": null, "user": "notification", "message": "Bob left", "month": null, ...}
/// ]
/// ```
pub fn write_json(corpus: &Corpus, output_path: impl AsRef<Path>) -> Result<()> {
    let json = to_json(corpus)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Same array as [`write_json`], returned as a string.
pub fn to_json(corpus: &Corpus) -> Result<String> {
    let rows: Vec<TopicRow> = corpus.iter().map(TopicRow::from).collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}
