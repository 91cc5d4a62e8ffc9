//! JSON Lines (JSONL) output writer.
//!
//! One record per line, handy for loading into dataframes or streaming
//! consumers.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::TopicRow;
use crate::error::Result;
use crate::parser::Corpus;

/// Writes the message table to a JSONL file.
///
/// ```jsonl
/// {"date":"2023-01-01 10:00:00","user":"Alice","message":"Hello",...,"topic":0}
/// {"date":"2023-01-01 10:05:00","user":"notification","message":"Bob left",...,"topic":null}
/// ```
pub fn write_jsonl(corpus: &Corpus, output_path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    write_lines(&mut writer, corpus)?;
    writer.flush()?;
    Ok(())
}

/// Same lines as [`write_jsonl`], returned as a string.
pub fn to_jsonl(corpus: &Corpus) -> Result<String> {
    let mut buf = Vec::new();
    write_lines(&mut buf, corpus)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn write_lines<W: Write>(writer: &mut W, corpus: &Corpus) -> Result<()> {
    for record in corpus {
        let line = serde_json::to_string(&TopicRow::from(record))?;
        writeln!(writer, "{line}")?;
    }
    Ok(())
}
