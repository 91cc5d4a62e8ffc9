//! CSV output writer.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use super::TopicRow;
use crate::core::analytics::TrendTable;
use crate::error::{ChatTopicsError, Result};
use crate::parser::Corpus;

/// Writes the message table to a CSV file.
///
/// # Format
/// - Delimiter: `,`
/// - Header: `date,user,message,month,day,year,hour,minute,topic`
/// - Missing values are empty fields
pub fn write_csv(corpus: &Corpus, output_path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = Writer::from_writer(file);
    write_rows(&mut writer, corpus)?;
    writer.flush()?;
    Ok(())
}

/// Same table as [`write_csv`], returned as a string.
pub fn to_csv(corpus: &Corpus) -> Result<String> {
    let mut writer = Writer::from_writer(Vec::new());
    write_rows(&mut writer, corpus)?;
    into_string(writer)
}

/// Writes the trend table to a CSV file.
pub fn write_trend_csv(trend: &TrendTable, output_path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = Writer::from_writer(file);
    write_trend(&mut writer, trend)?;
    writer.flush()?;
    Ok(())
}

/// Trend table as CSV: `date,topic_0,topic_1,...`, one row per date.
pub fn trend_to_csv(trend: &TrendTable) -> Result<String> {
    let mut writer = Writer::from_writer(Vec::new());
    write_trend(&mut writer, trend)?;
    into_string(writer)
}

fn write_rows<W: std::io::Write>(writer: &mut Writer<W>, corpus: &Corpus) -> Result<()> {
    if corpus.is_empty() {
        // serialize() emits the header with the first row only
        writer.write_record([
            "date", "user", "message", "month", "day", "year", "hour", "minute", "topic",
        ])?;
    }
    for record in corpus {
        writer.serialize(TopicRow::from(record))?;
    }
    Ok(())
}

fn write_trend<W: std::io::Write>(writer: &mut Writer<W>, trend: &TrendTable) -> Result<()> {
    let mut header = vec!["date".to_string()];
    header.extend((0..trend.num_topics()).map(|t| format!("topic_{t}")));
    writer.write_record(&header)?;

    for (date, row) in trend.dates().iter().zip(trend.counts()) {
        let mut fields = vec![date.format("%Y-%m-%d").to_string()];
        fields.extend(row.iter().map(ToString::to_string));
        writer.write_record(&fields)?;
    }
    Ok(())
}

fn into_string(writer: Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ChatTopicsError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| ChatTopicsError::decode(e, None))
}
