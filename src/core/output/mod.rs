//! Writers for the topic-tagged message table.
//!
//! Every format carries the same columns, one row per record in transcript
//! order:
//!
//! | Column | Content |
//! |--------|---------|
//! | `date` | `YYYY-MM-DD HH:MM:SS`, empty/null when the timestamp is unknown |
//! | `user` | sender, or `notification` |
//! | `message` | raw message text |
//! | `month` | English month name |
//! | `day`, `year`, `hour`, `minute` | calendar fields |
//! | `topic` | dominant topic, empty/null for notifications |
//!
//! - [`write_csv`] / [`to_csv`] and [`trend_to_csv`] require the `csv-output` feature
//! - [`write_json`] / [`to_json`] and [`write_jsonl`] / [`to_jsonl`] require `json-output`
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "csv-output")]
//! # fn main() -> chattopics::Result<()> {
//! use chattopics::core::output::to_csv;
//! use chattopics::parser::TranscriptParser;
//!
//! let corpus = TranscriptParser::new().parse_str("01/02/23, 9:15 pm - Alice: hi\n");
//! let csv = to_csv(&corpus)?;
//! assert!(csv.starts_with("date,user,message,month,day,year,hour,minute,topic"));
//! assert!(csv.contains("2023-02-01 21:15:00,Alice,hi,February,1,2023,21,15,"));
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "csv-output"))]
//! # fn main() {}
//! ```

use serde::Serialize;

use crate::message::MessageRecord;

#[cfg(feature = "csv-output")]
mod csv_writer;
#[cfg(feature = "json-output")]
mod json_writer;
#[cfg(feature = "json-output")]
mod jsonl_writer;

#[cfg(feature = "csv-output")]
pub use csv_writer::{to_csv, trend_to_csv, write_csv, write_trend_csv};
#[cfg(feature = "json-output")]
pub use json_writer::{to_json, write_json};
#[cfg(feature = "json-output")]
pub use jsonl_writer::{to_jsonl, write_jsonl};

/// Timestamp layout of the `date` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One output row. Field order is column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicRow {
    pub date: Option<String>,
    pub user: String,
    pub message: String,
    pub month: Option<String>,
    pub day: Option<u32>,
    pub year: Option<i32>,
    pub hour: Option<u32>,
    pub minute: Option<u32>,
    pub topic: Option<usize>,
}

impl From<&MessageRecord> for TopicRow {
    fn from(record: &MessageRecord) -> Self {
        let cal = record.calendar();
        Self {
            date: record
                .timestamp()
                .map(|ts| ts.format(DATE_FORMAT).to_string()),
            user: record.sender().to_string(),
            message: record.text().to_string(),
            month: cal.map(|c| c.month_name().to_string()),
            day: cal.map(|c| c.day),
            year: cal.map(|c| c.year),
            hour: cal.map(|c| c.hour),
            minute: cal.map(|c| c.minute),
            topic: record.topic,
        }
    }
}
