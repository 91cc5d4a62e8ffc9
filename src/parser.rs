//! Transcript parser for exported group chats.
//!
//! An export is one text blob in which every message starts with a timestamp
//! delimiter:
//!
//! ```text
//! 01/01/23, 10:00 am - Alice: Hello there
//! 01/01/23, 10:05 am - Bob: Hi Alice!
//! 01/01/23, 10:06 am - Alice added Carol
//! ```
//!
//! The text is split on every delimiter; whatever follows a delimiter up to
//! the next one is that entry's body. Text before the first delimiter is
//! dropped. Bodies of the form `Sender: message` become sender-attributed
//! records; anything else (including multi-line bodies) is a notification.
//!
//! Per-record problems never fail the parse: an unparsable delimiter (e.g. a
//! 31st of February) gives a record without a timestamp, and the
//! [`ParseSummary`] reports how many there were.
//!
//! # Example
//!
//! ```rust
//! use chattopics::parser::TranscriptParser;
//!
//! let parser = TranscriptParser::new();
//! let corpus = parser.parse_str(
//!     "01/01/23, 10:00 am - Alice: Hello there\n01/01/23, 10:05 am - Bob: Hi Alice!\n",
//! );
//!
//! assert_eq!(corpus.len(), 2);
//! assert_eq!(corpus.records()[1].sender(), "Bob");
//! ```

use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ChatTopicsError, Result};
use crate::message::MessageRecord;

/// Timestamp delimiter: `D{1,2}/D{1,2}/D{2}, H{1,2}:MM am|pm -`.
const TIMESTAMP_PATTERN: &str =
    r"(\d{1,2})/(\d{1,2})/(\d{2}),\s(\d{1,2}):(\d{1,2})\s?([aApP][mM])\s?-";

/// `Sender: message`, anchored to the whole body. `.` does not cross lines.
const SENDER_PATTERN: &str = r"\A([\w\s]+?):\s(.+)\n?\z";

/// Chrono format for a canonicalized delimiter (day first).
const TIMESTAMP_FORMAT: &str = "%d/%m/%y, %I:%M %p";

/// Ordered records of one transcript.
///
/// Insertion order is transcript order and is preserved by every stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
    records: Vec<MessageRecord>,
}

impl Corpus {
    pub fn new(records: Vec<MessageRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[MessageRecord] {
        &self.records
    }

    pub(crate) fn records_mut(&mut self) -> &mut [MessageRecord] {
        &mut self.records
    }

    pub fn into_records(self) -> Vec<MessageRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MessageRecord> {
        self.records.iter()
    }

    /// Sender-attributed records, in transcript order.
    pub fn messages(&self) -> impl Iterator<Item = &MessageRecord> {
        self.records.iter().filter(|r| !r.is_notification())
    }

    /// `(user, message)` pairs excluding notifications.
    pub fn user_messages(&self) -> impl Iterator<Item = (&str, &str)> {
        self.messages().map(|r| (r.sender(), r.text()))
    }

    /// Counts of records, notifications and missing timestamps.
    pub fn summary(&self) -> ParseSummary {
        ParseSummary {
            records: self.records.len(),
            notifications: self.records.iter().filter(|r| r.is_notification()).count(),
            null_timestamps: self.records.iter().filter(|r| r.timestamp().is_none()).count(),
        }
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a MessageRecord;
    type IntoIter = std::slice::Iter<'a, MessageRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// What the parser absorbed instead of failing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseSummary {
    /// Number of records (= number of delimiter matches)
    pub records: usize,
    /// Records without an attributable sender
    pub notifications: usize,
    /// Records whose delimiter could not be parsed as a date and time
    pub null_timestamps: usize,
}

impl ParseSummary {
    /// Sender-attributed records.
    pub fn user_messages(&self) -> usize {
        self.records - self.notifications
    }
}

/// Splits a transcript into [`MessageRecord`]s.
#[derive(Debug, Clone)]
pub struct TranscriptParser {
    timestamp_regex: Regex,
    sender_regex: Regex,
}

impl TranscriptParser {
    /// Creates a parser for the fixed delimiter grammar.
    pub fn new() -> Self {
        Self {
            timestamp_regex: Regex::new(TIMESTAMP_PATTERN).expect("timestamp pattern is valid"),
            sender_regex: Regex::new(SENDER_PATTERN).expect("sender pattern is valid"),
        }
    }

    /// Reads and parses a transcript file.
    pub fn parse(&self, path: &Path) -> Result<Corpus> {
        let bytes = fs::read(path)?;
        let content = String::from_utf8(bytes)
            .map_err(|e| ChatTopicsError::decode(e, Some(path.to_path_buf())))?;
        Ok(self.parse_str(&content))
    }

    /// Parses raw bytes, failing only if they are not UTF-8.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Corpus> {
        let content =
            String::from_utf8(bytes.to_vec()).map_err(|e| ChatTopicsError::decode(e, None))?;
        Ok(self.parse_str(&content))
    }

    /// Parses transcript text. Never fails; zero delimiters give an empty corpus.
    pub fn parse_str(&self, content: &str) -> Corpus {
        let delimiters: Vec<regex::Captures<'_>> =
            self.timestamp_regex.captures_iter(content).collect();

        let mut records = Vec::with_capacity(delimiters.len());

        for (i, caps) in delimiters.iter().enumerate() {
            let whole = caps.get(0).expect("group 0 always participates");
            let body_end = delimiters
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map_or(content.len(), |m| m.start());
            let body = &content[whole.end()..body_end];

            let timestamp = parse_timestamp(caps);
            if timestamp.is_none() {
                warn!(delimiter = whole.as_str(), "Unparsable timestamp, keeping record");
            }

            records.push(self.build_record(body, timestamp));
        }

        let corpus = Corpus::new(records);
        let summary = corpus.summary();
        info!(
            records = summary.records,
            notifications = summary.notifications,
            null_timestamps = summary.null_timestamps,
            "Parsed transcript"
        );
        corpus
    }

    fn build_record(&self, body: &str, timestamp: Option<NaiveDateTime>) -> MessageRecord {
        // Delimiters end in "-", so bodies normally start with one space.
        let trimmed = body.strip_prefix(' ').unwrap_or(body);
        match self.sender_regex.captures(trimmed) {
            Some(caps) => {
                let sender = caps.get(1).map_or("", |m| m.as_str());
                let text = caps.get(2).map_or("", |m| m.as_str());
                MessageRecord::from_sender(sender, text.trim(), timestamp)
            }
            None => {
                debug!(body = body.trim(), "No sender prefix, treating as notification");
                MessageRecord::notification(body.trim(), timestamp)
            }
        }
    }
}

impl Default for TranscriptParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a timestamp from the delimiter's captures.
///
/// The parts are re-joined in a canonical layout so optional whitespace in
/// the export (including U+202F before the meridiem) does not matter.
fn parse_timestamp(caps: &regex::Captures<'_>) -> Option<NaiveDateTime> {
    let part = |i: usize| caps.get(i).map_or("", |m| m.as_str());
    let canonical = format!(
        "{}/{}/{}, {}:{} {}",
        part(1),
        part(2),
        part(3),
        part(4),
        part(5),
        part(6)
    );
    NaiveDateTime::parse_from_str(&canonical, TIMESTAMP_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn parse(text: &str) -> Corpus {
        TranscriptParser::new().parse_str(text)
    }

    #[test]
    fn test_two_user_messages() {
        let corpus = parse(
            "01/01/23, 10:00 am - Alice: Hello there\n01/01/23, 10:05 am - Bob: Hi Alice!\n",
        );
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.records()[0].sender(), "Alice");
        assert_eq!(corpus.records()[0].text(), "Hello there");
        assert_eq!(corpus.records()[1].sender(), "Bob");
        assert_eq!(corpus.records()[1].text(), "Hi Alice!");
        assert!(corpus.iter().all(|r| !r.is_notification()));
    }

    #[test]
    fn test_notification_without_sender() {
        let corpus = parse("01/01/23, 10:00 am - Alice added Bob\n");
        assert_eq!(corpus.len(), 1);
        let rec = &corpus.records()[0];
        assert!(rec.is_notification());
        assert_eq!(rec.sender(), "notification");
        assert_eq!(rec.text(), "Alice added Bob");
    }

    #[test]
    fn test_text_before_first_delimiter_is_dropped() {
        let corpus = parse("Chat export header\n02/03/23, 9:15 pm - Carol: evening\n");
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.records()[0].sender(), "Carol");
    }

    #[test]
    fn test_no_delimiters_gives_empty_corpus() {
        let corpus = parse("just some text\nwith no timestamps\n");
        assert!(corpus.is_empty());
        assert_eq!(corpus.summary(), ParseSummary::default());
    }

    #[test]
    fn test_day_first_and_pm() {
        let corpus = parse("13/02/23, 9:05 pm - Alice: late\n");
        let ts = corpus.records()[0].timestamp().unwrap();
        assert_eq!(ts.year(), 2023);
        assert_eq!(ts.month(), 2);
        assert_eq!(ts.day(), 13);
        assert_eq!(ts.hour(), 21);
        assert_eq!(ts.minute(), 5);
    }

    #[test]
    fn test_twelve_am_is_midnight() {
        let corpus = parse("01/01/23, 12:30 am - Alice: night\n");
        assert_eq!(corpus.records()[0].timestamp().unwrap().hour(), 0);
    }

    #[test]
    fn test_meridiem_case_insensitive_and_spacing() {
        let corpus = parse(
            "01/01/23, 10:00 AM - Alice: a\n01/01/23, 10:01pm- Bob: b\n01/01/23, 10:02\u{202f}Pm - Carol: c\n",
        );
        assert_eq!(corpus.len(), 3);
        assert!(corpus.iter().all(|r| r.timestamp().is_some()));
        assert_eq!(corpus.records()[1].sender(), "Bob");
    }

    #[test]
    fn test_invalid_date_keeps_record_with_null_timestamp() {
        let corpus = parse("31/02/23, 10:00 am - Alice: impossible date\n");
        assert_eq!(corpus.len(), 1);
        let rec = &corpus.records()[0];
        assert!(rec.timestamp().is_none());
        assert!(rec.calendar().is_none());
        assert_eq!(rec.sender(), "Alice");
        assert_eq!(corpus.summary().null_timestamps, 1);
    }

    #[test]
    fn test_multiline_body_is_notification() {
        let corpus = parse("01/01/23, 10:00 am - Alice: first line\nsecond line\n");
        assert_eq!(corpus.len(), 1);
        assert!(corpus.records()[0].is_notification());
        assert!(corpus.records()[0].text().contains("second line"));
    }

    #[test]
    fn test_colon_without_sender_shape_is_notification() {
        let corpus = parse("01/01/23, 10:00 am - Group \"Plans: 2023\" was created\n");
        assert!(corpus.records()[0].is_notification());
    }

    #[test]
    fn test_sender_with_spaces() {
        let corpus = parse("01/01/23, 10:00 am - Mary Jane: hi all\n");
        assert_eq!(corpus.records()[0].sender(), "Mary Jane");
    }

    #[test]
    fn test_message_may_contain_colons() {
        let corpus = parse("01/01/23, 10:00 am - Bob: meet at 10:30: ok?\n");
        let rec = &corpus.records()[0];
        assert_eq!(rec.sender(), "Bob");
        assert_eq!(rec.text(), "meet at 10:30: ok?");
    }

    #[test]
    fn test_summary_counts() {
        let corpus = parse(
            "01/01/23, 10:00 am - Alice created group \"x\"\n\
             01/01/23, 10:01 am - Alice: hi\n\
             32/01/23, 10:02 am - Bob: hey\n",
        );
        let summary = corpus.summary();
        assert_eq!(summary.records, 3);
        assert_eq!(summary.notifications, 1);
        assert_eq!(summary.null_timestamps, 1);
        assert_eq!(summary.user_messages(), 2);
    }

    #[test]
    fn test_user_messages_iterator() {
        let corpus = parse(
            "01/01/23, 10:00 am - Alice added Bob\n01/01/23, 10:01 am - Bob: thanks\n",
        );
        let pairs: Vec<_> = corpus.user_messages().collect();
        assert_eq!(pairs, vec![("Bob", "thanks")]);
    }

    #[test]
    fn test_parse_bytes_rejects_invalid_utf8() {
        let err = TranscriptParser::new()
            .parse_bytes(&[0x30, 0xff, 0xfe])
            .unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_parse_missing_file_is_io_error() {
        let err = TranscriptParser::new()
            .parse(Path::new("/definitely/not/here.txt"))
            .unwrap_err();
        assert!(err.is_io());
    }
}
