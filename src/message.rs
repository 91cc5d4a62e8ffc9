//! Per-message records recovered from a transcript.
//!
//! A [`MessageRecord`] is created once by the
//! [`TranscriptParser`](crate::parser::TranscriptParser) and never changes,
//! except for the `topic` slot which the topic pipeline fills in for every
//! sender-attributed message.
//!
//! # Examples
//!
//! ```
//! use chattopics::MessageRecord;
//! use chrono::NaiveDate;
//!
//! let ts = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap().and_hms_opt(10, 0, 0).unwrap();
//! let msg = MessageRecord::from_sender("Alice", "Hello there", Some(ts));
//!
//! assert_eq!(msg.sender(), "Alice");
//! assert!(!msg.is_notification());
//! assert_eq!(msg.calendar().unwrap().month_name(), "January");
//! ```

use chrono::{Datelike, Month, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Sender value used for records with no attributable sender.
pub const NOTIFICATION_SENDER: &str = "notification";

/// Calendar fields derived from a record's timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalendarFields {
    pub year: i32,
    /// Month number, 1-12
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl CalendarFields {
    /// Extracts the fields from a timestamp.
    pub fn from_timestamp(ts: &NaiveDateTime) -> Self {
        Self {
            year: ts.year(),
            month: ts.month(),
            day: ts.day(),
            hour: ts.hour(),
            minute: ts.minute(),
        }
    }

    /// English month name, e.g. "March".
    pub fn month_name(&self) -> &'static str {
        u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map_or("", |m| m.name())
    }
}

/// One entry of a chat transcript.
///
/// Exactly one of these holds for every record: it is a notification, or it
/// has a real sender. [`MessageRecord::sender`] returns
/// [`NOTIFICATION_SENDER`] for notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredRecord")]
pub struct MessageRecord {
    timestamp: Option<NaiveDateTime>,

    sender: String,

    text: String,

    is_notification: bool,

    calendar: Option<CalendarFields>,

    /// Dominant topic, set by the topic pipeline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<usize>,
}

/// Serialized form; derived fields are recomputed on load.
#[derive(Deserialize)]
struct StoredRecord {
    timestamp: Option<NaiveDateTime>,
    sender: String,
    text: String,
    #[serde(default)]
    topic: Option<usize>,
}

impl From<StoredRecord> for MessageRecord {
    fn from(stored: StoredRecord) -> Self {
        let record = Self::from_sender(stored.sender, stored.text, stored.timestamp);
        Self {
            topic: stored.topic,
            ..record
        }
    }
}

impl MessageRecord {
    /// Creates a sender-attributed message.
    ///
    /// An empty (after trimming) sender, or one literally named
    /// [`NOTIFICATION_SENDER`], yields a notification instead.
    pub fn from_sender(
        sender: impl Into<String>,
        text: impl Into<String>,
        timestamp: Option<NaiveDateTime>,
    ) -> Self {
        let sender = sender.into();
        let sender = sender.trim();
        if sender.is_empty() || sender == NOTIFICATION_SENDER {
            return Self::notification(text, timestamp);
        }
        Self {
            timestamp,
            sender: sender.to_string(),
            text: text.into(),
            is_notification: false,
            calendar: timestamp.as_ref().map(CalendarFields::from_timestamp),
            topic: None,
        }
    }

    /// Creates a notification (system text with no sender).
    pub fn notification(text: impl Into<String>, timestamp: Option<NaiveDateTime>) -> Self {
        Self {
            timestamp,
            sender: NOTIFICATION_SENDER.to_string(),
            text: text.into(),
            is_notification: true,
            calendar: timestamp.as_ref().map(CalendarFields::from_timestamp),
            topic: None,
        }
    }

    /// Replaces the timestamp and recomputes the calendar fields.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: Option<NaiveDateTime>) -> Self {
        self.timestamp = timestamp;
        self.calendar = timestamp.as_ref().map(CalendarFields::from_timestamp);
        self
    }

    /// Builder-style method to set the topic.
    #[must_use]
    pub fn with_topic(mut self, topic: usize) -> Self {
        self.topic = Some(topic);
        self
    }

    /// Timestamp, `None` when the delimiter text could not be parsed.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        self.timestamp
    }

    /// Returns the sender, or `"notification"`.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Returns the message body.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_notification(&self) -> bool {
        self.is_notification
    }

    /// Calendar fields, absent when the timestamp is.
    pub fn calendar(&self) -> Option<&CalendarFields> {
        self.calendar.as_ref()
    }

    /// Calendar day of the message.
    pub fn date(&self) -> Option<NaiveDate> {
        self.timestamp.map(|ts| ts.date())
    }
}
