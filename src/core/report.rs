//! Plain-text summaries for console output.

use std::fmt::Write as _;

use super::analytics::TopUsersPerTopic;
use crate::parser::ParseSummary;

/// One line per topic: `Topic 0: pizza, pasta, cheese`.
pub fn format_top_words(top_words: &[Vec<(String, f64)>]) -> String {
    let mut out = String::new();
    for (topic, words) in top_words.iter().enumerate() {
        let words: Vec<&str> = words.iter().map(|(w, _)| w.as_str()).collect();
        let _ = writeln!(out, "Topic {topic}: {}", words.join(", "));
    }
    out
}

/// One line per topic: `Topic 0: Bob (2), Alice (1)`.
pub fn format_top_contributors(contributors: &TopUsersPerTopic) -> String {
    let mut out = String::new();
    for entry in contributors.iter() {
        if entry.senders.is_empty() {
            let _ = writeln!(out, "Topic {}: (no messages)", entry.topic);
            continue;
        }
        let senders: Vec<String> = entry
            .senders
            .iter()
            .map(|(name, count)| format!("{name} ({count})"))
            .collect();
        let _ = writeln!(out, "Topic {}: {}", entry.topic, senders.join(", "));
    }
    out
}

pub fn format_parse_summary(summary: &ParseSummary) -> String {
    format!(
        "Records:         {}\nUser messages:   {}\nNotifications:   {}\nNull timestamps: {}\n",
        summary.records,
        summary.user_messages(),
        summary.notifications,
        summary.null_timestamps
    )
}
