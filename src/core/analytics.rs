//! Aggregates over topic-tagged records.
//!
//! - [`trend`] counts messages per calendar day and topic into a dense table
//! - [`top_contributors`] ranks the senders of every topic
//!
//! Only sender-attributed records that carry a topic take part. Records with
//! no timestamp cannot be placed on a day; [`trend`] leaves them out and
//! reports how many it skipped.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::parser::Corpus;

/// Dense date × topic message counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendTable {
    dates: Vec<NaiveDate>,
    num_topics: usize,
    /// One row per date, one column per topic
    counts: Vec<Vec<usize>>,
    skipped_null_timestamps: usize,
}

impl TrendTable {
    /// Dates in ascending order.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn num_topics(&self) -> usize {
        self.num_topics
    }

    /// Rows aligned with [`dates`](Self::dates).
    pub fn counts(&self) -> &[Vec<usize>] {
        &self.counts
    }

    /// Count for one cell; zero for unobserved topics, `None` for unknown dates.
    pub fn get(&self, date: NaiveDate, topic: usize) -> Option<usize> {
        let row = self.dates.binary_search(&date).ok()?;
        Some(self.counts[row].get(topic).copied().unwrap_or(0))
    }

    /// Tagged records left out because they had no timestamp.
    pub fn skipped_null_timestamps(&self) -> usize {
        self.skipped_null_timestamps
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Every `(date, topic, count)` cell, zeros included.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, usize, usize)> + '_ {
        self.dates.iter().zip(&self.counts).flat_map(|(&date, row)| {
            row.iter()
                .enumerate()
                .map(move |(topic, &count)| (date, topic, count))
        })
    }

    /// Messages per topic over all dates.
    pub fn topic_totals(&self) -> Vec<usize> {
        let mut totals = vec![0; self.num_topics];
        for row in &self.counts {
            for (t, &c) in row.iter().enumerate() {
                totals[t] += c;
            }
        }
        totals
    }
}

/// Builds the date × topic table.
///
/// The table has `num_topics` columns, widened if a record carries a larger
/// topic index.
pub fn trend(corpus: &Corpus, num_topics: usize) -> TrendTable {
    let mut by_date: BTreeMap<NaiveDate, Vec<usize>> = BTreeMap::new();
    let mut skipped = 0;
    let mut width = num_topics;

    for record in corpus.messages() {
        let Some(topic) = record.topic else {
            continue;
        };
        let Some(date) = record.date() else {
            skipped += 1;
            continue;
        };
        width = width.max(topic + 1);
        let row = by_date.entry(date).or_default();
        if row.len() <= topic {
            row.resize(topic + 1, 0);
        }
        row[topic] += 1;
    }

    let (dates, mut counts): (Vec<_>, Vec<_>) = by_date.into_iter().unzip();
    for row in &mut counts {
        row.resize(width, 0);
    }

    debug!(dates = dates.len(), topics = width, skipped, "Built trend table");

    TrendTable {
        dates,
        num_topics: width,
        counts,
        skipped_null_timestamps: skipped,
    }
}

/// Ranked senders of one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicContributors {
    pub topic: usize,
    /// `(sender, messages)` by count descending, then first appearance
    pub senders: Vec<(String, usize)>,
}

/// Top senders for every topic, in topic order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopUsersPerTopic {
    topics: Vec<TopicContributors>,
}

impl TopUsersPerTopic {
    pub fn topics(&self) -> &[TopicContributors] {
        &self.topics
    }

    pub fn get(&self, topic: usize) -> Option<&TopicContributors> {
        self.topics.get(topic)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TopicContributors> {
        self.topics.iter()
    }
}

/// Counts messages per `(sender, topic)` and keeps the top `n` senders per topic.
///
/// Senders with equal counts keep the order in which they first appear in
/// the corpus.
pub fn top_contributors(corpus: &Corpus, num_topics: usize, n: usize) -> TopUsersPerTopic {
    let mut senders: Vec<&str> = Vec::new();
    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<Vec<usize>> = vec![Vec::new(); num_topics];

    for record in corpus.messages() {
        let Some(topic) = record.topic else {
            continue;
        };
        let sender = record.sender();
        let idx = *seen.entry(sender).or_insert_with(|| {
            senders.push(sender);
            senders.len() - 1
        });
        if counts.len() <= topic {
            counts.resize(topic + 1, Vec::new());
        }
        let row = &mut counts[topic];
        if row.len() <= idx {
            row.resize(idx + 1, 0);
        }
        row[idx] += 1;
    }

    let topics = counts
        .into_iter()
        .enumerate()
        .map(|(topic, row)| {
            let mut ranked: Vec<(usize, usize)> = row
                .into_iter()
                .enumerate()
                .filter(|&(_, c)| c > 0)
                .collect();
            // Stable sort: equal counts stay in first-seen order.
            ranked.sort_by(|a, b| b.1.cmp(&a.1));
            TopicContributors {
                topic,
                senders: ranked
                    .into_iter()
                    .take(n)
                    .map(|(idx, c)| (senders[idx].to_string(), c))
                    .collect(),
            }
        })
        .collect();

    TopUsersPerTopic { topics }
}
