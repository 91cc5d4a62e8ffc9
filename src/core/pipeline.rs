//! End-to-end topic analysis of a parsed transcript.
//!
//! [`TopicPipeline::run`] wires the stages together:
//!
//! ```text
//! Corpus ─► normalize ─► vectorize ─► fit LDA ─► assign ─► trend / contributors
//! ```
//!
//! Notifications are left out of the model. Every sender-attributed record of
//! the returned corpus carries its dominant topic; notifications keep
//! `topic = None`.
//!
//! # Example
//!
//! ```rust,no_run
//! use chattopics::config::{PipelineConfig, TopicModelConfig};
//! use chattopics::core::pipeline::TopicPipeline;
//! use chattopics::parser::TranscriptParser;
//! use std::path::Path;
//!
//! # fn main() -> chattopics::Result<()> {
//! let corpus = TranscriptParser::new().parse(Path::new("chat.txt"))?;
//! let config = PipelineConfig::new()
//!     .with_topic_model(TopicModelConfig::new().with_num_topics(3));
//!
//! let analysis = TopicPipeline::english(config).run(&corpus)?;
//! for (topic, words) in analysis.top_words.iter().enumerate() {
//!     println!("Topic {topic}: {:?}", words);
//! }
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use tracing::info;

use super::analytics::{self, TopUsersPerTopic, TrendTable};
use super::interaction::InteractionGraph;
use super::lda::{LatentDirichletAllocation, TopicAssignment, TopicModel};
use super::normalize::TextNormalizer;
use super::reference::ReferenceData;
use super::vectorize::{CountVectorizer, DocumentTermMatrix, Vocabulary};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::parser::{Corpus, ParseSummary};

/// Everything one pipeline run produces.
#[derive(Debug, Clone, Serialize)]
pub struct TopicAnalysis {
    /// Input records with topics filled in
    pub corpus: Corpus,
    /// Normalized text of every sender-attributed record, in order
    pub normalized: Vec<String>,
    pub vocabulary: Vocabulary,
    pub matrix: DocumentTermMatrix,
    pub model: TopicModel,
    pub assignment: TopicAssignment,
    /// `(term, weight)` per topic, heaviest first
    pub top_words: Vec<Vec<(String, f64)>>,
    pub trend: TrendTable,
    pub contributors: TopUsersPerTopic,
    pub interactions: InteractionGraph,
    pub summary: ParseSummary,
}

impl TopicAnalysis {
    pub fn num_topics(&self) -> usize {
        self.model.num_topics()
    }
}

/// Configured normalizer, vectorizer and topic model.
#[derive(Debug, Clone)]
pub struct TopicPipeline {
    config: PipelineConfig,
    normalizer: TextNormalizer,
}

impl TopicPipeline {
    pub fn new(config: PipelineConfig, reference: ReferenceData) -> Self {
        Self {
            config,
            normalizer: TextNormalizer::new(reference),
        }
    }

    /// Pipeline with English stopwords and the built-in emoji table.
    pub fn english(config: PipelineConfig) -> Self {
        Self::new(config, ReferenceData::english())
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    /// Runs every stage over `corpus`.
    ///
    /// # Errors
    ///
    /// - [`Vocabulary`](crate::ChatTopicsError::Vocabulary) when there are no
    ///   sender-attributed messages or no term survives normalization
    /// - [`Config`](crate::ChatTopicsError::Config) for invalid settings,
    ///   including more topics than vocabulary terms
    pub fn run(&self, corpus: &Corpus) -> Result<TopicAnalysis> {
        let summary = corpus.summary();

        let positions: Vec<usize> = corpus
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.is_notification())
            .map(|(i, _)| i)
            .collect();
        let normalized = self
            .normalizer
            .normalize_all(corpus.messages().map(|r| r.text()));

        let vectorizer = CountVectorizer::new(self.config.vectorizer.clone())
            .with_stopwords(self.normalizer.reference().stopwords().clone());
        let (vocabulary, matrix) = vectorizer.fit(&normalized)?;

        let model = LatentDirichletAllocation::new(self.config.topic_model.clone()).fit(&matrix)?;

        let assignment = model.assign_topics();
        let mut tagged = corpus.clone();
        let records = tagged.records_mut();
        for (doc, &pos) in positions.iter().enumerate() {
            records[pos].topic = assignment.get(doc);
        }

        let k = model.num_topics();
        let top_words = model.top_words(&vocabulary, self.config.top_words);
        let trend = analytics::trend(&tagged, k);
        let contributors = analytics::top_contributors(&tagged, k, self.config.top_contributors);
        let interactions = InteractionGraph::from_corpus(&tagged);

        info!(
            messages = positions.len(),
            topics = k,
            terms = vocabulary.len(),
            iterations = model.iterations(),
            "Topic analysis complete"
        );

        Ok(TopicAnalysis {
            corpus: tagged,
            normalized,
            vocabulary,
            matrix,
            model,
            assignment,
            top_words,
            trend,
            contributors,
            interactions,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TopicModelConfig;
    use crate::core::reference::EmojiTable;
    use crate::message::MessageRecord;
    use crate::parser::TranscriptParser;

    fn pipeline(k: usize) -> TopicPipeline {
        let config =
            PipelineConfig::new().with_topic_model(TopicModelConfig::new().with_num_topics(k));
        TopicPipeline::new(config, ReferenceData::new(["the", "a"], EmojiTable::builtin()))
    }

    const CHAT: &str = "\
01/01/23, 10:00 am - Alice: pizza pasta cheese tonight
01/01/23, 10:05 am - Bob: football match goal tonight
01/01/23, 10:06 am - Alice added Carol
02/01/23, 9:00 am - Carol: pasta pizza cheese again
02/01/23, 9:30 am - Bob: goal football match again
";

    #[test]
    fn test_every_message_gets_a_topic() {
        let corpus = TranscriptParser::new().parse_str(CHAT);
        let analysis = pipeline(2).run(&corpus).unwrap();

        assert_eq!(analysis.corpus.len(), 5);
        for record in analysis.corpus.iter() {
            if record.is_notification() {
                assert!(record.topic.is_none());
            } else {
                assert!(record.topic.unwrap() < 2);
            }
        }
        assert_eq!(analysis.normalized.len(), 4);
        assert_eq!(analysis.assignment.len(), 4);
        assert_eq!(analysis.top_words.len(), 2);
        assert_eq!(analysis.summary.notifications, 1);
    }

    #[test]
    fn test_trend_totals_match_messages() {
        let corpus = TranscriptParser::new().parse_str(CHAT);
        let analysis = pipeline(2).run(&corpus).unwrap();
        let total: usize = analysis.trend.topic_totals().iter().sum();
        assert_eq!(total, 4);
        assert_eq!(analysis.trend.dates().len(), 2);
    }

    #[test]
    fn test_deterministic_for_same_seed() {
        let corpus = TranscriptParser::new().parse_str(CHAT);
        let a = pipeline(2).run(&corpus).unwrap();
        let b = pipeline(2).run(&corpus).unwrap();
        assert_eq!(a.corpus, b.corpus);
        assert_eq!(a.model.doc_topic(), b.model.doc_topic());
    }

    #[test]
    fn test_only_notifications_is_vocabulary_error() {
        let corpus = Corpus::new(vec![MessageRecord::notification("Alice joined", None)]);
        let err = pipeline(2).run(&corpus).unwrap_err();
        assert!(err.is_vocabulary());
    }

    #[test]
    fn test_too_many_topics_is_config_error() {
        let corpus = Corpus::new(vec![MessageRecord::from_sender("Alice", "pizza", None)]);
        let err = pipeline(3).run(&corpus).unwrap_err();
        assert!(err.is_config());
    }
}
