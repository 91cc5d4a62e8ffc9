//! Text processing, topic modeling and analytics.
//!
//! This module contains:
//! - [`reference`] - Stopwords and emoji names
//! - [`normalize`] - Message text cleaning
//! - [`vectorize`] - Vocabulary and term-count matrix
//! - [`lda`] - Latent Dirichlet Allocation
//! - [`analytics`] - Per-day trends and top contributors
//! - [`interaction`] - Sender/group network data
//! - [`pipeline`] - All of the above in one call
//! - [`report`] - Console summaries
//! - [`output`] - Table writers (CSV, JSON, JSONL)
//!
//! # Quick Start
//!
//! ```rust
//! use chattopics::core::{PipelineConfig, TopicPipeline, format_top_words};
//! use chattopics::parser::TranscriptParser;
//!
//! let corpus = TranscriptParser::new().parse_str(
//!     "01/01/23, 10:00 am - Alice: pizza pasta cheese\n\
//!      01/01/23, 10:05 am - Bob: football match goal\n",
//! );
//! let config = PipelineConfig::new().with_topic_model(
//!     chattopics::config::TopicModelConfig::new().with_num_topics(2),
//! );
//! let analysis = TopicPipeline::english(config).run(&corpus).unwrap();
//! print!("{}", format_top_words(&analysis.top_words));
//! ```

pub mod analytics;
pub mod interaction;
pub mod lda;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod reference;
pub mod report;
pub mod vectorize;

pub use analytics::{TopUsersPerTopic, TopicContributors, TrendTable, top_contributors, trend};
pub use interaction::InteractionGraph;
pub use lda::{ConvergenceWarning, LatentDirichletAllocation, TopicAssignment, TopicModel};
pub use normalize::TextNormalizer;
pub use pipeline::{TopicAnalysis, TopicPipeline};
pub use reference::{EmojiTable, ReferenceData};
pub use report::{format_parse_summary, format_top_contributors, format_top_words};
pub use vectorize::{CountVectorizer, DocumentTermMatrix, Vocabulary};

pub use crate::config::PipelineConfig;

// Conditionally re-export output writers
#[cfg(feature = "csv-output")]
pub use output::{to_csv, trend_to_csv, write_csv, write_trend_csv};
#[cfg(feature = "json-output")]
pub use output::{to_json, to_jsonl, write_json, write_jsonl};
