//! # Chattopics
//!
//! A Rust library for finding discussion topics in exported group chat
//! transcripts.
//!
//! ## Overview
//!
//! Chattopics reads the plain-text export of a WhatsApp-style group chat and
//! runs it through a deterministic pipeline:
//!
//! 1. **Parse** the transcript into ordered [`MessageRecord`]s, separating
//!    sender messages from system notifications
//! 2. **Normalize** message text (emoji, mentions, links, digits, stopwords)
//! 3. **Vectorize** into a bounded vocabulary and term-count matrix
//! 4. **Fit** a Latent Dirichlet Allocation topic model (seeded, reproducible)
//! 5. **Aggregate** per-day topic trends and top contributors per topic
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chattopics::prelude::*;
//! use std::path::Path;
//!
//! fn main() -> Result<()> {
//!     let corpus = TranscriptParser::new().parse(Path::new("chat.txt"))?;
//!
//!     let config = PipelineConfig::new()
//!         .with_topic_model(TopicModelConfig::new().with_num_topics(5).with_seed(42));
//!     let analysis = TopicPipeline::english(config).run(&corpus)?;
//!
//!     print!("{}", format_top_words(&analysis.top_words));
//!     write_csv(&analysis.corpus, "topics.csv")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`parser`] - [`TranscriptParser`](parser::TranscriptParser), [`Corpus`](parser::Corpus)
//! - [`message`] - [`MessageRecord`] and its calendar fields
//! - [`config`] - Vectorizer, topic model and pipeline settings
//! - [`core`] - Normalization, vectorization, LDA, analytics and output
//! - [`format`] - [`OutputFormat`](format::OutputFormat) selection
//! - [`error`] - Unified error types ([`ChatTopicsError`], [`Result`])
//! - [`prelude`] - Convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod format;
pub mod message;
pub mod parser;

// Re-export the main types at the crate root for convenience
pub use error::{ChatTopicsError, Result};
pub use message::MessageRecord;

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chattopics::prelude::*;
/// ```
pub mod prelude {
    pub use crate::MessageRecord;

    pub use crate::error::{ChatTopicsError, Result, VocabularyErrorKind};

    pub use crate::parser::{Corpus, ParseSummary, TranscriptParser};

    pub use crate::config::{PipelineConfig, TopicModelConfig, VectorizerConfig};

    pub use crate::core::{
        ConvergenceWarning, CountVectorizer, DocumentTermMatrix, EmojiTable, InteractionGraph,
        LatentDirichletAllocation, ReferenceData, TextNormalizer, TopUsersPerTopic,
        TopicAnalysis, TopicModel, TopicPipeline, TrendTable, Vocabulary, top_contributors,
        trend,
    };

    pub use crate::core::{format_parse_summary, format_top_contributors, format_top_words};

    #[cfg(feature = "csv-output")]
    pub use crate::core::output::{to_csv, trend_to_csv, write_csv};
    #[cfg(feature = "json-output")]
    pub use crate::core::output::{to_json, to_jsonl, write_json, write_jsonl};

    pub use crate::format::OutputFormat;
}
