//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure
//! - [`OutputFormat`] - Output format options, convertible to
//!   [`format::OutputFormat`](crate::format::OutputFormat)

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::{PipelineConfig, TopicModelConfig, VectorizerConfig};

/// Discover discussion topics in an exported group chat transcript.
#[derive(Parser, Debug, Clone)]
#[command(name = "chattopics")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chattopics chat.txt
    chattopics chat.txt -k 8 --seed 7 -o topics.json -f json
    chattopics chat.txt --trend trend.csv --graph senders.dot
    chattopics chat.txt --emoji-table emoji.json -vv")]
pub struct Args {
    /// Path to the exported transcript
    pub input: PathBuf,

    /// Number of topics
    #[arg(short = 'k', long, default_value_t = 5)]
    pub topics: usize,

    /// Vocabulary size cap
    #[arg(long, default_value_t = 1000)]
    pub max_features: usize,

    /// Random seed for the topic model
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Gibbs sampling sweeps
    #[arg(long, default_value_t = 200)]
    pub iterations: usize,

    /// Words shown per topic
    #[arg(long, default_value_t = 10)]
    pub top_words: usize,

    /// Senders shown per topic
    #[arg(long, default_value_t = 3)]
    pub top_contributors: usize,

    /// Path to the topic-tagged message table
    #[arg(short, long, default_value = "chat_topics.csv")]
    pub output: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    pub format: OutputFormat,

    /// Also write the per-day topic trend as CSV
    #[arg(long, value_name = "PATH")]
    pub trend: Option<PathBuf>,

    /// Also write the sender network as Graphviz DOT
    #[arg(long, value_name = "PATH")]
    pub graph: Option<PathBuf>,

    /// JSON object mapping emoji to names, replacing the built-in table
    #[arg(long, value_name = "PATH")]
    pub emoji_table: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Pipeline settings from the command line.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::new()
            .with_vectorizer(VectorizerConfig::new().with_max_features(self.max_features))
            .with_topic_model(
                TopicModelConfig::new()
                    .with_num_topics(self.topics)
                    .with_seed(self.seed)
                    .with_max_iterations(self.iterations),
            )
            .with_top_words(self.top_words)
            .with_top_contributors(self.top_contributors)
    }

    /// Log filter directive for the verbosity level.
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "chattopics=warn",
            1 => "chattopics=info",
            _ => "chattopics=debug",
        }
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Comma-separated table (default)
    #[default]
    Csv,

    /// JSON array of rows
    Json,

    /// JSON Lines, one row per line
    #[value(alias = "ndjson")]
    Jsonl,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", crate::format::OutputFormat::from(*self))
    }
}

// Conversion to library format type
impl From<OutputFormat> for crate::format::OutputFormat {
    fn from(format: OutputFormat) -> crate::format::OutputFormat {
        match format {
            OutputFormat::Csv => crate::format::OutputFormat::Csv,
            OutputFormat::Json => crate::format::OutputFormat::Json,
            OutputFormat::Jsonl => crate::format::OutputFormat::Jsonl,
        }
    }
}
