//! Unified error types for chattopics.
//!
//! Every stage-global failure is a variant of [`ChatTopicsError`]. Stage-local
//! issues never surface here: an unparsable timestamp becomes a record with no
//! timestamp (see [`ParseSummary`](crate::parser::ParseSummary)), and an
//! inference run that misses its tolerance carries a
//! [`ConvergenceWarning`](crate::core::lda::ConvergenceWarning) on the model.
//!
//! # Error Handling Philosophy
//!
//! - **Library users** get typed errors they can match on
//! - **Application users** get clear, actionable error messages
//! - A failure is never replaced by an empty result: "the corpus produced no
//!   vocabulary" and "the model found nothing interesting" are different things

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for chattopics operations.
///
/// # Example
///
/// ```rust
/// use chattopics::error::Result;
/// use chattopics::MessageRecord;
///
/// fn my_function() -> Result<Vec<MessageRecord>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatTopicsError>;

/// The error type for all chattopics operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatTopicsError {
    /// An I/O error occurred while reading a transcript or writing a table.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The transcript is not valid UTF-8 text.
    ///
    /// Fatal: parsing never starts on undecodable input.
    #[error("Failed to decode transcript{} as UTF-8: {source}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    Decode {
        /// The file path, if available
        path: Option<PathBuf>,
        /// The underlying UTF-8 error
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// No usable vocabulary could be built, so topic modeling cannot run.
    #[error("Vocabulary error: {0}")]
    Vocabulary(#[source] VocabularyErrorKind),

    /// A configuration value is invalid on its own or relative to the data.
    #[error("Invalid configuration for {parameter}: {message}")]
    Config {
        /// Name of the offending parameter (e.g. "num_topics")
        parameter: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing/serialization error.
    #[cfg(feature = "json-output")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Kinds of vocabulary failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VocabularyErrorKind {
    /// There were no documents to build a vocabulary from.
    #[error("corpus contains no documents")]
    EmptyCorpus,
    /// Every document reduced to nothing after normalization and filtering.
    #[error("no terms retained from {documents} documents after normalization")]
    NoTerms {
        /// Number of documents that were examined
        documents: usize,
    },
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatTopicsError {
    /// Creates a decode error for a transcript.
    pub fn decode(source: std::string::FromUtf8Error, path: Option<PathBuf>) -> Self {
        ChatTopicsError::Decode { path, source }
    }

    /// Creates a configuration error.
    pub fn config(parameter: &'static str, message: impl Into<String>) -> Self {
        ChatTopicsError::Config {
            parameter,
            message: message.into(),
        }
    }

    /// Creates an empty-corpus vocabulary error.
    pub fn empty_corpus() -> Self {
        ChatTopicsError::Vocabulary(VocabularyErrorKind::EmptyCorpus)
    }

    /// Creates a no-terms vocabulary error.
    pub fn no_terms(documents: usize) -> Self {
        ChatTopicsError::Vocabulary(VocabularyErrorKind::NoTerms { documents })
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatTopicsError::Io(_))
    }

    /// Returns `true` if this is a decode error.
    pub fn is_decode(&self) -> bool {
        matches!(self, ChatTopicsError::Decode { .. })
    }

    /// Returns `true` if this is a vocabulary error.
    pub fn is_vocabulary(&self) -> bool {
        matches!(self, ChatTopicsError::Vocabulary(_))
    }

    /// Returns `true` if this is a configuration error.
    pub fn is_config(&self) -> bool {
        matches!(self, ChatTopicsError::Config { .. })
    }
}
