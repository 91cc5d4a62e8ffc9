//! Configuration types for the topic discovery pipeline.
//!
//! This module provides plain configuration structs for library usage,
//! without any CLI framework dependencies.
//!
//! - [`VectorizerConfig`] - vocabulary cap and token rules
//! - [`TopicModelConfig`] - number of topics, priors, seed and iteration budget
//! - [`PipelineConfig`] - the two above plus reporting sizes
//!
//! # Example
//!
//! ```rust
//! use chattopics::config::{PipelineConfig, TopicModelConfig};
//!
//! let config = PipelineConfig::new()
//!     .with_topic_model(TopicModelConfig::new().with_num_topics(8).with_seed(7))
//!     .with_top_words(15);
//!
//! assert_eq!(config.topic_model.num_topics, 8);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ChatTopicsError, Result};

/// Configuration for building the vocabulary and term-count matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorizerConfig {
    /// Maximum number of distinct terms kept (default: 1000)
    pub max_features: usize,

    /// Minimum number of word characters in a token (default: 2)
    pub min_token_chars: usize,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            max_features: 1000,
            min_token_chars: 2,
        }
    }
}

impl VectorizerConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the vocabulary cap.
    #[must_use]
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }

    /// Sets the minimum token length.
    #[must_use]
    pub fn with_min_token_chars(mut self, chars: usize) -> Self {
        self.min_token_chars = chars;
        self
    }

    /// Checks values that are invalid regardless of the data.
    pub fn validate(&self) -> Result<()> {
        if self.max_features == 0 {
            return Err(ChatTopicsError::config(
                "max_features",
                "vocabulary cap must be greater than zero",
            ));
        }
        if self.min_token_chars == 0 {
            return Err(ChatTopicsError::config(
                "min_token_chars",
                "tokens must have at least one character",
            ));
        }
        Ok(())
    }
}

/// Configuration for fitting the LDA topic model.
///
/// Priors left as `None` default to `1 / num_topics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicModelConfig {
    /// Number of latent topics K (default: 5)
    pub num_topics: usize,

    /// Seed for the sampler (default: 42)
    pub seed: u64,

    /// Dirichlet prior on per-document topic mixtures
    pub doc_topic_prior: Option<f64>,

    /// Dirichlet prior on per-topic term distributions
    pub topic_word_prior: Option<f64>,

    /// Maximum number of Gibbs sweeps (default: 200)
    pub max_iterations: usize,

    /// Sweeps between log-likelihood evaluations (default: 10)
    pub evaluate_every: usize,

    /// Relative log-likelihood change treated as converged (default: 1e-3)
    pub tolerance: f64,
}

impl Default for TopicModelConfig {
    fn default() -> Self {
        Self {
            num_topics: 5,
            seed: 42,
            doc_topic_prior: None,
            topic_word_prior: None,
            max_iterations: 200,
            evaluate_every: 10,
            tolerance: 1e-3,
        }
    }
}

impl TopicModelConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of topics.
    #[must_use]
    pub fn with_num_topics(mut self, num_topics: usize) -> Self {
        self.num_topics = num_topics;
        self
    }

    /// Sets the sampler seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the document-topic prior (alpha).
    #[must_use]
    pub fn with_doc_topic_prior(mut self, alpha: f64) -> Self {
        self.doc_topic_prior = Some(alpha);
        self
    }

    /// Sets the topic-word prior (beta).
    #[must_use]
    pub fn with_topic_word_prior(mut self, beta: f64) -> Self {
        self.topic_word_prior = Some(beta);
        self
    }

    /// Sets the iteration budget.
    #[must_use]
    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Sets how often convergence is checked.
    #[must_use]
    pub fn with_evaluate_every(mut self, sweeps: usize) -> Self {
        self.evaluate_every = sweeps;
        self
    }

    /// Sets the convergence tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Effective alpha.
    pub fn alpha(&self) -> f64 {
        self.doc_topic_prior
            .unwrap_or_else(|| 1.0 / self.num_topics.max(1) as f64)
    }

    /// Effective beta.
    pub fn beta(&self) -> f64 {
        self.topic_word_prior
            .unwrap_or_else(|| 1.0 / self.num_topics.max(1) as f64)
    }

    /// Checks the configuration against a vocabulary of `vocab_size` terms.
    pub fn validate(&self, vocab_size: usize) -> Result<()> {
        if self.num_topics == 0 {
            return Err(ChatTopicsError::config(
                "num_topics",
                "number of topics must be greater than zero",
            ));
        }
        if self.num_topics > vocab_size {
            return Err(ChatTopicsError::config(
                "num_topics",
                format!(
                    "{} topics requested but the vocabulary only has {} terms",
                    self.num_topics, vocab_size
                ),
            ));
        }
        if !(self.alpha() >= f64::MIN_POSITIVE && self.alpha().is_finite()) {
            return Err(ChatTopicsError::config(
                "doc_topic_prior",
                "prior must be a positive finite normal number",
            ));
        }
        if !(self.beta() >= f64::MIN_POSITIVE && self.beta().is_finite()) {
            return Err(ChatTopicsError::config(
                "topic_word_prior",
                "prior must be a positive finite normal number",
            ));
        }
        if self.max_iterations == 0 {
            return Err(ChatTopicsError::config(
                "max_iterations",
                "iteration budget must be greater than zero",
            ));
        }
        if self.evaluate_every == 0 {
            return Err(ChatTopicsError::config(
                "evaluate_every",
                "evaluation interval must be greater than zero",
            ));
        }
        if self.tolerance.is_nan() || self.tolerance < 0.0 {
            return Err(ChatTopicsError::config(
                "tolerance",
                "tolerance must be zero or positive",
            ));
        }
        Ok(())
    }
}

/// Configuration for the whole pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Vocabulary settings
    pub vectorizer: VectorizerConfig,

    /// Topic model settings
    pub topic_model: TopicModelConfig,

    /// Number of terms reported per topic (default: 10)
    pub top_words: usize,

    /// Number of senders reported per topic (default: 3)
    pub top_contributors: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            vectorizer: VectorizerConfig::default(),
            topic_model: TopicModelConfig::default(),
            top_words: 10,
            top_contributors: 3,
        }
    }
}

impl PipelineConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the vectorizer settings.
    #[must_use]
    pub fn with_vectorizer(mut self, vectorizer: VectorizerConfig) -> Self {
        self.vectorizer = vectorizer;
        self
    }

    /// Replaces the topic model settings.
    #[must_use]
    pub fn with_topic_model(mut self, topic_model: TopicModelConfig) -> Self {
        self.topic_model = topic_model;
        self
    }

    /// Sets the number of reported terms per topic.
    #[must_use]
    pub fn with_top_words(mut self, n: usize) -> Self {
        self.top_words = n;
        self
    }

    /// Sets the number of reported senders per topic.
    #[must_use]
    pub fn with_top_contributors(mut self, n: usize) -> Self {
        self.top_contributors = n;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vectorizer_config_default() {
        let config = VectorizerConfig::default();
        assert_eq!(config.max_features, 1000);
        assert_eq!(config.min_token_chars, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_vectorizer_zero_cap_rejected() {
        let err = VectorizerConfig::new()
            .with_max_features(0)
            .validate()
            .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_topic_model_config_default() {
        let config = TopicModelConfig::default();
        assert_eq!(config.num_topics, 5);
        assert_eq!(config.seed, 42);
        assert!((config.alpha() - 0.2).abs() < 1e-12);
        assert!((config.beta() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_topic_model_config_builder() {
        let config = TopicModelConfig::new()
            .with_num_topics(3)
            .with_doc_topic_prior(0.1)
            .with_topic_word_prior(0.01)
            .with_max_iterations(50);

        assert_eq!(config.num_topics, 3);
        assert!((config.alpha() - 0.1).abs() < 1e-12);
        assert!((config.beta() - 0.01).abs() < 1e-12);
        assert_eq!(config.max_iterations, 50);
    }

    #[test]
    fn test_topic_count_bounds() {
        assert!(TopicModelConfig::new().with_num_topics(0).validate(10).unwrap_err().is_config());
        assert!(TopicModelConfig::new().with_num_topics(11).validate(10).unwrap_err().is_config());
        assert!(TopicModelConfig::new().with_num_topics(10).validate(10).is_ok());
    }

    #[test]
    fn test_invalid_priors_rejected() {
        let config = TopicModelConfig::new().with_doc_topic_prior(0.0);
        assert!(config.validate(100).is_err());
        let config = TopicModelConfig::new().with_topic_word_prior(f64::NAN);
        assert!(config.validate(100).is_err());
    }

    #[test]
    fn test_subnormal_priors_rejected() {
        let err = TopicModelConfig::new()
            .with_doc_topic_prior(1e-320)
            .validate(100)
            .unwrap_err();
        assert!(err.to_string().contains("doc_topic_prior"));
        let err = TopicModelConfig::new()
            .with_topic_word_prior(1e-320)
            .validate(100)
            .unwrap_err();
        assert!(err.to_string().contains("topic_word_prior"));
        assert!(
            TopicModelConfig::new()
                .with_doc_topic_prior(f64::MIN_POSITIVE)
                .validate(100)
                .is_ok()
        );
    }

    #[test]
    fn test_pipeline_config_new() {
        let config = PipelineConfig::new();
        assert_eq!(config.top_words, 10);
        assert_eq!(config.top_contributors, 3);
        assert_eq!(config.vectorizer.max_features, 1000);
    }
}
