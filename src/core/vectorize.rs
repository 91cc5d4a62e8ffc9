//! Bounded vocabulary and term-count vectors.
//!
//! [`CountVectorizer::fit`] keeps at most `max_features` distinct terms,
//! ranked by total frequency across the corpus (ties broken
//! lexicographically), then assigns indices in lexicographic order. Each
//! document becomes a sparse row of term counts; terms outside the
//! vocabulary are ignored.
//!
//! # Example
//!
//! ```rust
//! use chattopics::config::VectorizerConfig;
//! use chattopics::core::vectorize::CountVectorizer;
//!
//! let docs = vec!["pizza tonight".to_string(), "pizza or tacos".to_string()];
//! let vectorizer = CountVectorizer::new(VectorizerConfig::new().with_max_features(2));
//! let (vocab, dtm) = vectorizer.fit(&docs)?;
//!
//! assert_eq!(vocab.terms(), &["or".to_string(), "pizza".to_string()]);
//! assert_eq!(dtm.count(1, vocab.index_of("pizza").unwrap()), 1);
//! # Ok::<(), chattopics::ChatTopicsError>(())
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::VectorizerConfig;
use crate::error::{ChatTopicsError, Result};

/// Term → index mapping, fixed after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    terms: Vec<String>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    frequencies: Vec<u64>,
}

impl Vocabulary {
    /// Builds a vocabulary from `(term, corpus frequency)` pairs.
    ///
    /// Indices follow lexicographic order of the terms.
    fn from_counts(mut counts: Vec<(String, u64)>) -> Self {
        counts.sort_by(|a, b| a.0.cmp(&b.0));
        let index = counts
            .iter()
            .enumerate()
            .map(|(i, (term, _))| (term.clone(), i))
            .collect();
        let (terms, frequencies) = counts.into_iter().unzip();
        Self {
            terms,
            index,
            frequencies,
        }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms in index order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        if self.index.is_empty() && !self.terms.is_empty() {
            return self.terms.binary_search_by(|t| t.as_str().cmp(term)).ok();
        }
        self.index.get(term).copied()
    }

    /// Total occurrences of the term in the fitting corpus.
    pub fn frequency(&self, index: usize) -> Option<u64> {
        self.frequencies.get(index).copied()
    }
}

/// One sparse row per document, entries `(term index, count)` sorted by index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTermMatrix {
    rows: Vec<Vec<(usize, u32)>>,
    num_terms: usize,
}

impl DocumentTermMatrix {
    pub fn num_documents(&self) -> usize {
        self.rows.len()
    }

    pub fn num_terms(&self) -> usize {
        self.num_terms
    }

    /// Non-zero entries of one document.
    pub fn row(&self, doc: usize) -> &[(usize, u32)] {
        self.rows.get(doc).map_or(&[], Vec::as_slice)
    }

    pub fn rows(&self) -> &[Vec<(usize, u32)>] {
        &self.rows
    }

    /// Count of `term` in `doc`, zero when absent.
    pub fn count(&self, doc: usize, term: usize) -> u32 {
        let row = self.row(doc);
        row.binary_search_by_key(&term, |&(t, _)| t)
            .map_or(0, |i| row[i].1)
    }

    /// Total tokens in one document.
    pub fn document_length(&self, doc: usize) -> u64 {
        self.row(doc).iter().map(|&(_, c)| u64::from(c)).sum()
    }

    /// Total tokens in the whole matrix.
    pub fn total_count(&self) -> u64 {
        (0..self.rows.len()).map(|d| self.document_length(d)).sum()
    }

    /// Dense copy of one row.
    pub fn dense_row(&self, doc: usize) -> Vec<u32> {
        let mut dense = vec![0; self.num_terms];
        for &(t, c) in self.row(doc) {
            dense[t] = c;
        }
        dense
    }
}

/// Builds a [`Vocabulary`] and [`DocumentTermMatrix`] from normalized text.
#[derive(Debug, Clone)]
pub struct CountVectorizer {
    config: VectorizerConfig,
    token_regex: Regex,
    stopwords: HashSet<String>,
}

impl CountVectorizer {
    /// Creates a vectorizer with no stopword filtering.
    pub fn new(config: VectorizerConfig) -> Self {
        let token_regex = Regex::new(r"\w+").expect("token pattern is valid");
        Self {
            config,
            token_regex,
            stopwords: HashSet::new(),
        }
    }

    /// Drops these tokens before counting.
    #[must_use]
    pub fn with_stopwords(mut self, stopwords: HashSet<String>) -> Self {
        self.stopwords = stopwords;
        self
    }

    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    /// Tokens of one normalized document.
    pub fn tokenize<'a>(&'a self, text: &'a str) -> impl Iterator<Item = String> + 'a {
        self.token_regex
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|t| t.chars().count() >= self.config.min_token_chars)
            .map(str::to_lowercase)
            .filter(|t| !self.stopwords.contains(t))
    }

    /// Fits the vocabulary and vectorizes the same documents.
    pub fn fit<S: AsRef<str>>(&self, docs: &[S]) -> Result<(Vocabulary, DocumentTermMatrix)> {
        self.config.validate()?;
        if docs.is_empty() {
            return Err(ChatTopicsError::empty_corpus());
        }

        let mut totals: BTreeMap<String, u64> = BTreeMap::new();
        for doc in docs {
            for token in self.tokenize(doc.as_ref()) {
                *totals.entry(token).or_insert(0) += 1;
            }
        }

        if totals.is_empty() {
            return Err(ChatTopicsError::no_terms(docs.len()));
        }

        let distinct = totals.len();
        let mut ranked: Vec<(String, u64)> = totals.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(self.config.max_features);

        let vocab = Vocabulary::from_counts(ranked);
        debug!(distinct, kept = vocab.len(), "Selected vocabulary");

        let dtm = self.transform(&vocab, docs);
        info!(
            documents = dtm.num_documents(),
            terms = vocab.len(),
            tokens = dtm.total_count(),
            "Vectorized corpus"
        );
        Ok((vocab, dtm))
    }

    /// Vectorizes documents against a fixed vocabulary.
    pub fn transform<S: AsRef<str>>(&self, vocab: &Vocabulary, docs: &[S]) -> DocumentTermMatrix {
        let rows = docs
            .iter()
            .map(|doc| {
                let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
                for token in self.tokenize(doc.as_ref()) {
                    if let Some(idx) = vocab.index_of(&token) {
                        *counts.entry(idx).or_insert(0) += 1;
                    }
                }
                counts.into_iter().collect()
            })
            .collect();
        DocumentTermMatrix {
            rows,
            num_terms: vocab.len(),
        }
    }
}
