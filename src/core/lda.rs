//! Latent Dirichlet Allocation over a term-count matrix.
//!
//! Inference is collapsed Gibbs sampling. Every token is assigned a topic;
//! each sweep resamples every assignment from
//!
//! ```text
//! p(z = k | rest) ∝ (n_dk + α) · (n_kw + β) / (n_k + Vβ)
//! ```
//!
//! The per-token log-likelihood is evaluated every `evaluate_every` sweeps.
//! Sampling stops once its relative change drops below `tolerance`; if the
//! budget runs out first, the model still comes back but carries a
//! [`ConvergenceWarning`].
//!
//! All randomness comes from one `StdRng` seeded with the configured seed,
//! so the same matrix and seed always give the same model.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::vectorize::{DocumentTermMatrix, Vocabulary};
use crate::config::TopicModelConfig;
use crate::error::{ChatTopicsError, Result};

/// Inference stopped at the iteration budget without reaching tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceWarning {
    /// Sweeps that were run
    pub iterations: usize,
    /// Last measured relative log-likelihood change, if two evaluations happened
    pub last_relative_change: Option<f64>,
    /// Tolerance that was not reached
    pub tolerance: f64,
}

impl std::fmt::Display for ConvergenceWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.last_relative_change {
            Some(change) => write!(
                f,
                "topic model did not converge after {} iterations (relative change {:.2e} > tolerance {:.2e})",
                self.iterations, change, self.tolerance
            ),
            None => write!(
                f,
                "topic model did not converge after {} iterations (too few evaluations)",
                self.iterations
            ),
        }
    }
}

/// Dominant topic of every document, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicAssignment {
    topics: Vec<usize>,
    num_topics: usize,
}

impl TopicAssignment {
    pub fn topics(&self) -> &[usize] {
        &self.topics
    }

    pub fn get(&self, doc: usize) -> Option<usize> {
        self.topics.get(doc).copied()
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Number of documents assigned to each topic.
    pub fn counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.num_topics];
        for &t in &self.topics {
            counts[t] += 1;
        }
        counts
    }
}

/// A fitted model: topic-term weights and document-topic mixtures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicModel {
    num_topics: usize,
    seed: u64,
    alpha: f64,
    beta: f64,
    /// K × V, unnormalized (counts plus prior)
    topic_term: Vec<Vec<f64>>,
    /// D × K, each row sums to one
    doc_topic: Vec<Vec<f64>>,
    iterations: usize,
    log_likelihood: f64,
    convergence_warning: Option<ConvergenceWarning>,
}

impl TopicModel {
    pub fn num_topics(&self) -> usize {
        self.num_topics
    }

    pub fn num_terms(&self) -> usize {
        self.topic_term.first().map_or(0, Vec::len)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn topic_term(&self) -> &[Vec<f64>] {
        &self.topic_term
    }

    pub fn doc_topic(&self) -> &[Vec<f64>] {
        &self.doc_topic
    }

    /// Sweeps actually run.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Per-token log-likelihood of the training matrix at the last evaluation.
    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    pub fn convergence_warning(&self) -> Option<&ConvergenceWarning> {
        self.convergence_warning.as_ref()
    }

    pub fn converged(&self) -> bool {
        self.convergence_warning.is_none()
    }

    /// Topic-term rows normalized to probabilities.
    pub fn topic_term_distribution(&self) -> Vec<Vec<f64>> {
        self.topic_term
            .iter()
            .map(|row| {
                let total: f64 = row.iter().sum();
                row.iter().map(|w| w / total).collect()
            })
            .collect()
    }

    /// Argmax of every document-topic row; ties go to the lowest topic.
    pub fn assign_topics(&self) -> TopicAssignment {
        let topics = self.doc_topic.iter().map(|row| argmax(row)).collect();
        TopicAssignment {
            topics,
            num_topics: self.num_topics,
        }
    }

    /// The `n` highest-weight terms of every topic, heaviest first.
    ///
    /// Equal weights are ordered by vocabulary index.
    pub fn top_words(&self, vocab: &Vocabulary, n: usize) -> Vec<Vec<(String, f64)>> {
        self.topic_term
            .iter()
            .map(|row| {
                let mut order: Vec<usize> = (0..row.len()).collect();
                order.sort_by(|&a, &b| row[b].total_cmp(&row[a]).then_with(|| a.cmp(&b)));
                order
                    .into_iter()
                    .take(n)
                    .filter_map(|i| vocab.term(i).map(|t| (t.to_string(), row[i])))
                    .collect()
            })
            .collect()
    }

    /// Perplexity of the training matrix under the fitted mixtures.
    pub fn perplexity(&self, dtm: &DocumentTermMatrix) -> Result<f64> {
        if dtm.num_documents() != self.doc_topic.len() || dtm.num_terms() != self.num_terms() {
            return Err(ChatTopicsError::config(
                "documents",
                format!(
                    "matrix is {}×{} but the model was fitted on {}×{}",
                    dtm.num_documents(),
                    dtm.num_terms(),
                    self.doc_topic.len(),
                    self.num_terms()
                ),
            ));
        }
        let phi = self.topic_term_distribution();
        let tokens = dtm.total_count();
        if tokens == 0 {
            return Ok(1.0);
        }
        let mut ll = 0.0;
        for (d, theta) in self.doc_topic.iter().enumerate() {
            for &(w, c) in dtm.row(d) {
                let p: f64 = (0..self.num_topics).map(|k| theta[k] * phi[k][w]).sum();
                ll += f64::from(c) * p.ln();
            }
        }
        Ok((-ll / tokens as f64).exp())
    }
}

/// Fits [`TopicModel`]s.
#[derive(Debug, Clone, Default)]
pub struct LatentDirichletAllocation {
    config: TopicModelConfig,
}

impl LatentDirichletAllocation {
    pub fn new(config: TopicModelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TopicModelConfig {
        &self.config
    }

    /// Fits the model. Configuration is checked before any sampling.
    pub fn fit(&self, dtm: &DocumentTermMatrix) -> Result<TopicModel> {
        self.config.validate(dtm.num_terms())?;

        let mut sampler = GibbsSampler::new(dtm, &self.config);
        let every = self.config.evaluate_every;
        let max = self.config.max_iterations;

        let mut previous: Option<f64> = None;
        let mut last_change: Option<f64> = None;
        let mut log_likelihood = sampler.log_likelihood(dtm);
        let mut converged = sampler.total_tokens == 0;
        let mut iterations = 0;

        while !converged && iterations < max {
            sampler.sweep();
            iterations += 1;

            if iterations % every == 0 || iterations == max {
                log_likelihood = sampler.log_likelihood(dtm);
                if let Some(prev) = previous {
                    let change = ((log_likelihood - prev) / prev.abs().max(f64::EPSILON)).abs();
                    debug!(iterations, log_likelihood, change, "Gibbs evaluation");
                    last_change = Some(change);
                    if change < self.config.tolerance {
                        converged = true;
                    }
                }
                previous = Some(log_likelihood);
            }
        }

        let convergence_warning = if converged {
            None
        } else {
            let warning = ConvergenceWarning {
                iterations,
                last_relative_change: last_change,
                tolerance: self.config.tolerance,
            };
            warn!(%warning, "Returning unconverged topic model");
            Some(warning)
        };

        info!(
            topics = self.config.num_topics,
            documents = dtm.num_documents(),
            iterations,
            log_likelihood,
            "Fitted topic model"
        );

        Ok(TopicModel {
            num_topics: self.config.num_topics,
            seed: self.config.seed,
            alpha: sampler.alpha,
            beta: sampler.beta,
            topic_term: sampler.topic_term(),
            doc_topic: sampler.doc_topic(),
            iterations,
            log_likelihood,
            convergence_warning,
        })
    }
}

/// Count tables and assignments of one sampling run.
struct GibbsSampler {
    k: usize,
    v: usize,
    alpha: f64,
    beta: f64,
    /// Term index of every token, per document
    docs: Vec<Vec<usize>>,
    /// Topic of every token, per document
    z: Vec<Vec<usize>>,
    ndk: Vec<Vec<u32>>,
    nkw: Vec<Vec<u32>>,
    nk: Vec<u64>,
    total_tokens: usize,
    weights: Vec<f64>,
    rng: StdRng,
}

impl GibbsSampler {
    fn new(dtm: &DocumentTermMatrix, config: &TopicModelConfig) -> Self {
        let k = config.num_topics;
        let v = dtm.num_terms();
        let mut rng = StdRng::seed_from_u64(config.seed);

        let docs: Vec<Vec<usize>> = dtm
            .rows()
            .iter()
            .map(|row| {
                row.iter()
                    .flat_map(|&(w, c)| std::iter::repeat_n(w, c as usize))
                    .collect()
            })
            .collect();

        let mut ndk = vec![vec![0u32; k]; docs.len()];
        let mut nkw = vec![vec![0u32; v]; k];
        let mut nk = vec![0u64; k];
        let mut total_tokens = 0;

        let z: Vec<Vec<usize>> = docs
            .iter()
            .enumerate()
            .map(|(d, doc)| {
                doc.iter()
                    .map(|&w| {
                        let t = rng.gen_range(0..k);
                        ndk[d][t] += 1;
                        nkw[t][w] += 1;
                        nk[t] += 1;
                        total_tokens += 1;
                        t
                    })
                    .collect::<Vec<usize>>()
            })
            .collect();

        Self {
            k,
            v,
            alpha: config.alpha(),
            beta: config.beta(),
            docs,
            z,
            ndk,
            nkw,
            nk,
            total_tokens,
            weights: vec![0.0; k],
            rng,
        }
    }

    fn sweep(&mut self) {
        let vb = self.v as f64 * self.beta;
        for d in 0..self.docs.len() {
            for i in 0..self.docs[d].len() {
                let w = self.docs[d][i];
                let old = self.z[d][i];

                self.ndk[d][old] -= 1;
                self.nkw[old][w] -= 1;
                self.nk[old] -= 1;

                let mut total = 0.0;
                for t in 0..self.k {
                    let left = f64::from(self.ndk[d][t]) + self.alpha;
                    let right = (f64::from(self.nkw[t][w]) + self.beta) / (self.nk[t] as f64 + vb);
                    total += left * right;
                    self.weights[t] = total;
                }

                let new = if total > 0.0 && total.is_finite() {
                    let u = self.rng.gen_range(0.0..total);
                    self.weights
                        .iter()
                        .position(|&cum| u < cum)
                        .unwrap_or(self.k - 1)
                } else {
                    // Every weight underflowed.
                    self.rng.gen_range(0..self.k)
                };

                self.z[d][i] = new;
                self.ndk[d][new] += 1;
                self.nkw[new][w] += 1;
                self.nk[new] += 1;
            }
        }
    }

    fn theta_row(&self, d: usize) -> Vec<f64> {
        let len = self.docs[d].len() as f64;
        let denom = len + self.k as f64 * self.alpha;
        self.ndk[d]
            .iter()
            .map(|&c| (f64::from(c) + self.alpha) / denom)
            .collect()
    }

    /// Per-token log-likelihood under the current counts.
    fn log_likelihood(&self, dtm: &DocumentTermMatrix) -> f64 {
        if self.total_tokens == 0 {
            return 0.0;
        }
        let vb = self.v as f64 * self.beta;
        let mut ll = 0.0;
        for d in 0..self.docs.len() {
            let theta = self.theta_row(d);
            for &(w, c) in dtm.row(d) {
                let p: f64 = (0..self.k)
                    .map(|t| {
                        theta[t] * (f64::from(self.nkw[t][w]) + self.beta)
                            / (self.nk[t] as f64 + vb)
                    })
                    .sum();
                ll += f64::from(c) * p.ln();
            }
        }
        ll / self.total_tokens as f64
    }

    fn topic_term(&self) -> Vec<Vec<f64>> {
        self.nkw
            .iter()
            .map(|row| row.iter().map(|&c| f64::from(c) + self.beta).collect())
            .collect()
    }

    fn doc_topic(&self) -> Vec<Vec<f64>> {
        (0..self.docs.len()).map(|d| self.theta_row(d)).collect()
    }
}

/// Index of the largest value, first one on ties.
fn argmax(row: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in row.iter().enumerate().skip(1) {
        if v > row[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VectorizerConfig;
    use crate::core::vectorize::CountVectorizer;

    fn corpus() -> Vec<String> {
        let mut docs = Vec::new();
        for _ in 0..10 {
            docs.push("pizza pasta cheese pizza dinner".to_string());
            docs.push("football match goal football team".to_string());
        }
        docs
    }

    fn matrix(docs: &[String]) -> (Vocabulary, DocumentTermMatrix) {
        CountVectorizer::new(VectorizerConfig::new()).fit(docs).unwrap()
    }

    fn lda(k: usize) -> LatentDirichletAllocation {
        LatentDirichletAllocation::new(TopicModelConfig::new().with_num_topics(k).with_seed(7))
    }

    #[test]
    fn test_doc_topic_rows_sum_to_one() {
        let (_, dtm) = matrix(&corpus());
        let model = lda(2).fit(&dtm).unwrap();
        assert_eq!(model.doc_topic().len(), dtm.num_documents());
        for row in model.doc_topic() {
            assert_eq!(row.len(), 2);
            let sum: f64 = row.iter().sum();
            assert!((sum - 1.0).abs() < 1e-6, "row sums to {sum}");
        }
    }

    #[test]
    fn test_topic_term_non_negative() {
        let (vocab, dtm) = matrix(&corpus());
        let model = lda(3).fit(&dtm).unwrap();
        assert_eq!(model.topic_term().len(), 3);
        for row in model.topic_term() {
            assert_eq!(row.len(), vocab.len());
            assert!(row.iter().all(|&w| w >= 0.0));
        }
    }

    #[test]
    fn test_deterministic_for_same_seed() {
        let (_, dtm) = matrix(&corpus());
        let a = lda(2).fit(&dtm).unwrap();
        let b = lda(2).fit(&dtm).unwrap();
        assert_eq!(a.assign_topics(), b.assign_topics());
        assert_eq!(a.topic_term(), b.topic_term());
    }

    #[test]
    fn test_separates_obvious_topics() {
        let docs = corpus();
        let (_, dtm) = matrix(&docs);
        let model = lda(2).fit(&dtm).unwrap();
        let assignment = model.assign_topics();
        // Even documents are about food, odd ones about football.
        let food = assignment.get(0).unwrap();
        let sport = assignment.get(1).unwrap();
        assert_ne!(food, sport);
        for d in 0..docs.len() {
            let expected = if d % 2 == 0 { food } else { sport };
            assert_eq!(assignment.get(d), Some(expected));
        }
    }

    #[test]
    fn test_top_words_order() {
        let (vocab, dtm) = matrix(&corpus());
        let model = lda(2).fit(&dtm).unwrap();
        let top = model.top_words(&vocab, 3);
        assert_eq!(top.len(), 2);
        for words in &top {
            assert_eq!(words.len(), 3);
            assert!(words.windows(2).all(|w| w[0].1 >= w[1].1));
        }
        let heads: Vec<&str> = top.iter().map(|w| w[0].0.as_str()).collect();
        assert!(heads.contains(&"pizza"));
        assert!(heads.contains(&"football"));
    }

    #[test]
    fn test_zero_topics_rejected() {
        let (_, dtm) = matrix(&corpus());
        assert!(lda(0).fit(&dtm).unwrap_err().is_config());
    }

    #[test]
    fn test_more_topics_than_terms_rejected() {
        let (vocab, dtm) = matrix(&corpus());
        let err = lda(vocab.len() + 1).fit(&dtm).unwrap_err();
        assert!(err.is_config());
        assert!(lda(vocab.len()).fit(&dtm).is_ok());
    }

    #[test]
    fn test_convergence_warning_on_tiny_budget() {
        let (_, dtm) = matrix(&corpus());
        let model = LatentDirichletAllocation::new(
            TopicModelConfig::new()
                .with_num_topics(2)
                .with_max_iterations(3)
                .with_evaluate_every(1)
                .with_tolerance(0.0),
        )
        .fit(&dtm)
        .unwrap();
        let warning = model.convergence_warning().unwrap();
        assert_eq!(warning.iterations, 3);
        assert!(!model.converged());
        assert!(warning.to_string().contains("did not converge"));
    }

    #[test]
    fn test_single_term_corpus_converges() {
        let docs = vec!["hello hello".to_string(), "hello".to_string()];
        let (vocab, dtm) = matrix(&docs);
        assert_eq!(vocab.len(), 1);

        let model = lda(1).fit(&dtm).unwrap();
        assert!(model.converged());
        assert!(model.convergence_warning().is_none());
        assert!(model.iterations() < 200);
        assert!(model.log_likelihood().abs() < 1e-12);
    }

    #[test]
    fn test_tiny_normal_prior_still_samples() {
        let docs = vec!["pizza".to_string(), "goal".to_string()];
        let (_, dtm) = matrix(&docs);
        let model = LatentDirichletAllocation::new(
            TopicModelConfig::new()
                .with_num_topics(2)
                .with_doc_topic_prior(f64::MIN_POSITIVE)
                .with_topic_word_prior(f64::MIN_POSITIVE)
                .with_max_iterations(5),
        )
        .fit(&dtm)
        .unwrap();
        assert_eq!(model.assign_topics().len(), 2);
    }

    #[test]
    fn test_empty_documents_get_uniform_mixture() {
        let docs = vec!["alpha beta".to_string(), String::new(), "gamma beta".to_string()];
        let (_, dtm) = matrix(&docs);
        let model = lda(2).fit(&dtm).unwrap();
        let row = &model.doc_topic()[1];
        assert!((row[0] - 0.5).abs() < 1e-12);
        assert!((row[1] - 0.5).abs() < 1e-12);
        assert_eq!(model.assign_topics().get(1), Some(0));
    }

    #[test]
    fn test_argmax_ties_to_lowest() {
        assert_eq!(argmax(&[0.25, 0.5, 0.5, 0.25]), 1);
        assert_eq!(argmax(&[0.3, 0.3, 0.3]), 0);
        assert_eq!(argmax(&[0.1, 0.2, 0.7]), 2);
    }

    #[test]
    fn test_assignment_counts() {
        let (_, dtm) = matrix(&corpus());
        let assignment = lda(2).fit(&dtm).unwrap().assign_topics();
        assert_eq!(assignment.len(), 20);
        assert_eq!(assignment.counts().iter().sum::<usize>(), 20);
    }

    #[test]
    fn test_perplexity() {
        let (_, dtm) = matrix(&corpus());
        let model = lda(2).fit(&dtm).unwrap();
        let p = model.perplexity(&dtm).unwrap();
        assert!(p.is_finite() && p >= 1.0);
        assert!(p < dtm.num_terms() as f64);

        let (_, other) = matrix(&["one two".to_string()]);
        assert!(model.perplexity(&other).is_err());
    }
}
