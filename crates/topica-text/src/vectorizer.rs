//! Batch TF-IDF vectorization with pivoted length normalization.
//!
//! The whole batch is the corpus: the vocabulary and document frequencies are
//! computed from every document passed to [`TfidfVectorizer::fit`], then each
//! document becomes a sparse [`TermVector`].

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use topica_core::config::VectorizerConfig;
use topica_core::error::{Result, TopicaError};

/// Weights smaller than this are dropped from the sparse vector.
const EPS: f64 = 1e-12;

/// Sparse mapping from vocabulary index to a non-negative weight.
///
/// Entries are kept sorted by index so dot products are a linear merge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    entries: Vec<(usize, f64)>,
}

impl TermVector {
    /// Build a vector from `(index, weight)` pairs. Indices must be unique.
    pub fn from_entries(mut entries: Vec<(usize, f64)>) -> Self {
        entries.sort_by_key(|&(idx, _)| idx);
        debug_assert!(entries.windows(2).all(|w| w[0].0 < w[1].0));
        Self { entries }
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.entries
            .binary_search_by_key(&index, |&(idx, _)| idx)
            .ok()
            .map(|pos| self.entries[pos].1)
    }

    /// Number of non-zero entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// L2 norm.
    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt()
    }

    pub fn dot(&self, other: &TermVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (ia, wa) = self.entries[i];
            let (ib, wb) = other.entries[j];
            match ia.cmp(&ib) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += wa * wb;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Token to index mapping built from one batch.
///
/// Indices follow order of first appearance.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    index: HashMap<String, usize>,
    terms: Vec<String>,
}

impl Vocabulary {
    pub fn build(documents: &[Vec<String>]) -> Self {
        let mut vocab = Self::default();
        for token in documents.iter().flatten() {
            if !vocab.index.contains_key(token) {
                vocab.index.insert(token.clone(), vocab.terms.len());
                vocab.terms.push(token.clone());
            }
        }
        vocab
    }

    pub fn get(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// TF-IDF vectorizer.
///
/// Each weight is `tf * idf` divided by the pivoted norm
/// `(1 - slope) * pivot + slope * ||w||`, where `||w||` is the L2 norm of the
/// document's un-normalized weights.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    pivot: f64,
    slope: f64,
    smooth_idf: bool,
    sublinear_tf: bool,
}

impl TfidfVectorizer {
    /// Create a vectorizer with smoothed IDF and raw term frequencies.
    pub fn new(pivot: f64, slope: f64) -> Result<Self> {
        Self::from_config(&VectorizerConfig {
            pivot,
            slope,
            ..VectorizerConfig::default()
        })
    }

    pub fn from_config(config: &VectorizerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            pivot: config.pivot,
            slope: config.slope,
            smooth_idf: config.smooth_idf,
            sublinear_tf: config.sublinear_tf,
        })
    }

    /// Toggle `ln((1 + N) / (1 + df)) + 1` (on) versus `log2(N / df)` (off).
    pub fn with_smooth_idf(mut self, smooth_idf: bool) -> Self {
        self.smooth_idf = smooth_idf;
        self
    }

    /// Toggle `1 + ln(tf)` frequency damping.
    pub fn with_sublinear_tf(mut self, sublinear_tf: bool) -> Self {
        self.sublinear_tf = sublinear_tf;
        self
    }

    /// Vectorize a batch of tokenized documents, preserving order.
    pub fn build_vectors(&self, documents: &[Vec<String>]) -> Result<Vec<TermVector>> {
        self.fit(documents).map(|(_, vectors)| vectors)
    }

    /// Vectorize a batch and return the vocabulary it was built with.
    pub fn fit(&self, documents: &[Vec<String>]) -> Result<(Vocabulary, Vec<TermVector>)> {
        if documents.is_empty() {
            return Err(TopicaError::EmptyCorpus);
        }

        let vocab = Vocabulary::build(documents);

        let counts: Vec<BTreeMap<usize, u32>> = documents
            .iter()
            .map(|tokens| {
                let mut tf = BTreeMap::new();
                for token in tokens {
                    if let Some(idx) = vocab.get(token) {
                        *tf.entry(idx).or_insert(0) += 1;
                    }
                }
                tf
            })
            .collect();

        let mut doc_freq = vec![0usize; vocab.len()];
        for tf in &counts {
            for &idx in tf.keys() {
                doc_freq[idx] += 1;
            }
        }

        let n_docs = documents.len();
        let idfs: Vec<f64> = doc_freq.iter().map(|&df| self.idf(n_docs, df)).collect();

        let vectors: Vec<TermVector> = counts
            .iter()
            .map(|tf| self.weigh(tf, &idfs))
            .collect();

        debug!(
            documents = n_docs,
            vocabulary = vocab.len(),
            empty_vectors = vectors.iter().filter(|v| v.is_empty()).count(),
            "TF-IDF vectors built"
        );

        Ok((vocab, vectors))
    }

    fn idf(&self, n_docs: usize, df: usize) -> f64 {
        let n = n_docs as f64;
        let df = df as f64;
        if self.smooth_idf {
            ((1.0 + n) / (1.0 + df)).ln() + 1.0
        } else {
            (n / df).log2()
        }
    }

    fn tf_weight(&self, count: u32) -> f64 {
        let count = count as f64;
        if self.sublinear_tf {
            1.0 + count.ln()
        } else {
            count
        }
    }

    fn weigh(&self, tf: &BTreeMap<usize, u32>, idfs: &[f64]) -> TermVector {
        let raw: Vec<(usize, f64)> = tf
            .iter()
            .map(|(&idx, &count)| (idx, self.tf_weight(count) * idfs[idx]))
            .filter(|&(_, w)| w != 0.0)
            .collect();

        let norm = raw.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt();
        let pivoted = (1.0 - self.slope) * self.pivot + self.slope * norm;

        // BTreeMap iteration is already index-ordered.
        TermVector {
            entries: raw
                .into_iter()
                .map(|(idx, w)| (idx, w / pivoted))
                .filter(|&(_, w)| w.abs() > EPS)
                .collect(),
        }
    }
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        let config = VectorizerConfig::default();
        Self {
            pivot: config.pivot,
            slope: config.slope,
            smooth_idf: config.smooth_idf,
            sublinear_tf: config.sublinear_tf,
        }
    }
}
