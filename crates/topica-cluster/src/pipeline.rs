//! Clustering run driver: tokenize, vectorize, single pass, assemble.

use std::path::Path;

use tracing::info;

use topica_core::config::{ClusteringConfig, TopicaConfig};
use topica_core::error::{Result, TopicaError};
use topica_core::types::{ClusterReport, ClusterRequest, Document};
use topica_text::{TermVector, TfidfVectorizer, Tokenizer};

use crate::assembler;
use crate::request::{read_request, shuffle_documents, validate_threshold};
use crate::single_pass::{ClusterRegistry, SinglePassClusterer};

/// A batch of queries ready to be clustered.
///
/// Holds two independent thresholds: `theta`, the instance threshold set from
/// the request (or `clustering.default_theta`), and the result threshold from
/// `clustering.result_theta` that [`TextCluster::cluster_result`] uses. Use
/// [`TextCluster::cluster_result_with`] to pick either one explicitly.
#[derive(Debug, Clone)]
pub struct TextCluster {
    documents: Vec<Document>,
    theta: f64,
    shuffle: bool,
    tokenizer: Tokenizer,
    vectorizer: TfidfVectorizer,
    clustering: ClusteringConfig,
}

impl TextCluster {
    /// Build a driver over `documents` in the order given.
    pub fn new(
        documents: Vec<Document>,
        theta: f64,
        tokenizer: Tokenizer,
        config: &TopicaConfig,
    ) -> Result<Self> {
        validate_threshold(theta)?;
        config.clustering.validate()?;
        Ok(Self {
            documents,
            theta,
            shuffle: false,
            tokenizer,
            vectorizer: TfidfVectorizer::from_config(&config.vectorizer)?,
            clustering: config.clustering.clone(),
        })
    }

    /// Build a driver with `clustering.default_theta` as the instance threshold.
    pub fn with_default_theta(
        documents: Vec<Document>,
        tokenizer: Tokenizer,
        config: &TopicaConfig,
    ) -> Result<Self> {
        Self::new(documents, config.clustering.default_theta, tokenizer, config)
    }

    /// Build a driver from a parsed request, fixing the input order first.
    pub fn from_request(
        request: ClusterRequest,
        tokenizer: Tokenizer,
        config: &TopicaConfig,
    ) -> Result<Self> {
        let mut documents: Vec<Document> = request.data.into_iter().map(Document::from).collect();
        shuffle_documents(
            &mut documents,
            request.shuffle,
            config.clustering.shuffle_seed,
        );
        let mut cluster = Self::new(documents, request.threshold, tokenizer, config)?;
        cluster.shuffle = request.shuffle;
        Ok(cluster)
    }

    /// Read a request file and build a driver from it.
    pub fn parse_file(path: &Path, tokenizer: Tokenizer, config: &TopicaConfig) -> Result<Self> {
        Self::from_request(read_request(path)?, tokenizer, config)
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Instance threshold.
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Threshold used by [`TextCluster::cluster_result`].
    pub fn result_theta(&self) -> f64 {
        self.clustering.result_theta
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    /// Tokenize every document, preserving order.
    pub fn segment(&self) -> Vec<Vec<String>> {
        self.documents
            .iter()
            .map(|doc| self.tokenizer.tokenize(&doc.text))
            .collect()
    }

    /// TF-IDF vectors for every document, preserving order.
    pub fn vectorize(&self) -> Result<Vec<TermVector>> {
        self.vectorizer.build_vectors(&self.segment())
    }

    /// Run the single pass at `theta` and return the registry.
    pub fn cluster_registry(&self, theta: f64) -> Result<ClusterRegistry> {
        validate_threshold(theta).map_err(|_| {
            TopicaError::Config(format!("result threshold must be within (0, 1], got {theta}"))
        })?;
        let vectors = self.vectorize()?;
        let clusterer =
            SinglePassClusterer::new(theta).with_progress_interval(self.clustering.progress_interval);
        Ok(clusterer.run(vectors.into_iter().zip(self.documents.iter().cloned())))
    }

    /// Cluster at the configured result threshold.
    pub fn cluster_result(&self) -> Result<ClusterReport> {
        self.cluster_result_with(self.clustering.result_theta)
    }

    /// Cluster at an explicit threshold, overriding the configured result threshold.
    pub fn cluster_result_with(&self, theta: f64) -> Result<ClusterReport> {
        let registry = self.cluster_registry(theta)?;
        let report = assembler::report(registry);
        info!(
            queries = report.data.len(),
            clusters = report.cluster_count(),
            theta,
            "Clustering result assembled"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use topica_core::types::{QueryId, QueryRecord};
    use topica_text::StopWords;

    fn docs(texts: &[&str]) -> Vec<Document> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Document::new(QueryId::Int(i as i64 + 1), *t))
            .collect()
    }

    #[test]
    fn test_thresholds_are_independent() {
        let config = TopicaConfig::default();
        let cluster = TextCluster::new(docs(&["a"]), 0.8, Tokenizer::default(), &config).unwrap();
        assert_eq!(cluster.theta(), 0.8);
        assert_eq!(cluster.result_theta(), 0.25);

        let defaulted =
            TextCluster::with_default_theta(docs(&["a"]), Tokenizer::default(), &config).unwrap();
        assert_eq!(defaulted.theta(), 0.5);
    }

    #[test]
    fn test_segment_applies_stopwords() {
        let stopwords: StopWords = ["how", "do", "i"].into_iter().collect();
        let cluster = TextCluster::new(
            docs(&["How do I return shoes"]),
            0.5,
            Tokenizer::new(stopwords, true),
            &TopicaConfig::default(),
        )
        .unwrap();
        assert_eq!(cluster.segment(), vec![vec!["return", "shoes"]]);
    }

    #[test]
    fn test_empty_batch_is_empty_corpus() {
        let cluster =
            TextCluster::new(Vec::new(), 0.5, Tokenizer::default(), &TopicaConfig::default())
                .unwrap();
        assert!(matches!(
            cluster.cluster_result(),
            Err(TopicaError::EmptyCorpus)
        ));
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let config = TopicaConfig::default();
        assert!(TextCluster::new(docs(&["a"]), 0.0, Tokenizer::default(), &config).is_err());

        let cluster = TextCluster::new(docs(&["a"]), 0.5, Tokenizer::default(), &config).unwrap();
        assert!(matches!(
            cluster.cluster_result_with(1.2),
            Err(TopicaError::Config(_))
        ));
    }

    #[test]
    fn test_result_threshold_override_changes_grouping() {
        // cos("buy apple", "buy apple now") is about 0.71 in a two-document batch
        let cluster = TextCluster::new(
            docs(&["buy apple", "buy apple now"]),
            0.5,
            Tokenizer::default(),
            &TopicaConfig::default(),
        )
        .unwrap();
        assert_eq!(cluster.cluster_result().unwrap().cluster_count(), 1);
        assert_eq!(cluster.cluster_result_with(0.9).unwrap().cluster_count(), 2);
    }

    #[test]
    fn test_from_request_keeps_every_document() {
        let request = ClusterRequest {
            threshold: 0.4,
            shuffle: true,
            data: (0..20)
                .map(|i| QueryRecord {
                    id: QueryId::Int(i),
                    question: format!("question number {i}"),
                })
                .collect(),
        };
        let cluster =
            TextCluster::from_request(request, Tokenizer::default(), &TopicaConfig::default())
                .unwrap();
        assert!(cluster.shuffle());
        assert_eq!(cluster.theta(), 0.4);
        assert_eq!(cluster.documents().len(), 20);
    }
}
