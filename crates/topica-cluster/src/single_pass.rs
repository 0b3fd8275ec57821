//! Incremental single-pass clustering.
//!
//! Items are visited once, in order. Each item joins the existing cluster with
//! the highest mean cosine similarity to it, provided that similarity is
//! strictly greater than `theta`; otherwise it seeds a new cluster. Earlier
//! assignments are never revisited.

use tracing::{debug, info};

use topica_core::types::Document;
use topica_text::{cosine_similarity, TermVector};

/// A clustered item: its term vector and the document it came from.
#[derive(Debug, Clone)]
pub struct Member {
    pub vector: TermVector,
    pub document: Document,
}

/// A group of members. Always holds at least one member.
#[derive(Debug, Clone)]
pub struct Cluster {
    id: usize,
    members: Vec<Member>,
}

impl Cluster {
    fn seed(id: usize, member: Member) -> Self {
        Self {
            id,
            members: vec![member],
        }
    }

    /// 0-based id, equal to the cluster's creation index.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Mean cosine similarity of `vector` against every member.
    ///
    /// Recomputed from all members on each call; no centroid is kept.
    pub fn mean_similarity(&self, vector: &TermVector) -> f64 {
        let total: f64 = self
            .members
            .iter()
            .map(|m| cosine_similarity(vector, &m.vector))
            .sum();
        total / self.members.len() as f64
    }

    pub fn into_members(self) -> Vec<Member> {
        self.members
    }
}

/// Clusters of one pass, indexed by id in creation order.
///
/// Ids form the contiguous range `0..len()`.
#[derive(Debug, Clone, Default)]
pub struct ClusterRegistry {
    clusters: Vec<Cluster>,
}

impl ClusterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<&Cluster> {
        self.clusters.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.iter()
    }

    /// Total number of members across all clusters.
    pub fn member_count(&self) -> usize {
        self.clusters.iter().map(Cluster::len).sum()
    }

    /// Cluster with the highest mean similarity to `vector`.
    ///
    /// Ties go to the lowest id. `None` only when the registry is empty.
    pub fn best_match(&self, vector: &TermVector) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for cluster in &self.clusters {
            let sim = cluster.mean_similarity(vector);
            if best.map_or(true, |(_, max)| sim > max) {
                best = Some((cluster.id, sim));
            }
        }
        best
    }

    fn create(&mut self, member: Member) -> usize {
        let id = self.clusters.len();
        self.clusters.push(Cluster::seed(id, member));
        id
    }

    fn append(&mut self, id: usize, member: Member) {
        self.clusters[id].members.push(member);
    }

    pub fn into_clusters(self) -> Vec<Cluster> {
        self.clusters
    }
}

/// Single-pass clusterer parameterized by its similarity threshold.
#[derive(Debug, Clone)]
pub struct SinglePassClusterer {
    theta: f64,
    progress_interval: usize,
}

impl SinglePassClusterer {
    /// Create a clusterer. An item joins a cluster only when its mean
    /// similarity is strictly greater than `theta`.
    pub fn new(theta: f64) -> Self {
        Self {
            theta,
            progress_interval: 1000,
        }
    }

    /// Emit a progress event every `interval` items; 0 disables them.
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Assign one item, returning the id of the cluster it landed in.
    ///
    /// Similarities are computed against the registry as it stands, then the
    /// item is committed to exactly one cluster.
    pub fn assign(
        &self,
        registry: &mut ClusterRegistry,
        vector: TermVector,
        document: Document,
    ) -> usize {
        let member = Member { vector, document };
        match registry.best_match(&member.vector) {
            Some((id, sim)) if sim > self.theta => {
                registry.append(id, member);
                id
            }
            Some((_, sim)) => {
                let id = registry.create(member);
                debug!(cluster_id = id, best_similarity = sim, "New cluster created");
                id
            }
            None => registry.create(member),
        }
    }

    /// Run one forward pass over `items`, returning the populated registry.
    pub fn run<I>(&self, items: I) -> ClusterRegistry
    where
        I: IntoIterator<Item = (TermVector, Document)>,
    {
        let mut registry = ClusterRegistry::new();
        let mut processed = 0usize;
        for (vector, document) in items {
            self.assign(&mut registry, vector, document);
            processed += 1;
            if self.progress_interval > 0 && processed % self.progress_interval == 0 {
                info!(
                    processed,
                    clusters = registry.len(),
                    "Single-pass clustering progress"
                );
            }
        }
        info!(
            items = processed,
            clusters = registry.len(),
            theta = self.theta,
            "Single-pass clustering complete"
        );
        registry
    }
}
