//! Topica cluster crate - incremental single-pass topic clustering.
//!
//! Provides the clustering run end to end:
//! - Request parsing and the fixed-seed or random input shuffle
//! - Single-pass assignment of term vectors to clusters by mean cosine similarity
//! - Flattening clusters into the `responseMsg`/`data` report
//! - `TextCluster`, the driver tying tokenizer, vectorizer and clusterer together

pub mod assembler;
pub mod order;
pub mod pipeline;
pub mod request;
pub mod single_pass;

pub use assembler::{assemble, report};
pub use order::seeded_shuffle;
pub use pipeline::TextCluster;
pub use request::{parse_request, read_request, shuffle_documents};
pub use single_pass::{Cluster, ClusterRegistry, Member, SinglePassClusterer};
