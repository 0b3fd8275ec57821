use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Identifiers
// =============================================================================

/// Opaque query identifier, echoed back unchanged in the report.
///
/// Any JSON number or string is accepted. Integers that fit in `i64` land in
/// `Int`; larger integers and floats keep their exact JSON value in `Number`.
/// `null`, booleans, arrays and objects are rejected.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryId {
    Int(i64),
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryId::Int(n) => write!(f, "{n}"),
            QueryId::Number(n) => write!(f, "{n}"),
            QueryId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for QueryId {
    fn from(n: i64) -> Self {
        QueryId::Int(n)
    }
}

impl From<&str> for QueryId {
    fn from(s: &str) -> Self {
        QueryId::Text(s.to_string())
    }
}

// =============================================================================
// Documents
// =============================================================================

/// A single query as ingested. Never mutated after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    pub id: QueryId,
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<QueryId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

// =============================================================================
// Request / report
// =============================================================================

/// One entry of the request's `data` array.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueryRecord {
    pub id: QueryId,
    pub question: String,
}

impl From<QueryRecord> for Document {
    fn from(record: QueryRecord) -> Self {
        Document {
            id: record.id,
            text: record.question,
        }
    }
}

/// Clustering request as read from the input JSON file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusterRequest {
    /// Similarity threshold in (0, 1].
    pub threshold: f64,
    /// `true` for a non-reproducible shuffle, `false` for the fixed-seed one.
    pub shuffle: bool,
    pub data: Vec<QueryRecord>,
}

/// One flattened row of the clustering report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub query_id: QueryId,
    pub question: String,
    /// 1-based cluster number.
    pub cluster_id: usize,
}

/// Final clustering report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusterReport {
    #[serde(rename = "responseMsg")]
    pub response_msg: String,
    pub data: Vec<ReportEntry>,
}

impl ClusterReport {
    pub const OK: &'static str = "OK";

    /// Wrap assembled entries in a successful report.
    pub fn ok(data: Vec<ReportEntry>) -> Self {
        Self {
            response_msg: Self::OK.to_string(),
            data,
        }
    }

    /// Number of distinct clusters in the report.
    pub fn cluster_count(&self) -> usize {
        self.data.iter().map(|e| e.cluster_id).max().unwrap_or(0)
    }
}
