//! Clustering request parsing and input ordering.

use std::path::Path;

use rand::seq::SliceRandom;
use tracing::{debug, info};

use topica_core::error::{Result, TopicaError};
use topica_core::types::{ClusterRequest, Document};

use crate::order::seeded_shuffle;

/// Parse and validate a clustering request from JSON.
///
/// Missing `threshold`, `shuffle` or `data`, entries without `id` or
/// `question`, and thresholds outside (0, 1] are all input format errors.
pub fn parse_request(json: &str) -> Result<ClusterRequest> {
    let request: ClusterRequest =
        serde_json::from_str(json).map_err(|e| TopicaError::InputFormat(e.to_string()))?;
    validate_threshold(request.threshold)?;
    Ok(request)
}

/// Read and parse a request file.
pub fn read_request(path: &Path) -> Result<ClusterRequest> {
    let content = std::fs::read_to_string(path).map_err(|e| TopicaError::resource(path, e))?;
    let request = parse_request(&content)?;
    info!(
        path = %path.display(),
        queries = request.data.len(),
        threshold = request.threshold,
        shuffle = request.shuffle,
        "Clustering request loaded"
    );
    Ok(request)
}

pub(crate) fn validate_threshold(threshold: f64) -> Result<()> {
    if threshold > 0.0 && threshold <= 1.0 {
        Ok(())
    } else {
        Err(TopicaError::InputFormat(format!(
            "threshold must be within (0, 1], got {threshold}"
        )))
    }
}

/// Fix the processing order before the pass begins.
///
/// `shuffle = true` draws from the thread RNG and is not reproducible;
/// `shuffle = false` applies [`seeded_shuffle`] with `seed`, so repeated runs
/// see the same order.
pub fn shuffle_documents(documents: &mut [Document], shuffle: bool, seed: u64) {
    if shuffle {
        documents.shuffle(&mut rand::rng());
    } else {
        seeded_shuffle(documents, seed);
    }
    debug!(count = documents.len(), shuffle, "Input order fixed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use topica_core::types::QueryId;

    const VALID: &str = r#"{
        "threshold": 0.5,
        "shuffle": false,
        "data": [
            {"id": 1, "question": "buy apple"},
            {"id": "two", "question": "buy apple now"}
        ]
    }"#;

    #[test]
    fn test_parse_valid_request() {
        let request = parse_request(VALID).unwrap();
        assert_eq!(request.threshold, 0.5);
        assert!(!request.shuffle);
        assert_eq!(request.data[1].id, QueryId::Text("two".to_string()));
    }

    #[test]
    fn test_missing_top_level_fields() {
        for json in [
            r#"{"shuffle": false, "data": []}"#,
            r#"{"threshold": 0.5, "data": []}"#,
            r#"{"threshold": 0.5, "shuffle": true}"#,
        ] {
            let err = parse_request(json).unwrap_err();
            assert!(matches!(err, TopicaError::InputFormat(_)), "{json}");
        }
    }

    #[test]
    fn test_entry_missing_id_or_question() {
        let no_id = r#"{"threshold": 0.5, "shuffle": false, "data": [{"question": "hi"}]}"#;
        let no_question = r#"{"threshold": 0.5, "shuffle": false, "data": [{"id": 3}]}"#;
        assert!(matches!(
            parse_request(no_id),
            Err(TopicaError::InputFormat(_))
        ));
        let err = parse_request(no_question).unwrap_err();
        assert!(err.to_string().contains("question"));
    }

    #[test]
    fn test_threshold_out_of_range() {
        for threshold in ["0", "-0.2", "1.5"] {
            let json = format!(r#"{{"threshold": {threshold}, "shuffle": false, "data": []}}"#);
            let err = parse_request(&json).unwrap_err();
            assert!(err.to_string().contains("threshold"));
        }
        let json = r#"{"threshold": 1.0, "shuffle": false, "data": []}"#;
        assert!(parse_request(json).is_ok());
    }

    #[test]
    fn test_malformed_json_is_input_format_error() {
        let err = parse_request("{ not json").unwrap_err();
        assert!(matches!(err, TopicaError::InputFormat(_)));
    }

    #[test]
    fn test_read_request_missing_file() {
        let err = read_request(Path::new("/nonexistent/query.json")).unwrap_err();
        assert!(matches!(err, TopicaError::ResourceLoad { .. }));
    }

    #[test]
    fn test_read_request_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(VALID.as_bytes()).unwrap();
        let request = read_request(file.path()).unwrap();
        assert_eq!(request.data.len(), 2);
    }

    fn sample_docs(n: i64) -> Vec<Document> {
        (0..n)
            .map(|i| Document::new(QueryId::Int(i), format!("q{i}")))
            .collect()
    }

    #[test]
    fn test_fixed_seed_shuffle_is_reproducible() {
        let mut a = sample_docs(50);
        let mut b = sample_docs(50);
        shuffle_documents(&mut a, false, 2020);
        shuffle_documents(&mut b, false, 2020);
        assert_eq!(a, b);
    }

    #[test]
    fn test_fixed_seed_order() {
        let mut docs = sample_docs(3);
        shuffle_documents(&mut docs, false, 2020);
        let ids: Vec<QueryId> = docs.into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![QueryId::Int(1), QueryId::Int(0), QueryId::Int(2)]);
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut docs = sample_docs(30);
        shuffle_documents(&mut docs, true, 2020);
        let mut ids: Vec<i64> = docs
            .into_iter()
            .map(|d| match d.id {
                QueryId::Int(n) => n,
                other => panic!("unexpected id {other}"),
            })
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..30).collect::<Vec<_>>());
    }
}
