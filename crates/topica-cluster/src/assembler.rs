//! Flattening a cluster registry into report rows.

use topica_core::types::{ClusterReport, ReportEntry};

use crate::single_pass::ClusterRegistry;

/// Flatten clusters into report rows.
///
/// Rows follow cluster creation order, then member arrival order. Reported
/// cluster ids are 1-based.
pub fn assemble(registry: ClusterRegistry) -> Vec<ReportEntry> {
    registry
        .into_clusters()
        .into_iter()
        .flat_map(|cluster| {
            let cluster_id = cluster.id() + 1;
            cluster
                .into_members()
                .into_iter()
                .map(move |member| ReportEntry {
                    query_id: member.document.id,
                    question: member.document.text,
                    cluster_id,
                })
        })
        .collect()
}

/// Assemble rows and wrap them in an `OK` report.
pub fn report(registry: ClusterRegistry) -> ClusterReport {
    ClusterReport::ok(assemble(registry))
}
