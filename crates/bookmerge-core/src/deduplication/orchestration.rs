//! Clustering and consolidation orchestration
//!
//! Walks the input once in order. Each record not yet claimed anchors a new
//! cluster and claims every later unclaimed record the classifier calls the
//! same work. Clusters with more than one member are merged.

use super::classification::Classifier;
use crate::merge::consolidate_editions;
use crate::record::{BookRecord, MergedRecord};

/// Consolidate editions using the default thresholds
pub fn consolidate(records: &[BookRecord]) -> Vec<MergedRecord> {
    consolidate_with(records, &Classifier::default())
}

/// Consolidate editions of the same work into one record per cluster.
///
/// Output order follows each cluster's first (anchor) record.
pub fn consolidate_with(records: &[BookRecord], classifier: &Classifier) -> Vec<MergedRecord> {
    let consolidated: Vec<MergedRecord> = find_clusters(records, classifier)
        .into_iter()
        .map(|indices| {
            let cluster: Vec<&BookRecord> = indices.iter().map(|&i| &records[i]).collect();
            consolidate_editions(&cluster)
        })
        .collect();

    tracing::info!(
        "Deduplicated {} books down to {} unique works",
        records.len(),
        consolidated.len()
    );

    consolidated
}

/// Partition record indices into same-work clusters.
///
/// Every index appears in exactly one cluster; clusters are ordered by their
/// anchor and members keep input order.
pub fn find_clusters(records: &[BookRecord], classifier: &Classifier) -> Vec<Vec<usize>> {
    let mut clusters: Vec<Vec<usize>> = Vec::new();
    let mut used = vec![false; records.len()];

    for i in 0..records.len() {
        if used[i] {
            continue;
        }
        used[i] = true;

        let mut members = vec![i];
        for j in (i + 1)..records.len() {
            if used[j] {
                continue;
            }

            let decision = classifier.explain_pair(&records[i], &records[j]);
            tracing::debug!(
                "#{} {:?} vs #{} {:?}: {:?} via {:?} (score {:?})",
                i,
                records[i].title,
                j,
                records[j].title,
                decision.verdict,
                decision.path,
                decision.score
            );

            if decision.verdict.merges() {
                members.push(j);
                used[j] = true;
            }
        }

        clusters.push(members);
    }

    clusters
}
