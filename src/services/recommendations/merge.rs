use std::collections::HashSet;

use crate::models::Content;

/// Interleaves several recommendation sources into one list of unique items
///
/// Visits the sources in turn, taking the next unread item from each, so no
/// single source dominates the head of the list. Items whose id was already
/// emitted are skipped. Stops at `limit` items, when every source is
/// exhausted, or after `limit * sources.len()` visits. A visit to an
/// exhausted source or one yielding a duplicate still counts.
pub fn merge_recommendations(sources: &[Vec<Content>], limit: usize) -> Vec<Content> {
    let mut merged = Vec::with_capacity(limit);
    let mut seen = HashSet::new();
    let max_visits = limit.saturating_mul(sources.len());

    for visit in 0..max_visits {
        let index = visit / sources.len();
        if merged.len() >= limit || sources.iter().all(|s| index >= s.len()) {
            break;
        }

        if let Some(item) = sources[visit % sources.len()].get(index) {
            if seen.insert(item.id) {
                merged.push(item.clone());
            }
        }
    }

    merged
}
