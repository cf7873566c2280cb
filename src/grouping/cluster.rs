//! Proximity clustering
//!
//! Alternative grouping by distance between box centers. Not used by the
//! default segmentation path.
//!
//! This is a single greedy pass, not connected components: each cluster is a
//! seed plus the unvisited fragments within `max_distance` of that seed. A
//! fragment close to a member but far from the seed starts or joins a later
//! cluster, so two fragments chained through a third can end up apart.

use crate::ocr::TextFragment;

/// Default maximum center-to-center distance in pixels
pub const DEFAULT_PROXIMITY_MAX_DISTANCE: f64 = 50.0;

/// Partition fragments into seed-centered clusters, in input order
pub fn cluster_by_proximity(fragments: &[TextFragment], max_distance: f64) -> Vec<Vec<TextFragment>> {
    let mut clusters = Vec::new();
    let mut visited = vec![false; fragments.len()];

    for (i, seed) in fragments.iter().enumerate() {
        if visited[i] {
            continue;
        }
        visited[i] = true;

        let mut cluster = vec![seed.clone()];
        for (j, candidate) in fragments.iter().enumerate().skip(i + 1) {
            if visited[j] {
                continue;
            }
            if seed.bounding_box.center_distance(&candidate.bounding_box) <= max_distance {
                cluster.push(candidate.clone());
                visited[j] = true;
            }
        }

        clusters.push(cluster);
    }

    clusters
}
