//! Density-based grouping of near-duplicate queries.
//!
//! Eligible records (enabled, non-empty query) are lower-cased, scored into a
//! full pairwise matrix with [`weighted_ratio`], and run through DBSCAN with
//! the similarity bound as the closeness test. No cluster count is chosen up
//! front; records without enough similar neighbors stay noise. Label numbering
//! depends on input order, membership does not — callers should compare
//! member sets, not label values.

use rayon::prelude::*;

use crate::similarity::{weighted_ratio, QueryRecord};

pub const NOISE: i32 = -1;

pub struct ClusterConfig {
    /// Two queries count as neighbors when their weighted ratio reaches this.
    pub min_similarity: u8,
    /// Minimum members (the point itself included) for a cluster.
    pub min_cluster_size: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            min_similarity: 80,
            min_cluster_size: 2,
        }
    }
}

/// Full pairwise similarity matrix. Rows are scored on rayon workers; the
/// metric is symmetric so the matrix is too.
pub fn similarity_matrix(queries: &[String]) -> Vec<Vec<u8>> {
    queries
        .par_iter()
        .map(|a| queries.iter().map(|b| weighted_ratio(a, b)).collect())
        .collect()
}

/// Cluster assignment for the eligible subset of `records`. Indices reported
/// by [`Clustering`] refer to positions in the original `records` slice.
pub fn cluster(records: &[QueryRecord], config: &ClusterConfig) -> Clustering {
    let mut indices = Vec::new();
    let mut queries = Vec::new();
    for (index, record) in records.iter().enumerate() {
        if record.enabled && !record.query.trim().is_empty() {
            indices.push(index);
            queries.push(record.query.to_lowercase());
        }
    }

    if queries.len() < config.min_cluster_size {
        let labels = vec![NOISE; queries.len()];
        return Clustering {
            indices,
            queries,
            labels,
        };
    }

    let matrix = similarity_matrix(&queries);
    let labels = dbscan(&matrix, config);
    Clustering {
        indices,
        queries,
        labels,
    }
}

fn neighbors(matrix: &[Vec<u8>], point: usize, min_similarity: u8) -> Vec<usize> {
    matrix[point]
        .iter()
        .enumerate()
        .filter(|&(_, &sim)| sim >= min_similarity)
        .map(|(j, _)| j)
        .collect()
}

/// Plain DBSCAN over a precomputed similarity matrix. The point itself is in
/// its own neighborhood, so `min_cluster_size` is the classic minPts.
fn dbscan(matrix: &[Vec<u8>], config: &ClusterConfig) -> Vec<i32> {
    const UNVISITED: i32 = -2;
    let n = matrix.len();
    let mut labels = vec![UNVISITED; n];
    let mut next_label = 0;

    for point in 0..n {
        if labels[point] != UNVISITED {
            continue;
        }
        let seeds = neighbors(matrix, point, config.min_similarity);
        if seeds.len() < config.min_cluster_size {
            labels[point] = NOISE;
            continue;
        }

        let label = next_label;
        next_label += 1;
        labels[point] = label;
        let mut queue: std::collections::VecDeque<usize> = seeds.into();

        while let Some(current) = queue.pop_front() {
            if labels[current] == NOISE {
                // Border point reached from a core point joins the cluster.
                labels[current] = label;
            }
            if labels[current] != UNVISITED {
                continue;
            }
            labels[current] = label;
            let reachable = neighbors(matrix, current, config.min_similarity);
            if reachable.len() >= config.min_cluster_size {
                queue.extend(reachable);
            }
        }
    }

    labels
}

pub struct Clustering {
    indices: Vec<usize>,
    queries: Vec<String>,
    labels: Vec<i32>,
}

impl Clustering {
    pub fn cluster_count(&self) -> usize {
        self.labels
            .iter()
            .filter(|&&l| l >= 0)
            .max()
            .map(|&max| max as usize + 1)
            .unwrap_or(0)
    }

    /// Original-record indices per cluster, label order. Noise is excluded.
    pub fn clusters(&self) -> Vec<Vec<usize>> {
        let mut clusters = vec![Vec::new(); self.cluster_count()];
        for (position, &label) in self.labels.iter().enumerate() {
            if label >= 0 {
                clusters[label as usize].push(self.indices[position]);
            }
        }
        clusters
    }

    /// Lower-cased member query texts for one cluster label.
    pub fn cluster_queries(&self, label: usize) -> Vec<&str> {
        self.labels
            .iter()
            .zip(&self.queries)
            .filter(|(&l, _)| l == label as i32)
            .map(|(_, q)| q.as_str())
            .collect()
    }

    pub fn noise(&self) -> Vec<usize> {
        self.labels
            .iter()
            .zip(&self.indices)
            .filter(|(&l, _)| l == NOISE)
            .map(|(_, &index)| index)
            .collect()
    }

    pub fn median_cluster_size(&self) -> f64 {
        let mut sizes: Vec<usize> = self.clusters().iter().map(Vec::len).collect();
        if sizes.is_empty() {
            return 0.0;
        }
        sizes.sort_unstable();
        let mid = sizes.len() / 2;
        if sizes.len() % 2 == 1 {
            sizes[mid] as f64
        } else {
            (sizes[mid - 1] + sizes[mid]) as f64 / 2.0
        }
    }
}
