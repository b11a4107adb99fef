pub mod cluster;
pub mod similarity;

pub use cluster::{cluster, ClusterConfig, Clustering, NOISE};
pub use similarity::{ratio, similar_pairs, token_sort_ratio, weighted_ratio, QueryRecord, SimilarPair};
