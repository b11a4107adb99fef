//! Text similarity over NRQL query strings.
//!
//! Two metrics live here on purpose. The pair report uses plain [`ratio`];
//! clustering uses the more permissive [`weighted_ratio`], which also forgives
//! clause reordering. They are independent knobs, not one metric with two
//! names.
//!
//! Scoring every unordered pair is quadratic in record count. That is
//! acceptable for the intended input sizes (hundreds to low thousands of
//! conditions); pairs are scored independently on rayon workers and merged by
//! concatenation.

use rayon::prelude::*;
use serde::Serialize;

/// Normalized Levenshtein similarity as an integer percentage. 100 means the
/// strings are identical. Symmetric and deterministic; case-sensitive, so
/// callers wanting case-insensitive scores lower-case first.
pub fn ratio(a: &str, b: &str) -> u8 {
    (strsim::normalized_levenshtein(a, b) * 100.0).round() as u8
}

/// [`ratio`] after sorting whitespace-separated tokens, so `WHERE x FACET y`
/// and `FACET y WHERE x` compare as equals.
pub fn token_sort_ratio(a: &str, b: &str) -> u8 {
    ratio(&sort_tokens(a), &sort_tokens(b))
}

/// The permissive metric used for clustering: the better of the plain and
/// token-sorted ratios.
pub fn weighted_ratio(a: &str, b: &str) -> u8 {
    ratio(a, b).max(token_sort_ratio(a, b))
}

fn sort_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// One record's worth of analysis input: the `<id>:<name>` report key, the
/// enabled flag, and the raw query text.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRecord {
    pub key: String,
    pub enabled: bool,
    pub query: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SimilarPair {
    pub first: String,
    pub second: String,
    pub score: u8,
}

/// Scores every unordered pair of distinct records and keeps those at or
/// above `threshold`, sorted descending by score. A record is never compared
/// with itself.
pub fn similar_pairs(records: &[QueryRecord], threshold: u8) -> Vec<SimilarPair> {
    let mut pairs: Vec<SimilarPair> = (0..records.len())
        .into_par_iter()
        .flat_map_iter(|i| {
            (i + 1..records.len()).filter_map(move |j| {
                let score = ratio(&records[i].query, &records[j].query);
                (score >= threshold).then(|| SimilarPair {
                    first: records[i].key.clone(),
                    second: records[j].key.clone(),
                    score,
                })
            })
        })
        .collect();
    pairs.sort_by(|a, b| b.score.cmp(&a.score));
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(key: &str, query: &str) -> QueryRecord {
        QueryRecord {
            key: key.into(),
            enabled: true,
            query: query.into(),
        }
    }

    #[test]
    fn identical_text_scores_100() {
        assert_eq!(
            ratio("select count(*) from Foo", "select count(*) from Foo"),
            100
        );
    }

    #[test]
    fn ratio_is_symmetric() {
        let cases = [
            ("select * from A", "select * from B"),
            ("", "select 1"),
            ("abc", "axc"),
        ];
        for (a, b) in cases {
            assert_eq!(ratio(a, b), ratio(b, a), "{a} / {b}");
        }
    }

    #[test]
    fn token_sort_forgives_reordering() {
        let a = "SELECT count(*) FROM Txn WHERE app = 'x' FACET host";
        let b = "SELECT count(*) FROM Txn FACET host WHERE app = 'x'";
        assert!(ratio(a, b) < 100);
        assert_eq!(token_sort_ratio(a, b), 100);
        assert_eq!(weighted_ratio(a, b), 100);
    }

    #[test]
    fn weighted_ratio_never_below_plain() {
        let a = "select latency from Txn";
        let b = "select errors from Txn";
        assert!(weighted_ratio(a, b) >= ratio(a, b));
    }

    #[test]
    fn threshold_100_keeps_only_exact_pairs() {
        let records = vec![
            rec("1:a", "select count(*) from Foo"),
            rec("2:b", "select count(*) from Foo"),
            rec("3:c", "select count(*) from Bar"),
        ];
        let pairs = similar_pairs(&records, 100);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].first, "1:a");
        assert_eq!(pairs[0].second, "2:b");
        assert_eq!(pairs[0].score, 100);
    }

    #[test]
    fn pairs_sorted_descending() {
        let records = vec![
            rec("1:a", "select count(*) from Foo"),
            rec("2:b", "select count(*) from Foo"),
            rec("3:c", "select count(*) from Fooz"),
        ];
        let pairs = similar_pairs(&records, 1);
        assert_eq!(pairs.len(), 3);
        assert!(pairs.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(pairs[0].score, 100);
    }

    #[test]
    fn no_self_pairs() {
        let records = vec![rec("1:a", "q"), rec("2:b", "q")];
        let pairs = similar_pairs(&records, 0);
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn empty_input_yields_no_pairs() {
        assert!(similar_pairs(&[], 0).is_empty());
        assert!(similar_pairs(&[rec("1:a", "q")], 0).is_empty());
    }
}
