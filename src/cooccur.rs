//! Windowed term co-occurrence and PMI.
//!
//! Pairs are unordered: the key is the lexicographically sorted `(w1, w2)`
//! tuple, so a symmetric window never produces both orderings or double
//! counts. The forward-only scan (each position paired with the next
//! `window` positions) counts every unordered pair within the window exactly
//! once. Identical-token pairs are skipped.

use crate::corpus::Documents;
use crate::frequency::Counter;

/// Unordered pair counts plus the unigram counts used to normalize PMI.
#[derive(Debug)]
pub struct CooccurrenceTable {
    pub pairs: Counter<(String, String)>,
    pub unigrams: Counter<String>,
}

/// Aggregate windowed co-occurrence counts over a whole corpus subset.
pub fn corpus_cooccurrence(docs: &Documents, window: usize) -> CooccurrenceTable {
    let mut pairs: Counter<(String, String)> = Counter::new();
    let mut unigrams: Counter<String> = Counter::new();

    for text in docs.values() {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let n = tokens.len();
        for i in 0..n {
            unigrams.bump(tokens[i].to_string());
            let end = (i + window + 1).min(n);
            for j in (i + 1)..end {
                let (a, b) = (tokens[i], tokens[j]);
                if a == b {
                    continue;
                }
                let key = if a < b {
                    (a.to_string(), b.to_string())
                } else {
                    (b.to_string(), a.to_string())
                };
                pairs.bump(key);
            }
        }
    }

    CooccurrenceTable { pairs, unigrams }
}

/// Pointwise mutual information for every pair at or above `min_pair_count`,
/// ranked descending. Low-count pairs are filtered first; their PMI estimates
/// are dominated by noise.
pub fn pmi(table: &CooccurrenceTable, min_pair_count: u64) -> Vec<(String, String, f64)> {
    let total_pairs = table.pairs.total() as f64;
    let total_unigrams = table.unigrams.total() as f64;
    if total_pairs == 0.0 || total_unigrams == 0.0 {
        return Vec::new();
    }

    let mut scored: Vec<(String, String, f64)> = table
        .pairs
        .most_common(None)
        .into_iter()
        .filter(|(_, count)| *count >= min_pair_count)
        .map(|((w1, w2), count)| {
            let p_pair = count as f64 / total_pairs;
            let p_w1 = table.unigrams.get(&w1) as f64 / total_unigrams;
            let p_w2 = table.unigrams.get(&w2) as f64 / total_unigrams;
            let score = (p_pair / (p_w1 * p_w2)).ln();
            (w1, w2, score)
        })
        .collect();

    // Stable sort over the count-ranked input keeps score ties deterministic.
    scored.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));
    scored
}
