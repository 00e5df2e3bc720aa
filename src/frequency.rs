//! Unigram and n-gram frequency tables plus windowed actor contexts.
//!
//! Tokens are assumed pre-normalized by the cleaning pipeline, so
//! tokenization here is plain whitespace splitting.

use std::collections::HashMap;
use std::hash::Hash;

use crate::corpus::Documents;

/// An insertion-ordered frequency counter.
///
/// `most_common` ranks by count descending and breaks ties by first-encounter
/// order, so rankings are stable and reproducible for a fixed input order.
#[derive(Debug, Clone, Default)]
pub struct Counter<K: Eq + Hash = String> {
    slots: HashMap<K, Slot>,
    inserted: usize,
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    count: u64,
    rank: usize,
}

impl<K: Eq + Hash + Clone> Counter<K> {
    pub fn new() -> Self {
        Counter {
            slots: HashMap::new(),
            inserted: 0,
        }
    }

    pub fn bump(&mut self, key: K) {
        self.bump_by(key, 1);
    }

    pub fn bump_by(&mut self, key: K, by: u64) {
        use std::collections::hash_map::Entry;
        match self.slots.entry(key) {
            Entry::Occupied(mut e) => e.get_mut().count += by,
            Entry::Vacant(v) => {
                v.insert(Slot {
                    count: by,
                    rank: self.inserted,
                });
                self.inserted += 1;
            }
        }
    }

    pub fn get(&self, key: &K) -> u64 {
        self.slots.get(key).map(|s| s.count).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.slots.values().map(|s| s.count).sum()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.slots.keys()
    }

    /// Drop entries below `min_count`. Counts stay exact up to this point
    /// because pruning happens after full accumulation.
    pub fn retain_min(&mut self, min_count: u64) {
        if min_count > 1 {
            self.slots.retain(|_, s| s.count >= min_count);
        }
    }

    /// Entries sorted by count descending, ties by first-encounter order.
    /// `topk = None` returns the full ranking.
    pub fn most_common(&self, topk: Option<usize>) -> Vec<(K, u64)> {
        let mut entries: Vec<(&K, &Slot)> = self.slots.iter().collect();
        entries.sort_by(|a, b| b.1.count.cmp(&a.1.count).then(a.1.rank.cmp(&b.1.rank)));
        if let Some(k) = topk {
            entries.truncate(k);
        }
        entries
            .into_iter()
            .map(|(k, s)| (k.clone(), s.count))
            .collect()
    }
}

/// Accumulate unigram counts over all documents.
pub fn word_counts(docs: &Documents) -> Counter {
    let mut counter = Counter::new();
    for text in docs.values() {
        for token in text.split_whitespace() {
            counter.bump(token.to_string());
        }
    }
    counter
}

/// Accumulate n-gram counts (window of `n` adjacent tokens, stride 1,
/// space-joined keys). Entries below `min_count` are pruned after the full
/// accumulation.
pub fn ngram_counts(docs: &Documents, n: usize, min_count: u64) -> Counter {
    let mut counter = Counter::new();
    for text in docs.values() {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        for gram in tokens.windows(n) {
            counter.bump(gram.join(" "));
        }
    }
    counter.retain_min(min_count);
    counter
}

/// Count tokens within `window` positions left and right of every occurrence
/// of any actor lemma, clipped at document boundaries; returns the `topk`
/// highest counts.
pub fn actor_term_contexts(
    docs: &Documents,
    actor_lemmas: &[String],
    window: usize,
    topk: usize,
) -> Vec<(String, u64)> {
    let mut counter = Counter::new();
    for text in docs.values() {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let len = tokens.len();
        for (i, token) in tokens.iter().enumerate() {
            if !actor_lemmas.iter().any(|l| l == token) {
                continue;
            }
            let start = i.saturating_sub(window);
            let end = (i + 1 + window).min(len);
            for t in &tokens[start..i] {
                counter.bump((*t).to_string());
            }
            for t in &tokens[i + 1..end] {
                counter.bump((*t).to_string());
            }
        }
    }
    counter.most_common(Some(topk))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(pairs: &[(&str, &str)]) -> Documents {
        pairs
            .iter()
            .map(|(id, text)| (id.to_string(), text.to_string()))
            .collect()
    }

    #[test]
    fn counter_most_common_breaks_ties_by_first_seen() {
        let mut c = Counter::new();
        for t in ["b", "a", "b", "a", "c"] {
            c.bump(t.to_string());
        }
        let ranked = c.most_common(None);
        // b and a both have count 2; b was seen first.
        assert_eq!(
            ranked,
            vec![
                ("b".to_string(), 2),
                ("a".to_string(), 2),
                ("c".to_string(), 1)
            ]
        );
    }

    #[test]
    fn word_counts_accumulates_across_docs() {
        let d = docs(&[("d1", "war city war"), ("d2", "city peace")]);
        let c = word_counts(&d);
        assert_eq!(c.get(&"war".to_string()), 2);
        assert_eq!(c.get(&"city".to_string()), 2);
        assert_eq!(c.get(&"peace".to_string()), 1);
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn ngram_counts_and_pruning() {
        let d = docs(&[("d1", "a b c a b")]);
        let bi = ngram_counts(&d, 2, 1);
        assert_eq!(bi.get(&"a b".to_string()), 2);
        assert_eq!(bi.get(&"b c".to_string()), 1);
        assert_eq!(bi.get(&"c a".to_string()), 1);

        let pruned = ngram_counts(&d, 2, 2);
        assert_eq!(pruned.len(), 1);
        assert_eq!(pruned.get(&"a b".to_string()), 2);
    }

    #[test]
    fn ngram_counts_no_cross_document_bleed() {
        let d = docs(&[("d1", "a b"), ("d2", "c d")]);
        let bi = ngram_counts(&d, 2, 1);
        assert_eq!(bi.get(&"b c".to_string()), 0);
    }

    #[test]
    fn actor_context_window_clipping() {
        // window=3 around "hamas" at index 2: left is {x, a} clipped at 0,
        // right is {y, z, w} clipped at document end.
        let d = docs(&[("d1", "a x hamas y z w")]);
        let lemmas = vec!["hamas".to_string()];
        let ctx = actor_term_contexts(&d, &lemmas, 3, 100);
        let terms: Vec<&str> = ctx.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(terms.len(), 5);
        for expected in ["a", "x", "y", "z", "w"] {
            assert!(terms.contains(&expected), "missing context term {expected}");
        }
        assert!(!terms.contains(&"hamas"), "keyword itself is not context");
    }

    #[test]
    fn actor_context_empty_docs_yield_empty() {
        let d = Documents::new();
        let ctx = actor_term_contexts(&d, &["hamas".to_string()], 3, 10);
        assert!(ctx.is_empty());
    }
}
