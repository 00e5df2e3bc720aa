//! Per-article lexical statistics.

use std::collections::HashSet;

use serde::Serialize;

use crate::corpus::{Category, Documents};

/// One row of `article_stats.csv`. Created once per run, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleStat {
    pub category: String,
    pub doc_id: String,
    pub tokens: usize,
    pub vocab: usize,
    pub diversity: f64,
    pub avg_word_len: f64,
    pub longest_word: String,
}

/// Compute token count, vocabulary size, lexical diversity, average word
/// length, and the longest word for every document in a category.
pub fn article_stats(category: Category, docs: &Documents) -> Vec<ArticleStat> {
    let mut stats = Vec::with_capacity(docs.len());
    for (doc_id, text) in docs {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let token_count = tokens.len();
        let vocab: HashSet<&str> = tokens.iter().copied().collect();
        let diversity = if token_count > 0 {
            vocab.len() as f64 / token_count as f64
        } else {
            0.0
        };
        let avg_word_len = if token_count > 0 {
            tokens.iter().map(|t| t.chars().count()).sum::<usize>() as f64 / token_count as f64
        } else {
            0.0
        };
        // First longest wins length ties.
        let longest_word = tokens
            .iter()
            .copied()
            .fold("", |best, t| {
                if t.chars().count() > best.chars().count() {
                    t
                } else {
                    best
                }
            })
            .to_string();

        stats.push(ArticleStat {
            category: category.as_str().to_string(),
            doc_id: doc_id.clone(),
            tokens: token_count,
            vocab: vocab.len(),
            diversity,
            avg_word_len,
            longest_word,
        });
    }
    stats
}
