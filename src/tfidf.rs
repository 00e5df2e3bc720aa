//! TF-IDF document-term matrix, top-term extraction, and cosine similarity.
//!
//! Weighting follows the usual smoothed scheme: `tf * (ln((N+1)/(df+1)) + 1)`
//! with L2-normalized document rows. Vocabulary selection filters by document
//! frequency, caps at `max_features` by global term frequency, and orders the
//! surviving terms lexicographically.

use std::collections::{HashMap, HashSet};

use crate::corpus::Documents;
use crate::error::{AnalysisError, Result};

#[derive(Debug, Clone)]
pub struct TfidfOptions {
    /// Vocabulary cap; highest global term frequency wins, ties go to the
    /// lexicographically smaller term.
    pub max_features: usize,
    /// Inclusive n-gram range, e.g. `(1, 2)` for unigrams and bigrams.
    pub ngram_range: (usize, usize),
    /// Terms in fewer than this many documents are excluded.
    pub min_df: usize,
    /// Terms in more than this fraction of documents are excluded.
    pub max_df: f64,
}

impl Default for TfidfOptions {
    fn default() -> Self {
        TfidfOptions {
            max_features: 20_000,
            ngram_range: (1, 2),
            min_df: 2,
            max_df: 0.95,
        }
    }
}

/// Fitted vocabulary and inverse document frequencies.
#[derive(Debug)]
pub struct TfidfModel {
    /// Lexicographically ordered vocabulary.
    pub vocabulary: Vec<String>,
    term_index: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfModel {
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.term_index.get(term).copied()
    }
}

/// Dense document-term weight matrix with row ids.
#[derive(Debug)]
pub struct TfidfMatrix {
    pub doc_ids: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

fn doc_ngrams(text: &str, ngram_range: (usize, usize)) -> Vec<String> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut grams = Vec::new();
    for n in ngram_range.0..=ngram_range.1 {
        if n == 0 {
            continue;
        }
        for gram in tokens.windows(n) {
            grams.push(gram.join(" "));
        }
    }
    grams
}

/// Fit the vocabulary on `docs` and transform them into a weight matrix.
///
/// Returns `EmptyVocabulary` when there are no documents or no term survives
/// the document-frequency filters; callers treat that as a skippable stage,
/// not a fault.
pub fn fit_transform(docs: &Documents, options: &TfidfOptions) -> Result<(TfidfModel, TfidfMatrix)> {
    if docs.is_empty() {
        return Err(AnalysisError::EmptyVocabulary {
            context: "no documents to fit TF-IDF on".to_string(),
        });
    }

    let n_docs = docs.len();
    let mut term_freq: HashMap<String, u64> = HashMap::new();
    let mut doc_freq: HashMap<String, usize> = HashMap::new();

    for text in docs.values() {
        let mut seen: HashSet<&str> = HashSet::new();
        let grams = doc_ngrams(text, options.ngram_range);
        for gram in &grams {
            *term_freq.entry(gram.clone()).or_insert(0) += 1;
        }
        for gram in &grams {
            if seen.insert(gram.as_str()) {
                *doc_freq.entry(gram.clone()).or_insert(0) += 1;
            }
        }
    }

    let max_df_count = options.max_df * n_docs as f64;
    let mut candidates: Vec<(String, u64)> = term_freq
        .into_iter()
        .filter(|(term, _)| {
            let df = doc_freq.get(term).copied().unwrap_or(0);
            df >= options.min_df && (df as f64) <= max_df_count
        })
        .collect();

    // Cap by global frequency, then order the surviving vocabulary
    // lexicographically.
    candidates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    candidates.truncate(options.max_features);
    let mut vocabulary: Vec<String> = candidates.into_iter().map(|(t, _)| t).collect();
    vocabulary.sort();

    if vocabulary.is_empty() {
        return Err(AnalysisError::EmptyVocabulary {
            context: format!(
                "no term passed min_df={} / max_df={} over {} documents",
                options.min_df, options.max_df, n_docs
            ),
        });
    }

    let term_index: HashMap<String, usize> = vocabulary
        .iter()
        .enumerate()
        .map(|(i, t)| (t.clone(), i))
        .collect();
    let idf: Vec<f64> = vocabulary
        .iter()
        .map(|t| {
            let df = doc_freq.get(t).copied().unwrap_or(0);
            (((n_docs + 1) as f64) / ((df + 1) as f64)).ln() + 1.0
        })
        .collect();

    let model = TfidfModel {
        vocabulary,
        term_index,
        idf,
    };

    let mut doc_ids = Vec::with_capacity(n_docs);
    let mut rows = Vec::with_capacity(n_docs);
    for (doc_id, text) in docs {
        let mut row = vec![0.0; model.vocabulary.len()];
        for gram in doc_ngrams(text, options.ngram_range) {
            if let Some(i) = model.term_index(&gram) {
                row[i] += 1.0;
            }
        }
        for (i, value) in row.iter_mut().enumerate() {
            *value *= model.idf[i];
        }
        l2_normalize(&mut row);
        doc_ids.push(doc_id.clone());
        rows.push(row);
    }

    Ok((model, TfidfMatrix { doc_ids, rows }))
}

fn l2_normalize(row: &mut [f64]) {
    let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        for v in row.iter_mut() {
            *v /= norm;
        }
    }
}

/// Rank terms by mean weight across all documents, descending. The sort is
/// stable, so score ties keep vocabulary (lexicographic) order.
pub fn top_terms(model: &TfidfModel, matrix: &TfidfMatrix, top_k: usize) -> Vec<(String, f64)> {
    let n_docs = matrix.rows.len();
    if n_docs == 0 {
        return Vec::new();
    }
    let n_terms = model.vocabulary.len();
    let mut means = vec![0.0f64; n_terms];
    for row in &matrix.rows {
        for (i, v) in row.iter().enumerate() {
            means[i] += v;
        }
    }
    for m in means.iter_mut() {
        *m /= n_docs as f64;
    }

    let mut indices: Vec<usize> = (0..n_terms).collect();
    indices.sort_by(|&a, &b| means[b].partial_cmp(&means[a]).unwrap_or(std::cmp::Ordering::Equal));
    indices
        .into_iter()
        .take(top_k)
        .map(|i| (model.vocabulary[i].clone(), means[i]))
        .collect()
}

/// Pairwise cosine similarity between every pair of document rows.
/// Zero vectors yield 0.0 similarities; the diagonal is 1.0 for any non-zero
/// row.
pub fn cosine_similarity(matrix: &TfidfMatrix) -> Vec<Vec<f64>> {
    let n = matrix.rows.len();
    let norms: Vec<f64> = matrix
        .rows
        .iter()
        .map(|r| r.iter().map(|v| v * v).sum::<f64>().sqrt())
        .collect();

    let mut sim = vec![vec![0.0f64; n]; n];
    for i in 0..n {
        if norms[i] > 0.0 {
            sim[i][i] = 1.0;
        }
        for j in (i + 1)..n {
            if norms[i] == 0.0 || norms[j] == 0.0 {
                continue;
            }
            let dot: f64 = matrix.rows[i]
                .iter()
                .zip(&matrix.rows[j])
                .map(|(a, b)| a * b)
                .sum();
            let value = dot / (norms[i] * norms[j]);
            sim[i][j] = value;
            sim[j][i] = value;
        }
    }
    sim
}
