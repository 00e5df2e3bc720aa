//! CSV and JSON artifact writers.
//!
//! Every writer serializes the fully materialized in-memory result into a
//! buffer first and lands it on disk with a single `fs::write`, so no output
//! file is ever left half-written.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::logodds::LogOddsRow;
use crate::stats::ArticleStat;

/// Guard a cell against spreadsheet formula injection: cells starting with
/// `=`, `+`, `-`, or `@` get a leading apostrophe.
pub fn csv_safe_cell(s: &str) -> String {
    match s.chars().next() {
        Some('=') | Some('+') | Some('-') | Some('@') => format!("'{s}"),
        _ => s.to_string(),
    }
}

fn write_atomic(path: &Path, bytes: Vec<u8>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(())
}

fn finish_csv(mut writer: csv::Writer<Vec<u8>>, path: &Path) -> Result<()> {
    writer.flush()?;
    let bytes = writer
        .into_inner()
        .expect("in-memory csv buffer already flushed");
    write_atomic(path, bytes)
}

/// `term,count` rows (word frequencies, n-grams, actor contexts).
pub fn write_term_counts(path: &Path, rows: &[(String, u64)]) -> Result<()> {
    write_counts_with_header(path, "term", rows)
}

/// `token,count` rows (POS context rankings).
pub fn write_token_counts(path: &Path, rows: &[(String, u64)]) -> Result<()> {
    write_counts_with_header(path, "token", rows)
}

fn write_counts_with_header(path: &Path, key_column: &str, rows: &[(String, u64)]) -> Result<()> {
    let mut w = csv::Writer::from_writer(Vec::new());
    w.write_record([key_column, "count"])?;
    for (term, count) in rows {
        w.write_record([csv_safe_cell(term), count.to_string()])?;
    }
    finish_csv(w, path)
}

/// `term,score` rows for top TF-IDF terms.
pub fn write_tfidf_terms(path: &Path, rows: &[(String, f64)]) -> Result<()> {
    let mut w = csv::Writer::from_writer(Vec::new());
    w.write_record(["term", "score"])?;
    for (term, score) in rows {
        w.write_record([csv_safe_cell(term), score.to_string()])?;
    }
    finish_csv(w, path)
}

/// `w1,w2,count` rows for top co-occurrence pairs.
pub fn write_pair_counts(path: &Path, rows: &[((String, String), u64)]) -> Result<()> {
    let mut w = csv::Writer::from_writer(Vec::new());
    w.write_record(["w1", "w2", "count"])?;
    for ((w1, w2), count) in rows {
        w.write_record([csv_safe_cell(w1), csv_safe_cell(w2), count.to_string()])?;
    }
    finish_csv(w, path)
}

/// `w1,w2,pmi` rows for PMI-ranked pairs.
pub fn write_pmi_pairs(path: &Path, rows: &[(String, String, f64)]) -> Result<()> {
    let mut w = csv::Writer::from_writer(Vec::new());
    w.write_record(["w1", "w2", "pmi"])?;
    for (w1, w2, score) in rows {
        w.write_record([csv_safe_cell(w1), csv_safe_cell(w2), score.to_string()])?;
    }
    finish_csv(w, path)
}

/// `term,count_a,count_b,logodds,z` rows of a log-odds table slice.
pub fn write_logodds(path: &Path, rows: &[LogOddsRow]) -> Result<()> {
    let mut w = csv::Writer::from_writer(Vec::new());
    for row in rows {
        w.serialize(row)?;
    }
    if rows.is_empty() {
        w.write_record(["term", "count_a", "count_b", "logodds", "z"])?;
    }
    finish_csv(w, path)
}

/// `category,doc_id,tokens,vocab,diversity,avg_word_len,longest_word`.
pub fn write_article_stats(path: &Path, rows: &[ArticleStat]) -> Result<()> {
    let mut w = csv::Writer::from_writer(Vec::new());
    for row in rows {
        w.serialize(row)?;
    }
    if rows.is_empty() {
        w.write_record([
            "category",
            "doc_id",
            "tokens",
            "vocab",
            "diversity",
            "avg_word_len",
            "longest_word",
        ])?;
    }
    finish_csv(w, path)
}

/// Square cosine-similarity matrix: header `doc_id,<id_1>,...`, one row per
/// document.
pub fn write_similarity_matrix(path: &Path, doc_ids: &[String], sim: &[Vec<f64>]) -> Result<()> {
    let mut w = csv::Writer::from_writer(Vec::new());
    let mut header = vec!["doc_id".to_string()];
    header.extend(doc_ids.iter().map(|id| csv_safe_cell(id)));
    w.write_record(&header)?;
    for (i, row) in sim.iter().enumerate() {
        let mut record = vec![csv_safe_cell(&doc_ids[i])];
        record.extend(row.iter().map(|v| v.to_string()));
        w.write_record(&record)?;
    }
    finish_csv(w, path)
}

/// Pretty-printed JSON artifact (the run summary).
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut bytes = serde_json::to_vec_pretty(value)?;
    bytes.push(b'\n');
    write_atomic(path, bytes)
}
