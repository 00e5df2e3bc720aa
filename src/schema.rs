//! Canonical schema mapping for heterogeneous term/count CSV files.
//!
//! Upstream exports disagree on column names (`term`/`word`/`token`,
//! `count`/`frequency`/`freq`). Instead of guessing per call site, the reader
//! resolves each column once per file through an explicit priority-ordered
//! alias list and fails with a single "no alias matched" error when none fit.

use std::path::Path;

use log::warn;

use crate::error::{AnalysisError, Result};

/// Accepted term-column aliases, highest priority first.
pub const TERM_ALIASES: [&str; 3] = ["term", "word", "token"];
/// Accepted count-column aliases, highest priority first.
pub const COUNT_ALIASES: [&str; 3] = ["count", "frequency", "freq"];

/// One normalized row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermCount {
    pub term: String,
    pub count: u64,
}

fn resolve_column(header: &csv::StringRecord, aliases: &[&str]) -> Option<usize> {
    for alias in aliases {
        if let Some(idx) = header.iter().position(|h| h.eq_ignore_ascii_case(alias)) {
            return Some(idx);
        }
    }
    None
}

/// Read a term/count CSV into the canonical schema.
///
/// Rows with an unparsable count are skipped with a warning; the file-level
/// schema mismatch is the only hard error.
pub fn read_term_counts(path: &Path) -> Result<Vec<TermCount>> {
    let mut reader = csv::Reader::from_path(path)?;
    let header = reader.headers()?.clone();

    let term_idx = resolve_column(&header, &TERM_ALIASES);
    let count_idx = resolve_column(&header, &COUNT_ALIASES);
    let (term_idx, count_idx) = match (term_idx, count_idx) {
        (Some(t), Some(c)) => (t, c),
        _ => {
            return Err(AnalysisError::NoAliasMatched {
                path: path.to_path_buf(),
            });
        }
    };

    let mut rows = Vec::new();
    let mut bad_rows = 0usize;
    for record in reader.records() {
        let record = record?;
        let term = record.get(term_idx).unwrap_or_default();
        let count = record.get(count_idx).unwrap_or_default();
        match count.parse::<u64>() {
            Ok(count) => rows.push(TermCount {
                term: term.to_string(),
                count,
            }),
            Err(_) => bad_rows += 1,
        }
    }
    if bad_rows > 0 {
        warn!(
            "{}: skipped {} rows with unparsable counts",
            path.display(),
            bad_rows
        );
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_csv(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn canonical_columns() {
        let td = tempfile::tempdir().unwrap();
        let p = write_csv(td.path(), "a.csv", "term,count\nwar,3\ncity,1\n");
        let rows = read_term_counts(&p).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], TermCount { term: "war".into(), count: 3 });
    }

    #[test]
    fn alias_columns_resolve_by_priority() {
        let td = tempfile::tempdir().unwrap();
        // "word" and "freq" are accepted aliases.
        let p = write_csv(td.path(), "b.csv", "word,freq\nwar,3\n");
        let rows = read_term_counts(&p).unwrap();
        assert_eq!(rows[0].term, "war");
        assert_eq!(rows[0].count, 3);

        // With both "term" and "word" present, "term" wins.
        let p2 = write_csv(td.path(), "c.csv", "word,term,count\nwrong,right,1\n");
        let rows2 = read_term_counts(&p2).unwrap();
        assert_eq!(rows2[0].term, "right");
    }

    #[test]
    fn no_alias_is_one_error_per_file() {
        let td = tempfile::tempdir().unwrap();
        let p = write_csv(td.path(), "d.csv", "lemma,total\nwar,3\n");
        let err = read_term_counts(&p).unwrap_err();
        assert!(matches!(err, AnalysisError::NoAliasMatched { .. }));
        assert!(err.to_string().contains("d.csv"));
    }

    #[test]
    fn unparsable_counts_are_skipped_not_fatal() {
        let td = tempfile::tempdir().unwrap();
        let p = write_csv(td.path(), "e.csv", "term,count\nwar,3\ncity,oops\n");
        let rows = read_term_counts(&p).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].term, "war");
    }
}
