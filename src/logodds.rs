//! Dirichlet-smoothed log-odds-ratio asymmetry scoring.
//!
//! For two frequency tables the scorer works over the union vocabulary:
//! terms absent from one side enter with count 0 before smoothing, the
//! normalizing totals include the smoothing mass for every vocabulary term,
//! and each term gets a z-score (log-odds over its estimated standard error)
//! used to rank distinctiveness.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{AnalysisError, Result};
use crate::frequency::Counter;

/// One scored term of the comparison table.
#[derive(Debug, Clone, Serialize)]
pub struct LogOddsRow {
    pub term: String,
    pub count_a: u64,
    pub count_b: u64,
    pub logodds: f64,
    pub z: f64,
}

/// Which slice of the full descending-by-z table to look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOddsVariant {
    Full,
    Top200,
    Bottom200,
}

impl LogOddsVariant {
    pub const ALL: [LogOddsVariant; 3] = [
        LogOddsVariant::Full,
        LogOddsVariant::Top200,
        LogOddsVariant::Bottom200,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LogOddsVariant::Full => "full",
            LogOddsVariant::Top200 => "top200",
            LogOddsVariant::Bottom200 => "bottom200",
        }
    }
}

impl fmt::Display for LogOddsVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogOddsVariant {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "full" => Ok(LogOddsVariant::Full),
            "top200" => Ok(LogOddsVariant::Top200),
            "bottom200" => Ok(LogOddsVariant::Bottom200),
            other => Err(AnalysisError::UnknownVariant {
                given: other.to_string(),
            }),
        }
    }
}

/// Score every term of the union vocabulary, sorted descending by z.
///
/// The sort is stable over the lexicographically sorted vocabulary, so z ties
/// stay in lexicographic order and reruns are byte-identical. `prior` must be
/// strictly positive; zero would put `ln(0)` in the score of one-sided terms.
pub fn compute_log_odds(
    counts_a: &Counter,
    counts_b: &Counter,
    prior: f64,
) -> Result<Vec<LogOddsRow>> {
    if !(prior > 0.0) {
        return Err(AnalysisError::InvalidPrior { got: prior });
    }

    let mut vocab: Vec<&String> = counts_a.keys().chain(counts_b.keys()).collect();
    vocab.sort();
    vocab.dedup();

    let a: Vec<u64> = vocab.iter().map(|t| counts_a.get(*t)).collect();
    let b: Vec<u64> = vocab.iter().map(|t| counts_b.get(*t)).collect();

    // Totals include the prior mass for every vocabulary term, observed or not.
    let total_a: f64 = a.iter().map(|&c| c as f64 + prior).sum();
    let total_b: f64 = b.iter().map(|&c| c as f64 + prior).sum();

    let mut rows: Vec<LogOddsRow> = Vec::with_capacity(vocab.len());
    for (i, term) in vocab.iter().enumerate() {
        let a_p = a[i] as f64 + prior;
        let b_p = b[i] as f64 + prior;
        let logodds = (a_p / total_a).ln() - (b_p / total_b).ln();
        let variance = 1.0 / a_p + 1.0 / b_p;
        let z = logodds / variance.sqrt();
        rows.push(LogOddsRow {
            term: (*term).clone(),
            count_a: a[i],
            count_b: b[i],
            logodds,
            z,
        });
    }

    rows.sort_by(|x, y| y.z.partial_cmp(&x.z).unwrap_or(std::cmp::Ordering::Equal));
    Ok(rows)
}

/// Slice the already-sorted full table. The bottom slice is the tail of the
/// descending table, never re-sorted, so the most negative terms stay last.
pub fn slice(rows: &[LogOddsRow], variant: LogOddsVariant) -> &[LogOddsRow] {
    match variant {
        LogOddsVariant::Full => rows,
        LogOddsVariant::Top200 => &rows[..rows.len().min(200)],
        LogOddsVariant::Bottom200 => &rows[rows.len().saturating_sub(200)..],
    }
}
