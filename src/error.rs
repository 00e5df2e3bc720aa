use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the analysis crate.
///
/// Configuration errors (unknown category/variant/kind, bad prior) propagate
/// to the caller; everything else is recovered stage-locally by the pipeline
/// and only logged.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("unknown category {given:?}; valid categories are: gaza, ukraine")]
    UnknownCategory { given: String },

    #[error("unknown log-odds variant {given:?}; valid variants are: full, top200, bottom200")]
    UnknownVariant { given: String },

    #[error("unknown analysis kind {given:?}; valid kinds are: lexical, semantic, sentiment, scraping")]
    UnknownKind { given: String },

    #[error("{kind} analysis is already running; a second start is rejected, not queued")]
    AlreadyRunning { kind: &'static str },

    #[error("log-odds prior must be > 0, got {got}")]
    InvalidPrior { got: f64 },

    #[error("empty vocabulary: {context}")]
    EmptyVocabulary { context: String },

    #[error(
        "no recognized columns in {path:?}; accepted term aliases: term, word, token; accepted count aliases: count, frequency, freq"
    )]
    NoAliasMatched { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
