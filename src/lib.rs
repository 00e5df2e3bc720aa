#![forbid(unsafe_code)]
//! # corpus_compare
//!
//! Comparative corpus-linguistics analysis over two news-article corpora
//! ("gaza" and "ukraine"): word and n-gram frequencies, TF-IDF top terms and
//! document similarity, Dirichlet-smoothed log-odds asymmetry scoring,
//! actor-context and POS-conditioned context extraction, windowed
//! co-occurrence with PMI, and per-article lexical statistics, orchestrated
//! as one batch pipeline that persists every artifact as CSV/JSON.
//!
//! The crate expects cleaned input: `base/{gaza,ukraine}/*.txt`, one document
//! per file, whitespace-separated lowercase lemmas. Every run recomputes from
//! scratch; the output tree is a pure function of the corpus snapshot.
//!
//! ## Example
//! ```no_run
//! use corpus_compare::{PipelineOptions, run_pipeline};
//! use std::path::Path;
//!
//! let summary = run_pipeline(
//!     Path::new("data/processed_clean"),
//!     Path::new("results/statistics"),
//!     &PipelineOptions::default(),
//! )?;
//! println!("gaza: {} docs", summary.gaza_n_docs);
//! # Ok::<(), corpus_compare::AnalysisError>(())
//! ```

pub mod cooccur;
pub mod corpus;
pub mod error;
pub mod export;
pub mod frequency;
pub mod logodds;
pub mod pipeline;
pub mod postag;
pub mod runs;
pub mod schema;
pub mod stats;
pub mod tfidf;

pub use cooccur::{CooccurrenceTable, corpus_cooccurrence, pmi};
pub use corpus::{Category, Corpus, Documents, LoaderOptions, load_corpus};
pub use error::{AnalysisError, Result};
pub use export::csv_safe_cell;
pub use frequency::{Counter, actor_term_contexts, ngram_counts, word_counts};
pub use logodds::{LogOddsRow, LogOddsVariant, compute_log_odds};
pub use pipeline::{ActorGroup, PipelineOptions, RunSummary, default_actors, run_pipeline};
pub use postag::{PosContexts, PosTag, actor_pos_contexts, tag_token};
pub use runs::{AnalysisKind, RunCoordinator, RunGuard};
pub use schema::{TermCount, read_term_counts};
pub use stats::{ArticleStat, article_stats};
pub use tfidf::{TfidfMatrix, TfidfModel, TfidfOptions, cosine_similarity, fit_transform, top_terms};
