#![forbid(unsafe_code)]
//! # corpus_compare CLI
//!
//! Runs the full comparative-analysis pipeline over a cleaned two-category
//! corpus (`data/{gaza,ukraine}/*.txt`) and writes every statistic as
//! CSV/JSON under the output directory.
//!
//! ## Example
//! ```bash
//! cargo run --release -- data/processed_clean --out results/statistics
//! ```
//!
//! See `--help` for all tunable windows and thresholds.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::error;

use corpus_compare::runs::{AnalysisKind, RunCoordinator};
use corpus_compare::{PipelineOptions, run_pipeline};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Base directory holding the cleaned corpus: {gaza,ukraine}/*.txt
    data_dir: PathBuf,

    /// Directory to write all result artifacts into
    #[arg(long, default_value = "results/statistics")]
    out: PathBuf,

    /// Dirichlet prior for log-odds smoothing (must be > 0)
    #[arg(long, default_value_t = 0.01)]
    prior: f64,

    /// Documents with fewer whitespace tokens are skipped at load time
    #[arg(long, default_value_t = 50)]
    min_tokens: usize,

    /// Optional per-category cap on loaded documents
    #[arg(long)]
    max_docs: Option<usize>,

    /// Context window (tokens each side) for actor term contexts
    #[arg(long, default_value_t = 8)]
    context_window: usize,

    /// Context window for POS-conditioned actor contexts
    #[arg(long, default_value_t = 5)]
    pos_window: usize,

    /// Window for co-occurrence pair counting
    #[arg(long, default_value_t = 5)]
    cooc_window: usize,

    /// Prune bigrams/trigrams below this count
    #[arg(long, default_value_t = 1)]
    ngram_min_count: u64,

    /// How many top TF-IDF terms to export per category
    #[arg(long, default_value_t = 200)]
    top_terms: usize,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let mut options = PipelineOptions::default();
    options.prior = cli.prior;
    options.loader.min_tokens = cli.min_tokens;
    options.loader.max_docs = cli.max_docs;
    options.context_window = cli.context_window;
    options.pos_window = cli.pos_window;
    options.cooc_window = cli.cooc_window;
    options.ngram_min_count = cli.ngram_min_count;
    options.tfidf_top_terms = cli.top_terms;

    // One lexical run at a time; the guard frees the slot when main returns.
    let coordinator = RunCoordinator::new();
    let _guard = match coordinator.begin(AnalysisKind::Lexical) {
        Ok(guard) => guard,
        Err(e) => {
            error!("Error: {e}");
            process::exit(1);
        }
    };

    match run_pipeline(&cli.data_dir, &cli.out, &options) {
        Ok(summary) => {
            println!(
                "gaza: {} docs, ukraine: {} docs, {} artifacts written to {}",
                summary.gaza_n_docs,
                summary.ukraine_n_docs,
                summary.files.len(),
                cli.out.display()
            );
        }
        Err(e) => {
            error!("Error: {e}");
            process::exit(1);
        }
    }
}
