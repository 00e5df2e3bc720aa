//! The comparative-analysis pipeline.
//!
//! A run is a linear, synchronous sequence of stages over both corpora; each
//! stage writes its artifacts before the next starts. A failure in one
//! non-critical stage (no documents for a category, an unwritable file) is
//! logged and skipped, and the run carries on; the summary stage is always
//! attempted. Only configuration errors abort a run before it starts.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::prelude::*;
use log::{info, warn};
use serde::Serialize;

use crate::cooccur;
use crate::corpus::{Category, Corpus, LoaderOptions, load_corpus};
use crate::error::{AnalysisError, Result};
use crate::export;
use crate::frequency::{self, Counter};
use crate::logodds::{self, LogOddsVariant};
use crate::postag::{self, PosTag};
use crate::stats;
use crate::tfidf::{self, TfidfOptions};

/// A named actor cluster: a canonical key and its surface lemma variants.
#[derive(Debug, Clone)]
pub struct ActorGroup {
    pub key: String,
    pub lemmas: Vec<String>,
}

impl ActorGroup {
    pub fn new(key: &str, lemmas: &[&str]) -> Self {
        ActorGroup {
            key: key.to_string(),
            lemmas: lemmas.iter().map(|l| l.to_string()).collect(),
        }
    }
}

/// The fixed actor configuration table (lemmatized forms matching the
/// cleaned corpus).
pub fn default_actors() -> Vec<ActorGroup> {
    vec![
        ActorGroup::new("palestin", &["palestin", "palestinian", "palestine", "hamas"]),
        ActorGroup::new("israel", &["israel", "israeli", "idf"]),
        ActorGroup::new("ukraine", &["ukraine", "ukrainian", "zelensky"]),
        ActorGroup::new("russia", &["russia", "russian", "putin"]),
    ]
}

/// All tunable parameters of a run; the defaults are the observed per-call-site
/// values of the analysis this pipeline reproduces.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub loader: LoaderOptions,
    /// Dirichlet prior for log-odds smoothing. Must be > 0.
    pub prior: f64,
    /// N-grams below this count are pruned from the bigram/trigram tables.
    pub ngram_min_count: u64,
    /// Context window for actor term contexts.
    pub context_window: usize,
    pub context_topk: usize,
    /// Context window for POS-conditioned actor contexts.
    pub pos_window: usize,
    pub pos_topk: usize,
    /// Window for corpus co-occurrence pairs.
    pub cooc_window: usize,
    pub cooc_top_pairs: usize,
    /// Pairs below this count are excluded from the PMI ranking.
    pub pmi_min_pair_count: u64,
    /// Per-category TF-IDF settings.
    pub tfidf: TfidfOptions,
    pub tfidf_top_terms: usize,
    pub actors: Vec<ActorGroup>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        PipelineOptions {
            loader: LoaderOptions::default(),
            prior: 0.01,
            ngram_min_count: 1,
            context_window: 8,
            context_topk: 200,
            pos_window: 5,
            pos_topk: 100,
            cooc_window: 5,
            cooc_top_pairs: 500,
            pmi_min_pair_count: 5,
            tfidf: TfidfOptions::default(),
            tfidf_top_terms: 200,
            actors: default_actors(),
        }
    }
}

/// Contents of `summary.json`: document counts and the paths of every
/// artifact the run managed to write.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub gaza_n_docs: usize,
    pub ukraine_n_docs: usize,
    pub generated_at: String,
    pub files: BTreeMap<String, String>,
}

const N_STAGES: usize = 11;

struct Run<'a> {
    out_dir: &'a Path,
    options: &'a PipelineOptions,
    files: BTreeMap<String, String>,
}

impl Run<'_> {
    fn stage(&self, number: usize, name: &str) {
        info!("[{number}/{N_STAGES}] {name}");
    }

    fn out(&self, file_name: &str) -> PathBuf {
        self.out_dir.join(file_name)
    }

    /// Record a written artifact, or log the stage-local failure and move on.
    fn record(&mut self, key: &str, path: PathBuf, result: Result<()>) {
        match result {
            Ok(()) => {
                self.files
                    .insert(key.to_string(), path.to_string_lossy().into_owned());
            }
            Err(e) => warn!("skipping artifact {}: {e}", path.display()),
        }
    }
}

/// Run the full pipeline: load the corpus from `data_dir` and write every
/// artifact under `out_dir`. Returns the run summary (also persisted as
/// `summary.json`).
pub fn run_pipeline(
    data_dir: &Path,
    out_dir: &Path,
    options: &PipelineOptions,
) -> Result<RunSummary> {
    if !(options.prior > 0.0) {
        return Err(AnalysisError::InvalidPrior { got: options.prior });
    }

    let mut run = Run {
        out_dir,
        options,
        files: BTreeMap::new(),
    };

    run.stage(1, "loading corpus");
    let corpus = load_corpus(data_dir, &options.loader);
    for cat in Category::ALL {
        info!("{}: {} documents", cat, corpus.n_docs(cat));
    }
    if corpus.is_empty() {
        warn!("no documents in either category; most stages will be skipped");
    }

    run.stage(2, "frequencies and n-grams");
    let counters = frequency_stage(&mut run, &corpus);

    run.stage(3, "per-article lexical stats");
    article_stats_stage(&mut run, &corpus);

    for (number, cat) in [(4, Category::Gaza), (5, Category::Ukraine)] {
        run.stage(number, &format!("TF-IDF {cat}"));
        tfidf_stage(&mut run, cat, &corpus);
    }

    run.stage(6, "actor term contexts");
    actor_contexts_stage(&mut run, &corpus);

    run.stage(7, "actor POS contexts");
    pos_contexts_stage(&mut run, &corpus);

    run.stage(8, "log-odds comparison");
    logodds_stage(&mut run, &counters);

    run.stage(9, "co-occurrence and PMI");
    cooccurrence_stage(&mut run, &corpus);

    run.stage(10, "combined TF-IDF and similarity matrix");
    similarity_stage(&mut run, &corpus);

    run.stage(11, "summary");
    let summary = RunSummary {
        gaza_n_docs: corpus.n_docs(Category::Gaza),
        ukraine_n_docs: corpus.n_docs(Category::Ukraine),
        generated_at: Local::now().to_rfc3339(),
        files: run.files,
    };
    export::write_json(&out_dir.join("summary.json"), &summary)?;
    info!("done; results in {}", out_dir.display());
    Ok(summary)
}

fn frequency_stage(run: &mut Run<'_>, corpus: &Corpus) -> BTreeMap<Category, Counter> {
    let mut counters = BTreeMap::new();
    for (cat, docs) in corpus.iter() {
        let words = frequency::word_counts(docs);
        let path = run.out(&format!("{cat}_wordfreq.csv"));
        let result = export::write_term_counts(&path, &words.most_common(None));
        run.record(&format!("{cat}_wordfreq"), path, result);
        counters.insert(cat, words);

        for (n, label) in [(2, "bigrams"), (3, "trigrams")] {
            let grams = frequency::ngram_counts(docs, n, run.options.ngram_min_count);
            let path = run.out(&format!("{cat}_{label}.csv"));
            let result = export::write_term_counts(&path, &grams.most_common(None));
            run.record(&format!("{cat}_{label}"), path, result);
        }
    }
    counters
}

fn article_stats_stage(run: &mut Run<'_>, corpus: &Corpus) {
    let mut rows = Vec::new();
    for (cat, docs) in corpus.iter() {
        rows.extend(stats::article_stats(cat, docs));
    }
    let path = run.out("article_stats.csv");
    let result = export::write_article_stats(&path, &rows);
    run.record("article_stats", path, result);
}

fn tfidf_stage(run: &mut Run<'_>, cat: Category, corpus: &Corpus) {
    let docs = corpus.docs(cat);
    match tfidf::fit_transform(docs, &run.options.tfidf) {
        Ok((model, matrix)) => {
            let top = tfidf::top_terms(&model, &matrix, run.options.tfidf_top_terms);
            let path = run.out(&format!("tfidf_{cat}.csv"));
            let result = export::write_tfidf_terms(&path, &top);
            run.record(&format!("tfidf_{cat}"), path, result);
        }
        Err(e) => warn!("TF-IDF for {cat} skipped: {e}"),
    }
}

fn actor_contexts_stage(run: &mut Run<'_>, corpus: &Corpus) {
    let actors = run.options.actors.clone();
    for actor in &actors {
        for (cat, docs) in corpus.iter() {
            if docs.is_empty() {
                continue;
            }
            let ctx = frequency::actor_term_contexts(
                docs,
                &actor.lemmas,
                run.options.context_window,
                run.options.context_topk,
            );
            let path = run.out(&format!("{cat}_actor_{}_context.csv", actor.key));
            let result = export::write_term_counts(&path, &ctx);
            run.record(&format!("{cat}_actor_{}_context", actor.key), path, result);
        }
    }
}

fn pos_contexts_stage(run: &mut Run<'_>, corpus: &Corpus) {
    let actors = run.options.actors.clone();
    for actor in &actors {
        for (cat, docs) in corpus.iter() {
            if docs.is_empty() {
                continue;
            }
            let contexts = postag::actor_pos_contexts(
                docs,
                &actor.lemmas,
                run.options.pos_window,
                run.options.pos_topk,
            );
            for tag in PosTag::ALL {
                let path = run.out(&format!("{cat}_actor_{}_{}.csv", actor.key, tag.as_str()));
                let result = export::write_token_counts(&path, contexts.ranking(tag));
                run.record(
                    &format!("{cat}_actor_{}_{}", actor.key, tag.as_str()),
                    path,
                    result,
                );
            }
        }
    }
}

fn logodds_stage(run: &mut Run<'_>, counters: &BTreeMap<Category, Counter>) {
    let empty = Counter::new();
    let gaza = counters.get(&Category::Gaza).unwrap_or(&empty);
    let ukraine = counters.get(&Category::Ukraine).unwrap_or(&empty);
    if gaza.is_empty() && ukraine.is_empty() {
        warn!("log-odds skipped: both frequency tables are empty");
        return;
    }
    match logodds::compute_log_odds(gaza, ukraine, run.options.prior) {
        Ok(rows) => {
            for variant in LogOddsVariant::ALL {
                let path = run.out(&format!("gaza_vs_ukraine_logodds_{variant}.csv"));
                let result = export::write_logodds(&path, logodds::slice(&rows, variant));
                run.record(&format!("logodds_{variant}"), path, result);
            }
        }
        Err(e) => warn!("log-odds skipped: {e}"),
    }
}

fn cooccurrence_stage(run: &mut Run<'_>, corpus: &Corpus) {
    for (cat, docs) in corpus.iter() {
        if docs.is_empty() {
            continue;
        }
        let table = cooccur::corpus_cooccurrence(docs, run.options.cooc_window);

        let top = table.pairs.most_common(Some(run.options.cooc_top_pairs));
        let path = run.out(&format!("{cat}_top_cooccurrence_pairs.csv"));
        let result = export::write_pair_counts(&path, &top);
        run.record(&format!("{cat}_top_cooccurrence_pairs"), path, result);

        let ranked = cooccur::pmi(&table, run.options.pmi_min_pair_count);
        let path = run.out(&format!("{cat}_pmi_pairs.csv"));
        let result = export::write_pmi_pairs(&path, &ranked);
        run.record(&format!("{cat}_pmi_pairs"), path, result);
    }
}

fn similarity_stage(run: &mut Run<'_>, corpus: &Corpus) {
    let mut combined = crate::corpus::Documents::new();
    for (cat, docs) in corpus.iter() {
        for (doc_id, text) in docs {
            combined.insert(format!("{cat}__{doc_id}"), text.clone());
        }
    }
    if combined.is_empty() {
        warn!("similarity matrix skipped: no documents");
        return;
    }
    // The cross-corpus matrix keeps every term that occurs at all.
    let combined_options = TfidfOptions {
        max_features: 30_000,
        min_df: 1,
        ..run.options.tfidf.clone()
    };
    match tfidf::fit_transform(&combined, &combined_options) {
        Ok((_, matrix)) => {
            let sim = tfidf::cosine_similarity(&matrix);
            let path = run.out("similarity_matrix.csv");
            let result = export::write_similarity_matrix(&path, &matrix.doc_ids, &sim);
            run.record("similarity_matrix", path, result);
        }
        Err(e) => warn!("similarity matrix skipped: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_prior_is_a_configuration_rejection() {
        let td = tempfile::tempdir().unwrap();
        let options = PipelineOptions {
            prior: 0.0,
            ..PipelineOptions::default()
        };
        let err = run_pipeline(td.path(), &td.path().join("out"), &options).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidPrior { .. }));
    }

    #[test]
    fn empty_corpus_still_writes_summary() {
        let td = tempfile::tempdir().unwrap();
        let out = td.path().join("out");
        let summary = run_pipeline(td.path(), &out, &PipelineOptions::default()).unwrap();
        assert_eq!(summary.gaza_n_docs, 0);
        assert_eq!(summary.ukraine_n_docs, 0);
        assert!(out.join("summary.json").exists());
        // Frequency tables are written (empty but with headers) even with no
        // documents; TF-IDF and similarity are skipped.
        assert!(out.join("gaza_wordfreq.csv").exists());
        assert!(!out.join("similarity_matrix.csv").exists());
        assert!(!summary.files.contains_key("tfidf_gaza"));
    }

    #[test]
    fn default_actor_table_has_four_clusters() {
        let actors = default_actors();
        let keys: Vec<&str> = actors.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, vec!["palestin", "israel", "ukraine", "russia"]);
    }
}
