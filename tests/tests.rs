//! Integration tests for `corpus_compare`.
//
// This suite verifies:
// - The full pipeline run (library and CLI): artifact set, schemas, counts
// - Determinism: two runs over the same corpus produce byte-identical CSVs
// - Log-odds behavior end to end (vocabulary completeness, polarity, slices)
// - Loader degradation (missing input is empty, not an error)
// - The canonical schema reader against both our own and alien CSV headers
//
// CLI tests run the binary with explicit paths; nothing changes the global
// working directory.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use predicates::prelude::*;
use serde_json::Value as Json;

use corpus_compare::{
    Category, LoaderOptions, PipelineOptions, load_corpus, read_term_counts, run_pipeline,
    word_counts,
};

// --------------------- helpers ---------------------

/// Pad a distinctive phrase up to the loader's 50-token quality gate.
fn padded(phrase: &str, filler: &str) -> String {
    let mut tokens: Vec<&str> = phrase.split_whitespace().collect();
    while tokens.len() < 60 {
        tokens.push(filler);
    }
    tokens.join(" ")
}

/// Write a small two-category corpus with clearly asymmetric vocabulary.
fn build_corpus(base: &Path) {
    let gaza = base.join("gaza");
    let ukraine = base.join("ukraine");
    fs::create_dir_all(&gaza).unwrap();
    fs::create_dir_all(&ukraine).unwrap();

    fs::write(
        gaza.join("g1.txt"),
        padded(
            "hamas launch rocket gaza city hospital strike humanitarian crisis",
            "gaza",
        ),
    )
    .unwrap();
    fs::write(
        gaza.join("g2.txt"),
        padded(
            "israel army enter gaza city hamas fighter street battle",
            "gaza",
        ),
    )
    .unwrap();
    fs::write(
        ukraine.join("u1.txt"),
        padded(
            "russia missile strike kyiv ukraine army drone attack front",
            "ukraine",
        ),
    )
    .unwrap();
    fs::write(
        ukraine.join("u2.txt"),
        padded(
            "ukraine soldier hold front putin order russia advance east",
            "ukraine",
        ),
    )
    .unwrap();
    // Below the 50-token gate; must not be loaded.
    fs::write(gaza.join("tiny.txt"), "too short").unwrap();
}

fn read_to_string<P: AsRef<Path>>(p: P) -> String {
    fs::read_to_string(p).unwrap()
}

fn csv_data_rows(path: &Path) -> usize {
    read_to_string(path).lines().count().saturating_sub(1)
}

fn run_cli(args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = assert_cmd::Command::cargo_bin("corpus_compare").unwrap();
    cmd.env("RUST_LOG", "error");
    cmd.args(args).assert()
}

// --------------------- library tests ---------------------

#[test]
fn lib_full_pipeline_writes_expected_artifacts() {
    let td = tempfile::tempdir().unwrap();
    build_corpus(td.path());
    let out = td.path().join("out");

    let summary = run_pipeline(td.path(), &out, &PipelineOptions::default()).unwrap();
    assert_eq!(summary.gaza_n_docs, 2, "tiny.txt must be gated out");
    assert_eq!(summary.ukraine_n_docs, 2);

    for name in [
        "gaza_wordfreq.csv",
        "ukraine_wordfreq.csv",
        "gaza_bigrams.csv",
        "gaza_trigrams.csv",
        "ukraine_bigrams.csv",
        "ukraine_trigrams.csv",
        "article_stats.csv",
        "gaza_vs_ukraine_logodds_full.csv",
        "gaza_vs_ukraine_logodds_top200.csv",
        "gaza_vs_ukraine_logodds_bottom200.csv",
        "gaza_actor_palestin_context.csv",
        "gaza_actor_palestin_ADJ.csv",
        "gaza_actor_palestin_VERB.csv",
        "gaza_actor_palestin_NOUN.csv",
        "ukraine_actor_russia_context.csv",
        "gaza_top_cooccurrence_pairs.csv",
        "ukraine_top_cooccurrence_pairs.csv",
        "gaza_pmi_pairs.csv",
        "similarity_matrix.csv",
        "summary.json",
    ] {
        assert!(out.join(name).exists(), "missing artifact {name}");
    }

    // summary.json records counts and the path map.
    let json: Json = serde_json::from_str(&read_to_string(out.join("summary.json"))).unwrap();
    assert_eq!(json["gaza_n_docs"], 2);
    assert_eq!(json["ukraine_n_docs"], 2);
    assert!(
        json["files"]["gaza_wordfreq"]
            .as_str()
            .unwrap()
            .ends_with("gaza_wordfreq.csv")
    );

    // article_stats has one row per loaded document.
    assert_eq!(csv_data_rows(&out.join("article_stats.csv")), 4);
}

#[test]
fn lib_pipeline_is_deterministic() {
    let td = tempfile::tempdir().unwrap();
    build_corpus(td.path());
    let out1 = td.path().join("out1");
    let out2 = td.path().join("out2");

    run_pipeline(td.path(), &out1, &PipelineOptions::default()).unwrap();
    run_pipeline(td.path(), &out2, &PipelineOptions::default()).unwrap();

    let mut checked = 0usize;
    for entry in fs::read_dir(&out1).unwrap().filter_map(|e| e.ok()) {
        let p1 = entry.path();
        if p1.extension().map(|x| x == "csv").unwrap_or(false) {
            let p2 = out2.join(p1.file_name().unwrap());
            assert_eq!(
                fs::read(&p1).unwrap(),
                fs::read(&p2).unwrap(),
                "CSV output differs between runs: {}",
                p1.display()
            );
            checked += 1;
        }
    }
    assert!(checked >= 10, "expected to compare many CSV artifacts");
}

#[test]
fn lib_logodds_table_covers_union_vocabulary_and_polarity() {
    let td = tempfile::tempdir().unwrap();
    build_corpus(td.path());
    let out = td.path().join("out");
    run_pipeline(td.path(), &out, &PipelineOptions::default()).unwrap();

    // The number of data rows equals |union vocabulary| exactly.
    let corpus = load_corpus(td.path(), &LoaderOptions::default());
    let gaza = word_counts(corpus.docs(Category::Gaza));
    let ukraine = word_counts(corpus.docs(Category::Ukraine));
    let union: std::collections::HashSet<&String> = gaza.keys().chain(ukraine.keys()).collect();
    let full = out.join("gaza_vs_ukraine_logodds_full.csv");
    assert_eq!(csv_data_rows(&full), union.len());

    // Polarity: the most gaza-distinctive term leads, the table ends with the
    // most ukraine-distinctive one.
    let content = read_to_string(&full);
    let mut lines = content.lines();
    let header = lines.next().unwrap();
    assert_eq!(header, "term,count_a,count_b,logodds,z");
    let first = lines.next().unwrap();
    let last = lines.last().unwrap();
    assert!(first.starts_with("gaza,"), "head should be gaza-heavy: {first}");
    assert!(
        last.starts_with("ukraine,"),
        "tail should be ukraine-heavy: {last}"
    );
}

#[test]
fn lib_missing_input_degrades_to_empty_run() {
    let td = tempfile::tempdir().unwrap();
    let out = td.path().join("out");
    let summary = run_pipeline(&td.path().join("nowhere"), &out, &PipelineOptions::default())
        .expect("missing input is not an error");
    assert_eq!(summary.gaza_n_docs, 0);
    assert_eq!(summary.ukraine_n_docs, 0);
    assert!(out.join("summary.json").exists());
}

#[test]
fn lib_similarity_matrix_covers_both_corpora() {
    let td = tempfile::tempdir().unwrap();
    build_corpus(td.path());
    let out = td.path().join("out");
    run_pipeline(td.path(), &out, &PipelineOptions::default()).unwrap();

    let content = read_to_string(out.join("similarity_matrix.csv"));
    let mut lines = content.lines();
    let header = lines.next().unwrap();
    let columns: Vec<&str> = header.split(',').collect();
    assert_eq!(columns[0], "doc_id");
    assert_eq!(columns.len(), 5, "doc_id + 4 documents");
    assert!(columns.iter().any(|c| c.starts_with("gaza__")));
    assert!(columns.iter().any(|c| c.starts_with("ukraine__")));
    assert_eq!(lines.count(), 4, "one row per document");
}

#[test]
fn lib_output_csvs_parse_with_canonical_schema() {
    let td = tempfile::tempdir().unwrap();
    build_corpus(td.path());
    let out = td.path().join("out");
    run_pipeline(td.path(), &out, &PipelineOptions::default()).unwrap();

    let rows = read_term_counts(&out.join("gaza_wordfreq.csv")).unwrap();
    assert!(!rows.is_empty());
    let map: HashMap<&str, u64> = rows.iter().map(|r| (r.term.as_str(), r.count)).collect();
    assert!(map["hamas"] >= 2, "hamas appears in both gaza documents");

    // Alias headers from foreign tooling resolve through the same reader.
    let alien = td.path().join("alien.csv");
    fs::write(&alien, "word,frequency\nshell,7\n").unwrap();
    let rows = read_term_counts(&alien).unwrap();
    assert_eq!(rows[0].term, "shell");
    assert_eq!(rows[0].count, 7);
}

#[test]
fn lib_actor_context_respects_window_option() {
    let td = tempfile::tempdir().unwrap();
    let gaza = td.path().join("gaza");
    fs::create_dir_all(&gaza).unwrap();
    // "faraway" sits 9 tokens after hamas: outside window 8, inside window 10.
    let mut tokens = vec!["hamas"];
    tokens.extend(vec!["near"; 8]);
    tokens.push("faraway");
    while tokens.len() < 55 {
        tokens.push("pad");
    }
    fs::write(gaza.join("g.txt"), tokens.join(" ")).unwrap();

    let corpus = load_corpus(td.path(), &LoaderOptions::default());
    let docs = corpus.docs(Category::Gaza);
    let lemmas = vec!["hamas".to_string()];

    let narrow = corpus_compare::actor_term_contexts(docs, &lemmas, 8, 50);
    assert!(narrow.iter().all(|(t, _)| t != "faraway"));

    let wide = corpus_compare::actor_term_contexts(docs, &lemmas, 10, 50);
    assert!(wide.iter().any(|(t, _)| t == "faraway"));
}

// --------------------- CLI tests ---------------------

#[test]
fn cli_basic_run_writes_artifacts() {
    let td = tempfile::tempdir().unwrap();
    build_corpus(td.path());
    let out = td.path().join("out");

    run_cli(&[td.path().to_str().unwrap(), "--out", out.to_str().unwrap()])
        .success()
        .stdout(predicate::str::contains("gaza: 2 docs"));

    assert!(out.join("gaza_vs_ukraine_logodds_full.csv").exists());
    assert!(out.join("summary.json").exists());
}

#[test]
fn cli_missing_corpus_is_empty_run_not_failure() {
    let td = tempfile::tempdir().unwrap();
    let out = td.path().join("out");

    run_cli(&[
        td.path().join("does_not_exist").to_str().unwrap(),
        "--out",
        out.to_str().unwrap(),
    ])
    .success()
    .stdout(predicate::str::contains("gaza: 0 docs"));
}

#[test]
fn cli_invalid_prior_is_rejected() {
    let td = tempfile::tempdir().unwrap();
    build_corpus(td.path());
    let out = td.path().join("out");

    run_cli(&[
        td.path().to_str().unwrap(),
        "--out",
        out.to_str().unwrap(),
        "--prior",
        "0.0",
    ])
    .failure()
    .stderr(predicate::str::contains("prior"));

    assert!(!out.join("summary.json").exists(), "no artifacts on rejection");
}

#[test]
fn cli_min_tokens_override() {
    let td = tempfile::tempdir().unwrap();
    build_corpus(td.path());
    let out = td.path().join("out");

    // Lowering the gate lets tiny.txt (2 tokens) in.
    run_cli(&[
        td.path().to_str().unwrap(),
        "--out",
        out.to_str().unwrap(),
        "--min-tokens",
        "1",
    ])
    .success()
    .stdout(predicate::str::contains("gaza: 3 docs"));
}
