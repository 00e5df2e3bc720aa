//! Corpus loading.
//!
//! Reads the cleaned per-document text files produced by the preprocessing
//! pipeline (`base/{gaza,ukraine}/*.txt`, whitespace-separated lowercase
//! lemmas) into an in-memory corpus. Degenerate documents (fewer than
//! `min_tokens` whitespace tokens) are skipped at load time; a missing
//! category directory yields an empty mapping, and a single unreadable file
//! never aborts the load.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::{debug, warn};
use walkdir::WalkDir;

use crate::error::AnalysisError;

/// The two fixed, mutually exclusive corpus categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Gaza,
    Ukraine,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Gaza, Category::Ukraine];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Gaza => "gaza",
            Category::Ukraine => "ukraine",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gaza" => Ok(Category::Gaza),
            "ukraine" => Ok(Category::Ukraine),
            other => Err(AnalysisError::UnknownCategory {
                given: other.to_string(),
            }),
        }
    }
}

/// Documents of one category: `doc_id -> cleaned text`.
///
/// A `BTreeMap` keeps document iteration in doc-id order, which makes every
/// downstream ranking reproducible across runs.
pub type Documents = BTreeMap<String, String>;

/// All loaded documents, keyed by category.
#[derive(Debug, Default)]
pub struct Corpus {
    by_category: BTreeMap<Category, Documents>,
}

impl Corpus {
    pub fn new() -> Self {
        let mut by_category = BTreeMap::new();
        for cat in Category::ALL {
            by_category.insert(cat, Documents::new());
        }
        Corpus { by_category }
    }

    pub fn docs(&self, category: Category) -> &Documents {
        // Both keys are inserted in new(), so the lookup cannot miss.
        &self.by_category[&category]
    }

    pub fn docs_mut(&mut self, category: Category) -> &mut Documents {
        self.by_category.entry(category).or_default()
    }

    pub fn n_docs(&self, category: Category) -> usize {
        self.docs(category).len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &Documents)> {
        self.by_category.iter().map(|(c, d)| (*c, d))
    }

    pub fn is_empty(&self) -> bool {
        self.by_category.values().all(|d| d.is_empty())
    }
}

/// Options for [`load_corpus`].
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Documents with fewer whitespace tokens than this are skipped.
    pub min_tokens: usize,
    /// Optional per-category cap on the number of documents loaded.
    pub max_docs: Option<usize>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        LoaderOptions {
            min_tokens: 50,
            max_docs: None,
        }
    }
}

/// Load the cleaned corpus from `base/{gaza,ukraine}/*.txt`.
///
/// Files are visited in filename order. Unreadable files are logged and
/// skipped; the loader itself never fails.
pub fn load_corpus(base: &Path, options: &LoaderOptions) -> Corpus {
    let mut corpus = Corpus::new();

    for cat in Category::ALL {
        let cat_dir = base.join(cat.as_str());
        if !cat_dir.is_dir() {
            warn!("category directory not found: {}", cat_dir.display());
            continue;
        }

        let mut skipped_short = 0usize;
        let mut skipped_bad = 0usize;

        let walker = WalkDir::new(&cat_dir)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|x| x.eq_ignore_ascii_case("txt"))
                    .unwrap_or(false)
            });

        for entry in walker {
            if let Some(cap) = options.max_docs {
                if corpus.n_docs(cat) >= cap {
                    break;
                }
            }
            let path = entry.path();
            let text = match read_text_lossy(path) {
                Ok(t) => t,
                Err(e) => {
                    warn!("skipping unreadable file {}: {}", path.display(), e);
                    skipped_bad += 1;
                    continue;
                }
            };
            if text.split_whitespace().count() < options.min_tokens {
                skipped_short += 1;
                continue;
            }
            let doc_id = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            corpus.docs_mut(cat).insert(doc_id, text);
        }

        debug!(
            "loaded {}: {} docs ({} below token threshold, {} unreadable)",
            cat,
            corpus.n_docs(cat),
            skipped_short,
            skipped_bad
        );
    }

    corpus
}

/// Read a file as UTF-8, falling back to Latin-1 on invalid byte sequences.
fn read_text_lossy(path: &Path) -> std::io::Result<String> {
    let bytes = fs::read(path)?;
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        // Latin-1 maps every byte to the code point of the same value.
        Err(e) => Ok(e.into_bytes().iter().map(|&b| b as char).collect()),
    }
}
