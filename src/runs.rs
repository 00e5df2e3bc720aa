//! At-most-one concurrent run per analysis kind.
//!
//! The coordinator owns the per-kind run state explicitly: `begin` hands out
//! an RAII guard or rejects with `AlreadyRunning`, and dropping the guard
//! clears the slot. A second start request while one run is active is
//! rejected, never queued.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

use crate::error::{AnalysisError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisKind {
    Lexical,
    Semantic,
    Sentiment,
    Scraping,
}

impl AnalysisKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisKind::Lexical => "lexical",
            AnalysisKind::Semantic => "semantic",
            AnalysisKind::Sentiment => "sentiment",
            AnalysisKind::Scraping => "scraping",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisKind {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "lexical" => Ok(AnalysisKind::Lexical),
            "semantic" => Ok(AnalysisKind::Semantic),
            "sentiment" => Ok(AnalysisKind::Sentiment),
            "scraping" => Ok(AnalysisKind::Scraping),
            other => Err(AnalysisError::UnknownKind {
                given: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Default)]
pub struct RunCoordinator {
    running: Mutex<HashSet<AnalysisKind>>,
}

impl RunCoordinator {
    pub fn new() -> Self {
        RunCoordinator::default()
    }

    /// Claim the slot for `kind`, or reject if a run of that kind is active.
    pub fn begin(&self, kind: AnalysisKind) -> Result<RunGuard<'_>> {
        let mut running = self.running.lock().expect("run-state lock poisoned");
        if !running.insert(kind) {
            return Err(AnalysisError::AlreadyRunning {
                kind: kind.as_str(),
            });
        }
        Ok(RunGuard {
            coordinator: self,
            kind,
        })
    }

    pub fn is_running(&self, kind: AnalysisKind) -> bool {
        self.running
            .lock()
            .expect("run-state lock poisoned")
            .contains(&kind)
    }
}

/// Releases the claimed slot on drop, on success and failure alike.
#[derive(Debug)]
pub struct RunGuard<'a> {
    coordinator: &'a RunCoordinator,
    kind: AnalysisKind,
}

impl RunGuard<'_> {
    pub fn kind(&self) -> AnalysisKind {
        self.kind
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut running) = self.coordinator.running.lock() {
            running.remove(&self.kind);
        }
    }
}
