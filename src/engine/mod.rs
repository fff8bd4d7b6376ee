//! Statistics engine.
//!
//! A run walks the catalog once, folds every song into an
//! [`Accumulator`] and builds an immutable [`Report`] at the end:
//!
//! - [`walker`]: pages through albums and expands them into songs
//! - [`quality`]: fidelity score per song
//! - [`accumulator`]: running counters keyed by artist, genre, decade and rating
//! - [`builder`]: rankings, scores and deep dives

pub mod accumulator;
pub mod builder;
pub mod progress;
pub mod quality;
pub mod source;
pub mod walker;

use tracing::info;

use crate::error::Result;
use crate::models::Report;

pub use accumulator::Accumulator;
pub use progress::{NoProgress, ProgressEvent, ProgressObserver, ProgressPhase, ProgressTracker};
pub use quality::{classify, Classification, Encoding};
pub use source::CatalogSource;
pub use walker::{CatalogWalker, WalkerConfig};

/// One-shot aggregation over a catalog source.
///
/// Every call to [`run`](Self::run) starts a fresh walk with its own
/// accumulator. A run that fails or is dropped exposes no partial report.
#[derive(Debug, Clone)]
pub struct StatsEngine<S> {
    source: S,
    config: WalkerConfig,
    username: String,
}

impl<S: CatalogSource> StatsEngine<S> {
    /// Create an engine with the default walker config.
    pub fn new(source: S) -> Self {
        Self {
            source,
            config: WalkerConfig::default(),
            username: String::new(),
        }
    }

    /// Replace the walker config.
    pub fn with_config(mut self, config: WalkerConfig) -> Self {
        self.config = config;
        self
    }

    /// Name recorded in the report.
    pub fn with_username<U: Into<String>>(mut self, username: U) -> Self {
        self.username = username.into();
        self
    }

    pub fn config(&self) -> &WalkerConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Walk the catalog and build the report.
    pub async fn run(&self) -> Result<Report> {
        self.run_with_progress(&mut NoProgress).await
    }

    /// Walk the catalog and build the report, reporting progress on the way.
    ///
    /// # Errors
    ///
    /// Fails only when an album page cannot be fetched.
    pub async fn run_with_progress(&self, observer: &mut dyn ProgressObserver) -> Result<Report> {
        let mut progress = ProgressTracker::new(observer);
        let walker = CatalogWalker::new(&self.source, &self.config);
        let mut acc = Accumulator::new();

        let albums = walker
            .walk(&mut progress, |_, detail| acc.ingest_album(&detail))
            .await?;

        progress.report(90.0, "Building final objects", ProgressPhase::Wrap);
        let report = builder::build_report(acc, &albums, &self.username);

        info!(
            "Report built: {} songs, {} albums, {} artists, {} plays",
            report.total_songs, report.total_albums, report.total_artists, report.total_plays
        );
        progress.report(100.0, "Done", ProgressPhase::Complete);

        Ok(report)
    }
}
