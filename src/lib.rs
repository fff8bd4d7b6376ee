//! # Navidrome Wrapped
//!
//! Year-in-review statistics for a Navidrome / Subsonic music library.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use navidrome_wrapped::Wrapped;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let wrapped = Wrapped::connect("https://music.example.com", "alice", "secret").await?;
//!
//!     let report = wrapped
//!         .generate_with_progress(&mut |e: &navidrome_wrapped::ProgressEvent| {
//!             eprintln!("{:>3}% {}", e.percent, e.message);
//!         })
//!         .await?;
//!
//!     for (artist, plays) in &report.top_artists_by_plays {
//!         println!("{}: {} plays", artist, plays);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Single pass** over a paginated catalog, one album at a time
//! - **Rankings** of artists, songs, albums, genres and decades
//! - **Scores** for listening diversity and audio quality
//! - **Deep dives** into the top artists
//!
//! ## Low-Level APIs
//!
//! - [`StatsEngine`] - runs against any [`CatalogSource`]
//! - [`SubsonicApi`] - Subsonic REST client
//! - [`engine::quality`] - per-song fidelity scoring

pub mod api;
pub mod converters;
pub mod engine;
pub mod error;
pub mod models;
mod wrapped;

// Main interface (recommended)
pub use wrapped::{save_report, Wrapped};

// Low-level APIs
pub use api::SubsonicApi;
pub use engine::{
    CatalogSource, ProgressEvent, ProgressObserver, ProgressPhase, StatsEngine, WalkerConfig,
};
pub use error::WrappedError;
pub use models::{AlbumDetail, AlbumSummary, Report, SongRaw, SongRecord};
