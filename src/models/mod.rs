//! Data models for catalog input and report output.
//!
//! Albums and songs as fetched from the catalog, the normalized song
//! records the engine retains, and the final report.

pub mod album;
pub mod common;
pub mod report;
pub mod song;

// Re-exports for convenience
pub use album::{AlbumDetail, AlbumSummary};
pub use common::{decade_label, format_duration, ArtistIdentity, RatingBucket};
pub use report::{
    ArtistDiscovery, DeepArtist, NeglectedTrack, QualityMetrics, RatedSong, RatingDistribution,
    Report, TopAlbum, TopSong,
};
pub use song::{ArtistRef, SongRaw, SongRecord};
