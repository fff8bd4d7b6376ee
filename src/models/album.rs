//! Album-level models.
//!
//! An [`AlbumSummary`] is what a catalog page lists; an [`AlbumDetail`]
//! is the same album expanded with its songs.

use serde::{Deserialize, Serialize};

use super::song::{ArtistRef, SongRaw};

/// Album entry as returned by a catalog page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AlbumSummary {
    /// Catalog album id.
    pub id: String,

    /// Album title.
    pub name: String,

    /// Play count declared by the catalog for the whole album.
    #[serde(default)]
    pub play_count: u64,

    /// Album genre, empty when unknown.
    #[serde(default)]
    pub genre: String,

    /// Release year, 0 when unknown.
    #[serde(default)]
    pub year: i32,

    /// Album artists.
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
}

impl AlbumSummary {
    /// Get all artist names joined by a separator.
    pub fn artists_string(&self, separator: &str) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(separator)
    }
}

/// An album with its full song list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AlbumDetail {
    /// Catalog album id.
    pub id: String,

    /// Album title.
    pub name: String,

    /// Album genre, used when a song has none.
    #[serde(default)]
    pub genre: String,

    /// Release year, used when a song has none.
    #[serde(default)]
    pub year: i32,

    /// Songs on the album.
    #[serde(default)]
    pub songs: Vec<SongRaw>,
}

impl AlbumDetail {
    /// An album that contributes no songs.
    ///
    /// Used when the detail request fails or comes back empty.
    pub fn empty(summary: &AlbumSummary) -> Self {
        Self {
            id: summary.id.clone(),
            name: summary.name.clone(),
            genre: summary.genre.clone(),
            year: summary.year,
            songs: Vec::new(),
        }
    }
}
