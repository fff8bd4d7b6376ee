//! Song-level models.

use serde::{Deserialize, Serialize};

use super::common::ArtistIdentity;

/// Artist credit attached to a song or album.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArtistRef {
    /// Catalog artist id, empty when the source did not supply one.
    #[serde(default)]
    pub id: String,

    /// Artist display name.
    #[serde(default)]
    pub name: String,
}

impl ArtistRef {
    /// Create a new artist credit.
    pub fn new<S1: Into<String>, S2: Into<String>>(id: S1, name: S2) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Identity used as the grouping key for this artist.
    pub fn identity(&self) -> ArtistIdentity {
        ArtistIdentity::resolve(&self.id, &self.name)
    }

    /// Name shown in reports.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "Unknown"
        } else {
            &self.name
        }
    }
}

/// Song exactly as the catalog describes it.
///
/// Every field has a default so a partially filled record still counts.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SongRaw {
    pub title: String,

    /// Duration in seconds.
    pub duration: u64,

    pub play_count: u64,

    /// User rating, 0 when unrated.
    pub user_rating: f64,

    /// Single artist name.
    pub artist: String,

    /// Single artist id.
    pub artist_id: String,

    /// Preferred display form of the artist credit.
    pub display_artist: String,

    /// Full artist credit list, richer than `artist` / `artist_id`.
    pub artists: Vec<ArtistRef>,

    pub genre: String,

    /// Release year, 0 when unknown.
    pub year: i32,

    /// Whether the user marked the song as a favorite.
    pub starred: bool,

    /// Last played timestamp as sent by the server.
    pub played: Option<String>,

    /// File suffix, e.g. `flac`.
    pub suffix: String,

    /// MIME type, e.g. `audio/flac`.
    pub content_type: String,

    /// Bitrate in kbps, 0 when unknown.
    pub bit_rate: u32,

    /// Sampling rate in Hz, 0 when unknown.
    pub sampling_rate: u32,

    /// Bits per sample, 0 when unknown.
    pub bit_depth: u32,
}

impl SongRaw {
    /// Artists credited on this song.
    ///
    /// Uses the `artists` list when present, otherwise a single credit
    /// built from `artist_id` and the display name.
    pub fn credited_artists(&self) -> Vec<ArtistRef> {
        if !self.artists.is_empty() {
            return self.artists.clone();
        }
        let name = if self.display_artist.is_empty() {
            &self.artist
        } else {
            &self.display_artist
        };
        vec![ArtistRef::new(self.artist_id.clone(), name.clone())]
    }
}

/// Normalized song retained for ranking after the walk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SongRecord {
    pub title: String,
    pub album: String,
    pub album_id: String,
    pub artists: Vec<ArtistRef>,

    /// Duration in seconds.
    pub duration: u64,
    pub play_count: u64,

    /// 0 when unrated, otherwise 1 to 5.
    pub rating: f64,
    pub genre: String,

    /// 0 when unknown.
    pub year: i32,

    /// Fidelity score from 0 to 100.
    pub quality_score: u8,
}

impl SongRecord {
    /// Get the primary artist name.
    pub fn primary_artist(&self) -> &str {
        self.artists.first().map(|a| a.name.as_str()).unwrap_or("")
    }

    /// Whether the given artist is credited on this song.
    pub fn is_credited(&self, identity: &ArtistIdentity) -> bool {
        self.artists.iter().any(|a| &a.identity() == identity)
    }

    /// Duration multiplied by play count, saturating at `u64::MAX`.
    pub fn listening_seconds(&self) -> u64 {
        self.duration.saturating_mul(self.play_count)
    }
}
