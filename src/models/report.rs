//! The aggregate listening report.
//!
//! A [`Report`] is built once at the end of a run and never mutated.
//! It serializes directly for export.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::RatingBucket;
use super::song::ArtistRef;
use crate::error::Result;

/// A song ranked by play count.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TopSong {
    pub title: String,
    pub artists: Vec<ArtistRef>,
    pub plays: u64,
}

/// An album ranked by its declared play count.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TopAlbum {
    pub id: String,
    pub name: String,
    /// Album artists joined with `", "`, or `"Unknown"`.
    pub artist: String,
    pub play_count: u64,
}

/// A song ranked by user rating.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RatedSong {
    pub rating: f64,
    pub title: String,
    /// Primary artist name.
    pub artist: String,
}

/// Song with the oldest last-played timestamp in the library.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NeglectedTrack {
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Last played date as `YYYY-MM-DD`.
    pub played_date: String,
}

/// Extended statistics for one of the top ranked artists.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DeepArtist {
    pub name: String,
    /// Plays as ranked in the top artists list.
    pub total_plays: u64,
    /// Songs crediting this artist.
    pub total_songs: u64,
    /// Distinct album ids among those songs.
    pub album_count: u64,
    /// Summed song duration in seconds.
    pub total_duration: u64,
    /// Summed duration × plays in seconds.
    pub listening_time: u64,
    /// Mean over rated songs, 0 when none are rated.
    pub average_rating: f64,
    /// Up to three `(title, plays)` pairs.
    pub top_songs: Vec<(String, u64)>,
}

/// Ratio of artists with at least one play to all artists seen.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ArtistDiscovery {
    pub listened: u64,
    pub total: u64,
    pub percentage: f64,
}

/// Fidelity summary of the library.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QualityMetrics {
    /// Mean quality score, rounded.
    pub quality_score: u32,
    /// Mean quality score weighted by plays, rounded.
    pub quality_score_by_plays: u32,
    /// Share of lossless songs, one decimal.
    pub percent_lossless: f64,
    /// Share of hi-res songs, one decimal.
    pub percent_hi_res: f64,
    /// Mean bitrate of songs with a known bitrate, rounded kbps.
    pub avg_bitrate: u32,
}

/// Song counts per star bucket.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RatingDistribution {
    #[serde(rename = "5_star")]
    pub five_star: u64,
    #[serde(rename = "4_star")]
    pub four_star: u64,
    #[serde(rename = "3_star")]
    pub three_star: u64,
    #[serde(rename = "2_star")]
    pub two_star: u64,
    #[serde(rename = "1_star")]
    pub one_star: u64,
    pub unrated: u64,
}

impl RatingDistribution {
    fn slot(&mut self, bucket: RatingBucket) -> &mut u64 {
        match bucket {
            RatingBucket::FiveStar => &mut self.five_star,
            RatingBucket::FourStar => &mut self.four_star,
            RatingBucket::ThreeStar => &mut self.three_star,
            RatingBucket::TwoStar => &mut self.two_star,
            RatingBucket::OneStar => &mut self.one_star,
            RatingBucket::Unrated => &mut self.unrated,
        }
    }

    /// Count one song in the given bucket.
    pub fn record(&mut self, bucket: RatingBucket) {
        *self.slot(bucket) += 1;
    }

    /// Count for a single bucket.
    pub fn get(&self, bucket: RatingBucket) -> u64 {
        match bucket {
            RatingBucket::FiveStar => self.five_star,
            RatingBucket::FourStar => self.four_star,
            RatingBucket::ThreeStar => self.three_star,
            RatingBucket::TwoStar => self.two_star,
            RatingBucket::OneStar => self.one_star,
            RatingBucket::Unrated => self.unrated,
        }
    }

    /// Sum of all buckets.
    pub fn total(&self) -> u64 {
        self.five_star + self.four_star + self.three_star + self.two_star + self.one_star + self.unrated
    }

    /// Force the buckets to sum to `total_songs`.
    ///
    /// The difference is absorbed starting from the lowest non-zero bucket
    /// (unrated, then one star upwards). A deficit with every bucket empty
    /// lands in unrated. Buckets never go below zero.
    pub fn reconcile(&mut self, total_songs: u64) {
        const LOWEST_FIRST: [RatingBucket; 6] = [
            RatingBucket::Unrated,
            RatingBucket::OneStar,
            RatingBucket::TwoStar,
            RatingBucket::ThreeStar,
            RatingBucket::FourStar,
            RatingBucket::FiveStar,
        ];

        let current = self.total();
        if current < total_songs {
            let target = LOWEST_FIRST
                .into_iter()
                .find(|b| self.get(*b) > 0)
                .unwrap_or(RatingBucket::Unrated);
            *self.slot(target) += total_songs - current;
        } else {
            let mut excess = current - total_songs;
            for bucket in LOWEST_FIRST {
                if excess == 0 {
                    break;
                }
                let slot = self.slot(bucket);
                let taken = excess.min(*slot);
                *slot -= taken;
                excess -= taken;
            }
        }
    }
}

/// Complete result of one aggregation run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub username: String,
    pub generated_at: DateTime<Utc>,

    pub total_songs: u64,
    pub total_albums: u64,
    pub total_artists: u64,
    /// Summed song duration in seconds.
    pub total_duration: u64,
    /// Summed duration × plays in seconds.
    pub listening_time: u64,
    pub listening_time_formatted: String,
    pub total_plays: u64,
    pub num_favorites: u64,
    pub total_ratings: u64,
    pub average_rating: f64,

    /// `(artist name, plays)`, at most 10.
    pub top_artists_by_plays: Vec<(String, u64)>,
    pub top_songs_by_playcount: Vec<TopSong>,
    pub top_albums_by_playcount: Vec<TopAlbum>,
    pub top_rated_songs: Vec<RatedSong>,

    pub top_genres_by_songs: Vec<(String, u64)>,
    pub top_genres_by_plays: Vec<(String, u64)>,
    pub top_decades_by_songs: Vec<(String, u64)>,
    pub top_decades_by_plays: Vec<(String, u64)>,
    /// Song count per genre in first-seen order.
    pub genre_breakdown: Vec<(String, u64)>,
    /// Song count per decade in first-seen order.
    pub decade_breakdown: Vec<(String, u64)>,

    pub rating_distribution: RatingDistribution,
    /// Gini-Simpson index over artist play shares, 0 to 100.
    pub diversity_score: f64,
    pub artist_discovery: ArtistDiscovery,
    pub deep_artists: Vec<DeepArtist>,
    pub neglected_track: Option<NeglectedTrack>,
    pub quality: QualityMetrics,
}

impl Report {
    /// Serialize as indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
