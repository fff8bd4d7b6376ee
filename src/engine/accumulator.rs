//! Running aggregates for one walk over the catalog.
//!
//! Each song updates every counter exactly once. Counters are
//! independent of each other; none is derived from another.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::trace;

use super::quality::classify;
use crate::models::{
    decade_label, AlbumDetail, ArtistIdentity, NeglectedTrack, RatingBucket, RatingDistribution,
    SongRaw, SongRecord,
};

/// Counter map that remembers first-insertion order.
///
/// Ranking relies on that order to break ties.
#[derive(Debug, Clone)]
pub struct Tally<K> {
    index: HashMap<K, usize>,
    entries: Vec<(K, u64)>,
}

impl<K> Default for Tally<K> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> Tally<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to `key`, inserting it at the end when new.
    ///
    /// Counts saturate at `u64::MAX`.
    pub fn add(&mut self, key: &K, amount: u64) {
        match self.index.get(key) {
            Some(&i) => {
                let count = &mut self.entries[i].1;
                *count = count.saturating_add(amount);
            }
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key.clone(), amount));
            }
        }
    }

    pub fn get(&self, key: &K) -> u64 {
        self.index.get(key).map(|&i| self.entries[i].1).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-seen order.
    pub fn entries(&self) -> &[(K, u64)] {
        &self.entries
    }

    /// Entries sorted by count, descending. Ties keep first-seen order.
    pub fn ranked(&self) -> Vec<(K, u64)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// The `n` highest entries.
    pub fn top(&self, n: usize) -> Vec<(K, u64)> {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        ranked
    }
}

/// Oldest last-played song seen so far.
#[derive(Debug, Clone)]
pub(crate) struct OldestPlay {
    pub(crate) played_at: DateTime<Utc>,
    pub(crate) track: NeglectedTrack,
}

/// All per-run counters plus the retained song list.
///
/// Create one per run. Nothing here is shared between runs.
#[derive(Debug, Default)]
pub struct Accumulator {
    pub(crate) songs: Vec<SongRecord>,

    pub(crate) artist_plays: Tally<ArtistIdentity>,
    pub(crate) artist_names: HashMap<ArtistIdentity, String>,
    pub(crate) artists_seen: HashSet<ArtistIdentity>,
    pub(crate) artists_listened: HashSet<ArtistIdentity>,

    pub(crate) genre_songs: Tally<String>,
    pub(crate) genre_plays: Tally<String>,
    pub(crate) decade_songs: Tally<String>,
    pub(crate) decade_plays: Tally<String>,

    pub(crate) ratings: RatingDistribution,
    pub(crate) rated_count: u64,
    pub(crate) rating_sum: f64,

    pub(crate) bitrate_sum: u64,
    pub(crate) bitrate_count: u64,
    pub(crate) quality_sum: u64,
    pub(crate) quality_count: u64,
    pub(crate) quality_weighted_sum: u64,
    pub(crate) quality_weight: u64,
    pub(crate) lossless_count: u64,
    pub(crate) hi_res_count: u64,

    pub(crate) favorites: u64,
    pub(crate) total_duration: u64,
    pub(crate) total_plays: u64,
    pub(crate) listening_seconds: u64,

    pub(crate) oldest: Option<OldestPlay>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold every song of an album into the counters.
    pub fn ingest_album(&mut self, album: &AlbumDetail) {
        for song in &album.songs {
            self.ingest_song(album, song);
        }
    }

    /// Fold a single song into the counters and retain its record.
    pub fn ingest_song(&mut self, album: &AlbumDetail, song: &SongRaw) {
        let plays = song.play_count;
        let genre = if song.genre.is_empty() {
            album.genre.clone()
        } else {
            song.genre.clone()
        };
        let year = if song.year > 0 { song.year } else { album.year };

        if song.bit_rate > 0 {
            self.bitrate_sum = self.bitrate_sum.saturating_add(u64::from(song.bit_rate));
            self.bitrate_count += 1;
        }
        self.total_duration = self.total_duration.saturating_add(song.duration);
        if song.starred {
            self.favorites += 1;
        }

        let quality = classify(song);
        if quality.is_lossless() {
            self.lossless_count += 1;
        }
        if quality.hi_res {
            self.hi_res_count += 1;
        }
        let score = u64::from(quality.score);
        self.quality_sum = self.quality_sum.saturating_add(score);
        self.quality_count += 1;
        // Unplayed songs still weigh in once.
        let weight = plays.max(1);
        self.quality_weighted_sum = self
            .quality_weighted_sum
            .saturating_add(score.saturating_mul(weight));
        self.quality_weight = self.quality_weight.saturating_add(weight);

        let artists = song.credited_artists();
        if let Some(played_at) = song.played.as_deref().and_then(parse_played) {
            let older = self
                .oldest
                .as_ref()
                .map_or(true, |o| played_at < o.played_at);
            if older {
                self.oldest = Some(OldestPlay {
                    played_at,
                    track: NeglectedTrack {
                        title: if song.title.is_empty() {
                            "Unknown".to_string()
                        } else {
                            song.title.clone()
                        },
                        artist: if song.artist.is_empty() {
                            artists.first().map(|a| a.name.clone()).unwrap_or_default()
                        } else {
                            song.artist.clone()
                        },
                        album: album.name.clone(),
                        played_date: played_date(song.played.as_deref().unwrap_or(""), played_at),
                    },
                });
            }
        }

        // Multi-artist songs credit their full play count to each artist.
        for artist in &artists {
            let identity = artist.identity();
            self.artist_names
                .entry(identity.clone())
                .or_insert_with(|| artist.display_name().to_string());
            if plays > 0 {
                self.artists_listened.insert(identity.clone());
                self.artist_plays.add(&identity, plays);
            }
            self.artists_seen.insert(identity);
        }

        if !genre.is_empty() {
            self.genre_songs.add(&genre, 1);
            self.genre_plays.add(&genre, plays);
        }
        let decade = decade_label(year);
        self.decade_songs.add(&decade, 1);
        self.decade_plays.add(&decade, plays);

        let bucket = RatingBucket::from_rating(song.user_rating);
        self.ratings.record(bucket);
        if bucket != RatingBucket::Unrated {
            self.rated_count += 1;
            self.rating_sum += song.user_rating;
        }

        if plays > 0 {
            self.total_plays = self.total_plays.saturating_add(plays);
            self.listening_seconds = self
                .listening_seconds
                .saturating_add(song.duration.saturating_mul(plays));
        }

        trace!(title = %song.title, score, plays, "ingested song");

        self.songs.push(SongRecord {
            title: song.title.clone(),
            album: album.name.clone(),
            album_id: album.id.clone(),
            artists,
            duration: song.duration,
            play_count: plays,
            rating: if bucket == RatingBucket::Unrated {
                0.0
            } else {
                song.user_rating
            },
            genre,
            year,
            quality_score: quality.score,
        });
    }

    /// Retained song records in walk order.
    pub fn songs(&self) -> &[SongRecord] {
        &self.songs
    }

    /// Plays credited to one artist, counting every song they appear on.
    pub fn artist_plays(&self, identity: &ArtistIdentity) -> u64 {
        self.artist_plays.get(identity)
    }

    /// Sum of song play counts, each song counted once.
    pub fn total_plays(&self) -> u64 {
        self.total_plays
    }

    pub fn lossless_count(&self) -> u64 {
        self.lossless_count
    }

    pub fn hi_res_count(&self) -> u64 {
        self.hi_res_count
    }

    /// The oldest last-played song, if any song has a usable timestamp.
    pub fn neglected_track(&self) -> Option<&NeglectedTrack> {
        self.oldest.as_ref().map(|o| &o.track)
    }
}

/// Calendar date of a last-played timestamp as the server wrote it.
///
/// Keeps the leading `YYYY-MM-DD` of the raw value so offsets other than
/// UTC do not shift the day. Falls back to the UTC date of `played_at`.
fn played_date(raw: &str, played_at: DateTime<Utc>) -> String {
    let raw = raw.trim();
    match raw.get(..10) {
        Some(day) if NaiveDate::parse_from_str(day, "%Y-%m-%d").is_ok() => day.to_string(),
        _ => played_at.format("%Y-%m-%d").to_string(),
    }
}

/// Parse a last-played timestamp.
///
/// Accepts RFC 3339, a zone-less ISO date-time (read as UTC) or a bare date.
pub fn parse_played(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
