//! Turns a finished [`Accumulator`] into a [`Report`].
//!
//! Building never fails. Empty inputs and zero denominators degrade to
//! zeros and empty lists.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::Utc;

use super::accumulator::Accumulator;
use crate::models::common::round_tenth;
use crate::models::{
    format_duration, AlbumSummary, ArtistDiscovery, ArtistIdentity, DeepArtist, QualityMetrics,
    RatedSong, Report, SongRecord, TopAlbum, TopSong,
};

/// Length of the artist, song and album rankings.
pub const TOP_LIST_LEN: usize = 10;
/// Length of the top-rated songs list.
pub const TOP_RATED_LEN: usize = 5;
/// Length of the genre and decade rankings.
pub const TOP_GROUP_LEN: usize = 5;
/// Number of top artists given a deep dive.
pub const DEEP_ARTIST_COUNT: usize = 3;
/// Songs listed per deep-dive artist.
pub const DEEP_ARTIST_SONGS: usize = 3;

const VARIOUS_ARTISTS: &str = "various artists";

/// An artist in the plays ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedArtist {
    pub identity: ArtistIdentity,
    pub name: String,
    pub plays: u64,
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Top artists by plays, skipping compilation credits.
pub fn rank_artists(acc: &Accumulator) -> Vec<RankedArtist> {
    acc.artist_plays
        .ranked()
        .into_iter()
        .map(|(identity, plays)| {
            let name = acc
                .artist_names
                .get(&identity)
                .cloned()
                .unwrap_or_else(|| identity.as_str().to_string());
            RankedArtist {
                identity,
                name,
                plays,
            }
        })
        .filter(|a| a.name.to_lowercase() != VARIOUS_ARTISTS)
        .take(TOP_LIST_LEN)
        .collect()
}

/// Songs by play count, unplayed songs excluded.
fn rank_songs(songs: &[SongRecord]) -> Vec<TopSong> {
    let mut played: Vec<&SongRecord> = songs.iter().filter(|s| s.play_count > 0).collect();
    played.sort_by(|a, b| b.play_count.cmp(&a.play_count));
    played
        .into_iter()
        .take(TOP_LIST_LEN)
        .map(|s| TopSong {
            title: s.title.clone(),
            artists: s.artists.clone(),
            plays: s.play_count,
        })
        .collect()
}

/// Albums by their declared play count.
fn rank_albums(albums: &[AlbumSummary]) -> Vec<TopAlbum> {
    let mut played: Vec<&AlbumSummary> = albums.iter().filter(|a| a.play_count > 0).collect();
    played.sort_by(|a, b| b.play_count.cmp(&a.play_count));
    played
        .into_iter()
        .take(TOP_LIST_LEN)
        .map(|a| TopAlbum {
            id: a.id.clone(),
            name: a.name.clone(),
            artist: if a.artists.is_empty() {
                "Unknown".to_string()
            } else {
                a.artists_string(", ")
            },
            play_count: a.play_count,
        })
        .collect()
}

fn rank_rated(songs: &[SongRecord]) -> Vec<RatedSong> {
    let mut rated: Vec<&SongRecord> = songs.iter().filter(|s| s.rating > 0.0).collect();
    rated.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal));
    rated
        .into_iter()
        .take(TOP_RATED_LEN)
        .map(|s| RatedSong {
            rating: s.rating,
            title: s.title.clone(),
            artist: s.primary_artist().to_string(),
        })
        .collect()
}

/// Gini-Simpson index over artist play shares, scaled to 0..=100.
///
/// Artist plays double count multi-artist songs while `total_plays`
/// counts each song once, so shares can sum past 1; the result is clamped.
pub fn diversity_score(artist_plays: &[(ArtistIdentity, u64)], total_plays: u64) -> f64 {
    if total_plays == 0 {
        return 0.0;
    }
    let total = total_plays as f64;
    let concentration: f64 = artist_plays
        .iter()
        .map(|(_, plays)| {
            let share = *plays as f64 / total;
            share * share
        })
        .sum();
    ((1.0 - concentration) * 100.0).clamp(0.0, 100.0)
}

fn deep_artist(artist: &RankedArtist, songs: &[SongRecord]) -> DeepArtist {
    let mut credited: Vec<&SongRecord> = songs
        .iter()
        .filter(|s| s.is_credited(&artist.identity))
        .collect();

    let albums: HashSet<&str> = credited
        .iter()
        .map(|s| s.album_id.as_str())
        .filter(|id| !id.is_empty())
        .collect();
    let total_duration = credited
        .iter()
        .fold(0u64, |sum, s| sum.saturating_add(s.duration));
    let listening_time = credited
        .iter()
        .fold(0u64, |sum, s| sum.saturating_add(s.listening_seconds()));

    let ratings: Vec<f64> = credited
        .iter()
        .filter(|s| s.rating > 0.0)
        .map(|s| s.rating)
        .collect();
    let average_rating = ratio(ratings.iter().sum(), ratings.len() as f64);

    let total_songs = credited.len() as u64;
    credited.sort_by(|a, b| b.play_count.cmp(&a.play_count));
    let top_songs = credited
        .into_iter()
        .take(DEEP_ARTIST_SONGS)
        .map(|s| (s.title.clone(), s.play_count))
        .collect();

    DeepArtist {
        name: artist.name.clone(),
        total_plays: artist.plays,
        total_songs,
        album_count: albums.len() as u64,
        total_duration,
        listening_time,
        average_rating,
        top_songs,
    }
}

fn quality_metrics(acc: &Accumulator) -> QualityMetrics {
    let count = acc.quality_count as f64;
    let mean = ratio(acc.quality_sum as f64, count);
    let by_plays = if acc.total_plays > 0 {
        ratio(acc.quality_weighted_sum as f64, acc.quality_weight as f64)
    } else {
        mean
    };

    QualityMetrics {
        quality_score: mean.round() as u32,
        quality_score_by_plays: by_plays.round() as u32,
        percent_lossless: round_tenth(ratio(acc.lossless_count as f64, count) * 100.0),
        percent_hi_res: round_tenth(ratio(acc.hi_res_count as f64, count) * 100.0),
        avg_bitrate: ratio(acc.bitrate_sum as f64, acc.bitrate_count as f64).round() as u32,
    }
}

/// Build the final report from a completed walk.
pub fn build_report(acc: Accumulator, albums: &[AlbumSummary], username: &str) -> Report {
    let total_songs = acc.songs.len() as u64;

    let top_artists = rank_artists(&acc);
    let deep_artists = top_artists
        .iter()
        .take(DEEP_ARTIST_COUNT)
        .map(|a| deep_artist(a, &acc.songs))
        .collect();

    let mut rating_distribution = acc.ratings;
    rating_distribution.reconcile(total_songs);

    let listened = acc.artists_listened.len() as u64;
    let seen = acc.artists_seen.len() as u64;
    let quality = quality_metrics(&acc);

    Report {
        username: username.to_string(),
        generated_at: Utc::now(),
        total_songs,
        total_albums: albums.len() as u64,
        total_artists: seen,
        total_duration: acc.total_duration,
        listening_time: acc.listening_seconds,
        listening_time_formatted: format_duration(acc.listening_seconds),
        total_plays: acc.total_plays,
        num_favorites: acc.favorites,
        total_ratings: acc.rated_count,
        average_rating: ratio(acc.rating_sum, acc.rated_count as f64),
        top_artists_by_plays: top_artists
            .iter()
            .map(|a| (a.name.clone(), a.plays))
            .collect(),
        top_songs_by_playcount: rank_songs(&acc.songs),
        top_albums_by_playcount: rank_albums(albums),
        top_rated_songs: rank_rated(&acc.songs),
        top_genres_by_songs: acc.genre_songs.top(TOP_GROUP_LEN),
        top_genres_by_plays: acc.genre_plays.top(TOP_GROUP_LEN),
        top_decades_by_songs: acc.decade_songs.top(TOP_GROUP_LEN),
        top_decades_by_plays: acc.decade_plays.top(TOP_GROUP_LEN),
        genre_breakdown: acc.genre_songs.entries().to_vec(),
        decade_breakdown: acc.decade_songs.entries().to_vec(),
        rating_distribution,
        diversity_score: diversity_score(acc.artist_plays.entries(), acc.total_plays),
        artist_discovery: ArtistDiscovery {
            listened,
            total: seen,
            percentage: ratio(listened as f64, seen as f64) * 100.0,
        },
        deep_artists,
        neglected_track: acc.oldest.map(|o| o.track),
        quality,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlbumDetail, ArtistRef, SongRaw};

    fn song(artist_id: &str, artist: &str, plays: u64) -> SongRaw {
        SongRaw {
            title: format!("{} song {}", artist, plays),
            artist: artist.to_string(),
            artist_id: artist_id.to_string(),
            play_count: plays,
            duration: 100,
            ..Default::default()
        }
    }

    fn accumulate(albums: Vec<AlbumDetail>) -> Accumulator {
        let mut acc = Accumulator::new();
        for album in &albums {
            acc.ingest_album(album);
        }
        acc
    }

    fn detail(id: &str, songs: Vec<SongRaw>) -> AlbumDetail {
        AlbumDetail {
            id: id.to_string(),
            name: format!("Album {}", id),
            songs,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_report_is_all_zero() {
        let report = build_report(Accumulator::new(), &[], "nobody");
        assert_eq!(report.total_songs, 0);
        assert_eq!(report.diversity_score, 0.0);
        assert_eq!(report.average_rating, 0.0);
        assert_eq!(report.artist_discovery.percentage, 0.0);
        assert_eq!(report.quality, QualityMetrics::default());
        assert_eq!(report.rating_distribution.total(), 0);
        assert!(report.top_artists_by_plays.is_empty());
        assert!(report.deep_artists.is_empty());
        assert!(report.neglected_track.is_none());
        assert_eq!(report.listening_time_formatted, "0s");
    }

    #[test]
    fn test_artist_ranking_skips_various_artists_and_keeps_ties_stable() {
        let acc = accumulate(vec![detail(
            "1",
            vec![
                song("v", "VARIOUS Artists", 99),
                song("b", "Beta", 5),
                song("a", "Alpha", 5),
                song("c", "Gamma", 8),
            ],
        )]);
        let ranked = rank_artists(&acc);
        let names: Vec<_> = ranked.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Gamma", "Beta", "Alpha"]);
    }

    #[test]
    fn test_artist_ranking_caps_at_ten() {
        let songs = (0..15)
            .map(|i| song(&format!("id{}", i), &format!("Artist {}", i), i + 1))
            .collect();
        let acc = accumulate(vec![detail("1", songs)]);
        let ranked = rank_artists(&acc);
        assert_eq!(ranked.len(), TOP_LIST_LEN);
        assert_eq!(ranked[0].plays, 15);
    }

    #[test]
    fn test_diversity_even_split() {
        let acc = accumulate(vec![detail(
            "1",
            vec![song("a", "A", 5), song("b", "B", 5), song("c", "C", 5), song("d", "D", 5)],
        )]);
        let report = build_report(acc, &[], "u");
        assert!((report.diversity_score - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_diversity_single_artist_is_zero_and_clamped_for_duets() {
        let acc = accumulate(vec![detail("1", vec![song("a", "A", 10)])]);
        assert_eq!(build_report(acc, &[], "u").diversity_score, 0.0);

        let duet = SongRaw {
            play_count: 10,
            artists: vec![ArtistRef::new("a", "A"), ArtistRef::new("b", "B")],
            ..Default::default()
        };
        let acc = accumulate(vec![detail("1", vec![duet])]);
        let score = build_report(acc, &[], "u").diversity_score;
        assert!((0.0..=100.0).contains(&score));
    }

    #[test]
    fn test_discovery_rate() {
        let acc = accumulate(vec![detail(
            "1",
            vec![song("a", "A", 3), song("b", "B", 0), song("c", "C", 0), song("d", "D", 1)],
        )]);
        let report = build_report(acc, &[], "u");
        assert_eq!(report.artist_discovery.listened, 2);
        assert_eq!(report.artist_discovery.total, 4);
        assert_eq!(report.artist_discovery.percentage, 50.0);
    }

    #[test]
    fn test_top_lists() {
        let mut rated = song("a", "A", 0);
        rated.user_rating = 3.0;
        rated.title = "Three".to_string();
        let mut best = song("b", "B", 2);
        best.user_rating = 5.0;
        best.title = "Five".to_string();

        let acc = accumulate(vec![detail("1", vec![rated, best, song("c", "C", 9)])]);
        let albums = vec![
            AlbumSummary {
                id: "1".to_string(),
                name: "Quiet".to_string(),
                play_count: 0,
                ..Default::default()
            },
            AlbumSummary {
                id: "2".to_string(),
                name: "Loud".to_string(),
                play_count: 12,
                artists: vec![ArtistRef::new("c", "C")],
                ..Default::default()
            },
        ];
        let report = build_report(acc, &albums, "u");

        let plays: Vec<_> = report
            .top_songs_by_playcount
            .iter()
            .map(|s| s.plays)
            .collect();
        assert_eq!(plays, vec![9, 2]);

        assert_eq!(report.top_albums_by_playcount.len(), 1);
        assert_eq!(report.top_albums_by_playcount[0].name, "Loud");
        assert_eq!(report.top_albums_by_playcount[0].artist, "C");

        assert_eq!(report.top_rated_songs.len(), 2);
        assert_eq!(report.top_rated_songs[0].title, "Five");
        assert_eq!(report.top_rated_songs[0].artist, "B");
        assert_eq!(report.total_ratings, 2);
        assert_eq!(report.average_rating, 4.0);
    }

    #[test]
    fn test_genre_and_decade_rankings() {
        let mut songs = Vec::new();
        for (genre, year, plays) in [("Jazz", 1959, 1), ("Rock", 1971, 10), ("Jazz", 1962, 2)] {
            let mut s = song("a", "A", plays);
            s.genre = genre.to_string();
            s.year = year;
            songs.push(s);
        }
        let report = build_report(accumulate(vec![detail("1", songs)]), &[], "u");
        assert_eq!(
            report.top_genres_by_songs,
            vec![("Jazz".to_string(), 2), ("Rock".to_string(), 1)]
        );
        assert_eq!(
            report.top_genres_by_plays,
            vec![("Rock".to_string(), 10), ("Jazz".to_string(), 3)]
        );
        assert_eq!(
            report.decade_breakdown,
            vec![
                ("1950s".to_string(), 1),
                ("1970s".to_string(), 1),
                ("1960s".to_string(), 1)
            ]
        );
        assert_eq!(report.top_decades_by_plays[0], ("1970s".to_string(), 10));
    }

    #[test]
    fn test_deep_artist() {
        let mut rated = song("x", "X", 4);
        rated.user_rating = 4.0;
        let mut feature = SongRaw {
            title: "Feature".to_string(),
            play_count: 6,
            duration: 200,
            artists: vec![ArtistRef::new("y", "Y"), ArtistRef::new("x", "X")],
            ..Default::default()
        };
        feature.user_rating = 2.0;

        let acc = accumulate(vec![
            detail("1", vec![rated, song("x", "X", 1), song("x", "X", 0)]),
            detail("2", vec![feature]),
            detail("3", vec![song("z", "Z", 3)]),
        ]);
        let report = build_report(acc, &[], "u");

        assert_eq!(report.deep_artists.len(), 3);
        let x = &report.deep_artists[0];
        assert_eq!(x.name, "X");
        assert_eq!(x.total_plays, 11);
        assert_eq!(x.total_songs, 4);
        assert_eq!(x.album_count, 2);
        assert_eq!(x.total_duration, 500);
        assert_eq!(x.listening_time, 400 + 100 + 1200);
        assert_eq!(x.average_rating, 3.0);
        assert_eq!(
            x.top_songs,
            vec![
                ("Feature".to_string(), 6),
                ("X song 4".to_string(), 4),
                ("X song 1".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_quality_metrics_weighting() {
        let lossless = SongRaw {
            suffix: "flac".to_string(),
            bit_depth: 16,
            sampling_rate: 44_100,
            bit_rate: 900,
            play_count: 3,
            ..Default::default()
        };
        let lossy = SongRaw {
            suffix: "mp3".to_string(),
            bit_rate: 128,
            play_count: 1,
            ..Default::default()
        };
        let report = build_report(accumulate(vec![detail("1", vec![lossless, lossy])]), &[], "u");
        // (85 + 30) / 2 and (85*3 + 30) / 4
        assert_eq!(report.quality.quality_score, 58);
        assert_eq!(report.quality.quality_score_by_plays, 71);
        assert_eq!(report.quality.percent_lossless, 50.0);
        assert_eq!(report.quality.percent_hi_res, 0.0);
        assert_eq!(report.quality.avg_bitrate, 514);
    }
}
