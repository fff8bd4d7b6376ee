//! JSON to model converters.
//!
//! Turns Subsonic API payloads into typed models. Catalog data is
//! frequently incomplete, so every field falls back to a default
//! instead of failing the record.

use serde_json::Value;

use crate::models::{AlbumDetail, AlbumSummary, ArtistRef, SongRaw};

/// Get string from JSON, returning empty string if not found.
fn get_str(json: &Value, key: &str) -> String {
    json.get(key)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

/// Get string ID from JSON (handles both string and numeric IDs).
fn get_id(json: &Value, key: &str) -> String {
    match json.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Get f64 from JSON, accepting numbers and numeric strings.
fn get_f64(json: &Value, key: &str) -> f64 {
    match json.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Get a non-negative integer from JSON. Negative or fractional input is clamped / truncated.
fn get_u64(json: &Value, key: &str) -> u64 {
    let value = get_f64(json, key);
    if value.is_finite() && value > 0.0 {
        value as u64
    } else {
        0
    }
}

/// Get u32 from JSON.
fn get_u32(json: &Value, key: &str) -> u32 {
    get_u64(json, key).min(u32::MAX as u64) as u32
}

/// Get a year from JSON, 0 when missing.
fn get_year(json: &Value, key: &str) -> i32 {
    get_f64(json, key) as i32
}

/// Truthiness of a flag that may be a bool or a timestamp string.
///
/// Subsonic reports `starred` as the date the item was starred.
fn get_flag(json: &Value, key: &str) -> bool {
    match json.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().map(|v| v != 0.0).unwrap_or(false),
        _ => false,
    }
}

/// Parse an `artists` array of `{id, name}` objects.
fn parse_artist_list(json: &Value) -> Vec<ArtistRef> {
    json.get("artists")
        .and_then(|a| a.as_array())
        .map(|arr| {
            arr.iter()
                .map(|a| ArtistRef::new(get_id(a, "id"), get_str(a, "name")))
                .collect()
        })
        .unwrap_or_default()
}

/// Parse one entry of `albumList2.album`.
pub fn parse_album_summary(json: &Value) -> AlbumSummary {
    let mut artists = parse_artist_list(json);
    if artists.is_empty() {
        let name = get_str(json, "artist");
        let id = get_id(json, "artistId");
        if !name.is_empty() || !id.is_empty() {
            artists.push(ArtistRef::new(id, name));
        }
    }

    let name = match get_str(json, "name") {
        n if n.is_empty() => get_str(json, "title"),
        n => n,
    };

    AlbumSummary {
        id: get_id(json, "id"),
        name,
        play_count: get_u64(json, "playCount"),
        genre: get_str(json, "genre"),
        year: get_year(json, "year"),
        artists,
    }
}

/// Parse a `getAlbumList2` response body into album summaries.
///
/// A missing list is an empty page.
pub fn parse_album_list(response: &Value) -> Vec<AlbumSummary> {
    response
        .get("albumList2")
        .and_then(|l| l.get("album"))
        .and_then(|a| a.as_array())
        .map(|arr| arr.iter().map(parse_album_summary).collect())
        .unwrap_or_default()
}

/// Parse a single `song` / `child` entry.
pub fn parse_song(json: &Value) -> SongRaw {
    let played = json
        .get("played")
        .and_then(|p| p.as_str())
        .filter(|p| !p.is_empty())
        .map(|p| p.to_string());

    let sampling_rate = match get_u32(json, "samplingRate") {
        0 => get_u32(json, "sampleRate"),
        rate => rate,
    };

    SongRaw {
        title: get_str(json, "title"),
        duration: get_u64(json, "duration"),
        play_count: get_u64(json, "playCount"),
        user_rating: get_f64(json, "userRating").max(0.0),
        artist: get_str(json, "artist"),
        artist_id: get_id(json, "artistId"),
        display_artist: get_str(json, "displayArtist"),
        artists: parse_artist_list(json),
        genre: get_str(json, "genre"),
        year: get_year(json, "year"),
        starred: get_flag(json, "starred"),
        played,
        suffix: get_str(json, "suffix"),
        content_type: get_str(json, "contentType"),
        bit_rate: get_u32(json, "bitRate"),
        sampling_rate,
        bit_depth: get_u32(json, "bitDepth"),
    }
}

/// Parse a `getAlbum` response body.
///
/// Returns `None` when the response carries no album.
pub fn parse_album_detail(response: &Value) -> Option<AlbumDetail> {
    let album = response.get("album").filter(|a| a.is_object())?;

    let songs = album
        .get("song")
        .and_then(|s| s.as_array())
        .map(|arr| arr.iter().map(parse_song).collect())
        .unwrap_or_default();

    Some(AlbumDetail {
        id: get_id(album, "id"),
        name: get_str(album, "name"),
        genre: get_str(album, "genre"),
        year: get_year(album, "year"),
        songs,
    })
}
