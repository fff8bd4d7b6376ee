//! Common types shared across all models.

use serde::{Deserialize, Serialize};

/// Label used for songs without a usable release year.
pub const UNKNOWN_DECADE: &str = "Unknown";

/// Stable identity of an artist inside one aggregation run.
///
/// Sources do not always supply an artist id. In that case the display
/// name becomes the identity, but it never compares equal to an id that
/// happens to spell the same text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ArtistIdentity {
    /// Identified by the catalog's artist id.
    ById(String),
    /// No id supplied; identified by display name.
    ByName(String),
}

impl ArtistIdentity {
    /// Build an identity from an optional id, falling back to the name.
    pub fn resolve(id: &str, name: &str) -> Self {
        if id.is_empty() {
            Self::ByName(name.to_string())
        } else {
            Self::ById(id.to_string())
        }
    }

    /// The raw key text, id or name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::ById(id) => id,
            Self::ByName(name) => name,
        }
    }
}

/// Star bucket a song's rating falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RatingBucket {
    FiveStar,
    FourStar,
    ThreeStar,
    TwoStar,
    OneStar,
    Unrated,
}

impl RatingBucket {
    /// Classify a rating using half-star boundaries.
    ///
    /// `[4.5, ∞)` is five stars, `[3.5, 4.5)` four, and so on down to
    /// `(0, 1.5)` for one star. Zero, negative and NaN are unrated.
    pub fn from_rating(rating: f64) -> Self {
        if rating.is_nan() || rating <= 0.0 {
            Self::Unrated
        } else if rating >= 4.5 {
            Self::FiveStar
        } else if rating >= 3.5 {
            Self::FourStar
        } else if rating >= 2.5 {
            Self::ThreeStar
        } else if rating >= 1.5 {
            Self::TwoStar
        } else {
            Self::OneStar
        }
    }
}

/// Decade label for a release year, e.g. `1994` → `"1990s"`.
pub fn decade_label(year: i32) -> String {
    if year <= 0 {
        return UNKNOWN_DECADE.to_string();
    }
    format!("{}s", year / 10 * 10)
}

/// Human readable length of a listening span.
///
/// `45s`, `12m`, `3h 20m`, `4d 6h`.
pub fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        return format!("{}s", seconds);
    }
    let minutes = seconds / 60;
    if seconds < 3600 {
        return format!("{}m", minutes);
    }
    let hours = minutes / 60;
    let days = hours / 24;
    if days > 0 {
        format!("{}d {}h", days, hours % 24)
    } else {
        format!("{}h {}m", hours, minutes % 60)
    }
}

/// Round to one decimal place.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_prefers_id() {
        assert_eq!(
            ArtistIdentity::resolve("ar-1", "Low"),
            ArtistIdentity::ById("ar-1".to_string())
        );
        assert_eq!(
            ArtistIdentity::resolve("", "Low"),
            ArtistIdentity::ByName("Low".to_string())
        );
    }

    #[test]
    fn test_identity_id_and_name_never_collide() {
        let by_id = ArtistIdentity::resolve("Low", "Someone Else");
        let by_name = ArtistIdentity::resolve("", "Low");
        assert_eq!(by_id.as_str(), by_name.as_str());
        assert_ne!(by_id, by_name);
    }

    #[test]
    fn test_rating_bucket_boundaries() {
        assert_eq!(RatingBucket::from_rating(0.0), RatingBucket::Unrated);
        assert_eq!(RatingBucket::from_rating(f64::NAN), RatingBucket::Unrated);
        assert_eq!(RatingBucket::from_rating(1.0), RatingBucket::OneStar);
        assert_eq!(RatingBucket::from_rating(1.49), RatingBucket::OneStar);
        assert_eq!(RatingBucket::from_rating(1.5), RatingBucket::TwoStar);
        assert_eq!(RatingBucket::from_rating(3.49), RatingBucket::ThreeStar);
        assert_eq!(RatingBucket::from_rating(3.5), RatingBucket::FourStar);
        assert_eq!(RatingBucket::from_rating(4.5), RatingBucket::FiveStar);
        assert_eq!(RatingBucket::from_rating(5.0), RatingBucket::FiveStar);
    }

    #[test]
    fn test_decade_label() {
        assert_eq!(decade_label(1994), "1990s");
        assert_eq!(decade_label(2000), "2000s");
        assert_eq!(decade_label(0), "Unknown");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(45), "45s");
        assert_eq!(format_duration(750), "12m");
        assert_eq!(format_duration(3 * 3600 + 20 * 60), "3h 20m");
        assert_eq!(format_duration(4 * 86400 + 6 * 3600 + 59), "4d 6h");
    }

    #[test]
    fn test_round_tenth() {
        assert_eq!(round_tenth(33.333), 33.3);
        assert_eq!(round_tenth(66.666), 66.7);
    }
}
