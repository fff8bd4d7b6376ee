//! Audio fidelity classification.
//!
//! Scores a song from 0 to 100 using its container, bit depth, sample
//! rate and bitrate. The function is pure; callers maintain the
//! lossless / hi-res counters from the returned flags.

use crate::models::SongRaw;

const LOSSLESS_SUFFIXES: &[&str] = &["flac", "alac", "wav", "aiff", "aif", "ape"];
const LOSSLESS_CONTENT_TYPES: &[&str] = &["flac", "wav", "alac", "aiff"];
const LOSSY_SUFFIXES: &[&str] = &["mp3", "aac", "m4a", "ogg", "opus"];
const LOSSY_CONTENT_TYPES: &[&str] = &["mpeg", "mp3", "aac", "ogg", "opus"];

/// Score given to songs without any quality signal.
pub const NEUTRAL_SCORE: u8 = 50;

/// Broad encoding family of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Lossless,
    Lossy,
    Unknown,
}

impl Encoding {
    /// Detect the family from suffix and MIME type. Lossless wins when both match.
    pub fn detect(suffix: &str, content_type: &str) -> Self {
        let suffix = suffix.to_lowercase();
        let content_type = content_type.to_lowercase();

        let lossless = LOSSLESS_SUFFIXES.contains(&suffix.as_str())
            || LOSSLESS_CONTENT_TYPES
                .iter()
                .any(|t| content_type.contains(t));
        if lossless {
            return Encoding::Lossless;
        }

        let lossy = LOSSY_SUFFIXES.contains(&suffix.as_str())
            || LOSSY_CONTENT_TYPES.iter().any(|t| content_type.contains(t));
        if lossy {
            Encoding::Lossy
        } else {
            Encoding::Unknown
        }
    }
}

/// Outcome of classifying one song.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub score: u8,
    pub encoding: Encoding,
    /// Set only for the 100 (lossless hi-res) and 98 (unknown hi-res) scores.
    pub hi_res: bool,
}

impl Classification {
    pub fn is_lossless(&self) -> bool {
        self.encoding == Encoding::Lossless
    }
}

/// Classify a song's audio quality.
pub fn classify(song: &SongRaw) -> Classification {
    let encoding = Encoding::detect(&song.suffix, &song.content_type);
    let bit_depth = song.bit_depth;
    let sample_rate = song.sampling_rate;
    let bit_rate = song.bit_rate;
    let hi_res_signal = bit_depth >= 24 && sample_rate >= 96_000;

    let (score, hi_res) = match encoding {
        Encoding::Lossless => {
            if hi_res_signal {
                (100, true)
            } else if bit_depth >= 24 && sample_rate >= 48_000 {
                (95, false)
            } else if bit_depth >= 16 && sample_rate >= 44_100 {
                (85, false)
            } else {
                (75, false)
            }
        }
        Encoding::Lossy => {
            let score = match bit_rate {
                320.. => 75,
                256..=319 => 60,
                192..=255 => 45,
                128..=191 => 30,
                _ => 15,
            };
            (score, false)
        }
        Encoding::Unknown => {
            if hi_res_signal {
                (98, true)
            } else if bit_rate >= 320 {
                (70, false)
            } else if bit_rate > 0 {
                ((bit_rate * 70 / 320).min(70) as u8, false)
            } else {
                (NEUTRAL_SCORE, false)
            }
        }
    };

    Classification {
        score,
        encoding,
        hi_res,
    }
}
