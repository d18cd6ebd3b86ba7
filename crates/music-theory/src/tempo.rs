//! Genre tempo ranges and energy-based suggestions.

use serde::{Deserialize, Serialize};

/// (genre, min BPM, max BPM)
const GENRE_RANGES: [(&str, f32, f32); 9] = [
    ("ballad", 60.0, 80.0),
    ("lofi", 70.0, 90.0),
    ("hiphop", 85.0, 95.0),
    ("rock", 110.0, 140.0),
    ("pop", 100.0, 130.0),
    ("house", 120.0, 130.0),
    ("techno", 125.0, 150.0),
    ("dnb", 160.0, 180.0),
    ("trap", 130.0, 160.0),
];

/// Fallback range for genres the table does not know.
const DEFAULT_RANGE: (f32, f32) = (80.0, 160.0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TempoSuggestion {
    pub genre: String,
    pub current_bpm: f32,
    pub min_bpm: f32,
    pub max_bpm: f32,
    pub suggested_bpm: f32,
    /// The (clamped) energy the suggestion was computed for
    pub energy: f32,
    pub energy_level: String,
}

/// Suggest a tempo for `genre` at the given energy in [0, 1]. Energy
/// interpolates linearly across the genre's range; out-of-range energy is
/// clamped rather than rejected.
pub fn tempo_suggestion(current_bpm: f32, genre: &str, energy: f32) -> TempoSuggestion {
    let genre_key = genre.trim().to_ascii_lowercase();
    let (min_bpm, max_bpm) = GENRE_RANGES
        .iter()
        .find(|(name, _, _)| *name == genre_key)
        .map(|(_, lo, hi)| (*lo, *hi))
        .unwrap_or(DEFAULT_RANGE);

    let energy = if energy.is_finite() { energy.clamp(0.0, 1.0) } else { 0.5 };
    let suggested_bpm = ((min_bpm + (max_bpm - min_bpm) * energy) * 10.0).round() / 10.0;

    let energy_level = if energy < 1.0 / 3.0 {
        "low"
    } else if energy < 2.0 / 3.0 {
        "moderate"
    } else {
        "high"
    };

    TempoSuggestion {
        genre: genre_key,
        current_bpm,
        min_bpm,
        max_bpm,
        suggested_bpm,
        energy,
        energy_level: energy_level.to_string(),
    }
}
