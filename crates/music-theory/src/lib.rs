//! music-theory - deterministic harmony and tempo helpers
//!
//! Pure functions, no I/O. Backs the analysis tools and the note
//! preprocessing options of the clip tools (quantize, scale filtering).

mod key;
mod notes;
mod progression;
mod scale;
mod tempo;
mod types;

pub use key::detect_key;
pub use notes::{filter_to_scale, quantize};
pub use progression::{chord_progression, ProgressionStyle};
pub use scale::{note_name_to_pitch_class, pitch_class_name, scale, Mode};
pub use tempo::{tempo_suggestion, TempoSuggestion};
pub use types::{Chord, KeyCandidate, TheoryError};
