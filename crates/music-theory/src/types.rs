use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Mode;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TheoryError {
    #[error("invalid note name {0:?}: expected A-G with optional # or b")]
    InvalidNoteName(String),

    #[error("unknown scale mode {0:?}")]
    UnknownMode(String),

    #[error("unknown progression style {0:?}")]
    UnknownStyle(String),
}

/// One key hypothesis from [`crate::detect_key`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyCandidate {
    /// Conventional spelling of the root (flats for flat keys)
    pub root: String,
    pub root_pitch_class: u8,
    pub mode: Mode,
    /// 0..1, higher is better
    pub confidence: f64,
}

/// One chord of a suggested progression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chord {
    /// Roman numeral relative to the key, cased by quality (I vs i)
    pub degree: String,
    /// Chord symbol, e.g. "Am" or "G"
    pub symbol: String,
    pub root_pitch_class: u8,
    /// MIDI pitches, ascending, rooted in octave 4 (C4 = 60)
    pub pitches: Vec<u8>,
}
