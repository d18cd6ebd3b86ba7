//! Scale modes, note-name parsing, and pitch-class spelling.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::TheoryError;

const NOTE_NAMES_SHARP: [&str; 12] =
    ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];
const NOTE_NAMES_FLAT: [&str; 12] =
    ["C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B"];

/// Pitch classes conventionally spelled with flats.
const FLAT_ROOTS: [u8; 6] = [1, 3, 5, 6, 8, 10]; // Db, Eb, F, Gb, Ab, Bb

/// Scale modes, in preference order: key detection breaks confidence ties
/// by the earlier variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Major,
    Minor,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Locrian,
    HarmonicMinor,
    MelodicMinor,
    PentatonicMajor,
    PentatonicMinor,
    Blues,
    Chromatic,
}

impl Mode {
    pub const ALL: [Mode; 13] = [
        Mode::Major,
        Mode::Minor,
        Mode::Dorian,
        Mode::Phrygian,
        Mode::Lydian,
        Mode::Mixolydian,
        Mode::Locrian,
        Mode::HarmonicMinor,
        Mode::MelodicMinor,
        Mode::PentatonicMajor,
        Mode::PentatonicMinor,
        Mode::Blues,
        Mode::Chromatic,
    ];

    /// Semitone offsets from the root.
    pub fn intervals(self) -> &'static [u8] {
        match self {
            Mode::Major => &[0, 2, 4, 5, 7, 9, 11],
            Mode::Minor => &[0, 2, 3, 5, 7, 8, 10],
            Mode::Dorian => &[0, 2, 3, 5, 7, 9, 10],
            Mode::Phrygian => &[0, 1, 3, 5, 7, 8, 10],
            Mode::Lydian => &[0, 2, 4, 6, 7, 9, 11],
            Mode::Mixolydian => &[0, 2, 4, 5, 7, 9, 10],
            Mode::Locrian => &[0, 1, 3, 5, 6, 8, 10],
            Mode::HarmonicMinor => &[0, 2, 3, 5, 7, 8, 11],
            Mode::MelodicMinor => &[0, 2, 3, 5, 7, 9, 11],
            Mode::PentatonicMajor => &[0, 2, 4, 7, 9],
            Mode::PentatonicMinor => &[0, 3, 5, 7, 10],
            Mode::Blues => &[0, 3, 5, 6, 7, 10],
            Mode::Chromatic => &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
        }
    }

    /// True for the modes whose tonic triad is minor.
    pub fn is_minor_flavored(self) -> bool {
        matches!(
            self,
            Mode::Minor
                | Mode::Dorian
                | Mode::Phrygian
                | Mode::HarmonicMinor
                | Mode::MelodicMinor
                | Mode::PentatonicMinor
                | Mode::Blues
        )
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Major => "major",
            Mode::Minor => "minor",
            Mode::Dorian => "dorian",
            Mode::Phrygian => "phrygian",
            Mode::Lydian => "lydian",
            Mode::Mixolydian => "mixolydian",
            Mode::Locrian => "locrian",
            Mode::HarmonicMinor => "harmonic_minor",
            Mode::MelodicMinor => "melodic_minor",
            Mode::PentatonicMajor => "pentatonic_major",
            Mode::PentatonicMinor => "pentatonic_minor",
            Mode::Blues => "blues",
            Mode::Chromatic => "chromatic",
        };
        f.write_str(name)
    }
}

impl FromStr for Mode {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "major" | "ionian" => Ok(Mode::Major),
            "minor" | "natural_minor" | "aeolian" => Ok(Mode::Minor),
            "dorian" => Ok(Mode::Dorian),
            "phrygian" => Ok(Mode::Phrygian),
            "lydian" => Ok(Mode::Lydian),
            "mixolydian" => Ok(Mode::Mixolydian),
            "locrian" => Ok(Mode::Locrian),
            "harmonic_minor" => Ok(Mode::HarmonicMinor),
            "melodic_minor" => Ok(Mode::MelodicMinor),
            "pentatonic_major" | "major_pentatonic" => Ok(Mode::PentatonicMajor),
            "pentatonic_minor" | "minor_pentatonic" => Ok(Mode::PentatonicMinor),
            "blues" => Ok(Mode::Blues),
            "chromatic" => Ok(Mode::Chromatic),
            _ => Err(TheoryError::UnknownMode(s.to_string())),
        }
    }
}

/// Pitch classes of `mode` rooted at `root_pc`, in ascending scale order.
pub fn scale(root_pc: u8, mode: Mode) -> Vec<u8> {
    mode.intervals()
        .iter()
        .map(|i| (root_pc + i) % 12)
        .collect()
}

/// Parse a note name: a letter A-G, optionally followed by `#` or `b`.
pub fn note_name_to_pitch_class(name: &str) -> Result<u8, TheoryError> {
    let mut chars = name.chars();
    let letter = chars
        .next()
        .ok_or_else(|| TheoryError::InvalidNoteName(name.to_string()))?;
    let base: i8 = match letter.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return Err(TheoryError::InvalidNoteName(name.to_string())),
    };
    let accidental: i8 = match chars.next() {
        None => 0,
        Some('#') => 1,
        Some('b') => -1,
        Some(_) => return Err(TheoryError::InvalidNoteName(name.to_string())),
    };
    if chars.next().is_some() {
        return Err(TheoryError::InvalidNoteName(name.to_string()));
    }
    Ok(((base + accidental).rem_euclid(12)) as u8)
}

/// Spell a pitch class, using flats for the conventional flat keys.
pub fn pitch_class_name(pc: u8) -> &'static str {
    let pc = (pc % 12) as usize;
    if FLAT_ROOTS.contains(&(pc as u8)) {
        NOTE_NAMES_FLAT[pc]
    } else {
        NOTE_NAMES_SHARP[pc]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn c_major_scale() {
        assert_eq!(scale(0, Mode::Major), vec![0, 2, 4, 5, 7, 9, 11]);
    }

    #[test]
    fn a_minor_is_relative_of_c_major() {
        let mut am: Vec<u8> = scale(9, Mode::Minor);
        let mut c: Vec<u8> = scale(0, Mode::Major);
        am.sort_unstable();
        c.sort_unstable();
        assert_eq!(am, c);
    }

    #[test]
    fn scale_wraps_pitch_classes() {
        // B major: B C# D# E F# G# A#
        assert_eq!(scale(11, Mode::Major), vec![11, 1, 3, 4, 6, 8, 10]);
    }

    #[test]
    fn note_names_parse() {
        assert_eq!(note_name_to_pitch_class("C").unwrap(), 0);
        assert_eq!(note_name_to_pitch_class("C#").unwrap(), 1);
        assert_eq!(note_name_to_pitch_class("Db").unwrap(), 1);
        assert_eq!(note_name_to_pitch_class("Cb").unwrap(), 11);
        assert_eq!(note_name_to_pitch_class("B#").unwrap(), 0);
        assert_eq!(note_name_to_pitch_class("a").unwrap(), 9);
    }

    #[test]
    fn bad_note_names_rejected() {
        for bad in ["", "H", "C##", "Cx", "#", "C-1"] {
            assert!(note_name_to_pitch_class(bad).is_err(), "{bad:?} should fail");
        }
    }

    #[test]
    fn flat_keys_spell_flat() {
        assert_eq!(pitch_class_name(1), "Db");
        assert_eq!(pitch_class_name(10), "Bb");
        assert_eq!(pitch_class_name(7), "G");
    }

    #[test]
    fn mode_parsing_roundtrips_display() {
        for mode in Mode::ALL {
            assert_eq!(mode.to_string().parse::<Mode>().unwrap(), mode);
        }
        assert!("klezmer".parse::<Mode>().is_err());
    }
}
