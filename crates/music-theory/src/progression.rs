//! Style-based chord progression suggestions.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::scale::{pitch_class_name, scale, Mode};
use crate::{Chord, TheoryError};

/// Progression vocabulary. Degrees are 0-based scale-degree indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionStyle {
    Pop,
    Jazz,
    Blues,
    Minor,
    Folk,
}

impl ProgressionStyle {
    /// The repeating degree pattern for this style.
    fn degrees(self) -> &'static [usize] {
        match self {
            // I-V-vi-IV
            ProgressionStyle::Pop => &[0, 4, 5, 3],
            // ii-V-I cycles
            ProgressionStyle::Jazz => &[1, 4, 0],
            // 12-bar blues
            ProgressionStyle::Blues => &[0, 0, 0, 0, 3, 3, 0, 0, 4, 3, 0, 4],
            // i-iv-V-i (major dominant borrowed from harmonic minor)
            ProgressionStyle::Minor => &[0, 3, 4, 0],
            // I-IV-V
            ProgressionStyle::Folk => &[0, 3, 4],
        }
    }

    /// Styles with a raised dominant third even in minor keys.
    fn wants_major_dominant(self) -> bool {
        matches!(self, ProgressionStyle::Minor | ProgressionStyle::Blues)
    }
}

impl FromStr for ProgressionStyle {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pop" => Ok(ProgressionStyle::Pop),
            "jazz" => Ok(ProgressionStyle::Jazz),
            "blues" => Ok(ProgressionStyle::Blues),
            "minor" => Ok(ProgressionStyle::Minor),
            "folk" => Ok(ProgressionStyle::Folk),
            _ => Err(TheoryError::UnknownStyle(s.to_string())),
        }
    }
}

const ROMAN: [&str; 7] = ["I", "II", "III", "IV", "V", "VI", "VII"];

/// Build `bars` chords from the degree pattern of `style` in the key of
/// `root_pc`/`mode`. Pitches are triads rooted in octave 4.
pub fn chord_progression(root_pc: u8, mode: Mode, style: ProgressionStyle, bars: usize) -> Vec<Chord> {
    let member_pcs = scale(root_pc % 12, mode);
    let pattern = style.degrees();

    (0..bars)
        .map(|bar| {
            let degree = pattern[bar % pattern.len()] % member_pcs.len();
            build_triad(&member_pcs, degree, style)
        })
        .collect()
}

fn build_triad(member_pcs: &[u8], degree: usize, style: ProgressionStyle) -> Chord {
    let len = member_pcs.len();
    let chord_root = member_pcs[degree];
    let mut third = member_pcs[(degree + 2) % len];
    let fifth = member_pcs[(degree + 4) % len];

    // The dominant of a minor-key cadence is raised to major.
    let is_dominant = degree == 4 % len;
    if is_dominant && style.wants_major_dominant() && interval_from(chord_root, third) == 3 {
        third = (third + 1) % 12;
    }

    let quality = match interval_from(chord_root, third) {
        4 => Quality::Major,
        3 if interval_from(chord_root, fifth) == 6 => Quality::Diminished,
        3 => Quality::Minor,
        _ => Quality::Other,
    };

    let numeral = ROMAN[degree.min(ROMAN.len() - 1)];
    let degree_label = match quality {
        Quality::Major | Quality::Other => numeral.to_string(),
        Quality::Minor => numeral.to_ascii_lowercase(),
        Quality::Diminished => format!("{}°", numeral.to_ascii_lowercase()),
    };
    let symbol = match quality {
        Quality::Major | Quality::Other => pitch_class_name(chord_root).to_string(),
        Quality::Minor => format!("{}m", pitch_class_name(chord_root)),
        Quality::Diminished => format!("{}dim", pitch_class_name(chord_root)),
    };

    // Octave 4 root, upper voices folded above it.
    let root_midi = 60 + chord_root;
    let mut pitches = vec![root_midi];
    for pc in [third, fifth] {
        pitches.push(60 + pc + if pc < chord_root { 12 } else { 0 });
    }

    Chord { degree: degree_label, symbol, root_pitch_class: chord_root, pitches }
}

enum Quality {
    Major,
    Minor,
    Diminished,
    Other,
}

fn interval_from(root: u8, other: u8) -> u8 {
    (other + 12 - root) % 12
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pop_in_c_major_is_one_five_six_four() {
        let chords = chord_progression(0, Mode::Major, ProgressionStyle::Pop, 4);
        let symbols: Vec<&str> = chords.iter().map(|c| c.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["C", "G", "Am", "F"]);
        assert_eq!(chords[0].degree, "I");
        assert_eq!(chords[2].degree, "vi");
    }

    #[test]
    fn first_chord_contains_the_key_root() {
        let chords = chord_progression(0, Mode::Major, ProgressionStyle::Pop, 4);
        assert!(chords[0].pitches.iter().any(|p| p % 12 == 0));
    }

    #[test]
    fn jazz_cycles_two_five_one() {
        let chords = chord_progression(0, Mode::Major, ProgressionStyle::Jazz, 6);
        let symbols: Vec<&str> = chords.iter().map(|c| c.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["Dm", "G", "C", "Dm", "G", "C"]);
    }

    #[test]
    fn blues_is_twelve_bars() {
        let chords = chord_progression(9, Mode::Major, ProgressionStyle::Blues, 12);
        assert_eq!(chords.len(), 12);
        assert_eq!(chords[0].symbol, "A");
        assert_eq!(chords[4].symbol, "D");
        assert_eq!(chords[8].symbol, "E");
    }

    #[test]
    fn minor_progression_raises_the_dominant() {
        let chords = chord_progression(9, Mode::Minor, ProgressionStyle::Minor, 4);
        let symbols: Vec<&str> = chords.iter().map(|c| c.symbol.as_str()).collect();
        // i-iv-V-i in A minor: Am Dm E Am (E major, not Em)
        assert_eq!(symbols, vec!["Am", "Dm", "E", "Am"]);
        assert_eq!(chords[2].degree, "V");
    }

    #[test]
    fn bars_extend_by_cycling() {
        let chords = chord_progression(0, Mode::Major, ProgressionStyle::Folk, 7);
        assert_eq!(chords.len(), 7);
        assert_eq!(chords[3].symbol, chords[0].symbol);
    }

    #[test]
    fn triads_are_ascending() {
        for chord in chord_progression(7, Mode::Major, ProgressionStyle::Pop, 4) {
            for pair in chord.pitches.windows(2) {
                assert!(pair[0] < pair[1], "{:?} not ascending", chord.pitches);
            }
        }
    }
}
