//! Coverage-based key detection.
//!
//! Scores every (root, mode) pair by how well the candidate scale covers
//! the input pitch classes and how much of the scale the input actually
//! uses. The second term separates a pentatonic from the seven-note scale
//! containing it, and keeps `chromatic` from trivially winning everything.
//! The first sounded pitch gets a small tonic bonus, which is what breaks
//! the tie between relative keys (A minor vs C major).

use crate::scale::{pitch_class_name, scale, Mode};
use crate::KeyCandidate;

/// Weight of input coverage vs scale usage in the base score.
const COVERAGE_WEIGHT: f64 = 0.7;
/// Base score is scaled below 1.0 so the tonic bonus can order ties.
const BASE_SCALE: f64 = 0.95;
const TONIC_BONUS: f64 = 0.05;

/// Rank key hypotheses for a set of MIDI pitches.
///
/// Returns up to 12 candidates, best first. Confidence is in [0, 1];
/// a full scale played from its root scores 1.0. Ties prefer the earlier
/// mode in [`Mode::ALL`] order, then the lower root.
pub fn detect_key(pitches: &[u8]) -> Vec<KeyCandidate> {
    if pitches.is_empty() {
        return Vec::new();
    }

    let mut present = [false; 12];
    for p in pitches {
        present[(p % 12) as usize] = true;
    }
    let input_count = present.iter().filter(|x| **x).count() as f64;
    let tonic_pc = pitches[0] % 12;

    let mut candidates = Vec::with_capacity(12 * Mode::ALL.len());
    for root in 0..12u8 {
        for (mode_rank, mode) in Mode::ALL.into_iter().enumerate() {
            let member_pcs = scale(root, mode);
            let in_scale = member_pcs.iter().filter(|pc| present[**pc as usize]).count() as f64;

            let input_coverage = in_scale / input_count;
            let scale_usage = in_scale / member_pcs.len() as f64;
            let mut confidence = BASE_SCALE
                * (COVERAGE_WEIGHT * input_coverage + (1.0 - COVERAGE_WEIGHT) * scale_usage);
            if root == tonic_pc {
                confidence += TONIC_BONUS * input_coverage;
            }

            candidates.push((confidence, mode_rank, root, mode));
        }
    }

    candidates.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.1.cmp(&b.1))
            .then(a.2.cmp(&b.2))
    });

    candidates
        .into_iter()
        .take(12)
        .map(|(confidence, _, root, mode)| KeyCandidate {
            root: pitch_class_name(root).to_string(),
            root_pitch_class: root,
            mode,
            confidence: (confidence * 10_000.0).round() / 10_000.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn as_midi(root_pc: u8, mode: Mode) -> Vec<u8> {
        scale(root_pc, mode).iter().map(|pc| 60 + pc).collect()
    }

    #[test]
    fn empty_input_yields_no_candidates() {
        assert!(detect_key(&[]).is_empty());
    }

    #[test]
    fn c_major_scale_detected_with_high_confidence() {
        let top = &detect_key(&[60, 62, 64, 65, 67, 69, 71])[0];
        assert_eq!(top.root, "C");
        assert_eq!(top.mode, Mode::Major);
        assert!(top.confidence >= 0.9, "confidence {} should be >= 0.9", top.confidence);
    }

    #[test]
    fn every_mode_recovers_itself_from_its_own_scale() {
        for mode in Mode::ALL {
            for root in [0u8, 4, 9, 10] {
                let top = &detect_key(&as_midi(root, mode))[0];
                assert_eq!(
                    (top.root_pitch_class, top.mode),
                    (root, mode),
                    "scale({root}, {mode}) misdetected as {} {}",
                    top.root,
                    top.mode
                );
                assert!(top.confidence >= 0.9);
            }
        }
    }

    #[test]
    fn relative_major_ranks_just_below_the_minor_tonic() {
        let candidates = detect_key(&as_midi(9, Mode::Minor));
        assert_eq!((candidates[0].root_pitch_class, candidates[0].mode), (9, Mode::Minor));
        // C major shares every pitch class and should appear close behind.
        assert!(candidates
            .iter()
            .any(|c| c.root_pitch_class == 0 && c.mode == Mode::Major));
    }

    #[test]
    fn candidate_list_is_sorted_and_bounded() {
        let candidates = detect_key(&[60, 62, 64]);
        assert!(candidates.len() <= 12);
        for pair in candidates.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
    }

    #[test]
    fn octaves_collapse_to_pitch_classes() {
        let one_octave = detect_key(&[60, 64, 67]);
        let spread = detect_key(&[48, 76, 91]);
        assert_eq!(one_octave[0].root_pitch_class, spread[0].root_pitch_class);
        assert_eq!(one_octave[0].mode, spread[0].mode);
    }
}
