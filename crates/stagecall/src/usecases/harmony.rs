//! analyze_harmony: local key detection with optional progression
//! suggestions. Pure - no gateway involvement.

use music_theory::{chord_progression, detect_key, ProgressionStyle};
use serde::Deserialize;
use serde_json::json;

use crate::usecases::{settle, UseCaseResult};
use crate::{Session, ToolOutcome};

const PROGRESSION_BARS: usize = 4;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarmonyArgs {
    /// MIDI pitches, 0..127
    pub notes: Vec<i32>,
    #[serde(default)]
    pub suggest_progressions: bool,
    pub genre: Option<String>,
}

pub async fn execute(_session: &Session, args: HarmonyArgs) -> ToolOutcome {
    settle(run(args))
}

/// Pick a progression vocabulary from a loose genre string, falling back
/// to the detected mode's character.
fn style_for(genre: Option<&str>, minor_key: bool) -> ProgressionStyle {
    genre
        .and_then(|g| g.trim().parse::<ProgressionStyle>().ok())
        .unwrap_or(if minor_key { ProgressionStyle::Minor } else { ProgressionStyle::Pop })
}

fn run(args: HarmonyArgs) -> UseCaseResult {
    if args.notes.is_empty() {
        return Err(ToolOutcome::validation("notes must not be empty"));
    }
    let mut pitches = Vec::with_capacity(args.notes.len());
    for &n in &args.notes {
        if !(0..=127).contains(&n) {
            return Err(ToolOutcome::validation(format!("pitch {n} is outside 0..127")));
        }
        pitches.push(n as u8);
    }

    let candidates = detect_key(&pitches);
    let top = candidates
        .first()
        .cloned()
        .ok_or_else(|| ToolOutcome::validation("no key candidates for the given notes"))?;

    let progression = args.suggest_progressions.then(|| {
        let style = style_for(args.genre.as_deref(), top.mode.is_minor_flavored());
        chord_progression(top.root_pitch_class, top.mode, style, PROGRESSION_BARS)
    });

    let mut message =
        format!("Sounds like {} {} (confidence {:.2})", top.root, top.mode, top.confidence);
    if let Some(chords) = &progression {
        let symbols: Vec<&str> = chords.iter().map(|c| c.symbol.as_str()).collect();
        message.push_str(&format!("; try {}", symbols.join(" - ")));
    }

    Ok(ToolOutcome::ok(
        message,
        json!({
            "key": top,
            "candidates": candidates,
            "progression": progression,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use music_theory::Mode;

    #[test]
    fn style_falls_back_by_mode() {
        assert_eq!(style_for(None, false), ProgressionStyle::Pop);
        assert_eq!(style_for(None, true), ProgressionStyle::Minor);
        assert_eq!(style_for(Some("jazz"), false), ProgressionStyle::Jazz);
        assert_eq!(style_for(Some("polka"), true), ProgressionStyle::Minor);
    }

    #[test]
    fn c_major_scale_suggests_a_c_rooted_progression() {
        let outcome = run(HarmonyArgs {
            notes: vec![60, 62, 64, 65, 67, 69, 71],
            suggest_progressions: true,
            genre: Some("pop".into()),
        })
        .unwrap();

        let data = outcome.data.unwrap();
        assert_eq!(data["key"]["root"], "C");
        assert!(data["key"]["confidence"].as_f64().unwrap() >= 0.9);

        let first_chord = &data["progression"][0];
        let pitches: Vec<u8> = first_chord["pitches"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p.as_u64().unwrap() as u8)
            .collect();
        assert!(pitches.iter().any(|p| p % 12 == 0), "first chord should contain C");
    }

    #[test]
    fn out_of_range_pitch_is_rejected() {
        let err = run(HarmonyArgs { notes: vec![60, 128], suggest_progressions: false, genre: None })
            .unwrap_err();
        assert_eq!(err.error_code, Some(crate::ErrorCode::ValidationError));
    }

    #[test]
    fn minor_input_detects_minor_mode() {
        let outcome = run(HarmonyArgs {
            notes: vec![57, 59, 60, 62, 64, 65, 67],
            suggest_progressions: false,
            genre: None,
        })
        .unwrap();
        let data = outcome.data.unwrap();
        assert_eq!(data["key"]["root"], "A");
        assert_eq!(data["key"]["mode"], Mode::Minor.to_string());
    }
}
