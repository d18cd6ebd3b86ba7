//! analyze_tempo: pure local tempo suggestion.

use live_model::{TEMPO_MAX, TEMPO_MIN};
use music_theory::tempo_suggestion;
use serde::Deserialize;
use serde_json::json;

use crate::usecases::{settle, UseCaseResult};
use crate::{Session, ToolOutcome};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TempoArgs {
    pub current_bpm: f32,
    pub genre: String,
    pub energy_level: f32,
}

pub async fn execute(_session: &Session, args: TempoArgs) -> ToolOutcome {
    settle(run(args))
}

fn run(args: TempoArgs) -> UseCaseResult {
    if !args.current_bpm.is_finite() || !(TEMPO_MIN..=TEMPO_MAX).contains(&args.current_bpm) {
        return Err(ToolOutcome::validation(format!(
            "current_bpm {} is outside {TEMPO_MIN}..{TEMPO_MAX}",
            args.current_bpm
        )));
    }
    if !args.energy_level.is_finite() || !(0.0..=1.0).contains(&args.energy_level) {
        return Err(ToolOutcome::validation(format!(
            "energy_level {} is outside 0..1",
            args.energy_level
        )));
    }

    let suggestion = tempo_suggestion(args.current_bpm, &args.genre, args.energy_level);
    let direction = if suggestion.suggested_bpm > args.current_bpm {
        "faster than"
    } else if suggestion.suggested_bpm < args.current_bpm {
        "slower than"
    } else {
        "matching"
    };
    Ok(ToolOutcome::ok(
        format!(
            "{} at {} energy wants {:.1} BPM ({direction} the current {:.1})",
            suggestion.genre, suggestion.energy_level, suggestion.suggested_bpm, args.current_bpm
        ),
        json!({ "suggestion": suggestion }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggestion_lands_in_the_genre_range() {
        let outcome = run(TempoArgs {
            current_bpm: 120.0,
            genre: "techno".into(),
            energy_level: 0.5,
        })
        .unwrap();
        let data = outcome.data.unwrap();
        let bpm = data["suggestion"]["suggested_bpm"].as_f64().unwrap();
        assert!((125.0..=150.0).contains(&bpm));
    }

    #[test]
    fn energy_outside_unit_range_is_rejected() {
        let err = run(TempoArgs { current_bpm: 120.0, genre: "pop".into(), energy_level: 1.5 })
            .unwrap_err();
        assert_eq!(err.error_code, Some(crate::ErrorCode::ValidationError));
    }

    #[test]
    fn absurd_bpm_is_rejected() {
        let err = run(TempoArgs { current_bpm: 5.0, genre: "pop".into(), energy_level: 0.5 })
            .unwrap_err();
        assert_eq!(err.error_code, Some(crate::ErrorCode::ValidationError));
    }
}
