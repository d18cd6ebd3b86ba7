//! Domain value ranges enforced before anything reaches the wire.
//!
//! The remote script accepts out-of-range values silently or clamps them;
//! neither is acceptable here, so every mutating call validates first and
//! invalid input never produces a packet.

use crate::Note;
use thiserror::Error;

pub const TEMPO_MIN: f32 = 20.0;
pub const TEMPO_MAX: f32 = 999.0;

/// A value failed domain validation. Carries the field name so tool
/// results can point at the offending argument.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct InvalidValue {
    pub field: &'static str,
    pub message: String,
}

impl InvalidValue {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self { field, message: message.into() }
    }
}

pub fn check_tempo(bpm: f32) -> Result<(), InvalidValue> {
    if !bpm.is_finite() || !(TEMPO_MIN..=TEMPO_MAX).contains(&bpm) {
        return Err(InvalidValue::new(
            "tempo",
            format!("{bpm} is outside {TEMPO_MIN}..{TEMPO_MAX} BPM"),
        ));
    }
    Ok(())
}

/// Volume, send level, master volume: 0..=1.
pub fn check_unit(field: &'static str, v: f32) -> Result<(), InvalidValue> {
    if !v.is_finite() || !(0.0..=1.0).contains(&v) {
        return Err(InvalidValue::new(field, format!("{v} is outside 0..1")));
    }
    Ok(())
}

pub fn check_pan(v: f32) -> Result<(), InvalidValue> {
    if !v.is_finite() || !(-1.0..=1.0).contains(&v) {
        return Err(InvalidValue::new("pan", format!("{v} is outside -1..1")));
    }
    Ok(())
}

pub fn check_swing(v: f32) -> Result<(), InvalidValue> {
    check_unit("swing", v)
}

pub fn check_signature(numerator: i32, denominator: i32) -> Result<(), InvalidValue> {
    if !(1..=99).contains(&numerator) {
        return Err(InvalidValue::new("signature_numerator", format!("{numerator} is outside 1..99")));
    }
    if !(1..=99).contains(&denominator) {
        return Err(InvalidValue::new("signature_denominator", format!("{denominator} is outside 1..99")));
    }
    Ok(())
}

pub fn check_pitch(pitch: i32) -> Result<(), InvalidValue> {
    if !(0..=127).contains(&pitch) {
        return Err(InvalidValue::new("pitch", format!("{pitch} is outside 0..127")));
    }
    Ok(())
}

/// Velocity 0 is a note-off in disguise; the remote script drops such
/// notes, so it is rejected here instead.
pub fn check_velocity(velocity: i32) -> Result<(), InvalidValue> {
    if !(1..=127).contains(&velocity) {
        return Err(InvalidValue::new("velocity", format!("{velocity} is outside 1..127")));
    }
    Ok(())
}

pub fn check_note(note: &Note) -> Result<(), InvalidValue> {
    check_pitch(note.pitch as i32)?;
    check_velocity(note.velocity as i32)?;
    if !note.start.is_finite() || note.start < 0.0 {
        return Err(InvalidValue::new("start", format!("{} must be >= 0 beats", note.start)));
    }
    if !note.duration.is_finite() || note.duration <= 0.0 {
        return Err(InvalidValue::new("duration", format!("{} must be > 0 beats", note.duration)));
    }
    Ok(())
}

pub fn check_loop_bounds(start: f64, end: f64) -> Result<(), InvalidValue> {
    if !start.is_finite() || start < 0.0 {
        return Err(InvalidValue::new("loop_start", format!("{start} must be >= 0 beats")));
    }
    if !end.is_finite() || end <= start {
        return Err(InvalidValue::new("loop_end", format!("{end} must be > loop_start ({start})")));
    }
    Ok(())
}

/// Track/scene/device indices: non-negative, with -1 allowed on creation
/// addresses meaning "append at end".
pub fn check_track_index(field: &'static str, id: i32, allow_append: bool) -> Result<(), InvalidValue> {
    if id >= 0 || (allow_append && id == -1) {
        Ok(())
    } else {
        Err(InvalidValue::new(field, format!("{id} is not a valid index")))
    }
}

pub fn check_send_index(index: i32) -> Result<(), InvalidValue> {
    check_track_index("send_index", index, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tempo_bounds_are_inclusive() {
        assert!(check_tempo(20.0).is_ok());
        assert!(check_tempo(999.0).is_ok());
        assert!(check_tempo(19.99).is_err());
        assert!(check_tempo(999.01).is_err());
        assert!(check_tempo(f32::NAN).is_err());
    }

    #[test]
    fn zero_velocity_rejected() {
        assert!(check_velocity(0).is_err());
        assert!(check_velocity(1).is_ok());
        assert!(check_velocity(127).is_ok());
        assert!(check_velocity(128).is_err());
    }

    #[test]
    fn loop_end_must_exceed_start() {
        assert!(check_loop_bounds(0.0, 4.0).is_ok());
        assert!(check_loop_bounds(4.0, 4.0).is_err());
        assert!(check_loop_bounds(-1.0, 4.0).is_err());
    }

    #[test]
    fn append_index_only_where_allowed() {
        assert!(check_track_index("track_id", -1, true).is_ok());
        assert!(check_track_index("track_id", -1, false).is_err());
        assert!(check_track_index("track_id", 0, false).is_ok());
        assert!(check_track_index("track_id", -2, true).is_err());
    }

    #[test]
    fn invalid_value_names_the_field() {
        let err = check_pan(1.5).unwrap_err();
        assert_eq!(err.field, "pan");
        assert!(err.to_string().contains("pan"));
    }
}
