//! One module per tool.
//!
//! Every use case follows the same pipeline: validate the request, check
//! connectivity if the operation needs the wire, issue gateway calls, and
//! assemble a [`ToolOutcome`]. Gateway errors never escape unwrapped.
//!
//! Implementation convention: the public `execute` wraps an inner `run`
//! returning `Result<ToolOutcome, ToolOutcome>`, so validation and
//! gateway failures can use `?`.

pub mod add_notes;
pub mod clip_ops;
pub mod connect;
pub mod device_ops;
pub mod harmony;
pub mod return_track_ops;
pub mod scene_ops;
pub mod song_info;
pub mod song_properties;
pub mod tempo;
pub mod track_ops;
pub mod transport_control;
pub mod view_control;

use serde_json::Value;

use crate::ToolOutcome;

type UseCaseResult = Result<ToolOutcome, ToolOutcome>;

fn settle(result: UseCaseResult) -> ToolOutcome {
    result.unwrap_or_else(|failure| failure)
}

// === `value` argument coercion ===
//
// The multi-purpose tools take a loosely-typed `value`; each action
// narrows it here and rejects with VALIDATION_ERROR when it cannot.

fn require_value<'a>(value: &'a Option<Value>, action: &str) -> Result<&'a Value, ToolOutcome> {
    value
        .as_ref()
        .ok_or_else(|| ToolOutcome::validation(format!("{action} requires a value argument")))
}

fn value_f32(value: &Option<Value>, action: &str) -> Result<f32, ToolOutcome> {
    require_value(value, action)?
        .as_f64()
        .map(|v| v as f32)
        .ok_or_else(|| ToolOutcome::validation(format!("{action} requires a numeric value")))
}

fn value_i32(value: &Option<Value>, action: &str) -> Result<i32, ToolOutcome> {
    require_value(value, action)?
        .as_i64()
        .map(|v| v as i32)
        .ok_or_else(|| ToolOutcome::validation(format!("{action} requires an integer value")))
}

fn value_string(value: &Option<Value>, action: &str) -> Result<String, ToolOutcome> {
    require_value(value, action)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ToolOutcome::validation(format!("{action} requires a string value")))
}

/// Booleans arrive as JSON bools or as 0/1, defaulting to `true` when the
/// action itself implies engagement (mute, solo, arm).
fn value_bool_or(value: &Option<Value>, default: bool, action: &str) -> Result<bool, ToolOutcome> {
    match value {
        None => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(v) => v
            .as_i64()
            .map(|n| n != 0)
            .ok_or_else(|| ToolOutcome::validation(format!("{action} requires a boolean value"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_value_coercion() {
        assert_eq!(value_f32(&Some(json!(0.75)), "set_volume").unwrap(), 0.75);
        assert_eq!(value_f32(&Some(json!(120)), "set_tempo").unwrap(), 120.0);
        assert!(value_f32(&Some(json!("x")), "set_tempo").is_err());
        assert!(value_f32(&None, "set_tempo").is_err());
    }

    #[test]
    fn bool_value_accepts_zero_one() {
        assert!(value_bool_or(&Some(json!(1)), false, "mute").unwrap());
        assert!(!value_bool_or(&Some(json!(0)), true, "mute").unwrap());
        assert!(value_bool_or(&None, true, "mute").unwrap());
        assert!(value_bool_or(&Some(json!("yes")), true, "mute").is_err());
    }
}
