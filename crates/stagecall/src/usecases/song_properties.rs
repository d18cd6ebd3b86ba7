//! song_properties: read the song scalars or set one of them.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::usecases::{settle, value_bool_or, value_f32, UseCaseResult};
use crate::{Session, ToolOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SongAction {
    Get,
    SetTempo,
    SetSwing,
    SetMetronome,
    SetOverdub,
    SetLoop,
    SetLoopStart,
    SetLoopLength,
    SetSignature,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SongPropertiesArgs {
    pub action: SongAction,
    pub value: Option<Value>,
    pub numerator: Option<i32>,
    pub denominator: Option<i32>,
}

pub async fn execute(session: &Session, args: SongPropertiesArgs) -> ToolOutcome {
    settle(run(session, args).await)
}

async fn run(session: &Session, args: SongPropertiesArgs) -> UseCaseResult {
    let gateway = session.gateway().await?;

    match args.action {
        SongAction::Get => {
            // Tempo is the root query; the rest degrade individually.
            let tempo = gateway.get_tempo().await?;
            let (signature, metronome, overdub, loop_region, swing, is_playing) = tokio::join!(
                gateway.get_time_signature(),
                gateway.get_metronome(),
                gateway.get_overdub(),
                gateway.get_loop_region(),
                gateway.get_swing(),
                gateway.get_is_playing(),
            );

            let mut partial_failures = Vec::new();
            let mut note = |field: &str, err: &livegate::GatewayError| {
                partial_failures.push(format!("{field}: {err}"));
            };
            let signature = signature.map_err(|e| note("time_signature", &e)).ok();
            let metronome = metronome.map_err(|e| note("metronome", &e)).ok();
            let overdub = overdub.map_err(|e| note("overdub", &e)).ok();
            let loop_region = loop_region.map_err(|e| note("loop", &e)).ok();
            let swing = swing.map_err(|e| note("swing", &e)).ok();
            let is_playing = is_playing.map_err(|e| note("is_playing", &e)).ok();

            let signature_text = signature
                .map(|s| format!("{}/{}", s.numerator, s.denominator))
                .unwrap_or_else(|| "?/?".to_string());
            Ok(ToolOutcome::ok(
                format!("Song at {tempo:.1} BPM, {signature_text}"),
                json!({
                    "tempo": tempo,
                    "time_signature": signature,
                    "metronome": metronome,
                    "overdub": overdub,
                    "loop": loop_region,
                    "swing": swing,
                    "is_playing": is_playing,
                    "partial_failures": partial_failures,
                }),
            ))
        }
        SongAction::SetTempo => {
            let bpm = value_f32(&args.value, "set_tempo")?;
            gateway.set_tempo(bpm).await?;
            Ok(ToolOutcome::ok(format!("Tempo set to {bpm:.1} BPM"), json!({ "tempo": bpm })))
        }
        SongAction::SetSwing => {
            let amount = value_f32(&args.value, "set_swing")?;
            gateway.set_swing(amount).await?;
            Ok(ToolOutcome::ok(format!("Swing set to {amount:.2}"), json!({ "swing": amount })))
        }
        SongAction::SetMetronome => {
            let on = value_bool_or(&args.value, true, "set_metronome")?;
            gateway.set_metronome(on).await?;
            Ok(ToolOutcome::ok(
                format!("Metronome {}", if on { "on" } else { "off" }),
                json!({ "metronome": on }),
            ))
        }
        SongAction::SetOverdub => {
            let on = value_bool_or(&args.value, true, "set_overdub")?;
            gateway.set_overdub(on).await?;
            Ok(ToolOutcome::ok(
                format!("Overdub {}", if on { "on" } else { "off" }),
                json!({ "overdub": on }),
            ))
        }
        SongAction::SetLoop => {
            let on = value_bool_or(&args.value, true, "set_loop")?;
            gateway.set_loop_enabled(on).await?;
            Ok(ToolOutcome::ok(
                format!("Arrangement loop {}", if on { "enabled" } else { "disabled" }),
                json!({ "loop": on }),
            ))
        }
        SongAction::SetLoopStart => {
            let beats = value_f32(&args.value, "set_loop_start")?;
            gateway.set_loop_start(beats).await?;
            Ok(ToolOutcome::ok(
                format!("Loop start set to beat {beats}"),
                json!({ "loop_start": beats }),
            ))
        }
        SongAction::SetLoopLength => {
            let beats = value_f32(&args.value, "set_loop_length")?;
            gateway.set_loop_length(beats).await?;
            Ok(ToolOutcome::ok(
                format!("Loop length set to {beats} beats"),
                json!({ "loop_length": beats }),
            ))
        }
        SongAction::SetSignature => {
            let (numerator, denominator) = match (args.numerator, args.denominator) {
                (Some(n), Some(d)) => (n, d),
                _ => {
                    return Err(ToolOutcome::validation(
                        "set_signature requires numerator and denominator",
                    ))
                }
            };
            gateway.set_signature(numerator, denominator).await?;
            Ok(ToolOutcome::ok(
                format!("Time signature set to {numerator}/{denominator}"),
                json!({ "numerator": numerator, "denominator": denominator }),
            ))
        }
    }
}
