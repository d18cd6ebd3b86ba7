//! track_operations: per-track properties and set structure changes.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::usecases::{settle, value_bool_or, value_f32, value_i32, value_string, UseCaseResult};
use crate::{ErrorCode, Session, ToolOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackAction {
    Get,
    SetName,
    SetColor,
    SetVolume,
    SetPan,
    Mute,
    Solo,
    Arm,
    SetSend,
    CreateMidi,
    CreateAudio,
    CreateReturn,
    Delete,
    Duplicate,
    StopAllClips,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrackArgs {
    pub action: TrackAction,
    pub track_id: Option<i32>,
    pub value: Option<Value>,
    pub send_index: Option<i32>,
}

const ID_SHIFT_WARNING: &str = "track ids may have shifted; re-query before further track operations";

pub async fn execute(session: &Session, args: TrackArgs) -> ToolOutcome {
    settle(run(session, args).await)
}

fn require_track_id(args: &TrackArgs) -> Result<i32, ToolOutcome> {
    args.track_id.ok_or_else(|| ToolOutcome::validation("this action requires track_id"))
}

async fn run(session: &Session, args: TrackArgs) -> UseCaseResult {
    let gateway = session.gateway().await?;

    match args.action {
        TrackAction::Get => {
            let id = require_track_id(&args)?;
            let count = gateway.get_num_tracks().await?;
            if id < 0 || id >= count {
                return Err(ToolOutcome::fail(
                    ErrorCode::TrackNotFound,
                    format!("track {id} does not exist (the set has {count} tracks)"),
                ));
            }
            let track = gateway.track_info(id).await?;
            let name = track.name.clone().unwrap_or_default();
            Ok(ToolOutcome::ok(format!("Track {id}: {name}"), json!({ "track": track })))
        }
        TrackAction::SetName => {
            let id = require_track_id(&args)?;
            let name = value_string(&args.value, "set_name")?;
            gateway.set_track_name(id, &name).await?;
            Ok(ToolOutcome::ok(
                format!("Renamed track {id} to {name:?}"),
                json!({ "track_id": id, "name": name }),
            ))
        }
        TrackAction::SetColor => {
            let id = require_track_id(&args)?;
            let color = value_i32(&args.value, "set_color")?;
            gateway.set_track_color(id, color).await?;
            Ok(ToolOutcome::ok(
                format!("Recolored track {id}"),
                json!({ "track_id": id, "color": color }),
            ))
        }
        TrackAction::SetVolume => {
            let id = require_track_id(&args)?;
            let volume = value_f32(&args.value, "set_volume")?;
            gateway.set_track_volume(id, volume).await?;
            Ok(ToolOutcome::ok(
                format!("Track {id} volume set to {volume:.2}"),
                json!({ "track_id": id, "volume": volume }),
            ))
        }
        TrackAction::SetPan => {
            let id = require_track_id(&args)?;
            let pan = value_f32(&args.value, "set_pan")?;
            gateway.set_track_pan(id, pan).await?;
            Ok(ToolOutcome::ok(
                format!("Track {id} pan set to {pan:.2}"),
                json!({ "track_id": id, "pan": pan }),
            ))
        }
        TrackAction::Mute => {
            let id = require_track_id(&args)?;
            let on = value_bool_or(&args.value, true, "mute")?;
            gateway.set_track_mute(id, on).await?;
            Ok(ToolOutcome::ok(
                format!("Track {id} {}", if on { "muted" } else { "unmuted" }),
                json!({ "track_id": id, "mute": on }),
            ))
        }
        TrackAction::Solo => {
            let id = require_track_id(&args)?;
            let on = value_bool_or(&args.value, true, "solo")?;
            gateway.set_track_solo(id, on).await?;
            Ok(ToolOutcome::ok(
                format!("Track {id} solo {}", if on { "on" } else { "off" }),
                json!({ "track_id": id, "solo": on }),
            ))
        }
        TrackAction::Arm => {
            let id = require_track_id(&args)?;
            let on = value_bool_or(&args.value, true, "arm")?;
            gateway.set_track_arm(id, on).await?;
            Ok(ToolOutcome::ok(
                format!("Track {id} {}", if on { "armed" } else { "disarmed" }),
                json!({ "track_id": id, "arm": on }),
            ))
        }
        TrackAction::SetSend => {
            let id = require_track_id(&args)?;
            let send_index = args
                .send_index
                .ok_or_else(|| ToolOutcome::validation("set_send requires send_index"))?;
            let level = value_f32(&args.value, "set_send")?;
            gateway.set_track_send(id, send_index, level).await?;
            Ok(ToolOutcome::ok(
                format!("Track {id} send {send_index} set to {level:.2}"),
                json!({ "track_id": id, "send_index": send_index, "level": level }),
            ))
        }
        TrackAction::CreateMidi => {
            let index = args.track_id.unwrap_or(-1);
            gateway.create_midi_track(index).await?;
            Ok(ToolOutcome::ok(
                format!("Created MIDI track ({}); {ID_SHIFT_WARNING}", position_text(index)),
                json!({ "index": index }),
            ))
        }
        TrackAction::CreateAudio => {
            let index = args.track_id.unwrap_or(-1);
            gateway.create_audio_track(index).await?;
            Ok(ToolOutcome::ok(
                format!("Created audio track ({}); {ID_SHIFT_WARNING}", position_text(index)),
                json!({ "index": index }),
            ))
        }
        TrackAction::CreateReturn => {
            gateway.create_return_track().await?;
            Ok(ToolOutcome::ok("Created return track", json!({})))
        }
        TrackAction::Delete => {
            let id = require_track_id(&args)?;
            gateway.delete_track(id).await?;
            Ok(ToolOutcome::ok(
                format!("Deleted track {id}; {ID_SHIFT_WARNING}"),
                json!({ "track_id": id }),
            ))
        }
        TrackAction::Duplicate => {
            let id = require_track_id(&args)?;
            gateway.duplicate_track(id).await?;
            Ok(ToolOutcome::ok(
                format!("Duplicated track {id}; {ID_SHIFT_WARNING}"),
                json!({ "track_id": id }),
            ))
        }
        TrackAction::StopAllClips => {
            let id = require_track_id(&args)?;
            gateway.stop_track_clips(id).await?;
            Ok(ToolOutcome::ok(
                format!("Stopped all clips on track {id}"),
                json!({ "track_id": id }),
            ))
        }
    }
}

fn position_text(index: i32) -> String {
    if index == -1 {
        "appended at end".to_string()
    } else {
        format!("at index {index}")
    }
}
