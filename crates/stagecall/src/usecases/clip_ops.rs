//! clip_operations: slots, clips, launch, and notes.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::usecases::{settle, value_f32, value_i32, value_string, UseCaseResult};
use crate::{ErrorCode, Session, ToolOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClipAction {
    GetInfo,
    GetName,
    SetName,
    GetLength,
    SetLoopStart,
    SetLoopEnd,
    SetColor,
    Fire,
    Stop,
    Create,
    Delete,
    HasClip,
    GetNotes,
    RemoveNotes,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClipArgs {
    pub action: ClipAction,
    pub track_id: i32,
    pub scene_id: i32,
    pub value: Option<Value>,
    /// remove_notes: pitch of the notes to remove (all notes when absent)
    pub pitch: Option<i32>,
    /// remove_notes: start beat of the notes to remove
    pub start: Option<f64>,
}

const DEFAULT_CLIP_LENGTH: f32 = 4.0;

pub async fn execute(session: &Session, args: ClipArgs) -> ToolOutcome {
    settle(run(session, args).await)
}

/// Fail with CLIP_NOT_FOUND unless the slot holds a clip.
async fn require_clip(
    gateway: &livegate::LiveGateway,
    track_id: i32,
    scene_id: i32,
) -> Result<(), ToolOutcome> {
    let has_clip = gateway.has_clip(track_id, scene_id).await?;
    if has_clip {
        Ok(())
    } else {
        Err(ToolOutcome::fail(
            ErrorCode::ClipNotFound,
            format!("no clip at track {track_id}, scene {scene_id}"),
        ))
    }
}

async fn run(session: &Session, args: ClipArgs) -> UseCaseResult {
    let gateway = session.gateway().await?;
    let (track_id, scene_id) = (args.track_id, args.scene_id);
    let slot = format!("track {track_id}, scene {scene_id}");

    match args.action {
        ClipAction::HasClip => {
            let has_clip = gateway.has_clip(track_id, scene_id).await?;
            Ok(ToolOutcome::ok(
                format!("{} clip at {slot}", if has_clip { "Found a" } else { "No" }),
                json!({ "has_clip": has_clip }),
            ))
        }
        ClipAction::GetInfo => {
            require_clip(&gateway, track_id, scene_id).await?;
            let clip = gateway.clip_info(track_id, scene_id).await?;
            let name = clip.name.clone().unwrap_or_default();
            Ok(ToolOutcome::ok(format!("Clip {name:?} at {slot}"), json!({ "clip": clip })))
        }
        ClipAction::GetName => {
            require_clip(&gateway, track_id, scene_id).await?;
            let name = gateway.get_clip_name(track_id, scene_id).await?;
            Ok(ToolOutcome::ok(format!("Clip at {slot} is named {name:?}"), json!({ "name": name })))
        }
        ClipAction::SetName => {
            let name = value_string(&args.value, "set_name")?;
            require_clip(&gateway, track_id, scene_id).await?;
            gateway.set_clip_name(track_id, scene_id, &name).await?;
            Ok(ToolOutcome::ok(format!("Renamed clip at {slot} to {name:?}"), json!({ "name": name })))
        }
        ClipAction::GetLength => {
            require_clip(&gateway, track_id, scene_id).await?;
            let length = gateway.get_clip_length(track_id, scene_id).await?;
            Ok(ToolOutcome::ok(
                format!("Clip at {slot} is {length} beats long"),
                json!({ "length": length }),
            ))
        }
        ClipAction::SetLoopStart => {
            let beats = value_f32(&args.value, "set_loop_start")?;
            require_clip(&gateway, track_id, scene_id).await?;
            gateway.set_clip_loop_start(track_id, scene_id, beats).await?;
            Ok(ToolOutcome::ok(
                format!("Clip loop start set to beat {beats}"),
                json!({ "loop_start": beats }),
            ))
        }
        ClipAction::SetLoopEnd => {
            let beats = value_f32(&args.value, "set_loop_end")?;
            require_clip(&gateway, track_id, scene_id).await?;
            gateway.set_clip_loop_end(track_id, scene_id, beats).await?;
            Ok(ToolOutcome::ok(
                format!("Clip loop end set to beat {beats}"),
                json!({ "loop_end": beats }),
            ))
        }
        ClipAction::SetColor => {
            let color = value_i32(&args.value, "set_color")?;
            require_clip(&gateway, track_id, scene_id).await?;
            gateway.set_clip_color(track_id, scene_id, color).await?;
            Ok(ToolOutcome::ok(format!("Recolored clip at {slot}"), json!({ "color": color })))
        }
        ClipAction::Fire => {
            gateway.fire_clip(track_id, scene_id).await?;
            Ok(ToolOutcome::ok(format!("Fired clip at {slot}"), json!({})))
        }
        ClipAction::Stop => {
            gateway.stop_clip(track_id, scene_id).await?;
            Ok(ToolOutcome::ok(format!("Stopped clip at {slot}"), json!({})))
        }
        ClipAction::Create => {
            let length = match args.value {
                Some(_) => value_f32(&args.value, "create")?,
                None => DEFAULT_CLIP_LENGTH,
            };
            if gateway.has_clip(track_id, scene_id).await? {
                return Err(ToolOutcome::validation(format!(
                    "a clip already exists at {slot}; delete it first"
                )));
            }
            gateway.create_clip(track_id, scene_id, length).await?;
            Ok(ToolOutcome::ok(
                format!("Created a {length}-beat clip at {slot}"),
                json!({ "length": length }),
            ))
        }
        ClipAction::Delete => {
            require_clip(&gateway, track_id, scene_id).await?;
            gateway.delete_clip(track_id, scene_id).await?;
            Ok(ToolOutcome::ok(format!("Deleted clip at {slot}"), json!({})))
        }
        ClipAction::GetNotes => {
            require_clip(&gateway, track_id, scene_id).await?;
            let notes = gateway.get_clip_notes(track_id, scene_id).await?;
            Ok(ToolOutcome::ok(
                format!("Clip at {slot} holds {} notes", notes.len()),
                json!({ "notes": notes, "count": notes.len() }),
            ))
        }
        ClipAction::RemoveNotes => {
            require_clip(&gateway, track_id, scene_id).await?;
            match (args.pitch, args.start) {
                (Some(pitch), Some(start)) => {
                    gateway.remove_notes(track_id, scene_id, pitch, start as f32).await?;
                    Ok(ToolOutcome::ok(
                        format!("Removed notes at pitch {pitch}, beat {start} from {slot}"),
                        json!({ "pitch": pitch, "start": start }),
                    ))
                }
                (None, None) => {
                    gateway.remove_all_notes(track_id, scene_id).await?;
                    Ok(ToolOutcome::ok(format!("Cleared all notes in clip at {slot}"), json!({})))
                }
                _ => Err(ToolOutcome::validation(
                    "remove_notes needs both pitch and start, or neither to clear the clip",
                )),
            }
        }
    }
}
