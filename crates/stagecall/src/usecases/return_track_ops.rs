//! return_track_operations: the subset of track properties return tracks
//! expose.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::usecases::{settle, value_bool_or, value_f32, value_string, UseCaseResult};
use crate::{ErrorCode, Session, ToolOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnTrackAction {
    Get,
    SetName,
    SetVolume,
    SetPan,
    Mute,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReturnTrackArgs {
    pub action: ReturnTrackAction,
    pub return_track_id: Option<i32>,
    pub value: Option<Value>,
}

pub async fn execute(session: &Session, args: ReturnTrackArgs) -> ToolOutcome {
    settle(run(session, args).await)
}

async fn run(session: &Session, args: ReturnTrackArgs) -> UseCaseResult {
    let gateway = session.gateway().await?;
    let id = args
        .return_track_id
        .ok_or_else(|| ToolOutcome::validation("this action requires return_track_id"))?;

    match args.action {
        ReturnTrackAction::Get => {
            let count = gateway.get_num_return_tracks().await?;
            if id < 0 || id >= count {
                return Err(ToolOutcome::fail(
                    ErrorCode::TrackNotFound,
                    format!("return track {id} does not exist (the set has {count})"),
                ));
            }
            let track = gateway.return_track_info(id).await?;
            let name = track.name.clone().unwrap_or_default();
            Ok(ToolOutcome::ok(format!("Return track {id}: {name}"), json!({ "track": track })))
        }
        ReturnTrackAction::SetName => {
            let name = value_string(&args.value, "set_name")?;
            gateway.set_return_name(id, &name).await?;
            Ok(ToolOutcome::ok(
                format!("Renamed return track {id} to {name:?}"),
                json!({ "return_track_id": id, "name": name }),
            ))
        }
        ReturnTrackAction::SetVolume => {
            let volume = value_f32(&args.value, "set_volume")?;
            gateway.set_return_volume(id, volume).await?;
            Ok(ToolOutcome::ok(
                format!("Return track {id} volume set to {volume:.2}"),
                json!({ "return_track_id": id, "volume": volume }),
            ))
        }
        ReturnTrackAction::SetPan => {
            let pan = value_f32(&args.value, "set_pan")?;
            gateway.set_return_pan(id, pan).await?;
            Ok(ToolOutcome::ok(
                format!("Return track {id} pan set to {pan:.2}"),
                json!({ "return_track_id": id, "pan": pan }),
            ))
        }
        ReturnTrackAction::Mute => {
            let on = value_bool_or(&args.value, true, "mute")?;
            gateway.set_return_mute(id, on).await?;
            Ok(ToolOutcome::ok(
                format!("Return track {id} {}", if on { "muted" } else { "unmuted" }),
                json!({ "return_track_id": id, "mute": on }),
            ))
        }
    }
}
