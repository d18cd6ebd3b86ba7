//! view_control: session view selection.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::usecases::{settle, UseCaseResult};
use crate::{Session, ToolOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewAction {
    GetSelectedTrack,
    SelectTrack,
    GetSelectedScene,
    SelectScene,
    ShowClip,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewArgs {
    pub action: ViewAction,
    pub track_id: Option<i32>,
    pub scene_id: Option<i32>,
}

pub async fn execute(session: &Session, args: ViewArgs) -> ToolOutcome {
    settle(run(session, args).await)
}

async fn run(session: &Session, args: ViewArgs) -> UseCaseResult {
    let gateway = session.gateway().await?;

    match args.action {
        ViewAction::GetSelectedTrack => {
            let id = gateway.get_selected_track().await?;
            Ok(ToolOutcome::ok(format!("Track {id} is selected"), json!({ "track_id": id })))
        }
        ViewAction::SelectTrack => {
            let id = args
                .track_id
                .ok_or_else(|| ToolOutcome::validation("select_track requires track_id"))?;
            gateway.select_track(id).await?;
            Ok(ToolOutcome::ok(format!("Selected track {id}"), json!({ "track_id": id })))
        }
        ViewAction::GetSelectedScene => {
            let id = gateway.get_selected_scene().await?;
            Ok(ToolOutcome::ok(format!("Scene {id} is selected"), json!({ "scene_id": id })))
        }
        ViewAction::SelectScene => {
            let id = args
                .scene_id
                .ok_or_else(|| ToolOutcome::validation("select_scene requires scene_id"))?;
            gateway.select_scene(id).await?;
            Ok(ToolOutcome::ok(format!("Selected scene {id}"), json!({ "scene_id": id })))
        }
        ViewAction::ShowClip => {
            let (track_id, scene_id) = match (args.track_id, args.scene_id) {
                (Some(t), Some(s)) => (t, s),
                _ => {
                    return Err(ToolOutcome::validation(
                        "show_clip requires track_id and scene_id",
                    ))
                }
            };
            gateway.show_clip(track_id, scene_id).await?;
            Ok(ToolOutcome::ok(
                format!("Showing clip at track {track_id}, scene {scene_id}"),
                json!({ "track_id": track_id, "scene_id": scene_id }),
            ))
        }
    }
}
