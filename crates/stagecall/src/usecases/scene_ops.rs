//! scene_operations: launch and scene properties.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::usecases::{settle, value_f32, value_i32, value_string, UseCaseResult};
use crate::{ErrorCode, Session, ToolOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneAction {
    Get,
    Fire,
    Create,
    Delete,
    Duplicate,
    Rename,
    Recolor,
    SetTempo,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneArgs {
    pub action: SceneAction,
    pub scene_id: Option<i32>,
    pub value: Option<Value>,
}

const ID_SHIFT_WARNING: &str = "scene ids may have shifted; re-query before further scene operations";

pub async fn execute(session: &Session, args: SceneArgs) -> ToolOutcome {
    settle(run(session, args).await)
}

fn require_scene_id(args: &SceneArgs) -> Result<i32, ToolOutcome> {
    args.scene_id.ok_or_else(|| ToolOutcome::validation("this action requires scene_id"))
}

async fn run(session: &Session, args: SceneArgs) -> UseCaseResult {
    let gateway = session.gateway().await?;

    match args.action {
        SceneAction::Get => {
            let id = require_scene_id(&args)?;
            let count = gateway.get_num_scenes().await?;
            if id < 0 || id >= count {
                return Err(ToolOutcome::fail(
                    ErrorCode::TrackNotFound,
                    format!("scene {id} does not exist (the set has {count} scenes)"),
                ));
            }
            let scene = gateway.scene_info(id).await?;
            let name = scene.name.clone().unwrap_or_default();
            Ok(ToolOutcome::ok(format!("Scene {id}: {name}"), json!({ "scene": scene })))
        }
        SceneAction::Fire => {
            let id = require_scene_id(&args)?;
            gateway.fire_scene(id).await?;
            Ok(ToolOutcome::ok(format!("Fired scene {id}"), json!({ "scene_id": id })))
        }
        SceneAction::Create => {
            let index = args.scene_id.unwrap_or(-1);
            gateway.create_scene(index).await?;
            let position = if index == -1 {
                "at the end".to_string()
            } else {
                format!("at index {index}")
            };
            Ok(ToolOutcome::ok(
                format!("Created scene {position}; {ID_SHIFT_WARNING}"),
                json!({ "index": index }),
            ))
        }
        SceneAction::Delete => {
            let id = require_scene_id(&args)?;
            gateway.delete_scene(id).await?;
            Ok(ToolOutcome::ok(
                format!("Deleted scene {id}; {ID_SHIFT_WARNING}"),
                json!({ "scene_id": id }),
            ))
        }
        SceneAction::Duplicate => {
            let id = require_scene_id(&args)?;
            gateway.duplicate_scene(id).await?;
            Ok(ToolOutcome::ok(
                format!("Duplicated scene {id}; {ID_SHIFT_WARNING}"),
                json!({ "scene_id": id }),
            ))
        }
        SceneAction::Rename => {
            let id = require_scene_id(&args)?;
            let name = value_string(&args.value, "rename")?;
            gateway.set_scene_name(id, &name).await?;
            Ok(ToolOutcome::ok(
                format!("Renamed scene {id} to {name:?}"),
                json!({ "scene_id": id, "name": name }),
            ))
        }
        SceneAction::Recolor => {
            let id = require_scene_id(&args)?;
            let color = value_i32(&args.value, "recolor")?;
            gateway.set_scene_color(id, color).await?;
            Ok(ToolOutcome::ok(
                format!("Recolored scene {id}"),
                json!({ "scene_id": id, "color": color }),
            ))
        }
        SceneAction::SetTempo => {
            let id = require_scene_id(&args)?;
            let bpm = value_f32(&args.value, "set_tempo")?;
            gateway.set_scene_tempo(id, bpm).await?;
            Ok(ToolOutcome::ok(
                format!("Scene {id} launch tempo set to {bpm:.1} BPM"),
                json!({ "scene_id": id, "tempo": bpm }),
            ))
        }
    }
}
