//! Scene launch and properties.

use live_model::{check_tempo, check_track_index, Scene};
use liveosc::OscArg;

use crate::{reply, GatewayError, LiveGateway};

impl LiveGateway {
    pub async fn fire_scene(&self, scene_id: i32) -> Result<(), GatewayError> {
        check_track_index("scene_id", scene_id, false)?;
        self.command("/scene/fire", &[OscArg::Int(scene_id)]).await
    }

    pub async fn get_scene_name(&self, scene_id: i32) -> Result<String, GatewayError> {
        check_track_index("scene_id", scene_id, false)?;
        let args = self.query("/scene/get/name", &[OscArg::Int(scene_id)]).await?;
        reply::string(&args, 1, "/scene/get/name")
    }

    pub async fn set_scene_name(&self, scene_id: i32, name: &str) -> Result<(), GatewayError> {
        check_track_index("scene_id", scene_id, false)?;
        self.command("/scene/set/name", &[OscArg::Int(scene_id), OscArg::Str(name.to_string())])
            .await
    }

    pub async fn get_scene_color(&self, scene_id: i32) -> Result<i32, GatewayError> {
        check_track_index("scene_id", scene_id, false)?;
        let args = self.query("/scene/get/color", &[OscArg::Int(scene_id)]).await?;
        reply::int(&args, 1, "/scene/get/color")
    }

    pub async fn set_scene_color(&self, scene_id: i32, color: i32) -> Result<(), GatewayError> {
        check_track_index("scene_id", scene_id, false)?;
        self.command("/scene/set/color", &[OscArg::Int(scene_id), OscArg::Int(color)]).await
    }

    pub async fn get_scene_tempo(&self, scene_id: i32) -> Result<f32, GatewayError> {
        check_track_index("scene_id", scene_id, false)?;
        let args = self.query("/scene/get/tempo", &[OscArg::Int(scene_id)]).await?;
        reply::float(&args, 1, "/scene/get/tempo")
    }

    pub async fn set_scene_tempo(&self, scene_id: i32, bpm: f32) -> Result<(), GatewayError> {
        check_track_index("scene_id", scene_id, false)?;
        check_tempo(bpm)?;
        self.command("/scene/set/tempo", &[OscArg::Int(scene_id), OscArg::Float(bpm)]).await
    }

    /// Scene metadata composite; a scene without a launch tempo degrades
    /// that field rather than failing.
    pub async fn scene_info(&self, scene_id: i32) -> Result<Scene, GatewayError> {
        check_track_index("scene_id", scene_id, false)?;
        let (name, color, tempo) = tokio::join!(
            self.get_scene_name(scene_id),
            self.get_scene_color(scene_id),
            self.get_scene_tempo(scene_id),
        );
        let name = name?;
        Ok(Scene { id: scene_id, name: Some(name), color: color.ok(), tempo: tempo.ok() })
    }
}
