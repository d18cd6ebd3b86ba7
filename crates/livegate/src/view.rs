//! Session view selection.

use live_model::check_track_index;
use liveosc::OscArg;

use crate::{reply, GatewayError, LiveGateway};

impl LiveGateway {
    pub async fn get_selected_track(&self) -> Result<i32, GatewayError> {
        let args = self.query("/view/get/selected_track", &[]).await?;
        reply::int(&args, 0, "/view/get/selected_track")
    }

    pub async fn select_track(&self, track_id: i32) -> Result<(), GatewayError> {
        check_track_index("track_id", track_id, false)?;
        self.command("/view/set/selected_track", &[OscArg::Int(track_id)]).await
    }

    pub async fn get_selected_scene(&self) -> Result<i32, GatewayError> {
        let args = self.query("/view/get/selected_scene", &[]).await?;
        reply::int(&args, 0, "/view/get/selected_scene")
    }

    pub async fn select_scene(&self, scene_id: i32) -> Result<(), GatewayError> {
        check_track_index("scene_id", scene_id, false)?;
        self.command("/view/set/selected_scene", &[OscArg::Int(scene_id)]).await
    }

    /// Bring the clip detail view to front for a slot.
    pub async fn show_clip(&self, track_id: i32, scene_id: i32) -> Result<(), GatewayError> {
        check_track_index("track_id", track_id, false)?;
        check_track_index("scene_id", scene_id, false)?;
        self.command("/view/show_clip", &[OscArg::Int(track_id), OscArg::Int(scene_id)]).await
    }
}
