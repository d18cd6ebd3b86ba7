//! Track and return-track properties.

use live_model::{check_pan, check_send_index, check_track_index, check_unit, Track, TrackKind};
use liveosc::OscArg;

use crate::{reply, GatewayError, LiveGateway};

impl LiveGateway {
    // === Track getters (reply echoes the track id) ===

    pub async fn get_track_name(&self, track_id: i32) -> Result<String, GatewayError> {
        check_track_index("track_id", track_id, false)?;
        let args = self.query("/track/get/name", &[OscArg::Int(track_id)]).await?;
        reply::string(&args, 1, "/track/get/name")
    }

    pub async fn get_track_color(&self, track_id: i32) -> Result<i32, GatewayError> {
        check_track_index("track_id", track_id, false)?;
        let args = self.query("/track/get/color", &[OscArg::Int(track_id)]).await?;
        reply::int(&args, 1, "/track/get/color")
    }

    pub async fn get_track_volume(&self, track_id: i32) -> Result<f32, GatewayError> {
        check_track_index("track_id", track_id, false)?;
        let args = self.query("/track/get/volume", &[OscArg::Int(track_id)]).await?;
        reply::float(&args, 1, "/track/get/volume")
    }

    pub async fn get_track_pan(&self, track_id: i32) -> Result<f32, GatewayError> {
        check_track_index("track_id", track_id, false)?;
        let args = self.query("/track/get/panning", &[OscArg::Int(track_id)]).await?;
        reply::float(&args, 1, "/track/get/panning")
    }

    pub async fn get_track_mute(&self, track_id: i32) -> Result<bool, GatewayError> {
        check_track_index("track_id", track_id, false)?;
        let args = self.query("/track/get/mute", &[OscArg::Int(track_id)]).await?;
        reply::boolean(&args, 1, "/track/get/mute")
    }

    pub async fn get_track_solo(&self, track_id: i32) -> Result<bool, GatewayError> {
        check_track_index("track_id", track_id, false)?;
        let args = self.query("/track/get/solo", &[OscArg::Int(track_id)]).await?;
        reply::boolean(&args, 1, "/track/get/solo")
    }

    pub async fn get_track_arm(&self, track_id: i32) -> Result<bool, GatewayError> {
        check_track_index("track_id", track_id, false)?;
        let args = self.query("/track/get/arm", &[OscArg::Int(track_id)]).await?;
        reply::boolean(&args, 1, "/track/get/arm")
    }

    /// Kind probe: whether the track holds MIDI. Audio tracks answer false.
    pub async fn get_track_has_midi_input(&self, track_id: i32) -> Result<bool, GatewayError> {
        check_track_index("track_id", track_id, false)?;
        let args = self.query("/track/get/has_midi_input", &[OscArg::Int(track_id)]).await?;
        reply::boolean(&args, 1, "/track/get/has_midi_input")
    }

    pub async fn get_track_send(&self, track_id: i32, send_index: i32) -> Result<f32, GatewayError> {
        check_track_index("track_id", track_id, false)?;
        check_send_index(send_index)?;
        let args = self
            .query("/track/get/send", &[OscArg::Int(track_id), OscArg::Int(send_index)])
            .await?;
        reply::float(&args, 2, "/track/get/send")
    }

    pub async fn get_num_devices(&self, track_id: i32) -> Result<i32, GatewayError> {
        check_track_index("track_id", track_id, false)?;
        let args = self.query("/track/get/num_devices", &[OscArg::Int(track_id)]).await?;
        reply::int(&args, 1, "/track/get/num_devices")
    }

    /// Track metadata in one composite call. Subqueries run concurrently
    /// (each has its own address) and individual failures degrade the
    /// field to `None` rather than failing the snapshot.
    pub async fn track_info(&self, track_id: i32) -> Result<Track, GatewayError> {
        check_track_index("track_id", track_id, false)?;

        let (name, volume, pan, mute, solo, arm, color) = tokio::join!(
            self.get_track_name(track_id),
            self.get_track_volume(track_id),
            self.get_track_pan(track_id),
            self.get_track_mute(track_id),
            self.get_track_solo(track_id),
            self.get_track_arm(track_id),
            self.get_track_color(track_id),
        );

        // Name is the root query: a track that cannot answer it is gone.
        let name = name?;
        let kind = match self.get_track_has_midi_input(track_id).await {
            Ok(true) => TrackKind::Midi,
            Ok(false) => TrackKind::Audio,
            Err(_) => TrackKind::Audio,
        };

        let mut track = Track::new(track_id, kind);
        track.name = Some(name);
        track.volume = volume.ok();
        track.pan = pan.ok();
        track.mute = mute.ok();
        track.solo = solo.ok();
        track.arm = arm.ok();
        track.color = color.ok();
        Ok(track)
    }

    // === Track setters ===

    pub async fn set_track_name(&self, track_id: i32, name: &str) -> Result<(), GatewayError> {
        check_track_index("track_id", track_id, false)?;
        self.command("/track/set/name", &[OscArg::Int(track_id), OscArg::Str(name.to_string())])
            .await
    }

    pub async fn set_track_color(&self, track_id: i32, color: i32) -> Result<(), GatewayError> {
        check_track_index("track_id", track_id, false)?;
        self.command("/track/set/color", &[OscArg::Int(track_id), OscArg::Int(color)]).await
    }

    pub async fn set_track_volume(&self, track_id: i32, volume: f32) -> Result<(), GatewayError> {
        check_track_index("track_id", track_id, false)?;
        check_unit("volume", volume)?;
        self.command("/track/set/volume", &[OscArg::Int(track_id), OscArg::Float(volume)]).await
    }

    pub async fn set_track_pan(&self, track_id: i32, pan: f32) -> Result<(), GatewayError> {
        check_track_index("track_id", track_id, false)?;
        check_pan(pan)?;
        self.command("/track/set/panning", &[OscArg::Int(track_id), OscArg::Float(pan)]).await
    }

    pub async fn set_track_mute(&self, track_id: i32, mute: bool) -> Result<(), GatewayError> {
        check_track_index("track_id", track_id, false)?;
        self.command("/track/set/mute", &[OscArg::Int(track_id), OscArg::Int(mute as i32)]).await
    }

    pub async fn set_track_solo(&self, track_id: i32, solo: bool) -> Result<(), GatewayError> {
        check_track_index("track_id", track_id, false)?;
        self.command("/track/set/solo", &[OscArg::Int(track_id), OscArg::Int(solo as i32)]).await
    }

    pub async fn set_track_arm(&self, track_id: i32, arm: bool) -> Result<(), GatewayError> {
        check_track_index("track_id", track_id, false)?;
        self.command("/track/set/arm", &[OscArg::Int(track_id), OscArg::Int(arm as i32)]).await
    }

    pub async fn set_track_send(
        &self,
        track_id: i32,
        send_index: i32,
        level: f32,
    ) -> Result<(), GatewayError> {
        check_track_index("track_id", track_id, false)?;
        check_send_index(send_index)?;
        check_unit("send", level)?;
        self.command(
            "/track/set/send",
            &[OscArg::Int(track_id), OscArg::Int(send_index), OscArg::Float(level)],
        )
        .await
    }

    /// Stop every playing clip on one track.
    pub async fn stop_track_clips(&self, track_id: i32) -> Result<(), GatewayError> {
        check_track_index("track_id", track_id, false)?;
        self.command("/track/stop_all_clips", &[OscArg::Int(track_id)]).await
    }

    // === Return tracks (subset of the track surface) ===

    pub async fn get_return_name(&self, return_id: i32) -> Result<String, GatewayError> {
        check_track_index("return_track_id", return_id, false)?;
        let args = self.query("/return_track/get/name", &[OscArg::Int(return_id)]).await?;
        reply::string(&args, 1, "/return_track/get/name")
    }

    pub async fn get_return_volume(&self, return_id: i32) -> Result<f32, GatewayError> {
        check_track_index("return_track_id", return_id, false)?;
        let args = self.query("/return_track/get/volume", &[OscArg::Int(return_id)]).await?;
        reply::float(&args, 1, "/return_track/get/volume")
    }

    pub async fn get_return_pan(&self, return_id: i32) -> Result<f32, GatewayError> {
        check_track_index("return_track_id", return_id, false)?;
        let args = self.query("/return_track/get/panning", &[OscArg::Int(return_id)]).await?;
        reply::float(&args, 1, "/return_track/get/panning")
    }

    pub async fn get_return_mute(&self, return_id: i32) -> Result<bool, GatewayError> {
        check_track_index("return_track_id", return_id, false)?;
        let args = self.query("/return_track/get/mute", &[OscArg::Int(return_id)]).await?;
        reply::boolean(&args, 1, "/return_track/get/mute")
    }

    pub async fn set_return_name(&self, return_id: i32, name: &str) -> Result<(), GatewayError> {
        check_track_index("return_track_id", return_id, false)?;
        self.command(
            "/return_track/set/name",
            &[OscArg::Int(return_id), OscArg::Str(name.to_string())],
        )
        .await
    }

    pub async fn set_return_volume(&self, return_id: i32, volume: f32) -> Result<(), GatewayError> {
        check_track_index("return_track_id", return_id, false)?;
        check_unit("volume", volume)?;
        self.command(
            "/return_track/set/volume",
            &[OscArg::Int(return_id), OscArg::Float(volume)],
        )
        .await
    }

    pub async fn set_return_pan(&self, return_id: i32, pan: f32) -> Result<(), GatewayError> {
        check_track_index("return_track_id", return_id, false)?;
        check_pan(pan)?;
        self.command(
            "/return_track/set/panning",
            &[OscArg::Int(return_id), OscArg::Float(pan)],
        )
        .await
    }

    pub async fn set_return_mute(&self, return_id: i32, mute: bool) -> Result<(), GatewayError> {
        check_track_index("return_track_id", return_id, false)?;
        self.command(
            "/return_track/set/mute",
            &[OscArg::Int(return_id), OscArg::Int(mute as i32)],
        )
        .await
    }

    /// Return-track metadata composite, same degradation rules as
    /// [`LiveGateway::track_info`].
    pub async fn return_track_info(&self, return_id: i32) -> Result<Track, GatewayError> {
        check_track_index("return_track_id", return_id, false)?;
        let (name, volume, pan, mute) = tokio::join!(
            self.get_return_name(return_id),
            self.get_return_volume(return_id),
            self.get_return_pan(return_id),
            self.get_return_mute(return_id),
        );
        let name = name?;
        let mut track = Track::new(return_id, TrackKind::Return);
        track.name = Some(name);
        track.volume = volume.ok();
        track.pan = pan.ok();
        track.mute = mute.ok();
        Ok(track)
    }
}
