//! Song-level transport, properties, and set structure.

use live_model::{
    check_loop_bounds, check_pan, check_signature, check_swing, check_tempo, check_track_index,
    check_unit, LoopRegion, TimeSignature,
};
use liveosc::OscArg;

use crate::{reply, GatewayError, LiveGateway};

impl LiveGateway {
    // === Transport ===

    pub async fn start_playing(&self) -> Result<(), GatewayError> {
        self.command("/song/start_playing", &[]).await
    }

    pub async fn stop_playing(&self) -> Result<(), GatewayError> {
        self.command("/song/stop_playing", &[]).await
    }

    pub async fn continue_playing(&self) -> Result<(), GatewayError> {
        self.command("/song/continue_playing", &[]).await
    }

    pub async fn stop_all_clips(&self) -> Result<(), GatewayError> {
        self.command("/song/stop_all_clips", &[]).await
    }

    pub async fn tap_tempo(&self) -> Result<(), GatewayError> {
        self.command("/song/tap_tempo", &[]).await
    }

    pub async fn undo(&self) -> Result<(), GatewayError> {
        self.command("/song/undo", &[]).await
    }

    pub async fn redo(&self) -> Result<(), GatewayError> {
        self.command("/song/redo", &[]).await
    }

    pub async fn capture_midi(&self) -> Result<(), GatewayError> {
        self.command("/song/capture_midi", &[]).await
    }

    pub async fn trigger_session_record(&self) -> Result<(), GatewayError> {
        self.command("/song/trigger_session_record", &[]).await
    }

    /// Jump the playhead to an absolute beat position.
    pub async fn jump_to(&self, beats: f32) -> Result<(), GatewayError> {
        if !beats.is_finite() || beats < 0.0 {
            return Err(GatewayError::Validation(format!(
                "jump target {beats} must be >= 0 beats"
            )));
        }
        self.command("/song/set/current_song_time", &[OscArg::Float(beats)]).await
    }

    /// Move the playhead by a beat delta (negative moves backwards).
    pub async fn jump_by(&self, beats: f32) -> Result<(), GatewayError> {
        if !beats.is_finite() {
            return Err(GatewayError::Validation(format!("jump delta {beats} is not finite")));
        }
        self.command("/song/jump_by", &[OscArg::Float(beats)]).await
    }

    pub async fn jump_to_next_cue(&self) -> Result<(), GatewayError> {
        self.command("/song/jump_to_next_cue", &[]).await
    }

    pub async fn jump_to_prev_cue(&self) -> Result<(), GatewayError> {
        self.command("/song/jump_to_prev_cue", &[]).await
    }

    // === Scalar getters ===

    pub async fn get_tempo(&self) -> Result<f32, GatewayError> {
        let args = self.query("/song/get/tempo", &[]).await?;
        reply::float(&args, 0, "/song/get/tempo")
    }

    pub async fn get_is_playing(&self) -> Result<bool, GatewayError> {
        let args = self.query("/song/get/is_playing", &[]).await?;
        reply::boolean(&args, 0, "/song/get/is_playing")
    }

    pub async fn get_current_song_time(&self) -> Result<f32, GatewayError> {
        let args = self.query("/song/get/current_song_time", &[]).await?;
        reply::float(&args, 0, "/song/get/current_song_time")
    }

    pub async fn get_song_length(&self) -> Result<f32, GatewayError> {
        let args = self.query("/song/get/song_length", &[]).await?;
        reply::float(&args, 0, "/song/get/song_length")
    }

    pub async fn get_metronome(&self) -> Result<bool, GatewayError> {
        let args = self.query("/song/get/metronome", &[]).await?;
        reply::boolean(&args, 0, "/song/get/metronome")
    }

    pub async fn get_overdub(&self) -> Result<bool, GatewayError> {
        let args = self.query("/song/get/arrangement_overdub", &[]).await?;
        reply::boolean(&args, 0, "/song/get/arrangement_overdub")
    }

    pub async fn get_loop_enabled(&self) -> Result<bool, GatewayError> {
        let args = self.query("/song/get/loop", &[]).await?;
        reply::boolean(&args, 0, "/song/get/loop")
    }

    pub async fn get_loop_start(&self) -> Result<f32, GatewayError> {
        let args = self.query("/song/get/loop_start", &[]).await?;
        reply::float(&args, 0, "/song/get/loop_start")
    }

    pub async fn get_loop_length(&self) -> Result<f32, GatewayError> {
        let args = self.query("/song/get/loop_length", &[]).await?;
        reply::float(&args, 0, "/song/get/loop_length")
    }

    /// Full loop region in one composite call.
    pub async fn get_loop_region(&self) -> Result<LoopRegion, GatewayError> {
        let (enabled, start, length) =
            tokio::try_join!(self.get_loop_enabled(), self.get_loop_start(), self.get_loop_length())?;
        Ok(LoopRegion { enabled, start: start as f64, length: length as f64 })
    }

    pub async fn get_swing(&self) -> Result<f32, GatewayError> {
        let args = self.query("/song/get/swing_amount", &[]).await?;
        reply::float(&args, 0, "/song/get/swing_amount")
    }

    pub async fn get_record_mode(&self) -> Result<bool, GatewayError> {
        let args = self.query("/song/get/record_mode", &[]).await?;
        reply::boolean(&args, 0, "/song/get/record_mode")
    }

    pub async fn get_session_record(&self) -> Result<bool, GatewayError> {
        let args = self.query("/song/get/session_record", &[]).await?;
        reply::boolean(&args, 0, "/song/get/session_record")
    }

    pub async fn get_punch_in(&self) -> Result<bool, GatewayError> {
        let args = self.query("/song/get/punch_in", &[]).await?;
        reply::boolean(&args, 0, "/song/get/punch_in")
    }

    pub async fn get_punch_out(&self) -> Result<bool, GatewayError> {
        let args = self.query("/song/get/punch_out", &[]).await?;
        reply::boolean(&args, 0, "/song/get/punch_out")
    }

    pub async fn get_master_volume(&self) -> Result<f32, GatewayError> {
        let args = self.query("/song/get/master_volume", &[]).await?;
        reply::float(&args, 0, "/song/get/master_volume")
    }

    pub async fn get_master_pan(&self) -> Result<f32, GatewayError> {
        let args = self.query("/song/get/master_pan", &[]).await?;
        reply::float(&args, 0, "/song/get/master_pan")
    }

    pub async fn get_num_tracks(&self) -> Result<i32, GatewayError> {
        let args = self.query("/song/get/num_tracks", &[]).await?;
        reply::int(&args, 0, "/song/get/num_tracks")
    }

    pub async fn get_num_scenes(&self) -> Result<i32, GatewayError> {
        let args = self.query("/song/get/num_scenes", &[]).await?;
        reply::int(&args, 0, "/song/get/num_scenes")
    }

    pub async fn get_num_return_tracks(&self) -> Result<i32, GatewayError> {
        let args = self.query("/song/get/num_return_tracks", &[]).await?;
        reply::int(&args, 0, "/song/get/num_return_tracks")
    }

    pub async fn get_signature_numerator(&self) -> Result<i32, GatewayError> {
        let args = self.query("/song/get/signature_numerator", &[]).await?;
        reply::int(&args, 0, "/song/get/signature_numerator")
    }

    pub async fn get_signature_denominator(&self) -> Result<i32, GatewayError> {
        let args = self.query("/song/get/signature_denominator", &[]).await?;
        reply::int(&args, 0, "/song/get/signature_denominator")
    }

    pub async fn get_time_signature(&self) -> Result<TimeSignature, GatewayError> {
        let (numerator, denominator) =
            tokio::try_join!(self.get_signature_numerator(), self.get_signature_denominator())?;
        Ok(TimeSignature { numerator: numerator as u32, denominator: denominator as u32 })
    }

    pub async fn get_application_version(&self) -> Result<String, GatewayError> {
        let args = self.query("/application/get/version", &[]).await?;
        // The version may arrive as one string or as major/minor ints.
        if let Ok(s) = reply::string(&args, 0, "/application/get/version") {
            return Ok(s);
        }
        let major = reply::int(&args, 0, "/application/get/version")?;
        let minor = args.get(1).and_then(OscArg::as_int).unwrap_or(0);
        Ok(format!("{major}.{minor}"))
    }

    // === Scalar setters ===

    pub async fn set_tempo(&self, bpm: f32) -> Result<(), GatewayError> {
        check_tempo(bpm)?;
        self.command("/song/set/tempo", &[OscArg::Float(bpm)]).await
    }

    pub async fn set_metronome(&self, on: bool) -> Result<(), GatewayError> {
        self.command("/song/set/metronome", &[OscArg::Int(on as i32)]).await
    }

    pub async fn set_overdub(&self, on: bool) -> Result<(), GatewayError> {
        self.command("/song/set/arrangement_overdub", &[OscArg::Int(on as i32)]).await
    }

    pub async fn set_loop_enabled(&self, on: bool) -> Result<(), GatewayError> {
        self.command("/song/set/loop", &[OscArg::Int(on as i32)]).await
    }

    pub async fn set_loop_start(&self, beats: f32) -> Result<(), GatewayError> {
        if !beats.is_finite() || beats < 0.0 {
            return Err(GatewayError::Validation(format!("loop_start {beats} must be >= 0 beats")));
        }
        self.command("/song/set/loop_start", &[OscArg::Float(beats)]).await
    }

    pub async fn set_loop_length(&self, beats: f32) -> Result<(), GatewayError> {
        if !beats.is_finite() || beats <= 0.0 {
            return Err(GatewayError::Validation(format!("loop_length {beats} must be > 0 beats")));
        }
        self.command("/song/set/loop_length", &[OscArg::Float(beats)]).await
    }

    /// Set the arrangement loop region in one call.
    pub async fn set_loop_region(&self, start: f32, end: f32) -> Result<(), GatewayError> {
        check_loop_bounds(start as f64, end as f64)?;
        self.set_loop_start(start).await?;
        self.set_loop_length(end - start).await
    }

    pub async fn set_swing(&self, amount: f32) -> Result<(), GatewayError> {
        check_swing(amount)?;
        self.command("/song/set/swing_amount", &[OscArg::Float(amount)]).await
    }

    pub async fn set_signature(&self, numerator: i32, denominator: i32) -> Result<(), GatewayError> {
        check_signature(numerator, denominator)?;
        self.command("/song/set/signature_numerator", &[OscArg::Int(numerator)]).await?;
        self.command("/song/set/signature_denominator", &[OscArg::Int(denominator)]).await
    }

    pub async fn set_record_mode(&self, on: bool) -> Result<(), GatewayError> {
        self.command("/song/set/record_mode", &[OscArg::Int(on as i32)]).await
    }

    pub async fn set_session_record(&self, on: bool) -> Result<(), GatewayError> {
        self.command("/song/set/session_record", &[OscArg::Int(on as i32)]).await
    }

    pub async fn set_punch_in(&self, on: bool) -> Result<(), GatewayError> {
        self.command("/song/set/punch_in", &[OscArg::Int(on as i32)]).await
    }

    pub async fn set_punch_out(&self, on: bool) -> Result<(), GatewayError> {
        self.command("/song/set/punch_out", &[OscArg::Int(on as i32)]).await
    }

    pub async fn set_master_volume(&self, volume: f32) -> Result<(), GatewayError> {
        check_unit("master_volume", volume)?;
        self.command("/song/set/master_volume", &[OscArg::Float(volume)]).await
    }

    pub async fn set_master_pan(&self, pan: f32) -> Result<(), GatewayError> {
        check_pan(pan)?;
        self.command("/song/set/master_pan", &[OscArg::Float(pan)]).await
    }

    // === Set structure ===
    //
    // Creation indices accept -1 for "append at end". These mutate the
    // dense id space: every id above the site shifts, so callers re-query.

    pub async fn create_midi_track(&self, index: i32) -> Result<(), GatewayError> {
        check_track_index("track_index", index, true)?;
        self.command("/song/create_midi_track", &[OscArg::Int(index)]).await
    }

    pub async fn create_audio_track(&self, index: i32) -> Result<(), GatewayError> {
        check_track_index("track_index", index, true)?;
        self.command("/song/create_audio_track", &[OscArg::Int(index)]).await
    }

    pub async fn create_return_track(&self) -> Result<(), GatewayError> {
        self.command("/song/create_return_track", &[]).await
    }

    pub async fn delete_track(&self, track_id: i32) -> Result<(), GatewayError> {
        check_track_index("track_id", track_id, false)?;
        self.command("/song/delete_track", &[OscArg::Int(track_id)]).await
    }

    pub async fn duplicate_track(&self, track_id: i32) -> Result<(), GatewayError> {
        check_track_index("track_id", track_id, false)?;
        self.command("/song/duplicate_track", &[OscArg::Int(track_id)]).await
    }

    pub async fn create_scene(&self, index: i32) -> Result<(), GatewayError> {
        check_track_index("scene_index", index, true)?;
        self.command("/song/create_scene", &[OscArg::Int(index)]).await
    }

    pub async fn delete_scene(&self, scene_id: i32) -> Result<(), GatewayError> {
        check_track_index("scene_id", scene_id, false)?;
        self.command("/song/delete_scene", &[OscArg::Int(scene_id)]).await
    }

    pub async fn duplicate_scene(&self, scene_id: i32) -> Result<(), GatewayError> {
        check_track_index("scene_id", scene_id, false)?;
        self.command("/song/duplicate_scene", &[OscArg::Int(scene_id)]).await
    }
}
