//! Clip slots, clips, and notes.
//!
//! Note arguments on the wire are a flat sequence of five values per note:
//! pitch(i) start(f) duration(f) velocity(i) muted(T/F). The remote script
//! rejects nested structures, so both directions use the flat layout.

use live_model::{check_loop_bounds, check_note, check_track_index, Clip, Note};
use liveosc::OscArg;

use crate::{reply, GatewayError, LiveGateway};

/// Flat wire fields per note.
const NOTE_RECORD: usize = 5;

fn check_slot(track_id: i32, scene_id: i32) -> Result<(), GatewayError> {
    check_track_index("track_id", track_id, false)?;
    check_track_index("scene_id", scene_id, false)?;
    Ok(())
}

fn slot_args(track_id: i32, scene_id: i32) -> Vec<OscArg> {
    vec![OscArg::Int(track_id), OscArg::Int(scene_id)]
}

impl LiveGateway {
    // === Clip slots ===

    pub async fn has_clip(&self, track_id: i32, scene_id: i32) -> Result<bool, GatewayError> {
        check_slot(track_id, scene_id)?;
        let args = self.query("/clip_slot/get/has_clip", &slot_args(track_id, scene_id)).await?;
        reply::boolean(&args, 2, "/clip_slot/get/has_clip")
    }

    pub async fn create_clip(
        &self,
        track_id: i32,
        scene_id: i32,
        length: f32,
    ) -> Result<(), GatewayError> {
        check_slot(track_id, scene_id)?;
        if !length.is_finite() || length <= 0.0 {
            return Err(GatewayError::Validation(format!(
                "clip length {length} must be > 0 beats"
            )));
        }
        self.command(
            "/clip_slot/create_clip",
            &[OscArg::Int(track_id), OscArg::Int(scene_id), OscArg::Float(length)],
        )
        .await
    }

    pub async fn delete_clip(&self, track_id: i32, scene_id: i32) -> Result<(), GatewayError> {
        check_slot(track_id, scene_id)?;
        self.command("/clip_slot/delete_clip", &slot_args(track_id, scene_id)).await
    }

    // === Clip launch ===

    pub async fn fire_clip(&self, track_id: i32, scene_id: i32) -> Result<(), GatewayError> {
        check_slot(track_id, scene_id)?;
        self.command("/clip/fire", &slot_args(track_id, scene_id)).await
    }

    pub async fn stop_clip(&self, track_id: i32, scene_id: i32) -> Result<(), GatewayError> {
        check_slot(track_id, scene_id)?;
        self.command("/clip/stop", &slot_args(track_id, scene_id)).await
    }

    // === Clip properties (replies echo track and scene) ===

    pub async fn get_clip_name(&self, track_id: i32, scene_id: i32) -> Result<String, GatewayError> {
        check_slot(track_id, scene_id)?;
        let args = self.query("/clip/get/name", &slot_args(track_id, scene_id)).await?;
        reply::string(&args, 2, "/clip/get/name")
    }

    pub async fn set_clip_name(
        &self,
        track_id: i32,
        scene_id: i32,
        name: &str,
    ) -> Result<(), GatewayError> {
        check_slot(track_id, scene_id)?;
        self.command(
            "/clip/set/name",
            &[OscArg::Int(track_id), OscArg::Int(scene_id), OscArg::Str(name.to_string())],
        )
        .await
    }

    pub async fn get_clip_length(&self, track_id: i32, scene_id: i32) -> Result<f32, GatewayError> {
        check_slot(track_id, scene_id)?;
        let args = self.query("/clip/get/length", &slot_args(track_id, scene_id)).await?;
        reply::float(&args, 2, "/clip/get/length")
    }

    pub async fn get_clip_is_playing(
        &self,
        track_id: i32,
        scene_id: i32,
    ) -> Result<bool, GatewayError> {
        check_slot(track_id, scene_id)?;
        let args = self.query("/clip/get/is_playing", &slot_args(track_id, scene_id)).await?;
        reply::boolean(&args, 2, "/clip/get/is_playing")
    }

    pub async fn get_clip_loop_start(
        &self,
        track_id: i32,
        scene_id: i32,
    ) -> Result<f32, GatewayError> {
        check_slot(track_id, scene_id)?;
        let args = self.query("/clip/get/loop_start", &slot_args(track_id, scene_id)).await?;
        reply::float(&args, 2, "/clip/get/loop_start")
    }

    pub async fn set_clip_loop_start(
        &self,
        track_id: i32,
        scene_id: i32,
        beats: f32,
    ) -> Result<(), GatewayError> {
        check_slot(track_id, scene_id)?;
        if !beats.is_finite() || beats < 0.0 {
            return Err(GatewayError::Validation(format!("loop_start {beats} must be >= 0 beats")));
        }
        self.command(
            "/clip/set/loop_start",
            &[OscArg::Int(track_id), OscArg::Int(scene_id), OscArg::Float(beats)],
        )
        .await
    }

    pub async fn get_clip_loop_end(
        &self,
        track_id: i32,
        scene_id: i32,
    ) -> Result<f32, GatewayError> {
        check_slot(track_id, scene_id)?;
        let args = self.query("/clip/get/loop_end", &slot_args(track_id, scene_id)).await?;
        reply::float(&args, 2, "/clip/get/loop_end")
    }

    pub async fn set_clip_loop_end(
        &self,
        track_id: i32,
        scene_id: i32,
        beats: f32,
    ) -> Result<(), GatewayError> {
        check_slot(track_id, scene_id)?;
        if !beats.is_finite() || beats <= 0.0 {
            return Err(GatewayError::Validation(format!("loop_end {beats} must be > 0 beats")));
        }
        self.command(
            "/clip/set/loop_end",
            &[OscArg::Int(track_id), OscArg::Int(scene_id), OscArg::Float(beats)],
        )
        .await
    }

    /// Set both loop bounds, validated together (end > start >= 0).
    pub async fn set_clip_loop(
        &self,
        track_id: i32,
        scene_id: i32,
        start: f32,
        end: f32,
    ) -> Result<(), GatewayError> {
        check_loop_bounds(start as f64, end as f64)?;
        self.set_clip_loop_start(track_id, scene_id, start).await?;
        self.set_clip_loop_end(track_id, scene_id, end).await
    }

    pub async fn get_clip_color(&self, track_id: i32, scene_id: i32) -> Result<i32, GatewayError> {
        check_slot(track_id, scene_id)?;
        let args = self.query("/clip/get/color", &slot_args(track_id, scene_id)).await?;
        reply::int(&args, 2, "/clip/get/color")
    }

    pub async fn set_clip_color(
        &self,
        track_id: i32,
        scene_id: i32,
        color: i32,
    ) -> Result<(), GatewayError> {
        check_slot(track_id, scene_id)?;
        self.command(
            "/clip/set/color",
            &[OscArg::Int(track_id), OscArg::Int(scene_id), OscArg::Int(color)],
        )
        .await
    }

    /// Clip metadata composite; field subqueries degrade individually.
    pub async fn clip_info(&self, track_id: i32, scene_id: i32) -> Result<Clip, GatewayError> {
        check_slot(track_id, scene_id)?;
        let (name, length, loop_start, loop_end, is_playing, color) = tokio::join!(
            self.get_clip_name(track_id, scene_id),
            self.get_clip_length(track_id, scene_id),
            self.get_clip_loop_start(track_id, scene_id),
            self.get_clip_loop_end(track_id, scene_id),
            self.get_clip_is_playing(track_id, scene_id),
            self.get_clip_color(track_id, scene_id),
        );
        // Name doubles as the existence probe.
        let name = name?;
        Ok(Clip {
            track_id,
            scene_id,
            name: Some(name),
            length: length.ok().map(f64::from),
            loop_start: loop_start.ok().map(f64::from),
            loop_end: loop_end.ok().map(f64::from),
            is_playing: is_playing.ok(),
            color: color.ok(),
            notes: Vec::new(),
        })
    }

    // === Notes ===

    /// Add notes in one flat packet. Every note is validated first; one
    /// bad note rejects the whole batch before anything is sent.
    pub async fn add_notes(
        &self,
        track_id: i32,
        scene_id: i32,
        notes: &[Note],
    ) -> Result<(), GatewayError> {
        check_slot(track_id, scene_id)?;
        if notes.is_empty() {
            return Err(GatewayError::Validation("no notes to add".to_string()));
        }
        for note in notes {
            check_note(note)?;
        }

        let mut args = Vec::with_capacity(2 + notes.len() * NOTE_RECORD);
        args.push(OscArg::Int(track_id));
        args.push(OscArg::Int(scene_id));
        for note in notes {
            args.push(OscArg::Int(note.pitch as i32));
            args.push(OscArg::Float(note.start as f32));
            args.push(OscArg::Float(note.duration as f32));
            args.push(OscArg::Int(note.velocity as i32));
            args.push(OscArg::Bool(note.muted));
        }
        self.command("/clip/add/notes", &args).await
    }

    /// Fetch the clip's notes; the reply uses the same flat layout.
    pub async fn get_clip_notes(
        &self,
        track_id: i32,
        scene_id: i32,
    ) -> Result<Vec<Note>, GatewayError> {
        check_slot(track_id, scene_id)?;
        let args = self.query("/clip/get/notes", &slot_args(track_id, scene_id)).await?;

        let records = reply::tail(&args, 2, NOTE_RECORD);
        if records.len() % NOTE_RECORD != 0 {
            return Err(GatewayError::Protocol(format!(
                "/clip/get/notes: reply length {} is not a whole number of notes",
                records.len()
            )));
        }

        let mut notes = Vec::with_capacity(records.len() / NOTE_RECORD);
        for record in records.chunks_exact(NOTE_RECORD) {
            let bad = || {
                GatewayError::Protocol(format!("/clip/get/notes: bad note record {record:?}"))
            };
            notes.push(Note {
                pitch: record[0].as_int().ok_or_else(bad)? as u8,
                start: record[1].as_float().ok_or_else(bad)? as f64,
                duration: record[2].as_float().ok_or_else(bad)? as f64,
                velocity: record[3].as_int().ok_or_else(bad)? as u8,
                muted: record[4].as_bool().ok_or_else(bad)?,
            });
        }
        Ok(notes)
    }

    /// Remove the notes matching (pitch, start) - note identity within a
    /// clip.
    pub async fn remove_notes(
        &self,
        track_id: i32,
        scene_id: i32,
        pitch: i32,
        start: f32,
    ) -> Result<(), GatewayError> {
        check_slot(track_id, scene_id)?;
        live_model::check_pitch(pitch)?;
        if !start.is_finite() || start < 0.0 {
            return Err(GatewayError::Validation(format!("start {start} must be >= 0 beats")));
        }
        self.command(
            "/clip/remove/notes",
            &[
                OscArg::Int(track_id),
                OscArg::Int(scene_id),
                OscArg::Int(pitch),
                OscArg::Float(start),
            ],
        )
        .await
    }

    /// Clear every note in the clip.
    pub async fn remove_all_notes(&self, track_id: i32, scene_id: i32) -> Result<(), GatewayError> {
        check_slot(track_id, scene_id)?;
        self.command("/clip/remove/notes", &slot_args(track_id, scene_id)).await
    }
}
