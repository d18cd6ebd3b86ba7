//! add_notes: write MIDI notes into a clip, creating it when the slot is
//! empty, with optional quantization and scale filtering.

use live_model::{check_note, Note};
use music_theory::{filter_to_scale, quantize, Mode};
use serde::Deserialize;
use serde_json::json;

use crate::usecases::{settle, UseCaseResult};
use crate::{Session, ToolOutcome};

/// Beats per bar used when sizing a freshly created clip.
const BAR_BEATS: f64 = 4.0;

fn default_quantize_grid() -> f64 {
    0.25
}

#[derive(Debug, Clone, Deserialize)]
pub struct NoteArg {
    pub pitch: u8,
    pub start: f64,
    pub duration: f64,
    pub velocity: u8,
    #[serde(default)]
    pub muted: bool,
}

impl From<&NoteArg> for Note {
    fn from(n: &NoteArg) -> Self {
        Note { pitch: n.pitch, start: n.start, duration: n.duration, velocity: n.velocity, muted: n.muted }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddNotesArgs {
    pub track_id: i32,
    /// Slot index (scene row) of the target clip
    pub clip_id: i32,
    pub notes: Vec<NoteArg>,
    #[serde(default)]
    pub quantize: bool,
    #[serde(default = "default_quantize_grid")]
    pub quantize_value: f64,
    /// Scale mode name; notes outside the scale are dropped, not moved
    pub scale_filter: Option<String>,
    /// MIDI root for the scale filter (pitch class is taken mod 12)
    pub root_note: Option<i32>,
}

pub async fn execute(session: &Session, args: AddNotesArgs) -> ToolOutcome {
    settle(run(session, args).await)
}

/// Smallest whole-bar length that contains every note.
fn clip_length_for(notes: &[Note]) -> f64 {
    let max_end = notes.iter().map(Note::end).fold(0.0_f64, f64::max);
    ((max_end / BAR_BEATS).ceil() * BAR_BEATS).max(BAR_BEATS)
}

async fn run(session: &Session, args: AddNotesArgs) -> UseCaseResult {
    if args.notes.is_empty() {
        return Err(ToolOutcome::validation("notes must not be empty"));
    }
    let mut notes: Vec<Note> = args.notes.iter().map(Note::from).collect();
    for note in &notes {
        check_note(note).map_err(|e| ToolOutcome::validation(e.to_string()))?;
    }
    if args.quantize && !(args.quantize_value > 0.0 && args.quantize_value.is_finite()) {
        return Err(ToolOutcome::validation(format!(
            "quantize_value {} must be > 0 beats",
            args.quantize_value
        )));
    }
    let scale = match &args.scale_filter {
        Some(name) => {
            let mode: Mode =
                name.parse().map_err(|e: music_theory::TheoryError| ToolOutcome::validation(e.to_string()))?;
            let root = args.root_note.unwrap_or(0);
            if !(0..=127).contains(&root) {
                return Err(ToolOutcome::validation(format!("root_note {root} is outside 0..127")));
            }
            Some((mode, (root % 12) as u8))
        }
        None => None,
    };

    let gateway = session.gateway().await?;

    // Preprocess before sizing the clip, so a quantized batch gets a clip
    // that fits its snapped positions.
    if args.quantize {
        quantize(&mut notes, args.quantize_value);
    }
    let mut dropped = 0;
    if let Some((mode, root_pc)) = scale {
        let before = notes.len();
        notes = filter_to_scale(notes, root_pc, mode);
        dropped = before - notes.len();
        if notes.is_empty() {
            return Err(ToolOutcome::validation(format!(
                "all {before} notes fall outside the {} scale; nothing to add",
                mode
            )));
        }
    }

    let created = if gateway.has_clip(args.track_id, args.clip_id).await? {
        false
    } else {
        let length = clip_length_for(&notes);
        gateway.create_clip(args.track_id, args.clip_id, length as f32).await?;
        true
    };

    gateway.add_notes(args.track_id, args.clip_id, &notes).await?;

    let mut message = format!(
        "Added {} notes to the clip at track {}, scene {}",
        notes.len(),
        args.track_id,
        args.clip_id
    );
    if created {
        message.push_str(" (created the clip)");
    }
    if dropped > 0 {
        message.push_str(&format!("; dropped {dropped} out-of-scale notes"));
    }

    Ok(ToolOutcome::ok(
        message,
        json!({
            "added": notes.len(),
            "dropped": dropped,
            "created_clip": created,
            "quantized": args.quantize,
        }),
    ))
}
