//! transport_control: play/stop/record and playhead movement.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::usecases::{settle, value_f32, UseCaseResult};
use crate::{Session, ToolOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportAction {
    Play,
    Stop,
    Continue,
    Record,
    Undo,
    Redo,
    CaptureMidi,
    TapTempo,
    StopAllClips,
    JumpTo,
    JumpBy,
    NextCue,
    PrevCue,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransportArgs {
    pub action: TransportAction,
    pub value: Option<Value>,
}

pub async fn execute(session: &Session, args: TransportArgs) -> ToolOutcome {
    settle(run(session, args).await)
}

async fn run(session: &Session, args: TransportArgs) -> UseCaseResult {
    let gateway = session.gateway().await?;

    let message = match args.action {
        TransportAction::Play => {
            gateway.start_playing().await?;
            "Playback started".to_string()
        }
        TransportAction::Stop => {
            gateway.stop_playing().await?;
            "Playback stopped".to_string()
        }
        TransportAction::Continue => {
            gateway.continue_playing().await?;
            "Playback resumed".to_string()
        }
        TransportAction::Record => {
            gateway.trigger_session_record().await?;
            "Session record triggered".to_string()
        }
        TransportAction::Undo => {
            gateway.undo().await?;
            "Undid last action".to_string()
        }
        TransportAction::Redo => {
            gateway.redo().await?;
            "Redid last action".to_string()
        }
        TransportAction::CaptureMidi => {
            gateway.capture_midi().await?;
            "Captured recently played MIDI".to_string()
        }
        TransportAction::TapTempo => {
            gateway.tap_tempo().await?;
            "Tempo tapped".to_string()
        }
        TransportAction::StopAllClips => {
            gateway.stop_all_clips().await?;
            "Stopped all clips".to_string()
        }
        TransportAction::JumpTo => {
            let beats = value_f32(&args.value, "jump_to")?;
            gateway.jump_to(beats).await?;
            format!("Jumped to beat {beats}")
        }
        TransportAction::JumpBy => {
            let beats = value_f32(&args.value, "jump_by")?;
            gateway.jump_by(beats).await?;
            format!("Moved playhead by {beats} beats")
        }
        TransportAction::NextCue => {
            gateway.jump_to_next_cue().await?;
            "Jumped to next cue".to_string()
        }
        TransportAction::PrevCue => {
            gateway.jump_to_prev_cue().await?;
            "Jumped to previous cue".to_string()
        }
    };

    Ok(ToolOutcome::ok(message, json!({ "action": args.action })))
}
