//! Tool registry and dispatch.
//!
//! Schemas are written by hand as `json!` literals so the surface stays
//! friendly to schema-strict clients; argument structs in the use cases
//! are the source of truth and the tests check the two agree on names.

mod registry;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

pub use registry::{list_tools, ToolInfo};

use crate::usecases::{
    add_notes, clip_ops, connect, device_ops, harmony, return_track_ops, scene_ops, song_info,
    song_properties, tempo, track_ops, transport_control, view_control,
};
use crate::{Session, ToolOutcome};

fn parse<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T, ToolOutcome> {
    serde_json::from_value(args)
        .map_err(|e| ToolOutcome::validation(format!("invalid {tool} arguments: {e}")))
}

/// Route one tool call to its use case.
pub async fn dispatch(session: &Session, name: &str, args: Value) -> ToolOutcome {
    debug!(tool = name, "dispatching tool call");
    match name {
        "connect_ableton" => match parse(name, args) {
            Ok(parsed) => connect::connect(session, parsed).await,
            Err(failure) => failure,
        },
        "disconnect_ableton" => connect::disconnect(session).await,
        "get_connection_status" => connect::status(session).await,
        "transport_control" => match parse(name, args) {
            Ok(parsed) => transport_control::execute(session, parsed).await,
            Err(failure) => failure,
        },
        "get_song_info" => match parse(name, args) {
            Ok(parsed) => song_info::execute(session, parsed).await,
            Err(failure) => failure,
        },
        "song_properties" => match parse(name, args) {
            Ok(parsed) => song_properties::execute(session, parsed).await,
            Err(failure) => failure,
        },
        "track_operations" => match parse(name, args) {
            Ok(parsed) => track_ops::execute(session, parsed).await,
            Err(failure) => failure,
        },
        "return_track_operations" => match parse(name, args) {
            Ok(parsed) => return_track_ops::execute(session, parsed).await,
            Err(failure) => failure,
        },
        "clip_operations" => match parse(name, args) {
            Ok(parsed) => clip_ops::execute(session, parsed).await,
            Err(failure) => failure,
        },
        "scene_operations" => match parse(name, args) {
            Ok(parsed) => scene_ops::execute(session, parsed).await,
            Err(failure) => failure,
        },
        "device_operations" => match parse(name, args) {
            Ok(parsed) => device_ops::execute(session, parsed).await,
            Err(failure) => failure,
        },
        "view_control" => match parse(name, args) {
            Ok(parsed) => view_control::execute(session, parsed).await,
            Err(failure) => failure,
        },
        "add_notes" => match parse(name, args) {
            Ok(parsed) => add_notes::execute(session, parsed).await,
            Err(failure) => failure,
        },
        "analyze_harmony" => match parse(name, args) {
            Ok(parsed) => harmony::execute(session, parsed).await,
            Err(failure) => failure,
        },
        "analyze_tempo" => match parse(name, args) {
            Ok(parsed) => tempo::execute(session, parsed).await,
            Err(failure) => failure,
        },
        _ => ToolOutcome::validation(format!("unknown tool: {name}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liveconf::BridgeConfig;
    use serde_json::json;

    #[tokio::test]
    async fn unknown_tool_is_a_validation_failure() {
        let session = Session::new(BridgeConfig::default());
        let outcome = dispatch(&session, "frobnicate", json!({})).await;
        assert!(!outcome.success);
        assert_eq!(outcome.error_code, Some(crate::ErrorCode::ValidationError));
    }

    #[tokio::test]
    async fn bad_arguments_fail_validation_not_dispatch() {
        let session = Session::new(BridgeConfig::default());
        let outcome =
            dispatch(&session, "transport_control", json!({ "action": "warp_drive" })).await;
        assert_eq!(outcome.error_code, Some(crate::ErrorCode::ValidationError));
    }

    #[tokio::test]
    async fn wire_tools_require_a_connection() {
        let session = Session::new(BridgeConfig::default());
        let outcome =
            dispatch(&session, "transport_control", json!({ "action": "play" })).await;
        assert_eq!(outcome.error_code, Some(crate::ErrorCode::NotConnected));
    }

    #[tokio::test]
    async fn pure_analysis_tools_work_disconnected() {
        let session = Session::new(BridgeConfig::default());
        let outcome = dispatch(
            &session,
            "analyze_tempo",
            json!({ "current_bpm": 120.0, "genre": "house", "energy_level": 0.5 }),
        )
        .await;
        assert!(outcome.success, "{}", outcome.message);
    }

    #[test]
    fn every_registered_tool_has_a_dispatch_arm() {
        // The match above and the registry list must not drift apart.
        let known = [
            "connect_ableton",
            "disconnect_ableton",
            "get_connection_status",
            "transport_control",
            "get_song_info",
            "song_properties",
            "track_operations",
            "return_track_operations",
            "clip_operations",
            "scene_operations",
            "device_operations",
            "view_control",
            "add_notes",
            "analyze_harmony",
            "analyze_tempo",
        ];
        for tool in list_tools() {
            assert!(known.contains(&tool.name.as_str()), "no dispatch arm for {}", tool.name);
        }
        assert_eq!(list_tools().len(), known.len());
    }
}
