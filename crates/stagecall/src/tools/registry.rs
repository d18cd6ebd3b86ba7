//! Tool metadata for MCP discovery.

use serde::Serialize;
use serde_json::{json, Value};

/// One entry in `tools/list`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl ToolInfo {
    fn new(name: &str, description: &str, input_schema: Value) -> Self {
        Self { name: name.to_string(), description: description.to_string(), input_schema }
    }
}

/// All tools exposed by stagecall.
pub fn list_tools() -> Vec<ToolInfo> {
    vec![
        // ======================================================================
        // Connection
        // ======================================================================
        ToolInfo::new(
            "connect_ableton",
            "Connect to Ableton Live via the AbletonOSC remote script",
            json!({
                "type": "object",
                "properties": {
                    "host": { "type": "string", "description": "Host running Live (default 127.0.0.1)" },
                    "send_port": { "type": "integer", "description": "AbletonOSC listen port (default 11000)" },
                    "receive_port": { "type": "integer", "description": "Local reply port (default 11001)" }
                }
            }),
        ),
        ToolInfo::new(
            "disconnect_ableton",
            "Close the connection to Ableton Live",
            json!({ "type": "object", "properties": {} }),
        ),
        ToolInfo::new(
            "get_connection_status",
            "Report the current connection state",
            json!({ "type": "object", "properties": {} }),
        ),
        // ======================================================================
        // Song
        // ======================================================================
        ToolInfo::new(
            "transport_control",
            "Play, stop, record, undo/redo, and move the playhead",
            json!({
                "type": "object",
                "required": ["action"],
                "properties": {
                    "action": {
                        "type": "string",
                        "enum": ["play", "stop", "continue", "record", "undo", "redo",
                                 "capture_midi", "tap_tempo", "stop_all_clips",
                                 "jump_to", "jump_by", "next_cue", "prev_cue"]
                    },
                    "value": { "type": "number", "description": "Beats for jump_to/jump_by" }
                }
            }),
        ),
        ToolInfo::new(
            "get_song_info",
            "Snapshot the song: tempo, signature, transport flags, counts, optionally tracks and devices",
            json!({
                "type": "object",
                "properties": {
                    "include_tracks": { "type": "boolean", "description": "Fetch per-track metadata (default true)" },
                    "include_devices": { "type": "boolean", "description": "Also fetch each track's devices (default false)" }
                }
            }),
        ),
        ToolInfo::new(
            "song_properties",
            "Read or set song-level properties (tempo, swing, metronome, loop, signature)",
            json!({
                "type": "object",
                "required": ["action"],
                "properties": {
                    "action": {
                        "type": "string",
                        "enum": ["get", "set_tempo", "set_swing", "set_metronome", "set_overdub",
                                 "set_loop", "set_loop_start", "set_loop_length", "set_signature"]
                    },
                    "value": { "description": "New value for set_* actions (number or boolean)" },
                    "numerator": { "type": "integer", "description": "set_signature numerator (1-99)" },
                    "denominator": { "type": "integer", "description": "set_signature denominator (1-99)" }
                }
            }),
        ),
        // ======================================================================
        // Tracks
        // ======================================================================
        ToolInfo::new(
            "track_operations",
            "Query and mutate tracks: properties, sends, create/delete/duplicate",
            json!({
                "type": "object",
                "required": ["action"],
                "properties": {
                    "action": {
                        "type": "string",
                        "enum": ["get", "set_name", "set_color", "set_volume", "set_pan",
                                 "mute", "solo", "arm", "set_send", "create_midi", "create_audio",
                                 "create_return", "delete", "duplicate", "stop_all_clips"]
                    },
                    "track_id": { "type": "integer", "description": "0-based track index; -1 appends on create" },
                    "value": { "description": "Action-specific value (name, color, level, flag)" },
                    "send_index": { "type": "integer", "description": "Send slot for set_send" }
                }
            }),
        ),
        ToolInfo::new(
            "return_track_operations",
            "Query and mutate return tracks",
            json!({
                "type": "object",
                "required": ["action"],
                "properties": {
                    "action": {
                        "type": "string",
                        "enum": ["get", "set_name", "set_volume", "set_pan", "mute"]
                    },
                    "return_track_id": { "type": "integer" },
                    "value": { "description": "Action-specific value" }
                }
            }),
        ),
        // ======================================================================
        // Clips
        // ======================================================================
        ToolInfo::new(
            "clip_operations",
            "Clip slots and clips: create, fire, properties, notes",
            json!({
                "type": "object",
                "required": ["action", "track_id", "scene_id"],
                "properties": {
                    "action": {
                        "type": "string",
                        "enum": ["get_info", "get_name", "set_name", "get_length",
                                 "set_loop_start", "set_loop_end", "set_color", "fire", "stop",
                                 "create", "delete", "has_clip", "get_notes", "remove_notes"]
                    },
                    "track_id": { "type": "integer" },
                    "scene_id": { "type": "integer" },
                    "value": { "description": "Action-specific value (name, beats, color)" },
                    "pitch": { "type": "integer", "description": "remove_notes: pitch to remove" },
                    "start": { "type": "number", "description": "remove_notes: start beat to remove" }
                }
            }),
        ),
        ToolInfo::new(
            "add_notes",
            "Add MIDI notes to a clip, creating it if the slot is empty; optional quantize and scale filter",
            json!({
                "type": "object",
                "required": ["track_id", "clip_id", "notes"],
                "properties": {
                    "track_id": { "type": "integer" },
                    "clip_id": { "type": "integer", "description": "Slot index (scene row)" },
                    "notes": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "required": ["pitch", "start", "duration", "velocity"],
                            "properties": {
                                "pitch": { "type": "integer", "description": "0-127" },
                                "start": { "type": "number", "description": "Beats, >= 0" },
                                "duration": { "type": "number", "description": "Beats, > 0" },
                                "velocity": { "type": "integer", "description": "1-127" },
                                "muted": { "type": "boolean" }
                            }
                        }
                    },
                    "quantize": { "type": "boolean", "description": "Snap starts to the grid" },
                    "quantize_value": { "type": "number", "description": "Grid in beats (default 0.25)" },
                    "scale_filter": { "type": "string", "description": "Scale mode; out-of-scale notes are dropped" },
                    "root_note": { "type": "integer", "description": "Scale root as MIDI pitch" }
                }
            }),
        ),
        // ======================================================================
        // Scenes
        // ======================================================================
        ToolInfo::new(
            "scene_operations",
            "Fire, create, delete, and edit scenes",
            json!({
                "type": "object",
                "required": ["action"],
                "properties": {
                    "action": {
                        "type": "string",
                        "enum": ["get", "fire", "create", "delete", "duplicate",
                                 "rename", "recolor", "set_tempo"]
                    },
                    "scene_id": { "type": "integer", "description": "0-based scene index; -1 appends on create" },
                    "value": { "description": "Action-specific value (name, color, BPM)" }
                }
            }),
        ),
        // ======================================================================
        // Devices
        // ======================================================================
        ToolInfo::new(
            "device_operations",
            "Inspect devices and read or set their parameters",
            json!({
                "type": "object",
                "required": ["action", "track_id", "device_id"],
                "properties": {
                    "action": {
                        "type": "string",
                        "enum": ["get_info", "toggle_active", "get_param", "set_param",
                                 "get_param_name", "get_param_display", "get_param_min", "get_param_max"]
                    },
                    "track_id": { "type": "integer" },
                    "device_id": { "type": "integer" },
                    "param_index": { "type": "integer" },
                    "value": { "type": "number", "description": "set_param value" }
                }
            }),
        ),
        // ======================================================================
        // View
        // ======================================================================
        ToolInfo::new(
            "view_control",
            "Select tracks/scenes and focus clips in the Live UI",
            json!({
                "type": "object",
                "required": ["action"],
                "properties": {
                    "action": {
                        "type": "string",
                        "enum": ["get_selected_track", "select_track",
                                 "get_selected_scene", "select_scene", "show_clip"]
                    },
                    "track_id": { "type": "integer" },
                    "scene_id": { "type": "integer" }
                }
            }),
        ),
        // ======================================================================
        // Analysis (local, no connection needed)
        // ======================================================================
        ToolInfo::new(
            "analyze_harmony",
            "Detect the key of a set of MIDI pitches, optionally suggesting a chord progression",
            json!({
                "type": "object",
                "required": ["notes"],
                "properties": {
                    "notes": { "type": "array", "items": { "type": "integer" }, "description": "MIDI pitches 0-127" },
                    "suggest_progressions": { "type": "boolean" },
                    "genre": { "type": "string", "description": "pop, jazz, blues, minor, folk" }
                }
            }),
        ),
        ToolInfo::new(
            "analyze_tempo",
            "Suggest a tempo for a genre at a given energy",
            json!({
                "type": "object",
                "required": ["current_bpm", "genre", "energy_level"],
                "properties": {
                    "current_bpm": { "type": "number", "description": "20-999" },
                    "genre": { "type": "string", "description": "e.g. ballad, lofi, hiphop, rock, pop, house, techno, dnb, trap" },
                    "energy_level": { "type": "number", "description": "0-1" }
                }
            }),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schemas_are_objects_with_properties() {
        for tool in list_tools() {
            assert_eq!(tool.input_schema["type"], "object", "{}", tool.name);
            assert!(tool.input_schema["properties"].is_object(), "{}", tool.name);
            assert!(!tool.description.is_empty(), "{}", tool.name);
        }
    }

    #[test]
    fn tool_names_are_unique() {
        let mut names: Vec<String> = list_tools().into_iter().map(|t| t.name).collect();
        let before = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), before);
    }

    #[test]
    fn required_fields_exist_in_properties() {
        for tool in list_tools() {
            let schema = &tool.input_schema;
            let Some(required) = schema["required"].as_array() else {
                continue;
            };
            for field in required {
                let field = field.as_str().unwrap();
                assert!(
                    schema["properties"][field].is_object(),
                    "{}: required field {field} missing from properties",
                    tool.name
                );
            }
        }
    }
}
