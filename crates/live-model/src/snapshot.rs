use serde::{Deserialize, Serialize};

/// Kind of a track as reported by the Live set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    Midi,
    Audio,
    Return,
    Master,
}

/// Song time signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSignature {
    pub numerator: u32,
    pub denominator: u32,
}

/// Arrangement loop region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoopRegion {
    pub enabled: bool,
    /// Loop start in beats
    pub start: f64,
    /// Loop length in beats
    pub length: f64,
}

/// Top-level song snapshot.
///
/// Scalar fields are optional because composite queries degrade failed
/// subqueries to `None` instead of failing the whole snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Song {
    pub name: Option<String>,
    pub tempo: Option<f32>,
    pub time_signature: Option<TimeSignature>,
    pub is_playing: Option<bool>,
    /// Current song position in beats
    pub current_time: Option<f64>,
    pub song_length: Option<f64>,
    pub loop_region: Option<LoopRegion>,
    pub metronome: Option<bool>,
    pub overdub: Option<bool>,
    pub swing: Option<f32>,
    pub record_mode: Option<bool>,
    pub session_record: Option<bool>,
    pub punch_in: Option<bool>,
    pub punch_out: Option<bool>,
    pub master_volume: Option<f32>,
    pub master_pan: Option<f32>,
    pub track_count: Option<i32>,
    pub scene_count: Option<i32>,
    pub return_track_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracks: Option<Vec<Track>>,
}

/// Track snapshot. Master and return tracks populate a subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Dense 0-based index at query time
    pub id: i32,
    pub name: Option<String>,
    pub kind: TrackKind,
    pub volume: Option<f32>,
    pub pan: Option<f32>,
    pub mute: Option<bool>,
    pub solo: Option<bool>,
    pub arm: Option<bool>,
    pub color: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sends: Vec<f32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clip_slots: Vec<ClipSlot>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub devices: Vec<Device>,
}

impl Track {
    pub fn new(id: i32, kind: TrackKind) -> Self {
        Self {
            id,
            name: None,
            kind,
            volume: None,
            pan: None,
            mute: None,
            solo: None,
            arm: None,
            color: None,
            sends: Vec::new(),
            clip_slots: Vec::new(),
            devices: Vec::new(),
        }
    }
}

/// Intersection of a track and a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipSlot {
    pub has_clip: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip: Option<Clip>,
}

/// Clip snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub track_id: i32,
    /// Slot index (scene row)
    pub scene_id: i32,
    pub name: Option<String>,
    /// Length in beats
    pub length: Option<f64>,
    pub loop_start: Option<f64>,
    pub loop_end: Option<f64>,
    pub is_playing: Option<bool>,
    pub color: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<Note>,
}

/// One MIDI note inside a clip. Times are in beats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub pitch: u8,
    pub start: f64,
    pub duration: f64,
    pub velocity: u8,
    #[serde(default)]
    pub muted: bool,
}

impl Note {
    /// Notes within a clip are identified by (pitch, start).
    pub fn same_slot(&self, other: &Note) -> bool {
        self.pitch == other.pitch && (self.start - other.start).abs() < 1e-9
    }

    /// End of the note in beats.
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Device snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub track_id: i32,
    pub device_id: i32,
    pub name: Option<String>,
    pub class_name: Option<String>,
    pub is_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<DeviceParameter>,
}

/// One automatable device parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceParameter {
    pub index: i32,
    pub name: Option<String>,
    pub value: f32,
    pub min: Option<f32>,
    pub max: Option<f32>,
    pub display_value: Option<String>,
}

/// Scene snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub id: i32,
    pub name: Option<String>,
    pub color: Option<i32>,
    /// Scene launch tempo, if the scene has one
    pub tempo: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn note_identity_is_pitch_and_start() {
        let a = Note { pitch: 60, start: 1.0, duration: 0.5, velocity: 100, muted: false };
        let b = Note { pitch: 60, start: 1.0, duration: 2.0, velocity: 64, muted: true };
        let c = Note { pitch: 61, start: 1.0, duration: 0.5, velocity: 100, muted: false };

        assert!(a.same_slot(&b));
        assert!(!a.same_slot(&c));
    }

    #[test]
    fn note_muted_defaults_to_false() {
        let n: Note =
            serde_json::from_str(r#"{"pitch":60,"start":0.0,"duration":1.0,"velocity":100}"#)
                .unwrap();
        assert!(!n.muted);
    }

    #[test]
    fn song_snapshot_roundtrips() {
        let song = Song {
            tempo: Some(120.0),
            time_signature: Some(TimeSignature { numerator: 4, denominator: 4 }),
            is_playing: Some(false),
            ..Default::default()
        };
        let json = serde_json::to_string(&song).unwrap();
        let back: Song = serde_json::from_str(&json).unwrap();
        assert_eq!(song, back);
    }

    #[test]
    fn empty_track_collections_are_omitted() {
        let track = Track::new(0, TrackKind::Midi);
        let json = serde_json::to_value(&track).unwrap();
        assert!(json.get("clip_slots").is_none());
        assert!(json.get("devices").is_none());
    }
}
