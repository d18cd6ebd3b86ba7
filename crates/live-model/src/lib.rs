//! live-model - Snapshot types for the Ableton Live object model
//!
//! Everything here is a transient value produced by one query and consumed
//! by one tool call. The DAW remains the source of truth: there is no cache
//! and no identity tracking. Track/scene/device ids are dense 0-based
//! indices at query time and shift when the set mutates; callers re-query
//! after structural changes.

mod limits;
mod snapshot;

pub use limits::{
    check_loop_bounds, check_note, check_pan, check_pitch, check_send_index, check_signature,
    check_swing, check_tempo, check_track_index, check_unit, check_velocity, InvalidValue,
    TEMPO_MAX, TEMPO_MIN,
};
pub use snapshot::{
    Clip, ClipSlot, Device, DeviceParameter, LoopRegion, Note, Scene, Song, TimeSignature, Track,
    TrackKind,
};
