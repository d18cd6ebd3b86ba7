//! get_song_info: the full song snapshot, optionally with tracks and
//! devices.
//!
//! Scalars are fetched concurrently, each on its own address with its own
//! timeout. One failing subquery degrades its field to null and lands in
//! `partial_failures`; only a failing tempo query (the root) fails the
//! whole call.

use std::sync::Arc;

use futures::future::join_all;
use live_model::{Song, Track};
use livegate::{GatewayError, LiveGateway};
use serde::Deserialize;
use serde_json::json;

use crate::usecases::{settle, UseCaseResult};
use crate::{Session, ToolOutcome};

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SongInfoArgs {
    #[serde(default = "default_true")]
    pub include_tracks: bool,
    #[serde(default)]
    pub include_devices: bool,
}

pub async fn execute(session: &Session, args: SongInfoArgs) -> ToolOutcome {
    settle(run(session, args).await)
}

/// Record a failed subquery and degrade the field.
fn degrade<T>(
    result: Result<T, GatewayError>,
    field: &str,
    failures: &mut Vec<String>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            failures.push(format!("{field}: {err}"));
            None
        }
    }
}

async fn run(session: &Session, args: SongInfoArgs) -> UseCaseResult {
    let gateway = session.gateway().await?;
    let mut failures = Vec::new();

    // Root query: if the DAW cannot even answer its tempo, the snapshot
    // is not worth assembling.
    let tempo = gateway.get_tempo().await?;

    let (
        signature,
        is_playing,
        current_time,
        song_length,
        loop_region,
        metronome,
        overdub,
        swing,
        record_mode,
        session_record,
        punch_in,
        punch_out,
        master_volume,
        master_pan,
        track_count,
        scene_count,
        return_track_count,
    ) = tokio::join!(
        gateway.get_time_signature(),
        gateway.get_is_playing(),
        gateway.get_current_song_time(),
        gateway.get_song_length(),
        gateway.get_loop_region(),
        gateway.get_metronome(),
        gateway.get_overdub(),
        gateway.get_swing(),
        gateway.get_record_mode(),
        gateway.get_session_record(),
        gateway.get_punch_in(),
        gateway.get_punch_out(),
        gateway.get_master_volume(),
        gateway.get_master_pan(),
        gateway.get_num_tracks(),
        gateway.get_num_scenes(),
        gateway.get_num_return_tracks(),
    );

    let mut song = Song {
        tempo: Some(tempo),
        time_signature: degrade(signature, "time_signature", &mut failures),
        is_playing: degrade(is_playing, "is_playing", &mut failures),
        current_time: degrade(current_time, "current_time", &mut failures).map(f64::from),
        song_length: degrade(song_length, "song_length", &mut failures).map(f64::from),
        loop_region: degrade(loop_region, "loop", &mut failures),
        metronome: degrade(metronome, "metronome", &mut failures),
        overdub: degrade(overdub, "overdub", &mut failures),
        swing: degrade(swing, "swing", &mut failures),
        record_mode: degrade(record_mode, "record_mode", &mut failures),
        session_record: degrade(session_record, "session_record", &mut failures),
        punch_in: degrade(punch_in, "punch_in", &mut failures),
        punch_out: degrade(punch_out, "punch_out", &mut failures),
        master_volume: degrade(master_volume, "master_volume", &mut failures),
        master_pan: degrade(master_pan, "master_pan", &mut failures),
        track_count: degrade(track_count, "track_count", &mut failures),
        scene_count: degrade(scene_count, "scene_count", &mut failures),
        return_track_count: degrade(return_track_count, "return_track_count", &mut failures),
        ..Default::default()
    };

    if args.include_tracks {
        if let Some(count) = song.track_count {
            song.tracks =
                Some(fetch_tracks(&gateway, count, args.include_devices, &mut failures).await);
        } else {
            failures.push("tracks: skipped, track count unknown".to_string());
        }
    }

    let track_text = match song.track_count {
        Some(n) => format!("{n} tracks"),
        None => "unknown track count".to_string(),
    };
    let playing_text = match song.is_playing {
        Some(true) => ", playing",
        _ => "",
    };
    Ok(ToolOutcome::ok(
        format!("Song at {tempo:.1} BPM, {track_text}{playing_text}"),
        json!({ "song": song, "partial_failures": failures }),
    ))
}

async fn fetch_tracks(
    gateway: &Arc<LiveGateway>,
    count: i32,
    include_devices: bool,
    failures: &mut Vec<String>,
) -> Vec<Track> {
    let snapshots = join_all((0..count).map(|id| {
        let gateway = Arc::clone(gateway);
        async move { (id, gateway.track_info(id).await) }
    }))
    .await;

    let mut tracks = Vec::with_capacity(count as usize);
    for (id, snapshot) in snapshots {
        match snapshot {
            Ok(mut track) => {
                if include_devices {
                    track.devices = fetch_devices(gateway, id, failures).await;
                }
                tracks.push(track);
            }
            Err(err) => failures.push(format!("track {id}: {err}")),
        }
    }
    tracks
}

async fn fetch_devices(
    gateway: &Arc<LiveGateway>,
    track_id: i32,
    failures: &mut Vec<String>,
) -> Vec<live_model::Device> {
    let count = match gateway.get_num_devices(track_id).await {
        Ok(count) => count,
        Err(err) => {
            failures.push(format!("track {track_id} devices: {err}"));
            return Vec::new();
        }
    };

    let snapshots = join_all((0..count).map(|device_id| {
        let gateway = Arc::clone(gateway);
        async move { (device_id, gateway.device_info(track_id, device_id).await) }
    }))
    .await;

    let mut devices = Vec::with_capacity(count as usize);
    for (device_id, snapshot) in snapshots {
        match snapshot {
            Ok(device) => devices.push(device),
            Err(err) => failures.push(format!("track {track_id} device {device_id}: {err}")),
        }
    }
    devices
}
