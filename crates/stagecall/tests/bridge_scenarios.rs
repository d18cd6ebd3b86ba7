//! End-to-end scenarios: tool dispatch -> use case -> gateway -> OSC,
//! against a mock AbletonOSC peer on loopback.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use liveconf::BridgeConfig;
use liveosc::{decode, encode, Inbound, OscArg, OscMessage};
use serde_json::json;
use stagecall::{tools, ConnectionState, ErrorCode, Session};
use tokio::net::UdpSocket;

/// Mock AbletonOSC: answers via a reply function, records every request.
struct MockScript {
    port: u16,
    received: Arc<Mutex<Vec<OscMessage>>>,
}

impl MockScript {
    async fn spawn<F>(reply_to: SocketAddr, reply: F) -> Self
    where
        F: Fn(&str, &[OscArg]) -> Option<Vec<OscArg>> + Send + Sync + 'static,
    {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = socket.local_addr().unwrap().port();
        let received = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&received);
        tokio::spawn(async move {
            let mut buf = [0u8; 65536];
            loop {
                let Ok((len, _)) = socket.recv_from(&mut buf).await else {
                    return;
                };
                let Ok(Inbound::Message(msg)) = decode(&buf[..len]) else {
                    continue;
                };
                log.lock().unwrap().push(msg.clone());
                if let Some(args) = reply(&msg.addr, &msg.args) {
                    let bytes = encode(&msg.addr, &args).unwrap();
                    socket.send_to(&bytes, reply_to).await.unwrap();
                }
            }
        });

        Self { port, received }
    }

    fn requests_to(&self, addr: &str) -> Vec<OscMessage> {
        self.received
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.addr == addr)
            .cloned()
            .collect()
    }
}

async fn free_port() -> u16 {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = socket.local_addr().unwrap().port();
    drop(socket);
    port
}

/// Session connected to a fresh mock. The mock must at least answer
/// `/test` for the connect probe.
async fn connected_session<F>(reply: F) -> (Arc<Session>, MockScript)
where
    F: Fn(&str, &[OscArg]) -> Option<Vec<OscArg>> + Send + Sync + 'static,
{
    let receive_port = free_port().await;
    let reply_to: SocketAddr = format!("127.0.0.1:{receive_port}").parse().unwrap();
    let mock = MockScript::spawn(reply_to, reply).await;

    let mut config = BridgeConfig::default();
    config.osc.timeout_ms = 300;
    let session = Session::new(config);

    let outcome = tools::dispatch(
        &session,
        "connect_ableton",
        json!({ "host": "127.0.0.1", "send_port": mock.port, "receive_port": receive_port }),
    )
    .await;
    assert!(outcome.success, "connect failed: {}", outcome.render_message());

    (session, mock)
}

fn answer_test_probe(addr: &str) -> Option<Vec<OscArg>> {
    (addr == "/test").then(|| vec![OscArg::Str("ok".into())])
}

// === S1: connect then probe ===

#[tokio::test]
async fn s1_connect_transitions_to_connected() {
    let (session, mock) = connected_session(|addr, _| answer_test_probe(addr)).await;

    assert_eq!(session.state().await, ConnectionState::Connected);
    assert_eq!(mock.requests_to("/test").len(), 1);

    let status = tools::dispatch(&session, "get_connection_status", json!({})).await;
    assert_eq!(status.data.unwrap()["state"], "connected");
    session.disconnect().await;
}

#[tokio::test]
async fn s1_probe_timeout_tears_the_link_down() {
    let receive_port = free_port().await;
    let reply_to: SocketAddr = format!("127.0.0.1:{receive_port}").parse().unwrap();
    // Mock that never answers anything.
    let mock = MockScript::spawn(reply_to, |_, _| None).await;

    let mut config = BridgeConfig::default();
    config.osc.timeout_ms = 200;
    let session = Session::new(config);

    let outcome = tools::dispatch(
        &session,
        "connect_ableton",
        json!({ "host": "127.0.0.1", "send_port": mock.port, "receive_port": receive_port }),
    )
    .await;

    assert!(!outcome.success);
    assert_eq!(outcome.error_code, Some(ErrorCode::ConnectionFailed));
    assert_eq!(session.state().await, ConnectionState::Disconnected);
}

// === S2: tempo round trip ===

#[tokio::test]
async fn s2_song_properties_get_returns_tempo() {
    let (session, _mock) = connected_session(|addr, _| match addr {
        "/test" => Some(vec![OscArg::Str("ok".into())]),
        "/song/get/tempo" => Some(vec![OscArg::Float(120.0)]),
        _ => None,
    })
    .await;

    let outcome =
        tools::dispatch(&session, "song_properties", json!({ "action": "get" })).await;
    assert!(outcome.success, "{}", outcome.render_message());
    assert_eq!(outcome.data.unwrap()["tempo"], 120.0);
    session.disconnect().await;
}

// === S3: tempo validation ===

#[tokio::test]
async fn s3_out_of_range_tempo_sends_nothing() {
    let (session, mock) = connected_session(|addr, _| answer_test_probe(addr)).await;

    let outcome = tools::dispatch(
        &session,
        "song_properties",
        json!({ "action": "set_tempo", "value": 10 }),
    )
    .await;

    assert!(!outcome.success);
    assert_eq!(outcome.error_code, Some(ErrorCode::ValidationError));
    assert!(outcome.render_message().starts_with("[VALIDATION_ERROR]"));

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(mock.requests_to("/song/set/tempo").is_empty());
    session.disconnect().await;
}

// === S4: add_notes flat encoding ===

#[tokio::test]
async fn s4_add_notes_emits_one_flat_packet() {
    let (session, mock) = connected_session(|addr, args| match addr {
        "/test" => Some(vec![OscArg::Str("ok".into())]),
        "/clip_slot/get/has_clip" => {
            Some(vec![args[0].clone(), args[1].clone(), OscArg::Bool(true)])
        }
        _ => None,
    })
    .await;

    let outcome = tools::dispatch(
        &session,
        "add_notes",
        json!({
            "track_id": 0,
            "clip_id": 0,
            "notes": [
                { "pitch": 60, "start": 0.0, "duration": 1.0, "velocity": 100 },
                { "pitch": 64, "start": 1.0, "duration": 1.0, "velocity": 100 }
            ]
        }),
    )
    .await;
    assert!(outcome.success, "{}", outcome.render_message());

    tokio::time::sleep(Duration::from_millis(50)).await;
    let sent = mock.requests_to("/clip/add/notes");
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].args,
        vec![
            OscArg::Int(0),
            OscArg::Int(0),
            OscArg::Int(60),
            OscArg::Float(0.0),
            OscArg::Float(1.0),
            OscArg::Int(100),
            OscArg::Bool(false),
            OscArg::Int(64),
            OscArg::Float(1.0),
            OscArg::Float(1.0),
            OscArg::Int(100),
            OscArg::Bool(false),
        ]
    );
    // The slot already had a clip, so none was created.
    assert!(mock.requests_to("/clip_slot/create_clip").is_empty());
    session.disconnect().await;
}

#[tokio::test]
async fn s4b_add_notes_creates_missing_clip_sized_to_whole_bars() {
    let (session, mock) = connected_session(|addr, args| match addr {
        "/test" => Some(vec![OscArg::Str("ok".into())]),
        "/clip_slot/get/has_clip" => {
            Some(vec![args[0].clone(), args[1].clone(), OscArg::Bool(false)])
        }
        _ => None,
    })
    .await;

    let outcome = tools::dispatch(
        &session,
        "add_notes",
        json!({
            "track_id": 1,
            "clip_id": 2,
            "notes": [{ "pitch": 60, "start": 4.5, "duration": 1.0, "velocity": 90 }]
        }),
    )
    .await;
    assert!(outcome.success, "{}", outcome.render_message());

    tokio::time::sleep(Duration::from_millis(50)).await;
    let created = mock.requests_to("/clip_slot/create_clip");
    assert_eq!(created.len(), 1);
    // max end = 5.5 beats -> two 4-beat bars.
    assert_eq!(
        created[0].args,
        vec![OscArg::Int(1), OscArg::Int(2), OscArg::Float(8.0)]
    );
    session.disconnect().await;
}

// === S5: timeout is recoverable ===

#[tokio::test]
async fn s5_timeout_then_recovery() {
    let tempo_calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&tempo_calls);

    let (session, _mock) = connected_session(move |addr, _| match addr {
        "/test" => Some(vec![OscArg::Str("ok".into())]),
        // Ignore the first tempo query, answer later ones.
        "/song/get/tempo" => {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                None
            } else {
                Some(vec![OscArg::Float(99.0)])
            }
        }
        _ => None,
    })
    .await;

    let outcome =
        tools::dispatch(&session, "song_properties", json!({ "action": "get" })).await;
    assert!(!outcome.success);
    assert_eq!(outcome.error_code, Some(ErrorCode::OscCommunicationError));

    // The transport survived; the next call succeeds.
    assert_eq!(session.state().await, ConnectionState::Connected);
    let outcome =
        tools::dispatch(&session, "song_properties", json!({ "action": "get" })).await;
    assert!(outcome.success, "{}", outcome.render_message());
    assert_eq!(outcome.data.unwrap()["tempo"], 99.0);
    session.disconnect().await;
}

// === S6: same-address calls serialize and match their callers ===

#[tokio::test]
async fn s6_concurrent_same_address_calls_get_their_own_replies() {
    let (session, _mock) = connected_session(|addr, args| match addr {
        "/test" => Some(vec![OscArg::Str("ok".into())]),
        "/clip_slot/get/has_clip" => {
            Some(vec![args[0].clone(), args[1].clone(), OscArg::Bool(true)])
        }
        "/clip/get/name" => {
            let track = args[0].as_int().unwrap();
            let scene = args[1].as_int().unwrap();
            Some(vec![
                args[0].clone(),
                args[1].clone(),
                OscArg::Str(format!("clip-{track}-{scene}")),
            ])
        }
        _ => None,
    })
    .await;

    let mut joins = Vec::new();
    for (track, scene) in [(0, 0), (1, 3), (2, 5)] {
        let session = Arc::clone(&session);
        joins.push(tokio::spawn(async move {
            let outcome = tools::dispatch(
                &session,
                "clip_operations",
                json!({ "action": "get_name", "track_id": track, "scene_id": scene }),
            )
            .await;
            (track, scene, outcome)
        }));
    }

    for join in joins {
        let (track, scene, outcome) = join.await.unwrap();
        assert!(outcome.success, "{}", outcome.render_message());
        assert_eq!(outcome.data.unwrap()["name"], format!("clip-{track}-{scene}"));
    }
    session.disconnect().await;
}

// === S7: harmony detection ===

#[tokio::test]
async fn s7_harmony_detects_c_major_and_suggests_pop_chords() {
    // Pure analysis - no connection required.
    let session = Session::new(BridgeConfig::default());

    let outcome = tools::dispatch(
        &session,
        "analyze_harmony",
        json!({
            "notes": [60, 62, 64, 65, 67, 69, 71],
            "suggest_progressions": true,
            "genre": "pop"
        }),
    )
    .await;
    assert!(outcome.success, "{}", outcome.render_message());

    let data = outcome.data.unwrap();
    assert_eq!(data["key"]["root"], "C");
    assert_eq!(data["key"]["mode"], "major");
    assert!(data["key"]["confidence"].as_f64().unwrap() >= 0.9);

    let progression = data["progression"].as_array().unwrap();
    assert_eq!(progression.len(), 4);
    let first: Vec<u64> = progression[0]["pitches"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p.as_u64().unwrap())
        .collect();
    assert!(first.iter().any(|p| p % 12 == 0), "first chord must contain pitch class C");
}

// === Disconnect semantics (invariant 5) ===

#[tokio::test]
async fn disconnect_makes_every_wire_tool_fail_not_connected() {
    let (session, _mock) = connected_session(|addr, _| answer_test_probe(addr)).await;

    let outcome = tools::dispatch(&session, "disconnect_ableton", json!({})).await;
    assert!(outcome.success);
    assert_eq!(session.state().await, ConnectionState::Disconnected);

    let outcome =
        tools::dispatch(&session, "transport_control", json!({ "action": "play" })).await;
    assert!(!outcome.success);
    assert_eq!(outcome.error_code, Some(ErrorCode::NotConnected));
    assert_eq!(outcome.render_message(), format!("[NOT_CONNECTED] {}", outcome.message));
}
