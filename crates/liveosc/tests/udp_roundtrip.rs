//! End-to-end tests for the transport + correlator pair.
//!
//! Uses a real mock peer on loopback ephemeral ports: the peer decodes
//! requests and replies to the transport's receive socket, the way the
//! AbletonOSC remote script answers on the configured reply port.

use std::sync::Arc;
use std::time::Duration;

use liveosc::{decode, encode, Correlator, Inbound, OscArg, OscEndpoints, OscError, UdpTransport};
use tokio::net::UdpSocket;

/// Wire the correlator in as the transport's inbound handler.
fn install_correlator(transport: &Arc<UdpTransport>, correlator: &Correlator) {
    let correlator = correlator.clone();
    transport.set_handler(Arc::new(move |addr, args| {
        correlator.handle_response(&addr, args);
    }));
}

/// Bring up a transport pointed at a not-yet-known peer port. The receive
/// socket binds to an ephemeral port that the peer replies to.
async fn connected_transport(send_port: u16) -> Arc<UdpTransport> {
    let transport = Arc::new(UdpTransport::new());
    transport
        .connect(OscEndpoints {
            host: "127.0.0.1".into(),
            send_port,
            receive_port: 0,
        })
        .await
        .unwrap();
    transport
}

#[tokio::test]
async fn request_reply_roundtrip() {
    // The peer port must exist before the transport connects, so stage a
    // listener first and wire the reply target after connect.
    let staging = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let peer_port = staging.local_addr().unwrap().port();
    drop(staging);

    let transport = connected_transport(peer_port).await;
    let reply_to = transport.local_receive_addr().await.unwrap();

    let peer = UdpSocket::bind(("127.0.0.1", peer_port)).await.unwrap();
    tokio::spawn(async move {
        let mut buf = [0u8; 65536];
        let (len, _) = peer.recv_from(&mut buf).await.unwrap();
        let Ok(Inbound::Message(msg)) = decode(&buf[..len]) else {
            panic!("peer received garbage");
        };
        assert_eq!(msg.addr, "/song/get/tempo");
        let bytes = encode("/song/get/tempo", &[OscArg::Float(128.0)]).unwrap();
        peer.send_to(&bytes, reply_to).await.unwrap();
    });

    let correlator = Correlator::new();
    install_correlator(&transport, &correlator);

    let pending = correlator.expect_response("/song/get/tempo");
    transport.send("/song/get/tempo", &[]).await.unwrap();
    let reply = pending.wait(Duration::from_secs(1)).await.unwrap();

    assert_eq!(reply, vec![OscArg::Float(128.0)]);
    transport.disconnect().await;
}

#[tokio::test]
async fn concurrent_requests_on_distinct_addresses() {
    let transport = Arc::new(UdpTransport::new());
    let correlator = Correlator::new();
    install_correlator(&transport, &correlator);

    // Peer echoes every request back with one extra arg, to whatever
    // address asked.
    let staging = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let peer_port = staging.local_addr().unwrap().port();
    drop(staging);

    transport
        .connect(OscEndpoints {
            host: "127.0.0.1".into(),
            send_port: peer_port,
            receive_port: 0,
        })
        .await
        .unwrap();
    let reply_to = transport.local_receive_addr().await.unwrap();

    let peer = UdpSocket::bind(("127.0.0.1", peer_port)).await.unwrap();
    tokio::spawn(async move {
        let mut buf = [0u8; 65536];
        for _ in 0..3 {
            let (len, _) = peer.recv_from(&mut buf).await.unwrap();
            if let Ok(Inbound::Message(msg)) = decode(&buf[..len]) {
                let mut args = msg.args;
                args.push(OscArg::Bool(true));
                let bytes = encode(&msg.addr, &args).unwrap();
                peer.send_to(&bytes, reply_to).await.unwrap();
            }
        }
    });

    let addrs = ["/song/get/tempo", "/song/get/metronome", "/song/get/swing_amount"];
    let mut handles = Vec::new();
    for (i, addr) in addrs.iter().enumerate() {
        let pending = correlator.expect_response(addr);
        transport.send(addr, &[OscArg::Int(i as i32)]).await.unwrap();
        handles.push(pending);
    }

    for (i, pending) in handles.into_iter().enumerate() {
        let reply = pending.wait(Duration::from_secs(1)).await.unwrap();
        assert_eq!(reply[0], OscArg::Int(i as i32));
    }
    transport.disconnect().await;
}

#[tokio::test]
async fn timeout_leaves_transport_usable() {
    let staging = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let peer_port = staging.local_addr().unwrap().port();
    drop(staging);

    let transport = connected_transport(peer_port).await;
    let reply_to = transport.local_receive_addr().await.unwrap();
    let correlator = Correlator::new();
    install_correlator(&transport, &correlator);

    // Peer ignores the first request, answers the second.
    let peer = UdpSocket::bind(("127.0.0.1", peer_port)).await.unwrap();
    tokio::spawn(async move {
        let mut buf = [0u8; 65536];
        let _ = peer.recv_from(&mut buf).await.unwrap();
        let (len, _) = peer.recv_from(&mut buf).await.unwrap();
        if let Ok(Inbound::Message(msg)) = decode(&buf[..len]) {
            let bytes = encode(&msg.addr, &[OscArg::Int(4)]).unwrap();
            peer.send_to(&bytes, reply_to).await.unwrap();
        }
    });

    let pending = correlator.expect_response("/song/get/num_tracks");
    transport.send("/song/get/num_tracks", &[]).await.unwrap();
    let err = pending.wait(Duration::from_millis(100)).await.unwrap_err();
    assert!(matches!(err, OscError::Timeout { .. }));
    assert!(transport.is_connected(), "timeout must not tear the transport down");

    let pending = correlator.expect_response("/song/get/num_tracks");
    transport.send("/song/get/num_tracks", &[]).await.unwrap();
    let reply = pending.wait(Duration::from_secs(1)).await.unwrap();
    assert_eq!(reply, vec![OscArg::Int(4)]);

    transport.disconnect().await;
}

#[tokio::test]
async fn malformed_datagram_does_not_kill_the_loop() {
    let staging = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let peer_port = staging.local_addr().unwrap().port();
    drop(staging);

    let transport = connected_transport(peer_port).await;
    let reply_to = transport.local_receive_addr().await.unwrap();
    let correlator = Correlator::new();
    install_correlator(&transport, &correlator);

    let peer = UdpSocket::bind(("127.0.0.1", peer_port)).await.unwrap();
    tokio::spawn(async move {
        let mut buf = [0u8; 65536];
        let (len, _) = peer.recv_from(&mut buf).await.unwrap();
        // Garbage first, then the real reply.
        peer.send_to(b"\xff\xfe not osc", reply_to).await.unwrap();
        if let Ok(Inbound::Message(msg)) = decode(&buf[..len]) {
            let bytes = encode(&msg.addr, &[OscArg::Str("ok".into())]).unwrap();
            peer.send_to(&bytes, reply_to).await.unwrap();
        }
    });

    let pending = correlator.expect_response("/test");
    transport.send("/test", &[]).await.unwrap();
    let reply = pending.wait(Duration::from_secs(1)).await.unwrap();
    assert_eq!(reply, vec![OscArg::Str("ok".into())]);

    transport.disconnect().await;
}
