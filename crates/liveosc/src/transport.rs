//! Async UDP transport for the OSC link.
//!
//! Owns an outbound socket aimed at the remote script's listen port and an
//! inbound socket bound to the reply port, plus a background task that
//! decodes each inbound datagram and hands it to the installed handler.
//! The transport never interprets message semantics and never retries;
//! datagram loss surfaces as a correlator timeout upstream.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use tokio::net::UdpSocket;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::{codec, OscArg, OscError, DEFAULT_HOST, DEFAULT_RECEIVE_PORT, DEFAULT_SEND_PORT};

/// Where to send requests and where to listen for replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OscEndpoints {
    pub host: String,
    pub send_port: u16,
    pub receive_port: u16,
}

impl Default for OscEndpoints {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            send_port: DEFAULT_SEND_PORT,
            receive_port: DEFAULT_RECEIVE_PORT,
        }
    }
}

impl OscEndpoints {
    pub fn send_addr(&self) -> String {
        format!("{}:{}", self.host, self.send_port)
    }

    pub fn receive_addr(&self) -> String {
        format!("{}:{}", self.host, self.receive_port)
    }
}

/// The sole dispatch target for decoded inbound messages.
pub type InboundHandler = Arc<dyn Fn(String, Vec<OscArg>) + Send + Sync>;

struct Active {
    send_socket: Arc<UdpSocket>,
    receive_local: SocketAddr,
    recv_task: JoinHandle<()>,
    endpoints: OscEndpoints,
}

/// UDP socket pair with a background receive loop.
#[derive(Default)]
pub struct UdpTransport {
    active: Mutex<Option<Active>>,
    connected: AtomicBool,
    handler: RwLock<Option<InboundHandler>>,
}

impl UdpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the inbound dispatch target. Exactly one handler at a time;
    /// installing again replaces the previous one.
    pub fn set_handler(&self, handler: InboundHandler) {
        *self.handler.write().expect("handler lock poisoned") = Some(handler);
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Open both sockets and start the receive loop. Calling this on an
    /// already-connected transport is a no-op.
    pub async fn connect(self: &Arc<Self>, endpoints: OscEndpoints) -> Result<(), OscError> {
        let mut active = self.active.lock().await;
        if active.is_some() {
            return Ok(());
        }

        let send_socket = UdpSocket::bind("0.0.0.0:0").await?;
        send_socket
            .connect(endpoints.send_addr())
            .await
            .map_err(|e| OscError::Transport(format!("connect {}: {e}", endpoints.send_addr())))?;

        let receive_socket = UdpSocket::bind(endpoints.receive_addr())
            .await
            .map_err(|e| OscError::Transport(format!("bind {}: {e}", endpoints.receive_addr())))?;
        let receive_local = receive_socket.local_addr()?;

        let recv_task = tokio::spawn(receive_loop(receive_socket, Arc::clone(self)));

        debug!(
            send = %endpoints.send_addr(),
            receive = %receive_local,
            "OSC transport up"
        );

        *active = Some(Active {
            send_socket: Arc::new(send_socket),
            receive_local,
            recv_task,
            endpoints,
        });
        self.connected.store(true, Ordering::Release);
        Ok(())
    }

    /// Stop the receive loop and drop both sockets. Safe to call on a
    /// transport that is already down.
    pub async fn disconnect(&self) {
        let mut active = self.active.lock().await;
        self.connected.store(false, Ordering::Release);
        if let Some(active) = active.take() {
            active.recv_task.abort();
            debug!(send = %active.endpoints.send_addr(), "OSC transport down");
        }
    }

    /// Fire one datagram at the remote script. Never waits for a reply.
    pub async fn send(&self, addr: &str, args: &[OscArg]) -> Result<(), OscError> {
        let bytes = codec::encode(addr, args)?;
        let socket = {
            let active = self.active.lock().await;
            match active.as_ref() {
                Some(a) => Arc::clone(&a.send_socket),
                None => return Err(OscError::NotConnected),
            }
        };
        socket.send(&bytes).await?;
        Ok(())
    }

    /// The endpoints this transport was connected with, if up.
    pub async fn endpoints(&self) -> Option<OscEndpoints> {
        self.active.lock().await.as_ref().map(|a| a.endpoints.clone())
    }

    /// Actual local address of the receive socket (useful when bound to
    /// port 0 in tests).
    pub async fn local_receive_addr(&self) -> Option<SocketAddr> {
        self.active.lock().await.as_ref().map(|a| a.receive_local)
    }
}

async fn receive_loop(socket: UdpSocket, transport: Arc<UdpTransport>) {
    // Max UDP payload; a clip's worth of notes fits comfortably.
    let mut buf = vec![0u8; 65536];
    loop {
        let (len, src) = match socket.recv_from(&mut buf).await {
            Ok(received) => received,
            Err(e) => {
                warn!(error = %e, "OSC receive failed");
                continue;
            }
        };
        let inbound = match codec::decode(&buf[..len]) {
            Ok(inbound) => inbound,
            Err(e) => {
                warn!(%src, len, error = %e, "dropping undecodable datagram");
                continue;
            }
        };
        let handler = transport
            .handler
            .read()
            .expect("handler lock poisoned")
            .clone();
        match handler {
            Some(handler) => {
                for msg in inbound.into_messages() {
                    handler(msg.addr, msg.args);
                }
            }
            None => warn!(%src, "inbound OSC with no handler installed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_before_connect_fails() {
        let transport = Arc::new(UdpTransport::new());
        let err = transport.send("/test", &[]).await.unwrap_err();
        assert!(matches!(err, OscError::NotConnected));
        assert!(!transport.is_connected());
    }

    #[tokio::test]
    async fn connect_is_idempotent() {
        let transport = Arc::new(UdpTransport::new());
        let endpoints = OscEndpoints {
            host: "127.0.0.1".into(),
            send_port: 19_001,
            receive_port: 0,
        };
        transport.connect(endpoints.clone()).await.unwrap();
        let first = transport.local_receive_addr().await.unwrap();

        transport.connect(endpoints).await.unwrap();
        assert_eq!(transport.local_receive_addr().await.unwrap(), first);

        transport.disconnect().await;
    }

    #[tokio::test]
    async fn disconnect_is_safe_repeatedly() {
        let transport = Arc::new(UdpTransport::new());
        transport.disconnect().await;
        transport
            .connect(OscEndpoints {
                host: "127.0.0.1".into(),
                send_port: 19_002,
                receive_port: 0,
            })
            .await
            .unwrap();
        transport.disconnect().await;
        transport.disconnect().await;
        assert!(!transport.is_connected());
    }
}
