//! Connection state machine shared by every use case.
//!
//! Disconnected -> Connecting -> Connected, with disconnect legal from any
//! state. A failed probe tears the transport back down, so the machine can
//! never sit in Connecting with live sockets.

use std::sync::Arc;
use std::time::Duration;

use liveconf::BridgeConfig;
use livegate::{GatewayError, LiveGateway};
use liveosc::OscEndpoints;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
        };
        f.write_str(s)
    }
}

struct SessionInner {
    state: ConnectionState,
    gateway: Option<Arc<LiveGateway>>,
}

/// Owns the (single) DAW connection and its lifecycle.
pub struct Session {
    inner: RwLock<SessionInner>,
    config: BridgeConfig,
}

impl Session {
    pub fn new(config: BridgeConfig) -> Arc<Self> {
        Arc::new(Self {
            inner: RwLock::new(SessionInner {
                state: ConnectionState::Disconnected,
                gateway: None,
            }),
            config,
        })
    }

    /// The layered config this session started with; tool arguments
    /// override it per call.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.config.osc.timeout_ms)
    }

    pub async fn state(&self) -> ConnectionState {
        self.inner.read().await.state
    }

    /// The connected gateway, or `NotConnected` for every use case that
    /// needs wire access while the machine is not in `Connected`.
    pub async fn gateway(&self) -> Result<Arc<LiveGateway>, GatewayError> {
        let inner = self.inner.read().await;
        match (&inner.state, &inner.gateway) {
            (ConnectionState::Connected, Some(gateway)) => Ok(Arc::clone(gateway)),
            _ => Err(GatewayError::NotConnected),
        }
    }

    /// Open the link and probe it. On probe timeout the transport is torn
    /// down and the machine returns to Disconnected.
    pub async fn connect(&self, endpoints: OscEndpoints) -> Result<(), GatewayError> {
        {
            // A reconnect replaces any existing link.
            let mut inner = self.inner.write().await;
            if let Some(old) = inner.gateway.take() {
                warn!("reconnecting: closing previous OSC link");
                old.close().await;
            }
            inner.state = ConnectionState::Connecting;
        }

        let gateway = Arc::new(LiveGateway::new(self.timeout()));
        let result = async {
            gateway.open(endpoints.clone()).await?;
            gateway.probe().await
        }
        .await;

        let mut inner = self.inner.write().await;
        match result {
            Ok(()) => {
                // A concurrent connect may have won the race; its link is
                // replaced, not leaked.
                if let Some(old) = inner.gateway.take() {
                    old.close().await;
                }
                info!(send = %endpoints.send_addr(), receive = %endpoints.receive_addr(), "connected to Ableton");
                inner.state = ConnectionState::Connected;
                inner.gateway = Some(gateway);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "probe failed, closing link");
                gateway.close().await;
                if inner.gateway.is_none() {
                    inner.state = ConnectionState::Disconnected;
                }
                Err(err)
            }
        }
    }

    /// Cancel pending requests and drop the link. Legal from any state.
    pub async fn disconnect(&self) {
        let mut inner = self.inner.write().await;
        if let Some(gateway) = inner.gateway.take() {
            gateway.close().await;
            info!("disconnected from Ableton");
        }
        inner.state = ConnectionState::Disconnected;
    }

    /// Endpoints of the live link, for status reporting.
    pub async fn endpoints(&self) -> Option<OscEndpoints> {
        let inner = self.inner.read().await;
        match &inner.gateway {
            Some(gateway) => gateway.endpoints().await,
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_disconnected() {
        let session = Session::new(BridgeConfig::default());
        assert_eq!(session.state().await, ConnectionState::Disconnected);
        assert!(session.gateway().await.is_err());
    }

    #[tokio::test]
    async fn failed_probe_returns_to_disconnected() {
        let mut config = BridgeConfig::default();
        config.osc.timeout_ms = 100;
        let session = Session::new(config);

        // Nothing listens on this port, so the probe times out.
        let err = session
            .connect(OscEndpoints {
                host: "127.0.0.1".into(),
                send_port: 19_321,
                receive_port: 0,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Timeout(_)));
        assert_eq!(session.state().await, ConnectionState::Disconnected);
        assert!(session.endpoints().await.is_none());
    }

    #[tokio::test]
    async fn disconnect_is_legal_while_disconnected() {
        let session = Session::new(BridgeConfig::default());
        session.disconnect().await;
        assert_eq!(session.state().await, ConnectionState::Disconnected);
    }
}
