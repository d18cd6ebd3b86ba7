//! Gateway core: lifecycle plus the two call shapes.

use std::sync::Arc;
use std::time::Duration;

use liveosc::{Correlator, OscArg, OscEndpoints, UdpTransport};
use tracing::{debug, trace};

use crate::{AddressLocks, GatewayError};

/// Typed request/response surface over one OSC link.
pub struct LiveGateway {
    transport: Arc<UdpTransport>,
    correlator: Correlator,
    locks: AddressLocks,
    timeout: Duration,
}

impl LiveGateway {
    /// Build a gateway over its own transport and correlator. The
    /// correlator is installed as the transport's inbound handler.
    pub fn new(timeout: Duration) -> Self {
        let transport = Arc::new(UdpTransport::new());
        let correlator = Correlator::new();

        let dispatch = correlator.clone();
        transport.set_handler(Arc::new(move |addr, args| {
            dispatch.handle_response(&addr, args);
        }));

        Self { transport, correlator, locks: AddressLocks::new(), timeout }
    }

    /// Open the UDP link. Idempotent.
    pub async fn open(&self, endpoints: OscEndpoints) -> Result<(), GatewayError> {
        self.transport.connect(endpoints).await?;
        Ok(())
    }

    /// Cancel all pending requests and close the link. Safe repeatedly.
    pub async fn close(&self) {
        self.correlator.cancel_all();
        self.transport.disconnect().await;
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// The endpoints of the open link, if any.
    pub async fn endpoints(&self) -> Option<OscEndpoints> {
        self.transport.endpoints().await
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Connectivity probe: any reply to `/test` counts, including an empty
    /// one. Timeout means the remote script is not listening.
    pub async fn probe(&self) -> Result<(), GatewayError> {
        let _guard = self.locks.acquire("/test").await;
        if !self.transport.is_connected() {
            return Err(GatewayError::NotConnected);
        }
        let pending = self.correlator.expect_response("/test");
        self.transport.send("/test", &[]).await?;
        pending.wait(self.timeout).await?;
        Ok(())
    }

    /// Fire-and-forget. Callers validate before reaching this point.
    pub(crate) async fn command(&self, addr: &str, args: &[OscArg]) -> Result<(), GatewayError> {
        if !self.transport.is_connected() {
            return Err(GatewayError::NotConnected);
        }
        trace!(addr, ?args, "command");
        self.transport.send(addr, args).await?;
        Ok(())
    }

    /// Request/response with per-address serialization. The waiter is
    /// registered before the send so a fast reply cannot be missed; if the
    /// send itself fails the waiter is dropped, which deregisters it.
    pub(crate) async fn query(&self, addr: &str, args: &[OscArg]) -> Result<Vec<OscArg>, GatewayError> {
        let _guard = self.locks.acquire(addr).await;
        if !self.transport.is_connected() {
            return Err(GatewayError::NotConnected);
        }
        trace!(addr, ?args, "query");

        let pending = self.correlator.expect_response(addr);
        self.transport.send(addr, args).await?;
        let reply = pending.wait(self.timeout).await?;

        if reply.is_empty() {
            debug!(addr, "empty response");
            return Err(GatewayError::Protocol(format!("{addr}: empty response")));
        }
        Ok(reply)
    }
}
