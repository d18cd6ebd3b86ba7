//! liveosc - OSC plumbing for talking to the AbletonOSC remote script
//!
//! Three layers, composed by the gateway crate:
//!
//! - [`codec`]: OSC 1.0 packets to and from a typed [`OscArg`] list.
//! - [`transport`]: a pair of UDP sockets (send / receive) with a
//!   background receive loop feeding one installed handler.
//! - [`correlator`]: pairs inbound messages to pending request waiters,
//!   FIFO per address, with per-request timeouts.
//!
//! OSC carries no correlation ids, so the only workable matching policy is
//! FIFO per address. Callers must not have two requests in flight on the
//! same address at once; the gateway enforces that with per-address locks.

pub mod codec;
pub mod correlator;
mod error;
pub mod transport;

pub use codec::{decode, encode, Inbound, OscArg, OscMessage};
pub use correlator::{Correlator, PendingReply};
pub use error::OscError;
pub use transport::{InboundHandler, OscEndpoints, UdpTransport};

/// Default AbletonOSC endpoints on loopback.
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_SEND_PORT: u16 = 11000;
pub const DEFAULT_RECEIVE_PORT: u16 = 11001;
