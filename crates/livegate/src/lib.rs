//! livegate - typed façade over the AbletonOSC address space
//!
//! One [`LiveGateway`] per connection. Methods come in two shapes:
//! fire-and-forget commands (`send` only) and request/response queries
//! (register a waiter, send, await with the configured timeout).
//!
//! The gateway is stateless: every getter asks the DAW and every snapshot
//! is transient. The only state held here is the per-address lock table
//! that keeps two concurrent tool calls from both having a waiter queued
//! on the same address - the wire protocol has no correlation ids, so
//! FIFO-per-address is only sound when requests on one address are
//! serialized process-wide.
//!
//! Validation happens at this boundary. An out-of-range tempo, volume,
//! pan, pitch, or loop bound fails with [`GatewayError::Validation`]
//! before any packet is built.

mod clips;
mod devices;
mod error;
mod gateway;
mod locks;
mod reply;
mod scenes;
mod song;
mod tracks;
mod view;

pub use error::GatewayError;
pub use gateway::LiveGateway;
pub use locks::AddressLocks;
