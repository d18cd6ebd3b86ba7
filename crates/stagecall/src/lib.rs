//! stagecall - bridges assistant tool calls to Ableton Live over OSC
//!
//! The stdio side speaks MCP-shaped JSON-RPC 2.0; the DAW side speaks
//! AbletonOSC over UDP. In between: a tool registry, one use case per
//! tool, a shared connection session, and the livegate/liveosc stack.

pub mod commands;
pub mod mcp;
pub mod outcome;
pub mod session;
pub mod tools;
pub mod usecases;

pub use outcome::{ErrorCode, ToolOutcome};
pub use session::{ConnectionState, Session};
