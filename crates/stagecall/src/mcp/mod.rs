//! Stdio MCP transport: JSON-RPC 2.0 over stdin/stdout.
//!
//! Stdout carries protocol frames only; all logging goes to stderr. Tool
//! calls run on their own tasks so slow DAW round-trips never block the
//! read loop - the correlator underneath multiplexes them.

mod stdio;
mod types;

pub use stdio::serve;
pub use types::{
    CallToolParams, ErrorData, JsonRpcErrorResponse, JsonRpcMessage, JsonRpcResponse, RequestId,
    INVALID_PARAMS, METHOD_NOT_FOUND, PARSE_ERROR, PROTOCOL_VERSION,
};
