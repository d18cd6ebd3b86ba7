use thiserror::Error;

/// Errors from the OSC codec, transport, and correlator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OscError {
    /// An outbound argument or address cannot be represented in OSC 1.0.
    #[error("bad OSC argument: {0}")]
    BadArgument(String),

    /// An inbound datagram failed to decode. The whole packet is rejected;
    /// there is no partial decoding.
    #[error("malformed OSC packet: {0}")]
    MalformedPacket(String),

    /// Send or receive attempted while the transport is down.
    #[error("OSC transport is not connected")]
    NotConnected,

    /// Socket-level failure (bind, send, oversized datagram).
    #[error("OSC transport error: {0}")]
    Transport(String),

    /// No reply arrived before the per-request deadline. Recoverable: the
    /// transport stays up and the next call proceeds normally.
    #[error("timed out after {timeout_ms}ms waiting for reply to {addr}")]
    Timeout { addr: String, timeout_ms: u64 },

    /// The pending request was cancelled by shutdown.
    #[error("request cancelled")]
    Cancelled,
}

impl From<std::io::Error> for OscError {
    fn from(e: std::io::Error) -> Self {
        OscError::Transport(e.to_string())
    }
}
