use live_model::InvalidValue;
use liveosc::OscError;
use thiserror::Error;

/// Errors surfaced by gateway methods.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GatewayError {
    /// Input failed domain validation; nothing was sent.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The gateway is not connected to the remote script.
    #[error("not connected to Ableton")]
    NotConnected,

    /// The reply deadline passed. Recoverable; the connection stays up.
    #[error("{0}")]
    Timeout(String),

    /// The request was cancelled by shutdown.
    #[error("request cancelled")]
    Cancelled,

    /// The remote answered with an unexpected shape.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Codec or socket failure underneath.
    #[error("OSC communication error: {0}")]
    Communication(String),
}

impl From<InvalidValue> for GatewayError {
    fn from(e: InvalidValue) -> Self {
        GatewayError::Validation(e.to_string())
    }
}

impl From<OscError> for GatewayError {
    fn from(e: OscError) -> Self {
        match e {
            OscError::NotConnected => GatewayError::NotConnected,
            OscError::Cancelled => GatewayError::Cancelled,
            OscError::Timeout { .. } => GatewayError::Timeout(e.to_string()),
            OscError::BadArgument(_) | OscError::MalformedPacket(_) | OscError::Transport(_) => {
                GatewayError::Communication(e.to_string())
            }
        }
    }
}
