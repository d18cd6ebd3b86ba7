//! Tool result envelope and the stable error code taxonomy.

use livegate::GatewayError;
use serde::Serialize;
use serde_json::{json, Value};

/// Stable error codes callers can react to programmatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    ConnectionFailed,
    NotConnected,
    OscCommunicationError,
    TrackNotFound,
    ClipNotFound,
    DeviceNotFound,
    ProtocolError,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::ConnectionFailed => "CONNECTION_FAILED",
            ErrorCode::NotConnected => "NOT_CONNECTED",
            ErrorCode::OscCommunicationError => "OSC_COMMUNICATION_ERROR",
            ErrorCode::TrackNotFound => "TRACK_NOT_FOUND",
            ErrorCode::ClipNotFound => "CLIP_NOT_FOUND",
            ErrorCode::DeviceNotFound => "DEVICE_NOT_FOUND",
            ErrorCode::ProtocolError => "PROTOCOL_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

/// What every tool call returns: a success flag, an optional structured
/// payload, a human-readable message, and an error code on failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,
}

impl ToolOutcome {
    pub fn ok(message: impl Into<String>, data: Value) -> Self {
        Self { success: true, data: Some(data), message: message.into(), error_code: None }
    }

    pub fn ok_message(message: impl Into<String>) -> Self {
        Self { success: true, data: None, message: message.into(), error_code: None }
    }

    pub fn fail(code: ErrorCode, message: impl Into<String>) -> Self {
        Self { success: false, data: None, message: message.into(), error_code: Some(code) }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::fail(ErrorCode::ValidationError, message)
    }

    /// Map a gateway error onto the taxonomy. A cancelled request is
    /// indistinguishable from a timeout to the caller (both mean "the DAW
    /// did not answer"), but keeps its own message.
    pub fn from_gateway_error(err: GatewayError) -> Self {
        let code = match &err {
            GatewayError::Validation(_) => ErrorCode::ValidationError,
            GatewayError::NotConnected => ErrorCode::NotConnected,
            GatewayError::Timeout(_) | GatewayError::Cancelled => ErrorCode::OscCommunicationError,
            GatewayError::Communication(_) => ErrorCode::OscCommunicationError,
            GatewayError::Protocol(_) => ErrorCode::ProtocolError,
        };
        Self::fail(code, err.to_string())
    }

    /// The text shown to the caller: failures carry their code inline.
    pub fn render_message(&self) -> String {
        match self.error_code {
            Some(code) if !self.success => format!("[{}] {}", code.as_str(), self.message),
            _ => self.message.clone(),
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "success": self.success,
            "data": self.data,
            "message": self.message,
            "error_code": self.error_code.map(ErrorCode::as_str),
        })
    }
}

impl From<GatewayError> for ToolOutcome {
    fn from(err: GatewayError) -> Self {
        Self::from_gateway_error(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn failure_message_carries_the_code() {
        let outcome = ToolOutcome::fail(ErrorCode::ValidationError, "tempo out of range");
        assert_eq!(outcome.render_message(), "[VALIDATION_ERROR] tempo out of range");
    }

    #[test]
    fn success_message_is_bare() {
        let outcome = ToolOutcome::ok_message("Playback started");
        assert_eq!(outcome.render_message(), "Playback started");
    }

    #[test]
    fn gateway_errors_map_to_stable_codes() {
        let cases = [
            (GatewayError::Validation("v".into()), ErrorCode::ValidationError),
            (GatewayError::NotConnected, ErrorCode::NotConnected),
            (GatewayError::Timeout("t".into()), ErrorCode::OscCommunicationError),
            (GatewayError::Cancelled, ErrorCode::OscCommunicationError),
            (GatewayError::Protocol("p".into()), ErrorCode::ProtocolError),
            (GatewayError::Communication("c".into()), ErrorCode::OscCommunicationError),
        ];
        for (err, code) in cases {
            assert_eq!(ToolOutcome::from_gateway_error(err).error_code, Some(code));
        }
    }

    #[test]
    fn json_shape_is_stable() {
        let outcome = ToolOutcome::ok("done", json!({"tempo": 120.0}));
        let value = outcome.to_json();
        assert_eq!(value["success"], true);
        assert_eq!(value["data"]["tempo"], 120.0);
        assert_eq!(value["error_code"], Value::Null);
    }
}
