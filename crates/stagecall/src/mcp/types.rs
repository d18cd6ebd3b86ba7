//! JSON-RPC 2.0 types for the MCP stdio transport.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PROTOCOL_VERSION: &str = "2025-06-18";

pub const PARSE_ERROR: i64 = -32700;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;

/// Request ID - a string or an integer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    String(String),
}

/// An incoming message that may be a request (has id) or a notification.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcMessage {
    #[allow(dead_code)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<RequestId>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

impl JsonRpcMessage {
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// A successful response.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: RequestId,
    pub result: Value,
}

impl JsonRpcResponse {
    pub fn new(id: RequestId, result: Value) -> Self {
        Self { jsonrpc: "2.0", id, result }
    }
}

/// An error response.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcErrorResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    pub error: ErrorData,
}

impl JsonRpcErrorResponse {
    pub fn new(id: Option<RequestId>, code: i64, message: impl Into<String>) -> Self {
        let id = match id {
            Some(id) => serde_json::to_value(id).unwrap_or(Value::Null),
            None => Value::Null,
        };
        Self { jsonrpc: "2.0", id, error: ErrorData { code, message: message.into() } }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorData {
    pub code: i64,
    pub message: String,
}

/// `tools/call` params.
#[derive(Debug, Clone, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_and_notification_are_distinguished() {
        let request: JsonRpcMessage =
            serde_json::from_value(json!({ "jsonrpc": "2.0", "id": 1, "method": "tools/list" }))
                .unwrap();
        assert!(!request.is_notification());
        assert_eq!(request.id, Some(RequestId::Number(1)));

        let notification: JsonRpcMessage = serde_json::from_value(
            json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
        )
        .unwrap();
        assert!(notification.is_notification());
    }

    #[test]
    fn string_ids_roundtrip() {
        let msg: JsonRpcMessage = serde_json::from_value(
            json!({ "jsonrpc": "2.0", "id": "req-7", "method": "ping" }),
        )
        .unwrap();
        assert_eq!(msg.id, Some(RequestId::String("req-7".into())));
    }

    #[test]
    fn error_response_without_id_uses_null() {
        let err = JsonRpcErrorResponse::new(None, PARSE_ERROR, "bad json");
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["id"], Value::Null);
        assert_eq!(value["error"]["code"], PARSE_ERROR);
    }

    #[test]
    fn call_params_default_arguments() {
        let params: CallToolParams =
            serde_json::from_value(json!({ "name": "get_song_info" })).unwrap();
        assert_eq!(params.name, "get_song_info");
        assert!(params.arguments.is_none());
    }
}
