//! JSON-RPC 2.0 message handling for the tool protocol.
//!
//! ## Supported methods
//!
//! | Method       | Description                      |
//! |--------------|----------------------------------|
//! | `initialize` | Handshake, returns capabilities  |
//! | `tools/list` | List available tool definitions  |
//! | `tools/call` | Execute a tool and return result |
//! | `ping`       | Liveness check                   |
//!
//! Messages without an `id` are notifications and get no response.

use serde::Serialize;
use serde_json::{json, Value};

use crate::bridge::ToolDispatcher;
use crate::error::{BridgeError, RpcError};

pub const SERVER_NAME: &str = "device-bridge";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
const PROTOCOL_VERSION: &str = "2024-11-05";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, error: RpcError) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// Handle one raw message body. `None` for notifications.
pub async fn handle_message(dispatcher: &ToolDispatcher, body: &[u8]) -> Option<RpcResponse> {
    match serde_json::from_slice::<Value>(body) {
        Ok(request) => handle_request(dispatcher, request).await,
        Err(e) => Some(RpcResponse::failure(Value::Null, RpcError::parse_error(e))),
    }
}

pub async fn handle_request(dispatcher: &ToolDispatcher, request: Value) -> Option<RpcResponse> {
    if !request.is_object() {
        return Some(RpcResponse::failure(
            Value::Null,
            RpcError::invalid_request("expected a JSON object"),
        ));
    }

    let id = request.get("id").cloned();
    let Some(method) = request.get("method").and_then(Value::as_str) else {
        return Some(RpcResponse::failure(
            id.unwrap_or(Value::Null),
            RpcError::invalid_request("method must be a string"),
        ));
    };

    // Notifications (no id) are acknowledged silently
    let Some(id) = id else {
        match method {
            "notifications/initialized" | "notifications/cancelled" => {}
            _ => tracing::debug!("Ignoring unknown notification: {}", method),
        }
        return None;
    };

    let outcome = match method {
        "initialize" => Ok(initialize_result()),
        "tools/list" => Ok(json!({ "tools": dispatcher.definitions() })),
        "tools/call" => call_tool(dispatcher, request.get("params")).await,
        "ping" => Ok(json!({})),
        _ => Err(BridgeError::MethodNotFound(method.to_string())),
    };

    Some(match outcome {
        Ok(result) => RpcResponse::success(id, result),
        Err(e) => RpcResponse::failure(id, e.into()),
    })
}

fn initialize_result() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": { "listChanged": false }
        },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION
        }
    })
}

async fn call_tool(
    dispatcher: &ToolDispatcher,
    params: Option<&Value>,
) -> Result<Value, BridgeError> {
    let params = params.cloned().unwrap_or_else(|| json!({}));
    let name = params
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| BridgeError::InvalidArgument("params.name must be a string".to_string()))?;
    let args = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

    let result = dispatcher.dispatch(name, args).await?;
    serde_json::to_value(result)
        .map_err(|e| BridgeError::Internal(format!("Failed to serialize result: {}", e)))
}
