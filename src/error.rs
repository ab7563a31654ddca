use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

/// JSON-RPC code for a session that is absent, detached or not ready.
pub const CODE_UNAVAILABLE: i32 = -32001;
/// JSON-RPC code for an operation the focused target declined.
pub const CODE_OPERATION_REJECTED: i32 = -32002;
/// JSON-RPC code for a mutating call that could not get exclusive access in time.
pub const CODE_TIMEOUT: i32 = -32003;
pub const CODE_PARSE_ERROR: i32 = -32700;
pub const CODE_INVALID_REQUEST: i32 = -32600;
pub const CODE_METHOD_NOT_FOUND: i32 = -32601;
pub const CODE_INVALID_ARGUMENT: i32 = -32602;
pub const CODE_INTERNAL_ERROR: i32 = -32603;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// Session absent, not ready, or gone at call time. Retry after the host
    /// re-attaches the session.
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// Session present but the target declined the operation.
    #[error("Operation rejected: {0}")]
    OperationRejected(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    /// Carries a caller-safe message only; fault details go to the log.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BridgeError {
    /// Stable JSON-RPC error code for this kind.
    pub fn code(&self) -> i32 {
        match self {
            BridgeError::Unavailable(_) => CODE_UNAVAILABLE,
            BridgeError::OperationRejected(_) => CODE_OPERATION_REJECTED,
            BridgeError::InvalidArgument(_) => CODE_INVALID_ARGUMENT,
            BridgeError::MethodNotFound(_) => CODE_METHOD_NOT_FOUND,
            BridgeError::Timeout(_) => CODE_TIMEOUT,
            BridgeError::Internal(_) => CODE_INTERNAL_ERROR,
        }
    }

    /// Taxonomy name reported in `error.data.kind`.
    pub fn kind(&self) -> &'static str {
        match self {
            BridgeError::Unavailable(_) => "unavailable",
            BridgeError::OperationRejected(_) => "operation_rejected",
            BridgeError::InvalidArgument(_) => "invalid_argument",
            BridgeError::MethodNotFound(_) => "method_not_found",
            BridgeError::Timeout(_) => "timeout",
            BridgeError::Internal(_) => "internal_error",
        }
    }

    /// Whether re-issuing the same call later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BridgeError::Unavailable(_) | BridgeError::Timeout(_))
    }

    pub fn to_rpc_error(&self) -> RpcError {
        RpcError {
            code: self.code(),
            message: self.to_string(),
            data: Some(json!({
                "kind": self.kind(),
                "retryable": self.is_retryable(),
            })),
        }
    }
}

/// JSON-RPC error object.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    pub fn parse_error(detail: impl std::fmt::Display) -> Self {
        Self {
            code: CODE_PARSE_ERROR,
            message: format!("Parse error: {}", detail),
            data: None,
        }
    }

    pub fn invalid_request(detail: impl Into<String>) -> Self {
        Self {
            code: CODE_INVALID_REQUEST,
            message: format!("Invalid request: {}", detail.into()),
            data: None,
        }
    }
}

impl From<BridgeError> for RpcError {
    fn from(err: BridgeError) -> Self {
        err.to_rpc_error()
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(BridgeError::Unavailable("x".into()).code(), -32001);
        assert_eq!(BridgeError::OperationRejected("x".into()).code(), -32002);
        assert_eq!(BridgeError::Timeout("x".into()).code(), -32003);
        assert_eq!(BridgeError::InvalidArgument("x".into()).code(), -32602);
        assert_eq!(BridgeError::MethodNotFound("x".into()).code(), -32601);
        assert_eq!(BridgeError::Internal("x".into()).code(), -32603);
    }

    #[test]
    fn test_rejected_and_unavailable_are_distinct() {
        let unavailable = BridgeError::Unavailable("session detached".into());
        let rejected = BridgeError::OperationRejected("not editable".into());
        assert_ne!(unavailable.code(), rejected.code());
        assert!(unavailable.is_retryable());
        assert!(!rejected.is_retryable());
    }

    #[test]
    fn test_rpc_error_carries_kind() {
        let rpc = BridgeError::Timeout("commit_text".into()).to_rpc_error();
        assert_eq!(rpc.code, CODE_TIMEOUT);
        assert_eq!(rpc.data.unwrap()["kind"], "timeout");
    }
}
