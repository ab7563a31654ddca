//! Tool-call bridge for device UI automation.
//!
//! Remote callers invoke named tools over JSON-RPC; the bridge checks that
//! the host session is ready, serializes mutating input, calls the device
//! providers and maps every outcome onto a stable error code.

pub mod api;
pub mod bridge;
pub mod config;
pub mod device;
pub mod error;
pub mod tools;

pub use bridge::{Capabilities, ExecutionAffinity, OperationSerializer, ToolDispatcher};
pub use config::Config;
pub use error::{BridgeError, RpcError};
