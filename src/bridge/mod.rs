//! Bridge core
//!
//! Sits between the transport and the device layer. A tool call flows
//! through the readiness gate, argument validation, the operation
//! serializer (mutating tools only) and the error normalizer.

pub mod dispatcher;
pub mod normalize;
pub mod readiness;
pub mod serializer;

pub use dispatcher::ToolDispatcher;
pub use readiness::{Capabilities, Capability, Readiness, ReadinessGate};
pub use serializer::{ExecutionAffinity, OperationSerializer, DEFAULT_LOCK_TIMEOUT};
