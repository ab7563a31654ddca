use serde_json::Value;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use super::readiness::{Capabilities, ReadinessGate};
use super::serializer::OperationSerializer;
use crate::error::{BridgeError, Result};
use crate::tools::{register_all_tools, ToolContext, ToolDefinition, ToolRegistry, ToolResult};

/// Routes tool invocations: readiness gate, argument validation, optional
/// serialization, provider call, normalization. Never retries.
pub struct ToolDispatcher {
    registry: ToolRegistry,
    gate: ReadinessGate,
    capabilities: Capabilities,
    serializer: Arc<OperationSerializer>,
}

impl ToolDispatcher {
    pub fn new(
        registry: ToolRegistry,
        capabilities: Capabilities,
        serializer: Arc<OperationSerializer>,
    ) -> Self {
        Self {
            registry,
            gate: ReadinessGate::new(capabilities.clone()),
            capabilities,
            serializer,
        }
    }

    /// Dispatcher with every device tool registered.
    pub fn with_default_tools(
        capabilities: Capabilities,
        serializer: Arc<OperationSerializer>,
    ) -> Self {
        let mut registry = ToolRegistry::new();
        register_all_tools(&mut registry);
        Self::new(registry, capabilities, serializer)
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.registry.definitions()
    }

    pub fn readiness(&self) -> &ReadinessGate {
        &self.gate
    }

    pub async fn dispatch(&self, name: &str, args: Value) -> Result<ToolResult> {
        let Some(tool) = self.registry.get(name) else {
            tracing::debug!(tool = name, "Unknown tool");
            return Err(BridgeError::MethodNotFound(format!("Unknown tool: {}", name)));
        };

        let invocation_id = Uuid::new_v4().to_string();
        let mutating = tool.is_mutating();
        let span = tracing::info_span!(
            "tool_call",
            tool = name,
            invocation_id = invocation_id.as_str(),
            mutating
        );

        async move {
            self.gate.ensure_ready(tool.capability())?;

            let ctx = ToolContext::new(
                name,
                mutating,
                self.capabilities.clone(),
                self.serializer.clone(),
            );
            let args = if args.is_null() {
                Value::Object(Default::default())
            } else {
                args
            };

            let result = tool.execute(args, &ctx).await;
            match &result {
                Ok(_) => tracing::debug!("Tool call completed"),
                Err(e) => tracing::debug!(code = e.code(), error = %e, "Tool call failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}
