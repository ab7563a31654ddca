use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::device::{
    AutomationSession, CaptureProvider, CaptureSession, InputProvider, SessionCaptureProvider,
    SessionInputProvider, SessionLookup, SessionTreeProvider, TreeParser, TreeProvider,
    UnavailableReason,
};
use crate::error::BridgeError;

/// Capability a tool depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Tree,
    Input,
    Capture,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Tree => "tree",
            Capability::Input => "input",
            Capability::Capture => "capture",
        };
        f.write_str(name)
    }
}

/// The three capability providers plus the tree parser.
#[derive(Clone)]
pub struct Capabilities {
    pub tree: Arc<dyn TreeProvider>,
    pub input: Arc<dyn InputProvider>,
    pub capture: Arc<dyn CaptureProvider>,
    pub parser: Arc<dyn TreeParser>,
}

impl Capabilities {
    /// Providers backed by the given session lookups.
    pub fn from_sessions(
        sessions: Arc<dyn SessionLookup<dyn AutomationSession>>,
        captures: Arc<dyn SessionLookup<dyn CaptureSession>>,
        parser: Arc<dyn TreeParser>,
    ) -> Self {
        Self {
            tree: Arc::new(SessionTreeProvider::new(sessions.clone())),
            input: Arc::new(SessionInputProvider::new(sessions)),
            capture: Arc::new(SessionCaptureProvider::new(captures)),
            parser,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    NotReady(UnavailableReason),
}

/// Side-effect-free readiness check, run before any provider call.
#[derive(Clone)]
pub struct ReadinessGate {
    capabilities: Capabilities,
}

impl ReadinessGate {
    pub fn new(capabilities: Capabilities) -> Self {
        Self { capabilities }
    }

    pub fn check(&self, capability: Capability) -> Readiness {
        let readiness = match capability {
            Capability::Tree => self.capabilities.tree.readiness(),
            Capability::Input => self.capabilities.input.readiness(),
            Capability::Capture => self.capabilities.capture.readiness(),
        };
        match readiness {
            Ok(()) => Readiness::Ready,
            Err(reason) => Readiness::NotReady(reason),
        }
    }

    /// `Unavailable` when the capability is not ready.
    pub fn ensure_ready(&self, capability: Capability) -> Result<(), BridgeError> {
        match self.check(capability) {
            Readiness::Ready => Ok(()),
            Readiness::NotReady(reason) => {
                tracing::debug!(%capability, %reason, "Capability not ready");
                Err(BridgeError::Unavailable(reason.to_string()))
            }
        }
    }
}
