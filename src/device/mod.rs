//! Device layer
//!
//! Everything below the bridge: the host-managed session interfaces, the
//! capability providers that adapt them, and the tree parser.
//!
//! ## Architecture
//!
//! - `AutomationSession` / `CaptureSession` - Host-owned sessions, attached to a `SessionSlot`
//! - `TreeProvider` / `InputProvider` / `CaptureProvider` - Capability interfaces the bridge calls
//! - `Session*Provider` - Adapters that resolve the session on every call
//! - `TreeParser` - Turns a raw accessibility root into serializable nodes
//! - `desktop` - A session backed by the local desktop (enigo + xcap)

pub mod adapter;
pub mod desktop;
pub mod keys;
pub mod outcome;
pub mod parser;
pub mod provider;
pub mod session;
pub mod types;

pub use adapter::{SessionCaptureProvider, SessionInputProvider, SessionTreeProvider};
pub use outcome::{Outcome, UnavailableReason};
pub use parser::{DefaultTreeParser, TreeParser, ROOT_NODE_ID};
pub use provider::{CaptureProvider, InputProvider, TreeProvider};
pub use session::{
    host_capture_slot, host_session_slot, AccessibleNode, AutomationSession, CaptureSession,
    InputConnection, InputSession, SessionLookup, SessionSlot,
};
pub use types::{
    CaptureResult, ContextMenuAction, ForegroundApp, KeyAction, KeyEvent, NodeBounds, ParsedTree,
    ScreenMetrics, ScreenNode, SurroundingText, WindowInfo,
};
