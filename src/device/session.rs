//! Host-facing session interfaces and the slots the host attaches them to.
//!
//! The automation session is owned by the host environment. It can appear and
//! disappear at any time; the bridge never holds on to it. Every call goes
//! through a [`SessionLookup`] and resolves the session again.

use anyhow::Result;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use super::types::{
    CaptureResult, ContextMenuAction, ForegroundApp, KeyEvent, ScreenMetrics, SurroundingText,
    WindowInfo,
};

/// A raw node of the platform accessibility tree.
///
/// Only the tree parser walks these; the bridge treats them as opaque.
pub trait AccessibleNode {
    fn class_name(&self) -> String;
    fn text(&self) -> Option<String>;
    fn content_description(&self) -> Option<String>;
    fn resource_id(&self) -> Option<String>;
    /// `(left, top, right, bottom)` in screen coordinates, possibly negative
    fn bounds_in_screen(&self) -> (i32, i32, i32, i32);
    fn is_visible_to_user(&self) -> bool;
    fn is_clickable(&self) -> bool {
        false
    }
    fn is_focusable(&self) -> bool {
        false
    }
    fn is_editable(&self) -> bool {
        false
    }
    fn is_scrollable(&self) -> bool {
        false
    }
    fn child_count(&self) -> usize;
    /// May return `None` even for `index < child_count()` when the child went
    /// away between the two calls.
    fn child(&self, index: usize) -> Option<Box<dyn AccessibleNode>>;
}

/// The live automation session (tree walker + input method host).
pub trait AutomationSession: Send + Sync {
    /// Attached and fully initialized.
    fn is_connected(&self) -> bool;

    /// Root of the active window, `None` when there is no active window.
    fn root_node(&self) -> Result<Option<Box<dyn AccessibleNode>>>;

    fn windows(&self) -> Result<Vec<WindowInfo>>;

    fn foreground_app(&self) -> Result<Option<ForegroundApp>>;

    fn screen_metrics(&self) -> Result<ScreenMetrics>;

    /// The input method session, if one is currently bound.
    fn input_session(&self) -> Option<Arc<dyn InputSession>>;
}

pub trait InputSession: Send + Sync {
    /// Whether an input stream has started on a focused field.
    fn input_started(&self) -> bool;

    /// Connection to the focused field. May vanish between calls.
    fn connection(&self) -> Option<Arc<dyn InputConnection>>;
}

/// Connection to the focused input field.
///
/// Mutators return `false` (and readers `None`) when the connection became
/// invalid during the call.
pub trait InputConnection: Send + Sync {
    /// Whether the focused target is an editable text field.
    fn accepts_text(&self) -> bool;

    fn commit_text(&self, text: &str, new_cursor_position: i32) -> Result<bool>;

    fn set_selection(&self, start: u32, end: u32) -> Result<bool>;

    fn surrounding_text(&self, before_length: u32, after_length: u32)
        -> Result<Option<SurroundingText>>;

    fn send_key_event(&self, event: &KeyEvent) -> Result<bool>;

    fn delete_surrounding_text(&self, before_length: u32, after_length: u32) -> Result<bool>;

    fn perform_context_menu_action(&self, action: ContextMenuAction) -> Result<bool>;
}

/// Screen-capture session (separate grant from the automation session).
pub trait CaptureSession: Send + Sync {
    fn is_active(&self) -> bool;

    /// Capture one frame. `None` when no frame is available.
    fn capture(&self) -> Result<Option<CaptureResult>>;
}

/// Non-owning lookup of a host-managed session.
pub trait SessionLookup<T: ?Sized>: Send + Sync {
    /// Current session, or `None` when detached. O(1) and side-effect free.
    fn resolve(&self) -> Option<Arc<T>>;
}

/// A slot the host attaches its session to.
pub struct SessionSlot<T: ?Sized> {
    current: RwLock<Option<Arc<T>>>,
}

impl<T: ?Sized> SessionSlot<T> {
    pub const fn new() -> Self {
        Self {
            current: RwLock::new(None),
        }
    }

    /// Attach a session, replacing any previous one.
    pub fn attach(&self, session: Arc<T>) {
        let mut slot = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(session);
    }

    /// Detach and return the current session.
    pub fn detach(&self) -> Option<Arc<T>> {
        let mut slot = self.current.write().unwrap_or_else(PoisonError::into_inner);
        slot.take()
    }

    pub fn is_attached(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl<T: ?Sized> Default for SessionSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized + Send + Sync> SessionLookup<T> for SessionSlot<T> {
    fn resolve(&self) -> Option<Arc<T>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

static HOST_SESSION: LazyLock<Arc<SessionSlot<dyn AutomationSession>>> =
    LazyLock::new(|| Arc::new(SessionSlot::new()));

static HOST_CAPTURE: LazyLock<Arc<SessionSlot<dyn CaptureSession>>> =
    LazyLock::new(|| Arc::new(SessionSlot::new()));

/// Process-wide slot for the automation session.
pub fn host_session_slot() -> Arc<SessionSlot<dyn AutomationSession>> {
    Arc::clone(&HOST_SESSION)
}

/// Process-wide slot for the screen-capture session.
pub fn host_capture_slot() -> Arc<SessionSlot<dyn CaptureSession>> {
    Arc::clone(&HOST_CAPTURE)
}
