use anyhow::Result;

use super::outcome::{Outcome, UnavailableReason};
use super::session::AccessibleNode;
use super::types::{
    CaptureResult, ContextMenuAction, ForegroundApp, KeyEvent, ScreenMetrics, SurroundingText,
    WindowInfo,
};

/// Tree and window introspection.
///
/// `Err` is reserved for unexpected platform faults; absence of the session
/// is an [`Outcome::Unavailable`].
pub trait TreeProvider: Send + Sync {
    /// `Err` carries why the session cannot serve tree queries right now.
    fn readiness(&self) -> std::result::Result<(), UnavailableReason>;

    fn root_node(&self) -> Result<Outcome<Box<dyn AccessibleNode>>>;

    fn windows(&self) -> Result<Outcome<Vec<WindowInfo>>>;

    fn foreground_app(&self) -> Result<Outcome<ForegroundApp>>;

    fn screen_metrics(&self) -> Result<Outcome<ScreenMetrics>>;
}

/// Text and key input injection into the focused field.
pub trait InputProvider: Send + Sync {
    /// Input session attached and its input stream started.
    fn readiness(&self) -> std::result::Result<(), UnavailableReason>;

    fn commit_text(&self, text: &str, new_cursor_position: i32) -> Result<Outcome<()>>;

    fn set_selection(&self, start: u32, end: u32) -> Result<Outcome<()>>;

    fn surrounding_text(
        &self,
        before_length: u32,
        after_length: u32,
    ) -> Result<Outcome<SurroundingText>>;

    fn send_key_event(&self, event: &KeyEvent) -> Result<Outcome<()>>;

    fn delete_surrounding_text(&self, before_length: u32, after_length: u32)
        -> Result<Outcome<()>>;

    fn perform_context_menu_action(&self, action: ContextMenuAction) -> Result<Outcome<()>>;
}

/// Screen capture.
pub trait CaptureProvider: Send + Sync {
    /// Capture session attached and active.
    fn readiness(&self) -> std::result::Result<(), UnavailableReason>;

    fn capture(&self) -> Result<Outcome<CaptureResult>>;
}
