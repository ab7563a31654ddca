//! Session adapters: capability providers backed by the host session slots.
//!
//! Each call resolves the session again. Nothing here caches a session,
//! input session or input connection between calls.

use anyhow::Result;
use std::sync::Arc;

use super::outcome::{Outcome, UnavailableReason};
use super::provider::{CaptureProvider, InputProvider, TreeProvider};
use super::session::{
    AccessibleNode, AutomationSession, CaptureSession, InputConnection, SessionLookup,
};
use super::types::{
    CaptureResult, ContextMenuAction, ForegroundApp, KeyEvent, ScreenMetrics, SurroundingText,
    WindowInfo,
};

const NOT_EDITABLE: &str = "focused target does not accept text input";

type Sessions = Arc<dyn SessionLookup<dyn AutomationSession>>;

/// Resolve a connected session or say why there is none.
fn connected_session(sessions: &Sessions) -> Outcome<Arc<dyn AutomationSession>> {
    match sessions.resolve() {
        None => Outcome::Unavailable(UnavailableReason::SessionDetached),
        Some(session) if !session.is_connected() => {
            Outcome::Unavailable(UnavailableReason::SessionNotReady)
        }
        Some(session) => Outcome::Success(session),
    }
}

pub struct SessionTreeProvider {
    sessions: Sessions,
}

impl SessionTreeProvider {
    pub fn new(sessions: Sessions) -> Self {
        Self { sessions }
    }

    fn with_session<T>(
        &self,
        f: impl FnOnce(&dyn AutomationSession) -> Result<Outcome<T>>,
    ) -> Result<Outcome<T>> {
        match connected_session(&self.sessions) {
            Outcome::Success(session) => f(session.as_ref()),
            Outcome::Unavailable(r) => Ok(Outcome::Unavailable(r)),
            Outcome::Rejected(r) => Ok(Outcome::Rejected(r)),
        }
    }
}

impl TreeProvider for SessionTreeProvider {
    fn readiness(&self) -> std::result::Result<(), UnavailableReason> {
        match connected_session(&self.sessions) {
            Outcome::Unavailable(reason) => Err(reason),
            _ => Ok(()),
        }
    }

    fn root_node(&self) -> Result<Outcome<Box<dyn AccessibleNode>>> {
        self.with_session(|s| {
            Ok(Outcome::from_option(
                s.root_node()?,
                UnavailableReason::NoActiveWindow,
            ))
        })
    }

    fn windows(&self) -> Result<Outcome<Vec<WindowInfo>>> {
        self.with_session(|s| Ok(Outcome::Success(s.windows()?)))
    }

    fn foreground_app(&self) -> Result<Outcome<ForegroundApp>> {
        self.with_session(|s| {
            Ok(Outcome::from_option(
                s.foreground_app()?,
                UnavailableReason::NoActiveWindow,
            ))
        })
    }

    fn screen_metrics(&self) -> Result<Outcome<ScreenMetrics>> {
        self.with_session(|s| Ok(Outcome::Success(s.screen_metrics()?)))
    }
}

pub struct SessionInputProvider {
    sessions: Sessions,
}

impl SessionInputProvider {
    pub fn new(sessions: Sessions) -> Self {
        Self { sessions }
    }

    /// Walk session -> input session -> connection, re-resolving each link.
    fn connection(&self) -> Outcome<Arc<dyn InputConnection>> {
        connected_session(&self.sessions).and_then(|session| {
            match session.input_session() {
                Some(input) if input.input_started() => Outcome::from_option(
                    input.connection(),
                    UnavailableReason::NoInputConnection,
                ),
                _ => Outcome::Unavailable(UnavailableReason::InputNotStarted),
            }
        })
    }

    fn with_connection<T>(
        &self,
        needs_text_target: bool,
        f: impl FnOnce(&dyn InputConnection) -> Result<Outcome<T>>,
    ) -> Result<Outcome<T>> {
        match self.connection() {
            Outcome::Success(conn) => {
                if needs_text_target && !conn.accepts_text() {
                    return Ok(Outcome::rejected(NOT_EDITABLE));
                }
                f(conn.as_ref())
            }
            Outcome::Unavailable(r) => Ok(Outcome::Unavailable(r)),
            Outcome::Rejected(r) => Ok(Outcome::Rejected(r)),
        }
    }
}

impl InputProvider for SessionInputProvider {
    fn readiness(&self) -> std::result::Result<(), UnavailableReason> {
        let session = match connected_session(&self.sessions) {
            Outcome::Success(session) => session,
            Outcome::Unavailable(reason) => return Err(reason),
            Outcome::Rejected(_) => return Err(UnavailableReason::SessionNotReady),
        };
        match session.input_session() {
            Some(input) if input.input_started() => Ok(()),
            _ => Err(UnavailableReason::InputNotStarted),
        }
    }

    fn commit_text(&self, text: &str, new_cursor_position: i32) -> Result<Outcome<()>> {
        self.with_connection(true, |c| {
            Ok(Outcome::from_ack(c.commit_text(text, new_cursor_position)?))
        })
    }

    fn set_selection(&self, start: u32, end: u32) -> Result<Outcome<()>> {
        self.with_connection(true, |c| Ok(Outcome::from_ack(c.set_selection(start, end)?)))
    }

    fn surrounding_text(
        &self,
        before_length: u32,
        after_length: u32,
    ) -> Result<Outcome<SurroundingText>> {
        self.with_connection(true, |c| {
            Ok(Outcome::from_option(
                c.surrounding_text(before_length, after_length)?,
                UnavailableReason::NotApplied,
            ))
        })
    }

    fn send_key_event(&self, event: &KeyEvent) -> Result<Outcome<()>> {
        self.with_connection(false, |c| Ok(Outcome::from_ack(c.send_key_event(event)?)))
    }

    fn delete_surrounding_text(
        &self,
        before_length: u32,
        after_length: u32,
    ) -> Result<Outcome<()>> {
        self.with_connection(true, |c| {
            Ok(Outcome::from_ack(
                c.delete_surrounding_text(before_length, after_length)?,
            ))
        })
    }

    fn perform_context_menu_action(&self, action: ContextMenuAction) -> Result<Outcome<()>> {
        self.with_connection(true, |c| {
            Ok(Outcome::from_ack(c.perform_context_menu_action(action)?))
        })
    }
}

pub struct SessionCaptureProvider {
    captures: Arc<dyn SessionLookup<dyn CaptureSession>>,
}

impl SessionCaptureProvider {
    pub fn new(captures: Arc<dyn SessionLookup<dyn CaptureSession>>) -> Self {
        Self { captures }
    }
}

impl CaptureProvider for SessionCaptureProvider {
    fn readiness(&self) -> std::result::Result<(), UnavailableReason> {
        match self.captures.resolve() {
            Some(session) if session.is_active() => Ok(()),
            _ => Err(UnavailableReason::CaptureInactive),
        }
    }

    fn capture(&self) -> Result<Outcome<CaptureResult>> {
        match self.captures.resolve() {
            Some(session) if session.is_active() => Ok(Outcome::from_option(
                session.capture()?,
                UnavailableReason::CaptureInactive,
            )),
            _ => Ok(Outcome::Unavailable(UnavailableReason::CaptureInactive)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::session::{InputSession, SessionSlot};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct Conn {
        editable: bool,
        ack: bool,
        commits: AtomicUsize,
    }

    impl InputConnection for Conn {
        fn accepts_text(&self) -> bool {
            self.editable
        }
        fn commit_text(&self, _text: &str, _pos: i32) -> Result<bool> {
            self.commits.fetch_add(1, Ordering::SeqCst);
            Ok(self.ack)
        }
        fn set_selection(&self, _start: u32, _end: u32) -> Result<bool> {
            Ok(self.ack)
        }
        fn surrounding_text(&self, _b: u32, _a: u32) -> Result<Option<SurroundingText>> {
            Ok(None)
        }
        fn send_key_event(&self, _event: &KeyEvent) -> Result<bool> {
            Ok(self.ack)
        }
        fn delete_surrounding_text(&self, _b: u32, _a: u32) -> Result<bool> {
            Ok(self.ack)
        }
        fn perform_context_menu_action(&self, _action: ContextMenuAction) -> Result<bool> {
            Ok(self.ack)
        }
    }

    struct Input {
        started: AtomicBool,
        conn: Option<Arc<Conn>>,
    }

    impl InputSession for Input {
        fn input_started(&self) -> bool {
            self.started.load(Ordering::SeqCst)
        }
        fn connection(&self) -> Option<Arc<dyn InputConnection>> {
            self.conn.clone().map(|c| c as Arc<dyn InputConnection>)
        }
    }

    struct Session {
        connected: bool,
        input: Option<Arc<Input>>,
    }

    impl AutomationSession for Session {
        fn is_connected(&self) -> bool {
            self.connected
        }
        fn root_node(&self) -> Result<Option<Box<dyn AccessibleNode>>> {
            Ok(None)
        }
        fn windows(&self) -> Result<Vec<WindowInfo>> {
            Ok(Vec::new())
        }
        fn foreground_app(&self) -> Result<Option<ForegroundApp>> {
            Ok(None)
        }
        fn screen_metrics(&self) -> Result<ScreenMetrics> {
            anyhow::bail!("display service crashed")
        }
        fn input_session(&self) -> Option<Arc<dyn InputSession>> {
            self.input.clone().map(|i| i as Arc<dyn InputSession>)
        }
    }

    fn conn(editable: bool, ack: bool) -> Arc<Conn> {
        Arc::new(Conn {
            editable,
            ack,
            commits: AtomicUsize::new(0),
        })
    }

    fn slot_with(session: Session) -> Arc<SessionSlot<dyn AutomationSession>> {
        let slot: Arc<SessionSlot<dyn AutomationSession>> = Arc::new(SessionSlot::new());
        slot.attach(Arc::new(session));
        slot
    }

    #[test]
    fn test_detached_session_is_unavailable() {
        let slot: Arc<SessionSlot<dyn AutomationSession>> = Arc::new(SessionSlot::new());
        let tree = SessionTreeProvider::new(slot.clone());
        assert_eq!(tree.readiness(), Err(UnavailableReason::SessionDetached));
        assert!(matches!(
            tree.foreground_app().unwrap(),
            Outcome::Unavailable(UnavailableReason::SessionDetached)
        ));
    }

    #[test]
    fn test_input_readiness_needs_started_stream() {
        let input = Arc::new(Input {
            started: AtomicBool::new(false),
            conn: Some(conn(true, true)),
        });
        let slot = slot_with(Session {
            connected: true,
            input: Some(input.clone()),
        });
        let provider = SessionInputProvider::new(slot);

        assert_eq!(provider.readiness(), Err(UnavailableReason::InputNotStarted));
        assert_eq!(
            provider.commit_text("a", 1).unwrap(),
            Outcome::Unavailable(UnavailableReason::InputNotStarted)
        );

        input.started.store(true, Ordering::SeqCst);
        assert_eq!(provider.readiness(), Ok(()));
        assert_eq!(provider.commit_text("a", 1).unwrap(), Outcome::Success(()));
    }

    #[test]
    fn test_non_editable_target_is_rejected_without_call() {
        let c = conn(false, true);
        let slot = slot_with(Session {
            connected: true,
            input: Some(Arc::new(Input {
                started: AtomicBool::new(true),
                conn: Some(c.clone()),
            })),
        });
        let provider = SessionInputProvider::new(slot);

        assert!(matches!(provider.commit_text("x", 1).unwrap(), Outcome::Rejected(_)));
        assert_eq!(c.commits.load(Ordering::SeqCst), 0);
        // Key events do not need an editable target
        assert_eq!(
            provider.send_key_event(&KeyEvent::press(66)).unwrap(),
            Outcome::Success(())
        );
    }

    #[test]
    fn test_false_ack_is_unavailable() {
        let slot = slot_with(Session {
            connected: true,
            input: Some(Arc::new(Input {
                started: AtomicBool::new(true),
                conn: Some(conn(true, false)),
            })),
        });
        let provider = SessionInputProvider::new(slot);
        assert_eq!(
            provider.set_selection(0, 1).unwrap(),
            Outcome::Unavailable(UnavailableReason::NotApplied)
        );
        assert_eq!(
            provider.surrounding_text(1, 1).unwrap(),
            Outcome::Unavailable(UnavailableReason::NotApplied)
        );
    }

    #[test]
    fn test_platform_fault_is_err() {
        let slot = slot_with(Session {
            connected: true,
            input: None,
        });
        let tree = SessionTreeProvider::new(slot);
        assert!(tree.screen_metrics().is_err());
    }

    #[test]
    fn test_capture_inactive() {
        let slot: Arc<SessionSlot<dyn CaptureSession>> = Arc::new(SessionSlot::new());
        let provider = SessionCaptureProvider::new(slot);
        assert_eq!(provider.readiness(), Err(UnavailableReason::CaptureInactive));
        assert_eq!(
            provider.capture().unwrap(),
            Outcome::Unavailable(UnavailableReason::CaptureInactive)
        );
    }
}
