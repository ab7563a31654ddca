//! Tri-state result of a capability call.
//!
//! Providers answer with [`Outcome`] instead of an error for the expected
//! cases: the session is not there (`Unavailable`) or it is there but the
//! target declined (`Rejected`). Callers must be able to tell the two apart:
//! the first is worth retrying later, the second is not.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableReason {
    SessionDetached,
    SessionNotReady,
    InputNotStarted,
    NoInputConnection,
    NoActiveWindow,
    CaptureInactive,
    /// The session call returned false/null, i.e. it went away mid-call
    NotApplied,
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            UnavailableReason::SessionDetached => "automation session is not attached",
            UnavailableReason::SessionNotReady => "automation session is not ready",
            UnavailableReason::InputNotStarted => "input session has not started",
            UnavailableReason::NoInputConnection => "no input connection is available",
            UnavailableReason::NoActiveWindow => "no active window",
            UnavailableReason::CaptureInactive => "screen capture is not active",
            UnavailableReason::NotApplied => "the session did not apply the operation",
        };
        f.write_str(msg)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Success(T),
    Unavailable(UnavailableReason),
    Rejected(String),
}

impl<T> Outcome<T> {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Outcome::Rejected(reason.into())
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Success(v) => Outcome::Success(f(v)),
            Outcome::Unavailable(r) => Outcome::Unavailable(r),
            Outcome::Rejected(r) => Outcome::Rejected(r),
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
        match self {
            Outcome::Success(v) => f(v),
            Outcome::Unavailable(r) => Outcome::Unavailable(r),
            Outcome::Rejected(r) => Outcome::Rejected(r),
        }
    }

    /// `None` becomes `Unavailable(reason)`.
    pub fn from_option(value: Option<T>, reason: UnavailableReason) -> Self {
        match value {
            Some(v) => Outcome::Success(v),
            None => Outcome::Unavailable(reason),
        }
    }
}

impl Outcome<()> {
    /// Maps a platform `bool` acknowledgement. `false` means the session went
    /// away during the call.
    pub fn from_ack(applied: bool) -> Self {
        if applied {
            Outcome::Success(())
        } else {
            Outcome::Unavailable(UnavailableReason::NotApplied)
        }
    }
}
