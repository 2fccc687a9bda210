//! Per-project session time accounting.
//!
//! A project accumulates time across sessions: starting a session records
//! the current clock, stopping it folds the elapsed span into the running
//! total. The clock is a `Duration` since device start supplied by the
//! caller; it must be monotonic (wraparound is undefined by design).

use crate::uid::TokenUid;
use std::time::Duration;

/// One tracked project, keyed by its canonical token UID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub uid: TokenUid,
    pub name: String,
    running: bool,
    accumulated: Duration,
    session_start: Option<Duration>,
}

impl Project {
    pub fn new(uid: TokenUid, name: impl Into<String>) -> Self {
        Project {
            uid,
            name: name.into(),
            running: false,
            accumulated: Duration::ZERO,
            session_start: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Total time accumulated across completed sessions.
    pub fn accumulated(&self) -> Duration {
        self.accumulated
    }

    /// Begins a session at `now`. No-op when already running; the caller
    /// enforces the single-active invariant by stopping others first.
    pub fn start_session(&mut self, now: Duration) {
        if self.running {
            return;
        }
        self.session_start = Some(now);
        self.running = true;
    }

    /// Ends the current session at `now`, folding it into the total.
    /// No-op when not running.
    pub fn stop_session(&mut self, now: Duration) {
        if !self.running {
            return;
        }
        if let Some(start) = self.session_start.take() {
            self.accumulated += now.saturating_sub(start);
        }
        self.running = false;
    }

    /// Live total: accumulated time plus the open session, if any. Pure.
    pub fn elapsed(&self, now: Duration) -> Duration {
        match (self.running, self.session_start) {
            (true, Some(start)) => self.accumulated + now.saturating_sub(start),
            _ => self.accumulated,
        }
    }
}

/// Splits a duration into `(hours, minutes, seconds)` by integer
/// truncation, not calendar arithmetic.
pub fn hms_parts(elapsed: Duration) -> (u64, u64, u64) {
    let millis = elapsed.as_millis() as u64;
    let seconds = (millis / 1_000) % 60;
    let minutes = (millis / 60_000) % 60;
    let hours = millis / 3_600_000;
    (hours, minutes, seconds)
}

/// Display form `HHh MMm SSs`, each part zero-padded to two digits (hours
/// grow unpadded past 99).
pub fn format_hms(elapsed: Duration) -> String {
    let (hours, minutes, seconds) = hms_parts(elapsed);
    format!("{hours:02}h {minutes:02}m {seconds:02}s")
}
