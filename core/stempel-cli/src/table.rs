//! Host-side mirror of the device's project state.
//!
//! The monitor never sees the registry itself, only the event log lines, so
//! it rebuilds a best-effort mirror keyed by project name: started pauses
//! every other running entry, a started line for an unknown name creates the
//! entry on the fly, deleted drops it. Times are wall-clock on the host
//! side, independent of the device clock.

use std::time::Duration;
use stempel_protocol::HostLine;

#[derive(Debug)]
pub struct ProjectRow {
    pub name: String,
    total: Duration,
    session_start: Option<Duration>,
}

impl ProjectRow {
    fn new(name: String) -> Self {
        ProjectRow {
            name,
            total: Duration::ZERO,
            session_start: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.session_start.is_some()
    }

    /// Total including the open session.
    pub fn total(&self, now: Duration) -> Duration {
        match self.session_start {
            Some(start) => self.total + now.saturating_sub(start),
            None => self.total,
        }
    }

    /// Length of the open session, zero when paused.
    pub fn session(&self, now: Duration) -> Duration {
        match self.session_start {
            Some(start) => now.saturating_sub(start),
            None => Duration::ZERO,
        }
    }

    fn start(&mut self, now: Duration) {
        self.session_start = Some(now);
    }

    fn pause(&mut self, now: Duration) {
        if let Some(start) = self.session_start.take() {
            self.total += now.saturating_sub(start);
        }
    }
}

/// Ordered collection of mirrored projects; insertion order is display
/// order.
#[derive(Debug, Default)]
pub struct ProjectTable {
    rows: Vec<ProjectRow>,
}

impl ProjectTable {
    pub fn new() -> Self {
        ProjectTable::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProjectRow> {
        self.rows.iter()
    }

    pub fn get(&self, name: &str) -> Option<&ProjectRow> {
        self.rows.iter().find(|row| row.name == name)
    }

    /// Folds one recognized device line into the mirror.
    pub fn apply(&mut self, line: &HostLine, now: Duration) {
        match line {
            HostLine::ProjectAdded { name, .. } => {
                let name = clean_name(name);
                if self.position(name).is_none() {
                    self.rows.push(ProjectRow::new(name.to_string()));
                }
            }
            HostLine::ProjectStarted { name } => {
                for row in &mut self.rows {
                    row.pause(now);
                }
                let index = self.ensure(clean_name(name));
                self.rows[index].start(now);
            }
            HostLine::ProjectPaused { name } => {
                if let Some(index) = self.position(clean_name(name)) {
                    self.rows[index].pause(now);
                }
            }
            HostLine::ProjectDeleted { name, .. } => {
                if let Some(index) = self.position(clean_name(name)) {
                    self.rows.remove(index);
                }
            }
            HostLine::MaxReached
            | HostLine::TagDetected { .. }
            | HostLine::UnknownTag { .. }
            | HostLine::NamePrompt => {}
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.name == name)
    }

    fn ensure(&mut self, name: &str) -> usize {
        match self.position(name) {
            Some(index) => index,
            None => {
                self.rows.push(ProjectRow::new(name.to_string()));
                self.rows.len() - 1
            }
        }
    }
}

/// Strips a `" (UID: …)"` suffix some device lines carry on the name.
pub fn clean_name(name: &str) -> &str {
    match name.split_once(" (UID: ") {
        Some((clean, _)) => clean,
        None => name,
    }
}

/// Wall-clock style `HH:MM:SS` used by the monitor table.
pub fn format_clock(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
