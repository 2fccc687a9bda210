//! Host-channel line protocol for the Stempel time tracker.
//!
//! The device reports every event to the host as one line of text, and the
//! host feeds events back into its project mirror by recognizing those lines.
//! This crate is shared by both sides to prevent template drift: the device
//! formats through [`HostLine`]'s `Display` impl, the host recognizes lines
//! with [`HostLine::parse`].
//!
//! The templates are fixed wire format; the German wording is part of the
//! contract with existing host tooling.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prompt the device emits right after an `UnknownTag` line, asking the host
/// operator to type a project name.
pub const NAME_PROMPT: &str = "Bitte Projektnamen eingeben und bestätigen:";

const PREFIX_ADDED: &str = "Projekt hinzugefügt: ";
const PREFIX_DETECTED: &str = "RFID erkannt: ";
const PREFIX_DELETED: &str = "Projekt geloescht: ";
const PREFIX_STARTED: &str = "Projekt gestartet: ";
const PREFIX_PAUSED: &str = "Projekt pausiert: ";
const PREFIX_UNKNOWN: &str = "Unbekannte UID: ";
const LINE_MAX_REACHED: &str = "Max. Anzahl erreicht!";

/// Trailing `(UID)` of an added line: `Projekt hinzugefügt: Name (aa:bb:cc:dd)`.
static RE_ADDED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.*) \(([0-9a-f:]*)\)$").unwrap());
/// Trailing time of a deleted line: `Projekt geloescht: Name (0h 5m 23s)`.
static RE_DELETED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*) \((\d+)h (\d+)m (\d+)s\)$").unwrap());

/// One line of the device event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostLine {
    /// A project was registered under `name` for token `uid`.
    ProjectAdded { name: String, uid: String },
    /// Registration rejected because the registry is at capacity.
    MaxReached,
    /// A token was presented; emitted before any mode handling.
    TagDetected { uid: String },
    /// A project was removed, reporting its final accumulated time.
    ProjectDeleted {
        name: String,
        hours: u64,
        minutes: u64,
        seconds: u64,
    },
    ProjectStarted { name: String },
    ProjectPaused { name: String },
    /// A token with no registered project was presented.
    UnknownTag { uid: String },
    /// Request for a project name, always following `UnknownTag`.
    NamePrompt,
}

impl fmt::Display for HostLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostLine::ProjectAdded { name, uid } => {
                write!(f, "{PREFIX_ADDED}{name} ({uid})")
            }
            HostLine::MaxReached => f.write_str(LINE_MAX_REACHED),
            HostLine::TagDetected { uid } => write!(f, "{PREFIX_DETECTED}{uid}"),
            HostLine::ProjectDeleted {
                name,
                hours,
                minutes,
                seconds,
            } => {
                write!(f, "{PREFIX_DELETED}{name} ({hours}h {minutes}m {seconds}s)")
            }
            HostLine::ProjectStarted { name } => write!(f, "{PREFIX_STARTED}{name}"),
            HostLine::ProjectPaused { name } => write!(f, "{PREFIX_PAUSED}{name}"),
            HostLine::UnknownTag { uid } => write!(f, "{PREFIX_UNKNOWN}{uid}"),
            HostLine::NamePrompt => f.write_str(NAME_PROMPT),
        }
    }
}

impl HostLine {
    /// Recognizes a device log line. Returns `None` for anything that is not
    /// one of the fixed templates (the host echoes such lines verbatim).
    pub fn parse(line: &str) -> Option<HostLine> {
        let line = line.trim();

        if line == LINE_MAX_REACHED {
            return Some(HostLine::MaxReached);
        }
        if line == NAME_PROMPT {
            return Some(HostLine::NamePrompt);
        }
        if let Some(rest) = line.strip_prefix(PREFIX_ADDED) {
            return Some(parse_added(rest));
        }
        if let Some(uid) = line.strip_prefix(PREFIX_DETECTED) {
            return Some(HostLine::TagDetected {
                uid: uid.to_string(),
            });
        }
        if let Some(rest) = line.strip_prefix(PREFIX_DELETED) {
            return Some(parse_deleted(rest));
        }
        if let Some(name) = line.strip_prefix(PREFIX_STARTED) {
            return Some(HostLine::ProjectStarted {
                name: name.to_string(),
            });
        }
        if let Some(name) = line.strip_prefix(PREFIX_PAUSED) {
            return Some(HostLine::ProjectPaused {
                name: name.to_string(),
            });
        }
        if let Some(uid) = line.strip_prefix(PREFIX_UNKNOWN) {
            return Some(HostLine::UnknownTag {
                uid: uid.to_string(),
            });
        }

        None
    }
}

fn parse_added(rest: &str) -> HostLine {
    if let Some(caps) = RE_ADDED.captures(rest) {
        return HostLine::ProjectAdded {
            name: caps[1].to_string(),
            uid: caps[2].to_string(),
        };
    }
    // No UID suffix; keep the whole remainder as the name.
    HostLine::ProjectAdded {
        name: rest.to_string(),
        uid: String::new(),
    }
}

fn parse_deleted(rest: &str) -> HostLine {
    if let Some(caps) = RE_DELETED.captures(rest) {
        let hours = caps[2].parse().unwrap_or(0);
        let minutes = caps[3].parse().unwrap_or(0);
        let seconds = caps[4].parse().unwrap_or(0);
        return HostLine::ProjectDeleted {
            name: caps[1].to_string(),
            hours,
            minutes,
            seconds,
        };
    }
    // Malformed time suffix; the name still matters for the host mirror.
    HostLine::ProjectDeleted {
        name: rest.to_string(),
        hours: 0,
        minutes: 0,
        seconds: 0,
    }
}
