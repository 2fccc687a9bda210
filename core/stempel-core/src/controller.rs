//! The mode state machine driving the tracker.
//!
//! One [`Controller`] owns the registry, the current mode, the pending
//! registration, and the display deadlines. The control tick services at
//! most one host line and one token scan, then repaints live status.
//!
//! Confirmation screens claim the device for a fixed span: the freeze
//! deadline suppresses live repaints, the busy deadline suppresses event
//! servicing (a token or host line arriving inside that window is simply
//! not observed, matching the blocking delays of the original firmware
//! while keeping the clock injectable).

use crate::config::DeviceConfig;
use crate::display::{
    Presenter, MSG_ADDED, MSG_DELETED, MSG_DELETE_BACK, MSG_DELETE_OFF, MSG_DELETE_ON,
    MSG_DELETE_SCAN, MSG_MAX_REACHED, MSG_NAME_AT_HOST, MSG_NOT_FOUND, MSG_PAUSED, MSG_STARTED,
    MSG_UNKNOWN_TAG,
};
use crate::error::CoreError;
use crate::hal::{HostPort, Lcd, TokenReader};
use crate::project::hms_parts;
use crate::registry::Registry;
use crate::uid::TokenUid;
use std::time::Duration;
use stempel_protocol::HostLine;

/// Process-wide mode; exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// Admin token scanned: the next project scan deletes that project.
    DeletionPending,
    /// Unknown token scanned: the next host line names the new project.
    AwaitingName,
}

#[derive(Debug)]
pub struct Controller {
    config: DeviceConfig,
    registry: Registry,
    mode: Mode,
    pending_uid: Option<TokenUid>,
    presenter: Presenter,
    /// Live repaints are suppressed until the clock passes this.
    freeze_until: Duration,
    /// No events are serviced until the clock passes this.
    busy_until: Duration,
}

impl Controller {
    pub fn new(config: DeviceConfig) -> Self {
        let registry = Registry::with_capacity(config.max_projects);
        Controller {
            config,
            registry,
            mode: Mode::Normal,
            pending_uid: None,
            presenter: Presenter::new(),
            freeze_until: Duration::ZERO,
            busy_until: Duration::ZERO,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn pending_uid(&self) -> Option<&TokenUid> {
        self.pending_uid.as_ref()
    }

    /// One control tick: while busy, drop events; otherwise service one
    /// pending host line (registration), then one token scan, then repaint
    /// live status.
    pub fn tick<R, L, H>(&mut self, reader: &mut R, lcd: &mut L, host: &mut H, now: Duration)
    where
        R: TokenReader,
        L: Lcd,
        H: HostPort,
    {
        if now < self.busy_until {
            return;
        }

        if self.mode == Mode::AwaitingName {
            if let Some(line) = host.recv_line() {
                self.finish_registration(&line, lcd, host, now);
                return;
            }
        }

        if let Some(raw) = reader.poll() {
            if !raw.is_empty() {
                let uid = TokenUid::from_bytes(&raw);
                self.handle_scan(uid, lcd, host, now);
                reader.acknowledge();
                // Reader settle comes on top of any confirmation span.
                self.busy_until = self.busy_until.max(now) + self.config.settle();
                return;
            }
        }

        self.render_live(lcd, now);
    }

    /// Decides what a scanned token means. Precedence: admin toggle first,
    /// then the deletion branch, then start/pause/register.
    fn handle_scan<L: Lcd, H: HostPort>(
        &mut self,
        uid: TokenUid,
        lcd: &mut L,
        host: &mut H,
        now: Duration,
    ) {
        host.send_line(
            &HostLine::TagDetected {
                uid: uid.to_string(),
            }
            .to_string(),
        );

        if uid == self.config.admin_uid {
            self.toggle_deletion_mode(lcd, now);
            return;
        }

        match self.mode {
            Mode::DeletionPending => self.handle_deletion_scan(&uid, lcd, host, now),
            // Normal, or AwaitingName: a scan re-enters the same decision
            // tree; a known token abandons the pending registration, an
            // unknown one overwrites it (last-write-wins).
            Mode::Normal | Mode::AwaitingName => match self.registry.find_by_uid(&uid) {
                Some(index) => {
                    self.pending_uid = None;
                    self.mode = Mode::Normal;
                    self.toggle_project(index, lcd, host, now);
                }
                None => self.begin_registration(uid, lcd, host),
            },
        }
    }

    fn toggle_deletion_mode<L: Lcd>(&mut self, lcd: &mut L, now: Duration) {
        let entering = self.mode != Mode::DeletionPending;
        self.pending_uid = None;
        self.mode = if entering {
            Mode::DeletionPending
        } else {
            Mode::Normal
        };
        tracing::info!(deletion_mode = entering, "Admin token scanned");

        if entering {
            self.presenter.show(lcd, MSG_DELETE_ON, MSG_DELETE_SCAN);
        } else {
            self.presenter.show(lcd, MSG_DELETE_OFF, MSG_DELETE_BACK);
        }
        self.claim_display(now, self.config.confirm());
    }

    /// Deletion mode is single-shot: one scan always exits it, matched or
    /// not.
    fn handle_deletion_scan<L: Lcd, H: HostPort>(
        &mut self,
        uid: &TokenUid,
        lcd: &mut L,
        host: &mut H,
        now: Duration,
    ) {
        self.mode = Mode::Normal;

        let Some(index) = self.registry.find_by_uid(uid) else {
            tracing::debug!(uid = %uid, "Deletion scan matched no project");
            self.presenter.show(lcd, MSG_NOT_FOUND, "");
            self.claim_display(now, self.config.notice());
            return;
        };

        // Close the open session first so the reported total is final.
        if let Some(project) = self.registry.get_mut(index) {
            project.stop_session(now);
        }
        let Ok(removed) = self.registry.remove(index) else {
            return;
        };

        let (hours, minutes, seconds) = hms_parts(removed.elapsed(now));
        tracing::info!(name = %removed.name, hours, minutes, seconds, "Project deleted");
        host.send_line(
            &HostLine::ProjectDeleted {
                name: removed.name.clone(),
                hours,
                minutes,
                seconds,
            }
            .to_string(),
        );
        self.presenter.show(lcd, &removed.name, MSG_DELETED);
        self.claim_display(now, self.config.confirm());
    }

    /// Start a paused project (stopping whichever one runs) or pause a
    /// running one.
    fn toggle_project<L: Lcd, H: HostPort>(
        &mut self,
        index: usize,
        lcd: &mut L,
        host: &mut H,
        now: Duration,
    ) {
        let Some(project) = self.registry.get(index) else {
            return;
        };
        let name = project.name.clone();

        if !project.is_running() {
            self.registry.stop_all(now);
            if let Some(project) = self.registry.get_mut(index) {
                project.start_session(now);
            }
            tracing::info!(name = %name, "Project started");
            host.send_line(&HostLine::ProjectStarted { name: name.clone() }.to_string());
            self.presenter.show(lcd, &name, MSG_STARTED);
        } else {
            if let Some(project) = self.registry.get_mut(index) {
                project.stop_session(now);
            }
            tracing::info!(name = %name, "Project paused");
            host.send_line(&HostLine::ProjectPaused { name: name.clone() }.to_string());
            self.presenter.show(lcd, &name, MSG_PAUSED);
        }

        // Start/pause confirmations only freeze the panel; the device stays
        // responsive apart from the reader settle.
        self.freeze_until = now + self.config.confirm();
    }

    fn begin_registration<L: Lcd, H: HostPort>(&mut self, uid: TokenUid, lcd: &mut L, host: &mut H) {
        tracing::debug!(uid = %uid, "Unknown token, awaiting name from host");
        host.send_line(
            &HostLine::UnknownTag {
                uid: uid.to_string(),
            }
            .to_string(),
        );
        host.send_line(&HostLine::NamePrompt.to_string());
        self.pending_uid = Some(uid);
        self.mode = Mode::AwaitingName;
        self.presenter.show(lcd, MSG_UNKNOWN_TAG, MSG_NAME_AT_HOST);
    }

    /// Second phase of registration: the host supplied a name for the
    /// pending UID.
    fn finish_registration<L: Lcd, H: HostPort>(
        &mut self,
        line: &str,
        lcd: &mut L,
        host: &mut H,
        now: Duration,
    ) {
        self.mode = Mode::Normal;
        let Some(uid) = self.pending_uid.take() else {
            return;
        };

        // Whitespace-only names collapse to empty and are accepted as-is.
        let name = line.trim().to_string();

        match self.registry.insert(uid.clone(), name.clone()) {
            Ok(_) => {
                tracing::info!(name = %name, uid = %uid, "Project registered");
                host.send_line(
                    &HostLine::ProjectAdded {
                        name: name.clone(),
                        uid: uid.to_string(),
                    }
                    .to_string(),
                );
                self.presenter.show(lcd, MSG_ADDED, &name);
                self.claim_display(now, self.config.confirm());
            }
            Err(CoreError::CapacityExceeded { .. }) => {
                tracing::warn!(name = %name, "Registration rejected, registry full");
                host.send_line(&HostLine::MaxReached.to_string());
                self.presenter.show(lcd, MSG_MAX_REACHED, "");
                self.claim_display(now, self.config.notice());
            }
            Err(err) => {
                // Structurally unreachable: only unknown tokens get here.
                tracing::warn!(error = %err, "Registration rejected");
            }
        }
    }

    fn render_live<L: Lcd>(&mut self, lcd: &mut L, now: Duration) {
        if now <= self.freeze_until {
            return;
        }
        let idle = self.mode == Mode::Normal && self.pending_uid.is_none();
        self.presenter.render_live(lcd, &self.registry, idle, now);
    }

    /// Keep a just-shown message on the panel for `span` and drop any event
    /// arriving meanwhile.
    fn claim_display(&mut self, now: Duration, span: Duration) {
        self.freeze_until = now + span;
        self.busy_until = now + span;
    }
}
