//! End-to-end scenarios driving the controller through whole work days:
//! repeated ticks with a stepping clock, the way the firmware loop runs.

use std::collections::VecDeque;
use std::time::Duration;

use stempel_core::{Controller, DeviceConfig, HostPort, Lcd, Mode, TokenReader};

const ADMIN: &[u8] = &[0x74, 0x8a, 0x71, 0x16];
const TAG_A: &[u8] = &[0xaa, 0xbb, 0xcc, 0xdd];
const TAG_B: &[u8] = &[0x11, 0x22, 0x33, 0x44];

#[derive(Default)]
struct ScriptedReader {
    scans: VecDeque<Vec<u8>>,
}

impl TokenReader for ScriptedReader {
    fn poll(&mut self) -> Option<Vec<u8>> {
        self.scans.pop_front()
    }

    fn acknowledge(&mut self) {}
}

#[derive(Default)]
struct PanelBuffer {
    rows: [String; 2],
}

impl Lcd for PanelBuffer {
    fn clear_row(&mut self, row: u8) {
        self.rows[row as usize].clear();
    }

    fn write(&mut self, row: u8, col: u8, text: &str) {
        let row = &mut self.rows[row as usize];
        while row.chars().count() < col as usize {
            row.push(' ');
        }
        row.push_str(text);
    }
}

#[derive(Default)]
struct ScriptedHost {
    inbound: VecDeque<String>,
    outbound: Vec<String>,
}

impl HostPort for ScriptedHost {
    fn recv_line(&mut self) -> Option<String> {
        self.inbound.pop_front()
    }

    fn send_line(&mut self, line: &str) {
        self.outbound.push(line.to_string());
    }
}

struct Device {
    controller: Controller,
    reader: ScriptedReader,
    panel: PanelBuffer,
    host: ScriptedHost,
    now: Duration,
}

impl Device {
    fn boot() -> Self {
        Device {
            controller: Controller::new(DeviceConfig::default()),
            reader: ScriptedReader::default(),
            panel: PanelBuffer::default(),
            host: ScriptedHost::default(),
            now: Duration::ZERO,
        }
    }

    /// Advances the clock in 100 ms ticks, running the control loop.
    fn run_for(&mut self, span_ms: u64) {
        let step = Duration::from_millis(100);
        let end = self.now + Duration::from_millis(span_ms);
        while self.now < end {
            self.now += step;
            self.controller
                .tick(&mut self.reader, &mut self.panel, &mut self.host, self.now);
        }
    }

    fn present(&mut self, raw: &[u8]) {
        self.reader.scans.push_back(raw.to_vec());
        self.run_for(100);
    }

    fn type_name(&mut self, name: &str) {
        self.host.inbound.push_back(name.to_string());
        self.run_for(100);
    }
}

#[test]
fn full_registration_and_tracking_day() {
    let mut dev = Device::boot();

    // Idle prompt comes up on the first tick.
    dev.run_for(200);
    assert_eq!(dev.panel.rows[0], "Projekt?");

    // Register two projects.
    dev.present(TAG_A);
    assert_eq!(dev.controller.mode(), Mode::AwaitingName);
    dev.run_for(1_500);
    dev.type_name("Thesis");
    dev.run_for(5_000);
    dev.present(TAG_B);
    dev.run_for(1_500);
    dev.type_name("Paper");
    dev.run_for(5_000);
    assert_eq!(dev.controller.registry().len(), 2);

    // Work on Thesis for ten seconds.
    dev.present(TAG_A);
    dev.run_for(10_000);
    assert_eq!(dev.panel.rows[0], "Thesis");
    assert!(dev.panel.rows[1].starts_with("00h 00m"));

    // Switching to Paper pauses Thesis.
    dev.present(TAG_B);
    dev.run_for(5_000);
    let registry = dev.controller.registry();
    let thesis = registry.get(0).unwrap();
    let paper = registry.get(1).unwrap();
    assert!(!thesis.is_running());
    assert!(paper.is_running());
    assert!(thesis.accumulated() >= Duration::from_millis(10_000));
    assert_eq!(
        registry.iter().filter(|p| p.is_running()).count(),
        1,
        "single-active invariant"
    );
}

#[test]
fn deletion_reports_final_time_and_compacts() {
    let mut dev = Device::boot();
    dev.present(TAG_A);
    dev.run_for(1_500);
    dev.type_name("Thesis");
    dev.run_for(5_000);
    dev.present(TAG_B);
    dev.run_for(1_500);
    dev.type_name("Paper");
    dev.run_for(5_000);

    // Run Thesis, then delete it while still running.
    dev.present(TAG_A);
    dev.run_for(10_000);
    dev.present(ADMIN);
    assert_eq!(dev.controller.mode(), Mode::DeletionPending);
    dev.run_for(5_000);
    dev.present(TAG_A);
    dev.run_for(100);

    assert_eq!(dev.controller.mode(), Mode::Normal);
    assert_eq!(dev.controller.registry().len(), 1);
    assert_eq!(dev.controller.registry().get(0).unwrap().name, "Paper");
    assert!(dev
        .host
        .outbound
        .iter()
        .any(|line| line.starts_with("Projekt geloescht: Thesis (")));

    // Panel returns to the idle prompt once the confirmation expires.
    dev.run_for(5_000);
    assert_eq!(dev.panel.rows[0], "Projekt?");
}

#[test]
fn confirmation_pause_swallows_scans() {
    let mut dev = Device::boot();
    dev.present(ADMIN);
    assert_eq!(dev.controller.mode(), Mode::DeletionPending);

    // Admin confirmation claims the device for 3 s + 1 s settle; a token
    // presented inside that window is never observed.
    dev.present(TAG_A);
    dev.run_for(2_000);
    assert_eq!(dev.controller.mode(), Mode::DeletionPending);
    assert_eq!(dev.controller.registry().len(), 0);
    // The swallowed scan surfaces after the pause: TAG_A is unknown, so the
    // deletion mode exits through the "not found" notice.
    dev.run_for(3_000);
    assert_eq!(dev.controller.mode(), Mode::Normal);
}

#[test]
fn capacity_is_enforced_at_registration_time() {
    let config = DeviceConfig {
        max_projects: 1,
        ..DeviceConfig::default()
    };
    let mut dev = Device::boot();
    dev.controller = Controller::new(config);

    dev.present(TAG_A);
    dev.run_for(1_500);
    dev.type_name("Only");
    dev.run_for(5_000);

    dev.present(TAG_B);
    dev.run_for(1_500);
    dev.type_name("Overflow");
    dev.run_for(100);

    assert_eq!(dev.controller.registry().len(), 1);
    assert_eq!(dev.controller.mode(), Mode::Normal);
    assert!(dev
        .host
        .outbound
        .contains(&"Max. Anzahl erreicht!".to_string()));
    assert_eq!(dev.panel.rows[0], "Max erreicht!");
}
