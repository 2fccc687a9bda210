//! Device simulation: the control loop wired to terminal-backed fakes.
//!
//! Stdin plays both peripherals: `scan <hex bytes>` presents a token
//! (`scan 74 8a 71 16` or `scan 74:8a:71:16`), any other line is a host
//! reply (a project name during registration). The 16x2 panel is echoed to
//! stdout whenever its content changes; device log lines are prefixed with
//! `->`.

use std::collections::VecDeque;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use stempel_core::{
    default_config_path, load_device_config, Controller, HostPort, Lcd, TokenReader, LCD_COLS,
};

const TICK_INTERVAL: Duration = Duration::from_millis(50);

pub fn run(config_path: Option<&Path>) -> Result<(), String> {
    let path = config_path
        .map(PathBuf::from)
        .or_else(default_config_path)
        .ok_or_else(|| "Home directory not found".to_string())?;
    let config = load_device_config(&path).map_err(|err| err.to_string())?;
    tracing::info!(
        admin_uid = %config.admin_uid,
        max_projects = config.max_projects,
        config = %path.display(),
        "Simulated device starting"
    );
    println!("Token scans: `scan 74 8a 71 16`; anything else is a host line. Ctrl-D quits.");

    let lines = spawn_stdin_reader();
    let mut controller = Controller::new(config);
    let mut reader = QueueReader::default();
    let mut lcd = TerminalLcd::new();
    let mut host = QueueHost::default();
    let start = Instant::now();

    loop {
        match drain_input(&lines, &mut reader, &mut host) {
            Input::Open => {}
            Input::Closed => return Ok(()),
        }
        controller.tick(&mut reader, &mut lcd, &mut host, start.elapsed());
        lcd.flush();
        thread::sleep(TICK_INTERVAL);
    }
}

enum Input {
    Open,
    Closed,
}

fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn drain_input(lines: &Receiver<String>, reader: &mut QueueReader, host: &mut QueueHost) -> Input {
    loop {
        match lines.try_recv() {
            Ok(line) => dispatch_line(&line, reader, host),
            Err(TryRecvError::Empty) => return Input::Open,
            Err(TryRecvError::Disconnected) => return Input::Closed,
        }
    }
}

fn dispatch_line(line: &str, reader: &mut QueueReader, host: &mut QueueHost) {
    if let Some(rest) = line.trim().strip_prefix("scan") {
        match parse_scan_bytes(rest) {
            Some(raw) => reader.scans.push_back(raw),
            None => tracing::warn!(line, "Could not parse scan bytes"),
        }
        return;
    }
    host.inbound.push_back(line.to_string());
}

fn parse_scan_bytes(rest: &str) -> Option<Vec<u8>> {
    let tokens: Vec<&str> = rest
        .split(|c: char| c.is_whitespace() || c == ':')
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.is_empty() {
        return None;
    }
    tokens
        .into_iter()
        .map(|t| u8::from_str_radix(t, 16).ok())
        .collect()
}

#[derive(Default)]
struct QueueReader {
    scans: VecDeque<Vec<u8>>,
}

impl TokenReader for QueueReader {
    fn poll(&mut self) -> Option<Vec<u8>> {
        self.scans.pop_front()
    }

    fn acknowledge(&mut self) {}
}

#[derive(Default)]
struct QueueHost {
    inbound: VecDeque<String>,
}

impl HostPort for QueueHost {
    fn recv_line(&mut self) -> Option<String> {
        self.inbound.pop_front()
    }

    fn send_line(&mut self, line: &str) {
        println!("-> {line}");
    }
}

/// 16x2 character buffer echoed to the terminal on change.
struct TerminalLcd {
    rows: [Vec<char>; 2],
    dirty: bool,
}

impl TerminalLcd {
    fn new() -> Self {
        TerminalLcd {
            rows: [vec![' '; LCD_COLS], vec![' '; LCD_COLS]],
            dirty: false,
        }
    }

    fn flush(&mut self) {
        if !self.dirty {
            return;
        }
        self.dirty = false;
        let border = "-".repeat(LCD_COLS);
        println!("+{border}+");
        for row in &self.rows {
            let text: String = row.iter().collect();
            println!("|{text}|");
        }
        println!("+{border}+");
    }
}

impl Lcd for TerminalLcd {
    fn clear_row(&mut self, row: u8) {
        self.rows[row as usize] = vec![' '; LCD_COLS];
        self.dirty = true;
    }

    fn write(&mut self, row: u8, col: u8, text: &str) {
        let row = &mut self.rows[row as usize];
        for (i, ch) in text.chars().enumerate() {
            let pos = col as usize + i;
            if pos < LCD_COLS {
                row[pos] = ch;
            }
        }
        self.dirty = true;
    }
}
