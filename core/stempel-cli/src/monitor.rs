//! Host-side event console.
//!
//! Reads device log lines from stdin (typically piped from the serial
//! bridge), recognizes them via stempel-protocol, and keeps a live mirror
//! table of all projects. Unrecognized lines are echoed verbatim.

use crate::table::{format_clock, ProjectTable};
use std::io::{self, BufRead};
use std::time::Instant;
use stempel_protocol::HostLine;

pub fn run(json: bool) -> Result<(), String> {
    let start = Instant::now();
    let mut table = ProjectTable::new();

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.map_err(|err| format!("Failed to read line: {err}"))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let stamp = chrono::Local::now().format("%H:%M:%S");
        match HostLine::parse(line) {
            Some(event) => {
                table.apply(&event, start.elapsed());
                if json {
                    let encoded = serde_json::to_string(&event)
                        .map_err(|err| format!("Failed to encode event: {err}"))?;
                    println!("{encoded}");
                } else {
                    println!("[{stamp}] {line}");
                    print_table(&table, start);
                }
            }
            None => {
                tracing::debug!(line, "Unrecognized device line");
                println!("[{stamp}] {line}");
            }
        }
    }

    Ok(())
}

fn print_table(table: &ProjectTable, start: Instant) {
    if table.is_empty() {
        return;
    }
    let now = start.elapsed();
    println!(
        "  {:<20} {:<9} {:>10} {:>10}",
        "Projektname", "Status", "Gesamtzeit", "Session"
    );
    for row in table.iter() {
        let status = if row.is_running() { "Läuft" } else { "Pausiert" };
        println!(
            "  {:<20} {:<9} {:>10} {:>10}",
            row.name,
            status,
            format_clock(row.total(now)),
            format_clock(row.session(now)),
        );
    }
}
