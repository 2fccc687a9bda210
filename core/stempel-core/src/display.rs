//! Display presentation for the 16x2 status panel.
//!
//! The presenter composes at most two rows and writes them through the
//! [`Lcd`] seam, clipping to the panel width and skipping repaints when the
//! content is unchanged (a repaint per tick would make the panel flicker).

use crate::hal::Lcd;
use crate::project::format_hms;
use crate::registry::Registry;
use std::time::Duration;

pub const LCD_ROWS: u8 = 2;
pub const LCD_COLS: usize = 16;

/// Idle prompt shown when nothing is running and nothing is pending.
pub const MSG_IDLE: &str = "Projekt?";
pub const MSG_DELETE_ON: &str = "Loeschmodus an";
pub const MSG_DELETE_SCAN: &str = "Projekt scannen";
pub const MSG_DELETE_OFF: &str = "Abbruch";
pub const MSG_DELETE_BACK: &str = "Zurueck...";
pub const MSG_DELETED: &str = "geloescht";
pub const MSG_NOT_FOUND: &str = "Nicht gefunden";
pub const MSG_STARTED: &str = "Gestartet";
pub const MSG_PAUSED: &str = "Pausiert";
pub const MSG_UNKNOWN_TAG: &str = "Unbekanntes Tag";
pub const MSG_NAME_AT_HOST: &str = "-> Name am PC";
pub const MSG_ADDED: &str = "Projekt hinzugefuegt:";
pub const MSG_MAX_REACHED: &str = "Max erreicht!";

#[derive(Debug, Default)]
pub struct Presenter {
    last: Option<(String, String)>,
}

impl Presenter {
    pub fn new() -> Self {
        Presenter::default()
    }

    /// Paints both rows, clipped to the panel width. Skipped entirely when
    /// the rows match what is already on the panel.
    pub fn show<L: Lcd>(&mut self, lcd: &mut L, row0: &str, row1: &str) {
        let next = (clip(row0), clip(row1));
        if self.last.as_ref() == Some(&next) {
            return;
        }
        lcd.clear_row(0);
        lcd.write(0, 0, &next.0);
        lcd.clear_row(1);
        lcd.write(1, 0, &next.1);
        self.last = Some(next);
    }

    /// Live status: the running project's name and elapsed time, or the idle
    /// prompt when `idle` says nothing else owns the panel.
    pub fn render_live<L: Lcd>(
        &mut self,
        lcd: &mut L,
        registry: &Registry,
        idle: bool,
        now: Duration,
    ) {
        if let Some(index) = registry.running_index() {
            if let Some(project) = registry.get(index) {
                let time = format_hms(project.elapsed(now));
                let name = project.name.clone();
                self.show(lcd, &name, &time);
            }
        } else if idle {
            self.show(lcd, MSG_IDLE, "");
        }
    }
}

fn clip(text: &str) -> String {
    text.chars().take(LCD_COLS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uid::TokenUid;

    /// 16x2 character buffer behaving like the real panel.
    #[derive(Debug)]
    pub struct FakeLcd {
        pub rows: [String; 2],
        pub writes: usize,
    }

    impl FakeLcd {
        pub fn new() -> Self {
            FakeLcd {
                rows: [" ".repeat(LCD_COLS), " ".repeat(LCD_COLS)],
                writes: 0,
            }
        }

        pub fn row(&self, row: usize) -> &str {
            self.rows[row].trim_end()
        }
    }

    impl Lcd for FakeLcd {
        fn clear_row(&mut self, row: u8) {
            self.rows[row as usize] = " ".repeat(LCD_COLS);
        }

        fn write(&mut self, row: u8, col: u8, text: &str) {
            self.writes += 1;
            let row = &mut self.rows[row as usize];
            let mut chars: Vec<char> = row.chars().collect();
            for (i, ch) in text.chars().enumerate() {
                let pos = col as usize + i;
                if pos < LCD_COLS {
                    chars[pos] = ch;
                }
            }
            *row = chars.into_iter().collect();
        }
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn show_paints_both_rows() {
        let mut lcd = FakeLcd::new();
        let mut presenter = Presenter::new();
        presenter.show(&mut lcd, "Thesis", "Gestartet");
        assert_eq!(lcd.row(0), "Thesis");
        assert_eq!(lcd.row(1), "Gestartet");
    }

    #[test]
    fn show_clips_to_panel_width() {
        let mut lcd = FakeLcd::new();
        let mut presenter = Presenter::new();
        presenter.show(&mut lcd, "Projekt hinzugefuegt:", "");
        assert_eq!(lcd.row(0), "Projekt hinzugef");
    }

    #[test]
    fn unchanged_rows_are_not_repainted() {
        let mut lcd = FakeLcd::new();
        let mut presenter = Presenter::new();
        presenter.show(&mut lcd, "Thesis", "00h 00m 01s");
        let writes = lcd.writes;
        presenter.show(&mut lcd, "Thesis", "00h 00m 01s");
        assert_eq!(lcd.writes, writes);
    }

    #[test]
    fn live_render_shows_running_project_time() {
        let mut registry = Registry::with_capacity(4);
        registry.insert(TokenUid::from("aa"), "Thesis").unwrap();
        registry.get_mut(0).unwrap().start_session(ms(0));

        let mut lcd = FakeLcd::new();
        let mut presenter = Presenter::new();
        presenter.render_live(&mut lcd, &registry, true, ms(61_000));

        assert_eq!(lcd.row(0), "Thesis");
        assert_eq!(lcd.row(1), "00h 01m 01s");
    }

    #[test]
    fn live_render_idle_prompt_only_when_idle() {
        let registry = Registry::with_capacity(4);
        let mut lcd = FakeLcd::new();
        let mut presenter = Presenter::new();

        presenter.render_live(&mut lcd, &registry, false, ms(0));
        assert_eq!(lcd.row(0), "");

        presenter.render_live(&mut lcd, &registry, true, ms(0));
        assert_eq!(lcd.row(0), MSG_IDLE);
    }
}
