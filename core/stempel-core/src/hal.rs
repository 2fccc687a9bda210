//! Peripheral traits consumed by the controller.
//!
//! The physical drivers (RC522 reader, 16x2 LCD, serial port) live outside
//! this crate; the controller only sees these seams. Tests inject in-memory
//! fakes, the CLI injects terminal-backed implementations.

/// Token reader: yields raw UID bytes when a token is presented.
pub trait TokenReader {
    /// One non-blocking read attempt. `None` when no token is present.
    fn poll(&mut self) -> Option<Vec<u8>>;

    /// Signals that the current token has been handled and the reader may
    /// settle before the next poll.
    fn acknowledge(&mut self);
}

/// Fixed-size character display addressed by row and column.
pub trait Lcd {
    fn clear_row(&mut self, row: u8);
    fn write(&mut self, row: u8, col: u8, text: &str);
}

/// Line-oriented text channel to the host.
pub trait HostPort {
    /// One non-blocking receive attempt. `None` when no full line is pending.
    fn recv_line(&mut self) -> Option<String>;

    fn send_line(&mut self, line: &str);
}
