//! # stempel-core
//!
//! Core library for the Stempel RFID project time tracker: the project
//! registry, per-project session accounting, and the mode state machine that
//! decides what a freshly scanned token means (start, pause, register,
//! delete, admin toggle).
//!
//! ## Design Principles
//!
//! - **Synchronous**: one control tick services at most one token event and
//!   one host line, strictly sequentially. No async runtime.
//! - **Single owner**: all mutable state lives in one [`Controller`]
//!   aggregate; peripherals are injected behind the [`hal`] traits.
//! - **Injected clock**: every operation takes `now` as a `Duration` since
//!   device start (millisecond resolution, like a monotonic tick counter).
//!   Clock wraparound is undefined by design.
//! - **Volatile**: the registry is in-memory only; nothing survives a
//!   restart.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stempel_core::{Controller, DeviceConfig};
//!
//! let mut controller = Controller::new(DeviceConfig::default());
//! loop {
//!     controller.tick(&mut reader, &mut lcd, &mut host, clock.elapsed());
//! }
//! ```

pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod hal;
pub mod project;
pub mod registry;
pub mod uid;

pub use config::{default_config_path, load_device_config, save_device_config, DeviceConfig};
pub use controller::{Controller, Mode};
pub use display::{Presenter, LCD_COLS, LCD_ROWS};
pub use error::{CoreError, Result};
pub use hal::{HostPort, Lcd, TokenReader};
pub use project::{format_hms, hms_parts, Project};
pub use registry::Registry;
pub use uid::TokenUid;
