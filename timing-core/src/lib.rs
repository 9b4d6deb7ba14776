//! Time-perception trial engine.
//!
//! A subject presses a button to start a trial and again when they believe
//! the target duration has passed. Each press is debounced, the wall-clock
//! time is read from a DS1307/DS3231-style RTC over I2C, and the elapsed time
//! is classified against the target and appended to a line-oriented log.
//!
//! The crate is `no_std` and generic over the `embedded-hal` 1.0 traits so the
//! same code runs on the RP2040 firmware and against test doubles on the host.

#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]

extern crate alloc;

// Must come first so the logging macros are visible to the other modules.
mod fmt;

pub mod bcd;
pub mod cancel;
pub mod config;
pub mod coordinator;
pub mod debounce;
pub mod hardware;
pub mod log_writer;
pub mod rtc;
pub mod timestamp;
pub mod trial;

pub use cancel::CancelToken;
pub use config::TimingConfig;
pub use coordinator::{Termination, TimingCoordinator, TrialError, TrialPhase};
pub use debounce::{ButtonState, Debouncer, WaitError};
pub use hardware::Hardware;
pub use log_writer::{LogStore, LogWriteError, LogWriter};
pub use rtc::{RegisterBlock, Rtc, RtcError};
pub use timestamp::Timestamp;
pub use trial::{Classification, TrialRecord};
