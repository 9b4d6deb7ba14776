#![allow(dead_code)]

//! Simulated hardware driven by one shared millisecond clock. Only delays
//! move the clock, so a run is fully deterministic.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embedded_hal::digital::{self, InputPin};
use embedded_hal::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;
use timing_core::bcd;
use timing_core::config::RTC_ADDRESS;
use timing_core::{CancelToken, Hardware, LogStore};

#[derive(Clone, Default)]
pub struct Clock(Rc<Cell<u64>>);

impl Clock {
    pub fn now_ms(&self) -> u64 {
        self.0.get() / 1_000_000
    }

    fn advance_ns(&self, ns: u64) {
        self.0.set(self.0.get() + ns);
    }
}

/// Advances the clock and raises the cancel token once `cancel_at_ms` is
/// reached, standing in for the operator hitting Ctrl-C.
pub struct SimDelay<'a> {
    clock: Clock,
    cancel: &'a CancelToken,
    cancel_at_ms: u64,
}

impl<'a> SimDelay<'a> {
    pub fn new(clock: Clock, cancel: &'a CancelToken, cancel_at_ms: u64) -> Self {
        Self {
            clock,
            cancel,
            cancel_at_ms,
        }
    }
}

impl DelayNs for SimDelay<'_> {
    async fn delay_ns(&mut self, ns: u32) {
        self.clock.advance_ns(ns as u64);
        if self.clock.now_ms() >= self.cancel_at_ms {
            self.cancel.cancel();
        }
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.clock.advance_ns(ms as u64 * 1_000_000);
        if self.clock.now_ms() >= self.cancel_at_ms {
            self.cancel.cancel();
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Press {
    pub down_ms: u64,
    pub up_ms: u64,
    pub bouncy: bool,
}

impl Press {
    pub const fn clean(down_ms: u64, up_ms: u64) -> Self {
        Self {
            down_ms,
            up_ms,
            bouncy: false,
        }
    }

    pub const fn bouncy(down_ms: u64, up_ms: u64) -> Self {
        Self {
            down_ms,
            up_ms,
            bouncy: true,
        }
    }
}

/// Contacts chatter for this long after both edges of a bouncy press.
pub const BOUNCE_MS: u64 = 20;
/// Half-period of the chatter.
const BOUNCE_FLIP_MS: u64 = 3;

/// Pulled-up button following a script of presses.
pub struct SimButton {
    clock: Clock,
    presses: Vec<Press>,
    pub reads: Rc<Cell<usize>>,
}

impl SimButton {
    pub fn new(clock: Clock, presses: &[Press]) -> Self {
        Self {
            clock,
            presses: presses.to_vec(),
            reads: Rc::default(),
        }
    }

    fn level_low(&self, t: u64) -> bool {
        for press in &self.presses {
            if press.bouncy && t >= press.down_ms && t < press.down_ms + BOUNCE_MS {
                return ((t - press.down_ms) / BOUNCE_FLIP_MS) % 2 == 0;
            }
            if press.bouncy && t >= press.up_ms && t < press.up_ms + BOUNCE_MS {
                return ((t - press.up_ms) / BOUNCE_FLIP_MS) % 2 == 1;
            }
            if t >= press.down_ms && t < press.up_ms {
                return true;
            }
        }
        false
    }
}

impl digital::ErrorType for SimButton {
    type Error = core::convert::Infallible;
}

impl InputPin for SimButton {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.is_low().map(|low| !low)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.reads.set(self.reads.get() + 1);
        Ok(self.level_low(self.clock.now_ms()))
    }
}

/// DS1307-style clock on the bus whose time follows the simulated clock.
pub struct SimRtc {
    clock: Clock,
    /// Seconds since midnight on 2024-01-01 at simulated time zero.
    base_secs: u64,
    pub present: bool,
    pub fail_register_reads: bool,
    pub register_reads: Rc<Cell<usize>>,
}

impl SimRtc {
    pub fn new(clock: Clock, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            clock,
            base_secs: hour as u64 * 3600 + minute as u64 * 60 + second as u64,
            present: true,
            fail_register_reads: false,
            register_reads: Rc::default(),
        }
    }

    fn registers(&self) -> [u8; 7] {
        let secs = self.base_secs + self.clock.now_ms() / 1000;
        let day = 1 + secs / 86_400;
        let tod = secs % 86_400;
        let enc = |v: u64| bcd::encode(v as u8).unwrap();
        [
            enc(tod % 60),
            enc(tod / 60 % 60),
            enc(tod / 3600),
            0x02,
            enc(day),
            0x01,
            0x24,
        ]
    }
}

impl ErrorType for SimRtc {
    type Error = ErrorKind;
}

impl I2c for SimRtc {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if !self.present || address != RTC_ADDRESS {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        let register_read = operations
            .iter()
            .any(|op| matches!(op, Operation::Write(bytes) if bytes.first() == Some(&0x00)));
        if register_read {
            if self.fail_register_reads {
                return Err(ErrorKind::ArbitrationLoss);
            }
            self.register_reads.set(self.register_reads.get() + 1);
        }
        let registers = self.registers();
        for op in operations.iter_mut() {
            if let Operation::Read(buf) = op {
                let n = buf.len().min(registers.len());
                buf[..n].copy_from_slice(&registers[..n]);
            }
        }
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct MemoryLog {
    pub lines: Rc<RefCell<Vec<String>>>,
    pub attempts: Rc<Cell<usize>>,
    pub fail: bool,
}

#[derive(Debug, PartialEq)]
pub struct Unavailable;

impl LogStore for MemoryLog {
    type Error = Unavailable;

    async fn append_line(&mut self, line: &str) -> Result<(), Self::Error> {
        self.attempts.set(self.attempts.get() + 1);
        if self.fail {
            return Err(Unavailable);
        }
        self.lines.borrow_mut().push(line.to_string());
        Ok(())
    }
}

pub type SimHardware<'a> = Hardware<SimRtc, SimButton, SimDelay<'a>>;

pub fn hardware<'a>(
    clock: &Clock,
    presses: &[Press],
    rtc_time: (u8, u8, u8),
    cancel: &'a CancelToken,
    cancel_at_ms: u64,
) -> SimHardware<'a> {
    Hardware::new(
        SimRtc::new(clock.clone(), rtc_time.0, rtc_time.1, rtc_time.2),
        SimButton::new(clock.clone(), presses),
        SimDelay::new(clock.clone(), cancel, cancel_at_ms),
    )
}
