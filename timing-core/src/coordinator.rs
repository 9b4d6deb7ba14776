//! Trial sequencing.
//!
//! A trial walks `AwaitStart -> AwaitEnd -> Computed`: the RTC is read right
//! after each confirmed press, so the start reading always precedes the end
//! reading. [`TimingCoordinator::run`] repeats trials until the cancel token
//! is raised or the hardware fails, and says which of those happened.

use core::fmt;

use embedded_hal::digital::InputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::cancel::CancelToken;
use crate::config::TimingConfig;
use crate::debounce::{Debouncer, WaitError};
use crate::hardware::Hardware;
use crate::log_writer::{LogStore, LogWriter};
use crate::rtc::{Rtc, RtcError};
use crate::timestamp::Timestamp;
use crate::trial::TrialRecord;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrialPhase {
    AwaitStart,
    AwaitEnd { start: Timestamp },
    Computed(TrialRecord),
}

/// Why a single trial did not produce a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrialError<I, P> {
    Cancelled,
    Rtc(RtcError<I>),
    Pin(P),
}

impl<I, P> From<WaitError<P>> for TrialError<I, P> {
    fn from(error: WaitError<P>) -> Self {
        match error {
            WaitError::Cancelled => TrialError::Cancelled,
            WaitError::Pin(e) => TrialError::Pin(e),
        }
    }
}

impl<I, P> From<RtcError<I>> for TrialError<I, P> {
    fn from(error: RtcError<I>) -> Self {
        TrialError::Rtc(error)
    }
}

/// Why [`TimingCoordinator::run`] returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination<I, P> {
    /// The operator asked to stop.
    Cancelled,
    /// Nothing answered at the RTC address; no trial was started.
    RtcNotFound,
    /// Reading the RTC failed mid-trial.
    Rtc(RtcError<I>),
    /// Reading the button failed mid-trial.
    Pin(P),
}

impl<I: fmt::Debug, P: fmt::Debug> fmt::Display for Termination<I, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => write!(f, "stopped by operator"),
            Self::RtcNotFound => write!(f, "RTC not found, check its wiring"),
            Self::Rtc(e) => write!(f, "{e}"),
            Self::Pin(e) => write!(f, "button input error: {e:?}"),
        }
    }
}

pub struct TimingCoordinator {
    config: TimingConfig,
    rtc: Rtc,
    debouncer: Debouncer,
    next_index: u32,
}

impl TimingCoordinator {
    pub fn new(config: TimingConfig, rtc: Rtc) -> Self {
        Self {
            config,
            rtc,
            debouncer: Debouncer::from_config(&config),
            next_index: 1,
        }
    }

    pub fn config(&self) -> &TimingConfig {
        &self.config
    }

    /// Index the next trial will get. Starts at 1.
    pub fn next_index(&self) -> u32 {
        self.next_index
    }

    /// Run one trial to completion. Does not touch the log and does not
    /// advance the trial index.
    pub async fn run_trial<I2C, P, D>(
        &self,
        hw: &mut Hardware<I2C, P, D>,
        cancel: &CancelToken,
        index: u32,
    ) -> Result<TrialRecord, TrialError<I2C::Error, P::Error>>
    where
        I2C: I2c,
        P: InputPin,
        D: DelayNs,
    {
        let mut phase = TrialPhase::AwaitStart;
        loop {
            phase = match phase {
                TrialPhase::AwaitStart => {
                    info!("Trial {}: press the button to start", index);
                    self.debouncer
                        .wait_for_press(&mut hw.button, &mut hw.delay, cancel)
                        .await?;
                    let start = self.rtc.read_time(&mut hw.i2c).await?;
                    info!("Start: {}", start);
                    info!("Count {} seconds in your head, then press", self.config.target_secs);
                    TrialPhase::AwaitEnd { start }
                }
                TrialPhase::AwaitEnd { start } => {
                    self.debouncer
                        .wait_for_press(&mut hw.button, &mut hw.delay, cancel)
                        .await?;
                    let end = self.rtc.read_time(&mut hw.i2c).await?;
                    info!("Stop: {}", end);
                    TrialPhase::Computed(TrialRecord::new(index, start, end, &self.config))
                }
                TrialPhase::Computed(record) => {
                    info!(
                        "Elapsed: {} s, {}",
                        record.duration_secs,
                        record.classification.verdict()
                    );
                    return Ok(record);
                }
            };
        }
    }

    /// Probe the RTC, then run trials until cancelled or until the hardware
    /// fails. A failed log write is reported and the loop carries on.
    pub async fn run<I2C, P, D, S>(
        &mut self,
        hw: &mut Hardware<I2C, P, D>,
        log: &mut LogWriter<S>,
        cancel: &CancelToken,
    ) -> Termination<I2C::Error, P::Error>
    where
        I2C: I2c,
        P: InputPin,
        D: DelayNs,
        S: LogStore,
    {
        if !self.rtc.probe(&mut hw.i2c).await {
            return Termination::RtcNotFound;
        }

        loop {
            if cancel.is_cancelled() {
                info!("Stopped before trial {}", self.next_index);
                return Termination::Cancelled;
            }

            let record = match self.run_trial(hw, cancel, self.next_index).await {
                Ok(record) => record,
                Err(TrialError::Cancelled) => {
                    info!("Trial {} cancelled, nothing logged", self.next_index);
                    return Termination::Cancelled;
                }
                Err(TrialError::Rtc(e)) => {
                    error!("Trial {} aborted: {}", self.next_index, e);
                    return Termination::Rtc(e);
                }
                Err(TrialError::Pin(e)) => {
                    error!("Trial {} aborted: button read failed", self.next_index);
                    return Termination::Pin(e);
                }
            };

            match log.append(&record).await {
                Ok(()) => info!("Trial {} saved", record.index),
                Err(e) => warn!("Could not write trial {} to the log: {}", record.index, e),
            }

            self.next_index += 1;
            hw.delay.delay_ms(self.config.inter_trial_pause_ms).await;
        }
    }
}

impl Default for TimingCoordinator {
    fn default() -> Self {
        Self::new(TimingConfig::default(), Rtc::default())
    }
}
