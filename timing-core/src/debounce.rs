//! Push-button debouncing by polling.
//!
//! The button pulls the input low when pressed. Contact bounce shows up as a
//! burst of low/high flips right after the press and again after the
//! release; the settle intervals below are longer than either burst, so one
//! physical press-and-release produces exactly one confirmed press.

use core::fmt;

use embedded_hal::digital::InputPin;
use embedded_hal_async::delay::DelayNs;

use crate::cancel::CancelToken;
use crate::config::TimingConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonState {
    Released,
    Pressed,
}

impl ButtonState {
    /// Pull-up wiring: a low level means the button is held down.
    pub const fn from_level(is_low: bool) -> Self {
        if is_low { Self::Pressed } else { Self::Released }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitError<E> {
    /// The cancel token was raised while waiting.
    Cancelled,
    /// Reading the input pin failed.
    Pin(E),
}

impl<E: fmt::Debug> fmt::Display for WaitError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => write!(f, "wait cancelled"),
            Self::Pin(e) => write!(f, "button input error: {e:?}"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    poll_interval_ms: u32,
    settle_ms: u32,
}

impl Debouncer {
    pub const fn new(poll_interval_ms: u32, settle_ms: u32) -> Self {
        Self {
            poll_interval_ms,
            settle_ms,
        }
    }

    pub const fn from_config(config: &TimingConfig) -> Self {
        Self::new(config.poll_interval_ms, config.settle_ms)
    }

    /// Wait for one complete press-and-release cycle.
    ///
    /// 1. If the button is still held from an earlier press, wait for release.
    /// 2. Wait for the press.
    /// 3. Let the press bounce settle.
    /// 4. Wait for the release.
    /// 5. Let the release bounce settle.
    ///
    /// Step 5 keeps release bounce from reading as the next press. It also
    /// means the call returns, and the caller reads the RTC, one settle
    /// interval after the release.
    ///
    /// There is no timeout. The cancel token is checked before every pin
    /// read and after every settle interval.
    pub async fn wait_for_press<P, D>(
        &self,
        pin: &mut P,
        delay: &mut D,
        cancel: &CancelToken,
    ) -> Result<(), WaitError<P::Error>>
    where
        P: InputPin,
        D: DelayNs,
    {
        self.wait_for(ButtonState::Released, pin, delay, cancel).await?;
        self.wait_for(ButtonState::Pressed, pin, delay, cancel).await?;
        trace!("Button down, settling");
        self.settle::<_, P::Error>(delay, cancel).await?;
        self.wait_for(ButtonState::Released, pin, delay, cancel).await?;
        self.settle::<_, P::Error>(delay, cancel).await?;
        debug!("Button press confirmed");
        Ok(())
    }

    async fn wait_for<P, D>(
        &self,
        target: ButtonState,
        pin: &mut P,
        delay: &mut D,
        cancel: &CancelToken,
    ) -> Result<(), WaitError<P::Error>>
    where
        P: InputPin,
        D: DelayNs,
    {
        loop {
            if cancel.is_cancelled() {
                return Err(WaitError::Cancelled);
            }
            if read_state(pin)? == target {
                return Ok(());
            }
            delay.delay_ms(self.poll_interval_ms).await;
        }
    }

    async fn settle<D: DelayNs, E>(
        &self,
        delay: &mut D,
        cancel: &CancelToken,
    ) -> Result<(), WaitError<E>> {
        delay.delay_ms(self.settle_ms).await;
        if cancel.is_cancelled() {
            return Err(WaitError::Cancelled);
        }
        Ok(())
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::from_config(&TimingConfig::default())
    }
}

fn read_state<P: InputPin>(pin: &mut P) -> Result<ButtonState, WaitError<P::Error>> {
    pin.is_low()
        .map(ButtonState::from_level)
        .map_err(WaitError::Pin)
}
