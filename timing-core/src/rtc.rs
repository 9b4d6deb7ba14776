//! DS1307/DS3231 time-keeping register access.
//!
//! The clock keeps date and time in seven consecutive BCD registers starting
//! at address 0x00. A read sets the register pointer to 0 and bursts all
//! seven bytes in one write-read transaction, so the fields are latched
//! together and cannot tear across a second boundary.
//!
//! | Index | Field        | Mask | Notes                       |
//! | ----- | ------------ | ---- | --------------------------- |
//! | 0     | seconds      | 0x7F | bit 7 is the clock-halt bit |
//! | 1     | minutes      | 0x7F |                             |
//! | 2     | hours        | 0x3F | 24-hour mode assumed        |
//! | 3     | weekday      |      | ignored                     |
//! | 4     | day of month | 0x3F |                             |
//! | 5     | month        | 0x1F | bit 7 is the century flag   |
//! | 6     | year         | 0xFF | offset from 2000            |

use core::fmt;

use embedded_hal_async::i2c::I2c;

use crate::bcd;
use crate::config::{RTC_ADDRESS, RTC_YEAR_BASE};
use crate::timestamp::Timestamp;

pub const REGISTER_BLOCK_LEN: usize = 7;

/// Raw time-keeping registers, in bus order.
pub type RegisterBlock = [u8; REGISTER_BLOCK_LEN];

mod reg {
    pub const SECONDS: usize = 0;
    pub const MINUTES: usize = 1;
    pub const HOURS: usize = 2;
    #[allow(dead_code)]
    pub const WEEKDAY: usize = 3;
    pub const DAY: usize = 4;
    pub const MONTH: usize = 5;
    pub const YEAR: usize = 6;
}

mod mask {
    pub const SECONDS: u8 = 0x7F;
    pub const MINUTES: u8 = 0x7F;
    pub const HOURS: u8 = 0x3F;
    pub const DAY: u8 = 0x3F;
    pub const MONTH: u8 = 0x1F;
    pub const YEAR: u8 = 0xFF;
}

/// Register pointer value selecting the seconds register.
const TIME_REGISTER_START: u8 = 0x00;

/// Addresses outside 0x08..=0x77 are reserved on I2C.
const FIRST_SCAN_ADDRESS: u8 = 0x08;
const LAST_SCAN_ADDRESS: u8 = 0x77;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RtcError<E> {
    /// The bus transaction did not complete.
    Bus(E),
    /// The registers held something that is not a valid date and time.
    InvalidTimestamp(RegisterBlock),
}

impl<E: fmt::Debug> fmt::Display for RtcError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "RTC bus error: {e:?}"),
            Self::InvalidTimestamp(block) => {
                write!(f, "RTC registers hold no valid time: {block:02X?}")
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: fmt::Debug> defmt::Format for RtcError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Bus(e) => defmt::write!(f, "RTC bus error: {}", defmt::Debug2Format(e)),
            Self::InvalidTimestamp(block) => {
                defmt::write!(f, "RTC registers invalid: {:02x}", block)
            }
        }
    }
}

/// Driver for the RTC. Holds no bus handle; the caller passes the bus in for
/// each operation so one hardware context can own it.
#[derive(Debug, Clone, Copy)]
pub struct Rtc {
    address: u8,
}

impl Rtc {
    pub const fn new(address: u8) -> Self {
        Self { address }
    }

    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Scan the bus and report whether the RTC answered at its address.
    ///
    /// Every non-reserved address is tried with a one-byte read so the log
    /// shows what else is connected when the RTC is missing.
    pub async fn probe<I: I2c>(&self, i2c: &mut I) -> bool {
        let mut found = false;
        let mut responders = 0u8;
        let mut scratch = [0u8; 1];

        for address in FIRST_SCAN_ADDRESS..=LAST_SCAN_ADDRESS {
            if i2c.read(address, &mut scratch).await.is_ok() {
                debug!("I2C device responded at 0x{:02x}", address);
                responders += 1;
                if address == self.address {
                    found = true;
                }
            }
        }

        if found {
            info!("RTC detected at 0x{:02x}", self.address);
        } else {
            error!(
                "RTC not found at 0x{:02x} ({} other devices on the bus)",
                self.address, responders
            );
        }
        found
    }

    /// Read the raw time-keeping registers.
    pub async fn read_registers<I: I2c>(
        &self,
        i2c: &mut I,
    ) -> Result<RegisterBlock, RtcError<I::Error>> {
        let mut block = [0u8; REGISTER_BLOCK_LEN];
        i2c.write_read(self.address, &[TIME_REGISTER_START], &mut block)
            .await
            .map_err(RtcError::Bus)?;
        trace!("RTC registers: {:02x}", block);
        Ok(block)
    }

    /// Read the current date and time. Bus errors are returned as-is; there
    /// is no retry here.
    pub async fn read_time<I: I2c>(
        &self,
        i2c: &mut I,
    ) -> Result<Timestamp, RtcError<I::Error>> {
        let block = self.read_registers(i2c).await?;
        decode_registers(&block)
    }
}

impl Default for Rtc {
    fn default() -> Self {
        Self::new(RTC_ADDRESS)
    }
}

/// Mask and BCD-decode a register block into a [`Timestamp`].
pub fn decode_registers<E>(block: &RegisterBlock) -> Result<Timestamp, RtcError<E>> {
    let field = |index: usize, mask: u8| -> Result<u8, RtcError<E>> {
        let raw = block[index] & mask;
        if bcd::is_valid(raw) {
            Ok(bcd::decode(raw))
        } else {
            Err(RtcError::InvalidTimestamp(*block))
        }
    };

    let second = field(reg::SECONDS, mask::SECONDS)?;
    let minute = field(reg::MINUTES, mask::MINUTES)?;
    let hour = field(reg::HOURS, mask::HOURS)?;
    let day = field(reg::DAY, mask::DAY)?;
    let month = field(reg::MONTH, mask::MONTH)?;
    let year = RTC_YEAR_BASE + field(reg::YEAR, mask::YEAR)? as u16;

    Timestamp::new(year, month, day, hour, minute, second)
        .ok_or(RtcError::InvalidTimestamp(*block))
}
