use core::fmt;

use crate::config::SECONDS_PER_DAY;

/// Wall-clock reading taken from the RTC. Always holds an in-range date and
/// time; there is no way to build one that fails the range checks in
/// [`Timestamp::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
}

impl Timestamp {
    /// Returns `None` unless year >= 2000, month 1-12, day 1-31, hour 0-23,
    /// minute 0-59 and second 0-59.
    pub const fn new(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Option<Self> {
        if year < 2000
            || month < 1
            || month > 12
            || day < 1
            || day > 31
            || hour > 23
            || minute > 59
            || second > 59
        {
            return None;
        }
        Some(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }

    pub const fn year(&self) -> u16 {
        self.year
    }

    pub const fn month(&self) -> u8 {
        self.month
    }

    pub const fn day(&self) -> u8 {
        self.day
    }

    pub const fn hour(&self) -> u8 {
        self.hour
    }

    pub const fn minute(&self) -> u8 {
        self.minute
    }

    pub const fn second(&self) -> u8 {
        self.second
    }

    pub const fn seconds_since_midnight(&self) -> u32 {
        self.hour as u32 * 3600 + self.minute as u32 * 60 + self.second as u32
    }

    /// Seconds from `self` to `later`, comparing time of day only. A negative
    /// difference is taken to mean midnight was crossed once; spans of more
    /// than a day come out wrong but stay within `0..86400`.
    pub const fn seconds_until(&self, later: &Timestamp) -> u32 {
        let start = self.seconds_since_midnight();
        let end = later.seconds_since_midnight();
        if end >= start {
            end - start
        } else {
            end + SECONDS_PER_DAY - start
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Timestamp {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "{=u16:04}-{=u8:02}-{=u8:02} {=u8:02}:{=u8:02}:{=u8:02}",
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second
        );
    }
}
