/// Fixed 7-bit I2C address of the DS1307/DS3231 family.
pub const RTC_ADDRESS: u8 = 0x68;
/// The RTC year register holds an offset from this year.
pub const RTC_YEAR_BASE: u16 = 2000;

pub const SECONDS_PER_DAY: u32 = 24 * 3600;

// Trial target and accuracy bands, inclusive on both ends.
pub const TARGET_DURATION_SECS: f32 = 15.0;
pub const EXCELLENT_TOLERANCE_SECS: f32 = 0.5; // 14.5 ..= 15.5
pub const GOOD_TOLERANCE_SECS: f32 = 1.0; // 14.0 ..= 16.0

// Button sampling
pub const BUTTON_POLL_INTERVAL_MS: u32 = 10;
pub const BUTTON_SETTLE_MS: u32 = 50; // bridges mechanical contact bounce

// Pause between the end of one trial and the prompt for the next
pub const INTER_TRIAL_PAUSE_MS: u32 = 2_000;

/// Tunables for a trial run. `Default` uses the constants above.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingConfig {
    pub target_secs: f32,
    pub excellent_tolerance_secs: f32,
    pub good_tolerance_secs: f32,
    pub poll_interval_ms: u32,
    pub settle_ms: u32,
    pub inter_trial_pause_ms: u32,
}

impl TimingConfig {
    pub const fn new() -> Self {
        Self {
            target_secs: TARGET_DURATION_SECS,
            excellent_tolerance_secs: EXCELLENT_TOLERANCE_SECS,
            good_tolerance_secs: GOOD_TOLERANCE_SECS,
            poll_interval_ms: BUTTON_POLL_INTERVAL_MS,
            settle_ms: BUTTON_SETTLE_MS,
            inter_trial_pause_ms: INTER_TRIAL_PAUSE_MS,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::new()
    }
}
