use crate::config::TimingConfig;
use crate::timestamp::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Classification {
    Excellent,
    Good,
    Retry,
}

impl Classification {
    /// Bands are inclusive and centred on the target.
    pub fn from_duration(duration_secs: f32, config: &TimingConfig) -> Self {
        let within = |tolerance: f32| {
            duration_secs >= config.target_secs - tolerance
                && duration_secs <= config.target_secs + tolerance
        };
        if within(config.excellent_tolerance_secs) {
            Classification::Excellent
        } else if within(config.good_tolerance_secs) {
            Classification::Good
        } else {
            Classification::Retry
        }
    }

    /// Feedback shown to the subject.
    pub const fn verdict(&self) -> &'static str {
        match self {
            Classification::Excellent => "Great, very precise!",
            Classification::Good => "Well played!",
            Classification::Retry => "Try again!",
        }
    }
}

/// One completed trial. Built by the coordinator, handed to the log writer
/// and then dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TrialRecord {
    pub index: u32,
    pub start: Timestamp,
    pub end: Timestamp,
    pub duration_secs: f32,
    pub classification: Classification,
}

impl TrialRecord {
    pub fn new(index: u32, start: Timestamp, end: Timestamp, config: &TimingConfig) -> Self {
        let duration_secs = start.seconds_until(&end) as f32;
        Self {
            index,
            start,
            end,
            duration_secs,
            classification: Classification::from_duration(duration_secs, config),
        }
    }
}
