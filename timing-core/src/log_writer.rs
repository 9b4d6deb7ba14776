//! Append-only trial log.
//!
//! Each trial becomes one UTF-8 line:
//!
//! ```text
//! Essai 3: 15.23 secondes (debut=2024-01-01 10:00:00, fin=2024-01-01 10:00:15)
//! ```
//!
//! The wording is fixed; the offline analysis tool matches on `secondes`.

use alloc::format;
use alloc::string::String;
use core::fmt;

use crate::trial::TrialRecord;

/// Somewhere lines can be appended durably, one call per line.
pub trait LogStore {
    type Error: fmt::Debug;

    /// Append `line` (including its trailing newline) as a single entry.
    async fn append_line(&mut self, line: &str) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogWriteError<E> {
    /// The store rejected the line; the trial result is lost.
    Store(E),
}

impl<E: fmt::Debug> fmt::Display for LogWriteError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(e) => write!(f, "failed to write log entry: {e:?}"),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: fmt::Debug> defmt::Format for LogWriteError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Store(e) => defmt::write!(f, "log store error: {}", defmt::Debug2Format(e)),
        }
    }
}

pub fn format_record(record: &TrialRecord) -> String {
    format!(
        "Essai {}: {:.2} secondes (debut={}, fin={})\n",
        record.index, record.duration_secs, record.start, record.end
    )
}

pub struct LogWriter<S> {
    store: S,
}

impl<S: LogStore> LogWriter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn append(&mut self, record: &TrialRecord) -> Result<(), LogWriteError<S::Error>> {
        let line = format_record(record);
        self.store
            .append_line(&line)
            .await
            .map_err(LogWriteError::Store)?;
        debug!("Trial {} written to log", record.index);
        Ok(())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}
