//! Reads the trial log written by the firmware and summarises it.
//!
//! Only the duration is used. On each line it is the decimal number written
//! right before the word `secondes`, optionally separated by whitespace:
//!
//! ```text
//! Essai 3: 15.23 secondes (debut=2024-01-01 10:00:00, fin=2024-01-01 10:00:15)
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, bail};

pub const DEFAULT_LOG_PATH: &str = "log.txt";
pub const HISTOGRAM_BINS: usize = 10;
const HISTOGRAM_BAR_WIDTH: usize = 40;

const DURATION_UNIT: &str = "secondes";

/// Duration on a log line, if there is one.
pub fn extract_duration(line: &str) -> Option<f64> {
    line.match_indices(DURATION_UNIT)
        .filter_map(|(pos, _)| trailing_number(line[..pos].trim_end()))
        .find_map(|number| number.parse().ok())
}

/// `digits` or `digits.digits` at the very end of `s`.
fn trailing_number(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let digits_before = |end: usize| {
        bytes[..end]
            .iter()
            .rev()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let end = bytes.len();
    let fraction = digits_before(end);
    if fraction == 0 {
        return None;
    }
    let mut start = end - fraction;
    if start >= 2 && bytes[start - 1] == b'.' {
        let integer = digits_before(start - 1);
        if integer > 0 {
            start = start - 1 - integer;
        }
    }
    Some(&s[start..])
}

/// A non-blank line that had no duration on it.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedLine {
    /// 1-based.
    pub line_number: usize,
    pub text: String,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParsedLog {
    pub durations: Vec<f64>,
    pub skipped: Vec<SkippedLine>,
}

/// Extract every duration. Blank lines are ignored, other lines without a
/// duration end up in `skipped`.
pub fn parse_log(contents: &str) -> ParsedLog {
    let mut parsed = ParsedLog::default();
    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match extract_duration(line) {
            Some(duration) => parsed.durations.push(duration),
            None => parsed.skipped.push(SkippedLine {
                line_number: index + 1,
                text: line.to_string(),
            }),
        }
    }
    parsed
}

/// Read the log file, refusing a missing or empty one. Bytes that are not
/// UTF-8 become U+FFFD, so a corrupt line is skipped by [`parse_log`]
/// instead of failing the whole file.
pub fn read_log(path: &Path) -> anyhow::Result<String> {
    if !path.exists() {
        bail!("log file '{}' does not exist", path.display());
    }
    let bytes =
        fs::read(path).with_context(|| format!("failed to read log file '{}'", path.display()))?;
    if bytes.is_empty() {
        bail!("log file '{}' is empty", path.display());
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; 0 for a single trial.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    pub fn from_durations(durations: &[f64]) -> Option<Self> {
        if durations.is_empty() {
            return None;
        }
        let count = durations.len();
        let mean = durations.iter().sum::<f64>() / count as f64;
        let std_dev = if count > 1 {
            let squares: f64 = durations.iter().map(|d| (d - mean).powi(2)).sum();
            (squares / (count - 1) as f64).sqrt()
        } else {
            0.0
        };
        let min = durations.iter().copied().fold(f64::INFINITY, f64::min);
        let max = durations.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(Self {
            count,
            mean,
            std_dev,
            min,
            max,
        })
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Trials:  {}", self.count)?;
        writeln!(f, "Mean:    {:.2} s", self.mean)?;
        writeln!(f, "Std dev: {:.2} s", self.std_dev)?;
        write!(f, "Range:   {:.2} .. {:.2} s", self.min, self.max)
    }
}

/// Equal-width bins from the shortest to the longest duration. The last bin
/// includes its upper edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub start: f64,
    pub bin_width: f64,
    pub counts: [usize; HISTOGRAM_BINS],
}

impl Histogram {
    pub fn new(durations: &[f64]) -> Option<Self> {
        let summary = Summary::from_durations(durations)?;
        let (mut start, mut end) = (summary.min, summary.max);
        if end - start == 0.0 {
            // All trials equal: centre a 1 s range on them.
            start -= 0.5;
            end += 0.5;
        }
        let bin_width = (end - start) / HISTOGRAM_BINS as f64;

        let mut counts = [0; HISTOGRAM_BINS];
        for &d in durations {
            let bin = ((d - start) / bin_width) as usize;
            counts[bin.min(HISTOGRAM_BINS - 1)] += 1;
        }
        Some(Self {
            start,
            bin_width,
            counts,
        })
    }

    pub fn bin_range(&self, bin: usize) -> (f64, f64) {
        let low = self.start + bin as f64 * self.bin_width;
        (low, low + self.bin_width)
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tallest = self.counts.iter().copied().max().unwrap_or(0).max(1);
        for (bin, &count) in self.counts.iter().enumerate() {
            let (low, high) = self.bin_range(bin);
            let bar = "#".repeat(count * HISTOGRAM_BAR_WIDTH / tallest);
            writeln!(f, "{low:6.2} - {high:6.2} | {bar:<HISTOGRAM_BAR_WIDTH$} {count}")?;
        }
        Ok(())
    }
}
