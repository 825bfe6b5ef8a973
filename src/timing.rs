use std::fmt;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::file_utils::FileManager;

// @module: Timing track (SRT) reading

// @const: SRT timing line regex, a period separator is tolerated
static TIMING_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2,}):(\d{2}):(\d{2})[,.](\d{3})\s*-->\s*(\d{2,}):(\d{2}):(\d{2})[,.](\d{3})").unwrap()
});

// @struct: One timed interval from the timing track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeInterval {
    // @field: Start time in ms
    pub start_ms: u64,

    // @field: End time in ms
    pub end_ms: u64,

    // @field: The `start --> end` line exactly as written, trimmed
    pub timing_line: String,
}

impl TimeInterval {
    // @creates: Interval with a synthesized SRT timing line
    pub fn new(start_ms: u64, end_ms: u64) -> Result<Self> {
        if start_ms > end_ms {
            return Err(anyhow!(
                "Invalid time range: start time {} > end time {}",
                start_ms, end_ms
            ));
        }

        let timing_line = format!(
            "{} --> {}",
            format_srt_timestamp(start_ms),
            format_srt_timestamp(end_ms)
        );
        Ok(Self { start_ms, end_ms, timing_line })
    }

    /// Parse a `start --> end` line, keeping the original text
    pub fn parse_line(line: &str) -> Result<Self> {
        let trimmed = line.trim();
        let caps = TIMING_LINE_REGEX
            .captures(trimmed)
            .ok_or_else(|| anyhow!("Not a timing line: {}", trimmed))?;

        let start_ms = timestamp_from_captures(&caps, 1)?;
        let end_ms = timestamp_from_captures(&caps, 5)?;

        if start_ms > end_ms {
            return Err(anyhow!(
                "Invalid time range: start time {} > end time {}",
                start_ms, end_ms
            ));
        }

        Ok(Self {
            start_ms,
            end_ms,
            timing_line: trimmed.to_string(),
        })
    }

    /// Start time in canonical `HH:MM:SS.mmm` form
    pub fn start_canonical(&self) -> String {
        format_canonical_timestamp(self.start_ms)
    }

    /// End time in canonical `HH:MM:SS.mmm` form
    pub fn end_canonical(&self) -> String {
        format_canonical_timestamp(self.end_ms)
    }

    pub fn duration_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.timing_line)
    }
}

/// Format milliseconds as an SRT timestamp (HH:MM:SS,mmm)
pub fn format_srt_timestamp(ms: u64) -> String {
    let (hours, minutes, seconds, millis) = split_ms(ms);
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Format milliseconds as a canonical timestamp (HH:MM:SS.mmm)
pub fn format_canonical_timestamp(ms: u64) -> String {
    let (hours, minutes, seconds, millis) = split_ms(ms);
    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
}

fn split_ms(ms: u64) -> (u64, u64, u64, u64) {
    (
        ms / 3_600_000,
        (ms % 3_600_000) / 60_000,
        (ms % 60_000) / 1_000,
        ms % 1_000,
    )
}

fn timestamp_from_captures(caps: &regex::Captures, start_idx: usize) -> Result<u64> {
    let field = |offset: usize| -> Result<u64> {
        caps.get(start_idx + offset)
            .ok_or_else(|| anyhow!("Missing timestamp component"))?
            .as_str()
            .parse::<u64>()
            .context("Failed to parse timestamp component")
    };

    let (hours, minutes, seconds, millis) = (field(0)?, field(1)?, field(2)?, field(3)?);
    if minutes >= 60 || seconds >= 60 {
        return Err(anyhow!("Invalid time components"));
    }

    hours
        .checked_mul(3_600_000)
        .and_then(|ms| ms.checked_add(minutes * 60_000 + seconds * 1_000 + millis))
        .ok_or_else(|| anyhow!("Timestamp out of range"))
}

/// Read every timing line of an SRT document, in document order
///
/// Index lines and text lines are ignored. Lines containing `-->` that do
/// not parse are skipped with a warning; ordering is never changed because
/// alignment is positional.
pub fn parse_timing_track(content: &str) -> Vec<TimeInterval> {
    let mut intervals = Vec::new();

    for (line_number, line) in content.lines().enumerate() {
        if !line.contains("-->") {
            continue;
        }

        match TimeInterval::parse_line(line) {
            Ok(interval) => intervals.push(interval),
            Err(e) => warn!("Skipping timing line {}: {}", line_number + 1, e),
        }
    }

    debug!("Read {} timing intervals", intervals.len());
    intervals
}

/// Read a timing track from disk
pub fn read_timing_track<P: AsRef<Path>>(path: P) -> Result<Vec<TimeInterval>> {
    let content = FileManager::read_to_string(path.as_ref())?;
    Ok(parse_timing_track(&content))
}
