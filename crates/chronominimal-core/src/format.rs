//! Elapsed-time decomposition for display.

use std::fmt;

use serde::Serialize;

const MS_PER_HOUR: u64 = 3_600_000;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_SECOND: u64 = 1_000;

/// An elapsed duration split into display fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Elapsed {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub hundredths: u64,
}

impl Elapsed {
    pub fn from_ms(ms: u64) -> Self {
        Self {
            hours: ms / MS_PER_HOUR,
            minutes: (ms % MS_PER_HOUR) / MS_PER_MINUTE,
            seconds: (ms % MS_PER_MINUTE) / MS_PER_SECOND,
            hundredths: (ms % MS_PER_SECOND) / 10,
        }
    }

    /// `H:MM:SS` / `MM:SS` without the hundredths field.
    pub fn coarse(&self) -> String {
        if self.hours > 0 {
            format!("{}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
        } else {
            format!("{:02}:{:02}", self.minutes, self.seconds)
        }
    }
}

impl fmt::Display for Elapsed {
    /// `MM:SS.cc`, prefixed with `H:` only when hours is nonzero.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.coarse(), self.hundredths)
    }
}

/// Shorthand for `Elapsed::from_ms(ms).to_string()`.
pub fn format_elapsed(ms: u64) -> String {
    Elapsed::from_ms(ms).to_string()
}
