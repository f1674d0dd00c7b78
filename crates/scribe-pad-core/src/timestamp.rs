//! Playback-position markers.

use std::fmt;

/// A playback position rendered as a `[HH:MM:SS]` transcript marker.
///
/// Hours are unbounded: a source longer than 24 hours keeps counting up,
/// and a source of 100 hours or more simply widens the hours field. Callers
/// repositioning a caret past an inserted marker must therefore use the
/// rendered length, never a fixed width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    hours: u64,
    minutes: u8,
    seconds: u8,
}

impl Timestamp {
    /// Build a marker from a playback position in seconds.
    ///
    /// Negative or non-finite positions are a caller contract violation and
    /// clamp to zero rather than propagating.
    pub fn from_position_secs(position_secs: f64) -> Self {
        let total = if position_secs.is_finite() && position_secs > 0.0 {
            position_secs as u64
        } else {
            0
        };

        let remainder = total % 3600;

        Self {
            hours: total / 3600,
            minutes: (remainder / 60) as u8,
            seconds: (remainder % 60) as u8,
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:02}:{:02}:{:02}]",
            self.hours, self.minutes, self.seconds
        )
    }
}
