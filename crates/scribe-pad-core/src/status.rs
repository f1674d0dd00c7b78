//! User-visible storage feedback.

use std::fmt;

use chrono::Timelike;

/// Outcome of the most recent storage interaction.
///
/// Published by the scheduler over a watch channel; the `Display` rendering
/// is the status line shown to the user verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    /// Session started with no stored transcript.
    FreshSession,
    /// A transcript from a previous session was loaded.
    Retrieved,
    /// The persistence surface could not be read at startup.
    RetrieveFailed,
    /// Content was flushed successfully at the given local wall-clock time.
    SavedAt {
        /// Local hour of the save, 0-23.
        hour: u8,
        /// Local minute of the save, 0-59.
        minute: u8,
    },
    /// A flush ran while the persistence surface was unavailable.
    NotSaved,
    /// The stored transcript and the buffer were cleared.
    Cleared,
    /// The persistence surface refused the clear.
    ClearFailed,
}

impl SaveStatus {
    /// A [`SaveStatus::SavedAt`] stamped with the current local time.
    pub fn saved_now() -> Self {
        let now = chrono::Local::now();
        SaveStatus::SavedAt {
            hour: now.hour() as u8,
            minute: now.minute() as u8,
        }
    }
}

impl fmt::Display for SaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveStatus::FreshSession => write!(f, "ready with new session"),
            SaveStatus::Retrieved => {
                write!(f, "text from previous session has been retrieved")
            }
            SaveStatus::RetrieveFailed => write!(f, "warning: no text could be retrieved"),
            SaveStatus::SavedAt { hour, minute } => {
                write!(f, "autosave: last saved at {hour:02}:{minute:02}.")
            }
            SaveStatus::NotSaved => write!(f, "warning: your text was not saved"),
            SaveStatus::Cleared => write!(f, "all data has been cleared"),
            SaveStatus::ClearFailed => write!(f, "warning: data has not been cleared"),
        }
    }
}
