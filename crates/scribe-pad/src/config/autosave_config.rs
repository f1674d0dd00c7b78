use crate::config::{default_debounce_secs, default_floor_secs};

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Autosave timing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutosaveConfig {
    /// Seconds of quiet after the last edit before a flush fires.
    #[serde(default = "default_debounce_secs")]
    pub debounce_secs: u64,

    /// Upper bound in seconds between flushes while edits keep arriving.
    #[serde(default = "default_floor_secs")]
    pub floor_secs: u64,
}

impl AutosaveConfig {
    /// Debounce delay as a [`Duration`].
    pub fn debounce(&self) -> Duration {
        Duration::from_secs(self.debounce_secs)
    }

    /// Floor interval as a [`Duration`].
    pub fn floor(&self) -> Duration {
        Duration::from_secs(self.floor_secs)
    }
}
