//! Autosave scheduling: a debounce timer balanced against a floor timer.
//!
//! Edits re-arm a short debounce so bursts coalesce into one write; a long
//! floor deadline is never pushed back, bounding how stale the stored
//! transcript can get while the user types without pausing.

mod policy;
mod scheduler;

pub use {
    policy::{AutosavePolicy, EditKind},
    scheduler::{AutosaveScheduler, SchedulerCommand},
};

use std::time::Duration;

/// Delay after the last edit before a debounced flush fires.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(5);

/// Upper bound between flushes while edits keep arriving.
pub const DEFAULT_FLOOR: Duration = Duration::from_secs(180);
