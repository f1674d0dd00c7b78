//! Pure autosave timing policy.

use std::time::Duration;

use tokio::time::Instant;
use tracing::trace;

/// Buffer events observed by the autosave scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// Typed or programmatic insertion.
    Insert,
    /// Selection cut out of the buffer.
    Cut,
    /// Clipboard paste into the buffer.
    Paste,
    /// Selection copied. Does not mutate content; still counts as activity.
    Copy,
}

impl EditKind {
    /// Whether this event changes buffer content.
    pub fn mutates_content(self) -> bool {
        !matches!(self, EditKind::Copy)
    }
}

/// Debounce/floor timing state for autosave.
///
/// Holds no timers itself; deadlines are computed from instants passed in
/// by the driver, so the policy is fully deterministic under test.
///
/// Invariants:
/// - the long (floor) deadline is only armed when currently unset, never
///   pushed back by new activity;
/// - [`finish_flush`](Self::finish_flush) always clears the short deadline
///   and re-arms the floor, and never re-arms the short deadline;
/// - when `dirty` is false a fired deadline triggers no persistence write.
#[derive(Debug, Clone)]
pub struct AutosavePolicy {
    debounce: Duration,
    floor: Duration,
    dirty: bool,
    short_deadline: Option<Instant>,
    long_deadline: Option<Instant>,
}

impl AutosavePolicy {
    /// Create a policy with the given debounce and floor delays.
    pub fn new(debounce: Duration, floor: Duration) -> Self {
        Self {
            debounce,
            floor,
            dirty: false,
            short_deadline: None,
            long_deadline: None,
        }
    }

    /// Whether unsaved edits exist.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether the next flush should write to the persistence surface.
    pub fn should_write(&self) -> bool {
        self.dirty
    }

    /// The earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.short_deadline, self.long_deadline) {
            (Some(short), Some(long)) => Some(short.min(long)),
            (deadline @ Some(_), None) | (None, deadline @ Some(_)) => deadline,
            (None, None) => None,
        }
    }

    /// Whether a pending deadline has been reached at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        self.next_deadline().is_some_and(|deadline| deadline <= now)
    }

    /// Record buffer activity at `now`.
    ///
    /// Mutating kinds set the dirty flag; a copy only signals that the user
    /// is interacting. Either way the short deadline is re-armed (standard
    /// debounce, the previous one is superseded) and the floor deadline is
    /// armed if, and only if, none is pending.
    pub fn note_activity(&mut self, kind: EditKind, now: Instant) {
        if kind.mutates_content() {
            self.dirty = true;
        }

        self.short_deadline = Some(now + self.debounce);

        if self.long_deadline.is_none() {
            self.long_deadline = Some(now + self.floor);
        }

        trace!(?kind, dirty = self.dirty, "Activity noted");
    }

    /// Arm the floor deadline at scheduler startup if none is pending.
    ///
    /// Keeps the "a floor deadline is always pending while the scheduler is
    /// alive" invariant from the first loop turn onward.
    pub fn arm_floor(&mut self, now: Instant) {
        if self.long_deadline.is_none() {
            self.long_deadline = Some(now + self.floor);
        }
    }

    /// Settle timing state after a flush attempt at `now`.
    ///
    /// `saved` reports whether content was durably written: only then is the
    /// dirty flag cleared, so a failed write is retried by a later flush.
    /// The short deadline is cleared unconditionally (it re-arms on the next
    /// edit, never from a flush) and the floor deadline is re-armed.
    pub fn finish_flush(&mut self, now: Instant, saved: bool) {
        if saved {
            self.dirty = false;
        }

        self.short_deadline = None;
        self.long_deadline = Some(now + self.floor);
    }
}

impl Default for AutosavePolicy {
    fn default() -> Self {
        Self::new(super::DEFAULT_DEBOUNCE, super::DEFAULT_FLOOR)
    }
}
