//! Monotonic-clock playback transport.
//!
//! Stands in for a real audio element: it tracks position, rate, and
//! play/pause state with `Instant` arithmetic. Decoding and audible output
//! are out of scope; the core only ever reads the position.

use scribe_pad_core::{MediaSurface, PlaybackRate};

use tokio::time::Instant;
use tracing::{debug, info};

/// Clock-backed [`MediaSurface`].
///
/// Position advances by `elapsed * rate` while playing. Every state change
/// folds the elapsed play time into `base_secs` first, so rate changes and
/// seeks take effect from the current position, not from where playback
/// started.
#[derive(Debug, Default)]
pub struct ClockTransport {
    ready: bool,
    source_label: Option<String>,
    rate: PlaybackRate,
    base_secs: f64,
    playing_since: Option<Instant>,
}

impl ClockTransport {
    /// Create a transport with no source loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a source as loaded: ready to play, paused at position zero.
    pub fn load(&mut self, label: &str) {
        self.ready = true;
        self.source_label = Some(label.to_string());
        self.base_secs = 0.0;
        self.playing_since = None;

        info!(source = label, "Source loaded");
    }

    /// The loaded source's label, if any.
    pub fn source_label(&self) -> Option<&str> {
        self.source_label.as_deref()
    }

    /// Whether the transport is currently playing.
    pub fn is_playing(&self) -> bool {
        self.playing_since.is_some()
    }

    /// Fold elapsed play time into the base position.
    fn freeze_position(&mut self) {
        self.base_secs = self.position_secs();
        if let Some(since) = self.playing_since.as_mut() {
            *since = Instant::now();
        }
    }
}

impl MediaSurface for ClockTransport {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn position_secs(&self) -> f64 {
        let mut position = self.base_secs;
        if let Some(since) = self.playing_since {
            position += since.elapsed().as_secs_f64() * self.rate.value();
        }
        position.max(0.0)
    }

    fn rate(&self) -> PlaybackRate {
        self.rate
    }

    fn set_rate(&mut self, rate: PlaybackRate) {
        // Elapsed time so far was played at the old rate.
        self.freeze_position();
        self.rate = rate;

        debug!(rate = rate.value(), "Playback rate changed");
    }

    fn seek_by(&mut self, delta_secs: f64) {
        if !self.ready {
            return;
        }

        self.freeze_position();
        self.base_secs = (self.base_secs + delta_secs).max(0.0);

        debug!(
            delta_secs,
            position_secs = self.base_secs,
            "Seeked"
        );
    }

    fn toggle(&mut self) {
        if !self.ready {
            return;
        }

        if self.playing_since.is_some() {
            self.freeze_position();
            self.playing_since = None;
            debug!(position_secs = self.base_secs, "Paused");
        } else {
            self.playing_since = Some(Instant::now());
            debug!(position_secs = self.base_secs, "Playing");
        }
    }
}
