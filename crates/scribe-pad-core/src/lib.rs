//! Scribe-pad Core Library
//!
//! Core logic for a transcription pad: a debounced autosave scheduler over a
//! key-value persistence surface, and `[HH:MM:SS]` timestamp insertion with
//! deterministic caret management.
//!
//! # Example
//!
//! ```
//! use scribe_pad_core::TextBuffer;
//!
//! let mut buffer = TextBuffer::new();
//! buffer.insert_text("ab");
//! buffer.set_caret(1, 1);
//!
//! let marker = buffer.insert_timestamp(5.0);
//!
//! assert_eq!(marker, "[00:00:05]");
//! assert_eq!(buffer.content(), "a[00:00:05]b");
//! assert_eq!(buffer.caret(), (11, 11));
//! ```

mod autosave;
mod buffer;
mod error;
mod playback;
mod status;
mod store;
mod timestamp;

pub use {
    autosave::{
        AutosavePolicy, AutosaveScheduler, DEFAULT_DEBOUNCE, DEFAULT_FLOOR, EditKind,
        SchedulerCommand,
    },
    buffer::TextBuffer,
    error::{Result as StoreResult, StoreError},
    playback::{MediaSurface, PlaybackRate},
    status::SaveStatus,
    store::{KeyValueStore, MemoryStore, TRANSCRIPT_KEY},
    timestamp::Timestamp,
};
