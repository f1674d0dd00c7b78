//! Transcript text buffer with caret tracking.

use crate::timestamp::Timestamp;

/// The transcript under edit: full content plus caret and focus state.
///
/// Caret offsets are character offsets, with `0 <= start <= end <= len`
/// maintained as an invariant; out-of-range offsets from the host are
/// clamped before any splice. The buffer is owned by the UI layer; the
/// autosave scheduler only reads it at flush time.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    content: String,
    caret_start: usize,
    caret_end: usize,
    has_focus: bool,
}

impl TextBuffer {
    /// Create an empty buffer with the caret at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current transcript content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Content length in characters.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Current caret as `(start, end)` character offsets.
    ///
    /// `start == end` is a plain cursor; `start < end` is a selection.
    pub fn caret(&self) -> (usize, usize) {
        (self.caret_start, self.caret_end)
    }

    /// Whether the buffer currently has input focus.
    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    /// Record a focus change reported by the host.
    pub fn set_focus(&mut self, has_focus: bool) {
        self.has_focus = has_focus;
    }

    /// Move the caret, clamping both offsets to the buffer bounds.
    ///
    /// A start past the end offset collapses the selection to a cursor.
    pub fn set_caret(&mut self, start: usize, end: usize) {
        let len = self.char_len();
        self.caret_start = start.min(len);
        self.caret_end = end.clamp(self.caret_start, len);
    }

    /// Replace the entire content, collapsing the caret to the new end.
    ///
    /// Used when hydrating from storage and when clearing.
    pub fn set_content(&mut self, content: String) {
        self.content = content;
        let len = self.char_len();
        self.caret_start = len;
        self.caret_end = len;
    }

    /// Insert text at the caret, replacing any selection.
    ///
    /// The caret collapses to a cursor just past the inserted text, the way
    /// typed input behaves in a text area.
    pub fn insert_text(&mut self, text: &str) {
        self.clamp_caret();

        let start = self.byte_offset(self.caret_start);
        let end = self.byte_offset(self.caret_end);
        self.content.replace_range(start..end, text);

        let caret = self.caret_start + text.chars().count();
        self.caret_start = caret;
        self.caret_end = caret;
    }

    /// The currently selected text, empty for a plain cursor.
    pub fn selected_text(&self) -> &str {
        let len = self.char_len();
        let start = self.caret_start.min(len);
        let end = self.caret_end.clamp(start, len);
        &self.content[self.byte_offset(start)..self.byte_offset(end)]
    }

    /// Remove any selected text, returning it.
    ///
    /// A plain cursor removes nothing and returns an empty string.
    pub fn cut_selection(&mut self) -> String {
        self.clamp_caret();

        let start = self.byte_offset(self.caret_start);
        let end = self.byte_offset(self.caret_end);
        let removed: String = self.content.drain(start..end).collect();

        self.caret_end = self.caret_start;
        removed
    }

    /// Splice a `[HH:MM:SS]` marker for `position_secs` at the caret.
    ///
    /// The marker is inserted *before* any selection: selected content is
    /// preserved after it, and the caret (start and end) collapses to just
    /// past the marker. The advance is the rendered marker length; a marker
    /// for a position of 100 hours or more is wider than the usual 10
    /// characters and the caret follows it.
    ///
    /// Returns the inserted marker.
    pub fn insert_timestamp(&mut self, position_secs: f64) -> String {
        let marker = Timestamp::from_position_secs(position_secs).to_string();

        self.clamp_caret();
        let at = self.byte_offset(self.caret_start);
        self.content.insert_str(at, &marker);

        let caret = self.caret_start + marker.chars().count();
        self.caret_start = caret;
        self.caret_end = caret;

        marker
    }

    fn clamp_caret(&mut self) {
        let (start, end) = (self.caret_start, self.caret_end);
        self.set_caret(start, end);
    }

    fn byte_offset(&self, char_offset: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_offset)
            .map(|(index, _)| index)
            .unwrap_or(self.content.len())
    }
}
