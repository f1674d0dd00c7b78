//! Console control gestures.
//!
//! Lines starting with `:` are control commands: the playback toggles,
//! seeks, rate steps, and timestamp insertion a transcriptionist reaches for
//! between stretches of typing. Anything else is transcript text.

/// A parsed control command.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyCommand {
    /// Toggle playback between playing and paused.
    TogglePlayback,
    /// Seek by the given number of seconds (negative rewinds).
    SeekBy(f64),
    /// Insert a `[HH:MM:SS]` marker for the current position at the caret.
    InsertTimestamp,
    /// Slow playback down by one step.
    RateDown,
    /// Reset playback rate to 1x.
    RateReset,
    /// Speed playback up by one step.
    RateUp,
    /// Mark an audio source as loaded and ready.
    Load(String),
    /// Move the caret (or select a range) in the transcript.
    SetCaret(usize, Option<usize>),
    /// Remove the selected text from the transcript.
    Cut,
    /// Copy the selected text without mutating the transcript.
    Copy,
    /// Flush the transcript to storage now.
    Save,
    /// Clear the stored transcript and the buffer.
    Clear,
    /// Show the current status line.
    Status,
    /// Flush and exit.
    Quit,
}

/// Interpretation of one console input line.
#[derive(Debug, Clone, PartialEq)]
pub enum InputLine {
    /// A recognized control command.
    Command(KeyCommand),
    /// Transcript text to insert at the caret.
    Text(String),
    /// A line starting with `:` that is not a recognized command.
    Unknown(String),
}

impl InputLine {
    /// Parse one console line.
    pub fn parse(line: &str) -> Self {
        if !line.starts_with(':') {
            return InputLine::Text(line.to_string());
        }

        let mut tokens = line[1..].split_whitespace();
        let command = match (tokens.next(), tokens.next(), tokens.next()) {
            (Some("play"), None, _) => KeyCommand::TogglePlayback,
            (Some("seek"), Some(delta), None) => match delta.parse::<f64>() {
                Ok(delta) if delta.is_finite() => KeyCommand::SeekBy(delta),
                _ => return InputLine::Unknown(line.to_string()),
            },
            (Some("ts"), None, _) => KeyCommand::InsertTimestamp,
            (Some("rate"), Some("down"), None) => KeyCommand::RateDown,
            (Some("rate"), Some("reset"), None) => KeyCommand::RateReset,
            (Some("rate"), Some("up"), None) => KeyCommand::RateUp,
            (Some("load"), Some(_), _) => {
                // Labels may contain spaces; take the rest of the line.
                let label = line[1..].strip_prefix("load").unwrap_or("").trim();
                KeyCommand::Load(label.to_string())
            }
            (Some("caret"), Some(start), end) => {
                let parsed_start = start.parse::<usize>();
                let parsed_end = end.map(str::parse::<usize>);
                match (parsed_start, parsed_end) {
                    (Ok(start), None) => KeyCommand::SetCaret(start, None),
                    (Ok(start), Some(Ok(end))) => KeyCommand::SetCaret(start, Some(end)),
                    _ => return InputLine::Unknown(line.to_string()),
                }
            }
            (Some("cut"), None, _) => KeyCommand::Cut,
            (Some("copy"), None, _) => KeyCommand::Copy,
            (Some("save"), None, _) => KeyCommand::Save,
            (Some("clear"), None, _) => KeyCommand::Clear,
            (Some("status"), None, _) => KeyCommand::Status,
            (Some("quit"), None, _) => KeyCommand::Quit,
            _ => return InputLine::Unknown(line.to_string()),
        };

        InputLine::Command(command)
    }
}
