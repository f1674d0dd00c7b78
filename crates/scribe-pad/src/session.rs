//! Session controller: translates console input into core operations.
//!
//! The session is the thin adapter between host input events and the core:
//! it owns the playback transport, shares the text buffer with the autosave
//! scheduler, and forwards every observed edit as an activity notice.

use crate::{AppError, AppResult, ClockTransport, KeyCommand, key_command::InputLine};

use std::{panic::Location, sync::Arc};

use error_location::ErrorLocation;
use scribe_pad_core::{
    EditKind, MediaSurface, PlaybackRate, SaveStatus, SchedulerCommand, TextBuffer, Timestamp,
};
use tokio::sync::{Mutex, mpsc, watch};
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Result of dispatching one console line.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    /// Keep reading input; optional feedback line for the user.
    Continue(Option<String>),
    /// Exit the session loop.
    Quit,
}

/// One user session over the transcript.
pub struct Session {
    buffer: Arc<Mutex<TextBuffer>>,
    transport: ClockTransport,
    command_tx: mpsc::Sender<SchedulerCommand>,
    status_rx: watch::Receiver<SaveStatus>,
    session_id: Uuid,
}

impl Session {
    /// Create a session over the shared buffer and a playback transport.
    pub fn new(
        buffer: Arc<Mutex<TextBuffer>>,
        transport: ClockTransport,
        command_tx: mpsc::Sender<SchedulerCommand>,
        status_rx: watch::Receiver<SaveStatus>,
    ) -> Self {
        let session_id = Uuid::new_v4();

        info!(session_id = %session_id, "Session started");

        Self {
            buffer,
            transport,
            command_tx,
            status_rx,
            session_id,
        }
    }

    /// Current storage feedback line.
    pub fn status_line(&self) -> String {
        self.status_rx.borrow().to_string()
    }

    /// Dispatch one console line.
    #[instrument(skip(self, line))]
    pub async fn handle_line(&mut self, line: &str) -> AppResult<SessionOutcome> {
        match InputLine::parse(line) {
            InputLine::Text(text) => {
                self.insert_text(&text).await?;
                Ok(SessionOutcome::Continue(None))
            }
            InputLine::Unknown(raw) => Ok(SessionOutcome::Continue(Some(format!(
                "unrecognized command: {raw}"
            )))),
            InputLine::Command(command) => self.handle_command(command).await,
        }
    }

    async fn handle_command(&mut self, command: KeyCommand) -> AppResult<SessionOutcome> {
        let feedback = match command {
            KeyCommand::TogglePlayback => {
                self.transport.toggle();
                if !self.transport.is_ready() {
                    Some("no source loaded".to_string())
                } else if self.transport.is_playing() {
                    Some(format!(
                        "playing at {:.1}x",
                        self.transport.rate().value()
                    ))
                } else {
                    Some(format!(
                        "paused at {}",
                        Timestamp::from_position_secs(self.transport.position_secs())
                    ))
                }
            }

            KeyCommand::SeekBy(delta_secs) => {
                self.transport.seek_by(delta_secs);
                Some(format!(
                    "position {}",
                    Timestamp::from_position_secs(self.transport.position_secs())
                ))
            }

            KeyCommand::InsertTimestamp => {
                let position = self.transport.position_secs();
                let marker = self.buffer.lock().await.insert_timestamp(position);
                self.notify(EditKind::Insert).await?;

                debug!(session_id = %self.session_id, marker = %marker, "Timestamp inserted");

                Some(marker)
            }

            KeyCommand::RateDown => self.change_rate(self.transport.rate().adjust(-1)),
            KeyCommand::RateReset => self.change_rate(PlaybackRate::reset()),
            KeyCommand::RateUp => self.change_rate(self.transport.rate().adjust(1)),

            KeyCommand::Load(label) => {
                self.transport.load(&label);
                Some(format!("loaded {label}"))
            }

            KeyCommand::SetCaret(start, end) => {
                let mut buffer = self.buffer.lock().await;
                buffer.set_caret(start, end.unwrap_or(start));
                let (start, end) = buffer.caret();
                Some(format!("caret at {start}..{end}"))
            }

            KeyCommand::Cut => {
                let removed = self.buffer.lock().await.cut_selection();
                self.notify(EditKind::Cut).await?;
                Some(format!("cut {} characters", removed.chars().count()))
            }

            KeyCommand::Copy => {
                let copied = self.buffer.lock().await.selected_text().to_string();
                self.notify(EditKind::Copy).await?;
                Some(format!("copied {} characters", copied.chars().count()))
            }

            KeyCommand::Save => {
                self.request(SchedulerCommand::Flush).await?;
                Some("save requested".to_string())
            }

            KeyCommand::Clear => {
                self.request(SchedulerCommand::Clear).await?;
                Some("clear requested".to_string())
            }

            KeyCommand::Status => Some(self.status_line()),

            KeyCommand::Quit => {
                info!(session_id = %self.session_id, "Session ending");
                return Ok(SessionOutcome::Quit);
            }
        };

        Ok(SessionOutcome::Continue(feedback))
    }

    /// Insert one line of transcript text at the caret.
    async fn insert_text(&mut self, text: &str) -> AppResult<()> {
        self.buffer.lock().await.insert_text(&format!("{text}\n"));
        self.notify(EditKind::Insert).await
    }

    fn change_rate(&mut self, rate: PlaybackRate) -> Option<String> {
        self.transport.set_rate(rate);
        Some(format!("speed ({:.1}x)", rate.value()))
    }

    async fn notify(&self, kind: EditKind) -> AppResult<()> {
        self.request(SchedulerCommand::Activity(kind)).await
    }

    async fn request(&self, command: SchedulerCommand) -> AppResult<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Failed to send scheduler command: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
