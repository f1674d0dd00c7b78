//! Async autosave driver over the timing policy.

use crate::{
    autosave::{AutosavePolicy, EditKind},
    buffer::TextBuffer,
    status::SaveStatus,
    store::{KeyValueStore, TRANSCRIPT_KEY},
};

use std::sync::Arc;

use tokio::{
    sync::{Mutex, mpsc, watch},
    time::{Instant, sleep_until},
};
use tracing::{debug, info, instrument, warn};

/// Requests accepted by a running [`AutosaveScheduler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerCommand {
    /// A buffer event was observed; (re)arms the autosave deadlines.
    Activity(EditKind),
    /// Flush now, regardless of deadline state.
    Flush,
    /// Clear the stored transcript and the buffer.
    Clear,
}

/// Drives the [`AutosavePolicy`] against real deadlines and a store.
///
/// Runs as a single task: edit notices, fired deadlines, and shutdown are
/// serialized through one select loop, so a flush can never interleave with
/// an edit notice. The buffer is only locked inside `flush`, `hydrate`, and
/// `clear`.
pub struct AutosaveScheduler<S: KeyValueStore> {
    policy: AutosavePolicy,
    store: S,
    buffer: Arc<Mutex<TextBuffer>>,
    command_rx: mpsc::Receiver<SchedulerCommand>,
    status_tx: watch::Sender<SaveStatus>,
}

impl<S: KeyValueStore> AutosaveScheduler<S> {
    /// Create a scheduler over the given policy, store, and shared buffer.
    pub fn new(
        policy: AutosavePolicy,
        store: S,
        buffer: Arc<Mutex<TextBuffer>>,
        command_rx: mpsc::Receiver<SchedulerCommand>,
        status_tx: watch::Sender<SaveStatus>,
    ) -> Self {
        Self {
            policy,
            store,
            buffer,
            command_rx,
            status_tx,
        }
    }

    /// Load the previous session's transcript into the buffer.
    ///
    /// Call once at session start, before [`run`](Self::run).
    #[instrument(skip(self))]
    pub async fn hydrate(&mut self) {
        match self.store.get(TRANSCRIPT_KEY) {
            Ok(Some(text)) if !text.is_empty() => {
                let content_len = text.len();
                self.buffer.lock().await.set_content(text);
                let _ = self.status_tx.send(SaveStatus::Retrieved);
                info!(content_len, "Previous session transcript retrieved");
            }
            Ok(_) => {
                let _ = self.status_tx.send(SaveStatus::FreshSession);
                info!("No stored transcript, fresh session");
            }
            Err(e) => {
                warn!(error = ?e, "Could not read stored transcript");
                let _ = self.status_tx.send(SaveStatus::RetrieveFailed);
            }
        }
    }

    /// Run the scheduler loop until shutdown.
    ///
    /// A final flush runs on shutdown (and when the command channel closes)
    /// so edits typed just before exit are not lost.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn run(mut self, mut shutdown_rx: watch::Receiver<bool>) {
        self.policy.arm_floor(Instant::now());
        info!("Autosave scheduler running");

        loop {
            // Recomputed every turn: an edit that re-armed the debounce
            // supersedes the deadline the previous turn slept on.
            let deadline = self.policy.next_deadline();

            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Autosave scheduler shutting down");
                    self.flush().await;
                    break;
                }

                command = self.command_rx.recv() => {
                    match command {
                        Some(SchedulerCommand::Activity(kind)) => {
                            debug!(?kind, "Edit activity observed");
                            self.policy.note_activity(kind, Instant::now());
                        }
                        Some(SchedulerCommand::Flush) => self.flush().await,
                        Some(SchedulerCommand::Clear) => self.clear().await,
                        None => {
                            info!("Command channel closed, shutting down");
                            self.flush().await;
                            break;
                        }
                    }
                }

                _ = Self::wait_until(deadline) => {
                    self.flush().await;
                }
            }
        }
    }

    /// Flush the buffer to the persistence surface if dirty.
    ///
    /// A clean flush writes nothing. Either way the floor deadline is
    /// re-armed and the short deadline cleared; the short deadline only
    /// re-arms on the next edit. A store failure publishes a warning status
    /// and keeps the dirty flag so a later flush retries.
    #[instrument(skip(self))]
    pub async fn flush(&mut self) {
        let now = Instant::now();

        if !self.policy.should_write() {
            self.policy.finish_flush(now, false);
            debug!("Flush skipped, no unsaved edits");
            return;
        }

        let content = self.buffer.lock().await.content().to_owned();

        match self.store.set(TRANSCRIPT_KEY, &content) {
            Ok(()) => {
                let _ = self.status_tx.send(SaveStatus::saved_now());
                self.policy.finish_flush(now, true);
                info!(content_len = content.len(), "Transcript flushed");
            }
            Err(e) => {
                warn!(error = ?e, "Transcript not saved, persistence surface unavailable");
                let _ = self.status_tx.send(SaveStatus::NotSaved);
                self.policy.finish_flush(now, false);
            }
        }
    }

    /// Clear the stored transcript and the buffer.
    #[instrument(skip(self))]
    pub async fn clear(&mut self) {
        match self.store.clear() {
            Ok(()) => {
                self.buffer.lock().await.set_content(String::new());
                let _ = self.status_tx.send(SaveStatus::Cleared);
                info!("Stored transcript cleared");
            }
            Err(e) => {
                warn!(error = ?e, "Stored transcript not cleared");
                let _ = self.status_tx.send(SaveStatus::ClearFailed);
            }
        }
    }

    async fn wait_until(deadline: Option<Instant>) {
        match deadline {
            Some(deadline) => sleep_until(deadline).await,
            None => std::future::pending::<()>().await,
        }
    }
}
