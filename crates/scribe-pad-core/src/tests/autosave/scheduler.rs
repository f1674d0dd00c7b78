use crate::{
    AutosavePolicy, AutosaveScheduler, EditKind, KeyValueStore, MemoryStore, SaveStatus,
    SchedulerCommand, StoreResult, TRANSCRIPT_KEY, TextBuffer,
};

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tokio::{
    sync::{Mutex, mpsc, watch},
    task::JoinHandle,
    time::advance,
};

// Test constants matching the production defaults
const DEBOUNCE: Duration = Duration::from_secs(5);
const FLOOR: Duration = Duration::from_secs(180);

/// Store double that counts write attempts while delegating to [`MemoryStore`].
#[derive(Debug, Clone, Default)]
struct CountingStore {
    store: MemoryStore,
    set_attempts: Arc<AtomicU64>,
}

impl CountingStore {
    fn attempts(&self) -> u64 {
        self.set_attempts.load(Ordering::Relaxed)
    }

    fn stored_transcript(&self) -> Option<String> {
        self.store.get(TRANSCRIPT_KEY).ok().flatten()
    }
}

impl KeyValueStore for CountingStore {
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.set_attempts.fetch_add(1, Ordering::Relaxed);
        self.store.set(key, value)
    }

    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.store.get(key)
    }

    fn clear(&mut self) -> StoreResult<()> {
        self.store.clear()
    }
}

struct Harness {
    buffer: Arc<Mutex<TextBuffer>>,
    command_tx: mpsc::Sender<SchedulerCommand>,
    status_rx: watch::Receiver<SaveStatus>,
    shutdown_tx: watch::Sender<bool>,
    store: CountingStore,
    task: JoinHandle<()>,
}

/// Spawn a scheduler over a shared buffer and let it arm its floor deadline.
async fn spawn_scheduler(store: CountingStore) -> Harness {
    let buffer = Arc::new(Mutex::new(TextBuffer::new()));
    let (command_tx, command_rx) = mpsc::channel(32);
    let (status_tx, status_rx) = watch::channel(SaveStatus::FreshSession);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let policy = AutosavePolicy::new(DEBOUNCE, FLOOR);
    let scheduler = AutosaveScheduler::new(
        policy,
        store.clone(),
        Arc::clone(&buffer),
        command_rx,
        status_tx,
    );
    let task = tokio::spawn(scheduler.run(shutdown_rx));
    settle().await;

    Harness {
        buffer,
        command_tx,
        status_rx,
        shutdown_tx,
        store,
        task,
    }
}

/// Let the scheduler task process everything queued at the current instant.
async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

/// Type `text` into the shared buffer and notify the scheduler.
#[allow(clippy::unwrap_used)]
async fn edit(harness: &Harness, text: &str) {
    harness.buffer.lock().await.insert_text(text);
    harness
        .command_tx
        .send(SchedulerCommand::Activity(EditKind::Insert))
        .await
        .unwrap();
    settle().await;
}

/// WHAT: A burst of edits coalesces into exactly one write
/// WHY: The debounce must batch keystrokes, not write per keystroke
#[tokio::test(start_paused = true)]
async fn given_edit_burst_when_debounce_elapses_then_exactly_one_flush() {
    // Given: Three edits one second apart
    let harness = spawn_scheduler(CountingStore::default()).await;
    for _ in 0..3 {
        edit(&harness, "x").await;
        advance(Duration::from_secs(1)).await;
    }

    // When: Just under the debounce has passed since the last edit
    advance(Duration::from_secs(3)).await;
    settle().await;

    // Then: Nothing written yet
    assert_eq!(harness.store.attempts(), 0);

    // When: The debounce elapses
    advance(Duration::from_secs(2)).await;
    settle().await;

    // Then: Exactly one write, with the full content
    assert_eq!(harness.store.attempts(), 1);
    assert_eq!(harness.store.stored_transcript().as_deref(), Some("xxx"));
}

/// WHAT: Continuous edits still flush once per floor interval
/// WHY: The floor bounds data-loss risk when the user never pauses
#[tokio::test(start_paused = true)]
async fn given_continuous_edits_when_floor_reached_then_flush_despite_debounce() {
    // Given: An edit every second, never pausing long enough to debounce
    let harness = spawn_scheduler(CountingStore::default()).await;
    for _ in 0..200 {
        edit(&harness, "x").await;
        advance(Duration::from_secs(1)).await;
    }

    // Then: The floor fired exactly once (at 180s); the debounce never did
    assert_eq!(harness.store.attempts(), 1);
    assert!(harness.store.stored_transcript().is_some());
}

/// WHAT: Ten minutes of continuous typing produces three floor flushes
/// WHY: Bounded staleness: a flush every floor interval at 180s, 360s, 540s,
///      then a debounced flush once the user finally pauses
#[tokio::test(start_paused = true)]
async fn given_ten_minutes_of_edits_then_three_floor_flushes_and_final_debounce() {
    // Given: An edit every second for ten minutes
    let harness = spawn_scheduler(CountingStore::default()).await;
    for _ in 0..600 {
        edit(&harness, "x").await;
        advance(Duration::from_secs(1)).await;
    }

    // Then: Three floor-interval flushes happened along the way
    assert_eq!(harness.store.attempts(), 3);

    // When: The user stops and waits out one debounce
    advance(DEBOUNCE).await;
    settle().await;

    // Then: A final flush captures the complete transcript, no data loss
    assert_eq!(harness.store.attempts(), 4);
    let stored = harness.store.stored_transcript();
    assert_eq!(
        stored.as_deref(),
        Some(harness.buffer.lock().await.content())
    );
}

/// WHAT: A clean scheduler's floor fires without writing and re-arms
/// WHY: Idempotence: no-op flushes must not write, and the floor must
///      always stay pending
#[tokio::test(start_paused = true)]
async fn given_no_edits_when_floor_fires_then_no_write_and_floor_rearmed() {
    let harness = spawn_scheduler(CountingStore::default()).await;

    advance(FLOOR).await;
    settle().await;
    assert_eq!(harness.store.attempts(), 0);

    // A second interval passes without incident, so the floor was re-armed
    advance(FLOOR).await;
    settle().await;
    assert_eq!(harness.store.attempts(), 0);
    assert!(!harness.task.is_finished());
}

/// WHAT: Copy-only activity never triggers a write
/// WHY: Copy resets the debounce as an interaction signal but is not dirty
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_copy_only_activity_when_debounce_elapses_then_no_write() {
    let harness = spawn_scheduler(CountingStore::default()).await;
    harness
        .command_tx
        .send(SchedulerCommand::Activity(EditKind::Copy))
        .await
        .unwrap();
    settle().await;

    advance(DEBOUNCE).await;
    settle().await;

    assert_eq!(harness.store.attempts(), 0);
    assert_eq!(*harness.status_rx.borrow(), SaveStatus::FreshSession);
}

/// WHAT: An unavailable store degrades to a warning and retries later
/// WHY: Dirty state must survive a failed write so the floor retry can
///      pick the edit up once the surface is back
#[tokio::test(start_paused = true)]
async fn given_unavailable_store_when_flushing_then_warning_and_later_retry_succeeds() {
    // Given: An unavailable persistence surface and a pending edit
    let store = CountingStore::default();
    store.store.set_available(false);
    let harness = spawn_scheduler(store).await;
    edit(&harness, "precious words").await;

    // When: The debounce flush fires against the dead surface
    advance(DEBOUNCE).await;
    settle().await;

    // Then: One failed attempt, a warning status, nothing stored
    assert_eq!(harness.store.attempts(), 1);
    assert_eq!(*harness.status_rx.borrow(), SaveStatus::NotSaved);

    // When: The surface comes back and the re-armed floor fires
    harness.store.store.set_available(true);
    advance(FLOOR).await;
    settle().await;

    // Then: The retry wrote the content that failed before
    assert_eq!(harness.store.attempts(), 2);
    assert_eq!(
        harness.store.stored_transcript().as_deref(),
        Some("precious words")
    );
    assert!(matches!(
        *harness.status_rx.borrow(),
        SaveStatus::SavedAt { .. }
    ));
}

/// WHAT: A manual flush writes immediately without waiting for timers
/// WHY: The user can force a save (and shutdown paths reuse the same flush)
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_flush_command_when_dirty_then_immediate_write() {
    let harness = spawn_scheduler(CountingStore::default()).await;
    edit(&harness, "save me now").await;

    harness
        .command_tx
        .send(SchedulerCommand::Flush)
        .await
        .unwrap();
    settle().await;

    assert_eq!(harness.store.attempts(), 1);
    assert_eq!(
        harness.store.stored_transcript().as_deref(),
        Some("save me now")
    );
}

/// WHAT: Shutdown flushes pending edits before the task exits
/// WHY: Edits typed just before quitting must not be lost
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_pending_edit_when_shutting_down_then_final_flush() {
    let harness = spawn_scheduler(CountingStore::default()).await;
    edit(&harness, "last words").await;

    harness.shutdown_tx.send(true).unwrap();
    harness.task.await.unwrap();

    assert_eq!(
        harness.store.stored_transcript().as_deref(),
        Some("last words")
    );
}

/// WHAT: Clear empties both the store and the buffer
/// WHY: The clear gesture removes every trace of the session
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_stored_transcript_when_clearing_then_store_and_buffer_empty() {
    // Given: A stored transcript and matching buffer content
    let mut store = CountingStore::default();
    store.set(TRANSCRIPT_KEY, "old content").unwrap();
    let harness = spawn_scheduler(store).await;
    harness
        .buffer
        .lock()
        .await
        .set_content("old content".to_string());

    // When: Requesting a clear
    harness
        .command_tx
        .send(SchedulerCommand::Clear)
        .await
        .unwrap();
    settle().await;

    // Then: Store and buffer are empty and the status says so
    assert!(harness.store.stored_transcript().is_none());
    assert_eq!(harness.buffer.lock().await.content(), "");
    assert_eq!(*harness.status_rx.borrow(), SaveStatus::Cleared);
}

/// WHAT: Hydrate loads a stored transcript into the buffer
/// WHY: Session start resumes exactly where the last session saved
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_stored_transcript_when_hydrating_then_buffer_loaded() {
    // Given: A store holding a previous session's transcript
    let mut store = CountingStore::default();
    store.set(TRANSCRIPT_KEY, "previous session text").unwrap();
    let buffer = Arc::new(Mutex::new(TextBuffer::new()));
    let (_command_tx, command_rx) = mpsc::channel(32);
    let (status_tx, status_rx) = watch::channel(SaveStatus::FreshSession);
    let mut scheduler = AutosaveScheduler::new(
        AutosavePolicy::new(DEBOUNCE, FLOOR),
        store,
        Arc::clone(&buffer),
        command_rx,
        status_tx,
    );

    // When: Hydrating at session start
    scheduler.hydrate().await;

    // Then: The exact saved string is back, round-tripped
    assert_eq!(buffer.lock().await.content(), "previous session text");
    assert_eq!(*status_rx.borrow(), SaveStatus::Retrieved);
}

/// WHAT: Hydrating an empty store reports a fresh session
/// WHY: Absence of a transcript is a normal start, not a failure
#[tokio::test]
async fn given_empty_store_when_hydrating_then_fresh_session() {
    let buffer = Arc::new(Mutex::new(TextBuffer::new()));
    let (_command_tx, command_rx) = mpsc::channel(32);
    let (status_tx, status_rx) = watch::channel(SaveStatus::NotSaved);
    let mut scheduler = AutosaveScheduler::new(
        AutosavePolicy::new(DEBOUNCE, FLOOR),
        CountingStore::default(),
        Arc::clone(&buffer),
        command_rx,
        status_tx,
    );

    scheduler.hydrate().await;

    assert_eq!(buffer.lock().await.content(), "");
    assert_eq!(*status_rx.borrow(), SaveStatus::FreshSession);
}

/// WHAT: Hydrating against an unavailable store warns
/// WHY: The user must know their previous text could not be retrieved
#[tokio::test]
async fn given_unavailable_store_when_hydrating_then_retrieve_warning() {
    let store = CountingStore::default();
    store.store.set_available(false);
    let buffer = Arc::new(Mutex::new(TextBuffer::new()));
    let (_command_tx, command_rx) = mpsc::channel(32);
    let (status_tx, status_rx) = watch::channel(SaveStatus::FreshSession);
    let mut scheduler = AutosaveScheduler::new(
        AutosavePolicy::new(DEBOUNCE, FLOOR),
        store,
        Arc::clone(&buffer),
        command_rx,
        status_tx,
    );

    scheduler.hydrate().await;

    assert_eq!(*status_rx.borrow(), SaveStatus::RetrieveFailed);
}
