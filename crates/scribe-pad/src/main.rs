//! Scribe-Pad: type a time-stamped transcript against an audio source, with
//! debounced autosave to local storage.

mod config;
mod error;
mod file_store;
mod key_command;
mod session;
mod transport;

pub(crate) use {
    error::{AppError, Result as AppResult},
    file_store::FileStore,
    key_command::KeyCommand,
    session::{Session, SessionOutcome},
    transport::ClockTransport,
};

use crate::config::Config;

use std::sync::Arc;

use scribe_pad_core::{AutosavePolicy, AutosaveScheduler, SaveStatus, TextBuffer};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::{Mutex, mpsc, watch},
};
use tracing::{error, info};

/// Application entry point.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("scribe_pad=debug")
        .init();

    if let Err(e) = run().await {
        error!("Fatal error: {:?}", e);
        std::process::exit(1);
    }
}

/// Wire the store, scheduler, and session, then run the console loop.
async fn run() -> AppResult<()> {
    let config = Config::load()?;
    config.validate_delays()?;

    let store = FileStore::open(config.data_dir()?)?;

    let buffer = Arc::new(Mutex::new(TextBuffer::new()));
    let (command_tx, command_rx) = mpsc::channel(32);
    let (status_tx, status_rx) = watch::channel(SaveStatus::FreshSession);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let policy = AutosavePolicy::new(config.autosave.debounce(), config.autosave.floor());
    let mut scheduler =
        AutosaveScheduler::new(policy, store, Arc::clone(&buffer), command_rx, status_tx);

    scheduler.hydrate().await;

    let scheduler_task = tokio::spawn(scheduler.run(shutdown_rx));

    // Console sessions hold focus for their lifetime.
    buffer.lock().await.set_focus(true);

    let mut session = Session::new(buffer, ClockTransport::new(), command_tx, status_rx);
    println!("{}", session.status_line());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match session.handle_line(&line).await? {
            SessionOutcome::Continue(Some(feedback)) => println!("{feedback}"),
            SessionOutcome::Continue(None) => {}
            SessionOutcome::Quit => break,
        }
    }

    let _ = shutdown_tx.send(true);
    if let Err(e) = scheduler_task.await {
        error!(error = ?e, "Autosave scheduler task panicked");
    }

    info!("Scribe-pad shut down successfully");

    Ok(())
}
