use error_location::ErrorLocation;
use thiserror::Error;

/// Persistence surface errors with source location tracking.
///
/// None of these are fatal: the scheduler degrades to a warning status and
/// keeps unsaved edits dirty so a later flush can retry.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The persistence surface is absent or disabled.
    #[error("Persistence surface unavailable: {reason} {location}")]
    Unavailable {
        /// Description of why the surface cannot be used.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// IO error from the backing storage.
    #[error("Storage IO error: {source} {location}")]
    Io {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl From<std::io::Error> for StoreError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        StoreError::Io {
            source,
            location: ErrorLocation::from(std::panic::Location::caller()),
        }
    }
}

/// Result type alias using [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;
