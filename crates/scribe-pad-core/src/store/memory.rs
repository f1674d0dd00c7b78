use crate::{
    error::{Result as StoreResult, StoreError},
    store::KeyValueStore,
};

use std::{
    collections::HashMap,
    panic::Location,
    sync::{Arc, Mutex, MutexGuard},
};

use error_location::ErrorLocation;

/// In-memory [`KeyValueStore`] with shared handles.
///
/// Clones share the same underlying map, so a handle kept by the caller
/// observes writes made by a scheduler that owns another handle. The surface
/// can be switched unavailable with [`set_available`](Self::set_available),
/// after which every operation fails the way an absent host store would.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug)]
struct Inner {
    entries: HashMap<String, String>,
    available: bool,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            available: true,
        }
    }
}

impl MemoryStore {
    /// Create an empty, available store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch the surface available or unavailable.
    pub fn set_available(&self, available: bool) {
        self.lock_inner().available = available;
    }

    fn lock_inner(&self) -> MutexGuard<'_, Inner> {
        // A poisoned lock still holds valid entries; recover rather than
        // propagate the panic of an unrelated holder.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[track_caller]
    fn unavailable() -> StoreError {
        StoreError::Unavailable {
            reason: "store switched off".to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        let mut inner = self.lock_inner();
        if !inner.available {
            return Err(Self::unavailable());
        }
        inner.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let inner = self.lock_inner();
        if !inner.available {
            return Err(Self::unavailable());
        }
        Ok(inner.entries.get(key).cloned())
    }

    fn clear(&mut self) -> StoreResult<()> {
        let mut inner = self.lock_inner();
        if !inner.available {
            return Err(Self::unavailable());
        }
        inner.entries.clear();
        Ok(())
    }
}
