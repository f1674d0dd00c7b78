//! File-backed key-value store.
//!
//! Each key maps to one file under the data directory. Writes use the
//! temp-file-then-rename pattern so a crash mid-write never corrupts the
//! stored transcript.

use scribe_pad_core::{KeyValueStore, StoreResult};

use std::{
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use tracing::{debug, info, instrument};

/// Key-value persistence surface rooted at a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if missing.
    #[track_caller]
    #[instrument]
    pub fn open<P: AsRef<Path> + std::fmt::Debug>(dir: P) -> StoreResult<Self> {
        fs::create_dir_all(dir.as_ref())?;

        info!(dir = ?dir.as_ref(), "FileStore opened");

        Ok(Self {
            dir: dir.as_ref().to_path_buf(),
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.txt"))
    }
}

impl KeyValueStore for FileStore {
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.path_for(key);
        let temp_path = path.with_extension("txt.tmp");

        let mut temp_file = fs::File::create(&temp_path)?;
        temp_file.write_all(value.as_bytes())?;
        temp_file.sync_all()?;
        fs::rename(&temp_path, &path)?;

        debug!(key, bytes = value.len(), "Value stored (atomic write)");

        Ok(())
    }

    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn clear(&mut self) -> StoreResult<()> {
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.is_file() {
                fs::remove_file(&path)?;
            }
        }

        info!(dir = ?self.dir, "Store cleared");

        Ok(())
    }
}
