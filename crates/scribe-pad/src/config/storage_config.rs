use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Transcript storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the stored transcript (None = platform data dir).
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}
