mod autosave_config;
#[allow(clippy::module_inception)]
mod config;
mod storage_config;

pub(crate) use {
    autosave_config::AutosaveConfig, config::Config, storage_config::StorageConfig,
};

pub(crate) const DEFAULT_DEBOUNCE_SECS: u64 = 5;
pub(crate) const DEFAULT_FLOOR_SECS: u64 = 180;

pub(crate) fn default_debounce_secs() -> u64 {
    DEFAULT_DEBOUNCE_SECS
}

pub(crate) fn default_floor_secs() -> u64 {
    DEFAULT_FLOOR_SECS
}
