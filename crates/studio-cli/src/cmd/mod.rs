pub mod calendar;
pub mod config;
pub mod content;
pub mod flag;
pub mod goal;
pub mod idea;
pub mod init;
pub mod pillar;
pub mod serve;
pub mod task;

use std::path::Path;
use studio_core::{Store, StudioError};

/// Open the store, failing if `studio init` has not been run.
pub(crate) fn open_store(root: &Path) -> anyhow::Result<Store> {
    let store = Store::new(root);
    if !store.is_initialized() {
        return Err(StudioError::NotInitialized.into());
    }
    Ok(store)
}
