//! Keyed JSON store. Each storage key is one file under `.studio/storage/`
//! holding a whole collection; mutations replace the file atomically.

use crate::board::Task;
use crate::calendar::Calendar;
use crate::config::Config;
use crate::content::Pillar;
use crate::error::Result;
use crate::flags::FeatureFlags;
use crate::goal::Goal;
use crate::ideas::IdeaTable;
use crate::{io, paths};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A collection persisted under a fixed storage key.
pub trait Stored: Serialize + DeserializeOwned + Default {
    const KEY: &'static str;
}

impl Stored for Vec<Pillar> {
    const KEY: &'static str = paths::PILLARS_KEY;
}

impl Stored for Vec<Task> {
    const KEY: &'static str = paths::TASKS_KEY;
}

impl Stored for Vec<Goal> {
    const KEY: &'static str = paths::GOALS_KEY;
}

impl Stored for Calendar {
    const KEY: &'static str = paths::CALENDAR_KEY;
}

impl Stored for IdeaTable {
    const KEY: &'static str = paths::IDEA_TABLE_KEY;
}

impl Stored for FeatureFlags {
    const KEY: &'static str = paths::FEATURE_FLAGS_KEY;
}

#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create `.studio/storage/` and a default config. Idempotent.
    pub fn init(&self, project: &str) -> Result<()> {
        std::fs::create_dir_all(paths::storage_dir(&self.root))?;
        let config = Config::new(project);
        let data = serde_yaml::to_string(&config)?;
        if io::write_if_missing(&paths::config_path(&self.root), data.as_bytes())? {
            tracing::info!(root = %self.root.display(), "initialized studio");
        }
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        paths::studio_dir(&self.root).is_dir()
    }

    /// Load a collection; a missing key yields the default value.
    pub fn load<T: Stored>(&self) -> Result<T> {
        match io::read_optional(&paths::storage_path(&self.root, T::KEY))? {
            Some(data) => Ok(serde_json::from_str(&data)?),
            None => Ok(T::default()),
        }
    }

    pub fn save<T: Stored>(&self, value: &T) -> Result<()> {
        let path = paths::storage_path(&self.root, T::KEY);
        let data = serde_json::to_string_pretty(value)?;
        io::atomic_write(&path, data.as_bytes())
    }

    /// Load, mutate, save. Nothing is written when `f` fails.
    pub fn update<T, R, F>(&self, f: F) -> Result<R>
    where
        T: Stored,
        F: FnOnce(&mut T) -> Result<R>,
    {
        let mut value: T = self.load()?;
        let out = f(&mut value)?;
        self.save(&value)?;
        Ok(out)
    }

    /// Remove a key so it reads as its default again.
    pub fn clear<T: Stored>(&self) -> Result<()> {
        let path = paths::storage_path(&self.root, T::KEY);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
