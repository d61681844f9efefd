use crate::error::{Result, StudioError};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const STUDIO_DIR: &str = ".studio";
pub const STORAGE_DIR: &str = ".studio/storage";
pub const CONFIG_FILE: &str = ".studio/config.yaml";

// ---------------------------------------------------------------------------
// Storage keys
// ---------------------------------------------------------------------------

pub const PILLARS_KEY: &str = "pillars";
pub const TASKS_KEY: &str = "tasks";
pub const GOALS_KEY: &str = "goals";
pub const CALENDAR_KEY: &str = "calendar";
pub const IDEA_TABLE_KEY: &str = "idea-table";
pub const FEATURE_FLAGS_KEY: &str = "feature-flags";

pub const STORAGE_KEYS: &[&str] = &[
    PILLARS_KEY,
    TASKS_KEY,
    GOALS_KEY,
    CALENDAR_KEY,
    IDEA_TABLE_KEY,
    FEATURE_FLAGS_KEY,
];

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn studio_dir(root: &Path) -> PathBuf {
    root.join(STUDIO_DIR)
}

pub fn storage_dir(root: &Path) -> PathBuf {
    root.join(STORAGE_DIR)
}

pub fn storage_path(root: &Path, key: &str) -> PathBuf {
    storage_dir(root).join(format!("{key}.json"))
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

// ---------------------------------------------------------------------------
// Ids
// ---------------------------------------------------------------------------

static ID_RE: OnceLock<Regex> = OnceLock::new();

fn id_re() -> &'static Regex {
    ID_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_\-]{1,64}$").unwrap())
}

/// Ids arrive from clients and end up in URLs; keep them path-safe.
pub fn validate_id(id: &str) -> Result<()> {
    if !id_re().is_match(id) {
        return Err(StudioError::InvalidId(id.to_string()));
    }
    Ok(())
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
