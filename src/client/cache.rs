use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed storage key, the durable-file analog of the browser's
/// localStorage key.
pub const CACHE_KEY: &str = "mindcare_moods.json";

/// Ids in this namespace were generated client-side and are never sent to
/// the server.
pub const LOCAL_ID_PREFIX: &str = "local-";

pub fn new_local_id() -> String {
    format!("{LOCAL_ID_PREFIX}{}", Uuid::new_v4())
}

pub fn is_local_id(id: &str) -> bool {
    id.starts_with(LOCAL_ID_PREFIX)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedMood {
    /// Server-assigned numeric id rendered as a string, or a `local-` id.
    pub id: String,
    pub mood: String,
    pub mood_value: i32,
    pub logged_at: DateTime<Utc>,
    /// False for entries created while offline; they exist only locally.
    pub synced: bool,
}

/// Durable mood mirror, ordered newest first.
pub struct MoodCache {
    path: PathBuf,
}

impl MoodCache {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(CACHE_KEY),
        }
    }

    /// Last-known entries; an absent or unreadable cache reads as empty.
    pub fn load(&self) -> Vec<CachedMood> {
        match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => Vec::new(),
        }
    }

    pub fn save(&self, entries: &[CachedMood]) -> io::Result<()> {
        let bytes = serde_json::to_vec(entries)?;
        fs::write(&self.path, bytes)
    }
}
