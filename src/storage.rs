//! Key-value string storage for the persisted high score.
//!
//! The file backend keeps a flat TOML table of string pairs and rewrites the
//! whole file on every `set`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{GameError, Result};

pub const HIGH_SCORE_KEY: &str = "highScore";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

// ── In-memory ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ── File-backed ───────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`.  A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(text) => toml::from_str(&text).map_err(|source| GameError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(GameError::Io { path, source }),
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        let text = toml::to_string(&self.entries)?;
        std::fs::write(&self.path, text).map_err(|source| GameError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

// ── High score ────────────────────────────────────────────────────────────────

/// Read the stored high score.  Missing or garbled values count as 0.
pub fn load_high_score(store: &impl KeyValueStore) -> u64 {
    match store.get(HIGH_SCORE_KEY) {
        None => 0,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(value = %raw, "ignoring unparsable stored high score");
            0
        }),
    }
}

pub fn save_high_score(store: &mut impl KeyValueStore, score: u64) -> Result<()> {
    store.set(HIGH_SCORE_KEY, &score.to_string())
}
