use crate::catalog::Episode;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use gloo_storage::{LocalStorage, Storage};

/// Elapsed seconds of the episode that was playing, stored as text.
pub const TIME_PLAYED_KEY: &str = "podplayer.time_played";
/// JSON snapshot of the episode that was playing.
pub const EPISODE_ON_PLAY_KEY: &str = "podplayer.episode_on_play";
const SETTINGS_KEY: &str = "podplayer.settings";

/// Error type for key-value store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),
    #[cfg(not(target_arch = "wasm32"))]
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// A single-value-per-key text store. The player only ever needs get, set and
/// clear of a named slot.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Shared handle passed through context.
pub type SharedStore = Rc<dyn KeyValueStore>;

/// In-memory store. Used by tests and as a fallback when no persistent
/// backend is available.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

/// Browser `localStorage`.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserStore;

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        LocalStorage::raw()
            .get_item(key)
            .map_err(|e| StoreError::Backend(format!("{e:?}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|e| StoreError::Backend(format!("{e:?}")))
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        LocalStorage::delete(key);
        Ok(())
    }
}

/// SQLite `settings` table for desktop builds.
#[cfg(not(target_arch = "wasm32"))]
pub struct SqliteStore {
    conn: rusqlite::Connection,
}

#[cfg(not(target_arch = "wasm32"))]
impl SqliteStore {
    pub fn open(path: &std::path::Path) -> Result<Self, StoreError> {
        Self::with_connection(rusqlite::Connection::open(path)?)
    }

    pub fn with_connection(conn: rusqlite::Connection) -> Result<Self, StoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Self { conn })
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        use rusqlite::OptionalExtension;

        let value = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                [key],
                |row: &rusqlite::Row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            [key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM settings WHERE key = ?1", [key])?;
        Ok(())
    }
}

/// Open the platform's persistent store, falling back to memory.
#[cfg(target_arch = "wasm32")]
pub fn open_default_store() -> SharedStore {
    Rc::new(BrowserStore)
}

/// Open the platform's persistent store, falling back to memory.
#[cfg(not(target_arch = "wasm32"))]
pub fn open_default_store() -> SharedStore {
    let data_dir = dirs::data_dir()
        .map(|dir| dir.join("podplayer"))
        .unwrap_or_else(|| std::path::PathBuf::from(".podplayer"));
    if let Err(err) = std::fs::create_dir_all(&data_dir) {
        tracing::warn!("cannot create {}: {err}", data_dir.display());
    }

    match SqliteStore::open(&data_dir.join("podplayer.db")) {
        Ok(store) => Rc::new(store),
        Err(err) => {
            tracing::warn!("falling back to in-memory store: {err}");
            Rc::new(MemoryStore::new())
        }
    }
}

/// User-tunable player settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_skip_seconds")]
    pub skip_seconds: f64,
    #[serde(default = "default_speed_steps")]
    pub speed_steps: Vec<f64>,
    #[serde(default = "default_speed")]
    pub default_speed: f64,
}

fn default_skip_seconds() -> f64 {
    10.0
}

fn default_speed_steps() -> Vec<f64> {
    vec![1.0, 1.25, 1.5, 1.75, 2.0]
}

fn default_speed() -> f64 {
    1.0
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            skip_seconds: default_skip_seconds(),
            speed_steps: default_speed_steps(),
            default_speed: default_speed(),
        }
    }
}

impl AppSettings {
    /// The speed after `current` in the cycle. Unknown speeds restart the cycle.
    pub fn next_speed(&self, current: f64) -> f64 {
        let Some(first) = self.speed_steps.first().copied() else {
            return self.default_speed;
        };
        self.speed_steps
            .iter()
            .position(|step| (step - current).abs() < f64::EPSILON)
            .and_then(|idx| self.speed_steps.get(idx + 1).copied())
            .unwrap_or(first)
    }
}

pub fn load_settings(store: &dyn KeyValueStore) -> AppSettings {
    match store.get(SETTINGS_KEY) {
        Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|err| {
            tracing::warn!("ignoring unreadable settings: {err}");
            AppSettings::default()
        }),
        Ok(None) => AppSettings::default(),
        Err(err) => {
            tracing::warn!("failed to load settings: {err}");
            AppSettings::default()
        }
    }
}

pub fn save_settings(store: &dyn KeyValueStore, settings: &AppSettings) -> Result<(), StoreError> {
    let json = serde_json::to_string(settings)?;
    store.set(SETTINGS_KEY, &json)
}

/// Persisted position paired with the episode it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumePoint {
    pub elapsed_seconds: f64,
    pub episode: Episode,
}

/// Elapsed seconds written by the last time-update tick.
///
/// Unreadable text yields `None`; storage errors are logged and yield `None`.
pub fn load_time_played(store: &dyn KeyValueStore) -> Option<f64> {
    match store.get(TIME_PLAYED_KEY) {
        Ok(raw) => raw.and_then(|text| text.trim().parse::<f64>().ok()),
        Err(err) => {
            tracing::warn!("failed to read playback position: {err}");
            None
        }
    }
}

pub fn save_time_played(store: &dyn KeyValueStore, seconds: f64) -> Result<(), StoreError> {
    store.set(TIME_PLAYED_KEY, &seconds.to_string())
}

pub fn clear_time_played(store: &dyn KeyValueStore) -> Result<(), StoreError> {
    store.remove(TIME_PLAYED_KEY)
}

pub fn load_episode_on_play(store: &dyn KeyValueStore) -> Option<Episode> {
    match store.get(EPISODE_ON_PLAY_KEY) {
        Ok(raw) => raw.and_then(|json| serde_json::from_str(&json).ok()),
        Err(err) => {
            tracing::warn!("failed to read episode snapshot: {err}");
            None
        }
    }
}

pub fn save_episode_on_play(store: &dyn KeyValueStore, episode: &Episode) -> Result<(), StoreError> {
    let json = serde_json::to_string(episode)?;
    store.set(EPISODE_ON_PLAY_KEY, &json)
}

pub fn clear_episode_on_play(store: &dyn KeyValueStore) -> Result<(), StoreError> {
    store.remove(EPISODE_ON_PLAY_KEY)
}

/// Both halves of the persisted position, or nothing.
pub fn load_resume_point(store: &dyn KeyValueStore) -> Option<ResumePoint> {
    let elapsed_seconds = load_time_played(store)?;
    let episode = load_episode_on_play(store)?;
    Some(ResumePoint {
        elapsed_seconds,
        episode,
    })
}
