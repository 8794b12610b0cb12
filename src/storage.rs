//! Key-value persistence used for items, settings and presets.
//!
//! In the browser this is `localStorage`; tests use [`MemoryStore`].

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use wasm_bindgen::JsValue;

#[derive(Debug)]
pub enum StorageError {
    /// The backing store refused the operation (quota, privacy mode, ...).
    Backend(String),
    Malformed { key: String, source: serde_json::Error },
    Serialize(serde_json::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Backend(msg) => write!(f, "Storage unavailable: {}", msg),
            StorageError::Malformed { key, source } => {
                write!(f, "Stored value under '{}' is not valid: {}", key, source)
            }
            StorageError::Serialize(err) => write!(f, "Failed to encode value: {}", err),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Backend(_) => None,
            StorageError::Malformed { source, .. } => Some(source),
            StorageError::Serialize(err) => Some(err),
        }
    }
}

impl From<JsValue> for StorageError {
    fn from(value: JsValue) -> Self {
        StorageError::Backend(format!("{:?}", value))
    }
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// Read and decode the JSON value stored under `key`.
pub fn read_json<T, S>(store: &S, key: &str) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Malformed {
            key: key.to_string(),
            source,
        })
}

pub fn write_json<T, S>(store: &mut S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(StorageError::Serialize)?;
    store.set(key, &raw)
}

/// Like [`read_json`], but any failure falls back to `default` with a warning.
pub fn read_json_or<T, S>(store: &S, key: &str, default: T) -> T
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match read_json(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => default,
        Err(err) => {
            warn!("{}; using defaults", err);
            default
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.entries.keys().cloned().collect())
    }
}

/// The page's `localStorage`.
#[derive(Debug, Clone)]
pub struct BrowserStore {
    storage: web_sys::Storage,
}

impl BrowserStore {
    /// `None` when the page has no window or storage is disabled.
    pub fn local() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok().flatten()?;
        Some(Self { storage })
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.storage.get_item(key)?)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        Ok(self.storage.set_item(key, value)?)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        Ok(self.storage.remove_item(key)?)
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let len = self.storage.length()?;
        let mut keys = Vec::with_capacity(len as usize);
        for i in 0..len {
            if let Some(key) = self.storage.key(i)? {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SpinSettings;

    #[test]
    fn json_values_round_trip_through_store() {
        let mut store = MemoryStore::new();
        let settings = SpinSettings { duration_ms: 6000, sound_enabled: false };
        write_json(&mut store, "poh_settings", &settings).unwrap();
        let loaded: Option<SpinSettings> = read_json(&store, "poh_settings").unwrap();
        assert_eq!(loaded, Some(settings));
    }

    #[test]
    fn missing_key_reads_as_none() {
        let store = MemoryStore::new();
        let loaded: Option<SpinSettings> = read_json(&store, "nothing").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn malformed_json_is_reported_and_defaults_apply() {
        let mut store = MemoryStore::new();
        store.set("poh_settings", "{speed:").unwrap();
        let err = read_json::<SpinSettings, _>(&store, "poh_settings").unwrap_err();
        assert!(matches!(err, StorageError::Malformed { ref key, .. } if key == "poh_settings"));
        assert_eq!(
            read_json_or(&store, "poh_settings", SpinSettings::default()),
            SpinSettings::default()
        );
    }
}
