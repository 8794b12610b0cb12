//! Named item lists saved to the key-value store.
//!
//! Each preset lives under `poh_preset_<name>` as a JSON array of items.
//! Loading is all-or-nothing: a preset that fails to parse yields an error and
//! the caller's current items stay as they are.

use crate::storage::{read_json, write_json, KeyValueStore, StorageError};
use crate::Item;
use log::{info, warn};
use std::fmt;

pub const PRESET_KEY_PREFIX: &str = "poh_preset_";

#[derive(Debug)]
pub enum PresetError {
    EmptyName,
    NotFound(String),
    Malformed { name: String, source: serde_json::Error },
    Storage(StorageError),
}

impl fmt::Display for PresetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresetError::EmptyName => write!(f, "Preset name cannot be empty"),
            PresetError::NotFound(name) => write!(f, "Preset '{}' does not exist", name),
            PresetError::Malformed { name, source } => {
                write!(f, "Could not load preset '{}': {}", name, source)
            }
            PresetError::Storage(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for PresetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PresetError::Malformed { source, .. } => Some(source),
            PresetError::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StorageError> for PresetError {
    fn from(err: StorageError) -> Self {
        PresetError::Storage(err)
    }
}

pub fn preset_key(name: &str) -> String {
    format!("{}{}", PRESET_KEY_PREFIX, name)
}

fn normalize_name(name: &str) -> Result<&str, PresetError> {
    let name = name.trim();
    if name.is_empty() {
        Err(PresetError::EmptyName)
    } else {
        Ok(name)
    }
}

/// Save `items` under `name`, replacing any preset with the same name.
/// Returns the trimmed name actually used.
pub fn save_preset<S>(store: &mut S, name: &str, items: &[Item]) -> Result<String, PresetError>
where
    S: KeyValueStore + ?Sized,
{
    let name = normalize_name(name)?;
    write_json(store, &preset_key(name), items)?;
    info!("Saved preset '{}' with {} items", name, items.len());
    Ok(name.to_string())
}

pub fn load_preset<S>(store: &S, name: &str) -> Result<Vec<Item>, PresetError>
where
    S: KeyValueStore + ?Sized,
{
    let name = normalize_name(name)?;
    match read_json::<Vec<Item>, _>(store, &preset_key(name)) {
        Ok(Some(items)) => Ok(items),
        Ok(None) => Err(PresetError::NotFound(name.to_string())),
        Err(StorageError::Malformed { source, .. }) => {
            warn!("Preset '{}' is corrupt: {}", name, source);
            Err(PresetError::Malformed {
                name: name.to_string(),
                source,
            })
        }
        Err(err) => Err(err.into()),
    }
}

pub fn delete_preset<S>(store: &mut S, name: &str) -> Result<(), PresetError>
where
    S: KeyValueStore + ?Sized,
{
    let name = normalize_name(name)?;
    store.remove(&preset_key(name))?;
    info!("Deleted preset '{}'", name);
    Ok(())
}

/// Names of all saved presets, sorted.
pub fn list_presets<S>(store: &S) -> Result<Vec<String>, PresetError>
where
    S: KeyValueStore + ?Sized,
{
    let mut names: Vec<String> = store
        .keys()?
        .into_iter()
        .filter_map(|key| key.strip_prefix(PRESET_KEY_PREFIX).map(str::to_string))
        .collect();
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn items() -> Vec<Item> {
        vec![
            Item::new("a", "Ana", "hsl(10 75% 55%)"),
            Item::new("b", "Bruno", "hsl(200 75% 55%)"),
        ]
    }

    #[test]
    fn saved_presets_can_be_loaded_and_listed() {
        let mut store = MemoryStore::new();
        assert_eq!(save_preset(&mut store, "  friday ", &items()).unwrap(), "friday");
        save_preset(&mut store, "almoço", &items()[..1]).unwrap();
        store.set("poh_items", "[]").unwrap();

        assert_eq!(list_presets(&store).unwrap(), ["almoço", "friday"]);
        assert_eq!(load_preset(&store, "friday").unwrap(), items());
    }

    #[test]
    fn stored_json_matches_plain_item_arrays() {
        let mut store = MemoryStore::new();
        save_preset(&mut store, "x", &items()[..1]).unwrap();
        assert_eq!(
            store.get("poh_preset_x").unwrap().unwrap(),
            r#"[{"id":"a","name":"Ana","color":"hsl(10 75% 55%)"}]"#
        );
    }

    #[test]
    fn blank_names_are_rejected() {
        let mut store = MemoryStore::new();
        assert!(matches!(
            save_preset(&mut store, "   ", &items()),
            Err(PresetError::EmptyName)
        ));
        assert!(matches!(load_preset(&store, ""), Err(PresetError::EmptyName)));
    }

    #[test]
    fn missing_and_malformed_presets_fail() {
        let mut store = MemoryStore::new();
        assert!(matches!(
            load_preset(&store, "ghost"),
            Err(PresetError::NotFound(name)) if name == "ghost"
        ));

        store.set("poh_preset_broken", "[{\"id\":").unwrap();
        let err = load_preset(&store, "broken").unwrap_err();
        assert!(matches!(err, PresetError::Malformed { .. }));
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn deleted_presets_disappear() {
        let mut store = MemoryStore::new();
        save_preset(&mut store, "one", &items()).unwrap();
        delete_preset(&mut store, "one").unwrap();
        assert!(list_presets(&store).unwrap().is_empty());
        assert!(matches!(load_preset(&store, "one"), Err(PresetError::NotFound(_))));
    }
}
