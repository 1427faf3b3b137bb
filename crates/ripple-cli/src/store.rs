use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use ripple_core::{KeyValueStore, StorageError};

/// Key-value store kept in a JSON file, laid out like `localStorage`:
/// one object mapping keys to string values.
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open `path`, starting empty if the file does not exist yet.
    pub fn open(path: &Path) -> Result<Self, String> {
        let entries = if path.exists() {
            let raw = fs::read_to_string(path)
                .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw)
                    .map_err(|e| format!("Invalid state file '{}': {}", path.display(), e))?
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    fn write(&self) -> Result<(), String> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create '{}': {}", parent.display(), e))?;
        }
        let raw = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| format!("Failed to encode state: {}", e))?;
        fs::write(&self.path, raw)
            .map_err(|e| format!("Failed to write '{}': {}", self.path.display(), e))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.write().map_err(StorageError::Backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ripple_core::persist::{self, PersistedSettings};
    use ripple_core::Cloak;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("ripple-cli-{}-{}", std::process::id(), name))
            .join("state.json")
    }

    #[test]
    fn missing_file_opens_empty() {
        let store = FileStore::open(&temp_path("missing")).unwrap();
        assert_eq!(store.get(persist::STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn saved_settings_survive_reopen() {
        let path = temp_path("reopen");
        let mut snapshot = PersistedSettings::default();
        snapshot.cloak = Cloak::Blank;

        let mut store = FileStore::open(&path).unwrap();
        persist::save(&mut store, &snapshot);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(persist::load(&reopened), Some(snapshot));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn rejects_non_object_state_file() {
        let path = temp_path("garbage");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[1,2,3]").unwrap();
        assert!(FileStore::open(&path).is_err());
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
