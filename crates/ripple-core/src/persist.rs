//! Persistence of the applied settings in a key-value store
//!
//! The whole applied snapshot is written as one JSON object under
//! [`STORAGE_KEY`]. Loading is a per-field merge: anything missing, of the
//! wrong type, or naming an unknown enum member falls back to its default,
//! so older or hand-edited blobs still load.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::settings::{Settings, SettingsStore};
use crate::types::{AccentColor, Cloak, Theme};

/// Storage key holding the serialized applied settings.
pub const STORAGE_KEY: &str = "ripple-settings";

/// Error type for storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage unavailable")]
    Unavailable,
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Error type for encoding/decoding persisted settings.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("Malformed settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Persisted settings are not a JSON object")]
    NotAnObject,
}

/// String key-value medium the settings are persisted in.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store, used natively and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
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
}

// =============================================================================
// Persisted Layout
// =============================================================================

/// The eleven applied fields as they are stored.
///
/// Field order is the serialization order and must stay stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct PersistedSettings {
    pub theme: Theme,
    pub cloak: Cloak,
    pub accent_color: AccentColor,
    pub escape_key_enabled: bool,
    pub escape_key: String,
    pub escape_url: String,
    pub display_snipe_shield: bool,
    pub show_dev_func: bool,
    pub snipe_secure_enabled: bool,
    pub ads_enabled: bool,
    pub wide_display_enabled: bool,
}

impl Default for PersistedSettings {
    fn default() -> Self {
        Self::from_parts(&Settings::default(), false)
    }
}

impl PersistedSettings {
    pub fn from_parts(settings: &Settings, show_dev_func: bool) -> Self {
        Self {
            theme: settings.theme,
            cloak: settings.cloak,
            accent_color: settings.accent_color,
            escape_key_enabled: settings.escape_key_enabled,
            escape_key: settings.escape_key.clone(),
            escape_url: settings.escape_url.clone(),
            display_snipe_shield: settings.display_shield,
            show_dev_func,
            snipe_secure_enabled: settings.snipe_secure_enabled,
            ads_enabled: settings.ads_enabled,
            wide_display_enabled: settings.wide_display_enabled,
        }
    }

    /// Applied snapshot of a store.
    pub fn from_store(store: &SettingsStore) -> Self {
        Self::from_parts(store.applied(), store.show_dev_func())
    }

    /// Split into the stageable settings and the developer flag.
    pub fn into_parts(self) -> (Settings, bool) {
        let settings = Settings {
            theme: self.theme,
            cloak: self.cloak,
            accent_color: self.accent_color,
            escape_key_enabled: self.escape_key_enabled,
            escape_key: self.escape_key,
            escape_url: self.escape_url,
            display_shield: self.display_snipe_shield,
            snipe_secure_enabled: self.snipe_secure_enabled,
            ads_enabled: self.ads_enabled,
            wide_display_enabled: self.wide_display_enabled,
        };
        (settings, self.show_dev_func)
    }

    pub fn into_store(self) -> SettingsStore {
        let (settings, show_dev_func) = self.into_parts();
        SettingsStore::hydrated(settings, show_dev_func)
    }
}

// =============================================================================
// Encoding
// =============================================================================

/// Serialize a snapshot to its stored JSON form.
pub fn encode(snapshot: &PersistedSettings) -> Result<String, PersistError> {
    Ok(serde_json::to_string(snapshot)?)
}

/// Decode a stored blob, filling gaps field by field from the defaults.
pub fn decode(raw: &str) -> Result<PersistedSettings, PersistError> {
    let value: Value = serde_json::from_str(raw)?;
    let Value::Object(map) = value else {
        return Err(PersistError::NotAnObject);
    };

    let d = PersistedSettings::default();
    Ok(PersistedSettings {
        theme: non_empty_field(&map, "theme").unwrap_or(d.theme),
        cloak: non_empty_field(&map, "cloak").unwrap_or(d.cloak),
        accent_color: non_empty_field(&map, "accentColor").unwrap_or(d.accent_color),
        escape_key_enabled: field(&map, "escapeKeyEnabled").unwrap_or(d.escape_key_enabled),
        escape_key: non_empty_field(&map, "escapeKey").unwrap_or(d.escape_key),
        escape_url: non_empty_field(&map, "escapeUrl").unwrap_or(d.escape_url),
        display_snipe_shield: field(&map, "displaySnipeShield").unwrap_or(d.display_snipe_shield),
        show_dev_func: field(&map, "showDevFunc").unwrap_or(d.show_dev_func),
        snipe_secure_enabled: field(&map, "snipeSecureEnabled").unwrap_or(d.snipe_secure_enabled),
        ads_enabled: field(&map, "adsEnabled").unwrap_or(d.ads_enabled),
        wide_display_enabled: field(&map, "wideDisplayEnabled").unwrap_or(d.wide_display_enabled),
    })
}

fn field<T: DeserializeOwned>(map: &Map<String, Value>, key: &str) -> Option<T> {
    let value = map.get(key)?;
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            log::warn!("ignoring persisted {key}: {e}");
            None
        }
    }
}

/// Like [`field`], but an empty string counts as missing.
fn non_empty_field<T: DeserializeOwned>(map: &Map<String, Value>, key: &str) -> Option<T> {
    match map.get(key) {
        Some(Value::String(s)) if s.is_empty() => None,
        _ => field(map, key),
    }
}

// =============================================================================
// Load / Save
// =============================================================================

/// Read the saved snapshot. Absent or unreadable data yields `None`.
pub fn load<S: KeyValueStore + ?Sized>(storage: &S) -> Option<PersistedSettings> {
    let raw = match storage.get(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("failed to read saved settings: {e}");
            return None;
        }
    };

    match decode(&raw) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            log::warn!("discarding saved settings: {e}");
            None
        }
    }
}

/// Write the snapshot, replacing any earlier one. Failures are logged and dropped.
pub fn save<S: KeyValueStore + ?Sized>(storage: &mut S, snapshot: &PersistedSettings) {
    let raw = match encode(snapshot) {
        Ok(raw) => raw,
        Err(e) => {
            log::warn!("failed to encode settings: {e}");
            return;
        }
    };
    if let Err(e) = storage.set(STORAGE_KEY, &raw) {
        log::warn!("failed to save settings: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Backend("quota exceeded".to_string()))
        }
    }

    #[test]
    fn load_returns_none_when_absent() {
        assert!(load(&MemoryStore::new()).is_none());
    }

    #[test]
    fn load_returns_none_when_malformed() {
        let store = MemoryStore::with_entry(STORAGE_KEY, "{not json");
        assert!(load(&store).is_none());

        let store = MemoryStore::with_entry(STORAGE_KEY, "[1, 2]");
        assert!(load(&store).is_none());
        assert!(matches!(decode("\"Ripple\""), Err(PersistError::NotAnObject)));
    }

    #[test]
    fn load_merges_partial_snapshot_with_defaults() {
        let store = MemoryStore::with_entry(
            STORAGE_KEY,
            r#"{"theme":"White","adsEnabled":false,"showDevFunc":true}"#,
        );
        let snapshot = load(&store).expect("partial snapshot should load");

        let mut expected = PersistedSettings::default();
        expected.theme = Theme::Light;
        expected.ads_enabled = false;
        expected.show_dev_func = true;
        assert_eq!(snapshot, expected);
    }

    #[test]
    fn unknown_or_mistyped_fields_fall_back_per_field() {
        let snapshot = decode(
            r#"{"theme":"Sepia","cloak":"Ghost","accentColor":"teal","adsEnabled":"no","escapeKey":"","extra":1}"#,
        )
        .expect("object should decode");

        assert_eq!(snapshot.theme, Theme::Default);
        assert_eq!(snapshot.cloak, Cloak::Blank);
        assert_eq!(snapshot.accent_color, AccentColor::Blue);
        assert!(snapshot.ads_enabled);
        assert_eq!(snapshot.escape_key, "=");
    }

    #[test]
    fn false_booleans_are_kept() {
        let snapshot = decode(r#"{"displaySnipeShield":false}"#).unwrap();
        assert!(!snapshot.display_snipe_shield);
    }

    #[test]
    fn save_writes_all_eleven_fields() {
        let mut store = MemoryStore::new();
        save(&mut store, &PersistedSettings::default());

        let raw = store.raw(STORAGE_KEY).expect("saved");
        let value: Value = serde_json::from_str(raw).unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.len(), 11);
        assert_eq!(map["theme"], "Ripple");
        assert_eq!(map["displaySnipeShield"], true);
        assert_eq!(map["showDevFunc"], false);
    }

    #[test]
    fn save_of_load_is_byte_identical() {
        let mut snapshot = PersistedSettings::default();
        snapshot.cloak = Cloak::Teams;
        snapshot.escape_url = "https://example.org/?q=a&b=\"c\"".to_string();
        snapshot.show_dev_func = true;

        let mut store = MemoryStore::new();
        save(&mut store, &snapshot);
        let first = store.raw(STORAGE_KEY).unwrap().to_string();

        let reloaded = load(&store).unwrap();
        save(&mut store, &reloaded);
        let second = store.raw(STORAGE_KEY).unwrap().to_string();

        assert_eq!(first, second);
        assert_eq!(reloaded, snapshot);
    }

    #[test]
    fn failing_storage_is_ignored() {
        let mut store = FailingStore;
        assert!(load(&store).is_none());
        save(&mut store, &PersistedSettings::default());
    }

    #[test]
    fn parts_round_trip_through_store() {
        let mut snapshot = PersistedSettings::default();
        snapshot.wide_display_enabled = true;
        snapshot.show_dev_func = true;
        let store = snapshot.clone().into_store();
        assert_eq!(store.pending(), store.applied());
        assert_eq!(PersistedSettings::from_store(&store), snapshot);
    }
}
