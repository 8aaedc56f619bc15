//! Durable key-value slot holding the last chosen language.
//!
//! The record lives under the `locale` key as `{ locale = "ru_RU", version = 1 }`.
//! Every failure on the restore path degrades to the fallback language, which
//! is then written back so the next start finds a current record.

use log::{debug, info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use crate::error::{LocaleError, RestoreError, StorageError};
use crate::i18n::{LOCALE_TABLE_VERSION, LanguageTag};

pub const LOCALE_KEY: &str = "locale";

pub static DEFAULT_STORAGE_PATH: Lazy<Option<PathBuf>> = Lazy::new(|| {
    dirs::data_dir().map(|mut path| {
        path.push("login-ui");
        path.push("storage.toml");
        path
    })
});

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<toml::Value>, StorageError>;
    fn set(&mut self, key: &str, value: toml::Value) -> Result<(), StorageError>;
}

/// A whole TOML document on disk, one top-level key per slot.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_document(&self) -> Result<toml::Table, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(toml::Table::new()),
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        Ok(toml::from_str(&content).unwrap_or_else(|e| {
            warn!("Storage file {} is corrupt, ignoring it: {}", self.path.display(), e);
            toml::Table::new()
        }))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<toml::Value>, StorageError> {
        Ok(self.read_document()?.remove(key))
    }

    fn set(&mut self, key: &str, value: toml::Value) -> Result<(), StorageError> {
        let mut document = self.read_document()?;
        document.insert(key.to_string(), value);
        let content = toml::to_string(&document)?;

        let write_err = |source| StorageError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(&self.path, content).map_err(write_err)
    }
}

/// In-process store. Clones share the same slots, so a test can keep one
/// handle while the store owns another and "restart" against it.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: Rc<RefCell<HashMap<String, toml::Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<toml::Value>, StorageError> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: toml::Value) -> Result<(), StorageError> {
        self.slots.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedLocale {
    pub locale: LanguageTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
}

impl PersistedLocale {
    pub fn current(locale: LanguageTag) -> Self {
        Self {
            locale,
            version: Some(LOCALE_TABLE_VERSION),
        }
    }
}

#[derive(Deserialize)]
struct RawRecord {
    locale: String,
    #[serde(default)]
    version: Option<u32>,
}

pub fn save_locale(store: &mut dyn KeyValueStore, tag: LanguageTag) -> Result<(), StorageError> {
    let value = toml::Value::try_from(PersistedLocale::current(tag))?;
    store.set(LOCALE_KEY, value)
}

/// Reads the persisted record and checks it against the current tables.
pub fn load_locale(store: &dyn KeyValueStore) -> Result<LanguageTag, RestoreError> {
    let Some(value) = store.get(LOCALE_KEY)? else {
        return Err(LocaleError::MissingPersistedState.into());
    };

    let raw = match value {
        // Older builds stored the bare tag without a record around it.
        toml::Value::String(locale) => RawRecord {
            locale,
            version: None,
        },
        other => other.try_into().map_err(|source| StorageError::Decode {
            key: LOCALE_KEY.to_string(),
            source,
        })?,
    };

    let tag = LanguageTag::parse(&raw.locale)?;
    let stored = raw.version.unwrap_or(0);
    if stored < LOCALE_TABLE_VERSION {
        return Err(LocaleError::StalePersistedVersion {
            stored,
            current: LOCALE_TABLE_VERSION,
        }
        .into());
    }
    Ok(tag)
}

/// Initial language for a new store: the persisted one when it is current,
/// otherwise `fallback`, re-persisted with the current version stamp.
pub fn restore_locale(store: &mut dyn KeyValueStore, fallback: LanguageTag) -> LanguageTag {
    match load_locale(store) {
        Ok(tag) => {
            debug!("Restored persisted locale {}", tag);
            return tag;
        }
        Err(RestoreError::Locale(LocaleError::MissingPersistedState)) => {
            info!("No persisted locale, using {}", fallback);
        }
        Err(RestoreError::Locale(e)) => {
            info!("Discarding persisted locale ({}), using {}", e, fallback);
        }
        Err(RestoreError::Storage(e)) => {
            warn!("Failed to read persisted locale: {}", e);
        }
    }

    if let Err(e) = save_locale(store, fallback) {
        warn!("Failed to persist locale {}: {}", fallback, e);
    }
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(locale: &str, version: Option<i64>) -> toml::Value {
        let mut table = toml::Table::new();
        table.insert("locale".into(), toml::Value::String(locale.into()));
        if let Some(v) = version {
            table.insert("version".into(), toml::Value::Integer(v));
        }
        toml::Value::Table(table)
    }

    fn persisted(store: &MemoryStore) -> PersistedLocale {
        store.get(LOCALE_KEY).unwrap().unwrap().try_into().unwrap()
    }

    #[test]
    fn test_missing_state_persists_fallback() {
        let mut store = MemoryStore::new();
        assert!(matches!(
            load_locale(&store),
            Err(RestoreError::Locale(LocaleError::MissingPersistedState))
        ));
        let tag = restore_locale(&mut store, LanguageTag::EnUs);
        assert_eq!(tag, LanguageTag::EnUs);
        assert_eq!(persisted(&store), PersistedLocale::current(LanguageTag::EnUs));
    }

    #[test]
    fn test_current_record_is_restored() {
        let mut store = MemoryStore::new();
        save_locale(&mut store, LanguageTag::RuRu).unwrap();
        assert_eq!(restore_locale(&mut store, LanguageTag::EnUs), LanguageTag::RuRu);
    }

    #[test]
    fn test_stale_version_is_discarded() {
        let mut store = MemoryStore::new();
        store.set(LOCALE_KEY, record("ru_RU", Some(0))).unwrap();
        assert!(matches!(
            load_locale(&store),
            Err(RestoreError::Locale(LocaleError::StalePersistedVersion {
                stored: 0,
                current: LOCALE_TABLE_VERSION
            }))
        ));

        let tag = restore_locale(&mut store, LanguageTag::EnUs);
        assert_eq!(tag, LanguageTag::EnUs);
        assert_eq!(persisted(&store).version, Some(LOCALE_TABLE_VERSION));
    }

    #[test]
    fn test_missing_version_counts_as_stale() {
        let mut store = MemoryStore::new();
        store.set(LOCALE_KEY, record("ru_RU", None)).unwrap();
        assert_eq!(restore_locale(&mut store, LanguageTag::EnUs), LanguageTag::EnUs);

        store
            .set(LOCALE_KEY, toml::Value::String("ru_RU".into()))
            .unwrap();
        assert_eq!(restore_locale(&mut store, LanguageTag::EnUs), LanguageTag::EnUs);
    }

    #[test]
    fn test_unsupported_tag_falls_back() {
        let mut store = MemoryStore::new();
        store.set(LOCALE_KEY, record("de_DE", Some(1))).unwrap();
        assert!(matches!(
            load_locale(&store),
            Err(RestoreError::Locale(LocaleError::UnsupportedLocaleTag(_)))
        ));
        assert_eq!(restore_locale(&mut store, LanguageTag::RuRu), LanguageTag::RuRu);
        assert_eq!(persisted(&store).locale, LanguageTag::RuRu);
    }

    #[test]
    fn test_malformed_record_falls_back() {
        let mut store = MemoryStore::new();
        store.set(LOCALE_KEY, toml::Value::Integer(7)).unwrap();
        assert!(matches!(
            load_locale(&store),
            Err(RestoreError::Storage(StorageError::Decode { .. }))
        ));
        assert_eq!(restore_locale(&mut store, LanguageTag::EnUs), LanguageTag::EnUs);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.toml");

        let mut store = FileStore::new(&path);
        assert!(store.get(LOCALE_KEY).unwrap().is_none());
        save_locale(&mut store, LanguageTag::RuRu).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("ru_RU"));

        let mut reopened = FileStore::new(&path);
        assert_eq!(restore_locale(&mut reopened, LanguageTag::EnUs), LanguageTag::RuRu);
    }

    #[test]
    fn test_file_store_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.toml");
        let mut store = FileStore::new(&path);
        store.set("theme", toml::Value::String("dark".into())).unwrap();
        save_locale(&mut store, LanguageTag::EnUs).unwrap();
        assert_eq!(
            store.get("theme").unwrap(),
            Some(toml::Value::String("dark".into()))
        );
    }

    #[test]
    fn test_corrupt_file_is_treated_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.toml");
        fs::write(&path, "locale = [[[").unwrap();
        let mut store = FileStore::new(&path);
        assert_eq!(restore_locale(&mut store, LanguageTag::EnUs), LanguageTag::EnUs);
        assert_eq!(load_locale(&store).unwrap(), LanguageTag::EnUs);
    }
}
