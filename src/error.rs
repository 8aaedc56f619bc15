use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocaleError {
    #[error("unsupported locale tag: {0}")]
    UnsupportedLocaleTag(String),
    #[error("no persisted locale found")]
    MissingPersistedState,
    #[error("persisted locale version {stored} is older than {current}")]
    StalePersistedVersion { stored: u32, current: u32 },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode storage document: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("stored value under `{key}` is malformed: {source}")]
    Decode {
        key: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Why a persisted locale could not be used on start.
#[derive(Debug, Error)]
pub enum RestoreError {
    #[error(transparent)]
    Locale(#[from] LocaleError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("username is required")]
    MissingUsername,
    #[error("password is required")]
    MissingPassword,
}
