use log::{debug, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::i18n::{self, LanguageTag};
use crate::storage::DEFAULT_STORAGE_PATH;
use crate::view::DEFAULT_LOGIN_TEMPLATE;

pub static DEFAULT_CONFIG_PATH: Lazy<Option<PathBuf>> = Lazy::new(|| {
    dirs::config_dir().map(|mut path| {
        path.push("login-ui");
        path.push("config.toml");
        path
    })
});

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    pub default_locale: Option<String>,
    pub storage_path: Option<PathBuf>,
    pub card_template: Option<String>,
    pub color: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Language used when nothing usable is persisted yet.
    pub default_locale: LanguageTag,
    /// Where the chosen language is persisted. `None` keeps it in memory only.
    pub storage_path: Option<PathBuf>,
    pub card_template: String,
    pub color: bool,
}

impl Config {
    pub fn load(path: &Path) -> Self {
        let config_file: ConfigFile = fs::read_to_string(path)
            .ok()
            .and_then(|content| {
                toml::from_str(&content)
                    .map_err(|e| warn!("Ignoring malformed config {}: {}", path.display(), e))
                    .ok()
            })
            .unwrap_or_default();
        Self::from_file(config_file)
    }

    pub fn load_from_config_dir() -> Self {
        if let Some(path) = DEFAULT_CONFIG_PATH.as_deref() {
            debug!("Loading config from {}", path.display());
            return Self::load(path);
        }
        warn!("Config dir not found, using default config");
        Self::default()
    }

    fn from_file(config_file: ConfigFile) -> Self {
        let default = Self::default();
        let default_locale = match config_file.default_locale {
            Some(tag) => LanguageTag::parse(&tag).unwrap_or_else(|e| {
                warn!("{} in config, using {}", e, default.default_locale);
                default.default_locale
            }),
            None => default.default_locale,
        };
        Self {
            default_locale,
            storage_path: config_file.storage_path.or(default.storage_path),
            card_template: config_file.card_template.unwrap_or(default.card_template),
            color: config_file.color.unwrap_or(default.color),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_locale: i18n::DEFAULT_TAG,
            storage_path: DEFAULT_STORAGE_PATH.clone(),
            card_template: DEFAULT_LOGIN_TEMPLATE.to_string(),
            color: true,
        }
    }
}
