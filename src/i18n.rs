//! Locale tables for the login page.
//!
//! The strings live in `i18n/<tag>.yml` and are compiled in by `rust_i18n`.
//! Each supported language gets one immutable [`LocaleTable`], resolved once
//! with an explicit locale so the current language stays owned by the store.
//! Both tables share a single version stamp, bumped whenever the set of keys
//! changes so that a persisted language choice from an older build can be
//! discarded.

use once_cell::sync::Lazy;
use rust_i18n::t;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LocaleError;

/// Version stamp of the current table layout.
pub const LOCALE_TABLE_VERSION: u32 = 1;

/// Language used when nothing else selects one.
pub const DEFAULT_TAG: LanguageTag = LanguageTag::EnUs;

const SECTION: &str = "LogIn";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LanguageTag {
    #[default]
    #[serde(rename = "en_US")]
    EnUs,
    #[serde(rename = "ru_RU")]
    RuRu,
}

impl LanguageTag {
    pub const ALL: [LanguageTag; 2] = [LanguageTag::EnUs, LanguageTag::RuRu];

    pub fn as_str(self) -> &'static str {
        match self {
            LanguageTag::EnUs => "en_US",
            LanguageTag::RuRu => "ru_RU",
        }
    }

    /// Accepts exactly `en_US` or `ru_RU`.
    pub fn parse(tag: &str) -> Result<Self, LocaleError> {
        match tag {
            "en_US" => Ok(LanguageTag::EnUs),
            "ru_RU" => Ok(LanguageTag::RuRu),
            _ => Err(LocaleError::UnsupportedLocaleTag(tag.to_string())),
        }
    }

    pub fn table(self) -> &'static LocaleTable {
        table(self)
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageTag {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// All user-visible strings of the login page for one language.
#[derive(Debug, PartialEq, Eq)]
pub struct LocaleTable {
    pub tag: LanguageTag,
    pub card_meta_title: String,
    pub card_meta_description: String,
    pub username_input_label: String,
    pub password_input_label: String,
    pub log_in_button_text: String,
    pub forgot_password_link_text: String,
    pub footer_text: String,
}

impl LocaleTable {
    /// Keys in the order they appear on the page.
    pub const KEYS: [&'static str; 7] = [
        "cardMetaTitle",
        "cardMetaDescription",
        "usernameInputLabel",
        "passwordInputLabel",
        "logInButtonText",
        "forgotPasswordLinkText",
        "footerText",
    ];

    fn load(tag: LanguageTag) -> Self {
        let lookup = |key: &str| {
            let path = format!("{}.{}", SECTION, key);
            t!(path.as_str(), locale = tag.as_str()).into_owned()
        };
        Self {
            tag,
            card_meta_title: lookup("cardMetaTitle"),
            card_meta_description: lookup("cardMetaDescription"),
            username_input_label: lookup("usernameInputLabel"),
            password_input_label: lookup("passwordInputLabel"),
            log_in_button_text: lookup("logInButtonText"),
            forgot_password_link_text: lookup("forgotPasswordLinkText"),
            footer_text: lookup("footerText"),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        let value = match key {
            "cardMetaTitle" => &self.card_meta_title,
            "cardMetaDescription" => &self.card_meta_description,
            "usernameInputLabel" => &self.username_input_label,
            "passwordInputLabel" => &self.password_input_label,
            "logInButtonText" => &self.log_in_button_text,
            "forgotPasswordLinkText" => &self.forgot_password_link_text,
            "footerText" => &self.footer_text,
            _ => return None,
        };
        Some(value.as_str())
    }
}

static EN_US: Lazy<LocaleTable> = Lazy::new(|| LocaleTable::load(LanguageTag::EnUs));
static RU_RU: Lazy<LocaleTable> = Lazy::new(|| LocaleTable::load(LanguageTag::RuRu));

pub fn table(tag: LanguageTag) -> &'static LocaleTable {
    match tag {
        LanguageTag::EnUs => &*EN_US,
        LanguageTag::RuRu => &*RU_RU,
    }
}
