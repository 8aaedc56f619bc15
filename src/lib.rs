//! A terminal login page with switchable language and a guarded home route.
//!
//! # Features
//!
//! - Two built-in locale tables (`en_US`, `ru_RU`) with a version stamp
//! - A locale store with reducer-style actions and explicit subscriptions
//! - Persisted language choice that survives restarts and table upgrades
//! - Memoized selectors and a binding that keeps pages in sync with the store
//! - A route guard in front of `/`, redirecting to `/login`
//!
//! ```
//! use login_ui::{LanguageTag, LocaleStore, LoginPage};
//!
//! let store = LocaleStore::new(LanguageTag::EnUs);
//! let page = LoginPage::with_default_template(&store);
//! assert_eq!(page.button_text(), "Log in");
//!
//! store.set_locale("ru_RU");
//! assert_eq!(page.button_text(), "Авторизация");
//! ```

#[macro_use]
extern crate rust_i18n;

i18n!("i18n", fallback = "en_US");

pub mod cli;
pub mod config;
pub mod error;
pub mod i18n;
pub mod route;
pub mod selector;
pub mod storage;
pub mod store;
pub mod template;
pub mod view;

pub use config::Config;
pub use error::{FormError, LocaleError, RestoreError, StorageError};
pub use i18n::{LOCALE_TABLE_VERSION, LanguageTag, LocaleTable};
pub use route::{AuthFlag, AuthProvider, FakeAuth, RenderDecision, Route, Router, guard};
pub use selector::{LocaleBinding, Selector, select_locale};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use store::{Action, LocaleState, LocaleStore, Subscription};
pub use view::{HomePage, LoginForm, LoginPage};

/// Initialize logging for library users.
///
/// Safe to call more than once; only the first call installs the logger.
pub fn init() {
    let _ = env_logger::try_init();
}
