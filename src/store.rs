//! Locale store: the single owner of the current language.
//!
//! The store is an explicit object handed to whatever needs it; cloning it
//! yields another handle to the same state. Transitions go through a pure
//! reducer over a closed [`Action`] set. Subscribers are notified
//! synchronously, in registration order, after every successful dispatch.
//!
//! Subscribers must not dispatch while being notified. Such a dispatch is
//! logged and dropped instead of starting a nested notification cycle.

use log::{debug, warn};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::i18n::{LanguageTag, LocaleTable, table};
use crate::storage::{self, KeyValueStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LocaleState {
    pub locale: LanguageTag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SwitchToEnglish,
    SwitchToRussian,
}

impl From<LanguageTag> for Action {
    fn from(tag: LanguageTag) -> Self {
        match tag {
            LanguageTag::EnUs => Action::SwitchToEnglish,
            LanguageTag::RuRu => Action::SwitchToRussian,
        }
    }
}

pub fn reduce(_state: &LocaleState, action: Action) -> LocaleState {
    let locale = match action {
        Action::SwitchToEnglish => LanguageTag::EnUs,
        Action::SwitchToRussian => LanguageTag::RuRu,
    };
    LocaleState { locale }
}

type Callback = Rc<dyn Fn(&Rc<LocaleState>)>;

struct Inner {
    state: RefCell<Rc<LocaleState>>,
    storage: RefCell<Option<Box<dyn KeyValueStore>>>,
    subscribers: RefCell<Vec<(u64, Callback)>>,
    next_id: Cell<u64>,
    notifying: Cell<bool>,
}

impl Inner {
    fn remove(&self, id: u64) {
        self.subscribers.borrow_mut().retain(|(sid, _)| *sid != id);
    }

    fn is_subscribed(&self, id: u64) -> bool {
        self.subscribers.borrow().iter().any(|(sid, _)| *sid == id)
    }
}

#[derive(Clone)]
pub struct LocaleStore {
    inner: Rc<Inner>,
}

impl LocaleStore {
    pub fn new(initial: LanguageTag) -> Self {
        Self {
            inner: Rc::new(Inner {
                state: RefCell::new(Rc::new(LocaleState { locale: initial })),
                storage: RefCell::new(None),
                subscribers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                notifying: Cell::new(false),
            }),
        }
    }

    /// Restores the last persisted language (or `fallback`) and persists every
    /// later transition to `storage`.
    pub fn with_storage(mut storage: Box<dyn KeyValueStore>, fallback: LanguageTag) -> Self {
        let initial = storage::restore_locale(storage.as_mut(), fallback);
        let store = Self::new(initial);
        *store.inner.storage.borrow_mut() = Some(storage);
        store
    }

    pub fn get_locale(&self) -> &'static LocaleTable {
        table(self.tag())
    }

    pub fn tag(&self) -> LanguageTag {
        self.inner.state.borrow().locale
    }

    /// Current state. The `Rc` only changes when a transition changes the
    /// language, so callers can compare snapshots by pointer.
    pub fn state(&self) -> Rc<LocaleState> {
        Rc::clone(&self.inner.state.borrow())
    }

    /// Applies `action`, persists the result and notifies subscribers.
    /// Returns `false` when the dispatch was rejected as re-entrant.
    pub fn dispatch(&self, action: Action) -> bool {
        if self.inner.notifying.get() {
            warn!("Ignoring {:?} dispatched from a locale subscriber", action);
            return false;
        }

        let current = self.state();
        let next = reduce(&current, action);
        if next != *current {
            debug!("Locale {} -> {}", current.locale, next.locale);
            *self.inner.state.borrow_mut() = Rc::new(next);
        }
        self.persist(next.locale);
        self.notify();
        true
    }

    /// Switches to the language named by `tag`. Unsupported tags are ignored.
    pub fn set_locale(&self, tag: &str) {
        match LanguageTag::parse(tag) {
            Ok(tag) => {
                self.dispatch(Action::from(tag));
            }
            Err(e) => debug!("Ignoring locale switch: {}", e),
        }
    }

    pub fn subscribe(&self, callback: impl Fn(&Rc<LocaleState>) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(callback)));
        Subscription {
            store: Rc::downgrade(&self.inner),
            id: Some(id),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    fn persist(&self, tag: LanguageTag) {
        if let Some(storage) = self.inner.storage.borrow_mut().as_mut() {
            if let Err(e) = storage::save_locale(storage.as_mut(), tag) {
                warn!("Failed to persist locale {}: {}", tag, e);
            }
        }
    }

    fn notify(&self) {
        let callbacks: Vec<(u64, Callback)> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|(id, cb)| (*id, Rc::clone(cb)))
            .collect();
        let state = self.state();

        self.inner.notifying.set(true);
        for (id, callback) in callbacks {
            // Skip callbacks removed by an earlier subscriber in this cycle.
            if self.inner.is_subscribed(id) {
                callback(&state);
            }
        }
        self.inner.notifying.set(false);
    }
}

impl fmt::Debug for LocaleStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleStore")
            .field("locale", &self.tag())
            .field("persistent", &self.inner.storage.borrow().is_some())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Registration handle returned by [`LocaleStore::subscribe`]. Dropping it
/// deregisters the callback as well.
#[must_use = "dropping the subscription unsubscribes the callback"]
pub struct Subscription {
    store: Weak<Inner>,
    id: Option<u64>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        if let (Some(id), Some(inner)) = (self.id.take(), self.store.upgrade()) {
            inner.remove(id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::storage::MemoryStore;
    use std::path::PathBuf;

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<toml::Value>, StorageError> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: toml::Value) -> Result<(), StorageError> {
            Err(StorageError::Write {
                path: PathBuf::from("/read-only/storage.toml"),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
    }

    #[test]
    fn test_set_locale_switches_table() {
        let store = LocaleStore::new(LanguageTag::EnUs);
        for tag in LanguageTag::ALL {
            store.set_locale(tag.as_str());
            assert_eq!(store.get_locale(), table(tag));
        }
    }

    #[test]
    fn test_unsupported_tag_is_noop() {
        let store = LocaleStore::new(LanguageTag::RuRu);
        let before = store.state();
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        let _sub = store.subscribe(move |_| c.set(c.get() + 1));

        store.set_locale("fr_FR");
        store.set_locale("");

        assert_eq!(store.get_locale(), table(LanguageTag::RuRu));
        assert!(Rc::ptr_eq(&before, &store.state()));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_reducer_is_exhaustive() {
        let state = LocaleState::default();
        assert_eq!(
            reduce(&state, Action::SwitchToRussian).locale,
            LanguageTag::RuRu
        );
        assert_eq!(
            reduce(&state, Action::SwitchToEnglish).locale,
            LanguageTag::EnUs
        );
        assert_eq!(Action::from(LanguageTag::RuRu), Action::SwitchToRussian);
    }

    #[test]
    fn test_subscribers_called_once_in_order() {
        let store = LocaleStore::new(LanguageTag::EnUs);
        let log = Rc::new(RefCell::new(Vec::new()));
        let subs: Vec<Subscription> = (0..3)
            .map(|i| {
                let log = log.clone();
                store.subscribe(move |state| log.borrow_mut().push((i, state.locale)))
            })
            .collect();

        store.set_locale("ru_RU");

        assert_eq!(
            *log.borrow(),
            vec![
                (0, LanguageTag::RuRu),
                (1, LanguageTag::RuRu),
                (2, LanguageTag::RuRu)
            ]
        );
        drop(subs);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let store = LocaleStore::new(LanguageTag::EnUs);
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        let sub = store.subscribe(move |_| c.set(c.get() + 1));

        store.dispatch(Action::SwitchToRussian);
        sub.unsubscribe();
        store.dispatch(Action::SwitchToEnglish);

        assert_eq!(calls.get(), 1);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_dropped_subscription_is_removed() {
        let store = LocaleStore::new(LanguageTag::EnUs);
        {
            let _sub = store.subscribe(|_| {});
            assert_eq!(store.subscriber_count(), 1);
        }
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_same_locale_keeps_state_reference() {
        let store = LocaleStore::new(LanguageTag::EnUs);
        let before = store.state();
        assert!(store.dispatch(Action::SwitchToEnglish));
        assert!(Rc::ptr_eq(&before, &store.state()));

        store.dispatch(Action::SwitchToRussian);
        assert!(!Rc::ptr_eq(&before, &store.state()));
    }

    #[test]
    fn test_reentrant_dispatch_is_rejected() {
        let store = LocaleStore::new(LanguageTag::EnUs);
        let handle = store.clone();
        let accepted = Rc::new(Cell::new(true));
        let a = accepted.clone();
        let _sub = store.subscribe(move |_| a.set(handle.dispatch(Action::SwitchToEnglish)));

        store.dispatch(Action::SwitchToRussian);

        assert!(!accepted.get());
        assert_eq!(store.tag(), LanguageTag::RuRu);
    }

    #[test]
    fn test_persisted_locale_survives_restart() {
        let memory = MemoryStore::new();

        let store = LocaleStore::with_storage(Box::new(memory.clone()), LanguageTag::EnUs);
        assert_eq!(store.tag(), LanguageTag::EnUs);
        store.set_locale("ru_RU");
        drop(store);

        let restarted = LocaleStore::with_storage(Box::new(memory), LanguageTag::EnUs);
        assert_eq!(restarted.get_locale(), table(LanguageTag::RuRu));
    }

    #[test]
    fn test_stale_version_reinitializes_default() {
        let mut memory = MemoryStore::new();
        let mut record = toml::Table::new();
        record.insert("locale".into(), toml::Value::String("en_US".into()));
        record.insert("version".into(), toml::Value::Integer(0));
        memory
            .set(storage::LOCALE_KEY, toml::Value::Table(record))
            .unwrap();

        let store = LocaleStore::with_storage(Box::new(memory.clone()), LanguageTag::EnUs);
        assert_eq!(store.get_locale(), table(LanguageTag::EnUs));

        let saved: storage::PersistedLocale = memory
            .get(storage::LOCALE_KEY)
            .unwrap()
            .unwrap()
            .try_into()
            .unwrap();
        assert_eq!(saved.version, Some(crate::i18n::LOCALE_TABLE_VERSION));
    }

    #[test]
    fn test_failed_persist_still_transitions() {
        let store = LocaleStore::with_storage(Box::new(ReadOnlyStore), LanguageTag::EnUs);
        assert_eq!(store.tag(), LanguageTag::EnUs);

        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        let _sub = store.subscribe(move |_| c.set(c.get() + 1));

        assert!(store.dispatch(Action::SwitchToRussian));
        assert_eq!(store.get_locale(), table(LanguageTag::RuRu));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_hyphenated_tag_is_noop() {
        let store = LocaleStore::new(LanguageTag::EnUs);
        store.set_locale("ru-RU");
        store.set_locale(" ru_RU ");
        assert_eq!(store.tag(), LanguageTag::EnUs);
    }
}
