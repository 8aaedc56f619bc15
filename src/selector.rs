//! Memoized projections of store state and the binding that keeps a view's
//! strings in step with the store.

use log::trace;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::i18n::LocaleTable;
use crate::store::{LocaleState, LocaleStore, Subscription};

/// Caches the last `(input, output)` pair. Calling it again with the same
/// input `Rc` hands back the same output `Rc` without recomputing.
pub struct Selector<S, R> {
    project: Box<dyn Fn(&S) -> R>,
    last: RefCell<Option<(Rc<S>, Rc<R>)>>,
    recomputations: Cell<usize>,
}

impl<S, R> Selector<S, R> {
    pub fn new(project: impl Fn(&S) -> R + 'static) -> Self {
        Self {
            project: Box::new(project),
            last: RefCell::new(None),
            recomputations: Cell::new(0),
        }
    }

    pub fn select(&self, input: &Rc<S>) -> Rc<R> {
        if let Some((cached_in, cached_out)) = self.last.borrow().as_ref() {
            if Rc::ptr_eq(cached_in, input) {
                return Rc::clone(cached_out);
            }
        }

        let output = Rc::new((self.project)(&**input));
        self.recomputations.set(self.recomputations.get() + 1);
        *self.last.borrow_mut() = Some((Rc::clone(input), Rc::clone(&output)));
        output
    }

    pub fn recomputations(&self) -> usize {
        self.recomputations.get()
    }
}

pub fn select_locale(state: &LocaleState) -> &'static LocaleTable {
    state.locale.table()
}

pub fn locale_selector() -> Selector<LocaleState, &'static LocaleTable> {
    Selector::new(select_locale)
}

/// Gives a view the current [`LocaleTable`] and re-derives it on every store
/// notification. Derivations only happen when the state actually changed.
pub struct LocaleBinding {
    current: Rc<RefCell<Rc<&'static LocaleTable>>>,
    selector: Rc<Selector<LocaleState, &'static LocaleTable>>,
    _subscription: Subscription,
}

impl LocaleBinding {
    pub fn new(store: &LocaleStore) -> Self {
        let selector = Rc::new(locale_selector());
        let current = Rc::new(RefCell::new(selector.select(&store.state())));

        let sel = Rc::clone(&selector);
        let slot = Rc::clone(&current);
        let subscription = store.subscribe(move |state| {
            let table = sel.select(state);
            trace!("Locale binding refreshed to {}", table.tag);
            *slot.borrow_mut() = table;
        });

        Self {
            current,
            selector,
            _subscription: subscription,
        }
    }

    pub fn current(&self) -> &'static LocaleTable {
        **self.current.borrow()
    }

    /// Number of times the table was derived (initial bind included).
    pub fn renders(&self) -> usize {
        self.selector.recomputations()
    }
}
