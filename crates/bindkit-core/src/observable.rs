#![forbid(unsafe_code)]

//! Observable value with a notifying setter and a silent setter.
//!
//! # Design
//!
//! [`ObservableValue<T>`] wraps a value of type `T` in shared,
//! reference-counted storage (`Rc<RefCell<..>>`). It exposes two mutation
//! paths:
//!
//! - [`set`](ObservableValue::set) stores the value and then invokes the
//!   change callback plus any live subscribers. This is the outbound path.
//! - [`set_from_binding`](ObservableValue::set_from_binding) stores the value
//!   and notifies nobody. This is the inbound path a bound control uses for
//!   its own edits, so the edit never bounces back into the control.
//!
//! The change callback is single-subscriber: assigning a new one replaces the
//! old one. Additional observers can attach through
//! [`subscribe`](ObservableValue::subscribe), which hands back an RAII
//! [`Subscription`].
//!
//! # Performance
//!
//! | Operation            | Complexity                 |
//! |----------------------|----------------------------|
//! | `get()`              | O(1) + clone of `T`        |
//! | `set()`              | O(S) where S = subscribers |
//! | `set_from_binding()` | O(1)                       |
//! | `subscribe()`        | O(1) amortized             |
//!
//! # Failure Modes
//!
//! - **Mutation inside `with`**: calling `set`, `set_from_binding`, or
//!   `update` from the closure passed to [`with`](ObservableValue::with)
//!   panics (RefCell borrow rules). The closure holds a shared borrow of the
//!   value for its whole duration.
//! - **Re-entrant set**: callbacks are cloned out of the shared cell before
//!   they run, so a callback may read the value, reassign the change
//!   callback, or call `set_from_binding` on the same observable. A callback
//!   that calls `set` on its own observable recurses without bound; that is
//!   a bug in the callback graph.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace;

type ChangeFn<T> = Rc<dyn Fn(&T)>;
type CallbackWeak<T> = Weak<dyn Fn(&T)>;

struct ObservableInner<T> {
    value: T,
    version: u64,
    on_change: Option<ChangeFn<T>>,
    /// Subscribers stored as weak references. Dead entries are pruned on notify.
    subscribers: Vec<CallbackWeak<T>>,
}

/// A shared value that notifies its change callback on every notifying set.
///
/// Cloning an `ObservableValue` creates a new handle to the **same** state.
/// The owning domain object normally keeps the only strong handle and gives
/// controls a [`WeakObservable`].
///
/// # Invariants
///
/// 1. The change callback runs exactly once per [`set`](Self::set), after the
///    value has been stored, with the new value.
/// 2. [`set_from_binding`](Self::set_from_binding) never runs any callback.
/// 3. `version` increments by exactly 1 on every mutation, on either path.
/// 4. Subscribers run after the change callback, in registration order.
pub struct ObservableValue<T> {
    inner: Rc<RefCell<ObservableInner<T>>>,
}

impl<T> Clone for ObservableValue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservableValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ObservableValue")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("has_on_change", &inner.on_change.is_some())
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}

impl<T: Default + Clone + 'static> Default for ObservableValue<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + 'static> ObservableValue<T> {
    /// Create a new observable with the given initial value.
    ///
    /// The initial version is 0 and the change callback is a no-op.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObservableInner {
                value,
                version: 0,
                on_change: None,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Get a clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Access the current value by reference without cloning.
    ///
    /// # Panics
    ///
    /// Panics if `f` mutates this observable.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Store a new value, then run the change callback and every live
    /// subscriber with it.
    ///
    /// There is no equality check: setting the current value again still
    /// notifies.
    pub fn set(&self, value: T) {
        let version = {
            let mut inner = self.inner.borrow_mut();
            inner.value = value;
            inner.version += 1;
            inner.version
        };
        trace!(version, "observable set");
        self.notify();
    }

    /// Store a new value without running any callback.
    ///
    /// Used by a bound control to push the user's edit into the model without
    /// the model pushing it straight back into the control.
    pub fn set_from_binding(&self, value: T) {
        let mut inner = self.inner.borrow_mut();
        inner.value = value;
        inner.version += 1;
        trace!(version = inner.version, "observable set from binding");
    }

    /// Modify the value in place through the notifying path.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        {
            let mut inner = self.inner.borrow_mut();
            f(&mut inner.value);
            inner.version += 1;
        }
        self.notify();
    }

    /// Replace the change callback. The previous callback is dropped and will
    /// not run again.
    pub fn set_on_change(&self, callback: impl Fn(&T) + 'static) {
        self.inner.borrow_mut().on_change = Some(Rc::new(callback));
    }

    /// Restore the no-op change callback.
    pub fn clear_on_change(&self) {
        self.inner.borrow_mut().on_change = None;
    }

    /// True when a change callback other than the default no-op is installed.
    #[must_use]
    pub fn has_on_change(&self) -> bool {
        self.inner.borrow().on_change.is_some()
    }

    /// Subscribe an additional observer. It runs after the change callback on
    /// every notifying set.
    ///
    /// Dropping the returned [`Subscription`] unsubscribes the callback (it
    /// may linger in the list until the next notify prunes it).
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: ChangeFn<T> = Rc::new(callback);
        let weak = Rc::downgrade(&strong);
        self.inner.borrow_mut().subscribers.push(weak);
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Number of mutations applied so far, on either path.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of registered subscribers, including dead ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Create a non-owning handle to this observable.
    #[must_use]
    pub fn downgrade(&self) -> WeakObservable<T> {
        WeakObservable {
            inner: Rc::downgrade(&self.inner),
        }
    }

    fn notify(&self) {
        // Clone everything out so no borrow is held while user code runs.
        let (value, on_change, callbacks) = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|w| w.strong_count() > 0);
            let callbacks: Vec<ChangeFn<T>> = inner
                .subscribers
                .iter()
                .filter_map(|w| w.upgrade())
                .collect();
            (inner.value.clone(), inner.on_change.clone(), callbacks)
        };

        if let Some(cb) = on_change {
            cb(&value);
        }
        for cb in &callbacks {
            cb(&value);
        }
    }
}

/// Non-owning handle to an [`ObservableValue`].
///
/// A bound control keeps one of these so the binding never extends the
/// lifetime of the model it mirrors.
pub struct WeakObservable<T> {
    inner: Weak<RefCell<ObservableInner<T>>>,
}

impl<T> Clone for WeakObservable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for WeakObservable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakObservable")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl<T> WeakObservable<T> {
    /// Recover a strong handle if the observable is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<ObservableValue<T>> {
        self.inner.upgrade().map(|inner| ObservableValue { inner })
    }

    /// True while some owner still holds the observable.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

/// RAII guard for a subscriber callback.
///
/// Dropping the `Subscription` drops the only strong reference to the
/// callback, so the weak entry in the observable fails to upgrade on the next
/// notification.
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
