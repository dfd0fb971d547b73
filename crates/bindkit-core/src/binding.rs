#![forbid(unsafe_code)]

//! Two-way binding between a [`TextControl`] and an
//! [`ObservableValue<String>`].
//!
//! # Invariants
//!
//! 1. Right after [`bind_text`], the control shows the observable's value.
//! 2. A user edit reaches the model through
//!    [`set_from_binding`](ObservableValue::set_from_binding), so it never
//!    comes back to the control.
//! 3. A notifying [`set`](ObservableValue::set) overwrites the control text.
//! 4. Neither side keeps the other alive: the control holds a
//!    [`WeakObservable`](crate::WeakObservable) and the observable's callback
//!    holds a weak control handle.
//!
//! The observable has a single change callback, so binding a second control
//! to the same observable takes over the outbound direction. Likewise a
//! control has one edit handler: rebinding it to another observable leaves
//! the earlier observable unable to write into it.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use crate::control::TextControl;
use crate::observable::{ObservableValue, WeakObservable};

/// Handle describing one control ↔ observable binding.
///
/// Each direction's flag is owned by the callback it guards; the handle only
/// holds weak references, so a replaced callback shows up as a dead flag.
/// Dropping the handle leaves the binding in place; call
/// [`unbind`](Self::unbind) to detach it.
pub struct TextBinding {
    control: Weak<RefCell<dyn TextControl>>,
    observable: WeakObservable<String>,
    outbound: Weak<Cell<bool>>,
    inbound: Weak<Cell<bool>>,
}

impl fmt::Debug for TextBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextBinding")
            .field("control_alive", &(self.control.strong_count() > 0))
            .field("observable_alive", &self.observable.is_alive())
            .field("active", &self.is_active())
            .finish()
    }
}

/// Wire `control` to `observable` in both directions.
pub fn bind_text<C>(control: &Rc<RefCell<C>>, observable: &ObservableValue<String>) -> TextBinding
where
    C: TextControl + 'static,
{
    let inbound = Rc::new(Cell::new(true));
    let inbound_flag = Rc::downgrade(&inbound);

    {
        let mut c = control.borrow_mut();
        observable.with(|value| c.set_displayed_text(value));

        let weak_obs = observable.downgrade();
        c.on_user_edit(Box::new(move |text: &str| {
            if !inbound.get() {
                return;
            }
            if let Some(obs) = weak_obs.upgrade() {
                obs.set_from_binding(text.to_owned());
            }
        }));
    }

    let weak_control: Weak<RefCell<C>> = Rc::downgrade(control);
    let weak_control: Weak<RefCell<dyn TextControl>> = weak_control;
    let target = weak_control.clone();
    let paired = inbound_flag.clone();
    let outbound = Rc::new(Cell::new(true));
    let outbound_flag = Rc::downgrade(&outbound);
    observable.set_on_change(move |value: &String| {
        if !outbound.get() {
            return;
        }
        // The control was rebound elsewhere; it no longer mirrors this value.
        if paired.strong_count() == 0 {
            return;
        }
        let Some(control) = target.upgrade() else {
            return;
        };
        match control.try_borrow_mut() {
            Ok(mut c) => c.set_displayed_text(value),
            Err(_) => warn!("bound control is mid-edit; display not refreshed"),
        };
    });

    debug!(
        initial_len = observable.with(String::len),
        "text binding attached"
    );

    TextBinding {
        control: weak_control,
        observable: observable.downgrade(),
        outbound: outbound_flag,
        inbound: inbound_flag,
    }
}

impl TextBinding {
    /// True while both ends are alive and both of this binding's callbacks
    /// are still installed.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.control.strong_count() > 0
            && self.observable.is_alive()
            && self.outbound.upgrade().is_some_and(|flag| flag.get())
            && self.inbound.upgrade().is_some_and(|flag| flag.get())
    }

    /// Detach both directions.
    ///
    /// Callbacks that were already replaced by a later binding are left
    /// untouched.
    pub fn unbind(self) {
        if let Some(flag) = self.outbound.upgrade() {
            flag.set(false);
            if let Some(obs) = self.observable.upgrade() {
                obs.clear_on_change();
            }
        }
        if let Some(flag) = self.inbound.upgrade() {
            flag.set(false);
            if let Some(control) = self.control.upgrade()
                && let Ok(mut c) = control.try_borrow_mut()
            {
                c.clear_user_edit_handler();
            }
        }
        debug!("text binding detached");
    }
}
