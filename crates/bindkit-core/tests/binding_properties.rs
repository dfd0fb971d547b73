//! Property tests for the two-way text binding.
//!
//! 1. After every notifying set, the control shows the new value.
//! 2. After every user edit, the model holds the edited text and no
//!    notification fired.
//! 3. A user edit is exactly one propagation step.
//! 4. Only the most recently assigned change callback fires.
//! 5. Any interleaving of model sets and user edits ends synced.

use bindkit_core::{ObservableValue, TextControl, UserEditHandler, bind_text};
use proptest::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Default)]
struct ScriptedControl {
    text: String,
    display_writes: usize,
    handler: Option<UserEditHandler>,
}

impl ScriptedControl {
    fn user_types(&mut self, text: &str) {
        self.text = text.to_owned();
        if let Some(handler) = self.handler.as_mut() {
            handler(&self.text);
        }
    }
}

impl TextControl for ScriptedControl {
    fn displayed_text(&self) -> String {
        self.text.clone()
    }

    fn set_displayed_text(&mut self, text: &str) {
        self.text = text.to_owned();
        self.display_writes += 1;
    }

    fn on_user_edit(&mut self, handler: UserEditHandler) {
        self.handler = Some(handler);
    }

    fn clear_user_edit_handler(&mut self) {
        self.handler = None;
    }
}

#[derive(Debug, Clone)]
enum Step {
    ModelSet(String),
    UserEdit(String),
}

fn text_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 éü你]{0,12}"
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        text_strategy().prop_map(Step::ModelSet),
        text_strategy().prop_map(Step::UserEdit),
    ]
}

fn bound(initial: &str) -> (Rc<RefCell<ScriptedControl>>, ObservableValue<String>) {
    let control = Rc::new(RefCell::new(ScriptedControl::default()));
    let obs = ObservableValue::new(initial.to_string());
    // The binding stays attached after its handle is dropped.
    let _ = bind_text(&control, &obs);
    (control, obs)
}

proptest! {
    #[test]
    fn control_follows_every_model_set(
        initial in text_strategy(),
        values in proptest::collection::vec(text_strategy(), 1..20),
    ) {
        let (control, obs) = bound(&initial);
        for v in &values {
            obs.set(v.clone());
            prop_assert_eq!(&control.borrow().displayed_text(), v);
        }
    }

    #[test]
    fn model_follows_every_user_edit_silently(
        initial in text_strategy(),
        edits in proptest::collection::vec(text_strategy(), 1..20),
    ) {
        let (control, obs) = bound(&initial);
        let notified = Rc::new(Cell::new(0u32));
        let n = Rc::clone(&notified);
        let _sub = obs.subscribe(move |_| n.set(n.get() + 1));

        for e in &edits {
            control.borrow_mut().user_types(e);
            prop_assert_eq!(&obs.get(), e);
        }
        prop_assert_eq!(notified.get(), 0);
    }

    #[test]
    fn user_edit_is_a_single_step(
        initial in text_strategy(),
        edit in text_strategy(),
    ) {
        let (control, obs) = bound(&initial);
        let version = obs.version();
        let writes = control.borrow().display_writes;

        control.borrow_mut().user_types(&edit);

        prop_assert_eq!(obs.version(), version + 1);
        prop_assert_eq!(control.borrow().display_writes, writes);
    }

    #[test]
    fn mixed_steps_stay_synced(
        initial in text_strategy(),
        steps in proptest::collection::vec(step_strategy(), 0..40),
    ) {
        let (control, obs) = bound(&initial);
        for step in &steps {
            match step {
                Step::ModelSet(v) => obs.set(v.clone()),
                Step::UserEdit(v) => control.borrow_mut().user_types(v),
            }
            prop_assert_eq!(control.borrow().displayed_text(), obs.get());
        }
    }

    #[test]
    fn last_change_callback_wins(
        values in proptest::collection::vec(any::<i64>(), 1..10),
    ) {
        let obs = ObservableValue::new(0i64);
        let first = Rc::new(Cell::new(0usize));
        let second = Rc::new(Cell::new(0usize));
        let a = Rc::clone(&first);
        let b = Rc::clone(&second);
        obs.set_on_change(move |_| a.set(a.get() + 1));
        obs.set_on_change(move |_| b.set(b.get() + 1));

        for v in &values {
            obs.set(*v);
        }
        prop_assert_eq!(first.get(), 0);
        prop_assert_eq!(second.get(), values.len());
    }
}

#[test]
fn scenario_rename_after_bind() {
    let (control, obs) = bound("Samantha Gatt");
    assert_eq!(control.borrow().displayed_text(), "Samantha Gatt");
    obs.set("Sammie".to_string());
    assert_eq!(control.borrow().displayed_text(), "Sammie");
}

#[test]
fn scenario_user_types_over_initial_value() {
    let (control, obs) = bound("X");
    let calls = Rc::new(Cell::new(0u32));
    let c = Rc::clone(&calls);
    let _sub = obs.subscribe(move |_| c.set(c.get() + 1));

    control.borrow_mut().user_types("Y");
    assert_eq!(obs.get(), "Y");
    assert_eq!(calls.get(), 0);
}
