//! A `TextField` bound to an observable, driven by edit sequences.

use bindkit_core::{ObservableValue, TextControl, bind_text};
use bindkit_widgets::{Edit, TextField};
use proptest::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn bound_field(initial: &str) -> (Rc<RefCell<TextField>>, ObservableValue<String>) {
    let field = Rc::new(RefCell::new(TextField::new().with_placeholder("name")));
    let name = ObservableValue::new(initial.to_string());
    let _ = bind_text(&field, &name);
    (field, name)
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        4 => proptest::char::range('a', 'z').prop_map(Edit::Insert),
        1 => "[a-z ]{0,4}".prop_map(Edit::Paste),
        2 => Just(Edit::Backspace),
        1 => Just(Edit::Delete),
        1 => Just(Edit::Left),
        1 => Just(Edit::Right),
        1 => Just(Edit::Home),
        1 => Just(Edit::End),
        1 => Just(Edit::Clear),
    ]
}

#[test]
fn field_shows_model_after_bind_and_rename() {
    let (field, name) = bound_field("Samantha Gatt");
    assert_eq!(field.borrow().text(), "Samantha Gatt");

    name.set("Sammie".to_string());
    assert_eq!(field.borrow().text(), "Sammie");
    assert_eq!(field.borrow().render_line(8), "Sammie  ");
}

#[test]
fn typing_reaches_model_without_notifying() {
    let (field, name) = bound_field("X");
    let notified = Rc::new(Cell::new(0u32));
    let n = Rc::clone(&notified);
    let _sub = name.subscribe(move |_| n.set(n.get() + 1));

    {
        let mut f = field.borrow_mut();
        f.handle_edit(Edit::Backspace);
        f.handle_edit(Edit::Insert('Y'));
    }

    assert_eq!(name.get(), "Y");
    assert_eq!(notified.get(), 0);
    assert_eq!(name.version(), 2);
}

#[test]
fn clearing_field_empties_model() {
    let (field, name) = bound_field("Sammie");
    field.borrow_mut().handle_edit(Edit::Clear);
    assert_eq!(name.get(), "");
    assert_eq!(field.borrow().render_line(4), "name");
}

proptest! {
    #[test]
    fn edits_and_renames_stay_synced(
        initial in "[a-z]{0,8}",
        edits in proptest::collection::vec(edit_strategy(), 0..30),
        rename_every in 1usize..8,
    ) {
        let (field, name) = bound_field(&initial);
        for (i, edit) in edits.into_iter().enumerate() {
            field.borrow_mut().handle_edit(edit);
            prop_assert_eq!(field.borrow().displayed_text(), name.get());

            if i % rename_every == 0 {
                name.set(format!("renamed{i}"));
                prop_assert_eq!(field.borrow().text().to_string(), name.get());
            }
        }
    }

    #[test]
    fn each_text_change_is_one_model_write(
        edits in proptest::collection::vec(edit_strategy(), 0..30),
    ) {
        let (field, name) = bound_field("seed");
        let mut expected_version = name.version();
        for edit in edits {
            let changed = field.borrow_mut().handle_edit(edit);
            if changed {
                expected_version += 1;
            }
            prop_assert_eq!(name.version(), expected_version);
        }
    }
}
