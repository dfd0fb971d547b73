#![forbid(unsafe_code)]

//! Capability a text input control offers to the binding layer.
//!
//! The host toolkit owns the actual widget; bindkit only needs to read and
//! write the displayed text and to hear about user edits.

/// Handler invoked with the control's text after each user edit.
pub type UserEditHandler = Box<dyn FnMut(&str)>;

/// A text input control that can take part in a two-way binding.
pub trait TextControl {
    /// Text currently shown by the control.
    fn displayed_text(&self) -> String;

    /// Overwrite the shown text. Must not count as a user edit: the user-edit
    /// handler is not invoked.
    fn set_displayed_text(&mut self, text: &str);

    /// Install the handler invoked after each user edit, replacing any
    /// previous one.
    fn on_user_edit(&mut self, handler: UserEditHandler);

    /// Remove the user-edit handler.
    fn clear_user_edit_handler(&mut self);
}
