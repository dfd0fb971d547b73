#![forbid(unsafe_code)]

//! Single-line editable text field.
//!
//! [`TextField`] keeps its text and a grapheme-based cursor, and implements
//! [`TextControl`] so it can be bound to an
//! [`ObservableValue<String>`](bindkit_core::ObservableValue).
//!
//! Editing operations that change the text count as user edits and invoke the
//! installed edit handler once each. Cursor movement and
//! [`set_displayed_text`](TextControl::set_displayed_text) do not.
//!
//! # Example
//! ```
//! use bindkit_widgets::TextField;
//!
//! let mut field = TextField::new().with_text("Sam");
//! field.insert_text("mie");
//! assert_eq!(field.text(), "Sammie");
//! ```

use std::fmt;

use bindkit_core::{TextControl, UserEditHandler};
use tracing::trace;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// An editing action, as a host toolkit would deliver it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Insert(char),
    Paste(String),
    Backspace,
    Delete,
    Clear,
    Left,
    Right,
    Home,
    End,
}

/// Single-line text input.
#[derive(Default)]
pub struct TextField {
    text: String,
    /// Cursor position in graphemes, `0..=grapheme_count`.
    cursor: usize,
    /// Placeholder shown when empty.
    placeholder: String,
    edit_handler: Option<UserEditHandler>,
}

impl fmt::Debug for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextField")
            .field("text", &self.text)
            .field("cursor", &self.cursor)
            .field("placeholder", &self.placeholder)
            .field("has_edit_handler", &self.edit_handler.is_some())
            .finish()
    }
}

impl TextField {
    /// Create an empty text field.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial text, cursor at the end.
    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.replace_text(text);
        self
    }

    #[must_use]
    pub fn with_placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = text.into();
        self
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor position in graphemes.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn grapheme_count(&self) -> usize {
        self.text.graphemes(true).count()
    }

    /// Byte offset of the grapheme at `index` (or the end of the text).
    fn byte_offset(&self, index: usize) -> usize {
        self.text
            .grapheme_indices(true)
            .nth(index)
            .map_or(self.text.len(), |(offset, _)| offset)
    }

    fn replace_text(&mut self, text: &str) {
        self.text = text.to_owned();
        self.cursor = self.grapheme_count();
    }

    /// Tell the handler the user changed the text.
    fn edited(&mut self) {
        trace!(len = self.text.len(), cursor = self.cursor, "text field edited");
        if let Some(handler) = self.edit_handler.as_mut() {
            handler(&self.text);
        }
    }

    // ── Event handling ─────────────────────────────────────────────

    /// Apply an editing action.
    ///
    /// Returns `true` if the text changed.
    pub fn handle_edit(&mut self, edit: Edit) -> bool {
        match edit {
            Edit::Insert(ch) => {
                let before = self.text.len();
                self.insert_char(ch);
                self.text.len() != before
            }
            Edit::Paste(text) => {
                let before = self.text.len();
                self.insert_text(&text);
                self.text.len() != before
            }
            Edit::Backspace => self.delete_backward(),
            Edit::Delete => self.delete_forward(),
            Edit::Clear => self.clear(),
            Edit::Left => {
                self.move_left();
                false
            }
            Edit::Right => {
                self.move_right();
                false
            }
            Edit::Home => {
                self.move_to_start();
                false
            }
            Edit::End => {
                self.move_to_end();
                false
            }
        }
    }

    // ── Editing operations ─────────────────────────────────────────

    /// Insert a single character at the cursor.
    pub fn insert_char(&mut self, ch: char) {
        let mut buf = [0u8; 4];
        self.insert_text(ch.encode_utf8(&mut buf));
    }

    /// Insert text at the cursor. Line breaks are dropped.
    pub fn insert_text(&mut self, text: &str) {
        let clean: String = text.chars().filter(|c| *c != '\n' && *c != '\r').collect();
        if clean.is_empty() {
            return;
        }
        let at = self.byte_offset(self.cursor);
        let before = self.grapheme_count();
        self.text.insert_str(at, &clean);
        // Inserted text can merge with a neighbouring grapheme, so measure
        // the growth instead of counting the inserted graphemes.
        let grown = self.grapheme_count().saturating_sub(before);
        self.cursor = (self.cursor + grown).min(self.grapheme_count());
        self.edited();
    }

    /// Delete the grapheme before the cursor (backspace).
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_backward(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let start = self.byte_offset(self.cursor - 1);
        let end = self.byte_offset(self.cursor);
        self.text.replace_range(start..end, "");
        self.cursor -= 1;
        self.edited();
        true
    }

    /// Delete the grapheme under the cursor (delete key).
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_forward(&mut self) -> bool {
        if self.cursor >= self.grapheme_count() {
            return false;
        }
        let start = self.byte_offset(self.cursor);
        let end = self.byte_offset(self.cursor + 1);
        self.text.replace_range(start..end, "");
        self.edited();
        true
    }

    /// Remove all text. Returns `true` if there was any.
    pub fn clear(&mut self) -> bool {
        if self.text.is_empty() {
            return false;
        }
        self.text.clear();
        self.cursor = 0;
        self.edited();
        true
    }

    // ── Navigation ─────────────────────────────────────────────────

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.grapheme_count());
    }

    pub fn move_to_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_to_end(&mut self) {
        self.cursor = self.grapheme_count();
    }

    // ── Rendering ──────────────────────────────────────────────────

    /// Render into exactly `width` display columns.
    ///
    /// Shows the placeholder when empty. Text wider than `width` is clipped
    /// on a grapheme boundary; wide graphemes that would straddle the edge
    /// are dropped and the line is padded with spaces.
    #[must_use]
    pub fn render_line(&self, width: usize) -> String {
        let source = if self.text.is_empty() {
            &self.placeholder
        } else {
            &self.text
        };
        let mut out = String::with_capacity(width);
        let mut used = 0usize;
        for grapheme in source.graphemes(true) {
            let w = grapheme.width();
            if used + w > width {
                break;
            }
            out.push_str(grapheme);
            used += w;
        }
        out.extend(std::iter::repeat_n(' ', width - used));
        out
    }
}

impl TextControl for TextField {
    fn displayed_text(&self) -> String {
        self.text.clone()
    }

    fn set_displayed_text(&mut self, text: &str) {
        self.replace_text(text);
    }

    fn on_user_edit(&mut self, handler: UserEditHandler) {
        self.edit_handler = Some(handler);
    }

    fn clear_user_edit_handler(&mut self) {
        self.edit_handler = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn with_log(field: &mut TextField) -> Rc<RefCell<Vec<String>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        field.on_user_edit(Box::new(move |text: &str| sink.borrow_mut().push(text.to_owned())));
        log
    }

    #[test]
    fn typing_appends_and_reports_each_edit() {
        let mut field = TextField::new();
        let log = with_log(&mut field);
        for ch in "Sam".chars() {
            assert!(field.handle_edit(Edit::Insert(ch)));
        }
        assert_eq!(field.text(), "Sam");
        assert_eq!(field.cursor(), 3);
        assert_eq!(*log.borrow(), vec!["S", "Sa", "Sam"]);
    }

    #[test]
    fn programmatic_text_is_not_an_edit() {
        let mut field = TextField::new();
        let log = with_log(&mut field);
        field.set_displayed_text("Sammie");
        assert_eq!(field.displayed_text(), "Sammie");
        assert_eq!(field.cursor(), 6);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn insert_in_middle() {
        let mut field = TextField::new().with_text("Smmie");
        field.move_to_start();
        field.move_right();
        field.insert_char('a');
        assert_eq!(field.text(), "Sammie");
        assert_eq!(field.cursor(), 2);
    }

    #[test]
    fn backspace_and_delete_are_grapheme_aware() {
        let mut field = TextField::new().with_text("ae\u{301}b");
        assert_eq!(field.grapheme_count(), 3);
        field.move_left();
        assert!(field.delete_backward());
        assert_eq!(field.text(), "ab");
        field.move_to_start();
        assert!(field.delete_forward());
        assert_eq!(field.text(), "b");
    }

    #[test]
    fn noop_edits_do_not_report() {
        let mut field = TextField::new();
        let log = with_log(&mut field);
        assert!(!field.handle_edit(Edit::Backspace));
        assert!(!field.handle_edit(Edit::Delete));
        assert!(!field.handle_edit(Edit::Clear));
        assert!(!field.handle_edit(Edit::Paste(String::new())));
        assert!(!field.handle_edit(Edit::Left));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn line_break_keystroke_is_not_an_edit() {
        let mut field = TextField::new().with_text("x");
        let log = with_log(&mut field);
        assert!(!field.handle_edit(Edit::Insert('\n')));
        assert!(!field.handle_edit(Edit::Insert('\r')));
        assert_eq!(field.text(), "x");
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn paste_strips_newlines() {
        let mut field = TextField::new();
        field.insert_text("Samantha\nGatt");
        assert_eq!(field.text(), "SamanthaGatt");
    }

    #[test]
    fn clear_resets_cursor() {
        let mut field = TextField::new().with_text("abc");
        let log = with_log(&mut field);
        assert!(field.handle_edit(Edit::Clear));
        assert_eq!(field.cursor(), 0);
        assert_eq!(*log.borrow(), vec![""]);
    }

    #[test]
    fn cleared_handler_is_silent() {
        let mut field = TextField::new();
        let log = with_log(&mut field);
        field.clear_user_edit_handler();
        field.insert_char('x');
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn render_pads_and_clips() {
        let field = TextField::new().with_text("Sammie");
        assert_eq!(field.render_line(8), "Sammie  ");
        assert_eq!(field.render_line(3), "Sam");
    }

    #[test]
    fn render_shows_placeholder_when_empty() {
        let field = TextField::new().with_placeholder("name");
        assert_eq!(field.render_line(6), "name  ");
    }

    #[test]
    fn render_drops_wide_grapheme_at_edge() {
        let field = TextField::new().with_text("a你好");
        assert_eq!(field.render_line(4), "a你 ");
    }
}
