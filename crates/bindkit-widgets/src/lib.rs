#![forbid(unsafe_code)]

//! Bindable input controls.
//!
//! Controls here implement [`bindkit_core::TextControl`], so they can be
//! handed to [`bindkit_core::bind_text`] behind an `Rc<RefCell<..>>`.

pub mod text_field;

pub use text_field::{Edit, TextField};
