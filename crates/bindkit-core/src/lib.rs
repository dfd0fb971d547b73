#![forbid(unsafe_code)]

//! Core: observable values, two-way text bindings, optional collaborators.
//!
//! # Role in bindkit
//! `bindkit-core` owns the model side of a binding. It knows nothing about
//! any concrete widget or event loop: controls plug in through
//! [`TextControl`], and deferred work lives in `bindkit-runtime`.
//!
//! # Primary responsibilities
//! - **ObservableValue**: a shared value with a notifying setter and a silent
//!   setter.
//! - **bind_text**: keeps a text control and an `ObservableValue<String>`
//!   equal without a feedback loop.
//! - **Calendar**: optional delegate / data-source collaborators with
//!   default policies.
//!
//! # Example
//!
//! ```
//! use bindkit_core::ObservableValue;
//!
//! let name = ObservableValue::new("Samantha Gatt".to_string());
//! name.set_on_change(|v| println!("renamed to {v}"));
//! name.set("Sammie".to_string());
//! assert_eq!(name.get(), "Sammie");
//! ```

pub mod binding;
pub mod calendar;
pub mod control;
pub mod observable;

pub use binding::{TextBinding, bind_text};
pub use calendar::{Calendar, CalendarDataSource, CalendarDelegate};
pub use control::{TextControl, UserEditHandler};
pub use observable::{ObservableValue, Subscription, WeakObservable};
