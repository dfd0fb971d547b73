#![forbid(unsafe_code)]

//! Library half of the bindkit demo, so the wiring can be tested without a
//! real clock.

pub mod app;
pub mod cli;

pub use app::{DemoApp, ReminderBook, Reminders, User};
pub use cli::Opts;
