#![forbid(unsafe_code)]

//! Runtime: deferred callbacks on a single execution context.
//!
//! # Role in bindkit
//! Bindings in `bindkit-core` are synchronous. The only deferred work is a
//! one-shot "run this after a delay" request, expressed through the
//! [`Scheduler`] capability. Tests drive a [`VirtualScheduler`]; binaries
//! drive a [`MainLoop`].
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use bindkit_core::ObservableValue;
//! use bindkit_runtime::{Scheduler, VirtualScheduler};
//!
//! let name = ObservableValue::new("Samantha Gatt".to_string());
//! let sched = VirtualScheduler::new();
//! let target = name.clone();
//! sched.after(Duration::from_secs(2), Box::new(move || target.set("Sammie".into())));
//!
//! sched.advance(Duration::from_secs(2));
//! assert_eq!(name.get(), "Sammie");
//! ```

pub mod config;
pub mod scheduler;

pub use config::{ConfigError, RuntimeConfig, RuntimeConfigParse};
pub use scheduler::{Callback, MainLoop, Scheduler, VirtualScheduler};
