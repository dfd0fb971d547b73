#![forbid(unsafe_code)]

//! Deferred zero-argument callbacks on the calling thread.
//!
//! # Design
//!
//! Both schedulers share a timer queue keyed by `(deadline, sequence)`,
//! so callbacks fire in deadline order and, for equal deadlines, in the
//! order they were scheduled. Deadlines are offsets from the scheduler's own
//! origin, which lets the virtual clock and the wall clock share one queue
//! type.
//!
//! - [`VirtualScheduler`]: time only moves when a test calls
//!   [`advance`](VirtualScheduler::advance).
//! - [`MainLoop`]: deadlines are measured against `Instant::now()` and the
//!   loop sleeps on the calling thread between them.
//!
//! There is no cancellation and no retry. A callback may schedule further
//! callbacks through a cloned scheduler handle.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::config::RuntimeConfig;

/// A deferred callback.
pub type Callback = Box<dyn FnOnce()>;

/// Capability to run a callback after a fixed delay on the same thread.
pub trait Scheduler {
    /// Run `callback` once, no earlier than `delay` from now.
    fn after(&self, delay: Duration, callback: Callback);
}

/// Pending callbacks ordered by deadline, FIFO among equal deadlines.
#[derive(Default)]
pub(crate) struct TimerQueue {
    next_seq: u64,
    entries: BTreeMap<(Duration, u64), Callback>,
}

impl TimerQueue {
    fn push(&mut self, deadline: Duration, callback: Callback) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert((deadline, seq), callback);
    }

    /// Remove and return the earliest entry due at or before `now`.
    fn pop_due(&mut self, now: Duration) -> Option<(Duration, Callback)> {
        let (&(deadline, _), _) = self.entries.first_key_value()?;
        if deadline > now {
            return None;
        }
        self.entries
            .pop_first()
            .map(|((deadline, _), callback)| (deadline, callback))
    }

    fn next_deadline(&self) -> Option<Duration> {
        self.entries.keys().next().map(|&(deadline, _)| deadline)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Deterministic scheduler driven by an explicit virtual clock.
///
/// Cloning yields another handle to the same clock and queue.
#[derive(Clone, Default)]
pub struct VirtualScheduler {
    queue: Rc<RefCell<TimerQueue>>,
    now: Rc<Cell<Duration>>,
}

impl fmt::Debug for VirtualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualScheduler")
            .field("now", &self.now.get())
            .field("pending", &self.pending())
            .finish()
    }
}

impl VirtualScheduler {
    /// Scheduler with the clock at zero and nothing pending.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    /// Number of callbacks not yet fired.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Deadline of the next callback, as an offset from creation.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.borrow().next_deadline()
    }

    /// Move the clock forward by `by`, firing every callback that falls due.
    ///
    /// While a callback runs, [`now`](Self::now) reads as that callback's
    /// deadline, so callbacks scheduled from inside it are timed relative to
    /// it and fire in this same call if they land inside the window.
    /// Returns the number of callbacks fired.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now.get().saturating_add(by);
        let mut fired = 0;
        loop {
            // Release the queue borrow before running user code.
            let due = self.queue.borrow_mut().pop_due(target);
            let Some((deadline, callback)) = due else {
                break;
            };
            self.now.set(deadline);
            trace!(deadline_ms = deadline.as_millis() as u64, "virtual timer fired");
            callback();
            fired += 1;
        }
        self.now.set(target);
        fired
    }

    /// Advance straight to the last pending deadline, draining the queue.
    ///
    /// Callbacks that keep rescheduling themselves make this loop forever.
    pub fn run_until_idle(&self) -> usize {
        let mut fired = 0;
        while let Some(deadline) = self.next_deadline() {
            let by = deadline.saturating_sub(self.now.get());
            fired += self.advance(by);
        }
        fired
    }
}

impl Scheduler for VirtualScheduler {
    fn after(&self, delay: Duration, callback: Callback) {
        let deadline = self.now.get().saturating_add(delay);
        self.queue.borrow_mut().push(deadline, callback);
    }
}

/// Wall-clock scheduler that runs callbacks on the thread driving it.
#[derive(Clone)]
pub struct MainLoop {
    queue: Rc<RefCell<TimerQueue>>,
    origin: Instant,
    config: RuntimeConfig,
}

impl fmt::Debug for MainLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MainLoop")
            .field("elapsed", &self.origin.elapsed())
            .field("pending", &self.pending())
            .field("config", &self.config)
            .finish()
    }
}

impl Default for MainLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl MainLoop {
    /// Main loop with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    /// Main loop with explicit configuration.
    #[must_use]
    pub fn with_config(config: RuntimeConfig) -> Self {
        Self {
            queue: Rc::new(RefCell::new(TimerQueue::default())),
            origin: Instant::now(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Number of callbacks not yet fired.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Fire every callback due at `now`. Returns the number fired.
    pub fn run_pending_at(&self, now: Instant) -> usize {
        let elapsed = now.saturating_duration_since(self.origin);
        let mut fired = 0;
        loop {
            let due = self.queue.borrow_mut().pop_due(elapsed);
            let Some((deadline, callback)) = due else {
                break;
            };
            trace!(deadline_ms = deadline.as_millis() as u64, "timer fired");
            callback();
            fired += 1;
        }
        fired
    }

    /// Sleep and fire callbacks until nothing is pending.
    ///
    /// Sleeps are capped at the configured poll slice. When a maximum run
    /// time is configured the loop gives up once it is exceeded, leaving the
    /// remaining callbacks queued. Returns the number of callbacks fired.
    pub fn run_until_idle(&self) -> usize {
        let started = Instant::now();
        let mut fired = 0;
        loop {
            let Some(deadline) = self.queue.borrow().next_deadline() else {
                break;
            };
            if let Some(max_run) = self.config.max_run
                && started.elapsed() >= max_run
            {
                debug!(pending = self.pending(), "main loop hit max run time");
                break;
            }
            let elapsed = self.origin.elapsed();
            if deadline > elapsed {
                std::thread::sleep((deadline - elapsed).min(self.config.poll_slice));
            }
            fired += self.run_pending_at(Instant::now());
        }
        debug!(fired, "main loop idle");
        fired
    }
}

impl Scheduler for MainLoop {
    fn after(&self, delay: Duration, callback: Callback) {
        let deadline = self.origin.elapsed().saturating_add(delay);
        self.queue.borrow_mut().push(deadline, callback);
    }
}
