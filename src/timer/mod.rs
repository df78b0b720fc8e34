// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Periodic timers for the kettle's heating and cooldown processes.
//!
//! The controller does not own a clock. It depends on a [`Scheduler`], the
//! host capability "call this function every N, cancelable":
//!
//! - [`TokioScheduler`] spawns an interval task on a tokio runtime
//! - [`ManualScheduler`] is driven explicitly by the host with
//!   [`ManualScheduler::advance`], for event loops without tokio and for
//!   deterministic tests
//!
//! [`PeriodicTimer`] wraps one scheduled task together with a generation
//! counter. A tick carries the generation it was started with, and the
//! controller drops ticks whose generation is no longer current. Together
//! with the controller lock this makes cancellation take effect at the
//! moment of the transition, even when a tick was already due.

mod manual;
mod tokio_scheduler;

pub use manual::ManualScheduler;
pub use tokio_scheduler::TokioScheduler;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Shortest period a task can be scheduled with.
///
/// Shorter periods, including zero, are raised to this value.
pub const MIN_PERIOD: Duration = Duration::from_nanos(1);

/// Callback invoked on every period of a scheduled task.
pub type TickFn = Arc<dyn Fn() + Send + Sync>;

/// Host capability to run a callback periodically.
pub trait Scheduler: Send + Sync + fmt::Debug {
    /// Schedules `tick` to run every `period`, starting one period from now.
    ///
    /// Implementations raise periods below [`MIN_PERIOD`] to it.
    ///
    /// The task runs until the returned handle is cancelled or dropped.
    fn schedule_every(&self, period: Duration, tick: TickFn) -> ScheduledTask;
}

/// Handle to a task created by a [`Scheduler`].
///
/// Dropping the handle cancels the task.
#[must_use = "dropping a ScheduledTask cancels it"]
pub struct ScheduledTask {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl ScheduledTask {
    /// Wraps the scheduler-specific cancellation action.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Cancels the task.
    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl fmt::Debug for ScheduledTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduledTask")
            .field("pending", &self.cancel.is_some())
            .finish()
    }
}

/// A named, restartable periodic timer.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::time::Duration;
/// use kettle_lib::timer::{ManualScheduler, PeriodicTimer};
///
/// let clock = ManualScheduler::new();
/// let ticks = Arc::new(AtomicU32::new(0));
///
/// let mut timer = PeriodicTimer::new("demo", Duration::from_secs(1));
/// let counter = Arc::clone(&ticks);
/// timer.start(&clock, move |_generation| {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
/// assert!(timer.is_active());
///
/// clock.advance(Duration::from_secs(3));
/// assert_eq!(ticks.load(Ordering::SeqCst), 3);
///
/// timer.cancel();
/// clock.advance(Duration::from_secs(3));
/// assert_eq!(ticks.load(Ordering::SeqCst), 3);
/// ```
#[derive(Debug)]
pub struct PeriodicTimer {
    name: &'static str,
    period: Duration,
    generation: u64,
    task: Option<ScheduledTask>,
}

impl PeriodicTimer {
    /// Creates an inactive timer.
    ///
    /// A `period` below [`MIN_PERIOD`] is raised to it.
    #[must_use]
    pub fn new(name: &'static str, period: Duration) -> Self {
        Self {
            name,
            period: period.max(MIN_PERIOD),
            generation: 0,
            task: None,
        }
    }

    /// Returns `true` while a task is scheduled.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.task.is_some()
    }

    /// Returns `true` if `generation` belongs to the running task.
    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        self.task.is_some() && self.generation == generation
    }

    /// Starts the timer, replacing a running task.
    ///
    /// `tick` receives the generation of this start; ticks from earlier
    /// starts carry older generations. Returns the new generation.
    pub fn start<F>(&mut self, scheduler: &dyn Scheduler, tick: F) -> u64
    where
        F: Fn(u64) + Send + Sync + 'static,
    {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;
        let task = scheduler.schedule_every(self.period, Arc::new(move || tick(generation)));
        self.task = Some(task);
        tracing::debug!(timer = self.name, generation, period = ?self.period, "Timer started");
        generation
    }

    /// Cancels the running task. Returns `false` if the timer was inactive.
    pub fn cancel(&mut self) -> bool {
        match self.task.take() {
            Some(task) => {
                task.cancel();
                tracing::debug!(timer = self.name, generation = self.generation, "Timer cancelled");
                true
            }
            None => false,
        }
    }
}
