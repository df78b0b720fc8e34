// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-driven scheduler with a virtual clock.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use super::{MIN_PERIOD, ScheduledTask, Scheduler, TickFn};

/// Scheduler whose clock only moves when the host calls [`advance`](Self::advance).
///
/// Clones share the same clock. Due tasks fire in deadline order, ties in
/// scheduling order. The clock lock is released while a tick runs, so ticks
/// may schedule or cancel tasks themselves.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::time::Duration;
/// use kettle_lib::timer::{ManualScheduler, Scheduler};
///
/// let clock = ManualScheduler::new();
/// let count = Arc::new(AtomicU32::new(0));
/// let sink = Arc::clone(&count);
/// let _task = clock.schedule_every(Duration::from_secs(2), Arc::new(move || {
///     sink.fetch_add(1, Ordering::SeqCst);
/// }));
///
/// assert_eq!(clock.advance(Duration::from_secs(5)), 2);
/// assert_eq!(clock.now(), Duration::from_secs(5));
/// ```
#[derive(Clone, Default)]
pub struct ManualScheduler {
    clock: Arc<Mutex<Clock>>,
}

#[derive(Default)]
struct Clock {
    now: Duration,
    next_id: u64,
    tasks: Vec<Entry>,
}

struct Entry {
    id: u64,
    period: Duration,
    next_due: Duration,
    tick: TickFn,
    cancelled: Arc<AtomicBool>,
}

impl ManualScheduler {
    /// Creates a scheduler with its clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the virtual time elapsed since creation.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.lock().now
    }

    /// Returns the number of scheduled, uncancelled tasks.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.clock
            .lock()
            .tasks
            .iter()
            .filter(|entry| !entry.cancelled.load(Ordering::Acquire))
            .count()
    }

    /// Moves the clock forward by `by`, firing every tick that falls due.
    ///
    /// Returns the number of ticks fired.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.clock.lock().now + by;
        let mut fired = 0;

        loop {
            let (tick, cancelled) = {
                let mut clock = self.clock.lock();
                clock
                    .tasks
                    .retain(|entry| !entry.cancelled.load(Ordering::Acquire));
                let Some(entry) = clock
                    .tasks
                    .iter_mut()
                    .filter(|entry| entry.next_due <= target)
                    .min_by_key(|entry| (entry.next_due, entry.id))
                else {
                    clock.now = target;
                    break;
                };
                let due = entry.next_due;
                entry.next_due += entry.period;
                let due_tick = (Arc::clone(&entry.tick), Arc::clone(&entry.cancelled));
                clock.now = due;
                due_tick
            };

            if !cancelled.load(Ordering::Acquire) {
                tick();
                fired += 1;
            }
        }

        fired
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_every(&self, period: Duration, tick: TickFn) -> ScheduledTask {
        let period = period.max(MIN_PERIOD);
        let cancelled = Arc::new(AtomicBool::new(false));
        {
            let mut clock = self.clock.lock();
            let id = clock.next_id;
            clock.next_id += 1;
            let next_due = clock.now + period;
            clock.tasks.push(Entry {
                id,
                period,
                next_due,
                tick,
                cancelled: Arc::clone(&cancelled),
            });
        }
        ScheduledTask::new(move || cancelled.store(true, Ordering::Release))
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("now", &self.now())
            .field("pending", &self.pending())
            .finish()
    }
}
