// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scheduler backed by tokio interval tasks.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::{MIN_PERIOD, ScheduledTask, Scheduler, TickFn};

/// Runs each scheduled task as a tokio task driving an interval.
///
/// The first tick fires one full period after scheduling. Cancelling aborts
/// the task and also sets a flag the task checks before every tick, so a
/// tick that is already due when the task is cancelled does not run.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    /// Creates a scheduler spawning onto the given runtime.
    #[must_use]
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Creates a scheduler for the runtime the caller is running in.
    ///
    /// Returns `None` outside a tokio runtime.
    #[must_use]
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_every(&self, period: Duration, tick: TickFn) -> ScheduledTask {
        let period = period.max(MIN_PERIOD);
        let _guard = self.handle.enter();
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let start = Instant::now() + period;

        let task = self.handle.spawn(async move {
            let mut interval = time::interval_at(start, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if flag.load(Ordering::Acquire) {
                    break;
                }
                tick();
            }
        });

        let abort = task.abort_handle();
        ScheduledTask::new(move || {
            cancelled.store(true, Ordering::Release);
            abort.abort();
        })
    }
}
