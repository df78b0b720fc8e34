// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event bus for broadcasting kettle events.

use tokio::sync::broadcast;

use super::KettleEvent;

/// Default channel capacity for the event bus.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Event bus for broadcasting kettle events to multiple subscribers.
///
/// Publishing never blocks, so the controller can publish while it holds
/// its state lock. The channel works without a running tokio runtime;
/// subscribers outside a runtime can drain it with `try_recv`.
///
/// # Capacity
///
/// The event bus has a fixed capacity (default 256). If a subscriber falls
/// behind, older events are dropped for that subscriber (it receives a
/// `RecvError::Lagged` error). Kettles size it from
/// [`KettleConfig::event_capacity`](crate::KettleConfig::event_capacity).
///
/// # Examples
///
/// ```
/// use kettle_lib::event::{EventBus, KettleEvent};
/// use kettle_lib::state::HeatingPhase;
/// use kettle_lib::Temperature;
///
/// let bus = EventBus::with_capacity(16);
/// let mut display = bus.subscribe();
///
/// bus.publish(KettleEvent::Boiled {
///     temperature: Temperature::BOILING,
/// });
/// let event = display.try_recv().unwrap();
/// assert_eq!(event.phase(), Some(HeatingPhase::Boiled));
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<KettleEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a new event bus with the specified capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribes to kettle events.
    ///
    /// Returns a receiver that will receive all events published after
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<KettleEvent> {
        self.sender.subscribe()
    }

    /// Publishes an event to all subscribers.
    ///
    /// If there are no subscribers, the event is silently discarded.
    pub fn publish(&self, event: KettleEvent) {
        // Ignore errors (no subscribers)
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
