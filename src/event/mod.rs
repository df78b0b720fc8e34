// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event system for kettle notifications.
//!
//! This module provides a pub/sub channel for notifying the presentation
//! layer about state changes and rejected commands. The [`EventBus`] uses
//! tokio's broadcast channel to allow multiple subscribers to receive events.
//!
//! # Examples
//!
//! ```
//! use kettle_lib::KettleError;
//! use kettle_lib::event::{EventBus, KettleEvent};
//!
//! let bus = EventBus::new();
//!
//! // Subscribe to events
//! let mut rx = bus.subscribe();
//!
//! // Publish an event
//! bus.publish(KettleEvent::notice(KettleError::NotPluggedIn));
//! assert!(rx.try_recv().unwrap().is_notice());
//! ```

mod event_bus;
mod kettle_event;

pub use event_bus::EventBus;
pub use kettle_event::KettleEvent;
