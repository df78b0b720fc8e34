// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Kettle Lib - a behavioral model of an electric kettle.
//!
//! The library models power state, mains-plug connectivity, water fill level
//! and the temperature evolution of a kettle under heating and ambient
//! cooldown. It has no user interface of its own: a presentation layer calls
//! the commands on [`Kettle`] and renders the [`KettleState`] snapshots and
//! [`KettleEvent`](event::KettleEvent) notices it gets back.
//!
//! # Features
//!
//! - **Commands**: toggle power, toggle the plug, add water, stop, reset
//! - **Safety rules**: no heating while unplugged or empty, automatic
//!   switch-off at boiling point, unplugging forces heating off
//! - **Timers**: heating and cooldown ticks driven by tokio or by a
//!   host-controlled clock
//! - **Observation**: state snapshots, a watch channel, and an event bus
//!
//! # Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//! use kettle_lib::Kettle;
//!
//! #[tokio::main]
//! async fn main() -> kettle_lib::Result<()> {
//!     let kettle = Kettle::new()?;
//!
//!     kettle.toggle_plug();
//!     kettle.add_water(0.5)?;
//!     kettle.toggle_power()?;
//!
//!     tokio::time::sleep(Duration::from_secs(3)).await;
//!     println!("{}", kettle.state());
//!     Ok(())
//! }
//! ```
//!
//! ## Without a tokio runtime
//!
//! ```
//! use std::time::Duration;
//! use kettle_lib::Kettle;
//! use kettle_lib::timer::ManualScheduler;
//!
//! # fn main() -> kettle_lib::Result<()> {
//! let clock = ManualScheduler::new();
//! let kettle = Kettle::builder().scheduler(clock.clone()).build()?;
//!
//! kettle.toggle_plug();
//! kettle.add_water(1.0)?;
//! kettle.toggle_power()?;
//!
//! // Ten heating ticks take the water from 20 °C to the boiling point.
//! clock.advance(Duration::from_secs(10));
//! assert_eq!(kettle.state().temperature.celsius(), 100.0);
//! assert!(!kettle.state().is_heating);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod event;
mod kettle;
pub mod state;
pub mod timer;
pub mod types;

pub use config::KettleConfig;
pub use error::{ConfigError, Error, KettleError, Result, ValueError};
pub use kettle::{Kettle, KettleBuilder};
pub use state::{HeatingPhase, KettleState, StateChange};
pub use types::{Temperature, WaterLevel};
