// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Kettle state record.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::KettleConfig;
use crate::types::{Temperature, WaterLevel};

use super::StateChange;

/// Phase of the heating sub-machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeatingPhase {
    /// Not heating; the temperature may be above room level and decaying.
    Idle,
    /// The heating timer is running and the temperature is rising.
    Heating,
    /// Boiling point was just reached; the kettle switched itself off.
    ///
    /// Only reported by [`KettleEvent::phase`](crate::event::KettleEvent::phase)
    /// for the boil event; a snapshot is never in this phase.
    Boiled,
}

impl fmt::Display for HeatingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Heating => "heating",
            Self::Boiled => "boiled",
        })
    }
}

/// Physical state of the kettle.
///
/// The controller owns the live record; callers only ever see copies
/// obtained through [`Kettle::state`](crate::Kettle::state) or the watch
/// channel.
///
/// # Examples
///
/// ```
/// use kettle_lib::state::{HeatingPhase, KettleState};
///
/// let state = KettleState::default();
/// assert!(!state.is_plugged_in);
/// assert!(!state.is_heating);
/// assert!(state.water_level.is_empty());
/// assert_eq!(state.temperature.celsius(), 20.0);
/// assert_eq!(state.phase(), HeatingPhase::Idle);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct KettleState {
    /// Mains connectivity.
    pub is_plugged_in: bool,
    /// Whether the heating element is energized.
    pub is_heating: bool,
    /// Fill level of the reservoir.
    pub water_level: WaterLevel,
    /// Water temperature.
    pub temperature: Temperature,
}

impl KettleState {
    /// Creates the state of a freshly constructed kettle.
    #[must_use]
    pub fn initial(config: &KettleConfig) -> Self {
        Self {
            is_plugged_in: false,
            is_heating: false,
            water_level: config.start_water_level,
            temperature: config.room_temperature,
        }
    }

    /// Returns the current heating phase.
    #[must_use]
    pub fn phase(&self) -> HeatingPhase {
        if self.is_heating {
            HeatingPhase::Heating
        } else {
            HeatingPhase::Idle
        }
    }

    /// Applies a change and reports whether anything was modified.
    pub fn apply(&mut self, change: &StateChange) -> bool {
        match change {
            StateChange::Plug(plugged) => replace(&mut self.is_plugged_in, *plugged),
            StateChange::Heating(heating) => replace(&mut self.is_heating, *heating),
            StateChange::WaterLevel(level) => replace(&mut self.water_level, *level),
            StateChange::Temperature(t) => replace(&mut self.temperature, *t),
            StateChange::Batch(changes) => changes
                .iter()
                .fold(false, |changed, c| self.apply(c) || changed),
        }
    }

    /// Returns the first model invariant this state breaks, if any.
    ///
    /// The temperature must stay within room and boiling temperature. The
    /// one exception is an emptied kettle, which sits at the configured
    /// initial temperature.
    #[must_use]
    pub fn violated_invariant(&self, config: &KettleConfig) -> Option<&'static str> {
        let level = self.water_level.value();
        if !(WaterLevel::EMPTY.value()..=WaterLevel::FULL.value()).contains(&level) {
            return Some("water level outside [0, 1]");
        }
        let emptied =
            self.water_level.is_empty() && self.temperature == config.initial_temperature;
        if !emptied
            && (self.temperature < config.room_temperature
                || self.temperature > config.max_temperature)
        {
            return Some("temperature outside [room, boiling]");
        }
        if self.is_heating && !self.is_plugged_in {
            return Some("heating while unplugged");
        }
        if self.is_heating && self.water_level.is_empty() {
            return Some("heating without water");
        }
        None
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

impl fmt::Display for KettleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "State: {}", if self.is_heating { "on" } else { "off" })?;
        writeln!(f, "Water level: {}", self.water_level)?;
        writeln!(f, "Temperature: {}", self.temperature)?;
        write!(
            f,
            "Plugged in: {}",
            if self.is_plugged_in { "yes" } else { "no" }
        )
    }
}
