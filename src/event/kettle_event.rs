// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Kettle event types.

use crate::error::KettleError;
use crate::state::{HeatingPhase, KettleState, StateChange};
use crate::types::Temperature;

/// Events emitted by the kettle controller.
///
/// # Examples
///
/// ```
/// use kettle_lib::KettleError;
/// use kettle_lib::event::KettleEvent;
///
/// let notice = KettleEvent::notice(KettleError::NoWater);
/// assert_eq!(notice.notice_text(), Some(KettleError::NoWater.notice()));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum KettleEvent {
    /// A command was rejected; the presentation layer shows this as an alert.
    Notice(KettleError),

    /// The kettle state changed.
    ///
    /// Emitted for every command and tick that modified the state.
    StateChanged {
        /// The specific change that occurred.
        change: StateChange,
        /// The complete new state of the kettle.
        new_state: KettleState,
    },

    /// Boiling point was reached and the kettle switched itself off.
    Boiled {
        /// The clamped temperature.
        temperature: Temperature,
    },

    /// The water cooled down to room temperature and the cooldown timer stopped.
    CooledDown {
        /// The final temperature.
        temperature: Temperature,
    },
}

impl KettleEvent {
    /// Creates a notice event.
    #[must_use]
    pub fn notice(error: KettleError) -> Self {
        Self::Notice(error)
    }

    /// Creates a state changed event.
    #[must_use]
    pub fn state_changed(change: StateChange, new_state: KettleState) -> Self {
        Self::StateChanged { change, new_state }
    }

    /// Returns `true` if this is a user-facing notice.
    #[must_use]
    pub fn is_notice(&self) -> bool {
        matches!(self, Self::Notice(_))
    }

    /// Returns `true` if this is a state change event.
    #[must_use]
    pub fn is_state_change(&self) -> bool {
        matches!(self, Self::StateChanged { .. })
    }

    /// Returns the heating phase this event reports.
    ///
    /// `Boiled` events are the only place the transient
    /// [`HeatingPhase::Boiled`] shows up; snapshots read `Idle` right after.
    /// Notices do not change the phase and return `None`.
    #[must_use]
    pub fn phase(&self) -> Option<HeatingPhase> {
        match self {
            Self::Notice(_) => None,
            Self::StateChanged { new_state, .. } => Some(new_state.phase()),
            Self::Boiled { .. } => Some(HeatingPhase::Boiled),
            Self::CooledDown { .. } => Some(HeatingPhase::Idle),
        }
    }

    /// Returns the advisory text for notice events.
    #[must_use]
    pub fn notice_text(&self) -> Option<&'static str> {
        match self {
            Self::Notice(error) => Some(error.notice()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_events() {
        let event = KettleEvent::notice(KettleError::NotPluggedIn);
        assert!(event.is_notice());
        assert!(!event.is_state_change());
        assert_eq!(event.notice_text(), Some(KettleError::NotPluggedIn.notice()));
    }

    #[test]
    fn state_change_events() {
        let event = KettleEvent::state_changed(StateChange::Plug(true), KettleState::default());
        assert!(event.is_state_change());
        assert_eq!(event.notice_text(), None);
    }

    #[test]
    fn lifecycle_events_are_neither() {
        let event = KettleEvent::Boiled {
            temperature: Temperature::BOILING,
        };
        assert!(!event.is_notice());
        assert!(!event.is_state_change());
    }

    #[test]
    fn phase_of_each_event() {
        assert_eq!(KettleEvent::notice(KettleError::NoWater).phase(), None);

        let heating = KettleState {
            is_heating: true,
            ..KettleState::default()
        };
        let event = KettleEvent::state_changed(StateChange::Heating(true), heating);
        assert_eq!(event.phase(), Some(HeatingPhase::Heating));

        let boiled = KettleEvent::Boiled {
            temperature: Temperature::BOILING,
        };
        assert_eq!(boiled.phase(), Some(HeatingPhase::Boiled));

        let cooled = KettleEvent::CooledDown {
            temperature: Temperature::ROOM,
        };
        assert_eq!(cooled.phase(), Some(HeatingPhase::Idle));
    }
}
