// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.
//!
//! Every transition of the kettle is expressed as a [`StateChange`] that is
//! applied to the [`KettleState`](super::KettleState) and then published to
//! subscribers.
//!
//! # Examples
//!
//! ```
//! use kettle_lib::state::{KettleState, StateChange};
//!
//! let mut state = KettleState::default();
//!
//! // Apply returns true if state actually changed
//! assert!(state.apply(&StateChange::Plug(true)));
//! assert!(!state.apply(&StateChange::Plug(true)));
//! assert!(state.is_plugged_in);
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{Temperature, WaterLevel};

/// Represents a change in kettle state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StateChange {
    /// Mains connectivity changed.
    Plug(bool),

    /// The heating element was energized or de-energized.
    Heating(bool),

    /// The fill level changed.
    WaterLevel(WaterLevel),

    /// The water temperature changed.
    Temperature(Temperature),

    /// Multiple changes applied as one transition.
    Batch(Vec<StateChange>),
}

impl StateChange {
    /// Creates a batch of changes.
    #[must_use]
    pub fn batch(changes: Vec<StateChange>) -> Self {
        Self::Batch(changes)
    }
}
