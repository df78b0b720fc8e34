// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Kettle state types.
//!
//! [`KettleState`] is the record the controller guards, [`StateChange`]
//! describes one transition of it, and [`HeatingPhase`] names the states of
//! the heating sub-machine.
//!
//! # Examples
//!
//! ```
//! use kettle_lib::state::{KettleState, StateChange};
//! use kettle_lib::types::WaterLevel;
//!
//! let mut state = KettleState::default();
//! state.apply(&StateChange::WaterLevel(WaterLevel::FULL));
//!
//! assert!(state.water_level.is_full());
//! ```

mod kettle_state;
mod state_change;

pub use kettle_state::{HeatingPhase, KettleState};
pub use state_change::StateChange;
