// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Constrained value types used by the kettle model.
//!
//! Both types reject NaN and infinite values at construction, so the
//! controller never has to re-check its inputs once they are wrapped.

mod temperature;
mod water_level;

pub use temperature::Temperature;
pub use water_level::WaterLevel;
