// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Water level type for the kettle reservoir.
//!
//! This module provides a type-safe representation of the fill level,
//! ensuring values are always within `[0.0, 1.0]`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::MAX_WATER_LEVEL;
use crate::error::ValueError;

/// Fill level of the kettle reservoir as a fraction (0.0-1.0).
///
/// `0.0` is empty and `1.0` is full.
///
/// # Examples
///
/// ```
/// use kettle_lib::types::WaterLevel;
///
/// let half = WaterLevel::new(0.5).unwrap();
/// assert_eq!(half.value(), 0.5);
///
/// // Adding water saturates at full
/// let full = half.saturating_add(0.8);
/// assert_eq!(full, WaterLevel::FULL);
///
/// // Invalid values return error
/// assert!(WaterLevel::new(1.5).is_err());
/// assert!(WaterLevel::new(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct WaterLevel(f64);

impl WaterLevel {
    /// Empty reservoir.
    pub const EMPTY: Self = Self(0.0);

    /// Full reservoir.
    pub const FULL: Self = Self(MAX_WATER_LEVEL);

    /// Creates a new water level.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::NotFinite` for NaN or infinite input and
    /// `ValueError::OutOfRange` if the value is outside `[0.0, 1.0]`.
    pub fn new(value: f64) -> Result<Self, ValueError> {
        if !value.is_finite() {
            return Err(ValueError::NotFinite(value));
        }
        if !(Self::EMPTY.0..=Self::FULL.0).contains(&value) {
            return Err(ValueError::OutOfRange {
                min: Self::EMPTY.0,
                max: Self::FULL.0,
                actual: value,
            });
        }
        Ok(Self(value))
    }

    /// Creates a water level, clamping to the valid range.
    ///
    /// NaN is treated as empty.
    #[must_use]
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            return Self::EMPTY;
        }
        Self(value.clamp(Self::EMPTY.0, Self::FULL.0))
    }

    /// Returns the fill fraction.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// Returns `true` if the reservoir holds no water.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0 <= 0.0
    }

    /// Returns `true` if the reservoir is full.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.0 >= Self::FULL.0
    }

    /// Adds `amount` and saturates at [`WaterLevel::FULL`].
    ///
    /// Negative amounts are not subtracted; callers validate them first.
    #[must_use]
    pub fn saturating_add(self, amount: f64) -> Self {
        Self::clamped(self.0 + amount.max(0.0))
    }
}

impl fmt::Display for WaterLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

impl TryFrom<f64> for WaterLevel {
    type Error = ValueError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WaterLevel> for f64 {
    fn from(level: WaterLevel) -> Self {
        level.0
    }
}
