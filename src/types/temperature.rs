// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Water temperature type.
//!
//! The kettle model uses fixed linear steps instead of heat-transfer
//! equations, so the type only offers bounded step helpers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Water temperature in degrees Celsius.
///
/// # Examples
///
/// ```
/// use kettle_lib::types::Temperature;
///
/// let t = Temperature::ROOM;
/// let (hotter, reached) = t.heated_by(8.0, Temperature::BOILING);
/// assert_eq!(hotter.celsius(), 28.0);
/// assert!(!reached);
///
/// let (boiled, reached) = Temperature::new(96.0).unwrap().heated_by(8.0, Temperature::BOILING);
/// assert_eq!(boiled, Temperature::BOILING);
/// assert!(reached);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Temperature(f64);

impl Temperature {
    /// Ambient room temperature (20 °C).
    pub const ROOM: Self = Self(20.0);

    /// Boiling point (100 °C), where heating switches itself off.
    pub const BOILING: Self = Self(100.0);

    /// Temperature of an emptied kettle (0 °C).
    pub const INITIAL: Self = Self(0.0);

    /// Creates a new temperature.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::NotFinite` for NaN or infinite input.
    pub fn new(celsius: f64) -> Result<Self, ValueError> {
        if !celsius.is_finite() {
            return Err(ValueError::NotFinite(celsius));
        }
        Ok(Self(celsius))
    }

    /// Returns the value in degrees Celsius.
    #[must_use]
    pub const fn celsius(&self) -> f64 {
        self.0
    }

    /// Raises the temperature by `step`.
    ///
    /// Returns the new temperature and whether `ceiling` was reached. A
    /// result at or above the ceiling is clamped to it.
    #[must_use]
    pub fn heated_by(self, step: f64, ceiling: Self) -> (Self, bool) {
        let next = self.0 + step;
        if next < ceiling.0 {
            (Self(next), false)
        } else {
            (ceiling, true)
        }
    }

    /// Lowers the temperature by `step`, never going below `floor`.
    ///
    /// Returns the new temperature and whether `floor` was reached.
    #[must_use]
    pub fn cooled_by(self, step: f64, floor: Self) -> (Self, bool) {
        let next = (self.0 - step).max(floor.0);
        (Self(next), next <= floor.0)
    }
}

impl Default for Temperature {
    fn default() -> Self {
        Self::ROOM
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°C", self.0)
    }
}

impl TryFrom<f64> for Temperature {
    type Error = ValueError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Temperature> for f64 {
    fn from(t: Temperature) -> Self {
        t.0
    }
}
