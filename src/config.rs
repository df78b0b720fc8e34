// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Kettle configuration.
//!
//! Every constant of the behavioral model lives in [`KettleConfig`]. The
//! defaults reproduce the reference kettle; hosts can override individual
//! values with the `with_*` methods or load a (partial) JSON document.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use kettle_lib::KettleConfig;
//!
//! let config = KettleConfig::default()
//!     .with_heating_interval(Duration::from_millis(100))
//!     .with_cooldown_interval(Duration::from_millis(300));
//! assert!(config.validate().is_ok());
//!
//! let config = KettleConfig::from_json(r#"{ "heating_step": 10.0 }"#).unwrap();
//! assert_eq!(config.heating_step, 10.0);
//! assert_eq!(config.cooling_step, 2.0);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{Temperature, WaterLevel};

/// Boiling point at which heating switches itself off, in °C.
pub const MAX_TEMPERATURE: f64 = 100.0;
/// Ambient temperature that cooling converges to, in °C.
pub const ROOM_TEMPERATURE: f64 = 20.0;
/// Temperature of an emptied kettle, in °C.
pub const INITIAL_TEMPERATURE: f64 = 0.0;
/// Fill level of a freshly constructed kettle.
pub const START_WATER_LEVEL: f64 = 0.0;
/// Fill level of a full kettle.
pub const MAX_WATER_LEVEL: f64 = 1.0;
/// Period between heating ticks.
pub const HEATING_INTERVAL: Duration = Duration::from_millis(1000);
/// Period between cooldown ticks.
pub const COOLDOWN_INTERVAL: Duration = Duration::from_millis(3000);
/// Temperature gained per heating tick, in °C.
pub const STEP_FOR_INCREASING_TEMPERATURE: f64 = 8.0;
/// Temperature lost per cooldown tick, in °C.
pub const STEP_FOR_DECREASING_TEMPERATURE: f64 = 2.0;

/// Tunable constants of the kettle model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KettleConfig {
    /// Boiling point; heating stops once it is reached.
    pub max_temperature: Temperature,
    /// Ambient temperature; cooling stops once it is reached.
    pub room_temperature: Temperature,
    /// Temperature applied by the empty-kettle reset.
    pub initial_temperature: Temperature,
    /// Fill level at construction.
    pub start_water_level: WaterLevel,
    /// Degrees gained per heating tick.
    pub heating_step: f64,
    /// Degrees lost per cooldown tick.
    pub cooling_step: f64,
    /// Period of the heating timer.
    #[serde(with = "duration_ms", rename = "heating_interval_ms")]
    pub heating_interval: Duration,
    /// Period of the cooldown timer.
    #[serde(with = "duration_ms", rename = "cooldown_interval_ms")]
    pub cooldown_interval: Duration,
    /// Capacity of the event broadcast channel.
    pub event_capacity: usize,
}

impl Default for KettleConfig {
    fn default() -> Self {
        Self {
            max_temperature: Temperature::BOILING,
            room_temperature: Temperature::ROOM,
            initial_temperature: Temperature::INITIAL,
            start_water_level: WaterLevel::EMPTY,
            heating_step: STEP_FOR_INCREASING_TEMPERATURE,
            cooling_step: STEP_FOR_DECREASING_TEMPERATURE,
            heating_interval: HEATING_INTERVAL,
            cooldown_interval: COOLDOWN_INTERVAL,
            event_capacity: 256,
        }
    }
}

impl KettleConfig {
    /// Parses a configuration from JSON and validates it.
    ///
    /// Missing fields take their default values. Intervals are given in
    /// milliseconds as `heating_interval_ms` and `cooldown_interval_ms`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Json` on malformed input and
    /// `ConfigError::Invalid` if the parsed values fail [`validate`](Self::validate).
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the relations between the configured values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.heating_step.is_finite() && self.heating_step > 0.0) {
            return Err(ConfigError::invalid(
                "heating_step",
                format!("must be a positive number, got {}", self.heating_step),
            ));
        }
        if !(self.cooling_step.is_finite() && self.cooling_step > 0.0) {
            return Err(ConfigError::invalid(
                "cooling_step",
                format!("must be a positive number, got {}", self.cooling_step),
            ));
        }
        if self.heating_interval.is_zero() {
            return Err(ConfigError::invalid(
                "heating_interval",
                "must be greater than zero",
            ));
        }
        if self.cooldown_interval.is_zero() {
            return Err(ConfigError::invalid(
                "cooldown_interval",
                "must be greater than zero",
            ));
        }
        if self.room_temperature >= self.max_temperature {
            return Err(ConfigError::invalid(
                "room_temperature",
                format!(
                    "must be below max_temperature ({} >= {})",
                    self.room_temperature, self.max_temperature
                ),
            ));
        }
        if self.initial_temperature > self.room_temperature {
            return Err(ConfigError::invalid(
                "initial_temperature",
                format!(
                    "must not exceed room_temperature ({} > {})",
                    self.initial_temperature, self.room_temperature
                ),
            ));
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::invalid("event_capacity", "must be at least 1"));
        }
        Ok(())
    }

    /// Sets the boiling point.
    #[must_use]
    pub fn with_max_temperature(mut self, temperature: Temperature) -> Self {
        self.max_temperature = temperature;
        self
    }

    /// Sets the ambient temperature.
    #[must_use]
    pub fn with_room_temperature(mut self, temperature: Temperature) -> Self {
        self.room_temperature = temperature;
        self
    }

    /// Sets the temperature applied by the empty-kettle reset.
    #[must_use]
    pub fn with_initial_temperature(mut self, temperature: Temperature) -> Self {
        self.initial_temperature = temperature;
        self
    }

    /// Sets the fill level at construction.
    #[must_use]
    pub fn with_start_water_level(mut self, level: WaterLevel) -> Self {
        self.start_water_level = level;
        self
    }

    /// Sets the degrees gained per heating tick.
    #[must_use]
    pub fn with_heating_step(mut self, step: f64) -> Self {
        self.heating_step = step;
        self
    }

    /// Sets the degrees lost per cooldown tick.
    #[must_use]
    pub fn with_cooling_step(mut self, step: f64) -> Self {
        self.cooling_step = step;
        self
    }

    /// Sets the heating timer period.
    #[must_use]
    pub fn with_heating_interval(mut self, interval: Duration) -> Self {
        self.heating_interval = interval;
        self
    }

    /// Sets the cooldown timer period.
    #[must_use]
    pub fn with_cooldown_interval(mut self, interval: Duration) -> Self {
        self.cooldown_interval = interval;
        self
    }

    /// Sets the event channel capacity.
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
