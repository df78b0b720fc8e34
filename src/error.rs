// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the kettle library.
//!
//! Command failures ([`KettleError`]) are user-input-shaped: they leave the
//! kettle untouched and are meant to be shown to the user as a notice.
//! [`ValueError`] covers construction of the constrained value types and
//! [`ConfigError`] covers loading and validating a [`KettleConfig`](crate::KettleConfig).

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A kettle command was rejected.
    #[error("kettle error: {0}")]
    Kettle(#[from] KettleError),

    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while loading or validating a configuration.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Rejections of kettle commands.
///
/// All variants are recoverable. The kettle state is unchanged when one of
/// these is returned, and the kettle stays fully usable afterwards.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum KettleError {
    /// Power was toggled while the kettle is not plugged in.
    #[error("kettle is not plugged in")]
    NotPluggedIn,

    /// Power was toggled on with an empty reservoir.
    #[error("kettle has no water")]
    NoWater,

    /// A negative or non-finite amount of water was added.
    #[error("invalid water amount: {0}")]
    InvalidAmount(f64),
}

impl KettleError {
    /// Returns the advisory text a presentation layer shows for this error.
    #[must_use]
    pub const fn notice(&self) -> &'static str {
        match self {
            Self::NotPluggedIn => "Plug the kettle into the mains to switch it on.",
            Self::NoWater => "Pour some water into the kettle before switching it on.",
            Self::InvalidAmount(_) => "The amount of water must be a non-negative number.",
        }
    }
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: f64,
        /// Maximum allowed value.
        max: f64,
        /// The actual value that was provided.
        actual: f64,
    },

    /// The value is NaN or infinite.
    #[error("value {0} is not a finite number")]
    NotFinite(f64),
}

/// Errors related to kettle configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A configured value breaks a constraint.
    #[error("invalid {field}: {message}")]
    Invalid {
        /// The offending configuration field.
        field: &'static str,
        /// Description of the violated constraint.
        message: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
