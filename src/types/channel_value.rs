// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed values published on channels.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Unit of measure attached to a [`ChannelValue::Quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// Mass in grams.
    Gram,
    /// Mass in kilograms.
    Kilogram,
    /// Electric potential in volts.
    Volt,
    /// Ratio in percent.
    Percent,
    /// Signal strength in dBm.
    DecibelMilliwatt,
}

impl Unit {
    /// Returns the unit symbol.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Gram => "g",
            Self::Kilogram => "kg",
            Self::Volt => "V",
            Self::Percent => "%",
            Self::DecibelMilliwatt => "dBm",
        }
    }
}

/// A typed value for one channel.
///
/// # Examples
///
/// ```
/// use cloudstate_lib::types::{ChannelValue, Unit};
///
/// let weight = ChannelValue::quantity(12.5, Unit::Gram);
/// assert_eq!(weight.to_string(), "12.5 g");
///
/// let name: ChannelValue = "Garden Flap".into();
/// assert_eq!(name.as_str(), Some("Garden Flap"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ChannelValue {
    /// Whole number.
    Integer(i64),
    /// Decimal number.
    Decimal(f64),
    /// Text.
    String(String),
    /// On/off flag.
    Boolean(bool),
    /// Zoned date-time.
    Timestamp(DateTime<FixedOffset>),
    /// Number with a unit of measure.
    Quantity {
        /// The magnitude.
        value: f64,
        /// The unit.
        unit: Unit,
    },
}

impl ChannelValue {
    /// Creates a quantity value.
    #[must_use]
    pub const fn quantity(value: f64, unit: Unit) -> Self {
        Self::Quantity { value, unit }
    }

    /// Returns the integer, if this is one.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the numeric magnitude of decimal, integer and quantity values.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Decimal(v) | Self::Quantity { value: v, .. } => Some(*v),
            Self::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Returns the text, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the flag, if this is a boolean.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the date-time, if this is a timestamp.
    #[must_use]
    pub const fn as_timestamp(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Self::Timestamp(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for ChannelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Decimal(v) => write!(f, "{v}"),
            Self::String(v) => f.write_str(v),
            Self::Boolean(v) => f.write_str(if *v { "ON" } else { "OFF" }),
            Self::Timestamp(v) => write!(f, "{}", v.to_rfc3339()),
            Self::Quantity { value, unit } => write!(f, "{value} {}", unit.symbol()),
        }
    }
}

impl From<i64> for ChannelValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for ChannelValue {
    fn from(value: f64) -> Self {
        Self::Decimal(value)
    }
}

impl From<bool> for ChannelValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<String> for ChannelValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for ChannelValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<DateTime<FixedOffset>> for ChannelValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::Timestamp(value)
    }
}
