// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device classification.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of hardware a device entity represents.
///
/// Pet hardware is classified by its product id; charger hardware by the
/// product line it was listed under.
///
/// # Examples
///
/// ```
/// use cloudstate_lib::types::DeviceKind;
///
/// assert_eq!(DeviceKind::from_product_id(1), DeviceKind::Hub);
/// assert_eq!(DeviceKind::from_product_id(6), DeviceKind::CatFlap);
/// assert!(DeviceKind::CatFlap.is_flap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    /// Internet hub the other pet devices connect through.
    Hub,
    /// Signal repeater.
    Repeater,
    /// Pet door.
    PetFlap,
    /// Microchip pet feeder (regular or lite).
    Feeder,
    /// Microchip cat flap.
    CatFlap,
    /// Water station.
    Felaqua,
    /// Wireless energy sensor.
    Harvi,
    /// EV charger.
    Zappi,
    /// Hot water diverter.
    Eddi,
    /// Not classified yet.
    #[default]
    Unknown,
}

impl DeviceKind {
    /// Classifies pet hardware by product id.
    #[must_use]
    pub const fn from_product_id(product_id: i64) -> Self {
        match product_id {
            1 => Self::Hub,
            2 => Self::Repeater,
            3 => Self::PetFlap,
            4 | 7 => Self::Feeder,
            6 => Self::CatFlap,
            8 => Self::Felaqua,
            _ => Self::Unknown,
        }
    }

    /// Returns the snake-case name of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hub => "hub",
            Self::Repeater => "repeater",
            Self::PetFlap => "pet_flap",
            Self::Feeder => "feeder",
            Self::CatFlap => "cat_flap",
            Self::Felaqua => "felaqua",
            Self::Harvi => "harvi",
            Self::Zappi => "zappi",
            Self::Eddi => "eddi",
            Self::Unknown => "unknown",
        }
    }

    /// Returns `true` for pet and cat flaps.
    #[must_use]
    pub const fn is_flap(&self) -> bool {
        matches!(self, Self::PetFlap | Self::CatFlap)
    }

    /// Returns `true` for battery-powered bowl devices.
    #[must_use]
    pub const fn is_feeder(&self) -> bool {
        matches!(self, Self::Feeder | Self::Felaqua)
    }

    /// Returns `true` unless the kind is [`DeviceKind::Unknown`].
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Group a device is listed under in a [`DeviceSummary`](crate::model::DeviceSummary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductLine {
    /// `harvi` group.
    Harvi,
    /// `zappi` group.
    Zappi,
    /// `eddi` group.
    Eddi,
    /// `devices` group; kind comes from the product id.
    Petcare,
}

impl ProductLine {
    /// Returns the device kind implied by the group, if any.
    #[must_use]
    pub const fn device_kind(self) -> Option<DeviceKind> {
        match self {
            Self::Harvi => Some(DeviceKind::Harvi),
            Self::Zappi => Some(DeviceKind::Zappi),
            Self::Eddi => Some(DeviceKind::Eddi),
            Self::Petcare => None,
        }
    }
}

/// Bowl configuration of a feeder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BowlLayout {
    /// One large bowl (bowl type 1).
    Single,
    /// Left and right half bowls (bowl type 4).
    Double,
    /// Any other bowl type.
    Other(i64),
}

impl BowlLayout {
    /// Classifies the remote bowl type code.
    #[must_use]
    pub const fn from_type_id(type_id: i64) -> Self {
        match type_id {
            1 => Self::Single,
            4 => Self::Double,
            other => Self::Other(other),
        }
    }

    /// Returns a short name for the layout.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Double => "double",
            Self::Other(_) => "other",
        }
    }
}
