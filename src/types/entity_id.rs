// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity identifier types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Stable identifier of a synchronized entity, unique per entity kind.
///
/// # Examples
///
/// ```
/// use cloudstate_lib::types::EntityId;
///
/// let id: EntityId = "1234".parse().unwrap();
/// assert_eq!(id.value(), 1234);
/// assert_eq!(id.to_string(), "1234");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(i64);

impl EntityId {
    /// Creates an identifier from its raw value.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse()
            .map(Self)
            .map_err(|_| ValueError::InvalidId(s.to_string()))
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// The kinds of entity tracked by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Hardware: hubs, flaps, feeders, chargers.
    Device,
    /// A pet, with its location and feeding state.
    Pet,
    /// A household and its users.
    Household,
    /// An identification tag (microchip or collar tag) worn by a pet.
    Tag,
}

impl EntityKind {
    /// All kinds in dependency order: kinds referenced by others come first.
    pub const ALL: [Self; 4] = [Self::Household, Self::Tag, Self::Device, Self::Pet];

    /// Returns the lowercase name of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Device => "device",
            Self::Pet => "pet",
            Self::Household => "household",
            Self::Tag => "tag",
        }
    }

    /// Returns the plural collection name used in remote paths.
    #[must_use]
    pub const fn collection(&self) -> &'static str {
        match self {
            Self::Device => "devices",
            Self::Pet => "pets",
            Self::Household => "households",
            Self::Tag => "tags",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "device" | "devices" => Ok(Self::Device),
            "pet" | "pets" => Ok(Self::Pet),
            "household" | "households" => Ok(Self::Household),
            "tag" | "tags" => Ok(Self::Tag),
            _ => Err(ValueError::InvalidEntityKind(s.to_string())),
        }
    }
}

/// Identifier of an entity that is unique across kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityKey {
    /// The entity kind.
    pub kind: EntityKind,
    /// The identifier within that kind.
    pub id: EntityId,
}

impl EntityKey {
    /// Creates a key from a kind and an identifier.
    #[must_use]
    pub const fn new(kind: EntityKind, id: EntityId) -> Self {
        Self { kind, id }
    }

    /// Key of a device.
    #[must_use]
    pub const fn device(id: i64) -> Self {
        Self::new(EntityKind::Device, EntityId::new(id))
    }

    /// Key of a pet.
    #[must_use]
    pub const fn pet(id: i64) -> Self {
        Self::new(EntityKind::Pet, EntityId::new(id))
    }

    /// Key of a household.
    #[must_use]
    pub const fn household(id: i64) -> Self {
        Self::new(EntityKind::Household, EntityId::new(id))
    }

    /// Key of a tag.
    #[must_use]
    pub const fn tag(id: i64) -> Self {
        Self::new(EntityKind::Tag, EntityId::new(id))
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_entity_id() {
        assert_eq!(" 17 ".parse::<EntityId>().unwrap(), EntityId::new(17));
        assert!(matches!(
            "abc".parse::<EntityId>(),
            Err(ValueError::InvalidId(_))
        ));
    }

    #[test]
    fn entity_id_deserializes_from_number() {
        let id: EntityId = serde_json::from_str("99").unwrap();
        assert_eq!(id.value(), 99);
    }

    #[test]
    fn parse_entity_kind() {
        assert_eq!("Pets".parse::<EntityKind>().unwrap(), EntityKind::Pet);
        assert_eq!("device".parse::<EntityKind>().unwrap(), EntityKind::Device);
        assert!("flap".parse::<EntityKind>().is_err());
    }

    #[test]
    fn kind_order_puts_references_first() {
        let pos = |kind| EntityKind::ALL.iter().position(|k| *k == kind).unwrap();
        assert!(pos(EntityKind::Household) < pos(EntityKind::Pet));
        assert!(pos(EntityKind::Device) < pos(EntityKind::Pet));
    }

    #[test]
    fn key_display() {
        assert_eq!(EntityKey::household(3).to_string(), "household:3");
    }
}
