// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed writes against a remote entity.

use std::fmt;

use serde_json::{Value, json};

use crate::channels::names;
use crate::model::Entity;
use crate::types::{DeviceKind, EntityKind};

/// A change to apply on the remote side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityCommand {
    /// Move a pet inside (1) or outside (2).
    SetPetLocation {
        /// Remote location code.
        where_id: i64,
    },
    /// Change the locking mode of a flap.
    SetLockingMode {
        /// Remote locking mode code.
        mode_id: i64,
    },
    /// Change the LED brightness mode of a hub.
    SetLedMode {
        /// Remote LED mode code.
        mode_id: i64,
    },
}

impl EntityCommand {
    /// Returns the kind of entity the command targets.
    #[must_use]
    pub const fn target_kind(&self) -> EntityKind {
        match self {
            Self::SetPetLocation { .. } => EntityKind::Pet,
            Self::SetLockingMode { .. } | Self::SetLedMode { .. } => EntityKind::Device,
        }
    }

    /// Returns the channel the command is reflected on.
    #[must_use]
    pub const fn channel(&self) -> &'static str {
        match self {
            Self::SetPetLocation { .. } => names::LOCATION,
            Self::SetLockingMode { .. } => names::LOCKING_MODE_ID,
            Self::SetLedMode { .. } => names::LED_MODE_ID,
        }
    }

    /// Returns the resource path below the entity the command is sent to.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::SetPetLocation { .. } => "position",
            Self::SetLockingMode { .. } | Self::SetLedMode { .. } => "control",
        }
    }

    /// Returns the JSON request body.
    #[must_use]
    pub fn body(&self) -> Value {
        match self {
            Self::SetPetLocation { where_id } => json!({ "where": where_id }),
            Self::SetLockingMode { mode_id } => json!({ "locking": mode_id }),
            Self::SetLedMode { mode_id } => json!({ "led_mode": mode_id }),
        }
    }

    /// Returns the value the command asks for.
    #[must_use]
    pub const fn requested_value(&self) -> i64 {
        match self {
            Self::SetPetLocation { where_id } => *where_id,
            Self::SetLockingMode { mode_id } | Self::SetLedMode { mode_id } => *mode_id,
        }
    }

    /// Reads back the value the command sets from an entity.
    #[must_use]
    pub fn confirmed_value(&self, entity: &Entity) -> Option<i64> {
        match (self, entity) {
            (Self::SetPetLocation { .. }, Entity::Pet(pet)) => {
                pet.location.as_ref().map(|location| location.where_id)
            }
            (Self::SetLockingMode { .. }, Entity::Device(device)) => device.locking_mode_id(),
            (Self::SetLedMode { .. }, Entity::Device(device)) => device.led_mode_id(),
            _ => None,
        }
    }

    /// Returns `true` if the entity accepts this command.
    #[must_use]
    pub fn supports(&self, entity: &Entity) -> bool {
        match (self, entity) {
            (Self::SetPetLocation { .. }, Entity::Pet(_)) => true,
            (Self::SetLockingMode { .. }, Entity::Device(device)) => device.kind.is_flap(),
            (Self::SetLedMode { .. }, Entity::Device(device)) => device.kind == DeviceKind::Hub,
            _ => false,
        }
    }
}

impl fmt::Display for EntityCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.channel(), self.requested_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeviceEntity, LocationRecord, PetEntity};

    #[test]
    fn bodies() {
        assert_eq!(
            EntityCommand::SetPetLocation { where_id: 2 }.body(),
            json!({"where": 2})
        );
        assert_eq!(
            EntityCommand::SetLockingMode { mode_id: 1 }.body(),
            json!({"locking": 1})
        );
        assert_eq!(EntityCommand::SetLedMode { mode_id: 0 }.path(), "control");
    }

    #[test]
    fn supports_by_device_kind() {
        let flap = Entity::from(DeviceEntity::new(1, DeviceKind::CatFlap));
        let hub = Entity::from(DeviceEntity::new(2, DeviceKind::Hub));
        let locking = EntityCommand::SetLockingMode { mode_id: 1 };
        let led = EntityCommand::SetLedMode { mode_id: 1 };

        assert!(locking.supports(&flap));
        assert!(!locking.supports(&hub));
        assert!(led.supports(&hub));
        assert!(!led.supports(&flap));
        assert!(!EntityCommand::SetPetLocation { where_id: 1 }.supports(&hub));
    }

    #[test]
    fn confirmed_value_reads_entity() {
        let pet = Entity::from(PetEntity::new(1).with_location(LocationRecord::new(2)));
        let command = EntityCommand::SetPetLocation { where_id: 2 };
        assert_eq!(command.confirmed_value(&pet), Some(2));
        assert_eq!(command.confirmed_value(&Entity::from(PetEntity::new(1))), None);
        assert_eq!(command.to_string(), "location=2");
    }
}
