// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory store of every synchronized entity.
//!
//! The [`Registry`] does no locking of its own: the
//! [`Synchronizer`](crate::sync::Synchronizer) keeps it behind a session
//! mutex. Individual entities are held in [`EntityHandle`]s so that hosts
//! can keep a handle across passes and see updates as they land.
//!
//! Entities are never removed.

mod partition;

use crate::model::{DeviceEntity, Entity, HouseholdEntity, PetEntity, TagEntity};
use crate::types::{EntityId, EntityKey, EntityKind};

pub use partition::{EntityHandle, Partition, Upsert};

/// Read access to other entities while mapping one of them.
pub trait EntityLookup {
    /// Returns a copy of a device.
    fn device(&self, id: EntityId) -> Option<DeviceEntity>;

    /// Returns a copy of a household.
    fn household(&self, id: EntityId) -> Option<HouseholdEntity>;

    /// Returns a copy of a tag.
    fn tag(&self, id: EntityId) -> Option<TagEntity>;
}

/// All known entities, partitioned by kind.
#[derive(Debug, Default)]
pub struct Registry {
    devices: Partition<DeviceEntity>,
    pets: Partition<PetEntity>,
    households: Partition<HouseholdEntity>,
    tags: Partition<TagEntity>,
    account_serial_number: Option<String>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the devices.
    #[must_use]
    pub const fn devices(&self) -> &Partition<DeviceEntity> {
        &self.devices
    }

    /// Returns the devices, mutably.
    pub const fn devices_mut(&mut self) -> &mut Partition<DeviceEntity> {
        &mut self.devices
    }

    /// Returns the pets.
    #[must_use]
    pub const fn pets(&self) -> &Partition<PetEntity> {
        &self.pets
    }

    /// Returns the pets, mutably.
    pub const fn pets_mut(&mut self) -> &mut Partition<PetEntity> {
        &mut self.pets
    }

    /// Returns the households.
    #[must_use]
    pub const fn households(&self) -> &Partition<HouseholdEntity> {
        &self.households
    }

    /// Returns the households, mutably.
    pub const fn households_mut(&mut self) -> &mut Partition<HouseholdEntity> {
        &mut self.households
    }

    /// Returns the tags.
    #[must_use]
    pub const fn tags(&self) -> &Partition<TagEntity> {
        &self.tags
    }

    /// Returns the tags, mutably.
    pub const fn tags_mut(&mut self) -> &mut Partition<TagEntity> {
        &mut self.tags
    }

    /// Returns a copy of any entity.
    #[must_use]
    pub fn get(&self, key: EntityKey) -> Option<Entity> {
        match key.kind {
            EntityKind::Device => self.devices.snapshot(key.id).map(Entity::Device),
            EntityKind::Pet => self.pets.snapshot(key.id).map(Entity::Pet),
            EntityKind::Household => self.households.snapshot(key.id).map(Entity::Household),
            EntityKind::Tag => self.tags.snapshot(key.id).map(Entity::Tag),
        }
    }

    /// Returns `true` if the entity is known.
    #[must_use]
    pub fn contains(&self, key: EntityKey) -> bool {
        match key.kind {
            EntityKind::Device => self.devices.contains(key.id),
            EntityKind::Pet => self.pets.contains(key.id),
            EntityKind::Household => self.households.contains(key.id),
            EntityKind::Tag => self.tags.contains(key.id),
        }
    }

    /// Inserts or merges any entity.
    pub fn upsert(&mut self, entity: Entity) -> Upsert {
        match entity {
            Entity::Device(e) => self.devices.upsert(e),
            Entity::Pet(e) => self.pets.upsert(e),
            Entity::Household(e) => self.households.upsert(e),
            Entity::Tag(e) => self.tags.upsert(e),
        }
    }

    /// Returns the account serial number, once a summary has reported it.
    #[must_use]
    pub fn account_serial_number(&self) -> Option<&str> {
        self.account_serial_number.as_deref()
    }

    /// Records the account serial number.
    pub fn set_account_serial_number(&mut self, serial: impl Into<String>) {
        self.account_serial_number = Some(serial.into());
    }

    /// Returns the number of entities of all kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len() + self.pets.len() + self.households.len() + self.tags.len()
    }

    /// Returns `true` if no entity is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EntityLookup for Registry {
    fn device(&self, id: EntityId) -> Option<DeviceEntity> {
        self.devices.snapshot(id)
    }

    fn household(&self, id: EntityId) -> Option<HouseholdEntity> {
        self.households.snapshot(id)
    }

    fn tag(&self, id: EntityId) -> Option<TagEntity> {
        self.tags.snapshot(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeviceKind;

    #[test]
    fn get_by_key() {
        let mut registry = Registry::new();
        registry.upsert(DeviceEntity::new(1, DeviceKind::Hub).into());
        registry.upsert(PetEntity::new(1).into());

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(EntityKey::device(1)).map(|e| e.kind()), Some(EntityKind::Device));
        assert_eq!(registry.get(EntityKey::pet(1)).map(|e| e.kind()), Some(EntityKind::Pet));
        assert!(registry.get(EntityKey::household(1)).is_none());
        assert!(registry.contains(EntityKey::pet(1)));
    }

    #[test]
    fn lookup_returns_copies() {
        let mut registry = Registry::new();
        registry.upsert(TagEntity::new(4, "985112345678901").into());
        let tag = registry.tag(EntityId::new(4)).unwrap();
        assert_eq!(tag.tag.as_deref(), Some("985112345678901"));
        assert!(registry.device(EntityId::new(4)).is_none());
    }

    #[test]
    fn account_serial_number() {
        let mut registry = Registry::new();
        assert!(registry.account_serial_number().is_none());
        registry.set_account_serial_number("s18");
        assert_eq!(registry.account_serial_number(), Some("s18"));
        assert!(registry.is_empty());
    }
}
