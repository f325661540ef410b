// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-kind entity storage.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::model::Tracked;
use crate::types::EntityId;

/// Shared handle to the canonical copy of an entity.
///
/// Upserts write through the handle, so a handle obtained earlier keeps
/// observing the live entity.
pub type EntityHandle<T> = Arc<RwLock<T>>;

/// Outcome of [`Partition::upsert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// The entity was not known before.
    Inserted,
    /// The entity was known and the merge changed it.
    Updated,
    /// The entity was known and the merge left it as it was.
    Unchanged,
}

impl Upsert {
    /// Returns `true` for [`Upsert::Inserted`] and [`Upsert::Updated`].
    #[must_use]
    pub const fn is_change(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Entities of one kind, keyed by identifier.
#[derive(Debug)]
pub struct Partition<T> {
    entries: HashMap<EntityId, EntityHandle<T>>,
}

impl<T> Default for Partition<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T: Tracked> Partition<T> {
    /// Returns the handle of an entity.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<EntityHandle<T>> {
        self.entries.get(&id).cloned()
    }

    /// Returns a copy of an entity.
    #[must_use]
    pub fn snapshot(&self, id: EntityId) -> Option<T> {
        self.entries.get(&id).map(|handle| handle.read().clone())
    }

    /// Inserts a new entity or merges it into the stored one.
    ///
    /// An existing entity keeps its handle; the merged value is written
    /// through it only when it differs from the stored value.
    pub fn upsert(&mut self, entity: T) -> Upsert {
        match self.entries.entry(entity.id()) {
            Entry::Occupied(slot) => {
                let mut current = slot.get().write();
                let merged = T::merge(&current, entity);
                if merged == *current {
                    Upsert::Unchanged
                } else {
                    *current = merged;
                    Upsert::Updated
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(RwLock::new(entity)));
                Upsert::Inserted
            }
        }
    }

    /// Returns `true` if the entity is known.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Returns the identifiers of all stored entities, in no particular order.
    #[must_use]
    pub fn ids(&self) -> Vec<EntityId> {
        self.entries.keys().copied().collect()
    }

    /// Iterates over all stored handles.
    pub fn values(&self) -> impl Iterator<Item = &EntityHandle<T>> {
        self.entries.values()
    }

    /// Returns the number of stored entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeviceEntity, PetEntity};
    use crate::types::DeviceKind;

    #[test]
    fn insert_then_update_then_unchanged() {
        let mut pets = Partition::default();
        assert_eq!(pets.upsert(PetEntity::new(1).with_name("Tom")), Upsert::Inserted);
        assert_eq!(pets.upsert(PetEntity::new(1).with_name("Tom")), Upsert::Unchanged);
        assert_eq!(pets.upsert(PetEntity::new(1).with_name("Jerry")), Upsert::Updated);
        assert_eq!(pets.len(), 1);
    }

    #[test]
    fn handle_survives_upsert() {
        let mut pets = Partition::default();
        pets.upsert(PetEntity::new(1).with_name("Tom"));
        let before = pets.get(EntityId::new(1)).unwrap();

        pets.upsert(PetEntity::new(1).with_name("Jerry"));

        let after = pets.get(EntityId::new(1)).unwrap();
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(before.read().name.as_deref(), Some("Jerry"));
    }

    #[test]
    fn unknown_kind_keeps_stored_kind() {
        let mut devices = Partition::default();
        devices.upsert(DeviceEntity::new(5, DeviceKind::Eddi));
        devices.upsert(DeviceEntity::new(5, DeviceKind::Unknown).with_name("Diverter"));

        let stored = devices.snapshot(EntityId::new(5)).unwrap();
        assert_eq!(stored.kind, DeviceKind::Eddi);
        assert_eq!(stored.name.as_deref(), Some("Diverter"));
    }

    #[test]
    fn absent_entity() {
        let pets: Partition<PetEntity> = Partition::default();
        assert!(pets.get(EntityId::new(1)).is_none());
        assert!(pets.snapshot(EntityId::new(1)).is_none());
        assert!(!pets.contains(EntityId::new(1)));
        assert!(pets.is_empty());
    }
}
