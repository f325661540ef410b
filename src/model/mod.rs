// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Normalized entities synchronized from the remote account.
//!
//! Every entity embeds an [`EntityBase`] and implements [`Tracked`], the
//! per-kind capability the [`Synchronizer`](crate::sync::Synchronizer) is
//! generic over: how to pull records of that kind out of a
//! [`DeviceSummary`], where they live in the [`Registry`], how two copies
//! merge and which channels they map to.

mod base;
mod device;
mod household;
mod pet;
mod summary;
mod tag;

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::channels::{self, ChannelSet, MapContext};
use crate::error::RecordError;
use crate::registry::{Partition, Registry};
use crate::types::{EntityId, EntityKey, EntityKind};

pub use base::EntityBase;
pub use device::{
    Bowl, BowlSettings, ControlSettings, Curfew, DeviceEntity, DeviceVersion, Locking, Signal,
    StatusSnapshot, StatusVersion,
};
pub use household::{HouseholdEntity, HouseholdUser};
pub use pet::{ChangedBy, FeedEvent, LocationRecord, PetEntity};
pub use summary::{DeviceSummary, prepare_device_record};
pub use tag::TagEntity;

/// Capabilities of one entity kind.
pub trait Tracked: Clone + PartialEq + DeserializeOwned + Send + Sync + 'static {
    /// The kind this type represents.
    const KIND: EntityKind;

    /// Returns the embedded base record.
    fn base(&self) -> &EntityBase;

    /// Returns the identifier.
    fn id(&self) -> EntityId {
        self.base().id
    }

    /// Returns the identifier qualified by kind.
    fn key(&self) -> EntityKey {
        EntityKey::new(Self::KIND, self.id())
    }

    /// Combines a stored copy with a freshly fetched one.
    #[must_use]
    fn merge(existing: &Self, incoming: Self) -> Self;

    /// Fills in fields derivable from other fields.
    #[must_use]
    fn normalized(self) -> Self {
        self
    }

    /// Checks the record invariants.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Malformed`] if an invariant is violated.
    fn validate(&self) -> Result<(), RecordError> {
        self.base().validate(Self::KIND)
    }

    /// Returns descriptive properties pushed alongside channel values.
    fn properties(&self) -> BTreeMap<String, String> {
        self.base().properties()
    }

    /// Normalizes every record of this kind in a summary.
    fn from_summary(summary: &DeviceSummary) -> Vec<Result<Self, RecordError>>;

    /// Returns the registry partition holding this kind.
    fn partition(registry: &Registry) -> &Partition<Self>;

    /// Returns the registry partition holding this kind, mutably.
    fn partition_mut(registry: &mut Registry) -> &mut Partition<Self>;

    /// Maps the entity to channel values.
    fn channels(&self, context: &MapContext<'_>) -> ChannelSet;

    /// Wraps the entity in an [`Entity`].
    fn into_entity(self) -> Entity;

    /// Unwraps an [`Entity`] of this kind.
    fn from_entity(entity: Entity) -> Option<Self>;
}

/// Deserializes, normalizes and validates one raw record.
///
/// # Errors
///
/// Returns [`RecordError::Malformed`] if the record does not decode or
/// violates an invariant.
pub fn normalize_record<T: Tracked>(record: &Value) -> Result<T, RecordError> {
    let entity = T::deserialize(record)
        .map_err(|e| RecordError::malformed(T::KIND, e.to_string()))?
        .normalized();
    entity.validate()?;
    Ok(entity)
}

fn normalize_all<T: Tracked>(records: &[Value]) -> Vec<Result<T, RecordError>> {
    records.iter().map(normalize_record::<T>).collect()
}

/// Reads a string that the remote side sometimes sends as a number.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Integer(i64),
        Decimal(f64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(text) => text,
        Raw::Integer(value) => value.to_string(),
        Raw::Decimal(value) => value.to_string(),
    }))
}

impl Tracked for DeviceEntity {
    const KIND: EntityKind = EntityKind::Device;

    fn base(&self) -> &EntityBase {
        &self.base
    }

    fn merge(existing: &Self, incoming: Self) -> Self {
        existing.merge(incoming)
    }

    fn normalized(self) -> Self {
        self.with_resolved_kind()
    }

    fn properties(&self) -> BTreeMap<String, String> {
        Self::properties(self)
    }

    fn from_summary(summary: &DeviceSummary) -> Vec<Result<Self, RecordError>> {
        summary
            .device_records()
            .map(|(line, record)| normalize_record(&prepare_device_record(line, record)))
            .collect()
    }

    fn partition(registry: &Registry) -> &Partition<Self> {
        registry.devices()
    }

    fn partition_mut(registry: &mut Registry) -> &mut Partition<Self> {
        registry.devices_mut()
    }

    fn channels(&self, context: &MapContext<'_>) -> ChannelSet {
        channels::device::map_device(self, context)
    }

    fn into_entity(self) -> Entity {
        Entity::Device(self)
    }

    fn from_entity(entity: Entity) -> Option<Self> {
        match entity {
            Entity::Device(device) => Some(device),
            _ => None,
        }
    }
}

impl Tracked for PetEntity {
    const KIND: EntityKind = EntityKind::Pet;

    fn base(&self) -> &EntityBase {
        &self.base
    }

    fn merge(existing: &Self, incoming: Self) -> Self {
        existing.merge(incoming)
    }

    fn from_summary(summary: &DeviceSummary) -> Vec<Result<Self, RecordError>> {
        normalize_all(&summary.pets)
    }

    fn partition(registry: &Registry) -> &Partition<Self> {
        registry.pets()
    }

    fn partition_mut(registry: &mut Registry) -> &mut Partition<Self> {
        registry.pets_mut()
    }

    fn channels(&self, context: &MapContext<'_>) -> ChannelSet {
        channels::pet::map_pet(self, context)
    }

    fn into_entity(self) -> Entity {
        Entity::Pet(self)
    }

    fn from_entity(entity: Entity) -> Option<Self> {
        match entity {
            Entity::Pet(pet) => Some(pet),
            _ => None,
        }
    }
}

impl Tracked for HouseholdEntity {
    const KIND: EntityKind = EntityKind::Household;

    fn base(&self) -> &EntityBase {
        &self.base
    }

    fn merge(existing: &Self, incoming: Self) -> Self {
        existing.merge(incoming)
    }

    fn from_summary(summary: &DeviceSummary) -> Vec<Result<Self, RecordError>> {
        normalize_all(&summary.households)
    }

    fn partition(registry: &Registry) -> &Partition<Self> {
        registry.households()
    }

    fn partition_mut(registry: &mut Registry) -> &mut Partition<Self> {
        registry.households_mut()
    }

    fn channels(&self, context: &MapContext<'_>) -> ChannelSet {
        channels::household::map_household(self, context)
    }

    fn into_entity(self) -> Entity {
        Entity::Household(self)
    }

    fn from_entity(entity: Entity) -> Option<Self> {
        match entity {
            Entity::Household(household) => Some(household),
            _ => None,
        }
    }
}

impl Tracked for TagEntity {
    const KIND: EntityKind = EntityKind::Tag;

    fn base(&self) -> &EntityBase {
        &self.base
    }

    fn merge(existing: &Self, incoming: Self) -> Self {
        existing.merge(incoming)
    }

    fn from_summary(summary: &DeviceSummary) -> Vec<Result<Self, RecordError>> {
        normalize_all(&summary.tags)
    }

    fn partition(registry: &Registry) -> &Partition<Self> {
        registry.tags()
    }

    fn partition_mut(registry: &mut Registry) -> &mut Partition<Self> {
        registry.tags_mut()
    }

    fn channels(&self, context: &MapContext<'_>) -> ChannelSet {
        channels::tag::map_tag(self, context)
    }

    fn into_entity(self) -> Entity {
        Entity::Tag(self)
    }

    fn from_entity(entity: Entity) -> Option<Self> {
        match entity {
            Entity::Tag(tag) => Some(tag),
            _ => None,
        }
    }
}

/// Any synchronized entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "entity", rename_all = "lowercase")]
pub enum Entity {
    /// A device.
    Device(DeviceEntity),
    /// A pet.
    Pet(PetEntity),
    /// A household.
    Household(HouseholdEntity),
    /// A tag.
    Tag(TagEntity),
}

impl Entity {
    /// Decodes a single raw record of the given kind.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Malformed`] if the record does not decode or
    /// violates an invariant.
    pub fn from_record(kind: EntityKind, record: &Value) -> Result<Self, RecordError> {
        Ok(match kind {
            EntityKind::Device => Self::Device(normalize_record(record)?),
            EntityKind::Pet => Self::Pet(normalize_record(record)?),
            EntityKind::Household => Self::Household(normalize_record(record)?),
            EntityKind::Tag => Self::Tag(normalize_record(record)?),
        })
    }

    /// Returns the kind of the entity.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Device(_) => EntityKind::Device,
            Self::Pet(_) => EntityKind::Pet,
            Self::Household(_) => EntityKind::Household,
            Self::Tag(_) => EntityKind::Tag,
        }
    }

    /// Returns the embedded base record.
    #[must_use]
    pub const fn base(&self) -> &EntityBase {
        match self {
            Self::Device(e) => &e.base,
            Self::Pet(e) => &e.base,
            Self::Household(e) => &e.base,
            Self::Tag(e) => &e.base,
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.base().id
    }

    /// Returns the identifier qualified by kind.
    #[must_use]
    pub const fn key(&self) -> EntityKey {
        EntityKey::new(self.kind(), self.id())
    }

    /// Fills in fields derivable from other fields.
    #[must_use]
    pub fn normalized(self) -> Self {
        match self {
            Self::Device(e) => Self::Device(e.normalized()),
            other => other,
        }
    }

    /// Checks the record invariants.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Malformed`] if an invariant is violated.
    pub fn validate(&self) -> Result<(), RecordError> {
        self.base().validate(self.kind())
    }

    /// Returns descriptive properties.
    #[must_use]
    pub fn properties(&self) -> BTreeMap<String, String> {
        match self {
            Self::Device(e) => e.properties(),
            Self::Pet(e) => Tracked::properties(e),
            Self::Household(e) => Tracked::properties(e),
            Self::Tag(e) => Tracked::properties(e),
        }
    }

    /// Maps the entity to channel values.
    #[must_use]
    pub fn channels(&self, context: &MapContext<'_>) -> ChannelSet {
        channels::map_entity(self, context)
    }

    /// Returns the device, if this is one.
    #[must_use]
    pub const fn as_device(&self) -> Option<&DeviceEntity> {
        match self {
            Self::Device(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the pet, if this is one.
    #[must_use]
    pub const fn as_pet(&self) -> Option<&PetEntity> {
        match self {
            Self::Pet(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the household, if this is one.
    #[must_use]
    pub const fn as_household(&self) -> Option<&HouseholdEntity> {
        match self {
            Self::Household(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DeviceEntity> for Entity {
    fn from(entity: DeviceEntity) -> Self {
        Self::Device(entity)
    }
}

impl From<PetEntity> for Entity {
    fn from(entity: PetEntity) -> Self {
        Self::Pet(entity)
    }
}

impl From<HouseholdEntity> for Entity {
    fn from(entity: HouseholdEntity) -> Self {
        Self::Household(entity)
    }
}

impl From<TagEntity> for Entity {
    fn from(entity: TagEntity) -> Self {
        Self::Tag(entity)
    }
}
