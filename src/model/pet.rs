// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pet entities and their location and feeding records.

use serde::{Deserialize, Serialize};

use crate::types::{EntityId, Timestamp};

use super::EntityBase;

/// A pet registered with the remote account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetEntity {
    /// Shared base fields.
    #[serde(flatten)]
    pub base: EntityBase,
    /// Display name.
    pub name: Option<String>,
    /// Free-form notes.
    pub comments: Option<String>,
    /// Remote breed code.
    pub breed_id: Option<i64>,
    /// Remote species code.
    pub species_id: Option<i64>,
    /// Remote gender code.
    pub gender_id: Option<i64>,
    /// Date of birth.
    pub date_of_birth: Option<Timestamp>,
    /// Weight in kilograms.
    pub weight: Option<f64>,
    /// Microchip or collar tag the pet wears.
    pub tag_id: Option<EntityId>,
    /// Owning household.
    pub household_id: Option<EntityId>,
    /// Photo location.
    pub photo_url: Option<String>,
    /// Last known position.
    pub location: Option<LocationRecord>,
    /// Feed events, oldest first.
    #[serde(rename = "feeding", default)]
    pub feeding_history: Vec<FeedEvent>,
}

impl PetEntity {
    /// Creates a pet with only an identifier.
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self {
            base: EntityBase::new(EntityId::new(id)),
            name: None,
            comments: None,
            breed_id: None,
            species_id: None,
            gender_id: None,
            date_of_birth: None,
            weight: None,
            tag_id: None,
            household_id: None,
            photo_url: None,
            location: None,
            feeding_history: Vec::new(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the owning household.
    #[must_use]
    pub fn with_household(mut self, id: i64) -> Self {
        self.household_id = Some(EntityId::new(id));
        self
    }

    /// Sets the location record.
    #[must_use]
    pub fn with_location(mut self, location: LocationRecord) -> Self {
        self.location = Some(location);
        self
    }

    /// Appends a feed event.
    #[must_use]
    pub fn with_feed_event(mut self, event: FeedEvent) -> Self {
        self.feeding_history.push(event);
        self
    }

    /// Returns the most recent feed event.
    #[must_use]
    pub fn latest_feeding(&self) -> Option<&FeedEvent> {
        self.feeding_history.last()
    }

    /// Merges a freshly fetched copy onto this one.
    #[must_use]
    pub fn merge(&self, incoming: Self) -> Self {
        Self {
            base: self.base.assign(&incoming.base),
            ..incoming
        }
    }
}

/// Where a pet is and how it got there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
    /// Remote location code (1 inside, 2 outside).
    #[serde(rename = "where")]
    pub where_id: i64,
    /// When the location last changed.
    #[serde(rename = "since", default)]
    pub changed_at: Option<Timestamp>,
    /// Flap the pet passed through, if any.
    #[serde(rename = "device_id", default)]
    pub changed_by_device_id: Option<EntityId>,
    /// User who set the location manually, if any.
    #[serde(rename = "user_id", default)]
    pub changed_by_user_id: Option<EntityId>,
}

impl LocationRecord {
    /// Creates a location record with only a where code.
    #[must_use]
    pub const fn new(where_id: i64) -> Self {
        Self {
            where_id,
            changed_at: None,
            changed_by_device_id: None,
            changed_by_user_id: None,
        }
    }

    /// Returns what caused the last change. A device wins over a user.
    #[must_use]
    pub fn changed_by(&self) -> Option<ChangedBy> {
        self.changed_by_device_id
            .map(ChangedBy::Device)
            .or_else(|| self.changed_by_user_id.map(ChangedBy::User))
    }
}

/// Origin of a location change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangedBy {
    /// A flap recorded the pet passing through.
    Device(EntityId),
    /// A household user set the location.
    User(EntityId),
}

/// A single visit to a feeder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedEvent {
    /// The feeder used.
    pub device_id: Option<EntityId>,
    /// Weight change per bowl in grams, left bowl first.
    #[serde(rename = "change")]
    pub changes: Vec<f64>,
    /// When the visit ended.
    pub at: Option<Timestamp>,
}
