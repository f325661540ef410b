// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mapping of entities to named channel values.
//!
//! Mapping is pure and never fails. A source value that is absent produces
//! no channel update at all; [`ChannelSet::push_opt`] is where that rule
//! lives.

mod battery;
pub(crate) mod device;
pub(crate) mod household;
pub mod names;
pub(crate) mod pet;
pub(crate) mod tag;

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::Serialize;

use crate::model::Entity;
use crate::registry::EntityLookup;
use crate::types::{ChannelValue, Timestamp};

pub use battery::{FULL_VOLTAGE, LOW_FRACTION, battery_level, is_low_battery};

/// A value for one named channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelUpdate {
    /// Channel identifier, e.g. `batteryLevel`.
    pub channel: String,
    /// The new value.
    pub value: ChannelValue,
}

impl ChannelUpdate {
    /// Creates a channel update.
    pub fn new(channel: impl Into<String>, value: impl Into<ChannelValue>) -> Self {
        Self {
            channel: channel.into(),
            value: value.into(),
        }
    }
}

/// Ordered channel updates for one entity.
///
/// # Examples
///
/// ```
/// use cloudstate_lib::channels::ChannelSet;
///
/// let mut set = ChannelSet::new();
/// set.push("name", "Back Door");
/// set.push_opt("online", None::<bool>);
/// set.push_opt("productId", Some(6_i64));
///
/// assert_eq!(set.len(), 2);
/// assert!(set.get("online").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelSet {
    updates: Vec<ChannelUpdate>,
}

impl ChannelSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            updates: Vec::new(),
        }
    }

    /// Appends an update.
    pub fn push(&mut self, channel: impl Into<String>, value: impl Into<ChannelValue>) {
        self.updates.push(ChannelUpdate::new(channel, value));
    }

    /// Appends an update if the value is present.
    pub fn push_opt<V: Into<ChannelValue>>(&mut self, channel: impl Into<String>, value: Option<V>) {
        if let Some(value) = value {
            self.push(channel, value);
        }
    }

    /// Returns the value of a channel.
    #[must_use]
    pub fn get(&self, channel: &str) -> Option<&ChannelValue> {
        self.updates
            .iter()
            .find(|update| update.channel == channel)
            .map(|update| &update.value)
    }

    /// Returns `true` if the channel has an update.
    #[must_use]
    pub fn contains(&self, channel: &str) -> bool {
        self.get(channel).is_some()
    }

    /// Returns the channel names, in order.
    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.updates.iter().map(|update| update.channel.as_str())
    }

    /// Returns the updates as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[ChannelUpdate] {
        &self.updates
    }

    /// Returns the number of updates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.updates.len()
    }

    /// Returns `true` if there are no updates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Consumes the set, returning the updates.
    #[must_use]
    pub fn into_vec(self) -> Vec<ChannelUpdate> {
        self.updates
    }
}

impl IntoIterator for ChannelSet {
    type Item = ChannelUpdate;
    type IntoIter = std::vec::IntoIter<ChannelUpdate>;

    fn into_iter(self) -> Self::IntoIter {
        self.updates.into_iter()
    }
}

/// What a mapper may consult besides the entity itself.
#[derive(Clone, Copy)]
pub struct MapContext<'a> {
    lookup: &'a dyn EntityLookup,
    zone: FixedOffset,
}

impl<'a> MapContext<'a> {
    /// Creates a context rendering timestamps in UTC.
    #[must_use]
    pub fn new(lookup: &'a dyn EntityLookup) -> Self {
        Self {
            lookup,
            zone: Utc.fix(),
        }
    }

    /// Sets the zone timestamps are rendered in.
    #[must_use]
    pub const fn with_zone(mut self, zone: FixedOffset) -> Self {
        self.zone = zone;
        self
    }

    /// Returns the entity lookup.
    #[must_use]
    pub fn lookup(&self) -> &'a dyn EntityLookup {
        self.lookup
    }

    /// Returns the configured zone.
    #[must_use]
    pub const fn zone(&self) -> FixedOffset {
        self.zone
    }

    /// Converts an instant to the configured zone.
    #[must_use]
    pub fn zoned(&self, at: Timestamp) -> DateTime<FixedOffset> {
        at.in_zone(self.zone)
    }

    /// Converts an optional instant to the configured zone.
    #[must_use]
    pub fn zoned_opt(&self, at: Option<Timestamp>) -> Option<DateTime<FixedOffset>> {
        at.map(|at| self.zoned(at))
    }
}

impl std::fmt::Debug for MapContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapContext").field("zone", &self.zone).finish_non_exhaustive()
    }
}

/// Maps any entity to its channel values.
#[must_use]
pub fn map_entity(entity: &Entity, context: &MapContext<'_>) -> ChannelSet {
    match entity {
        Entity::Device(e) => device::map_device(e, context),
        Entity::Pet(e) => pet::map_pet(e, context),
        Entity::Household(e) => household::map_household(e, context),
        Entity::Tag(e) => tag::map_tag(e, context),
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::MapLookup;
    use super::*;

    #[test]
    fn push_opt_omits_absent_values() {
        let mut set = ChannelSet::new();
        set.push_opt("weight", None::<f64>);
        set.push_opt("name", Some("Tom"));
        assert_eq!(set.channels().collect::<Vec<_>>(), vec!["name"]);
    }

    #[test]
    fn context_renders_in_zone() {
        let lookup = MapLookup::default();
        let zone = FixedOffset::east_opt(3600).unwrap();
        let context = MapContext::new(&lookup).with_zone(zone);
        let at: Timestamp = "2024-05-01T10:00:00Z".parse().unwrap();
        assert_eq!(context.zoned(at).to_rfc3339(), "2024-05-01T11:00:00+01:00");
        assert!(context.zoned_opt(None).is_none());
    }
}
