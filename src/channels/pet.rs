// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pet channels.

use crate::model::{ChangedBy, FeedEvent, PetEntity};
use crate::types::{BowlLayout, ChannelValue, Unit};

use super::device::MAX_BOWLS;
use super::names;
use super::{ChannelSet, MapContext};

/// Maps a pet to its channels.
///
/// The tag, the device or user behind the last location change, and the
/// feeder of the latest feed event are resolved through the context lookup;
/// references that do not resolve produce no channel.
#[must_use]
pub fn map_pet(pet: &PetEntity, context: &MapContext<'_>) -> ChannelSet {
    let mut set = ChannelSet::new();
    set.push(names::ID, pet.base.id.value());
    set.push_opt(names::NAME, pet.name.as_deref());
    set.push_opt(names::COMMENT, pet.comments.as_deref());
    set.push_opt(names::GENDER, pet.gender_id.map(|id| id.to_string()));
    set.push_opt(names::BREED, pet.breed_id.map(|id| id.to_string()));
    set.push_opt(names::SPECIES, pet.species_id.map(|id| id.to_string()));
    set.push_opt(names::PHOTO_URL, pet.photo_url.as_deref());

    if let Some(location) = &pet.location {
        set.push(names::LOCATION, location.where_id.to_string());
        set.push_opt(names::LOCATION_CHANGED, context.zoned_opt(location.changed_at));
    }
    set.push_opt(names::DATE_OF_BIRTH, context.zoned_opt(pet.date_of_birth));
    set.push_opt(
        names::WEIGHT,
        pet.weight.map(|kg| ChannelValue::quantity(kg, Unit::Kilogram)),
    );
    set.push_opt(
        names::TAG_IDENTIFIER,
        pet.tag_id
            .and_then(|id| context.lookup().tag(id))
            .and_then(|tag| tag.tag),
    );
    set.push_opt(names::LOCATION_CHANGED_THROUGH, changed_through(pet, context));

    if let Some(feeding) = pet.latest_feeding() {
        push_feeding(&mut set, feeding, context);
    }
    set
}

/// Resolves who or what moved the pet last.
fn changed_through(pet: &PetEntity, context: &MapContext<'_>) -> Option<String> {
    match pet.location.as_ref()?.changed_by()? {
        ChangedBy::Device(id) => context.lookup().device(id)?.name,
        ChangedBy::User(id) => {
            let household = context.lookup().household(pet.household_id?)?;
            household.user_name(id).map(str::to_string)
        }
    }
}

fn push_feeding(set: &mut ChannelSet, feeding: &FeedEvent, context: &MapContext<'_>) {
    let Some(feeder) = feeding.device_id.and_then(|id| context.lookup().device(id)) else {
        return;
    };
    set.push_opt(names::FEEDER_DEVICE, feeder.name.as_deref());

    let grams = |value: f64| ChannelValue::quantity(value, Unit::Gram);
    for (i, change) in feeding.changes.iter().copied().take(MAX_BOWLS).enumerate() {
        let channel = match (feeder.bowl_layout(), i) {
            (Some(BowlLayout::Single), 0) => names::FEEDER_LAST_CHANGE,
            (Some(BowlLayout::Double), 0) => names::FEEDER_LAST_CHANGE_LEFT,
            (Some(BowlLayout::Double), 1) => names::FEEDER_LAST_CHANGE_RIGHT,
            _ => continue,
        };
        set.push(channel, grams(change));
    }
    set.push_opt(names::FEEDER_LAST_FEEDING, context.zoned_opt(feeding.at));
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::channels::test_support::MapLookup;
    use crate::model::{DeviceEntity, HouseholdEntity, LocationRecord, TagEntity, normalize_record};
    use crate::types::{DeviceKind, EntityId};

    fn lookup() -> MapLookup {
        let mut lookup = MapLookup::default();
        lookup.households.insert(
            EntityId::new(1),
            HouseholdEntity::new(1).with_user(5, "A").with_user(7, "B"),
        );
        lookup
            .devices
            .insert(EntityId::new(12), DeviceEntity::new(12, DeviceKind::CatFlap).with_name("Back Door"));
        lookup
            .tags
            .insert(EntityId::new(40), TagEntity::new(40, "985112345678901"));
        for (id, bowl_type) in [(30, 1), (31, 4), (32, 2)] {
            let feeder: DeviceEntity = normalize_record(&json!({
                "id": id,
                "name": format!("Feeder {id}"),
                "product_id": 4,
                "control": {"bowls": {"type": bowl_type}}
            }))
            .unwrap();
            lookup.devices.insert(EntityId::new(id), feeder);
        }
        lookup
    }

    fn map(pet: &PetEntity) -> ChannelSet {
        let lookup = lookup();
        map_pet(pet, &MapContext::new(&lookup))
    }

    fn moved_by_user(user_id: i64) -> PetEntity {
        let mut location = LocationRecord::new(1);
        location.changed_by_user_id = Some(EntityId::new(user_id));
        PetEntity::new(77).with_household(1).with_location(location)
    }

    fn fed_at(device_id: i64, changes: Vec<f64>) -> PetEntity {
        PetEntity::new(77).with_feed_event(FeedEvent {
            device_id: Some(EntityId::new(device_id)),
            changes,
            at: Some("2024-03-01T09:00:00Z".parse().unwrap()),
        })
    }

    #[test]
    fn changed_through_user() {
        let set = map(&moved_by_user(7));
        assert_eq!(set.get("locationChangedThrough").and_then(|v| v.as_str()), Some("B"));

        let set = map(&moved_by_user(99));
        assert!(!set.contains("locationChangedThrough"));
    }

    #[test]
    fn changed_through_device() {
        let mut location = LocationRecord::new(2);
        location.changed_by_device_id = Some(EntityId::new(12));
        location.changed_by_user_id = Some(EntityId::new(5));
        let set = map(&PetEntity::new(77).with_household(1).with_location(location));
        assert_eq!(set.get("locationChangedThrough").and_then(|v| v.as_str()), Some("Back Door"));
        assert_eq!(set.get("location").and_then(|v| v.as_str()), Some("2"));
    }

    #[test]
    fn single_bowl_uses_first_reading() {
        let set = map(&fed_at(30, vec![-3.5, -1.0]));
        assert_eq!(set.get("feederLastChange"), Some(&ChannelValue::quantity(-3.5, Unit::Gram)));
        assert!(!set.contains("feederLastChangeLeft"));
        assert!(!set.contains("feederLastChangeRight"));
        assert_eq!(set.get("feederDevice").and_then(|v| v.as_str()), Some("Feeder 30"));
        assert!(set.contains("feederLastFeeding"));
    }

    #[test]
    fn double_bowl_splits_left_and_right() {
        let set = map(&fed_at(31, vec![-4.0, -1.5, -9.0]));
        assert_eq!(set.get("feederLastChangeLeft"), Some(&ChannelValue::quantity(-4.0, Unit::Gram)));
        assert_eq!(set.get("feederLastChangeRight"), Some(&ChannelValue::quantity(-1.5, Unit::Gram)));
        assert!(!set.contains("feederLastChange"));
    }

    #[test]
    fn other_bowl_type_has_no_bowl_channels() {
        let set = map(&fed_at(32, vec![-4.0, -1.5]));
        assert!(!set.contains("feederLastChange"));
        assert!(!set.contains("feederLastChangeLeft"));
        assert!(set.contains("feederDevice"));
    }

    #[test]
    fn unknown_feeder_has_no_feeding_channels() {
        let set = map(&fed_at(999, vec![-4.0]));
        assert!(!set.contains("feederDevice"));
        assert!(!set.contains("feederLastFeeding"));
    }

    #[test]
    fn omitted_weight_and_tag() {
        let set = map(&PetEntity::new(77).with_name("Tom"));
        assert!(!set.contains("weight"));
        assert!(!set.contains("tagIdentifier"));
        assert!(!set.contains("location"));
        assert_eq!(set.get("name").and_then(|v| v.as_str()), Some("Tom"));
    }

    #[test]
    fn weight_and_tag_when_present() {
        let mut pet = PetEntity::new(77);
        pet.weight = Some(4.2);
        pet.tag_id = Some(EntityId::new(40));
        let set = map(&pet);
        assert_eq!(set.get("weight"), Some(&ChannelValue::quantity(4.2, Unit::Kilogram)));
        assert_eq!(set.get("tagIdentifier").and_then(|v| v.as_str()), Some("985112345678901"));
    }
}
