// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device channels.

use crate::model::DeviceEntity;
use crate::types::{ChannelValue, DeviceKind, Unit};

use super::names::{self, indexed};
use super::{ChannelSet, MapContext, battery_level, is_low_battery};

/// Curfew windows beyond this count are ignored.
pub const MAX_CURFEWS: usize = 4;

/// Bowls beyond this count are ignored.
pub const MAX_BOWLS: usize = 2;

/// Maps a device to its channels according to its kind.
#[must_use]
pub fn map_device(device: &DeviceEntity, context: &MapContext<'_>) -> ChannelSet {
    let mut set = ChannelSet::new();
    set.push(names::ID, device.base.id.value());
    set.push_opt(names::NAME, device.name.as_deref());
    set.push_opt(names::PRODUCT_ID, device.product_id);
    set.push(names::KIND, device.kind.as_str());

    match device.kind {
        DeviceKind::Hub => {
            set.push_opt(names::LED_MODE_ID, device.led_mode_id());
            set.push_opt(names::PAIRING_MODE_ID, device.status.pairing_mode_id);
            push_versions(&mut set, device);
            push_common(&mut set, device, context);
        }
        DeviceKind::PetFlap | DeviceKind::CatFlap => {
            push_curfews(&mut set, device);
            let locking_mode = device.locking_mode_id();
            set.push_opt(names::LOCKING_MODE_ID, locking_mode);
            set.push_opt(names::LOCKING_MODE, locking_mode.map(|mode| mode.to_string()));
            push_versions(&mut set, device);
            push_battery(&mut set, device);
            push_common(&mut set, device, context);
            set.push_opt(names::PAIRING_AT, context.zoned_opt(device.pairing_at));
            push_signal(&mut set, device);
        }
        DeviceKind::Feeder | DeviceKind::Felaqua => {
            push_versions(&mut set, device);
            push_battery(&mut set, device);
            push_common(&mut set, device, context);
            set.push_opt(names::PAIRING_AT, context.zoned_opt(device.pairing_at));
            push_signal(&mut set, device);
            push_bowls(&mut set, device);
        }
        DeviceKind::Repeater
        | DeviceKind::Harvi
        | DeviceKind::Zappi
        | DeviceKind::Eddi
        | DeviceKind::Unknown => {
            set.push_opt(names::FIRMWARE_VERSION, device.firmware_version());
            push_common(&mut set, device, context);
        }
    }
    set
}

fn push_common(set: &mut ChannelSet, device: &DeviceEntity, context: &MapContext<'_>) {
    set.push_opt(names::ONLINE, device.status.online);
    set.push_opt(names::CREATED_AT, context.zoned_opt(device.base.created_at));
    set.push_opt(names::UPDATED_AT, context.zoned_opt(device.base.updated_at));
    set.push_opt(names::SERIAL_NUMBER, device.serial_number.as_deref());
    set.push_opt(names::MAC_ADDRESS, device.mac_address.as_deref());
}

fn push_versions(set: &mut ChannelSet, device: &DeviceEntity) {
    set.push_opt(names::HARDWARE_VERSION, device.hardware_version());
    set.push_opt(names::FIRMWARE_VERSION, device.firmware_version());
}

fn push_battery(set: &mut ChannelSet, device: &DeviceEntity) {
    let Some(voltage) = device.status.battery else {
        return;
    };
    set.push(names::BATTERY_VOLTAGE, ChannelValue::quantity(voltage, Unit::Volt));
    set.push(
        names::BATTERY_LEVEL,
        ChannelValue::quantity(battery_level(voltage), Unit::Percent),
    );
    set.push(names::LOW_BATTERY, is_low_battery(voltage));
}

fn push_signal(set: &mut ChannelSet, device: &DeviceEntity) {
    let Some(signal) = device.status.signal else {
        return;
    };
    let dbm = |rssi: f64| ChannelValue::quantity(rssi, Unit::DecibelMilliwatt);
    set.push_opt(names::DEVICE_RSSI, signal.device_rssi.map(dbm));
    set.push_opt(names::HUB_RSSI, signal.hub_rssi.map(dbm));
}

fn push_curfews(set: &mut ChannelSet, device: &DeviceEntity) {
    for (i, curfew) in device.control.curfew.iter().take(MAX_CURFEWS).enumerate() {
        let index = i + 1;
        set.push_opt(indexed(names::CURFEW_ENABLED, index), curfew.enabled);
        set.push_opt(indexed(names::CURFEW_LOCK_TIME, index), curfew.lock_time.as_deref());
        set.push_opt(indexed(names::CURFEW_UNLOCK_TIME, index), curfew.unlock_time.as_deref());
    }
}

fn push_bowls(set: &mut ChannelSet, device: &DeviceEntity) {
    let Some(bowls) = &device.control.bowls else {
        return;
    };
    set.push_opt(names::BOWL_MODE, bowls.layout().map(|layout| layout.as_str()));
    for (i, bowl) in bowls.settings.iter().take(MAX_BOWLS).enumerate() {
        let index = i + 1;
        set.push_opt(
            indexed(names::BOWL_TARGET, index),
            bowl.target.map(|grams| ChannelValue::quantity(grams, Unit::Gram)),
        );
        set.push_opt(indexed(names::BOWL_FOOD_TYPE, index), bowl.food_type);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::channels::test_support::MapLookup;
    use crate::model::{Curfew, DeviceEntity, normalize_record};

    fn map(device: &DeviceEntity) -> ChannelSet {
        let lookup = MapLookup::default();
        map_device(device, &MapContext::new(&lookup))
    }

    fn flap_with_curfews(count: usize) -> DeviceEntity {
        let mut device = DeviceEntity::new(1, DeviceKind::CatFlap);
        device.control.curfew = (0..count)
            .map(|i| Curfew {
                enabled: Some(true),
                lock_time: Some(format!("2{i}:00")),
                unlock_time: Some("07:00".to_string()),
            })
            .collect();
        device
    }

    #[test]
    fn curfews_are_capped_at_four() {
        let set = map(&flap_with_curfews(6));
        assert!(set.contains("curfewLockTime4"));
        assert!(!set.contains("curfewLockTime5"));
        assert_eq!(set.channels().filter(|c| c.starts_with("curfewEnabled")).count(), 4);
    }

    #[test]
    fn fewer_curfews_map_one_to_one() {
        let set = map(&flap_with_curfews(2));
        assert_eq!(set.get("curfewLockTime2").and_then(|v| v.as_str()), Some("21:00"));
        assert!(!set.contains("curfewLockTime3"));
    }

    #[test]
    fn curfew_fields_omitted_individually() {
        let mut device = DeviceEntity::new(1, DeviceKind::PetFlap);
        device.control.curfew = vec![Curfew {
            enabled: Some(false),
            lock_time: None,
            unlock_time: Some("06:30".to_string()),
        }];
        let set = map(&device);
        assert_eq!(set.get("curfewEnabled1"), Some(&ChannelValue::Boolean(false)));
        assert!(!set.contains("curfewLockTime1"));
        assert!(set.contains("curfewUnlockTime1"));
    }

    #[test]
    fn flap_battery_and_locking() {
        let device: DeviceEntity = normalize_record(&json!({
            "id": 12,
            "product_id": 3,
            "status": {"battery": 3.0, "locking_mode_id": 2, "signal": {"device_rssi": -61.5}}
        }))
        .unwrap();
        let set = map(&device);

        assert_eq!(set.get("batteryLevel").and_then(ChannelValue::as_f64), Some(50.0));
        assert_eq!(set.get("lowBattery"), Some(&ChannelValue::Boolean(true)));
        assert_eq!(set.get("lockingModeId"), Some(&ChannelValue::Integer(2)));
        assert_eq!(set.get("lockingMode").and_then(|v| v.as_str()), Some("2"));
        assert!(set.contains("deviceRssi"));
        assert!(!set.contains("hubRssi"));
    }

    #[test]
    fn missing_battery_omits_battery_channels() {
        let set = map(&DeviceEntity::new(1, DeviceKind::Feeder));
        assert!(!set.contains("batteryVoltage"));
        assert!(!set.contains("batteryLevel"));
        assert!(!set.contains("lowBattery"));
    }

    #[test]
    fn hub_channels() {
        let mut device = DeviceEntity::new(1, DeviceKind::Hub).with_name("Hub");
        device.status.led_mode_id = Some(4);
        device.status.online = Some(true);
        let set = map(&device);

        assert_eq!(set.get("ledModeId"), Some(&ChannelValue::Integer(4)));
        assert_eq!(set.get("online"), Some(&ChannelValue::Boolean(true)));
        assert!(!set.contains("curfewEnabled1"));
        assert!(!set.contains("batteryLevel"));
    }

    #[test]
    fn feeder_bowls() {
        let device: DeviceEntity = normalize_record(&json!({
            "id": 30,
            "product_id": 4,
            "control": {"bowls": {"type": 4, "settings": [
                {"food_type": 1, "target": 40},
                {"food_type": 2, "target": 25},
                {"food_type": 2, "target": 99}
            ]}}
        }))
        .unwrap();
        let set = map(&device);

        assert_eq!(set.get("bowlMode").and_then(|v| v.as_str()), Some("double"));
        assert_eq!(set.get("bowlTarget2"), Some(&ChannelValue::quantity(25.0, Unit::Gram)));
        assert!(!set.contains("bowlTarget3"));
    }

    #[test]
    fn flap_versions_from_nested_block() {
        let device: DeviceEntity = normalize_record(&json!({
            "id": 14,
            "product_id": 6,
            "status": {"version": {"device": {"hardware": 4, "firmware": 1.177}}}
        }))
        .unwrap();
        let set = map(&device);

        assert_eq!(set.get("hardwareVersion").and_then(|v| v.as_str()), Some("4"));
        assert_eq!(set.get("firmwareVersion").and_then(|v| v.as_str()), Some("1.177"));
    }

    #[test]
    fn charger_channels() {
        let mut device = DeviceEntity::new(16_000_001, DeviceKind::Zappi);
        device.status.firmware_version = Some("3560S3.054".to_string());
        let set = map(&device);
        assert_eq!(set.get("kind").and_then(|v| v.as_str()), Some("zappi"));
        assert!(set.contains("firmwareVersion"));
        assert!(!set.contains("hardwareVersion"));
    }
}
