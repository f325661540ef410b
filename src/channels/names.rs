// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Channel identifiers.
//!
//! Indexed channels (curfews, bowls) append a 1-based index to the prefix.

// Shared
pub const ID: &str = "id";
pub const NAME: &str = "name";
pub const CREATED_AT: &str = "createdAt";
pub const UPDATED_AT: &str = "updatedAt";

// Devices
pub const PRODUCT_ID: &str = "productId";
pub const KIND: &str = "kind";
pub const LED_MODE_ID: &str = "ledModeId";
pub const PAIRING_MODE_ID: &str = "pairingModeId";
pub const HARDWARE_VERSION: &str = "hardwareVersion";
pub const FIRMWARE_VERSION: &str = "firmwareVersion";
pub const ONLINE: &str = "online";
pub const PAIRING_AT: &str = "pairingAt";
pub const SERIAL_NUMBER: &str = "serialNumber";
pub const MAC_ADDRESS: &str = "macAddress";
pub const DEVICE_RSSI: &str = "deviceRssi";
pub const HUB_RSSI: &str = "hubRssi";
pub const BATTERY_VOLTAGE: &str = "batteryVoltage";
pub const BATTERY_LEVEL: &str = "batteryLevel";
pub const LOW_BATTERY: &str = "lowBattery";
pub const LOCKING_MODE_ID: &str = "lockingModeId";
pub const LOCKING_MODE: &str = "lockingMode";
pub const CURFEW_ENABLED: &str = "curfewEnabled";
pub const CURFEW_LOCK_TIME: &str = "curfewLockTime";
pub const CURFEW_UNLOCK_TIME: &str = "curfewUnlockTime";
pub const BOWL_MODE: &str = "bowlMode";
pub const BOWL_TARGET: &str = "bowlTarget";
pub const BOWL_FOOD_TYPE: &str = "bowlFoodType";

// Pets
pub const COMMENT: &str = "comment";
pub const GENDER: &str = "gender";
pub const BREED: &str = "breed";
pub const SPECIES: &str = "species";
pub const PHOTO_URL: &str = "photoUrl";
pub const LOCATION: &str = "location";
pub const LOCATION_CHANGED: &str = "locationChanged";
pub const LOCATION_CHANGED_THROUGH: &str = "locationChangedThrough";
pub const DATE_OF_BIRTH: &str = "dateOfBirth";
pub const WEIGHT: &str = "weight";
pub const TAG_IDENTIFIER: &str = "tagIdentifier";
pub const FEEDER_DEVICE: &str = "feederDevice";
pub const FEEDER_LAST_CHANGE: &str = "feederLastChange";
pub const FEEDER_LAST_CHANGE_LEFT: &str = "feederLastChangeLeft";
pub const FEEDER_LAST_CHANGE_RIGHT: &str = "feederLastChangeRight";
pub const FEEDER_LAST_FEEDING: &str = "feederLastFeeding";

// Households
pub const TIMEZONE: &str = "timezone";
pub const USER_COUNT: &str = "userCount";

// Tags
pub const TAG: &str = "tag";

/// Builds an indexed channel name such as `curfewLockTime2`.
#[must_use]
pub fn indexed(prefix: &str, index: usize) -> String {
    format!("{prefix}{index}")
}
