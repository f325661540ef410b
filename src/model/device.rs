// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device entities: hubs, flaps, feeders and charger hardware.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{BowlLayout, DeviceKind, EntityId, Timestamp};

use super::EntityBase;
use super::lenient_string;

/// A piece of hardware registered with the remote account.
///
/// # Examples
///
/// ```
/// use cloudstate_lib::model::DeviceEntity;
///
/// let json = r#"{
///     "id": 10,
///     "name": "Back Door",
///     "product_id": 6,
///     "status": {"online": true, "battery": 5.4},
///     "control": {"curfew": [{"enabled": true, "lock_time": "21:00", "unlock_time": "07:00"}]}
/// }"#;
/// let device: DeviceEntity = serde_json::from_str(json).unwrap();
/// assert_eq!(device.status.battery, Some(5.4));
/// assert_eq!(device.control.curfew.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceEntity {
    /// Shared base fields.
    #[serde(flatten)]
    pub base: EntityBase,
    /// Hardware classification.
    #[serde(default)]
    pub kind: DeviceKind,
    /// Display name.
    pub name: Option<String>,
    /// Remote product code.
    pub product_id: Option<i64>,
    /// Owning household.
    pub household_id: Option<EntityId>,
    /// Serial number.
    #[serde(default, deserialize_with = "lenient_string")]
    pub serial_number: Option<String>,
    /// Network hardware address.
    pub mac_address: Option<String>,
    /// When the device was paired with its hub.
    pub pairing_at: Option<Timestamp>,
    /// Transient readings.
    #[serde(default)]
    pub status: StatusSnapshot,
    /// User-settable configuration.
    #[serde(default)]
    pub control: ControlSettings,
}

impl DeviceEntity {
    /// Creates a device with only an identifier and a kind.
    #[must_use]
    pub fn new(id: i64, kind: DeviceKind) -> Self {
        Self {
            base: EntityBase::new(EntityId::new(id)),
            kind,
            name: None,
            product_id: None,
            household_id: None,
            serial_number: None,
            mac_address: None,
            pairing_at: None,
            status: StatusSnapshot::default(),
            control: ControlSettings::default(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Classifies an unknown kind from the product id.
    #[must_use]
    pub fn with_resolved_kind(mut self) -> Self {
        if !self.kind.is_known()
            && let Some(product_id) = self.product_id
        {
            self.kind = DeviceKind::from_product_id(product_id);
        }
        self
    }

    /// Returns the effective locking mode, preferring the reported status.
    #[must_use]
    pub fn locking_mode_id(&self) -> Option<i64> {
        self.status
            .locking
            .and_then(|locking| locking.mode_id)
            .or(self.status.locking_mode_id)
            .or(self.control.locking_mode_id)
    }

    /// Returns the hardware revision, preferring the nested version block.
    #[must_use]
    pub fn hardware_version(&self) -> Option<&str> {
        self.status
            .device_version()
            .and_then(|version| version.hardware.as_deref())
            .or(self.status.hardware_version.as_deref())
    }

    /// Returns the firmware revision, preferring the nested version block.
    #[must_use]
    pub fn firmware_version(&self) -> Option<&str> {
        self.status
            .device_version()
            .and_then(|version| version.firmware.as_deref())
            .or(self.status.firmware_version.as_deref())
    }

    /// Returns the effective LED mode, preferring the reported status.
    #[must_use]
    pub fn led_mode_id(&self) -> Option<i64> {
        self.status.led_mode_id.or(self.control.led_mode_id)
    }

    /// Returns the configured bowl layout, if the device has bowls.
    #[must_use]
    pub fn bowl_layout(&self) -> Option<BowlLayout> {
        self.control.bowls.as_ref().and_then(BowlSettings::layout)
    }

    /// Merges a freshly fetched copy onto this one.
    ///
    /// All fields come from `incoming` except the identifier, and except the
    /// kind when `incoming` could not be classified.
    #[must_use]
    pub fn merge(&self, incoming: Self) -> Self {
        let base = self.base.assign(&incoming.base);
        let kind = if incoming.kind.is_known() {
            incoming.kind
        } else {
            self.kind
        };
        Self {
            base,
            kind,
            ..incoming
        }
    }

    /// Returns the descriptive properties of the device.
    #[must_use]
    pub fn properties(&self) -> BTreeMap<String, String> {
        let mut properties = self.base.properties();
        if let Some(serial) = &self.serial_number {
            properties.insert("serialNumber".to_string(), serial.clone());
        }
        if let Some(mac) = &self.mac_address {
            properties.insert("macAddress".to_string(), mac.clone());
        }
        if let Some(product_id) = self.product_id {
            properties.insert("productId".to_string(), product_id.to_string());
        }
        properties
    }
}

/// Transient readings reported by a device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusSnapshot {
    /// Whether the device is reachable.
    pub online: Option<bool>,
    /// Battery voltage in volts.
    pub battery: Option<f64>,
    /// Radio signal strength.
    pub signal: Option<Signal>,
    /// Hardware revision.
    #[serde(deserialize_with = "lenient_string")]
    pub hardware_version: Option<String>,
    /// Firmware revision.
    #[serde(deserialize_with = "lenient_string")]
    pub firmware_version: Option<String>,
    /// Current LED mode (hubs).
    pub led_mode_id: Option<i64>,
    /// Current pairing mode (hubs).
    pub pairing_mode_id: Option<i64>,
    /// Current locking mode (flaps).
    pub locking_mode_id: Option<i64>,
    /// Current locking state as nested by some firmware (flaps).
    pub locking: Option<Locking>,
    /// Revisions as nested by some firmware.
    pub version: Option<StatusVersion>,
}

impl StatusSnapshot {
    fn device_version(&self) -> Option<&DeviceVersion> {
        self.version.as_ref()?.device.as_ref()
    }
}

/// Nested revision block of a status report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusVersion {
    /// Revisions of the device itself.
    pub device: Option<DeviceVersion>,
}

/// Hardware and firmware revisions of a device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceVersion {
    /// Hardware revision.
    #[serde(deserialize_with = "lenient_string")]
    pub hardware: Option<String>,
    /// Firmware revision.
    #[serde(deserialize_with = "lenient_string")]
    pub firmware: Option<String>,
}

/// Nested locking state of a flap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Locking {
    /// Locking mode code.
    #[serde(rename = "mode")]
    pub mode_id: Option<i64>,
}

/// Radio signal strength readings in dBm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Signal {
    /// Strength as seen by the device.
    pub device_rssi: Option<f64>,
    /// Strength as seen by the hub.
    pub hub_rssi: Option<f64>,
}

/// User-settable configuration of a device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    /// Curfew windows (flaps). Only the first four are meaningful.
    pub curfew: Vec<Curfew>,
    /// Bowl assignments (feeders).
    pub bowls: Option<BowlSettings>,
    /// Requested LED mode (hubs).
    pub led_mode_id: Option<i64>,
    /// Requested locking mode (flaps).
    pub locking_mode_id: Option<i64>,
}

/// A scheduled lock/unlock window on a flap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Curfew {
    /// Whether the window is active.
    pub enabled: Option<bool>,
    /// Time of day the flap locks, e.g. `"21:00"`.
    pub lock_time: Option<String>,
    /// Time of day the flap unlocks, e.g. `"07:00"`.
    pub unlock_time: Option<String>,
}

/// Bowl configuration of a feeder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BowlSettings {
    /// Remote bowl type code; see [`BowlLayout::from_type_id`].
    #[serde(rename = "type")]
    pub type_id: Option<i64>,
    /// Per-bowl settings, left bowl first. Only the first two are meaningful.
    pub settings: Vec<Bowl>,
}

impl BowlSettings {
    /// Returns the layout implied by the bowl type.
    #[must_use]
    pub fn layout(&self) -> Option<BowlLayout> {
        self.type_id.map(BowlLayout::from_type_id)
    }
}

/// Settings for one bowl.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bowl {
    /// Food type code (wet, dry).
    pub food_type: Option<i64>,
    /// Target portion in grams.
    pub target: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_minimal_device() {
        let device: DeviceEntity = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert_eq!(device.base.id, EntityId::new(3));
        assert_eq!(device.kind, DeviceKind::Unknown);
        assert!(device.control.curfew.is_empty());
        assert_eq!(device.status, StatusSnapshot::default());
    }

    #[test]
    fn versions_accept_numbers_and_strings() {
        let device: DeviceEntity = serde_json::from_str(
            r#"{"id": 3, "serial_number": 10088888,
                "status": {"hardware_version": 3, "firmware_version": "1.177"}}"#,
        )
        .unwrap();
        assert_eq!(device.serial_number.as_deref(), Some("10088888"));
        assert_eq!(device.status.hardware_version.as_deref(), Some("3"));
        assert_eq!(device.status.firmware_version.as_deref(), Some("1.177"));
    }

    #[test]
    fn resolve_kind_from_product_id() {
        let mut device = DeviceEntity::new(1, DeviceKind::Unknown);
        device.product_id = Some(1);
        assert_eq!(device.with_resolved_kind().kind, DeviceKind::Hub);

        let mut device = DeviceEntity::new(1, DeviceKind::Zappi);
        device.product_id = Some(1);
        assert_eq!(device.with_resolved_kind().kind, DeviceKind::Zappi);
    }

    #[test]
    fn merge_takes_incoming_fields() {
        let stored = DeviceEntity::new(4, DeviceKind::CatFlap).with_name("Old");
        let mut incoming = DeviceEntity::new(4, DeviceKind::Unknown).with_name("New");
        incoming.status.battery = Some(5.9);

        let merged = stored.merge(incoming);

        assert_eq!(merged.name.as_deref(), Some("New"));
        assert_eq!(merged.status.battery, Some(5.9));
        assert_eq!(merged.kind, DeviceKind::CatFlap);
    }

    #[test]
    fn status_mode_preferred_over_control() {
        let mut device = DeviceEntity::new(1, DeviceKind::PetFlap);
        device.control.locking_mode_id = Some(2);
        assert_eq!(device.locking_mode_id(), Some(2));
        device.status.locking_mode_id = Some(3);
        assert_eq!(device.locking_mode_id(), Some(3));
    }

    #[test]
    fn nested_versions() {
        let device: DeviceEntity = serde_json::from_str(
            r#"{"id": 1, "product_id": 6,
                "status": {"version": {"device": {"hardware": 4, "firmware": 1.177}}}}"#,
        )
        .unwrap();
        assert_eq!(device.hardware_version(), Some("4"));
        assert_eq!(device.firmware_version(), Some("1.177"));
    }

    #[test]
    fn nested_version_preferred_over_flat() {
        let mut device = DeviceEntity::new(1, DeviceKind::Hub);
        device.status.firmware_version = Some("1.0".to_string());
        device.status.hardware_version = Some("2".to_string());
        assert_eq!(device.firmware_version(), Some("1.0"));

        device.status.version = Some(StatusVersion {
            device: Some(DeviceVersion {
                hardware: None,
                firmware: Some("1.5".to_string()),
            }),
        });
        assert_eq!(device.firmware_version(), Some("1.5"));
        assert_eq!(device.hardware_version(), Some("2"));
    }

    #[test]
    fn nested_locking_mode() {
        let device: DeviceEntity =
            serde_json::from_str(r#"{"id": 1, "status": {"locking": {"mode": 4}}}"#).unwrap();
        assert_eq!(device.locking_mode_id(), Some(4));
    }

    #[test]
    fn bowl_layout_from_control() {
        let device: DeviceEntity = serde_json::from_str(
            r#"{"id": 8, "control": {"bowls": {"type": 4, "settings": [{"target": 20}, {"target": 30}]}}}"#,
        )
        .unwrap();
        assert_eq!(device.bowl_layout(), Some(BowlLayout::Double));
        assert_eq!(device.control.bowls.unwrap().settings[1].target, Some(30.0));
    }

    #[test]
    fn device_properties() {
        let mut device = DeviceEntity::new(2, DeviceKind::Hub);
        device.serial_number = Some("H0123".to_string());
        device.product_id = Some(1);
        let props = device.properties();
        assert_eq!(props.get("serialNumber").map(String::as_str), Some("H0123"));
        assert_eq!(props.get("productId").map(String::as_str), Some("1"));
        assert!(!props.contains_key("macAddress"));
    }
}
