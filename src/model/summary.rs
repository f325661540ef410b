// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The envelope returned by a full account fetch.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::ProductLine;

/// Everything the remote account knows, as raw records.
///
/// Records stay as raw JSON until normalization so that one malformed
/// record never fails the whole fetch.
///
/// # Examples
///
/// ```
/// use cloudstate_lib::model::DeviceSummary;
///
/// let summary: DeviceSummary = serde_json::from_str(
///     r#"{"zappi": [{"sno": 16000001}], "pets": [{"id": 1}], "asn": "s18.myenergi.net"}"#,
/// ).unwrap();
/// assert_eq!(summary.zappi.len(), 1);
/// assert_eq!(summary.account_serial_number.as_deref(), Some("s18.myenergi.net"));
/// assert_eq!(summary.device_records().count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSummary {
    /// Wireless energy sensors.
    #[serde(rename = "harvi")]
    pub harvis: Vec<Value>,
    /// EV chargers.
    pub zappi: Vec<Value>,
    /// Hot water diverters.
    pub eddi: Vec<Value>,
    /// Pet hardware.
    pub devices: Vec<Value>,
    /// Pets.
    pub pets: Vec<Value>,
    /// Households.
    pub households: Vec<Value>,
    /// Identification tags.
    pub tags: Vec<Value>,
    /// Account serial number.
    #[serde(rename = "asn")]
    pub account_serial_number: Option<String>,
}

impl DeviceSummary {
    /// Iterates over every device record with the group it was listed in.
    pub fn device_records(&self) -> impl Iterator<Item = (ProductLine, &Value)> {
        tagged(ProductLine::Harvi, &self.harvis)
            .chain(tagged(ProductLine::Zappi, &self.zappi))
            .chain(tagged(ProductLine::Eddi, &self.eddi))
            .chain(tagged(ProductLine::Petcare, &self.devices))
    }

    /// Returns the total number of records of all kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.harvis.len()
            + self.zappi.len()
            + self.eddi.len()
            + self.devices.len()
            + self.pets.len()
            + self.households.len()
            + self.tags.len()
    }

    /// Returns `true` if the summary holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn tagged(line: ProductLine, records: &[Value]) -> impl Iterator<Item = (ProductLine, &Value)> {
    records.iter().map(move |record| (line, record))
}

/// Rewrites a raw device record into the shape [`DeviceEntity`](super::DeviceEntity) reads.
///
/// Charger hardware reports its serial number (`sno`) as its identity and
/// its firmware as a top-level `fwv`; both are moved to where pet hardware
/// keeps them, and the kind is taken from the group. Pet hardware records
/// are returned as they are.
#[must_use]
pub fn prepare_device_record(line: ProductLine, record: &Value) -> Value {
    let Some(kind) = line.device_kind() else {
        return record.clone();
    };
    let Value::Object(fields) = record else {
        return record.clone();
    };

    let mut fields = fields.clone();
    if let Some(sno) = fields.get("sno").cloned() {
        fields.entry("id").or_insert_with(|| sno.clone());
        fields.entry("serial_number").or_insert(sno);
    }
    if let Some(firmware) = fields.remove("fwv") {
        let status = fields
            .entry("status")
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(status) = status {
            status.entry("firmware_version").or_insert(firmware);
        }
    }
    fields.insert("kind".to_string(), Value::String(kind.as_str().to_string()));
    Value::Object(fields)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn charger_record_is_rewritten() {
        let prepared = prepare_device_record(ProductLine::Zappi, &json!({"sno": 16000001, "fwv": "3560S3.054"}));
        assert_eq!(prepared["id"], json!(16000001));
        assert_eq!(prepared["serial_number"], json!(16000001));
        assert_eq!(prepared["kind"], json!("zappi"));
        assert_eq!(prepared["status"]["firmware_version"], json!("3560S3.054"));
        assert!(prepared.get("fwv").is_none());
    }

    #[test]
    fn pet_hardware_record_is_untouched() {
        let record = json!({"id": 4, "product_id": 1});
        assert_eq!(prepare_device_record(ProductLine::Petcare, &record), record);
    }

    #[test]
    fn missing_groups_default_to_empty() {
        let summary: DeviceSummary = serde_json::from_str("{}").unwrap();
        assert!(summary.is_empty());
        assert!(summary.account_serial_number.is_none());
    }

    #[test]
    fn device_records_cover_all_groups() {
        let summary: DeviceSummary = serde_json::from_value(json!({
            "harvi": [{"sno": 1}],
            "eddi": [{"sno": 2}],
            "devices": [{"id": 3}, {"id": 4}],
            "pets": [{"id": 5}]
        }))
        .unwrap();
        let lines: Vec<_> = summary.device_records().map(|(line, _)| line).collect();
        assert_eq!(
            lines,
            vec![ProductLine::Harvi, ProductLine::Eddi, ProductLine::Petcare, ProductLine::Petcare]
        );
        assert_eq!(summary.len(), 5);
    }
}
