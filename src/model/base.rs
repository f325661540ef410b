// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fields shared by every synchronized entity.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::types::{EntityId, EntityKind, Timestamp};

/// Base record embedded in every entity.
///
/// `id` is required: a record without one fails deserialization and is
/// reported as malformed.
///
/// # Examples
///
/// ```
/// use cloudstate_lib::model::EntityBase;
///
/// let base: EntityBase = serde_json::from_str(
///     r#"{"id": 7, "version": "MjE=", "created_at": "2019-09-02T08:20:40+00:00"}"#,
/// ).unwrap();
/// assert_eq!(base.id.value(), 7);
/// assert!(base.updated_at.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityBase {
    /// Stable identifier.
    pub id: EntityId,
    /// Opaque revision marker set by the remote side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Creation instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    /// Last modification instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl EntityBase {
    /// Creates a base record with only an identifier.
    #[must_use]
    pub const fn new(id: EntityId) -> Self {
        Self {
            id,
            version: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Sets the version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the creation instant.
    #[must_use]
    pub fn with_created_at(mut self, at: Timestamp) -> Self {
        self.created_at = Some(at);
        self
    }

    /// Sets the modification instant.
    #[must_use]
    pub fn with_updated_at(mut self, at: Timestamp) -> Self {
        self.updated_at = Some(at);
        self
    }

    /// Copies every base field from `incoming` except the identifier.
    #[must_use]
    pub fn assign(&self, incoming: &Self) -> Self {
        Self {
            id: self.id,
            version: incoming.version.clone(),
            created_at: incoming.created_at,
            updated_at: incoming.updated_at,
        }
    }

    /// Checks the record invariants.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Malformed`] if the entity was updated before it
    /// was created.
    pub fn validate(&self, kind: EntityKind) -> Result<(), RecordError> {
        if let (Some(created), Some(updated)) = (self.created_at, self.updated_at)
            && updated < created
        {
            return Err(RecordError::malformed(
                kind,
                format!("{kind} {} updated at {updated} before creation at {created}", self.id),
            ));
        }
        Ok(())
    }

    /// Returns the descriptive properties of the entity.
    #[must_use]
    pub fn properties(&self) -> BTreeMap<String, String> {
        let mut properties = BTreeMap::new();
        properties.insert("id".to_string(), self.id.to_string());
        if let Some(version) = &self.version {
            properties.insert("version".to_string(), version.clone());
        }
        properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    #[test]
    fn assign_keeps_identifier() {
        let stored = EntityBase::new(EntityId::new(1)).with_version("a");
        let incoming = EntityBase::new(EntityId::new(2))
            .with_version("b")
            .with_updated_at(ts("2024-01-01T00:00:00Z"));

        let merged = stored.assign(&incoming);

        assert_eq!(merged.id, EntityId::new(1));
        assert_eq!(merged.version.as_deref(), Some("b"));
        assert_eq!(merged.updated_at, Some(ts("2024-01-01T00:00:00Z")));
    }

    #[test]
    fn assign_clears_absent_fields() {
        let stored = EntityBase::new(EntityId::new(1)).with_version("a");
        let incoming = EntityBase::new(EntityId::new(1));
        assert_eq!(stored.assign(&incoming).version, None);
    }

    #[test]
    fn validate_rejects_update_before_creation() {
        let base = EntityBase::new(EntityId::new(5))
            .with_created_at(ts("2024-02-01T00:00:00Z"))
            .with_updated_at(ts("2024-01-01T00:00:00Z"));
        assert!(base.validate(EntityKind::Device).is_err());

        let ok = EntityBase::new(EntityId::new(5))
            .with_created_at(ts("2024-01-01T00:00:00Z"))
            .with_updated_at(ts("2024-01-01T00:00:00Z"));
        assert!(ok.validate(EntityKind::Device).is_ok());
    }

    #[test]
    fn properties_include_version_when_known() {
        let props = EntityBase::new(EntityId::new(9)).with_version("v3").properties();
        assert_eq!(props.get("id").map(String::as_str), Some("9"));
        assert_eq!(props.get("version").map(String::as_str), Some("v3"));

        let props = EntityBase::new(EntityId::new(9)).properties();
        assert!(!props.contains_key("version"));
    }

    #[test]
    fn missing_id_fails() {
        let result: Result<EntityBase, _> = serde_json::from_str(r#"{"version": "x"}"#);
        assert!(result.is_err());
    }
}
