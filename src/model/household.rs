// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Household entities.

use serde::{Deserialize, Serialize};

use crate::types::EntityId;

use super::EntityBase;

/// A household grouping devices, pets and users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdEntity {
    /// Shared base fields.
    #[serde(flatten)]
    pub base: EntityBase,
    /// Display name.
    pub name: Option<String>,
    /// IANA time zone name configured remotely.
    pub timezone: Option<String>,
    /// Members, in remote order.
    #[serde(default)]
    pub users: Vec<HouseholdUser>,
}

impl HouseholdEntity {
    /// Creates a household with only an identifier.
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self {
            base: EntityBase::new(EntityId::new(id)),
            name: None,
            timezone: None,
            users: Vec::new(),
        }
    }

    /// Appends a member.
    #[must_use]
    pub fn with_user(mut self, id: i64, name: impl Into<String>) -> Self {
        self.users.push(HouseholdUser {
            id: EntityId::new(id),
            name: Some(name.into()),
            owner: None,
        });
        self
    }

    /// Returns the name of the first member with the given id.
    #[must_use]
    pub fn user_name(&self, id: EntityId) -> Option<&str> {
        self.users
            .iter()
            .find(|user| user.id == id)
            .and_then(|user| user.name.as_deref())
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

/// A member of a household.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseholdUser {
    /// User identifier.
    pub id: EntityId,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Whether the user owns the household.
    #[serde(default)]
    pub owner: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_lookup_by_id() {
        let household = HouseholdEntity::new(1).with_user(5, "A").with_user(7, "B");
        assert_eq!(household.user_name(EntityId::new(7)), Some("B"));
        assert_eq!(household.user_name(EntityId::new(99)), None);
    }

    #[test]
    fn duplicate_ids_resolve_to_first() {
        let household = HouseholdEntity::new(1).with_user(5, "first").with_user(5, "second");
        assert_eq!(household.user_name(EntityId::new(5)), Some("first"));
    }

    #[test]
    fn deserialize_users_in_order() {
        let household: HouseholdEntity = serde_json::from_str(
            r#"{"id": 3, "name": "Home", "users": [{"id": 2, "name": "Ann", "owner": true}, {"id": 4}]}"#,
        )
        .unwrap();
        assert_eq!(household.users.len(), 2);
        assert_eq!(household.users[0].owner, Some(true));
        assert_eq!(household.users[1].name, None);
    }
}
