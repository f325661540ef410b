// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Microchip and collar tag entities.

use serde::{Deserialize, Serialize};

use crate::types::EntityId;

use super::EntityBase;

/// An identification tag worn by a pet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagEntity {
    /// Shared base fields.
    #[serde(flatten)]
    pub base: EntityBase,
    /// The chip or tag identifier.
    pub tag: Option<String>,
}

impl TagEntity {
    /// Creates a tag.
    #[must_use]
    pub fn new(id: i64, tag: impl Into<String>) -> Self {
        Self {
            base: EntityBase::new(EntityId::new(id)),
            tag: Some(tag.into()),
        }
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
