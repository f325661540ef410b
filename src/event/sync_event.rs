// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sync event types.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::channels::ChannelUpdate;
use crate::types::{EntityKey, EntityKind};

/// Events emitted by a sync pass.
///
/// # Examples
///
/// ```
/// use cloudstate_lib::channels::ChannelUpdate;
/// use cloudstate_lib::event::SyncEvent;
/// use cloudstate_lib::types::EntityKey;
///
/// let event = SyncEvent::ChannelsUpdated {
///     entity: EntityKey::pet(1),
///     updates: vec![ChannelUpdate::new("location", "1")],
/// };
/// assert_eq!(event.entity(), Some(EntityKey::pet(1)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SyncEvent {
    /// Channel values of an entity changed.
    ChannelsUpdated {
        /// The entity.
        entity: EntityKey,
        /// The new values.
        updates: Vec<ChannelUpdate>,
    },

    /// Descriptive properties of an entity changed.
    PropertiesUpdated {
        /// The entity.
        entity: EntityKey,
        /// The new properties.
        properties: BTreeMap<String, String>,
    },

    /// A pass failed; values of this kind are stale.
    SyncFailed {
        /// Kind whose pass failed.
        kind: EntityKind,
        /// Error description.
        reason: String,
        /// Whether the session must be re-authenticated.
        auth_expired: bool,
    },
}

impl SyncEvent {
    /// Returns the entity the event is about, if it is about one.
    #[must_use]
    pub const fn entity(&self) -> Option<EntityKey> {
        match self {
            Self::ChannelsUpdated { entity, .. } | Self::PropertiesUpdated { entity, .. } => {
                Some(*entity)
            }
            Self::SyncFailed { .. } => None,
        }
    }

    /// Returns `true` for [`SyncEvent::SyncFailed`].
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::SyncFailed { .. })
    }
}
