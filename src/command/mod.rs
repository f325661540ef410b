// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Commands a host can send to an entity through one of its channels.
//!
//! A host sends a raw text value to a channel. [`CommandRequest::parse`]
//! turns it into a typed request before anything touches the network, so
//! an unparsable value never causes a remote call.
//!
//! # Available Commands
//!
//! | Entity | Channel | Command |
//! |--------|---------|---------|
//! | pet | `location` | [`EntityCommand::SetPetLocation`] |
//! | device (flap) | `lockingMode`, `lockingModeId` | [`EntityCommand::SetLockingMode`] |
//! | device (hub) | `ledModeId` | [`EntityCommand::SetLedMode`] |
//! | any | any, value `REFRESH` | [`CommandRequest::Refresh`] |
//!
//! # Examples
//!
//! ```
//! use cloudstate_lib::command::{CommandRequest, EntityCommand};
//! use cloudstate_lib::types::EntityKind;
//!
//! let request = CommandRequest::parse(EntityKind::Pet, "location", "2").unwrap();
//! assert_eq!(request, CommandRequest::Apply(EntityCommand::SetPetLocation { where_id: 2 }));
//!
//! assert!(CommandRequest::parse(EntityKind::Pet, "location", "garden").is_err());
//! assert_eq!(
//!     CommandRequest::parse(EntityKind::Device, "online", "refresh").unwrap(),
//!     CommandRequest::Refresh,
//! );
//! ```

mod entity;

pub use entity::EntityCommand;

use crate::channels::names;
use crate::error::CommandError;
use crate::types::EntityKind;

/// Raw value that asks for a re-read instead of a write.
pub const REFRESH: &str = "REFRESH";

/// A parsed channel command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandRequest {
    /// Re-read the entity from the remote side.
    Refresh,
    /// Apply a change on the remote side.
    Apply(EntityCommand),
}

impl CommandRequest {
    /// Parses a raw value sent to a channel of an entity kind.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::UnsupportedChannel`] if the channel is read-only
    /// for this kind, or [`CommandError::InvalidValue`] if the value cannot
    /// be interpreted.
    pub fn parse(kind: EntityKind, channel: &str, raw: &str) -> Result<Self, CommandError> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case(REFRESH) {
            return Ok(Self::Refresh);
        }

        let build: fn(i64) -> EntityCommand = match (kind, channel) {
            (EntityKind::Pet, names::LOCATION) => |where_id| EntityCommand::SetPetLocation { where_id },
            (EntityKind::Device, names::LOCKING_MODE | names::LOCKING_MODE_ID) => {
                |mode_id| EntityCommand::SetLockingMode { mode_id }
            }
            (EntityKind::Device, names::LED_MODE_ID) => |mode_id| EntityCommand::SetLedMode { mode_id },
            _ => {
                return Err(CommandError::UnsupportedChannel {
                    kind,
                    channel: channel.to_string(),
                });
            }
        };

        raw.parse::<i64>()
            .map(|value| Self::Apply(build(value)))
            .map_err(|e| CommandError::InvalidValue {
                channel: channel.to_string(),
                value: raw.to_string(),
                reason: e.to_string(),
            })
    }
}
