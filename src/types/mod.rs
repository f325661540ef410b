// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared across the library.
//!
//! # Types
//!
//! - [`EntityId`], [`EntityKind`], [`EntityKey`] - Entity identification
//! - [`Timestamp`] - Instants in any of the formats remote APIs use
//! - [`ChannelValue`], [`Unit`] - Typed values published on channels
//! - [`DeviceKind`], [`ProductLine`], [`BowlLayout`] - Device classification

mod channel_value;
mod device_kind;
mod entity_id;
mod timestamp;

pub use channel_value::{ChannelValue, Unit};
pub use device_kind::{BowlLayout, DeviceKind, ProductLine};
pub use entity_id::{EntityId, EntityKey, EntityKind};
pub use timestamp::Timestamp;
