// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event system for sync results.
//!
//! The [`EventBus`] uses tokio's broadcast channel to let multiple
//! subscribers receive the [`SyncEvent`]s a
//! [`Synchronizer`](crate::sync::Synchronizer) produces.
//!
//! # Examples
//!
//! ```
//! use cloudstate_lib::event::{EventBus, SyncEvent};
//! use cloudstate_lib::types::EntityKind;
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! bus.send(SyncEvent::SyncFailed {
//!     kind: EntityKind::Pet,
//!     reason: "remote unavailable".to_string(),
//!     auth_expired: false,
//! });
//! assert!(rx.try_recv().unwrap().is_failure());
//! ```

mod event_bus;
mod sync_event;

pub use event_bus::EventBus;
pub use sync_event::SyncEvent;
