// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Delivery of channel values to the host.
//!
//! The [`Synchronizer`](crate::sync::Synchronizer) calls a [`Publisher`]
//! once per changed entity per pass, while it still holds the session
//! lock. Implementations should hand the values off quickly; the
//! [`EventBus`](crate::event::EventBus) does so through a broadcast
//! channel.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::channels::ChannelUpdate;
use crate::error::SyncError;
use crate::types::{EntityKey, EntityKind};

/// Receiver of channel values and sync outcomes.
pub trait Publisher: Send + Sync {
    /// Delivers the channel values of one entity.
    fn publish(&self, entity: EntityKey, updates: &[ChannelUpdate]);

    /// Delivers the descriptive properties of one entity.
    ///
    /// Called when an entity is first seen and whenever its version changes.
    fn update_properties(&self, entity: EntityKey, properties: &BTreeMap<String, String>) {
        let _ = (entity, properties);
    }

    /// Reports a failed pass. The registry was left as it was.
    fn sync_failed(&self, kind: EntityKind, error: &SyncError) {
        let _ = (kind, error);
    }
}

impl<P: Publisher + ?Sized> Publisher for Arc<P> {
    fn publish(&self, entity: EntityKey, updates: &[ChannelUpdate]) {
        (**self).publish(entity, updates);
    }

    fn update_properties(&self, entity: EntityKey, properties: &BTreeMap<String, String>) {
        (**self).update_properties(entity, properties);
    }

    fn sync_failed(&self, kind: EntityKind, error: &SyncError) {
        (**self).sync_failed(kind, error);
    }
}

/// Adapts a closure into a [`Publisher`] that only receives channel values.
///
/// # Examples
///
/// ```
/// use cloudstate_lib::publish::{FnPublisher, Publisher};
/// use cloudstate_lib::types::EntityKey;
///
/// let publisher = FnPublisher::new(|entity, updates| {
///     println!("{entity}: {} updates", updates.len());
/// });
/// publisher.publish(EntityKey::pet(1), &[]);
/// ```
pub struct FnPublisher<F>(F);

impl<F> FnPublisher<F>
where
    F: Fn(EntityKey, &[ChannelUpdate]) + Send + Sync,
{
    /// Wraps a closure.
    pub const fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> Publisher for FnPublisher<F>
where
    F: Fn(EntityKey, &[ChannelUpdate]) + Send + Sync,
{
    fn publish(&self, entity: EntityKey, updates: &[ChannelUpdate]) {
        (self.0)(entity, updates);
    }
}

impl<F> fmt::Debug for FnPublisher<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPublisher").finish_non_exhaustive()
    }
}
