// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event bus for broadcasting sync events.

use std::collections::BTreeMap;

use tokio::sync::broadcast;

use crate::channels::ChannelUpdate;
use crate::error::SyncError;
use crate::publish::Publisher;
use crate::types::{EntityKey, EntityKind};

use super::SyncEvent;

/// Default channel capacity for the event bus.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Event bus for broadcasting sync events to multiple subscribers.
///
/// The `EventBus` is a [`Publisher`]: hand it to a
/// [`Synchronizer`](crate::sync::Synchronizer) and subscribe as many
/// receivers as needed.
///
/// # Capacity
///
/// The event bus has a fixed capacity (default 256). If the channel fills
/// up because a subscriber is slow, older events may be dropped for that
/// subscriber (they will receive a `RecvError::Lagged` error).
///
/// # Examples
///
/// ```
/// use cloudstate_lib::event::EventBus;
/// use cloudstate_lib::publish::Publisher;
/// use cloudstate_lib::types::EntityKey;
///
/// let bus = EventBus::new();
/// let mut rx = bus.subscribe();
///
/// bus.publish(EntityKey::device(1), &[]);
///
/// let event = rx.try_recv().unwrap();
/// assert_eq!(event.entity(), Some(EntityKey::device(1)));
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<SyncEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a new event bus with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribes to sync events published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Sends an event to all subscribers.
    ///
    /// If there are no subscribers, the event is silently discarded.
    pub fn send(&self, event: SyncEvent) {
        // No subscribers is not an error
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Publisher for EventBus {
    fn publish(&self, entity: EntityKey, updates: &[ChannelUpdate]) {
        self.send(SyncEvent::ChannelsUpdated {
            entity,
            updates: updates.to_vec(),
        });
    }

    fn update_properties(&self, entity: EntityKey, properties: &BTreeMap<String, String>) {
        self.send(SyncEvent::PropertiesUpdated {
            entity,
            properties: properties.clone(),
        });
    }

    fn sync_failed(&self, kind: EntityKind, error: &SyncError) {
        self.send(SyncEvent::SyncFailed {
            kind,
            reason: error.to_string(),
            auth_expired: error.is_auth_expired(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;

    #[test]
    fn new_bus_has_no_subscribers() {
        let bus = EventBus::new();
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn drop_subscriber_decrements_count() {
        let bus = EventBus::new();

        let rx = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        drop(rx);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn publish_delivers_to_multiple_subscribers() {
        let bus = EventBus::new();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(EntityKey::pet(4), &[ChannelUpdate::new("name", "Tom")]);

        let event1 = rx1.recv().await.unwrap();
        let event2 = rx2.recv().await.unwrap();
        assert_eq!(event1, event2);
        assert_eq!(event1.entity(), Some(EntityKey::pet(4)));
    }

    #[tokio::test]
    async fn sync_failure_carries_auth_flag() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.sync_failed(
            EntityKind::Pet,
            &SyncError::Fetch {
                kind: EntityKind::Pet,
                source: FetchError::AuthExpired,
            },
        );

        match rx.recv().await.unwrap() {
            SyncEvent::SyncFailed { kind, auth_expired, .. } => {
                assert_eq!(kind, EntityKind::Pet);
                assert!(auth_expired);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn publish_without_subscribers_is_discarded() {
        let bus = EventBus::new();
        bus.publish(EntityKey::tag(1), &[]);
    }

    #[test]
    fn clone_shares_same_channel() {
        let bus1 = EventBus::new();
        let bus2 = bus1.clone();

        let _rx = bus1.subscribe();
        assert_eq!(bus2.subscriber_count(), 1);
    }
}
