// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Synchronizer configuration.

use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};

use crate::error::ValueError;
use crate::types::EntityKind;

/// Configuration for a [`Synchronizer`](super::Synchronizer).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use cloudstate_lib::sync::SyncConfig;
/// use cloudstate_lib::types::EntityKind;
///
/// let config = SyncConfig::new()
///     .with_poll_interval(Duration::from_secs(60))
///     .unwrap()
///     .with_kinds([EntityKind::Device, EntityKind::Pet])
///     .with_zone_offset_secs(3600)
///     .unwrap();
///
/// assert_eq!(config.poll_interval(), Duration::from_secs(60));
/// assert_eq!(config.kinds(), &[EntityKind::Device, EntityKind::Pet]);
/// assert_eq!(config.zone().local_minus_utc(), 3600);
/// ```
#[derive(Debug, Clone)]
pub struct SyncConfig {
    poll_interval: Duration,
    zone: FixedOffset,
    publish_unchanged: bool,
    kinds: Vec<EntityKind>,
}

impl SyncConfig {
    /// Default time between scheduled passes.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(300);

    /// Creates a configuration with defaults: a pass every five minutes,
    /// timestamps in UTC, only changed entities published, and kinds synced
    /// in the order households, tags, devices, pets.
    #[must_use]
    pub fn new() -> Self {
        Self {
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            zone: Utc.fix(),
            publish_unchanged: false,
            kinds: EntityKind::ALL.to_vec(),
        }
    }

    /// Sets the time between scheduled passes.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidPollInterval`] if the interval is zero.
    pub fn with_poll_interval(mut self, interval: Duration) -> Result<Self, ValueError> {
        if interval.is_zero() {
            return Err(ValueError::InvalidPollInterval);
        }
        self.poll_interval = interval;
        Ok(self)
    }

    /// Sets the zone timestamps are rendered in.
    #[must_use]
    pub fn with_zone(mut self, zone: FixedOffset) -> Self {
        self.zone = zone;
        self
    }

    /// Sets the zone from an offset east of UTC in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidZoneOffset`] if the offset is a day or
    /// more.
    pub fn with_zone_offset_secs(self, secs: i32) -> Result<Self, ValueError> {
        let zone = FixedOffset::east_opt(secs).ok_or(ValueError::InvalidZoneOffset(secs))?;
        Ok(self.with_zone(zone))
    }

    /// Publishes every entity on every pass, not only changed ones.
    #[must_use]
    pub fn with_publish_unchanged(mut self, publish_unchanged: bool) -> Self {
        self.publish_unchanged = publish_unchanged;
        self
    }

    /// Sets which kinds a full pass covers, in order.
    #[must_use]
    pub fn with_kinds(mut self, kinds: impl IntoIterator<Item = EntityKind>) -> Self {
        self.kinds = kinds.into_iter().collect();
        self
    }

    /// Returns the time between scheduled passes.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Returns the zone timestamps are rendered in.
    #[must_use]
    pub fn zone(&self) -> FixedOffset {
        self.zone
    }

    /// Returns `true` if unchanged entities are published too.
    #[must_use]
    pub fn publish_unchanged(&self) -> bool {
        self.publish_unchanged
    }

    /// Returns the kinds a full pass covers, in order.
    #[must_use]
    pub fn kinds(&self) -> &[EntityKind] {
        &self.kinds
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_secs(300));
        assert_eq!(config.zone().local_minus_utc(), 0);
        assert!(!config.publish_unchanged());
        assert_eq!(
            config.kinds(),
            &[EntityKind::Household, EntityKind::Tag, EntityKind::Device, EntityKind::Pet]
        );
    }

    #[test]
    fn rejects_out_of_range_offset() {
        assert_eq!(
            SyncConfig::new().with_zone_offset_secs(86_400).unwrap_err(),
            ValueError::InvalidZoneOffset(86_400)
        );
        assert!(SyncConfig::new().with_zone_offset_secs(-18_000).is_ok());
    }

    #[test]
    fn rejects_zero_poll_interval() {
        assert_eq!(
            SyncConfig::new().with_poll_interval(Duration::ZERO).unwrap_err(),
            ValueError::InvalidPollInterval
        );
        let config = SyncConfig::new()
            .with_poll_interval(Duration::from_millis(1))
            .unwrap();
        assert_eq!(config.poll_interval(), Duration::from_millis(1));
    }
}
