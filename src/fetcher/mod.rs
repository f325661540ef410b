// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Remote data sources.
//!
//! A [`SnapshotFetcher`] is the only part of the library that talks to the
//! remote side. It performs no retries: a failed call is reported and the
//! next scheduled pass tries again.
//!
//! # Implementations
//!
//! - [`HttpFetcher`]: JSON over HTTP with bearer-token auth (feature `http`)

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::{HttpFetcher, HttpFetcherConfig};

use std::future::Future;
use std::sync::Arc;

use crate::command::EntityCommand;
use crate::error::FetchError;
use crate::model::{DeviceSummary, Entity};
use crate::types::EntityKey;

/// Source of remote entity snapshots.
///
/// Returned futures are `Send` so that a
/// [`Synchronizer`](crate::sync::Synchronizer) can run on a spawned task.
pub trait SnapshotFetcher: Send + Sync {
    /// Fetches every entity the account knows.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the remote side cannot be reached, rejects
    /// the session or answers with something undecodable.
    fn fetch_summary(&self) -> impl Future<Output = Result<DeviceSummary, FetchError>> + Send;

    /// Fetches a single entity.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::NotFound`] if the remote side does not know the
    /// entity, or any other [`FetchError`] as for
    /// [`fetch_summary`](Self::fetch_summary).
    fn fetch_entity(&self, key: EntityKey) -> impl Future<Output = Result<Entity, FetchError>> + Send;

    /// Applies a command and returns the entity as the remote side now sees it.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::CommandRejected`] if the remote side refuses the
    /// command, or any other [`FetchError`] as for
    /// [`fetch_entity`](Self::fetch_entity).
    fn apply_command(
        &self,
        key: EntityKey,
        command: EntityCommand,
    ) -> impl Future<Output = Result<Entity, FetchError>> + Send;
}

impl<T: SnapshotFetcher> SnapshotFetcher for Arc<T> {
    fn fetch_summary(&self) -> impl Future<Output = Result<DeviceSummary, FetchError>> + Send {
        (**self).fetch_summary()
    }

    fn fetch_entity(&self, key: EntityKey) -> impl Future<Output = Result<Entity, FetchError>> + Send {
        (**self).fetch_entity(key)
    }

    fn apply_command(
        &self,
        key: EntityKey,
        command: EntityCommand,
    ) -> impl Future<Output = Result<Entity, FetchError>> + Send {
        (**self).apply_command(key, command)
    }
}
