// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Synchronization of the local registry with the remote account.
//!
//! A pass goes fetch, normalize, diff, publish:
//!
//! 1. the [`SnapshotFetcher`](crate::fetcher::SnapshotFetcher) returns the
//!    account summary,
//! 2. each raw record is normalized into an entity, malformed ones skipped,
//! 3. entities are merged into the [`Registry`](crate::registry::Registry),
//!    which reports whether anything changed,
//! 4. changed entities are mapped to channels and handed to the
//!    [`Publisher`](crate::publish::Publisher).
//!
//! [`spawn_poller`] repeats full passes on an interval.

mod config;
mod poller;
mod synchronizer;

pub use config::SyncConfig;
pub use poller::{PollerHandle, spawn_poller};
pub use synchronizer::{CommandOutcome, SyncReport, Synchronizer};
