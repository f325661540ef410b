// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scheduled full passes.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::fetcher::SnapshotFetcher;
use crate::publish::Publisher;

use super::Synchronizer;

/// Handle to a running poller task.
#[derive(Debug)]
pub struct PollerHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Stops the poller and waits for it to exit.
    ///
    /// A pass already in flight runs to completion first.
    pub async fn stop(self) {
        let _ = self.stop.send(true);
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "Poller task ended abnormally");
        }
    }

    /// Returns `true` if the poller task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawns a task that runs [`Synchronizer::sync_all`] on the configured
/// interval, starting immediately.
///
/// Ticks missed while a pass runs long are skipped, not queued.
pub fn spawn_poller<F, P>(sync: Arc<Synchronizer<F, P>>) -> PollerHandle
where
    F: SnapshotFetcher + 'static,
    P: Publisher + 'static,
{
    let (stop, mut stop_rx) = watch::channel(false);
    let period = sync.config().poll_interval();

    let task = tokio::spawn(async move {
        let mut ticker = time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tracing::info!(interval_secs = period.as_secs(), "Poller started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let report = sync.sync_all().await;
                    if report.auth_expired() {
                        tracing::warn!("Session expired, passes will fail until re-authenticated");
                    }
                }
                changed = stop_rx.changed() => {
                    if changed.is_err() || *stop_rx.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!("Poller stopped");
    });

    PollerHandle { stop, task }
}
