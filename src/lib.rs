// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `CloudState` Lib - A Rust library to mirror cloud-connected device state.
//!
//! This library keeps a local registry of the devices, pets, households and
//! tags of a remote account in step with a JSON API, and publishes what
//! changed as typed channel values.
//!
//! # Supported Features
//!
//! - **Sync passes**: Fetch the account summary, normalize, diff, publish
//! - **Stable entities**: One live handle per entity, merged in place
//! - **Channel mapping**: Battery level, signal, curfews, bowls, feeding, location
//! - **Commands**: Pet location, flap locking mode, hub LED mode, refresh
//! - **Scheduling**: A poller task that runs full passes on an interval
//!
//! # Supported Product Lines
//!
//! - Pet care: hubs, cat flaps, pet doors, feeders, water stations
//! - Energy: EV chargers (zappi), diverters (eddi), sensors (harvi)
//!
//! # Quick Start
//!
//! ## One Pass Against an HTTP API
//!
//! ```no_run
//! use cloudstate_lib::{EventBus, HttpFetcherConfig, Synchronizer};
//! use cloudstate_lib::types::EntityKind;
//!
//! #[tokio::main]
//! async fn main() -> cloudstate_lib::Result<()> {
//!     let fetcher = HttpFetcherConfig::new("https://app.api.example.com/api")
//!         .with_token("token")
//!         .into_fetcher()?;
//!     let bus = EventBus::new();
//!     let mut events = bus.subscribe();
//!
//!     let sync = Synchronizer::new(fetcher, bus);
//!     let changed = sync.sync(EntityKind::Pet).await?;
//!     println!("{changed} pets changed");
//!
//!     while let Ok(event) = events.try_recv() {
//!         println!("{event:?}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Scheduled Passes and Commands
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use cloudstate_lib::{EventBus, HttpFetcherConfig, SyncConfig, Synchronizer, spawn_poller};
//! use cloudstate_lib::types::EntityKey;
//!
//! #[tokio::main]
//! async fn main() -> cloudstate_lib::Result<()> {
//!     let fetcher = HttpFetcherConfig::new("https://app.api.example.com/api")
//!         .with_token("token")
//!         .into_fetcher()?;
//!     let config = SyncConfig::new().with_poll_interval(Duration::from_secs(120))?;
//!     let sync = Arc::new(Synchronizer::with_config(fetcher, EventBus::new(), config));
//!
//!     let poller = spawn_poller(Arc::clone(&sync));
//!
//!     // Move pet 42 inside
//!     let outcome = sync.handle_command(EntityKey::pet(42), "location", "1").await?;
//!     println!("{outcome:?}");
//!
//!     poller.stop().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Custom Publisher
//!
//! Anything implementing [`Publisher`] can receive channel updates:
//!
//! ```
//! use cloudstate_lib::publish::FnPublisher;
//! use cloudstate_lib::channels::ChannelUpdate;
//! use cloudstate_lib::types::EntityKey;
//!
//! let publisher = FnPublisher::new(|key: EntityKey, updates: &[ChannelUpdate]| {
//!     for update in updates {
//!         println!("{key} {} = {}", update.channel, update.value);
//!     }
//! });
//! # let _ = publisher;
//! ```

pub mod channels;
pub mod command;
pub mod error;
pub mod event;
pub mod fetcher;
pub mod model;
pub mod publish;
pub mod registry;
pub mod sync;
pub mod types;

pub use channels::{ChannelSet, ChannelUpdate, MapContext, map_entity};
pub use command::{CommandRequest, EntityCommand};
pub use error::{
    CommandError, Error, FetchError, ParseError, RecordError, Result, SyncError, ValueError,
};
pub use event::{EventBus, SyncEvent};
pub use fetcher::SnapshotFetcher;
#[cfg(feature = "http")]
pub use fetcher::{HttpFetcher, HttpFetcherConfig};
pub use model::{
    DeviceEntity, DeviceSummary, Entity, HouseholdEntity, PetEntity, TagEntity, Tracked,
};
pub use publish::{FnPublisher, Publisher};
pub use registry::{EntityHandle, EntityLookup, Registry};
pub use sync::{CommandOutcome, PollerHandle, SyncConfig, SyncReport, Synchronizer, spawn_poller};
pub use types::{ChannelValue, EntityId, EntityKey, EntityKind, Timestamp};
