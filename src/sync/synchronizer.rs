// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The fetch, normalize, diff and publish pipeline.

use std::collections::HashMap;

use tokio::sync::{Mutex, MutexGuard};
use tracing::Instrument;
use uuid::Uuid;

use crate::channels::MapContext;
use crate::command::{CommandRequest, EntityCommand};
use crate::error::{CommandError, RecordError, SyncError};
use crate::fetcher::SnapshotFetcher;
use crate::model::{DeviceEntity, Entity, HouseholdEntity, PetEntity, TagEntity, Tracked};
use crate::publish::Publisher;
use crate::registry::{EntityHandle, Registry};
use crate::types::{EntityId, EntityKey, EntityKind};

use super::SyncConfig;

/// Result of a command sent through [`Synchronizer::handle_command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The remote side confirmed the requested value.
    Applied,
    /// The remote side accepted the command but reports a different value.
    Diverged {
        /// The value the command asked for.
        requested: i64,
        /// The value the remote side reports, if any.
        confirmed: Option<i64>,
    },
    /// The entity was re-read instead of written.
    Refreshed,
}

/// Outcome of [`Synchronizer::sync_all`], one entry per configured kind.
#[derive(Debug, Default)]
pub struct SyncReport {
    passes: Vec<(EntityKind, Result<usize, SyncError>)>,
}

impl SyncReport {
    /// Returns each pass in the order it ran.
    #[must_use]
    pub fn passes(&self) -> &[(EntityKind, Result<usize, SyncError>)] {
        &self.passes
    }

    /// Returns the number of entities inserted or changed across all passes.
    #[must_use]
    pub fn changed(&self) -> usize {
        self.passes
            .iter()
            .filter_map(|(_, result)| result.as_ref().ok())
            .sum()
    }

    /// Iterates over the failed passes.
    pub fn failures(&self) -> impl Iterator<Item = (EntityKind, &SyncError)> {
        self.passes
            .iter()
            .filter_map(|(kind, result)| result.as_ref().err().map(|e| (*kind, e)))
    }

    /// Returns `true` if every pass succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Returns `true` if any pass failed because the session expired.
    #[must_use]
    pub fn auth_expired(&self) -> bool {
        self.failures().any(|(_, error)| error.is_auth_expired())
    }
}

/// Keeps a [`Registry`] in step with a remote account.
///
/// Every pass and every command runs entirely under one session lock,
/// network round trip included, so passes and commands never interleave.
/// A slow remote call therefore delays everything queued behind it.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use cloudstate_lib::event::EventBus;
/// use cloudstate_lib::fetcher::HttpFetcherConfig;
/// use cloudstate_lib::sync::{SyncConfig, Synchronizer, spawn_poller};
///
/// # async fn run() -> cloudstate_lib::Result<()> {
/// let fetcher = HttpFetcherConfig::new("https://app.api.example.com/api")
///     .with_token("token")
///     .into_fetcher()?;
/// let bus = EventBus::new();
/// let mut events = bus.subscribe();
///
/// let sync = Arc::new(Synchronizer::with_config(fetcher, bus, SyncConfig::new()));
/// let poller = spawn_poller(Arc::clone(&sync));
///
/// while let Ok(event) = events.recv().await {
///     println!("{event:?}");
/// }
/// poller.stop().await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Synchronizer<F, P> {
    fetcher: F,
    publisher: P,
    config: SyncConfig,
    session: Mutex<Registry>,
}

/// What a batch apply found out about one entity.
#[derive(Debug, Clone, Copy)]
struct BatchEntry {
    id: EntityId,
    changed: bool,
    properties_changed: bool,
}

impl<F: SnapshotFetcher, P: Publisher> Synchronizer<F, P> {
    /// Creates a synchronizer with the default configuration.
    #[must_use]
    pub fn new(fetcher: F, publisher: P) -> Self {
        Self::with_config(fetcher, publisher, SyncConfig::default())
    }

    /// Creates a synchronizer.
    #[must_use]
    pub fn with_config(fetcher: F, publisher: P, config: SyncConfig) -> Self {
        Self {
            fetcher,
            publisher,
            config,
            session: Mutex::new(Registry::new()),
        }
    }

    /// Returns the fetcher.
    #[must_use]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Returns the publisher.
    #[must_use]
    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Locks the session and returns the registry.
    ///
    /// Passes and commands wait while the guard is held.
    pub async fn registry(&self) -> MutexGuard<'_, Registry> {
        self.session.lock().await
    }

    /// Returns a copy of an entity.
    pub async fn snapshot(&self, key: EntityKey) -> Option<Entity> {
        self.session.lock().await.get(key)
    }

    /// Returns the live handle of an entity.
    pub async fn handle<T: Tracked>(&self, id: EntityId) -> Option<EntityHandle<T>> {
        T::partition(&*self.session.lock().await).get(id)
    }

    /// Runs one pass for one kind.
    ///
    /// Fetches the summary, normalizes the records of `kind`, merges them
    /// into the registry and publishes every entity that was inserted or
    /// changed. Malformed records are logged and skipped.
    ///
    /// Returns the number of entities inserted or changed.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Fetch`] if the summary could not be fetched. The
    /// registry is left untouched and the publisher is told through
    /// [`Publisher::sync_failed`].
    pub async fn sync(&self, kind: EntityKind) -> Result<usize, SyncError> {
        let pass = Uuid::new_v4();
        let span = tracing::info_span!("sync_pass", %kind, pass = %pass);
        async move {
            match kind {
                EntityKind::Device => self.sync_kind::<DeviceEntity>().await,
                EntityKind::Pet => self.sync_kind::<PetEntity>().await,
                EntityKind::Household => self.sync_kind::<HouseholdEntity>().await,
                EntityKind::Tag => self.sync_kind::<TagEntity>().await,
            }
        }
        .instrument(span)
        .await
    }

    /// Runs one pass per configured kind, in order.
    ///
    /// A failed pass does not stop the ones after it.
    ///
    /// Each pass fetches the summary on its own, so a full run costs one
    /// round trip per kind, and passes may see different remote snapshots
    /// if the account changes in between.
    pub async fn sync_all(&self) -> SyncReport {
        let mut report = SyncReport::default();
        for &kind in self.config.kinds() {
            let result = self.sync(kind).await;
            report.passes.push((kind, result));
        }
        tracing::debug!(
            changed = report.changed(),
            failed = report.failures().count(),
            "Full sync completed"
        );
        report
    }

    /// Re-reads a single entity and publishes it.
    ///
    /// Returns `true` if the entity was inserted or changed.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Fetch`] if the remote call failed (including
    /// [`FetchError::NotFound`](crate::error::FetchError::NotFound)), or
    /// [`SyncError::Record`] if the returned entity is malformed. The
    /// registry is untouched in both cases.
    pub async fn refresh(&self, key: EntityKey) -> Result<bool, SyncError> {
        let mut registry = self.session.lock().await;
        tracing::debug!(%key, "Refreshing entity");

        let entity = self
            .fetcher
            .fetch_entity(key)
            .await
            .map_err(|source| SyncError::Fetch {
                kind: key.kind,
                source,
            })?;
        let entity = checked_response(key, entity)?;
        Ok(self.apply_entity(&mut registry, entity, true))
    }

    /// Handles a raw value a host sent to a channel of an entity.
    ///
    /// The value is parsed before anything else; an invalid value, an
    /// unsupported channel or an unknown entity causes no remote call. The
    /// registry is updated from the entity the remote side returns, never
    /// from the requested value.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] if the command cannot be parsed, the entity
    /// is unknown or does not accept it, the remote call fails or the
    /// remote side returns something that cannot be applied.
    pub async fn handle_command(
        &self,
        key: EntityKey,
        channel: &str,
        raw: &str,
    ) -> Result<CommandOutcome, CommandError> {
        let command = match CommandRequest::parse(key.kind, channel, raw)? {
            CommandRequest::Refresh => {
                self.refresh(key).await?;
                return Ok(CommandOutcome::Refreshed);
            }
            CommandRequest::Apply(command) => command,
        };

        let mut registry = self.session.lock().await;
        let current = registry.get(key).ok_or(CommandError::UnknownEntity(key))?;
        if !command.supports(&current) {
            return Err(CommandError::UnsupportedChannel {
                kind: key.kind,
                channel: channel.to_string(),
            });
        }

        tracing::debug!(%key, %command, "Applying command");
        let returned = self.fetcher.apply_command(key, command).await?;
        let returned = checked_response(key, returned)
            .map_err(|e| CommandError::UnexpectedResponse(e.to_string()))?;

        let confirmed = command.confirmed_value(&returned);
        self.apply_entity(&mut registry, returned, true);
        Ok(outcome(key, command, confirmed))
    }

    async fn sync_kind<T: Tracked>(&self) -> Result<usize, SyncError> {
        let mut registry = self.session.lock().await;

        let summary = match self.fetcher.fetch_summary().await {
            Ok(summary) => summary,
            Err(source) => {
                let error = SyncError::Fetch {
                    kind: T::KIND,
                    source,
                };
                tracing::warn!(error = %error, "Sync pass failed, keeping stale state");
                self.publisher.sync_failed(T::KIND, &error);
                return Err(error);
            }
        };

        if let Some(serial) = &summary.account_serial_number {
            registry.set_account_serial_number(serial.clone());
        }

        let entities: Vec<T> = T::from_summary(&summary)
            .into_iter()
            .filter_map(|record| match record {
                Ok(entity) => Some(entity),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed record");
                    None
                }
            })
            .collect();

        let received = entities.len();
        let changed = self.apply_batch(&mut registry, entities, self.config.publish_unchanged());
        tracing::debug!(received, changed, "Sync pass completed");
        Ok(changed)
    }

    /// Upserts every entity, then publishes.
    ///
    /// Publishing waits until the whole batch is stored so that cross
    /// references between entities of the batch resolve.
    fn apply_batch<T: Tracked>(
        &self,
        registry: &mut Registry,
        entities: Vec<T>,
        publish_all: bool,
    ) -> usize {
        let mut applied: Vec<BatchEntry> = Vec::with_capacity(entities.len());
        let mut positions: HashMap<EntityId, usize> = HashMap::new();

        for entity in entities {
            let id = entity.id();
            let previous_version = T::partition(registry)
                .get(id)
                .map(|handle| handle.read().base().version.clone());
            let incoming_version = entity.base().version.clone();
            let upsert = T::partition_mut(registry).upsert(entity);

            let properties_changed = match previous_version {
                None => true,
                Some(version) => version != incoming_version,
            };
            tracing::debug!(%id, ?upsert, "Stored record");

            match positions.get(&id) {
                Some(&index) => {
                    applied[index].changed |= upsert.is_change();
                    applied[index].properties_changed |= properties_changed;
                }
                None => {
                    positions.insert(id, applied.len());
                    applied.push(BatchEntry {
                        id,
                        changed: upsert.is_change(),
                        properties_changed,
                    });
                }
            }
        }

        let registry: &Registry = registry;
        for entry in &applied {
            if !(entry.changed || publish_all) {
                continue;
            }
            let Some(entity) = T::partition(registry).snapshot(entry.id) else {
                continue;
            };
            self.publish_entity(registry, &entity);
            if entry.properties_changed {
                self.publisher.update_properties(entity.key(), &entity.properties());
            }
        }

        applied.iter().filter(|entry| entry.changed).count()
    }

    fn apply_entity(&self, registry: &mut Registry, entity: Entity, publish: bool) -> bool {
        let changed = match entity {
            Entity::Device(e) => self.apply_batch(registry, vec![e], publish),
            Entity::Pet(e) => self.apply_batch(registry, vec![e], publish),
            Entity::Household(e) => self.apply_batch(registry, vec![e], publish),
            Entity::Tag(e) => self.apply_batch(registry, vec![e], publish),
        };
        changed > 0
    }

    fn publish_entity<T: Tracked>(&self, registry: &Registry, entity: &T) {
        let context = MapContext::new(registry).with_zone(self.config.zone());
        let channels = entity.channels(&context);
        tracing::debug!(entity = %entity.key(), channels = channels.len(), "Publishing channels");
        self.publisher.publish(entity.key(), channels.as_slice());
    }
}

/// Normalizes and validates an entity returned for `key`.
fn checked_response(key: EntityKey, entity: Entity) -> Result<Entity, RecordError> {
    let entity = entity.normalized();
    entity.validate()?;
    if entity.key() != key {
        return Err(RecordError::malformed(
            key.kind,
            format!("expected {key}, remote returned {}", entity.key()),
        ));
    }
    Ok(entity)
}

fn outcome(key: EntityKey, command: EntityCommand, confirmed: Option<i64>) -> CommandOutcome {
    let requested = command.requested_value();
    if confirmed == Some(requested) {
        tracing::debug!(%key, %command, "Command confirmed");
        CommandOutcome::Applied
    } else {
        tracing::warn!(%key, %command, ?confirmed, "Remote state differs from command");
        CommandOutcome::Diverged {
            requested,
            confirmed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::model::LocationRecord;

    #[test]
    fn checked_response_rejects_other_entity() {
        let err = checked_response(EntityKey::pet(1), PetEntity::new(2).into()).unwrap_err();
        assert!(err.to_string().contains("expected pet:1"));
        assert!(checked_response(EntityKey::pet(1), PetEntity::new(1).into()).is_ok());
    }

    #[test]
    fn outcome_compares_read_back() {
        let command = EntityCommand::SetPetLocation { where_id: 2 };
        assert_eq!(outcome(EntityKey::pet(1), command, Some(2)), CommandOutcome::Applied);
        assert_eq!(
            outcome(EntityKey::pet(1), command, Some(1)),
            CommandOutcome::Diverged {
                requested: 2,
                confirmed: Some(1)
            }
        );
        let pet = Entity::from(PetEntity::new(1).with_location(LocationRecord::new(2)));
        assert_eq!(command.confirmed_value(&pet), Some(2));
    }

    #[test]
    fn report_summarizes_passes() {
        let report = SyncReport {
            passes: vec![
                (EntityKind::Household, Ok(2)),
                (
                    EntityKind::Device,
                    Err(SyncError::Fetch {
                        kind: EntityKind::Device,
                        source: FetchError::AuthExpired,
                    }),
                ),
                (EntityKind::Pet, Ok(3)),
            ],
        };
        assert_eq!(report.changed(), 5);
        assert!(!report.is_success());
        assert!(report.auth_expired());
        assert_eq!(report.failures().map(|(kind, _)| kind).collect::<Vec<_>>(), vec![EntityKind::Device]);
    }
}
