// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `CloudState` library.
//!
//! The hierarchy mirrors the stages of a sync pass: remote calls fail with
//! [`FetchError`], individual records fail normalization with
//! [`RecordError`], whole passes fail with [`SyncError`] and user-initiated
//! writes fail with [`CommandError`]. [`Error`] wraps all of them.

use thiserror::Error;

use crate::types::{EntityKey, EntityKind};

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while parsing remote data.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A remote call failed.
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// A record could not be normalized.
    #[error("record error: {0}")]
    Record(#[from] RecordError),

    /// A sync pass failed.
    #[error("sync error: {0}")]
    Sync(#[from] SyncError),

    /// A command failed.
    #[error("command error: {0}")]
    Command(#[from] CommandError),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// An entity identifier could not be parsed.
    #[error("invalid entity id: {0}")]
    InvalidId(String),

    /// An entity kind name could not be parsed.
    #[error("invalid entity kind: {0}")]
    InvalidEntityKind(String),

    /// A zone offset is outside the representable range.
    #[error("zone offset {0} s is out of range")]
    InvalidZoneOffset(i32),

    /// A poll interval of zero was requested.
    #[error("poll interval must be greater than zero")]
    InvalidPollInterval,
}

/// Errors related to parsing remote data.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A timestamp was in none of the accepted formats.
    #[error("failed to parse timestamp: '{0}' (expected ISO 8601 or Unix epoch)")]
    InvalidTimestamp(String),
}

/// Errors returned by a [`SnapshotFetcher`](crate::fetcher::SnapshotFetcher).
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transient network or HTTP failure.
    #[error("remote unavailable: {0}")]
    RemoteUnavailable(String),

    /// The session credentials are no longer accepted.
    #[error("authentication expired")]
    AuthExpired,

    /// The remote side does not know the entity.
    #[error("{0} not found on remote")]
    NotFound(EntityKey),

    /// The remote side accepted the call but refused the command.
    #[error("command rejected by remote: {0}")]
    CommandRejected(String),

    /// The remote response could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(#[from] ParseError),
}

impl FetchError {
    /// Returns `true` if re-authentication is needed before the next call.
    #[must_use]
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired)
    }

    /// Returns `true` if the next scheduled pass may succeed without
    /// intervention.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RemoteUnavailable(_))
    }
}

/// Errors raised while normalizing a single fetched record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The record is structurally invalid and was skipped.
    #[error("malformed {kind} record: {reason}")]
    Malformed {
        /// Kind of the entity the record was meant to describe.
        kind: EntityKind,
        /// Description of the violation.
        reason: String,
    },
}

impl RecordError {
    /// Creates a malformed-record error.
    #[must_use]
    pub fn malformed(kind: EntityKind, reason: impl Into<String>) -> Self {
        Self::Malformed {
            kind,
            reason: reason.into(),
        }
    }
}

/// Errors that abort a sync pass or a single-entity refresh.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Fetching from the remote source failed; the registry was not touched.
    #[error("{kind} sync failed: {source}")]
    Fetch {
        /// The entity kind whose pass failed.
        kind: EntityKind,
        /// The underlying remote failure.
        #[source]
        source: FetchError,
    },

    /// A single fetched entity was malformed.
    #[error(transparent)]
    Record(#[from] RecordError),
}

impl SyncError {
    /// Returns the remote failure behind this error, if any.
    #[must_use]
    pub fn fetch_error(&self) -> Option<&FetchError> {
        match self {
            Self::Fetch { source, .. } => Some(source),
            Self::Record(_) => None,
        }
    }

    /// Returns `true` if the pass failed because the session expired.
    #[must_use]
    pub fn is_auth_expired(&self) -> bool {
        self.fetch_error().is_some_and(FetchError::is_auth_expired)
    }
}

/// Errors related to user-initiated commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The raw command value could not be interpreted. No remote call was made.
    #[error("invalid value '{value}' for channel {channel}: {reason}")]
    InvalidValue {
        /// The targeted channel.
        channel: String,
        /// The raw value received.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The channel does not accept commands for this entity.
    #[error("channel {channel} does not accept commands for {kind} entities")]
    UnsupportedChannel {
        /// Kind of the targeted entity.
        kind: EntityKind,
        /// The targeted channel.
        channel: String,
    },

    /// The entity is not known locally.
    #[error("unknown entity {0}")]
    UnknownEntity(EntityKey),

    /// The remote side refused the command; local state is unchanged.
    #[error("command rejected by remote: {0}")]
    RejectedByRemote(String),

    /// The remote call failed; local state is unchanged.
    #[error("remote call failed: {0}")]
    Remote(#[source] FetchError),

    /// The remote side answered with an entity that cannot be applied.
    #[error("unexpected command response: {0}")]
    UnexpectedResponse(String),
}

impl From<FetchError> for CommandError {
    fn from(error: FetchError) -> Self {
        match error {
            FetchError::CommandRejected(message) => Self::RejectedByRemote(message),
            other => Self::Remote(other),
        }
    }
}

impl From<SyncError> for CommandError {
    fn from(error: SyncError) -> Self {
        match error {
            SyncError::Fetch { source, .. } => source.into(),
            SyncError::Record(record) => Self::UnexpectedResponse(record.to_string()),
        }
    }
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_error_display() {
        let err = RecordError::malformed(EntityKind::Pet, "missing field `id`");
        assert_eq!(err.to_string(), "malformed pet record: missing field `id`");
    }

    #[test]
    fn sync_error_display() {
        let err = SyncError::Fetch {
            kind: EntityKind::Device,
            source: FetchError::AuthExpired,
        };
        assert_eq!(err.to_string(), "device sync failed: authentication expired");
        assert!(err.is_auth_expired());
    }

    #[test]
    fn rejected_fetch_becomes_rejected_command() {
        let err: CommandError = FetchError::CommandRejected("locked".to_string()).into();
        assert!(matches!(err, CommandError::RejectedByRemote(ref m) if m == "locked"));

        let err: CommandError = FetchError::RemoteUnavailable("timeout".to_string()).into();
        assert!(matches!(
            err,
            CommandError::Remote(FetchError::RemoteUnavailable(_))
        ));
    }

    #[test]
    fn not_found_display() {
        let err = FetchError::NotFound(EntityKey::pet(42));
        assert_eq!(err.to_string(), "pet:42 not found on remote");
        assert!(!err.is_transient());
    }

    #[test]
    fn error_from_command_error() {
        let err: Error = CommandError::UnknownEntity(EntityKey::device(1)).into();
        assert!(matches!(err, Error::Command(CommandError::UnknownEntity(_))));
    }
}
