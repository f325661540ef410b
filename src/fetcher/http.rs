// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON-over-HTTP snapshot fetcher.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::command::EntityCommand;
use crate::error::{FetchError, ParseError};
use crate::model::{DeviceEntity, DeviceSummary, Entity, HouseholdEntity, PetEntity, TagEntity};
use crate::types::{EntityKey, EntityKind};

use super::SnapshotFetcher;

// ============================================================================
// HttpFetcherConfig
// ============================================================================

/// Configuration for an [`HttpFetcher`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use cloudstate_lib::fetcher::HttpFetcherConfig;
///
/// let config = HttpFetcherConfig::new("https://app.api.example.com/api/")
///     .with_token("secret")
///     .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.base_url(), "https://app.api.example.com/api");
/// assert_eq!(config.timeout(), Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct HttpFetcherConfig {
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl HttpFetcherConfig {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration for the given API root.
    ///
    /// A trailing slash is ignored.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets the bearer token sent with every request.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the API root.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds the fetcher.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::RemoteUnavailable`] if the HTTP client cannot be
    /// created.
    pub fn into_fetcher(self) -> Result<HttpFetcher, FetchError> {
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| FetchError::RemoteUnavailable(e.to_string()))?;

        Ok(HttpFetcher {
            base_url: self.base_url,
            client,
            token: self.token,
        })
    }
}

// ============================================================================
// HttpFetcher
// ============================================================================

/// Fetches snapshots from a JSON API.
///
/// Routes, relative to the configured base URL:
///
/// | Call | Route |
/// |------|-------|
/// | [`fetch_summary`](SnapshotFetcher::fetch_summary) | `GET /summary` |
/// | [`fetch_entity`](SnapshotFetcher::fetch_entity) | `GET /{kind}s/{id}` |
/// | [`apply_command`](SnapshotFetcher::apply_command) | `PUT /{kind}s/{id}/{path}` |
///
/// Response bodies may be wrapped in a `{"data": ...}` envelope.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    base_url: String,
    client: Client,
    token: Option<String>,
}

/// Which call a response belongs to, for status mapping.
#[derive(Debug, Clone, Copy)]
enum Call {
    Summary,
    Entity(EntityKey),
    Command(EntityKey),
}

impl HttpFetcher {
    /// Returns the API root.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn entity_url(&self, key: EntityKey) -> String {
        format!("{}/{}/{}", self.base_url, key.kind.collection(), key.id)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, call: Call) -> Result<Value, FetchError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| FetchError::RemoteUnavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::RemoteUnavailable(e.to_string()))?;

        tracing::debug!(status = status.as_u16(), ?call, "Received HTTP response");

        check_status(status, &body, call)?;

        let value: Value = serde_json::from_str(&body).map_err(ParseError::from)?;
        Ok(unwrap_envelope(value))
    }
}

impl SnapshotFetcher for HttpFetcher {
    async fn fetch_summary(&self) -> Result<DeviceSummary, FetchError> {
        let url = format!("{}/summary", self.base_url);
        tracing::debug!(url = %url, "Fetching summary");

        let value = self.send(self.client.get(&url), Call::Summary).await?;
        decode(&value)
    }

    async fn fetch_entity(&self, key: EntityKey) -> Result<Entity, FetchError> {
        let url = self.entity_url(key);
        tracing::debug!(url = %url, %key, "Fetching entity");

        let value = self.send(self.client.get(&url), Call::Entity(key)).await?;
        decode_entity(key.kind, &value)
    }

    async fn apply_command(&self, key: EntityKey, command: EntityCommand) -> Result<Entity, FetchError> {
        let url = format!("{}/{}", self.entity_url(key), command.path());
        tracing::debug!(url = %url, %key, %command, "Sending command");

        let request = self.client.put(&url).json(&command.body());
        let value = self.send(request, Call::Command(key)).await?;
        decode_entity(key.kind, &value)
    }
}

fn check_status(status: StatusCode, body: &str, call: Call) -> Result<(), FetchError> {
    if status.is_success() {
        return Ok(());
    }
    match (status, call) {
        (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, _) => Err(FetchError::AuthExpired),
        (StatusCode::NOT_FOUND, Call::Entity(key) | Call::Command(key)) => {
            Err(FetchError::NotFound(key))
        }
        (status, Call::Command(_)) if status.is_client_error() => {
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("Unknown").to_string()
            } else {
                body.trim().to_string()
            };
            Err(FetchError::CommandRejected(message))
        }
        (status, _) => Err(FetchError::RemoteUnavailable(format!(
            "HTTP {} - {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        ))),
    }
}

fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut fields) if fields.len() == 1 && fields.contains_key("data") => {
            fields.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

fn decode<T: DeserializeOwned>(value: &Value) -> Result<T, FetchError> {
    T::deserialize(value).map_err(|e| FetchError::InvalidResponse(ParseError::Json(e)))
}

fn decode_entity(kind: EntityKind, value: &Value) -> Result<Entity, FetchError> {
    Ok(match kind {
        EntityKind::Device => Entity::Device(decode::<DeviceEntity>(value)?),
        EntityKind::Pet => Entity::Pet(decode::<PetEntity>(value)?),
        EntityKind::Household => Entity::Household(decode::<HouseholdEntity>(value)?),
        EntityKind::Tag => Entity::Tag(decode::<TagEntity>(value)?),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn config_defaults() {
        let config = HttpFetcherConfig::new("http://localhost:8080");
        assert_eq!(config.timeout(), HttpFetcherConfig::DEFAULT_TIMEOUT);
        assert_eq!(config.base_url(), "http://localhost:8080");
    }

    #[test]
    fn entity_url_uses_collection() {
        let fetcher = HttpFetcherConfig::new("http://localhost/api/").into_fetcher().unwrap();
        assert_eq!(fetcher.entity_url(EntityKey::pet(7)), "http://localhost/api/pets/7");
        assert_eq!(fetcher.entity_url(EntityKey::household(2)), "http://localhost/api/households/2");
    }

    #[test]
    fn status_mapping() {
        let key = EntityKey::device(1);
        assert!(matches!(
            check_status(StatusCode::UNAUTHORIZED, "", Call::Summary),
            Err(FetchError::AuthExpired)
        ));
        assert!(matches!(
            check_status(StatusCode::NOT_FOUND, "", Call::Entity(key)),
            Err(FetchError::NotFound(k)) if k == key
        ));
        assert!(matches!(
            check_status(StatusCode::NOT_FOUND, "", Call::Summary),
            Err(FetchError::RemoteUnavailable(_))
        ));
        assert!(matches!(
            check_status(StatusCode::BAD_REQUEST, "bad mode", Call::Command(key)),
            Err(FetchError::CommandRejected(m)) if m == "bad mode"
        ));
        assert!(matches!(
            check_status(StatusCode::BAD_REQUEST, "", Call::Entity(key)),
            Err(FetchError::RemoteUnavailable(_))
        ));
        assert!(matches!(
            check_status(StatusCode::BAD_GATEWAY, "", Call::Command(key)),
            Err(FetchError::RemoteUnavailable(_))
        ));
        assert!(check_status(StatusCode::OK, "", Call::Summary).is_ok());
    }

    #[test]
    fn data_envelope_is_unwrapped() {
        assert_eq!(unwrap_envelope(json!({"data": {"id": 1}})), json!({"id": 1}));
        assert_eq!(
            unwrap_envelope(json!({"data": 1, "meta": 2})),
            json!({"data": 1, "meta": 2})
        );
    }

    #[test]
    fn decode_entity_by_kind() {
        let entity = decode_entity(EntityKind::Pet, &json!({"id": 3, "name": "Tom"})).unwrap();
        assert_eq!(entity.key(), EntityKey::pet(3));
        assert!(matches!(
            decode_entity(EntityKind::Pet, &json!({"name": "Tom"})),
            Err(FetchError::InvalidResponse(_))
        ));
    }
}
