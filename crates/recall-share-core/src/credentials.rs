//! Credential relay between the host app and the share extension.
//!
//! The host publishes a point-in-time snapshot of its access token and API
//! base URL into the shared store; the extension reads it back when a share
//! is confirmed. No invalidation signal exists; an expired token is the
//! backend's to reject, at which point the submit path falls back to the
//! queue anyway.

use std::fmt;

use crate::error::{Error, Result};
use crate::store::{keys, SharedStore, StoreValue};
use crate::util::normalize_text_option;

/// A usable credential pair. Either both fields are present and non-empty or
/// the pair does not exist; a partial pair always reads back as absent.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_token: String,
    pub api_base_url: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Credentials")
            .field("access_token", &"[REDACTED]")
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

/// Typed arguments for the host's `syncAuthConfig` bridge call.
///
/// Replaces the duck-typed argument map of the original channel: both keys
/// must be present, each value a string or null. Null or empty revokes that
/// field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncAuthConfig {
    pub access_token: Option<String>,
    pub api_base_url: Option<String>,
}

impl SyncAuthConfig {
    /// Build from a JSON argument map, failing with
    /// [`Error::InvalidRequest`] when the map or a required field is missing
    /// or has the wrong type.
    pub fn from_args(args: &serde_json::Value) -> Result<Self> {
        let map = args
            .as_object()
            .ok_or_else(|| Error::InvalidRequest("expected a map of arguments".to_string()))?;

        Ok(Self {
            access_token: required_field(map, "accessToken")?,
            api_base_url: required_field(map, "apiBaseUrl")?,
        })
    }
}

fn required_field(
    map: &serde_json::Map<String, serde_json::Value>,
    name: &str,
) -> Result<Option<String>> {
    match map.get(name) {
        None => Err(Error::InvalidRequest(format!("missing field '{name}'"))),
        Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(value)) => {
            Ok(normalize_text_option(Some(value.clone())))
        }
        Some(other) => Err(Error::InvalidRequest(format!(
            "field '{name}' must be a string or null, got {other}"
        ))),
    }
}

/// Publishes and reads the credential snapshot in the shared store.
pub struct CredentialRelay<'a, S: SharedStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: SharedStore + ?Sized> CredentialRelay<'a, S> {
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Write both fields, removing a field when its value is absent or empty
    /// (explicit revoke, e.g. on sign-out). Overwrites any previous
    /// snapshot; no history is kept.
    pub fn publish(&self, access_token: Option<&str>, api_base_url: Option<&str>) -> Result<()> {
        self.publish_field(keys::ACCESS_TOKEN, access_token)?;
        self.publish_field(keys::API_BASE_URL, api_base_url)?;
        tracing::debug!(
            token_present = access_token.is_some_and(|token| !token.trim().is_empty()),
            base_url = api_base_url.unwrap_or("<cleared>"),
            "published share credentials"
        );
        Ok(())
    }

    /// Read a usable pair, or `None` when either field is missing or empty.
    pub fn read(&self) -> Result<Option<Credentials>> {
        let access_token = normalize_text_option(self.store.get_text(keys::ACCESS_TOKEN)?);
        let api_base_url = normalize_text_option(self.store.get_text(keys::API_BASE_URL)?);

        match (access_token, api_base_url) {
            (Some(access_token), Some(api_base_url)) => Ok(Some(Credentials {
                access_token,
                api_base_url,
            })),
            _ => Ok(None),
        }
    }

    fn publish_field(&self, key: &str, value: Option<&str>) -> Result<()> {
        match normalize_text_option(value.map(str::to_string)) {
            Some(value) => self.store.set(key, StoreValue::Text(value)),
            None => self.store.remove(key),
        }
    }
}
