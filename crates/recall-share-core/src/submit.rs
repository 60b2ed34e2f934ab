//! Direct submit path: extension-side save with store-and-sync fallback.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::json;
use thiserror::Error;

use crate::credentials::CredentialRelay;
use crate::error::{Error, Result};
use crate::queue::{PendingQueue, SharedUrl};
use crate::store::SharedStore;
use crate::util::{compact_text, is_http_url, normalize_text_option};

/// Fixed timeout for a direct submit request.
pub const SUBMIT_TIMEOUT: Duration = Duration::from_secs(15);

const ITEMS_PATH: &str = "/api/v1/items";

/// Submit-path failures. Both variants are soft: the caller recovers by
/// queueing, so neither ever reaches the user as an error.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("items API request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("items API rejected the request: HTTP {status}")]
    Rejected { status: u16, body: String },
}

/// Client for the backend items endpoint.
#[derive(Debug, Clone)]
pub struct ItemsClient {
    base_url: String,
    client: reqwest::Client,
}

impl ItemsClient {
    /// Build a client for `POST {base_url}/api/v1/items`.
    ///
    /// The base URL is trimmed, stripped of trailing slashes, and must be
    /// http/https.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = normalize_text_option(Some(base_url.into()))
            .ok_or_else(|| Error::InvalidConfiguration("base URL must not be empty".to_string()))?;
        if !is_http_url(&base_url) {
            return Err(Error::InvalidConfiguration(
                "base URL must include http:// or https://".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(SUBMIT_TIMEOUT)
            .build()
            .map_err(|error| Error::InvalidConfiguration(error.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}{ITEMS_PATH}", self.base_url)
    }

    /// Create an item for `url` on the backend. Success is any status in
    /// `[200, 300)`.
    pub async fn create_item(
        &self,
        access_token: &str,
        url: &str,
    ) -> std::result::Result<StatusCode, SubmitError> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(access_token)
            .json(&json!({ "url": url }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(status)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(SubmitError::Rejected {
                status: status.as_u16(),
                body: compact_text(&body),
            })
        }
    }
}

/// Why a share ended up queued instead of submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingReason {
    /// No usable credential pair was published by the host.
    NoCredentials,
    /// Timeout, DNS, or connection failure.
    TransportFailure,
    /// The backend answered outside `[200, 300)`.
    BackendRejected(u16),
}

/// Terminal outcome of a confirmed share action. Transport and API failures
/// never surface as hard errors; the only hard error is invalid input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The backend accepted the item.
    Saved,
    /// The URL is in the pending queue for the host to sync.
    SavedPending(PendingReason),
}

impl ShareOutcome {
    /// User-facing status line for this outcome. Every terminal path has
    /// one; the share UI shows it before dismissing.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::Saved => "Saved to Recall",
            Self::SavedPending(PendingReason::NoCredentials) => {
                "Saved — will sync when you open Recall"
            }
            Self::SavedPending(_) => "Saved locally — will sync later",
        }
    }
}

/// Extension-side submitter: direct API attempt with queue fallback.
pub struct ShareSubmitter<'a, S: SharedStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: SharedStore + ?Sized> ShareSubmitter<'a, S> {
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Submit a confirmed share.
    ///
    /// Validates the URL (the one hard-error path), then either posts it
    /// straight to the backend using the relayed credentials or falls back
    /// to the pending queue. A single failed attempt queues immediately;
    /// there is no retry in place.
    pub async fn submit(&self, raw_url: &str) -> Result<ShareOutcome> {
        let url = SharedUrl::parse(raw_url)?;
        let queue = PendingQueue::new(self.store);

        let Some(credentials) = CredentialRelay::new(self.store).read()? else {
            tracing::info!(url = %url, "no relayed credentials, queueing for host sync");
            queue.enqueue_url(&url)?;
            return Ok(ShareOutcome::SavedPending(PendingReason::NoCredentials));
        };

        // A published base URL that cannot form a client is as unusable as
        // no credentials at all.
        let client = match ItemsClient::new(credentials.api_base_url.as_str()) {
            Ok(client) => client,
            Err(error) => {
                tracing::warn!(%error, "relayed base URL is unusable, queueing for host sync");
                queue.enqueue_url(&url)?;
                return Ok(ShareOutcome::SavedPending(PendingReason::NoCredentials));
            }
        };

        match client.create_item(&credentials.access_token, url.as_str()).await {
            Ok(status) => {
                tracing::info!(url = %url, status = status.as_u16(), "item created directly");
                Ok(ShareOutcome::Saved)
            }
            Err(SubmitError::Rejected { status, body }) => {
                tracing::warn!(url = %url, status, body, "backend rejected item, queueing");
                queue.enqueue_url(&url)?;
                Ok(ShareOutcome::SavedPending(PendingReason::BackendRejected(
                    status,
                )))
            }
            Err(SubmitError::Transport(error)) => {
                tracing::warn!(url = %url, %error, "transport failure, queueing");
                queue.enqueue_url(&url)?;
                Ok(ShareOutcome::SavedPending(PendingReason::TransportFailure))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{keys, MemoryStore, StoreValue};
    use pretty_assertions::assert_eq;

    fn publish(store: &MemoryStore, token: &str, base_url: &str) {
        CredentialRelay::new(store)
            .publish(Some(token), Some(base_url))
            .unwrap();
    }

    fn pending(store: &MemoryStore) -> Vec<String> {
        PendingQueue::new(store).pending().unwrap()
    }

    #[test]
    fn items_client_normalizes_base_url() {
        let client = ItemsClient::new(" https://api.example/ ").unwrap();
        assert_eq!(client.endpoint(), "https://api.example/api/v1/items");

        assert!(ItemsClient::new("api.example").is_err());
        assert!(ItemsClient::new("   ").is_err());
    }

    #[test]
    fn user_messages_cover_every_outcome() {
        assert_eq!(ShareOutcome::Saved.user_message(), "Saved to Recall");
        assert_eq!(
            ShareOutcome::SavedPending(PendingReason::NoCredentials).user_message(),
            "Saved — will sync when you open Recall"
        );
        assert_eq!(
            ShareOutcome::SavedPending(PendingReason::BackendRejected(500)).user_message(),
            "Saved locally — will sync later"
        );
        assert_eq!(
            ShareOutcome::SavedPending(PendingReason::TransportFailure).user_message(),
            "Saved locally — will sync later"
        );
    }

    #[tokio::test]
    async fn invalid_url_is_a_hard_error_with_no_queueing() {
        let store = MemoryStore::new();
        let submitter = ShareSubmitter::new(&store);

        let result = submitter.submit("notaurl").await;
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
        assert_eq!(pending(&store), Vec::<String>::new());
    }

    #[tokio::test]
    async fn absent_credentials_queue_without_any_network_call() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/items")
            .expect(0)
            .create_async()
            .await;

        let store = MemoryStore::new();
        // Partial pair: base URL only, so credentials read back absent.
        store
            .set(keys::API_BASE_URL, StoreValue::Text(server.url()))
            .unwrap();

        let outcome = ShareSubmitter::new(&store)
            .submit("https://a.example/1")
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ShareOutcome::SavedPending(PendingReason::NoCredentials)
        );
        assert_eq!(pending(&store), vec!["https://a.example/1".to_string()]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn successful_submit_does_not_enqueue() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/items")
            .match_header("authorization", "Bearer token-123")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::Json(
                serde_json::json!({ "url": "https://a.example/1" }),
            ))
            .with_status(201)
            .create_async()
            .await;

        let store = MemoryStore::new();
        publish(&store, "token-123", &server.url());

        let outcome = ShareSubmitter::new(&store)
            .submit("https://a.example/1")
            .await
            .unwrap();

        assert_eq!(outcome, ShareOutcome::Saved);
        assert_eq!(pending(&store), Vec::<String>::new());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn backend_rejection_queues_the_original_url() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/v1/items")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let store = MemoryStore::new();
        publish(&store, "token-123", &server.url());

        let outcome = ShareSubmitter::new(&store)
            .submit("https://a.example/1")
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ShareOutcome::SavedPending(PendingReason::BackendRejected(500))
        );
        assert_eq!(pending(&store), vec!["https://a.example/1".to_string()]);
    }

    #[tokio::test]
    async fn transport_failure_queues_the_original_url() {
        // Bind then drop a listener so the port is very likely unused.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let store = MemoryStore::new();
        publish(&store, "token-123", &format!("http://127.0.0.1:{port}"));

        let outcome = ShareSubmitter::new(&store)
            .submit("https://a.example/1")
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ShareOutcome::SavedPending(PendingReason::TransportFailure)
        );
        assert_eq!(pending(&store), vec!["https://a.example/1".to_string()]);
    }

    #[tokio::test]
    async fn unusable_base_url_falls_back_to_the_queue() {
        let store = MemoryStore::new();
        publish(&store, "token-123", "nonsense-base-url");

        let outcome = ShareSubmitter::new(&store)
            .submit("https://a.example/1")
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ShareOutcome::SavedPending(PendingReason::NoCredentials)
        );
        assert_eq!(pending(&store), vec!["https://a.example/1".to_string()]);
    }
}
