//! Pending-URL queue persisted in the shared store.
//!
//! The extension appends, the host drains. The queue lives as a single list
//! of URL strings under [`keys::PENDING_SHARED_URLS`]; insertion order is
//! delivery order and entries are never mutated in place.

use std::fmt;

use crate::error::{Error, Result};
use crate::store::{keys, SharedStore, StoreValue};
use crate::util::unix_timestamp_now;

/// A shared URL accepted at the producer boundary.
///
/// Construction is the single validation point: the value is a syntactically
/// valid absolute URL with scheme `http` or `https`. Consumers (the host
/// drain) never re-validate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedUrl(String);

impl SharedUrl {
    /// Parse and validate a raw shared string.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidUrl("empty URL".to_string()));
        }

        let parsed = reqwest::Url::parse(trimmed)
            .map_err(|error| Error::InvalidUrl(format!("{trimmed}: {error}")))?;
        match parsed.scheme() {
            "http" | "https" => Ok(Self(trimmed.to_string())),
            scheme => Err(Error::InvalidUrl(format!(
                "{trimmed}: unsupported scheme '{scheme}'"
            ))),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SharedUrl {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// A queue entry as accepted from the producer.
///
/// `enqueued_at` is logical (ordering/debugging); the durable format holds
/// only the URL strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedEntry {
    pub url: SharedUrl,
    pub enqueued_at: i64,
}

/// FIFO queue of not-yet-confirmed shared URLs.
pub struct PendingQueue<'a, S: SharedStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: SharedStore + ?Sized> PendingQueue<'a, S> {
    /// Create a queue over the given shared store.
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Validate `raw` and append it to the queue.
    ///
    /// Fails with [`Error::InvalidUrl`] and performs no write when `raw` is
    /// not an absolute http/https URL.
    pub fn enqueue(&self, raw: &str) -> Result<SharedEntry> {
        let url = SharedUrl::parse(raw)?;
        self.enqueue_url(&url)
    }

    /// Append an already-validated URL to the queue.
    pub fn enqueue_url(&self, url: &SharedUrl) -> Result<SharedEntry> {
        self.append(url.as_str())?;
        let entry = SharedEntry {
            url: url.clone(),
            enqueued_at: unix_timestamp_now(),
        };
        tracing::debug!(url = %entry.url, "enqueued pending shared URL");
        Ok(entry)
    }

    /// Re-append a previously drained entry verbatim.
    ///
    /// Drained entries were validated when first accepted, so the host drain
    /// path puts a failed entry back without re-validation.
    pub fn requeue(&self, url: &str) -> Result<()> {
        self.append(url)
    }

    /// Read the whole queue, then clear it, returning what was read.
    ///
    /// Strict read-then-clear: the list is taken as one unit, never entry by
    /// entry, so an interruption cannot leave a partial drain behind. A crash
    /// between the read and the clear re-delivers the same entries on the
    /// next drain; submission downstream must tolerate duplicates.
    pub fn drain_all(&self) -> Result<Vec<String>> {
        match self.store.get_list(keys::PENDING_SHARED_URLS)? {
            Some(urls) => {
                self.store.remove(keys::PENDING_SHARED_URLS)?;
                Ok(urls)
            }
            None => Ok(Vec::new()),
        }
    }

    /// Non-destructive snapshot of the queue contents.
    pub fn pending(&self) -> Result<Vec<String>> {
        Ok(self
            .store
            .get_list(keys::PENDING_SHARED_URLS)?
            .unwrap_or_default())
    }

    // Read-append-write of the full list. Not transactional against a
    // concurrent writer in the same process generation; the two real writers
    // are separate processes that never overlap in practice.
    fn append(&self, url: &str) -> Result<()> {
        let mut urls = self
            .store
            .get_list(keys::PENDING_SHARED_URLS)?
            .unwrap_or_default();
        urls.push(url.to_string());
        self.store
            .set(keys::PENDING_SHARED_URLS, StoreValue::List(urls))
    }
}
