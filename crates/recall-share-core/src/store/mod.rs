//! Shared store adapter.
//!
//! Both processes (share extension and host app) see the same durable
//! key-value store. The store is the single source of truth for the pending
//! queue and the relayed credentials; no in-memory cache is authoritative
//! across the process boundary.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Store keys shared with the host application. Names must match on both
/// sides of the process boundary.
pub mod keys {
    /// FIFO list of not-yet-confirmed shared URLs.
    pub const PENDING_SHARED_URLS: &str = "pendingSharedURLs";
    /// Access token the host relays for the extension's direct submit path.
    pub const ACCESS_TOKEN: &str = "shareExtensionAccessToken";
    /// API base URL the host relays alongside the token.
    pub const API_BASE_URL: &str = "shareExtensionApiBaseUrl";

    /// Single-value key written by the legacy extension variant. Not
    /// consumed by the queue-based flow.
    pub const LEGACY_SHARED_URL: &str = "sharedURL";
    /// Timestamp companion to [`LEGACY_SHARED_URL`]. Not consumed either.
    pub const LEGACY_SHARED_URL_TIMESTAMP: &str = "sharedURLTimestamp";
}

/// Value shapes the shared store holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoreValue {
    Text(String),
    List(Vec<String>),
}

/// Typed synchronous access to the shared key-value store.
///
/// Every write must be durably persisted before the call returns; there are
/// no buffered writes that can be lost on process exit. A missing key is
/// `None`, never an error, and is distinct from an empty value.
pub trait SharedStore {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<StoreValue>>;

    /// Durably write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: StoreValue) -> Result<()>;

    /// Durably remove `key`. Removing an absent key is a no-op.
    fn remove(&self, key: &str) -> Result<()>;

    /// Read a text value. A list stored under `key` reads as absent.
    fn get_text(&self, key: &str) -> Result<Option<String>> {
        match self.get(key)? {
            Some(StoreValue::Text(value)) => Ok(Some(value)),
            _ => Ok(None),
        }
    }

    /// Read a list value. A text value stored under `key` reads as absent.
    fn get_list(&self, key: &str) -> Result<Option<Vec<String>>> {
        match self.get(key)? {
            Some(StoreValue::List(values)) => Ok(Some(values)),
            _ => Ok(None),
        }
    }
}
