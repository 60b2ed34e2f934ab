//! Host-to-core bridge: the method-channel surface the host app wires up.

use serde_json::Value;

use crate::credentials::{CredentialRelay, SyncAuthConfig};
use crate::error::{Error, Result};
use crate::queue::PendingQueue;
use crate::store::SharedStore;

/// Bridge methods by their channel names.
pub const METHOD_GET_PENDING_URLS: &str = "getPendingUrls";
pub const METHOD_CLEAR_PENDING_URLS: &str = "clearPendingUrls";
pub const METHOD_SYNC_AUTH_CONFIG: &str = "syncAuthConfig";

/// Operations the host application invokes against the shared store.
pub struct ShareBridge<'a, S: SharedStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: SharedStore + ?Sized> ShareBridge<'a, S> {
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Snapshot of the pending queue without clearing it.
    pub fn pending_urls(&self) -> Result<Vec<String>> {
        PendingQueue::new(self.store).pending()
    }

    /// Drop the pending queue. The host calls this after it has taken
    /// responsibility for the entries.
    pub fn clear_pending_urls(&self) -> Result<()> {
        PendingQueue::new(self.store).drain_all()?;
        Ok(())
    }

    /// Relay the host's current auth snapshot into the shared store so the
    /// extension can attempt direct submits.
    pub fn sync_auth_config(&self, config: &SyncAuthConfig) -> Result<()> {
        CredentialRelay::new(self.store)
            .publish(config.access_token.as_deref(), config.api_base_url.as_deref())
    }

    /// Dispatch a raw channel call by method name.
    ///
    /// Mirrors the dynamic channel contract: `getPendingUrls` returns the
    /// URL list, the other two return null, and an unknown method is
    /// [`Error::UnsupportedMethod`].
    pub fn handle_call(&self, method: &str, args: Option<&Value>) -> Result<Value> {
        match method {
            METHOD_GET_PENDING_URLS => Ok(Value::from(self.pending_urls()?)),
            METHOD_CLEAR_PENDING_URLS => {
                self.clear_pending_urls()?;
                Ok(Value::Null)
            }
            METHOD_SYNC_AUTH_CONFIG => {
                let args = args.ok_or_else(|| {
                    Error::InvalidRequest("expected a map of arguments".to_string())
                })?;
                self.sync_auth_config(&SyncAuthConfig::from_args(args)?)?;
                Ok(Value::Null)
            }
            other => Err(Error::UnsupportedMethod(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn pending_urls_snapshot_does_not_clear() {
        let store = MemoryStore::new();
        PendingQueue::new(&store).enqueue("https://a.example/1").unwrap();

        let bridge = ShareBridge::new(&store);
        assert_eq!(
            bridge.pending_urls().unwrap(),
            vec!["https://a.example/1".to_string()]
        );
        assert_eq!(
            bridge.pending_urls().unwrap(),
            vec!["https://a.example/1".to_string()]
        );

        bridge.clear_pending_urls().unwrap();
        assert_eq!(bridge.pending_urls().unwrap(), Vec::<String>::new());
    }

    #[test]
    fn handle_call_dispatches_known_methods() {
        let store = MemoryStore::new();
        PendingQueue::new(&store).enqueue("https://a.example/1").unwrap();
        let bridge = ShareBridge::new(&store);

        assert_eq!(
            bridge.handle_call(METHOD_GET_PENDING_URLS, None).unwrap(),
            json!(["https://a.example/1"])
        );

        let args = json!({ "accessToken": "token-123", "apiBaseUrl": "https://api.example" });
        assert_eq!(
            bridge
                .handle_call(METHOD_SYNC_AUTH_CONFIG, Some(&args))
                .unwrap(),
            Value::Null
        );
        assert!(CredentialRelay::new(&store).read().unwrap().is_some());

        assert_eq!(
            bridge.handle_call(METHOD_CLEAR_PENDING_URLS, None).unwrap(),
            Value::Null
        );
        assert_eq!(bridge.pending_urls().unwrap(), Vec::<String>::new());
    }

    #[test]
    fn handle_call_rejects_unknown_methods_and_missing_args() {
        let store = MemoryStore::new();
        let bridge = ShareBridge::new(&store);

        assert!(matches!(
            bridge.handle_call("openSettings", None),
            Err(Error::UnsupportedMethod(_))
        ));
        assert!(matches!(
            bridge.handle_call(METHOD_SYNC_AUTH_CONFIG, None),
            Err(Error::InvalidRequest(_))
        ));
    }
}
