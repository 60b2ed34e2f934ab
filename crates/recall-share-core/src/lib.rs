//! recall-share-core - Core library for Recall share sync
//!
//! Implements the pending-URL sync protocol shared between the Recall share
//! extension process and the host application process: a durable shared
//! key-value store, a FIFO pending queue with at-least-once delivery, a
//! credential relay, a direct submit path with store-and-sync fallback, and
//! the host-side drain.

pub mod bridge;
pub mod credentials;
pub mod drain;
pub mod error;
pub mod queue;
pub mod store;
pub mod submit;
pub mod util;

pub use bridge::ShareBridge;
pub use credentials::{CredentialRelay, Credentials, SyncAuthConfig};
pub use drain::{drain_pending, DrainReport};
pub use error::{Error, Result};
pub use queue::{PendingQueue, SharedEntry, SharedUrl};
pub use store::{JsonFileStore, MemoryStore, SharedStore, StoreValue};
pub use submit::{ItemsClient, PendingReason, ShareOutcome, ShareSubmitter, SUBMIT_TIMEOUT};
