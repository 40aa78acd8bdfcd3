//! Outbound ports — contracts between the pipeline and its collaborators.
//!
//! Everything with real I/O lives behind one of these traits: feed
//! retrieval, snapshot and state blobs, the new-only dedup record store,
//! and the notification queue. Concrete adapters live in `vigil-io`;
//! integration tests swap in in-memory fakes.
//!
//! All traits are object-safe and `Send + Sync` so the pipeline can hold
//! them as boxed trait objects.

use async_trait::async_trait;
use uuid::Uuid;

use crate::config::FeedConfig;
use crate::state::FeedState;
use crate::types::Notification;

// ---------------------------------------------------------------------------
// Storage keys
// ---------------------------------------------------------------------------

/// Storage namespace for one feed: `<environment>/feeds/<source>/<name>`.
/// Every blob a feed owns (snapshots, latest pointer, state document) lives
/// under this prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeedKey {
    pub environment: String,
    pub source: String,
    pub name: String,
}

impl FeedKey {
    pub fn new(environment: &str, feed: &FeedConfig) -> Self {
        Self {
            environment: environment.to_string(),
            source: feed.source.clone(),
            name: feed.name.clone(),
        }
    }

    /// Relative storage prefix for this feed.
    pub fn prefix(&self) -> String {
        format!("{}/feeds/{}/{}", self.environment, self.source, self.name)
    }
}

impl std::fmt::Display for FeedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.prefix())
    }
}

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// Retrieves a feed body. Idempotent and side-effect-free from the
/// pipeline's perspective; timeouts belong to the implementation.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// `Ok(None)` means the source answered but had no document.
    async fn fetch(&self, url: &str) -> anyhow::Result<Option<String>>;
}

/// Blob storage for raw feed bodies: an append-only audit trail of
/// timestamped snapshots plus a single mutable `latest` pointer.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn latest(&self, feed: &FeedKey) -> anyhow::Result<Option<String>>;
    async fn put(&self, feed: &FeedKey, name: &str, body: &str) -> anyhow::Result<()>;
    async fn put_latest(&self, feed: &FeedKey, body: &str) -> anyhow::Result<()>;
}

/// Whole-document persistence for a feed's [`FeedState`]. `save` must be
/// atomic: a reader never observes a partially written document.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn load(&self, feed: &FeedKey) -> anyhow::Result<Option<FeedState>>;
    async fn save(&self, feed: &FeedKey, state: &FeedState) -> anyhow::Result<()>;
}

/// Durable dedup lookup/write keyed by address identity, used by new-only
/// tracking. Records are never deleted.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn exists(&self, identity: Uuid) -> anyhow::Result<bool>;
    async fn save(&self, notification: &Notification) -> anyhow::Result<()>;
}

/// At-least-once delivery of one payload per newly observed entry.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        queue_name: &str,
        payload: &Notification,
        deduplicate: bool,
    ) -> anyhow::Result<()>;
}
