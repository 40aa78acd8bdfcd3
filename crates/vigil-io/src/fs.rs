//! Filesystem adapters for the blob-shaped ports.
//!
//! [`FsStore`] lays a feed's blobs out under the data directory exactly as
//! the storage key dictates:
//!
//! ```text
//! <data_dir>/<env>/feeds/<source>/<feed>/20231114221320.txt   snapshots
//! <data_dir>/<env>/feeds/<source>/<feed>/latest.txt           latest pointer
//! <data_dir>/<env>/feeds/<source>/<feed>/state.json           feed state
//! <data_dir>/records/<identity>.json                          dedup records
//! ```
//!
//! State saves go through a temp file + rename in the same directory, so a
//! reader never observes a partially written document.

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use uuid::Uuid;

use vigil_core::ports::{FeedKey, RecordStore, SnapshotStore, StateStore};
use vigil_core::state::FeedState;
use vigil_core::types::Notification;

const LATEST_NAME: &str = "latest.txt";
const STATE_NAME: &str = "state.json";

// ---------------------------------------------------------------------------
// FsStore — snapshots and feed state
// ---------------------------------------------------------------------------

/// Filesystem-backed snapshot and state storage rooted at a data directory.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn feed_dir(&self, feed: &FeedKey) -> PathBuf {
        self.root.join(feed.prefix())
    }

    async fn read_if_present(path: &Path) -> anyhow::Result<Option<String>> {
        match tokio::fs::read_to_string(path).await {
            Ok(body) => Ok(Some(body)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("reading {}", path.display())),
        }
    }

    async fn write_atomic(path: &Path, contents: &[u8]) -> anyhow::Result<()> {
        let dir = path
            .parent()
            .with_context(|| format!("{} has no parent directory", path.display()))?;
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("creating {}", dir.display()))?;
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, contents)
            .await
            .with_context(|| format!("writing {}", tmp.display()))?;
        tokio::fs::rename(&tmp, path)
            .await
            .with_context(|| format!("renaming {} into place", tmp.display()))?;
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for FsStore {
    async fn latest(&self, feed: &FeedKey) -> anyhow::Result<Option<String>> {
        Self::read_if_present(&self.feed_dir(feed).join(LATEST_NAME)).await
    }

    async fn put(&self, feed: &FeedKey, name: &str, body: &str) -> anyhow::Result<()> {
        Self::write_atomic(&self.feed_dir(feed).join(name), body.as_bytes()).await
    }

    async fn put_latest(&self, feed: &FeedKey, body: &str) -> anyhow::Result<()> {
        Self::write_atomic(&self.feed_dir(feed).join(LATEST_NAME), body.as_bytes()).await
    }
}

#[async_trait]
impl StateStore for FsStore {
    async fn load(&self, feed: &FeedKey) -> anyhow::Result<Option<FeedState>> {
        let path = self.feed_dir(feed).join(STATE_NAME);
        match Self::read_if_present(&path).await? {
            Some(body) => {
                let state = serde_json::from_str(&body)
                    .with_context(|| format!("parsing {}", path.display()))?;
                Ok(Some(state))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, feed: &FeedKey, state: &FeedState) -> anyhow::Result<()> {
        let body = serde_json::to_vec_pretty(state).context("serializing feed state")?;
        Self::write_atomic(&self.feed_dir(feed).join(STATE_NAME), &body).await
    }
}

// ---------------------------------------------------------------------------
// FsRecordStore — new-only dedup records
// ---------------------------------------------------------------------------

/// One JSON file per address identity. Existence of the file is the dedup
/// check; its contents are the notification payload for audit.
#[derive(Debug, Clone)]
pub struct FsRecordStore {
    dir: PathBuf,
}

impl FsRecordStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn record_path(&self, identity: Uuid) -> PathBuf {
        self.dir.join(format!("{identity}.json"))
    }
}

#[async_trait]
impl RecordStore for FsRecordStore {
    async fn exists(&self, identity: Uuid) -> anyhow::Result<bool> {
        Ok(tokio::fs::try_exists(self.record_path(identity))
            .await
            .context("checking record existence")?)
    }

    async fn save(&self, notification: &Notification) -> anyhow::Result<()> {
        let body = serde_json::to_vec_pretty(notification).context("serializing record")?;
        FsStore::write_atomic(&self.record_path(notification.identity), &body).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
