//! In-memory fakes for the pipeline's outbound ports.
//!
//! Each fake is a cheap-to-clone handle over shared state (the pipeline
//! gets one clone boxed as the trait object, the test keeps another for
//! setup and assertions). Failure injection mirrors the error classes the
//! orchestrator must contain: fetch errors, state-save errors, record-save
//! errors, delivery errors.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use vigil_core::ports::{FeedFetcher, FeedKey, Notifier, RecordStore, SnapshotStore, StateStore};
use vigil_core::state::FeedState;
use vigil_core::types::Notification;

// ---------------------------------------------------------------------------
// FakeFetcher
// ---------------------------------------------------------------------------

#[derive(Default)]
struct FetcherState {
    bodies: HashMap<String, String>,
    failing: HashSet<String>,
    calls: Vec<String>,
}

/// Serves canned bodies by URL. Unknown URLs answer `Ok(None)`.
#[derive(Clone, Default)]
pub struct FakeFetcher {
    inner: Arc<Mutex<FetcherState>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url` on every fetch.
    pub fn serve(&self, url: &str, body: &str) {
        let mut state = self.inner.lock().unwrap();
        state.failing.remove(url);
        state.bodies.insert(url.to_string(), body.to_string());
    }

    /// Make fetches of `url` return an error.
    pub fn fail(&self, url: &str) {
        self.inner.lock().unwrap().failing.insert(url.to_string());
    }

    /// URLs fetched so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().calls.clone()
    }
}

#[async_trait]
impl FeedFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> anyhow::Result<Option<String>> {
        let mut state = self.inner.lock().unwrap();
        state.calls.push(url.to_string());
        if state.failing.contains(url) {
            anyhow::bail!("connection refused");
        }
        Ok(state.bodies.get(url).cloned())
    }
}

// ---------------------------------------------------------------------------
// MemoryStore — snapshots + feed state
// ---------------------------------------------------------------------------

#[derive(Default)]
struct StoreState {
    snapshots: HashMap<(String, String), String>,
    latest: HashMap<String, String>,
    states: HashMap<String, FeedState>,
}

/// In-memory snapshot and state storage, keyed by the feed's storage prefix.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<StoreState>>,
    fail_state_saves: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent state save fail.
    pub fn fail_state_saves(&self) {
        self.fail_state_saves.store(true, Ordering::SeqCst);
    }

    /// Pre-seed the latest pointer (simulates a prior completed cycle).
    pub fn seed_latest(&self, feed: &FeedKey, body: &str) {
        self.inner
            .lock()
            .unwrap()
            .latest
            .insert(feed.prefix(), body.to_string());
    }

    pub fn latest_body(&self, feed: &FeedKey) -> Option<String> {
        self.inner.lock().unwrap().latest.get(&feed.prefix()).cloned()
    }

    pub fn snapshot_names(&self, feed: &FeedKey) -> Vec<String> {
        let prefix = feed.prefix();
        let state = self.inner.lock().unwrap();
        let mut names: Vec<String> = state
            .snapshots
            .keys()
            .filter(|(feed_prefix, _)| *feed_prefix == prefix)
            .map(|(_, name)| name.clone())
            .collect();
        names.sort();
        names
    }

    pub fn feed_state(&self, feed: &FeedKey) -> Option<FeedState> {
        self.inner.lock().unwrap().states.get(&feed.prefix()).cloned()
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn latest(&self, feed: &FeedKey) -> anyhow::Result<Option<String>> {
        Ok(self.latest_body(feed))
    }

    async fn put(&self, feed: &FeedKey, name: &str, body: &str) -> anyhow::Result<()> {
        self.inner
            .lock()
            .unwrap()
            .snapshots
            .insert((feed.prefix(), name.to_string()), body.to_string());
        Ok(())
    }

    async fn put_latest(&self, feed: &FeedKey, body: &str) -> anyhow::Result<()> {
        self.seed_latest(feed, body);
        Ok(())
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn load(&self, feed: &FeedKey) -> anyhow::Result<Option<FeedState>> {
        Ok(self.feed_state(feed))
    }

    async fn save(&self, feed: &FeedKey, state: &FeedState) -> anyhow::Result<()> {
        if self.fail_state_saves.load(Ordering::SeqCst) {
            anyhow::bail!("state backend unavailable");
        }
        self.inner
            .lock()
            .unwrap()
            .states
            .insert(feed.prefix(), state.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryRecords — new-only dedup store
// ---------------------------------------------------------------------------

#[derive(Default)]
struct RecordState {
    known: HashSet<Uuid>,
    saved: Vec<Notification>,
}

#[derive(Clone, Default)]
pub struct MemoryRecords {
    inner: Arc<Mutex<RecordState>>,
    fail_saves: Arc<AtomicBool>,
}

impl MemoryRecords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_saves(&self) {
        self.fail_saves.store(true, Ordering::SeqCst);
    }

    pub fn saved(&self) -> Vec<Notification> {
        self.inner.lock().unwrap().saved.clone()
    }
}

#[async_trait]
impl RecordStore for MemoryRecords {
    async fn exists(&self, identity: Uuid) -> anyhow::Result<bool> {
        Ok(self.inner.lock().unwrap().known.contains(&identity))
    }

    async fn save(&self, notification: &Notification) -> anyhow::Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            anyhow::bail!("record backend unavailable");
        }
        let mut state = self.inner.lock().unwrap();
        state.known.insert(notification.identity);
        state.saved.push(notification.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// RecordingNotifier
// ---------------------------------------------------------------------------

#[derive(Default)]
struct NotifierState {
    sent: Vec<(String, Notification)>,
}

/// Records every delivered notification with its queue name.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    inner: Arc<Mutex<NotifierState>>,
    fail: Arc<AtomicBool>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_deliveries(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<(String, Notification)> {
        self.inner.lock().unwrap().sent.clone()
    }

    /// Addresses notified so far, in delivery order.
    pub fn addresses(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .sent
            .iter()
            .map(|(_, n)| n.address.clone())
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(
        &self,
        queue_name: &str,
        payload: &Notification,
        _deduplicate: bool,
    ) -> anyhow::Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("queue unavailable");
        }
        self.inner
            .lock()
            .unwrap()
            .sent
            .push((queue_name.to_string(), payload.clone()));
        Ok(())
    }
}
