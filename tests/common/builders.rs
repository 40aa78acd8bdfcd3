//! Test builders — feed descriptors and a wired-up pipeline harness.
//!
//! These are for readability in test assertions, not for production use.
//! They panic on invalid input rather than returning `Result`.

use vigil_core::config::{FeedConfig, RunConfig, TrackingMode};
use vigil_core::cycle::{Collaborators, Pipeline, RunSummary};
use vigil_core::ports::FeedKey;

use super::fakes::{FakeFetcher, MemoryRecords, MemoryStore, RecordingNotifier};

/// Build a feed descriptor with sensible test defaults.
pub fn feed(name: &str, url: &str) -> FeedConfig {
    FeedConfig {
        name: name.to_string(),
        description: format!("test feed {name}"),
        url: url.to_string(),
        alert_title: "Suspicious activity".to_string(),
        source: "feeds.example.org".to_string(),
        abuse_email: "abuse@example.org".to_string(),
        disabled: false,
    }
}

/// `feed`, but flagged disabled.
pub fn disabled_feed(name: &str, url: &str) -> FeedConfig {
    FeedConfig {
        disabled: true,
        ..feed(name, url)
    }
}

/// A pipeline wired to shared-handle fakes. Configure, call [`Harness::run`],
/// then assert against the fake handles.
pub struct Harness {
    pub fetcher: FakeFetcher,
    pub store: MemoryStore,
    pub records: MemoryRecords,
    pub notifier: RecordingNotifier,
    run: RunConfig,
    feeds: Vec<FeedConfig>,
    dry_run: bool,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            fetcher: FakeFetcher::new(),
            store: MemoryStore::new(),
            records: MemoryRecords::new(),
            notifier: RecordingNotifier::new(),
            run: RunConfig {
                environment: "test".to_string(),
                ..RunConfig::default()
            },
            feeds: Vec::new(),
            dry_run: false,
        }
    }

    pub fn with_feed(mut self, feed: FeedConfig) -> Self {
        self.feeds.push(feed);
        self
    }

    pub fn with_mode(mut self, mode: TrackingMode) -> Self {
        self.run.tracking_mode = mode;
        self
    }

    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Storage key the pipeline will use for `feed`.
    pub fn key(&self, feed: &FeedConfig) -> FeedKey {
        FeedKey::new(&self.run.environment, feed)
    }

    /// Expected queue name for delivered notifications.
    pub fn queue_name(&self) -> String {
        self.run.queue_name()
    }

    fn pipeline(&self) -> Pipeline {
        let ports = Collaborators {
            fetcher: Box::new(self.fetcher.clone()),
            snapshots: Box::new(self.store.clone()),
            states: Box::new(self.store.clone()),
            records: Box::new(self.records.clone()),
            notifier: Box::new(self.notifier.clone()),
        };
        let pipeline = Pipeline::new(&self.run, self.feeds.clone(), ports);
        if self.dry_run {
            pipeline.dry_run()
        } else {
            pipeline
        }
    }

    /// Run one polling cycle; panics on run-level failure.
    pub async fn run(&self) -> RunSummary {
        self.pipeline().run().await.expect("run-level failure")
    }
}
