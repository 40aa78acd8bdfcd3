//! Ingestion Orchestrator — one polling run over the configured feeds.
//!
//! Feeds are processed strictly sequentially; each feed's cycle runs
//! fetch → snapshot retention → cold-start check → parse/diff → state
//! update → notify → advance the `latest` pointer. Failure is contained at
//! the granularity where it occurs: a bad line is skipped by the parser, a
//! failed fetch aborts only that feed's cycle, a failed persistence
//! suppresses only the affected notifications. Only an error escaping the
//! whole run is fatal.

use chrono::{DateTime, Utc};

use crate::config::{FeedConfig, RunConfig, TrackingMode};
use crate::diff::{diff, first_half};
use crate::parser::parse_body;
use crate::ports::{FeedFetcher, FeedKey, Notifier, RecordStore, SnapshotStore, StateStore};
use crate::state::{Entrant, FeedState};
use crate::types::Notification;

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// The pipeline's outbound collaborators, boxed so tests can substitute
/// in-memory fakes.
pub struct Collaborators {
    pub fetcher: Box<dyn FeedFetcher>,
    pub snapshots: Box<dyn SnapshotStore>,
    pub states: Box<dyn StateStore>,
    pub records: Box<dyn RecordStore>,
    pub notifier: Box<dyn Notifier>,
}

/// Drives polling cycles for a static list of feeds.
pub struct Pipeline {
    environment: String,
    queue_name: String,
    mode: TrackingMode,
    dry_run: bool,
    feeds: Vec<FeedConfig>,
    ports: Collaborators,
}

/// Counters for one whole run, logged at the end and returned to the host.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub feeds_processed: usize,
    pub feeds_disabled: usize,
    pub feeds_failed: usize,
    pub entries_parsed: usize,
    pub lines_malformed: usize,
    pub entrants: usize,
    pub notifications_sent: usize,
}

/// Counters for one feed's cycle.
#[derive(Debug, Default, Clone, Copy)]
struct FeedCycle {
    parsed: usize,
    malformed: usize,
    entrants: usize,
    notified: usize,
}

impl Pipeline {
    pub fn new(run: &RunConfig, feeds: Vec<FeedConfig>, ports: Collaborators) -> Self {
        Self {
            environment: run.environment.clone(),
            queue_name: run.queue_name(),
            mode: run.tracking_mode,
            dry_run: false,
            feeds,
            ports,
        }
    }

    /// Fetch, diff, and parse, but skip all persistence and notification.
    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Run one polling cycle over every configured feed. Per-feed failures
    /// are logged and contained; the `Err` path here is the single opaque
    /// run-level failure signal for the host.
    pub async fn run(&self) -> anyhow::Result<RunSummary> {
        let mut summary = RunSummary::default();
        for feed in &self.feeds {
            if feed.disabled {
                tracing::info!(feed = %feed.name, "feed disabled, skipping");
                summary.feeds_disabled += 1;
                continue;
            }
            match self.run_feed(feed).await {
                Ok(Some(cycle)) => {
                    summary.feeds_processed += 1;
                    summary.entries_parsed += cycle.parsed;
                    summary.lines_malformed += cycle.malformed;
                    summary.entrants += cycle.entrants;
                    summary.notifications_sent += cycle.notified;
                }
                Ok(None) => summary.feeds_failed += 1,
                Err(err) => {
                    summary.feeds_failed += 1;
                    tracing::warn!(feed = %feed.name, error = %err, "feed cycle failed");
                }
            }
        }
        tracing::info!(
            processed = summary.feeds_processed,
            disabled = summary.feeds_disabled,
            failed = summary.feeds_failed,
            parsed = summary.entries_parsed,
            entrants = summary.entrants,
            notified = summary.notifications_sent,
            "run complete"
        );
        Ok(summary)
    }

    /// One feed's cycle. `Ok(None)` means the fetch produced nothing usable
    /// and the cycle was abandoned before any state was touched.
    async fn run_feed(&self, feed: &FeedConfig) -> anyhow::Result<Option<FeedCycle>> {
        let now = Utc::now();
        let key = FeedKey::new(&self.environment, feed);

        let body = match self.ports.fetcher.fetch(&feed.url).await {
            Ok(Some(body)) if !body.trim().is_empty() => body,
            Ok(_) => {
                tracing::warn!(feed = %feed.name, url = %feed.url, "feed returned no body");
                return Ok(None);
            }
            Err(err) => {
                tracing::warn!(feed = %feed.name, url = %feed.url, error = %err, "fetch failed");
                return Ok(None);
            }
        };

        // Raw body is retained before any parsing so the input stays
        // recoverable even if the grammar changes later.
        if !self.dry_run {
            let snapshot_name = format!("{}.txt", now.format("%Y%m%d%H%M%S"));
            self.ports.snapshots.put(&key, &snapshot_name, &body).await?;
        }

        let (previous, body) = match self.ports.snapshots.latest(&key).await? {
            Some(previous) => (previous, body),
            None => {
                // Cold start: no prior snapshot. Process only the first half
                // of the body to spread the initial backfill over two polls.
                tracing::info!(feed = %feed.name, "cold start, halving feed body");
                (String::new(), first_half(&body))
            }
        };

        let cycle = match self.mode {
            TrackingMode::FullReconciliation => {
                self.reconcile_feed(feed, &key, &body, now).await?
            }
            TrackingMode::NewOnly => self.track_new_only(feed, &previous, &body).await?,
        };

        if !self.dry_run {
            self.ports.snapshots.put_latest(&key, &body).await?;
        }

        tracing::debug!(
            feed = %feed.name,
            parsed = cycle.parsed,
            malformed = cycle.malformed,
            entrants = cycle.entrants,
            notified = cycle.notified,
            "feed cycle done"
        );
        Ok(Some(cycle))
    }

    /// Full-reconciliation cycle: load the feed's whole state, reconcile
    /// against the current parse, save it atomically, then notify. A failed
    /// save suppresses every notification from this cycle; nothing is
    /// announced that was not durably recorded.
    async fn reconcile_feed(
        &self,
        feed: &FeedConfig,
        key: &FeedKey,
        body: &str,
        now: DateTime<Utc>,
    ) -> anyhow::Result<FeedCycle> {
        let parsed = parse_body(body);
        let mut cycle = FeedCycle {
            parsed: parsed.entries.len(),
            malformed: parsed.skipped.malformed,
            ..FeedCycle::default()
        };

        let mut state = match self.ports.states.load(key).await? {
            Some(state) => state,
            None => FeedState::new(&feed.source, &feed.name, &feed.url),
        };
        let report = state.reconcile(&parsed.entries, now);
        cycle.entrants = report.entrants.len();
        tracing::info!(
            feed = %feed.name,
            entrants = report.entrants.len(),
            exited = report.exited,
            "reconciled feed state"
        );

        if self.dry_run {
            return Ok(cycle);
        }
        if let Err(err) = self.ports.states.save(key, &state).await {
            tracing::warn!(
                feed = %feed.name,
                error = %err,
                "state save failed, suppressing this cycle's notifications"
            );
            return Ok(cycle);
        }
        for entrant in &report.entrants {
            if self.send(feed, entrant).await {
                cycle.notified += 1;
            }
        }
        Ok(cycle)
    }

    /// New-only cycle: diff against the previous snapshot, then create a
    /// record for every identity not already known. No existing record is
    /// ever revisited, so there is no exit history in this mode.
    async fn track_new_only(
        &self,
        feed: &FeedConfig,
        previous: &str,
        body: &str,
    ) -> anyhow::Result<FeedCycle> {
        let parsed = parse_body(body);
        let mut cycle = FeedCycle {
            parsed: parsed.entries.len(),
            malformed: parsed.skipped.malformed,
            ..FeedCycle::default()
        };

        // Seen interval per address within this body.
        let mut windows = std::collections::HashMap::new();
        for entry in &parsed.entries {
            let window = windows
                .entry(entry.address)
                .or_insert((entry.observed_at, entry.observed_at));
            window.0 = window.0.min(entry.observed_at);
            window.1 = window.1.max(entry.observed_at);
        }

        for address in diff(previous, body) {
            let identity = crate::identity::identity_of(&address);
            let (first_seen, last_seen) = windows[&address];
            let notification = Notification::new(feed, address, first_seen, last_seen);

            match self.ports.records.exists(identity).await {
                Ok(true) => continue,
                Ok(false) => {}
                Err(err) => {
                    tracing::warn!(%address, error = %err, "record lookup failed, skipping entry");
                    continue;
                }
            }
            cycle.entrants += 1;
            if self.dry_run {
                continue;
            }
            if let Err(err) = self.ports.records.save(&notification).await {
                tracing::warn!(%address, error = %err, "record save failed, suppressing notification");
                continue;
            }
            if self
                .send_notification(&notification, &feed.name, &address.to_string())
                .await
            {
                cycle.notified += 1;
            }
        }
        Ok(cycle)
    }

    async fn send(&self, feed: &FeedConfig, entrant: &Entrant) -> bool {
        let notification =
            Notification::new(feed, entrant.address, entrant.first_seen, entrant.last_seen);
        self.send_notification(&notification, &feed.name, &notification.address)
            .await
    }

    async fn send_notification(&self, notification: &Notification, feed: &str, address: &str) -> bool {
        match self
            .ports
            .notifier
            .notify(&self.queue_name, notification, false)
            .await
        {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(feed, address, error = %err, "notification delivery failed");
                false
            }
        }
    }
}
