//! Presence State Store — durable per-address presence history for a feed.
//!
//! One [`EntryState`] exists per address identity per feed, created on first
//! observation and never deleted. [`FeedState`] aggregates a feed's records
//! and is persisted as a single JSON document, saved whole at the end of a
//! cycle so an interrupted process never leaves a half-updated feed behind.
//!
//! The record invariant: `entrances.len() - exits.len()` is 0 or 1 at all
//! times, and is 1 exactly when `current` is true. Every false→true flip of
//! `current` appends an entrance (including the very first observation);
//! every true→false flip appends an exit.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity::identity_of;
use crate::types::{FeedAddress, ParsedEntry};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Presence history of one address within one feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryState {
    /// Address identity (the dedup key).
    pub key: Uuid,
    /// Canonical string form of the address.
    pub address: String,
    pub first_seen: DateTime<Utc>,
    /// Monotonically non-decreasing across updates.
    pub last_seen: DateTime<Utc>,
    /// True while the address appears in the most recent feed body.
    pub current: bool,
    /// One timestamp per false→true presence flip, oldest first.
    pub entrances: Vec<DateTime<Utc>>,
    /// One timestamp per true→false presence flip, oldest first.
    pub exits: Vec<DateTime<Utc>>,
}

impl EntryState {
    /// Whether the entrances/exits ledger is consistent with `current`.
    pub fn balanced(&self) -> bool {
        let diff = self.entrances.len() as i64 - self.exits.len() as i64;
        (diff == 0 || diff == 1) && (diff == 1) == self.current
    }
}

/// All state vigil holds for one feed, persisted as one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedState {
    pub source: String,
    pub feed_name: String,
    pub url: String,
    pub last_checked: Option<DateTime<Utc>>,
    /// Keyed by address identity; `BTreeMap` keeps the persisted document
    /// stable across saves.
    pub records: BTreeMap<Uuid, EntryState>,
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

/// An address that transitioned to present during a cycle, with the seen
/// interval its notification carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entrant {
    pub address: FeedAddress,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

/// What one reconciliation pass did.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CycleReport {
    /// Addresses that flipped to present this cycle (new or re-entered),
    /// in feed line order.
    pub entrants: Vec<Entrant>,
    /// Records that flipped to absent this cycle.
    pub exited: usize,
}

/// The seen interval for one address within one body: earliest and latest
/// observation timestamps across its (possibly repeated) lines.
#[derive(Debug, Clone, Copy)]
struct Observed {
    earliest: DateTime<Utc>,
    latest: DateTime<Utc>,
}

impl FeedState {
    pub fn new(source: &str, feed_name: &str, url: &str) -> Self {
        Self {
            source: source.to_string(),
            feed_name: feed_name.to_string(),
            url: url.to_string(),
            last_checked: None,
            records: BTreeMap::new(),
        }
    }

    /// Full-reconciliation update: exit every known record absent from
    /// `entries`, then reactivate or create a record for every address
    /// present. Returns the cycle's entrants.
    ///
    /// Idempotent per cycle: duplicate addresses within `entries` are
    /// collapsed before any record is touched, and replaying the same
    /// entries against the resulting state produces no further entrants,
    /// exits, or ledger appends.
    pub fn reconcile(&mut self, entries: &[ParsedEntry], now: DateTime<Utc>) -> CycleReport {
        let mut observed: HashMap<Uuid, Observed> = HashMap::new();
        let mut order: Vec<(Uuid, FeedAddress)> = Vec::new();
        for entry in entries {
            let key = identity_of(&entry.address);
            match observed.get_mut(&key) {
                Some(window) => {
                    window.earliest = window.earliest.min(entry.observed_at);
                    window.latest = window.latest.max(entry.observed_at);
                }
                None => {
                    observed.insert(
                        key,
                        Observed {
                            earliest: entry.observed_at,
                            latest: entry.observed_at,
                        },
                    );
                    order.push((key, entry.address));
                }
            }
        }

        let mut report = CycleReport::default();

        // Exit records that no longer appear in the feed.
        for record in self.records.values_mut() {
            if record.current && !observed.contains_key(&record.key) {
                record.current = false;
                record.exits.push(now);
                report.exited += 1;
            }
        }

        // Reactivate or create records for everything present.
        for (key, address) in order {
            let window = observed[&key];
            match self.records.get_mut(&key) {
                Some(record) => {
                    record.last_seen = record.last_seen.max(window.latest);
                    if !record.current {
                        record.current = true;
                        record.entrances.push(window.latest);
                        report.entrants.push(Entrant {
                            address,
                            first_seen: record.first_seen,
                            last_seen: record.last_seen,
                        });
                    }
                }
                None => {
                    self.records.insert(
                        key,
                        EntryState {
                            key,
                            address: address.to_string(),
                            first_seen: window.earliest,
                            last_seen: window.latest,
                            current: true,
                            entrances: vec![window.earliest],
                            exits: Vec::new(),
                        },
                    );
                    report.entrants.push(Entrant {
                        address,
                        first_seen: window.earliest,
                        last_seen: window.latest,
                    });
                }
            }
        }

        self.last_checked = Some(now);
        report
    }

    /// Whether every record satisfies the entrances/exits invariant.
    pub fn balanced(&self) -> bool {
        self.records.values().all(EntryState::balanced)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
