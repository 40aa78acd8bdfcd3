//! Feed Snapshot Differ — addresses present in the current body but absent
//! from the previous one.
//!
//! Membership is by canonical address value, not raw line text, so a feed
//! that reformats `10.1.2.3/24` as `10.1.2.0/24` between polls produces no
//! spurious "new" entries. Output follows the line order of the current
//! body. Duplicate addresses within the current body yield once: downstream
//! notification is at-least-once per *unique* new address.

use std::collections::HashSet;

use crate::parser::parse_body;
use crate::types::FeedAddress;

/// Diff two full feed bodies. Returns the addresses parseable from
/// `current` that do not appear (by canonical value) anywhere in
/// `previous`, in current-body line order, deduplicated.
pub fn diff(previous: &str, current: &str) -> Vec<FeedAddress> {
    let mut seen: HashSet<FeedAddress> = parse_body(previous)
        .entries
        .into_iter()
        .map(|entry| entry.address)
        .collect();

    parse_body(current)
        .entries
        .into_iter()
        .filter_map(|entry| seen.insert(entry.address).then_some(entry.address))
        .collect()
}

/// First `ceil(n/2)` lines of a feed body.
///
/// Applied on a feed's first-ever cycle, where there is no previous snapshot
/// to diff against: processing only half the body spreads the initial
/// backfill over two polls instead of emitting one burst of thousands of
/// notifications. Rounds up so a one-line body keeps its line.
pub fn first_half(body: &str) -> String {
    let lines: Vec<&str> = body.lines().collect();
    let keep = lines.len().div_ceil(2);
    let mut half = lines[..keep].join("\n");
    if !half.is_empty() {
        half.push('\n');
    }
    half
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
