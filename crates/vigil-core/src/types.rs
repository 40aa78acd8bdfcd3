//! Core types for vigil-core.
//!
//! This module defines the fundamental data structures shared across the
//! pipeline: the [`FeedAddress`] value parsed out of a feed line, the
//! [`ParsedEntry`] record, the typed [`SkipReason`] for rejected lines, and
//! the outbound [`Notification`] payload.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use ipnet::{Ipv4Net, Ipv6Net};
use serde::{Deserialize, Serialize};

use crate::config::FeedConfig;

// ---------------------------------------------------------------------------
// FeedAddress
// ---------------------------------------------------------------------------

/// A network address as published by a feed: a single host or a CIDR block,
/// IPv4 or IPv6. The four variants are mutually exclusive.
///
/// Parsing tries IPv4 CIDR, then IPv4 host, then IPv6 CIDR, then IPv6 host;
/// the first match wins. Networks are truncated to their network address on
/// parse, so [`std::fmt::Display`] yields the canonical string form used for
/// dedup keys and set membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FeedAddress {
    V4Host(Ipv4Addr),
    V4Net(Ipv4Net),
    V6Host(Ipv6Addr),
    V6Net(Ipv6Net),
}

/// Error returned when a token is not a valid host or network in any of the
/// four accepted notations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not an IPv4/IPv6 host or network: {0:?}")]
pub struct AddressParseError(pub String);

impl FromStr for FeedAddress {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(net) = s.parse::<Ipv4Net>() {
            return Ok(FeedAddress::V4Net(net.trunc()));
        }
        if let Ok(host) = s.parse::<Ipv4Addr>() {
            return Ok(FeedAddress::V4Host(host));
        }
        if let Ok(net) = s.parse::<Ipv6Net>() {
            return Ok(FeedAddress::V6Net(net.trunc()));
        }
        if let Ok(host) = s.parse::<Ipv6Addr>() {
            return Ok(FeedAddress::V6Host(host));
        }
        Err(AddressParseError(s.to_string()))
    }
}

impl std::fmt::Display for FeedAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedAddress::V4Host(host) => write!(f, "{host}"),
            FeedAddress::V4Net(net) => write!(f, "{net}"),
            FeedAddress::V6Host(host) => write!(f, "{host}"),
            FeedAddress::V6Net(net) => write!(f, "{net}"),
        }
    }
}

impl TryFrom<String> for FeedAddress {
    type Error = AddressParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FeedAddress> for String {
    fn from(value: FeedAddress) -> Self {
        value.to_string()
    }
}

// ---------------------------------------------------------------------------
// ParsedEntry / SkipReason
// ---------------------------------------------------------------------------

/// One successfully parsed feed line: the address and the observation
/// timestamp the feed attached to it (Unix seconds, interpreted as UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedEntry {
    pub address: FeedAddress,
    pub observed_at: chrono::DateTime<chrono::Utc>,
}

/// Why a feed line produced no [`ParsedEntry`].
///
/// Comments and blank lines are expected noise; the remaining variants are
/// malformed input worth a warning. One bad line never invalidates the rest
/// of the body, so these are per-line outcomes, not batch errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    #[error("blank line")]
    Blank,
    #[error("comment line")]
    Comment,
    #[error("no ` # ` timestamp delimiter")]
    MissingTimestamp,
    #[error("unparseable timestamp token: {0:?}")]
    BadTimestamp(String),
    #[error("not an IPv4/IPv6 host or network: {0:?}")]
    BadAddress(String),
}

impl SkipReason {
    /// Comments and blanks are structural, not malformed input.
    pub fn is_noise(&self) -> bool {
        matches!(self, SkipReason::Blank | SkipReason::Comment)
    }
}

// ---------------------------------------------------------------------------
// Notification
// ---------------------------------------------------------------------------

/// Outbound payload emitted once per newly observed address: the feed's
/// descriptor metadata merged with the entry's identity and seen interval.
/// Serialized to JSON for the notification queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub feed_name: String,
    pub description: String,
    pub url: String,
    pub alert_title: String,
    pub source: String,
    pub abuse_email: String,
    /// Canonical string form of the address.
    pub address: String,
    /// Stable dedup key derived from the canonical address.
    pub identity: uuid::Uuid,
    pub first_seen: chrono::DateTime<chrono::Utc>,
    pub last_seen: chrono::DateTime<chrono::Utc>,
}

impl Notification {
    pub fn new(
        feed: &FeedConfig,
        address: FeedAddress,
        first_seen: chrono::DateTime<chrono::Utc>,
        last_seen: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        Self {
            feed_name: feed.name.clone(),
            description: feed.description.clone(),
            url: feed.url.clone(),
            alert_title: feed.alert_title.clone(),
            source: feed.source.clone(),
            abuse_email: feed.abuse_email.clone(),
            address: address.to_string(),
            identity: crate::identity::identity_of(&address),
            first_seen,
            last_seen,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
