//! vigil-core — feed diffing and presence-state tracking.
//!
//! This crate holds the whole pipeline apart from real I/O: the line
//! parser, the address identity resolver, the snapshot differ, the
//! presence state store, and the ingestion orchestrator. Collaborators
//! with side effects (HTTP, blob storage, queues) sit behind the traits in
//! [`ports`]; concrete adapters live in the `vigil-io` crate.
//!
//! # Architecture
//!
//! ```text
//! Fetcher ──► Parser ──► Differ ──► State Store ──► Notifier
//!    │                                  │
//!    └── Snapshot Store ◄───────────────┘
//! ```
//!
//! One invocation runs every configured feed sequentially; nothing here is
//! long-lived or concurrent.

pub mod config;
pub mod cycle;
pub mod diff;
pub mod identity;
pub mod parser;
pub mod ports;
pub mod state;
pub mod types;

pub use config::{Config, FeedConfig, RunConfig, TrackingMode};
pub use cycle::{Collaborators, Pipeline, RunSummary};
pub use state::{EntryState, FeedState};
pub use types::{FeedAddress, Notification, ParsedEntry, SkipReason};
