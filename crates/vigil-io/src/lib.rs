//! vigil-io — concrete adapters for the vigil-core ports.
//!
//! Each adapter implements one of the outbound traits from
//! `vigil_core::ports`: HTTP feed retrieval, filesystem blob/state/record
//! storage, and notification delivery. The pipeline only ever sees the
//! traits, so everything here can be swapped for in-memory fakes in tests.

pub mod fs;
pub mod http;
pub mod notify;

pub use fs::{FsRecordStore, FsStore};
pub use http::HttpFetcher;
pub use notify::{LogNotifier, WebhookNotifier};
