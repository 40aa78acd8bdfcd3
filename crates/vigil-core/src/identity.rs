//! Address Identity Resolver — stable dedup keys for feed addresses.
//!
//! Identities are UUIDv5 values derived from a fixed namespace and the
//! canonical string form of the address. Two parses of the same literal
//! address, in any process, at any time, resolve to the same identity; this
//! is what lets the record stores deduplicate across restarts.

use uuid::Uuid;

use crate::types::FeedAddress;

/// Namespace under which all address identities are minted. Changing this
/// constant orphans every persisted record, so it never changes.
const ADDRESS_NAMESPACE: Uuid = Uuid::from_u128(0x8f4e_1c0a_569d_4aa7_93f1_b2d6_40c5_77e2);

/// Derive the identity for an address. Pure and deterministic.
pub fn identity_of(address: &FeedAddress) -> Uuid {
    Uuid::new_v5(&ADDRESS_NAMESPACE, address.to_string().as_bytes())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
