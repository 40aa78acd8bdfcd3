//! Domain-specific assertion macros for vigil harnesses.
//!
//! These add context-rich failure messages that make it clear which
//! presence-tracking invariant was violated and on which record.

/// Assert that every record in a `FeedState` satisfies the entrances/exits
/// ledger invariant: `entrances.len() - exits.len()` ∈ {0,1}, equal to 1
/// exactly when `current` is true.
///
/// ```rust
/// assert_balanced!(state);
/// ```
#[macro_export]
macro_rules! assert_balanced {
    ($state:expr) => {{
        let state: &vigil_core::state::FeedState = &$state;
        for record in state.records.values() {
            let diff = record.entrances.len() as i64 - record.exits.len() as i64;
            if !(diff == 0 || diff == 1) || (diff == 1) != record.current {
                panic!(
                    "assert_balanced! failed for {:?}:\n  entrances: {}\n  exits: {}\n  current: {}",
                    record.address,
                    record.entrances.len(),
                    record.exits.len(),
                    record.current
                );
            }
        }
    }};
}

/// Assert the exact set of addresses notified so far, in delivery order.
///
/// ```rust
/// assert_notified!(harness.notifier, ["10.0.0.2"]);
/// ```
#[macro_export]
macro_rules! assert_notified {
    ($notifier:expr, [$($addr:expr),* $(,)?]) => {{
        let actual = $notifier.addresses();
        let expected: Vec<String> = vec![$($addr.to_string()),*];
        if actual != expected {
            panic!(
                "assert_notified! failed:\n  expected: {:?}\n  actual:   {:?}",
                expected, actual
            );
        }
    }};
}
