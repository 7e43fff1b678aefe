//! Scoped transaction acquisition.
//!
//! The source's context-manager-based transaction becomes a closure:
//! `store.transaction("msg", |store| { ... })`. The closure's `Ok`
//! return commits (or merges into the parent scope); its `Err` leaves
//! the pending deltas on the stack unless `OnError::Rollback` asks the
//! guard to unwind them first, mirroring the source's
//! `rollback_on_error` flag.

/// Policy for what happens to a transaction's pending deltas when its
/// closure returns an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnError {
    /// Leave the deltas on the stack; the caller decides whether to
    /// retry, commit partial work via a nested scope, or roll back
    /// explicitly. This is the default, matching §5's durability policy.
    Propagate,
    /// Roll back the transaction's deltas before propagating the error.
    Rollback,
}

impl Default for OnError {
    fn default() -> Self {
        OnError::Propagate
    }
}
