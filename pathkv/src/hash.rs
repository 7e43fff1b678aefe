//! Content-hash commit identity.
//!
//! A commit id is a deterministic, order-independent digest over a
//! transaction's two delta tries. Because [`crate::trie::Trie::items`]
//! already walks children in a fixed (lexicographic) order, feeding the
//! sorted `(key, value)` pairs into a running hash is enough to make
//! two transactions with setwise-equal deltas collide on the same id,
//! independent of the order their puts/discards happened in.

use sha2::{Digest, Sha256};

use crate::trie::Trie;

pub const INITIAL_COMMIT_ID: &str = "init";

fn hash_trie(hasher: &mut Sha256, trie: &Trie) {
    for (k, v) in trie.items("") {
        hasher.update((k.len() as u64).to_le_bytes());
        hasher.update(k.as_bytes());
        hasher.update((v.len() as u64).to_le_bytes());
        hasher.update(v.as_bytes());
    }
}

/// Computes the commit id for a transaction's accumulated delta.
pub fn content_hash(new_values: &Trie, old_values: &Trie) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"new");
    hash_trie(&mut hasher, new_values);
    hasher.update(b"old");
    hash_trie(&mut hasher, old_values);
    hex::encode(hasher.finalize())
}

/// Content hash of a whole trie's materialized state, used by
/// `checkout` to verify the replayed state matches the target commit.
pub fn state_hash(trie: &Trie) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"state");
    hash_trie(&mut hasher, trie);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_net_delta_same_hash() {
        let mut new_a = Trie::new();
        new_a.put("x", "1");
        new_a.put("y", "2");
        let mut new_b = Trie::new();
        new_b.put("y", "2");
        new_b.put("x", "1");

        let old = Trie::new();
        assert_eq!(content_hash(&new_a, &old), content_hash(&new_b, &old));
    }

    #[test]
    fn different_delta_different_hash() {
        let mut a = Trie::new();
        a.put("x", "1");
        let mut b = Trie::new();
        b.put("x", "2");
        let old = Trie::new();
        assert_ne!(content_hash(&a, &old), content_hash(&b, &old));
    }
}
