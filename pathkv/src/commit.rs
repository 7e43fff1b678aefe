//! The durable, immutable unit of history: one JSON file per commit.

use serde::{Deserialize, Serialize};

use crate::hash;
use crate::transaction::Transaction;
use crate::trie::serial::Serial;
use crate::trie::Trie;

/// On-disk shape of `<commit_id>.json`, matching §6's filesystem layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    pub parents: Vec<String>,
    pub messages: Vec<String>,
    pub old: Serial,
    pub new: Serial,
}

impl Commit {
    /// Builds the commit record a closing outermost transaction writes.
    pub fn from_transaction(txn: &Transaction, parents: Vec<String>) -> Commit {
        Commit {
            parents,
            messages: txn.messages.clone(),
            old: txn.old_values.to_serial(),
            new: txn.new_values.to_serial(),
        }
    }

    /// Content hash this commit would have, independent of its parent.
    pub fn id(&self) -> String {
        hash::content_hash(&Trie::from_serial(&self.new), &Trie::from_serial(&self.old))
    }

    /// Rehydrates a [`Transaction`]-shaped delta for replay during
    /// `checkout`/`undo`/`redo`.
    pub fn as_transaction(&self) -> Transaction {
        Transaction {
            messages: self.messages.clone(),
            new_values: Trie::from_serial(&self.new),
            old_values: Trie::from_serial(&self.old),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let mut live = Trie::new();
        let mut txn = Transaction::new("t1");
        txn.put(&mut live, "x", "v");
        let commit = Commit::from_transaction(&txn, vec!["init".to_string()]);

        let json = serde_json::to_string(&commit).unwrap();
        let back: Commit = serde_json::from_str(&json).unwrap();
        assert_eq!(commit.id(), back.id());
        assert_eq!(back.messages, vec!["t1".to_string()]);
    }

    #[test]
    fn id_matches_transaction_content_hash() {
        let mut live = Trie::new();
        let mut txn = Transaction::new("t1");
        txn.put(&mut live, "x", "v");
        let commit = Commit::from_transaction(&txn, vec!["init".to_string()]);
        assert_eq!(
            commit.id(),
            hash::content_hash(&txn.new_values, &txn.old_values)
        );
    }
}
