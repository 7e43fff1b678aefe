//! Delta capture over the live trie.
//!
//! A [`Transaction`] is a write-buffer plus an undo log: every mutation
//! is applied to the live trie immediately (so reads inside the
//! transaction see its own writes) while also being recorded into a
//! forward-delta trie (`new_values`) and, the first time a key is
//! touched, an inverse-delta trie (`old_values`).

use crate::error::CResult;
use crate::trie::Trie;

#[derive(Debug, Clone, Default)]
pub struct Transaction {
    pub messages: Vec<String>,
    pub new_values: Trie,
    pub old_values: Trie,
}

impl Transaction {
    pub fn new(message: impl Into<String>) -> Transaction {
        Transaction {
            messages: vec![message.into()],
            new_values: Trie::new(),
            old_values: Trie::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.new_values == Trie::new() && self.old_values == Trie::new()
    }

    pub fn put(&mut self, live: &mut Trie, k: &str, v: impl Into<String>) -> Option<String> {
        let v = v.into();
        let previous = live.put(k, v.clone());
        self.new_values.put(k, v);
        if let Some(previous) = &previous {
            self.old_values.put_if_absent(k, previous.clone());
        }
        previous
    }

    pub fn discard(&mut self, live: &mut Trie, k: &str) -> Option<String> {
        let previous = live.discard(k);
        self.new_values.discard(k);
        if let Some(previous) = &previous {
            self.old_values.put_if_absent(k, previous.clone());
        }
        previous
    }

    pub fn count_up_or_set(&mut self, live: &mut Trie, k: &str) -> CResult<i64> {
        let prior = live.count_up_or_set(k)?;
        let next = prior.map(|p| p + 1).unwrap_or(1);
        self.new_values.put(k, next.to_string());
        if let Some(prior) = prior {
            self.old_values.put_if_absent(k, prior.to_string());
        }
        Ok(next)
    }

    pub fn count_down_or_del(&mut self, live: &mut Trie, k: &str) -> CResult<Option<i64>> {
        let Some(prior) = live.count_down_or_del(k)? else {
            return Ok(None);
        };
        let next = prior - 1;
        if next <= 0 {
            self.new_values.discard(k);
        } else {
            self.new_values.put(k, next.to_string());
        }
        self.old_values.put_if_absent(k, prior.to_string());
        // Returns the value observed before this call, matching the
        // literal counter scenario: three calls against a counter at
        // 3 return 3, 2, 1 rather than the post-decrement values.
        Ok(Some(prior))
    }

    /// Applies this transaction's forward delta to `state`, assuming
    /// `state` currently reflects the parent (pre-transaction) content.
    pub fn redo(&self, state: &mut Trie) {
        for k in self.old_values.keys("") {
            state.discard(&k);
        }
        for (k, v) in self.new_values.items("") {
            state.put(&k, v);
        }
    }

    /// Reverses this transaction's effect on `state`.
    pub fn undo(&self, state: &mut Trie) {
        for k in self.new_values.keys("") {
            state.discard(&k);
        }
        for (k, v) in self.old_values.items("") {
            state.put(&k, v);
        }
    }

    /// Undoes this transaction against `state` and clears both deltas.
    pub fn rollback(&mut self, state: &mut Trie) {
        self.undo(state);
        self.new_values = Trie::new();
        self.old_values = Trie::new();
    }

    /// Folds this (child, now-closed) transaction's deltas into `parent`.
    pub fn merge_into(mut self, parent: &mut Transaction) {
        for (k, v) in self.new_values.items("") {
            parent.new_values.put(&k, v);
        }
        for (k, v) in self.old_values.items("") {
            parent.old_values.put_if_absent(&k, v);
        }
        parent.messages.append(&mut self.messages);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_discard_of_fresh_key_is_neutral() {
        let mut live = Trie::new();
        let mut txn = Transaction::new("t");
        txn.put(&mut live, "k", "v");
        txn.discard(&mut live, "k");
        assert_eq!(txn.new_values, Trie::new());
        assert_eq!(txn.old_values, Trie::new());
    }

    #[test]
    fn old_values_keeps_first_seen_value() {
        let mut live = Trie::new();
        live.put("k", "v0");
        let mut txn = Transaction::new("t");
        txn.put(&mut live, "k", "v1");
        txn.put(&mut live, "k", "v2");
        assert_eq!(txn.old_values.get("k"), Some("v0"));
        assert_eq!(txn.new_values.get("k"), Some("v2"));
    }

    #[test]
    fn undo_redo_identity() {
        let mut state = Trie::new();
        state.put("x", "0");
        let mut txn = Transaction::new("t");
        txn.put(&mut state, "x", "1");
        txn.put(&mut state, "y", "new");

        let after = state.clone();
        txn.undo(&mut state);
        assert_eq!(state.get("x"), Some("0"));
        assert_eq!(state.get("y"), None);

        txn.redo(&mut state);
        assert_eq!(state, after);
    }

    #[test]
    fn merge_into_preserves_child_final_write_and_parent_first_old() {
        let mut live = Trie::new();
        live.put("k", "v0");
        let mut parent = Transaction::new("parent");
        parent.put(&mut live, "k", "v1");

        let mut child = Transaction::new("child");
        child.put(&mut live, "k", "v2");
        child.merge_into(&mut parent);

        assert_eq!(parent.new_values.get("k"), Some("v2"));
        assert_eq!(parent.old_values.get("k"), Some("v0"));
        assert_eq!(parent.messages, vec!["parent".to_string(), "child".to_string()]);
    }

    #[test]
    fn rollback_clears_deltas_and_restores_state() {
        let mut state = Trie::new();
        state.put("x", "0");
        let mut txn = Transaction::new("t");
        txn.put(&mut state, "x", "1");
        txn.rollback(&mut state);
        assert_eq!(state.get("x"), Some("0"));
        assert!(txn.is_empty());
    }

    #[test]
    fn counters_capture_prior_exactly_once() {
        let mut live = Trie::new();
        let mut txn = Transaction::new("t");
        assert_eq!(txn.count_up_or_set(&mut live, "k").unwrap(), 1);
        assert_eq!(txn.count_up_or_set(&mut live, "k").unwrap(), 2);
        assert_eq!(txn.old_values.get("k"), Some("1"));
        assert_eq!(txn.new_values.get("k"), Some("2"));
    }
}
