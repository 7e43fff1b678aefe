//! The hierarchical key/value container at the bottom of the stack.
//!
//! A [`Trie`] maps canonicalized `/`-separated keys to string values
//! and keeps, at every node, a `count` of value-bearing descendants
//! (including itself) so that prefix aggregation (`size`) is an
//! `O(|prefix|)` lookup rather than a scan.

pub mod serial;

use std::collections::BTreeMap;

use crate::error::{CResult, Error};
use crate::key;
use serial::Serial;

#[derive(Debug, Clone, Default, PartialEq)]
struct Node {
    value: Option<String>,
    children: BTreeMap<String, Node>,
    count: usize,
}

impl Node {
    fn recount(&mut self) {
        self.count = self.value.is_some() as usize
            + self.children.values().map(|c| c.count).sum::<usize>();
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trie {
    root: Node,
}

impl Trie {
    pub fn new() -> Trie {
        Trie::default()
    }

    /// Walks to the node at `prefix` without creating anything.
    fn find(&self, segs: &[&str]) -> Option<&Node> {
        let mut node = &self.root;
        for seg in segs {
            node = node.children.get(*seg)?;
        }
        Some(node)
    }

    pub fn get(&self, k: &str) -> Option<&str> {
        let segs = key::segments(k);
        self.find(&segs)?.value.as_deref()
    }

    pub fn contains(&self, k: &str) -> bool {
        self.get(k).is_some()
    }

    /// Subtree count at `prefix`, 0 if `prefix` holds no node.
    pub fn size(&self, prefix: &str) -> usize {
        let segs = key::segments(prefix);
        self.find(&segs).map(|n| n.count).unwrap_or(0)
    }

    /// Sets `k` to `v`, returning the previous value if any.
    pub fn put(&mut self, k: &str, v: impl Into<String>) -> Option<String> {
        let segs = key::segments(k);
        let v = v.into();
        let mut path = vec![];
        let mut node = &mut self.root;
        for seg in &segs {
            node = node.children.entry(seg.to_string()).or_default();
            path.push(seg.to_string());
        }
        let previous = node.value.replace(v);
        if previous.is_none() {
            self.bump_path(&segs, 1);
        }
        previous
    }

    /// Like [`Trie::put`] but a no-op when `k` already has a value.
    pub fn put_if_absent(&mut self, k: &str, v: impl Into<String>) -> Option<String> {
        if self.contains(k) {
            return self.get(k).map(|s| s.to_string());
        }
        self.put(k, v);
        None
    }

    /// Clears the value at `k`, pruning now-empty subtrees.
    pub fn discard(&mut self, k: &str) -> Option<String> {
        let segs = key::segments(k);
        let previous = {
            let mut node = &mut self.root;
            let mut missing = false;
            for seg in &segs {
                match node.children.get_mut(*seg) {
                    Some(child) => node = child,
                    None => {
                        missing = true;
                        break;
                    }
                }
            }
            if missing {
                None
            } else {
                node.value.take()
            }
        };
        if previous.is_some() {
            self.bump_path(&segs, -1);
            self.prune(&segs);
        }
        previous
    }

    fn bump_path(&mut self, segs: &[&str], delta: i64) {
        self.root.count = (self.root.count as i64 + delta) as usize;
        let mut node = &mut self.root;
        for seg in segs {
            node = node.children.get_mut(*seg).expect("path exists");
            node.count = (node.count as i64 + delta) as usize;
        }
    }

    /// Removes empty nodes along `segs`, innermost first.
    fn prune(&mut self, segs: &[&str]) {
        fn go(node: &mut Node, segs: &[&str]) {
            if let Some((head, rest)) = segs.split_first() {
                if let Some(child) = node.children.get_mut(*head) {
                    go(child, rest);
                    if child.count == 0 {
                        node.children.remove(*head);
                    }
                }
            }
        }
        go(&mut self.root, segs);
    }

    /// Keys at and beneath `prefix` that hold a value, in child order.
    pub fn keys(&self, prefix: &str) -> Vec<String> {
        self.items(prefix).into_iter().map(|(k, _)| k).collect()
    }

    /// (key, value) pairs at and beneath `prefix`, in child order.
    pub fn items(&self, prefix: &str) -> Vec<(String, String)> {
        let segs = key::segments(prefix);
        let Some(start) = self.find(&segs) else {
            return vec![];
        };
        let mut out = vec![];
        let base = segs.join("/");
        collect(start, &base, &mut out);
        out
    }

    /// `count_up_or_set`: absent becomes `"1"`; otherwise increments the
    /// stored integer. Returns the value before this call.
    pub fn count_up_or_set(&mut self, k: &str) -> CResult<Option<i64>> {
        match self.get(k) {
            None => {
                self.put(k, "1");
                Ok(None)
            }
            Some(raw) => {
                let prior: i64 = raw
                    .parse()
                    .map_err(|_| Error::Unserializable(format!("{k} is not a counter")))?;
                self.put(k, (prior + 1).to_string());
                Ok(Some(prior))
            }
        }
    }

    /// `count_down_or_del`: decrements the stored integer, discarding
    /// the key when it reaches zero. Returns the value before this call.
    pub fn count_down_or_del(&mut self, k: &str) -> CResult<Option<i64>> {
        let Some(raw) = self.get(k) else {
            return Ok(None);
        };
        let prior: i64 = raw
            .parse()
            .map_err(|_| Error::Unserializable(format!("{k} is not a counter")))?;
        let next = prior - 1;
        if next <= 0 {
            self.discard(k);
        } else {
            self.put(k, next.to_string());
        }
        Ok(Some(prior))
    }

    pub fn to_serial(&self) -> Serial {
        node_to_serial(&self.root)
    }

    pub fn from_serial(serial: &Serial) -> Trie {
        let mut root = Node::default();
        node_from_serial(&mut root, serial);
        root.recount();
        Trie { root }
    }
}

fn collect(node: &Node, base: &str, out: &mut Vec<(String, String)>) {
    if let Some(v) = &node.value {
        out.push((base.to_string(), v.clone()));
    }
    for (seg, child) in &node.children {
        let child_key = if base.is_empty() {
            seg.clone()
        } else {
            format!("{base}/{seg}")
        };
        collect(child, &child_key, out);
    }
}

fn node_to_serial(node: &Node) -> Serial {
    let children: BTreeMap<String, Serial> = node
        .children
        .iter()
        .map(|(seg, child)| (seg.clone(), node_to_serial(child)))
        .collect();
    match (&node.value, children.is_empty()) {
        (Some(v), true) => Serial::Leaf(v.clone()),
        (Some(v), false) => Serial::Pair(v.clone(), children),
        (None, _) => Serial::Inner(children),
    }
}

fn node_from_serial(node: &mut Node, serial: &Serial) {
    match serial {
        Serial::Leaf(v) => {
            node.value = Some(v.clone());
        }
        Serial::Pair(v, children) => {
            node.value = Some(v.clone());
            for (seg, child_serial) in children {
                let child = node.children.entry(seg.clone()).or_default();
                node_from_serial(child, child_serial);
                child.recount();
            }
        }
        Serial::Inner(children) => {
            for (seg, child_serial) in children {
                let child = node.children.entry(seg.clone()).or_default();
                node_from_serial(child, child_serial);
                child.recount();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_discard() {
        let mut t = Trie::new();
        assert_eq!(t.put("a/b", "v1"), None);
        assert_eq!(t.get("a/b"), Some("v1"));
        assert_eq!(t.put("a/b", "v2"), Some("v1".to_string()));
        assert_eq!(t.discard("a/b"), Some("v2".to_string()));
        assert_eq!(t.get("a/b"), None);
        assert_eq!(t.discard("a/b"), None);
    }

    #[test]
    fn count_consistency() {
        let mut t = Trie::new();
        t.put("x", "x");
        t.put("x/y", "x/y");
        t.put("x/y/z", "x/y/z");
        t.put("y", "y");
        assert_eq!(t.size("x"), 3);
        assert_eq!(t.size(""), 4);
        assert_eq!(t.size("x/y"), 2);
        t.discard("x/y/z");
        assert_eq!(t.size("x"), 2);
    }

    #[test]
    fn empty_subtree_is_pruned() {
        let mut t = Trie::new();
        t.put("x/y/z", "v");
        t.discard("x/y/z");
        assert_eq!(t.size("x"), 0);
        assert!(t.find(&["x"]).is_none());
    }

    #[test]
    fn canonicalization_is_transparent_to_callers() {
        let mut t = Trie::new();
        t.put("x//y///w/a////b", "v");
        assert_eq!(t.get("x/y/w/a/b"), Some("v"));
    }

    #[test]
    fn round_trip_through_serial() {
        let mut t = Trie::new();
        t.put("x", "x");
        t.put("x/y", "x/y");
        t.put("y", "y");
        t.put("z/x", "z/x");
        let back = Trie::from_serial(&t.to_serial());
        assert_eq!(t, back);
    }

    #[test]
    fn empty_trie_serializes_to_empty_map() {
        assert_eq!(Trie::new().to_serial(), Serial::empty());
    }

    #[test]
    fn counters() {
        let mut t = Trie::new();
        assert_eq!(t.count_up_or_set("k").unwrap(), None);
        assert_eq!(t.count_up_or_set("k").unwrap(), Some(1));
        assert_eq!(t.count_up_or_set("k").unwrap(), Some(2));
        assert_eq!(t.get("k"), Some("3"));

        assert_eq!(t.count_down_or_del("k").unwrap(), Some(3));
        assert_eq!(t.count_down_or_del("k").unwrap(), Some(2));
        assert_eq!(t.count_down_or_del("k").unwrap(), Some(1));
        assert!(!t.contains("k"));
    }

    #[test]
    fn transaction_neutrality_is_a_trie_level_property() {
        let mut t = Trie::new();
        t.put("k", "v");
        t.discard("k");
        assert_eq!(t, Trie::new());
    }

    #[test]
    fn prefix_items_are_lexicographic() {
        let mut t = Trie::new();
        t.put("b", "b");
        t.put("a", "a");
        t.put("a/c", "ac");
        assert_eq!(
            t.items(""),
            vec![
                ("a".to_string(), "a".to_string()),
                ("a/c".to_string(), "ac".to_string()),
                ("b".to_string(), "b".to_string()),
            ]
        );
    }
}
