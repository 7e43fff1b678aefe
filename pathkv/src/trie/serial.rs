use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// On-disk shape of a trie node, matching the four cases a commit file
/// encodes: a bare value, a bare child map, a (value, child map) pair,
/// or the empty-map marker (which is just an `Inner` with no children).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Serial {
    Leaf(String),
    Pair(String, BTreeMap<String, Serial>),
    Inner(BTreeMap<String, Serial>),
}

impl Serial {
    pub fn empty() -> Serial {
        Serial::Inner(BTreeMap::new())
    }
}
