//! Pure DAG traversal helpers used by `Store::checkout`.

use std::collections::HashMap;

use crate::error::{CResult, Error};
use crate::hash::INITIAL_COMMIT_ID;

/// The ancestry chain from the initial commit to `target`, inclusive,
/// in forward (oldest-first) order. Errors if any commit on the path
/// has more than one parent (merge commits are not modeled).
pub fn ancestry_chain(
    parents: &HashMap<String, Vec<String>>,
    target: &str,
) -> CResult<Vec<String>> {
    let mut chain = vec![target.to_string()];
    let mut current = target.to_string();
    while current != INITIAL_COMMIT_ID {
        let Some(commit_parents) = parents.get(&current) else {
            return Err(Error::UnknownCommit(current));
        };
        match commit_parents.as_slice() {
            [] => break, // shouldn't happen for a non-initial commit, but don't loop forever
            [parent] => {
                current = parent.clone();
                chain.push(current.clone());
            }
            _ => {
                return Err(Error::NotImplemented(format!(
                    "commit {current} has multiple parents, traversal across merge commits"
                )))
            }
        }
    }
    chain.reverse();
    Ok(chain)
}

/// Finds `needle`'s position in `chain`, if present.
pub fn position_in(chain: &[String], needle: &str) -> Option<usize> {
    chain.iter().position(|id| id == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parents_map(pairs: &[(&str, &str)]) -> HashMap<String, Vec<String>> {
        let mut m = HashMap::new();
        for (child, parent) in pairs {
            m.insert(child.to_string(), vec![parent.to_string()]);
        }
        m
    }

    #[test]
    fn chain_from_init() {
        let parents = parents_map(&[("c1", "init"), ("c2", "c1"), ("c3", "c2")]);
        assert_eq!(
            ancestry_chain(&parents, "c3").unwrap(),
            vec!["init", "c1", "c2", "c3"]
        );
    }

    #[test]
    fn target_init_is_trivial() {
        let parents = HashMap::new();
        assert_eq!(ancestry_chain(&parents, "init").unwrap(), vec!["init"]);
    }

    #[test]
    fn unknown_commit_errors() {
        let parents = HashMap::new();
        assert!(matches!(
            ancestry_chain(&parents, "ghost"),
            Err(Error::UnknownCommit(_))
        ));
    }
}
