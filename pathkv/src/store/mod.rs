//! Process-embedded store: live trie, commit DAG metadata, head
//! pointer, and the active transaction stack, all threaded through a
//! single [`Store`] value rather than a process-wide mutable singleton.

pub mod dag;
pub mod guard;
pub mod persistence;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub use guard::OnError;

use crate::commit::Commit;
use crate::error::{CResult, Error};
use crate::hash::{self, INITIAL_COMMIT_ID};
use crate::transaction::Transaction;
use crate::trie::Trie;

/// Library-level configuration for a [`Store`] connection.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Identifies this process's head file (`head_<device_name>`),
    /// letting a shared database directory carry one head per machine.
    pub device_name: String,
}

impl Default for StoreOptions {
    fn default() -> Self {
        StoreOptions {
            device_name: std::env::var("PATHKV_DEVICE").unwrap_or_else(|_| "default".to_string()),
        }
    }
}

/// A live connection to a database directory.
pub struct Store {
    dir: PathBuf,
    options: StoreOptions,
    live: Trie,
    head: String,
    parents: HashMap<String, Vec<String>>,
    children: HashMap<String, Vec<String>>,
    messages: HashMap<String, Vec<String>>,
    stack: Vec<Transaction>,
    _lock: persistence::LockFile,
}

impl Store {
    /// Opens (creating if necessary) the database at `dir`.
    pub fn connect(dir: impl AsRef<Path>, options: StoreOptions) -> CResult<Store> {
        Self::connect_with(dir, options, &[])
    }

    /// Like [`Store::connect`] but also notifies `observers` once the
    /// connection is established, mirroring §6's `db_connected` hook.
    pub fn connect_with(
        dir: impl AsRef<Path>,
        options: StoreOptions,
        observers: &[fn(&Path)],
    ) -> CResult<Store> {
        let dir = dir.as_ref().to_path_buf();
        persistence::ensure_dir(&dir)?;
        let lock = persistence::LockFile::acquire(&dir)?;

        let index = persistence::read_dag_index(&dir)?;
        let head = persistence::read_head(&dir, &options.device_name, INITIAL_COMMIT_ID)?;

        let mut store = Store {
            dir,
            options,
            live: Trie::new(),
            head: INITIAL_COMMIT_ID.to_string(),
            parents: index.parents,
            children: index.children,
            messages: index.messages,
            stack: Vec::new(),
            _lock: lock,
        };
        store.checkout(&head)?;

        log::info!(target: "pathkv::store", "connected to {:?}", store.dir);
        for observer in observers {
            observer(&store.dir);
        }
        Ok(store)
    }

    pub fn directory(&self) -> &Path {
        &self.dir
    }

    pub fn head(&self) -> &str {
        &self.head
    }

    pub fn dag(&self) -> (&str, &HashMap<String, Vec<String>>, &HashMap<String, Vec<String>>, &HashMap<String, Vec<String>>) {
        (&self.head, &self.parents, &self.children, &self.messages)
    }

    // -- reads: always observe `live`, which already reflects any active transactions --

    pub fn safe_get(&self, key: &str) -> Option<&str> {
        self.live.get(key)
    }

    pub fn get(&self, key: &str) -> CResult<&str> {
        self.safe_get(key)
            .ok_or_else(|| Error::KeyNotFound(key.to_string()))
    }

    pub fn has(&self, key: &str) -> bool {
        self.live.contains(key)
    }

    pub fn match_count(&self, prefix: &str) -> usize {
        self.live.size(prefix)
    }

    pub fn match_keys(&self, prefix: &str) -> Vec<String> {
        self.live.keys(prefix)
    }

    pub fn match_items(&self, prefix: &str) -> Vec<(String, String)> {
        self.live.items(prefix)
    }

    // -- writes: require a non-empty transaction stack --

    pub fn put(&mut self, key: &str, value: impl Into<String>) -> CResult<Option<String>> {
        if self.stack.is_empty() {
            return Err(Error::NoTransactionActive);
        }
        let mut live = std::mem::take(&mut self.live);
        let result = self.stack.last_mut().unwrap().put(&mut live, key, value);
        self.live = live;
        Ok(result)
    }

    pub fn discard(&mut self, key: &str) -> CResult<Option<String>> {
        if self.stack.is_empty() {
            return Err(Error::NoTransactionActive);
        }
        let mut live = std::mem::take(&mut self.live);
        let result = self.stack.last_mut().unwrap().discard(&mut live, key);
        self.live = live;
        Ok(result)
    }

    /// `discard` that fails with [`Error::KeyNotFound`] when `key` is absent.
    pub fn delete(&mut self, key: &str) -> CResult<String> {
        self.discard(key)?.ok_or_else(|| Error::KeyNotFound(key.to_string()))
    }

    pub fn count_up_or_set(&mut self, key: &str) -> CResult<i64> {
        if self.stack.is_empty() {
            return Err(Error::NoTransactionActive);
        }
        let mut live = std::mem::take(&mut self.live);
        let result = self.stack.last_mut().unwrap().count_up_or_set(&mut live, key);
        self.live = live;
        result
    }

    pub fn count_down_or_del(&mut self, key: &str) -> CResult<Option<i64>> {
        if self.stack.is_empty() {
            return Err(Error::NoTransactionActive);
        }
        let mut live = std::mem::take(&mut self.live);
        let result = self.stack.last_mut().unwrap().count_down_or_del(&mut live, key);
        self.live = live;
        result
    }

    // -- transaction scope --

    pub fn transaction<T>(
        &mut self,
        message: impl Into<String>,
        f: impl FnOnce(&mut Store) -> CResult<T>,
    ) -> CResult<T> {
        self.transaction_with(message, OnError::Propagate, f)
    }

    pub fn transaction_with<T>(
        &mut self,
        message: impl Into<String>,
        policy: OnError,
        f: impl FnOnce(&mut Store) -> CResult<T>,
    ) -> CResult<T> {
        self.stack.push(Transaction::new(message));
        match f(self) {
            Ok(value) => {
                self.close_transaction()?;
                Ok(value)
            }
            Err(err) => {
                if policy == OnError::Rollback {
                    self.rollback_current();
                }
                Err(err)
            }
        }
    }

    fn close_transaction(&mut self) -> CResult<()> {
        let txn = self.stack.pop().expect("transaction pushed by caller");
        match self.stack.last_mut() {
            Some(parent) => {
                txn.merge_into(parent);
                Ok(())
            }
            None => self.commit(txn),
        }
    }

    fn commit(&mut self, txn: Transaction) -> CResult<()> {
        if txn.is_empty() {
            return Ok(());
        }
        let id = hash::content_hash(&txn.new_values, &txn.old_values);
        if id == self.head {
            return Ok(());
        }
        if let Some(existing_parents) = self.parents.get(&id) {
            if existing_parents != &[self.head.clone()] {
                return Err(Error::NotImplemented(format!(
                    "commit {id} already exists in the DAG under a different parent"
                )));
            }
            // Identical commit already recorded under this same parent: just move head.
            self.head = id;
            persistence::write_head_atomic(&self.dir, &self.options.device_name, &self.head)?;
            return Ok(());
        }

        let commit = Commit::from_transaction(&txn, vec![self.head.clone()]);
        persistence::write_commit_file(&self.dir, &id, &commit)?;
        persistence::append_parents_log(&self.dir, &id, &commit.parents, &commit.messages)?;

        self.parents.insert(id.clone(), commit.parents.clone());
        self.children.entry(self.head.clone()).or_default().push(id.clone());
        self.messages.insert(id.clone(), commit.messages.clone());

        persistence::write_head_atomic(&self.dir, &self.options.device_name, &id)?;
        self.head = id.clone();
        log::debug!(target: "pathkv::store", "committed {id}");
        Ok(())
    }

    /// Rolls back the innermost active transaction without popping it.
    pub fn rollback_current(&mut self) {
        if let Some(txn) = self.stack.last_mut() {
            txn.rollback(&mut self.live);
        }
    }

    /// Rolls back every active transaction on the stack, innermost first.
    pub fn rollback_all(&mut self) {
        for txn in self.stack.iter_mut().rev() {
            txn.rollback(&mut self.live);
        }
    }

    // -- DAG navigation --

    fn load_commit(&self, id: &str) -> CResult<Commit> {
        persistence::read_commit_file(&self.dir, id)
    }

    pub fn checkout(&mut self, target: &str) -> CResult<()> {
        if !self.stack.is_empty() {
            return Err(Error::InTransaction);
        }
        if target != INITIAL_COMMIT_ID && !self.parents.contains_key(target) {
            return Err(Error::UnknownCommit(target.to_string()));
        }

        let target_chain = dag::ancestry_chain(&self.parents, target)?;

        let mut current = self.head.clone();
        while dag::position_in(&target_chain, &current).is_none() {
            let commit = self.load_commit(&current)?;
            commit.as_transaction().undo(&mut self.live);
            current = commit
                .parents
                .first()
                .cloned()
                .ok_or_else(|| Error::CorruptState(format!("{current} has no parent")))?;
        }

        let from = dag::position_in(&target_chain, &current).expect("current is on the chain");
        for id in &target_chain[from + 1..] {
            let commit = self.load_commit(id)?;
            commit.as_transaction().redo(&mut self.live);
        }

        self.verify_against_chain(&target_chain)?;

        self.head = target.to_string();
        persistence::write_head_atomic(&self.dir, &self.options.device_name, &self.head)?;
        log::debug!(target: "pathkv::store", "checked out {target}");
        Ok(())
    }

    /// Rebuilds state from scratch along `chain` and compares its
    /// content hash against the incrementally-updated live trie, as a
    /// corruption check on the undo/redo replay that just ran.
    fn verify_against_chain(&self, chain: &[String]) -> CResult<()> {
        let mut rebuilt = Trie::new();
        for id in chain.iter().skip(1) {
            let commit = self.load_commit(id)?;
            commit.as_transaction().redo(&mut rebuilt);
        }
        let expected = hash::state_hash(&rebuilt);
        let actual = hash::state_hash(&self.live);
        if expected != actual {
            return Err(Error::CorruptState(format!(
                "replayed state hash {actual} does not match rebuilt hash {expected}"
            )));
        }
        Ok(())
    }

    pub fn undo(&mut self) -> CResult<()> {
        let Some(parents) = self.parents.get(&self.head).cloned() else {
            return Ok(()); // at the initial commit, nothing to undo
        };
        match parents.as_slice() {
            [] => Ok(()),
            [parent] => self.checkout(parent),
            _ => Err(Error::AmbiguousUndo(self.head.clone())),
        }
    }

    pub fn redo(&mut self) -> CResult<()> {
        let Some(children) = self.children.get(&self.head).cloned() else {
            return Ok(());
        };
        match children.as_slice() {
            [] => Ok(()),
            [child] => self.checkout(child),
            _ => Err(Error::AmbiguousRedo(self.head.clone())),
        }
    }
}
