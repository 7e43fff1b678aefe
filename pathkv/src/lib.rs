//! `pathkv` is a process-embedded, versioned, transactional key-value
//! store. Keys are hierarchical `/`-separated paths; values are opaque
//! UTF-8 strings. History forms a directed acyclic graph of commits:
//! a client opens a database rooted at a directory, runs transactions
//! that mutate keys, and may move the current view backward or forward
//! across commits (`undo`, `redo`, `checkout`). [Author fengyang]
//!
//! ## Getting started
//!
//! ```rust
//! use pathkv::store::{Store, StoreOptions};
//! use pathkv::error::Error;
//!
//! fn main() {
//!     run().unwrap();
//! }
//!
//! fn run() -> Result<(), Error> {
//!     let dir = tempfile::tempdir()?;
//!     let mut db = Store::connect(dir.path(), StoreOptions::default())?;
//!
//!     db.transaction("seed", |s| {
//!         s.put("x", "x")?;
//!         s.put("x/y", "x/y")?;
//!         Ok(())
//!     })?;
//!
//!     assert_eq!(db.get("x")?, "x");
//!     assert_eq!(db.match_count("x"), 2);
//!
//!     db.undo()?;
//!     assert_eq!(db.safe_get("x"), None);
//!
//!     Ok(())
//! }
//! ```

pub mod commit;
pub mod encoding;
pub mod error;
pub mod hash;
pub mod key;
pub mod store;
pub mod transaction;
pub mod trie;
