use std::fmt::{self, Display, Formatter};

/// Errors surfaced by the store, the trie, and the persistence layer.
///
/// Mirrors the reference crate's hand-rolled `Error`/`CResult` pair: no
/// `thiserror`, a manual `Display`, and `From` impls for the two
/// wrapped failure sources (`std::io::Error`, `serde_json::Error`).
#[derive(Debug)]
pub enum Error {
    /// `get`/`delete` on a key with no value.
    KeyNotFound(String),
    /// A write-oriented call was made with no transaction on the stack.
    NoTransactionActive,
    /// `checkout`/`undo`/`redo` was called while a transaction is active.
    InTransaction,
    /// `undo` found more than one parent for the current head.
    AmbiguousUndo(String),
    /// `redo` found more than one child for the current head.
    AmbiguousRedo(String),
    /// A value could not be encoded for storage.
    Unserializable(String),
    /// `checkout` named a commit absent from the DAG.
    UnknownCommit(String),
    /// The content hash after a checkout did not match the target commit.
    CorruptState(String),
    /// Multi-parent traversal (merge commits are not modeled yet).
    NotImplemented(String),
    /// A second `connect` found the directory already locked.
    Locked(String),
    /// Wrapped filesystem failure.
    Io(std::io::Error),
    /// Wrapped JSON encode/decode failure.
    Serialization(serde_json::Error),
}

pub type CResult<T> = std::result::Result<T, Error>;

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::KeyNotFound(key) => write!(f, "key not found: {key}"),
            Error::NoTransactionActive => write!(f, "no transaction active"),
            Error::InTransaction => write!(f, "a transaction is active"),
            Error::AmbiguousUndo(head) => {
                write!(f, "commit {head} has more than one parent, undo is ambiguous")
            }
            Error::AmbiguousRedo(head) => {
                write!(f, "commit {head} has more than one child, redo is ambiguous")
            }
            Error::Unserializable(detail) => write!(f, "value cannot be serialized: {detail}"),
            Error::UnknownCommit(id) => write!(f, "unknown commit: {id}"),
            Error::CorruptState(detail) => write!(f, "corrupt state after checkout: {detail}"),
            Error::NotImplemented(detail) => write!(f, "not implemented: {detail}"),
            Error::Locked(path) => write!(f, "database directory is locked: {path}"),
            Error::Io(err) => write!(f, "io error: {err}"),
            Error::Serialization(err) => write!(f, "serialization error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err)
    }
}
