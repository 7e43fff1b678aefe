//! `pathkv-cli` drives a [`pathkv`] database from the command line. [Author fengyang]
//!
//! ## Getting started
//!
//! ```doc
//! ❯ pathkv --dir ./db
//!
//! ██  ██  █        █
//! ██ ██   ██      ██
//! ███      ██    ██
//! ██ ██     ██  ██
//! ██  ██     ████  pathkv CLI
//!
//! Welcome to pathkv.
//!
//! pathkv > put order/status open
//! OK
//!
//! pathkv > get order/status
//! open
//!
//! pathkv > match_count order
//! 1
//!
//! pathkv > undo
//! OK
//!
//! pathkv > get order/status
//! error: key not found: order/status
//! ```

pub mod ast;
pub mod command;
pub mod config;
pub mod rusty;
pub mod session;
pub mod trace;
