//! One-shot subcommands. The REPL parses the same verbs from tokenized
//! input lines (see [`crate::session`]); this module is the shared
//! dispatch target for both surfaces.

use anyhow::{anyhow, Result};
use colored::Colorize;
use pathkv::encoding::{Base64Codec, DataCodec, EncodingFormat, HexCodec, JsonCodec};
use pathkv::store::Store;

use clap::Subcommand;

/// The various kinds of commands `pathkv` can execute against a store.
#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Fetch a key's value, failing if absent.
    Get { key: String },
    /// Fetch a key's value, printing nothing if absent.
    SafeGet { key: String },
    /// Check whether a key currently has a value.
    Has { key: String },
    /// Set a key's value.
    Put { key: String, value: String },
    /// Remove a key's value, if present.
    Discard { key: String },
    /// Remove a key's value, failing if absent.
    Delete { key: String },
    /// Increment a counter key (creating it at 1 if absent).
    CountUp { key: String },
    /// Decrement a counter key, deleting it at zero.
    CountDown { key: String },
    /// Count keys under a prefix (the prefix itself counts as a key).
    MatchCount { prefix: String },
    /// List keys under a prefix.
    MatchKeys { prefix: String },
    /// List key/value pairs under a prefix.
    MatchItems { prefix: String },
    /// Move the head to `commit`, replaying the DAG.
    Checkout { commit: String },
    /// Move the head to its parent commit.
    Undo,
    /// Move the head to its child commit.
    Redo,
    /// Print the head commit id and its ancestry.
    Log,
    /// Encode a key's current value into `format` (base64, hex, json).
    Encode { key: String, format: String },
    /// Decode a key's current value from `format`, writing the raw bytes back.
    Decode { key: String, format: String },
}

fn codec_for(format: &str) -> Result<Box<dyn DataCodec>> {
    match format.parse::<EncodingFormat>().map_err(|e| anyhow!(e.to_string()))? {
        EncodingFormat::Base64 => Ok(Box::new(Base64Codec::new())),
        EncodingFormat::Hex => Ok(Box::new(HexCodec::new())),
        EncodingFormat::Json => Ok(Box::new(JsonCodec::new())),
    }
}

/// Executes `command` against `store`, returning the text to print.
///
/// Mutating commands each run in their own single-statement
/// transaction: pathkv's REPL grammar has no multi-statement
/// transaction syntax, so every verb that writes commits immediately.
pub fn run(store: &mut Store, command: Command) -> Result<String> {
    match command {
        Command::Get { key } => Ok(store.get(&key)?.to_string()),
        Command::SafeGet { key } => Ok(store.safe_get(&key).unwrap_or("").to_string()),
        Command::Has { key } => Ok(store.has(&key).to_string()),
        Command::Put { key, value } => {
            store.transaction(format!("put {key}"), |s| s.put(&key, value.clone()))?;
            Ok("OK".green().to_string())
        }
        Command::Discard { key } => {
            let removed = store.transaction(format!("discard {key}"), |s| s.discard(&key))?;
            Ok(match removed {
                Some(v) => v,
                None => String::new(),
            })
        }
        Command::Delete { key } => {
            let removed = store.transaction(format!("delete {key}"), |s| s.delete(&key))?;
            Ok(removed)
        }
        Command::CountUp { key } => {
            let value = store.transaction(format!("count_up {key}"), |s| s.count_up_or_set(&key))?;
            Ok(value.to_string())
        }
        Command::CountDown { key } => {
            let value = store.transaction(format!("count_down {key}"), |s| s.count_down_or_del(&key))?;
            Ok(value.map(|v| v.to_string()).unwrap_or_default())
        }
        Command::MatchCount { prefix } => Ok(store.match_count(&prefix).to_string()),
        Command::MatchKeys { prefix } => Ok(store.match_keys(&prefix).join("\n")),
        Command::MatchItems { prefix } => Ok(store
            .match_items(&prefix)
            .into_iter()
            .map(|(k, v)| format!("{k} = {v}"))
            .collect::<Vec<_>>()
            .join("\n")),
        Command::Checkout { commit } => {
            store.checkout(&commit)?;
            Ok(format!("HEAD is now at {}", store.head()))
        }
        Command::Undo => {
            store.undo()?;
            Ok(format!("HEAD is now at {}", store.head()))
        }
        Command::Redo => {
            store.redo()?;
            Ok(format!("HEAD is now at {}", store.head()))
        }
        Command::Log => {
            let (head, parents, _children, messages) = store.dag();
            let mut lines = Vec::new();
            let mut current = head.to_string();
            loop {
                let msgs = messages.get(&current).cloned().unwrap_or_default();
                lines.push(format!("{} {}", current.yellow(), msgs.join("; ")));
                match parents.get(&current) {
                    Some(p) if p.len() == 1 => current = p[0].clone(),
                    _ => break,
                }
            }
            Ok(lines.join("\n"))
        }
        Command::Encode { key, format } => {
            let value = store.get(&key)?;
            let codec = codec_for(&format)?;
            codec.encode(value.as_bytes()).map_err(|e| anyhow!(e.to_string()))
        }
        Command::Decode { key, format } => {
            let value = store.get(&key)?.to_string();
            let codec = codec_for(&format)?;
            let raw = codec.decode(&value).map_err(|e| anyhow!(e.to_string()))?;
            Ok(String::from_utf8_lossy(&raw).to_string())
        }
    }
}
