//! On-disk layout: one file per commit, an append-only parents log, a
//! per-device head file, and an advisory lock file for the lifetime of
//! a connection — the same `fs4::try_lock_exclusive` pattern the
//! reference storage engine uses to guard its own log file.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use fs4::FileExt;
use serde::{Deserialize, Serialize};

use crate::commit::Commit;
use crate::error::{CResult, Error};

const PARENTS_LOG: &str = "commit_parents.log";
const LOCK_FILE: &str = ".lock";

fn commit_path(dir: &Path, commit_id: &str) -> PathBuf {
    dir.join(format!("{commit_id}.json"))
}

fn head_path(dir: &Path, device_name: &str) -> PathBuf {
    dir.join(format!("head_{device_name}"))
}

/// Holds the advisory exclusive lock on `.lock` for as long as it lives.
pub struct LockFile {
    _file: File,
}

impl LockFile {
    pub fn acquire(dir: &Path) -> CResult<LockFile> {
        let path = dir.join(LOCK_FILE);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&path)?;
        file.try_lock_exclusive().map_err(|_| {
            Error::Locked(path.to_string_lossy().into_owned())
        })?;
        Ok(LockFile { _file: file })
    }
}

pub fn ensure_dir(dir: &Path) -> CResult<()> {
    fs::create_dir_all(dir)?;
    Ok(())
}

pub fn write_commit_file(dir: &Path, commit_id: &str, commit: &Commit) -> CResult<()> {
    let path = commit_path(dir, commit_id);
    let json = serde_json::to_vec(commit)?;
    let mut file = File::create(&path)?;
    file.write_all(&json)?;
    file.sync_all()?;
    Ok(())
}

pub fn read_commit_file(dir: &Path, commit_id: &str) -> CResult<Commit> {
    let path = commit_path(dir, commit_id);
    let bytes = fs::read(&path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[derive(Debug, Default)]
pub struct DagIndex {
    pub parents: HashMap<String, Vec<String>>,
    pub children: HashMap<String, Vec<String>>,
    pub messages: HashMap<String, Vec<String>>,
}

#[derive(Serialize, Deserialize)]
struct ParentsLogLine(String, Vec<String>, Vec<String>);

/// Reads the whole append-only parents log and rebuilds the `children`
/// index, which is never itself persisted.
pub fn read_dag_index(dir: &Path) -> CResult<DagIndex> {
    let path = dir.join(PARENTS_LOG);
    let mut index = DagIndex::default();
    let Ok(file) = File::open(&path) else {
        return Ok(index);
    };
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let ParentsLogLine(commit_id, parents, messages) = serde_json::from_str(&line)?;
        for parent in &parents {
            index
                .children
                .entry(parent.clone())
                .or_default()
                .push(commit_id.clone());
        }
        index.parents.insert(commit_id.clone(), parents);
        index.messages.insert(commit_id, messages);
    }
    Ok(index)
}

/// Appends one line to the parents log: `[commit_id, parents, messages]`.
pub fn append_parents_log(
    dir: &Path,
    commit_id: &str,
    parents: &[String],
    messages: &[String],
) -> CResult<()> {
    let path = dir.join(PARENTS_LOG);
    let line = serde_json::to_string(&ParentsLogLine(
        commit_id.to_string(),
        parents.to_vec(),
        messages.to_vec(),
    ))?;
    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    writeln!(file, "{line}")?;
    file.sync_all()?;
    Ok(())
}

/// Reads the current head for `device_name`, defaulting to the
/// reserved initial commit id when no head file exists yet.
pub fn read_head(dir: &Path, device_name: &str, initial: &str) -> CResult<String> {
    let path = head_path(dir, device_name);
    match fs::read_to_string(&path) {
        Ok(contents) => Ok(contents.trim().to_string()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(initial.to_string()),
        Err(err) => Err(err.into()),
    }
}

/// Overwrites the head file atomically: write to a sibling temp file,
/// then rename over the destination. The rename is the commit barrier.
pub fn write_head_atomic(dir: &Path, device_name: &str, commit_id: &str) -> CResult<()> {
    let path = head_path(dir, device_name);
    let tmp_path = dir.join(format!("head_{device_name}.tmp"));
    {
        let mut tmp = File::create(&tmp_path)?;
        tmp.write_all(commit_id.as_bytes())?;
        tmp.sync_all()?;
    }
    fs::rename(&tmp_path, &path)?;
    Ok(())
}
