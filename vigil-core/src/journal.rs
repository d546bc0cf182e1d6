//! Durable file artifacts: newline-delimited JSON journals and the
//! processed-set checkpoint.
//!
//! Journals are append-only and owned by exactly one writer process; a
//! malformed line is skipped on read, never fatal, so one bad record cannot
//! wedge a consumer.

use std::collections::BTreeSet;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;
use vigil_model::AlertId;

use crate::error::Result;

/// Append one record to a newline-delimited JSON journal, creating the file
/// on first write.
pub fn append_record<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut line = serde_json::to_string(record)?;
    line.push('\n');
    file.write_all(line.as_bytes())?;
    Ok(())
}

/// Read every well-formed record from a journal. Missing file reads as
/// empty; malformed lines are logged and skipped.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(&line) {
            Ok(record) => records.push(record),
            Err(err) => warn!(
                path = %path.display(),
                line = index + 1,
                %err,
                "skipping malformed journal line"
            ),
        }
    }
    Ok(records)
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CheckpointFile {
    processed_ids: Vec<AlertId>,
}

/// Durable set of already-processed alert ids.
///
/// This file is the action consumer's only idempotency guard across
/// restarts: an id present here is never acted on again, an id lost to a
/// crash before [`Checkpoint::persist`] is acted on again (at-least-once).
#[derive(Debug)]
pub struct Checkpoint {
    path: PathBuf,
    processed: BTreeSet<AlertId>,
}

impl Checkpoint {
    /// Load from disk; a missing or unreadable file starts the set empty.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let processed = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<CheckpointFile>(&raw) {
                Ok(file) => file.processed_ids.into_iter().collect(),
                Err(err) => {
                    warn!(path = %path.display(), %err, "corrupt checkpoint, starting empty");
                    BTreeSet::new()
                }
            },
            Err(_) => BTreeSet::new(),
        };
        Self { path, processed }
    }

    pub fn contains(&self, id: AlertId) -> bool {
        self.processed.contains(&id)
    }

    pub fn mark(&mut self, id: AlertId) {
        self.processed.insert(id);
    }

    pub fn len(&self) -> usize {
        self.processed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processed.is_empty()
    }

    /// Write the set back to disk as `{"processed_ids": [...]}` with the
    /// ids sorted.
    pub fn persist(&self) -> Result<()> {
        let file = CheckpointFile {
            processed_ids: self.processed.iter().copied().collect(),
        };
        std::fs::write(&self.path, serde_json::to_string(&file)?)?;
        Ok(())
    }
}
