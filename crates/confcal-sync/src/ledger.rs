//! Persisted set of event IDs already synchronized.
//!
//! The ledger enforces at-most-once delivery across runs: an ID enters the
//! set if and only if the corresponding event was confirmed committed to
//! the external service. The file is newline-delimited integers, read in
//! full at open and appended to - one line, flushed, per successful commit
//! - so a crash mid-run leaves the ledger consistent with exactly what was
//! actually committed. There is no removal operation; the ledger only
//! grows.

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::error::{SyncError, SyncResult};

/// Append-only, persisted set of processed event IDs.
///
/// A disabled ledger (no backing file) reports nothing as processed and
/// treats commits as no-ops.
#[derive(Debug)]
pub struct ProcessedLedger {
    path: Option<PathBuf>,
    ids: HashSet<u64>,
}

impl ProcessedLedger {
    /// Opens the ledger at `path`, reading all previously committed IDs.
    ///
    /// A missing file is an empty ledger, not an error.
    pub fn open(path: impl Into<PathBuf>) -> SyncResult<Self> {
        let path = path.into();
        let mut ids = HashSet::new();

        if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|source| SyncError::LedgerLoad {
                path: path.clone(),
                source,
            })?;
            for line in raw.lines() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let id: u64 = line.parse().map_err(|_| SyncError::LedgerParse {
                    path: path.clone(),
                    line: line.to_string(),
                })?;
                ids.insert(id);
            }
        }

        info!(
            "ledger at {} holds {} processed IDs",
            path.display(),
            ids.len()
        );
        Ok(Self {
            path: Some(path),
            ids,
        })
    }

    /// Creates a ledger that records nothing.
    pub fn disabled() -> Self {
        Self {
            path: None,
            ids: HashSet::new(),
        }
    }

    /// Returns true if the event was committed in this or an earlier run.
    pub fn contains(&self, id: u64) -> bool {
        self.ids.contains(&id)
    }

    /// Number of recorded IDs.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Durably records a confirmed commit.
    ///
    /// Must only be called after the external synchronization for `id` has
    /// been confirmed successful. The append is flushed before returning,
    /// making the ID visible to `contains` in this and later runs.
    pub fn commit(&mut self, id: u64) -> SyncResult<()> {
        let Some(ref path) = self.path else {
            debug!("ledger disabled; not recording {id}");
            return Ok(());
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| SyncError::LedgerStore {
                path: path.clone(),
                source,
            })?;
        writeln!(file, "{id}").and_then(|()| file.sync_data()).map_err(|source| {
            SyncError::LedgerStore {
                path: path.clone(),
                source,
            }
        })?;

        self.ids.insert(id);
        debug!("recorded {id} as processed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commits_survive_a_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed.log");

        {
            let mut ledger = ProcessedLedger::open(&path).unwrap();
            ledger.commit(12879).unwrap();
            ledger.commit(12880).unwrap();
            assert!(ledger.contains(12879));
        }

        let ledger = ProcessedLedger::open(&path).unwrap();
        assert_eq!(ledger.len(), 2);
        assert!(ledger.contains(12879));
        assert!(ledger.contains(12880));
        assert!(!ledger.contains(12881));
    }

    #[test]
    fn each_commit_is_one_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed.log");

        let mut ledger = ProcessedLedger::open(&path).unwrap();
        ledger.commit(1).unwrap();
        ledger.commit(2).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(raw, "1\n2\n");
    }

    #[test]
    fn missing_file_is_an_empty_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = ProcessedLedger::open(dir.path().join("absent.log")).unwrap();
        assert!(ledger.is_empty());
    }

    #[test]
    fn corrupt_entry_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed.log");
        fs::write(&path, "12879\nnot-a-number\n").unwrap();

        let err = ProcessedLedger::open(&path).unwrap_err();
        assert!(matches!(err, SyncError::LedgerParse { ref line, .. } if line == "not-a-number"));
    }

    #[test]
    fn disabled_ledger_records_nothing() {
        let mut ledger = ProcessedLedger::disabled();
        ledger.commit(1).unwrap();
        assert!(!ledger.contains(1));
        assert!(ledger.is_empty());
    }
}
