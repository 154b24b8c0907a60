//! Backup snapshots and the collaborator that ships them off-device.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};
use crate::records::{Borrower, Loan, Payment};

/// full copy of the ledger, as written to backups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LedgerSnapshot {
    pub loans: Vec<Loan>,
    pub borrowers: Vec<Borrower>,
    pub payments: Vec<Payment>,
}

impl LedgerSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_empty(&self) -> bool {
        self.loans.is_empty() && self.borrowers.is_empty() && self.payments.is_empty()
    }
}

/// destination for ledger backups
///
/// Implementations either store the whole snapshot or report failure;
/// they must never leave a partially written backup behind.
pub trait SnapshotSink {
    fn sync_snapshot(&self, snapshot: &LedgerSnapshot) -> Result<()>;
}

/// writes snapshots as pretty json to a local file
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// read the last backup back
    pub fn load(&self) -> Result<LedgerSnapshot> {
        let json = fs::read_to_string(&self.path)?;
        LedgerSnapshot::from_json(&json)
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "backup".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotSink for JsonFileSink {
    fn sync_snapshot(&self, snapshot: &LedgerSnapshot) -> Result<()> {
        let json = snapshot.to_json()?;
        let staging = self.staging_path();

        // write aside, then swap in place
        fs::write(&staging, json).map_err(|e| LedgerError::SyncFailed {
            message: format!("writing {}: {}", staging.display(), e),
        })?;

        if let Err(e) = fs::rename(&staging, &self.path) {
            let _ = fs::remove_file(&staging);
            return Err(LedgerError::SyncFailed {
                message: format!("replacing {}: {}", self.path.display(), e),
            });
        }

        log::info!(
            "backup written to {} ({} loans, {} borrowers, {} payments)",
            self.path.display(),
            snapshot.loans.len(),
            snapshot.borrowers.len(),
            snapshot.payments.len()
        );
        Ok(())
    }
}
