//! Key-value storage for the daily free-scan counters
//!
//! The counters live outside the menu store on purpose: quota state must
//! survive a history wipe, and the gate must not contend with scan
//! persistence.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use menucal_types::PersistenceError;

/// Persisted usage counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageState {
    #[serde(default)]
    pub scans_used_today: u32,
    #[serde(default)]
    pub last_scan_date: Option<NaiveDate>,
}

/// File-backed store for `UsageState`
pub struct UsageStore {
    store_path: PathBuf,
}

impl UsageStore {
    /// Create or locate a usage store under `store_dir`
    pub fn open(store_dir: PathBuf) -> Result<Self, PersistenceError> {
        fs::create_dir_all(&store_dir)?;
        Ok(Self {
            store_path: store_dir.join("usage.json"),
        })
    }

    /// Load the persisted state; a missing or unreadable file counts as
    /// a fresh state.
    pub fn load(&self) -> UsageState {
        if !self.store_path.exists() {
            return UsageState::default();
        }
        File::open(&self.store_path)
            .ok()
            .and_then(|file| serde_json::from_reader(BufReader::new(file)).ok())
            .unwrap_or_default()
    }

    /// Persist the state
    pub fn save(&self, state: &UsageState) -> Result<(), PersistenceError> {
        let file = File::create(&self.store_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, state)?;
        Ok(())
    }
}
