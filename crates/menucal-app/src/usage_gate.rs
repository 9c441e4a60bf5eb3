//! Daily free-scan quota
//!
//! The counter resets lazily: every read or mutation first compares the
//! stamped date against the current local calendar day. No timers. The
//! in-memory state only reaches disk from `record_scan`, which the
//! orchestrator calls once per durably saved scan.

use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use chrono::Local;

use menucal_store::{UsageState, UsageStore};
use menucal_types::PersistenceError;

/// Free scans per calendar day for non-entitled users
pub const DAILY_FREE_LIMIT: u32 = 1;

/// Tracks and enforces the daily free-scan quota
pub struct UsageGate {
    store: UsageStore,
    state: Mutex<UsageState>,
}

impl UsageGate {
    /// Create or load the gate state from `store_dir`
    pub fn open(store_dir: PathBuf) -> Result<Self, PersistenceError> {
        let store = UsageStore::open(store_dir)?;
        let state = store.load();
        Ok(Self {
            store,
            state: Mutex::new(state),
        })
    }

    /// Whether a scan may start. Entitled users always pass.
    pub fn can_scan(&self, is_entitled: bool) -> bool {
        if is_entitled {
            return true;
        }
        let mut state = self.state.lock().expect("usage gate lock poisoned");
        reset_if_new_day(&mut state);
        state.scans_used_today < DAILY_FREE_LIMIT
    }

    /// Free scans left today
    pub fn remaining_free_scans(&self) -> u32 {
        let mut state = self.state.lock().expect("usage gate lock poisoned");
        reset_if_new_day(&mut state);
        DAILY_FREE_LIMIT.saturating_sub(state.scans_used_today)
    }

    /// Scans consumed today
    pub fn scans_used_today(&self) -> u32 {
        let mut state = self.state.lock().expect("usage gate lock poisoned");
        reset_if_new_day(&mut state);
        state.scans_used_today
    }

    /// Charge one quota unit. Called exactly once per scan, after the
    /// scan is durably saved.
    pub fn record_scan(&self) -> Result<(), PersistenceError> {
        let mut state = self.state.lock().expect("usage gate lock poisoned");
        reset_if_new_day(&mut state);
        state.scans_used_today += 1;
        state.last_scan_date = Some(Local::now().date_naive());
        self.store.save(&state)
    }

    /// Time left until the quota resets at the next local midnight
    pub fn time_until_reset(&self) -> Duration {
        let now = Local::now();
        let next_midnight = now
            .date_naive()
            .succ_opt()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .and_then(|dt| dt.and_local_timezone(Local).earliest());

        match next_midnight {
            Some(midnight) => (midnight - now).to_std().unwrap_or_default(),
            None => Duration::ZERO,
        }
    }

    /// Human-readable time until reset, for the paywall copy
    pub fn formatted_time_until_reset(&self) -> String {
        let seconds = self.time_until_reset().as_secs();
        let hours = seconds / 3600;
        let minutes = (seconds % 3600) / 60;

        if hours > 0 {
            format!("{hours}h {minutes}m")
        } else {
            format!("{minutes}m")
        }
    }
}

fn reset_if_new_day(state: &mut UsageState) {
    let today = Local::now().date_naive();
    match state.last_scan_date {
        Some(date) if date == today => {}
        _ => state.scans_used_today = 0,
    }
}
