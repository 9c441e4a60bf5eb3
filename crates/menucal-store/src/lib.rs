//! Persistent stores for menucal
//!
//! Two independent stores back the pipeline: `MenuStore` holds
//! restaurants and their scans in one JSON document so cross-entity
//! mutations commit together, and `UsageStore` holds the daily
//! free-scan counters as a small key-value file.

mod menu_store;
mod usage;

pub use menu_store::MenuStore;
pub use usage::{UsageState, UsageStore};
