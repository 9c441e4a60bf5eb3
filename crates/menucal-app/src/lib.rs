//! Application layer for menucal
//!
//! Wires recognition, estimation, persistence, and usage gating into
//! the scan workflow the UI layer drives.

pub mod bootstrap;
pub mod config;
pub mod entitlement;
pub mod scan_service;
pub mod usage_gate;

pub use bootstrap::build_scan_service;
pub use config::Config;
pub use entitlement::SharedEntitlement;
pub use scan_service::{ScanOptions, ScanPhase, ScanService, DEFAULT_RESTAURANT_NAME};
pub use usage_gate::{UsageGate, DAILY_FREE_LIMIT};
