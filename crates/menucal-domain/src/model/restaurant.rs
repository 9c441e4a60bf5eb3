use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::MenuScan;

/// A restaurant that owns its menu scans.
///
/// The name is stored exactly as entered; lookups normalize it first
/// (see `service::normalize_name`). Ownership of scans is expressed by
/// `MenuScan::restaurant_id` plus cascade delete in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub notes: String,
    pub date_added: DateTime<Utc>,
}

impl Restaurant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            address: String::new(),
            notes: String::new(),
            date_added: Utc::now(),
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

/// Aggregate figures for a restaurant, derived from its owned scans.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestaurantStats {
    pub scan_count: usize,
    pub total_calories: u32,
    pub last_scan_date: Option<DateTime<Utc>>,
}

impl RestaurantStats {
    pub fn from_scans(scans: &[MenuScan]) -> Self {
        Self {
            scan_count: scans.len(),
            total_calories: scans.iter().map(|s| s.total_calories()).sum(),
            last_scan_date: scans.iter().map(|s| s.date).max(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Dish;

    #[test]
    fn test_stats_from_scans() {
        let scans = vec![
            MenuScan::new("Cafe Luz", "a", vec![Dish::new("Pizza", 850)], None),
            MenuScan::new("Cafe Luz", "b", vec![Dish::new("Pasta", 620)], None),
        ];
        let stats = RestaurantStats::from_scans(&scans);
        assert_eq!(stats.scan_count, 2);
        assert_eq!(stats.total_calories, 1470);
        assert_eq!(stats.last_scan_date, Some(scans[1].date.max(scans[0].date)));
    }

    #[test]
    fn test_stats_empty() {
        let stats = RestaurantStats::from_scans(&[]);
        assert_eq!(stats.scan_count, 0);
        assert_eq!(stats.total_calories, 0);
        assert!(stats.last_scan_date.is_none());
    }
}
