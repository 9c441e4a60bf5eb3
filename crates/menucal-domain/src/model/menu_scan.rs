use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::Dish;

/// One scanned menu: the raw recognized text plus the estimated dishes.
///
/// Immutable after creation except for the favorite flag and the
/// restaurant link (rewritten by orphan migration). `restaurant_id` is a
/// nullable foreign key; the repository layer keeps it consistent with
/// the owning restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuScan {
    pub id: Uuid,
    pub restaurant_name: String,
    pub raw_text: String,
    pub dishes: Vec<Dish>,
    #[serde(default)]
    pub restaurant_id: Option<Uuid>,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub is_favorite: bool,
}

impl MenuScan {
    pub fn new(
        restaurant_name: impl Into<String>,
        raw_text: impl Into<String>,
        dishes: Vec<Dish>,
        restaurant_id: Option<Uuid>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            restaurant_name: restaurant_name.into(),
            raw_text: raw_text.into(),
            dishes,
            restaurant_id,
            date: Utc::now(),
            is_favorite: false,
        }
    }

    /// Sum of the estimated calories of every dish on the scan.
    pub fn total_calories(&self) -> u32 {
        self.dishes.iter().map(|d| d.estimated_calories).sum()
    }
}
