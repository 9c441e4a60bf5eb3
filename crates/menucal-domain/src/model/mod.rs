//! Domain entities

mod dish;
mod menu_scan;
mod restaurant;

pub use dish::Dish;
pub use menu_scan::MenuScan;
pub use restaurant::{Restaurant, RestaurantStats};
