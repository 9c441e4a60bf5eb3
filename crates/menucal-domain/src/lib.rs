//! Domain layer for menucal
//!
//! Entities, pure services, and the port traits the scan pipeline is
//! composed from.

pub mod model;
pub mod repository;
pub mod service;

pub use model::{Dish, MenuScan, Restaurant, RestaurantStats};
pub use repository::{
    CalorieEstimator, EntitlementProvider, RestaurantRepository, ScanRepository, TextRecognizer,
};
