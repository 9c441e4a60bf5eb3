//! Infrastructure layer for menucal

pub mod persistence;

pub use persistence::{StoreRestaurantRepository, StoreScanRepository};
