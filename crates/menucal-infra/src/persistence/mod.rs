//! Store-backed repository implementations
//!
//! Both repositories adapt the shared `MenuStore` to the domain traits.
//! File IO inside the store is short and synchronous; the async trait
//! surface exists so callers suspend at every persistence boundary.

mod store_restaurant_repo;
mod store_scan_repo;

pub use store_restaurant_repo::StoreRestaurantRepository;
pub use store_scan_repo::StoreScanRepository;
