//! Port traits the scan pipeline is assembled from
//!
//! Implementations live in menucal-vision (recognition, estimation) and
//! menucal-infra (persistence). The orchestrator only sees these traits.

use async_trait::async_trait;
use image::DynamicImage;
use uuid::Uuid;

use crate::model::{Dish, MenuScan, Restaurant};
use menucal_types::Result;

/// Turns a decoded bitmap into raw text.
///
/// Returns the recognized lines newline-joined in engine order; an image
/// with no text yields `Ok("")`, never an error. The caller decides
/// whether empty output is fatal.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, image: DynamicImage) -> Result<String>;
}

/// Turns raw menu text into a list of dish estimates via a remote call.
#[async_trait]
pub trait CalorieEstimator: Send + Sync {
    async fn estimate(&self, menu_text: &str) -> Result<Vec<Dish>>;
}

/// Repository for persisted menu scans
#[async_trait]
pub trait ScanRepository: Send + Sync {
    /// Save a scan
    async fn save(&self, scan: &MenuScan) -> Result<()>;

    /// All scans, newest first
    async fn list_all(&self) -> Result<Vec<MenuScan>>;

    /// Delete a scan by id
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Toggle the favorite flag on a saved scan
    async fn set_favorite(&self, id: Uuid, favorite: bool) -> Result<()>;

    /// Link scans that carry a restaurant name but no restaurant to an
    /// existing or newly created restaurant. Idempotent; commits in one
    /// transaction. Returns the number of scans relinked.
    async fn migrate_orphan_scans(&self) -> Result<usize>;
}

/// Repository for restaurants
#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    /// Save (insert or update) a restaurant
    async fn save(&self, restaurant: &Restaurant) -> Result<()>;

    /// All restaurants sorted by name ascending
    async fn list_all(&self) -> Result<Vec<Restaurant>>;

    /// Find by name, matching on the normalized (trimmed, casefolded) form
    async fn find_by_name(&self, name: &str) -> Result<Option<Restaurant>>;

    /// Return the existing restaurant matching `name`, or create and
    /// persist a new one carrying the trimmed name
    async fn find_or_create(&self, name: &str) -> Result<Restaurant>;

    /// Delete a restaurant and every scan it owns
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Scans owned by a restaurant, newest first
    async fn scans_for(&self, id: Uuid) -> Result<Vec<MenuScan>>;
}

/// Latest known premium entitlement, refreshed elsewhere; the pipeline
/// only reads it.
pub trait EntitlementProvider: Send + Sync {
    fn is_subscribed(&self) -> bool;
}
