use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use menucal_domain::model::{MenuScan, Restaurant};
use menucal_domain::repository::RestaurantRepository;
use menucal_store::MenuStore;
use menucal_types::Result;

/// `RestaurantRepository` over the shared menu store
pub struct StoreRestaurantRepository {
    store: Arc<MenuStore>,
}

impl StoreRestaurantRepository {
    pub fn new(store: Arc<MenuStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RestaurantRepository for StoreRestaurantRepository {
    async fn save(&self, restaurant: &Restaurant) -> Result<()> {
        self.store.upsert_restaurant(restaurant)?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Restaurant>> {
        Ok(self.store.all_restaurants())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Restaurant>> {
        Ok(self.store.find_restaurant_by_name(name))
    }

    async fn find_or_create(&self, name: &str) -> Result<Restaurant> {
        Ok(self.store.find_or_create_restaurant(name)?)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.store.remove_restaurant_cascade(id)?;
        Ok(())
    }

    async fn scans_for(&self, id: Uuid) -> Result<Vec<MenuScan>> {
        Ok(self.store.scans_for_restaurant(id))
    }
}
