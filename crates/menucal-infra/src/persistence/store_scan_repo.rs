use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use menucal_domain::model::MenuScan;
use menucal_domain::repository::ScanRepository;
use menucal_store::MenuStore;
use menucal_types::Result;

/// `ScanRepository` over the shared menu store
pub struct StoreScanRepository {
    store: Arc<MenuStore>,
}

impl StoreScanRepository {
    pub fn new(store: Arc<MenuStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ScanRepository for StoreScanRepository {
    async fn save(&self, scan: &MenuScan) -> Result<()> {
        self.store.upsert_scan(scan)?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<MenuScan>> {
        Ok(self.store.all_scans())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.store.remove_scan(id)?;
        Ok(())
    }

    async fn set_favorite(&self, id: Uuid, favorite: bool) -> Result<()> {
        self.store.set_scan_favorite(id, favorite)?;
        Ok(())
    }

    async fn migrate_orphan_scans(&self) -> Result<usize> {
        Ok(self.store.migrate_orphan_scans()?)
    }
}
