//! Persistent store for restaurants and menu scans
//!
//! One JSON document holds both entity maps so a mutation touching
//! restaurants and scans commits as a unit. Every write goes through
//! `transaction`, which serializes a draft to a sibling temp file and
//! renames it over the live file before the in-memory state is swapped;
//! a failed write leaves both disk and memory untouched.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use menucal_domain::model::{MenuScan, Restaurant};
use menucal_domain::service::normalize_name;
use menucal_types::PersistenceError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct MenuData {
    restaurants: HashMap<Uuid, Restaurant>,
    scans: HashMap<Uuid, MenuScan>,
}

/// File-backed store for the two linked entity types
pub struct MenuStore {
    store_path: PathBuf,
    data: Mutex<MenuData>,
}

impl MenuStore {
    /// Create or load a store under `store_dir`
    pub fn open(store_dir: PathBuf) -> Result<Self, PersistenceError> {
        fs::create_dir_all(&store_dir)?;
        let store_path = store_dir.join("menucal.json");

        let data = if store_path.exists() {
            let file = File::open(&store_path)?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader).unwrap_or_default()
        } else {
            MenuData::default()
        };

        Ok(Self {
            store_path,
            data: Mutex::new(data),
        })
    }

    /// Write a full snapshot to disk, temp file + rename
    fn persist(data: &MenuData, path: &Path) -> Result<(), PersistenceError> {
        let tmp = path.with_extension("json.tmp");
        {
            let file = File::create(&tmp)?;
            let writer = BufWriter::new(file);
            serde_json::to_writer_pretty(writer, data)?;
        }
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Run a mutation against a draft copy; the draft becomes visible
    /// only after it is durably on disk.
    fn transaction<T>(
        &self,
        f: impl FnOnce(&mut MenuData) -> Result<T, PersistenceError>,
    ) -> Result<T, PersistenceError> {
        let mut guard = self.data.lock().expect("menu store lock poisoned");
        let mut draft = guard.clone();
        let out = f(&mut draft)?;
        Self::persist(&draft, &self.store_path)?;
        *guard = draft;
        Ok(out)
    }

    fn read<T>(&self, f: impl FnOnce(&MenuData) -> T) -> T {
        let guard = self.data.lock().expect("menu store lock poisoned");
        f(&guard)
    }

    // --- scans ---

    /// Insert or update a scan
    pub fn upsert_scan(&self, scan: &MenuScan) -> Result<(), PersistenceError> {
        self.transaction(|data| {
            data.scans.insert(scan.id, scan.clone());
            Ok(())
        })
    }

    /// All scans, newest first
    pub fn all_scans(&self) -> Vec<MenuScan> {
        self.read(|data| {
            let mut scans: Vec<_> = data.scans.values().cloned().collect();
            scans.sort_by(|a, b| b.date.cmp(&a.date));
            scans
        })
    }

    /// Remove a scan; removing an unknown id is a no-op
    pub fn remove_scan(&self, id: Uuid) -> Result<bool, PersistenceError> {
        self.transaction(|data| Ok(data.scans.remove(&id).is_some()))
    }

    /// Set the favorite flag on a saved scan
    pub fn set_scan_favorite(&self, id: Uuid, favorite: bool) -> Result<(), PersistenceError> {
        self.transaction(|data| {
            let scan = data
                .scans
                .get_mut(&id)
                .ok_or_else(|| PersistenceError::NotFound(format!("scan {}", id)))?;
            scan.is_favorite = favorite;
            Ok(())
        })
    }

    // --- restaurants ---

    /// Insert or update a restaurant
    pub fn upsert_restaurant(&self, restaurant: &Restaurant) -> Result<(), PersistenceError> {
        self.transaction(|data| {
            data.restaurants.insert(restaurant.id, restaurant.clone());
            Ok(())
        })
    }

    /// All restaurants sorted by name ascending
    pub fn all_restaurants(&self) -> Vec<Restaurant> {
        self.read(|data| {
            let mut restaurants: Vec<_> = data.restaurants.values().cloned().collect();
            restaurants.sort_by(|a, b| {
                normalize_name(&a.name)
                    .cmp(&normalize_name(&b.name))
                    .then_with(|| a.name.cmp(&b.name))
            });
            restaurants
        })
    }

    /// Find a restaurant by normalized name
    pub fn find_restaurant_by_name(&self, name: &str) -> Option<Restaurant> {
        let key = normalize_name(name);
        if key.is_empty() {
            return None;
        }
        self.read(|data| {
            data.restaurants
                .values()
                .find(|r| normalize_name(&r.name) == key)
                .cloned()
        })
    }

    /// Return the restaurant matching `name`, creating and persisting a
    /// new one (carrying the trimmed name) when there is no match.
    pub fn find_or_create_restaurant(&self, name: &str) -> Result<Restaurant, PersistenceError> {
        let key = normalize_name(name);
        let trimmed = name.trim().to_string();
        self.transaction(|data| {
            if let Some(existing) = data
                .restaurants
                .values()
                .find(|r| normalize_name(&r.name) == key)
            {
                return Ok(existing.clone());
            }
            let restaurant = Restaurant::new(trimmed.clone());
            data.restaurants.insert(restaurant.id, restaurant.clone());
            Ok(restaurant)
        })
    }

    /// Remove a restaurant together with every scan it owns.
    /// Returns the number of scans removed.
    pub fn remove_restaurant_cascade(&self, id: Uuid) -> Result<usize, PersistenceError> {
        self.transaction(|data| {
            data.restaurants.remove(&id);
            let owned: Vec<Uuid> = data
                .scans
                .values()
                .filter(|s| s.restaurant_id == Some(id))
                .map(|s| s.id)
                .collect();
            for scan_id in &owned {
                data.scans.remove(scan_id);
            }
            Ok(owned.len())
        })
    }

    /// Scans owned by a restaurant, newest first
    pub fn scans_for_restaurant(&self, id: Uuid) -> Vec<MenuScan> {
        self.read(|data| {
            let mut scans: Vec<_> = data
                .scans
                .values()
                .filter(|s| s.restaurant_id == Some(id))
                .cloned()
                .collect();
            scans.sort_by(|a, b| b.date.cmp(&a.date));
            scans
        })
    }

    // --- reconciliation ---

    /// Attach every scan that has a restaurant name but no restaurant
    /// link to an existing or newly created restaurant. Groups orphans
    /// by normalized name; the whole pass commits in one transaction.
    /// Running it again finds nothing to do.
    pub fn migrate_orphan_scans(&self) -> Result<usize, PersistenceError> {
        let relinked = self.transaction(|data| {
            let orphans: Vec<Uuid> = data
                .scans
                .values()
                .filter(|s| s.restaurant_id.is_none() && !s.restaurant_name.trim().is_empty())
                .map(|s| s.id)
                .collect();

            let mut groups: HashMap<String, Vec<Uuid>> = HashMap::new();
            for scan_id in orphans {
                let key = normalize_name(&data.scans[&scan_id].restaurant_name);
                groups.entry(key).or_default().push(scan_id);
            }

            let mut relinked = 0;
            for (key, scan_ids) in groups {
                let existing = data
                    .restaurants
                    .values()
                    .find(|r| normalize_name(&r.name) == key)
                    .map(|r| r.id);

                let restaurant_id = match existing {
                    Some(id) => id,
                    None => {
                        let name = data.scans[&scan_ids[0]].restaurant_name.trim().to_string();
                        let restaurant = Restaurant::new(name);
                        let id = restaurant.id;
                        data.restaurants.insert(id, restaurant);
                        id
                    }
                };

                for scan_id in scan_ids {
                    if let Some(scan) = data.scans.get_mut(&scan_id) {
                        scan.restaurant_id = Some(restaurant_id);
                        relinked += 1;
                    }
                }
            }
            Ok(relinked)
        })?;

        if relinked > 0 {
            log::info!("orphan migration relinked {} scan(s)", relinked);
        }
        Ok(relinked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use menucal_domain::model::Dish;
    use tempfile::tempdir;

    fn scan(name: &str, restaurant_id: Option<Uuid>) -> MenuScan {
        MenuScan::new(name, "Pizza 850", vec![Dish::new("Pizza", 850)], restaurant_id)
    }

    #[test]
    fn test_scan_roundtrip_and_reopen() {
        let dir = tempdir().unwrap();
        let store = MenuStore::open(dir.path().to_path_buf()).unwrap();
        let s = scan("Cafe Luz", None);
        store.upsert_scan(&s).unwrap();

        drop(store);
        let reopened = MenuStore::open(dir.path().to_path_buf()).unwrap();
        let scans = reopened.all_scans();
        assert_eq!(scans.len(), 1);
        assert_eq!(scans[0].id, s.id);
        assert_eq!(scans[0].restaurant_name, "Cafe Luz");
    }

    #[test]
    fn test_failed_transaction_leaves_state_untouched() {
        let dir = tempdir().unwrap();
        let store = MenuStore::open(dir.path().to_path_buf()).unwrap();
        store.upsert_scan(&scan("Cafe Luz", None)).unwrap();

        let result: Result<(), PersistenceError> = store.transaction(|data| {
            data.scans.clear();
            Err(PersistenceError::NotFound("boom".into()))
        });
        assert!(result.is_err());
        assert_eq!(store.all_scans().len(), 1);

        let reopened = MenuStore::open(dir.path().to_path_buf()).unwrap();
        assert_eq!(reopened.all_scans().len(), 1);
    }

    #[test]
    fn test_find_or_create_matches_after_trim_and_case() {
        let dir = tempdir().unwrap();
        let store = MenuStore::open(dir.path().to_path_buf()).unwrap();

        let first = store.find_or_create_restaurant("  Cafe Luz  ").unwrap();
        assert_eq!(first.name, "Cafe Luz");

        let second = store.find_or_create_restaurant("cafe luz").unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(store.all_restaurants().len(), 1);
    }

    #[test]
    fn test_cascade_delete_removes_owned_scans() {
        let dir = tempdir().unwrap();
        let store = MenuStore::open(dir.path().to_path_buf()).unwrap();

        let restaurant = store.find_or_create_restaurant("Cafe Luz").unwrap();
        for _ in 0..3 {
            store
                .upsert_scan(&scan("Cafe Luz", Some(restaurant.id)))
                .unwrap();
        }
        store.upsert_scan(&scan("Otro Sitio", None)).unwrap();

        let removed = store.remove_restaurant_cascade(restaurant.id).unwrap();
        assert_eq!(removed, 3);
        assert_eq!(store.all_scans().len(), 1);
        assert!(store.all_restaurants().is_empty());
    }

    #[test]
    fn test_migrate_orphans_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = MenuStore::open(dir.path().to_path_buf()).unwrap();

        store.upsert_scan(&scan("Cafe Luz", None)).unwrap();
        store.upsert_scan(&scan("  cafe luz ", None)).unwrap();
        store.upsert_scan(&scan("", None)).unwrap();

        let first = store.migrate_orphan_scans().unwrap();
        assert_eq!(first, 2);
        assert_eq!(store.all_restaurants().len(), 1);

        let second = store.migrate_orphan_scans().unwrap();
        assert_eq!(second, 0);
        assert_eq!(store.all_restaurants().len(), 1);

        let restaurant = store.find_restaurant_by_name("cafe luz").unwrap();
        assert_eq!(store.scans_for_restaurant(restaurant.id).len(), 2);
    }

    #[test]
    fn test_migrate_orphans_attaches_to_existing_restaurant() {
        let dir = tempdir().unwrap();
        let store = MenuStore::open(dir.path().to_path_buf()).unwrap();

        let existing = store.find_or_create_restaurant("Cafe Luz").unwrap();
        store.upsert_scan(&scan("CAFE LUZ", None)).unwrap();

        store.migrate_orphan_scans().unwrap();
        assert_eq!(store.all_restaurants().len(), 1);
        assert_eq!(store.scans_for_restaurant(existing.id).len(), 1);
    }

    #[test]
    fn test_restaurants_sorted_by_name() {
        let dir = tempdir().unwrap();
        let store = MenuStore::open(dir.path().to_path_buf()).unwrap();
        store.find_or_create_restaurant("Zum Adler").unwrap();
        store.find_or_create_restaurant("aurora").unwrap();
        store.find_or_create_restaurant("Bistro 9").unwrap();

        let names: Vec<_> = store
            .all_restaurants()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["aurora", "Bistro 9", "Zum Adler"]);
    }

    #[test]
    fn test_set_favorite() {
        let dir = tempdir().unwrap();
        let store = MenuStore::open(dir.path().to_path_buf()).unwrap();
        let s = scan("Cafe Luz", None);
        store.upsert_scan(&s).unwrap();

        store.set_scan_favorite(s.id, true).unwrap();
        assert!(store.all_scans()[0].is_favorite);

        let missing = store.set_scan_favorite(Uuid::new_v4(), true);
        assert!(missing.is_err());
    }
}
