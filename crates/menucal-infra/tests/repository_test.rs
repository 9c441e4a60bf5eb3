//! Integration tests for the store-backed repositories

use std::sync::Arc;

use tempfile::tempdir;

use menucal_domain::model::{Dish, MenuScan, RestaurantStats};
use menucal_domain::repository::{RestaurantRepository, ScanRepository};
use menucal_infra::{StoreRestaurantRepository, StoreScanRepository};
use menucal_store::MenuStore;

fn repos(dir: &std::path::Path) -> (StoreScanRepository, StoreRestaurantRepository) {
    let store = Arc::new(MenuStore::open(dir.to_path_buf()).expect("Failed to open store"));
    (
        StoreScanRepository::new(store.clone()),
        StoreRestaurantRepository::new(store),
    )
}

fn scan(name: &str, restaurant_id: Option<uuid::Uuid>, calories: u32) -> MenuScan {
    MenuScan::new(
        name,
        format!("Dish {calories}"),
        vec![Dish::new("Dish", calories)],
        restaurant_id,
    )
}

#[tokio::test]
async fn test_scans_listed_newest_first() {
    let dir = tempdir().unwrap();
    let (scans, _) = repos(dir.path());

    let older = scan("Cafe Luz", None, 100);
    let mut newer = scan("Cafe Luz", None, 200);
    newer.date = older.date + chrono::Duration::seconds(5);

    scans.save(&older).await.unwrap();
    scans.save(&newer).await.unwrap();

    let all = scans.list_all().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, newer.id);
    assert_eq!(all[1].id, older.id);
}

#[tokio::test]
async fn test_find_or_create_no_duplicate_for_identical_after_trim() {
    let dir = tempdir().unwrap();
    let (_, restaurants) = repos(dir.path());

    let first = restaurants.find_or_create("  Cafe Luz  ").await.unwrap();
    let second = restaurants.find_or_create("cafe luz").await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(restaurants.list_all().await.unwrap().len(), 1);
    // stored name keeps the original casing, trimmed
    assert_eq!(first.name, "Cafe Luz");
}

#[tokio::test]
async fn test_find_by_name_normalizes() {
    let dir = tempdir().unwrap();
    let (_, restaurants) = repos(dir.path());

    restaurants.find_or_create("Cafe Luz").await.unwrap();

    let found = restaurants.find_by_name("  CAFE LUZ ").await.unwrap();
    assert!(found.is_some());
    assert!(restaurants.find_by_name("Cafe Sol").await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_restaurant_cascades_to_scans() {
    let dir = tempdir().unwrap();
    let (scans, restaurants) = repos(dir.path());

    let restaurant = restaurants.find_or_create("Cafe Luz").await.unwrap();
    for calories in [100, 200, 300] {
        scans
            .save(&scan("Cafe Luz", Some(restaurant.id), calories))
            .await
            .unwrap();
    }
    scans.save(&scan("Otro Sitio", None, 400)).await.unwrap();

    restaurants.delete(restaurant.id).await.unwrap();

    let remaining = scans.list_all().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].restaurant_name, "Otro Sitio");
    assert!(restaurants.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_orphan_migration_is_idempotent() {
    let dir = tempdir().unwrap();
    let (scans, restaurants) = repos(dir.path());

    scans.save(&scan("Cafe Luz", None, 100)).await.unwrap();
    scans.save(&scan(" cafe luz ", None, 200)).await.unwrap();
    scans.save(&scan("Bistro 9", None, 300)).await.unwrap();
    // no name, stays orphaned
    scans.save(&scan("", None, 400)).await.unwrap();

    let first = scans.migrate_orphan_scans().await.unwrap();
    assert_eq!(first, 3);

    let after_first = restaurants.list_all().await.unwrap();
    assert_eq!(after_first.len(), 2);

    let second = scans.migrate_orphan_scans().await.unwrap();
    assert_eq!(second, 0);
    assert_eq!(restaurants.list_all().await.unwrap(), after_first);
}

#[tokio::test]
async fn test_restaurant_stats_from_owned_scans() {
    let dir = tempdir().unwrap();
    let (scans, restaurants) = repos(dir.path());

    let restaurant = restaurants.find_or_create("Cafe Luz").await.unwrap();
    scans
        .save(&scan("Cafe Luz", Some(restaurant.id), 850))
        .await
        .unwrap();
    scans
        .save(&scan("Cafe Luz", Some(restaurant.id), 620))
        .await
        .unwrap();

    let owned = restaurants.scans_for(restaurant.id).await.unwrap();
    let stats = RestaurantStats::from_scans(&owned);
    assert_eq!(stats.scan_count, 2);
    assert_eq!(stats.total_calories, 1470);
    assert!(stats.last_scan_date.is_some());
}

#[tokio::test]
async fn test_set_favorite_persists() {
    let dir = tempdir().unwrap();
    let (scans, _) = repos(dir.path());

    let s = scan("Cafe Luz", None, 100);
    scans.save(&s).await.unwrap();
    scans.set_favorite(s.id, true).await.unwrap();

    let all = scans.list_all().await.unwrap();
    assert!(all[0].is_favorite);
}
