//! Default wiring of the scan pipeline
//!
//! Every collaborator is constructed here and handed to the service;
//! nothing reaches for ambient globals.

use std::sync::Arc;

use menucal_domain::repository::EntitlementProvider;
use menucal_infra::{StoreRestaurantRepository, StoreScanRepository};
use menucal_store::MenuStore;
use menucal_types::Result;
use menucal_vision::{GeminiEstimator, RecognizerConfig, TesseractTextRecognizer};

use crate::config::Config;
use crate::scan_service::ScanService;
use crate::usage_gate::UsageGate;

/// Build a `ScanService` over the real recognizer, estimator, and
/// stores described by `config`. Fails fast when the API key or the
/// data directory is missing.
pub fn build_scan_service(
    config: &Config,
    entitlement: Arc<dyn EntitlementProvider>,
) -> Result<ScanService> {
    let api_key = config.api_key()?;
    let store_dir = config.store_dir()?;

    let store = Arc::new(MenuStore::open(store_dir.clone())?);
    let gate = Arc::new(UsageGate::open(store_dir)?);

    let recognizer = TesseractTextRecognizer::new(
        RecognizerConfig::default()
            .with_languages(config.ocr_languages.clone())
            .with_level(config.recognition_level),
    );
    let estimator = GeminiEstimator::new(api_key).with_model(config.model.clone());

    Ok(ScanService::new(
        Arc::new(recognizer),
        Arc::new(estimator),
        Arc::new(StoreScanRepository::new(store.clone())),
        Arc::new(StoreRestaurantRepository::new(store)),
        entitlement,
        gate,
    ))
}
