//! Scan Service - Core Use Case for Menu Scanning
//!
//! This service orchestrates the complete scan workflow:
//! 1. Check the usage gate against the current entitlement
//! 2. Recognize text from the image (image entry point only)
//! 3. Estimate calories for every dish in the text
//! 4. Resolve the restaurant link
//! 5. Persist the scan
//! 6. Charge the quota
//! 7. Return the saved scan
//!
//! One scan per service instance at a time; steps run strictly in
//! order, and the quota is only charged after the scan is on disk.

use std::sync::{Arc, Mutex};

use image::DynamicImage;

use menucal_domain::model::{MenuScan, Restaurant};
use menucal_domain::repository::{
    CalorieEstimator, EntitlementProvider, RestaurantRepository, ScanRepository, TextRecognizer,
};
use menucal_types::{Result, ScanError};

use crate::usage_gate::UsageGate;

/// Placeholder restaurant used when the caller gives no hint at all
pub const DEFAULT_RESTAURANT_NAME: &str = "Unknown restaurant";

/// Where the workflow currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Idle,
    Scanning,
    Analyzing,
}

/// Narrow notification hook for the UI layer; fired on every phase
/// transition. The scan result itself travels through the return value.
pub type PhaseObserver = Box<dyn Fn(ScanPhase) + Send + Sync>;

/// Per-submission options
#[derive(Clone, Default)]
pub struct ScanOptions {
    /// Free-text restaurant name hint
    pub restaurant_name: String,

    /// Explicit restaurant, used verbatim when present
    pub restaurant: Option<Restaurant>,

    /// Create a restaurant from the name hint when the lookup misses.
    /// Off by default so ambiguous free text never spawns entities.
    pub create_restaurant_if_missing: bool,
}

impl ScanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_restaurant_name(mut self, name: impl Into<String>) -> Self {
        self.restaurant_name = name.into();
        self
    }

    pub fn with_restaurant(mut self, restaurant: Restaurant) -> Self {
        self.restaurant = Some(restaurant);
        self
    }

    pub fn with_create_if_missing(mut self, create: bool) -> Self {
        self.create_restaurant_if_missing = create;
        self
    }
}

/// Orchestrates one scan at a time over injected collaborators
pub struct ScanService {
    recognizer: Arc<dyn TextRecognizer>,
    estimator: Arc<dyn CalorieEstimator>,
    scans: Arc<dyn ScanRepository>,
    restaurants: Arc<dyn RestaurantRepository>,
    entitlement: Arc<dyn EntitlementProvider>,
    gate: Arc<UsageGate>,
    phase: Mutex<ScanPhase>,
    observer: Option<PhaseObserver>,
}

impl ScanService {
    pub fn new(
        recognizer: Arc<dyn TextRecognizer>,
        estimator: Arc<dyn CalorieEstimator>,
        scans: Arc<dyn ScanRepository>,
        restaurants: Arc<dyn RestaurantRepository>,
        entitlement: Arc<dyn EntitlementProvider>,
        gate: Arc<UsageGate>,
    ) -> Self {
        Self {
            recognizer,
            estimator,
            scans,
            restaurants,
            entitlement,
            gate,
            phase: Mutex::new(ScanPhase::Idle),
            observer: None,
        }
    }

    pub fn with_phase_observer(mut self, observer: PhaseObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Current workflow phase
    pub fn phase(&self) -> ScanPhase {
        *self.phase.lock().expect("scan phase lock poisoned")
    }

    /// Submit a decoded menu photo
    pub async fn submit_image(&self, image: DynamicImage, options: ScanOptions) -> Result<MenuScan> {
        self.begin()?;
        let result = self.run_image(image, options).await;
        self.enter(ScanPhase::Idle);
        result
    }

    /// Submit typed or pasted menu text
    pub async fn submit_text(&self, text: String, options: ScanOptions) -> Result<MenuScan> {
        self.begin()?;
        let result = self.run_text(text, options).await;
        self.enter(ScanPhase::Idle);
        result
    }

    async fn run_image(&self, image: DynamicImage, options: ScanOptions) -> Result<MenuScan> {
        let text = self.recognizer.recognize(image).await?;
        if text.trim().is_empty() {
            return Err(ScanError::NoTextFound);
        }
        self.enter(ScanPhase::Analyzing);
        self.analyze_and_persist(text, options).await
    }

    async fn run_text(&self, text: String, options: ScanOptions) -> Result<MenuScan> {
        if text.trim().is_empty() {
            return Err(ScanError::NoTextFound);
        }
        self.enter(ScanPhase::Analyzing);
        self.analyze_and_persist(text, options).await
    }

    /// Gate check plus single-flight claim, under one lock so two
    /// concurrent submissions cannot both pass.
    fn begin(&self) -> Result<()> {
        let mut phase = self.phase.lock().expect("scan phase lock poisoned");
        if *phase != ScanPhase::Idle {
            return Err(ScanError::ScanInProgress);
        }
        if !self.gate.can_scan(self.entitlement.is_subscribed()) {
            return Err(ScanError::QuotaExhausted);
        }
        *phase = ScanPhase::Scanning;
        drop(phase);
        self.notify(ScanPhase::Scanning);
        Ok(())
    }

    fn enter(&self, phase: ScanPhase) {
        *self.phase.lock().expect("scan phase lock poisoned") = phase;
        self.notify(phase);
    }

    fn notify(&self, phase: ScanPhase) {
        if let Some(ref observer) = self.observer {
            observer(phase);
        }
    }

    async fn analyze_and_persist(&self, text: String, options: ScanOptions) -> Result<MenuScan> {
        let dishes = self.estimator.estimate(&text).await?;
        if dishes.is_empty() {
            return Err(ScanError::NoDishesFound);
        }

        let restaurant = self.resolve_restaurant(&options).await?;
        let restaurant_name = restaurant
            .as_ref()
            .map(|r| r.name.clone())
            .unwrap_or_else(|| options.restaurant_name.trim().to_string());

        let scan = MenuScan::new(
            restaurant_name,
            text,
            dishes,
            restaurant.map(|r| r.id),
        );
        self.scans.save(&scan).await?;

        // quota is charged only once the scan is durably saved
        self.gate.record_scan()?;

        log::info!(
            "scan {} saved: {} dish(es), {} kcal",
            scan.id,
            scan.dishes.len(),
            scan.total_calories()
        );
        Ok(scan)
    }

    async fn resolve_restaurant(&self, options: &ScanOptions) -> Result<Option<Restaurant>> {
        if let Some(ref restaurant) = options.restaurant {
            return Ok(Some(restaurant.clone()));
        }

        let hint = options.restaurant_name.trim();
        if !hint.is_empty() {
            if options.create_restaurant_if_missing {
                return Ok(Some(self.restaurants.find_or_create(hint).await?));
            }
            return self.restaurants.find_by_name(hint).await;
        }

        Ok(Some(
            self.restaurants.find_or_create(DEFAULT_RESTAURANT_NAME).await?,
        ))
    }
}
