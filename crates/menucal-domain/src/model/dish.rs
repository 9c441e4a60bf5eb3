use menucal_types::Confidence;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single dish with its calorie estimate.
///
/// Immutable once created. Calories are `u32` so the non-negativity
/// invariant holds by construction; the estimator validates raw
/// responses before building one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dish {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub estimated_calories: u32,
    #[serde(default)]
    pub confidence: Confidence,
    #[serde(default)]
    pub notes: String,
}

impl Dish {
    pub fn new(name: impl Into<String>, estimated_calories: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            estimated_calories,
            confidence: Confidence::Medium,
            notes: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}
