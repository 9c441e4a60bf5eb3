//! Gemini-backed calorie estimation
//!
//! One non-streaming `generateContent` call per menu. The response text
//! sits at `candidates[0].content.parts[0].text` and must hold a JSON
//! array of dishes; `responseMimeType` asks for clean JSON but fences
//! are stripped anyway before parsing.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use menucal_domain::model::Dish;
use menucal_domain::repository::CalorieEstimator;
use menucal_types::{Confidence, Result, ScanError};

use super::prompts::build_menu_prompt;

pub const GEMINI_MODEL: &str = "gemini-2.5-flash-lite";

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const TEMPERATURE: f64 = 0.3;
const MAX_OUTPUT_TOKENS: u32 = 4096;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `CalorieEstimator` backed by the Gemini generateContent endpoint.
///
/// The API key is injected at construction; config loading rejects a
/// missing key long before a request is made.
pub struct GeminiEstimator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiEstimator {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: GEMINI_MODEL.to_string(),
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDish {
    name: String,
    description: Option<String>,
    estimated_calories: i64,
    confidence: Option<String>,
    notes: Option<String>,
}

#[async_trait]
impl CalorieEstimator for GeminiEstimator {
    async fn estimate(&self, menu_text: &str) -> Result<Vec<Dish>> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let body = serde_json::json!({
            "contents": [
                { "role": "user", "parts": [{ "text": build_menu_prompt(menu_text) }] }
            ],
            "generationConfig": {
                "temperature": TEMPERATURE,
                "maxOutputTokens": MAX_OUTPUT_TOKENS,
                "responseMimeType": "application/json"
            }
        });

        log::debug!("estimating menu text ({} chars) with {}", menu_text.len(), self.model);

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(ScanError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!("estimation endpoint returned {}: {}", status, body);
            return Err(ScanError::EstimationService {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ScanError::EstimationFormat(e.to_string()))?;

        let text = envelope
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .ok_or_else(|| {
                ScanError::EstimationFormat("response carries no candidate text".to_string())
            })?;

        parse_dishes(text)
    }
}

/// Parse the model's JSON array into validated dishes.
///
/// A dish with an empty name or negative calories is dropped, not the
/// batch. Unknown confidence labels fall back to medium. An empty
/// parsed array means the model found no dishes at all.
pub fn parse_dishes(text: &str) -> Result<Vec<Dish>> {
    let json_str = extract_json_array(text);

    let raw_dishes: Vec<RawDish> = serde_json::from_str(&json_str)
        .map_err(|e| ScanError::EstimationFormat(e.to_string()))?;

    if raw_dishes.is_empty() {
        return Err(ScanError::NoDishesFound);
    }

    let dishes = raw_dishes
        .into_iter()
        .filter_map(|raw| {
            if raw.name.trim().is_empty() || raw.estimated_calories < 0 {
                log::warn!(
                    "dropping invalid dish entry: name={:?} calories={}",
                    raw.name,
                    raw.estimated_calories
                );
                return None;
            }
            let confidence = raw
                .confidence
                .as_deref()
                .map(Confidence::from_label)
                .unwrap_or_default();
            Some(
                Dish::new(raw.name, raw.estimated_calories as u32)
                    .with_description(raw.description.unwrap_or_default())
                    .with_confidence(confidence)
                    .with_notes(raw.notes.unwrap_or_default()),
            )
        })
        .collect();

    Ok(dishes)
}

/// Extract the JSON array from a response (handles markdown code blocks)
pub fn extract_json_array(response: &str) -> String {
    let response = response.trim();

    for fence in ["```json", "```"] {
        if response.starts_with(fence) {
            if let Some(end) = response.rfind("```") {
                let start = response.find('\n').map(|i| i + 1).unwrap_or(fence.len());
                if start < end {
                    return response[start..end].trim().to_string();
                }
            }
        }
    }

    if let Some(start) = response.find('[') {
        if let Some(end) = response.rfind(']') {
            if start < end {
                return response[start..=end].to_string();
            }
        }
    }

    response.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_markdown() {
        let response = "```json\n[{\"name\": \"Pizza\"}]\n```";
        assert_eq!(extract_json_array(response), "[{\"name\": \"Pizza\"}]");
    }

    #[test]
    fn test_extract_json_plain_fence() {
        let response = "```\n[1, 2]\n```";
        assert_eq!(extract_json_array(response), "[1, 2]");
    }

    #[test]
    fn test_extract_json_with_surrounding_text() {
        let response = "Here are the dishes: [1, 2] done";
        assert_eq!(extract_json_array(response), "[1, 2]");
    }

    #[test]
    fn test_parse_drops_invalid_dish_keeps_batch() {
        let text = r#"[
            {"name": "Pizza Margherita", "estimatedCalories": 850, "confidence": "high"},
            {"name": "", "estimatedCalories": 400},
            {"name": "Tiramisu", "estimatedCalories": 450, "confidence": "medium"}
        ]"#;
        let dishes = parse_dishes(text).unwrap();
        assert_eq!(dishes.len(), 2);
        assert_eq!(dishes[0].name, "Pizza Margherita");
        assert_eq!(dishes[1].name, "Tiramisu");
    }

    #[test]
    fn test_parse_drops_negative_calories() {
        let text = r#"[
            {"name": "Pizza", "estimatedCalories": -10},
            {"name": "Pasta", "estimatedCalories": 620}
        ]"#;
        let dishes = parse_dishes(text).unwrap();
        assert_eq!(dishes.len(), 1);
        assert_eq!(dishes[0].name, "Pasta");
    }

    #[test]
    fn test_parse_empty_array_is_no_dishes() {
        assert!(matches!(parse_dishes("[]"), Err(ScanError::NoDishesFound)));
    }

    #[test]
    fn test_parse_malformed_json_is_format_error() {
        assert!(matches!(
            parse_dishes("not json at all"),
            Err(ScanError::EstimationFormat(_))
        ));
    }

    #[test]
    fn test_parse_defaults_confidence_and_optional_fields() {
        let text = r#"[{"name": "Sopa", "estimatedCalories": 120, "confidence": "weird"}]"#;
        let dishes = parse_dishes(text).unwrap();
        assert_eq!(dishes[0].confidence, Confidence::Medium);
        assert_eq!(dishes[0].description, "");
        assert_eq!(dishes[0].notes, "");
    }
}
