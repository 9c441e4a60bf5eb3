//! Prompt construction for the estimation endpoint

/// Build the fixed instructional prompt for a menu text.
///
/// The response contract is a bare JSON array; the estimator still
/// strips code fences defensively before parsing.
pub fn build_menu_prompt(menu_text: &str) -> String {
    format!(
        r#"You are an expert nutritionist. Analyze the following restaurant menu text and estimate the approximate calories of every dish you can identify.

Respond ONLY with a valid JSON array (no markdown, no code fences) with exactly this structure:
[
  {{
    "name": "Dish name",
    "description": "Short description of the dish",
    "estimatedCalories": 450,
    "confidence": "high",
    "notes": "Includes rice and salad"
  }}
]

Rules:
- "confidence" must be one of: "high", "medium", "low"
- If the menu describes a dish, use the description for a better estimate
- Include EVERY dish you find
- Calories are per standard individual serving
- If you cannot estimate, use "low" confidence

MENU:
{menu_text}"#
    )
}
