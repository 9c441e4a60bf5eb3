//! Vision module - text recognition and AI calorie estimation

pub mod ai;
pub mod ocr;

// Re-export main types for convenience
pub use ai::gemini::{GeminiEstimator, GEMINI_MODEL};
pub use ai::prompts::build_menu_prompt;
pub use ocr::{RecognizerConfig, TesseractTextRecognizer};
