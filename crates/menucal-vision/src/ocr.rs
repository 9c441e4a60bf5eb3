//! Text recognition over decoded bitmaps via the tesseract CLI bridge
//!
//! Recognition is CPU-bound, so the trait impl hands the bitmap to a
//! blocking worker and never runs the engine on the async executor.

use async_trait::async_trait;
use image::DynamicImage;
use tokio::task;

use menucal_domain::repository::TextRecognizer;
use menucal_types::{RecognitionLevel, Result, ScanError};

/// Recognizer configuration: language hints and quality mode
#[derive(Debug, Clone)]
pub struct RecognizerConfig {
    /// Tesseract language codes, tried together (joined with `+`)
    pub languages: Vec<String>,
    pub level: RecognitionLevel,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            languages: vec!["spa".to_string(), "eng".to_string()],
            level: RecognitionLevel::Accurate,
        }
    }
}

impl RecognizerConfig {
    pub fn with_languages(mut self, languages: Vec<String>) -> Self {
        self.languages = languages;
        self
    }

    pub fn with_level(mut self, level: RecognitionLevel) -> Self {
        self.level = level;
        self
    }
}

/// `TextRecognizer` backed by the tesseract engine
pub struct TesseractTextRecognizer {
    config: RecognizerConfig,
}

impl TesseractTextRecognizer {
    pub fn new(config: RecognizerConfig) -> Self {
        Self { config }
    }
}

impl Default for TesseractTextRecognizer {
    fn default() -> Self {
        Self::new(RecognizerConfig::default())
    }
}

#[async_trait]
impl TextRecognizer for TesseractTextRecognizer {
    async fn recognize(&self, image: DynamicImage) -> Result<String> {
        let config = self.config.clone();
        task::spawn_blocking(move || recognize_blocking(&image, &config))
            .await
            .map_err(|e| ScanError::ImageProcessing(e.to_string()))?
    }
}

fn recognize_blocking(image: &DynamicImage, config: &RecognizerConfig) -> Result<String> {
    let tess_image = rusty_tesseract::Image::from_dynamic_image(image)
        .map_err(|e| ScanError::ImageProcessing(e.to_string()))?;

    // OEM 1 is the LSTM engine with language correction; OEM 0 is the
    // legacy fast path.
    let oem = match config.level {
        RecognitionLevel::Accurate => 1,
        RecognitionLevel::Fast => 0,
    };

    let args = rusty_tesseract::Args {
        lang: config.languages.join("+"),
        oem: Some(oem),
        ..rusty_tesseract::Args::default()
    };

    let raw = rusty_tesseract::image_to_string(&tess_image, &args)
        .map_err(|e| ScanError::ImageProcessing(e.to_string()))?;

    Ok(join_lines(&raw))
}

/// Keep the engine's line order, drop blank lines. An image with no
/// text yields an empty string, not an error.
fn join_lines(raw: &str) -> String {
    raw.lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
