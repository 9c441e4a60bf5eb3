//! Configuration management for menucal
//!
//! Config stored at: ~/.config/menucal/config.json

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use menucal_types::{ConfigError, RecognitionLevel};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Gemini API key; the GEMINI_API_KEY environment variable wins
    /// over this field
    #[serde(default)]
    pub gemini_api_key: Option<String>,

    /// Estimation model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Language hints for text recognition
    #[serde(default = "default_ocr_languages")]
    pub ocr_languages: Vec<String>,

    /// Recognition quality mode
    #[serde(default)]
    pub recognition_level: RecognitionLevel,

    /// Data directory override
    #[serde(default)]
    pub store_dir: Option<PathBuf>,
}

fn default_model() -> String {
    menucal_vision::GEMINI_MODEL.to_string()
}

fn default_ocr_languages() -> Vec<String> {
    vec!["spa".to_string(), "eng".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            model: default_model(),
            ocr_languages: default_ocr_languages(),
            recognition_level: RecognitionLevel::Accurate,
            store_dir: None,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("menucal");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Get the data directory path
    pub fn store_dir(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref dir) = self.store_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir().ok_or(ConfigError::NotFound)?.join("menucal");
        Ok(data_dir)
    }

    /// Resolve the estimation API key. A missing key is a startup
    /// configuration error, never a mid-scan failure.
    pub fn api_key(&self) -> Result<String, ConfigError> {
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.trim().is_empty() {
                return Ok(key);
            }
        }
        self.gemini_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .ok_or(ConfigError::MissingApiKey)
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveError(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        Ok(())
    }
}
