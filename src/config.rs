//! Configuration management for Drawbook
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{DrawbookError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for Drawbook
///
/// This structure holds all configuration needed for page generation,
/// including provider settings, generation behavior, session storage,
/// and image download limits.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// AI provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Generation behavior configuration
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Session storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Image download configuration
    #[serde(default)]
    pub download: DownloadConfig,
}

/// Provider configuration
///
/// Specifies the AI endpoints and models used for idea and image generation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderConfig {
    /// OpenAI-compatible API configuration
    #[serde(default)]
    pub openai: OpenAiConfig,
}

/// OpenAI-compatible provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// API base URL for provider endpoints (useful for tests and local mocks)
    ///
    /// When set to a non-default value, this base is used to build the
    /// `/chat/completions` and `/images/generations` endpoints, which allows
    /// tests to point the provider at a mock server.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Model used to brainstorm coloring page ideas
    #[serde(default = "default_idea_model")]
    pub idea_model: String,

    /// Model used to render each idea as an image
    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// Size of generated images (e.g. "1024x1024")
    #[serde(default = "default_image_size")]
    pub image_size: String,
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_idea_model() -> String {
    "gpt-4o".to_string()
}

fn default_image_model() -> String {
    "dall-e-3".to_string()
}

fn default_image_size() -> String {
    "1024x1024".to_string()
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            idea_model: default_idea_model(),
            image_model: default_image_model(),
            image_size: default_image_size(),
        }
    }
}

/// Generation behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Number of pages generated when `--count` is not given
    #[serde(default = "default_count")]
    pub default_count: usize,

    /// Maximum number of pages per generation
    #[serde(default = "default_max_count")]
    pub max_count: usize,

    /// Style suffix appended to every image prompt
    #[serde(default = "default_style_suffix")]
    pub style_suffix: String,
}

fn default_count() -> usize {
    3
}

fn default_max_count() -> usize {
    10
}

fn default_style_suffix() -> String {
    "black and white, line art, coloring book style".to_string()
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            default_count: default_count(),
            max_count: default_max_count(),
            style_suffix: default_style_suffix(),
        }
    }
}

/// Session storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for session records and images
    #[serde(default = "default_storage_root")]
    pub root: PathBuf,

    /// Maximum attempts when removing a session's image folder
    #[serde(default = "default_delete_max_attempts")]
    pub delete_max_attempts: u32,

    /// Delay between image folder removal attempts (milliseconds)
    #[serde(default = "default_delete_retry_delay_ms")]
    pub delete_retry_delay_ms: u64,

    /// Total time budget for image folder removal (milliseconds)
    #[serde(default = "default_delete_total_timeout_ms")]
    pub delete_total_timeout_ms: u64,
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("sessions")
}

fn default_delete_max_attempts() -> u32 {
    5
}

fn default_delete_retry_delay_ms() -> u64 {
    100
}

fn default_delete_total_timeout_ms() -> u64 {
    2_000
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
            delete_max_attempts: default_delete_max_attempts(),
            delete_retry_delay_ms: default_delete_retry_delay_ms(),
            delete_total_timeout_ms: default_delete_total_timeout_ms(),
        }
    }
}

/// Image download configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Download timeout in seconds
    #[serde(default = "default_download_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Maximum size of a downloaded image (bytes)
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: usize,
}

fn default_download_timeout_seconds() -> u64 {
    30
}

fn default_max_image_bytes() -> usize {
    10 * 1024 * 1024 // 10 MB
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_download_timeout_seconds(),
            max_image_bytes: default_max_image_bytes(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| DrawbookError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| DrawbookError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(api_base) = std::env::var("DRAWBOOK_API_BASE") {
            self.provider.openai.api_base = api_base;
        }

        if let Ok(idea_model) = std::env::var("DRAWBOOK_IDEA_MODEL") {
            self.provider.openai.idea_model = idea_model;
        }

        if let Ok(image_model) = std::env::var("DRAWBOOK_IMAGE_MODEL") {
            self.provider.openai.image_model = image_model;
        }

        if let Ok(image_size) = std::env::var("DRAWBOOK_IMAGE_SIZE") {
            self.provider.openai.image_size = image_size;
        }

        if let Ok(count) = std::env::var("DRAWBOOK_DEFAULT_COUNT") {
            if let Ok(value) = count.parse() {
                self.generation.default_count = value;
            } else {
                tracing::warn!("Invalid DRAWBOOK_DEFAULT_COUNT: {}", count);
            }
        }

        if let Ok(timeout) = std::env::var("DRAWBOOK_DOWNLOAD_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.download.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid DRAWBOOK_DOWNLOAD_TIMEOUT_SECONDS: {}", timeout);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(root) = &cli.sessions_root {
            self.storage.root = root.clone();
        }
    }

    /// Validate the configuration
    ///
    /// # Returns
    ///
    /// Returns Ok(()) if the configuration is valid
    ///
    /// # Errors
    ///
    /// Returns `DrawbookError::Config` describing the first invalid field
    pub fn validate(&self) -> Result<()> {
        if self.generation.default_count < 1 {
            return Err(
                DrawbookError::Config("generation.default_count must be at least 1".to_string())
                    .into(),
            );
        }

        if self.generation.default_count > self.generation.max_count {
            return Err(DrawbookError::Config(format!(
                "generation.default_count ({}) exceeds generation.max_count ({})",
                self.generation.default_count, self.generation.max_count
            ))
            .into());
        }

        if url::Url::parse(&self.provider.openai.api_base).is_err() {
            return Err(DrawbookError::Config(format!(
                "provider.openai.api_base is not a valid URL: {}",
                self.provider.openai.api_base
            ))
            .into());
        }

        let size_pattern = regex::Regex::new(r"^\d+x\d+$").unwrap();
        if !size_pattern.is_match(&self.provider.openai.image_size) {
            return Err(DrawbookError::Config(format!(
                "provider.openai.image_size must look like 1024x1024, got: {}",
                self.provider.openai.image_size
            ))
            .into());
        }

        if self.download.timeout_seconds == 0 {
            return Err(DrawbookError::Config(
                "download.timeout_seconds must be at least 1".to_string(),
            )
            .into());
        }

        if self.download.max_image_bytes == 0 {
            return Err(DrawbookError::Config(
                "download.max_image_bytes must be at least 1".to_string(),
            )
            .into());
        }

        if self.storage.delete_max_attempts == 0 {
            return Err(DrawbookError::Config(
                "storage.delete_max_attempts must be at least 1".to_string(),
            )
            .into());
        }

        Ok(())
    }
}
