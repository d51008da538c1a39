//! Image download for generated pages
//!
//! Fetches each generated image URL to a local file with a timeout, a
//! payload size cap, and raster-format sniffing before anything is
//! written to disk.

use crate::config::DownloadConfig;
use crate::error::{DrawbookError, Result};
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Downloader for generated image URLs
///
/// # Examples
///
/// ```no_run
/// use drawbook::config::DownloadConfig;
/// use drawbook::download::ImageDownloader;
/// use url::Url;
///
/// # async fn example() -> drawbook::error::Result<()> {
/// let downloader = ImageDownloader::new(&DownloadConfig::default())?;
/// let url = Url::parse("https://img.example/1.png")?;
/// downloader.download(&url, "sessions/images/jungle_01/img_1.png".as_ref()).await?;
/// # Ok(())
/// # }
/// ```
pub struct ImageDownloader {
    client: Client,
    max_bytes: usize,
}

impl ImageDownloader {
    /// Create a new downloader
    ///
    /// # Arguments
    ///
    /// * `config` - Timeout and size limit settings
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: &DownloadConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("drawbook/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DrawbookError::Download(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_bytes: config.max_image_bytes,
        })
    }

    /// Download `url` to `dest`, creating parent directories as needed
    ///
    /// The payload must be no larger than the configured limit and must
    /// sniff as a known raster image format; otherwise nothing is written.
    ///
    /// # Arguments
    ///
    /// * `url` - Image URL returned by the image source
    /// * `dest` - Destination file path
    ///
    /// # Errors
    ///
    /// Returns `DrawbookError::Download` on HTTP failure, an oversized or
    /// non-image payload, or a write failure
    pub async fn download(&self, url: &Url, dest: &Path) -> Result<()> {
        tracing::debug!("Downloading {} to {}", url, dest.display());

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| DrawbookError::Download(format!("Request for {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DrawbookError::Download(format!(
                "Image fetch returned {} for {}",
                status, url
            ))
            .into());
        }

        if let Some(length) = response.content_length() {
            if length as usize > self.max_bytes {
                return Err(DrawbookError::Download(format!(
                    "Image is {} bytes, limit is {}",
                    length, self.max_bytes
                ))
                .into());
            }
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DrawbookError::Download(format!("Failed to read image body: {}", e)))?;

        if bytes.len() > self.max_bytes {
            return Err(DrawbookError::Download(format!(
                "Image is {} bytes, limit is {}",
                bytes.len(),
                self.max_bytes
            ))
            .into());
        }

        image::guess_format(&bytes).map_err(|_| {
            DrawbookError::Download(format!("Payload from {} is not a recognized image", url))
        })?;

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DrawbookError::Download(format!(
                    "Failed to create {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        std::fs::write(dest, &bytes).map_err(|e| {
            DrawbookError::Download(format!("Failed to write {}: {}", dest.display(), e))
        })?;

        tracing::info!("Downloaded {} bytes to {}", bytes.len(), dest.display());
        Ok(())
    }
}
