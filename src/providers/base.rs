//! Provider traits and the credential type
//!
//! This module defines the traits the generation pipeline depends on,
//! plus the API key wrapper that keeps the credential out of logs.

use crate::error::Result;
use async_trait::async_trait;
use url::Url;

/// User-supplied API credential
///
/// Wraps the secret so it cannot leak through `Debug` formatting. The
/// credential lives for the process only and is never persisted.
///
/// # Examples
///
/// ```
/// use drawbook::providers::ApiKey;
///
/// let key = ApiKey::new("sk-secret");
/// assert_eq!(format!("{:?}", key), "ApiKey(***)");
/// ```
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap an API key string
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Expose the secret for request authorization headers
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiKey(***)")
    }
}

/// Source of coloring page ideas
///
/// Given a topic and a count, returns an ordered sequence of exactly
/// `count` short scene descriptions.
#[async_trait]
pub trait IdeaSource: Send + Sync {
    /// Generate `count` coloring page ideas for `topic`
    ///
    /// # Arguments
    ///
    /// * `topic` - Theme to brainstorm around
    /// * `count` - Number of ideas required
    ///
    /// # Errors
    ///
    /// Returns error if the service call fails, the credential is
    /// rejected, or the service returns fewer ideas than requested
    async fn generate_ideas(&self, topic: &str, count: usize) -> Result<Vec<String>>;
}

/// Source of generated images
///
/// Given a scene description, returns a retrievable URL to a rendered
/// raster image. Called once per idea, sequentially.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Render `description` as an image and return its URL
    ///
    /// # Arguments
    ///
    /// * `description` - Scene to render
    ///
    /// # Errors
    ///
    /// Returns error if the service call fails or the credential is
    /// rejected
    async fn generate_image(&self, description: &str) -> Result<Url>;
}
