//! OpenAI-compatible provider implementation
//!
//! Implements [`IdeaSource`] against the chat completions endpoint using
//! JSON-mode output, and [`ImageSource`] against the image generations
//! endpoint. The API base is configurable so tests can point the provider
//! at a mock server.

use crate::config::OpenAiConfig;
use crate::error::{DrawbookError, Result};
use crate::providers::{ApiKey, IdeaSource, ImageSource};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Request timeout for provider calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Provider for OpenAI-compatible idea and image generation APIs
///
/// # Examples
///
/// ```no_run
/// use drawbook::config::OpenAiConfig;
/// use drawbook::providers::{ApiKey, IdeaSource, OpenAiProvider};
///
/// # async fn example() -> drawbook::error::Result<()> {
/// let provider = OpenAiProvider::new(
///     OpenAiConfig::default(),
///     "black and white, line art, coloring book style".to_string(),
///     ApiKey::new("sk-..."),
/// )?;
/// let ideas = provider.generate_ideas("Jungle Animals", 3).await?;
/// # Ok(())
/// # }
/// ```
pub struct OpenAiProvider {
    client: Client,
    config: OpenAiConfig,
    style_suffix: String,
    api_key: ApiKey,
}

/// Request structure for the chat completions endpoint
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

/// Message structure for the chat completions endpoint
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Output format selector for the chat completions endpoint
#[derive(Debug, Serialize)]
struct ResponseFormat {
    r#type: String,
}

/// Response structure from the chat completions endpoint
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// Single completion choice
#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

/// Completion message payload
#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: String,
}

/// JSON-mode payload the idea prompt asks the model for
#[derive(Debug, Deserialize)]
struct IdeaListPayload {
    ideas: Vec<String>,
}

/// Request structure for the image generations endpoint
#[derive(Debug, Serialize)]
struct ImageRequest {
    model: String,
    prompt: String,
    n: u8,
    size: String,
    response_format: String,
}

/// Response structure from the image generations endpoint
#[derive(Debug, Deserialize)]
struct ImageResponse {
    data: Vec<ImageDatum>,
}

/// Single generated image reference
#[derive(Debug, Deserialize)]
struct ImageDatum {
    url: String,
}

impl OpenAiProvider {
    /// Create a new provider instance
    ///
    /// # Arguments
    ///
    /// * `config` - Endpoint and model configuration
    /// * `style_suffix` - Suffix appended to every image prompt
    /// * `api_key` - Credential for the API
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: OpenAiConfig, style_suffix: String, api_key: ApiKey) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("drawbook/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DrawbookError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized provider: base={}, idea_model={}, image_model={}",
            config.api_base,
            config.idea_model,
            config.image_model
        );

        Ok(Self {
            client,
            config,
            style_suffix,
            api_key,
        })
    }

    /// Build a full endpoint URL from the configured API base
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_base.trim_end_matches('/'), path)
    }

    /// Prompt asking the model for `count` ideas as a JSON object
    fn idea_prompt(topic: &str, count: usize) -> String {
        format!(
            "Generate a list of {count} fun and creative ideas for a children's \
             coloring book. The theme is '{topic}'. Each idea should be a short \
             phrase describing a scene or object, suitable for a coloring book \
             (e.g., 'A monkey swinging on vines'). Keep the language simple and \
             fun. Respond with a JSON object containing a single key \"ideas\" \
             whose value is the list of phrases."
        )
    }

    /// Parse a JSON-mode completion into exactly `count` ideas
    ///
    /// A surplus is truncated with a warning; a shortfall is an error
    /// because every idea must map to one image.
    fn parse_idea_payload(content: &str, count: usize) -> Result<Vec<String>> {
        let payload: IdeaListPayload = serde_json::from_str(content).map_err(|e| {
            DrawbookError::Provider(format!("Idea response is not the expected JSON: {}", e))
        })?;

        let mut ideas = payload.ideas;
        if ideas.len() < count {
            return Err(DrawbookError::Provider(format!(
                "Service returned {} ideas, expected {}",
                ideas.len(),
                count
            ))
            .into());
        }

        if ideas.len() > count {
            tracing::warn!(
                "Service returned {} ideas, truncating to {}",
                ideas.len(),
                count
            );
            ideas.truncate(count);
        }

        Ok(ideas)
    }

    /// Map a non-success response to the error taxonomy
    ///
    /// 401 and 403 become credential rejections; anything else becomes a
    /// provider error carrying the body text.
    async fn error_for_status(response: reqwest::Response) -> anyhow::Error {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::error!("Provider rejected credential: {}", status);
            DrawbookError::CredentialRejected(format!("{}: {}", status, body)).into()
        } else {
            tracing::error!("Provider returned error {}: {}", status, body);
            DrawbookError::Provider(format!("Service returned {}: {}", status, body)).into()
        }
    }
}

#[async_trait]
impl IdeaSource for OpenAiProvider {
    async fn generate_ideas(&self, topic: &str, count: usize) -> Result<Vec<String>> {
        let request = ChatRequest {
            model: self.config.idea_model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Self::idea_prompt(topic, count),
            }],
            response_format: ResponseFormat {
                r#type: "json_object".to_string(),
            },
        };

        let url = self.endpoint("chat/completions");
        tracing::debug!("Requesting {} ideas for topic '{}'", count, topic);

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose())
            .json(&request)
            .send()
            .await
            .map_err(|e| DrawbookError::Provider(format!("Idea request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_for_status(response).await);
        }

        let chat: ChatResponse = response.json().await.map_err(|e| {
            DrawbookError::Provider(format!("Failed to parse idea response: {}", e))
        })?;

        let content = chat
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| {
                DrawbookError::Provider("Idea response contained no choices".to_string())
            })?;

        Self::parse_idea_payload(content, count)
    }
}

#[async_trait]
impl ImageSource for OpenAiProvider {
    async fn generate_image(&self, description: &str) -> Result<Url> {
        let request = ImageRequest {
            model: self.config.image_model.clone(),
            prompt: format!("{}, {}", description, self.style_suffix),
            n: 1,
            size: self.config.image_size.clone(),
            response_format: "url".to_string(),
        };

        let url = self.endpoint("images/generations");
        tracing::debug!("Requesting image for '{}'", description);

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose())
            .json(&request)
            .send()
            .await
            .map_err(|e| DrawbookError::Provider(format!("Image request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_for_status(response).await);
        }

        let images: ImageResponse = response.json().await.map_err(|e| {
            DrawbookError::Provider(format!("Failed to parse image response: {}", e))
        })?;

        let datum = images.data.first().ok_or_else(|| {
            DrawbookError::Provider("Image response contained no data".to_string())
        })?;

        Url::parse(&datum.url).map_err(|e| {
            DrawbookError::Provider(format!("Image URL is not valid: {}", e)).into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idea_prompt_mentions_topic_and_count() {
        let prompt = OpenAiProvider::idea_prompt("Jungle Animals", 3);
        assert!(prompt.contains("Jungle Animals"));
        assert!(prompt.contains('3'));
        assert!(prompt.contains("\"ideas\""));
    }

    #[test]
    fn test_parse_idea_payload_exact_count() {
        let content = r#"{"ideas": ["A monkey on vines", "A parrot in a tree"]}"#;
        let ideas = OpenAiProvider::parse_idea_payload(content, 2).unwrap();
        assert_eq!(
            ideas,
            vec![
                "A monkey on vines".to_string(),
                "A parrot in a tree".to_string()
            ]
        );
    }

    #[test]
    fn test_parse_idea_payload_truncates_surplus() {
        let content = r#"{"ideas": ["a", "b", "c", "d"]}"#;
        let ideas = OpenAiProvider::parse_idea_payload(content, 2).unwrap();
        assert_eq!(ideas.len(), 2);
        assert_eq!(ideas[0], "a");
    }

    #[test]
    fn test_parse_idea_payload_errors_on_shortfall() {
        let content = r#"{"ideas": ["only one"]}"#;
        assert!(OpenAiProvider::parse_idea_payload(content, 3).is_err());
    }

    #[test]
    fn test_parse_idea_payload_errors_on_bad_json() {
        assert!(OpenAiProvider::parse_idea_payload("not json", 1).is_err());
        assert!(OpenAiProvider::parse_idea_payload(r#"{"wrong": []}"#, 1).is_err());
    }

    #[test]
    fn test_chat_request_serialization() {
        let request = ChatRequest {
            model: "gpt-4o".to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: "hello".to_string(),
            }],
            response_format: ResponseFormat {
                r#type: "json_object".to_string(),
            },
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"model\":\"gpt-4o\""));
        assert!(json.contains("\"role\":\"user\""));
        assert!(json.contains("\"type\":\"json_object\""));
    }

    #[test]
    fn test_image_request_serialization() {
        let request = ImageRequest {
            model: "dall-e-3".to_string(),
            prompt: "A monkey, line art".to_string(),
            n: 1,
            size: "1024x1024".to_string(),
            response_format: "url".to_string(),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"model\":\"dall-e-3\""));
        assert!(json.contains("\"n\":1"));
        assert!(json.contains("\"size\":\"1024x1024\""));
        assert!(json.contains("\"response_format\":\"url\""));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let mut config = OpenAiConfig::default();
        config.api_base = "http://localhost:8080/v1/".to_string();
        let provider =
            OpenAiProvider::new(config, String::new(), ApiKey::new("sk-test")).unwrap();
        assert_eq!(
            provider.endpoint("chat/completions"),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_image_response_parsing() {
        let json = r#"{"data": [{"url": "https://img.example/1.png"}]}"#;
        let response: ImageResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.data.len(), 1);
        assert_eq!(response.data[0].url, "https://img.example/1.png");
    }
}
