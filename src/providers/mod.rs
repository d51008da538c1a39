//! AI provider abstractions and implementations
//!
//! The idea and image generation services are opaque request/response
//! collaborators behind the [`IdeaSource`] and [`ImageSource`] traits.
//! The only shipped implementation is [`OpenAiProvider`], which talks to
//! any OpenAI-compatible API.

mod base;
mod openai;

pub use base::{ApiKey, IdeaSource, ImageSource};
pub use openai::OpenAiProvider;
