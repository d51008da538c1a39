//! Generate command handler
//!
//! Runs the full pipeline for one topic: brainstorm ideas, render each
//! idea as an image, download the images into the session's folder, and
//! persist the session record. Any idea, image, or download failure
//! aborts the whole action before anything is saved; only a failure of
//! the final metadata write is downgraded to a warning, because at that
//! point the images are already on disk.

use crate::config::Config;
use crate::download::ImageDownloader;
use crate::error::{DrawbookError, Result};
use crate::providers::{ApiKey, IdeaSource, ImageSource, OpenAiProvider};
use crate::store::{SessionRecord, SessionStore};
use colored::Colorize;

/// Run the generate pipeline for `topic`
///
/// # Arguments
///
/// * `config` - Global configuration (consumed)
/// * `topic` - Theme to generate pages for
/// * `count` - Number of pages, defaulting to the configured count
/// * `name` - Explicit session name, derived from topic and timestamp if absent
/// * `api_key` - Credential for the AI provider
///
/// # Errors
///
/// Returns error on an invalid count or name, a rejected credential, or
/// any idea/image/download failure. A failed session save is reported as
/// a warning, not an error.
pub async fn run_generate(
    config: Config,
    topic: String,
    count: Option<usize>,
    name: Option<String>,
    api_key: String,
) -> Result<()> {
    let count = count.unwrap_or(config.generation.default_count);
    if count < 1 || count > config.generation.max_count {
        return Err(DrawbookError::Config(format!(
            "count must be between 1 and {}, got {}",
            config.generation.max_count, count
        ))
        .into());
    }

    // Validate an explicit name up front, before paying for any AI calls
    let session_name = match name {
        Some(name) => {
            SessionStore::validate_name(&name)?;
            name
        }
        None => derived_session_name(&topic),
    };

    let store = super::open_store(&config)?;
    let provider = OpenAiProvider::new(
        config.provider.openai.clone(),
        config.generation.style_suffix.clone(),
        ApiKey::new(api_key),
    )?;

    println!(
        "{}",
        format!("Brainstorming {} coloring page ideas for '{}'...", count, topic).cyan()
    );
    let ideas = provider.generate_ideas(&topic, count).await?;
    for (i, idea) in ideas.iter().enumerate() {
        println!("  {}. {}", i + 1, idea);
    }

    let mut urls = Vec::with_capacity(ideas.len());
    for (i, idea) in ideas.iter().enumerate() {
        println!(
            "{}",
            format!("Drawing page {}/{}: {}", i + 1, ideas.len(), idea).cyan()
        );
        urls.push(provider.generate_image(idea).await?);
    }

    let downloader = ImageDownloader::new(&config.download)?;
    let image_dir = store.image_dir(&session_name);
    let mut image_paths = Vec::with_capacity(urls.len());
    for (i, url) in urls.iter().enumerate() {
        let dest = image_dir.join(format!("img_{}.png", i + 1));
        downloader.download(url, &dest).await?;
        image_paths.push(dest.to_string_lossy().to_string());
    }

    let record = SessionRecord::new(topic, ideas, image_paths);
    match store.save(&session_name, &record) {
        Ok(()) => {
            println!(
                "{}",
                format!(
                    "Session '{}' saved with {} pages.",
                    session_name,
                    record.page_count()
                )
                .green()
            );
        }
        Err(e) => {
            tracing::warn!("Failed to save session '{}': {}", session_name, e);
            println!(
                "{}",
                format!(
                    "Warning: session '{}' was not saved ({}). Images remain in {}.",
                    session_name,
                    e,
                    image_dir.display()
                )
                .yellow()
            );
        }
    }

    Ok(())
}

/// Derive a session name from the topic and the current local time
///
/// Mirrors the `<topic>_<YYYYmmdd_HHMMSS>` shape users see in the
/// session list, with the topic reduced to a filesystem-safe slug.
fn derived_session_name(topic: &str) -> String {
    format!(
        "{}_{}",
        topic_slug(topic),
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    )
}

/// Reduce a topic to a slug usable inside a session name
///
/// Alphanumerics, dashes, and underscores pass through; spaces and
/// everything else collapse to single underscores. An empty result
/// falls back to "session".
fn topic_slug(topic: &str) -> String {
    let mut slug = String::with_capacity(topic.len());
    let mut last_was_filler = true;

    for c in topic.chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            slug.push(c);
            last_was_filler = false;
        } else if !last_was_filler {
            slug.push('_');
            last_was_filler = true;
        }
    }

    let slug = slug.trim_end_matches('_').to_string();
    if slug.is_empty() || !slug.starts_with(|c: char| c.is_ascii_alphanumeric()) {
        "session".to_string()
    } else {
        slug
    }
}
