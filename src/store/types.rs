//! Session record and deletion types
//!
//! Defines the persisted session shape and the outcome and retry types
//! used by the session store.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A persisted coloring-book session
///
/// Bundles a topic, the generated idea strings, and the local paths of
/// their corresponding downloaded images. Index `i` of `ideas` describes
/// the image at index `i` of `image_paths`.
///
/// The session name is not part of the record; it is the storage key
/// (the record's file stem and the image folder name).
///
/// # Examples
///
/// ```
/// use drawbook::store::SessionRecord;
///
/// let record = SessionRecord::new(
///     "Jungle Animals",
///     vec!["A monkey on vines".to_string()],
///     vec!["sessions/images/jungle_01/img_1.png".to_string()],
/// );
/// assert_eq!(record.page_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Free-text theme the pages were generated for
    pub topic: String,

    /// Ordered idea strings, one per generated image
    pub ideas: Vec<String>,

    /// Ordered local file paths, same length and order as `ideas`
    pub image_paths: Vec<String>,
}

impl SessionRecord {
    /// Create a new session record
    ///
    /// # Arguments
    ///
    /// * `topic` - Theme the pages were generated for
    /// * `ideas` - Ordered idea strings
    /// * `image_paths` - Ordered image file paths
    pub fn new(
        topic: impl Into<String>,
        ideas: Vec<String>,
        image_paths: Vec<String>,
    ) -> Self {
        Self {
            topic: topic.into(),
            ideas,
            image_paths,
        }
    }

    /// Number of pages in this session
    pub fn page_count(&self) -> usize {
        self.ideas.len()
    }
}

/// Outcome of a session deletion
///
/// Metadata removal and image folder removal can succeed independently,
/// so deletion reports which parts actually completed instead of a bare
/// boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The record and the image folder are both gone (or never existed)
    Complete,

    /// Some on-disk state remains: either the record could not be removed,
    /// or the image folder survived every removal attempt
    Partial,
}

impl DeleteOutcome {
    /// Whether the deletion removed everything
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// Bounded retry policy for image folder removal
///
/// Folder removal can fail transiently while another process still holds
/// a file handle inside it. Removal is retried up to `max_attempts` times
/// with `delay` between attempts, never exceeding `total_timeout` overall.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of removal attempts
    pub max_attempts: u32,

    /// Delay between attempts
    pub delay: Duration,

    /// Total time budget across all attempts
    pub total_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_millis(100),
            total_timeout: Duration::from_secs(2),
        }
    }
}
