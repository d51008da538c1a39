//! Session persistence for Drawbook
//!
//! Durable mapping from session name to (topic, ideas, image paths),
//! backed by one pretty-printed JSON file per session under a root
//! directory, plus an `images/` subdirectory holding one folder of
//! downloaded pages per session.
//!
//! Failure semantics at this boundary: `save` reports its failure as an
//! error for the caller to surface; `load`, `list`, and `delete` catch
//! all I/O and parse failures and translate them to sentinel values
//! (`None`, an empty list, or a [`DeleteOutcome`]). Nothing here is fatal
//! to the calling process.

mod types;

pub use types::{DeleteOutcome, RetryPolicy, SessionRecord};

use crate::error::{DrawbookError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Directory under the storage root that holds per-session image folders
const IMAGES_DIR: &str = "images";

/// Maximum accepted session name length
const MAX_NAME_LEN: usize = 128;

/// File-backed session store
///
/// Sessions have exactly two states, absent and present. [`save`] moves
/// absent to present or overwrites a present session; [`delete`] moves
/// present to absent and is idempotent.
///
/// The image folder for a session is a single deterministic derivation
/// from its name, owned by this store (see [`image_dir`]). Callers must
/// not derive their own folder paths.
///
/// [`save`]: SessionStore::save
/// [`delete`]: SessionStore::delete
/// [`image_dir`]: SessionStore::image_dir
///
/// # Examples
///
/// ```no_run
/// use drawbook::store::{SessionRecord, SessionStore};
///
/// # fn main() -> drawbook::error::Result<()> {
/// let store = SessionStore::new("sessions")?;
/// let record = SessionRecord::new(
///     "Jungle Animals",
///     vec!["A monkey on vines".to_string()],
///     vec!["sessions/images/jungle_01/img_1.png".to_string()],
/// );
/// store.save("jungle_01", &record)?;
/// assert!(store.load("jungle_01").is_some());
/// # Ok(())
/// # }
/// ```
pub struct SessionStore {
    root: PathBuf,
    retry: RetryPolicy,
}

impl SessionStore {
    /// Open a session store rooted at `root`, creating the directory
    /// layout if needed
    ///
    /// # Arguments
    ///
    /// * `root` - Root directory for session records and images
    ///
    /// # Errors
    ///
    /// Returns `DrawbookError::Storage` if the directories cannot be created
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(root.join(IMAGES_DIR)).map_err(|e| {
            DrawbookError::Storage(format!(
                "Failed to create session directory {}: {}",
                root.display(),
                e
            ))
        })?;

        Ok(Self {
            root,
            retry: RetryPolicy::default(),
        })
    }

    /// Replace the image folder removal retry policy
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Storage root this store operates on
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Image folder for a session, derived from its name
    ///
    /// This is the only derivation of a session's image folder; save,
    /// load, and delete all agree on it.
    ///
    /// # Arguments
    ///
    /// * `name` - Session name
    pub fn image_dir(&self, name: &str) -> PathBuf {
        self.root.join(IMAGES_DIR).join(name)
    }

    /// Record file for a session
    fn session_file(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.json", name))
    }

    /// Validate a session name for use as a filesystem key
    ///
    /// Accepts non-empty names of letters, digits, dots, underscores, and
    /// dashes that start with a letter or digit, up to 128 characters.
    ///
    /// # Arguments
    ///
    /// * `name` - Candidate session name
    ///
    /// # Errors
    ///
    /// Returns `DrawbookError::InvalidSessionName` for names that are empty,
    /// too long, or contain characters outside the safe set
    pub fn validate_name(name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(
                DrawbookError::InvalidSessionName("name must not be empty".to_string()).into(),
            );
        }

        if name.len() > MAX_NAME_LEN {
            return Err(DrawbookError::InvalidSessionName(format!(
                "name exceeds {} characters",
                MAX_NAME_LEN
            ))
            .into());
        }

        let pattern = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").unwrap();
        if !pattern.is_match(name) {
            return Err(DrawbookError::InvalidSessionName(format!(
                "name must match [A-Za-z0-9][A-Za-z0-9._-]*, got: {}",
                name
            ))
            .into());
        }

        Ok(())
    }

    /// Persist a session record under `name`, fully replacing any prior
    /// record with the same name
    ///
    /// # Arguments
    ///
    /// * `name` - Session name (the storage key)
    /// * `record` - Session record to persist
    ///
    /// # Errors
    ///
    /// Returns `DrawbookError::InvalidSessionName` for an unusable name,
    /// `DrawbookError::MismatchedImageCount` if the idea and image path
    /// lists differ in length, and `DrawbookError::Storage` if the record
    /// cannot be written
    pub fn save(&self, name: &str, record: &SessionRecord) -> Result<()> {
        Self::validate_name(name)?;

        if record.ideas.len() != record.image_paths.len() {
            return Err(DrawbookError::MismatchedImageCount {
                ideas: record.ideas.len(),
                images: record.image_paths.len(),
            }
            .into());
        }

        let path = self.session_file(name);
        if path.exists() {
            tracing::warn!("Overwriting existing session '{}'", name);
        }

        let json = serde_json::to_string_pretty(record)
            .map_err(|e| DrawbookError::Storage(format!("Failed to serialize session: {}", e)))?;

        std::fs::write(&path, json).map_err(|e| {
            DrawbookError::Storage(format!("Failed to write {}: {}", path.display(), e))
        })?;

        tracing::info!("Saved session '{}' ({} pages)", name, record.page_count());
        Ok(())
    }

    /// Load the session record for `name`
    ///
    /// Returns `None` for a missing record, an invalid name, or a record
    /// that fails to parse; read and parse failures are logged and never
    /// propagated.
    ///
    /// # Arguments
    ///
    /// * `name` - Session name
    pub fn load(&self, name: &str) -> Option<SessionRecord> {
        if Self::validate_name(name).is_err() {
            tracing::debug!("Rejecting load of invalid session name: {}", name);
            return None;
        }

        let path = self.session_file(name);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Failed to read session '{}': {}", name, e);
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Session '{}' is malformed, treating as absent: {}", name, e);
                None
            }
        }
    }

    /// List the names of all stored sessions
    ///
    /// Names are derived from the `.json` record files under the storage
    /// root. Order is filesystem enumeration order and is not guaranteed
    /// to be stable or chronological. An unreadable root yields an empty
    /// list.
    pub fn list(&self) -> Vec<String> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    "Failed to read session directory {}: {}",
                    self.root.display(),
                    e
                );
                return Vec::new();
            }
        };

        entries
            .filter_map(|entry| {
                let path = entry.ok()?.path();
                if path.extension().and_then(|e| e.to_str()) != Some("json") {
                    return None;
                }
                path.file_stem()
                    .and_then(|s| s.to_str())
                    .map(|s| s.to_string())
            })
            .collect()
    }

    /// Delete the session `name`: remove its record file, then its image
    /// folder with bounded retries
    ///
    /// Deleting an absent session is an idempotent no-op reporting
    /// [`DeleteOutcome::Complete`]. If the record cannot be removed, or
    /// the image folder survives every removal attempt (for example while
    /// another process holds a file open inside it), the outcome is
    /// [`DeleteOutcome::Partial`]. Nothing is propagated as an error.
    ///
    /// # Arguments
    ///
    /// * `name` - Session name
    pub async fn delete(&self, name: &str) -> DeleteOutcome {
        if Self::validate_name(name).is_err() {
            tracing::debug!("Rejecting delete of invalid session name: {}", name);
            return DeleteOutcome::Complete;
        }

        let path = self.session_file(name);
        match std::fs::remove_file(&path) {
            Ok(()) => tracing::info!("Removed session record '{}'", name),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!("Failed to remove session record '{}': {}", name, e);
                return DeleteOutcome::Partial;
            }
        }

        self.remove_image_dir(name).await
    }

    /// Remove a session's image folder, retrying per the configured policy
    async fn remove_image_dir(&self, name: &str) -> DeleteOutcome {
        let dir = self.image_dir(name);
        if !dir.exists() {
            return DeleteOutcome::Complete;
        }

        let started = Instant::now();
        let mut last_error = None;

        for attempt in 1..=self.retry.max_attempts {
            match std::fs::remove_dir_all(&dir) {
                Ok(()) => {
                    tracing::info!("Removed image folder for session '{}'", name);
                    return DeleteOutcome::Complete;
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    return DeleteOutcome::Complete;
                }
                Err(e) => {
                    tracing::debug!(
                        "Attempt {}/{} to remove {} failed: {}",
                        attempt,
                        self.retry.max_attempts,
                        dir.display(),
                        e
                    );
                    last_error = Some(e);
                }
            }

            if attempt < self.retry.max_attempts {
                if started.elapsed() + self.retry.delay > self.retry.total_timeout {
                    break;
                }
                tokio::time::sleep(self.retry.delay).await;
            }
        }

        tracing::warn!(
            "Image folder {} could not be removed: {}",
            dir.display(),
            last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown error".to_string())
        );
        DeleteOutcome::Partial
    }
}
