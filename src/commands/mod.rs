/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes two top-level command modules:

- `generate` — Brainstorm ideas, render images, download, and save a session
- `sessions` — List, show, and delete saved sessions

These handlers are intentionally small and use the library components:
providers, downloader, and the session store.
*/

pub mod generate;
pub mod sessions;

use crate::config::Config;
use crate::error::Result;
use crate::store::{RetryPolicy, SessionStore};
use std::time::Duration;

/// Open the session store configured for this invocation
pub(crate) fn open_store(config: &Config) -> Result<SessionStore> {
    let retry = RetryPolicy {
        max_attempts: config.storage.delete_max_attempts,
        delay: Duration::from_millis(config.storage.delete_retry_delay_ms),
        total_timeout: Duration::from_millis(config.storage.delete_total_timeout_ms),
    };

    Ok(SessionStore::new(&config.storage.root)?.with_retry_policy(retry))
}
