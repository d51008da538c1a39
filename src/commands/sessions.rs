//! Session management command handlers
//!
//! List, show, and delete saved sessions through the session store.

use crate::config::Config;
use crate::error::Result;
use crate::store::DeleteOutcome;
use colored::Colorize;
use prettytable::{format, Table};

/// Print a table of all saved sessions
///
/// # Arguments
///
/// * `config` - Global configuration
pub fn list_sessions(config: &Config) -> Result<()> {
    let store = super::open_store(config)?;
    let names = store.list();

    if names.is_empty() {
        println!("{}", "No saved sessions found.".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row!["Name".bold(), "Topic".bold(), "Pages".bold()]);

    for name in names {
        match store.load(&name) {
            Some(record) => {
                table.add_row(prettytable::row![
                    name.cyan(),
                    record.topic,
                    record.page_count()
                ]);
            }
            None => {
                table.add_row(prettytable::row![name.cyan(), "(unreadable)".dimmed(), "-"]);
            }
        }
    }

    println!("\nSaved Sessions:");
    table.printstd();
    println!();
    println!(
        "Use {} to display a session.",
        "drawbook sessions show <name>".cyan()
    );
    println!();

    Ok(())
}

/// Print one session's topic, ideas, and image paths
///
/// An absent or malformed session produces a user-facing message rather
/// than an error exit.
///
/// # Arguments
///
/// * `config` - Global configuration
/// * `name` - Session name to display
pub fn show_session(config: &Config, name: &str) -> Result<()> {
    let store = super::open_store(config)?;

    let Some(record) = store.load(name) else {
        println!("{}", format!("Session '{}' not found.", name).yellow());
        return Ok(());
    };

    println!("\n{} {}", "Topic:".bold(), record.topic);
    for (i, (idea, path)) in record.ideas.iter().zip(record.image_paths.iter()).enumerate() {
        println!("  {}. {}", i + 1, idea);
        println!("     {}", path.dimmed());
    }
    println!();

    Ok(())
}

/// Delete a session and report the outcome
///
/// # Arguments
///
/// * `config` - Global configuration
/// * `name` - Session name to delete
pub async fn delete_session(config: &Config, name: &str) -> Result<()> {
    let store = super::open_store(config)?;

    match store.delete(name).await {
        DeleteOutcome::Complete => {
            println!("{}", format!("Session '{}' deleted.", name).green());
        }
        DeleteOutcome::Partial => {
            println!(
                "{}",
                format!(
                    "Session '{}' record removed, but some files could not be deleted; \
                     see {} for leftovers.",
                    name,
                    store.image_dir(name).display()
                )
                .yellow()
            );
        }
    }

    Ok(())
}
