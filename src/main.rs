//! Drawbook - AI coloring-book page generator CLI
//!
//! Main entry point for the Drawbook application.

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use drawbook::cli::{Cli, Commands, SessionCommand};
use drawbook::commands;
use drawbook::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.clone().unwrap_or_else(|| "config/config.yaml".to_string());
    let config = Config::load(&config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Generate {
            topic,
            count,
            name,
            api_key,
        } => {
            tracing::info!("Starting generation for topic: {}", topic);
            commands::generate::run_generate(config, topic, count, name, api_key).await?;
            Ok(())
        }
        Commands::Sessions { command } => match command {
            SessionCommand::List => {
                commands::sessions::list_sessions(&config)?;
                Ok(())
            }
            SessionCommand::Show { name } => {
                commands::sessions::show_session(&config, &name)?;
                Ok(())
            }
            SessionCommand::Delete { name } => {
                tracing::info!("Deleting session: {}", name);
                commands::sessions::delete_session(&config, &name).await?;
                Ok(())
            }
        },
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "drawbook=debug"
    } else {
        "drawbook=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
