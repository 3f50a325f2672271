use anyhow::{Context, Result};
use clap::Parser;
use route_settings::config::Config;
use route_settings::resolver::{parse_service_definition, resolve_service};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = Config::parse();

    // Logs go to stderr so stdout only carries the resolved settings
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("route_settings={}", config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!(service_file = %config.service_file.display(), "Resolving route settings");

    let contents = std::fs::read_to_string(&config.service_file)
        .with_context(|| format!("Failed to read {}", config.service_file.display()))?;

    let definition = parse_service_definition(&contents, config.is_json())?;
    let resolved = resolve_service(&definition)?;

    let output = if config.pretty {
        serde_json::to_string_pretty(&resolved)?
    } else {
        serde_json::to_string(&resolved)?
    };
    println!("{}", output);

    Ok(())
}
