//! Skinsight - HTTP API for skin image classification and dermatology guidance

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skinsight::api::{self, AppState};
use skinsight::conditions::ConditionCatalog;
use skinsight::config::Config;

#[derive(Parser)]
#[command(name = "skinsight")]
#[command(about = "HTTP API for skin image classification and dermatology guidance")]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show the built-in condition content
    Conditions {
        /// Condition to print in full
        name: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!("skinsight={},tower_http=debug", log_level).into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    let _ = dotenvy::dotenv();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::default_path()?,
    };

    match cli.command {
        Commands::Serve { port } => {
            let config = Config::load_from(&config_path)?;
            let port = port.unwrap_or(config.http_port);

            if std::env::var(&config.llm.api_key_env).is_err() {
                tracing::warn!(
                    "{} is not set; language model endpoints will fail until it is",
                    config.llm.api_key_env
                );
            }

            let state = AppState::from_config(&config)?;
            let router = api::create_router(state);

            tracing::info!("Starting HTTP server on port {}", port);
            let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

            println!("Skinsight server running at http://localhost:{}", port);
            println!("  API:      http://localhost:{}/api/...", port);
            println!("  API Docs: http://localhost:{}/api/docs", port);
            println!("  Health:   http://localhost:{}/health", port);

            axum::serve(listener, router).await?;
        }

        Commands::Init { force } => {
            if config_path.exists() && !force {
                anyhow::bail!(
                    "Config already exists at {}. Use --force to overwrite.",
                    config_path.display()
                );
            }

            Config::default().save(&config_path)?;
            println!("✓ Config written to {}", config_path.display());
        }

        Commands::Conditions { name } => {
            let catalog = ConditionCatalog::builtin();

            match name {
                Some(name) => match catalog.get(&name) {
                    Some(info) => println!("{}", serde_json::to_string_pretty(info)?),
                    None => anyhow::bail!("Unknown condition: {}", name),
                },
                None => {
                    for name in catalog.names() {
                        if let Some(info) = catalog.get(name) {
                            println!("• {} ({})", info.title, info.name);
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
