use anyhow::Context;
use clap::Parser;
use poolsight::api::{start_api_server, ApiState};
use poolsight::config::{Config, LoggingConfig};
use poolsight::db::MySqlConnectionSource;
use poolsight::metrics::MetricsRegistry;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "Poolsight")]
#[command(about = "Database-backed web service with health, pool and request metrics", long_about = None)]
#[command(version)]
struct Args {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Bind address (overrides config)
    #[arg(long)]
    bind: Option<String>,

    /// Bind port (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// Generate example configuration file
    #[arg(long, value_name = "FILE")]
    generate_config: Option<PathBuf>,

    /// Log level (overrides config: trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Handle config generation
    if let Some(config_path) = args.generate_config {
        println!("Generating example configuration file: {:?}", config_path);
        Config::create_example(&config_path)?;
        println!("Example configuration file created successfully!");
        println!("Edit the file and run: poolsight --config {:?}", config_path);
        return Ok(());
    }

    // Load configuration
    let mut config = match &args.config {
        Some(config_path) => Config::from_file(config_path)
            .with_context(|| format!("loading configuration from {:?}", config_path))?,
        None => Config::default(),
    };

    // CLI first, then DB_* environment variables
    if let Some(bind) = args.bind {
        config.server.bind_address = bind;
    }
    if let Some(port) = args.port {
        config.server.bind_port = port;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    config
        .apply_env_overrides()
        .context("applying DB_* environment overrides")?;
    config.validate()?;

    init_logging(&config.logging)?;

    info!("Poolsight v{} starting", env!("CARGO_PKG_VERSION"));
    match &args.config {
        Some(path) => info!("Loaded configuration from {:?}", path),
        None => info!("No configuration file specified, using defaults"),
    }

    let source = Arc::new(MySqlConnectionSource::connect_lazy(&config.database));
    let metrics = Arc::new(MetricsRegistry::new());
    let state = ApiState::new(source.clone(), metrics);

    // Handle Ctrl+C for graceful shutdown
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down gracefully...");
    };

    let result = start_api_server(&config.server, state, shutdown).await;

    source.close().await;
    match result {
        Ok(()) => {
            info!("Server shutdown complete");
            Ok(())
        }
        Err(e) => {
            error!("Server error: {}", e);
            Err(e.into())
        }
    }
}

fn init_logging(logging: &LoggingConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_new(&logging.level)
        .map_err(|e| poolsight::PoolsightError::Config(format!("Invalid log level: {}", e)))?;

    let registry = tracing_subscriber::registry().with(env_filter);
    if logging.format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }

    Ok(())
}
