//! EV battery-swap service CLI server
//!
//! Headless REST service suitable for deployment as a systemd service,
//! Docker container, or standalone process.
//!
//! ```sh
//! # Run with default config (~/.config/evswap/config.toml)
//! evswap-service
//!
//! # Custom config path
//! evswap-service --config /etc/evswap/config.toml
//!
//! # Override the API port
//! evswap-service --api-port 8080
//!
//! # Validate config without starting
//! evswap-service --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use evswap::config::AppConfig;
use evswap::server::{init_tracing, ServerHandle, ServerOptions};

/// EV battery-swap service: stations, bookings, subscriptions and payments.
#[derive(Parser, Debug)]
#[command(
    name = "evswap-service",
    version,
    about = "Back-office REST service for an EV battery-swap network",
    long_about = "EV battery-swap service: REST API for stations, batteries, \
                  subscription plans, bookings with slot locking, and payments.\n\n\
                  Default config: ~/.config/evswap/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "EVSWAP_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Skip creating the default admin user.
    #[arg(long)]
    no_admin: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(evswap::default_config_path);

    let loaded = AppConfig::load(&config_path);

    // `--check` reports problems instead of falling back to defaults
    if cli.check {
        return match loaded {
            Ok(mut config) => {
                if let Some(port) = cli.api_port {
                    config.server.api_port = port;
                }
                if let Some(level) = cli.log_level {
                    config.logging.level = level;
                }
                config.validate()?;
                println!("✅ Configuration is valid");
                println!("   Config file : {}", config_path.display());
                println!("   API address : {}", config.api_address());
                println!("   Database    : {}", config.database.url);
                println!("   Log level   : {}", config.logging.level);
                println!("   Gateway     : {}", config.payment.gateway_url);
                Ok(())
            }
            Err(e) => {
                eprintln!("❌ Invalid configuration in {}: {}", config_path.display(), e);
                Err(e.into())
            }
        };
    }

    let mut config = match loaded {
        Ok(mut cfg) => {
            if let Some(ref level) = cli.log_level {
                cfg.logging.level = level.clone();
            }
            // Init tracing first so subsequent logs are formatted properly
            init_tracing(&cfg);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            let mut cfg = AppConfig::default();
            if let Some(ref level) = cli.log_level {
                cfg.logging.level = level.clone();
            }
            init_tracing(&cfg);
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
            cfg
        }
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.api_port {
        info!("CLI override: api_port = {}", port);
        config.server.api_port = port;
    }
    if let Some(ref level) = cli.log_level {
        info!("CLI override: log_level = {}", level);
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        create_default_admin: !cli.no_admin,
    })
    .await?;

    // Install OS signal handlers (SIGTERM, SIGINT)
    handle.install_signal_handler();

    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
