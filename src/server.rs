//! Reusable battery-swap service runtime.
//!
//! [`ServerHandle`] owns the full server lifecycle: database init,
//! migrations, default admin, services, REST API, booking expiry task,
//! metrics and graceful shutdown.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use crate::application::{
    start_booking_expiry_task, BatteryService, BatterySwapService, BookingPolicy, BookingService,
    PaymentGatewayConfig, PaymentService, PlanService, SlotLockService, StationService,
    SubscriptionService, UserService,
};
use crate::config::AppConfig;
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::database::migrator::Migrator;
use crate::interfaces::http::{create_api_router, ApiContext};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};
use crate::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the service.
pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
    /// Create the default admin user if no user exists (default: true).
    pub create_default_admin: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            create_default_admin: true,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running service.
///
/// ```rust,no_run
/// use evswap::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.shutdown().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    pub repos: Arc<dyn RepositoryProvider>,
    /// The configuration the server was started with.
    pub config: AppConfig,
    pub api_port: u16,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
    expiry_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Start the service with the given options.
    ///
    /// 1. Install the Prometheus metrics recorder
    /// 2. Connect to the database and run migrations
    /// 3. Create the default admin (if enabled)
    /// 4. Start the REST API (with Swagger UI)
    /// 5. Start the booking expiry task
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;
        app_cfg.validate()?;

        info!("Starting EV battery-swap service...");

        let prometheus_handle = prometheus_handle()?;
        info!("📊 Prometheus metrics recorder ready");

        // ── Sub-configs ────────────────────────────────────────
        let db_config = DatabaseConfig {
            url: app_cfg.database.url.clone(),
            max_connections: app_cfg.database.max_connections,
            ..DatabaseConfig::default()
        };

        if app_cfg.security.jwt_secret.is_empty() {
            warn!("security.jwt_secret is empty; tokens will not survive a restart");
        }
        let jwt_config = JwtConfig::new(
            &app_cfg.security.jwt_secret,
            app_cfg.security.jwt_expiration_hours,
        );
        info!(
            "JWT configured with {}h token expiration",
            jwt_config.expiration_hours
        );

        // ── Database ───────────────────────────────────────────
        let db = init_database(&db_config).await?;

        if opts.auto_migrate {
            info!("Running database migrations...");
            Migrator::up(&db, None).await?;
            info!("Migrations completed");
        }

        // ── Repositories & Services ────────────────────────────
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

        let users = Arc::new(UserService::new(repos.clone(), jwt_config.clone()));
        if opts.create_default_admin {
            create_default_admin(&users, &app_cfg).await;
        }

        let slot_lock = SlotLockService::new(repos.clone());
        let policy = BookingPolicy {
            max_days_ahead: app_cfg.booking.max_days_ahead,
            grace_minutes: app_cfg.booking.grace_minutes,
        };
        let bookings = Arc::new(BookingService::new(repos.clone(), slot_lock.clone(), policy));
        let subscriptions = Arc::new(SubscriptionService::new(repos.clone(), slot_lock));
        let payments = Arc::new(PaymentService::new(
            repos.clone(),
            PaymentGatewayConfig {
                gateway_url: app_cfg.payment.gateway_url.clone(),
                merchant_code: app_cfg.payment.merchant_code.clone(),
                secret: app_cfg.payment.secret.clone(),
                return_url: app_cfg.payment.return_url.clone(),
            },
        ));

        let context = ApiContext {
            db: db.clone(),
            jwt_config,
            prometheus_handle,
            users,
            stations: Arc::new(StationService::new(repos.clone())),
            batteries: Arc::new(BatteryService::new(repos.clone())),
            plans: Arc::new(PlanService::new(repos.clone())),
            subscriptions: subscriptions.clone(),
            bookings: bookings.clone(),
            swaps: Arc::new(BatterySwapService::new(repos.clone())),
            payments,
            default_currency: app_cfg.payment.currency.clone(),
        };

        // ── Shutdown coordinator & background tasks ────────────
        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let shutdown_signal = shutdown.signal();

        let expiry_task = start_booking_expiry_task(
            bookings,
            subscriptions,
            shutdown_signal.clone(),
            app_cfg.booking.expiry_check_interval_secs,
        );

        // ── REST API server ────────────────────────────────────
        let api_router = create_api_router(context);

        let api_port = app_cfg.server.api_port;
        let api_addr = app_cfg.api_address();
        let listener = tokio::net::TcpListener::bind(&api_addr).await?;
        info!("REST API server listening on http://{}", api_addr);
        info!("Swagger UI available at http://{}/docs/", api_addr);

        let api_shutdown = shutdown_signal.clone();
        let api_server = axum::serve(
            listener,
            api_router.into_make_service_with_connect_info::<std::net::SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("🛑 REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        info!("🚀 Service started.");

        Ok(Self {
            repos,
            config: app_cfg,
            api_port,
            db,
            shutdown,
            api_task,
            expiry_task,
        })
    }

    /// Get a cloneable shutdown signal.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Trigger graceful shutdown (non-blocking).
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the server to fully stop after shutdown has been triggered.
    ///
    /// Tasks still running after `server.shutdown_timeout` seconds are aborted.
    pub async fn wait(self) {
        info!("⏳ Waiting for server tasks to complete...");
        let timeout = Duration::from_secs(self.shutdown.timeout_secs());

        let api_abort = self.api_task.abort_handle();
        match tokio::time::timeout(timeout, self.api_task).await {
            Ok(Ok(())) => info!("REST API server stopped"),
            Ok(Err(e)) => error!("REST API server task panicked: {}", e),
            Err(_) => {
                warn!("REST API server did not stop in time, aborting");
                api_abort.abort();
            }
        }

        let expiry_abort = self.expiry_task.abort_handle();
        if tokio::time::timeout(timeout, self.expiry_task).await.is_err() {
            warn!("Booking expiry task did not stop in time, aborting");
            expiry_abort.abort();
        }

        if let Err(e) = self.db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("✅ Database connection closed");
        }

        info!("👋 EV battery-swap service shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("🛑 Shutting down EV battery-swap service...");
        self.trigger_shutdown();
        self.wait().await;
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// The global metrics recorder can only be installed once per process;
/// a restart within the same process reuses it.
fn prometheus_handle() -> Result<PrometheusHandle, Box<dyn std::error::Error>> {
    static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    if let Some(handle) = PROM_HANDLE.get() {
        return Ok(handle.clone());
    }
    let handle = PrometheusBuilder::new().install_recorder()?;
    info!("📊 Prometheus metrics recorder installed");
    Ok(PROM_HANDLE.get_or_init(|| handle).clone())
}

/// Create the default admin user if no users exist in the database.
async fn create_default_admin(users: &UserService, app_cfg: &AppConfig) {
    let admin = &app_cfg.admin;
    match users
        .ensure_default_admin(&admin.username, &admin.email, &admin.password)
        .await
    {
        Ok(true) => {
            info!("Default admin created: {}", admin.email);
            info!("⚠️  Please change the admin password immediately!");
        }
        Ok(false) => {}
        Err(e) => error!("Failed to create admin user: {}", e),
    }
}

/// Initialize tracing (logging) from the application config.
///
/// Call this once at process startup (before [`ServerHandle::start`]).
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn free_port() -> u16 {
        std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port()
    }

    fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.server.api_host = "127.0.0.1".to_string();
        config.server.api_port = free_port();
        config.server.shutdown_timeout = 5;
        config.database.url = "sqlite::memory:".to_string();
        config.database.max_connections = 1;
        config.security.jwt_secret = "server-test-secret".to_string();
        config
    }

    #[tokio::test]
    async fn starts_seeds_admin_and_shuts_down() {
        let handle = ServerHandle::start(ServerOptions {
            config: test_config(),
            ..ServerOptions::default()
        })
        .await
        .unwrap();

        let admin = handle
            .repos
            .users()
            .find_by_username(&handle.config.admin.username)
            .await
            .unwrap();
        assert!(admin.is_some());

        let signal = handle.shutdown_signal();
        handle.shutdown().await;
        assert!(signal.is_triggered());
    }

    #[tokio::test]
    async fn invalid_config_is_refused() {
        let mut config = test_config();
        config.booking.max_days_ahead = 0;
        let result = ServerHandle::start(ServerOptions {
            config,
            ..ServerOptions::default()
        })
        .await;
        assert!(result.is_err());
    }
}
