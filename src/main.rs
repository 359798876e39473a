use ledger_core::api::{create_router, AppState};
use ledger_core::clients::{HttpAccountClient, HttpNotificationClient, HttpRecipientClient};
use ledger_core::config::Settings;
use ledger_core::observability::{init_logging, init_metrics, HealthChecker, LogConfig, LogFormat};
use ledger_core::reference::ReferenceGenerator;
use ledger_core::services::TransactionService;
use ledger_core::store::PgLedgerStore;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;

    // Initialize logging
    let log_config = LogConfig {
        level: settings.application.log_level.clone(),
        format: LogFormat::from(settings.application.log_format.as_str()),
        ..LogConfig::default()
    };
    init_logging(&log_config);
    info!("Configuration loaded");

    // Initialize metrics
    let metrics_handle = init_metrics();
    info!("Metrics recorder installed");

    // Connect to PostgreSQL
    info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(settings.database.pool_size)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&settings.database.url)
        .await?;
    info!("Database connection established");

    // Run migrations
    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Migrations applied successfully");

    // Wire the service with its collaborators
    let timeout = settings.collaborators.request_timeout_seconds;
    let store = Arc::new(PgLedgerStore::new(pool.clone()));
    let accounts = Arc::new(HttpAccountClient::new(
        settings.collaborators.account_service_url.clone(),
        timeout,
    ));
    let recipients = Arc::new(HttpRecipientClient::new(
        settings.collaborators.recipient_service_url.clone(),
        timeout,
    ));
    let notifications = Arc::new(HttpNotificationClient::new(
        settings.collaborators.notification_service_url.clone(),
        timeout,
    ));

    let service = Arc::new(TransactionService::new(
        store,
        accounts,
        recipients,
        notifications,
        ReferenceGenerator::new(settings.reference.clone()),
    ));

    let health_checker = Arc::new(HealthChecker::new(pool));

    let state = AppState::new(service)
        .with_metrics(metrics_handle)
        .with_health_checker(health_checker);

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.application.port));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
