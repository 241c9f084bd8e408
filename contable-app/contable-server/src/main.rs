use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use contable_api::{build_router, AppState};
use contable_core::repositories::{DocumentRepository, UserRepository};
use contable_core::services::{AuthService, DocumentService};
use contable_infrastructure::{
    create_pool, run_migrations, PgDocumentRepository, PgUserRepository,
};
use contable_security::JwtService;
use contable_shared::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("failed to load configuration")?;

    // Initialize telemetry; the guard flushes the file log on exit
    let _log_guard = contable_shared::telemetry::init_telemetry(&config.log)?;

    info!("{} starting (env: {})", config.app.name, config.app.env);

    // Connect to Database
    let pool = create_pool(
        &config.database.url,
        config.database.max_connections,
        config.database.acquire_timeout_seconds,
    )
    .await
    .context("failed to connect to database")?;
    info!("Database connection established.");

    run_migrations(&pool).await.context("failed to run migrations")?;

    // Wire repositories and services
    let documents: Arc<dyn DocumentRepository> = Arc::new(PgDocumentRepository::new(pool.clone()));
    let users: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(pool.clone()));
    let jwt = Arc::new(JwtService::from_settings(&config.jwt));
    let auth = Arc::new(AuthService::new(users, jwt.clone()));

    if let Some((username, password)) = config.seed.credentials() {
        if auth.ensure_bootstrap_user(username, password).await? {
            info!("Bootstrap user '{}' created", username);
        }
    }

    let state = AppState {
        documents: Arc::new(DocumentService::new(documents)),
        auth,
        jwt,
    };

    let app = build_router(state, &config.app.allowed_origins);

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
