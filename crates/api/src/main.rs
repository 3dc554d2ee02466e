use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use pressgrid_api::config::ServerConfig;
use pressgrid_api::router::build_app_router;
use pressgrid_api::{background, state::AppState};
use pressgrid_db::repositories::{CategoryStore, MemoryCategoryStore, PgCategoryStore};
use pressgrid_files::LocalFileStore;
use pressgrid_grid::GridController;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type StartupResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

#[tokio::main]
async fn main() -> StartupResult<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pressgrid_api=debug,tower_http=debug".into());
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // --- Configuration ---
    let config = ServerConfig::from_env()?;
    tracing::info!(
        host = %config.host,
        port = %config.port,
        delete_policy = config.grid.delete_policy.name(),
        primary_locale = %config.grid.primary_locale,
        "Loaded server configuration"
    );

    // --- Category store ---
    let store = open_store(&config).await?;

    // --- File store ---
    let files = Arc::new(LocalFileStore::open(&config.upload_dir, config.max_upload_bytes).await?);

    // --- App state ---
    let grid = Arc::new(GridController::new(store, files, config.grid.clone()));
    let state = AppState {
        grid: Arc::clone(&grid),
        config: Arc::new(config.clone()),
    };

    // --- Background jobs ---
    let cancel = CancellationToken::new();
    let purge_handle = tokio::spawn(background::upload_purge::run(
        Arc::clone(&grid),
        Duration::from_secs(config.temp_file_max_age_secs),
        Duration::from_secs(config.upload_purge_interval_secs),
        cancel.clone(),
    ));

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(config.host.parse()?, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");
    cancel.cancel();
    let drain = Duration::from_secs(config.shutdown_timeout_secs);
    if tokio::time::timeout(drain, purge_handle).await.is_err() {
        tracing::warn!("Upload purge job did not stop in time");
    }

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Postgres when `DATABASE_URL` is set, otherwise the in-memory store.
async fn open_store(config: &ServerConfig) -> StartupResult<Arc<dyn CategoryStore>> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set; categories are kept in memory and lost on restart");
        return Ok(Arc::new(MemoryCategoryStore::new()));
    };

    let pool = pressgrid_db::create_pool(database_url).await?;
    tracing::info!("Database connection pool created");

    pressgrid_db::health_check(&pool).await?;
    tracing::info!("Database health check passed");

    pressgrid_db::run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(Arc::new(PgCategoryStore::new(pool)))
}

/// Wait for SIGINT or SIGTERM to initiate graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
