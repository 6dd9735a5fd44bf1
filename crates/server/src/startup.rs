use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging;
use configs::{AppConfig, StoreBackend};
use dotenvy::dotenv;
use migration::MigratorTrait;
use service::news::repo::SeaOrmNewsRepository;
use service::news::repository::memory::MemoryNewsRepository;
use service::NewsRepository;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Connect the configured store; Postgres runs pending migrations first.
pub async fn build_repository(cfg: &AppConfig) -> Result<Arc<dyn NewsRepository>, StartupError> {
    match cfg.store.backend {
        StoreBackend::Postgres => {
            let db = models::db::connect_with_config(&cfg.database)
                .await
                .map_err(|e| StartupError::Database(e.to_string()))?;
            migration::Migrator::up(&db, None)
                .await
                .map_err(|e| StartupError::Database(format!("migrations failed: {e}")))?;
            info!(backend = "postgres", "news store ready");
            let repo: Arc<dyn NewsRepository> = Arc::new(SeaOrmNewsRepository::new(db));
            Ok(repo)
        }
        StoreBackend::Memory => {
            warn!(backend = "memory", "news store is in-memory; data is lost on exit");
            let repo: Arc<dyn NewsRepository> = Arc::new(MemoryNewsRepository::new());
            Ok(repo)
        }
    }
}

/// Resolves on Ctrl+C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "ctrl_c listener failed; shutting down");
    }
    info!("shutdown signal received, draining connections");
}

/// Serve `cfg` until `shutdown` resolves; in-flight requests finish first.
pub async fn serve<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let repo = build_repository(&cfg).await?;
    let app: Router = routes::build_router(build_cors(), ServerState::new(repo));

    let addr = bind_addr(&cfg)?;
    info!(%addr, backend = ?cfg.store.backend, "starting news server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    Ok(())
}

/// Load `.env` and config, then serve until Ctrl+C.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    logging::init_from_env();
    let cfg = AppConfig::load_or_env().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    serve(cfg, shutdown_signal()).await
}
