use std::future::Future;

use axum::Router;
use configs::AppConfig;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::{routes, state::AppState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Router with every route and layer, ready to serve.
pub fn build_app(state: AppState) -> Router {
    routes::build_router(state, build_cors())
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_app(state);
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    Ok(())
}

/// Open the database, apply migrations, bind and serve until `shutdown` resolves.
pub async fn run<F>(cfg: &AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    common::env::ensure_database_dir(&cfg.database.url).await?;
    let db = models::db::connect_and_migrate(&cfg.database).await?;
    info!(
        event = "database_ready",
        sqlite = cfg.database.is_sqlite(),
        "database connected and migrated"
    );

    let addr = cfg.server.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(event = "listening", addr = %listener.local_addr()?, "fractal api listening");

    serve(listener, AppState::from_db(db), shutdown).await
}
