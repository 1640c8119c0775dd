//! Server: reads settings from env (and `.env`), opens the pool, ensures tables, serves until signalled.

use goods_catalog::{app, ensure_tables, shutdown_signal, AppState, PgCatalogStore, Settings};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("goods_catalog=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let db = &settings.database;
    let pool = db.pool_options().connect_with(db.connect_options()?).await?;
    tracing::info!(
        max_connections = db.max_connections,
        acquire_timeout_ms = db.acquire_timeout.as_millis() as u64,
        schema = %db.schema,
        "database pool ready"
    );

    if db.ensure_tables {
        ensure_tables(&pool, &db.schema).await?;
    }

    let state = AppState::new(PgCatalogStore::new(pool.clone(), &db.schema));
    let router = app(state, settings.server.body_limit);

    let listener = TcpListener::bind(settings.server.listen_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("pool closed, bye");
    Ok(())
}
