//! Goods catalog: HTTP JSON API for categories and goods over PostgreSQL.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod service;
pub mod shutdown;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{DatabaseSettings, ServerSettings, Settings};
pub use error::{AppError, ConfigError};
pub use routes::{app, catalog_routes, common_routes};
pub use shutdown::shutdown_signal;
pub use state::AppState;
pub use store::{ensure_tables, CatalogStore, MemoryCatalogStore, PgCatalogStore};
