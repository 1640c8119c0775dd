//! Liveness, readiness and build info for the catalog service.

use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};

/// Readiness of the catalog store. `database` carries the error code of a failed ping,
/// so an exhausted pool and a failing query can be told apart.
#[derive(Serialize, Debug, PartialEq, Eq)]
struct Readiness {
    status: &'static str,
    database: &'static str,
}

impl Readiness {
    fn from_ping(result: Result<(), AppError>) -> (StatusCode, Self) {
        match result {
            Ok(()) => (StatusCode::OK, Readiness { status: "ok", database: "ok" }),
            Err(e) => {
                let (_, code) = e.status_and_code();
                tracing::warn!(error = %e, code, "catalog store not ready");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Readiness {
                        status: "degraded",
                        database: code,
                    },
                )
            }
        }
    }
}

#[derive(Serialize)]
struct BuildInfo {
    name: &'static str,
    version: &'static str,
}

const BUILD_INFO: BuildInfo = BuildInfo {
    name: env!("CARGO_PKG_NAME"),
    version: env!("CARGO_PKG_VERSION"),
};

async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Readiness>) {
    let (status, body) = Readiness::from_ping(state.store.ping().await);
    (status, Json(body))
}

/// GET /health (process is up), GET /ready (store round trip), GET /version.
pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json::<Value>(json!({ "status": "ok" })) }))
        .route("/ready", get(ready))
        .route("/version", get(|| async { Json(BUILD_INFO) }))
        .with_state(state)
}
