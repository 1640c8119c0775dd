//! Category and good routes. Collection paths answer with and without the trailing slash.

use crate::handlers::{
    create_category, create_good, delete_category, delete_good, list_categories, list_goods, update_category,
    update_good,
};
use crate::state::AppState;
use axum::{
    routing::{get, put},
    Router,
};

pub fn catalog_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/categories/", get(list_categories).post(create_category))
        .route("/api/categories", get(list_categories).post(create_category))
        .route("/api/categories/:id", put(update_category).delete(delete_category))
        .route("/api/goods/", get(list_goods).post(create_good))
        .route("/api/goods", get(list_goods).post(create_good))
        .route("/api/goods/:id", put(update_good).delete(delete_good))
        .with_state(state)
}
