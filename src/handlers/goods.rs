//! Good handlers. Only the name is updatable; category and price are fixed at creation.

use super::{checked_payload, parse_id};
use crate::error::AppError;
use crate::extractors::JsonObject;
use crate::model::{DeletedGood, NewGood};
use crate::service::{GOOD_SHAPE, GOOD_UPDATE_SHAPE};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

#[derive(Deserialize)]
struct GoodRename {
    product_name: String,
}

pub async fn list_goods(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let rows = state.store.list_goods().await?;
    Ok(Json(rows))
}

pub async fn create_good(
    State(state): State<AppState>,
    body: JsonObject,
) -> Result<impl IntoResponse, AppError> {
    let new: NewGood = checked_payload(body.0, &["product_name", "category_id"], &GOOD_SHAPE)?;
    let row = state.store.create_good(&new).await?;
    tracing::info!(product_id = row.product_id, category_id = row.category_id, "good created");
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_good(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    body: JsonObject,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let rename: GoodRename = checked_payload(body.0, &["product_name"], &GOOD_UPDATE_SHAPE)?;
    let row = state
        .store
        .rename_good(id, &rename.product_name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("good {}", id)))?;
    tracing::info!(product_id = id, "good renamed");
    Ok(Json(row))
}

pub async fn delete_good(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    if !state.store.delete_good(id).await? {
        return Err(AppError::NotFound(format!("good {}", id)));
    }
    tracing::info!(product_id = id, "good deleted");
    Ok(Json(DeletedGood { product_id: id }))
}
