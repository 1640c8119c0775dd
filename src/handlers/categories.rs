//! Category handlers: list, create, rename, delete.

use super::{checked_payload, parse_id};
use crate::error::AppError;
use crate::extractors::JsonObject;
use crate::model::{DeletedCategory, NewCategory};
use crate::service::CATEGORY_SHAPE;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

const REQUIRED: &[&str] = &["category_name"];

pub async fn list_categories(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let rows = state.store.list_categories().await?;
    Ok(Json(rows))
}

pub async fn create_category(
    State(state): State<AppState>,
    body: JsonObject,
) -> Result<impl IntoResponse, AppError> {
    let new: NewCategory = checked_payload(body.0, REQUIRED, &CATEGORY_SHAPE)?;
    let row = state.store.create_category(&new).await?;
    tracing::info!(category_id = row.category_id, "category created");
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    body: JsonObject,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let new: NewCategory = checked_payload(body.0, REQUIRED, &CATEGORY_SHAPE)?;
    let row = state
        .store
        .rename_category(id, &new.category_name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category {}", id)))?;
    tracing::info!(category_id = id, "category renamed");
    Ok(Json(row))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    if !state.store.delete_category(id).await? {
        return Err(AppError::NotFound(format!("category {}", id)));
    }
    tracing::info!(category_id = id, "category deleted");
    Ok(Json(DeletedCategory { category_id: id }))
}
