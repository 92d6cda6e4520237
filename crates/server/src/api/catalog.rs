//! Reference data: categories and ticket statuses.

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use std::sync::Arc;
use helpdesk_core::{Category, CategoryId, StatusView};

use super::error::ApiResult;
use crate::state::AppState;

pub async fn list_categories(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Category>>> {
    let categories = state.services().categories.get_categories().await?;
    Ok(Json(categories))
}

pub async fn get_category(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Category>> {
    let Path(id) = path?;
    let category = state
        .services()
        .categories
        .get_category_by_id(CategoryId(id))
        .await?;
    Ok(Json(category))
}

pub async fn list_statuses(State(state): State<Arc<AppState>>) -> Json<Vec<StatusView>> {
    Json(state.services().statuses.get_statuses())
}

pub async fn get_status(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<StatusView>> {
    let Path(id) = path?;
    Ok(Json(state.services().statuses.get_status_by_id(id)?))
}
