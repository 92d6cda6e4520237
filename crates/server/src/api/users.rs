//! User API handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use helpdesk_core::{Page, UserDetails, UserId, UserSummary};

use super::error::ApiResult;
use super::handlers::{CreatedResponse, PageParams};
use super::middleware::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileBody {
    pub name: String,
    pub surname: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordBody {
    pub password: String,
}

/// Self-service registration. Does not require authentication.
pub async fn register(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RegisterBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let Json(body) = body?;
    let id = state
        .services()
        .users
        .register(&body.name, &body.surname, &body.email, &body.password)
        .await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: id.0 })))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    query: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<Page<UserSummary>>> {
    let Query(params) = query?;
    let (page, page_size) = params.resolve(&state);
    let users = state
        .services()
        .users
        .get_users(user_id, page, page_size)
        .await?;
    Ok(Json(users))
}

pub async fn get_me(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<UserDetails>> {
    let user = state
        .services()
        .users
        .get_user_by_id(user_id, user_id)
        .await?;
    Ok(Json(user))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<UserDetails>> {
    let Path(id) = path?;
    let user = state
        .services()
        .users
        .get_user_by_id(user_id, UserId(id))
        .await?;
    Ok(Json(user))
}

pub async fn update_me(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    body: Result<Json<UpdateProfileBody>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(body) = body?;
    state
        .services()
        .users
        .update_user(user_id, &body.name, &body.surname)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn change_my_password(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    body: Result<Json<ChangePasswordBody>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(body) = body?;
    state
        .services()
        .users
        .change_password(user_id, &body.password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
