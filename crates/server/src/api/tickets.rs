//! Ticket API handlers.

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
use helpdesk_core::{CategoryId, Page, TicketDetails, TicketId, TicketSummary, UserId};

use super::error::ApiResult;
use super::handlers::{CreatedResponse, PageParams};
use super::middleware::AuthUser;
use crate::metrics::record_ticket_operation;
use crate::state::AppState;

// ============================================================================
// Request Types
// ============================================================================

/// Body of `POST /tickets` and `PUT /tickets/{id}`.
#[derive(Debug, Deserialize)]
pub struct TicketBody {
    pub category_id: i64,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct AssignBody {
    pub assignee_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct CancelBody {
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangeStatusBody {
    pub status_id: i64,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn create_ticket(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    body: Result<Json<TicketBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let Json(body) = body?;
    let id = record_ticket_operation(
        "create",
        state
            .services()
            .tickets
            .create_ticket(user_id, CategoryId(body.category_id), &body.description)
            .await,
    )?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: id.0 })))
}

pub async fn update_ticket(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<TicketBody>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = path?;
    let Json(body) = body?;
    record_ticket_operation(
        "update",
        state
            .services()
            .tickets
            .update_ticket(
                user_id,
                TicketId(id),
                CategoryId(body.category_id),
                &body.description,
            )
            .await,
    )?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_ticket(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<TicketDetails>> {
    let Path(id) = path?;
    let ticket = state
        .services()
        .tickets
        .get_ticket_by_id(user_id, TicketId(id))
        .await?;
    Ok(Json(ticket))
}

/// Tickets visible to the acting user, by ascending id.
pub async fn list_tickets(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    query: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<Page<TicketSummary>>> {
    let Query(params) = query?;
    let (page, page_size) = params.resolve(&state);
    let tickets = state
        .services()
        .tickets
        .get_tickets(user_id, page, page_size)
        .await?;
    Ok(Json(tickets))
}

pub async fn assign_ticket(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<AssignBody>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = path?;
    let Json(body) = body?;
    record_ticket_operation(
        "assign",
        state
            .services()
            .tickets
            .assign_to(user_id, TicketId(id), UserId(body.assignee_id))
            .await,
    )?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn assign_ticket_to_me(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = path?;
    record_ticket_operation(
        "assign_to_me",
        state
            .services()
            .tickets
            .assign_to_me(user_id, TicketId(id))
            .await,
    )?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn complete_ticket(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = path?;
    record_ticket_operation(
        "complete",
        state
            .services()
            .tickets
            .complete_ticket(user_id, TicketId(id))
            .await,
    )?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn cancel_ticket(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<CancelBody>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = path?;
    let Json(body) = body?;
    record_ticket_operation(
        "cancel",
        state
            .services()
            .tickets
            .cancel_ticket(user_id, TicketId(id), &body.reason)
            .await,
    )?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn change_ticket_status(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<ChangeStatusBody>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = path?;
    let Json(body) = body?;
    record_ticket_operation(
        "change_status",
        state
            .services()
            .tickets
            .change_status(user_id, TicketId(id), body.status_id)
            .await,
    )?;
    Ok(StatusCode::NO_CONTENT)
}
