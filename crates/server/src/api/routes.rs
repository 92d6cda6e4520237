use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::middleware::{auth_middleware, metrics_middleware};
use super::{catalog, handlers, tickets, users};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Reachable without credentials
    let public_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/users", post(users::register));

    let protected_routes = Router::new()
        // Users
        .route("/users", get(users::list_users))
        .route("/users/me", get(users::get_me).put(users::update_me))
        .route("/users/me/password", put(users::change_my_password))
        .route("/users/{id}", get(users::get_user))
        // Reference data
        .route("/categories", get(catalog::list_categories))
        .route("/categories/{id}", get(catalog::get_category))
        .route("/statuses", get(catalog::list_statuses))
        .route("/statuses/{id}", get(catalog::get_status))
        // Tickets
        .route("/tickets", get(tickets::list_tickets).post(tickets::create_ticket))
        .route("/tickets/{id}", get(tickets::get_ticket).put(tickets::update_ticket))
        .route("/tickets/{id}/assign", post(tickets::assign_ticket))
        .route("/tickets/{id}/assign/me", post(tickets::assign_ticket_to_me))
        .route("/tickets/{id}/complete", post(tickets::complete_ticket))
        .route("/tickets/{id}/cancel", post(tickets::cancel_ticket))
        .route("/tickets/{id}/status", post(tickets::change_ticket_status))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_routes = public_routes.merge(protected_routes).with_state(state);

    Router::new()
        .route("/metrics", get(handlers::metrics))
        .nest("/api/v1", api_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
