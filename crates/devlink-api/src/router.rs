//! Route definitions for the DevLink HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's
//! `State` extractor.

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(notification_routes())
        .merge(chat_routes())
        .merge(community_routes())
        .merge(health_routes());

    let ws_routes = Router::new().route("/ws", get(handlers::ws::ws_upgrade));

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .merge(ws_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Notification inbox endpoints.
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            get(handlers::notification::list_notifications),
        )
        .route(
            "/notifications",
            delete(handlers::notification::delete_notifications),
        )
        .route(
            "/notifications/unread-count",
            get(handlers::notification::unread_count),
        )
        .route(
            "/notifications/read-all",
            put(handlers::notification::mark_all_read),
        )
        .route(
            "/notifications/channel/read",
            put(handlers::notification::mark_channel_read),
        )
}

/// Direct messaging endpoints.
fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/chats", get(handlers::direct_message::list_chats))
        .route(
            "/chats/{user_id}/messages",
            get(handlers::direct_message::get_conversation),
        )
        .route(
            "/chats/{user_id}/messages",
            post(handlers::direct_message::send_message),
        )
}

/// Community endpoints.
fn community_routes() -> Router<AppState> {
    Router::new()
        .route("/communities", get(handlers::community::list_communities))
        .route("/communities", post(handlers::community::create_community))
        .route(
            "/communities/search",
            get(handlers::community::search_communities),
        )
        .route("/communities/{id}", get(handlers::community::get_community))
        .route(
            "/communities/{id}/join",
            post(handlers::community::join_community),
        )
        .route(
            "/communities/{id}/leave",
            post(handlers::community::leave_community),
        )
        .route(
            "/communities/{id}/members/{user_id}",
            delete(handlers::community::remove_member),
        )
        .route(
            "/communities/{id}/messages",
            get(handlers::community::list_messages),
        )
        .route(
            "/communities/{id}/messages",
            post(handlers::community::send_message),
        )
}

/// Health check endpoints (no auth required).
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/health/detailed", get(handlers::health::detailed_health))
}

/// Build CORS layer from configuration.
fn build_cors_layer(state: &AppState) -> CorsLayer {
    use axum::http::Method;
    use tower_http::cors::Any;

    let cors_config = &state.config.server.cors;

    let mut cors = CorsLayer::new();

    if cors_config.allowed_origins.contains(&"*".to_string()) {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<axum::http::HeaderValue> = cors_config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    let methods: Vec<Method> = cors_config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    cors = cors.allow_methods(methods);

    if cors_config.allowed_headers.contains(&"*".to_string()) {
        cors = cors.allow_headers(Any);
    }

    cors.max_age(std::time::Duration::from_secs(cors_config.max_age_seconds))
}
