//! Integration tests for the HTTP API surface.
//!
//! These run against a router wired with an in-memory notification ledger
//! and a lazy (unconnected) database pool, covering the endpoints that do
//! not require live PostgreSQL.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use devlink_api::AppState;
use devlink_core::config::AppConfig;
use devlink_service::notification::{MemoryNotificationLedger, NotificationService};

fn test_app() -> Router {
    let config = AppConfig::load("test").expect("default config");

    let db_pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy(&config.database.url)
        .expect("lazy pool");

    let notification_service = Arc::new(NotificationService::new(Arc::new(
        MemoryNotificationLedger::new(),
    )));
    let direct_message_service = Arc::new(devlink_service::chat::DirectMessageService::new(
        Arc::new(
            devlink_database::repositories::direct_message::DirectMessageRepository::new(
                db_pool.clone(),
            ),
        ),
    ));
    let community_service = Arc::new(devlink_service::community::CommunityService::new(Arc::new(
        devlink_database::repositories::community::CommunityRepository::new(db_pool.clone()),
    )));

    let realtime = Arc::new(devlink_realtime::RealtimeEngine::new(
        &config.realtime,
        community_service.clone(),
        notification_service.clone(),
    ));

    let state = AppState {
        config: Arc::new(config.clone()),
        db_pool,
        jwt_decoder: Arc::new(devlink_auth::JwtDecoder::new(&config.auth)),
        notification_service,
        direct_message_service,
        community_service,
        realtime,
    };

    devlink_api::build_router(state)
}

fn bearer_token() -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = devlink_auth::Claims {
        sub: uuid::Uuid::new_v4(),
        username: "alice".to_string(),
        iat: now,
        exp: now + 600,
    };
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret("CHANGE_ME_IN_PRODUCTION".as_bytes()),
    )
    .expect("encode token")
}

#[tokio::test]
async fn test_health_check() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_ws_upgrade_without_token() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/ws")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert!(
        response.status() == StatusCode::BAD_REQUEST
            || response.status() == StatusCode::UNAUTHORIZED
            || response.status() == StatusCode::UPGRADE_REQUIRED,
        "Expected 400, 401, or 426, got {}",
        response.status()
    );
}

#[tokio::test]
async fn test_notifications_require_auth() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/notifications")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_empty_inbox_lists_ok() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/notifications")
                .header("authorization", format!("Bearer {}", bearer_token()))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], serde_json::json!([]));
}

#[tokio::test]
async fn test_unread_count_starts_at_zero() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/notifications/unread-count")
                .header("authorization", format!("Bearer {}", bearer_token()))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(body["data"]["count"], 0);
}
