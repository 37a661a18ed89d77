pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod extract;
pub mod files;
pub mod handlers;
pub mod listing;
pub mod mailer;
pub mod middleware;
pub mod models;
pub mod policy;
pub mod validation;

use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;

/// The assembled application router. Exported so integration tests can drive
/// it with `tower::ServiceExt::oneshot`.
pub fn app() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .nest("/api/v1", api_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

fn api_router() -> Router {
    Router::new()
        .nest("/auth", handlers::auth::router())
        .nest("/user", handlers::user::router())
        .nest("/office", handlers::office::router())
        .nest(
            "/land",
            handlers::land::router()
                .nest("/owner", handlers::land_owner::router())
                .nest("/file", handlers::land_file::land_file_router())
                .nest("/transfer/file", handlers::land_file::transfer_file_router()),
        )
        .nest("/appointment", handlers::appointment::router())
        .nest("/announcement", handlers::announcement::router())
        .nest("/feedback", handlers::feedback::router())
        .nest("/employee", handlers::employee::router())
        .nest("/user-report", handlers::report::router())
}

async fn index() -> Json<serde_json::Value> {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "description": env!("CARGO_PKG_DESCRIPTION"),
    }))
}

async fn health() -> Result<Json<serde_json::Value>, ApiError> {
    database::health_check().await?;
    Ok(Json(json!({ "status": "healthy" })))
}
