#![allow(dead_code)] // each test binary uses a subset of these helpers

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Build the application router for in-process testing. These tests drive the
/// router directly; they only exercise behaviour that is decided before any
/// database query runs (identity gates, validation, pagination bounds).
pub fn app() -> Router {
    // the config singleton must see a secret before any token is checked
    std::env::set_var("JWT_SECRET", "test-secret");
    sheger_land_api::app()
}

pub async fn send(request: Request<Body>) -> Response<Body> {
    app()
        .oneshot(request)
        .await
        .expect("router call should not fail")
}

pub async fn get(uri: &str) -> Response<Body> {
    send(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request builds"),
    )
    .await
}

pub async fn get_with_auth(uri: &str, authorization: &str) -> Response<Body> {
    send(
        Request::builder()
            .uri(uri)
            .header("authorization", authorization)
            .body(Body::empty())
            .expect("request builds"),
    )
    .await
}

pub async fn post_json(uri: &str, body: serde_json::Value) -> Response<Body> {
    send(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds"),
    )
    .await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is JSON")
}
