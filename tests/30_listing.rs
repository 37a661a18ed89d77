mod common;

use axum::http::StatusCode;

// Pagination bounds are enforced before any query is issued; the public
// notice board is the easiest place to observe that.

#[tokio::test]
async fn negative_skip_is_rejected() {
    let response = common::get("/api/v1/announcement/all?skip=-1").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(response).await;
    assert_eq!(body["message"], "Skip must be greater than or equal to 0");
}

#[tokio::test]
async fn zero_limit_is_rejected() {
    let response = common::get("/api/v1/announcement/all?limit=0").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(response).await;
    assert_eq!(body["message"], "Limit must be between 1 and 100");
}

#[tokio::test]
async fn oversized_limit_is_rejected() {
    let response = common::get("/api/v1/announcement/all?limit=101").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_numeric_paging_values_are_a_bad_request() {
    let response = common::get("/api/v1/announcement/all?limit=ten").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "Bad Request");
}
