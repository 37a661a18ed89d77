mod common;

use axum::http::StatusCode;
use serde_json::json;

// Validation failures are decided before any persistence call, so these run
// without a database.

#[tokio::test]
async fn appointment_with_empty_first_name_names_the_field() {
    let response = common::post_json(
        "/api/v1/appointment/create",
        json!({
            "firstName": "",
            "middleName": "Kebede",
            "lastName": "Alemu",
            "phone": "0911223344",
            "address": "Bole",
            "reason": "Title deed pickup",
            "officeId": "00000000-0000-0000-0000-000000000001",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "Bad Request");
    assert_eq!(body["message"], "First name is required");
}

#[tokio::test]
async fn appointment_with_missing_field_is_a_bad_request() {
    let response = common::post_json(
        "/api/v1/appointment/create",
        json!({ "firstName": "Abebe" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "Bad Request");
}

#[tokio::test]
async fn appointment_with_short_phone_is_rejected() {
    let response = common::post_json(
        "/api/v1/appointment/create",
        json!({
            "firstName": "Abebe",
            "middleName": "Kebede",
            "lastName": "Alemu",
            "phone": "123",
            "address": "Bole",
            "reason": "Title deed pickup",
            "officeId": "00000000-0000-0000-0000-000000000001",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(response).await;
    assert_eq!(body["message"], "Phone must be at least 9 digits");
}

#[tokio::test]
async fn feedback_with_malformed_email_is_rejected() {
    let response = common::post_json(
        "/api/v1/feedback/create",
        json!({ "fullName": "Sara T", "email": "not-an-email" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(response).await;
    assert_eq!(body["message"], "Email must be a valid email");
}

#[tokio::test]
async fn login_with_empty_password_is_rejected() {
    let response = common::post_json(
        "/api/v1/auth/login",
        json!({ "identifier": "abebe", "password": "" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(response).await;
    assert_eq!(body["message"], "Password is required");
}

// Strength is checked before the reset token is even decoded.
#[tokio::test]
async fn weak_reset_password_is_rejected() {
    let response = common::post_json(
        "/api/v1/auth/reset-password",
        json!({ "token": "whatever", "newPassword": "weak" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(response).await;
    assert_eq!(
        body["message"],
        "Password must be at least 8 characters and include uppercase, lowercase, number and special character"
    );
}
