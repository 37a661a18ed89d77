use axum::extract::Path;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::routing::{delete, post, put};
use axum::{Extension, Json, Router};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{
    hash_password, is_strong_password, sign_token, verify_password, verify_token, Claims,
    ResetClaims,
};
use crate::config::config;
use crate::database;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::mailer;
use crate::middleware::{require_auth, role, AuthActor};
use crate::models::{PublicUser, Role, User, UserStatus};
use crate::validation::validate;

const REGISTER: &[Role] = &[Role::DatabaseAdmin];
const REMOVE: &[Role] = &[Role::DatabaseAdmin];

const WEAK_PASSWORD: &str =
    "Password must be at least 8 characters and include uppercase, lowercase, number and special character";

pub fn router() -> Router {
    let admin = Router::new()
        .route("/register", post(register))
        .route_layer(from_fn(|req, next| role::check(REGISTER, req, next)))
        .route_layer(from_fn(require_auth));

    let remove = Router::new()
        .route("/remove/:user_id", delete(remove_user))
        .route_layer(from_fn(|req, next| role::check(REMOVE, req, next)))
        .route_layer(from_fn(require_auth));

    let authenticated = Router::new()
        .route("/update-password", post(update_password))
        .route("/update/:user_id", put(update_user))
        .route_layer(from_fn(require_auth));

    Router::new()
        .route("/login", post(login))
        .route("/request-password-reset", post(request_password_reset))
        .route("/reset-password", post(reset_password))
        .merge(admin)
        .merge(remove)
        .merge(authenticated)
}

const USER_COLUMNS: &str = "id, first_name, middle_name, last_name, email, phone, username, \
                            password, role, status, office_id, created_at, updated_at";

async fn fetch_user(id: Uuid) -> Result<Option<User>, ApiError> {
    let pool = database::pool().await?;
    let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct RegisterUser {
    #[validate(length(min = 1, message = "First name is required"))]
    first_name: String,
    #[validate(length(min = 1, message = "Middle name is required"))]
    middle_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    last_name: String,
    #[validate(email(message = "Email must be a valid email"))]
    email: String,
    #[validate(length(min = 9, message = "Phone must be at least 9 digits"))]
    phone: String,
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    username: String,
    password: String,
    role: Role,
    office_id: Option<Uuid>,
}

async fn register(ApiJson(body): ApiJson<RegisterUser>) -> Result<impl IntoResponse, ApiError> {
    validate(&body)?;
    if !is_strong_password(&body.password) {
        return Err(ApiError::bad_request(WEAK_PASSWORD));
    }

    let pool = database::pool().await?;
    let user = sqlx::query_as::<_, PublicUser>(
        "INSERT INTO users \
            (id, first_name, middle_name, last_name, email, phone, username, password, role, status, office_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'ACTIVE', $10) \
         RETURNING id, first_name, middle_name, last_name, email, phone, username, role, status, \
                   office_id, created_at, updated_at",
    )
    .bind(Uuid::new_v4())
    .bind(&body.first_name)
    .bind(&body.middle_name)
    .bind(&body.last_name)
    .bind(&body.email)
    .bind(&body.phone)
    .bind(&body.username)
    .bind(hash_password(&body.password)?)
    .bind(body.role)
    .bind(body.office_id)
    .fetch_one(pool)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully", "user": user })),
    ))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct LoginRequest {
    /// Email address or username.
    #[validate(length(min = 1, message = "Identifier is required"))]
    identifier: String,
    #[validate(length(min = 1, message = "Password is required"))]
    password: String,
}

async fn login(ApiJson(body): ApiJson<LoginRequest>) -> Result<Json<serde_json::Value>, ApiError> {
    validate(&body)?;
    let pool = database::pool().await?;
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = $1 OR username = $1"
    ))
    .bind(&body.identifier)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::not_found("User not found"))?;

    if user.status.blocks_authentication() {
        return Err(ApiError::unauthorized(
            "Your account is currently deactivated. Please contact support for assistance.",
        ));
    }

    let valid = user
        .password
        .as_deref()
        .map(|hash| verify_password(&body.password, hash))
        .unwrap_or(false);
    if !valid {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = sign_token(&Claims::new(user.id, user.role.to_string()))?;
    Ok(Json(json!({
        "message": "Login successful",
        "token": token,
        "user": PublicUser::from(user),
    })))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct UpdatePassword {
    #[validate(length(min = 1, message = "Old password is required"))]
    old_password: String,
    new_password: String,
}

async fn update_password(
    Extension(actor): Extension<AuthActor>,
    ApiJson(body): ApiJson<UpdatePassword>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate(&body)?;
    if !is_strong_password(&body.new_password) {
        return Err(ApiError::bad_request(WEAK_PASSWORD));
    }

    let user = fetch_user(actor.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    let old_ok = user
        .password
        .as_deref()
        .map(|hash| verify_password(&body.old_password, hash))
        .unwrap_or(false);
    if !old_ok {
        return Err(ApiError::unauthorized("Incorrect old password"));
    }

    let pool = database::pool().await?;
    sqlx::query("UPDATE users SET password = $2, updated_at = NOW() WHERE id = $1")
        .bind(actor.id)
        .bind(hash_password(&body.new_password)?)
        .execute(pool)
        .await?;

    Ok(Json(json!({ "message": "Password updated successfully" })))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct UpdateUser {
    #[validate(length(min = 1, message = "First name is required"))]
    first_name: Option<String>,
    #[validate(length(min = 1, message = "Middle name is required"))]
    middle_name: Option<String>,
    #[validate(length(min = 1, message = "Last name is required"))]
    last_name: Option<String>,
    #[validate(email(message = "Email must be a valid email"))]
    email: Option<String>,
    #[validate(length(min = 9, message = "Phone must be at least 9 digits"))]
    phone: Option<String>,
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    username: Option<String>,
    role: Option<Role>,
    status: Option<UserStatus>,
    office_id: Option<Uuid>,
}

async fn update_user(
    Path(user_id): Path<Uuid>,
    ApiJson(body): ApiJson<UpdateUser>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate(&body)?;
    let pool = database::pool().await?;
    let user = sqlx::query_as::<_, PublicUser>(
        "UPDATE users SET \
            first_name  = COALESCE($2, first_name), \
            middle_name = COALESCE($3, middle_name), \
            last_name   = COALESCE($4, last_name), \
            email       = COALESCE($5, email), \
            phone       = COALESCE($6, phone), \
            username    = COALESCE($7, username), \
            role        = COALESCE($8, role), \
            status      = COALESCE($9, status), \
            office_id   = COALESCE($10, office_id), \
            updated_at  = NOW() \
         WHERE id = $1 \
         RETURNING id, first_name, middle_name, last_name, email, phone, username, role, status, \
                   office_id, created_at, updated_at",
    )
    .bind(user_id)
    .bind(body.first_name)
    .bind(body.middle_name)
    .bind(body.last_name)
    .bind(body.email)
    .bind(body.phone)
    .bind(body.username)
    .bind(body.role)
    .bind(body.status)
    .bind(body.office_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(json!({ "message": "User updated successfully", "user": user })))
}

async fn remove_user(Path(user_id): Path<Uuid>) -> Result<Json<serde_json::Value>, ApiError> {
    let pool = database::pool().await?;
    let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await
        .map_err(|err| {
            if crate::error::is_foreign_key_violation(&err) {
                ApiError::conflict("User has registered records and cannot be deleted")
            } else {
                err.into()
            }
        })?;
    if deleted.rows_affected() == 0 {
        return Err(ApiError::not_found("User not found"));
    }
    Ok(Json(json!({ "message": "User removed successfully" })))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct RequestPasswordReset {
    #[validate(email(message = "Email must be a valid email"))]
    email: String,
}

async fn request_password_reset(
    ApiJson(body): ApiJson<RequestPasswordReset>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate(&body)?;
    let pool = database::pool().await?;
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
    ))
    .bind(&body.email)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::not_found("User not found"))?;

    let token = sign_token(&ResetClaims::new(user.id))?;
    let link = format!(
        "{}/reset-password?token={}",
        config().smtp.client_domain.trim_end_matches('/'),
        token
    );
    mailer::send_text_email(
        &user.email,
        "Password reset",
        format!(
            "Hello {},\n\nUse the link below to reset your password. It expires in one hour.\n\n{}\n",
            user.first_name, link
        ),
    )
    .await?;

    Ok(Json(json!({ "message": "Password reset email sent" })))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct ResetPassword {
    #[validate(length(min = 1, message = "Token is required"))]
    token: String,
    new_password: String,
}

async fn reset_password(
    ApiJson(body): ApiJson<ResetPassword>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate(&body)?;
    if !is_strong_password(&body.new_password) {
        return Err(ApiError::bad_request(WEAK_PASSWORD));
    }

    let claims: ResetClaims = verify_token(&body.token)?;
    let pool = database::pool().await?;
    let updated = sqlx::query("UPDATE users SET password = $2, updated_at = NOW() WHERE id = $1")
        .bind(claims.user_id)
        .bind(hash_password(&body.new_password)?)
        .execute(pool)
        .await?;
    if updated.rows_affected() == 0 {
        return Err(ApiError::not_found("User not found"));
    }

    Ok(Json(json!({ "message": "Password reset successfully" })))
}
