use axum::extract::Path;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Extension, Json, Router};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::database;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiQuery};
use crate::listing::{office_scope, ListQuery, Page, PageParams};
use crate::middleware::{require_auth, role, AuthActor};
use crate::models::{Feedback, FeedbackStatus, FeedbackSummary, Role};
use crate::validation::validate;

const REVIEW: &[Role] = &[Role::Head];

pub fn router() -> Router {
    let review = Router::new()
        .route("/delete/:id", delete(remove))
        .route("/all", get(list))
        .route("/get/:id", get(get_by_id))
        .route_layer(from_fn(|req, next| role::check(REVIEW, req, next)))
        .route_layer(from_fn(require_auth));

    let update = Router::new()
        .route("/update/:id", put(update))
        .route_layer(from_fn(require_auth));

    Router::new()
        .route("/create", post(create))
        .merge(update)
        .merge(review)
}

const FEEDBACK_COLUMNS: &str =
    "id, full_name, email, phone, comment, status, office_id, submitted_at";

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CreateFeedback {
    full_name: Option<String>,
    #[validate(email(message = "Email must be a valid email"))]
    email: Option<String>,
    phone: Option<String>,
    comment: Option<String>,
    office_id: Option<Uuid>,
}

/// Public suggestion box; every field is optional.
async fn create(ApiJson(body): ApiJson<CreateFeedback>) -> Result<impl IntoResponse, ApiError> {
    validate(&body)?;
    let pool = database::pool().await?;
    let feedback = sqlx::query_as::<_, Feedback>(&format!(
        "INSERT INTO feedbacks (id, full_name, email, phone, comment, status, office_id) \
         VALUES ($1, $2, $3, $4, $5, 'PENDING', $6) \
         RETURNING {FEEDBACK_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(&body.full_name)
    .bind(&body.email)
    .bind(&body.phone)
    .bind(&body.comment)
    .bind(body.office_id)
    .fetch_one(pool)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Feedback submitted successfully", "feedback": feedback })),
    ))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct UpdateFeedback {
    full_name: Option<String>,
    #[validate(email(message = "Email must be a valid email"))]
    email: Option<String>,
    phone: Option<String>,
    comment: Option<String>,
    status: Option<FeedbackStatus>,
}

async fn update(
    Path(id): Path<Uuid>,
    ApiJson(body): ApiJson<UpdateFeedback>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate(&body)?;
    let pool = database::pool().await?;
    let feedback = sqlx::query_as::<_, Feedback>(&format!(
        "UPDATE feedbacks SET \
            full_name = COALESCE($2, full_name), \
            email     = COALESCE($3, email), \
            phone     = COALESCE($4, phone), \
            comment   = COALESCE($5, comment), \
            status    = COALESCE($6, status) \
         WHERE id = $1 RETURNING {FEEDBACK_COLUMNS}"
    ))
    .bind(id)
    .bind(body.full_name)
    .bind(body.email)
    .bind(body.phone)
    .bind(body.comment)
    .bind(body.status)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Feedback not found"))?;

    Ok(Json(json!({ "message": "Feedback updated successfully", "feedback": feedback })))
}

async fn remove(Path(id): Path<Uuid>) -> Result<Json<serde_json::Value>, ApiError> {
    let pool = database::pool().await?;
    let deleted = sqlx::query("DELETE FROM feedbacks WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if deleted.rows_affected() == 0 {
        return Err(ApiError::not_found("Feedback not found"));
    }
    Ok(Json(json!({ "message": "Feedback deleted successfully" })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeedbackFilter {
    email: Option<String>,
    phone: Option<String>,
    status: Option<FeedbackStatus>,
    office_id: Option<Uuid>,
    skip: Option<i64>,
    limit: Option<i64>,
}

async fn list(
    Extension(actor): Extension<AuthActor>,
    ApiQuery(filter): ApiQuery<FeedbackFilter>,
) -> Result<Json<Page<FeedbackSummary>>, ApiError> {
    let params = PageParams::new(filter.skip, filter.limit)?;
    let pool = database::pool().await?;
    let page = ListQuery::new(
        "feedbacks",
        &["id", "full_name", "email", "phone", "status", "submitted_at"],
        "submitted_at",
    )
    .contains("email", filter.email)
    .contains("phone", filter.phone)
    .eq_text("status", filter.status.map(|s| s.as_str().to_string()))
    .eq_uuid("office_id", office_scope(actor.office_id, filter.office_id))
    .fetch_page::<FeedbackSummary>(pool, params)
    .await?;

    Ok(Json(page))
}

async fn get_by_id(Path(id): Path<Uuid>) -> Result<Json<Feedback>, ApiError> {
    let pool = database::pool().await?;
    let feedback = sqlx::query_as::<_, Feedback>(&format!(
        "SELECT {FEEDBACK_COLUMNS} FROM feedbacks WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Feedback not found"))?;

    Ok(Json(feedback))
}
