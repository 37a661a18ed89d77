use axum::extract::Path;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::database;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiQuery};
use crate::middleware::{require_auth, role};
use crate::models::{Office, OfficeType, Role};
use crate::validation::validate;

const MANAGE: &[Role] = &[Role::DatabaseAdmin];

pub fn router() -> Router {
    let manage = Router::new()
        .route("/create", post(create))
        .route("/update/:id", put(update))
        .route("/delete/:id", delete(remove))
        .route_layer(from_fn(|req, next| role::check(MANAGE, req, next)))
        .route_layer(from_fn(require_auth));

    Router::new().route("/all", get(list)).merge(manage)
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CreateOffice {
    #[validate(length(min = 1, message = "Office name is required"))]
    name: String,
    #[serde(rename = "type")]
    office_type: OfficeType,
}

async fn create(ApiJson(body): ApiJson<CreateOffice>) -> Result<impl IntoResponse, ApiError> {
    validate(&body)?;
    let pool = database::pool().await?;
    let office = sqlx::query_as::<_, Office>(
        "INSERT INTO offices (id, name, office_type) VALUES ($1, $2, $3) \
         RETURNING id, name, office_type, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(&body.name)
    .bind(body.office_type)
    .fetch_one(pool)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Office created successfully", "office": office })),
    ))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct UpdateOffice {
    #[validate(length(min = 1, message = "Office name is required"))]
    name: Option<String>,
    #[serde(rename = "type")]
    office_type: Option<OfficeType>,
}

async fn update(
    Path(id): Path<Uuid>,
    ApiJson(body): ApiJson<UpdateOffice>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate(&body)?;
    let pool = database::pool().await?;
    let office = sqlx::query_as::<_, Office>(
        "UPDATE offices SET name = COALESCE($2, name), office_type = COALESCE($3, office_type) \
         WHERE id = $1 RETURNING id, name, office_type, created_at",
    )
    .bind(id)
    .bind(body.name)
    .bind(body.office_type)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Office not found"))?;

    Ok(Json(json!({ "message": "Office updated successfully", "office": office })))
}

async fn remove(Path(id): Path<Uuid>) -> Result<Json<serde_json::Value>, ApiError> {
    let pool = database::pool().await?;
    let deleted = sqlx::query("DELETE FROM offices WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|err| {
            if crate::error::is_foreign_key_violation(&err) {
                ApiError::conflict("Office has registered records and cannot be deleted")
            } else {
                err.into()
            }
        })?;
    if deleted.rows_affected() == 0 {
        return Err(ApiError::not_found("Office not found"));
    }
    Ok(Json(json!({ "message": "Office deleted successfully" })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OfficeFilter {
    #[serde(rename = "type")]
    office_type: Option<OfficeType>,
}

/// Public tenant directory; small and unpaginated.
async fn list(ApiQuery(filter): ApiQuery<OfficeFilter>) -> Result<Json<serde_json::Value>, ApiError> {
    let pool = database::pool().await?;
    let offices = match filter.office_type {
        Some(kind) => {
            sqlx::query_as::<_, Office>(
                "SELECT id, name, office_type, created_at FROM offices \
                 WHERE office_type = $1 ORDER BY created_at DESC",
            )
            .bind(kind)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Office>(
                "SELECT id, name, office_type, created_at FROM offices ORDER BY created_at DESC",
            )
            .fetch_all(pool)
            .await?
        }
    };
    Ok(Json(json!({ "data": offices })))
}
