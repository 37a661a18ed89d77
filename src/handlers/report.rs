use axum::extract::Path;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Extension, Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::database;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiQuery};
use crate::listing::{ListQuery, Page, PageParams};
use crate::middleware::{require_auth, AuthActor};
use crate::models::{Role, UserReport};
use crate::policy::RecordRule;
use crate::validation::validate;

pub fn router() -> Router {
    Router::new()
        .route("/create", post(create))
        .route("/update/:id", put(update))
        .route("/delete/:id", delete(remove))
        .route("/all", get(list))
        .route("/get/:id", get(get_by_id))
        .route_layer(from_fn(require_auth))
}

const REPORT_COLUMNS: &str =
    "id, user_id, office_id, start_date, end_date, description, reported_at";

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CreateReport {
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    #[validate(length(min = 1, message = "Description is required"))]
    description: String,
}

async fn create(
    Extension(actor): Extension<AuthActor>,
    ApiJson(body): ApiJson<CreateReport>,
) -> Result<impl IntoResponse, ApiError> {
    validate(&body)?;
    if body.end_date < body.start_date {
        return Err(ApiError::bad_request("End date must be after start date"));
    }

    let pool = database::pool().await?;
    let report = sqlx::query_as::<_, UserReport>(&format!(
        "INSERT INTO user_reports (id, user_id, office_id, start_date, end_date, description) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING {REPORT_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(actor.id)
    .bind(actor.office_id)
    .bind(body.start_date)
    .bind(body.end_date)
    .bind(&body.description)
    .fetch_one(pool)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Report submitted successfully", "report": report })),
    ))
}

async fn fetch_report(id: Uuid) -> Result<UserReport, ApiError> {
    let pool = database::pool().await?;
    sqlx::query_as::<_, UserReport>(&format!(
        "SELECT {REPORT_COLUMNS} FROM user_reports WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Report not found"))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct UpdateReport {
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
    #[validate(length(min = 1, message = "Description is required"))]
    description: Option<String>,
}

async fn update(
    Extension(actor): Extension<AuthActor>,
    Path(id): Path<Uuid>,
    ApiJson(body): ApiJson<UpdateReport>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate(&body)?;
    let existing = fetch_report(id).await?;
    RecordRule::AuthorOnly {
        author: existing.user_id,
    }
    .check(&actor)?;

    let pool = database::pool().await?;
    let report = sqlx::query_as::<_, UserReport>(&format!(
        "UPDATE user_reports SET \
            start_date  = COALESCE($2, start_date), \
            end_date    = COALESCE($3, end_date), \
            description = COALESCE($4, description) \
         WHERE id = $1 RETURNING {REPORT_COLUMNS}"
    ))
    .bind(id)
    .bind(body.start_date)
    .bind(body.end_date)
    .bind(body.description)
    .fetch_one(pool)
    .await?;

    Ok(Json(json!({ "message": "Report updated successfully", "report": report })))
}

async fn remove(
    Extension(actor): Extension<AuthActor>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let existing = fetch_report(id).await?;
    RecordRule::AuthorOnly {
        author: existing.user_id,
    }
    .check(&actor)?;

    let pool = database::pool().await?;
    sqlx::query("DELETE FROM user_reports WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(Json(json!({ "message": "Report deleted successfully" })))
}

#[derive(Debug, Deserialize)]
struct ReportFilter {
    skip: Option<i64>,
    limit: Option<i64>,
}

/// A head sees every report in scope; everyone else only their own.
async fn list(
    Extension(actor): Extension<AuthActor>,
    ApiQuery(filter): ApiQuery<ReportFilter>,
) -> Result<Json<Page<UserReport>>, ApiError> {
    let params = PageParams::new(filter.skip, filter.limit)?;
    let pool = database::pool().await?;

    let mut query = ListQuery::new(
        "user_reports",
        &[
            "id",
            "user_id",
            "office_id",
            "start_date",
            "end_date",
            "description",
            "reported_at",
        ],
        "reported_at",
    );
    if actor.role == Role::Head {
        query = query.eq_uuid("office_id", actor.office_id);
    } else {
        query = query.eq_uuid("user_id", Some(actor.id));
    }
    let page = query.fetch_page::<UserReport>(pool, params).await?;

    Ok(Json(page))
}

async fn get_by_id(
    Extension(actor): Extension<AuthActor>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserReport>, ApiError> {
    let report = fetch_report(id).await?;
    if actor.role != Role::Head {
        RecordRule::AuthorOnly {
            author: report.user_id,
        }
        .check(&actor)?;
    }
    Ok(Json(report))
}
