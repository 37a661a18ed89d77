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
use crate::middleware::{maybe_auth, require_auth, role, AuthActor};
use crate::models::{Announcement, AnnouncementStatus, AnnouncementSummary, Role};
use crate::policy::RecordRule;
use crate::validation::validate;

const MANAGE: &[Role] = &[Role::Head, Role::SystemAdmin, Role::Officer];

pub fn router() -> Router {
    let manage = Router::new()
        .route("/create", post(create))
        .route("/update/:id", put(update))
        .route("/delete/:id", delete(remove))
        .route_layer(from_fn(|req, next| role::check(MANAGE, req, next)))
        .route_layer(from_fn(require_auth));

    // the notice board is public; a signed-in tenant caller sees their office
    let board = Router::new()
        .route("/all", get(list))
        .route_layer(from_fn(maybe_auth));

    Router::new()
        .route("/get/:id", get(get_by_id))
        .merge(board)
        .merge(manage)
}

const ANNOUNCEMENT_COLUMNS: &str = "id, title, description, number, stamp_file, signature_file, \
                                    status, publisher_id, auditor_id, office_id, created_at, \
                                    updated_at";

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CreateAnnouncement {
    #[validate(length(min = 1, message = "Title is required"))]
    title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    description: String,
    number: i64,
    stamp_file: Option<String>,
    signature_file: Option<String>,
    status: Option<AnnouncementStatus>,
}

async fn create(
    Extension(actor): Extension<AuthActor>,
    ApiJson(body): ApiJson<CreateAnnouncement>,
) -> Result<impl IntoResponse, ApiError> {
    validate(&body)?;
    let pool = database::pool().await?;
    let announcement = sqlx::query_as::<_, Announcement>(&format!(
        "INSERT INTO announcements \
            (id, title, description, number, stamp_file, signature_file, status, publisher_id, office_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         RETURNING {ANNOUNCEMENT_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(&body.title)
    .bind(&body.description)
    .bind(body.number)
    .bind(&body.stamp_file)
    .bind(&body.signature_file)
    .bind(body.status.unwrap_or(AnnouncementStatus::Draft))
    .bind(actor.id)
    .bind(actor.office_id)
    .fetch_one(pool)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Announcement created successfully",
            "announcement": announcement,
        })),
    ))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct UpdateAnnouncement {
    #[validate(length(min = 1, message = "Title is required"))]
    title: Option<String>,
    #[validate(length(min = 1, message = "Description is required"))]
    description: Option<String>,
    number: Option<i64>,
    stamp_file: Option<String>,
    signature_file: Option<String>,
    status: Option<AnnouncementStatus>,
}

/// Updates record the acting user as auditor.
async fn update(
    Extension(actor): Extension<AuthActor>,
    Path(id): Path<Uuid>,
    ApiJson(body): ApiJson<UpdateAnnouncement>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate(&body)?;
    let pool = database::pool().await?;
    let announcement = sqlx::query_as::<_, Announcement>(&format!(
        "UPDATE announcements SET \
            title          = COALESCE($2, title), \
            description    = COALESCE($3, description), \
            number         = COALESCE($4, number), \
            stamp_file     = COALESCE($5, stamp_file), \
            signature_file = COALESCE($6, signature_file), \
            status         = COALESCE($7, status), \
            auditor_id     = $8, \
            updated_at     = NOW() \
         WHERE id = $1 RETURNING {ANNOUNCEMENT_COLUMNS}"
    ))
    .bind(id)
    .bind(body.title)
    .bind(body.description)
    .bind(body.number)
    .bind(body.stamp_file)
    .bind(body.signature_file)
    .bind(body.status)
    .bind(actor.id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Announcement not found"))?;

    Ok(Json(json!({
        "message": "Announcement updated successfully",
        "announcement": announcement,
    })))
}

/// Only the publishing user may take an announcement down.
async fn remove(
    Extension(actor): Extension<AuthActor>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let pool = database::pool().await?;
    let announcement = sqlx::query_as::<_, Announcement>(&format!(
        "SELECT {ANNOUNCEMENT_COLUMNS} FROM announcements WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Announcement not found"))?;

    RecordRule::AuthorOnly {
        author: announcement.publisher_id,
    }
    .check(&actor)?;

    sqlx::query("DELETE FROM announcements WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(Json(json!({ "message": "Announcement deleted successfully" })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnouncementFilter {
    title: Option<String>,
    status: Option<AnnouncementStatus>,
    number: Option<i64>,
    office_id: Option<Uuid>,
    skip: Option<i64>,
    limit: Option<i64>,
}

async fn list(
    actor: Option<Extension<AuthActor>>,
    ApiQuery(filter): ApiQuery<AnnouncementFilter>,
) -> Result<Json<Page<AnnouncementSummary>>, ApiError> {
    let params = PageParams::new(filter.skip, filter.limit)?;
    let actor_office = actor.and_then(|Extension(a)| a.office_id);

    let pool = database::pool().await?;
    let page = ListQuery::new(
        "announcements",
        &["id", "title", "number", "status", "office_id", "created_at"],
        "created_at",
    )
    .contains("title", filter.title)
    .eq_text("status", filter.status.map(|s| s.as_str().to_string()))
    .eq_int("number", filter.number)
    .eq_uuid("office_id", office_scope(actor_office, filter.office_id))
    .fetch_page::<AnnouncementSummary>(pool, params)
    .await?;

    Ok(Json(page))
}

async fn get_by_id(Path(id): Path<Uuid>) -> Result<Json<Announcement>, ApiError> {
    let pool = database::pool().await?;
    let announcement = sqlx::query_as::<_, Announcement>(&format!(
        "SELECT {ANNOUNCEMENT_COLUMNS} FROM announcements WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Announcement not found"))?;

    Ok(Json(announcement))
}
