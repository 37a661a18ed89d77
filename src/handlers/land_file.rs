use axum::extract::{Multipart, Path};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Extension, Json, Router};
use serde_json::json;
use uuid::Uuid;

use crate::database;
use crate::error::ApiError;
use crate::files;
use crate::middleware::{require_auth, role, AuthActor};
use crate::models::{LandFile, LandTransferFile, Role};
use crate::policy::RecordRule;

const MANAGE: &[Role] = &[Role::SystemAdmin, Role::LandBank];
const READ: &[Role] = &[Role::SystemAdmin, Role::LandBank, Role::Head, Role::Officer];

/// Routes for documents attached to a land record, mounted at `/land/file`.
pub fn land_file_router() -> Router {
    attachment_router(
        post(upload_land_files),
        get(list_land_files),
        delete(remove_land_file),
    )
}

/// Routes for documents attached to a transfer, mounted at `/land/transfer/file`.
pub fn transfer_file_router() -> Router {
    attachment_router(
        post(upload_transfer_files),
        get(list_transfer_files),
        delete(remove_transfer_file),
    )
}

fn attachment_router(
    upload: axum::routing::MethodRouter,
    list: axum::routing::MethodRouter,
    remove: axum::routing::MethodRouter,
) -> Router {
    let manage = Router::new()
        .route("/create/:parent_id", upload)
        .route("/remove/:id", remove)
        .route_layer(from_fn(|req, next| role::check(MANAGE, req, next)))
        .route_layer(from_fn(require_auth));

    let read = Router::new()
        .route("/all/:parent_id", list)
        .route_layer(from_fn(|req, next| role::check(READ, req, next)))
        .route_layer(from_fn(require_auth));

    manage.merge(read)
}

const LAND_FILE_COLUMNS: &str =
    "id, land_id, office_id, file_path, file_url, file_name, file_type, uploaded_at";
const TRANSFER_FILE_COLUMNS: &str =
    "id, land_transfer_id, office_id, file_path, file_url, file_name, file_type, uploaded_at";

fn file_type_of(original_name: &str) -> String {
    std::path::Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("unknown")
        .to_ascii_lowercase()
}

async fn upload_land_files(
    Extension(actor): Extension<AuthActor>,
    Path(land_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = files::read_form(multipart).await?;
    if form.files.is_empty() {
        return Err(ApiError::bad_request("At least one file is required"));
    }

    let pool = database::pool().await?;
    sqlx::query("SELECT id FROM lands WHERE id = $1")
        .bind(land_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Land not found"))?;

    let mut saved = Vec::with_capacity(form.files.len());
    for upload in &form.files {
        let stored = files::store(upload, "land_files").await?;
        let record = sqlx::query_as::<_, LandFile>(&format!(
            "INSERT INTO land_files \
                (id, land_id, office_id, file_path, file_url, file_name, file_type) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {LAND_FILE_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(land_id)
        .bind(actor.office_id)
        .bind(&stored.path)
        .bind(&stored.url)
        .bind(&stored.file_name)
        .bind(file_type_of(&upload.original_name))
        .fetch_one(pool)
        .await?;
        saved.push(record);
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Files uploaded successfully", "files": saved })),
    ))
}

async fn list_land_files(Path(land_id): Path<Uuid>) -> Result<Json<serde_json::Value>, ApiError> {
    let pool = database::pool().await?;
    let rows = sqlx::query_as::<_, LandFile>(&format!(
        "SELECT {LAND_FILE_COLUMNS} FROM land_files WHERE land_id = $1 ORDER BY uploaded_at DESC"
    ))
    .bind(land_id)
    .fetch_all(pool)
    .await?;
    Ok(Json(json!({ "data": rows })))
}

async fn remove_land_file(
    Extension(actor): Extension<AuthActor>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let pool = database::pool().await?;
    let record = sqlx::query_as::<_, LandFile>(&format!(
        "SELECT {LAND_FILE_COLUMNS} FROM land_files WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::not_found("File not found"))?;

    RecordRule::SameOffice {
        office: record.office_id,
    }
    .check(&actor)?;

    sqlx::query("DELETE FROM land_files WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    files::remove_quietly(&record.file_path).await;

    Ok(Json(json!({ "message": "File deleted successfully" })))
}

async fn upload_transfer_files(
    Extension(actor): Extension<AuthActor>,
    Path(transfer_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = files::read_form(multipart).await?;
    if form.files.is_empty() {
        return Err(ApiError::bad_request("At least one file is required"));
    }

    let pool = database::pool().await?;
    sqlx::query("SELECT id FROM land_transfers WHERE id = $1")
        .bind(transfer_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Land transfer not found"))?;

    let mut saved = Vec::with_capacity(form.files.len());
    for upload in &form.files {
        let stored = files::store(upload, "land_transfer_files").await?;
        let record = sqlx::query_as::<_, LandTransferFile>(&format!(
            "INSERT INTO land_transfer_files \
                (id, land_transfer_id, office_id, file_path, file_url, file_name, file_type) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {TRANSFER_FILE_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(transfer_id)
        .bind(actor.office_id)
        .bind(&stored.path)
        .bind(&stored.url)
        .bind(&stored.file_name)
        .bind(file_type_of(&upload.original_name))
        .fetch_one(pool)
        .await?;
        saved.push(record);
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Files uploaded successfully", "files": saved })),
    ))
}

async fn list_transfer_files(
    Path(transfer_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let pool = database::pool().await?;
    let rows = sqlx::query_as::<_, LandTransferFile>(&format!(
        "SELECT {TRANSFER_FILE_COLUMNS} FROM land_transfer_files \
         WHERE land_transfer_id = $1 ORDER BY uploaded_at DESC"
    ))
    .bind(transfer_id)
    .fetch_all(pool)
    .await?;
    Ok(Json(json!({ "data": rows })))
}

async fn remove_transfer_file(
    Extension(actor): Extension<AuthActor>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let pool = database::pool().await?;
    let record = sqlx::query_as::<_, LandTransferFile>(&format!(
        "SELECT {TRANSFER_FILE_COLUMNS} FROM land_transfer_files WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::not_found("File not found"))?;

    RecordRule::SameOffice {
        office: record.office_id,
    }
    .check(&actor)?;

    sqlx::query("DELETE FROM land_transfer_files WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    files::remove_quietly(&record.file_path).await;

    Ok(Json(json!({ "message": "File deleted successfully" })))
}
