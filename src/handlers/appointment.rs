use axum::extract::Path;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
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
use crate::models::{Appointment, AppointmentStatus, AppointmentSummary, Role};
use crate::validation::validate;

const FRONT_DESK: &[Role] = &[Role::Reception];
const COMPLETE: &[Role] = &[Role::SystemAdmin, Role::Head, Role::Officer];
const READ: &[Role] = &[Role::Reception, Role::SystemAdmin, Role::Head, Role::Officer];

pub fn router() -> Router {
    let front_desk = Router::new()
        .route("/approve/:id", patch(approve))
        .route("/reject/:id", patch(reject))
        .route_layer(from_fn(|req, next| role::check(FRONT_DESK, req, next)))
        .route_layer(from_fn(require_auth));

    let complete = Router::new()
        .route("/complete/:id", patch(complete))
        .route_layer(from_fn(|req, next| role::check(COMPLETE, req, next)))
        .route_layer(from_fn(require_auth));

    let cancel = Router::new()
        .route("/cancel/:id", patch(cancel))
        .route_layer(from_fn(require_auth));

    let read = Router::new()
        .route("/all", get(list))
        .route("/get/:id", get(get_by_id))
        .route_layer(from_fn(|req, next| role::check(READ, req, next)))
        .route_layer(from_fn(require_auth));

    Router::new()
        .route("/create", post(create))
        .merge(front_desk)
        .merge(complete)
        .merge(cancel)
        .merge(read)
}

const APPOINTMENT_COLUMNS: &str = "id, first_name, middle_name, last_name, phone, email, address, \
                                   reason, status, rejection_reason, office_id, appointed_at";

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CreateAppointment {
    #[validate(length(min = 1, message = "First name is required"))]
    first_name: String,
    #[validate(length(min = 1, message = "Middle name is required"))]
    middle_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    last_name: String,
    #[validate(length(min = 9, message = "Phone must be at least 9 digits"))]
    phone: String,
    #[validate(email(message = "Email must be a valid email"))]
    email: Option<String>,
    #[validate(length(min = 1, message = "Address is required"))]
    address: String,
    #[validate(length(min = 1, message = "Reason is required"))]
    reason: String,
    office_id: Uuid,
}

/// Public booking endpoint. One pending appointment per phone number.
async fn create(ApiJson(body): ApiJson<CreateAppointment>) -> Result<impl IntoResponse, ApiError> {
    validate(&body)?;
    let pool = database::pool().await?;

    let pending = sqlx::query(
        "SELECT id FROM appointments WHERE phone = $1 AND status = 'PENDING'",
    )
    .bind(&body.phone)
    .fetch_optional(pool)
    .await?;
    if pending.is_some() {
        return Err(ApiError::bad_request(
            "You already have a pending appointment",
        ));
    }

    let appointment = sqlx::query_as::<_, Appointment>(&format!(
        "INSERT INTO appointments \
            (id, first_name, middle_name, last_name, phone, email, address, reason, status, office_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'PENDING', $9) \
         RETURNING {APPOINTMENT_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(&body.first_name)
    .bind(&body.middle_name)
    .bind(&body.last_name)
    .bind(&body.phone)
    .bind(&body.email)
    .bind(&body.address)
    .bind(&body.reason)
    .bind(body.office_id)
    .fetch_one(pool)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Appointment created successfully", "appointment": appointment })),
    ))
}

/// Guarded state transition: the status check and the update are one
/// statement, so a concurrent transition cannot slip between them. No row
/// updated means either an illegal source state (409) or no such
/// appointment (404).
async fn transition(
    id: Uuid,
    target: AppointmentStatus,
    allowed_from: &[AppointmentStatus],
    rejection_reason: Option<&str>,
    conflict_message: &str,
) -> Result<Appointment, ApiError> {
    let sources = allowed_from
        .iter()
        .map(|s| format!("'{}'", s.as_str()))
        .collect::<Vec<_>>()
        .join(", ");

    let pool = database::pool().await?;
    let updated = sqlx::query_as::<_, Appointment>(&format!(
        "UPDATE appointments SET status = $2, rejection_reason = $3 \
         WHERE id = $1 AND status IN ({sources}) \
         RETURNING {APPOINTMENT_COLUMNS}"
    ))
    .bind(id)
    .bind(target)
    .bind(rejection_reason)
    .fetch_optional(pool)
    .await?;

    match updated {
        Some(appointment) => Ok(appointment),
        None => {
            let exists = sqlx::query("SELECT id FROM appointments WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
            if exists.is_some() {
                Err(ApiError::conflict(conflict_message))
            } else {
                Err(ApiError::not_found("Appointment not found"))
            }
        }
    }
}

async fn approve(Path(id): Path<Uuid>) -> Result<Json<serde_json::Value>, ApiError> {
    let appointment = transition(
        id,
        AppointmentStatus::Approved,
        &[AppointmentStatus::Pending, AppointmentStatus::Rejected],
        None,
        "Appointment cannot be approved from its current status",
    )
    .await?;
    Ok(Json(json!({ "message": "Appointment approved successfully", "appointment": appointment })))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct RejectAppointment {
    #[validate(length(min = 1, message = "Rejection reason is required"))]
    rejection_reason: String,
}

async fn reject(
    Path(id): Path<Uuid>,
    ApiJson(body): ApiJson<RejectAppointment>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate(&body)?;
    let appointment = transition(
        id,
        AppointmentStatus::Rejected,
        &[AppointmentStatus::Pending, AppointmentStatus::Approved],
        Some(body.rejection_reason.trim()),
        "Appointment cannot be rejected from its current status",
    )
    .await?;
    Ok(Json(json!({ "message": "Appointment rejected successfully", "appointment": appointment })))
}

async fn complete(Path(id): Path<Uuid>) -> Result<Json<serde_json::Value>, ApiError> {
    let appointment = transition(
        id,
        AppointmentStatus::Completed,
        &[AppointmentStatus::Approved],
        None,
        "Appointment cannot be completed from its current status",
    )
    .await?;
    Ok(Json(json!({ "message": "Appointment completed successfully", "appointment": appointment })))
}

async fn cancel(Path(id): Path<Uuid>) -> Result<Json<serde_json::Value>, ApiError> {
    let appointment = transition(
        id,
        AppointmentStatus::Cancelled,
        &[AppointmentStatus::Pending, AppointmentStatus::Approved],
        None,
        "Appointment cannot be cancelled from its current status",
    )
    .await?;
    Ok(Json(json!({ "message": "Appointment cancelled successfully", "appointment": appointment })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppointmentFilter {
    status: Option<AppointmentStatus>,
    phone: Option<String>,
    email: Option<String>,
    name: Option<String>,
    office_id: Option<Uuid>,
    skip: Option<i64>,
    limit: Option<i64>,
}

async fn list(
    Extension(actor): Extension<AuthActor>,
    ApiQuery(filter): ApiQuery<AppointmentFilter>,
) -> Result<Json<Page<AppointmentSummary>>, ApiError> {
    let params = PageParams::new(filter.skip, filter.limit)?;
    let pool = database::pool().await?;
    let page = ListQuery::new(
        "appointments",
        &[
            "id",
            "first_name",
            "middle_name",
            "last_name",
            "phone",
            "status",
            "appointed_at",
        ],
        "appointed_at",
    )
    .eq_text("status", filter.status.map(|s| s.as_str().to_string()))
    .contains("phone", filter.phone)
    .contains("email", filter.email)
    .contains("first_name", filter.name)
    .eq_uuid("office_id", office_scope(actor.office_id, filter.office_id))
    .fetch_page::<AppointmentSummary>(pool, params)
    .await?;

    Ok(Json(page))
}

async fn get_by_id(Path(id): Path<Uuid>) -> Result<Json<Appointment>, ApiError> {
    let pool = database::pool().await?;
    let appointment = sqlx::query_as::<_, Appointment>(&format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Appointment not found"))?;

    Ok(Json(appointment))
}
