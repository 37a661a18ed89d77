use axum::extract::{Multipart, Path};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use sqlx::Row;
use uuid::Uuid;

use crate::database;
use crate::error::ApiError;
use crate::extract::ApiQuery;
use crate::files::{self, MultipartForm};
use crate::listing::{ListQuery, Page, PageParams};
use crate::middleware::{require_auth, role};
use crate::models::{Gender, LandOwner, LandOwnerSummary, OwnerLandHistoryRow, Role};

const MANAGE: &[Role] = &[Role::SystemAdmin];
const READ: &[Role] = &[
    Role::SystemAdmin,
    Role::LandBank,
    Role::Head,
    Role::Officer,
    Role::Other,
];
const HISTORY: &[Role] = &[Role::SystemAdmin, Role::LandBank, Role::Head, Role::Officer];

const NATIONAL_ID_DIR: &str = "national_ids";

pub fn router() -> Router {
    let manage = Router::new()
        .route("/create", post(create))
        .route("/update/:id", put(update))
        .route("/remove/:id", delete(remove))
        .route_layer(from_fn(|req, next| role::check(MANAGE, req, next)))
        .route_layer(from_fn(require_auth));

    let read = Router::new()
        .route("/all", get(list))
        .route("/get/:id", get(get_by_id))
        .route_layer(from_fn(|req, next| role::check(READ, req, next)))
        .route_layer(from_fn(require_auth));

    let history = Router::new()
        .route("/land/history/:owner_id", get(land_history))
        .route_layer(from_fn(|req, next| role::check(HISTORY, req, next)))
        .route_layer(from_fn(require_auth));

    manage.merge(read).merge(history)
}

const OWNER_COLUMNS: &str = "id, first_name, middle_name, last_name, gender, phone, email, \
                             national_id_url, created_at, updated_at";

fn parse_gender(form: &MultipartForm) -> Result<Gender, ApiError> {
    match form.field("gender") {
        Some("MALE") => Ok(Gender::Male),
        Some("FEMALE") => Ok(Gender::Female),
        Some(_) => Err(ApiError::bad_request("Gender must be MALE or FEMALE")),
        None => Err(ApiError::bad_request("Gender is required")),
    }
}

fn required<'a>(form: &'a MultipartForm, name: &str, message: &str) -> Result<&'a str, ApiError> {
    form.field(name)
        .ok_or_else(|| ApiError::bad_request(message))
}

/// National-id scans arrive alongside the text fields, so registration is a
/// multipart form rather than JSON.
async fn create(multipart: Multipart) -> Result<impl IntoResponse, ApiError> {
    let form = files::read_form(multipart).await?;
    let first_name = required(&form, "firstName", "First name is required")?;
    let middle_name = required(&form, "middleName", "Middle name is required")?;
    let last_name = required(&form, "lastName", "Last name is required")?;
    let phone = required(&form, "phone", "Phone is required")?;
    let gender = parse_gender(&form)?;
    let email = form.field("email");

    let national_id_url = match form.files.first() {
        Some(file) => Some(files::store(file, NATIONAL_ID_DIR).await?.url),
        None => None,
    };

    let pool = database::pool().await?;
    let owner = sqlx::query_as::<_, LandOwner>(&format!(
        "INSERT INTO land_owners \
            (id, first_name, middle_name, last_name, gender, phone, email, national_id_url) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING {OWNER_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(first_name)
    .bind(middle_name)
    .bind(last_name)
    .bind(gender)
    .bind(phone)
    .bind(email)
    .bind(national_id_url)
    .fetch_one(pool)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Land owner registered successfully", "landOwner": owner })),
    ))
}

async fn update(
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let form = files::read_form(multipart).await?;
    let gender = match form.field("gender") {
        Some(_) => Some(parse_gender(&form)?),
        None => None,
    };

    let pool = database::pool().await?;
    let existing = sqlx::query_as::<_, LandOwner>(&format!(
        "SELECT {OWNER_COLUMNS} FROM land_owners WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Land owner not found"))?;

    let new_id_url = match form.files.first() {
        Some(file) => Some(files::store(file, NATIONAL_ID_DIR).await?.url),
        None => None,
    };

    let owner = sqlx::query_as::<_, LandOwner>(&format!(
        "UPDATE land_owners SET \
            first_name      = COALESCE($2, first_name), \
            middle_name     = COALESCE($3, middle_name), \
            last_name       = COALESCE($4, last_name), \
            gender          = COALESCE($5, gender), \
            phone           = COALESCE($6, phone), \
            email           = COALESCE($7, email), \
            national_id_url = COALESCE($8, national_id_url), \
            updated_at      = NOW() \
         WHERE id = $1 RETURNING {OWNER_COLUMNS}"
    ))
    .bind(id)
    .bind(form.field("firstName"))
    .bind(form.field("middleName"))
    .bind(form.field("lastName"))
    .bind(gender)
    .bind(form.field("phone"))
    .bind(form.field("email"))
    .bind(new_id_url.as_deref())
    .fetch_one(pool)
    .await?;

    // replaced scan is unlinked after the row is safely updated
    if new_id_url.is_some() {
        if let Some(old_url) = existing.national_id_url {
            if let Some(path) = files::path_for_url(&old_url) {
                files::remove_quietly(&path.to_string_lossy()).await;
            }
        }
    }

    Ok(Json(json!({ "message": "Land owner updated successfully", "landOwner": owner })))
}

async fn remove(Path(id): Path<Uuid>) -> Result<Json<serde_json::Value>, ApiError> {
    let pool = database::pool().await?;
    let deleted = sqlx::query("DELETE FROM land_owners WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|err| {
            if crate::error::is_foreign_key_violation(&err) {
                ApiError::conflict("Land owner has registered lands and cannot be deleted")
            } else {
                err.into()
            }
        })?;
    if deleted.rows_affected() == 0 {
        return Err(ApiError::not_found("Land owner not found"));
    }
    Ok(Json(json!({ "message": "Land owner deleted successfully" })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OwnerFilter {
    name: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    skip: Option<i64>,
    limit: Option<i64>,
}

async fn list(
    ApiQuery(filter): ApiQuery<OwnerFilter>,
) -> Result<Json<Page<LandOwnerSummary>>, ApiError> {
    let params = PageParams::new(filter.skip, filter.limit)?;
    let pool = database::pool().await?;
    let page = ListQuery::new(
        "land_owners",
        &[
            "id",
            "first_name",
            "middle_name",
            "last_name",
            "gender",
            "phone",
            "national_id_url",
        ],
        "created_at",
    )
    .contains("first_name", filter.name)
    .contains("phone", filter.phone)
    .contains("email", filter.email)
    .fetch_page::<LandOwnerSummary>(pool, params)
    .await?;

    Ok(Json(page))
}

async fn get_by_id(Path(id): Path<Uuid>) -> Result<Json<LandOwner>, ApiError> {
    let pool = database::pool().await?;
    let owner = sqlx::query_as::<_, LandOwner>(&format!(
        "SELECT {OWNER_COLUMNS} FROM land_owners WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Land owner not found"))?;

    Ok(Json(owner))
}

#[derive(Debug, Deserialize)]
struct HistoryFilter {
    skip: Option<i64>,
    limit: Option<i64>,
}

/// Every land this owner has held, newest acquisition first.
async fn land_history(
    Path(owner_id): Path<Uuid>,
    ApiQuery(filter): ApiQuery<HistoryFilter>,
) -> Result<Json<Page<serde_json::Value>>, ApiError> {
    let params = PageParams::new(filter.skip, filter.limit)?;
    let pool = database::pool().await?;

    let rows = sqlx::query_as::<_, OwnerLandHistoryRow>(
        "SELECT t.id, t.transfer_date, l.id AS land_id, l.area, l.land_type, \
                l.certification_no, l.subcity \
         FROM land_transfers t JOIN lands l ON l.id = t.land_id \
         WHERE t.land_owner_id = $1 \
         ORDER BY t.transfer_date DESC LIMIT $2 OFFSET $3",
    )
    .bind(owner_id)
    .bind(params.limit())
    .bind(params.skip())
    .fetch_all(pool)
    .await?;

    let total: i64 =
        sqlx::query("SELECT COUNT(*) AS count FROM land_transfers WHERE land_owner_id = $1")
            .bind(owner_id)
            .fetch_one(pool)
            .await?
            .try_get("count")?;

    let data = rows
        .into_iter()
        .map(|row| {
            json!({
                "id": row.id,
                "transferDate": row.transfer_date,
                "land": {
                    "id": row.land_id,
                    "area": row.area,
                    "type": row.land_type,
                    "certificationNo": row.certification_no,
                    "subcity": row.subcity,
                },
            })
        })
        .collect();

    Ok(Json(Page::assemble(data, total, &params)))
}
