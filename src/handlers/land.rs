use axum::extract::Path;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Extension, Json, Router};
use serde::Deserialize;
use serde_json::json;
use sqlx::Row;
use uuid::Uuid;
use validator::Validate;

use crate::database;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiQuery};
use crate::listing::{office_scope, ListQuery, Page, PageParams};
use crate::middleware::{require_auth, role, AuthActor};
use crate::models::{
    Land, LandFile, LandOwner, LandStatus, LandSummary, LandTransfer, OwnershipType, Role,
    TransferHistoryRow,
};
use crate::validation::validate;

const MANAGE: &[Role] = &[Role::SystemAdmin, Role::LandBank];
const TRANSFER: &[Role] = &[Role::SystemAdmin];
const READ: &[Role] = &[
    Role::SystemAdmin,
    Role::LandBank,
    Role::Head,
    Role::Officer,
    Role::Other,
];

pub fn router() -> Router {
    let manage = Router::new()
        .route("/create", post(create))
        .route("/update/:id", put(update))
        .route("/remove/:id", delete(remove))
        .route_layer(from_fn(|req, next| role::check(MANAGE, req, next)))
        .route_layer(from_fn(require_auth));

    let transfer = Router::new()
        .route("/transfer", post(transfer))
        .route_layer(from_fn(|req, next| role::check(TRANSFER, req, next)))
        .route_layer(from_fn(require_auth));

    let read = Router::new()
        .route("/all", get(list))
        .route("/get/:id", get(get_by_id))
        .route_layer(from_fn(|req, next| role::check(READ, req, next)))
        .route_layer(from_fn(require_auth));

    let history = Router::new()
        .route("/transfer/history/:land_id", get(transfer_history))
        .route_layer(from_fn(require_auth));

    manage.merge(transfer).merge(read).merge(history)
}

const LAND_COLUMNS: &str = "id, land_owner_id, name, area, land_type, grade, registration_no, \
                            parcel_id, certification_no, wereda, subcity, absolute_location, \
                            map_url, comment, land_use_purpose, market_value, encumbrances, \
                            land_status, ownership_type, registered_by, office_id, created_at, \
                            updated_at";

const OWNER_COLUMNS: &str = "id, first_name, middle_name, last_name, gender, phone, email, \
                             national_id_url, created_at, updated_at";

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CreateLand {
    land_owner_id: Option<Uuid>,
    #[validate(range(min = 0.01, message = "Area must be greater than 0"))]
    area: f64,
    #[serde(rename = "type")]
    land_type: Option<String>,
    grade: Option<i32>,
    registration_no: Option<i64>,
    parcel_id: Option<String>,
    certification_no: Option<String>,
    #[validate(length(min = 1, message = "Wereda is required"))]
    wereda: String,
    subcity: Option<String>,
    absolute_location: Option<String>,
    map_url: Option<String>,
    comment: Option<String>,
    land_use_purpose: Option<String>,
    market_value: Option<f64>,
    encumbrances: Option<String>,
    land_status: Option<LandStatus>,
    ownership_type: Option<OwnershipType>,
}

/// Registering a land with an owner also seeds the transfer log, so the
/// provenance chain starts at registration. Both writes share a transaction.
async fn create(
    Extension(actor): Extension<AuthActor>,
    ApiJson(body): ApiJson<CreateLand>,
) -> Result<impl IntoResponse, ApiError> {
    validate(&body)?;
    let pool = database::pool().await?;

    let owner = match body.land_owner_id {
        Some(owner_id) => Some(
            sqlx::query_as::<_, LandOwner>(&format!(
                "SELECT {OWNER_COLUMNS} FROM land_owners WHERE id = $1"
            ))
            .bind(owner_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| ApiError::not_found("Land owner not found"))?,
        ),
        None => None,
    };

    let mut tx = pool.begin().await?;
    let land = sqlx::query_as::<_, Land>(&format!(
        "INSERT INTO lands \
            (id, land_owner_id, name, area, land_type, grade, registration_no, parcel_id, \
             certification_no, wereda, subcity, absolute_location, map_url, comment, \
             land_use_purpose, market_value, encumbrances, land_status, ownership_type, \
             registered_by, office_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, \
                 $18, $19, $20, $21) \
         RETURNING {LAND_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(body.land_owner_id)
    .bind(owner.as_ref().map(|o| o.full_name()))
    .bind(body.area)
    .bind(&body.land_type)
    .bind(body.grade)
    .bind(body.registration_no)
    .bind(&body.parcel_id)
    .bind(&body.certification_no)
    .bind(&body.wereda)
    .bind(&body.subcity)
    .bind(&body.absolute_location)
    .bind(&body.map_url)
    .bind(&body.comment)
    .bind(&body.land_use_purpose)
    .bind(body.market_value)
    .bind(&body.encumbrances)
    .bind(body.land_status.unwrap_or(LandStatus::Active))
    .bind(body.ownership_type.unwrap_or(OwnershipType::NotAssigned))
    .bind(actor.id)
    .bind(actor.office_id)
    .fetch_one(&mut *tx)
    .await?;

    if let Some(owner) = &owner {
        sqlx::query(
            "INSERT INTO land_transfers (id, land_id, land_owner_id, transferred_by) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(Uuid::new_v4())
        .bind(land.id)
        .bind(owner.id)
        .bind(actor.id)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Land registered successfully", "land": land })),
    ))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct UpdateLand {
    #[validate(range(min = 0.01, message = "Area must be greater than 0"))]
    area: Option<f64>,
    #[serde(rename = "type")]
    land_type: Option<String>,
    grade: Option<i32>,
    registration_no: Option<i64>,
    parcel_id: Option<String>,
    certification_no: Option<String>,
    #[validate(length(min = 1, message = "Wereda is required"))]
    wereda: Option<String>,
    subcity: Option<String>,
    absolute_location: Option<String>,
    map_url: Option<String>,
    comment: Option<String>,
    land_use_purpose: Option<String>,
    market_value: Option<f64>,
    encumbrances: Option<String>,
    land_status: Option<LandStatus>,
    ownership_type: Option<OwnershipType>,
}

async fn update(
    Path(id): Path<Uuid>,
    ApiJson(body): ApiJson<UpdateLand>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate(&body)?;
    let pool = database::pool().await?;
    let land = sqlx::query_as::<_, Land>(&format!(
        "UPDATE lands SET \
            area              = COALESCE($2, area), \
            land_type         = COALESCE($3, land_type), \
            grade             = COALESCE($4, grade), \
            registration_no   = COALESCE($5, registration_no), \
            parcel_id         = COALESCE($6, parcel_id), \
            certification_no  = COALESCE($7, certification_no), \
            wereda            = COALESCE($8, wereda), \
            subcity           = COALESCE($9, subcity), \
            absolute_location = COALESCE($10, absolute_location), \
            map_url           = COALESCE($11, map_url), \
            comment           = COALESCE($12, comment), \
            land_use_purpose  = COALESCE($13, land_use_purpose), \
            market_value      = COALESCE($14, market_value), \
            encumbrances      = COALESCE($15, encumbrances), \
            land_status       = COALESCE($16, land_status), \
            ownership_type    = COALESCE($17, ownership_type), \
            updated_at        = NOW() \
         WHERE id = $1 RETURNING {LAND_COLUMNS}"
    ))
    .bind(id)
    .bind(body.area)
    .bind(&body.land_type)
    .bind(body.grade)
    .bind(body.registration_no)
    .bind(&body.parcel_id)
    .bind(&body.certification_no)
    .bind(&body.wereda)
    .bind(&body.subcity)
    .bind(&body.absolute_location)
    .bind(&body.map_url)
    .bind(&body.comment)
    .bind(&body.land_use_purpose)
    .bind(body.market_value)
    .bind(&body.encumbrances)
    .bind(body.land_status)
    .bind(body.ownership_type)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Land not found"))?;

    Ok(Json(json!({ "message": "Land updated successfully", "land": land })))
}

async fn remove(Path(id): Path<Uuid>) -> Result<Json<serde_json::Value>, ApiError> {
    let pool = database::pool().await?;
    let deleted = sqlx::query("DELETE FROM lands WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|err| {
            if crate::error::is_foreign_key_violation(&err) {
                ApiError::conflict("Land has dependent records and cannot be deleted")
            } else {
                err.into()
            }
        })?;
    if deleted.rows_affected() == 0 {
        return Err(ApiError::not_found("Land not found"));
    }
    Ok(Json(json!({ "message": "Land deleted successfully" })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LandFilter {
    land_owner_id: Option<Uuid>,
    #[serde(rename = "type")]
    land_type: Option<String>,
    land_status: Option<LandStatus>,
    registration_no: Option<i64>,
    certification_no: Option<String>,
    name: Option<String>,
    office_id: Option<Uuid>,
    skip: Option<i64>,
    limit: Option<i64>,
}

async fn list(
    Extension(actor): Extension<AuthActor>,
    ApiQuery(filter): ApiQuery<LandFilter>,
) -> Result<Json<Page<LandSummary>>, ApiError> {
    let params = PageParams::new(filter.skip, filter.limit)?;
    let pool = database::pool().await?;
    let page = ListQuery::new(
        "lands",
        &["id", "name", "area", "land_type", "wereda", "land_owner_id"],
        "created_at",
    )
    .eq_uuid("land_owner_id", filter.land_owner_id)
    .contains("land_type", filter.land_type)
    .eq_text(
        "land_status",
        filter.land_status.map(|s| s.as_str().to_string()),
    )
    .eq_int("registration_no", filter.registration_no)
    .contains("certification_no", filter.certification_no)
    .contains("name", filter.name)
    .eq_uuid("office_id", office_scope(actor.office_id, filter.office_id))
    .fetch_page::<LandSummary>(pool, params)
    .await?;

    Ok(Json(page))
}

/// Full parcel dossier: the record, its current owner, attached files, and
/// the complete transfer history.
async fn get_by_id(Path(id): Path<Uuid>) -> Result<Json<serde_json::Value>, ApiError> {
    let pool = database::pool().await?;
    let land = sqlx::query_as::<_, Land>(&format!("SELECT {LAND_COLUMNS} FROM lands WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Land not found"))?;

    let owner = match land.land_owner_id {
        Some(owner_id) => {
            sqlx::query_as::<_, LandOwner>(&format!(
                "SELECT {OWNER_COLUMNS} FROM land_owners WHERE id = $1"
            ))
            .bind(owner_id)
            .fetch_optional(pool)
            .await?
        }
        None => None,
    };

    let files = sqlx::query_as::<_, LandFile>(
        "SELECT id, land_id, office_id, file_path, file_url, file_name, file_type, uploaded_at \
         FROM land_files WHERE land_id = $1 ORDER BY uploaded_at DESC",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    let history = fetch_transfer_rows(id, None).await?;

    Ok(Json(json!({
        "land": land,
        "landOwner": owner,
        "files": files,
        "transferHistory": history,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransferRequest {
    land_id: Uuid,
    new_owner_id: Uuid,
}

/// Ownership changes are two writes or none: the owner pointer moves and
/// exactly one immutable transfer row is appended.
async fn transfer(
    Extension(actor): Extension<AuthActor>,
    ApiJson(body): ApiJson<TransferRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = database::pool().await?;

    let land = sqlx::query_as::<_, Land>(&format!("SELECT {LAND_COLUMNS} FROM lands WHERE id = $1"))
        .bind(body.land_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Land not found"))?;

    if land.land_status == LandStatus::Restricted {
        return Err(ApiError::forbidden(
            "This land is restricted and cannot be transferred",
        ));
    }

    let owner = sqlx::query_as::<_, LandOwner>(&format!(
        "SELECT {OWNER_COLUMNS} FROM land_owners WHERE id = $1"
    ))
    .bind(body.new_owner_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Land owner not found"))?;

    let mut tx = pool.begin().await?;
    sqlx::query("UPDATE lands SET land_owner_id = $2, name = $3, updated_at = NOW() WHERE id = $1")
        .bind(land.id)
        .bind(owner.id)
        .bind(owner.full_name())
        .execute(&mut *tx)
        .await?;
    let record = sqlx::query_as::<_, LandTransfer>(
        "INSERT INTO land_transfers (id, land_id, land_owner_id, transferred_by) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, land_id, land_owner_id, transferred_by, transfer_date",
    )
    .bind(Uuid::new_v4())
    .bind(land.id)
    .bind(owner.id)
    .bind(actor.id)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Land transferred successfully", "transfer": record })),
    ))
}

#[derive(Debug, Deserialize)]
struct HistoryFilter {
    skip: Option<i64>,
    limit: Option<i64>,
}

async fn transfer_history(
    Path(land_id): Path<Uuid>,
    ApiQuery(filter): ApiQuery<HistoryFilter>,
) -> Result<Json<Page<serde_json::Value>>, ApiError> {
    let params = PageParams::new(filter.skip, filter.limit)?;
    let data = fetch_transfer_rows(land_id, Some(params)).await?;

    let pool = database::pool().await?;
    let total: i64 = sqlx::query("SELECT COUNT(*) AS count FROM land_transfers WHERE land_id = $1")
        .bind(land_id)
        .fetch_one(pool)
        .await?
        .try_get("count")?;

    Ok(Json(Page::assemble(data, total, &params)))
}

async fn fetch_transfer_rows(
    land_id: Uuid,
    params: Option<PageParams>,
) -> Result<Vec<serde_json::Value>, ApiError> {
    let pool = database::pool().await?;
    let mut sql = String::from(
        "SELECT t.id, t.transfer_date, o.id AS land_owner_id, o.first_name, o.middle_name, \
                o.last_name \
         FROM land_transfers t JOIN land_owners o ON o.id = t.land_owner_id \
         WHERE t.land_id = $1 ORDER BY t.transfer_date DESC",
    );
    if let Some(params) = &params {
        sql.push_str(&format!(" LIMIT {} OFFSET {}", params.limit(), params.skip()));
    }

    let rows = sqlx::query_as::<_, TransferHistoryRow>(&sql)
        .bind(land_id)
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            json!({
                "id": row.id,
                "transferDate": row.transfer_date,
                "landOwner": {
                    "id": row.land_owner_id,
                    "firstName": row.first_name,
                    "middleName": row.middle_name,
                    "lastName": row.last_name,
                },
            })
        })
        .collect())
}
