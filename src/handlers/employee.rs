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
use crate::models::{Employee, EmployeeStatus, EmployeeSummary, Gender, Role};
use crate::validation::validate;

const MANAGE: &[Role] = &[Role::Hr];
const READ: &[Role] = &[Role::Hr, Role::Head, Role::SystemAdmin];

pub fn router() -> Router {
    let manage = Router::new()
        .route("/create", post(create))
        .route("/update/:id", put(update))
        .route("/delete/:id", delete(remove))
        .route_layer(from_fn(|req, next| role::check(MANAGE, req, next)))
        .route_layer(from_fn(require_auth));

    let read = Router::new()
        .route("/all", get(list))
        .route("/get/:id", get(get_by_id))
        .route_layer(from_fn(|req, next| role::check(READ, req, next)))
        .route_layer(from_fn(require_auth));

    manage.merge(read)
}

const EMPLOYEE_COLUMNS: &str = "id, first_name, middle_name, last_name, email, phone, salary, \
                                position, status, gender, office_id, registered_at";

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CreateEmployee {
    #[validate(length(min = 1, message = "First name is required"))]
    first_name: String,
    #[validate(length(min = 1, message = "Middle name is required"))]
    middle_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    last_name: String,
    #[validate(email(message = "Email must be a valid email"))]
    email: Option<String>,
    #[validate(length(min = 9, message = "Phone must be at least 9 digits"))]
    phone: String,
    #[validate(range(min = 0.01, message = "Salary must be greater than 0"))]
    salary: f64,
    #[validate(length(min = 1, message = "Position is required"))]
    position: String,
    status: Option<EmployeeStatus>,
    gender: Option<Gender>,
}

async fn create(
    Extension(actor): Extension<AuthActor>,
    ApiJson(body): ApiJson<CreateEmployee>,
) -> Result<impl IntoResponse, ApiError> {
    validate(&body)?;
    let pool = database::pool().await?;
    let employee = sqlx::query_as::<_, Employee>(&format!(
        "INSERT INTO employees \
            (id, first_name, middle_name, last_name, email, phone, salary, position, status, \
             gender, office_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         RETURNING {EMPLOYEE_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(&body.first_name)
    .bind(&body.middle_name)
    .bind(&body.last_name)
    .bind(&body.email)
    .bind(&body.phone)
    .bind(body.salary)
    .bind(&body.position)
    .bind(body.status.unwrap_or(EmployeeStatus::Active))
    .bind(body.gender)
    .bind(actor.office_id)
    .fetch_one(pool)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Employee registered successfully", "employee": employee })),
    ))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct UpdateEmployee {
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
    #[validate(range(min = 0.01, message = "Salary must be greater than 0"))]
    salary: Option<f64>,
    #[validate(length(min = 1, message = "Position is required"))]
    position: Option<String>,
    status: Option<EmployeeStatus>,
    gender: Option<Gender>,
}

async fn update(
    Path(id): Path<Uuid>,
    ApiJson(body): ApiJson<UpdateEmployee>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate(&body)?;
    let pool = database::pool().await?;
    let employee = sqlx::query_as::<_, Employee>(&format!(
        "UPDATE employees SET \
            first_name  = COALESCE($2, first_name), \
            middle_name = COALESCE($3, middle_name), \
            last_name   = COALESCE($4, last_name), \
            email       = COALESCE($5, email), \
            phone       = COALESCE($6, phone), \
            salary      = COALESCE($7, salary), \
            position    = COALESCE($8, position), \
            status      = COALESCE($9, status), \
            gender      = COALESCE($10, gender) \
         WHERE id = $1 RETURNING {EMPLOYEE_COLUMNS}"
    ))
    .bind(id)
    .bind(body.first_name)
    .bind(body.middle_name)
    .bind(body.last_name)
    .bind(body.email)
    .bind(body.phone)
    .bind(body.salary)
    .bind(body.position)
    .bind(body.status)
    .bind(body.gender)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Employee not found"))?;

    Ok(Json(json!({ "message": "Employee updated successfully", "employee": employee })))
}

async fn remove(Path(id): Path<Uuid>) -> Result<Json<serde_json::Value>, ApiError> {
    let pool = database::pool().await?;
    let deleted = sqlx::query("DELETE FROM employees WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if deleted.rows_affected() == 0 {
        return Err(ApiError::not_found("Employee not found"));
    }
    Ok(Json(json!({ "message": "Employee deleted successfully" })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmployeeFilter {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    position: Option<String>,
    status: Option<EmployeeStatus>,
    office_id: Option<Uuid>,
    skip: Option<i64>,
    limit: Option<i64>,
}

async fn list(
    Extension(actor): Extension<AuthActor>,
    ApiQuery(filter): ApiQuery<EmployeeFilter>,
) -> Result<Json<Page<EmployeeSummary>>, ApiError> {
    let params = PageParams::new(filter.skip, filter.limit)?;
    let pool = database::pool().await?;
    let page = ListQuery::new(
        "employees",
        &[
            "id",
            "first_name",
            "middle_name",
            "last_name",
            "email",
            "phone",
            "position",
            "status",
            "salary",
            "office_id",
            "registered_at",
        ],
        "registered_at",
    )
    .contains("first_name", filter.name)
    .contains("email", filter.email)
    .contains("phone", filter.phone)
    .contains("position", filter.position)
    .eq_text("status", filter.status.map(|s| s.as_str().to_string()))
    .eq_uuid("office_id", office_scope(actor.office_id, filter.office_id))
    .fetch_page::<EmployeeSummary>(pool, params)
    .await?;

    Ok(Json(page))
}

async fn get_by_id(Path(id): Path<Uuid>) -> Result<Json<Employee>, ApiError> {
    let pool = database::pool().await?;
    let employee = sqlx::query_as::<_, Employee>(&format!(
        "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Employee not found"))?;

    Ok(Json(employee))
}
