use axum::extract::Path;
use axum::middleware::from_fn;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use crate::database;
use crate::error::ApiError;
use crate::extract::ApiQuery;
use crate::listing::{office_scope, ListQuery, Page, PageParams};
use crate::middleware::{require_auth, role, AuthActor};
use crate::models::{PublicUser, Role, UserStatus, UserSummary};

const READ: &[Role] = &[Role::DatabaseAdmin, Role::Head];

pub fn router() -> Router {
    Router::new()
        .route("/all", get(list))
        .route("/:user_id", get(get_by_id))
        .route_layer(from_fn(|req, next| role::check(READ, req, next)))
        .route_layer(from_fn(require_auth))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserFilter {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    status: Option<UserStatus>,
    role: Option<Role>,
    id: Option<Uuid>,
    office_id: Option<Uuid>,
    skip: Option<i64>,
    limit: Option<i64>,
}

async fn list(
    Extension(actor): Extension<AuthActor>,
    ApiQuery(filter): ApiQuery<UserFilter>,
) -> Result<Json<Page<UserSummary>>, ApiError> {
    let params = PageParams::new(filter.skip, filter.limit)?;
    // the directory defaults to active accounts
    let status = filter.status.unwrap_or(UserStatus::Active);

    let pool = database::pool().await?;
    let page = ListQuery::new(
        "users",
        &[
            "id",
            "first_name",
            "middle_name",
            "last_name",
            "email",
            "phone",
            "status",
            "role",
            "office_id",
        ],
        "created_at",
    )
    .contains("first_name", filter.name)
    .contains("email", filter.email)
    .contains("phone", filter.phone)
    .eq_text("status", Some(status.as_str().to_string()))
    .eq_text("role", filter.role.map(|r| r.as_str().to_string()))
    .eq_uuid("id", filter.id)
    .eq_uuid("office_id", office_scope(actor.office_id, filter.office_id))
    .fetch_page::<UserSummary>(pool, params)
    .await?;

    Ok(Json(page))
}

async fn get_by_id(Path(user_id): Path<Uuid>) -> Result<Json<PublicUser>, ApiError> {
    let pool = database::pool().await?;
    let user = sqlx::query_as::<_, PublicUser>(
        "SELECT id, first_name, middle_name, last_name, email, phone, username, role, status, \
                office_id, created_at, updated_at \
         FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(user))
}
