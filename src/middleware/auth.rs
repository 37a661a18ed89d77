use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::{verify_token, Claims};
use crate::database;
use crate::error::ApiError;
use crate::models::{Role, UserStatus};

/// Authenticated caller attached to the request after the identity gate.
///
/// `office_id` is `None` for head-office actors; tenant-bound actors carry
/// their office and are scoped to it on every list/detail query.
#[derive(Clone, Debug)]
pub struct AuthActor {
    pub id: Uuid,
    pub role: Role,
    pub office_id: Option<Uuid>,
}

#[derive(Debug, FromRow)]
struct ActorRow {
    id: Uuid,
    role: Role,
    status: UserStatus,
    office_id: Option<Uuid>,
}

/// Strict identity gate: rejects unauthenticated or disabled callers.
pub async fn require_auth(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&headers).ok_or_else(|| ApiError::unauthorized("Access denied"))?;
    let actor = resolve_actor(&token).await?;
    request.extensions_mut().insert(actor);
    Ok(next.run(request).await)
}

/// Permissive identity gate for public-but-personalizable endpoints:
/// proceeds anonymously when no credential was supplied, but still rejects
/// a malformed one.
pub async fn maybe_auth(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(token) = bearer_token(&headers) {
        let actor = resolve_actor(&token).await?;
        request.extensions_mut().insert(actor);
    }
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Decode the token and verify the actor against the live user row; the
/// role is always taken from the row, never from the claims.
async fn resolve_actor(token: &str) -> Result<AuthActor, ApiError> {
    let claims: Claims = verify_token(token)?;

    let pool = database::pool().await?;
    let row = sqlx::query_as::<_, ActorRow>(
        "SELECT id, role, status, office_id FROM users WHERE id = $1",
    )
    .bind(claims.user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::unauthorized("Access denied"))?;

    if row.status.blocks_authentication() {
        return Err(ApiError::unauthorized(
            "Your account is currently deactivated. Please contact support for assistance.",
        ));
    }

    Ok(AuthActor {
        id: row.id,
        role: row.role,
        office_id: row.office_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", value.parse().unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_tokens() {
        assert_eq!(
            bearer_token(&headers_with("Bearer abc.def.ghi")),
            Some("abc.def.ghi".to_string())
        );
        assert_eq!(bearer_token(&headers_with("Basic abc")), None);
        assert_eq!(bearer_token(&headers_with("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
