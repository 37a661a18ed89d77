use axum::{extract::Request, middleware::Next, response::Response};

use crate::error::ApiError;
use crate::models::Role;

use super::auth::AuthActor;

/// Route-level role gate, layered after the identity gate. Allow-lists are
/// fixed per operation; per-record ownership rules live in `policy`.
pub async fn check(
    allowed: &'static [Role],
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let role = request.extensions().get::<AuthActor>().map(|a| a.role);
    permitted(role, allowed)?;
    Ok(next.run(request).await)
}

fn permitted(role: Option<Role>, allowed: &[Role]) -> Result<(), ApiError> {
    match role {
        None => Err(ApiError::forbidden("Access denied.")),
        Some(role) if allowed.contains(&role) => Ok(()),
        Some(_) => Err(ApiError::forbidden(
            "You do not have permission to access this resource.",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECEPTION_ONLY: &[Role] = &[Role::Reception];

    #[test]
    fn missing_identity_is_denied() {
        assert!(permitted(None, RECEPTION_ONLY).is_err());
    }

    #[test]
    fn role_outside_allow_list_is_denied() {
        assert!(permitted(Some(Role::Officer), RECEPTION_ONLY).is_err());
        assert!(permitted(Some(Role::Reception), RECEPTION_ONLY).is_ok());
    }
}
