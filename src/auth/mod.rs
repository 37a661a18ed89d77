use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;
use crate::error::ApiError;

/// Claims carried by a login token. The role claim is informational; every
/// request re-reads the role from the live user row.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: Uuid,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, role: String) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        Self {
            user_id,
            role,
            exp: (now + Duration::hours(expiry_hours as i64)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

/// Short-lived claims mailed out for password resets.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResetClaims {
    pub user_id: Uuid,
    pub exp: i64,
    pub iat: i64,
}

impl ResetClaims {
    pub fn new(user_id: Uuid) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.reset_token_expiry_hours;
        Self {
            user_id,
            exp: (now + Duration::hours(expiry_hours as i64)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

fn secret() -> Result<&'static [u8], ApiError> {
    let secret = &config::config().security.jwt_secret;
    if secret.is_empty() {
        tracing::error!("JWT_SECRET is not configured");
        return Err(ApiError::internal("Something went wrong"));
    }
    Ok(secret.as_bytes())
}

pub fn sign_token<T: Serialize>(claims: &T) -> Result<String, ApiError> {
    encode(&Header::default(), claims, &EncodingKey::from_secret(secret()?)).map_err(|e| {
        tracing::error!("token generation failed: {}", e);
        ApiError::internal("Something went wrong")
    })
}

pub fn verify_token<T: serde::de::DeserializeOwned>(token: &str) -> Result<T, ApiError> {
    decode::<T>(
        token,
        &DecodingKey::from_secret(secret()?),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::unauthorized("Access denied"))
}

pub fn hash_password(password: &str) -> Result<String, ApiError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| {
        tracing::error!("password hashing failed: {}", e);
        ApiError::internal("Something went wrong")
    })
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// Password policy: at least 8 chars with upper, lower, digit and special.
pub fn is_strong_password(password: &str) -> bool {
    password.len() >= 8
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| !c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_policy() {
        assert!(is_strong_password("Str0ng!pass"));
        assert!(!is_strong_password("short1!"));
        assert!(!is_strong_password("alllowercase1!"));
        assert!(!is_strong_password("ALLUPPERCASE1!"));
        assert!(!is_strong_password("NoDigits!!"));
        assert!(!is_strong_password("NoSpecial123"));
    }

    #[test]
    fn bcrypt_round_trip() {
        let hash = hash_password("Str0ng!pass").unwrap();
        assert!(verify_password("Str0ng!pass", &hash));
        assert!(!verify_password("wrong", &hash));
    }
}
