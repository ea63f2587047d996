use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use std::future::{Ready, ready};

use crate::auth::{TOKEN_COOKIE, jwt};
use crate::error::ApiError;

/// Principal behind a valid session cookie.
pub struct AuthenticatedUser(pub jwt::Claims);

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, ApiError> {
    // 1. The session token travels in the `token` cookie.
    let cookie = req
        .cookie(TOKEN_COOKIE)
        .filter(|c| !c.value().is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

    // 2. Get the signing secret from app data.
    let secret = req
        .app_data::<web::Data<JwtSecret>>()
        .ok_or_else(|| ApiError::Internal("JWT secret not configured".to_string()))?;

    // 3. Validate the JWT.
    let claims = jwt::validate_token(cookie.value(), &secret.0).map_err(|e| {
        tracing::debug!(error = %e, "Rejected session token");
        ApiError::Unauthorized("Invalid or expired token".to_string())
    })?;

    Ok(AuthenticatedUser(claims))
}

impl AuthenticatedUser {
    pub fn user_id(&self) -> i32 {
        self.0.user_id
    }
}

/// Wrapper type to store the JWT secret in Actix app data.
#[derive(Clone)]
pub struct JwtSecret(pub String);
