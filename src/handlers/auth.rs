use actix_web::{HttpRequest, HttpResponse, web};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use validator::Validate;

use crate::auth::jwt::{self, Claims};
use crate::auth::middleware::AuthenticatedUser;
use crate::auth::{password, removal_cookie, session_cookie};
use crate::config::AppConfig;
use crate::db::users as user_db;
use crate::error::ApiError;
use crate::models::users::{LoginRequest, Roles, UserResponse};
use crate::response::ApiResponse;

#[derive(Debug, Serialize)]
struct LoginData {
    id: i32,
    email: String,
    username: String,
    role: Roles,
}

/// POST /auth/login — verify credentials and set the session cookie.
pub async fn login(
    req: HttpRequest,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner();
    input.validate()?;

    let peer = req.peer_addr().map(|addr| addr.ip().to_string());
    let invalid = || ApiError::Unauthorized("Invalid email or password".to_string());

    let Some(user) = user_db::get_user_by_email(db.get_ref(), &input.email).await? else {
        tracing::warn!(email = %input.email, ip = ?peer, "Login attempt with invalid email");
        return Err(invalid());
    };

    if !password::verify_password(&input.password, &user.password_hash) {
        tracing::warn!(user_id = user.id, ip = ?peer, "Login attempt with invalid password");
        return Err(invalid());
    }

    let claims = Claims::for_user(&user, config.token_ttl_hours);
    let token = jwt::issue_token(&claims, &config.jwt_secret).map_err(ApiError::Internal)?;

    tracing::info!(user_id = user.id, role = ?user.role, ip = ?peer, "User logged in");

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(token, config.token_ttl_hours, config.production))
        .json(ApiResponse::new(
            "Login successful",
            LoginData {
                id: user.id,
                email: user.email,
                username: user.username,
                role: user.role,
            },
        )))
}

/// POST /auth/logout — clear the session cookie.
pub async fn logout(user: AuthenticatedUser, config: web::Data<AppConfig>) -> HttpResponse {
    tracing::info!(user_id = user.user_id(), "User logged out");

    HttpResponse::Ok()
        .cookie(removal_cookie(config.production))
        .json(ApiResponse::new("Logout successful", ()))
}

/// GET /auth/me — profile of the logged-in user.
pub async fn me(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let profile = user_db::get_user_by_id(db.get_ref(), user.user_id())
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

    tracing::info!(user_id = profile.id, "User profile retrieved");

    Ok(HttpResponse::Ok().json(ApiResponse::new(
        "User profile retrieved successfully",
        UserResponse::from(profile),
    )))
}
