//! Integration tests for session auth: JWT validation, password hashing and
//! the cookie extractor. No running server or database is needed.
//!
//! Run with: `cargo test --test auth_test`
use actix_web::cookie::Cookie;
use actix_web::{App, HttpResponse, web};
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

use books_backend::auth::jwt::{Claims, issue_token, validate_token};
use books_backend::auth::middleware::{AuthenticatedUser, JwtSecret};
use books_backend::auth::password::{hash_password, verify_password};
use books_backend::auth::{TOKEN_COOKIE, removal_cookie, session_cookie};
use books_backend::models::users::Roles;

/// A fake secret for testing — never use the real one in tests committed to git.
const TEST_SECRET: &str = "test-secret-at-least-256-bits-long-for-hs256-xxxxxxx";

fn claims_expiring_in(seconds: i64) -> Claims {
    let now = Utc::now().timestamp();
    Claims {
        user_id: 42,
        email: "alice@example.com".to_string(),
        role: Roles::Admin,
        exp: (now + seconds) as usize,
        iat: now as usize,
    }
}

/// Helper: mint a JWT signed with HS256 using the test secret.
fn mint_test_token(claims: &Claims) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("Failed to encode test JWT")
}

#[test]
fn test_valid_token_decodes_correctly() {
    let token = mint_test_token(&claims_expiring_in(3600));

    let claims = validate_token(&token, TEST_SECRET).expect("Token should be valid");

    assert_eq!(claims.user_id, 42);
    assert_eq!(claims.email, "alice@example.com");
    assert_eq!(claims.role, Roles::Admin);
}

#[test]
fn test_issued_token_round_trips() {
    let token = issue_token(&claims_expiring_in(60), TEST_SECRET).unwrap();
    let claims = validate_token(&token, TEST_SECRET).unwrap();
    assert_eq!(claims.user_id, 42);
}

#[test]
fn test_claims_use_camel_case_user_id() {
    let json = serde_json::to_value(claims_expiring_in(60)).unwrap();
    assert_eq!(json["userId"], 42);
    assert_eq!(json["role"], "admin");
}

#[test]
fn test_expired_token_is_rejected() {
    // expired 5 minutes ago (well past the 60s default leeway)
    let token = mint_test_token(&claims_expiring_in(-300));

    let result = validate_token(&token, TEST_SECRET);
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("ExpiredSignature"));
}

#[test]
fn test_wrong_secret_is_rejected() {
    let token = mint_test_token(&claims_expiring_in(3600));

    let result = validate_token(&token, "completely-wrong-secret-xxxxxxxxxxxxxxxxxxx");
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("InvalidSignature"));
}

#[test]
fn test_garbage_token_is_rejected() {
    let result = validate_token("not.a.valid.jwt", TEST_SECRET);
    assert!(result.is_err());
}

#[test]
fn test_password_hash_verifies() {
    let hash = hash_password("admin123").unwrap();
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password("admin123", &hash));
    assert!(!verify_password("admin124", &hash));
}

#[test]
fn test_malformed_hash_never_verifies() {
    assert!(!verify_password("admin123", "not-a-phc-string"));
}

#[test]
fn test_session_cookie_attributes() {
    let cookie = session_cookie("abc".to_string(), 24, true);
    assert_eq!(cookie.name(), TOKEN_COOKIE);
    assert_eq!(cookie.value(), "abc");
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.secure(), Some(true));
    assert_eq!(cookie.path(), Some("/"));

    let removal = removal_cookie(false);
    assert_eq!(removal.value(), "");
    assert_eq!(removal.max_age(), Some(actix_web::cookie::time::Duration::ZERO));
}

async fn whoami(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().body(user.user_id().to_string())
}

macro_rules! whoami_app {
    () => {
        actix_web::test::init_service(
            App::new()
                .app_data(web::Data::new(JwtSecret(TEST_SECRET.to_string())))
                .route("/whoami", web::get().to(whoami)),
        )
        .await
    };
}

#[actix_web::test]
async fn test_extractor_accepts_session_cookie() {
    let app = whoami_app!();
    let token = mint_test_token(&claims_expiring_in(3600));

    let req = actix_web::test::TestRequest::get()
        .uri("/whoami")
        .cookie(Cookie::new(TOKEN_COOKIE, token))
        .to_request();
    let resp = actix_web::test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    let body = actix_web::test::read_body(resp).await;
    assert_eq!(body, web::Bytes::from_static(b"42"));
}

#[actix_web::test]
async fn test_extractor_rejects_missing_cookie() {
    let app = whoami_app!();

    let req = actix_web::test::TestRequest::get().uri("/whoami").to_request();
    let resp = actix_web::test::call_service(&app, req).await;

    assert_eq!(resp.status(), 401);
    let body: serde_json::Value = actix_web::test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Authentication required");
}

#[actix_web::test]
async fn test_extractor_rejects_expired_cookie() {
    let app = whoami_app!();
    let token = mint_test_token(&claims_expiring_in(-300));

    let req = actix_web::test::TestRequest::get()
        .uri("/whoami")
        .cookie(Cookie::new(TOKEN_COOKIE, token))
        .to_request();
    let resp = actix_web::test::call_service(&app, req).await;

    assert_eq!(resp.status(), 401);
    let body: serde_json::Value = actix_web::test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid or expired token");
}
