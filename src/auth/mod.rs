pub mod jwt;
pub mod middleware;
pub mod password;

use actix_web::cookie::{Cookie, SameSite, time::Duration};

/// Name of the cookie carrying the session JWT.
pub const TOKEN_COOKIE: &str = "token";

/// HttpOnly, SameSite=Strict session cookie holding `token`.
pub fn session_cookie(token: String, ttl_hours: i64, secure: bool) -> Cookie<'static> {
    Cookie::build(TOKEN_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .max_age(Duration::hours(ttl_hours))
        .finish()
}

/// A cookie that makes the browser drop the session.
pub fn removal_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::build(TOKEN_COOKIE, "")
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .finish();
    cookie.make_removal();
    cookie
}
