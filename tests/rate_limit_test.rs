//! Tests for per-IP rate limiting: budgets, the 429 envelope and per-IP counters.
//!
//! Run with: `cargo test --test rate_limit_test`
use std::net::SocketAddr;
use std::time::Duration;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::middleware::{Next, from_fn};
use actix_web::{App, HttpResponse, test, web};
use serde_json::Value;

use books_backend::rate_limit::{AUTH, RateLimitPolicy, RateLimiter, auth_rate_limit, enforce};

const TIGHT: RateLimitPolicy = RateLimitPolicy {
    name: "tight",
    max_requests: 2,
    window: Duration::from_secs(60),
    message: "Slow down",
};

async fn tight_rate_limit(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    enforce(&TIGHT, req, next).await
}

fn peer(ip: &str) -> SocketAddr {
    format!("{ip}:40000").parse().unwrap()
}

macro_rules! limited_app {
    ($mw:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(RateLimiter::new()))
                .wrap(from_fn($mw))
                .route("/ping", web::get().to(|| async { HttpResponse::Ok().body("pong") })),
        )
        .await
    };
}

#[actix_web::test]
async fn test_requests_within_budget_pass() {
    let app = limited_app!(tight_rate_limit);

    for _ in 0..2 {
        let req = test::TestRequest::get().uri("/ping").peer_addr(peer("10.0.0.1")).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}

#[actix_web::test]
async fn test_over_budget_returns_429_envelope() {
    let app = limited_app!(tight_rate_limit);

    for _ in 0..2 {
        let req = test::TestRequest::get().uri("/ping").peer_addr(peer("10.0.0.1")).to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get().uri("/ping").peer_addr(peer("10.0.0.1")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Slow down");
    assert!(body["timestamp"].is_string());
}

#[actix_web::test]
async fn test_counters_are_per_ip() {
    let app = limited_app!(tight_rate_limit);

    for _ in 0..3 {
        let req = test::TestRequest::get().uri("/ping").peer_addr(peer("10.0.0.1")).to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get().uri("/ping").peer_addr(peer("10.0.0.2")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_forwarded_client_is_counted() {
    let app = limited_app!(tight_rate_limit);

    for _ in 0..2 {
        let req = test::TestRequest::get()
            .uri("/ping")
            .insert_header(("X-Forwarded-For", "203.0.113.9, 10.0.0.1"))
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get()
        .uri("/ping")
        .insert_header(("X-Forwarded-For", "203.0.113.9"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[actix_web::test]
async fn test_auth_budget_is_fifty() {
    let app = limited_app!(auth_rate_limit);

    for _ in 0..AUTH.max_requests {
        let req = test::TestRequest::get().uri("/ping").peer_addr(peer("10.0.0.3")).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get().uri("/ping").peer_addr(peer("10.0.0.3")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Too many authentication attempts, please try again later");
}

#[actix_web::test]
async fn test_policies_count_separately() {
    let limiter = RateLimiter::new();

    assert!(limiter.check(&TIGHT, "10.0.0.4").await);
    assert!(limiter.check(&TIGHT, "10.0.0.4").await);
    assert!(!limiter.check(&TIGHT, "10.0.0.4").await);
    assert!(limiter.check(&AUTH, "10.0.0.4").await);
}

#[actix_web::test]
async fn test_cleanup_keeps_open_windows() {
    let limiter = RateLimiter::new();
    limiter.check(&TIGHT, "10.0.0.5").await;
    limiter.check(&TIGHT, "10.0.0.5").await;

    limiter.cleanup().await;
    assert!(!limiter.check(&TIGHT, "10.0.0.5").await);
}

#[actix_web::test]
async fn test_missing_limiter_lets_requests_through() {
    let app = test::init_service(
        App::new()
            .wrap(from_fn(tight_rate_limit))
            .route("/ping", web::get().to(|| async { HttpResponse::Ok().body("pong") })),
    )
    .await;

    for _ in 0..5 {
        let req = test::TestRequest::get().uri("/ping").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
