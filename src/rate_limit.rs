//! Per-IP fixed-window rate limiting.
//!
//! One [`RateLimiter`] is shared as app data. Each middleware below applies one
//! [`RateLimitPolicy`]; policies keep separate counters, so a request under
//! `/auth` counts against both the general and the auth budget.

use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Next;
use actix_web::{ResponseError, web};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::error::ApiError;

/// Request budget per client IP.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitPolicy {
    pub name: &'static str,
    pub max_requests: u32,
    pub window: Duration,
    /// Message of the 429 envelope.
    pub message: &'static str,
}

/// Every route: 1000 requests per 15 minutes.
pub const GENERAL: RateLimitPolicy = RateLimitPolicy {
    name: "general",
    max_requests: 1000,
    window: Duration::from_secs(15 * 60),
    message: "Too many requests from this IP, please try again later",
};

/// `/auth/*`: 50 requests per 15 minutes.
pub const AUTH: RateLimitPolicy = RateLimitPolicy {
    name: "auth",
    max_requests: 50,
    window: Duration::from_secs(15 * 60),
    message: "Too many authentication attempts, please try again later",
};

/// Catalog routes: 10000 requests per hour.
pub const API: RateLimitPolicy = RateLimitPolicy {
    name: "api",
    max_requests: 10_000,
    window: Duration::from_secs(60 * 60),
    message: "API rate limit exceeded",
};

struct IpEntry {
    count: u32,
    window_start: Instant,
    window: Duration,
}

#[derive(Clone, Default)]
pub struct RateLimiter {
    /// policy name -> (IP -> entry)
    inner: Arc<Mutex<HashMap<&'static str, HashMap<String, IpEntry>>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one request. `true` if it is within the policy's budget.
    pub async fn check(&self, policy: &RateLimitPolicy, ip: &str) -> bool {
        let mut map = self.inner.lock().await;
        let now = Instant::now();

        let entry = map
            .entry(policy.name)
            .or_default()
            .entry(ip.to_owned())
            .or_insert_with(|| IpEntry {
                count: 0,
                window_start: now,
                window: policy.window,
            });

        if now.duration_since(entry.window_start) >= entry.window {
            entry.count = 0;
            entry.window_start = now;
        }

        entry.count = entry.count.saturating_add(1);
        entry.count <= policy.max_requests
    }

    /// Drop entries whose window has ended.
    pub async fn cleanup(&self) {
        let mut map = self.inner.lock().await;
        let now = Instant::now();

        for per_ip in map.values_mut() {
            per_ip.retain(|_, entry| now.duration_since(entry.window_start) < entry.window);
        }
        map.retain(|_, per_ip| !per_ip.is_empty());
    }
}

/// Client IP: the first `X-Forwarded-For` hop if present, then the peer address.
fn client_ip(req: &ServiceRequest) -> String {
    req.connection_info()
        .realip_remote_addr()
        .map(|addr| {
            addr.parse::<std::net::SocketAddr>()
                .map(|socket| socket.ip().to_string())
                .unwrap_or_else(|_| addr.to_owned())
        })
        .unwrap_or_else(|| "unknown".to_owned())
}

/// Apply `policy` to the request; over budget short-circuits with a 429 envelope.
pub async fn enforce<B: MessageBody>(
    policy: &RateLimitPolicy,
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, actix_web::Error> {
    let Some(limiter) = req.app_data::<web::Data<RateLimiter>>().cloned() else {
        tracing::warn!(policy = policy.name, "Rate limiter not configured");
        return Ok(next.call(req).await?.map_into_left_body());
    };

    let ip = client_ip(&req);
    if limiter.check(policy, &ip).await {
        return Ok(next.call(req).await?.map_into_left_body());
    }

    tracing::warn!(
        policy = policy.name,
        %ip,
        method = %req.method(),
        path = %req.path(),
        "Rate limit exceeded"
    );
    let response = ApiError::TooManyRequests(policy.message.to_string()).error_response();
    Ok(req.into_response(response).map_into_right_body())
}

pub async fn general_rate_limit(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<EitherBody<impl MessageBody>>, actix_web::Error> {
    enforce(&GENERAL, req, next).await
}

pub async fn auth_rate_limit(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<EitherBody<impl MessageBody>>, actix_web::Error> {
    enforce(&AUTH, req, next).await
}

pub async fn api_rate_limit(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<EitherBody<impl MessageBody>>, actix_web::Error> {
    enforce(&API, req, next).await
}
