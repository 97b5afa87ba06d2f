//! Fixed-window rate limiting over Redis counters.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, MatchedPath, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};

use common::{AppError, RateLimitConfig};

use crate::api::extractors::client_ip;
use crate::api::AppState;

const LIMIT_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-limit");
const REMAINING_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-remaining");

/// Rate limit rejection, rendered as a 429 with retry hints
#[derive(Debug)]
pub struct RateLimitError {
    pub limit: u64,
    pub retry_after: u64,
}

impl IntoResponse for RateLimitError {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(axum::http::header::RETRY_AFTER, HeaderValue::from(self.retry_after));
        headers.insert(LIMIT_HEADER, HeaderValue::from(self.limit));
        headers.insert(REMAINING_HEADER, HeaderValue::from(0u64));

        (headers, AppError::TooManyRequests).into_response()
    }
}

/// General limit, applied to every API route.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    let limits = state.config.rate_limit;
    enforce(&state, "general", limits, request, next).await
}

/// Stricter limit for registration.
pub async fn rate_limit_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    let limits = state.config.auth_rate_limit;
    enforce(&state, "auth", limits, request, next).await
}

/// Route template for the bucket key, so `/products/:id` shares one counter.
fn bucket_path(request: &Request) -> &str {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(MatchedPath::as_str)
        .unwrap_or_else(|| request.uri().path())
}

async fn enforce(
    state: &AppState,
    scope: &str,
    limits: RateLimitConfig,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    let Some(cache) = state.cache.as_ref() else {
        return Ok(next.run(request).await);
    };

    let client = client_ip(
        request.headers(),
        request.extensions().get::<ConnectInfo<SocketAddr>>(),
    )
    .unwrap_or_else(|| "unknown".to_string());
    let key = format!("{}:{}:{}", scope, bucket_path(&request), client);

    let (count, allowed) = match cache
        .check_rate_limit(&key, limits.max_requests, limits.window_seconds)
        .await
    {
        Ok(result) => result,
        Err(e) => {
            // Fail closed
            tracing::error!(error = %e, scope, "Rate limit check failed, denying request");
            return Err(RateLimitError {
                limit: limits.max_requests,
                retry_after: limits.window_seconds,
            });
        }
    };

    if !allowed {
        let retry_after = cache
            .get_rate_limit_ttl(&key)
            .await
            .ok()
            .flatten()
            .unwrap_or(limits.window_seconds);
        tracing::warn!(client = %client, scope, count, "Rate limit exceeded");
        return Err(RateLimitError {
            limit: limits.max_requests,
            retry_after,
        });
    }

    let mut response = next.run(request).await;

    let remaining = limits.max_requests.saturating_sub(count);
    let headers = response.headers_mut();
    headers.insert(LIMIT_HEADER, HeaderValue::from(limits.max_requests));
    headers.insert(REMAINING_HEADER, HeaderValue::from(remaining));

    Ok(response)
}
