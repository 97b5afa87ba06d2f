//! Liveness and dependency health.

use axum::{extract::State, http::StatusCode, response::Json};
use serde::Serialize;

use crate::api::AppState;

const HEALTHY: &str = "healthy";
const UNHEALTHY: &str = "unhealthy";
const DISABLED: &str = "disabled";

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub services: ServiceHealth,
}

#[derive(Debug, Serialize)]
pub struct ServiceHealth {
    pub database: ServiceStatus,
    pub redis: ServiceStatus,
}

#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceStatus {
    fn from_result<E: std::fmt::Display>(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self {
                status: HEALTHY,
                error: None,
            },
            Err(e) => Self {
                status: UNHEALTHY,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Ping the database and Redis
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "All dependencies reachable"),
        (status = 503, description = "A dependency is down")
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = match &state.database {
        Some(db) => ServiceStatus::from_result(db.ping().await),
        None => ServiceStatus {
            status: UNHEALTHY,
            error: Some("database not connected".to_string()),
        },
    };

    // Redis is optional; without it rate limiting is simply off.
    let redis = match &state.cache {
        Some(cache) => ServiceStatus::from_result(cache.ping().await),
        None => ServiceStatus {
            status: DISABLED,
            error: None,
        },
    };

    let healthy = database.status == HEALTHY && redis.status != UNHEALTHY;
    let response = HealthResponse {
        status: if healthy { HEALTHY } else { "degraded" },
        services: ServiceHealth { database, redis },
    };

    let code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(response))
}
