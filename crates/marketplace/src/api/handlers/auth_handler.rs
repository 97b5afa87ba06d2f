//! Registration and the caller's own profile.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::AppResult;
use domain::{NewUser, User, UserRole};

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::service::MeResponse;

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "asha@example.com")]
    pub email: String,
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    #[schema(example = "Asha Rao")]
    pub name: String,
    /// `customer` or `seller`
    pub role: UserRole,
    /// Ten-digit Indian mobile number
    #[schema(example = "9876543210")]
    pub phone: Option<String>,
}

/// Public registration; rate limited separately.
pub fn registration_routes() -> Router<AppState> {
    Router::new().route("/register", post(register))
}

/// Routes for an authenticated caller.
pub fn session_routes() -> Router<AppState> {
    Router::new().route("/me", get(me))
}

/// Register a customer or seller profile
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Profile created", body = User),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered"),
        (status = 429, description = "Too many attempts")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    let user = state
        .services
        .auth()
        .register(NewUser {
            email: payload.email,
            name: payload.name,
            role: payload.role,
            phone: payload.phone,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Current user, with seller and store for sellers
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Authentication",
    responses(
        (status = 200, description = "Caller profile", body = MeResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<MeResponse>> {
    Ok(Json(state.services.auth().me(user.id).await?))
}
