//! Bearer token authentication and role gates.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{UserRole, BEARER_TOKEN_PREFIX};

use crate::api::AppState;
use crate::service::Claims;

/// Authenticated caller extracted from the access token
#[derive(Clone, Debug, PartialEq)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// Token from an `Authorization: Bearer <token>` header, if present.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// JWT authentication middleware.
///
/// Verifies the bearer token and injects the [`CurrentUser`] into the
/// request extensions. Requests without a valid token never reach a handler.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or(AppError::Unauthorized)?;
    let claims = state.services.auth().verify_token(token)?;

    request.extensions_mut().insert(CurrentUser::from(claims));

    Ok(next.run(request).await)
}

/// Fail with Forbidden unless the caller holds one of `roles`.
pub fn authorize(user: &CurrentUser, roles: &[UserRole]) -> AppResult<()> {
    if roles.contains(&user.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

async fn gate(roles: &[UserRole], request: Request, next: Next) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::Unauthorized)?;
    authorize(user, roles)?;

    Ok(next.run(request).await)
}

/// Role gate for admin-only routes. Must run after [`auth_middleware`].
pub async fn admin_only(request: Request, next: Next) -> Result<Response, AppError> {
    gate(&[UserRole::Admin], request, next).await
}

/// Role gate for seller tooling; admins pass too.
pub async fn seller_or_admin(request: Request, next: Next) -> Result<Response, AppError> {
    gate(&[UserRole::Seller, UserRole::Admin], request, next).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn caller(role: UserRole) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            email: "caller@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn authorize_checks_membership() {
        let roles = [UserRole::Seller, UserRole::Admin];
        assert!(authorize(&caller(UserRole::Seller), &roles).is_ok());
        assert!(authorize(&caller(UserRole::Admin), &roles).is_ok());
        assert!(matches!(
            authorize(&caller(UserRole::Customer), &roles),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn bearer_token_requires_scheme() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));
    }
}
