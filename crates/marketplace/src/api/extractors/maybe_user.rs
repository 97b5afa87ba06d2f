//! Optional caller identity for public routes.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use common::AppError;

use crate::api::middleware::CurrentUser;
use crate::api::AppState;

/// The caller when a bearer token is supplied, `None` for anonymous requests.
///
/// A token that is present but fails verification is rejected with 401.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<CurrentUser>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = Option::<TypedHeader<Authorization<Bearer>>>::from_request_parts(parts, state)
            .await
            .ok()
            .flatten();

        let Some(TypedHeader(Authorization(bearer))) = header else {
            return Ok(MaybeUser(None));
        };

        let claims = state.services.auth().verify_token(bearer.token())?;
        Ok(MaybeUser(Some(CurrentUser::from(claims))))
    }
}
