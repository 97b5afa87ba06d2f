//! Authentication service - bearer tokens and user profiles.
//!
//! Credentials are issued elsewhere (magic-code login); this service only
//! signs and verifies the resulting HS256 tokens and manages profiles.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use common::{AppError, AppResult, JwtConfig, OptionExt};
use domain::{NewUser, Seller, Store, User, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};

use crate::repository::{SellerRepository, UserRepository};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: domain::UserRole,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned to the credential issuer
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token expiration time in seconds
    pub expires_in: i64,
}

/// The caller's profile, with seller data when they have onboarded.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MeResponse {
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller: Option<Seller>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<Store>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a customer or seller profile. Emails are never reused.
    async fn register(&self, user: NewUser) -> AppResult<User>;

    async fn me(&self, user_id: Uuid) -> AppResult<MeResponse>;

    /// Mint a token for an existing active user
    async fn token_for_email(&self, email: &str) -> AppResult<TokenResponse>;

    fn issue_token(&self, user: &User) -> AppResult<TokenResponse>;

    /// Check signature and expiry
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    sellers: Arc<dyn SellerRepository>,
    jwt: JwtConfig,
}

impl Authenticator {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sellers: Arc<dyn SellerRepository>,
        jwt: JwtConfig,
    ) -> Self {
        Self { users, sellers, jwt }
    }

    fn secret(&self) -> &[u8] {
        self.jwt.secret.as_bytes()
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(&self, user: NewUser) -> AppResult<User> {
        user.validate()?;

        // soft-deleted profiles keep their email
        if self
            .users
            .find_by_email_with_deleted(&user.email)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("User"));
        }

        let created = self.users.create(user).await?;
        info!(user_id = %created.id, role = %created.role, "User registered");
        Ok(created)
    }

    async fn me(&self, user_id: Uuid) -> AppResult<MeResponse> {
        let user = self.users.find_by_id(user_id).await?.ok_or_not_found()?;

        let (seller, store) = match self.sellers.find_profile_by_user_id(user_id).await? {
            Some(profile) => (Some(profile.seller), profile.store),
            None => (None, None),
        };

        Ok(MeResponse { user, seller, store })
    }

    async fn token_for_email(&self, email: &str) -> AppResult<TokenResponse> {
        let user = self.users.find_by_email(email).await?.ok_or_not_found()?;
        self.issue_token(&user)
    }

    fn issue_token(&self, user: &User) -> AppResult<TokenResponse> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.jwt.expiration_hours);

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(self.secret()))?;

        Ok(TokenResponse {
            access_token: token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.jwt.expiration_hours * SECONDS_PER_HOUR,
        })
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret()),
            &Validation::default(),
        )?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockSellerRepository, MockUserRepository};
    use crate::service::fixtures;
    use domain::{SellerProfile, SubscriptionStatus, UserRole};
    use mockall::predicate::eq;

    fn jwt() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-minimum-32-chars!!".to_string(),
            expiration_hours: 1,
        }
    }

    fn new_user() -> NewUser {
        NewUser {
            email: "a@x.com".to_string(),
            name: "Asha".to_string(),
            role: UserRole::Customer,
            phone: None,
        }
    }

    fn service(users: MockUserRepository, sellers: MockSellerRepository) -> Authenticator {
        Authenticator::new(Arc::new(users), Arc::new(sellers), jwt())
    }

    #[tokio::test]
    async fn register_then_duplicate_conflicts() {
        let existing = fixtures::user(UserRole::Customer);
        let mut users = MockUserRepository::new();
        let mut seen = false;
        users
            .expect_find_by_email_with_deleted()
            .with(eq("a@x.com"))
            .times(2)
            .returning(move |_| {
                let result = if seen { Some(existing.clone()) } else { None };
                seen = true;
                Ok(result)
            });
        users
            .expect_create()
            .times(1)
            .returning(|_| Ok(fixtures::user(UserRole::Customer)));

        let auth = service(users, MockSellerRepository::new());

        assert!(auth.register(new_user()).await.is_ok());
        let err = auth.register(new_user()).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref what) if what == "User"));
    }

    #[tokio::test]
    async fn admin_role_cannot_register() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email_with_deleted().never();
        let auth = service(users, MockSellerRepository::new());

        let mut admin = new_user();
        admin.role = UserRole::Admin;
        assert!(matches!(auth.register(admin).await, Err(AppError::Validation(_))));
    }

    #[test]
    fn token_round_trip_and_tamper() {
        let auth = service(MockUserRepository::new(), MockSellerRepository::new());
        let user = fixtures::user(UserRole::Seller);

        let token = auth.issue_token(&user).unwrap();
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 3600);

        let claims = auth.verify_token(&token.access_token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, UserRole::Seller);

        let other = Authenticator::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MockSellerRepository::new()),
            JwtConfig {
                secret: "another-secret-key-minimum-32-chars".to_string(),
                expiration_hours: 1,
            },
        );
        assert!(other.verify_token(&token.access_token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let auth = Authenticator::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MockSellerRepository::new()),
            JwtConfig {
                expiration_hours: -2,
                ..jwt()
            },
        );
        let token = auth.issue_token(&fixtures::user(UserRole::Customer)).unwrap();
        assert!(matches!(auth.verify_token(&token.access_token), Err(AppError::Jwt(_))));
    }

    #[tokio::test]
    async fn me_includes_seller_and_store() {
        let user = fixtures::user(UserRole::Seller);
        let seller = fixtures::seller(None, SubscriptionStatus::Expired);
        let store = fixtures::store(seller.id, domain::StoreStatus::Pending);
        let user_id = user.id;

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        let mut sellers = MockSellerRepository::new();
        let profile = SellerProfile {
            seller: seller.clone(),
            store: Some(store.clone()),
        };
        sellers
            .expect_find_profile_by_user_id()
            .with(eq(user_id))
            .returning(move |_| Ok(Some(profile.clone())));

        let me = service(users, sellers).me(user_id).await.unwrap();
        assert_eq!(me.seller.map(|s| s.id), Some(seller.id));
        assert_eq!(me.store.map(|s| s.id), Some(store.id));
    }
}
