//! Registration and bearer tokens through the real `Authenticator`.

mod support;

use std::sync::Arc;

use common::{AppError, JwtConfig};
use domain::{NewUser, UserRole};
use marketplace_lib::service::{AuthService, Authenticator};
use support::InMemory;

const SECRET: &str = "integration-test-secret-32-chars-min";

fn authenticator(db: Arc<InMemory>, secret: &str) -> Authenticator {
    Authenticator::new(
        db.clone(),
        db,
        JwtConfig {
            secret: secret.to_string(),
            expiration_hours: 1,
        },
    )
}

fn new_user(email: &str, role: UserRole) -> NewUser {
    NewUser {
        email: email.to_string(),
        name: "Meera".to_string(),
        role,
        phone: None,
    }
}

#[tokio::test]
async fn test_register_then_token_round_trip() {
    let db = Arc::new(InMemory::default());
    let auth = authenticator(db, SECRET);

    let user = auth
        .register(new_user("meera@example.com", UserRole::Customer))
        .await
        .unwrap();
    let token = auth.token_for_email("meera@example.com").await.unwrap();

    assert_eq!(token.token_type, "Bearer");
    assert_eq!(token.expires_in, 3600);

    let claims = auth.verify_token(&token.access_token).unwrap();
    assert_eq!(claims.sub, user.id);
    assert_eq!(claims.role, UserRole::Customer);
}

#[tokio::test]
async fn test_email_is_never_reused() {
    let db = Arc::new(InMemory::default());
    let auth = authenticator(db.clone(), SECRET);

    auth.register(new_user("dup@example.com", UserRole::Seller))
        .await
        .unwrap();

    // a soft-deleted profile still owns its email
    db.users.lock().unwrap()[0].deleted_at = Some(chrono::Utc::now());

    let err = auth
        .register(new_user("dup@example.com", UserRole::Customer))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // and cannot be issued tokens
    assert!(matches!(
        auth.token_for_email("dup@example.com").await.unwrap_err(),
        AppError::NotFound
    ));
}

#[tokio::test]
async fn test_admin_cannot_self_register() {
    let auth = authenticator(Arc::new(InMemory::default()), SECRET);

    let err = auth
        .register(new_user("boss@example.com", UserRole::Admin))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_foreign_or_tampered_tokens_are_rejected() {
    let db = Arc::new(InMemory::default());
    let ours = authenticator(db.clone(), SECRET);
    let theirs = authenticator(db, "some-other-secret-that-is-32-chars!");

    ours.register(new_user("ana@example.com", UserRole::Customer))
        .await
        .unwrap();
    let foreign = theirs.token_for_email("ana@example.com").await.unwrap();
    assert!(ours.verify_token(&foreign.access_token).is_err());

    let mut token = ours
        .token_for_email("ana@example.com")
        .await
        .unwrap()
        .access_token;
    token.push('x');
    assert!(ours.verify_token(&token).is_err());
    assert!(ours.verify_token("").is_err());
}

#[tokio::test]
async fn test_me_includes_seller_and_store() {
    let db = Arc::new(InMemory::default());
    let auth = authenticator(db.clone(), SECRET);

    let customer = auth
        .register(new_user("c@example.com", UserRole::Customer))
        .await
        .unwrap();
    let me = auth.me(customer.id).await.unwrap();
    assert!(me.seller.is_none() && me.store.is_none());

    let seller_user = auth
        .register(new_user("s@example.com", UserRole::Seller))
        .await
        .unwrap();
    let (_, store) = db.add_seller_with_store();
    db.sellers.lock().unwrap()[0].user_id = seller_user.id;

    let me = auth.me(seller_user.id).await.unwrap();
    assert_eq!(me.store.map(|s| s.id), Some(store.id));
}
