//! Plan quotas enforced end to end through the real subscription and
//! catalog managers, backed by in-memory repositories.

mod support;

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use common::AppError;
use domain::{LocationType, NewProduct, NewService, NewVariant, PlanUpdate};
use marketplace_lib::service::{
    CatalogManager, CatalogService, SubscriptionManager, SubscriptionService,
};
use support::InMemory;

struct Harness {
    db: Arc<InMemory>,
    subscriptions: Arc<dyn SubscriptionService>,
    catalog: CatalogManager,
}

fn harness() -> Harness {
    let db = Arc::new(InMemory::default());
    let subscriptions: Arc<dyn SubscriptionService> = Arc::new(SubscriptionManager::new(
        db.clone(),
        db.clone(),
        db.clone(),
        db.clone(),
        db.clone(),
        Duration::days(30),
    ));
    let catalog = CatalogManager::new(db.clone(), db.clone(), subscriptions.clone());

    Harness {
        db,
        subscriptions,
        catalog,
    }
}

fn product(store_id: Uuid, sku: &str) -> NewProduct {
    NewProduct {
        store_id,
        title: format!("Tea {}", sku),
        description: None,
        category: "Beverages".to_string(),
        images: vec!["https://cdn.example.com/tea.png".to_string()],
        variants: vec![NewVariant {
            sku: sku.to_string(),
            name: "250g".to_string(),
            attributes: BTreeMap::new(),
            price: 12_000,
            compare_at_price: None,
            stock: 20,
            is_available: true,
            images: vec![],
        }],
    }
}

fn service(store_id: Uuid, title: &str) -> NewService {
    NewService {
        store_id,
        title: title.to_string(),
        description: None,
        category: "Salon".to_string(),
        images: vec![],
        duration: 30,
        base_price: 25_000,
        price_variants: vec![],
        availability: None,
        location_type: LocationType::AtStore,
    }
}

/// Install the default plans and put a fresh seller on `slug`.
async fn subscribed_seller(h: &Harness, slug: &str) -> (Uuid, Uuid) {
    h.subscriptions.initialize_default_plans().await.unwrap();
    let plan = h
        .subscriptions
        .list_active_plans()
        .await
        .unwrap()
        .into_iter()
        .find(|p| p.slug == slug)
        .unwrap();

    let (seller, store) = h.db.add_seller_with_store();
    h.subscriptions
        .update_seller_subscription(seller.id, plan.id, None)
        .await
        .unwrap();
    (seller.id, store.id)
}

#[tokio::test]
async fn test_default_plans_installed_once() {
    let h = harness();

    assert_eq!(h.subscriptions.initialize_default_plans().await.unwrap(), 3);
    assert_eq!(h.subscriptions.initialize_default_plans().await.unwrap(), 0);

    let slugs: Vec<_> = h
        .subscriptions
        .list_active_plans()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.slug)
        .collect();
    assert_eq!(slugs, vec!["basic", "standard", "premium"]);
}

#[tokio::test]
async fn test_basic_plan_stops_at_ten_products() {
    let h = harness();
    let (seller_id, store_id) = subscribed_seller(&h, "basic").await;

    for i in 0..10 {
        h.catalog
            .create_product(seller_id, product(store_id, &format!("SKU-{}", i)))
            .await
            .unwrap();
    }

    let limits = h.subscriptions.limits(seller_id).await.unwrap();
    assert_eq!(limits.products.current, 10);
    assert!(!limits.products.allowed);

    let err = h
        .catalog
        .create_product(seller_id, product(store_id, "SKU-10"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Subscription(_)));
    assert_eq!(h.db.products.lock().unwrap().len(), 10);
}

#[tokio::test]
async fn test_archived_products_free_a_slot() {
    let h = harness();
    let (seller_id, store_id) = subscribed_seller(&h, "basic").await;

    let mut first = None;
    for i in 0..10 {
        let created = h
            .catalog
            .create_product(seller_id, product(store_id, &format!("SKU-{}", i)))
            .await
            .unwrap();
        first.get_or_insert(created.id);
    }

    let archived = h.catalog.delete_product(first.unwrap()).await.unwrap();
    assert_eq!(archived.status, domain::ItemStatus::Archived);

    // still readable after archiving
    assert!(h.catalog.get_product(archived.id).await.is_ok());

    let created = h
        .catalog
        .create_product(seller_id, product(store_id, "SKU-10"))
        .await
        .unwrap();
    assert!(created.is_draft);
}

#[tokio::test]
async fn test_reused_sku_conflicts_before_quota() {
    let h = harness();
    let (seller_id, store_id) = subscribed_seller(&h, "standard").await;

    h.catalog
        .create_product(seller_id, product(store_id, "CHAI-1"))
        .await
        .unwrap();
    let err = h
        .catalog
        .create_product(seller_id, product(store_id, "CHAI-1"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_service_quota_is_separate() {
    let h = harness();
    let (seller_id, store_id) = subscribed_seller(&h, "basic").await;

    for i in 0..5 {
        h.catalog
            .create_service(seller_id, service(store_id, &format!("Cut {}", i)))
            .await
            .unwrap();
    }
    let err = h
        .catalog
        .create_service(seller_id, service(store_id, "One more"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Subscription(_)));

    // product quota untouched
    let limits = h.subscriptions.limits(seller_id).await.unwrap();
    assert_eq!(limits.products.current, 0);
    assert!(limits.products.allowed);
}

#[tokio::test]
async fn test_premium_is_unlimited() {
    let h = harness();
    let (seller_id, store_id) = subscribed_seller(&h, "premium").await;

    for i in 0..25 {
        h.catalog
            .create_product(seller_id, product(store_id, &format!("P-{}", i)))
            .await
            .unwrap();
    }

    let check = h.subscriptions.check_product_limit(seller_id).await.unwrap();
    assert!(check.allowed);
    assert_eq!(check.max, domain::UNLIMITED);
}

#[tokio::test]
async fn test_seller_without_plan_cannot_list() {
    let h = harness();
    let (seller, store) = h.db.add_seller_with_store();

    let err = h
        .catalog
        .create_product(seller.id, product(store.id, "X-1"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Subscription(_)));
}

#[tokio::test]
async fn test_expired_subscription_blocks_creation() {
    let h = harness();
    let (seller_id, store_id) = subscribed_seller(&h, "standard").await;

    h.db.sellers
        .lock()
        .unwrap()
        .iter_mut()
        .for_each(|s| s.subscription_expires_at = Some(Utc::now() - Duration::hours(1)));

    let err = h
        .catalog
        .create_product(seller_id, product(store_id, "LATE-1"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Subscription(_)));
}

#[tokio::test]
async fn test_retired_plan_cannot_be_assigned() {
    let h = harness();
    let (seller_id, _) = subscribed_seller(&h, "basic").await;
    let standard = h
        .subscriptions
        .list_all_plans()
        .await
        .unwrap()
        .into_iter()
        .find(|p| p.slug == "standard")
        .unwrap();

    h.subscriptions
        .update_plan(
            standard.id,
            PlanUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let err = h
        .subscriptions
        .update_seller_subscription(seller_id, standard.id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(h.subscriptions.list_all_plans().await.unwrap().len(), 3);
    assert_eq!(h.subscriptions.list_active_plans().await.unwrap().len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_creations_take_only_the_last_slot() {
    let h = harness();
    let (seller_id, store_id) = subscribed_seller(&h, "basic").await;
    for i in 0..9 {
        h.catalog
            .create_product(seller_id, product(store_id, &format!("SKU-{}", i)))
            .await
            .unwrap();
    }

    let catalog = Arc::new(CatalogManager::new(
        h.db.clone(),
        h.db.clone(),
        h.subscriptions.clone(),
    ));
    let attempts: Vec<_> = (0..8)
        .map(|i| {
            let catalog = catalog.clone();
            tokio::spawn(async move {
                catalog
                    .create_product(seller_id, product(store_id, &format!("RACE-{}", i)))
                    .await
            })
        })
        .collect();

    let mut created = 0;
    for attempt in futures::future::join_all(attempts).await {
        match attempt.unwrap() {
            Ok(_) => created += 1,
            Err(err) => assert!(matches!(err, AppError::Subscription(_)), "{:?}", err),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(h.db.products.lock().unwrap().len(), 10);
}
