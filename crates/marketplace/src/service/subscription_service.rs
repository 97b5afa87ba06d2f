//! Subscription plans, seller subscriptions and catalog quotas.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{
    default_plans, CatalogLimits, LimitCheck, LimitGuard, NewPlan, PlanUpdate, QuotaKind, Seller,
    SubscriptionPlan,
};

use crate::repository::{
    PlanRepository, ProductRepository, SellerRepository, ServiceRepository, StoreRepository,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SubscriptionService: Send + Sync {
    /// Active plans, lowest priority first
    async fn list_active_plans(&self) -> AppResult<Vec<SubscriptionPlan>>;

    async fn list_all_plans(&self) -> AppResult<Vec<SubscriptionPlan>>;

    async fn get_plan(&self, id: Uuid) -> AppResult<SubscriptionPlan>;

    async fn create_plan(&self, plan: NewPlan) -> AppResult<SubscriptionPlan>;

    async fn update_plan(&self, id: Uuid, changes: PlanUpdate) -> AppResult<SubscriptionPlan>;

    /// Move a seller onto an active plan. Expiry defaults to one period from now.
    async fn update_seller_subscription(
        &self,
        seller_id: Uuid,
        plan_id: Uuid,
        expires_at: Option<DateTime<Utc>>,
    ) -> AppResult<Seller>;

    async fn check_product_limit(&self, seller_id: Uuid) -> AppResult<LimitCheck>;

    async fn check_service_limit(&self, seller_id: Uuid) -> AppResult<LimitCheck>;

    async fn limits(&self, seller_id: Uuid) -> AppResult<CatalogLimits>;

    /// Pre-check a quota and hand back the ceiling for the locked insert.
    ///
    /// Fails with a subscription error when the seller is already at the limit.
    async fn admit(&self, seller_id: Uuid, kind: QuotaKind) -> AppResult<LimitGuard>;

    /// Install the default catalogue on an empty plan table; returns how many were created.
    async fn initialize_default_plans(&self) -> AppResult<usize>;
}

pub struct SubscriptionManager {
    plans: Arc<dyn PlanRepository>,
    sellers: Arc<dyn SellerRepository>,
    stores: Arc<dyn StoreRepository>,
    products: Arc<dyn ProductRepository>,
    services: Arc<dyn ServiceRepository>,
    period: Duration,
}

impl SubscriptionManager {
    pub fn new(
        plans: Arc<dyn PlanRepository>,
        sellers: Arc<dyn SellerRepository>,
        stores: Arc<dyn StoreRepository>,
        products: Arc<dyn ProductRepository>,
        services: Arc<dyn ServiceRepository>,
        period: Duration,
    ) -> Self {
        Self {
            plans,
            sellers,
            stores,
            products,
            services,
            period,
        }
    }

    /// Seller's plan, provided the subscription is currently active.
    async fn active_plan(&self, seller_id: Uuid) -> AppResult<SubscriptionPlan> {
        let seller = self.sellers.find_by_id(seller_id).await?.ok_or_not_found()?;

        let plan_id = seller
            .subscription_plan_id
            .ok_or_else(|| AppError::subscription("No active subscription plan"))?;

        if !seller.has_active_subscription(Utc::now()) {
            return Err(AppError::subscription("Subscription is not active"));
        }

        self.plans
            .find_by_id(plan_id)
            .await?
            .ok_or_else(|| AppError::subscription("No active subscription plan"))
    }

    /// Non-archived items of `kind` in the seller's store; zero without a store.
    async fn current_count(&self, seller_id: Uuid, kind: QuotaKind) -> AppResult<u64> {
        let Some(store) = self.stores.find_by_seller_id(seller_id).await? else {
            return Ok(0);
        };
        match kind {
            QuotaKind::Products => self.products.count_live_by_store(store.id).await,
            QuotaKind::Services => self.services.count_live_by_store(store.id).await,
        }
    }

    async fn check(&self, seller_id: Uuid, kind: QuotaKind) -> AppResult<LimitCheck> {
        let plan = self.active_plan(seller_id).await?;
        let current = self.current_count(seller_id, kind).await?;
        Ok(LimitCheck::evaluate(kind.max_for(&plan), current))
    }
}

#[async_trait]
impl SubscriptionService for SubscriptionManager {
    async fn list_active_plans(&self) -> AppResult<Vec<SubscriptionPlan>> {
        self.plans.list_active().await
    }

    async fn list_all_plans(&self) -> AppResult<Vec<SubscriptionPlan>> {
        self.plans.list_all().await
    }

    async fn get_plan(&self, id: Uuid) -> AppResult<SubscriptionPlan> {
        self.plans.find_by_id(id).await?.ok_or_not_found()
    }

    async fn create_plan(&self, plan: NewPlan) -> AppResult<SubscriptionPlan> {
        plan.validate()?;

        if self.plans.find_by_slug(&plan.slug).await?.is_some() {
            return Err(AppError::conflict(format!("Plan '{}'", plan.slug)));
        }

        let created = self.plans.create(plan).await?;
        info!(plan_id = %created.id, slug = %created.slug, "Subscription plan created");
        Ok(created)
    }

    async fn update_plan(&self, id: Uuid, changes: PlanUpdate) -> AppResult<SubscriptionPlan> {
        changes.validate()?;
        self.plans.find_by_id(id).await?.ok_or_not_found()?;
        self.plans.update(id, changes).await
    }

    async fn update_seller_subscription(
        &self,
        seller_id: Uuid,
        plan_id: Uuid,
        expires_at: Option<DateTime<Utc>>,
    ) -> AppResult<Seller> {
        let plan = self.plans.find_by_id(plan_id).await?.ok_or_not_found()?;
        if !plan.is_active {
            return Err(AppError::validation(format!(
                "Plan '{}' is no longer offered",
                plan.slug
            )));
        }

        let now = Utc::now();
        let expires_at = expires_at.unwrap_or(now + self.period);
        if expires_at <= now {
            return Err(AppError::validation("Expiry must be in the future"));
        }

        let seller = self
            .sellers
            .update_subscription(seller_id, plan.id, expires_at)
            .await?;

        info!(
            seller_id = %seller.id,
            plan = %plan.slug,
            expires_at = %expires_at,
            "Seller subscription updated"
        );
        Ok(seller)
    }

    async fn check_product_limit(&self, seller_id: Uuid) -> AppResult<LimitCheck> {
        self.check(seller_id, QuotaKind::Products).await
    }

    async fn check_service_limit(&self, seller_id: Uuid) -> AppResult<LimitCheck> {
        self.check(seller_id, QuotaKind::Services).await
    }

    async fn limits(&self, seller_id: Uuid) -> AppResult<CatalogLimits> {
        let plan = self.active_plan(seller_id).await?;
        let (products, services) = futures::try_join!(
            self.current_count(seller_id, QuotaKind::Products),
            self.current_count(seller_id, QuotaKind::Services),
        )?;

        Ok(CatalogLimits {
            products: LimitCheck::evaluate(plan.max_products, products),
            services: LimitCheck::evaluate(plan.max_services, services),
        })
    }

    async fn admit(&self, seller_id: Uuid, kind: QuotaKind) -> AppResult<LimitGuard> {
        let check = self.check(seller_id, kind).await?;
        let guard = LimitGuard {
            seller_id,
            max: check.max,
        };

        if !check.allowed {
            warn!(
                seller_id = %seller_id,
                quota = kind.label(),
                max = check.max,
                current = check.current,
                "Catalog limit reached"
            );
            return Err(guard.exceeded(kind).into());
        }

        Ok(guard)
    }

    async fn initialize_default_plans(&self) -> AppResult<usize> {
        if self.plans.count().await? > 0 {
            return Ok(0);
        }

        let mut created = 0;
        for plan in default_plans() {
            self.plans.create(plan).await?;
            created += 1;
        }
        info!(created, "Default subscription plans installed");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{
        MockPlanRepository, MockProductRepository, MockSellerRepository, MockServiceRepository,
        MockStoreRepository,
    };
    use crate::service::fixtures;
    use domain::{StoreStatus, SubscriptionStatus, UNLIMITED};
    use tokio_test::{assert_err, assert_ok};

    struct Repos {
        plans: MockPlanRepository,
        sellers: MockSellerRepository,
        stores: MockStoreRepository,
        products: MockProductRepository,
        services: MockServiceRepository,
    }

    impl Repos {
        fn new() -> Self {
            Self {
                plans: MockPlanRepository::new(),
                sellers: MockSellerRepository::new(),
                stores: MockStoreRepository::new(),
                products: MockProductRepository::new(),
                services: MockServiceRepository::new(),
            }
        }

        /// Seller on `plan` with an approved store holding `products` live products.
        fn with_seller(plan: SubscriptionPlan, status: SubscriptionStatus, products: u64) -> (Self, Uuid) {
            let mut repos = Self::new();
            let seller = fixtures::seller(Some(plan.id), status);
            let seller_id = seller.id;
            let store = fixtures::store(seller_id, StoreStatus::Approved);

            repos
                .sellers
                .expect_find_by_id()
                .returning(move |_| Ok(Some(seller.clone())));
            repos
                .plans
                .expect_find_by_id()
                .returning(move |_| Ok(Some(plan.clone())));
            repos
                .stores
                .expect_find_by_seller_id()
                .returning(move |_| Ok(Some(store.clone())));
            repos
                .products
                .expect_count_live_by_store()
                .returning(move |_| Ok(products));
            repos
                .services
                .expect_count_live_by_store()
                .returning(|_| Ok(0));
            (repos, seller_id)
        }

        fn build(self) -> SubscriptionManager {
            SubscriptionManager::new(
                Arc::new(self.plans),
                Arc::new(self.sellers),
                Arc::new(self.stores),
                Arc::new(self.products),
                Arc::new(self.services),
                Duration::days(30),
            )
        }
    }

    #[tokio::test]
    async fn limit_reached_at_ten_of_ten() {
        let (repos, seller_id) =
            Repos::with_seller(fixtures::plan(10, 5), SubscriptionStatus::Active, 10);
        let check = repos.build().check_product_limit(seller_id).await.unwrap();
        assert_eq!(check, LimitCheck { allowed: false, max: 10, current: 10 });
    }

    #[tokio::test]
    async fn nine_of_ten_is_allowed() {
        let (repos, seller_id) =
            Repos::with_seller(fixtures::plan(10, 5), SubscriptionStatus::Active, 9);
        assert!(repos.build().check_product_limit(seller_id).await.unwrap().allowed);
    }

    #[tokio::test]
    async fn unlimited_plan_always_admits() {
        let (repos, seller_id) = Repos::with_seller(
            fixtures::plan(UNLIMITED, UNLIMITED),
            SubscriptionStatus::Active,
            50_000,
        );
        let guard = assert_ok!(repos.build().admit(seller_id, QuotaKind::Products).await);
        assert_eq!(guard.max, UNLIMITED);
    }

    #[tokio::test]
    async fn admit_at_limit_is_a_subscription_error() {
        let (repos, seller_id) =
            Repos::with_seller(fixtures::plan(10, 5), SubscriptionStatus::Active, 10);
        let err = repos
            .build()
            .admit(seller_id, QuotaKind::Products)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Subscription(ref msg) if msg.contains("limit reached")));
    }

    #[tokio::test]
    async fn inactive_subscription_fails() {
        let (repos, seller_id) =
            Repos::with_seller(fixtures::plan(10, 5), SubscriptionStatus::Expired, 0);
        let err = repos.build().check_service_limit(seller_id).await.unwrap_err();
        assert!(matches!(err, AppError::Subscription(_)));
    }

    #[tokio::test]
    async fn no_plan_fails() {
        let mut repos = Repos::new();
        let seller = fixtures::seller(None, SubscriptionStatus::Active);
        let seller_id = seller.id;
        repos
            .sellers
            .expect_find_by_id()
            .returning(move |_| Ok(Some(seller.clone())));

        assert!(matches!(
            repos.build().check_product_limit(seller_id).await,
            Err(AppError::Subscription(_))
        ));
    }

    #[tokio::test]
    async fn subscription_defaults_to_one_period() {
        let mut repos = Repos::new();
        let plan = fixtures::plan(10, 5);
        let plan_id = plan.id;
        repos
            .plans
            .expect_find_by_id()
            .returning(move |_| Ok(Some(plan.clone())));
        repos
            .sellers
            .expect_update_subscription()
            .withf(move |_, id, expires_at| {
                let days = (*expires_at - Utc::now()).num_days();
                *id == plan_id && (29..=30).contains(&days)
            })
            .times(1)
            .returning(|_, plan_id, expires_at| {
                let mut seller = fixtures::seller(Some(plan_id), SubscriptionStatus::Active);
                seller.subscription_expires_at = Some(expires_at);
                Ok(seller)
            });

        let seller = assert_ok!(
            repos
                .build()
                .update_seller_subscription(Uuid::new_v4(), plan_id, None)
                .await
        );
        assert_eq!(seller.subscription_status, SubscriptionStatus::Active);
    }

    #[tokio::test]
    async fn inactive_plan_cannot_be_assigned() {
        let mut repos = Repos::new();
        let mut plan = fixtures::plan(10, 5);
        plan.is_active = false;
        let plan_id = plan.id;
        repos
            .plans
            .expect_find_by_id()
            .returning(move |_| Ok(Some(plan.clone())));
        repos.sellers.expect_update_subscription().never();

        let result = repos
            .build()
            .update_seller_subscription(Uuid::new_v4(), plan_id, None)
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn defaults_installed_only_once() {
        let mut repos = Repos::new();
        repos.plans.expect_count().times(1).returning(|| Ok(0));
        repos
            .plans
            .expect_create()
            .times(3)
            .returning(|_| Ok(fixtures::plan(10, 5)));
        assert_eq!(repos.build().initialize_default_plans().await.unwrap(), 3);

        let mut repos = Repos::new();
        repos.plans.expect_count().returning(|| Ok(3));
        repos.plans.expect_create().never();
        assert_eq!(repos.build().initialize_default_plans().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn duplicate_slug_conflicts() {
        let mut repos = Repos::new();
        repos
            .plans
            .expect_find_by_slug()
            .returning(|_| Ok(Some(fixtures::plan(10, 5))));
        repos.plans.expect_create().never();

        let plan = default_plans().remove(0);
        assert_err!(repos.build().create_plan(plan).await);
    }
}
