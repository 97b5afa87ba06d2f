//! Subscription plan repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::conflict_on_unique;
use super::entities::subscription_plan::{self, ActiveModel, Entity as PlanEntity};
use super::entities::to_json;
use common::{AppError, AppResult};
use domain::{NewPlan, PlanUpdate, SubscriptionPlan};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PlanRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SubscriptionPlan>>;

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<SubscriptionPlan>>;

    /// Active plans ordered by priority, lowest first
    async fn list_active(&self) -> AppResult<Vec<SubscriptionPlan>>;

    /// Every plan, inactive included
    async fn list_all(&self) -> AppResult<Vec<SubscriptionPlan>>;

    async fn create(&self, plan: NewPlan) -> AppResult<SubscriptionPlan>;

    /// Apply only the supplied fields
    async fn update(&self, id: Uuid, changes: PlanUpdate) -> AppResult<SubscriptionPlan>;

    async fn count(&self) -> AppResult<u64>;
}

pub struct PlanStore {
    db: DatabaseConnection,
}

impl PlanStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PlanRepository for PlanStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SubscriptionPlan>> {
        let result = PlanEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(SubscriptionPlan::from))
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<SubscriptionPlan>> {
        let result = PlanEntity::find()
            .filter(subscription_plan::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(SubscriptionPlan::from))
    }

    async fn list_active(&self) -> AppResult<Vec<SubscriptionPlan>> {
        let models = PlanEntity::find()
            .filter(subscription_plan::Column::IsActive.eq(true))
            .order_by_asc(subscription_plan::Column::Priority)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(SubscriptionPlan::from).collect())
    }

    async fn list_all(&self) -> AppResult<Vec<SubscriptionPlan>> {
        let models = PlanEntity::find()
            .order_by_asc(subscription_plan::Column::Priority)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(SubscriptionPlan::from).collect())
    }

    async fn create(&self, plan: NewPlan) -> AppResult<SubscriptionPlan> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(plan.name),
            slug: Set(plan.slug),
            description: Set(plan.description),
            price: Set(plan.price),
            max_products: Set(plan.max_products),
            max_services: Set(plan.max_services),
            features: Set(to_json(&plan.features)),
            commission_rate: Set(plan.commission_rate),
            is_featured: Set(plan.is_featured),
            analytics_access: Set(plan.analytics_access),
            priority: Set(plan.priority),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| conflict_on_unique(e, "Plan"))?;
        Ok(SubscriptionPlan::from(model))
    }

    async fn update(&self, id: Uuid, changes: PlanUpdate) -> AppResult<SubscriptionPlan> {
        let plan = PlanEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = plan.into();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
        }
        if let Some(price) = changes.price {
            active.price = Set(price);
        }
        if let Some(max) = changes.max_products {
            active.max_products = Set(max);
        }
        if let Some(max) = changes.max_services {
            active.max_services = Set(max);
        }
        if let Some(features) = changes.features {
            active.features = Set(to_json(&features));
        }
        if let Some(rate) = changes.commission_rate {
            active.commission_rate = Set(rate);
        }
        if let Some(featured) = changes.is_featured {
            active.is_featured = Set(featured);
        }
        if let Some(analytics) = changes.analytics_access {
            active.analytics_access = Set(analytics);
        }
        if let Some(priority) = changes.priority {
            active.priority = Set(priority);
        }
        if let Some(is_active) = changes.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(SubscriptionPlan::from(model))
    }

    async fn count(&self) -> AppResult<u64> {
        PlanEntity::find()
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }
}
