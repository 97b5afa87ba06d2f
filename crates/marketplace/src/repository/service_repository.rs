//! Bookable service repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IsolationLevel,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::service::{self, ActiveModel, Entity as ServiceEntity};
use super::entities::to_json;
use super::lock_seller;
use crate::infra::in_transaction;
use common::{AppError, AppResult};
use domain::{
    ItemStatus, LimitGuard, NewService, PageRequest, QuotaKind, Service, ServiceUpdate,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Service>>;

    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Service>>;

    /// Newest first, optionally filtered by status
    async fn list_by_store(
        &self,
        store_id: Uuid,
        status: Option<ItemStatus>,
        page: PageRequest,
    ) -> AppResult<(Vec<Service>, u64)>;

    /// Insert the service if the seller is still under `guard.max`.
    async fn create_within_limit(&self, service: NewService, guard: LimitGuard)
        -> AppResult<Service>;

    async fn update(&self, id: Uuid, changes: ServiceUpdate) -> AppResult<Service>;

    /// Soft delete
    async fn archive(&self, id: Uuid) -> AppResult<Service>;

    /// Services that are not archived
    async fn count_live_by_store(&self, store_id: Uuid) -> AppResult<u64>;
}

pub struct ServiceStore {
    db: DatabaseConnection,
}

impl ServiceStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ServiceRepository for ServiceStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Service>> {
        let result = ServiceEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Service::from))
    }

    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Service>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = ServiceEntity::find()
            .filter(service::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Service::from).collect())
    }

    async fn list_by_store(
        &self,
        store_id: Uuid,
        status: Option<ItemStatus>,
        page: PageRequest,
    ) -> AppResult<(Vec<Service>, u64)> {
        let mut query = ServiceEntity::find().filter(service::Column::StoreId.eq(store_id));
        if let Some(status) = status {
            query = query.filter(service::Column::Status.eq(status.as_str()));
        }

        let paginator = query
            .order_by_desc(service::Column::CreatedAt)
            .paginate(&self.db, page.limit);
        let total = paginator.num_items().await.map_err(AppError::from)?;
        let models = paginator
            .fetch_page(page.index())
            .await
            .map_err(AppError::from)?;

        Ok((models.into_iter().map(Service::from).collect(), total))
    }

    async fn create_within_limit(
        &self,
        new_service: NewService,
        guard: LimitGuard,
    ) -> AppResult<Service> {
        in_transaction(&self.db, IsolationLevel::ReadCommitted, move |txn| {
            Box::pin(async move {
                lock_seller(txn, guard.seller_id).await?;

                let current = ServiceEntity::find()
                    .filter(service::Column::StoreId.eq(new_service.store_id))
                    .filter(service::Column::Status.ne(ItemStatus::Archived.as_str()))
                    .count(txn)
                    .await?;
                if !guard.admits(current) {
                    tracing::warn!(
                        seller_id = %guard.seller_id,
                        current,
                        max = guard.max,
                        "Service limit reached at insert"
                    );
                    return Err(guard.exceeded(QuotaKind::Services).into());
                }

                let now = chrono::Utc::now();
                let model = ActiveModel {
                    id: Set(Uuid::new_v4()),
                    store_id: Set(new_service.store_id),
                    title: Set(new_service.title),
                    description: Set(new_service.description),
                    category: Set(new_service.category),
                    images: Set(to_json(&new_service.images)),
                    duration: Set(new_service.duration),
                    base_price: Set(new_service.base_price),
                    price_variants: Set(to_json(&new_service.price_variants)),
                    availability: Set(new_service.availability),
                    location_type: Set(new_service.location_type.to_string()),
                    status: Set(ItemStatus::Draft.to_string()),
                    is_draft: Set(true),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(txn)
                .await?;

                Ok(Service::from(model))
            })
        })
        .await
    }

    async fn update(&self, id: Uuid, changes: ServiceUpdate) -> AppResult<Service> {
        let existing = ServiceEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = existing.into();

        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
        }
        if let Some(category) = changes.category {
            active.category = Set(category);
        }
        if let Some(images) = changes.images {
            active.images = Set(to_json(&images));
        }
        if let Some(duration) = changes.duration {
            active.duration = Set(duration);
        }
        if let Some(price) = changes.base_price {
            active.base_price = Set(price);
        }
        if let Some(variants) = changes.price_variants {
            active.price_variants = Set(to_json(&variants));
        }
        if let Some(availability) = changes.availability {
            active.availability = Set(Some(availability));
        }
        if let Some(location) = changes.location_type {
            active.location_type = Set(location.to_string());
        }
        if let Some(status) = changes.status {
            active.status = Set(status.to_string());
        }
        if let Some(is_draft) = changes.is_draft {
            active.is_draft = Set(is_draft);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Service::from(model))
    }

    async fn archive(&self, id: Uuid) -> AppResult<Service> {
        let existing = ServiceEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        active.status = Set(ItemStatus::Archived.to_string());
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Service::from(model))
    }

    async fn count_live_by_store(&self, store_id: Uuid) -> AppResult<u64> {
        ServiceEntity::find()
            .filter(service::Column::StoreId.eq(store_id))
            .filter(service::Column::Status.ne(ItemStatus::Archived.as_str()))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }
}
