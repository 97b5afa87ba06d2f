//! Store repository.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::conflict_on_unique;
use super::entities::store::{self, ActiveModel, Entity as StoreEntity};
use super::entities::to_json;
use common::{AppError, AppResult};
use domain::{NewStore, PageRequest, Store, StoreFilter, StoreStatus, StoreUpdate};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait StoreRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Store>>;

    async fn find_by_seller_id(&self, seller_id: Uuid) -> AppResult<Option<Store>>;

    /// Conflict if the seller already has a store
    async fn create(&self, seller_id: Uuid, store: NewStore) -> AppResult<Store>;

    /// Apply only the supplied fields. Status is never touched here.
    async fn update(&self, id: Uuid, changes: StoreUpdate) -> AppResult<Store>;

    /// Write a review outcome. Approval stamps `approved_at`/`approved_by`.
    async fn set_status(
        &self,
        id: Uuid,
        status: StoreStatus,
        reviewer: Option<Uuid>,
    ) -> AppResult<Store>;

    /// Newest first
    async fn search(&self, filter: StoreFilter, page: PageRequest) -> AppResult<(Vec<Store>, u64)>;

    /// Stores waiting for review, oldest first
    async fn list_pending(&self) -> AppResult<Vec<Store>>;

    async fn count(&self) -> AppResult<u64>;

    async fn count_by_status(&self, status: StoreStatus) -> AppResult<u64>;
}

pub struct StoreStore {
    db: DatabaseConnection,
}

impl StoreStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Escape LIKE wildcards in user input.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl StoreRepository for StoreStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Store>> {
        let result = StoreEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Store::from))
    }

    async fn find_by_seller_id(&self, seller_id: Uuid) -> AppResult<Option<Store>> {
        let result = StoreEntity::find()
            .filter(store::Column::SellerId.eq(seller_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Store::from))
    }

    async fn create(&self, seller_id: Uuid, new_store: NewStore) -> AppResult<Store> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            seller_id: Set(seller_id),
            name: Set(new_store.name),
            description: Set(new_store.description),
            category: Set(new_store.category),
            address: Set(to_json(&new_store.address)),
            contact_phone: Set(new_store.contact_phone),
            contact_email: Set(new_store.contact_email),
            logo: Set(new_store.logo),
            cover_image: Set(new_store.cover_image),
            status: Set(StoreStatus::Pending.to_string()),
            is_featured: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            approved_at: Set(None),
            approved_by: Set(None),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| conflict_on_unique(e, "Store"))?;
        Ok(Store::from(model))
    }

    async fn update(&self, id: Uuid, changes: StoreUpdate) -> AppResult<Store> {
        let existing = StoreEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = existing.into();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
        }
        if let Some(category) = changes.category {
            active.category = Set(category);
        }
        if let Some(address) = changes.address {
            active.address = Set(to_json(&address));
        }
        if let Some(phone) = changes.contact_phone {
            active.contact_phone = Set(phone);
        }
        if let Some(email) = changes.contact_email {
            active.contact_email = Set(email);
        }
        if let Some(logo) = changes.logo {
            active.logo = Set(Some(logo));
        }
        if let Some(cover) = changes.cover_image {
            active.cover_image = Set(Some(cover));
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Store::from(model))
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: StoreStatus,
        reviewer: Option<Uuid>,
    ) -> AppResult<Store> {
        let existing = StoreEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let now = chrono::Utc::now();
        let mut active: ActiveModel = existing.into();
        active.status = Set(status.to_string());
        if status == StoreStatus::Approved {
            active.approved_at = Set(Some(now));
            active.approved_by = Set(reviewer);
        }
        active.updated_at = Set(now);

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Store::from(model))
    }

    async fn search(&self, filter: StoreFilter, page: PageRequest) -> AppResult<(Vec<Store>, u64)> {
        let mut query = StoreEntity::find();

        if let Some(status) = filter.status {
            query = query.filter(store::Column::Status.eq(status.as_str()));
        }
        if let Some(category) = filter.category {
            query = query.filter(store::Column::Category.eq(category));
        }
        if let Some(pincode) = filter.pincode {
            query = query.filter(Expr::cust_with_values(
                "address->>'pincode' = ?",
                [pincode],
            ));
        }
        for (key, term) in [
            ("area", filter.area),
            ("ward", filter.ward),
            ("landmark", filter.landmark),
        ] {
            if let Some(term) = term {
                query = query.filter(Expr::cust_with_values(
                    format!("address->>'{}' ILIKE ?", key),
                    [like_pattern(&term)],
                ));
            }
        }

        let paginator = query
            .order_by_desc(store::Column::CreatedAt)
            .paginate(&self.db, page.limit);
        let total = paginator.num_items().await.map_err(AppError::from)?;
        let models = paginator
            .fetch_page(page.index())
            .await
            .map_err(AppError::from)?;

        Ok((models.into_iter().map(Store::from).collect(), total))
    }

    async fn list_pending(&self) -> AppResult<Vec<Store>> {
        let models = StoreEntity::find()
            .filter(store::Column::Status.eq(StoreStatus::Pending.as_str()))
            .order_by_asc(store::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Store::from).collect())
    }

    async fn count(&self) -> AppResult<u64> {
        StoreEntity::find()
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn count_by_status(&self, status: StoreStatus) -> AppResult<u64> {
        StoreEntity::find()
            .filter(store::Column::Status.eq(status.as_str()))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("indira"), "%indira%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
