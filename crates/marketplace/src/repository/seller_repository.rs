//! Seller repository.
//!
//! A seller's store is always loaded with a join, never a second lookup.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IsolationLevel,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::conflict_on_unique;
use super::entities::seller::{self, ActiveModel, Entity as SellerEntity};
use super::entities::seller_document::{self, Entity as DocumentEntity};
use super::entities::store::{self, Entity as StoreEntity};
use super::entities::to_json;
use crate::infra::in_transaction;
use common::{AppError, AppResult};
use domain::{
    NewSeller, NewStore, PageRequest, Seller, SellerDocument, SellerFilter, SellerProfile, Store,
    StoreStatus, SubscriptionStatus, VerificationStatus,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SellerRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Seller>>;

    async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<Seller>>;

    /// Seller and store in one query
    async fn find_profile_by_user_id(&self, user_id: Uuid) -> AppResult<Option<SellerProfile>>;

    async fn find_profile_by_id(&self, id: Uuid) -> AppResult<Option<SellerProfile>>;

    /// Insert the seller, its documents and its store in one transaction.
    async fn create_with_store(&self, seller: NewSeller, store: NewStore)
        -> AppResult<SellerProfile>;

    /// Verification documents, oldest first
    async fn find_documents(&self, seller_id: Uuid) -> AppResult<Vec<SellerDocument>>;

    /// Point the seller at a plan and mark the subscription active
    async fn update_subscription(
        &self,
        seller_id: Uuid,
        plan_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> AppResult<Seller>;

    async fn list(&self, filter: SellerFilter, page: PageRequest)
        -> AppResult<(Vec<Seller>, u64)>;

    async fn count(&self) -> AppResult<u64>;

    /// Sellers whose subscription is active and unexpired at `now`
    async fn count_active_subscriptions(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

pub struct SellerStore {
    db: DatabaseConnection,
}

impl SellerStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SellerRepository for SellerStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Seller>> {
        let result = SellerEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Seller::from))
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<Seller>> {
        let result = SellerEntity::find()
            .filter(seller::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Seller::from))
    }

    async fn find_profile_by_user_id(&self, user_id: Uuid) -> AppResult<Option<SellerProfile>> {
        let result = SellerEntity::find()
            .filter(seller::Column::UserId.eq(user_id))
            .find_also_related(StoreEntity)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(|(seller, store)| SellerProfile {
            seller: Seller::from(seller),
            store: store.map(Store::from),
        }))
    }

    async fn find_profile_by_id(&self, id: Uuid) -> AppResult<Option<SellerProfile>> {
        let result = SellerEntity::find_by_id(id)
            .find_also_related(StoreEntity)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(|(seller, store)| SellerProfile {
            seller: Seller::from(seller),
            store: store.map(Store::from),
        }))
    }

    async fn create_with_store(
        &self,
        new_seller: NewSeller,
        new_store: NewStore,
    ) -> AppResult<SellerProfile> {
        in_transaction(&self.db, IsolationLevel::ReadCommitted, move |txn| {
            Box::pin(async move {
                let existing = SellerEntity::find()
                    .filter(seller::Column::UserId.eq(new_seller.user_id))
                    .one(txn)
                    .await?;
                if existing.is_some() {
                    return Err(AppError::conflict("Seller"));
                }

                let now = Utc::now();
                let seller_id = Uuid::new_v4();
                let seller_model = ActiveModel {
                    id: Set(seller_id),
                    user_id: Set(new_seller.user_id),
                    owner_name: Set(new_seller.owner_name),
                    business_type: Set(new_seller.business_type.to_string()),
                    verification_status: Set(VerificationStatus::Pending.to_string()),
                    subscription_plan_id: Set(None),
                    subscription_status: Set(SubscriptionStatus::Expired.to_string()),
                    subscription_expires_at: Set(None),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(txn)
                .await
                .map_err(|e| conflict_on_unique(e, "Seller"))?;

                for doc in new_seller.documents {
                    seller_document::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        seller_id: Set(seller_id),
                        doc_type: Set(doc.doc_type.to_string()),
                        file_url: Set(doc.file_url),
                        file_name: Set(doc.file_name),
                        file_size: Set(doc.file_size),
                        mime_type: Set(doc.mime_type),
                        uploaded_at: Set(now),
                        verified_at: Set(None),
                        verified_by: Set(None),
                    }
                    .insert(txn)
                    .await?;
                }

                let store_model = store::ActiveModel {
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
                }
                .insert(txn)
                .await
                .map_err(|e| conflict_on_unique(e, "Store"))?;

                Ok(SellerProfile {
                    seller: Seller::from(seller_model),
                    store: Some(Store::from(store_model)),
                })
            })
        })
        .await
    }

    async fn find_documents(&self, seller_id: Uuid) -> AppResult<Vec<SellerDocument>> {
        let models = DocumentEntity::find()
            .filter(seller_document::Column::SellerId.eq(seller_id))
            .order_by_asc(seller_document::Column::UploadedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(SellerDocument::from).collect())
    }

    async fn update_subscription(
        &self,
        seller_id: Uuid,
        plan_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> AppResult<Seller> {
        let seller = SellerEntity::find_by_id(seller_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = seller.into();
        active.subscription_plan_id = Set(Some(plan_id));
        active.subscription_status = Set(SubscriptionStatus::Active.to_string());
        active.subscription_expires_at = Set(Some(expires_at));
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Seller::from(model))
    }

    async fn list(
        &self,
        filter: SellerFilter,
        page: PageRequest,
    ) -> AppResult<(Vec<Seller>, u64)> {
        let mut query = SellerEntity::find();
        if let Some(status) = filter.verification_status {
            query = query.filter(seller::Column::VerificationStatus.eq(status.as_str()));
        }
        if let Some(status) = filter.subscription_status {
            query = query.filter(seller::Column::SubscriptionStatus.eq(status.as_str()));
        }
        if let Some(kind) = filter.business_type {
            query = query.filter(seller::Column::BusinessType.eq(kind.as_str()));
        }

        let paginator = query
            .order_by_desc(seller::Column::CreatedAt)
            .paginate(&self.db, page.limit);
        let total = paginator.num_items().await.map_err(AppError::from)?;
        let models = paginator
            .fetch_page(page.index())
            .await
            .map_err(AppError::from)?;

        Ok((models.into_iter().map(Seller::from).collect(), total))
    }

    async fn count(&self) -> AppResult<u64> {
        SellerEntity::find()
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn count_active_subscriptions(&self, now: DateTime<Utc>) -> AppResult<u64> {
        SellerEntity::find()
            .filter(seller::Column::SubscriptionStatus.eq(SubscriptionStatus::Active.as_str()))
            .filter(
                Condition::any()
                    .add(seller::Column::SubscriptionExpiresAt.is_null())
                    .add(seller::Column::SubscriptionExpiresAt.gt(now)),
            )
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }
}
