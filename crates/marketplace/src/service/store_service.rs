//! Store management and public discovery.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{
    ItemStatus, NewStore, PageRequest, Product, Service, Store, StoreFilter, StoreStatus,
    StoreUpdate, MAX_PAGE_SIZE,
};

use crate::repository::{ProductRepository, ServiceRepository, StoreRepository};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Store page: the store with what it currently sells.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StoreDetail {
    pub store: Store,
    pub products: Vec<Product>,
    pub services: Vec<Service>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait StoreService: Send + Sync {
    async fn get(&self, id: Uuid) -> AppResult<Store>;

    async fn get_by_seller(&self, seller_id: Uuid) -> AppResult<Store>;

    /// Conflict if the seller already owns a store
    async fn create(&self, seller_id: Uuid, store: NewStore) -> AppResult<Store>;

    /// Owner-editable fields only
    async fn update(&self, id: Uuid, changes: StoreUpdate) -> AppResult<Store>;

    /// Approved stores only, whatever status the filter asks for
    async fn search(&self, filter: StoreFilter, page: PageRequest)
        -> AppResult<(Vec<Store>, u64)>;

    /// Store with its active products and services
    async fn detail(&self, id: Uuid) -> AppResult<StoreDetail>;

    async fn pending(&self) -> AppResult<Vec<Store>>;
}

pub struct StoreManager {
    stores: Arc<dyn StoreRepository>,
    products: Arc<dyn ProductRepository>,
    services: Arc<dyn ServiceRepository>,
}

impl StoreManager {
    pub fn new(
        stores: Arc<dyn StoreRepository>,
        products: Arc<dyn ProductRepository>,
        services: Arc<dyn ServiceRepository>,
    ) -> Self {
        Self {
            stores,
            products,
            services,
        }
    }
}

#[async_trait]
impl StoreService for StoreManager {
    async fn get(&self, id: Uuid) -> AppResult<Store> {
        self.stores.find_by_id(id).await?.ok_or_not_found()
    }

    async fn get_by_seller(&self, seller_id: Uuid) -> AppResult<Store> {
        self.stores.find_by_seller_id(seller_id).await?.ok_or_not_found()
    }

    async fn create(&self, seller_id: Uuid, store: NewStore) -> AppResult<Store> {
        store.validate()?;

        if self.stores.find_by_seller_id(seller_id).await?.is_some() {
            return Err(AppError::conflict("Store"));
        }

        let created = self.stores.create(seller_id, store).await?;
        info!(store_id = %created.id, seller_id = %seller_id, "Store created");
        Ok(created)
    }

    async fn update(&self, id: Uuid, changes: StoreUpdate) -> AppResult<Store> {
        changes.validate()?;
        self.stores.update(id, changes).await
    }

    async fn search(
        &self,
        filter: StoreFilter,
        page: PageRequest,
    ) -> AppResult<(Vec<Store>, u64)> {
        let filter = StoreFilter {
            status: Some(StoreStatus::Approved),
            ..filter
        };
        self.stores.search(filter, page).await
    }

    async fn detail(&self, id: Uuid) -> AppResult<StoreDetail> {
        let store = self.get(id).await?;
        let page = PageRequest::new(1, MAX_PAGE_SIZE);

        let ((products, _), (services, _)) = futures::try_join!(
            self.products
                .list_by_store(store.id, Some(ItemStatus::Active), page),
            self.services
                .list_by_store(store.id, Some(ItemStatus::Active), page),
        )?;

        Ok(StoreDetail {
            store,
            products,
            services,
        })
    }

    async fn pending(&self) -> AppResult<Vec<Store>> {
        self.stores.list_pending().await
    }
}
