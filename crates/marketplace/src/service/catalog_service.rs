//! Products, variants and services.
//!
//! Creation is gated by the seller's plan: the quota is pre-checked through
//! [`SubscriptionService::admit`] and re-checked by the repository under a
//! row lock, so concurrent creations cannot overshoot the limit.
//! Ownership is verified by the HTTP layer before any mutation reaches here.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{
    ItemStatus, NewProduct, NewService, PageRequest, Product, ProductUpdate, ProductVariant,
    QuotaKind, Service, ServiceUpdate, VariantUpdate,
};

use super::SubscriptionService;
use crate::repository::{ProductRepository, ServiceRepository, VariantRecord};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Create a draft product for the seller's store, within plan limits.
    async fn create_product(&self, seller_id: Uuid, product: NewProduct) -> AppResult<Product>;

    /// Any status, archived included
    async fn get_product(&self, id: Uuid) -> AppResult<Product>;

    async fn list_products(
        &self,
        store_id: Uuid,
        status: Option<ItemStatus>,
        page: PageRequest,
    ) -> AppResult<(Vec<Product>, u64)>;

    async fn update_product(&self, id: Uuid, changes: ProductUpdate) -> AppResult<Product>;

    /// Soft delete to `archived`
    async fn delete_product(&self, id: Uuid) -> AppResult<Product>;

    async fn get_variant(&self, variant_id: Uuid) -> AppResult<VariantRecord>;

    async fn update_variant(&self, variant_id: Uuid, changes: VariantUpdate)
        -> AppResult<ProductVariant>;

    /// Create a draft service for the seller's store, within plan limits.
    async fn create_service(&self, seller_id: Uuid, service: NewService) -> AppResult<Service>;

    async fn get_service(&self, id: Uuid) -> AppResult<Service>;

    async fn list_services(
        &self,
        store_id: Uuid,
        status: Option<ItemStatus>,
        page: PageRequest,
    ) -> AppResult<(Vec<Service>, u64)>;

    async fn update_service(&self, id: Uuid, changes: ServiceUpdate) -> AppResult<Service>;

    /// Soft delete to `archived`
    async fn delete_service(&self, id: Uuid) -> AppResult<Service>;
}

pub struct CatalogManager {
    products: Arc<dyn ProductRepository>,
    services: Arc<dyn ServiceRepository>,
    subscriptions: Arc<dyn SubscriptionService>,
}

impl CatalogManager {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        services: Arc<dyn ServiceRepository>,
        subscriptions: Arc<dyn SubscriptionService>,
    ) -> Self {
        Self {
            products,
            services,
            subscriptions,
        }
    }
}

#[async_trait]
impl CatalogService for CatalogManager {
    async fn create_product(&self, seller_id: Uuid, product: NewProduct) -> AppResult<Product> {
        product.validate()?;

        let taken = self.products.existing_skus(product.skus()).await?;
        if let Some(sku) = taken.first() {
            return Err(AppError::conflict(format!("SKU '{}'", sku)));
        }

        let guard = self.subscriptions.admit(seller_id, QuotaKind::Products).await?;
        let created = self.products.create_within_limit(product, guard).await?;

        info!(
            product_id = %created.id,
            store_id = %created.store_id,
            variants = created.variants.len(),
            "Product created"
        );
        Ok(created)
    }

    async fn get_product(&self, id: Uuid) -> AppResult<Product> {
        self.products.find_by_id(id).await?.ok_or_not_found()
    }

    async fn list_products(
        &self,
        store_id: Uuid,
        status: Option<ItemStatus>,
        page: PageRequest,
    ) -> AppResult<(Vec<Product>, u64)> {
        self.products.list_by_store(store_id, status, page).await
    }

    async fn update_product(&self, id: Uuid, changes: ProductUpdate) -> AppResult<Product> {
        changes.validate()?;
        self.products.update(id, changes).await
    }

    async fn delete_product(&self, id: Uuid) -> AppResult<Product> {
        let archived = self.products.archive(id).await?;
        info!(product_id = %id, "Product archived");
        Ok(archived)
    }

    async fn get_variant(&self, variant_id: Uuid) -> AppResult<VariantRecord> {
        self.products
            .find_variant(variant_id)
            .await?
            .ok_or_not_found()
    }

    async fn update_variant(
        &self,
        variant_id: Uuid,
        changes: VariantUpdate,
    ) -> AppResult<ProductVariant> {
        changes.validate()?;
        self.products.update_variant(variant_id, changes).await
    }

    async fn create_service(&self, seller_id: Uuid, service: NewService) -> AppResult<Service> {
        service.validate()?;

        let guard = self.subscriptions.admit(seller_id, QuotaKind::Services).await?;
        let created = self.services.create_within_limit(service, guard).await?;

        info!(service_id = %created.id, store_id = %created.store_id, "Service created");
        Ok(created)
    }

    async fn get_service(&self, id: Uuid) -> AppResult<Service> {
        self.services.find_by_id(id).await?.ok_or_not_found()
    }

    async fn list_services(
        &self,
        store_id: Uuid,
        status: Option<ItemStatus>,
        page: PageRequest,
    ) -> AppResult<(Vec<Service>, u64)> {
        self.services.list_by_store(store_id, status, page).await
    }

    async fn update_service(&self, id: Uuid, changes: ServiceUpdate) -> AppResult<Service> {
        changes.validate()?;
        self.services.update(id, changes).await
    }

    async fn delete_service(&self, id: Uuid) -> AppResult<Service> {
        let archived = self.services.archive(id).await?;
        info!(service_id = %id, "Service archived");
        Ok(archived)
    }
}
