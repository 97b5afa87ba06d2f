//! Seller onboarding, profile and dashboard figures.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use common::{AppResult, OptionExt};
use domain::{
    AnalyticsPeriod, NewSeller, NewStore, PageRequest, Seller, SellerAnalytics, SellerFilter,
    SellerProfile, SellerReview,
};

use crate::repository::{OrderRepository, ProductRepository, SellerRepository, ServiceRepository};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SellerService: Send + Sync {
    async fn get_by_user(&self, user_id: Uuid) -> AppResult<Seller>;

    /// Seller and store resolved in one query
    async fn profile(&self, user_id: Uuid) -> AppResult<SellerProfile>;

    /// Create the seller and its pending store together
    async fn onboard(&self, seller: NewSeller, store: NewStore) -> AppResult<SellerProfile>;

    async fn analytics(&self, user_id: Uuid, period: AnalyticsPeriod)
        -> AppResult<SellerAnalytics>;

    async fn list(&self, filter: SellerFilter, page: PageRequest)
        -> AppResult<(Vec<Seller>, u64)>;

    /// Seller, store and submitted documents for verification review
    async fn review(&self, seller_id: Uuid) -> AppResult<SellerReview>;
}

pub struct SellerManager {
    sellers: Arc<dyn SellerRepository>,
    orders: Arc<dyn OrderRepository>,
    products: Arc<dyn ProductRepository>,
    services: Arc<dyn ServiceRepository>,
}

impl SellerManager {
    pub fn new(
        sellers: Arc<dyn SellerRepository>,
        orders: Arc<dyn OrderRepository>,
        products: Arc<dyn ProductRepository>,
        services: Arc<dyn ServiceRepository>,
    ) -> Self {
        Self {
            sellers,
            orders,
            products,
            services,
        }
    }
}

#[async_trait]
impl SellerService for SellerManager {
    async fn get_by_user(&self, user_id: Uuid) -> AppResult<Seller> {
        self.sellers.find_by_user_id(user_id).await?.ok_or_not_found()
    }

    async fn profile(&self, user_id: Uuid) -> AppResult<SellerProfile> {
        self.sellers
            .find_profile_by_user_id(user_id)
            .await?
            .ok_or_not_found()
    }

    async fn onboard(&self, seller: NewSeller, store: NewStore) -> AppResult<SellerProfile> {
        seller.validate()?;
        store.validate()?;

        let documents = seller.documents.len();
        let profile = self.sellers.create_with_store(seller, store).await?;
        info!(
            seller_id = %profile.seller.id,
            store_id = ?profile.store.as_ref().map(|s| s.id),
            documents,
            "Seller onboarded"
        );
        Ok(profile)
    }

    async fn analytics(
        &self,
        user_id: Uuid,
        period: AnalyticsPeriod,
    ) -> AppResult<SellerAnalytics> {
        let store = self.profile(user_id).await?.store.ok_or_not_found()?;
        let since = period.since(Utc::now());

        let (orders, revenue, products, services) = futures::try_join!(
            self.orders.count_for_store_since(store.id, since),
            self.orders.paid_revenue(Some(store.id), Some(since)),
            self.products.count_live_by_store(store.id),
            self.services.count_live_by_store(store.id),
        )?;

        Ok(SellerAnalytics {
            period,
            orders,
            revenue,
            products,
            services,
        })
    }

    async fn list(
        &self,
        filter: SellerFilter,
        page: PageRequest,
    ) -> AppResult<(Vec<Seller>, u64)> {
        self.sellers.list(filter, page).await
    }

    async fn review(&self, seller_id: Uuid) -> AppResult<SellerReview> {
        let (profile, documents) = futures::try_join!(
            self.sellers.find_profile_by_id(seller_id),
            self.sellers.find_documents(seller_id),
        )?;
        let SellerProfile { seller, store } = profile.ok_or_not_found()?;

        Ok(SellerReview {
            seller,
            store,
            documents,
        })
    }
}
