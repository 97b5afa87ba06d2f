//! Service container - one place that wires repositories into services.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::{
    AdminManager, AdminService, AuthService, Authenticator, BookingManager, BookingService,
    CatalogManager, CatalogService, OrderManager, OrderService, SellerManager, SellerService,
    StoreManager, StoreService, SubscriptionManager, SubscriptionService,
};
use crate::config::MarketplaceConfig;
use crate::repository::{
    AdminLogStore, BookingStore, OrderStore, PlanStore, ProductStore, SellerStore, ServiceStore,
    StoreStore, UserStore,
};

/// All application services behind their traits.
#[derive(Clone)]
pub struct Services {
    auth: Arc<dyn AuthService>,
    subscriptions: Arc<dyn SubscriptionService>,
    sellers: Arc<dyn SellerService>,
    stores: Arc<dyn StoreService>,
    catalog: Arc<dyn CatalogService>,
    orders: Arc<dyn OrderService>,
    bookings: Arc<dyn BookingService>,
    admin: Arc<dyn AdminService>,
}

impl Services {
    /// Assemble from already-built services (tests inject mocks here).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        auth: Arc<dyn AuthService>,
        subscriptions: Arc<dyn SubscriptionService>,
        sellers: Arc<dyn SellerService>,
        stores: Arc<dyn StoreService>,
        catalog: Arc<dyn CatalogService>,
        orders: Arc<dyn OrderService>,
        bookings: Arc<dyn BookingService>,
        admin: Arc<dyn AdminService>,
    ) -> Self {
        Self {
            auth,
            subscriptions,
            sellers,
            stores,
            catalog,
            orders,
            bookings,
            admin,
        }
    }

    /// Build every service over SeaORM-backed repositories.
    pub fn from_connection(db: DatabaseConnection, config: &MarketplaceConfig) -> Self {
        let users = Arc::new(UserStore::new(db.clone()));
        let plans = Arc::new(PlanStore::new(db.clone()));
        let seller_repo = Arc::new(SellerStore::new(db.clone()));
        let store_repo = Arc::new(StoreStore::new(db.clone()));
        let products = Arc::new(ProductStore::new(db.clone()));
        let service_repo = Arc::new(ServiceStore::new(db.clone()));
        let order_repo = Arc::new(OrderStore::new(db.clone()));
        let booking_repo = Arc::new(BookingStore::new(db.clone()));
        let logs = Arc::new(AdminLogStore::new(db));

        let subscriptions: Arc<dyn SubscriptionService> = Arc::new(SubscriptionManager::new(
            plans,
            seller_repo.clone(),
            store_repo.clone(),
            products.clone(),
            service_repo.clone(),
            config.subscription_period(),
        ));

        Self {
            auth: Arc::new(Authenticator::new(
                users,
                seller_repo.clone(),
                config.jwt.clone(),
            )),
            sellers: Arc::new(SellerManager::new(
                seller_repo.clone(),
                order_repo.clone(),
                products.clone(),
                service_repo.clone(),
            )),
            stores: Arc::new(StoreManager::new(
                store_repo.clone(),
                products.clone(),
                service_repo.clone(),
            )),
            catalog: Arc::new(CatalogManager::new(
                products.clone(),
                service_repo.clone(),
                subscriptions.clone(),
            )),
            orders: Arc::new(OrderManager::new(
                order_repo.clone(),
                store_repo.clone(),
                products,
                service_repo.clone(),
            )),
            bookings: Arc::new(BookingManager::new(booking_repo, service_repo)),
            admin: Arc::new(AdminManager::new(
                store_repo,
                seller_repo,
                order_repo,
                logs,
                subscriptions.clone(),
            )),
            subscriptions,
        }
    }

    pub fn auth(&self) -> Arc<dyn AuthService> {
        self.auth.clone()
    }

    pub fn subscriptions(&self) -> Arc<dyn SubscriptionService> {
        self.subscriptions.clone()
    }

    pub fn sellers(&self) -> Arc<dyn SellerService> {
        self.sellers.clone()
    }

    pub fn stores(&self) -> Arc<dyn StoreService> {
        self.stores.clone()
    }

    pub fn catalog(&self) -> Arc<dyn CatalogService> {
        self.catalog.clone()
    }

    pub fn orders(&self) -> Arc<dyn OrderService> {
        self.orders.clone()
    }

    pub fn bookings(&self) -> Arc<dyn BookingService> {
        self.bookings.clone()
    }

    pub fn admin(&self) -> Arc<dyn AdminService> {
        self.admin.clone()
    }
}
