//! Marketplace business logic.
//!
//! Each service is a trait (mocked in handler tests) with a `*Manager`
//! implementation built over the repository traits.

mod admin_service;
mod auth_service;
mod booking_service;
mod catalog_service;
mod container;
mod order_service;
mod seller_service;
mod store_service;
mod subscription_service;

pub use admin_service::{AdminManager, AdminService, AuditContext};
pub use auth_service::{AuthService, Authenticator, Claims, MeResponse, TokenResponse};
pub use booking_service::{BookingManager, BookingService};
pub use catalog_service::{CatalogManager, CatalogService};
pub use container::Services;
pub use order_service::{OrderManager, OrderService};
pub use seller_service::{SellerManager, SellerService};
pub use store_service::{StoreDetail, StoreManager, StoreService};
pub use subscription_service::{SubscriptionManager, SubscriptionService};

#[cfg(any(test, feature = "test-utils"))]
pub use admin_service::MockAdminService;
#[cfg(any(test, feature = "test-utils"))]
pub use auth_service::MockAuthService;
#[cfg(any(test, feature = "test-utils"))]
pub use booking_service::MockBookingService;
#[cfg(any(test, feature = "test-utils"))]
pub use catalog_service::MockCatalogService;
#[cfg(any(test, feature = "test-utils"))]
pub use order_service::MockOrderService;
#[cfg(any(test, feature = "test-utils"))]
pub use seller_service::MockSellerService;
#[cfg(any(test, feature = "test-utils"))]
pub use store_service::MockStoreService;
#[cfg(any(test, feature = "test-utils"))]
pub use subscription_service::MockSubscriptionService;
