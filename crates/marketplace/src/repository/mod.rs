//! Repository layer for data access.
//!
//! Each repository is a trait (mocked in tests) plus a `*Store` backed by
//! a SeaORM connection.

pub mod entities;

mod admin_log_repository;
mod booking_repository;
mod order_repository;
mod plan_repository;
mod product_repository;
mod seller_repository;
mod service_repository;
mod store_repository;
mod user_repository;

pub use admin_log_repository::{AdminLogRepository, AdminLogStore};
pub use booking_repository::{BookingRepository, BookingStore};
pub use order_repository::{OrderRepository, OrderStore};
pub use plan_repository::{PlanRepository, PlanStore};
pub use product_repository::{ProductRepository, ProductStore, VariantRecord};
pub use seller_repository::{SellerRepository, SellerStore};
pub use service_repository::{ServiceRepository, ServiceStore};
pub use store_repository::{StoreRepository, StoreStore};
pub use user_repository::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use admin_log_repository::MockAdminLogRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use booking_repository::MockBookingRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use order_repository::MockOrderRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use plan_repository::MockPlanRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use product_repository::MockProductRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use seller_repository::MockSellerRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use service_repository::MockServiceRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use store_repository::MockStoreRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;

use sea_orm::{DbErr, SqlErr};

use common::AppError;

/// Map a unique-constraint violation to a conflict on `what`.
pub(crate) fn conflict_on_unique(err: DbErr, what: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::conflict(what),
        _ => AppError::from(err),
    }
}

/// Take a row lock on the seller so quota checks for the same seller run one at a time.
pub(crate) async fn lock_seller(
    txn: &sea_orm::DatabaseTransaction,
    seller_id: uuid::Uuid,
) -> common::AppResult<()> {
    use sea_orm::{EntityTrait, QuerySelect};

    entities::seller::Entity::find_by_id(seller_id)
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(())
}
