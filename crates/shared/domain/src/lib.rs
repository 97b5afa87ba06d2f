//! Domain layer - Core marketplace entities and business rules.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! catalog invariants, plan quotas, order pricing and status lifecycles.

#[macro_use]
mod macros;

pub mod admin;
pub mod booking;
pub mod catalog;
pub mod constants;
pub mod error;
pub mod numbering;
pub mod order;
pub mod pagination;
pub mod seller;
pub mod store;
pub mod subscription;
pub mod user;
pub mod validation;

pub use admin::{
    AdminAction, AdminLog, AnalyticsPeriod, NewAdminLog, PlatformAnalytics, SellerAnalytics,
    TargetType,
};
pub use booking::{Booking, BookingLocation, BookingRequest, BookingStatus, NewBooking};
pub use catalog::{
    ItemStatus, LocationType, NewProduct, NewService, NewVariant, PriceVariant, Product,
    ProductUpdate, ProductVariant, Service, ServiceUpdate, VariantUpdate,
};
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use order::{
    NewOrder, Order, OrderItem, OrderLine, OrderRequest, OrderStatus, OrderTotals, OrderType,
    PaymentStatus,
};
pub use pagination::PageRequest;
pub use seller::{
    is_subscription_active, BusinessType, DocumentType, NewDocument, NewSeller, Seller,
    SellerDocument, SellerFilter, SellerProfile, SellerReview, SubscriptionStatus,
    VerificationStatus,
};
pub use store::{
    Address, NewStore, ReviewDecision, Store, StoreFilter, StoreStatus, StoreUpdate,
};
pub use subscription::{
    default_plans, CatalogLimits, LimitCheck, LimitGuard, NewPlan, PlanUpdate, QuotaKind,
    SubscriptionPlan,
};
pub use user::{NewUser, User, UserRole};
