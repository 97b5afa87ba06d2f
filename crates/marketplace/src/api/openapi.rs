//! OpenAPI documentation configuration.
//!
//! Served through Swagger UI at `/swagger-ui`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    admin_handler, auth_handler, booking_handler, health_handler, order_handler, plan_handler,
    product_handler, seller_handler, service_handler, store_handler,
};
use crate::service::{MeResponse, StoreDetail, TokenResponse};
use domain::{
    Address, AdminAction, AdminLog, AnalyticsPeriod, Booking, BookingStatus, BusinessType,
    CatalogLimits, DocumentType, ItemStatus, LimitCheck, LocationType, Order, OrderItem,
    OrderStatus, OrderType, PaymentStatus, PlatformAnalytics, PriceVariant, Product,
    ProductVariant, Seller, SellerAnalytics, SellerDocument, SellerProfile, SellerReview, Service,
    Store, StoreStatus, SubscriptionPlan, SubscriptionStatus, TargetType, User, UserRole,
    VerificationStatus,
};

/// OpenAPI documentation for the marketplace API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hyperlocal Marketplace API",
        version = "0.1.0",
        description = "Multi-vendor marketplace: stores, catalog quotas, orders and bookings"
    ),
    servers((url = "http://localhost:3000", description = "Local development server")),
    paths(
        health_handler::health,
        auth_handler::register,
        auth_handler::me,
        plan_handler::list_plans,
        plan_handler::get_plan,
        seller_handler::onboard,
        seller_handler::profile,
        seller_handler::analytics,
        seller_handler::limits,
        seller_handler::update_subscription,
        store_handler::search_stores,
        store_handler::get_store,
        store_handler::create_store,
        store_handler::my_store,
        store_handler::update_store,
        product_handler::get_product,
        product_handler::list_store_products,
        product_handler::create_product,
        product_handler::update_product,
        product_handler::delete_product,
        product_handler::update_variant,
        service_handler::get_service,
        service_handler::list_store_services,
        service_handler::create_service,
        service_handler::update_service,
        service_handler::delete_service,
        order_handler::create_order,
        order_handler::my_orders,
        order_handler::get_order,
        order_handler::store_orders,
        order_handler::update_order_status,
        booking_handler::create_booking,
        booking_handler::my_bookings,
        booking_handler::store_bookings,
        booking_handler::update_booking_status,
        admin_handler::pending_stores,
        admin_handler::review_store,
        admin_handler::suspend_store,
        admin_handler::list_sellers,
        admin_handler::seller_review,
        admin_handler::platform_analytics,
        admin_handler::list_logs,
        admin_handler::list_plans,
        admin_handler::create_plan,
        admin_handler::update_plan,
    ),
    components(
        schemas(
            // Domain types
            Address,
            AdminAction,
            AdminLog,
            AnalyticsPeriod,
            Booking,
            BookingStatus,
            BusinessType,
            CatalogLimits,
            DocumentType,
            ItemStatus,
            LimitCheck,
            LocationType,
            Order,
            OrderItem,
            OrderStatus,
            OrderType,
            PaymentStatus,
            PlatformAnalytics,
            PriceVariant,
            Product,
            ProductVariant,
            Seller,
            SellerAnalytics,
            SellerDocument,
            SellerProfile,
            SellerReview,
            Service,
            Store,
            StoreStatus,
            SubscriptionPlan,
            SubscriptionStatus,
            TargetType,
            User,
            UserRole,
            VerificationStatus,
            // Service responses
            MeResponse,
            StoreDetail,
            TokenResponse,
            // Request bodies
            auth_handler::RegisterRequest,
            seller_handler::OnboardRequest,
            seller_handler::DocumentRequest,
            seller_handler::StoreRequest,
            seller_handler::SubscriptionRequest,
            store_handler::UpdateStoreRequest,
            product_handler::CreateProductRequest,
            product_handler::VariantRequest,
            product_handler::UpdateProductRequest,
            product_handler::UpdateVariantRequest,
            service_handler::CreateServiceRequest,
            service_handler::UpdateServiceRequest,
            order_handler::CreateOrderRequest,
            order_handler::OrderItemRequest,
            order_handler::UpdateOrderStatusRequest,
            booking_handler::CreateBookingRequest,
            booking_handler::UpdateBookingStatusRequest,
            admin_handler::ReviewStoreRequest,
            admin_handler::SuspendStoreRequest,
            admin_handler::CreatePlanRequest,
            admin_handler::UpdatePlanRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Dependency health"),
        (name = "Authentication", description = "Registration and caller profile"),
        (name = "Plans", description = "Subscription plan catalogue"),
        (name = "Sellers", description = "Seller onboarding, analytics and subscription"),
        (name = "Stores", description = "Store discovery and management"),
        (name = "Products", description = "Product catalogue"),
        (name = "Services", description = "Bookable services"),
        (name = "Orders", description = "Order placement and fulfilment"),
        (name = "Bookings", description = "Service bookings"),
        (name = "Admin", description = "Moderation, reporting and plan management")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("HS256 token issued for a registered user"))
                        .build(),
                ),
            );
        }
    }
}
