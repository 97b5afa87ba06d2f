//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// User Roles
// =============================================================================

/// Shoppers placing orders and bookings
pub const ROLE_CUSTOMER: &str = "customer";

/// Business owners operating a store
pub const ROLE_SELLER: &str = "seller";

/// Platform administrators
pub const ROLE_ADMIN: &str = "admin";

/// Roles a user may pick at registration
pub const SELF_SERVICE_ROLES: &[&str] = &[ROLE_CUSTOMER, ROLE_SELLER];

// =============================================================================
// Pricing
// =============================================================================

/// Flat tax rate applied to every order subtotal, in percent
pub const TAX_RATE_PERCENT: i64 = 18;

/// Orders with a subtotal strictly above this ship for free (minor units)
pub const FREE_SHIPPING_THRESHOLD: i64 = 50_000;

/// Shipping fee charged below the free-shipping threshold (minor units)
pub const FLAT_SHIPPING_FEE: i64 = 5_000;

/// Highest unit price a seller may set (minor units)
pub const MAX_UNIT_PRICE: i64 = 1_000_000_000;

/// Highest quantity accepted on a single order line
pub const MAX_LINE_QUANTITY: u32 = 10_000;

// =============================================================================
// Subscriptions & Catalog
// =============================================================================

/// Sentinel for "no limit" on plan quotas and variant stock
pub const UNLIMITED: i32 = -1;

/// Subscription length applied when no expiry is supplied
pub const DEFAULT_SUBSCRIPTION_DAYS: i64 = 30;

/// Maximum product/service title length
pub const MAX_TITLE_LENGTH: usize = 200;

// =============================================================================
// Pagination
// =============================================================================

/// Default starting page number (1-indexed)
pub const DEFAULT_PAGE_NUMBER: u64 = 1;

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Maximum allowed items per page
pub const MAX_PAGE_SIZE: u64 = 100;

/// Highest page number a list query may ask for
pub const MAX_PAGE_NUMBER: u64 = 100_000;

// =============================================================================
// Numbering
// =============================================================================

pub const ORDER_NUMBER_PREFIX: &str = "ORD";
pub const BOOKING_NUMBER_PREFIX: &str = "BK";

/// Booking location sentinel meaning "at the store's own premises"
pub const AT_STORE_LOCATION: &str = "at_store";

// =============================================================================
// Authentication
// =============================================================================

/// Default JWT token expiration in hours
pub const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 24;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Seconds per hour (for token expiration calculation)
pub const SECONDS_PER_HOUR: i64 = 3600;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// JWT token type identifier
pub const TOKEN_TYPE_BEARER: &str = "Bearer";
