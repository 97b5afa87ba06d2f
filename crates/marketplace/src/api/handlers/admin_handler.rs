//! Admin moderation, reporting and plan management.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use common::{AppResult, Paginated, PaginationParams};
use domain::{
    AdminLog, BusinessType, NewPlan, PageRequest, PlanUpdate, PlatformAnalytics, Seller,
    SellerFilter, SellerReview, Store, SubscriptionPlan, SubscriptionStatus, VerificationStatus,
};

use crate::api::extractors::{ClientIp, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::service::AuditContext;

/// Store review decision
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReviewStoreRequest {
    pub approved: bool,
    #[validate(length(max = 500, message = "Reason is too long"))]
    pub reason: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct SuspendStoreRequest {
    #[validate(length(max = 500, message = "Reason is too long"))]
    pub reason: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct SellerListQuery {
    pub verification_status: Option<VerificationStatus>,
    pub subscription_status: Option<SubscriptionStatus>,
    pub business_type: Option<BusinessType>,
}

impl From<SellerListQuery> for SellerFilter {
    fn from(query: SellerListQuery) -> Self {
        Self {
            verification_status: query.verification_status,
            subscription_status: query.subscription_status,
            business_type: query.business_type,
        }
    }
}

/// New subscription plan
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlanRequest {
    #[validate(length(min = 1, max = 100, message = "Plan name is required"))]
    #[schema(example = "Standard")]
    pub name: String,
    #[validate(length(min = 1, max = 50, message = "Plan slug is required"))]
    #[schema(example = "standard")]
    pub slug: String,
    pub description: Option<String>,
    /// Minor units per period
    #[validate(range(min = 0, message = "Plan price cannot be negative"))]
    pub price: i64,
    /// -1 means unlimited
    #[validate(range(min = -1, message = "maxProducts must be -1 or more"))]
    pub max_products: i32,
    #[validate(range(min = -1, message = "maxServices must be -1 or more"))]
    pub max_services: i32,
    #[serde(default)]
    pub features: Vec<String>,
    #[validate(range(min = 0.0, max = 100.0, message = "Commission rate must be between 0 and 100"))]
    pub commission_rate: f64,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub analytics_access: bool,
    #[serde(default)]
    pub priority: i32,
}

impl From<CreatePlanRequest> for NewPlan {
    fn from(req: CreatePlanRequest) -> Self {
        Self {
            name: req.name,
            slug: req.slug,
            description: req.description,
            price: req.price,
            max_products: req.max_products,
            max_services: req.max_services,
            features: req.features,
            commission_rate: req.commission_rate,
            is_featured: req.is_featured,
            analytics_access: req.analytics_access,
            priority: req.priority,
        }
    }
}

/// Partial plan update
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlanRequest {
    #[validate(length(min = 1, max = 100, message = "Plan name cannot be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0, message = "Plan price cannot be negative"))]
    pub price: Option<i64>,
    #[validate(range(min = -1, message = "maxProducts must be -1 or more"))]
    pub max_products: Option<i32>,
    #[validate(range(min = -1, message = "maxServices must be -1 or more"))]
    pub max_services: Option<i32>,
    pub features: Option<Vec<String>>,
    #[validate(range(min = 0.0, max = 100.0, message = "Commission rate must be between 0 and 100"))]
    pub commission_rate: Option<f64>,
    pub is_featured: Option<bool>,
    pub analytics_access: Option<bool>,
    pub priority: Option<i32>,
    pub is_active: Option<bool>,
}

impl From<UpdatePlanRequest> for PlanUpdate {
    fn from(req: UpdatePlanRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            price: req.price,
            max_products: req.max_products,
            max_services: req.max_services,
            features: req.features,
            commission_rate: req.commission_rate,
            is_featured: req.is_featured,
            analytics_access: req.analytics_access,
            priority: req.priority,
            is_active: req.is_active,
        }
    }
}

fn audit_context(user: &CurrentUser, ip: ClientIp) -> AuditContext {
    AuditContext {
        admin_id: user.id,
        ip_address: ip.0,
    }
}

/// Create admin routes (all behind the admin gate)
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/stores/pending", get(pending_stores))
        .route("/stores/:id/approve", post(review_store))
        .route("/stores/:id/suspend", post(suspend_store))
        .route("/sellers", get(list_sellers))
        .route("/sellers/:id", get(seller_review))
        .route("/analytics", get(platform_analytics))
        .route("/logs", get(list_logs))
        .route("/plans", get(list_plans).post(create_plan))
        .route("/plans/:id", put(update_plan))
}

/// Stores waiting for review
#[utoipa::path(
    get,
    path = "/admin/stores/pending",
    tag = "Admin",
    responses((status = 200, description = "Pending stores", body = [Store])),
    security(("bearer_auth" = []))
)]
pub async fn pending_stores(State(state): State<AppState>) -> AppResult<Json<Vec<Store>>> {
    Ok(Json(state.services.stores().pending().await?))
}

/// Approve or reject a store
#[utoipa::path(
    post,
    path = "/admin/stores/{id}/approve",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Store ID")),
    request_body = ReviewStoreRequest,
    responses(
        (status = 200, description = "Decision recorded", body = Store),
        (status = 400, description = "Store is not awaiting review"),
        (status = 404, description = "Unknown store")
    ),
    security(("bearer_auth" = []))
)]
pub async fn review_store(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ip: ClientIp,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<ReviewStoreRequest>,
) -> AppResult<Json<Store>> {
    let store = state
        .services
        .admin()
        .review_store(id, payload.approved, payload.reason, audit_context(&user, ip))
        .await?;
    Ok(Json(store))
}

/// Take an approved store offline
#[utoipa::path(
    post,
    path = "/admin/stores/{id}/suspend",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Store ID")),
    request_body = SuspendStoreRequest,
    responses(
        (status = 200, description = "Store suspended", body = Store),
        (status = 400, description = "Store is not approved")
    ),
    security(("bearer_auth" = []))
)]
pub async fn suspend_store(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ip: ClientIp,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<SuspendStoreRequest>,
) -> AppResult<Json<Store>> {
    let store = state
        .services
        .admin()
        .suspend_store(id, payload.reason, audit_context(&user, ip))
        .await?;
    Ok(Json(store))
}

#[utoipa::path(
    get,
    path = "/admin/sellers",
    tag = "Admin",
    params(
        SellerListQuery,
        ("page" = Option<u64>, Query, description = "Page number, from 1"),
        ("limit" = Option<u64>, Query, description = "Page size, at most 100")
    ),
    responses((status = 200, description = "Sellers", body = [Seller])),
    security(("bearer_auth" = []))
)]
pub async fn list_sellers(
    State(state): State<AppState>,
    Query(query): Query<SellerListQuery>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Seller>>> {
    let page: PageRequest = pagination.into();
    let (sellers, total) = state.services.sellers().list(query.into(), page).await?;
    Ok(Json(Paginated::new(sellers, page, total)))
}

/// Seller with store and verification documents
#[utoipa::path(
    get,
    path = "/admin/sellers/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Seller ID")),
    responses(
        (status = 200, description = "Seller under review", body = SellerReview),
        (status = 404, description = "Unknown seller")
    ),
    security(("bearer_auth" = []))
)]
pub async fn seller_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SellerReview>> {
    Ok(Json(state.services.sellers().review(id).await?))
}

/// Platform-wide figures
#[utoipa::path(
    get,
    path = "/admin/analytics",
    tag = "Admin",
    responses((status = 200, description = "Platform figures", body = PlatformAnalytics)),
    security(("bearer_auth" = []))
)]
pub async fn platform_analytics(
    State(state): State<AppState>,
) -> AppResult<Json<PlatformAnalytics>> {
    Ok(Json(state.services.admin().platform_analytics().await?))
}

/// Audit trail, newest first
#[utoipa::path(
    get,
    path = "/admin/logs",
    tag = "Admin",
    params(
        ("page" = Option<u64>, Query, description = "Page number, from 1"),
        ("limit" = Option<u64>, Query, description = "Page size, at most 100")
    ),
    responses((status = 200, description = "Admin actions", body = [AdminLog])),
    security(("bearer_auth" = []))
)]
pub async fn list_logs(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<AdminLog>>> {
    let page: PageRequest = pagination.into();
    let (logs, total) = state.services.admin().logs(page).await?;
    Ok(Json(Paginated::new(logs, page, total)))
}

/// Every plan, inactive included
#[utoipa::path(
    get,
    path = "/admin/plans",
    tag = "Admin",
    responses((status = 200, description = "Plans", body = [SubscriptionPlan])),
    security(("bearer_auth" = []))
)]
pub async fn list_plans(State(state): State<AppState>) -> AppResult<Json<Vec<SubscriptionPlan>>> {
    Ok(Json(state.services.subscriptions().list_all_plans().await?))
}

#[utoipa::path(
    post,
    path = "/admin/plans",
    tag = "Admin",
    request_body = CreatePlanRequest,
    responses(
        (status = 201, description = "Plan created", body = SubscriptionPlan),
        (status = 409, description = "Slug already in use")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_plan(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ip: ClientIp,
    ValidatedJson(payload): ValidatedJson<CreatePlanRequest>,
) -> AppResult<(StatusCode, Json<SubscriptionPlan>)> {
    let plan = state
        .services
        .admin()
        .create_plan(payload.into(), audit_context(&user, ip))
        .await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

#[utoipa::path(
    put,
    path = "/admin/plans/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Plan ID")),
    request_body = UpdatePlanRequest,
    responses(
        (status = 200, description = "Plan updated", body = SubscriptionPlan),
        (status = 404, description = "Unknown plan")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_plan(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ip: ClientIp,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdatePlanRequest>,
) -> AppResult<Json<SubscriptionPlan>> {
    let plan = state
        .services
        .admin()
        .update_plan(id, payload.into(), audit_context(&user, ip))
        .await?;
    Ok(Json(plan))
}
