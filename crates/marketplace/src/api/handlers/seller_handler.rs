//! Seller onboarding, dashboard and subscription.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use common::{AppError, AppResult};
use domain::{
    Address, AnalyticsPeriod, BusinessType, CatalogLimits, DocumentType, NewDocument, NewSeller,
    NewStore, Seller, SellerAnalytics, SellerProfile,
};

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;

/// Store details supplied at onboarding
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreRequest {
    #[validate(length(min = 1, max = 120, message = "Store name is required"))]
    #[schema(example = "Chai Corner")]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Category is required"))]
    #[schema(example = "Beverages")]
    pub category: String,
    pub address: Address,
    #[schema(example = "9876543210")]
    pub contact_phone: String,
    #[validate(email(message = "Invalid contact email"))]
    pub contact_email: String,
    #[validate(url(message = "Logo must be a URL"))]
    pub logo: Option<String>,
    #[validate(url(message = "Cover image must be a URL"))]
    pub cover_image: Option<String>,
}

impl From<StoreRequest> for NewStore {
    fn from(req: StoreRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            category: req.category,
            address: req.address,
            contact_phone: req.contact_phone,
            contact_email: req.contact_email,
            logo: req.logo,
            cover_image: req.cover_image,
        }
    }
}

/// Metadata of an already uploaded verification file
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRequest {
    /// Defaults to `other`
    #[serde(rename = "type")]
    pub doc_type: Option<DocumentType>,
    #[validate(url(message = "Document fileUrl must be a URL"))]
    #[schema(example = "https://files.example.com/gst.pdf")]
    pub file_url: String,
    #[validate(length(min = 1, max = 255, message = "Document fileName is required"))]
    pub file_name: String,
    #[validate(range(min = 1, message = "Document fileSize must be positive"))]
    pub file_size: i64,
    #[validate(length(min = 1, max = 128, message = "Document mimeType is required"))]
    #[schema(example = "application/pdf")]
    pub mime_type: String,
}

impl From<DocumentRequest> for NewDocument {
    fn from(req: DocumentRequest) -> Self {
        Self {
            doc_type: req.doc_type.unwrap_or(DocumentType::Other),
            file_url: req.file_url,
            file_name: req.file_name,
            file_size: req.file_size,
            mime_type: req.mime_type,
        }
    }
}

/// Seller onboarding request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OnboardRequest {
    #[validate(length(min = 1, max = 100, message = "Owner name is required"))]
    pub owner_name: String,
    pub business_type: BusinessType,
    #[validate(nested)]
    pub store: StoreRequest,
    #[validate(length(min = 1, message = "At least one document is required"), nested)]
    pub documents: Vec<DocumentRequest>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AnalyticsQuery {
    /// `7d`, `30d` (default) or `1y`
    pub period: Option<AnalyticsPeriod>,
}

/// Plan change request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRequest {
    pub plan_id: Uuid,
    /// Defaults to one subscription period from now
    pub expires_at: Option<DateTime<Utc>>,
    /// Admins only: the seller to move
    pub seller_id: Option<Uuid>,
}

/// Create seller routes
pub fn seller_routes() -> Router<AppState> {
    Router::new()
        .route("/onboard", post(onboard))
        .route("/profile", get(profile))
        .route("/analytics", get(analytics))
        .route("/limits", get(limits))
        .route("/subscription", put(update_subscription))
}

/// Create the seller and its pending store
#[utoipa::path(
    post,
    path = "/sellers/onboard",
    tag = "Sellers",
    request_body = OnboardRequest,
    responses(
        (status = 201, description = "Seller onboarded", body = SellerProfile),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Seller or store already exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn onboard(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<OnboardRequest>,
) -> AppResult<(StatusCode, Json<SellerProfile>)> {
    let seller = NewSeller {
        user_id: user.id,
        owner_name: payload.owner_name,
        business_type: payload.business_type,
        documents: payload.documents.into_iter().map(NewDocument::from).collect(),
    };

    let profile = state
        .services
        .sellers()
        .onboard(seller, payload.store.into())
        .await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Seller record with its store
#[utoipa::path(
    get,
    path = "/sellers/profile",
    tag = "Sellers",
    responses(
        (status = 200, description = "Seller profile", body = SellerProfile),
        (status = 404, description = "Caller has not onboarded")
    ),
    security(("bearer_auth" = []))
)]
pub async fn profile(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<SellerProfile>> {
    Ok(Json(state.services.sellers().profile(user.id).await?))
}

/// Orders, revenue and catalog size for a period
#[utoipa::path(
    get,
    path = "/sellers/analytics",
    tag = "Sellers",
    params(AnalyticsQuery),
    responses((status = 200, description = "Seller figures", body = SellerAnalytics)),
    security(("bearer_auth" = []))
)]
pub async fn analytics(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<AnalyticsQuery>,
) -> AppResult<Json<SellerAnalytics>> {
    let period = query.period.unwrap_or_default();
    Ok(Json(state.services.sellers().analytics(user.id, period).await?))
}

/// Product and service quota usage
#[utoipa::path(
    get,
    path = "/sellers/limits",
    tag = "Sellers",
    responses(
        (status = 200, description = "Quota usage", body = CatalogLimits),
        (status = 402, description = "No active subscription")
    ),
    security(("bearer_auth" = []))
)]
pub async fn limits(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<CatalogLimits>> {
    let seller = state.services.sellers().get_by_user(user.id).await?;
    Ok(Json(state.services.subscriptions().limits(seller.id).await?))
}

/// Move a seller onto another plan
#[utoipa::path(
    put,
    path = "/sellers/subscription",
    tag = "Sellers",
    request_body = SubscriptionRequest,
    responses(
        (status = 200, description = "Subscription updated", body = Seller),
        (status = 400, description = "Plan inactive or expiry in the past"),
        (status = 404, description = "Plan or seller not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_subscription(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<SubscriptionRequest>,
) -> AppResult<Json<Seller>> {
    let seller_id = match (user.is_admin(), payload.seller_id) {
        (true, Some(seller_id)) => seller_id,
        (true, None) => return Err(AppError::validation("sellerId is required")),
        (false, requested) => {
            let own = state.services.sellers().get_by_user(user.id).await?;
            if requested.is_some_and(|id| id != own.id) {
                return Err(AppError::Forbidden);
            }
            own.id
        }
    };

    let seller = state
        .services
        .subscriptions()
        .update_seller_subscription(seller_id, payload.plan_id, payload.expires_at)
        .await?;
    Ok(Json(seller))
}
