//! Bookable service handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use common::{AppResult, Paginated, PaginationParams};
use domain::{
    ItemStatus, LocationType, NewService, PageRequest, PriceVariant, Service, ServiceUpdate,
};

use super::product_handler::ItemListQuery;
use super::{ensure_store_access, ensure_visible, target_store, visible_status};
use crate::api::extractors::{MaybeUser, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;

/// Service creation request; services start as drafts
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequest {
    /// Required for admins; sellers default to their own store
    pub store_id: Option<Uuid>,
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    #[schema(example = "Haircut")]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[serde(default)]
    pub images: Vec<String>,
    /// Minutes
    #[validate(range(min = 1, message = "Duration must be positive"))]
    pub duration: i32,
    #[validate(range(min = 1, max = 1000000000, message = "Base price must be between 1 and 1000000000"))]
    pub base_price: i64,
    #[serde(default)]
    pub price_variants: Vec<PriceVariant>,
    #[schema(value_type = Option<Object>)]
    pub availability: Option<serde_json::Value>,
    pub location_type: LocationType,
}

/// Partial service update
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Category cannot be empty"))]
    pub category: Option<String>,
    pub images: Option<Vec<String>>,
    #[validate(range(min = 1, message = "Duration must be positive"))]
    pub duration: Option<i32>,
    #[validate(range(min = 1, max = 1000000000, message = "Base price must be between 1 and 1000000000"))]
    pub base_price: Option<i64>,
    pub price_variants: Option<Vec<PriceVariant>>,
    #[schema(value_type = Option<Object>)]
    pub availability: Option<serde_json::Value>,
    pub location_type: Option<LocationType>,
    pub status: Option<ItemStatus>,
    pub is_draft: Option<bool>,
}

impl From<UpdateServiceRequest> for ServiceUpdate {
    fn from(req: UpdateServiceRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            category: req.category,
            images: req.images,
            duration: req.duration,
            base_price: req.base_price,
            price_variants: req.price_variants,
            availability: req.availability,
            location_type: req.location_type,
            status: req.status,
            is_draft: req.is_draft,
        }
    }
}

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/:id", get(get_service))
        .route("/store/:store_id", get(list_store_services))
}

pub fn owner_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_service))
        .route("/:id", put(update_service).delete(delete_service))
}

#[utoipa::path(
    get,
    path = "/services/{id}",
    tag = "Services",
    params(("id" = Uuid, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service", body = Service),
        (status = 404, description = "Unknown service, or not public")
    )
)]
pub async fn get_service(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Service>> {
    let service = state.services.catalog().get_service(id).await?;
    ensure_visible(&state, user.as_ref(), service.store_id, service.status).await?;
    Ok(Json(service))
}

/// A store's services, newest first
#[utoipa::path(
    get,
    path = "/services/store/{store_id}",
    tag = "Services",
    params(
        ("store_id" = Uuid, Path, description = "Store ID"),
        ItemListQuery,
        ("page" = Option<u64>, Query, description = "Page number, from 1"),
        ("limit" = Option<u64>, Query, description = "Page size, at most 100")
    ),
    responses((status = 200, description = "Services", body = [Service]))
)]
pub async fn list_store_services(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(store_id): Path<Uuid>,
    Query(query): Query<ItemListQuery>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Service>>> {
    let status = visible_status(&state, user.as_ref(), store_id, query.status).await?;
    let page: PageRequest = pagination.into();

    let (services, total) = state
        .services
        .catalog()
        .list_services(store_id, status, page)
        .await?;
    Ok(Json(Paginated::new(services, page, total)))
}

/// Create a draft service within the plan's service quota
#[utoipa::path(
    post,
    path = "/services",
    tag = "Services",
    request_body = CreateServiceRequest,
    responses(
        (status = 201, description = "Service created", body = Service),
        (status = 400, description = "Validation error"),
        (status = 402, description = "Plan limit reached or subscription inactive")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_service(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateServiceRequest>,
) -> AppResult<(StatusCode, Json<Service>)> {
    let store = target_store(&state, &user, payload.store_id).await?;

    let service = NewService {
        store_id: store.id,
        title: payload.title,
        description: payload.description,
        category: payload.category,
        images: payload.images,
        duration: payload.duration,
        base_price: payload.base_price,
        price_variants: payload.price_variants,
        availability: payload.availability,
        location_type: payload.location_type,
    };

    let created = state
        .services
        .catalog()
        .create_service(store.seller_id, service)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/services/{id}",
    tag = "Services",
    params(("id" = Uuid, Path, description = "Service ID")),
    request_body = UpdateServiceRequest,
    responses(
        (status = 200, description = "Service updated", body = Service),
        (status = 403, description = "Not the store owner")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_service(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateServiceRequest>,
) -> AppResult<Json<Service>> {
    let service = state.services.catalog().get_service(id).await?;
    ensure_store_access(&state, &user, service.store_id).await?;

    Ok(Json(
        state
            .services
            .catalog()
            .update_service(id, payload.into())
            .await?,
    ))
}

/// Archive a service
#[utoipa::path(
    delete,
    path = "/services/{id}",
    tag = "Services",
    params(("id" = Uuid, Path, description = "Service ID")),
    responses(
        (status = 204, description = "Service archived"),
        (status = 403, description = "Not the store owner")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_service(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = state.services.catalog().get_service(id).await?;
    ensure_store_access(&state, &user, service.store_id).await?;

    state.services.catalog().delete_service(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
