//! Store discovery and owner edits.

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

use common::{AppError, AppResult, Paginated, PaginationParams};
use domain::{Address, PageRequest, Store, StoreFilter, StoreUpdate};

use super::seller_handler::StoreRequest;
use super::{can_manage_store, ensure_store_access};
use crate::api::extractors::{MaybeUser, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::service::StoreDetail;

/// Location and category filters for store search
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct StoreSearchQuery {
    pub category: Option<String>,
    pub pincode: Option<String>,
    pub area: Option<String>,
    pub ward: Option<String>,
    pub landmark: Option<String>,
}

impl From<StoreSearchQuery> for StoreFilter {
    fn from(query: StoreSearchQuery) -> Self {
        Self {
            status: None,
            category: query.category,
            pincode: query.pincode,
            area: query.area,
            ward: query.ward,
            landmark: query.landmark,
        }
    }
}

/// Partial store update; status and approval are not editable here
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStoreRequest {
    #[validate(length(min = 1, max = 120, message = "Store name cannot be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Category cannot be empty"))]
    pub category: Option<String>,
    pub address: Option<Address>,
    pub contact_phone: Option<String>,
    #[validate(email(message = "Invalid contact email"))]
    pub contact_email: Option<String>,
    #[validate(url(message = "Logo must be a URL"))]
    pub logo: Option<String>,
    #[validate(url(message = "Cover image must be a URL"))]
    pub cover_image: Option<String>,
}

impl From<UpdateStoreRequest> for StoreUpdate {
    fn from(req: UpdateStoreRequest) -> Self {
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

/// Anonymous store routes
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(search_stores))
        .route("/:id", get(get_store))
}

/// Routes behind the seller-or-admin gate
pub fn owner_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_store))
        .route("/mine", get(my_store))
        .route("/:id", put(update_store))
}

/// Search approved stores by category and location
#[utoipa::path(
    get,
    path = "/stores/search",
    tag = "Stores",
    params(
        StoreSearchQuery,
        ("page" = Option<u64>, Query, description = "Page number, from 1"),
        ("limit" = Option<u64>, Query, description = "Page size, at most 100")
    ),
    responses((status = 200, description = "Approved stores, newest first", body = [Store]))
)]
pub async fn search_stores(
    State(state): State<AppState>,
    Query(query): Query<StoreSearchQuery>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Store>>> {
    let page: PageRequest = pagination.into();
    let (stores, total) = state.services.stores().search(query.into(), page).await?;
    Ok(Json(Paginated::new(stores, page, total)))
}

/// Store with its active products and services
#[utoipa::path(
    get,
    path = "/stores/{id}",
    tag = "Stores",
    params(("id" = Uuid, Path, description = "Store ID")),
    responses(
        (status = 200, description = "Store detail", body = StoreDetail),
        (status = 404, description = "Unknown store, or not yet public")
    )
)]
pub async fn get_store(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<StoreDetail>> {
    let detail = state.services.stores().detail(id).await?;

    if !detail.store.is_approved() {
        let allowed = match &user {
            Some(user) => can_manage_store(&state, user, id).await?,
            None => false,
        };
        if !allowed {
            return Err(AppError::NotFound);
        }
    }

    Ok(Json(detail))
}

/// Open a store for an onboarded seller that has none yet
#[utoipa::path(
    post,
    path = "/stores",
    tag = "Stores",
    request_body = StoreRequest,
    responses(
        (status = 201, description = "Store created, pending review", body = Store),
        (status = 404, description = "Caller has not onboarded as a seller"),
        (status = 409, description = "Seller already has a store")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_store(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<StoreRequest>,
) -> AppResult<(StatusCode, Json<Store>)> {
    let seller = state.services.sellers().get_by_user(user.id).await?;
    let store = state
        .services
        .stores()
        .create(seller.id, payload.into())
        .await?;
    Ok((StatusCode::CREATED, Json(store)))
}

/// The caller's own store, whatever its review status
#[utoipa::path(
    get,
    path = "/stores/mine",
    tag = "Stores",
    responses(
        (status = 200, description = "Store", body = Store),
        (status = 404, description = "No seller profile or no store")
    ),
    security(("bearer_auth" = []))
)]
pub async fn my_store(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Store>> {
    let seller = state.services.sellers().get_by_user(user.id).await?;
    Ok(Json(state.services.stores().get_by_seller(seller.id).await?))
}

/// Edit store details
#[utoipa::path(
    put,
    path = "/stores/{id}",
    tag = "Stores",
    params(("id" = Uuid, Path, description = "Store ID")),
    request_body = UpdateStoreRequest,
    responses(
        (status = 200, description = "Store updated", body = Store),
        (status = 403, description = "Not the store owner")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_store(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateStoreRequest>,
) -> AppResult<Json<Store>> {
    ensure_store_access(&state, &user, id).await?;
    Ok(Json(state.services.stores().update(id, payload.into()).await?))
}
