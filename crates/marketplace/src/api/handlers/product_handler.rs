//! Product catalogue handlers.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use common::{AppResult, Paginated, PaginationParams};
use domain::{
    ItemStatus, NewProduct, NewVariant, PageRequest, Product, ProductUpdate, ProductVariant,
    VariantUpdate,
};

use super::{ensure_store_access, ensure_visible, target_store, visible_status};
use crate::api::extractors::{MaybeUser, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;

fn default_available() -> bool {
    true
}

/// One purchasable variant of a new product
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VariantRequest {
    #[validate(length(min = 1, max = 64, message = "SKU is required"))]
    #[schema(example = "CHAI-250")]
    pub sku: String,
    #[validate(length(min = 1, message = "Variant name is required"))]
    #[schema(example = "250g")]
    pub name: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Minor units
    #[validate(range(min = 1, max = 1000000000, message = "Price must be between 1 and 1000000000"))]
    pub price: i64,
    pub compare_at_price: Option<i64>,
    /// -1 means unlimited
    #[validate(range(min = -1, message = "Stock cannot be below -1"))]
    #[serde(default)]
    pub stock: i32,
    #[serde(default = "default_available")]
    pub is_available: bool,
    #[serde(default)]
    pub images: Vec<String>,
}

impl From<VariantRequest> for NewVariant {
    fn from(req: VariantRequest) -> Self {
        Self {
            sku: req.sku,
            name: req.name,
            attributes: req.attributes,
            price: req.price,
            compare_at_price: req.compare_at_price,
            stock: req.stock,
            is_available: req.is_available,
            images: req.images,
        }
    }
}

/// Product creation request; products start as drafts
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    /// Required for admins; sellers default to their own store
    pub store_id: Option<Uuid>,
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[validate(length(min = 1, message = "At least one image is required"))]
    pub images: Vec<String>,
    #[validate(length(min = 1, message = "At least one variant is required"), nested)]
    pub variants: Vec<VariantRequest>,
}

/// Partial product update
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Category cannot be empty"))]
    pub category: Option<String>,
    pub images: Option<Vec<String>>,
    /// `draft`, `active` or `inactive`; archive through DELETE
    pub status: Option<ItemStatus>,
    pub is_draft: Option<bool>,
}

impl From<UpdateProductRequest> for ProductUpdate {
    fn from(req: UpdateProductRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            category: req.category,
            images: req.images,
            status: req.status,
            is_draft: req.is_draft,
        }
    }
}

/// Partial variant update
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVariantRequest {
    #[validate(length(min = 1, message = "Variant name cannot be empty"))]
    pub name: Option<String>,
    pub attributes: Option<BTreeMap<String, String>>,
    #[validate(range(min = 1, max = 1000000000, message = "Price must be between 1 and 1000000000"))]
    pub price: Option<i64>,
    pub compare_at_price: Option<i64>,
    #[validate(range(min = -1, message = "Stock cannot be below -1"))]
    pub stock: Option<i32>,
    pub is_available: Option<bool>,
    pub images: Option<Vec<String>>,
}

impl From<UpdateVariantRequest> for VariantUpdate {
    fn from(req: UpdateVariantRequest) -> Self {
        Self {
            name: req.name,
            attributes: req.attributes,
            price: req.price,
            compare_at_price: req.compare_at_price,
            stock: req.stock,
            is_available: req.is_available,
            images: req.images,
        }
    }
}

/// Status filter for catalog listings
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ItemListQuery {
    /// Ignored for callers who do not manage the store
    pub status: Option<ItemStatus>,
}

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/:id", get(get_product))
        .route("/store/:store_id", get(list_store_products))
}

pub fn owner_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_product))
        .route("/:id", put(update_product).delete(delete_product))
        .route("/variants/:id", put(update_variant))
}

/// Product with its variants
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product", body = Product),
        (status = 404, description = "Unknown product, or not public")
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Product>> {
    let product = state.services.catalog().get_product(id).await?;
    ensure_visible(&state, user.as_ref(), product.store_id, product.status).await?;
    Ok(Json(product))
}

/// A store's products, newest first
#[utoipa::path(
    get,
    path = "/products/store/{store_id}",
    tag = "Products",
    params(
        ("store_id" = Uuid, Path, description = "Store ID"),
        ItemListQuery,
        ("page" = Option<u64>, Query, description = "Page number, from 1"),
        ("limit" = Option<u64>, Query, description = "Page size, at most 100")
    ),
    responses((status = 200, description = "Products", body = [Product]))
)]
pub async fn list_store_products(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(store_id): Path<Uuid>,
    Query(query): Query<ItemListQuery>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Product>>> {
    let status = visible_status(&state, user.as_ref(), store_id, query.status).await?;
    let page: PageRequest = pagination.into();

    let (products, total) = state
        .services
        .catalog()
        .list_products(store_id, status, page)
        .await?;
    Ok(Json(Paginated::new(products, page, total)))
}

/// Create a draft product within the plan's product quota
#[utoipa::path(
    post,
    path = "/products",
    tag = "Products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Validation error"),
        (status = 402, description = "Plan limit reached or subscription inactive"),
        (status = 409, description = "SKU already in use")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let store = target_store(&state, &user, payload.store_id).await?;

    let product = NewProduct {
        store_id: store.id,
        title: payload.title,
        description: payload.description,
        category: payload.category,
        images: payload.images,
        variants: payload.variants.into_iter().map(NewVariant::from).collect(),
    };

    let created = state
        .services
        .catalog()
        .create_product(store.seller_id, product)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 403, description = "Not the store owner")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_product(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateProductRequest>,
) -> AppResult<Json<Product>> {
    let product = state.services.catalog().get_product(id).await?;
    ensure_store_access(&state, &user, product.store_id).await?;

    Ok(Json(
        state
            .services
            .catalog()
            .update_product(id, payload.into())
            .await?,
    ))
}

/// Archive a product
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product archived"),
        (status = 403, description = "Not the store owner")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let product = state.services.catalog().get_product(id).await?;
    ensure_store_access(&state, &user, product.store_id).await?;

    state.services.catalog().delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/products/variants/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Variant ID")),
    request_body = UpdateVariantRequest,
    responses(
        (status = 200, description = "Variant updated", body = ProductVariant),
        (status = 403, description = "Not the store owner")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_variant(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateVariantRequest>,
) -> AppResult<Json<ProductVariant>> {
    let record = state.services.catalog().get_variant(id).await?;
    ensure_store_access(&state, &user, record.store_id).await?;

    Ok(Json(
        state
            .services
            .catalog()
            .update_variant(id, payload.into())
            .await?,
    ))
}
