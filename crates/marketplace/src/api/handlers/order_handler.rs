//! Order placement and fulfilment.

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

use common::{AppError, AppResult, Paginated, PaginationParams};
use domain::{Address, Order, OrderLine, OrderRequest, OrderStatus, OrderType, PageRequest};

use super::{can_manage_store, ensure_store_access, target_store};
use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;

/// One requested line; prices are resolved server-side
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: Option<Uuid>,
    /// Required for product orders
    pub variant_id: Option<Uuid>,
    /// Required for service orders
    pub service_id: Option<Uuid>,
    #[validate(range(min = 1, max = 10000, message = "Quantity must be between 1 and 10000"))]
    pub quantity: u32,
}

impl From<OrderItemRequest> for OrderLine {
    fn from(req: OrderItemRequest) -> Self {
        Self {
            product_id: req.product_id,
            variant_id: req.variant_id,
            service_id: req.service_id,
            quantity: req.quantity,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub store_id: Uuid,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[validate(length(min = 1, message = "At least one item is required"), nested)]
    pub items: Vec<OrderItemRequest>,
    pub shipping_address: Option<Address>,
    pub billing_address: Option<Address>,
    #[validate(length(max = 1000, message = "Notes are too long"))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct StoreOrderQuery {
    /// Required for admins; sellers default to their own store
    pub store_id: Option<Uuid>,
    pub status: Option<OrderStatus>,
}

/// Routes for any authenticated caller
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_order))
        .route("/mine", get(my_orders))
        .route("/:id", get(get_order))
}

/// Routes behind the seller-or-admin gate
pub fn store_routes() -> Router<AppState> {
    Router::new()
        .route("/store", get(store_orders))
        .route("/:id/status", put(update_order_status))
}

/// Place a pending order; totals are computed from current prices
#[utoipa::path(
    post,
    path = "/orders",
    tag = "Orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = Order),
        (status = 400, description = "Unavailable item, insufficient stock or store not open"),
        (status = 404, description = "Unknown store or item")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_order(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let request = OrderRequest {
        customer_id: user.id,
        store_id: payload.store_id,
        order_type: payload.order_type,
        lines: payload.items.into_iter().map(OrderLine::from).collect(),
        shipping_address: payload.shipping_address,
        billing_address: payload.billing_address,
        notes: payload.notes,
    };

    let order = state.services.orders().create(request).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// The caller's orders, newest first
#[utoipa::path(
    get,
    path = "/orders/mine",
    tag = "Orders",
    params(
        OrderListQuery,
        ("page" = Option<u64>, Query, description = "Page number, from 1"),
        ("limit" = Option<u64>, Query, description = "Page size, at most 100")
    ),
    responses((status = 200, description = "Orders", body = [Order])),
    security(("bearer_auth" = []))
)]
pub async fn my_orders(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<OrderListQuery>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Order>>> {
    let page: PageRequest = pagination.into();
    let (orders, total) = state
        .services
        .orders()
        .list_for_customer(user.id, query.status, page)
        .await?;
    Ok(Json(Paginated::new(orders, page, total)))
}

/// One order, for its customer, the store owner or an admin
#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order", body = Order),
        (status = 403, description = "Not your order"),
        (status = 404, description = "Unknown order")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_order(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Order>> {
    let order = state.services.orders().get(id).await?;

    if order.customer_id != user.id && !can_manage_store(&state, &user, order.store_id).await? {
        return Err(AppError::Forbidden);
    }
    Ok(Json(order))
}

/// Orders placed with a store
#[utoipa::path(
    get,
    path = "/orders/store",
    tag = "Orders",
    params(
        StoreOrderQuery,
        ("page" = Option<u64>, Query, description = "Page number, from 1"),
        ("limit" = Option<u64>, Query, description = "Page size, at most 100")
    ),
    responses(
        (status = 200, description = "Orders", body = [Order]),
        (status = 403, description = "Not the store owner")
    ),
    security(("bearer_auth" = []))
)]
pub async fn store_orders(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<StoreOrderQuery>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Order>>> {
    let store = target_store(&state, &user, query.store_id).await?;
    let page: PageRequest = pagination.into();

    let (orders, total) = state
        .services
        .orders()
        .list_for_store(store.id, query.status, page)
        .await?;
    Ok(Json(Paginated::new(orders, page, total)))
}

/// Move an order along its lifecycle
#[utoipa::path(
    put,
    path = "/orders/{id}/status",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = Order),
        (status = 400, description = "Order is delivered or cancelled"),
        (status = 403, description = "Not the store owner")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateOrderStatusRequest>,
) -> AppResult<Json<Order>> {
    let order = state.services.orders().get(id).await?;
    ensure_store_access(&state, &user, order.store_id).await?;

    Ok(Json(
        state
            .services
            .orders()
            .update_status(id, payload.status)
            .await?,
    ))
}
