//! Service bookings.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use common::{AppResult, Paginated, PaginationParams};
use domain::{Booking, BookingLocation, BookingRequest, BookingStatus, PageRequest};

use super::{ensure_store_access, target_store};
use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub service_id: Uuid,
    /// Must be in the future
    pub scheduled_at: DateTime<Utc>,
    /// `"at_store"` (default) or an address
    #[serde(default)]
    #[schema(value_type = Object)]
    pub location: BookingLocation,
    #[validate(length(max = 1000, message = "Notes are too long"))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct BookingListQuery {
    pub status: Option<BookingStatus>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct StoreBookingQuery {
    /// Required for admins; sellers default to their own store
    pub store_id: Option<Uuid>,
    pub status: Option<BookingStatus>,
}

pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_booking))
        .route("/mine", get(my_bookings))
}

pub fn store_routes() -> Router<AppState> {
    Router::new()
        .route("/store", get(store_bookings))
        .route("/:id/status", put(update_booking_status))
}

/// Book an active service
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "Bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = Booking),
        (status = 400, description = "Slot in the past or service not bookable"),
        (status = 404, description = "Unknown service")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<Booking>)> {
    let request = BookingRequest {
        customer_id: user.id,
        service_id: payload.service_id,
        scheduled_at: payload.scheduled_at,
        location: payload.location,
        notes: payload.notes,
    };

    let booking = state.services.bookings().create(request).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

#[utoipa::path(
    get,
    path = "/bookings/mine",
    tag = "Bookings",
    params(
        BookingListQuery,
        ("page" = Option<u64>, Query, description = "Page number, from 1"),
        ("limit" = Option<u64>, Query, description = "Page size, at most 100")
    ),
    responses((status = 200, description = "Bookings", body = [Booking])),
    security(("bearer_auth" = []))
)]
pub async fn my_bookings(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<BookingListQuery>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Booking>>> {
    let page: PageRequest = pagination.into();
    let (bookings, total) = state
        .services
        .bookings()
        .list_for_customer(user.id, query.status, page)
        .await?;
    Ok(Json(Paginated::new(bookings, page, total)))
}

#[utoipa::path(
    get,
    path = "/bookings/store",
    tag = "Bookings",
    params(
        StoreBookingQuery,
        ("page" = Option<u64>, Query, description = "Page number, from 1"),
        ("limit" = Option<u64>, Query, description = "Page size, at most 100")
    ),
    responses(
        (status = 200, description = "Bookings", body = [Booking]),
        (status = 403, description = "Not the store owner")
    ),
    security(("bearer_auth" = []))
)]
pub async fn store_bookings(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<StoreBookingQuery>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Booking>>> {
    let store = target_store(&state, &user, query.store_id).await?;
    let page: PageRequest = pagination.into();

    let (bookings, total) = state
        .services
        .bookings()
        .list_for_store(store.id, query.status, page)
        .await?;
    Ok(Json(Paginated::new(bookings, page, total)))
}

#[utoipa::path(
    put,
    path = "/bookings/{id}/status",
    tag = "Bookings",
    params(("id" = Uuid, Path, description = "Booking ID")),
    request_body = UpdateBookingStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = Booking),
        (status = 400, description = "Booking is completed or cancelled"),
        (status = 403, description = "Not the store owner")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_booking_status(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateBookingStatusRequest>,
) -> AppResult<Json<Booking>> {
    let booking = state.services.bookings().get(id).await?;
    ensure_store_access(&state, &user, booking.store_id).await?;

    Ok(Json(
        state
            .services
            .bookings()
            .update_status(id, payload.status)
            .await?,
    ))
}
