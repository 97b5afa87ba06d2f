//! Booking repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select, Set,
};
use uuid::Uuid;

use super::conflict_on_unique;
use super::entities::booking::{self, ActiveModel, Entity as BookingEntity};
use super::entities::to_json;
use common::{AppError, AppResult};
use domain::{Booking, BookingStatus, NewBooking, PageRequest};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, booking: NewBooking) -> AppResult<Booking>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>>;

    /// Soonest appointment first
    async fn list_by_customer(
        &self,
        customer_id: Uuid,
        status: Option<BookingStatus>,
        page: PageRequest,
    ) -> AppResult<(Vec<Booking>, u64)>;

    /// Soonest appointment first
    async fn list_by_store(
        &self,
        store_id: Uuid,
        status: Option<BookingStatus>,
        page: PageRequest,
    ) -> AppResult<(Vec<Booking>, u64)>;

    async fn update_status(&self, id: Uuid, status: BookingStatus) -> AppResult<Booking>;
}

pub struct BookingStore {
    db: DatabaseConnection,
}

impl BookingStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn page(
        &self,
        mut query: Select<BookingEntity>,
        status: Option<BookingStatus>,
        page: PageRequest,
    ) -> AppResult<(Vec<Booking>, u64)> {
        if let Some(status) = status {
            query = query.filter(booking::Column::Status.eq(status.as_str()));
        }

        let paginator = query
            .order_by_asc(booking::Column::ScheduledAt)
            .paginate(&self.db, page.limit);
        let total = paginator.num_items().await.map_err(AppError::from)?;
        let models = paginator
            .fetch_page(page.index())
            .await
            .map_err(AppError::from)?;

        Ok((models.into_iter().map(Booking::from).collect(), total))
    }
}

#[async_trait]
impl BookingRepository for BookingStore {
    async fn create(&self, new_booking: NewBooking) -> AppResult<Booking> {
        let now = Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            booking_number: Set(new_booking.booking_number),
            customer_id: Set(new_booking.customer_id),
            service_id: Set(new_booking.service_id),
            store_id: Set(new_booking.store_id),
            scheduled_at: Set(new_booking.scheduled_at),
            duration: Set(new_booking.duration),
            status: Set(BookingStatus::Pending.to_string()),
            price: Set(new_booking.price),
            location: Set(Some(to_json(&new_booking.location))),
            notes: Set(new_booking.notes),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| conflict_on_unique(e, "Booking number"))?;
        Ok(Booking::from(model))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>> {
        let result = BookingEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Booking::from))
    }

    async fn list_by_customer(
        &self,
        customer_id: Uuid,
        status: Option<BookingStatus>,
        page: PageRequest,
    ) -> AppResult<(Vec<Booking>, u64)> {
        let query = BookingEntity::find().filter(booking::Column::CustomerId.eq(customer_id));
        self.page(query, status, page).await
    }

    async fn list_by_store(
        &self,
        store_id: Uuid,
        status: Option<BookingStatus>,
        page: PageRequest,
    ) -> AppResult<(Vec<Booking>, u64)> {
        let query = BookingEntity::find().filter(booking::Column::StoreId.eq(store_id));
        self.page(query, status, page).await
    }

    async fn update_status(&self, id: Uuid, status: BookingStatus) -> AppResult<Booking> {
        let existing = BookingEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        active.status = Set(status.to_string());
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Booking::from(model))
    }
}
