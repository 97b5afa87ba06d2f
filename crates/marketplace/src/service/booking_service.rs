//! Service bookings.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{Booking, BookingRequest, BookingStatus, NewBooking, PageRequest};

use crate::repository::{BookingRepository, ServiceRepository};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BookingService: Send + Sync {
    /// Book an active service; duration and price are copied from it.
    async fn create(&self, request: BookingRequest) -> AppResult<Booking>;

    async fn get(&self, id: Uuid) -> AppResult<Booking>;

    async fn list_for_customer(
        &self,
        customer_id: Uuid,
        status: Option<BookingStatus>,
        page: PageRequest,
    ) -> AppResult<(Vec<Booking>, u64)>;

    async fn list_for_store(
        &self,
        store_id: Uuid,
        status: Option<BookingStatus>,
        page: PageRequest,
    ) -> AppResult<(Vec<Booking>, u64)>;

    /// Completed and cancelled bookings cannot move
    async fn update_status(&self, id: Uuid, status: BookingStatus) -> AppResult<Booking>;
}

pub struct BookingManager {
    bookings: Arc<dyn BookingRepository>,
    services: Arc<dyn ServiceRepository>,
}

impl BookingManager {
    pub fn new(bookings: Arc<dyn BookingRepository>, services: Arc<dyn ServiceRepository>) -> Self {
        Self { bookings, services }
    }
}

#[async_trait]
impl BookingService for BookingManager {
    async fn create(&self, request: BookingRequest) -> AppResult<Booking> {
        let now = Utc::now();
        if request.scheduled_at <= now {
            return Err(AppError::validation("scheduledAt must be in the future"));
        }

        let service = self
            .services
            .find_by_id(request.service_id)
            .await?
            .ok_or_not_found()?;

        let booking = self
            .bookings
            .create(NewBooking::for_service(request, &service, now)?)
            .await?;

        info!(
            booking_id = %booking.id,
            booking_number = %booking.booking_number,
            service_id = %booking.service_id,
            scheduled_at = %booking.scheduled_at,
            "Booking created"
        );
        Ok(booking)
    }

    async fn get(&self, id: Uuid) -> AppResult<Booking> {
        self.bookings.find_by_id(id).await?.ok_or_not_found()
    }

    async fn list_for_customer(
        &self,
        customer_id: Uuid,
        status: Option<BookingStatus>,
        page: PageRequest,
    ) -> AppResult<(Vec<Booking>, u64)> {
        self.bookings.list_by_customer(customer_id, status, page).await
    }

    async fn list_for_store(
        &self,
        store_id: Uuid,
        status: Option<BookingStatus>,
        page: PageRequest,
    ) -> AppResult<(Vec<Booking>, u64)> {
        self.bookings.list_by_store(store_id, status, page).await
    }

    async fn update_status(&self, id: Uuid, status: BookingStatus) -> AppResult<Booking> {
        let booking = self.get(id).await?;
        let next = booking.status.transition_to(status)?;

        let updated = self.bookings.update_status(id, next).await?;
        info!(booking_id = %id, from = %booking.status, to = %next, "Booking status changed");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockBookingRepository, MockServiceRepository};
    use crate::service::fixtures;
    use chrono::Duration;
    use domain::{BookingLocation, ItemStatus};

    fn request(service_id: Uuid) -> BookingRequest {
        BookingRequest {
            customer_id: Uuid::new_v4(),
            service_id,
            scheduled_at: Utc::now() + Duration::days(2),
            location: BookingLocation::AtStore,
            notes: None,
        }
    }

    fn stored(new: NewBooking) -> Booking {
        let now = Utc::now();
        Booking {
            id: Uuid::new_v4(),
            booking_number: new.booking_number,
            customer_id: new.customer_id,
            service_id: new.service_id,
            store_id: new.store_id,
            scheduled_at: new.scheduled_at,
            duration: new.duration,
            status: BookingStatus::Pending,
            price: new.price,
            location: new.location,
            notes: new.notes,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn booking_snapshots_duration_and_price() {
        let service = fixtures::service(Uuid::new_v4(), ItemStatus::Active);
        let service_id = service.id;
        let mut services = MockServiceRepository::new();
        services
            .expect_find_by_id()
            .returning(move |_| Ok(Some(service.clone())));
        let mut bookings = MockBookingRepository::new();
        bookings
            .expect_create()
            .times(1)
            .returning(|new| Ok(stored(new)));

        let booking = BookingManager::new(Arc::new(bookings), Arc::new(services))
            .create(request(service_id))
            .await
            .unwrap();
        assert_eq!((booking.duration, booking.price), (45, 30_000));
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.location, BookingLocation::AtStore);
    }

    #[tokio::test]
    async fn draft_service_cannot_be_booked() {
        let service = fixtures::service(Uuid::new_v4(), ItemStatus::Draft);
        let service_id = service.id;
        let mut services = MockServiceRepository::new();
        services
            .expect_find_by_id()
            .returning(move |_| Ok(Some(service.clone())));
        let mut bookings = MockBookingRepository::new();
        bookings.expect_create().never();

        let result = BookingManager::new(Arc::new(bookings), Arc::new(services))
            .create(request(service_id))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn past_slot_is_rejected() {
        let mut services = MockServiceRepository::new();
        services.expect_find_by_id().never();
        let mut past = request(Uuid::new_v4());
        past.scheduled_at = Utc::now() - Duration::hours(1);

        let result = BookingManager::new(Arc::new(MockBookingRepository::new()), Arc::new(services))
            .create(past)
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
