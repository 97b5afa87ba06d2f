//! Service bookings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::catalog::Service;
use crate::constants::AT_STORE_LOCATION;
use crate::store::Address;
use crate::{DomainError, DomainResult};

string_enum! {
    /// Booking state. `completed` and `cancelled` are terminal.
    pub enum BookingStatus {
        Pending => "pending",
        Confirmed => "confirmed",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

impl BookingStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    pub fn transition_to(&self, next: BookingStatus) -> DomainResult<BookingStatus> {
        if self.is_terminal() {
            return Err(DomainError::validation(format!(
                "Booking is already {} and cannot move to {}",
                self, next
            )));
        }
        Ok(next)
    }
}

/// Where the booked service takes place.
///
/// Serialized as the string `"at_store"` or as an address object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BookingLocation {
    #[default]
    AtStore,
    Address(Address),
}

impl BookingLocation {
    pub fn validate(&self) -> DomainResult<()> {
        match self {
            BookingLocation::AtStore => Ok(()),
            BookingLocation::Address(address) => address.validate(),
        }
    }
}

impl Serialize for BookingLocation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BookingLocation::AtStore => serializer.serialize_str(AT_STORE_LOCATION),
            BookingLocation::Address(address) => address.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for BookingLocation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Keyword(String),
            Address(Address),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Keyword(keyword) if keyword == AT_STORE_LOCATION => Ok(BookingLocation::AtStore),
            Repr::Keyword(other) => Err(serde::de::Error::custom(format!(
                "unknown location '{}', expected '{}' or an address",
                other, AT_STORE_LOCATION
            ))),
            Repr::Address(address) => Ok(BookingLocation::Address(address)),
        }
    }
}

/// Booking entity. Duration and price are copied from the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub booking_number: String,
    pub customer_id: Uuid,
    pub service_id: Uuid,
    pub store_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    /// Minutes
    pub duration: i32,
    pub status: BookingStatus,
    pub price: i64,
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub location: BookingLocation,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Customer's booking request
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRequest {
    pub customer_id: Uuid,
    pub service_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub location: BookingLocation,
    pub notes: Option<String>,
}

/// Booking ready to persist
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub booking_number: String,
    pub customer_id: Uuid,
    pub service_id: Uuid,
    pub store_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub duration: i32,
    pub price: i64,
    pub location: BookingLocation,
    pub notes: Option<String>,
}

impl NewBooking {
    /// Snapshot the service's duration and base price.
    pub fn for_service(
        request: BookingRequest,
        service: &Service,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if !service.is_bookable() {
            return Err(DomainError::validation(format!(
                "Service {} is not available for booking",
                service.title
            )));
        }
        request.location.validate()?;

        Ok(Self {
            booking_number: crate::numbering::booking_number(now),
            customer_id: request.customer_id,
            service_id: service.id,
            store_id: service.store_id,
            scheduled_at: request.scheduled_at,
            duration: service.duration,
            price: service.base_price,
            location: request.location,
            notes: request.notes,
        })
    }
}
