//! Booking entity.

use sea_orm::entity::prelude::*;

use domain::{Booking, BookingStatus};

use super::{from_json_opt, parse_or};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub booking_number: String,
    pub customer_id: Uuid,
    pub service_id: Uuid,
    pub store_id: Uuid,
    pub scheduled_at: DateTimeUtc,
    pub duration: i32,
    pub status: String,
    pub price: i64,
    pub location: Option<Json>,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Booking {
    fn from(model: Model) -> Self {
        Booking {
            id: model.id,
            booking_number: model.booking_number,
            customer_id: model.customer_id,
            service_id: model.service_id,
            store_id: model.store_id,
            scheduled_at: model.scheduled_at,
            duration: model.duration,
            status: parse_or(&model.status, BookingStatus::Pending),
            price: model.price,
            location: from_json_opt(model.location).unwrap_or_default(),
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
