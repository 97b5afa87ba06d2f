//! Order entity. Store and customer are plain references, not cascades.

use sea_orm::entity::prelude::*;

use domain::{Order, OrderStatus, OrderType, PaymentStatus};

use super::{from_json, from_json_opt, parse_or};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub order_number: String,
    pub customer_id: Uuid,
    pub store_id: Uuid,
    pub order_type: String,
    pub status: String,
    pub items: Json,
    pub subtotal: i64,
    pub tax: i64,
    pub shipping: i64,
    pub total: i64,
    pub payment_status: String,
    pub shipping_address: Option<Json>,
    pub billing_address: Option<Json>,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Order {
    fn from(model: Model) -> Self {
        Order {
            id: model.id,
            order_number: model.order_number,
            customer_id: model.customer_id,
            store_id: model.store_id,
            order_type: parse_or(&model.order_type, OrderType::Product),
            status: parse_or(&model.status, OrderStatus::Pending),
            items: from_json(model.items),
            subtotal: model.subtotal,
            tax: model.tax,
            shipping: model.shipping,
            total: model.total,
            payment_status: parse_or(&model.payment_status, PaymentStatus::Pending),
            shipping_address: from_json_opt(model.shipping_address),
            billing_address: from_json_opt(model.billing_address),
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
