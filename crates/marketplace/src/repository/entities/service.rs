//! Bookable service entity.

use sea_orm::entity::prelude::*;

use domain::{ItemStatus, LocationType, Service};

use super::{from_json, parse_or};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "services")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub store_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub images: Json,
    pub duration: i32,
    pub base_price: i64,
    pub price_variants: Json,
    pub availability: Option<Json>,
    pub location_type: String,
    pub status: String,
    pub is_draft: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::store::Entity",
        from = "Column::StoreId",
        to = "super::store::Column::Id"
    )]
    Store,
}

impl Related<super::store::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Store.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Service {
    fn from(model: Model) -> Self {
        Service {
            id: model.id,
            store_id: model.store_id,
            title: model.title,
            description: model.description,
            category: model.category,
            images: from_json(model.images),
            duration: model.duration,
            base_price: model.base_price,
            price_variants: from_json(model.price_variants),
            availability: model.availability.filter(|v| !v.is_null()),
            location_type: parse_or(&model.location_type, LocationType::AtStore),
            status: parse_or(&model.status, ItemStatus::Draft),
            is_draft: model.is_draft,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
