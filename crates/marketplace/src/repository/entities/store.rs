//! Store entity.

use sea_orm::entity::prelude::*;

use domain::{Store, StoreStatus};

use super::{from_json, parse_or};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "stores")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub seller_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub address: Json,
    pub contact_phone: String,
    pub contact_email: String,
    pub logo: Option<String>,
    pub cover_image: Option<String>,
    pub status: String,
    pub is_featured: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub approved_at: Option<DateTimeUtc>,
    pub approved_by: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::seller::Entity",
        from = "Column::SellerId",
        to = "super::seller::Column::Id"
    )]
    Seller,
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
    #[sea_orm(has_many = "super::service::Entity")]
    Services,
}

impl Related<super::seller::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Seller.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl Related<super::service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Services.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Store {
    fn from(model: Model) -> Self {
        Store {
            id: model.id,
            seller_id: model.seller_id,
            name: model.name,
            description: model.description,
            category: model.category,
            address: from_json(model.address),
            contact_phone: model.contact_phone,
            contact_email: model.contact_email,
            logo: model.logo,
            cover_image: model.cover_image,
            status: parse_or(&model.status, StoreStatus::Pending),
            is_featured: model.is_featured,
            created_at: model.created_at,
            updated_at: model.updated_at,
            approved_at: model.approved_at,
            approved_by: model.approved_by,
        }
    }
}
