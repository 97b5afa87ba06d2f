//! Product entity.

use sea_orm::entity::prelude::*;

use domain::{ItemStatus, Product, ProductVariant};

use super::{from_json, parse_or};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub store_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub images: Json,
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
    #[sea_orm(has_many = "super::product_variant::Entity")]
    Variants,
}

impl Related<super::store::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Store.def()
    }
}

impl Related<super::product_variant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Variants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Assemble the domain product from this row and its variant rows.
    pub fn into_product(self, variants: Vec<super::product_variant::Model>) -> Product {
        Product {
            id: self.id,
            store_id: self.store_id,
            title: self.title,
            description: self.description,
            category: self.category,
            images: from_json(self.images),
            status: parse_or(&self.status, ItemStatus::Draft),
            is_draft: self.is_draft,
            variants: variants.into_iter().map(ProductVariant::from).collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
