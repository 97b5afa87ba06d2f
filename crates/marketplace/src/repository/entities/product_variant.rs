//! Product variant entity.

use sea_orm::entity::prelude::*;

use domain::ProductVariant;

use super::from_json;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "product_variants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub product_id: Uuid,
    #[sea_orm(unique)]
    pub sku: String,
    pub name: String,
    pub attributes: Json,
    pub price: i64,
    pub compare_at_price: Option<i64>,
    pub stock: i32,
    pub is_available: bool,
    pub images: Json,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ProductVariant {
    fn from(model: Model) -> Self {
        ProductVariant {
            id: model.id,
            product_id: model.product_id,
            sku: model.sku,
            name: model.name,
            attributes: from_json(model.attributes),
            price: model.price,
            compare_at_price: model.compare_at_price,
            stock: model.stock,
            is_available: model.is_available,
            images: from_json(model.images),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
