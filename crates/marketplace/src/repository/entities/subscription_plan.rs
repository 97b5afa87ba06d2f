//! Subscription plan entity.

use sea_orm::entity::prelude::*;

use domain::SubscriptionPlan;

use super::from_json;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "subscription_plans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub description: Option<String>,
    pub price: i64,
    pub max_products: i32,
    pub max_services: i32,
    pub features: Json,
    pub commission_rate: f64,
    pub is_featured: bool,
    pub analytics_access: bool,
    pub priority: i32,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for SubscriptionPlan {
    fn from(model: Model) -> Self {
        SubscriptionPlan {
            id: model.id,
            name: model.name,
            slug: model.slug,
            description: model.description,
            price: model.price,
            max_products: model.max_products,
            max_services: model.max_services,
            features: from_json(model.features),
            commission_rate: model.commission_rate,
            is_featured: model.is_featured,
            analytics_access: model.analytics_access,
            priority: model.priority,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
