//! Seller entity.

use sea_orm::entity::prelude::*;

use domain::{BusinessType, Seller, SubscriptionStatus, VerificationStatus};

use super::parse_or;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sellers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub owner_name: String,
    pub business_type: String,
    pub verification_status: String,
    pub subscription_plan_id: Option<Uuid>,
    pub subscription_status: String,
    pub subscription_expires_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::store::Entity")]
    Store,
}

impl Related<super::store::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Store.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Seller {
    fn from(model: Model) -> Self {
        Seller {
            id: model.id,
            user_id: model.user_id,
            owner_name: model.owner_name,
            business_type: parse_or(&model.business_type, BusinessType::Shop),
            verification_status: parse_or(&model.verification_status, VerificationStatus::Pending),
            subscription_plan_id: model.subscription_plan_id,
            subscription_status: parse_or(&model.subscription_status, SubscriptionStatus::Expired),
            subscription_expires_at: model.subscription_expires_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
