//! Admin audit log entity (append-only).

use sea_orm::entity::prelude::*;

use domain::{AdminAction, AdminLog, TargetType};

use super::parse_or;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "admin_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub admin_id: Uuid,
    pub action: String,
    pub target_type: String,
    pub target_id: Uuid,
    pub details: Option<Json>,
    pub ip_address: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for AdminLog {
    fn from(model: Model) -> Self {
        AdminLog {
            id: model.id,
            admin_id: model.admin_id,
            action: parse_or(&model.action, AdminAction::StoreApproved),
            target_type: parse_or(&model.target_type, TargetType::Store),
            target_id: model.target_id,
            details: model.details.filter(|v| !v.is_null()),
            ip_address: model.ip_address,
            created_at: model.created_at,
        }
    }
}
