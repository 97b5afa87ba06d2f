//! Append-only admin audit log.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::admin_log::{self, ActiveModel, Entity as AdminLogEntity};
use common::{AppError, AppResult};
use domain::{AdminLog, NewAdminLog, PageRequest};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AdminLogRepository: Send + Sync {
    async fn append(&self, entry: NewAdminLog) -> AppResult<AdminLog>;

    /// Newest first
    async fn list(&self, page: PageRequest) -> AppResult<(Vec<AdminLog>, u64)>;
}

pub struct AdminLogStore {
    db: DatabaseConnection,
}

impl AdminLogStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AdminLogRepository for AdminLogStore {
    async fn append(&self, entry: NewAdminLog) -> AppResult<AdminLog> {
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            admin_id: Set(entry.admin_id),
            action: Set(entry.action.to_string()),
            target_type: Set(entry.target_type.to_string()),
            target_id: Set(entry.target_id),
            details: Set(entry.details),
            ip_address: Set(entry.ip_address),
            created_at: Set(chrono::Utc::now()),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(AdminLog::from(model))
    }

    async fn list(&self, page: PageRequest) -> AppResult<(Vec<AdminLog>, u64)> {
        let paginator = AdminLogEntity::find()
            .order_by_desc(admin_log::Column::CreatedAt)
            .paginate(&self.db, page.limit);

        let total = paginator.num_items().await.map_err(AppError::from)?;
        let models = paginator
            .fetch_page(page.index())
            .await
            .map_err(AppError::from)?;

        Ok((models.into_iter().map(AdminLog::from).collect(), total))
    }
}
