//! Admin workflows: store review, plan management, reporting, audit trail.
//!
//! Every admin mutation writes the change first and the audit record second.
//! A failed audit write is logged and does not undo the change.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{
    AdminAction, AdminLog, NewAdminLog, NewPlan, PageRequest, PlanUpdate, PlatformAnalytics,
    ReviewDecision, Store, StoreStatus, SubscriptionPlan, TargetType,
};

use super::SubscriptionService;
use crate::repository::{AdminLogRepository, OrderRepository, SellerRepository, StoreRepository};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Who performed an admin action and from where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditContext {
    pub admin_id: Uuid,
    pub ip_address: Option<String>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AdminService: Send + Sync {
    /// Approve or reject a store and record the decision.
    async fn review_store(
        &self,
        store_id: Uuid,
        approved: bool,
        reason: Option<String>,
        ctx: AuditContext,
    ) -> AppResult<Store>;

    /// Take an approved store offline
    async fn suspend_store(
        &self,
        store_id: Uuid,
        reason: Option<String>,
        ctx: AuditContext,
    ) -> AppResult<Store>;

    async fn create_plan(&self, plan: NewPlan, ctx: AuditContext) -> AppResult<SubscriptionPlan>;

    async fn update_plan(
        &self,
        plan_id: Uuid,
        changes: PlanUpdate,
        ctx: AuditContext,
    ) -> AppResult<SubscriptionPlan>;

    async fn platform_analytics(&self) -> AppResult<PlatformAnalytics>;

    /// Newest first
    async fn logs(&self, page: PageRequest) -> AppResult<(Vec<AdminLog>, u64)>;
}

pub struct AdminManager {
    stores: Arc<dyn StoreRepository>,
    sellers: Arc<dyn SellerRepository>,
    orders: Arc<dyn OrderRepository>,
    logs: Arc<dyn AdminLogRepository>,
    subscriptions: Arc<dyn SubscriptionService>,
}

impl AdminManager {
    pub fn new(
        stores: Arc<dyn StoreRepository>,
        sellers: Arc<dyn SellerRepository>,
        orders: Arc<dyn OrderRepository>,
        logs: Arc<dyn AdminLogRepository>,
        subscriptions: Arc<dyn SubscriptionService>,
    ) -> Self {
        Self {
            stores,
            sellers,
            orders,
            logs,
            subscriptions,
        }
    }

    async fn audit(
        &self,
        ctx: AuditContext,
        action: AdminAction,
        target_type: TargetType,
        target_id: Uuid,
        details: Option<serde_json::Value>,
    ) {
        let entry = NewAdminLog {
            admin_id: ctx.admin_id,
            action,
            target_type,
            target_id,
            details,
            ip_address: ctx.ip_address,
        };

        if let Err(e) = self.logs.append(entry).await {
            error!(
                admin_id = %ctx.admin_id,
                action = %action,
                target_id = %target_id,
                error = ?e,
                "Failed to write admin audit log"
            );
        }
    }
}

fn reason_details(reason: Option<String>) -> Option<serde_json::Value> {
    reason.map(|reason| json!({ "reason": reason }))
}

#[async_trait]
impl AdminService for AdminManager {
    async fn review_store(
        &self,
        store_id: Uuid,
        approved: bool,
        reason: Option<String>,
        ctx: AuditContext,
    ) -> AppResult<Store> {
        let store = self.stores.find_by_id(store_id).await?.ok_or_not_found()?;
        let decision = ReviewDecision::from_approved(approved);
        let target = decision.target_status(store.status)?;

        let reviewer = (target == StoreStatus::Approved).then_some(ctx.admin_id);
        let updated = self.stores.set_status(store_id, target, reviewer).await?;
        info!(store_id = %store_id, admin_id = %ctx.admin_id, status = %target, "Store reviewed");

        let action = match decision {
            ReviewDecision::Approve => AdminAction::StoreApproved,
            ReviewDecision::Reject => AdminAction::StoreRejected,
        };
        self.audit(ctx, action, TargetType::Store, store_id, reason_details(reason))
            .await;

        Ok(updated)
    }

    async fn suspend_store(
        &self,
        store_id: Uuid,
        reason: Option<String>,
        ctx: AuditContext,
    ) -> AppResult<Store> {
        let store = self.stores.find_by_id(store_id).await?.ok_or_not_found()?;
        if !store.status.can_suspend() {
            return Err(AppError::validation(format!(
                "Store in status '{}' cannot be suspended",
                store.status
            )));
        }

        let updated = self
            .stores
            .set_status(store_id, StoreStatus::Suspended, None)
            .await?;
        info!(store_id = %store_id, admin_id = %ctx.admin_id, "Store suspended");

        self.audit(
            ctx,
            AdminAction::StoreSuspended,
            TargetType::Store,
            store_id,
            reason_details(reason),
        )
        .await;

        Ok(updated)
    }

    async fn create_plan(&self, plan: NewPlan, ctx: AuditContext) -> AppResult<SubscriptionPlan> {
        let created = self.subscriptions.create_plan(plan).await?;
        self.audit(
            ctx,
            AdminAction::PlanCreated,
            TargetType::Plan,
            created.id,
            Some(json!({ "slug": created.slug })),
        )
        .await;
        Ok(created)
    }

    async fn update_plan(
        &self,
        plan_id: Uuid,
        changes: PlanUpdate,
        ctx: AuditContext,
    ) -> AppResult<SubscriptionPlan> {
        let updated = self.subscriptions.update_plan(plan_id, changes).await?;
        self.audit(
            ctx,
            AdminAction::PlanUpdated,
            TargetType::Plan,
            plan_id,
            Some(json!({ "slug": updated.slug, "isActive": updated.is_active })),
        )
        .await;
        Ok(updated)
    }

    async fn platform_analytics(&self) -> AppResult<PlatformAnalytics> {
        let now = Utc::now();
        let (total_stores, total_sellers, total_orders, revenue, pending_approvals, active) =
            futures::try_join!(
                self.stores.count(),
                self.sellers.count(),
                self.orders.count(),
                self.orders.paid_revenue(None, None),
                self.stores.count_by_status(StoreStatus::Pending),
                self.sellers.count_active_subscriptions(now),
            )?;

        Ok(PlatformAnalytics {
            total_stores,
            total_sellers,
            total_orders,
            revenue,
            pending_approvals,
            active_subscriptions: active,
        })
    }

    async fn logs(&self, page: PageRequest) -> AppResult<(Vec<AdminLog>, u64)> {
        self.logs.list(page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{
        MockAdminLogRepository, MockOrderRepository, MockSellerRepository, MockStoreRepository,
    };
    use crate::service::{fixtures, MockSubscriptionService};
    use mockall::predicate::eq;

    fn ctx() -> AuditContext {
        AuditContext {
            admin_id: Uuid::new_v4(),
            ip_address: Some("203.0.113.7".to_string()),
        }
    }

    fn manager(stores: MockStoreRepository, logs: MockAdminLogRepository) -> AdminManager {
        AdminManager::new(
            Arc::new(stores),
            Arc::new(MockSellerRepository::new()),
            Arc::new(MockOrderRepository::new()),
            Arc::new(logs),
            Arc::new(MockSubscriptionService::new()),
        )
    }

    fn stored_log(entry: NewAdminLog) -> AdminLog {
        AdminLog {
            id: Uuid::new_v4(),
            admin_id: entry.admin_id,
            action: entry.action,
            target_type: entry.target_type,
            target_id: entry.target_id,
            details: entry.details,
            ip_address: entry.ip_address,
            created_at: Utc::now(),
        }
    }

    /// Store repository holding one store whose status follows `set_status`.
    fn stores_with(status: StoreStatus) -> (MockStoreRepository, Store) {
        let store = fixtures::store(Uuid::new_v4(), status);
        let mut stores = MockStoreRepository::new();
        let found = store.clone();
        stores
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        let base = store.clone();
        stores
            .expect_set_status()
            .returning(move |_, status, reviewer| {
                let mut updated = base.clone();
                updated.status = status;
                if status == StoreStatus::Approved {
                    updated.approved_at = Some(Utc::now());
                    updated.approved_by = reviewer;
                }
                Ok(updated)
            });
        (stores, store)
    }

    #[tokio::test]
    async fn approving_pending_store_stamps_reviewer_and_logs_once() {
        let (stores, store) = stores_with(StoreStatus::Pending);
        let ctx = ctx();
        let admin_id = ctx.admin_id;
        let store_id = store.id;

        let mut logs = MockAdminLogRepository::new();
        logs.expect_append()
            .withf(move |entry| {
                entry.action == AdminAction::StoreApproved
                    && entry.target_type == TargetType::Store
                    && entry.target_id == store_id
                    && entry.admin_id == admin_id
                    && entry.ip_address.as_deref() == Some("203.0.113.7")
                    && entry.details == Some(json!({ "reason": "Docs verified" }))
            })
            .times(1)
            .returning(|entry| Ok(stored_log(entry)));

        let approved = manager(stores, logs)
            .review_store(store_id, true, Some("Docs verified".to_string()), ctx)
            .await
            .unwrap();
        assert_eq!(approved.status, StoreStatus::Approved);
        assert!(approved.approved_at.is_some());
        assert_eq!(approved.approved_by, Some(admin_id));
    }

    #[tokio::test]
    async fn rejection_does_not_record_approver() {
        let store = fixtures::store(Uuid::new_v4(), StoreStatus::Pending);
        let store_id = store.id;
        let mut stores = MockStoreRepository::new();
        let found = store.clone();
        stores
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        stores
            .expect_set_status()
            .with(eq(store_id), eq(StoreStatus::Rejected), eq(None::<Uuid>))
            .times(1)
            .returning(move |_, status, _| {
                let mut updated = store.clone();
                updated.status = status;
                Ok(updated)
            });
        let mut logs = MockAdminLogRepository::new();
        logs.expect_append()
            .withf(|entry| entry.action == AdminAction::StoreRejected)
            .times(1)
            .returning(|entry| Ok(stored_log(entry)));

        let rejected = manager(stores, logs)
            .review_store(store_id, false, None, ctx())
            .await
            .unwrap();
        assert_eq!(rejected.status, StoreStatus::Rejected);
        assert!(rejected.approved_by.is_none());
    }

    #[tokio::test]
    async fn audit_failure_keeps_the_approval() {
        let (stores, store) = stores_with(StoreStatus::Suspended);
        let mut logs = MockAdminLogRepository::new();
        logs.expect_append()
            .times(1)
            .returning(|_| Err(AppError::internal("audit table unavailable")));

        let approved = manager(stores, logs)
            .review_store(store.id, true, None, ctx())
            .await
            .unwrap();
        assert_eq!(approved.status, StoreStatus::Approved);
    }

    #[tokio::test]
    async fn rejected_store_cannot_be_approved() {
        let (stores, store) = stores_with(StoreStatus::Rejected);
        let mut logs = MockAdminLogRepository::new();
        logs.expect_append().never();

        let result = manager(stores, logs)
            .review_store(store.id, true, None, ctx())
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn only_approved_stores_can_be_suspended() {
        let (stores, store) = stores_with(StoreStatus::Pending);
        let mut logs = MockAdminLogRepository::new();
        logs.expect_append().never();
        let result = manager(stores, logs)
            .suspend_store(store.id, Some("spam".to_string()), ctx())
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let (stores, store) = stores_with(StoreStatus::Approved);
        let mut logs = MockAdminLogRepository::new();
        logs.expect_append()
            .withf(|entry| entry.action == AdminAction::StoreSuspended)
            .times(1)
            .returning(|entry| Ok(stored_log(entry)));
        let suspended = manager(stores, logs)
            .suspend_store(store.id, Some("spam".to_string()), ctx())
            .await
            .unwrap();
        assert_eq!(suspended.status, StoreStatus::Suspended);
    }

    #[tokio::test]
    async fn platform_figures_are_collected() {
        let mut stores = MockStoreRepository::new();
        stores.expect_count().returning(|| Ok(12));
        stores
            .expect_count_by_status()
            .with(eq(StoreStatus::Pending))
            .returning(|_| Ok(3));
        let mut sellers = MockSellerRepository::new();
        sellers.expect_count().returning(|| Ok(11));
        sellers
            .expect_count_active_subscriptions()
            .returning(|_| Ok(8));
        let mut orders = MockOrderRepository::new();
        orders.expect_count().returning(|| Ok(40));
        orders
            .expect_paid_revenue()
            .with(eq(None::<Uuid>), eq(None::<chrono::DateTime<Utc>>))
            .returning(|_, _| Ok(990_000));

        let figures = AdminManager::new(
            Arc::new(stores),
            Arc::new(sellers),
            Arc::new(orders),
            Arc::new(MockAdminLogRepository::new()),
            Arc::new(MockSubscriptionService::new()),
        )
        .platform_analytics()
        .await
        .unwrap();

        assert_eq!(
            figures,
            PlatformAnalytics {
                total_stores: 12,
                total_sellers: 11,
                total_orders: 40,
                revenue: 990_000,
                pending_approvals: 3,
                active_subscriptions: 8,
            }
        );
    }
}
