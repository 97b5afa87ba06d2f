//! Audit log and platform reporting.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

string_enum! {
    /// Audited admin actions
    pub enum AdminAction {
        StoreApproved => "store_approved",
        StoreRejected => "store_rejected",
        StoreSuspended => "store_suspended",
        PlanCreated => "plan_created",
        PlanUpdated => "plan_updated",
    }
}

string_enum! {
    /// Kind of entity an audit record points at
    pub enum TargetType {
        Store => "store",
        Plan => "plan",
    }
}

/// Append-only audit record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AdminLog {
    pub id: Uuid,
    pub admin_id: Uuid,
    pub action: AdminAction,
    pub target_type: TargetType,
    pub target_id: Uuid,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub details: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAdminLog {
    pub admin_id: Uuid,
    pub action: AdminAction,
    pub target_type: TargetType,
    pub target_id: Uuid,
    pub details: Option<serde_json::Value>,
    pub ip_address: Option<String>,
}

string_enum! {
    /// Reporting window for seller analytics
    pub enum AnalyticsPeriod {
        Week => "7d",
        Month => "30d",
        Year => "1y",
    }
}

impl Default for AnalyticsPeriod {
    fn default() -> Self {
        AnalyticsPeriod::Month
    }
}

impl AnalyticsPeriod {
    /// Start of the window ending at `now`.
    pub fn since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let days = match self {
            AnalyticsPeriod::Week => 7,
            AnalyticsPeriod::Month => 30,
            AnalyticsPeriod::Year => 365,
        };
        now - Duration::days(days)
    }
}

/// Seller dashboard figures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SellerAnalytics {
    pub period: AnalyticsPeriod,
    pub orders: u64,
    /// Sum of paid order totals, minor units
    pub revenue: i64,
    pub products: u64,
    pub services: u64,
}

/// Platform-wide figures for the admin dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct PlatformAnalytics {
    pub total_stores: u64,
    pub total_sellers: u64,
    pub total_orders: u64,
    pub revenue: i64,
    pub pending_approvals: u64,
    pub active_subscriptions: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_windows() {
        let now = Utc::now();
        assert_eq!(now - AnalyticsPeriod::Week.since(now), Duration::days(7));
        assert_eq!(now - AnalyticsPeriod::Year.since(now), Duration::days(365));
        assert_eq!("30d".parse::<AnalyticsPeriod>().unwrap(), AnalyticsPeriod::Month);
    }

    #[test]
    fn action_strings() {
        assert_eq!(AdminAction::StoreApproved.as_str(), "store_approved");
        assert_eq!(AdminAction::StoreRejected.to_string(), "store_rejected");
    }
}
