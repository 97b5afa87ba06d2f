//! Subscription plans and catalog quota checks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::UNLIMITED;
use crate::validation::require_text;
use crate::{DomainError, DomainResult};

/// Subscription plan definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPlan {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    /// Price per period in minor units
    pub price: i64,
    /// -1 = unlimited
    pub max_products: i32,
    /// -1 = unlimited
    pub max_services: i32,
    pub features: Vec<String>,
    /// Platform commission in percent
    pub commission_rate: f64,
    pub is_featured: bool,
    pub analytics_access: bool,
    /// Sort order, lowest first
    pub priority: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Plan creation data
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlan {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: i64,
    pub max_products: i32,
    pub max_services: i32,
    pub features: Vec<String>,
    pub commission_rate: f64,
    pub is_featured: bool,
    pub analytics_access: bool,
    pub priority: i32,
}

fn validate_quota(value: i32, field: &str) -> DomainResult<()> {
    if value < UNLIMITED {
        return Err(DomainError::validation(format!(
            "{} must be -1 (unlimited) or a non-negative count",
            field
        )));
    }
    Ok(())
}

fn validate_commission(rate: f64) -> DomainResult<()> {
    if !(0.0..=100.0).contains(&rate) {
        return Err(DomainError::validation("Commission rate must be between 0 and 100"));
    }
    Ok(())
}

impl NewPlan {
    pub fn validate(&self) -> DomainResult<()> {
        require_text(&self.name, "Plan name")?;
        require_text(&self.slug, "Plan slug")?;
        if self.price < 0 {
            return Err(DomainError::validation("Plan price cannot be negative"));
        }
        validate_quota(self.max_products, "maxProducts")?;
        validate_quota(self.max_services, "maxServices")?;
        validate_commission(self.commission_rate)
    }
}

/// Partial plan update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub max_products: Option<i32>,
    pub max_services: Option<i32>,
    pub features: Option<Vec<String>>,
    pub commission_rate: Option<f64>,
    pub is_featured: Option<bool>,
    pub analytics_access: Option<bool>,
    pub priority: Option<i32>,
    pub is_active: Option<bool>,
}

impl PlanUpdate {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            require_text(name, "Plan name")?;
        }
        if matches!(self.price, Some(p) if p < 0) {
            return Err(DomainError::validation("Plan price cannot be negative"));
        }
        if let Some(max) = self.max_products {
            validate_quota(max, "maxProducts")?;
        }
        if let Some(max) = self.max_services {
            validate_quota(max, "maxServices")?;
        }
        if let Some(rate) = self.commission_rate {
            validate_commission(rate)?;
        }
        Ok(())
    }
}

/// Result of a quota check against the seller's plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LimitCheck {
    pub allowed: bool,
    pub max: i32,
    pub current: u64,
}

impl LimitCheck {
    /// Compare the current item count with a plan ceiling.
    pub fn evaluate(max: i32, current: u64) -> Self {
        Self {
            allowed: admits(max, current),
            max,
            current,
        }
    }
}

/// `max == -1` admits everything; otherwise there must be room for one more.
pub fn admits(max: i32, current: u64) -> bool {
    max == UNLIMITED || (max >= 0 && current < max as u64)
}

/// Which catalog quota is being consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaKind {
    Products,
    Services,
}

impl QuotaKind {
    pub fn max_for(&self, plan: &SubscriptionPlan) -> i32 {
        match self {
            QuotaKind::Products => plan.max_products,
            QuotaKind::Services => plan.max_services,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuotaKind::Products => "product",
            QuotaKind::Services => "service",
        }
    }
}

/// Plan ceiling handed to the catalog so the insert can re-check it under lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitGuard {
    pub seller_id: Uuid,
    pub max: i32,
}

impl LimitGuard {
    pub fn admits(&self, current: u64) -> bool {
        admits(self.max, current)
    }

    pub fn exceeded(&self, kind: QuotaKind) -> DomainError {
        DomainError::subscription(format!(
            "{} limit reached ({}). Upgrade your plan to add more.",
            match kind {
                QuotaKind::Products => "Product",
                QuotaKind::Services => "Service",
            },
            self.max
        ))
    }
}

/// Both quotas for a seller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CatalogLimits {
    pub products: LimitCheck,
    pub services: LimitCheck,
}

/// Plan catalogue installed on a fresh database.
pub fn default_plans() -> Vec<NewPlan> {
    vec![
        NewPlan {
            name: "Basic".to_string(),
            slug: "basic".to_string(),
            description: Some("Perfect for getting started".to_string()),
            price: 0,
            max_products: 10,
            max_services: 5,
            features: vec![
                "Up to 10 products".to_string(),
                "Up to 5 services".to_string(),
                "Basic store page".to_string(),
                "Email support".to_string(),
            ],
            commission_rate: 15.0,
            is_featured: false,
            analytics_access: false,
            priority: 1,
        },
        NewPlan {
            name: "Standard".to_string(),
            slug: "standard".to_string(),
            description: Some("For growing businesses".to_string()),
            price: 99_900,
            max_products: 100,
            max_services: 50,
            features: vec![
                "Up to 100 products".to_string(),
                "Up to 50 services".to_string(),
                "Featured listing".to_string(),
                "Analytics dashboard".to_string(),
                "Priority support".to_string(),
            ],
            commission_rate: 12.0,
            is_featured: true,
            analytics_access: true,
            priority: 2,
        },
        NewPlan {
            name: "Premium".to_string(),
            slug: "premium".to_string(),
            description: Some("For established businesses".to_string()),
            price: 249_900,
            max_products: UNLIMITED,
            max_services: UNLIMITED,
            features: vec![
                "Unlimited products".to_string(),
                "Unlimited services".to_string(),
                "Featured listing".to_string(),
                "Advanced analytics".to_string(),
                "Dedicated support".to_string(),
            ],
            commission_rate: 10.0,
            is_featured: true,
            analytics_access: true,
            priority: 3,
        },
    ]
}
