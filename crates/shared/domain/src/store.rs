//! Storefronts and their postal addresses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{require_text, validate_pincode};
use crate::{DomainError, DomainResult};

string_enum! {
    /// Store review lifecycle
    pub enum StoreStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
        Suspended => "suspended",
    }
}

impl StoreStatus {
    /// Whether an admin may approve a store in this state.
    ///
    /// Suspended stores can be reinstated through approval.
    pub fn can_approve(&self) -> bool {
        matches!(self, StoreStatus::Pending | StoreStatus::Suspended)
    }

    /// Whether an admin may reject a store in this state.
    pub fn can_reject(&self) -> bool {
        matches!(self, StoreStatus::Pending)
    }

    /// Whether an admin may suspend a store in this state.
    pub fn can_suspend(&self) -> bool {
        matches!(self, StoreStatus::Approved)
    }
}

/// Postal address used for stores, shipping and bookings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Address {
    pub area: String,
    pub pincode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ward: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,
}

impl Address {
    pub fn validate(&self) -> DomainResult<()> {
        require_text(&self.area, "Area")?;
        validate_pincode(&self.pincode)
    }
}

/// Store entity, owned by exactly one seller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub address: Address,
    pub contact_phone: String,
    pub contact_email: String,
    pub logo: Option<String>,
    pub cover_image: Option<String>,
    pub status: StoreStatus,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<Uuid>,
}

impl Store {
    pub fn is_approved(&self) -> bool {
        self.status == StoreStatus::Approved
    }
}

/// Store creation data; the owning seller is supplied alongside.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStore {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub address: Address,
    pub contact_phone: String,
    pub contact_email: String,
    pub logo: Option<String>,
    pub cover_image: Option<String>,
}

impl NewStore {
    pub fn validate(&self) -> DomainResult<()> {
        require_text(&self.name, "Store name")?;
        require_text(&self.category, "Category")?;
        require_text(&self.contact_email, "Contact email")?;
        crate::validation::validate_phone(&self.contact_phone)?;
        self.address.validate()
    }
}

/// Partial store update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub address: Option<Address>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub logo: Option<String>,
    pub cover_image: Option<String>,
}

impl StoreUpdate {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            require_text(name, "Store name")?;
        }
        if let Some(category) = &self.category {
            require_text(category, "Category")?;
        }
        if let Some(phone) = &self.contact_phone {
            crate::validation::validate_phone(phone)?;
        }
        if let Some(address) = &self.address {
            address.validate()?;
        }
        Ok(())
    }
}

/// Outcome of an admin review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl ReviewDecision {
    pub fn from_approved(approved: bool) -> Self {
        if approved {
            ReviewDecision::Approve
        } else {
            ReviewDecision::Reject
        }
    }

    /// Status a store lands in after this decision, if allowed from `current`.
    pub fn target_status(&self, current: StoreStatus) -> DomainResult<StoreStatus> {
        match self {
            ReviewDecision::Approve if current.can_approve() => Ok(StoreStatus::Approved),
            ReviewDecision::Reject if current.can_reject() => Ok(StoreStatus::Rejected),
            _ => Err(DomainError::validation(format!(
                "Store in status '{}' cannot be {}",
                current,
                match self {
                    ReviewDecision::Approve => "approved",
                    ReviewDecision::Reject => "rejected",
                }
            ))),
        }
    }
}

/// Store search criteria. Area, ward and landmark match case-insensitively by substring.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreFilter {
    pub status: Option<StoreStatus>,
    pub category: Option<String>,
    pub pincode: Option<String>,
    pub area: Option<String>,
    pub ward: Option<String>,
    pub landmark: Option<String>,
}
