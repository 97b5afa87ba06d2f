//! Seller accounts and their subscription state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Store;
use crate::validation::require_text;
use crate::{DomainError, DomainResult};

string_enum! {
    pub enum BusinessType {
        Shop => "shop",
        Service => "service",
    }
}

string_enum! {
    pub enum VerificationStatus {
        Pending => "pending",
        Verified => "verified",
        Rejected => "rejected",
    }
}

string_enum! {
    pub enum SubscriptionStatus {
        Active => "active",
        Expired => "expired",
        Cancelled => "cancelled",
    }
}

string_enum! {
    /// Kind of verification document a seller submits
    pub enum DocumentType {
        RegistrationCertificate => "registration_certificate",
        License => "license",
        Other => "other",
    }
}

/// A subscription counts as active only with status `active` and an expiry
/// that is either unset or still in the future.
pub fn is_subscription_active(
    status: SubscriptionStatus,
    expires_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    status == SubscriptionStatus::Active && expires_at.map_or(true, |expiry| expiry > now)
}

/// Seller entity (at most one per user).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Seller {
    pub id: Uuid,
    pub user_id: Uuid,
    pub owner_name: String,
    pub business_type: BusinessType,
    pub verification_status: VerificationStatus,
    pub subscription_plan_id: Option<Uuid>,
    pub subscription_status: SubscriptionStatus,
    pub subscription_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Seller {
    pub fn has_active_subscription(&self, now: DateTime<Utc>) -> bool {
        is_subscription_active(self.subscription_status, self.subscription_expires_at, now)
    }
}

/// Metadata of an uploaded verification document. The file itself lives in
/// external storage; only its URL is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SellerDocument {
    pub id: Uuid,
    pub seller_id: Uuid,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub file_url: String,
    pub file_name: String,
    /// Bytes
    pub file_size: i64,
    pub mime_type: String,
    pub uploaded_at: DateTime<Utc>,
    pub verified_at: Option<DateTime<Utc>>,
    pub verified_by: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub doc_type: DocumentType,
    pub file_url: String,
    pub file_name: String,
    pub file_size: i64,
    pub mime_type: String,
}

impl NewDocument {
    pub fn validate(&self) -> DomainResult<()> {
        if !(self.file_url.starts_with("https://") || self.file_url.starts_with("http://")) {
            return Err(DomainError::validation("Document fileUrl must be an http(s) URL"));
        }
        require_text(&self.file_name, "Document fileName")?;
        require_text(&self.mime_type, "Document mimeType")?;
        if self.file_size <= 0 {
            return Err(DomainError::validation("Document fileSize must be positive"));
        }
        Ok(())
    }
}

/// Seller creation data. New sellers start unverified without a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSeller {
    pub user_id: Uuid,
    pub owner_name: String,
    pub business_type: BusinessType,
    /// At least one is required
    pub documents: Vec<NewDocument>,
}

impl NewSeller {
    pub fn validate(&self) -> DomainResult<()> {
        require_text(&self.owner_name, "Owner name")?;
        if self.documents.is_empty() {
            return Err(DomainError::validation("At least one document is required"));
        }
        self.documents.iter().try_for_each(NewDocument::validate)
    }
}

/// Admin listing filters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SellerFilter {
    pub verification_status: Option<VerificationStatus>,
    pub subscription_status: Option<SubscriptionStatus>,
    pub business_type: Option<BusinessType>,
}

/// Seller together with the store it owns, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SellerProfile {
    pub seller: Seller,
    pub store: Option<Store>,
}

/// Everything an admin needs to judge a seller's verification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SellerReview {
    pub seller: Seller,
    pub store: Option<Store>,
    pub documents: Vec<SellerDocument>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn active_requires_status_and_future_expiry() {
        let now = Utc::now();
        assert!(is_subscription_active(SubscriptionStatus::Active, None, now));
        assert!(is_subscription_active(
            SubscriptionStatus::Active,
            Some(now + Duration::days(1)),
            now
        ));
        assert!(!is_subscription_active(
            SubscriptionStatus::Active,
            Some(now - Duration::seconds(1)),
            now
        ));
        assert!(!is_subscription_active(SubscriptionStatus::Expired, None, now));
        assert!(!is_subscription_active(
            SubscriptionStatus::Cancelled,
            Some(now + Duration::days(1)),
            now
        ));
    }

    fn document() -> NewDocument {
        NewDocument {
            doc_type: DocumentType::License,
            file_url: "https://files.example.com/license.pdf".to_string(),
            file_name: "license.pdf".to_string(),
            file_size: 48_213,
            mime_type: "application/pdf".to_string(),
        }
    }

    #[test]
    fn onboarding_needs_a_valid_document() {
        let mut seller = NewSeller {
            user_id: Uuid::new_v4(),
            owner_name: "Ravi".to_string(),
            business_type: BusinessType::Shop,
            documents: vec![],
        };
        assert!(seller.validate().is_err());

        seller.documents.push(document());
        assert!(seller.validate().is_ok());

        seller.documents[0].file_size = 0;
        assert!(seller.validate().is_err());

        seller.documents[0] = NewDocument {
            file_url: "ftp://files.example.com/license.pdf".to_string(),
            ..document()
        };
        assert!(seller.validate().is_err());
    }

    #[test]
    fn expiry_equal_to_now_is_not_active() {
        let now = Utc::now();
        assert!(!is_subscription_active(SubscriptionStatus::Active, Some(now), now));
    }
}
