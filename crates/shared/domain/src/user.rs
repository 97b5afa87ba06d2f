//! User profile entity and roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

string_enum! {
    /// Platform roles carried in the access token
    pub enum UserRole {
        Customer => "customer",
        Seller => "seller",
        Admin => "admin",
    }
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Whether a user may choose this role for themselves at registration
    pub fn is_self_service(&self) -> bool {
        !self.is_admin()
    }
}

/// User profile entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft delete timestamp (None = active, Some = deleted)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Check if user has admin role
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Check if user is active (not deleted)
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// Data needed to register a user profile
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub phone: Option<String>,
}

impl NewUser {
    /// Check registration rules that the request schema cannot express.
    pub fn validate(&self) -> crate::DomainResult<()> {
        if !self.role.is_self_service() {
            return Err(crate::DomainError::validation(
                "Role must be 'customer' or 'seller'",
            ));
        }
        if self.name.trim().is_empty() {
            return Err(crate::DomainError::validation("Name is required"));
        }
        if let Some(phone) = &self.phone {
            crate::validation::validate_phone(phone)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(role: UserRole, phone: Option<&str>) -> NewUser {
        NewUser {
            email: "a@x.com".to_string(),
            name: "Asha".to_string(),
            role,
            phone: phone.map(str::to_string),
        }
    }

    #[test]
    fn admin_cannot_self_register() {
        assert!(new_user(UserRole::Admin, None).validate().is_err());
        assert!(new_user(UserRole::Seller, None).validate().is_ok());
    }

    #[test]
    fn phone_is_checked_when_present() {
        assert!(new_user(UserRole::Customer, Some("9876543210")).validate().is_ok());
        assert!(new_user(UserRole::Customer, Some("1234567890")).validate().is_err());
    }

    #[test]
    fn role_parses_from_storage_string() {
        assert_eq!("seller".parse::<UserRole>().unwrap(), UserRole::Seller);
        assert!("user".parse::<UserRole>().is_err());
        assert_eq!(UserRole::Admin.to_string(), "admin");
    }
}
