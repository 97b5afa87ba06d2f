//! Field format rules shared by request handlers and domain constructors.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{DomainError, DomainResult};

static PINCODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[1-9][0-9]{5}$").expect("valid regex"));
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[6-9]\d{9}$").expect("valid regex"));

/// Six digit postal code, no leading zero.
pub fn validate_pincode(pincode: &str) -> DomainResult<()> {
    if PINCODE_RE.is_match(pincode) {
        Ok(())
    } else {
        Err(DomainError::validation("Invalid pincode"))
    }
}

/// Ten digit mobile number starting with 6-9.
pub fn validate_phone(phone: &str) -> DomainResult<()> {
    if PHONE_RE.is_match(phone) {
        Ok(())
    } else {
        Err(DomainError::validation("Invalid phone number"))
    }
}

/// Reject blank strings for required text fields.
pub fn require_text(value: &str, field: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        Err(DomainError::validation(format!("{} is required", field)))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pincode_rules() {
        assert!(validate_pincode("560001").is_ok());
        assert!(validate_pincode("060001").is_err());
        assert!(validate_pincode("56001").is_err());
        assert!(validate_pincode("56000a").is_err());
    }

    #[test]
    fn phone_rules() {
        assert!(validate_phone("6123456789").is_ok());
        assert!(validate_phone("5123456789").is_err());
        assert!(validate_phone("612345678").is_err());
    }

    #[test]
    fn blank_text_is_rejected() {
        assert!(require_text("  ", "Category").is_err());
        assert!(require_text("Grocery", "Category").is_ok());
    }
}
