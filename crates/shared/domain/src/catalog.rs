//! Products, their variants, and bookable services.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{MAX_TITLE_LENGTH, MAX_UNIT_PRICE, UNLIMITED};
use crate::validation::require_text;
use crate::{DomainError, DomainResult};

string_enum! {
    /// Publication state shared by products and services
    pub enum ItemStatus {
        Draft => "draft",
        Active => "active",
        Inactive => "inactive",
        Archived => "archived",
    }
}

string_enum! {
    /// Where a service is delivered
    pub enum LocationType {
        AtStore => "at_store",
        AtCustomer => "at_customer",
        Remote => "remote",
    }
}

fn validate_title(title: &str) -> DomainResult<()> {
    require_text(title, "Title")?;
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(DomainError::validation(format!(
            "Title must be at most {} characters",
            MAX_TITLE_LENGTH
        )));
    }
    Ok(())
}

fn validate_price(price: i64, field: &str) -> DomainResult<()> {
    if price <= 0 {
        return Err(DomainError::validation(format!("{} must be positive", field)));
    }
    if price > MAX_UNIT_PRICE {
        return Err(DomainError::validation(format!(
            "{} cannot exceed {}",
            field, MAX_UNIT_PRICE
        )));
    }
    Ok(())
}

fn validate_stock(stock: i32) -> DomainResult<()> {
    if stock < UNLIMITED {
        return Err(DomainError::validation(
            "Stock must be -1 (unlimited) or a non-negative quantity",
        ));
    }
    Ok(())
}

/// Status edits go through delete for archiving.
fn validate_editable_status(status: Option<ItemStatus>) -> DomainResult<()> {
    if status == Some(ItemStatus::Archived) {
        return Err(DomainError::validation("Use delete to archive an item"));
    }
    Ok(())
}

// =============================================================================
// Products
// =============================================================================

/// Purchasable variant of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: Uuid,
    pub product_id: Uuid,
    pub sku: String,
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    /// Minor units
    pub price: i64,
    pub compare_at_price: Option<i64>,
    /// -1 = unlimited
    pub stock: i32,
    pub is_available: bool,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductVariant {
    pub fn has_unlimited_stock(&self) -> bool {
        self.stock == UNLIMITED
    }

    /// Check the variant can be sold in the requested quantity.
    pub fn check_fulfilment(&self, quantity: u64) -> DomainResult<()> {
        if !self.is_available {
            return Err(DomainError::validation(format!(
                "Variant {} is not available",
                self.sku
            )));
        }
        if !self.has_unlimited_stock() && quantity > u64::try_from(self.stock).unwrap_or(0) {
            return Err(DomainError::validation(format!(
                "Insufficient stock for {}: requested {}, available {}",
                self.sku, quantity, self.stock
            )));
        }
        Ok(())
    }
}

/// Product entity with its variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub store_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub images: Vec<String>,
    pub status: ItemStatus,
    pub is_draft: bool,
    pub variants: Vec<ProductVariant>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Variant creation data
#[derive(Debug, Clone, PartialEq)]
pub struct NewVariant {
    pub sku: String,
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    pub price: i64,
    pub compare_at_price: Option<i64>,
    pub stock: i32,
    pub is_available: bool,
    pub images: Vec<String>,
}

impl NewVariant {
    pub fn validate(&self) -> DomainResult<()> {
        require_text(&self.sku, "SKU")?;
        require_text(&self.name, "Variant name")?;
        validate_price(self.price, "Price")?;
        if let Some(compare) = self.compare_at_price {
            validate_price(compare, "Compare-at price")?;
        }
        validate_stock(self.stock)
    }
}

/// Product creation data. Products are created as drafts.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub store_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub images: Vec<String>,
    pub variants: Vec<NewVariant>,
}

impl NewProduct {
    pub fn validate(&self) -> DomainResult<()> {
        validate_title(&self.title)?;
        require_text(&self.category, "Category")?;
        if self.images.is_empty() {
            return Err(DomainError::validation("At least one image is required"));
        }
        if self.variants.is_empty() {
            return Err(DomainError::validation("At least one variant is required"));
        }

        let mut seen = HashSet::new();
        for variant in &self.variants {
            variant.validate()?;
            if !seen.insert(variant.sku.as_str()) {
                return Err(DomainError::validation(format!(
                    "Duplicate SKU '{}'",
                    variant.sku
                )));
            }
        }
        Ok(())
    }

    pub fn skus(&self) -> Vec<String> {
        self.variants.iter().map(|v| v.sku.clone()).collect()
    }
}

/// Partial product update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub images: Option<Vec<String>>,
    pub status: Option<ItemStatus>,
    pub is_draft: Option<bool>,
}

impl ProductUpdate {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(category) = &self.category {
            require_text(category, "Category")?;
        }
        if matches!(&self.images, Some(images) if images.is_empty()) {
            return Err(DomainError::validation("At least one image is required"));
        }
        validate_editable_status(self.status)
    }
}

/// Partial variant update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariantUpdate {
    pub name: Option<String>,
    pub attributes: Option<BTreeMap<String, String>>,
    pub price: Option<i64>,
    pub compare_at_price: Option<i64>,
    pub stock: Option<i32>,
    pub is_available: Option<bool>,
    pub images: Option<Vec<String>>,
}

impl VariantUpdate {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            require_text(name, "Variant name")?;
        }
        if let Some(price) = self.price {
            validate_price(price, "Price")?;
        }
        if let Some(compare) = self.compare_at_price {
            validate_price(compare, "Compare-at price")?;
        }
        if let Some(stock) = self.stock {
            validate_stock(stock)?;
        }
        Ok(())
    }
}

// =============================================================================
// Services
// =============================================================================

/// Alternative price point for a service (e.g. a longer session).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PriceVariant {
    pub name: String,
    pub price: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i32>,
}

/// Bookable service entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: Uuid,
    pub store_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub images: Vec<String>,
    /// Minutes
    pub duration: i32,
    pub base_price: i64,
    pub price_variants: Vec<PriceVariant>,
    /// Opaque schedule blob supplied by the seller
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub availability: Option<serde_json::Value>,
    pub location_type: LocationType,
    pub status: ItemStatus,
    pub is_draft: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Service {
    pub fn is_bookable(&self) -> bool {
        self.status == ItemStatus::Active
    }
}

fn validate_service_fields(
    duration: Option<i32>,
    base_price: Option<i64>,
    price_variants: Option<&[PriceVariant]>,
) -> DomainResult<()> {
    if matches!(duration, Some(d) if d <= 0) {
        return Err(DomainError::validation("Duration must be positive"));
    }
    if let Some(price) = base_price {
        validate_price(price, "Base price")?;
    }
    for variant in price_variants.unwrap_or_default() {
        require_text(&variant.name, "Price variant name")?;
        validate_price(variant.price, "Price variant price")?;
        if matches!(variant.duration, Some(d) if d <= 0) {
            return Err(DomainError::validation("Duration must be positive"));
        }
    }
    Ok(())
}

/// Service creation data. Services are created as drafts.
#[derive(Debug, Clone, PartialEq)]
pub struct NewService {
    pub store_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub images: Vec<String>,
    pub duration: i32,
    pub base_price: i64,
    pub price_variants: Vec<PriceVariant>,
    pub availability: Option<serde_json::Value>,
    pub location_type: LocationType,
}

impl NewService {
    pub fn validate(&self) -> DomainResult<()> {
        validate_title(&self.title)?;
        require_text(&self.category, "Category")?;
        validate_service_fields(
            Some(self.duration),
            Some(self.base_price),
            Some(&self.price_variants),
        )
    }
}

/// Partial service update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub images: Option<Vec<String>>,
    pub duration: Option<i32>,
    pub base_price: Option<i64>,
    pub price_variants: Option<Vec<PriceVariant>>,
    pub availability: Option<serde_json::Value>,
    pub location_type: Option<LocationType>,
    pub status: Option<ItemStatus>,
    pub is_draft: Option<bool>,
}

impl ServiceUpdate {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(category) = &self.category {
            require_text(category, "Category")?;
        }
        validate_service_fields(self.duration, self.base_price, self.price_variants.as_deref())?;
        validate_editable_status(self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(sku: &str, price: i64, stock: i32) -> NewVariant {
        NewVariant {
            sku: sku.to_string(),
            name: "Default".to_string(),
            attributes: BTreeMap::new(),
            price,
            compare_at_price: None,
            stock,
            is_available: true,
            images: vec![],
        }
    }

    fn product(variants: Vec<NewVariant>) -> NewProduct {
        NewProduct {
            store_id: Uuid::new_v4(),
            title: "Masala Chai".to_string(),
            description: None,
            category: "Beverages".to_string(),
            images: vec!["https://cdn.example.com/chai.png".to_string()],
            variants,
        }
    }

    fn stored_variant(stock: i32, is_available: bool) -> ProductVariant {
        let now = Utc::now();
        ProductVariant {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            sku: "CHAI-250".to_string(),
            name: "250g".to_string(),
            attributes: BTreeMap::new(),
            price: 10_000,
            compare_at_price: None,
            stock,
            is_available,
            images: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn product_requires_variant_and_image() {
        assert!(product(vec![variant("A", 100, 1)]).validate().is_ok());
        assert!(product(vec![]).validate().is_err());

        let mut no_images = product(vec![variant("A", 100, 1)]);
        no_images.images.clear();
        assert!(no_images.validate().is_err());
    }

    #[test]
    fn variant_rules() {
        assert!(product(vec![variant("A", 0, 1)]).validate().is_err());
        assert!(product(vec![variant("A", 100, -2)]).validate().is_err());
        assert!(product(vec![variant("A", 100, -1)]).validate().is_ok());
        assert!(product(vec![variant("", 100, 1)]).validate().is_err());
        assert!(product(vec![variant("A", MAX_UNIT_PRICE, 1)]).validate().is_ok());
        assert!(product(vec![variant("A", MAX_UNIT_PRICE + 1, 1)]).validate().is_err());
    }

    #[test]
    fn duplicate_skus_rejected() {
        let err = product(vec![variant("A", 100, 1), variant("A", 200, 1)])
            .validate()
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("Duplicate SKU")));
    }

    #[test]
    fn title_length_bound() {
        let mut p = product(vec![variant("A", 100, 1)]);
        p.title = "x".repeat(MAX_TITLE_LENGTH);
        assert!(p.validate().is_ok());
        p.title.push('x');
        assert!(p.validate().is_err());
    }

    #[test]
    fn fulfilment_checks_stock_and_availability() {
        assert!(stored_variant(3, true).check_fulfilment(3).is_ok());
        assert!(stored_variant(3, true).check_fulfilment(4).is_err());
        assert!(stored_variant(UNLIMITED, true).check_fulfilment(10_000).is_ok());
        assert!(stored_variant(UNLIMITED, false).check_fulfilment(1).is_err());
    }

    #[test]
    fn updates_cannot_archive_or_break_invariants() {
        let archive = ProductUpdate {
            status: Some(ItemStatus::Archived),
            ..Default::default()
        };
        assert!(archive.validate().is_err());

        let stock = VariantUpdate {
            stock: Some(-5),
            ..Default::default()
        };
        assert!(stock.validate().is_err());

        let service = ServiceUpdate {
            duration: Some(0),
            ..Default::default()
        };
        assert!(service.validate().is_err());
    }
}
