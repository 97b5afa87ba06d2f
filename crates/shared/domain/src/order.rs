//! Orders, snapshot line items and price computation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{
    FLAT_SHIPPING_FEE, FREE_SHIPPING_THRESHOLD, MAX_LINE_QUANTITY, TAX_RATE_PERCENT,
};
use crate::store::Address;
use crate::{DomainError, DomainResult};

string_enum! {
    pub enum OrderType {
        Product => "product",
        Service => "service",
    }
}

string_enum! {
    /// Fulfilment state. `delivered` and `cancelled` are terminal.
    pub enum OrderStatus {
        Pending => "pending",
        Confirmed => "confirmed",
        Processing => "processing",
        Shipped => "shipped",
        Delivered => "delivered",
        Cancelled => "cancelled",
    }
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Any non-terminal status may move to any listed status.
    pub fn transition_to(&self, next: OrderStatus) -> DomainResult<OrderStatus> {
        if self.is_terminal() {
            return Err(DomainError::validation(format!(
                "Order is already {} and cannot move to {}",
                self, next
            )));
        }
        Ok(next)
    }
}

string_enum! {
    pub enum PaymentStatus {
        Pending => "pending",
        Paid => "paid",
        Failed => "failed",
        Refunded => "refunded",
    }
}

/// Immutable snapshot of a purchased line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<Uuid>,
    pub quantity: u32,
    /// Unit price at purchase time, minor units
    pub price: i64,
    pub name: String,
}

fn amount_too_large() -> DomainError {
    DomainError::validation("Order amount is too large")
}

impl OrderItem {
    pub fn line_total(&self) -> DomainResult<i64> {
        self.price
            .checked_mul(i64::from(self.quantity))
            .ok_or_else(amount_too_large)
    }
}

/// Computed order amounts, all in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: i64,
    pub tax: i64,
    pub shipping: i64,
    pub total: i64,
}

impl OrderTotals {
    /// Apply the flat tax rate and the free-shipping threshold.
    pub fn from_subtotal(subtotal: i64) -> DomainResult<Self> {
        // round-half-up of subtotal * 18 / 100
        let tax = subtotal
            .checked_mul(TAX_RATE_PERCENT)
            .and_then(|t| t.checked_add(50))
            .ok_or_else(amount_too_large)?
            .div_euclid(100);
        let shipping = if subtotal > FREE_SHIPPING_THRESHOLD {
            0
        } else {
            FLAT_SHIPPING_FEE
        };
        let total = subtotal
            .checked_add(tax)
            .and_then(|t| t.checked_add(shipping))
            .ok_or_else(amount_too_large)?;

        Ok(Self {
            subtotal,
            tax,
            shipping,
            total,
        })
    }

    pub fn for_items(items: &[OrderItem]) -> DomainResult<Self> {
        let subtotal = items.iter().try_fold(0i64, |acc, item| {
            acc.checked_add(item.line_total()?)
                .ok_or_else(amount_too_large)
        })?;
        Self::from_subtotal(subtotal)
    }
}

/// Order entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub customer_id: Uuid,
    pub store_id: Uuid,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub subtotal: i64,
    pub tax: i64,
    pub shipping: i64,
    pub total: i64,
    pub payment_status: PaymentStatus,
    pub shipping_address: Option<Address>,
    pub billing_address: Option<Address>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One requested line before prices are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub product_id: Option<Uuid>,
    pub variant_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
    pub quantity: u32,
}

/// Customer's order request. Prices never come from the client.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub customer_id: Uuid,
    pub store_id: Uuid,
    pub order_type: OrderType,
    pub lines: Vec<OrderLine>,
    pub shipping_address: Option<Address>,
    pub billing_address: Option<Address>,
    pub notes: Option<String>,
}

impl OrderRequest {
    pub fn validate(&self) -> DomainResult<()> {
        if self.lines.is_empty() {
            return Err(DomainError::validation("At least one item is required"));
        }
        for line in &self.lines {
            if line.quantity == 0 {
                return Err(DomainError::validation("Quantity must be positive"));
            }
            if line.quantity > MAX_LINE_QUANTITY {
                return Err(DomainError::validation(format!(
                    "Quantity cannot exceed {}",
                    MAX_LINE_QUANTITY
                )));
            }
            match self.order_type {
                OrderType::Product if line.variant_id.is_none() => {
                    return Err(DomainError::validation(
                        "Product order items require a variantId",
                    ));
                }
                OrderType::Service if line.service_id.is_none() => {
                    return Err(DomainError::validation(
                        "Service order items require a serviceId",
                    ));
                }
                _ => {}
            }
        }
        for address in [&self.shipping_address, &self.billing_address].into_iter().flatten() {
            address.validate()?;
        }
        Ok(())
    }
}

/// Fully priced order ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub order_number: String,
    pub customer_id: Uuid,
    pub store_id: Uuid,
    pub order_type: OrderType,
    pub items: Vec<OrderItem>,
    pub totals: OrderTotals,
    pub shipping_address: Option<Address>,
    pub billing_address: Option<Address>,
    pub notes: Option<String>,
}

impl NewOrder {
    /// Price the resolved items and attach a fresh order number.
    pub fn priced(
        request: OrderRequest,
        items: Vec<OrderItem>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let totals = OrderTotals::for_items(&items)?;
        Ok(Self {
            order_number: crate::numbering::order_number(now),
            customer_id: request.customer_id,
            store_id: request.store_id,
            order_type: request.order_type,
            items,
            totals,
            shipping_address: request.shipping_address,
            billing_address: request.billing_address,
            notes: request.notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: i64, quantity: u32) -> OrderItem {
        OrderItem {
            product_id: Some(Uuid::new_v4()),
            variant_id: Some(Uuid::new_v4()),
            service_id: None,
            quantity,
            price,
            name: "Chai - 250g".to_string(),
        }
    }

    #[test]
    fn three_units_at_one_hundred_rupees() {
        let totals = OrderTotals::for_items(&[item(10_000, 3)]).unwrap();
        assert_eq!(
            totals,
            OrderTotals { subtotal: 30_000, tax: 5_400, shipping: 5_000, total: 40_400 }
        );
    }

    #[test]
    fn shipping_is_free_strictly_above_threshold() {
        assert_eq!(OrderTotals::from_subtotal(50_000).unwrap().shipping, 5_000);
        assert_eq!(OrderTotals::from_subtotal(50_001).unwrap().shipping, 0);
    }

    #[test]
    fn tax_rounds_half_up() {
        // 25 * 0.18 = 4.5
        assert_eq!(OrderTotals::from_subtotal(25).unwrap().tax, 5);
        // 24 * 0.18 = 4.32
        assert_eq!(OrderTotals::from_subtotal(24).unwrap().tax, 4);
    }

    #[test]
    fn total_is_sum_of_parts() {
        for subtotal in [0, 1, 999, 49_999, 50_000, 50_001, 1_234_567] {
            let t = OrderTotals::from_subtotal(subtotal).unwrap();
            assert_eq!(t.total, t.subtotal + t.tax + t.shipping);
        }
    }

    #[test]
    fn overflowing_amounts_are_rejected() {
        assert!(item(i64::MAX / 2, 3).line_total().is_err());
        let half = item(i64::MAX / 2, 1);
        assert!(OrderTotals::for_items(&[half.clone(), half.clone(), half]).is_err());
        assert!(OrderTotals::from_subtotal(i64::MAX / 10).is_err());
    }

    #[test]
    fn terminal_statuses_are_final() {
        assert!(OrderStatus::Delivered.transition_to(OrderStatus::Pending).is_err());
        assert!(OrderStatus::Cancelled.transition_to(OrderStatus::Confirmed).is_err());
        assert_eq!(
            OrderStatus::Pending.transition_to(OrderStatus::Cancelled).unwrap(),
            OrderStatus::Cancelled
        );
        assert_eq!(
            OrderStatus::Shipped.transition_to(OrderStatus::Confirmed).unwrap(),
            OrderStatus::Confirmed
        );
    }

    #[test]
    fn request_lines_must_match_order_type() {
        let request = OrderRequest {
            customer_id: Uuid::new_v4(),
            store_id: Uuid::new_v4(),
            order_type: OrderType::Product,
            lines: vec![OrderLine {
                product_id: None,
                variant_id: None,
                service_id: Some(Uuid::new_v4()),
                quantity: 1,
            }],
            shipping_address: None,
            billing_address: None,
            notes: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn line_quantity_is_bounded() {
        let line = |quantity| OrderLine {
            product_id: None,
            variant_id: Some(Uuid::new_v4()),
            service_id: None,
            quantity,
        };
        let mut request = OrderRequest {
            customer_id: Uuid::new_v4(),
            store_id: Uuid::new_v4(),
            order_type: OrderType::Product,
            lines: vec![line(MAX_LINE_QUANTITY)],
            shipping_address: None,
            billing_address: None,
            notes: None,
        };
        assert!(request.validate().is_ok());
        request.lines = vec![line(MAX_LINE_QUANTITY + 1)];
        assert!(request.validate().is_err());
    }
}
