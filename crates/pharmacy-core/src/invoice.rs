//! # Invoice Module
//!
//! Turns a priced cart into the documents that leave the sell screen: the
//! create-sale request body, the committed [`SaleRecord`], and the totals
//! block printed on the invoice.
//!
//! ## Invoice Totals
//! ```text
//! subtotal            Σ mrp × qty
//!  - discount         overall % or Σ per-line %, clamped to [0, subtotal]
//!  = taxable amount
//!  + GST              taxable amount × GST %
//!  = total
//! ```
//! GST is always applied after the discount.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::{price_cart, DiscountMode};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CartLine, CustomerInfo, Percentage, SaleLineItem, SaleRecord};

/// Prefix of every invoice id.
pub const INVOICE_PREFIX: &str = "INV-";

// =============================================================================
// Totals
// =============================================================================

/// The totals block of a printed invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceTotals {
    #[ts(type = "number")]
    pub subtotal: Money,

    #[ts(type = "number")]
    pub discount_amount: Money,

    /// subtotal - discount.
    #[ts(type = "number")]
    pub taxable_amount: Money,

    #[ts(type = "number")]
    pub gst_rate: Percentage,

    #[ts(type = "number")]
    pub gst_amount: Money,

    /// taxable amount + GST.
    #[ts(type = "number")]
    pub total: Money,
}

impl InvoiceTotals {
    /// Prices the cart and layers GST on the discounted amount.
    ///
    /// ## Example
    /// ```rust
    /// use pharmacy_core::cart::DiscountMode;
    /// use pharmacy_core::invoice::InvoiceTotals;
    /// use pharmacy_core::money::Money;
    /// use pharmacy_core::types::{CartLine, MedicineRef, Percentage};
    ///
    /// let line = CartLine {
    ///     quantity: 2,
    ///     ..CartLine::new(MedicineRef::new("M1", "ORS", Money::from_minor_units(5_000)))
    /// };
    /// let totals = InvoiceTotals::compute(
    ///     &[line],
    ///     DiscountMode::Overall { percent: 10.0 },
    ///     Percentage::from_percent(18.0),
    /// );
    /// assert_eq!(totals.taxable_amount.minor_units(), 9_000);
    /// assert_eq!(totals.gst_amount.minor_units(), 1_620);
    /// assert_eq!(totals.total.minor_units(), 10_620);
    /// ```
    pub fn compute(lines: &[CartLine], mode: DiscountMode, gst_rate: Percentage) -> Self {
        let cart = price_cart(lines, mode);
        let taxable_amount = cart.total;
        let gst_amount = taxable_amount.percentage_of(gst_rate);

        InvoiceTotals {
            subtotal: cart.subtotal,
            discount_amount: cart.discount_amount,
            taxable_amount,
            gst_rate,
            gst_amount,
            total: taxable_amount + gst_amount,
        }
    }
}

// =============================================================================
// Create-Sale Request
// =============================================================================

/// One line of the create-sale request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleRequestItem {
    pub medicine_id: String,
    pub name: String,
    pub quantity: i64,
}

/// Body of the create-sale call. The backend prices the sale itself; only
/// ids and quantities are sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleRequest {
    #[serde(flatten)]
    pub customer: CustomerInfo,

    pub items: Vec<SaleRequestItem>,
}

impl SaleRequest {
    /// Fails with [`CoreError::EmptyCart`] when there is nothing to sell.
    pub fn from_cart(lines: &[CartLine], customer: &CustomerInfo) -> CoreResult<Self> {
        if lines.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        Ok(SaleRequest {
            customer: customer.clone(),
            items: lines
                .iter()
                .map(|line| SaleRequestItem {
                    medicine_id: line.medicine_id().to_string(),
                    name: line.medicine.name.clone(),
                    quantity: line.quantity,
                })
                .collect(),
        })
    }
}

// =============================================================================
// Sale Record
// =============================================================================

/// `INV-<unix millis>`.
pub fn invoice_id_for(created_at: &DateTime<FixedOffset>) -> String {
    format!("{}{}", INVOICE_PREFIX, created_at.timestamp_millis())
}

impl SaleRecord {
    /// Freezes the cart into a committed sale.
    ///
    /// `totalAmount` is the invoice total, GST included. Line items record
    /// the undiscounted unit price and line value, as printed on the invoice.
    pub fn from_cart(
        invoice_id: impl Into<String>,
        customer: &CustomerInfo,
        lines: &[CartLine],
        mode: DiscountMode,
        gst_rate: Percentage,
        created_at: DateTime<FixedOffset>,
    ) -> CoreResult<Self> {
        if lines.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        let totals = InvoiceTotals::compute(lines, mode, gst_rate);

        Ok(SaleRecord {
            invoice_id: invoice_id.into(),
            customer_name: customer.customer_name.clone(),
            customer_contact: customer.customer_contact.clone(),
            total_amount: totals.total,
            created_at,
            items: lines
                .iter()
                .map(|line| SaleLineItem {
                    medicine_id: line.medicine_id().to_string(),
                    name: Some(line.medicine.name.clone()),
                    quantity: line.quantity,
                    price: line.medicine.unit_price(),
                    total: line.line_value(),
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MedicineRef;

    fn cart() -> Vec<CartLine> {
        vec![
            CartLine {
                quantity: 2,
                ..CartLine::new(MedicineRef::new("A", "Paracetamol", Money::from_minor_units(500)))
            },
            CartLine {
                quantity: 3,
                ..CartLine::new(MedicineRef::new("B", "Ibuprofen", Money::from_minor_units(750)))
            },
        ]
    }

    fn walk_in() -> CustomerInfo {
        CustomerInfo {
            customer_name: Some("John Doe".to_string()),
            customer_contact: Some("9876543210".to_string()),
        }
    }

    fn at(ts: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(ts).unwrap()
    }

    #[test]
    fn test_gst_applied_after_discount() {
        // subtotal 32.50, 10% off = 29.25, 18% GST = 5.265 → 5.27
        let totals = InvoiceTotals::compute(
            &cart(),
            DiscountMode::Overall { percent: 10.0 },
            Percentage::from_percent(18.0),
        );
        assert_eq!(totals.subtotal.minor_units(), 3_250);
        assert_eq!(totals.discount_amount.minor_units(), 325);
        assert_eq!(totals.taxable_amount.minor_units(), 2_925);
        assert_eq!(totals.gst_amount.minor_units(), 527);
        assert_eq!(totals.total.minor_units(), 3_452);
    }

    #[test]
    fn test_zero_gst_matches_cart_total() {
        let totals = InvoiceTotals::compute(&cart(), DiscountMode::Manual, Percentage::zero());
        assert!(totals.gst_amount.is_zero());
        assert_eq!(totals.total, totals.subtotal);
    }

    #[test]
    fn test_sale_request_body() {
        let request = SaleRequest::from_cart(&cart(), &walk_in()).unwrap();
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["customerName"], "John Doe");
        assert_eq!(json["customerContact"], "9876543210");
        assert_eq!(json["items"][1]["medicineId"], "B");
        assert_eq!(json["items"][1]["name"], "Ibuprofen");
        assert_eq!(json["items"][1]["quantity"], 3);
    }

    #[test]
    fn test_sale_request_for_anonymous_customer_omits_fields() {
        let request = SaleRequest::from_cart(&cart(), &CustomerInfo::default()).unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("customerName").is_none());
    }

    #[test]
    fn test_empty_cart_rejected() {
        assert!(matches!(
            SaleRequest::from_cart(&[], &walk_in()),
            Err(CoreError::EmptyCart)
        ));
        assert!(matches!(
            SaleRecord::from_cart(
                "INV-1",
                &walk_in(),
                &[],
                DiscountMode::default(),
                Percentage::zero(),
                at("2025-03-01T10:00:00+05:30"),
            ),
            Err(CoreError::EmptyCart)
        ));
    }

    #[test]
    fn test_sale_record_from_cart() {
        let created_at = at("2025-03-01T10:00:00+05:30");
        let sale = SaleRecord::from_cart(
            invoice_id_for(&created_at),
            &walk_in(),
            &cart(),
            DiscountMode::Overall { percent: 10.0 },
            Percentage::zero(),
            created_at,
        )
        .unwrap();

        assert_eq!(sale.invoice_id, format!("INV-{}", created_at.timestamp_millis()));
        assert_eq!(sale.total_amount.minor_units(), 2_925);
        assert_eq!(sale.year_month(), (2025, 3));
        assert_eq!(sale.items.len(), 2);
        assert_eq!(sale.items[1].price.minor_units(), 750);
        assert_eq!(sale.items[1].total.minor_units(), 2_250);
    }
}
