//! # Cart Module
//!
//! Cart composition and pricing for the sell screen.
//!
//! Every operation takes the current lines and returns new ones; the
//! caller owns the stored cart and swaps it for the result.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Dashboard Action         Function                Effect                │
//! │  ────────────────         ────────                ──────                │
//! │  Pick medicine ─────────► add_line() ──────────► +1 or new line (qty 1) │
//! │  Click + / - ───────────► adjust_quantity() ───► qty, floored at 1      │
//! │  Click remove ──────────► remove_line() ───────► line dropped           │
//! │  Type line discount ────► set_line_discount() ─► manual mode only       │
//! │  Render totals ─────────► price_cart() ────────► subtotal/discount/total│
//! │                                                                         │
//! │  Unknown medicine ids are no-ops: they come from a stale screen, not    │
//! │  from corrupt data.                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Discount Rules
//! - `Overall`: one percentage applied to the subtotal
//! - `Manual`: each line's own percentage applied to its own value, summed
//! - Percentages are clamped to `[0, 100]`
//! - The discount is clamped to `[0, subtotal]`, so the total never goes
//!   below zero for non-negative prices

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{CartLine, MedicineRef, Percentage};

// =============================================================================
// Discount Mode
// =============================================================================

/// How the cart discount is computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "mode", rename_all = "camelCase")]
#[ts(export)]
pub enum DiscountMode {
    /// One percentage over the whole subtotal.
    Overall { percent: f64 },

    /// Each line carries its own percentage.
    Manual,
}

impl Default for DiscountMode {
    fn default() -> Self {
        DiscountMode::Overall { percent: 0.0 }
    }
}

/// Parses the configuration spelling: `overall` or `manual`.
impl FromStr for DiscountMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overall" => Ok(DiscountMode::default()),
            "manual" => Ok(DiscountMode::Manual),
            other => Err(ValidationError::InvalidFormat {
                field: "discount mode".to_string(),
                reason: format!("'{}' is not one of: overall, manual", other),
            }),
        }
    }
}

// =============================================================================
// Pricing Output
// =============================================================================

/// Cart totals handed to the invoice renderer as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    #[ts(type = "number")]
    pub subtotal: Money,

    #[ts(type = "number")]
    pub discount_amount: Money,

    /// `subtotal - discount_amount`.
    #[ts(type = "number")]
    pub total: Money,
}

/// Pricing of a single line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LinePricing {
    pub medicine_id: String,

    #[ts(type = "number")]
    pub unit_price: Money,

    pub quantity: i64,

    /// unit price × quantity.
    #[ts(type = "number")]
    pub line_value: Money,

    /// Zero unless the cart is in manual mode.
    #[ts(type = "number")]
    pub discount: Money,
}

// =============================================================================
// Line Operations
// =============================================================================

/// Adds one unit of `medicine`.
///
/// An existing line keeps its position and gets +1; otherwise a new line
/// with quantity 1 and no discount goes at the end.
///
/// ## Example
/// ```rust
/// use pharmacy_core::cart::add_line;
/// use pharmacy_core::money::Money;
/// use pharmacy_core::types::MedicineRef;
///
/// let para = MedicineRef::new("M1", "Paracetamol", Money::from_minor_units(500));
/// let cart = add_line(&[], &para);
/// let cart = add_line(&cart, &para);
/// assert_eq!(cart.len(), 1);
/// assert_eq!(cart[0].quantity, 2);
/// ```
pub fn add_line(lines: &[CartLine], medicine: &MedicineRef) -> Vec<CartLine> {
    let mut next = lines.to_vec();
    match next.iter_mut().find(|l| l.medicine_id() == medicine.id) {
        Some(line) => line.quantity = line.quantity.saturating_add(1),
        None => next.push(CartLine::new(medicine.clone())),
    }
    next
}

/// Changes a line's quantity by `delta`, never below 1.
///
/// Removal is [`remove_line`]'s job; decrementing cannot reach zero.
pub fn adjust_quantity(lines: &[CartLine], medicine_id: &str, delta: i64) -> Vec<CartLine> {
    lines
        .iter()
        .map(|line| {
            if line.medicine_id() != medicine_id {
                return line.clone();
            }
            CartLine {
                quantity: line.quantity.saturating_add(delta).max(1),
                ..line.clone()
            }
        })
        .collect()
}

/// Drops the line for `medicine_id`, if any.
pub fn remove_line(lines: &[CartLine], medicine_id: &str) -> Vec<CartLine> {
    lines
        .iter()
        .filter(|line| line.medicine_id() != medicine_id)
        .cloned()
        .collect()
}

/// Stores a manual discount percentage on a line, unclamped.
pub fn set_line_discount(lines: &[CartLine], medicine_id: &str, percent: f64) -> Vec<CartLine> {
    lines
        .iter()
        .map(|line| {
            if line.medicine_id() != medicine_id {
                return line.clone();
            }
            CartLine {
                discount: percent,
                ..line.clone()
            }
        })
        .collect()
}

// =============================================================================
// Pricing
// =============================================================================

/// Per-line breakdown in cart order.
pub fn price_lines(lines: &[CartLine], mode: DiscountMode) -> Vec<LinePricing> {
    lines
        .iter()
        .map(|line| {
            let line_value = line.line_value();
            let discount = match mode {
                DiscountMode::Manual => {
                    line_value.percentage_of(Percentage::from_percent(line.discount))
                }
                DiscountMode::Overall { .. } => Money::zero(),
            };
            LinePricing {
                medicine_id: line.medicine_id().to_string(),
                unit_price: line.medicine.unit_price(),
                quantity: line.quantity,
                line_value,
                discount,
            }
        })
        .collect()
}

/// Subtotal, discount and total for the cart.
///
/// ## Example
/// ```rust
/// use pharmacy_core::cart::{add_line, adjust_quantity, price_cart, DiscountMode};
/// use pharmacy_core::money::Money;
/// use pharmacy_core::types::MedicineRef;
///
/// let a = MedicineRef::new("A", "Amoxicillin", Money::from_minor_units(10_000));
/// let b = MedicineRef::new("B", "Cetirizine", Money::from_minor_units(5_000));
/// let cart = add_line(&add_line(&[], &a), &b);
/// let cart = adjust_quantity(&cart, "A", 1);
///
/// let totals = price_cart(&cart, DiscountMode::Overall { percent: 10.0 });
/// assert_eq!(totals.subtotal.minor_units(), 25_000);
/// assert_eq!(totals.discount_amount.minor_units(), 2_500);
/// assert_eq!(totals.total.minor_units(), 22_500);
/// ```
pub fn price_cart(lines: &[CartLine], mode: DiscountMode) -> CartTotals {
    let subtotal: Money = lines.iter().map(CartLine::line_value).sum();

    let raw_discount = match mode {
        DiscountMode::Overall { percent } => {
            subtotal.percentage_of(Percentage::from_percent(percent))
        }
        DiscountMode::Manual => price_lines(lines, mode).iter().map(|p| p.discount).sum(),
    };
    let discount_amount = raw_discount.clamp_to(Money::zero(), subtotal);

    CartTotals {
        subtotal,
        discount_amount,
        total: subtotal - discount_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn medicine(id: &str, rupees: i64) -> MedicineRef {
        MedicineRef::new(id, format!("Medicine {}", id), Money::from_major_minor(rupees, 0))
    }

    fn line(id: &str, rupees: i64, quantity: i64, discount: f64) -> CartLine {
        CartLine {
            medicine: medicine(id, rupees),
            quantity,
            discount,
        }
    }

    #[test]
    fn test_overall_discount() {
        let cart = vec![line("A", 100, 2, 0.0), line("B", 50, 1, 0.0)];
        let totals = price_cart(&cart, DiscountMode::Overall { percent: 10.0 });

        assert_eq!(totals.subtotal, Money::from_major_minor(250, 0));
        assert_eq!(totals.discount_amount, Money::from_major_minor(25, 0));
        assert_eq!(totals.total, Money::from_major_minor(225, 0));
    }

    #[test]
    fn test_manual_discount_per_line() {
        // 200 × 10% + 50 × 50% = 20 + 25
        let cart = vec![line("A", 100, 2, 10.0), line("B", 50, 1, 50.0)];
        let totals = price_cart(&cart, DiscountMode::Manual);

        assert_eq!(totals.discount_amount, Money::from_major_minor(45, 0));
        assert_eq!(totals.total, Money::from_major_minor(205, 0));
    }

    #[test]
    fn test_line_discounts_ignored_in_overall_mode() {
        let cart = vec![line("A", 100, 1, 50.0)];
        let totals = price_cart(&cart, DiscountMode::Overall { percent: 0.0 });
        assert!(totals.discount_amount.is_zero());
    }

    #[test]
    fn test_out_of_range_percentages_are_clamped() {
        let cart = vec![line("A", 100, 1, 0.0)];

        let over = price_cart(&cart, DiscountMode::Overall { percent: 150.0 });
        assert_eq!(over.discount_amount, over.subtotal);
        assert!(over.total.is_zero());

        let under = price_cart(&cart, DiscountMode::Overall { percent: -20.0 });
        assert!(under.discount_amount.is_zero());

        let manual = vec![line("A", 100, 1, 400.0), line("B", 10, 1, -5.0)];
        let totals = price_cart(&manual, DiscountMode::Manual);
        assert_eq!(totals.discount_amount, Money::from_major_minor(100, 0));
    }

    #[test]
    fn test_empty_cart() {
        let totals = price_cart(&[], DiscountMode::Overall { percent: 10.0 });
        assert_eq!(totals, CartTotals::default());
    }

    #[test]
    fn test_add_line_preserves_order() {
        let a = medicine("A", 1);
        let b = medicine("B", 2);
        let cart = add_line(&add_line(&[], &a), &b);
        let cart = add_line(&cart, &a);

        let ids: Vec<&str> = cart.iter().map(CartLine::medicine_id).collect();
        assert_eq!(ids, vec!["A", "B"]);
        assert_eq!(cart[0].quantity, 2);
        assert_eq!(cart[1].quantity, 1);
        assert_eq!(cart[1].discount, 0.0);
    }

    #[test]
    fn test_adjust_quantity_floors_at_one() {
        let cart = vec![line("A", 10, 5, 0.0)];
        assert_eq!(adjust_quantity(&cart, "A", -1)[0].quantity, 4);
        assert_eq!(adjust_quantity(&cart, "A", -1000)[0].quantity, 1);
        assert_eq!(adjust_quantity(&cart, "A", 3)[0].quantity, 8);
    }

    #[test]
    fn test_unknown_ids_are_no_ops() {
        let cart = vec![line("A", 10, 2, 0.0)];
        assert_eq!(adjust_quantity(&cart, "ZZ", 5), cart);
        assert_eq!(remove_line(&cart, "ZZ"), cart);
        assert_eq!(set_line_discount(&cart, "ZZ", 5.0), cart);
    }

    #[test]
    fn test_remove_and_discount_lines() {
        let cart = vec![line("A", 10, 1, 0.0), line("B", 20, 1, 0.0)];
        let cart = set_line_discount(&cart, "B", 15.0);
        assert_eq!(cart[1].discount, 15.0);

        let cart = remove_line(&cart, "A");
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].medicine_id(), "B");
    }

    #[test]
    fn test_price_lines() {
        let cart = vec![line("A", 100, 2, 10.0)];
        let priced = price_lines(&cart, DiscountMode::Manual);
        assert_eq!(priced[0].unit_price, Money::from_major_minor(100, 0));
        assert_eq!(priced[0].line_value, Money::from_major_minor(200, 0));
        assert_eq!(priced[0].discount, Money::from_major_minor(20, 0));
    }

    #[test]
    fn test_pricing_a_saturated_quantity() {
        let cart = adjust_quantity(&add_line(&[], &medicine("A", 10)), "A", i64::MAX);
        assert_eq!(cart[0].quantity, i64::MAX);

        let max = Money::from_minor_units(i64::MAX);
        let totals = price_cart(&cart, DiscountMode::Overall { percent: 10.0 });
        assert_eq!(totals.subtotal, max);
        assert!(totals.discount_amount > Money::zero());
        assert_eq!(totals.total, totals.subtotal - totals.discount_amount);

        let manual = price_cart(&set_line_discount(&cart, "A", 50.0), DiscountMode::Manual);
        assert_eq!(manual.subtotal, max);
        assert!(manual.total >= Money::zero());
    }

    #[test]
    fn test_discount_mode_parsing() {
        assert_eq!("overall".parse::<DiscountMode>().unwrap(), DiscountMode::default());
        assert_eq!("MANUAL".parse::<DiscountMode>().unwrap(), DiscountMode::Manual);
        assert!("half-off".parse::<DiscountMode>().is_err());
    }

    #[test]
    fn test_discount_mode_wire_format() {
        let json = serde_json::to_value(DiscountMode::Overall { percent: 10.0 }).unwrap();
        assert_eq!(json["mode"], "overall");
        assert_eq!(json["percent"], 10.0);

        let manual: DiscountMode = serde_json::from_str(r#"{ "mode": "manual" }"#).unwrap();
        assert_eq!(manual, DiscountMode::Manual);
    }
}
