//! # Cart State
//!
//! The sale being composed on the sell screen.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Dashboard Action         CartState method        pharmacy-core call    │
//! │  ────────────────         ────────────────        ──────────────────    │
//! │  Pick medicine ─────────► add() ────────────────► cart::add_line        │
//! │  Click + / - ───────────► adjust() ─────────────► cart::adjust_quantity │
//! │  Click remove ──────────► remove() ─────────────► cart::remove_line     │
//! │  Line discount ─────────► set_discount() ───────► cart::set_line_discount│
//! │  Overall discount ──────► set_overall_discount()                        │
//! │  Render totals ─────────► totals() / invoice_totals()                   │
//! │  Submit sale ───────────► checkout() ───────────► SaleRecord::from_cart │
//! │                                                                         │
//! │  NOTE: checkout() always empties the cart, whether or not the          │
//! │        submission that follows succeeds.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, FixedOffset};
use pharmacy_core::cart::{self, LinePricing};
use pharmacy_core::invoice::invoice_id_for;
use pharmacy_core::{
    CartLine, CartTotals, CustomerInfo, DiscountMode, InvoiceTotals, MedicineRef, Percentage,
    SaleRecord, SaleRequest,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiResult;

/// The cart itself: lines, discount settings and customer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub lines: Vec<CartLine>,
    pub discount_mode: DiscountMode,
    pub customer: CustomerInfo,
}

impl Cart {
    pub fn new(discount_mode: DiscountMode) -> Self {
        Cart {
            discount_mode,
            ..Cart::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines
            .iter()
            .fold(0i64, |acc, l| acc.saturating_add(l.quantity))
    }

    pub fn totals(&self) -> CartTotals {
        cart::price_cart(&self.lines, self.discount_mode)
    }
}

/// Lock-protected cart.
#[derive(Debug, Default)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    /// Creates an empty cart in the given discount mode.
    pub fn new(discount_mode: DiscountMode) -> Self {
        CartState {
            cart: Arc::new(Mutex::new(Cart::new(discount_mode))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Executes a function with read access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        f(&self.lock())
    }

    /// Swaps the lines for whatever `f` returns.
    fn replace_lines<F>(&self, f: F) -> Vec<CartLine>
    where
        F: FnOnce(&[CartLine]) -> Vec<CartLine>,
    {
        let mut cart = self.lock();
        cart.lines = f(&cart.lines);
        cart.lines.clone()
    }

    pub fn add(&self, medicine: &MedicineRef) -> Vec<CartLine> {
        debug!(medicine_id = %medicine.id, "Adding to cart");
        self.replace_lines(|lines| cart::add_line(lines, medicine))
    }

    pub fn adjust(&self, medicine_id: &str, delta: i64) -> Vec<CartLine> {
        debug!(medicine_id, delta, "Adjusting cart quantity");
        self.replace_lines(|lines| cart::adjust_quantity(lines, medicine_id, delta))
    }

    pub fn remove(&self, medicine_id: &str) -> Vec<CartLine> {
        debug!(medicine_id, "Removing from cart");
        self.replace_lines(|lines| cart::remove_line(lines, medicine_id))
    }

    /// Sets a line's manual discount percent.
    pub fn set_discount(&self, medicine_id: &str, percent: f64) -> Vec<CartLine> {
        debug!(medicine_id, percent, "Setting line discount");
        self.replace_lines(|lines| cart::set_line_discount(lines, medicine_id, percent))
    }

    /// Switches to overall mode with `percent`.
    pub fn set_overall_discount(&self, percent: f64) {
        debug!(percent, "Setting overall discount");
        self.lock().discount_mode = DiscountMode::Overall { percent };
    }

    pub fn set_mode(&self, mode: DiscountMode) {
        debug!(?mode, "Switching discount mode");
        self.lock().discount_mode = mode;
    }

    pub fn set_customer(&self, customer: CustomerInfo) {
        self.lock().customer = customer;
    }

    pub fn lines(&self) -> Vec<CartLine> {
        self.with_cart(|cart| cart.lines.clone())
    }

    pub fn totals(&self) -> CartTotals {
        self.with_cart(Cart::totals)
    }

    pub fn priced_lines(&self) -> Vec<LinePricing> {
        self.with_cart(|cart| cart::price_lines(&cart.lines, cart.discount_mode))
    }

    pub fn invoice_totals(&self, gst_rate: Percentage) -> InvoiceTotals {
        self.with_cart(|cart| InvoiceTotals::compute(&cart.lines, cart.discount_mode, gst_rate))
    }

    /// Body of the create-sale call for the current cart.
    pub fn sale_request(&self) -> ApiResult<SaleRequest> {
        self.with_cart(|cart| Ok(SaleRequest::from_cart(&cart.lines, &cart.customer)?))
    }

    /// Freezes the cart into a sale and empties it.
    ///
    /// The cart is reset before the record is built, so an empty-cart error
    /// also leaves a fresh cart behind. Discount mode carries over.
    pub fn checkout(
        &self,
        gst_rate: Percentage,
        created_at: DateTime<FixedOffset>,
    ) -> ApiResult<SaleRecord> {
        let cart = {
            let mut guard = self.lock();
            let mode = guard.discount_mode;
            std::mem::replace(&mut *guard, Cart::new(mode))
        };

        let sale = SaleRecord::from_cart(
            invoice_id_for(&created_at),
            &cart.customer,
            &cart.lines,
            cart.discount_mode,
            gst_rate,
            created_at,
        )?;
        info!(
            invoice_id = %sale.invoice_id,
            items = sale.items.len(),
            total = %sale.total_amount,
            "Sale checked out"
        );
        Ok(sale)
    }

    /// Empties the cart without creating a sale.
    pub fn clear(&self) {
        let mut cart = self.lock();
        let mode = cart.discount_mode;
        *cart = Cart::new(mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use pharmacy_core::Money;

    fn medicine(id: &str, rupees: i64) -> MedicineRef {
        MedicineRef::new(id, format!("Medicine {}", id), Money::from_major_minor(rupees, 0))
    }

    fn at(ts: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(ts).unwrap()
    }

    fn filled() -> CartState {
        let state = CartState::default();
        state.add(&medicine("A", 100));
        state.add(&medicine("A", 100));
        state.add(&medicine("B", 50));
        state
    }

    #[test]
    fn test_overall_discount_scenario() {
        let state = filled();
        state.set_overall_discount(10.0);

        let totals = state.totals();
        assert_eq!(totals.subtotal, Money::from_major_minor(250, 0));
        assert_eq!(totals.discount_amount, Money::from_major_minor(25, 0));
        assert_eq!(totals.total, Money::from_major_minor(225, 0));
    }

    #[test]
    fn test_line_operations() {
        let state = filled();
        assert_eq!(state.adjust("A", -5)[0].quantity, 1);
        assert_eq!(state.adjust("ZZ", 3), state.lines());

        state.set_discount("B", 20.0);
        state.set_mode(DiscountMode::Manual);
        assert_eq!(state.totals().discount_amount, Money::from_major_minor(10, 0));
        assert_eq!(state.priced_lines()[1].discount, Money::from_major_minor(10, 0));

        let lines = state.remove("A");
        assert_eq!(lines.len(), 1);
        assert_eq!(state.with_cart(Cart::total_quantity), 1);
    }

    #[test]
    fn test_invoice_totals_with_gst() {
        let state = filled();
        state.set_overall_discount(10.0);
        let totals = state.invoice_totals(Percentage::from_percent(12.0));
        assert_eq!(totals.taxable_amount, Money::from_major_minor(225, 0));
        assert_eq!(totals.gst_amount, Money::from_major_minor(27, 0));
        assert_eq!(totals.total, Money::from_major_minor(252, 0));
    }

    #[test]
    fn test_checkout_clears_cart() {
        let state = CartState::new(DiscountMode::Manual);
        state.add(&medicine("A", 100));
        state.set_customer(CustomerInfo {
            customer_name: Some("Asha".to_string()),
            customer_contact: None,
        });
        let request = state.sale_request().unwrap();
        assert_eq!(request.items[0].medicine_id, "A");

        let created_at = at("2025-01-09T14:10:00+05:30");
        let sale = state.checkout(Percentage::zero(), created_at).unwrap();

        assert_eq!(sale.invoice_id, invoice_id_for(&created_at));
        assert_eq!(sale.customer_name.as_deref(), Some("Asha"));
        assert_eq!(sale.total_amount, Money::from_major_minor(100, 0));
        assert!(state.with_cart(Cart::is_empty));
        assert_eq!(state.with_cart(|c| c.customer.clone()), CustomerInfo::default());
        assert_eq!(state.with_cart(|c| c.discount_mode), DiscountMode::Manual);
    }

    #[test]
    fn test_empty_checkout_is_cart_error() {
        let state = CartState::default();
        let err = state
            .checkout(Percentage::zero(), at("2025-01-09T14:10:00Z"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);
        assert_eq!(state.sale_request().unwrap_err().code, ErrorCode::CartError);
    }

    #[test]
    fn test_saturated_quantities_price_and_check_out() {
        let state = filled();
        state.adjust("A", i64::MAX);
        assert_eq!(state.with_cart(Cart::total_quantity), i64::MAX);

        state.set_overall_discount(10.0);
        let totals = state.invoice_totals(Percentage::from_percent(18.0));
        assert_eq!(totals.subtotal, Money::from_minor_units(i64::MAX));
        assert!(totals.total > Money::zero());

        let sale = state
            .checkout(Percentage::from_percent(18.0), at("2025-01-09T14:10:00Z"))
            .unwrap();
        assert_eq!(sale.items[0].quantity, i64::MAX);
        assert!(state.with_cart(Cart::is_empty));
    }

    #[test]
    fn test_clear() {
        let state = filled();
        state.clear();
        assert!(state.lines().is_empty());
        assert_eq!(state.totals(), CartTotals::default());
    }
}
