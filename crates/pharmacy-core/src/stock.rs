//! # Stock Module
//!
//! Read-only views over one medicine's lots for the inventory and alert
//! screens. Nothing here feeds back into reconciliation.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::InventoryLot;

/// The medicine's `totalQuantity`: stock across every lot.
pub fn total_quantity(lots: &[InventoryLot]) -> i64 {
    lots.iter().map(|lot| lot.quantity_in_stock).sum()
}

/// Lots at or below their reorder level. A level of 0 means "no alert".
pub fn low_stock(lots: &[InventoryLot]) -> Vec<&InventoryLot> {
    lots.iter()
        .filter(|lot| {
            lot.minimum_stock_level > 0 && lot.quantity_in_stock <= lot.minimum_stock_level
        })
        .collect()
}

/// Lots whose expiry date is on or before `today`.
pub fn expired(lots: &[InventoryLot], today: NaiveDate) -> Vec<&InventoryLot> {
    lots.iter().filter(|lot| lot.is_expired(today)).collect()
}

/// Lots that are still sellable today but expire within `days` days.
///
/// A window reaching past the last representable date has no upper bound.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use pharmacy_core::stock::expiring_within;
/// use pharmacy_core::types::InventoryLot;
///
/// let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
/// let mut lot = InventoryLot::new("M1");
/// lot.expiry_date = NaiveDate::from_ymd_opt(2025, 3, 1);
///
/// assert_eq!(expiring_within(&[lot.clone()], today, 90).len(), 1);
/// assert!(expiring_within(&[lot], today, 30).is_empty());
/// ```
pub fn expiring_within(lots: &[InventoryLot], today: NaiveDate, days: u32) -> Vec<&InventoryLot> {
    let horizon = today.checked_add_signed(Duration::days(i64::from(days)));
    lots.iter()
        .filter(|lot| {
            lot.expiry_date.is_some_and(|expiry| {
                expiry > today && horizon.map_or(true, |horizon| expiry <= horizon)
            })
        })
        .collect()
}

/// Counts shown on a medicine's stock card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockSummary {
    pub lot_count: usize,
    pub total_quantity: i64,
    pub low_stock_lots: usize,
    pub expired_lots: usize,
    pub expiring_lots: usize,

    /// Stock that can still be sold today.
    pub sellable_quantity: i64,
}

impl StockSummary {
    pub fn compute(lots: &[InventoryLot], today: NaiveDate, warning_days: u32) -> Self {
        StockSummary {
            lot_count: lots.len(),
            total_quantity: total_quantity(lots),
            low_stock_lots: low_stock(lots).len(),
            expired_lots: expired(lots, today).len(),
            expiring_lots: expiring_within(lots, today, warning_days).len(),
            sellable_quantity: lots
                .iter()
                .filter(|lot| !lot.is_expired(today))
                .map(|lot| lot.quantity_in_stock)
                .sum(),
        }
    }
}
