//! # History Module
//!
//! Monthly grouping of committed sales for the sale history page.
//!
//! ## Grouping
//! ```text
//!   SaleRecord.createdAt ──► (year, month) in the timestamp's own offset
//!                                   │
//!            ┌──────────────────────┴──────────────────────┐
//!            ▼                                             ▼
//!   group exists: push sale,                     no group: new group with
//!   total_transaction += totalAmount             this single sale
//! ```
//!
//! [`record_sale`] keeps groups in first-seen order. Sorting is a display
//! concern, see [`sorted_newest_first`].

use crate::money::Money;
use crate::types::{MonthlyGroup, SaleRecord};

/// Files `sale` under its calendar month.
///
/// ## Example
/// ```rust
/// use pharmacy_core::history::record_sale;
/// use pharmacy_core::types::SaleRecord;
///
/// let sale: SaleRecord = serde_json::from_str(
///     r#"{ "invoiceId": "INV-1", "totalAmount": 120, "createdAt": "2025-03-04T10:00:00Z" }"#,
/// ).unwrap();
///
/// let history = record_sale(&[], &sale);
/// let history = record_sale(&history, &sale);
/// assert_eq!(history.len(), 1);
/// assert_eq!((history[0].year, history[0].month), (2025, 3));
/// assert_eq!(history[0].total_transaction.minor_units(), 24_000);
/// ```
pub fn record_sale(history: &[MonthlyGroup], sale: &SaleRecord) -> Vec<MonthlyGroup> {
    let (year, month) = sale.year_month();
    let mut next = history.to_vec();

    match next
        .iter_mut()
        .find(|group| group.year == year && group.month == month)
    {
        Some(group) => {
            group.total_transaction += sale.total_amount;
            group.sales.push(sale.clone());
        }
        None => next.push(MonthlyGroup {
            year,
            month,
            total_transaction: sale.total_amount,
            sales: vec![sale.clone()],
        }),
    }
    next
}

/// Groups a flat sale list, in list order.
pub fn group_by_month(sales: &[SaleRecord]) -> Vec<MonthlyGroup> {
    sales
        .iter()
        .fold(Vec::new(), |history, sale| record_sale(&history, sale))
}

/// Newest month first.
pub fn sorted_newest_first(groups: &[MonthlyGroup]) -> Vec<MonthlyGroup> {
    let mut sorted = groups.to_vec();
    sorted.sort_by(|a, b| (b.year, b.month).cmp(&(a.year, a.month)));
    sorted
}

/// Everything a customer has spent, over the invoices passed in.
pub fn customer_lifetime_total(sales: &[SaleRecord]) -> Money {
    sales.iter().map(|sale| sale.total_amount).sum()
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use proptest::prelude::*;

    /// n sales in one month give one group of n entries whose total is
    /// the sum of their amounts.
    #[test]
    fn prop_monthly_sum() {
        proptest!(|(amounts in prop::collection::vec(0i64..10_000_000, 1..40), day in 1u32..=28)| {
            let offset = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
            let sales: Vec<SaleRecord> = amounts
                .iter()
                .enumerate()
                .map(|(i, minor)| SaleRecord {
                    invoice_id: format!("INV-{}", i),
                    customer_name: None,
                    customer_contact: None,
                    total_amount: Money::from_minor_units(*minor),
                    created_at: offset.with_ymd_and_hms(2025, 6, day, 12, 0, 0).unwrap(),
                    items: Vec::new(),
                })
                .collect();

            let history = group_by_month(&sales);
            prop_assert_eq!(history.len(), 1);
            prop_assert_eq!(history[0].sales.len(), amounts.len());
            prop_assert_eq!(
                history[0].total_transaction.minor_units(),
                amounts.iter().sum::<i64>()
            );
        });
    }
}
