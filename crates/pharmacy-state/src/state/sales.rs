//! # Sales State
//!
//! Sale history grouped by calendar month.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pharmacy_core::history::{self, group_by_month};
use pharmacy_core::{Money, MonthlyGroup, SaleRecord};
use tracing::debug;

#[derive(Debug, Default)]
pub struct SalesState {
    groups: Arc<Mutex<Vec<MonthlyGroup>>>,
}

impl SalesState {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<MonthlyGroup>> {
        self.groups.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the history with a fetched sale list.
    pub fn load(&self, sales: &[SaleRecord]) {
        let groups = group_by_month(sales);
        debug!(sales = sales.len(), months = groups.len(), "Loading sale history");
        *self.lock() = groups;
    }

    /// Files a committed sale under its month.
    pub fn record(&self, sale: &SaleRecord) {
        let mut groups = self.lock();
        *groups = history::record_sale(&groups, sale);
        debug!(invoice_id = %sale.invoice_id, "Sale recorded");
    }

    /// Groups in the order their months were first seen.
    pub fn groups(&self) -> Vec<MonthlyGroup> {
        self.lock().clone()
    }

    pub fn groups_newest_first(&self) -> Vec<MonthlyGroup> {
        history::sorted_newest_first(&self.lock())
    }

    /// Lifetime spend of one customer, matched by contact number.
    pub fn customer_total(&self, customer_contact: &str) -> Money {
        let groups = self.lock();
        let sales: Vec<SaleRecord> = groups
            .iter()
            .flat_map(|group| group.sales.iter())
            .filter(|sale| sale.customer_contact.as_deref() == Some(customer_contact))
            .cloned()
            .collect();
        history::customer_lifetime_total(&sales)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn sale(invoice_id: &str, contact: Option<&str>, rupees: i64, created_at: &str) -> SaleRecord {
        SaleRecord {
            invoice_id: invoice_id.to_string(),
            customer_name: None,
            customer_contact: contact.map(str::to_string),
            total_amount: Money::from_major_minor(rupees, 0),
            created_at: DateTime::parse_from_rfc3339(created_at).unwrap(),
            items: Vec::new(),
        }
    }

    #[test]
    fn test_load_then_record() {
        let state = SalesState::new();
        state.load(&[
            sale("INV-1", None, 100, "2025-01-05T10:00:00Z"),
            sale("INV-2", None, 60, "2025-02-05T10:00:00Z"),
        ]);
        state.record(&sale("INV-3", None, 40, "2025-01-20T10:00:00Z"));

        let groups = state.groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].sales.len(), 2);
        assert_eq!(groups[0].total_transaction, Money::from_major_minor(140, 0));

        let newest = state.groups_newest_first();
        assert_eq!((newest[0].year, newest[0].month), (2025, 2));
    }

    #[test]
    fn test_customer_total() {
        let state = SalesState::new();
        state.load(&[
            sale("INV-1", Some("98765"), 100, "2025-01-05T10:00:00Z"),
            sale("INV-2", Some("11111"), 60, "2025-02-05T10:00:00Z"),
            sale("INV-3", Some("98765"), 25, "2025-03-05T10:00:00Z"),
        ]);
        assert_eq!(state.customer_total("98765"), Money::from_major_minor(125, 0));
        assert_eq!(state.customer_total("00000"), Money::zero());
    }
}
