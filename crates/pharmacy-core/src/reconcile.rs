//! # Batch Reconciler
//!
//! Decides whether an incoming stock update amends an existing lot or
//! creates a new one.
//!
//! ## Decision Flow (batch mode)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  upsert { medicineId, batchNumber, expiryDate, ... }                    │
//! │       │                                                                 │
//! │       ├── medicineId missing?  → ValidationError                        │
//! │       ├── batchNumber missing? → ValidationError                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  same (batchNumber, expiryDate)? ── yes ──► replace slot wholesale      │
//! │       │ no                                                              │
//! │       ▼                                                                 │
//! │  same batchNumber, other expiry? ── no ───► append upsert as-is         │
//! │       │ yes                                                             │
//! │       ▼                                                                 │
//! │  append new variant, blanks backfilled from the FIRST such lot          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The input slice is never touched; callers store the returned collection.
//!
//! ## Match Modes
//! An older stock form keyed lots on `(medicineId, expiryDate)` instead.
//! Both are available as [`MatchMode`], but a [`Reconciler`] is built with
//! exactly one and applies only that one.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::types::{InventoryLot, LotUpsert};
use crate::validation::{non_blank, require_identifier, ValidationResult};

// =============================================================================
// Match Mode
// =============================================================================

/// Which fields identify "the same lot".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// `(batchNumber, expiryDate)`, falling back to `batchNumber`.
    /// `batchNumber` is mandatory.
    #[default]
    BatchAndExpiry,

    /// `(medicineId, expiryDate)`, falling back to `medicineId`.
    /// `batchNumber` is optional and is backfilled like the prices.
    MedicineAndExpiry,
}

impl FromStr for MatchMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "batch" | "batch_and_expiry" => Ok(MatchMode::BatchAndExpiry),
            "medicine" | "medicine_and_expiry" => Ok(MatchMode::MedicineAndExpiry),
            other => Err(ValidationError::InvalidFormat {
                field: "match mode".to_string(),
                reason: format!("'{}' is not one of: batch, medicine", other),
            }),
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::BatchAndExpiry => f.write_str("batch"),
            MatchMode::MedicineAndExpiry => f.write_str("medicine"),
        }
    }
}

// =============================================================================
// Outcome
// =============================================================================

/// What a reconciliation did to the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The lot at `index` was overwritten by the upsert.
    Replaced { index: usize },

    /// Nothing matched; the upsert was appended unchanged.
    Appended,

    /// A new variant of the lot at `source` was appended, with unset
    /// fields copied from it.
    AppendedVariant { source: usize },
}

impl ReconcileOutcome {
    /// Short label for log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReconcileOutcome::Replaced { .. } => "replaced",
            ReconcileOutcome::Appended => "appended",
            ReconcileOutcome::AppendedVariant { .. } => "appended_variant",
        }
    }
}

/// The new collection plus what happened.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub lots: Vec<InventoryLot>,
    pub outcome: ReconcileOutcome,
}

// =============================================================================
// Reconciler
// =============================================================================

/// Pure lot reconciler bound to one [`MatchMode`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reconciler {
    mode: MatchMode,
}

impl Reconciler {
    pub const fn new(mode: MatchMode) -> Self {
        Reconciler { mode }
    }

    #[inline]
    pub const fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Returns the updated lot collection.
    pub fn reconcile(
        &self,
        existing: &[InventoryLot],
        upsert: &LotUpsert,
    ) -> ValidationResult<Vec<InventoryLot>> {
        self.reconcile_with_outcome(existing, upsert).map(|r| r.lots)
    }

    /// Like [`Reconciler::reconcile`], also reporting which branch ran.
    pub fn reconcile_with_outcome(
        &self,
        existing: &[InventoryLot],
        upsert: &LotUpsert,
    ) -> ValidationResult<Reconciliation> {
        let medicine_id = require_identifier(upsert.medicine_id.as_deref(), "medicine id")?;

        match self.mode {
            MatchMode::BatchAndExpiry => {
                // Compared raw, exactly as the backend stored it.
                require_identifier(upsert.batch_number.as_deref(), "batch number")?;
                let batch = upsert.batch_number.as_deref();

                let exact = existing.iter().position(|lot| {
                    lot.batch_number.as_deref() == batch && lot.expiry_date == upsert.expiry_date
                });
                let same_batch = || {
                    existing
                        .iter()
                        .position(|lot| lot.batch_number.as_deref() == batch)
                };

                Ok(apply(existing, upsert, medicine_id, exact, same_batch, false))
            }
            MatchMode::MedicineAndExpiry => {
                let exact = existing.iter().position(|lot| {
                    lot.medicine_id == medicine_id && lot.expiry_date == upsert.expiry_date
                });
                let same_medicine = || {
                    existing
                        .iter()
                        .position(|lot| lot.medicine_id == medicine_id)
                };

                Ok(apply(existing, upsert, medicine_id, exact, same_medicine, true))
            }
        }
    }
}

/// Batch-first reconciliation with the default [`Reconciler`].
///
/// ## Example
/// ```rust
/// use pharmacy_core::reconcile::reconcile;
/// use pharmacy_core::types::LotUpsert;
///
/// let mut upsert = LotUpsert::for_medicine("M1");
/// upsert.batch_number = Some("B1".to_string());
/// upsert.quantity_in_stock = Some(10);
///
/// let lots = reconcile(&[], &upsert).unwrap();
/// assert_eq!(lots.len(), 1);
/// assert_eq!(lots[0].quantity_in_stock, 10);
///
/// // No batch number, no lot.
/// let err = reconcile(&lots, &LotUpsert::for_medicine("M1")).unwrap_err();
/// assert_eq!(err.to_string(), "batch number is required");
/// ```
pub fn reconcile(
    existing: &[InventoryLot],
    upsert: &LotUpsert,
) -> ValidationResult<Vec<InventoryLot>> {
    Reconciler::default().reconcile(existing, upsert)
}

fn apply(
    existing: &[InventoryLot],
    upsert: &LotUpsert,
    medicine_id: &str,
    exact: Option<usize>,
    fallback: impl FnOnce() -> Option<usize>,
    backfill_batch: bool,
) -> Reconciliation {
    let mut lots = existing.to_vec();

    if let Some(index) = exact {
        lots[index] = upsert.clone().into_lot(medicine_id.to_string());
        return Reconciliation {
            lots,
            outcome: ReconcileOutcome::Replaced { index },
        };
    }

    match fallback() {
        None => {
            lots.push(upsert.clone().into_lot(medicine_id.to_string()));
            Reconciliation {
                lots,
                outcome: ReconcileOutcome::Appended,
            }
        }
        Some(source) => {
            lots.push(variant_of(&existing[source], upsert, medicine_id, backfill_batch));
            Reconciliation {
                lots,
                outcome: ReconcileOutcome::AppendedVariant { source },
            }
        }
    }
}

/// Upsert fields win; unset ones come from `prior`. Quantity is never
/// inherited: a new lot starts with what the upsert says it holds.
fn variant_of(
    prior: &InventoryLot,
    upsert: &LotUpsert,
    medicine_id: &str,
    backfill_batch: bool,
) -> InventoryLot {
    let batch_number = if backfill_batch {
        non_blank(upsert.batch_number.as_deref())
            .or(prior.batch_number.as_deref())
            .map(str::to_string)
    } else {
        upsert.batch_number.clone()
    };

    InventoryLot {
        medicine_id: medicine_id.to_string(),
        batch_number,
        expiry_date: upsert.expiry_date,
        manufacture_date: upsert.manufacture_date.or(prior.manufacture_date),
        mrp: upsert.mrp.unwrap_or(prior.mrp),
        purchase_price: upsert.purchase_price.unwrap_or(prior.purchase_price),
        selling_price: upsert.selling_price.unwrap_or(prior.selling_price),
        quantity_in_stock: upsert.quantity_in_stock.unwrap_or(0),
        minimum_stock_level: upsert.minimum_stock_level.unwrap_or(prior.minimum_stock_level),
        shelf_location: non_blank(upsert.shelf_location.as_deref())
            .or(prior.shelf_location.as_deref())
            .map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    fn lot(batch: &str, expiry: Option<NaiveDate>) -> InventoryLot {
        let mut lot = InventoryLot::new("M1");
        lot.batch_number = Some(batch.to_string());
        lot.expiry_date = expiry;
        lot
    }

    fn upsert(batch: &str, expiry: Option<NaiveDate>) -> LotUpsert {
        let mut u = LotUpsert::for_medicine("M1");
        u.batch_number = Some(batch.to_string());
        u.expiry_date = expiry;
        u
    }

    #[test]
    fn test_new_expiry_for_known_batch_backfills() {
        let mut existing = lot("B1", date(2025, 1, 1));
        existing.shelf_location = Some("S1".to_string());
        existing.mrp = Money::from_minor_units(1000);

        let mut u = upsert("B1", date(2026, 1, 1));
        u.quantity_in_stock = Some(5);

        let lots = reconcile(&[existing.clone()], &u).unwrap();

        assert_eq!(lots.len(), 2);
        assert_eq!(lots[0], existing);
        let added = &lots[1];
        assert_eq!(added.shelf_location.as_deref(), Some("S1"));
        assert_eq!(added.mrp.minor_units(), 1000);
        assert_eq!(added.expiry_date, date(2026, 1, 1));
        assert_eq!(added.quantity_in_stock, 5);
    }

    #[test]
    fn test_exact_match_overwrites_without_backfill() {
        let mut existing = lot("B1", date(2025, 1, 1));
        existing.shelf_location = Some("S1".to_string());
        existing.mrp = Money::from_minor_units(1000);
        existing.quantity_in_stock = 30;

        let mut u = upsert("B1", date(2025, 1, 1));
        u.quantity_in_stock = Some(12);

        let result = Reconciler::default()
            .reconcile_with_outcome(&[lot("B0", None), existing], &u)
            .unwrap();

        assert_eq!(result.outcome, ReconcileOutcome::Replaced { index: 1 });
        assert_eq!(result.lots.len(), 2);
        let replaced = &result.lots[1];
        assert_eq!(replaced.quantity_in_stock, 12);
        assert_eq!(replaced.shelf_location, None);
        assert_eq!(replaced.mrp, Money::zero());
    }

    #[test]
    fn test_both_expiries_absent_is_an_exact_match() {
        let existing = lot("B1", None);
        let mut u = upsert("B1", None);
        u.quantity_in_stock = Some(3);

        let result = Reconciler::default().reconcile_with_outcome(&[existing], &u).unwrap();
        assert_eq!(result.outcome, ReconcileOutcome::Replaced { index: 0 });
        assert_eq!(result.lots[0].quantity_in_stock, 3);
    }

    #[test]
    fn test_unknown_batch_appends_unchanged() {
        let existing = lot("B1", date(2025, 1, 1));
        let u = upsert("B2", date(2025, 1, 1));

        let result = Reconciler::default().reconcile_with_outcome(&[existing], &u).unwrap();
        assert_eq!(result.outcome, ReconcileOutcome::Appended);
        assert_eq!(result.lots.len(), 2);
        assert_eq!(result.lots[1], u.into_lot("M1".to_string()));
    }

    #[test]
    fn test_backfill_uses_first_lot_of_batch() {
        let mut first = lot("B1", date(2025, 1, 1));
        first.shelf_location = Some("FIRST".to_string());
        let mut second = lot("B1", date(2025, 6, 1));
        second.shelf_location = Some("SECOND".to_string());

        let result = Reconciler::default()
            .reconcile_with_outcome(&[first, second], &upsert("B1", date(2027, 1, 1)))
            .unwrap();

        assert_eq!(result.outcome, ReconcileOutcome::AppendedVariant { source: 0 });
        assert_eq!(result.lots[2].shelf_location.as_deref(), Some("FIRST"));
    }

    #[test]
    fn test_upsert_fields_win_over_backfill() {
        let mut existing = lot("B1", date(2025, 1, 1));
        existing.mrp = Money::from_minor_units(1000);
        existing.minimum_stock_level = 20;
        existing.manufacture_date = date(2024, 1, 1);
        existing.shelf_location = Some("S1".to_string());

        let mut u = upsert("B1", date(2026, 1, 1));
        u.mrp = Some(Money::from_minor_units(1200));
        u.minimum_stock_level = Some(0);
        u.shelf_location = Some("".to_string());

        let lots = reconcile(&[existing], &u).unwrap();
        let added = &lots[1];
        assert_eq!(added.mrp.minor_units(), 1200);
        // Explicit zero is a value, not an absence.
        assert_eq!(added.minimum_stock_level, 0);
        assert_eq!(added.manufacture_date, date(2024, 1, 1));
        // Blank shelf location counts as unset.
        assert_eq!(added.shelf_location.as_deref(), Some("S1"));
    }

    #[test]
    fn test_missing_identifiers() {
        let mut no_medicine = upsert("B1", None);
        no_medicine.medicine_id = None;
        assert_eq!(
            reconcile(&[], &no_medicine).unwrap_err(),
            ValidationError::required("medicine id")
        );

        let mut blank_medicine = upsert("B1", None);
        blank_medicine.medicine_id = Some("  ".to_string());
        assert!(reconcile(&[], &blank_medicine).is_err());

        let mut no_batch = upsert("B1", None);
        no_batch.batch_number = None;
        let err = reconcile(&[], &no_batch).unwrap_err();
        assert_eq!(err.to_string(), "batch number is required");

        no_batch.batch_number = Some(String::new());
        assert!(reconcile(&[], &no_batch).is_err());
    }

    #[test]
    fn test_negative_numbers_are_accepted() {
        let mut u = upsert("B1", None);
        u.mrp = Some(Money::from_minor_units(-100));
        u.quantity_in_stock = Some(-4);

        let lots = reconcile(&[], &u).unwrap();
        assert_eq!(lots[0].mrp.minor_units(), -100);
        assert_eq!(lots[0].quantity_in_stock, -4);
    }

    #[test]
    fn test_medicine_mode_matches_on_medicine_and_expiry() {
        let reconciler = Reconciler::new(MatchMode::MedicineAndExpiry);
        let mut existing = lot("B1", date(2025, 1, 1));
        existing.mrp = Money::from_minor_units(500);

        let mut same = LotUpsert::for_medicine("M1");
        same.expiry_date = date(2025, 1, 1);
        same.quantity_in_stock = Some(9);
        let result = reconciler.reconcile_with_outcome(&[existing.clone()], &same).unwrap();
        assert_eq!(result.outcome, ReconcileOutcome::Replaced { index: 0 });
        assert_eq!(result.lots[0].batch_number, None);

        let mut other_expiry = LotUpsert::for_medicine("M1");
        other_expiry.expiry_date = date(2026, 1, 1);
        let result = reconciler.reconcile_with_outcome(&[existing], &other_expiry).unwrap();
        assert_eq!(result.outcome, ReconcileOutcome::AppendedVariant { source: 0 });
        assert_eq!(result.lots[1].batch_number.as_deref(), Some("B1"));
        assert_eq!(result.lots[1].mrp.minor_units(), 500);
    }

    #[test]
    fn test_medicine_mode_still_requires_medicine_id() {
        let reconciler = Reconciler::new(MatchMode::MedicineAndExpiry);
        let err = reconciler.reconcile(&[], &LotUpsert::default()).unwrap_err();
        assert_eq!(err, ValidationError::required("medicine id"));
    }

    #[test]
    fn test_match_mode_from_str() {
        assert_eq!("batch".parse::<MatchMode>().unwrap(), MatchMode::BatchAndExpiry);
        assert_eq!(" Medicine ".parse::<MatchMode>().unwrap(), MatchMode::MedicineAndExpiry);
        assert!("expiry".parse::<MatchMode>().is_err());
        assert_eq!(MatchMode::MedicineAndExpiry.to_string(), "medicine");
    }
}
