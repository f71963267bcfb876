//! # Inventory State
//!
//! Per-medicine lot collections and the only place they are written.
//!
//! ## Upsert Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Add/Update Stock form                                                  │
//! │          │ LotUpsert                                                    │
//! │          ▼                                                              │
//! │  apply_upsert() ── lock ──► current lots for medicineId                 │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │                      Reconciler::reconcile_with_outcome (pure)          │
//! │                                 │                                       │
//! │                 ┌───────────────┴───────────────┐                       │
//! │                 ▼                               ▼                       │
//! │        Ok: replace stored lots          Err: nothing stored,            │
//! │            log outcome                       warn + ValidationError     │
//! │                                                                         │
//! │  The lock is held for the whole read-modify-write, so concurrent        │
//! │  upserts are serialized and the last one to take the lock wins.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use pharmacy_core::{
    CoreError, InventoryLot, LotUpsert, Reconciler, StockSummary, DEFAULT_EXPIRY_WARNING_DAYS,
};
use tracing::{debug, info, warn};

use super::config::ConfigState;
use crate::error::ApiResult;

type LotMap = HashMap<String, Vec<InventoryLot>>;

/// Lot collections keyed by medicine id.
#[derive(Debug)]
pub struct InventoryState {
    lots: Arc<Mutex<LotMap>>,
    reconciler: Reconciler,
    expiry_warning_days: u32,
}

impl InventoryState {
    pub fn new(reconciler: Reconciler, expiry_warning_days: u32) -> Self {
        InventoryState {
            lots: Arc::new(Mutex::new(HashMap::new())),
            reconciler,
            expiry_warning_days,
        }
    }

    pub fn from_config(config: &ConfigState) -> Self {
        Self::new(Reconciler::new(config.match_mode), config.expiry_warning_days)
    }

    /// Every write is a single `insert`, so a poisoned map is still whole.
    fn lock(&self) -> MutexGuard<'_, LotMap> {
        self.lots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores the lots fetched for a medicine, replacing what was there.
    pub fn load(&self, medicine_id: &str, lots: Vec<InventoryLot>) {
        debug!(medicine_id, count = lots.len(), "Loading lots");
        self.lock().insert(medicine_id.to_string(), lots);
    }

    /// Reconciles `upsert` into its medicine's lots and returns the new
    /// collection.
    ///
    /// A medicine with nothing loaded starts from an empty collection.
    pub fn apply_upsert(&self, upsert: &LotUpsert) -> ApiResult<Vec<InventoryLot>> {
        let key = upsert.medicine_id.as_deref().map(str::trim).unwrap_or_default();

        let mut lots = self.lock();
        let existing = lots.get(key).map(Vec::as_slice).unwrap_or(&[]);

        match self.reconciler.reconcile_with_outcome(existing, upsert) {
            Ok(result) => {
                info!(
                    medicine_id = key,
                    batch_number = upsert.batch_number.as_deref().unwrap_or(""),
                    outcome = result.outcome.as_str(),
                    lots = result.lots.len(),
                    "Lot reconciled"
                );
                lots.insert(key.to_string(), result.lots.clone());
                Ok(result.lots)
            }
            Err(error) => {
                warn!(medicine_id = key, %error, "Upsert rejected");
                Err(error.into())
            }
        }
    }

    /// Current lots of a medicine, empty if none are loaded.
    pub fn lots(&self, medicine_id: &str) -> Vec<InventoryLot> {
        self.lock().get(medicine_id).cloned().unwrap_or_default()
    }

    /// Stock card for a loaded medicine.
    pub fn summary(&self, medicine_id: &str, today: NaiveDate) -> ApiResult<StockSummary> {
        let lots = self.lock();
        let medicine_lots = lots
            .get(medicine_id)
            .ok_or_else(|| CoreError::MedicineNotFound(medicine_id.to_string()))?;
        Ok(StockSummary::compute(medicine_lots, today, self.expiry_warning_days))
    }
}

impl Default for InventoryState {
    fn default() -> Self {
        Self::new(Reconciler::default(), DEFAULT_EXPIRY_WARNING_DAYS)
    }
}
