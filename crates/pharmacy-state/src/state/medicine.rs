//! # Medicine State
//!
//! The medicine master list, search hits and the entry under edit.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pharmacy_core::{MedicineCatalog, MedicineRecord};
use tracing::{debug, info};

use crate::error::ApiResult;

#[derive(Debug, Default)]
pub struct MedicineState {
    catalog: Arc<Mutex<MedicineCatalog>>,
}

impl MedicineState {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MedicineCatalog> {
        self.catalog.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores a freshly fetched medicine list.
    pub fn load(&self, medicines: Vec<MedicineRecord>) {
        debug!(count = medicines.len(), "Loading medicines");
        let mut catalog = self.lock();
        *catalog = catalog.load(medicines);
    }

    /// Adds a saved medicine and returns its `_id`.
    pub fn create(&self, medicine: MedicineRecord) -> ApiResult<Option<String>> {
        let mut catalog = self.lock();
        *catalog = catalog.create(medicine)?;
        let id = catalog.recent_created_id().map(str::to_string);
        info!(id = id.as_deref().unwrap_or(""), "Medicine created");
        Ok(id)
    }

    pub fn update(&self, medicine: MedicineRecord) {
        let mut catalog = self.lock();
        *catalog = catalog.update(medicine);
    }

    pub fn delete(&self, medicine_id: &str) {
        debug!(medicine_id, "Deleting medicine");
        let mut catalog = self.lock();
        *catalog = catalog.delete(medicine_id);
    }

    pub fn set_search_results(&self, results: Vec<MedicineRecord>) {
        debug!(hits = results.len(), "Medicine search results");
        let mut catalog = self.lock();
        *catalog = catalog.set_search_results(results);
    }

    pub fn select(&self, medicine: Option<MedicineRecord>) {
        let mut catalog = self.lock();
        *catalog = catalog.select(medicine);
    }

    pub fn medicines(&self) -> Vec<MedicineRecord> {
        self.lock().medicines().to_vec()
    }

    pub fn search_results(&self) -> Vec<MedicineRecord> {
        self.lock().search_results().to_vec()
    }

    pub fn recent_created_id(&self) -> Option<String> {
        self.lock().recent_created_id().map(str::to_string)
    }

    pub fn selected(&self) -> Option<MedicineRecord> {
        self.lock().selected().cloned()
    }
}
