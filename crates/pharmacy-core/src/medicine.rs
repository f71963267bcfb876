//! # Medicine Catalog
//!
//! The medicine master list behind the medicine pages: every catalog entry,
//! the latest search hits, the entry just created and the one open for
//! editing.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  MedicineCatalog                                                        │
//! │                                                                         │
//! │  medicines ─────────── load / create / update (by _id) /                │
//! │                        delete (by medicineId)                           │
//! │  search_results ────── replaced by each search, never merged into       │
//! │                        `medicines`                                      │
//! │  recent_created_id ─── `_id` of the last created entry                  │
//! │  selected ──────────── entry opened on the detail page                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock quantities live on the lots; `totalQuantity` here is whatever the
//! backend last reported.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::MedicineRef;
use crate::validation::{non_blank, require_identifier, ValidationResult};

/// One entry of the medicine master list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MedicineRecord {
    /// Backend document id; absent until saved.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Business id that lots reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medicine_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medicine_code: Option<String>,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(default)]
    pub prescription_required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub mrp: Option<Money>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub selling_price: Option<Money>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub purchase_price: Option<Money>,

    #[serde(default)]
    pub total_quantity: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl MedicineRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        MedicineRecord {
            id: Some(id.into()),
            name: name.into(),
            ..MedicineRecord::default()
        }
    }

    /// The part of the entry a cart line needs. `None` for an unsaved
    /// entry, which has nothing the sale could reference.
    pub fn to_cart_ref(&self) -> Option<MedicineRef> {
        let id = non_blank(self.id.as_deref())?;
        Some(MedicineRef {
            id: id.to_string(),
            name: self.name.clone(),
            mrp: self.mrp,
            selling_price: self.selling_price,
            purchase_price: self.purchase_price,
        })
    }
}

/// Catalog snapshot. Every edit returns a new catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MedicineCatalog {
    medicines: Vec<MedicineRecord>,
    search_results: Vec<MedicineRecord>,
    recent_created_id: Option<String>,
    selected: Option<MedicineRecord>,
}

impl MedicineCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the full list with a fetched one.
    pub fn load(&self, medicines: Vec<MedicineRecord>) -> Self {
        MedicineCatalog {
            medicines,
            ..self.clone()
        }
    }

    /// Appends a newly saved entry and remembers its `_id`.
    ///
    /// ## Errors
    /// - `Required` when the entry has no name
    ///
    /// ## Example
    /// ```rust
    /// use pharmacy_core::medicine::{MedicineCatalog, MedicineRecord};
    ///
    /// let catalog = MedicineCatalog::new()
    ///     .create(MedicineRecord::new("m-1", "Paracetamol 500"))
    ///     .unwrap();
    /// assert_eq!(catalog.medicines().len(), 1);
    /// assert_eq!(catalog.recent_created_id(), Some("m-1"));
    /// ```
    pub fn create(&self, medicine: MedicineRecord) -> ValidationResult<Self> {
        require_identifier(Some(medicine.name.as_str()), "medicine name")?;

        let mut next = self.clone();
        next.recent_created_id = medicine.id.clone();
        next.medicines.push(medicine);
        Ok(next)
    }

    /// Replaces the entry with the same `_id`. A missing or unknown id
    /// leaves the catalog unchanged.
    pub fn update(&self, medicine: MedicineRecord) -> Self {
        let mut next = self.clone();
        let Some(id) = medicine.id.clone() else {
            return next;
        };
        if let Some(slot) = next
            .medicines
            .iter_mut()
            .find(|m| m.id.as_deref() == Some(id.as_str()))
        {
            *slot = medicine;
        }
        next
    }

    /// Drops every entry whose `medicineId` is `medicine_id`.
    pub fn delete(&self, medicine_id: &str) -> Self {
        let mut next = self.clone();
        next.medicines
            .retain(|m| m.medicine_id.as_deref() != Some(medicine_id));
        next
    }

    /// Stores the hits of the latest search.
    pub fn set_search_results(&self, results: Vec<MedicineRecord>) -> Self {
        MedicineCatalog {
            search_results: results,
            ..self.clone()
        }
    }

    pub fn select(&self, medicine: Option<MedicineRecord>) -> Self {
        MedicineCatalog {
            selected: medicine,
            ..self.clone()
        }
    }

    pub fn medicines(&self) -> &[MedicineRecord] {
        &self.medicines
    }

    pub fn search_results(&self) -> &[MedicineRecord] {
        &self.search_results
    }

    pub fn recent_created_id(&self) -> Option<&str> {
        self.recent_created_id.as_deref()
    }

    pub fn selected(&self) -> Option<&MedicineRecord> {
        self.selected.as_ref()
    }

    /// Entry by backend `_id`.
    pub fn find(&self, id: &str) -> Option<&MedicineRecord> {
        self.medicines.iter().find(|m| m.id.as_deref() == Some(id))
    }
}
