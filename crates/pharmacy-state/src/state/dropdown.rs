//! # Dropdown State
//!
//! The option lists behind the medicine form's select fields.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pharmacy_core::dropdown::{DropdownCatalog, DropdownOption};
use tracing::debug;

use crate::error::ApiResult;

#[derive(Debug, Default)]
pub struct DropdownState {
    catalog: Arc<Mutex<DropdownCatalog>>,
}

impl DropdownState {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, DropdownCatalog> {
        self.catalog.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores a freshly fetched list for `field`.
    pub fn replace_field(&self, field: &str, options: Vec<DropdownOption>) {
        debug!(field, count = options.len(), "Loading dropdown options");
        let mut catalog = self.lock();
        *catalog = catalog.replace_field(field, options);
    }

    pub fn add_option(&self, option: DropdownOption) -> ApiResult<()> {
        let mut catalog = self.lock();
        let field = option.input_field_name.clone();
        *catalog = catalog.add_option(option)?;
        debug!(field = %field, "Dropdown option added");
        Ok(())
    }

    pub fn update_option(&self, option: DropdownOption) {
        let mut catalog = self.lock();
        *catalog = catalog.update_option(option);
    }

    pub fn remove_option(&self, field: &str, id: &str) {
        debug!(field, id, "Removing dropdown option");
        let mut catalog = self.lock();
        *catalog = catalog.remove_option(field, id);
    }

    pub fn options(&self, field: &str) -> Vec<DropdownOption> {
        self.lock().options(field).to_vec()
    }

    pub fn search(&self, field: &str, query: &str) -> Vec<DropdownOption> {
        self.lock()
            .search(field, query)
            .into_iter()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn saved(id: &str, label: &str, value: &str) -> DropdownOption {
        DropdownOption {
            id: Some(id.to_string()),
            ..DropdownOption::new("form", label, value)
        }
    }

    #[test]
    fn test_lifecycle() {
        let state = DropdownState::new();
        state.replace_field("form", vec![saved("d1", "Tablet", "tablet")]);

        state
            .add_option(DropdownOption::new("form", "Syrup", "syrup"))
            .unwrap();
        assert_eq!(state.options("form").len(), 2);

        state.update_option(saved("d1", "Tablet (strip)", "tablet"));
        assert_eq!(state.search("form", "strip")[0].id.as_deref(), Some("d1"));

        state.remove_option("form", "d1");
        assert_eq!(state.options("form").len(), 1);
    }

    #[test]
    fn test_duplicate_rejected() {
        let state = DropdownState::new();
        state.replace_field("form", vec![saved("d1", "Tablet", "tablet")]);

        let err = state
            .add_option(DropdownOption::new("form", "Tabs", "tablet"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "form 'tablet' already exists");
        assert_eq!(state.options("form").len(), 1);
    }
}
