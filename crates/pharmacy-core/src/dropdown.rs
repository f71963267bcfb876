//! # Dropdown Module
//!
//! Operator-maintained option lists for the medicine form (`form`,
//! `strength`, ...), keyed by the form field they fill.
//!
//! ```text
//! DropdownCatalog
//! ├── "form"     ──► [Tablet, Syrup, Capsule]
//! └── "strength" ──► [250mg, 500mg]
//! ```
//!
//! Like the rest of the core, every edit returns a new catalog.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::validation::{require_identifier, ValidationResult};

/// One selectable option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DropdownOption {
    /// Assigned by the backend; absent until the option is saved.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub input_field_name: String,
    pub label: String,
    pub value: String,
}

impl DropdownOption {
    pub fn new(
        input_field_name: impl Into<String>,
        label: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        DropdownOption {
            id: None,
            input_field_name: input_field_name.into(),
            label: label.into(),
            value: value.into(),
        }
    }
}

/// All option lists, by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DropdownCatalog {
    fields: BTreeMap<String, Vec<DropdownOption>>,
}

impl DropdownCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swaps in a freshly fetched list for one field.
    pub fn replace_field(&self, field: &str, options: Vec<DropdownOption>) -> Self {
        let mut next = self.clone();
        next.fields.insert(field.to_string(), options);
        next
    }

    /// Appends an option to its field.
    ///
    /// ## Errors
    /// - `Required` for a blank field name, label or value
    /// - `Duplicate` when the field already has an option with that value
    ///
    /// ## Example
    /// ```rust
    /// use pharmacy_core::dropdown::{DropdownCatalog, DropdownOption};
    ///
    /// let catalog = DropdownCatalog::new()
    ///     .add_option(DropdownOption::new("form", "Tablet", "tablet"))
    ///     .unwrap();
    /// assert_eq!(catalog.options("form").len(), 1);
    /// assert!(catalog
    ///     .add_option(DropdownOption::new("form", "Tablets", "tablet"))
    ///     .is_err());
    /// ```
    pub fn add_option(&self, option: DropdownOption) -> ValidationResult<Self> {
        require_identifier(Some(option.input_field_name.as_str()), "input field name")?;
        require_identifier(Some(option.label.as_str()), "label")?;
        let value = require_identifier(Some(option.value.as_str()), "value")?;

        let exists = self
            .options(&option.input_field_name)
            .iter()
            .any(|o| o.value.trim() == value);
        if exists {
            return Err(ValidationError::Duplicate {
                field: option.input_field_name.clone(),
                value: value.to_string(),
            });
        }

        let mut next = self.clone();
        next.fields
            .entry(option.input_field_name.clone())
            .or_default()
            .push(option);
        Ok(next)
    }

    /// Replaces the option with the same `_id` in the option's field.
    /// An unknown or missing id leaves the catalog unchanged.
    pub fn update_option(&self, option: DropdownOption) -> Self {
        let mut next = self.clone();
        let Some(id) = option.id.clone() else {
            return next;
        };
        if let Some(options) = next.fields.get_mut(&option.input_field_name) {
            let slot = options
                .iter_mut()
                .find(|o| o.id.as_deref() == Some(id.as_str()));
            if let Some(slot) = slot {
                *slot = option;
            }
        }
        next
    }

    /// Drops the option with `id` from `field`, if present.
    pub fn remove_option(&self, field: &str, id: &str) -> Self {
        let mut next = self.clone();
        if let Some(options) = next.fields.get_mut(field) {
            options.retain(|o| o.id.as_deref() != Some(id));
        }
        next
    }

    /// Options of a field, empty if it was never loaded.
    pub fn options(&self, field: &str) -> &[DropdownOption] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Case-insensitive label search within one field. A blank query
    /// matches everything.
    pub fn search(&self, field: &str, query: &str) -> Vec<&DropdownOption> {
        let needle = query.trim().to_lowercase();
        self.options(field)
            .iter()
            .filter(|o| o.label.to_lowercase().contains(&needle))
            .collect()
    }

    /// Names of the loaded fields.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saved(id: &str, field: &str, label: &str, value: &str) -> DropdownOption {
        DropdownOption {
            id: Some(id.to_string()),
            ..DropdownOption::new(field, label, value)
        }
    }

    fn catalog() -> DropdownCatalog {
        DropdownCatalog::new()
            .replace_field(
                "form",
                vec![
                    saved("d1", "form", "Tablet", "tablet"),
                    saved("d2", "form", "Syrup", "syrup"),
                ],
            )
            .replace_field("strength", vec![saved("d3", "strength", "500 mg", "500mg")])
    }

    #[test]
    fn test_option_wire_format() {
        let json = r#"{ "_id": "d1", "inputFieldName": "form", "label": "Tablet", "value": "tablet" }"#;
        let option: DropdownOption = serde_json::from_str(json).unwrap();
        assert_eq!(option, saved("d1", "form", "Tablet", "tablet"));

        let unsaved = serde_json::to_value(DropdownOption::new("form", "Gel", "gel")).unwrap();
        assert!(unsaved.get("_id").is_none());
        assert_eq!(unsaved["inputFieldName"], "form");
    }

    #[test]
    fn test_replace_field_keeps_other_fields() {
        let next = catalog().replace_field("form", Vec::new());
        assert!(next.options("form").is_empty());
        assert_eq!(next.options("strength").len(), 1);
    }

    #[test]
    fn test_add_option_validation() {
        let base = catalog();
        assert_eq!(
            base.add_option(DropdownOption::new("form", "", "gel")).unwrap_err(),
            ValidationError::required("label")
        );
        assert_eq!(
            base.add_option(DropdownOption::new("form", "Syrup (bottle)", "syrup"))
                .unwrap_err(),
            ValidationError::Duplicate {
                field: "form".to_string(),
                value: "syrup".to_string(),
            }
        );
        // Same value under another field is fine.
        assert!(base
            .add_option(DropdownOption::new("strength", "Syrup", "syrup"))
            .is_ok());
    }

    #[test]
    fn test_add_option_creates_field() {
        let next = catalog()
            .add_option(DropdownOption::new("route", "Oral", "oral"))
            .unwrap();
        assert_eq!(next.options("route").len(), 1);
        assert_eq!(next.fields().collect::<Vec<_>>(), vec!["form", "route", "strength"]);
    }

    #[test]
    fn test_update_option_by_id() {
        let next = catalog().update_option(saved("d2", "form", "Syrup 100ml", "syrup"));
        assert_eq!(next.options("form")[1].label, "Syrup 100ml");

        let untouched = catalog().update_option(saved("zz", "form", "Ghost", "ghost"));
        assert_eq!(untouched, catalog());

        let unsaved = catalog().update_option(DropdownOption::new("form", "X", "x"));
        assert_eq!(unsaved, catalog());
    }

    #[test]
    fn test_remove_option() {
        let next = catalog().remove_option("form", "d1");
        assert_eq!(next.options("form").len(), 1);
        assert_eq!(catalog().remove_option("form", "zz"), catalog());
        assert_eq!(catalog().remove_option("route", "d1"), catalog());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let c = catalog();
        assert_eq!(c.search("form", "TAB").len(), 1);
        assert_eq!(c.search("form", "").len(), 2);
        assert!(c.search("form", "cream").is_empty());
        assert!(c.search("route", "oral").is_empty());
    }
}
