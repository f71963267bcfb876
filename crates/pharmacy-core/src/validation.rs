//! # Validation Module
//!
//! Boundary checks for pharmacy-core.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Dashboard forms                                              │
//! │  ├── Ranges (prices >= 0, discount 0-100)                              │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Deserialization (types.rs)                                   │
//! │  └── Shapes, dates, money                                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: THIS MODULE                                                  │
//! │  └── Identifying fields only (medicine id, batch number)               │
//! │                                                                         │
//! │  Numeric ranges are NOT re-checked by the reconciler.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate};

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Returns the trimmed identifier, or `Required` if it is missing or blank.
///
/// ## Example
/// ```rust
/// use pharmacy_core::validation::require_identifier;
///
/// assert_eq!(require_identifier(Some(" M1 "), "medicine id").unwrap(), "M1");
/// assert!(require_identifier(Some("   "), "medicine id").is_err());
/// assert!(require_identifier(None, "batch number").is_err());
/// ```
pub fn require_identifier<'a>(value: Option<&'a str>, field: &str) -> ValidationResult<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::required(field)),
    }
}

/// Treats a blank string the same as a missing one.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parses a lot date sent by the backend.
///
/// Both plain dates and full timestamps appear in REST bodies. For a
/// timestamp the calendar date in its own offset is kept.
///
/// ## Example
/// ```rust
/// use pharmacy_core::validation::parse_lot_date;
/// use chrono::NaiveDate;
///
/// let d = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
/// assert_eq!(parse_lot_date("2025-01-01").unwrap(), d);
/// assert_eq!(parse_lot_date("2025-01-01T00:00:00.000Z").unwrap(), d);
/// assert!(parse_lot_date("01/01/2025").is_err());
/// ```
pub fn parse_lot_date(raw: &str) -> ValidationResult<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.date_naive())
        .map_err(|_| ValidationError::InvalidFormat {
            field: "date".to_string(),
            reason: format!("'{}' is neither YYYY-MM-DD nor an RFC 3339 timestamp", raw),
        })
}

/// Strict percent check, for configuration values typed by an operator.
///
/// Cart percentages are clamped instead; this is only for settings where a
/// typo should be reported rather than silently capped.
pub fn validate_percent(field: &str, pct: f64) -> ValidationResult<f64> {
    if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: 100,
        });
    }
    Ok(pct)
}
