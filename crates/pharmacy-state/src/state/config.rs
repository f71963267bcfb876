//! # Configuration State
//!
//! Stores application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`PHARMACY_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use pharmacy_core::validation::validate_percent;
use pharmacy_core::{DiscountMode, MatchMode, Money, Percentage, DEFAULT_EXPIRY_WARNING_DAYS};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Store name (printed on invoices)
    pub store_name: String,

    /// Currency code (ISO 4217)
    pub currency_code: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// GST applied to invoices, after discount
    pub gst_rate: Percentage,

    /// Discount mode a fresh cart starts in
    pub discount_mode: DiscountMode,

    /// How upserts are matched against existing lots
    pub match_mode: MatchMode,

    /// Days before expiry at which lots are flagged
    pub expiry_warning_days: u32,
}

impl Default for ConfigState {
    /// Returns default configuration suitable for development.
    ///
    /// ## Default Values
    /// - Store: "Pharmacy Dev Store"
    /// - Currency: INR (₹)
    /// - GST: 0%
    /// - Discount: overall, 0%
    /// - Matching: batch number + expiry
    /// - Expiry warning: 90 days
    fn default() -> Self {
        ConfigState {
            store_name: "Pharmacy Dev Store".to_string(),
            currency_code: "INR".to_string(),
            currency_symbol: "₹".to_string(),
            gst_rate: Percentage::zero(),
            discount_mode: DiscountMode::default(),
            match_mode: MatchMode::default(),
            expiry_warning_days: DEFAULT_EXPIRY_WARNING_DAYS,
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `PHARMACY_STORE_NAME`: Override store name
    /// - `PHARMACY_CURRENCY_SYMBOL`: Override currency symbol
    /// - `PHARMACY_GST_RATE`: GST percent (e.g., "18")
    /// - `PHARMACY_DISCOUNT_MODE`: `overall` or `manual`
    /// - `PHARMACY_MATCH_MODE`: `batch` or `medicine`
    /// - `PHARMACY_EXPIRY_WARNING_DAYS`: Expiry alert window in days
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Bad values are logged
    /// and the default is kept.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ConfigState::default();

        if let Some(store_name) = lookup("PHARMACY_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Some(symbol) = lookup("PHARMACY_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if let Some(raw) = lookup("PHARMACY_GST_RATE") {
            let parsed = raw
                .trim()
                .parse::<f64>()
                .map_err(|e| e.to_string())
                .and_then(|pct| validate_percent("gst rate", pct).map_err(|e| e.to_string()));
            match parsed {
                Ok(pct) => config.gst_rate = Percentage::from_percent(pct),
                Err(error) => warn!(value = %raw, %error, "Ignoring PHARMACY_GST_RATE"),
            }
        }

        if let Some(raw) = lookup("PHARMACY_DISCOUNT_MODE") {
            match raw.parse::<DiscountMode>() {
                Ok(mode) => config.discount_mode = mode,
                Err(error) => warn!(value = %raw, %error, "Ignoring PHARMACY_DISCOUNT_MODE"),
            }
        }

        if let Some(raw) = lookup("PHARMACY_MATCH_MODE") {
            match raw.parse::<MatchMode>() {
                Ok(mode) => config.match_mode = mode,
                Err(error) => warn!(value = %raw, %error, "Ignoring PHARMACY_MATCH_MODE"),
            }
        }

        if let Some(raw) = lookup("PHARMACY_EXPIRY_WARNING_DAYS") {
            match raw.trim().parse::<u32>() {
                Ok(days) => config.expiry_warning_days = days,
                Err(error) => {
                    warn!(value = %raw, %error, "Ignoring PHARMACY_EXPIRY_WARNING_DAYS")
                }
            }
        }

        config
    }

    /// Formats an amount for display.
    ///
    /// ## Example
    /// ```rust
    /// use pharmacy_core::Money;
    /// use pharmacy_state::ConfigState;
    ///
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(Money::from_minor_units(1234)), "₹12.34");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let minor = amount.minor_units();
        format!(
            "{}{}{}.{:02}",
            if minor < 0 { "-" } else { "" },
            self.currency_symbol,
            amount.major().abs(),
            amount.minor_part()
        )
    }
}
