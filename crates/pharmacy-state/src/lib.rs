//! # pharmacy-state: Dashboard State Container
//!
//! Owns the mutable state of the pharmacy dashboard and runs every
//! read-modify-write on it through pharmacy-core.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Application Startup                               │
//! │                                                                         │
//! │  1. init_tracing() ───────────────────────────────────────────────────► │
//! │     • tracing-subscriber with env filter                                │
//! │     • Default: info,pharmacy=debug, override with RUST_LOG              │
//! │                                                                         │
//! │  2. ConfigState::from_env() ──────────────────────────────────────────► │
//! │     • PHARMACY_* variables over defaults                                │
//! │                                                                         │
//! │  3. Build state objects ──────────────────────────────────────────────► │
//! │     • InventoryState::from_config (match mode, expiry window)           │
//! │     • CartState::new (discount mode)                                    │
//! │     • SalesState, DropdownState, MedicineState, NotificationState       │
//! │                                                                         │
//! │  4. Feed REST bodies through decode_envelope into the states            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use pharmacy_core::LotUpsert;
//! use pharmacy_state::{ConfigState, InventoryState};
//!
//! let config = ConfigState::default();
//! let inventory = InventoryState::from_config(&config);
//!
//! let mut upsert = LotUpsert::for_medicine("M1");
//! upsert.batch_number = Some("B1".to_string());
//! assert_eq!(inventory.apply_upsert(&upsert).unwrap().len(), 1);
//! ```

pub mod envelope;
pub mod error;
pub mod state;

pub use envelope::{decode_envelope, ApiEnvelope};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use state::{
    Cart, CartState, ConfigState, DropdownState, InventoryState, MedicineState, NotificationState,
    SalesState,
};

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,pharmacy=debug";

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=pharmacy_state=trace` - Trace for this crate only
/// - Default: [`DEFAULT_LOG_FILTER`]
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Every state slice, built from one configuration.
#[derive(Debug)]
pub struct AppState {
    pub config: ConfigState,
    pub inventory: InventoryState,
    pub cart: CartState,
    pub sales: SalesState,
    pub dropdowns: DropdownState,
    pub medicines: MedicineState,
    pub notifications: NotificationState,
}

impl AppState {
    pub fn new(config: ConfigState) -> Self {
        AppState {
            inventory: InventoryState::from_config(&config),
            cart: CartState::new(config.discount_mode),
            sales: SalesState::new(),
            dropdowns: DropdownState::new(),
            medicines: MedicineState::new(),
            notifications: NotificationState::new(),
            config,
        }
    }

    /// Checks the cart out with the configured GST and files the sale in
    /// the history.
    pub fn complete_sale(
        &self,
        created_at: chrono::DateTime<chrono::FixedOffset>,
    ) -> ApiResult<pharmacy_core::SaleRecord> {
        let sale = self.cart.checkout(self.config.gst_rate, created_at)?;
        self.sales.record(&sale);
        Ok(sale)
    }
}
