//! # pharmacy-core: Pure Business Logic for the Pharmacy Dashboard
//!
//! This crate holds the two algorithms the dashboard cannot get wrong: lot
//! reconciliation when stock is added, and cart pricing when a sale is
//! made. Everything here is a pure function over immutable snapshots.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Pharmacy Dashboard Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Dashboard UI                                 │   │
//! │  │   Add Stock ──► Inventory ──► Sell ──► Invoice ──► History      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              pharmacy-state (state container)                   │   │
//! │  │   InventoryState, CartState, SalesState, MedicineState, ...     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ pharmacy-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ reconcile │  │   cart    │  │  invoice  │  │  history  │  │   │
//! │  │   │ lots ◄─── │  │  pricing  │  │    GST    │  │  monthly  │  │   │
//! │  │   │  upsert   │  │ discounts │  │  records  │  │  groups   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO SHARED STATE • PURE FUNCTIONS       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Lots, cart lines, sale records
//! - [`money`] - Integer money in paise, serialized as rupees
//! - [`reconcile`] - Batch reconciler
//! - [`cart`] - Cart operations and discount pricing
//! - [`invoice`] - GST totals, create-sale request, committed records
//! - [`history`] - Monthly sale grouping
//! - [`stock`] - Low-stock and expiry views
//! - [`dropdown`] - Configurable option lists
//! - [`medicine`] - Medicine master list, search hits, selection
//! - [`notification`] - Notification feed and unread badge
//! - [`error`], [`validation`] - Typed errors and boundary checks
//!
//! ## Example Usage
//!
//! ```rust
//! use pharmacy_core::{reconcile, LotUpsert};
//!
//! let mut upsert = LotUpsert::for_medicine("M1");
//! upsert.batch_number = Some("B1".to_string());
//! upsert.quantity_in_stock = Some(5);
//!
//! let lots = reconcile(&[], &upsert).unwrap();
//! assert_eq!(lots.len(), 1);
//! assert_eq!(lots[0].quantity_in_stock, 5);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod dropdown;
pub mod error;
pub mod history;
pub mod invoice;
pub mod medicine;
pub mod money;
pub mod notification;
pub mod reconcile;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{CartTotals, DiscountMode};
pub use error::{CoreError, CoreResult, ValidationError};
pub use invoice::{InvoiceTotals, SaleRequest};
pub use medicine::{MedicineCatalog, MedicineRecord};
pub use money::Money;
pub use notification::{Notification, NotificationCount, NotificationFeed};
pub use reconcile::{reconcile, MatchMode, Reconciler};
pub use stock::StockSummary;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Days ahead of expiry at which a lot starts showing on the alert screen.
pub const DEFAULT_EXPIRY_WARNING_DAYS: u32 = 90;
