//! # State Module
//!
//! Separate state types rather than one `AppState`: each screen declares
//! exactly the slices it touches, and independent slices never contend for
//! the same lock.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌────────────────┐ ┌────────────────┐ ┌──────────────┐ ┌─────────────┐ │
//! │  │ InventoryState │ │   CartState    │ │  SalesState  │ │DropdownState│ │
//! │  │                │ │                │ │              │ │             │ │
//! │  │ Arc<Mutex<     │ │ Arc<Mutex<     │ │ Arc<Mutex<   │ │ Arc<Mutex<  │ │
//! │  │  medicineId →  │ │   Cart         │ │  Vec<Monthly │ │  Dropdown   │ │
//! │  │  Vec<Lot>>>    │ │ >>             │ │  Group>>>    │ │  Catalog>>  │ │
//! │  └────────────────┘ └────────────────┘ └──────────────┘ └─────────────┘ │
//! │                                                                         │
//! │  ┌────────────────┐ ┌───────────────────┐                               │
//! │  │ MedicineState  │ │ NotificationState │                               │
//! │  │ Arc<Mutex<     │ │ Arc<Mutex<        │                               │
//! │  │  Medicine      │ │  Notification     │                               │
//! │  │  Catalog>>     │ │  Feed>>           │                               │
//! │  └────────────────┘ └───────────────────┘                               │
//! │                                                                         │
//! │  ┌────────────────┐                                                     │
//! │  │  ConfigState   │  read-only after startup, no lock                   │
//! │  └────────────────┘                                                     │
//! │                                                                         │
//! │  Each write locks, calls a pure pharmacy-core function on the stored    │
//! │  value, and stores the result.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod config;
mod dropdown;
mod inventory;
mod medicine;
mod notification;
mod sales;

pub use cart::{Cart, CartState};
pub use config::ConfigState;
pub use dropdown::DropdownState;
pub use inventory::InventoryState;
pub use medicine::MedicineState;
pub use notification::NotificationState;
pub use sales::SalesState;
