//! # Domain Types
//!
//! Core domain records shared by the reconciler, the sale calculator and the
//! state container.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  InventoryLot   │   │    CartLine     │   │   SaleRecord    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  medicineId     │   │  medicine ──────┼─► │  invoiceId      │       │
//! │  │  batchNumber    │   │  quantity       │   │  totalAmount    │       │
//! │  │  expiryDate     │   │  discount (%)   │   │  createdAt      │       │
//! │  │  mrp, prices    │   └─────────────────┘   │  items[]        │       │
//! │  │  quantityInStock│                          └────────┬────────┘       │
//! │  └────────▲────────┘                                   │                │
//! │           │ reconcile                                  ▼                │
//! │  ┌────────┴────────┐                          ┌─────────────────┐       │
//! │  │   LotUpsert     │                          │  MonthlyGroup   │       │
//! │  │ (all optional)  │                          │  year, month    │       │
//! │  └─────────────────┘                          └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names follow the REST payloads exactly (`medicineId`,
//! `batchNumber`, `expiryDate`, `mrp`, ...). Shape checks happen here, at
//! deserialization; the algorithms never see loosely-typed data.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

use crate::money::Money;
use crate::validation::parse_lot_date;

// =============================================================================
// Percentage
// =============================================================================

/// A percentage in basis points, always within `[0%, 100%]`.
///
/// ## Why Basis Points?
/// 1 basis point = 0.01%, so 12.5% is stored exactly as 1250 and every
/// discount or GST calculation stays in integer math.
///
/// Construction clamps: a -5% discount becomes 0%, a 150% discount becomes
/// 100%. This is how out-of-range percentages are handled throughout the
/// cart, never by rejecting them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Percentage(u32);

impl Percentage {
    /// 100% in basis points.
    pub const FULL_BPS: u32 = 10_000;

    /// Creates a percentage from basis points, clamped to 100%.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        if bps > Self::FULL_BPS {
            Percentage(Self::FULL_BPS)
        } else {
            Percentage(bps)
        }
    }

    /// Creates a percentage from a percent value, clamped to `[0, 100]`.
    /// NaN is treated as 0.
    ///
    /// ## Example
    /// ```rust
    /// use pharmacy_core::types::Percentage;
    ///
    /// assert_eq!(Percentage::from_percent(12.5).bps(), 1250);
    /// assert_eq!(Percentage::from_percent(-3.0).bps(), 0);
    /// assert_eq!(Percentage::from_percent(250.0).bps(), 10_000);
    /// ```
    pub fn from_percent(pct: f64) -> Self {
        if pct.is_nan() || pct <= 0.0 {
            return Percentage(0);
        }
        if pct >= 100.0 {
            return Percentage(Self::FULL_BPS);
        }
        Percentage((pct * 100.0).round() as u32)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percent (for display only).
    #[inline]
    pub fn percent(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Percentage(0)
    }

    #[inline]
    pub const fn full() -> Self {
        Percentage(Self::FULL_BPS)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

/// On the wire a percentage is a plain percent number (`18`, `12.5`).
impl Serialize for Percentage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % 100 == 0 {
            serializer.serialize_u32(self.0 / 100)
        } else {
            serializer.serialize_f64(self.percent())
        }
    }
}

impl<'de> Deserialize<'de> for Percentage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pct = f64::deserialize(deserializer)?;
        Ok(Percentage::from_percent(pct))
    }
}

// =============================================================================
// Inventory Lot
// =============================================================================

/// One physical batch of a medicine on a shelf.
///
/// Lots are treated as immutable values: the reconciler never edits one in
/// place, it builds a new record and either puts it in an existing slot or
/// appends it.
///
/// `minimum_stock_level` is a reorder hint for the stock screens only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InventoryLot {
    /// Owning medicine.
    pub medicine_id: String,

    /// Supplier batch code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_number: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_date"
    )]
    #[ts(as = "Option<String>")]
    pub expiry_date: Option<NaiveDate>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_date"
    )]
    #[ts(as = "Option<String>")]
    pub manufacture_date: Option<NaiveDate>,

    /// Printed maximum retail price.
    #[serde(default)]
    #[ts(type = "number")]
    pub mrp: Money,

    #[serde(default)]
    #[ts(type = "number")]
    pub purchase_price: Money,

    #[serde(default)]
    #[ts(type = "number")]
    pub selling_price: Money,

    #[serde(default)]
    pub quantity_in_stock: i64,

    #[serde(default)]
    pub minimum_stock_level: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shelf_location: Option<String>,
}

impl InventoryLot {
    /// Creates an empty lot for a medicine: no batch, no dates, zero prices.
    pub fn new(medicine_id: impl Into<String>) -> Self {
        InventoryLot {
            medicine_id: medicine_id.into(),
            batch_number: None,
            expiry_date: None,
            manufacture_date: None,
            mrp: Money::zero(),
            purchase_price: Money::zero(),
            selling_price: Money::zero(),
            quantity_in_stock: 0,
            minimum_stock_level: 0,
            shelf_location: None,
        }
    }

    /// True once the lot's expiry date is on or before `today`.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date.is_some_and(|expiry| expiry <= today)
    }
}

// =============================================================================
// Lot Upsert
// =============================================================================

/// A partially-populated lot, as sent by the add/update stock form.
///
/// Every field is optional on the wire. `medicine_id` is still mandatory
/// for reconciliation; its absence is reported as a validation error rather
/// than a decode error so the dashboard can show a proper message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LotUpsert {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medicine_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_number: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_date"
    )]
    #[ts(as = "Option<String>")]
    pub expiry_date: Option<NaiveDate>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_date"
    )]
    #[ts(as = "Option<String>")]
    pub manufacture_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub mrp: Option<Money>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub purchase_price: Option<Money>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub selling_price: Option<Money>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity_in_stock: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_stock_level: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shelf_location: Option<String>,
}

impl LotUpsert {
    /// Starts an upsert for a medicine.
    pub fn for_medicine(medicine_id: impl Into<String>) -> Self {
        LotUpsert {
            medicine_id: Some(medicine_id.into()),
            ..LotUpsert::default()
        }
    }

    /// Converts to a lot as-is: unset optional fields stay unset and unset
    /// numbers become zero. No backfill happens here.
    pub fn into_lot(self, medicine_id: String) -> InventoryLot {
        InventoryLot {
            medicine_id,
            batch_number: self.batch_number,
            expiry_date: self.expiry_date,
            manufacture_date: self.manufacture_date,
            mrp: self.mrp.unwrap_or_default(),
            purchase_price: self.purchase_price.unwrap_or_default(),
            selling_price: self.selling_price.unwrap_or_default(),
            quantity_in_stock: self.quantity_in_stock.unwrap_or(0),
            minimum_stock_level: self.minimum_stock_level.unwrap_or(0),
            shelf_location: self.shelf_location,
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The slice of a medicine the cart needs.
///
/// ## Canonical Price
/// `mrp` is the line price. Older medicine payloads only carry
/// `sellingPrice`; it is read as a stand-in when `mrp` is missing and is
/// never combined with `mrp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MedicineRef {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub mrp: Option<Money>,

    /// Deprecated alias of `mrp`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub selling_price: Option<Money>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub purchase_price: Option<Money>,
}

impl MedicineRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>, mrp: Money) -> Self {
        MedicineRef {
            id: id.into(),
            name: name.into(),
            mrp: Some(mrp),
            selling_price: None,
            purchase_price: None,
        }
    }

    /// Unit price used for every cart computation.
    pub fn unit_price(&self) -> Money {
        match self.mrp {
            Some(mrp) => mrp,
            None => self.selling_price.unwrap_or_default(),
        }
    }
}

fn default_quantity() -> i64 {
    1
}

/// One medicine in the sale being composed. Lives only in the dashboard
/// between "add to cart" and "submit sale".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLine {
    pub medicine: MedicineRef,

    /// Always >= 1 when produced by the cart operations.
    #[serde(default = "default_quantity")]
    pub quantity: i64,

    /// Per-line discount percent, only read in manual discount mode.
    /// Stored raw; clamped when priced.
    #[serde(default)]
    pub discount: f64,
}

impl CartLine {
    pub fn new(medicine: MedicineRef) -> Self {
        CartLine {
            medicine,
            quantity: 1,
            discount: 0.0,
        }
    }

    #[inline]
    pub fn medicine_id(&self) -> &str {
        &self.medicine.id
    }

    /// Unit price × quantity, before any discount.
    pub fn line_value(&self) -> Money {
        self.medicine.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Sales
// =============================================================================

/// Who a sale was made to. Both fields are optional for walk-in customers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CustomerInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_contact: Option<String>,
}

/// A line item frozen at the time of sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleLineItem {
    pub medicine_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub quantity: i64,

    /// Unit price at time of sale.
    #[ts(type = "number")]
    pub price: Money,

    /// price × quantity.
    #[ts(type = "number")]
    pub total: Money,
}

/// A committed transaction. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleRecord {
    pub invoice_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_contact: Option<String>,

    #[ts(type = "number")]
    pub total_amount: Money,

    /// Kept in the offset the backend sent it in.
    #[ts(as = "String")]
    pub created_at: DateTime<FixedOffset>,

    #[serde(default)]
    pub items: Vec<SaleLineItem>,
}

impl SaleRecord {
    /// `(year, month)` of the sale, month in 1..=12, read directly from
    /// the timestamp's own offset.
    pub fn year_month(&self) -> (i32, u32) {
        (self.created_at.year(), self.created_at.month())
    }
}

/// Sales of one calendar month, as shown on the sale history page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MonthlyGroup {
    pub year: i32,
    pub month: u32,

    /// Running sum of `totalAmount` over `sales`.
    #[ts(type = "number")]
    pub total_transaction: Money,

    pub sales: Vec<SaleRecord>,
}

// =============================================================================
// Serde Helpers
// =============================================================================

/// Accepts `null`, `""`, `YYYY-MM-DD` or a full RFC 3339 timestamp.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_lot_date(s).map(Some).map_err(de::Error::custom),
    }
}
