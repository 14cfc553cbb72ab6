//! # Domain Types
//!
//! Core domain types for the inventory ledger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌───────────────────┐   ┌───────────────────┐   ┌──────────────────┐  │
//! │  │ InventorySnapshot │   │  StockMovement    │   │  StockTransfer   │  │
//! │  │  ───────────────  │   │  ───────────────  │   │  ──────────────  │  │
//! │  │  product_id       │   │  id (UUID)        │   │  id              │  │
//! │  │  location_id      │   │  movement_type    │   │  transfer_number │  │
//! │  │  quantity         │   │  quantity (signed)│   │  status          │  │
//! │  │  reorder_level    │   │  reference_id     │   │  items[]         │  │
//! │  └───────────────────┘   └───────────────────┘   └──────────────────┘  │
//! │                                                                         │
//! │  ┌───────────────────┐   ┌───────────────────┐   ┌──────────────────┐  │
//! │  │   MovementType    │   │  TransferStatus   │   │   StockStatus    │  │
//! │  │  ───────────────  │   │  ───────────────  │   │  ──────────────  │  │
//! │  │  Adjustment ±     │   │  Pending          │   │  InStock         │  │
//! │  │  Purchase   +     │   │  InTransit        │   │  LowStock        │  │
//! │  │  Damage     −     │   │  Completed ◄stop  │   │  OutOfStock      │  │
//! │  │  Expiry     −     │   │  Cancelled ◄stop  │   └──────────────────┘  │
//! │  │  Transfer   ±     │   └───────────────────┘                         │
//! │  └───────────────────┘                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariant
//! For every (product, location): `snapshot.quantity` equals the sum of all
//! `StockMovement.quantity` values for that key. The snapshot is the only
//! read-side source of truth for current stock; history is for audit.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::quantity::Quantity;

// =============================================================================
// Movement Type
// =============================================================================

/// The kind of stock movement, with a fixed sign convention per variant.
///
/// ## Sign Convention
/// ```text
/// purchase    → always +   (goods received)
/// damage      → always −   (write-off)
/// expiry      → always −   (write-off)
/// adjustment  → as entered (the only bidirectional correction)
/// transfer    → as entered (− at source, + at destination)
/// ```
///
/// Modeled as a closed enum so the sign rule is exhaustive and
/// compiler-checked rather than a runtime string switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    /// Manual correction, either direction.
    Adjustment,
    /// Goods received against a purchase order.
    Purchase,
    /// Damaged stock written off.
    Damage,
    /// Expired stock written off.
    Expiry,
    /// Inter-location transfer leg.
    Transfer,
}

impl MovementType {
    /// Applies the per-type sign convention to a caller-entered quantity.
    ///
    /// The caller-entered sign is authoritative only for `Adjustment` and
    /// `Transfer`. For the fixed-sign types the magnitude is taken and the
    /// sign forced, so `damage` with `-20` still yields `-20` (never `+20`,
    /// never doubled).
    ///
    /// ## Example
    /// ```rust
    /// use pantry_core::{MovementType, Quantity};
    ///
    /// let q = Quantity::from_units(5);
    /// assert_eq!(MovementType::Damage.normalize(q), Quantity::from_units(-5));
    /// assert_eq!(MovementType::Damage.normalize(-q), Quantity::from_units(-5));
    /// assert_eq!(MovementType::Purchase.normalize(-q), Quantity::from_units(5));
    /// assert_eq!(MovementType::Adjustment.normalize(-q), Quantity::from_units(-5));
    /// ```
    pub fn normalize(&self, entered: Quantity) -> Quantity {
        match self {
            MovementType::Purchase => entered.abs(),
            MovementType::Damage | MovementType::Expiry => entered.abs().negated(),
            MovementType::Adjustment | MovementType::Transfer => entered,
        }
    }

    /// Whether an expiry date may be attached to a movement of this type.
    ///
    /// Only stock *additions* create a batch that can expire later:
    /// purchases, and positive adjustments. Write-offs and deductions never
    /// carry one.
    pub fn allows_expiry_date(&self, normalized: Quantity) -> bool {
        match self {
            MovementType::Purchase => true,
            MovementType::Adjustment => normalized.is_positive(),
            _ => false,
        }
    }

    /// Stable lowercase name, matching the database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Adjustment => "adjustment",
            MovementType::Purchase => "purchase",
            MovementType::Damage => "damage",
            MovementType::Expiry => "expiry",
            MovementType::Transfer => "transfer",
        }
    }
}

impl std::fmt::Display for MovementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Transfer Status
// =============================================================================

/// Lifecycle state of a stock transfer.
///
/// ## State Machine
/// ```text
///   pending ──► in_transit ──► completed
///      │             │
///      └─────┬───────┘
///            ▼
///        cancelled
/// ```
/// Transitions are one-way; `completed` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    /// Requested; a reservation of intent, no inventory moved yet.
    Pending,
    /// Dispatched from the source location; still no inventory movement.
    InTransit,
    /// Received at the destination; both ledger legs applied.
    Completed,
    /// Aborted before completion; no inventory ever moved.
    Cancelled,
}

impl TransferStatus {
    /// Whether this state accepts no further transitions.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, TransferStatus::Completed | TransferStatus::Cancelled)
    }

    /// Whether the transfer may be dispatched (pending → in_transit).
    #[inline]
    pub const fn can_dispatch(&self) -> bool {
        matches!(self, TransferStatus::Pending)
    }

    /// Whether the transfer may be completed.
    #[inline]
    pub const fn can_complete(&self) -> bool {
        matches!(self, TransferStatus::Pending | TransferStatus::InTransit)
    }

    /// Whether the transfer may be cancelled.
    #[inline]
    pub const fn can_cancel(&self) -> bool {
        matches!(self, TransferStatus::Pending | TransferStatus::InTransit)
    }

    /// Stable snake_case name, matching the database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStatus::Pending => "pending",
            TransferStatus::InTransit => "in_transit",
            TransferStatus::Completed => "completed",
            TransferStatus::Cancelled => "cancelled",
        }
    }
}

impl Default for TransferStatus {
    fn default() -> Self {
        TransferStatus::Pending
    }
}

impl std::fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Stock Status
// =============================================================================

/// Derived stock classification for alerting and listing.
///
/// Always computed from the current snapshot, never by replaying movement
/// history: reads stay O(1) per product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// quantity > reorder_level
    InStock,
    /// 0 < quantity ≤ reorder_level
    LowStock,
    /// quantity ≤ 0
    OutOfStock,
}

impl StockStatus {
    /// Classifies a snapshot quantity against its reorder level.
    ///
    /// ## Example
    /// ```rust
    /// use pantry_core::{Quantity, StockStatus};
    ///
    /// let reorder = Quantity::from_units(20);
    /// assert_eq!(
    ///     StockStatus::classify(Quantity::from_units(15), reorder),
    ///     StockStatus::LowStock
    /// );
    /// assert_eq!(
    ///     StockStatus::classify(Quantity::zero(), reorder),
    ///     StockStatus::OutOfStock
    /// );
    /// ```
    pub fn classify(quantity: Quantity, reorder_level: Quantity) -> Self {
        if !quantity.is_positive() {
            StockStatus::OutOfStock
        } else if quantity <= reorder_level {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product, referenced by the ledger by integer id.
///
/// The catalog subsystem owns products; the ledger only needs the fields
/// below (name for listing, unit label, reorder default for lazy snapshot
/// creation).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: i64,

    /// Display name shown in stock listings.
    pub name: String,

    /// Unit of measure label ("pcs", "kg", "l").
    pub unit: String,

    /// Default reorder threshold applied when a snapshot is created lazily.
    pub default_reorder_level: Quantity,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Inventory Snapshot
// =============================================================================

/// Current on-hand quantity for one (product, location) pair.
///
/// Created lazily on first movement; mutated only by the ledger core; never
/// deleted while the product exists. May go negative when the engine is
/// configured with `allow_negative_stock` (a confirmed business rule, not a
/// bug).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InventorySnapshot {
    pub product_id: i64,
    pub location_id: i64,

    /// Signed on-hand quantity. Equals the sum of all movements for the key.
    pub quantity: Quantity,

    /// Low-stock threshold (≥ 0).
    pub reorder_level: Quantity,

    #[ts(as = "String")]
    pub last_updated: DateTime<Utc>,
}

impl InventorySnapshot {
    /// Classifies this snapshot for alerting.
    #[inline]
    pub fn status(&self) -> StockStatus {
        StockStatus::classify(self.quantity, self.reorder_level)
    }
}

// =============================================================================
// Stock Movement
// =============================================================================

/// One immutable, append-only quantity change.
///
/// Never updated or deleted; this is the audit trail. The signed `quantity`
/// already carries the per-type sign convention applied by the workflows.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct StockMovement {
    /// Unique identifier (UUID v4). Movements have no business counter.
    pub id: String,

    pub product_id: i64,
    pub location_id: i64,
    pub movement_type: MovementType,

    /// Signed delta applied to the snapshot.
    pub quantity: Quantity,

    /// Free-text reason, if the operator supplied one.
    pub reason: Option<String>,

    /// Actor who caused the movement.
    pub user_id: i64,

    /// Link to the originating purchase-order item or transfer.
    pub reference_id: Option<i64>,

    /// Batch expiry hint, recorded on stock additions only.
    #[ts(as = "Option<String>")]
    pub expiry_date: Option<NaiveDate>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Stock Transfer
// =============================================================================

/// An inter-location transfer request.
///
/// Uses the dual-key identity pattern: immutable integer `id` for relations,
/// generated `transfer_number` as the human-readable business key.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct StockTransfer {
    pub id: i64,

    /// Generated business key, e.g. `TRF-20260830-0421`.
    pub transfer_number: String,

    pub from_location_id: i64,
    pub to_location_id: i64,
    pub status: TransferStatus,
    pub notes: Option<String>,

    pub requested_by: i64,
    pub approved_by: Option<i64>,
    pub completed_by: Option<i64>,

    #[ts(as = "String")]
    pub requested_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub approved_at: Option<DateTime<Utc>>,
    #[ts(as = "Option<String>")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// One product line on a transfer.
///
/// `received_quantity` is recorded at completion; a discrepancy against
/// `quantity` is preserved for audit and never reconciled automatically.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct StockTransferItem {
    pub id: i64,
    pub transfer_id: i64,
    pub product_id: i64,

    /// Requested quantity (> 0). The source deduction always uses this.
    pub quantity: Quantity,

    /// Actually received at the destination (0 until completion).
    pub received_quantity: Quantity,

    pub notes: Option<String>,
}

/// A transfer together with its ordered items, as returned by the read API.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TransferWithItems {
    pub transfer: StockTransfer,
    pub items: Vec<StockTransferItem>,
}

// =============================================================================
// Purchase Order Item
// =============================================================================

/// A line on a purchase order, owned by the purchasing subsystem.
///
/// The receiving workflow only ever increments `received_quantity`; it never
/// decreases it, and never lets accumulated receipts exceed `quantity`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PurchaseOrderItem {
    pub id: i64,
    pub purchase_order_id: i64,
    pub product_id: i64,

    /// Ordered quantity.
    pub quantity: Quantity,

    /// Accumulated receipts to date.
    pub received_quantity: Quantity,
}

impl PurchaseOrderItem {
    /// Outstanding quantity still expected on this line. Never below zero.
    pub fn remaining(&self) -> Quantity {
        let r = self.quantity - self.received_quantity;
        if r.is_negative() {
            Quantity::zero()
        } else {
            r
        }
    }
}

// =============================================================================
// Stock Level (read DTO)
// =============================================================================

/// A snapshot joined to its product, as returned by the stock listing API.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockLevel {
    pub product_id: i64,
    pub product_name: String,
    pub unit: String,
    pub location_id: i64,
    pub quantity: Quantity,
    pub reorder_level: Quantity,
    pub status: StockStatus,
    #[ts(as = "String")]
    pub last_updated: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_normalization_fixed_types() {
        let five = Quantity::from_units(5);

        // Magnitude 5 entered either way: damage is always -5.
        assert_eq!(MovementType::Damage.normalize(five), Quantity::from_units(-5));
        assert_eq!(MovementType::Damage.normalize(-five), Quantity::from_units(-5));
        assert_eq!(MovementType::Expiry.normalize(five), Quantity::from_units(-5));
        assert_eq!(MovementType::Purchase.normalize(-five), five);
    }

    #[test]
    fn test_sign_normalization_preserving_types() {
        let q = Quantity::from_units(-85);
        assert_eq!(MovementType::Adjustment.normalize(q), q);
        assert_eq!(MovementType::Transfer.normalize(q), q);
        assert_eq!(MovementType::Adjustment.normalize(-q), -q);
    }

    #[test]
    fn test_expiry_date_rules() {
        let pos = Quantity::from_units(10);
        let neg = Quantity::from_units(-10);

        assert!(MovementType::Purchase.allows_expiry_date(pos));
        assert!(MovementType::Adjustment.allows_expiry_date(pos));
        assert!(!MovementType::Adjustment.allows_expiry_date(neg));
        assert!(!MovementType::Damage.allows_expiry_date(neg));
        assert!(!MovementType::Transfer.allows_expiry_date(pos));
    }

    #[test]
    fn test_transfer_state_machine() {
        use TransferStatus::*;

        assert!(Pending.can_dispatch());
        assert!(Pending.can_complete());
        assert!(Pending.can_cancel());
        assert!(InTransit.can_complete());
        assert!(InTransit.can_cancel());
        assert!(!InTransit.can_dispatch());

        for terminal in [Completed, Cancelled] {
            assert!(terminal.is_terminal());
            assert!(!terminal.can_dispatch());
            assert!(!terminal.can_complete());
            assert!(!terminal.can_cancel());
        }
    }

    #[test]
    fn test_stock_classification() {
        let reorder = Quantity::from_units(20);

        assert_eq!(
            StockStatus::classify(Quantity::from_units(21), reorder),
            StockStatus::InStock
        );
        // Boundary: exactly at reorder level is low stock.
        assert_eq!(
            StockStatus::classify(reorder, reorder),
            StockStatus::LowStock
        );
        assert_eq!(
            StockStatus::classify(Quantity::from_units(15), reorder),
            StockStatus::LowStock
        );
        // Boundary: zero and negative are out of stock, not low stock.
        assert_eq!(
            StockStatus::classify(Quantity::zero(), reorder),
            StockStatus::OutOfStock
        );
        assert_eq!(
            StockStatus::classify(Quantity::from_units(-10), reorder),
            StockStatus::OutOfStock
        );
    }

    #[test]
    fn test_purchase_item_remaining() {
        let item = PurchaseOrderItem {
            id: 1,
            purchase_order_id: 1,
            product_id: 7,
            quantity: Quantity::from_units(50),
            received_quantity: Quantity::from_units(30),
        };
        assert_eq!(item.remaining(), Quantity::from_units(20));

        let over = PurchaseOrderItem {
            received_quantity: Quantity::from_units(60),
            ..item
        };
        // Remaining is never reported below zero.
        assert_eq!(over.remaining(), Quantity::zero());
    }

    #[test]
    fn test_movement_type_as_str_roundtrips_serde() {
        let json = serde_json::to_string(&MovementType::Expiry).unwrap();
        assert_eq!(json, "\"expiry\"");
        assert_eq!(TransferStatus::InTransit.as_str(), "in_transit");
    }
}
