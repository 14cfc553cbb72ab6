//! # Workflow Request Types
//!
//! Input DTOs for the four write workflows, exactly as the presentation/IPC
//! layer submits them. Quantities arrive as the operator entered them; sign
//! normalization happens in [`crate::validation`], not at the boundary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::quantity::Quantity;
use crate::types::MovementType;

// =============================================================================
// Adjustment
// =============================================================================

/// A manual stock adjustment as entered in the adjustment form.
///
/// `quantity` is the signed value the operator typed; for the fixed-sign
/// movement types only its magnitude is honored.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentRequest {
    pub product_id: i64,

    /// Defaults to the engine's configured location when absent.
    pub location_id: Option<i64>,

    pub movement_type: MovementType,
    pub quantity: Quantity,
    pub reason: Option<String>,
    pub user_id: i64,

    /// Batch expiry hint; only valid on stock additions.
    #[ts(as = "Option<String>")]
    pub expiry_date: Option<NaiveDate>,
}

// =============================================================================
// Purchase Receiving
// =============================================================================

/// One received line of a goods receipt.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveLine {
    /// Purchase-order item this receipt applies to.
    pub item_id: i64,

    /// Received now, not cumulative. Must lie in [0, remaining].
    pub received_quantity: Quantity,

    #[ts(as = "Option<String>")]
    pub expiry_date: Option<NaiveDate>,
}

/// A goods receipt against a purchase order; partial and repeated receipts
/// are expected.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveGoodsRequest {
    pub purchase_order_id: i64,
    pub lines: Vec<ReceiveLine>,
    pub user_id: i64,

    /// Defaults to the engine's configured location when absent.
    pub location_id: Option<i64>,
}

// =============================================================================
// Stock Transfer
// =============================================================================

/// One requested product line on a new transfer.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TransferDraftItem {
    pub product_id: i64,
    pub quantity: Quantity,
    pub notes: Option<String>,
}

/// A new transfer request. Creating one moves no inventory; it is a
/// reservation of intent only.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TransferDraft {
    pub from_location_id: i64,
    pub to_location_id: i64,
    pub items: Vec<TransferDraftItem>,
    pub notes: Option<String>,
    pub requested_by: i64,
}

/// Received quantity reported for one transfer item at completion.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TransferReceiptLine {
    pub item_id: i64,
    pub received_quantity: Quantity,
}

/// Completion request for a transfer. The form clamps received quantities to
/// [0, requested]; the workflow re-validates the clamp server-side.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TransferReceipt {
    pub transfer_id: i64,
    pub lines: Vec<TransferReceiptLine>,
    pub completed_by: i64,
}
