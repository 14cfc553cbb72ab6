//! # Purchase Receiving Workflow
//!
//! Settles a goods receipt against its purchase-order lines: increments
//! each line's accumulated receipts and applies one positive purchase
//! movement per received line, all in one transaction.
//!
//! ## Flow
//! ```text
//! ReceiveGoodsRequest { purchase_order_id, lines[], user, location? }
//!      │
//!      ├── load each order line; verify it belongs to the order
//!      ├── reject any line outside [0, remaining]   (never clamp silently)
//!      ├── drop zero lines; reject if nothing would be received
//!      │
//!      ├── BEGIN ──┐  per line:
//!      │           │    add_received(+qty)         CHECK-backstopped
//!      │           │    apply_in_tx(purchase leg)  +qty @ location,
//!      │           │                               reference = line id,
//!      │           │                               expiry date recorded
//!      │  COMMIT ──┘  all lines land or none do
//!      │
//!      └── ReceiveGoodsResult { movements, items, fully_received }
//! ```
//!
//! Partial and repeated receipts are the normal case; `remaining` shrinks
//! with each receipt and over-receiving is rejected, not clamped, so a
//! keying error is surfaced instead of silently absorbed.

use std::collections::HashSet;

use serde::Serialize;
use tracing::info;
use ts_rs::TS;

use pantry_core::validation::check_received_range;
use pantry_core::{
    CoreError, MovementType, PurchaseOrderItem, Quantity, ReceiveGoodsRequest, StockMovement,
    ValidationError,
};
use pantry_db::{DbError, Ledger, NewMovement, PurchaseRepository};

use crate::error::ApiResult;
use crate::InventoryEngine;

/// Outcome of a goods receipt.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveGoodsResult {
    /// One purchase movement per non-zero received line.
    pub movements: Vec<StockMovement>,

    /// All lines of the order, with updated received quantities.
    pub items: Vec<PurchaseOrderItem>,

    /// Every line of the order is now fully received.
    pub fully_received: bool,
}

impl InventoryEngine {
    /// Records a goods receipt against a purchase order.
    ///
    /// ## Validation
    /// - Every line must reference a line of the given order
    /// - Every received quantity must lie in [0, remaining] for its line;
    ///   out-of-range input is rejected, never clamped
    /// - At least one line must receive more than zero
    ///
    /// ## Atomicity
    /// Line increments and their purchase movements commit together; a
    /// mid-batch failure leaves no partial receipt behind.
    ///
    /// ## Errors
    /// - `NOT_FOUND` - order line does not exist
    /// - `VALIDATION_ERROR` - wrong order, out-of-range or all-zero receipt
    pub async fn receive_goods(&self, req: &ReceiveGoodsRequest) -> ApiResult<ReceiveGoodsResult> {
        if req.lines.is_empty() {
            return Err(ValidationError::EmptyItems.into());
        }

        let location_id = req.location_id.unwrap_or(self.config.default_location_id);
        let purchases = self.db.purchases();

        // Load and validate every line up front; reject the whole batch on
        // the first bad line so nothing is written.
        let mut seen = HashSet::new();
        let mut to_apply = Vec::new();

        for line in &req.lines {
            if !seen.insert(line.item_id) {
                return Err(ValidationError::Required {
                    field: "lines (duplicate item)",
                }
                .into());
            }

            let item = purchases
                .get_item(line.item_id)
                .await?
                .ok_or(CoreError::PurchaseItemNotFound(line.item_id))?;

            if item.purchase_order_id != req.purchase_order_id {
                return Err(ValidationError::Required {
                    field: "lines (item belongs to another order)",
                }
                .into());
            }

            check_received_range(line.received_quantity, item.remaining())?;

            if line.received_quantity.is_zero() {
                continue;
            }

            to_apply.push((item, line.received_quantity, line.expiry_date));
        }

        if to_apply.is_empty() {
            return Err(ValidationError::NothingReceived.into());
        }

        // One transaction for the whole receipt.
        let mut tx = self
            .db
            .pool()
            .begin()
            .await
            .map_err(DbError::from)
            .map_err(crate::ApiError::from)?;

        let mut movements = Vec::with_capacity(to_apply.len());

        for (item, received, expiry_date) in &to_apply {
            PurchaseRepository::add_received(&mut *tx, item.id, *received).await?;

            let movement = NewMovement {
                product_id: item.product_id,
                location_id,
                movement_type: MovementType::Purchase,
                quantity: *received,
                reason: None,
                user_id: req.user_id,
                reference_id: Some(item.id),
                expiry_date: *expiry_date,
            };

            let (_, record) = Ledger::apply_in_tx(&mut *tx, &movement).await?;
            movements.push(record);
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))
            .map_err(crate::ApiError::from)?;

        let items = purchases.items_for_order(req.purchase_order_id).await?;
        let fully_received = items.iter().all(|i| i.remaining() == Quantity::zero());

        info!(
            purchase_order_id = req.purchase_order_id,
            lines = movements.len(),
            fully_received,
            "Goods receipt recorded"
        );

        Ok(ReceiveGoodsResult {
            movements,
            items,
            fully_received,
        })
    }
}
