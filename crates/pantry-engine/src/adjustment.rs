//! # Adjustment Workflow
//!
//! Manual stock corrections: recount adjustments, damage and expiry
//! write-offs, and ad-hoc purchase receipts outside a purchase order.
//!
//! ## Flow
//! ```text
//! AdjustmentRequest
//!      │
//!      ├── normalize_adjustment()      sign convention + zero/expiry rules
//!      │
//!      ├── negative-stock policy       reject deductions below zero when
//!      │                               the store disables negative stock
//!      │
//!      ├── ledger.apply_movement()     snapshot delta + audit row, 1 txn
//!      │
//!      └── AdjustmentResult            new snapshot, movement, status,
//!                                      warning flags for the form
//! ```

use serde::Serialize;
use tracing::{info, warn};
use ts_rs::TS;

use pantry_core::validation::normalize_adjustment;
use pantry_core::{
    AdjustmentRequest, InventorySnapshot, Quantity, StockMovement, StockStatus, ValidationError,
};
use pantry_db::{DbError, Ledger, NewMovement};

use crate::error::ApiResult;
use crate::InventoryEngine;

/// Outcome of a stock adjustment, as returned to the form.
///
/// The warning flags let the form surface "stock is now negative" or "stock
/// fell to its reorder level" without re-deriving policy client-side.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentResult {
    pub snapshot: InventorySnapshot,
    pub movement: StockMovement,
    pub status: StockStatus,

    /// On-hand went below zero (allowed, but worth a banner).
    pub went_negative: bool,

    /// On-hand is at or below the reorder threshold.
    pub low_stock: bool,
}

impl InventoryEngine {
    /// Applies one manual stock adjustment.
    ///
    /// ## Validation
    /// - The movement-type sign convention is applied to the entered
    ///   quantity; a normalized zero is rejected
    /// - An expiry date is accepted only on stock additions
    /// - When negative stock is disabled, a deduction that would drive
    ///   on-hand below zero is rejected before any write
    ///
    /// ## Errors
    /// - `NOT_FOUND` - product does not exist
    /// - `VALIDATION_ERROR` - sign/zero/expiry rule, or negative stock
    ///   blocked by policy
    pub async fn adjust_stock(&self, req: &AdjustmentRequest) -> ApiResult<AdjustmentResult> {
        let delta = normalize_adjustment(req)?;
        let location_id = req.location_id.unwrap_or(self.config.default_location_id);

        let movement = NewMovement {
            product_id: req.product_id,
            location_id,
            movement_type: req.movement_type,
            quantity: delta,
            reason: req.reason.clone(),
            user_id: req.user_id,
            reference_id: None,
            expiry_date: req.expiry_date,
        };

        // Deductions need the policy guard inside the write transaction;
        // additions can never go negative and take the plain ledger path
        // (which retries once on a lock conflict).
        let (snapshot, record) = if delta.is_negative() && !self.config.allow_negative_stock {
            self.apply_guarded(&movement).await?
        } else {
            self.db.ledger().apply_movement(&movement).await?
        };

        let status = snapshot.status();
        let went_negative = snapshot.quantity.is_negative();
        let low_stock = status != StockStatus::InStock;

        if went_negative {
            warn!(
                product_id = req.product_id,
                location_id,
                quantity = %snapshot.quantity,
                "Adjustment drove stock negative"
            );
        }

        info!(
            movement_id = %record.id,
            product_id = req.product_id,
            movement_type = %req.movement_type,
            delta = %delta,
            "Stock adjusted"
        );

        Ok(AdjustmentResult {
            snapshot,
            movement: record,
            status,
            went_negative,
            low_stock,
        })
    }

    /// Applies a deduction with the negative-stock check inside the same
    /// transaction as the write, so a concurrent deduction cannot slip the
    /// balance below zero between check and apply.
    async fn apply_guarded(
        &self,
        movement: &NewMovement,
    ) -> ApiResult<(InventorySnapshot, StockMovement)> {
        let mut tx = self
            .db
            .pool()
            .begin()
            .await
            .map_err(DbError::from)
            .map_err(crate::ApiError::from)?;

        let current: Option<Quantity> = sqlx::query_scalar(
            "SELECT quantity FROM inventory_snapshots WHERE product_id = ?1 AND location_id = ?2",
        )
        .bind(movement.product_id)
        .bind(movement.location_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(DbError::from)
        .map_err(crate::ApiError::from)?;

        let projected = current.unwrap_or_else(Quantity::zero) + movement.quantity;
        if projected.is_negative() {
            return Err(ValidationError::NegativeStockBlocked { projected }.into());
        }

        let result = Ledger::apply_in_tx(&mut *tx, movement).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))
            .map_err(crate::ApiError::from)?;

        Ok(result)
    }
}
