//! # Stock Transfer Workflow
//!
//! Inter-location transfers as a small state machine. Creating and
//! dispatching a transfer move NO inventory; both ledger legs land at
//! completion, in one transaction.
//!
//! ## Lifecycle
//! ```text
//!   create ──► pending ──► in_transit ──► completed
//!                 │             │             ▲
//!                 │             │        per item received > 0:
//!                 └──────┬──────┘        −requested @ source
//!                        ▼               +received  @ destination
//!                    cancelled
//! ```
//!
//! ## Why Legality Is Re-Checked in SQL
//! The in-memory status check gives a precise error message, but two
//! operators can complete the same transfer concurrently. The guarded
//! UPDATE (`WHERE status IN ('pending','in_transit')`) is the actual
//! arbiter: exactly one completion transitions the row, the loser's
//! transaction rolls back and surfaces a conflict.

use tracing::{info, warn};

use pantry_core::validation::{check_received_range, validate_transfer_draft};
use pantry_core::{
    CoreError, MovementType, Page, Paged, Quantity, StockTransfer, TransferDraft, TransferFilter,
    TransferReceipt, TransferWithItems, ValidationError,
};
use pantry_db::{DbError, Ledger, NewMovement, TransferRepository};

use crate::error::ApiResult;
use crate::InventoryEngine;

impl InventoryEngine {
    /// Creates a new pending transfer. No inventory moves.
    ///
    /// ## Errors
    /// - `VALIDATION_ERROR` - same source/destination, empty or oversized
    ///   item list, non-positive quantity
    pub async fn create_transfer(&self, draft: &TransferDraft) -> ApiResult<TransferWithItems> {
        validate_transfer_draft(draft)?;

        let result = self.db.transfers().insert(draft).await?;

        info!(
            transfer_id = result.transfer.id,
            transfer_number = %result.transfer.transfer_number,
            from = draft.from_location_id,
            to = draft.to_location_id,
            items = result.items.len(),
            "Transfer created"
        );

        Ok(result)
    }

    /// Dispatches a pending transfer (pending → in_transit), recording the
    /// approver. Still no inventory movement.
    ///
    /// ## Errors
    /// - `NOT_FOUND` - transfer does not exist
    /// - `CONFLICT` - transfer is not pending
    pub async fn dispatch_transfer(
        &self,
        transfer_id: i64,
        approved_by: i64,
    ) -> ApiResult<StockTransfer> {
        let transfers = self.db.transfers();

        if !transfers.mark_in_transit(transfer_id, approved_by).await? {
            return Err(self.transfer_conflict(transfer_id, "dispatch").await);
        }

        info!(transfer_id, approved_by, "Transfer dispatched");

        transfers
            .get(transfer_id)
            .await?
            .ok_or_else(|| CoreError::TransferNotFound(transfer_id).into())
    }

    /// Completes a transfer: records received quantities and applies both
    /// ledger legs for every item, all in one transaction.
    ///
    /// ## Semantics
    /// - The source deduction always uses the REQUESTED quantity; that is
    ///   what left the source shelf
    /// - The destination addition uses the RECEIVED quantity; a shortfall
    ///   stays visible as the difference between the two legs
    /// - An item received at zero gets NO movements on either side; only
    ///   its `received_quantity = 0` is recorded for audit
    /// - Items absent from the receipt default to received = requested
    /// - Received quantities are re-validated against [0, requested]
    ///   server-side, whatever the form clamped
    ///
    /// ## Errors
    /// - `NOT_FOUND` - transfer does not exist
    /// - `CONFLICT` - transfer already completed/cancelled (or raced)
    /// - `VALIDATION_ERROR` - unknown receipt line, out-of-range received
    ///   quantity, an all-zero receipt (cancel instead), or negative stock
    ///   blocked by policy
    pub async fn complete_transfer(&self, receipt: &TransferReceipt) -> ApiResult<TransferWithItems> {
        let transfers = self.db.transfers();

        let TransferWithItems { transfer, items } = transfers
            .get_with_items(receipt.transfer_id)
            .await?
            .ok_or(CoreError::TransferNotFound(receipt.transfer_id))?;

        if !transfer.status.can_complete() {
            return Err(CoreError::InvalidTransferStatus {
                transfer_id: transfer.id,
                current: transfer.status,
                attempted: "complete",
            }
            .into());
        }

        // Pair every receipt line with its item; reject lines that point
        // outside this transfer.
        let mut received_by_item = std::collections::HashMap::new();
        for line in &receipt.lines {
            if !items.iter().any(|i| i.id == line.item_id) {
                return Err(ValidationError::Required {
                    field: "lines (item belongs to another transfer)",
                }
                .into());
            }
            received_by_item.insert(line.item_id, line.received_quantity);
        }

        let mut plan = Vec::with_capacity(items.len());
        for item in &items {
            let received = received_by_item
                .get(&item.id)
                .copied()
                .unwrap_or(item.quantity);
            check_received_range(received, item.quantity)?;
            plan.push((item, received));
        }

        // An all-zero receipt is a cancellation in disguise; make the
        // operator say so explicitly.
        if plan.iter().all(|(_, received)| received.is_zero()) {
            return Err(ValidationError::NothingReceived.into());
        }

        let mut tx = self
            .db
            .pool()
            .begin()
            .await
            .map_err(DbError::from)
            .map_err(crate::ApiError::from)?;

        // The guarded UPDATE is the arbiter under concurrency; losing it
        // here means another completion (or a cancellation) won the race.
        if !TransferRepository::mark_completed(&mut *tx, transfer.id, receipt.completed_by).await? {
            drop(tx);
            return Err(self.transfer_conflict(transfer.id, "complete").await);
        }

        for (item, received) in &plan {
            // An item received at zero moves nothing on either side; the
            // zero sticks to the item row for audit.
            if received.is_positive() {
                // Source leg: the full requested quantity left the shelf.
                let deduction = NewMovement {
                    product_id: item.product_id,
                    location_id: transfer.from_location_id,
                    movement_type: MovementType::Transfer,
                    quantity: -item.quantity,
                    reason: None,
                    user_id: receipt.completed_by,
                    reference_id: Some(transfer.id),
                    expiry_date: None,
                };

                if !self.config.allow_negative_stock {
                    Self::check_source_balance(&mut tx, &deduction).await?;
                }

                Ledger::apply_in_tx(&mut *tx, &deduction).await?;

                // Destination leg: only what actually arrived. A shortfall
                // stays visible as the gap between the two legs.
                let addition = NewMovement {
                    product_id: item.product_id,
                    location_id: transfer.to_location_id,
                    movement_type: MovementType::Transfer,
                    quantity: *received,
                    reason: None,
                    user_id: receipt.completed_by,
                    reference_id: Some(transfer.id),
                    expiry_date: None,
                };
                Ledger::apply_in_tx(&mut *tx, &addition).await?;
            }

            TransferRepository::set_item_received(&mut *tx, item.id, *received).await?;

            if *received != item.quantity {
                warn!(
                    transfer_id = transfer.id,
                    item_id = item.id,
                    requested = %item.quantity,
                    received = %received,
                    "Transfer item received with discrepancy"
                );
            }
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))
            .map_err(crate::ApiError::from)?;

        info!(
            transfer_id = transfer.id,
            transfer_number = %transfer.transfer_number,
            items = plan.len(),
            "Transfer completed"
        );

        transfers
            .get_with_items(transfer.id)
            .await?
            .ok_or_else(|| CoreError::TransferNotFound(transfer.id).into())
    }

    /// Cancels a pending or in-transit transfer. Nothing to reverse: no
    /// inventory moved before completion.
    ///
    /// ## Errors
    /// - `NOT_FOUND` - transfer does not exist
    /// - `CONFLICT` - transfer already completed/cancelled
    pub async fn cancel_transfer(&self, transfer_id: i64) -> ApiResult<StockTransfer> {
        let transfers = self.db.transfers();

        if !transfers.mark_cancelled(transfer_id).await? {
            return Err(self.transfer_conflict(transfer_id, "cancel").await);
        }

        info!(transfer_id, "Transfer cancelled");

        transfers
            .get(transfer_id)
            .await?
            .ok_or_else(|| CoreError::TransferNotFound(transfer_id).into())
    }

    /// Gets a transfer with its items.
    pub async fn get_transfer(&self, transfer_id: i64) -> ApiResult<TransferWithItems> {
        self.db
            .transfers()
            .get_with_items(transfer_id)
            .await?
            .ok_or_else(|| CoreError::TransferNotFound(transfer_id).into())
    }

    /// Paginated transfer listing, newest first.
    pub async fn list_transfers(
        &self,
        filter: &TransferFilter,
        page: Page,
    ) -> ApiResult<Paged<StockTransfer>> {
        Ok(self.db.transfers().list(filter, page).await?)
    }

    /// Builds the precise error after a guarded transition missed: NotFound
    /// when the row never existed, otherwise a conflict naming the current
    /// status.
    async fn transfer_conflict(&self, transfer_id: i64, attempted: &'static str) -> crate::ApiError {
        match self.db.transfers().get(transfer_id).await {
            Ok(Some(t)) => CoreError::InvalidTransferStatus {
                transfer_id,
                current: t.status,
                attempted,
            }
            .into(),
            Ok(None) => CoreError::TransferNotFound(transfer_id).into(),
            Err(e) => e.into(),
        }
    }

    /// Rejects a deduction that would drive the source balance negative,
    /// inside the completion transaction.
    async fn check_source_balance(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        deduction: &NewMovement,
    ) -> ApiResult<()> {
        let current: Option<Quantity> = sqlx::query_scalar(
            "SELECT quantity FROM inventory_snapshots WHERE product_id = ?1 AND location_id = ?2",
        )
        .bind(deduction.product_id)
        .bind(deduction.location_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(DbError::from)
        .map_err(crate::ApiError::from)?;

        let projected = current.unwrap_or_else(Quantity::zero) + deduction.quantity;
        if projected.is_negative() {
            return Err(ValidationError::NegativeStockBlocked { projected }.into());
        }
        Ok(())
    }
}
