//! # Ledger Core
//!
//! The single place quantity math happens.
//!
//! ## Atomic Movement Apply
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     apply_movement(NewMovement)                         │
//! │                                                                         │
//! │  BEGIN TRANSACTION                                                      │
//! │       │                                                                 │
//! │       ├── 1. product exists?            (NotFound otherwise)           │
//! │       │                                                                 │
//! │       ├── 2. upsert snapshot as a DELTA:                               │
//! │       │      INSERT .. ON CONFLICT(product_id, location_id)            │
//! │       │      DO UPDATE SET quantity = quantity + excluded.quantity     │
//! │       │                                                                 │
//! │       ├── 3. INSERT stock_movements row (append-only audit fact)       │
//! │       │                                                                 │
//! │       └── 4. read snapshot back                                        │
//! │                                                                         │
//! │  COMMIT ── both writes visible together, or neither                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why Delta Updates?
//! ```text
//! ❌ WRONG: read-modify-write (lost update under concurrency)
//!    let q = SELECT quantity ...; UPDATE ... SET quantity = q + delta
//!
//! ✅ CORRECT: delta applied inside SQL
//!    UPDATE ... SET quantity = quantity + delta
//!
//! Two concurrent adjustments to the same (product, location) serialize on
//! the SQLite write lock and both deltas land; there is no window in which
//! one writer's read goes stale.
//! ```
//!
//! No business validation happens here: sign conventions, clamps and
//! negative-stock policy all live in the workflow layer (pantry-engine).
//! The ledger is a dumb, reusable primitive.

use chrono::{NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use pantry_core::{InventorySnapshot, MovementType, Quantity, StockMovement};

/// A movement to be applied, with the sign convention already normalized by
/// the calling workflow.
#[derive(Debug, Clone)]
pub struct NewMovement {
    pub product_id: i64,
    pub location_id: i64,
    pub movement_type: MovementType,
    /// Signed delta. Must be non-zero.
    pub quantity: Quantity,
    pub reason: Option<String>,
    pub user_id: i64,
    /// Purchase-order item id or transfer id that caused this movement.
    pub reference_id: Option<i64>,
    /// Batch expiry hint, recorded verbatim.
    pub expiry_date: Option<NaiveDate>,
}

/// The ledger core: applies movements atomically.
#[derive(Debug, Clone)]
pub struct Ledger {
    pool: SqlitePool,
}

impl Ledger {
    /// Creates a new Ledger on the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Ledger { pool }
    }

    /// Applies one movement in its own transaction.
    ///
    /// ## Guarantees
    /// - Snapshot update and movement insert commit together or not at all
    /// - The snapshot row is created lazily on first movement, seeded with
    ///   the product's default reorder level
    /// - A transient SQLITE_BUSY conflict is retried once with a fresh
    ///   transaction before surfacing
    ///
    /// ## Errors
    /// - `DbError::NotFound` - product does not exist
    /// - `DbError::Busy` - lock conflict persisted through the retry
    pub async fn apply_movement(
        &self,
        movement: &NewMovement,
    ) -> DbResult<(InventorySnapshot, StockMovement)> {
        match self.apply_once(movement).await {
            Err(e) if e.is_busy() => {
                warn!(
                    product_id = movement.product_id,
                    location_id = movement.location_id,
                    "Ledger write hit a lock conflict, retrying once"
                );
                self.apply_once(movement).await
            }
            other => other,
        }
    }

    async fn apply_once(
        &self,
        movement: &NewMovement,
    ) -> DbResult<(InventorySnapshot, StockMovement)> {
        let mut tx = self.pool.begin().await?;

        let result = Self::apply_in_tx(&mut *tx, movement).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(result)
    }

    /// Applies one movement on a caller-owned transaction.
    ///
    /// Multi-movement workflows (transfer completion, batch receiving) call
    /// this repeatedly inside ONE transaction, so a mid-sequence failure
    /// rolls back every movement applied so far in that call.
    pub async fn apply_in_tx(
        conn: &mut SqliteConnection,
        movement: &NewMovement,
    ) -> DbResult<(InventorySnapshot, StockMovement)> {
        // Precondition; workflows normalize before calling, the schema CHECK
        // is the last backstop.
        if movement.quantity.is_zero() {
            return Err(DbError::QueryFailed(
                "zero-quantity movement rejected".to_string(),
            ));
        }

        debug!(
            product_id = movement.product_id,
            location_id = movement.location_id,
            movement_type = %movement.movement_type,
            quantity = %movement.quantity,
            "Applying movement"
        );

        // 1. Product must exist; its reorder default seeds a lazily created
        //    snapshot row.
        let reorder_default: Option<Quantity> = sqlx::query_scalar(
            "SELECT default_reorder_level FROM products WHERE id = ?1",
        )
        .bind(movement.product_id)
        .fetch_optional(&mut *conn)
        .await?;

        let reorder_default =
            reorder_default.ok_or_else(|| DbError::not_found("Product", movement.product_id))?;

        let now = Utc::now();

        // 2. Snapshot upsert as a delta.
        sqlx::query(
            r#"
            INSERT INTO inventory_snapshots (
                product_id, location_id, quantity, reorder_level, last_updated
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (product_id, location_id) DO UPDATE SET
                quantity = quantity + excluded.quantity,
                last_updated = excluded.last_updated
            "#,
        )
        .bind(movement.product_id)
        .bind(movement.location_id)
        .bind(movement.quantity)
        .bind(reorder_default)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        // 3. Append the audit fact.
        let record = StockMovement {
            id: Uuid::new_v4().to_string(),
            product_id: movement.product_id,
            location_id: movement.location_id,
            movement_type: movement.movement_type,
            quantity: movement.quantity,
            reason: movement.reason.clone(),
            user_id: movement.user_id,
            reference_id: movement.reference_id,
            expiry_date: movement.expiry_date,
            created_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO stock_movements (
                id, product_id, location_id, movement_type,
                quantity, reason, user_id, reference_id, expiry_date, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&record.id)
        .bind(record.product_id)
        .bind(record.location_id)
        .bind(record.movement_type)
        .bind(record.quantity)
        .bind(&record.reason)
        .bind(record.user_id)
        .bind(record.reference_id)
        .bind(record.expiry_date)
        .bind(record.created_at)
        .execute(&mut *conn)
        .await?;

        // 4. Read the updated snapshot back, inside the same transaction.
        let snapshot: InventorySnapshot = sqlx::query_as(
            r#"
            SELECT product_id, location_id, quantity, reorder_level, last_updated
            FROM inventory_snapshots
            WHERE product_id = ?1 AND location_id = ?2
            "#,
        )
        .bind(movement.product_id)
        .bind(movement.location_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok((snapshot, record))
    }
}
