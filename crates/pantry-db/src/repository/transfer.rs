//! # Transfer Repository
//!
//! Database operations for stock transfers and their items.
//!
//! ## Transfer Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Transfer Lifecycle                                │
//! │                                                                         │
//! │  1. CREATE (pending)                                                   │
//! │     └── insert() → header + items, transfer_number generated           │
//! │         (no inventory moved - a reservation of intent only)            │
//! │                                                                         │
//! │  2. (OPTIONAL) DISPATCH (in_transit)                                   │
//! │     └── mark_in_transit() → approved_by/approved_at recorded           │
//! │                                                                         │
//! │  3. COMPLETE                                                           │
//! │     └── engine txn: per item, −requested @ source, +received @ dest    │
//! │     └── mark_completed() + set_item_received() in the SAME txn         │
//! │                                                                         │
//! │  4. (OPTIONAL) CANCEL                                                  │
//! │     └── mark_cancelled() - legal from pending/in_transit only          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! State transition guards run in SQL (`WHERE status IN (...)`) and report
//! via `rows_affected`, so a racing second writer loses cleanly: the engine
//! re-reads and maps a guard miss to a conflict.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use pantry_core::{
    Page, Paged, Quantity, StockTransfer, StockTransferItem, TransferDraft, TransferFilter,
    TransferWithItems,
};

const TRANSFER_COLUMNS: &str = "id, transfer_number, from_location_id, to_location_id, status, \
     notes, requested_by, approved_by, completed_by, requested_at, approved_at, completed_at";

/// Repository for stock transfer operations.
#[derive(Debug, Clone)]
pub struct TransferRepository {
    pool: SqlitePool,
}

impl TransferRepository {
    /// Creates a new TransferRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransferRepository { pool }
    }

    /// Inserts a new pending transfer with its items, in one transaction.
    ///
    /// The draft is assumed validated (locations differ, items non-empty,
    /// quantities positive); the schema CHECKs are the backstop.
    pub async fn insert(&self, draft: &TransferDraft) -> DbResult<TransferWithItems> {
        let now = Utc::now();
        let day = now.format("%Y%m%d").to_string();

        let mut tx = self.pool.begin().await?;

        // Next slot in today's TRF-YYYYMMDD-NNNN sequence. The count can
        // race with a concurrent insert; the UNIQUE index catches that and
        // the loop bumps to the next slot.
        let taken: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM stock_transfers WHERE transfer_number LIKE ?1")
                .bind(format!("TRF-{}-%", day))
                .fetch_one(&mut *tx)
                .await?;

        let mut header = None;
        for attempt in 0..10u32 {
            let transfer_number = format!("TRF-{}-{:04}", day, taken as u32 + 1 + attempt);
            let inserted = sqlx::query(
                r#"
                INSERT INTO stock_transfers (
                    transfer_number, from_location_id, to_location_id, status,
                    notes, requested_by, requested_at
                ) VALUES (?1, ?2, ?3, 'pending', ?4, ?5, ?6)
                "#,
            )
            .bind(&transfer_number)
            .bind(draft.from_location_id)
            .bind(draft.to_location_id)
            .bind(&draft.notes)
            .bind(draft.requested_by)
            .bind(now)
            .execute(&mut *tx)
            .await;

            match inserted {
                Ok(result) => {
                    header = Some((result.last_insert_rowid(), transfer_number));
                    break;
                }
                Err(e) => match DbError::from(e) {
                    DbError::UniqueViolation { .. } => continue,
                    other => return Err(other),
                },
            }
        }

        let Some((transfer_id, transfer_number)) = header else {
            return Err(DbError::Internal(
                "could not allocate a transfer number".into(),
            ));
        };

        debug!(
            transfer_number = %transfer_number,
            from = draft.from_location_id,
            to = draft.to_location_id,
            items = draft.items.len(),
            "Creating transfer"
        );

        for item in &draft.items {
            sqlx::query(
                r#"
                INSERT INTO stock_transfer_items (
                    transfer_id, product_id, quantity, received_quantity, notes
                ) VALUES (?1, ?2, ?3, 0, ?4)
                "#,
            )
            .bind(transfer_id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(&item.notes)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        // Freshly inserted; must exist.
        self.get_with_items(transfer_id)
            .await?
            .ok_or_else(|| DbError::not_found("Transfer", transfer_id))
    }

    /// Gets a transfer header by id.
    pub async fn get(&self, id: i64) -> DbResult<Option<StockTransfer>> {
        let transfer = sqlx::query_as(&format!(
            "SELECT {TRANSFER_COLUMNS} FROM stock_transfers WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(transfer)
    }

    /// Gets a transfer's items, in insertion order.
    pub async fn get_items(&self, transfer_id: i64) -> DbResult<Vec<StockTransferItem>> {
        let items = sqlx::query_as(
            r#"
            SELECT id, transfer_id, product_id, quantity, received_quantity, notes
            FROM stock_transfer_items
            WHERE transfer_id = ?1
            ORDER BY id
            "#,
        )
        .bind(transfer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Gets a transfer together with its items.
    pub async fn get_with_items(&self, id: i64) -> DbResult<Option<TransferWithItems>> {
        let Some(transfer) = self.get(id).await? else {
            return Ok(None);
        };
        let items = self.get_items(id).await?;
        Ok(Some(TransferWithItems { transfer, items }))
    }

    /// Paginated transfer listing, newest first.
    pub async fn list(
        &self,
        filter: &TransferFilter,
        page: Page,
    ) -> DbResult<Paged<StockTransfer>> {
        let total: i64 = {
            let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM stock_transfers WHERE 1 = 1");
            push_filters(&mut qb, filter);
            qb.build_query_scalar().fetch_one(&self.pool).await?
        };

        let mut qb = QueryBuilder::new(format!(
            "SELECT {TRANSFER_COLUMNS} FROM stock_transfers WHERE 1 = 1"
        ));
        push_filters(&mut qb, filter);
        qb.push(" ORDER BY requested_at DESC, id DESC LIMIT ");
        qb.push_bind(page.limit());
        qb.push(" OFFSET ");
        qb.push_bind(page.offset());

        let transfers: Vec<StockTransfer> = qb.build_query_as().fetch_all(&self.pool).await?;

        Ok(Paged::new(transfers, total, page))
    }

    /// pending → in_transit, recording the approver.
    ///
    /// ## Returns
    /// `true` when the guarded update landed; `false` when the transfer was
    /// not pending (the engine maps that to a conflict).
    pub async fn mark_in_transit(&self, id: i64, approved_by: i64) -> DbResult<bool> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE stock_transfers SET
                status = 'in_transit',
                approved_by = ?2,
                approved_at = ?3
            WHERE id = ?1 AND status = 'pending'
            "#,
        )
        .bind(id)
        .bind(approved_by)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Marks a transfer completed, on the engine's completion transaction.
    ///
    /// Guarded: only pending/in_transit transfers transition.
    pub async fn mark_completed(
        conn: &mut SqliteConnection,
        id: i64,
        completed_by: i64,
    ) -> DbResult<bool> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE stock_transfers SET
                status = 'completed',
                completed_by = ?2,
                completed_at = ?3
            WHERE id = ?1 AND status IN ('pending', 'in_transit')
            "#,
        )
        .bind(id)
        .bind(completed_by)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Records the received quantity on one item, on the engine's
    /// completion transaction.
    pub async fn set_item_received(
        conn: &mut SqliteConnection,
        item_id: i64,
        received: Quantity,
    ) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE stock_transfer_items SET received_quantity = ?2 WHERE id = ?1",
        )
        .bind(item_id)
        .bind(received)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Transfer item", item_id));
        }

        Ok(())
    }

    /// pending|in_transit → cancelled. No inventory movement occurs because
    /// none was applied before completion.
    pub async fn mark_cancelled(&self, id: i64) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE stock_transfers SET status = 'cancelled'
            WHERE id = ?1 AND status IN ('pending', 'in_transit')
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Appends the WHERE-clause fragments shared by the count and page queries.
fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, filter: &TransferFilter) {
    if let Some(status) = filter.status {
        qb.push(" AND status = ");
        qb.push_bind(status);
    }
    if let Some(location_id) = filter.location_id {
        qb.push(" AND (from_location_id = ");
        qb.push_bind(location_id);
        qb.push(" OR to_location_id = ");
        qb.push_bind(location_id);
        qb.push(")");
    }
}
