//! # Movement Repository
//!
//! Read-side access to the append-only `stock_movements` audit trail.
//! Inserts happen only through the ledger core; nothing here mutates.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use pantry_core::{MovementFilter, Page, Paged, Quantity, StockMovement};

/// Repository for stock movement history.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    pool: SqlitePool,
}

impl MovementRepository {
    /// Creates a new MovementRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MovementRepository { pool }
    }

    /// Paginated movement history, newest first.
    ///
    /// ## Filters
    /// - `product_id`, `location_id`, `movement_type`, `user_id` (actor)
    /// - `from` / `to` - inclusive created_at range
    pub async fn list(
        &self,
        filter: &MovementFilter,
        page: Page,
    ) -> DbResult<Paged<StockMovement>> {
        let total: i64 = {
            let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM stock_movements WHERE 1 = 1");
            push_filters(&mut qb, filter);
            qb.build_query_scalar().fetch_one(&self.pool).await?
        };

        let mut qb = QueryBuilder::new(
            "SELECT id, product_id, location_id, movement_type, quantity, \
             reason, user_id, reference_id, expiry_date, created_at \
             FROM stock_movements WHERE 1 = 1",
        );
        push_filters(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC, id DESC LIMIT ");
        qb.push_bind(page.limit());
        qb.push(" OFFSET ");
        qb.push_bind(page.offset());

        let movements: Vec<StockMovement> = qb.build_query_as().fetch_all(&self.pool).await?;

        debug!(count = movements.len(), total, "Movement listing returned");

        Ok(Paged::new(movements, total, page))
    }

    /// All movements referencing a transfer or purchase-order item.
    pub async fn list_by_reference(&self, reference_id: i64) -> DbResult<Vec<StockMovement>> {
        let movements = sqlx::query_as(
            r#"
            SELECT id, product_id, location_id, movement_type, quantity,
                   reason, user_id, reference_id, expiry_date, created_at
            FROM stock_movements
            WHERE reference_id = ?1
            ORDER BY created_at, id
            "#,
        )
        .bind(reference_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }

    /// Sum of all movement quantities for one (product, location) key.
    ///
    /// Audit helper: by the ledger invariant this always equals the snapshot
    /// quantity. Used by consistency checks and tests, never by the
    /// classifier (reads derive from the snapshot table).
    pub async fn sum_for(&self, product_id: i64, location_id: i64) -> DbResult<Quantity> {
        let sum: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(quantity), 0)
            FROM stock_movements
            WHERE product_id = ?1 AND location_id = ?2
            "#,
        )
        .bind(product_id)
        .bind(location_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(Quantity::from_milli(sum))
    }
}

/// Appends the WHERE-clause fragments shared by the count and page queries.
fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, filter: &MovementFilter) {
    if let Some(product_id) = filter.product_id {
        qb.push(" AND product_id = ");
        qb.push_bind(product_id);
    }
    if let Some(location_id) = filter.location_id {
        qb.push(" AND location_id = ");
        qb.push_bind(location_id);
    }
    if let Some(movement_type) = filter.movement_type {
        qb.push(" AND movement_type = ");
        qb.push_bind(movement_type);
    }
    if let Some(user_id) = filter.user_id {
        qb.push(" AND user_id = ");
        qb.push_bind(user_id);
    }
    if let Some(from) = filter.from {
        qb.push(" AND created_at >= ");
        qb.push_bind(from);
    }
    if let Some(to) = filter.to {
        qb.push(" AND created_at <= ");
        qb.push_bind(to);
    }
}
