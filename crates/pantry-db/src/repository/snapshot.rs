//! # Snapshot Repository
//!
//! Read-side access to `inventory_snapshots`, including the stock status
//! listing the dashboard and alerts are built on.
//!
//! ## Classifier Rules (in SQL)
//! ```text
//! out of stock:  quantity <= 0
//! low stock:     quantity > 0 AND quantity <= reorder_level
//! ```
//! Always computed from the snapshot table, never by replaying movement
//! history: reads stay O(1) per product.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use pantry_core::{
    InventorySnapshot, Page, Paged, Quantity, StockFilter, StockLevel, StockSortField, StockStatus,
};

/// Private row shape for the listing join; `status` is derived afterwards.
#[derive(Debug, sqlx::FromRow)]
struct StockLevelRow {
    product_id: i64,
    product_name: String,
    unit: String,
    location_id: i64,
    quantity: Quantity,
    reorder_level: Quantity,
    last_updated: chrono::DateTime<chrono::Utc>,
}

impl From<StockLevelRow> for StockLevel {
    fn from(row: StockLevelRow) -> Self {
        StockLevel {
            product_id: row.product_id,
            product_name: row.product_name,
            unit: row.unit,
            location_id: row.location_id,
            quantity: row.quantity,
            reorder_level: row.reorder_level,
            status: StockStatus::classify(row.quantity, row.reorder_level),
            last_updated: row.last_updated,
        }
    }
}

/// Repository for inventory snapshot reads and threshold maintenance.
#[derive(Debug, Clone)]
pub struct SnapshotRepository {
    pool: SqlitePool,
}

impl SnapshotRepository {
    /// Creates a new SnapshotRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SnapshotRepository { pool }
    }

    /// Gets the snapshot for one (product, location) key.
    ///
    /// ## Returns
    /// * `Ok(Some(..))` - snapshot exists (some movement has touched it)
    /// * `Ok(None)` - no movement yet
    pub async fn get(
        &self,
        product_id: i64,
        location_id: i64,
    ) -> DbResult<Option<InventorySnapshot>> {
        let snapshot = sqlx::query_as(
            r#"
            SELECT product_id, location_id, quantity, reorder_level, last_updated
            FROM inventory_snapshots
            WHERE product_id = ?1 AND location_id = ?2
            "#,
        )
        .bind(product_id)
        .bind(location_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(snapshot)
    }

    /// Sets the reorder threshold for one (product, location) key.
    ///
    /// Creates the snapshot row at quantity zero when no movement has
    /// created it yet (explicit initialization).
    pub async fn set_reorder_level(
        &self,
        product_id: i64,
        location_id: i64,
        reorder_level: Quantity,
    ) -> DbResult<()> {
        if reorder_level.is_negative() {
            return Err(DbError::QueryFailed(
                "reorder_level must not be negative".to_string(),
            ));
        }

        debug!(product_id, location_id, reorder_level = %reorder_level, "Setting reorder level");

        let now = chrono::Utc::now();
        sqlx::query(
            r#"
            INSERT INTO inventory_snapshots (
                product_id, location_id, quantity, reorder_level, last_updated
            ) VALUES (?1, ?2, 0, ?3, ?4)
            ON CONFLICT (product_id, location_id) DO UPDATE SET
                reorder_level = excluded.reorder_level
            "#,
        )
        .bind(product_id)
        .bind(location_id)
        .bind(reorder_level)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Paginated, searchable, sortable stock listing.
    ///
    /// ## Filters
    /// - `search` - case-insensitive substring on product name
    /// - `low_stock_only` / `out_of_stock_only` - classifier subsets
    /// - `location_id` - single location
    pub async fn list(&self, filter: &StockFilter, page: Page) -> DbResult<Paged<StockLevel>> {
        let total: i64 = {
            let mut qb = QueryBuilder::new(
                "SELECT COUNT(*) FROM inventory_snapshots s \
                 JOIN products p ON p.id = s.product_id WHERE p.is_active = 1",
            );
            push_filters(&mut qb, filter);
            qb.build_query_scalar().fetch_one(&self.pool).await?
        };

        let mut qb = QueryBuilder::new(
            "SELECT s.product_id, p.name AS product_name, p.unit, s.location_id, \
             s.quantity, s.reorder_level, s.last_updated \
             FROM inventory_snapshots s \
             JOIN products p ON p.id = s.product_id WHERE p.is_active = 1",
        );
        push_filters(&mut qb, filter);

        // Sort column comes from a closed enum, never from caller text.
        let sort_col = match filter.sort_by {
            StockSortField::ProductName => "p.name",
            StockSortField::Quantity => "s.quantity",
            StockSortField::ReorderLevel => "s.reorder_level",
            StockSortField::LastUpdated => "s.last_updated",
        };
        qb.push(" ORDER BY ");
        qb.push(sort_col);
        qb.push(" ");
        qb.push(filter.sort_order.as_sql());
        qb.push(" LIMIT ");
        qb.push_bind(page.limit());
        qb.push(" OFFSET ");
        qb.push_bind(page.offset());

        let rows: Vec<StockLevelRow> = qb.build_query_as().fetch_all(&self.pool).await?;

        debug!(count = rows.len(), total, "Stock listing returned");

        Ok(Paged::new(rows.into_iter().map(Into::into).collect(), total, page))
    }

    /// Count of low-stock snapshots (0 < quantity <= reorder_level).
    ///
    /// Cheap count-only query for dashboard badges.
    pub async fn low_stock_count(&self, location_id: Option<i64>) -> DbResult<i64> {
        let count = match location_id {
            Some(loc) => {
                sqlx::query_scalar(
                    "SELECT COUNT(*) FROM inventory_snapshots \
                     WHERE quantity > 0 AND quantity <= reorder_level AND location_id = ?1",
                )
                .bind(loc)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar(
                    "SELECT COUNT(*) FROM inventory_snapshots \
                     WHERE quantity > 0 AND quantity <= reorder_level",
                )
                .fetch_one(&self.pool)
                .await?
            }
        };

        Ok(count)
    }

    /// Count of out-of-stock snapshots (quantity <= 0).
    pub async fn out_of_stock_count(&self, location_id: Option<i64>) -> DbResult<i64> {
        let count = match location_id {
            Some(loc) => {
                sqlx::query_scalar(
                    "SELECT COUNT(*) FROM inventory_snapshots \
                     WHERE quantity <= 0 AND location_id = ?1",
                )
                .bind(loc)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM inventory_snapshots WHERE quantity <= 0")
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        Ok(count)
    }
}

/// Appends the WHERE-clause fragments shared by the count and page queries.
fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, filter: &StockFilter) {
    if let Some(loc) = filter.location_id {
        qb.push(" AND s.location_id = ");
        qb.push_bind(loc);
    }

    if let Some(search) = filter.search.as_deref() {
        let search = search.trim();
        if !search.is_empty() {
            qb.push(" AND p.name LIKE ");
            qb.push_bind(format!("%{}%", search));
        }
    }

    // out_of_stock_only wins when both flags are set; the sets are disjoint
    // so combining them would always be empty.
    if filter.out_of_stock_only {
        qb.push(" AND s.quantity <= 0");
    } else if filter.low_stock_only {
        qb.push(" AND s.quantity > 0 AND s.quantity <= s.reorder_level");
    }
}
