//! # Purchase Order Item Repository
//!
//! The purchasing subsystem owns purchase orders; the ledger only needs the
//! order lines the receiving workflow settles against. `received_quantity`
//! is increment-only here, and the schema CHECK keeps it within the ordered
//! quantity as a backstop to the workflow clamp.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use pantry_core::{PurchaseOrderItem, Quantity};

/// Repository for purchase-order line operations used by receiving.
#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    pool: SqlitePool,
}

impl PurchaseRepository {
    /// Creates a new PurchaseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PurchaseRepository { pool }
    }

    /// Inserts an order line (seed/test path; orders arrive from purchasing).
    pub async fn insert_item(
        &self,
        purchase_order_id: i64,
        product_id: i64,
        quantity: Quantity,
    ) -> DbResult<PurchaseOrderItem> {
        let result = sqlx::query(
            r#"
            INSERT INTO purchase_order_items (
                purchase_order_id, product_id, quantity, received_quantity
            ) VALUES (?1, ?2, ?3, 0)
            "#,
        )
        .bind(purchase_order_id)
        .bind(product_id)
        .bind(quantity)
        .execute(&self.pool)
        .await?;

        Ok(PurchaseOrderItem {
            id: result.last_insert_rowid(),
            purchase_order_id,
            product_id,
            quantity,
            received_quantity: Quantity::zero(),
        })
    }

    /// Gets one order line by id.
    pub async fn get_item(&self, item_id: i64) -> DbResult<Option<PurchaseOrderItem>> {
        let item = sqlx::query_as(
            r#"
            SELECT id, purchase_order_id, product_id, quantity, received_quantity
            FROM purchase_order_items
            WHERE id = ?1
            "#,
        )
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// All lines of one purchase order, in insertion order.
    pub async fn items_for_order(&self, purchase_order_id: i64) -> DbResult<Vec<PurchaseOrderItem>> {
        let items = sqlx::query_as(
            r#"
            SELECT id, purchase_order_id, product_id, quantity, received_quantity
            FROM purchase_order_items
            WHERE purchase_order_id = ?1
            ORDER BY id
            "#,
        )
        .bind(purchase_order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Increments a line's accumulated receipts, on the receiving
    /// workflow's transaction.
    ///
    /// Applied as a SQL delta for the same reason snapshot updates are:
    /// concurrent receipts against the same line must both land.
    pub async fn add_received(
        conn: &mut SqliteConnection,
        item_id: i64,
        delta: Quantity,
    ) -> DbResult<()> {
        debug!(item_id, delta = %delta, "Incrementing received quantity");

        let result = sqlx::query(
            r#"
            UPDATE purchase_order_items
            SET received_quantity = received_quantity + ?2
            WHERE id = ?1
            "#,
        )
        .bind(item_id)
        .bind(delta)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Purchase order item", item_id));
        }

        Ok(())
    }
}
