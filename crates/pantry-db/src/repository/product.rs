//! # Product & Location Repositories
//!
//! The catalog subsystem owns products; the ledger keeps a minimal mirror
//! (name for listings, unit label, reorder default for lazily created
//! snapshots) so the engine is self-contained for tests and seeds.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use pantry_core::{Product, Quantity};

/// Fields needed to register a product with the ledger.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub unit: String,
    pub default_reorder_level: Quantity,
}

/// Repository for the ledger's product mirror.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a product.
    pub async fn insert(&self, new: &NewProduct) -> DbResult<Product> {
        debug!(name = %new.name, "Inserting product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO products (name, unit, default_reorder_level, is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, 1, ?4, ?4)
            "#,
        )
        .bind(&new.name)
        .bind(&new.unit)
        .bind(new.default_reorder_level)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Product {
            id: result.last_insert_rowid(),
            name: new.name.clone(),
            unit: new.unit.clone(),
            default_reorder_level: new.default_reorder_level,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Gets a product by its id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as(
            r#"
            SELECT id, name, unit, default_reorder_level, is_active, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Soft-deletes a product. Snapshots and movement history survive: the
    /// audit trail outlives the catalog entry.
    pub async fn soft_delete(&self, id: i64) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET is_active = 0, updated_at = ?2 WHERE id = ?1",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }
}

/// Repository for locations (stores/warehouses transfers run between).
#[derive(Debug, Clone)]
pub struct LocationRepository {
    pool: SqlitePool,
}

impl LocationRepository {
    /// Creates a new LocationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LocationRepository { pool }
    }

    /// Inserts a location, returning its id.
    pub async fn insert(&self, name: &str) -> DbResult<i64> {
        let result = sqlx::query("INSERT INTO locations (name) VALUES (?1)")
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_rowid())
    }
}
