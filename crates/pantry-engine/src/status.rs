//! # Stock Status Service
//!
//! Read-side API: the classified stock listing, alert counts for the
//! dashboard badges, reorder threshold maintenance, and the movement
//! history views.
//!
//! All reads come from the snapshot table (classifier included); movement
//! history is only consulted when the user asks for it.

use serde::Serialize;
use ts_rs::TS;

use pantry_core::{
    InventorySnapshot, MovementFilter, Page, Paged, Quantity, StockFilter, StockLevel,
    StockMovement,
};

use crate::error::ApiResult;
use crate::InventoryEngine;

/// Dashboard badge counts.
#[derive(Debug, Clone, Copy, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockAlertCounts {
    pub low_stock: i64,
    pub out_of_stock: i64,
}

impl InventoryEngine {
    /// Paginated, classified stock listing (search, sort, alert filters).
    pub async fn stock_levels(
        &self,
        filter: &StockFilter,
        page: Page,
    ) -> ApiResult<Paged<StockLevel>> {
        Ok(self.db.snapshots().list(filter, page).await?)
    }

    /// Current snapshot for one (product, location) key; `None` when no
    /// movement has touched it yet.
    pub async fn stock_snapshot(
        &self,
        product_id: i64,
        location_id: Option<i64>,
    ) -> ApiResult<Option<InventorySnapshot>> {
        let location_id = location_id.unwrap_or(self.config.default_location_id);
        Ok(self.db.snapshots().get(product_id, location_id).await?)
    }

    /// Sets the reorder threshold for one (product, location) key.
    pub async fn set_reorder_level(
        &self,
        product_id: i64,
        location_id: Option<i64>,
        reorder_level: Quantity,
    ) -> ApiResult<()> {
        let location_id = location_id.unwrap_or(self.config.default_location_id);
        Ok(self
            .db
            .snapshots()
            .set_reorder_level(product_id, location_id, reorder_level)
            .await?)
    }

    /// Low/out-of-stock counts for the dashboard badges.
    pub async fn stock_alert_counts(
        &self,
        location_id: Option<i64>,
    ) -> ApiResult<StockAlertCounts> {
        let snapshots = self.db.snapshots();
        Ok(StockAlertCounts {
            low_stock: snapshots.low_stock_count(location_id).await?,
            out_of_stock: snapshots.out_of_stock_count(location_id).await?,
        })
    }

    /// Paginated movement history, newest first.
    pub async fn movement_history(
        &self,
        filter: &MovementFilter,
        page: Page,
    ) -> ApiResult<Paged<StockMovement>> {
        Ok(self.db.movements().list(filter, page).await?)
    }

    /// All movements caused by one purchase line or transfer, e.g. the
    /// audit panel on a completed transfer.
    pub async fn movements_for_reference(
        &self,
        reference_id: i64,
    ) -> ApiResult<Vec<StockMovement>> {
        Ok(self.db.movements().list_by_reference(reference_id).await?)
    }
}
