//! # Read-Side Query Types
//!
//! Pagination, filtering and sorting parameters for the snapshot, movement
//! and transfer read APIs, plus the `Paged` result envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{MovementType, TransferStatus};
use crate::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

// =============================================================================
// Pagination
// =============================================================================

/// 1-based page request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub page: u32,
    pub page_size: u32,
}

impl Page {
    /// First page with the default size.
    pub fn first() -> Self {
        Page {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Page size clamped to [1, MAX_PAGE_SIZE]; a hostile or buggy caller
    /// cannot request an unbounded result set.
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size.clamp(1, MAX_PAGE_SIZE))
    }

    /// SQL OFFSET for this page (page numbers below 1 are treated as 1).
    pub fn offset(&self) -> i64 {
        i64::from(self.page.max(1) - 1) * self.limit()
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::first()
    }
}

/// One page of results plus the total row count for the filter.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> Paged<T> {
    pub fn new(items: Vec<T>, total: i64, page: Page) -> Self {
        Paged {
            items,
            total,
            page: page.page.max(1),
            page_size: page.page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }
}

// =============================================================================
// Sorting
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// SQL keyword for this order.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Sortable columns of the stock listing.
///
/// A closed enum, mapped to column names in the repository; caller input
/// never reaches the SQL text directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockSortField {
    ProductName,
    Quantity,
    ReorderLevel,
    LastUpdated,
}

// =============================================================================
// Filters
// =============================================================================

/// Filter for the paginated stock listing.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockFilter {
    /// Case-insensitive substring match on product name.
    pub search: Option<String>,
    pub location_id: Option<i64>,
    pub low_stock_only: bool,
    pub out_of_stock_only: bool,
    pub sort_by: StockSortField,
    pub sort_order: SortOrder,
}

impl Default for StockFilter {
    fn default() -> Self {
        StockFilter {
            search: None,
            location_id: None,
            low_stock_only: false,
            out_of_stock_only: false,
            sort_by: StockSortField::ProductName,
            sort_order: SortOrder::Asc,
        }
    }
}

/// Filter for the paginated movement history listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MovementFilter {
    pub product_id: Option<i64>,
    pub location_id: Option<i64>,
    pub movement_type: Option<MovementType>,
    pub user_id: Option<i64>,
    #[ts(as = "Option<String>")]
    pub from: Option<DateTime<Utc>>,
    #[ts(as = "Option<String>")]
    pub to: Option<DateTime<Utc>>,
}

/// Filter for the paginated transfer listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TransferFilter {
    pub status: Option<TransferStatus>,
    /// Matches either endpoint of the transfer.
    pub location_id: Option<i64>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_offset_limit() {
        let p = Page {
            page: 3,
            page_size: 25,
        };
        assert_eq!(p.limit(), 25);
        assert_eq!(p.offset(), 50);
    }

    #[test]
    fn test_page_clamps_hostile_input() {
        let p = Page {
            page: 0,
            page_size: 0,
        };
        assert_eq!(p.limit(), 1);
        assert_eq!(p.offset(), 0);

        let huge = Page {
            page: 1,
            page_size: u32::MAX,
        };
        assert_eq!(huge.limit(), i64::from(MAX_PAGE_SIZE));
    }

    #[test]
    fn test_sort_order_sql() {
        assert_eq!(SortOrder::Asc.as_sql(), "ASC");
        assert_eq!(SortOrder::Desc.as_sql(), "DESC");
    }
}
