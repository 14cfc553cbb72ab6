//! # pantry-core: Pure Domain Logic for the Pantry POS Inventory Ledger
//!
//! This crate is the **heart** of the inventory engine. It contains every
//! business rule as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Pantry POS Inventory Data Flow                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Presentation / IPC layer                       │   │
//! │  │   adjustment form ─ receiving form ─ transfer form ─ listings   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    pantry-engine (workflows)                    │   │
//! │  │    adjust_stock, receive_goods, transfer create/complete/cancel │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ pantry-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐ ┌───────────┐ ┌───────────┐ ┌───────────────┐  │   │
//! │  │   │ quantity  │ │   types   │ │ validation│ │ request/query │  │   │
//! │  │   │ Quantity  │ │ sign rule │ │ normalize │ │   DTOs        │  │   │
//! │  │   │ (milli)   │ │ st.machine│ │ clamps    │ │   filters     │  │   │
//! │  │   └───────────┘ └───────────┘ └───────────┘ └───────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  pantry-db (ledger + repositories)              │   │
//! │  │          SQLite transactions, migrations, snapshot upserts      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`quantity`] - Integer milli-unit `Quantity` type (no floating point!)
//! - [`types`] - Entities, movement sign convention, transfer state machine,
//!   stock status classifier
//! - [`request`] - Write-workflow input DTOs
//! - [`query`] - Pagination, filters, sorting for the read APIs
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: deterministic - same input = same output
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Quantities**: stock is milli-units (i64), never floats
//! 4. **Closed Enums**: sign rules and state transitions are exhaustive
//!    matches the compiler checks, never runtime string switches

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod quantity;
pub mod query;
pub mod request;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use pantry_core::Quantity` instead of
// `use pantry_core::quantity::Quantity`

pub use error::{CoreError, CoreResult, ValidationError};
pub use quantity::Quantity;
pub use query::{MovementFilter, Page, Paged, SortOrder, StockFilter, StockSortField, TransferFilter};
pub use request::{
    AdjustmentRequest, ReceiveGoodsRequest, ReceiveLine, TransferDraft, TransferDraftItem,
    TransferReceipt, TransferReceiptLine,
};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default location for single-store installs.
///
/// ## Why a constant?
/// v0.1 runs a single store, but the schema keys snapshots and movements by
/// location so inter-location transfers work from day one. Workflows fall
/// back to this id when a request carries no location.
pub const DEFAULT_LOCATION_ID: i64 = 1;

/// Maximum items allowed on a single transfer
///
/// ## Business Reason
/// Prevents runaway transfer forms and keeps completion transactions
/// reasonably sized.
pub const MAX_TRANSFER_ITEMS: usize = 100;

/// Default page size for the read APIs
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Hard cap on requested page size
pub const MAX_PAGE_SIZE: u32 = 200;
