//! # Pantry POS Database Layer
//!
//! SQLite persistence for the inventory ledger: connection pooling,
//! migrations, the movement ledger, and repositories for every stock entity.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            Workflow Services             │
//! │  (adjustments, receiving, transfers)     │
//! └────────────────────┬────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────┐
//! │              pantry-db                   │
//! │                                          │
//! │  ┌──────────┐  ┌───────────────────┐    │
//! │  │  Ledger  │  │   Repositories    │    │
//! │  │ (writes) │  │ (reads + headers) │    │
//! │  └────┬─────┘  └─────────┬─────────┘    │
//! │       └───────┬──────────┘              │
//! │        ┌──────▼──────┐                  │
//! │        │ SqlitePool  │ WAL + busy_timeout
//! │        └──────┬──────┘                  │
//! └───────────────┼─────────────────────────┘
//!                 │
//!          ┌──────▼──────┐
//!          │   SQLite    │
//!          └─────────────┘
//! ```
//!
//! ## Write Discipline
//!
//! All snapshot writes go through [`Ledger`]: a movement row plus a delta
//! upsert on the snapshot, in one transaction. Repositories never update
//! `inventory_snapshots.quantity` directly.

pub mod error;
pub mod ledger;
pub mod migrations;
pub mod pool;
pub mod repository;

// Re-export main types for convenience
pub use error::{DbError, DbResult};
pub use ledger::{Ledger, NewMovement};
pub use pool::{Database, DbConfig};
pub use repository::movement::MovementRepository;
pub use repository::product::{LocationRepository, NewProduct, ProductRepository};
pub use repository::purchase::PurchaseRepository;
pub use repository::snapshot::SnapshotRepository;
pub use repository::transfer::TransferRepository;
