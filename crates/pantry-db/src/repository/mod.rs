//! # Repository Module
//!
//! Database repository implementations for the inventory ledger.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Workflow service                                                      │
//! │       │                                                                 │
//! │       │  db.snapshots().list(&filter, page)                            │
//! │       ▼                                                                 │
//! │  SnapshotRepository                                                    │
//! │  ├── get(product_id, location_id)                                      │
//! │  ├── list(&filter, page)                                               │
//! │  └── low_stock_count(location)                                         │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • SQL is isolated in one place                                        │
//! │  • Workflows compose repository calls inside their own transactions    │
//! │  • Tests run against an in-memory database, no mocks                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`snapshot::SnapshotRepository`] - Snapshot reads, thresholds, stock listing
//! - [`movement::MovementRepository`] - Append-only movement history reads
//! - [`transfer::TransferRepository`] - Transfer CRUD and guarded transitions
//! - [`purchase::PurchaseRepository`] - Purchase-order lines for receiving
//! - [`product::ProductRepository`] - Minimal product mirror

pub mod movement;
pub mod product;
pub mod purchase;
pub mod snapshot;
pub mod transfer;
