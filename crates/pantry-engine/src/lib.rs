//! # pantry-engine: Inventory Workflow Services
//!
//! The in-process API the presentation/IPC layer calls. Each write workflow
//! validates with pantry-core, applies movements through the pantry-db
//! ledger, and returns serializable results (or the `{code, message}` error
//! envelope).
//!
//! ## Workflows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        InventoryEngine                                  │
//! │                                                                         │
//! │  adjustment   adjust_stock            1 movement, sign normalized       │
//! │  receiving    receive_goods           N purchase movements, 1 txn       │
//! │  transfer     create / dispatch /     state machine; completion is      │
//! │               complete / cancel       2 movements per item, 1 txn       │
//! │  status       stock_levels / counts / snapshot classifier + history     │
//! │               movement_history        reads                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! let db = Database::new(DbConfig::new(data_dir.join("pantry.db"))).await?;
//! let engine = InventoryEngine::new(db, EngineConfig::default());
//!
//! let result = engine.adjust_stock(&request).await?;
//! ```

pub mod adjustment;
pub mod config;
pub mod error;
pub mod receiving;
pub mod status;
pub mod transfer;

pub use adjustment::AdjustmentResult;
pub use config::EngineConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use receiving::ReceiveGoodsResult;
pub use status::StockAlertCounts;

use pantry_db::Database;

/// The inventory engine: one instance per open database.
///
/// Cheap to clone (the database handle is a pool handle); the host
/// application constructs it once at startup and shares it with every
/// command handler.
#[derive(Debug, Clone)]
pub struct InventoryEngine {
    db: Database,
    config: EngineConfig,
}

impl InventoryEngine {
    /// Creates an engine over an open database.
    pub fn new(db: Database, config: EngineConfig) -> Self {
        InventoryEngine { db, config }
    }

    /// The underlying database handle.
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// The active policy configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
