//! # Engine Configuration
//!
//! Store-level policy knobs for the workflow services. These are business
//! configuration, not deployment configuration; the host application loads
//! them from its settings store and passes them in at construction.

use pantry_core::DEFAULT_LOCATION_ID;

/// Policy configuration for the inventory engine.
///
/// ## Example
/// ```rust
/// use pantry_engine::EngineConfig;
///
/// let config = EngineConfig::default().allow_negative_stock(false);
/// ```
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Location applied when a request carries none (single-store installs).
    pub default_location_id: i64,

    /// Whether on-hand quantities may go below zero.
    ///
    /// ## Why Default True
    /// Grocery floors sell faster than receiving is keyed in; blocking the
    /// deduction would block the till. A negative snapshot is a signal to
    /// reconcile, and the adjustment result flags it. Stores that want hard
    /// enforcement turn this off and deductions below zero are rejected.
    pub allow_negative_stock: bool,
}

impl EngineConfig {
    /// Sets the fallback location.
    pub fn default_location(mut self, location_id: i64) -> Self {
        self.default_location_id = location_id;
        self
    }

    /// Sets the negative-stock policy.
    pub fn allow_negative_stock(mut self, allow: bool) -> Self {
        self.allow_negative_stock = allow;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            default_location_id: DEFAULT_LOCATION_ID,
            allow_negative_stock: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.default_location_id, DEFAULT_LOCATION_ID);
        assert!(config.allow_negative_stock);
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::default()
            .default_location(3)
            .allow_negative_stock(false);
        assert_eq!(config.default_location_id, 3);
        assert!(!config.allow_negative_stock);
    }
}
