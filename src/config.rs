//! Engine configuration

use std::time::Duration;

/// Tunables for the cart engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Bounded wait on each remote mutation call. A dispatch that
    /// exceeds it settles as a connectivity failure; a stalled request
    /// that was already superseded is discarded regardless.
    pub request_timeout: Duration,

    /// Client-side cap on a single line's quantity, rejected before
    /// dispatch. The backend enforces its own limit either way.
    pub max_quantity_per_line: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            // Matches the storefront's network-call timeout.
            request_timeout: Duration::from_millis(10_000),
            max_quantity_per_line: 999,
        }
    }
}

impl EngineConfig {
    /// Load from environment, falling back to defaults.
    ///
    /// - `CART_API_TIMEOUT_MS` - remote call deadline in milliseconds
    /// - `CART_MAX_LINE_QUANTITY` - per-line quantity cap
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            request_timeout: std::env::var("CART_API_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.request_timeout),
            max_quantity_per_line: std::env::var("CART_MAX_LINE_QUANTITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_quantity_per_line),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_max_quantity_per_line(mut self, max: u32) -> Self {
        self.max_quantity_per_line = max;
        self
    }
}
