//! Checkout and feedback configuration types.

use std::time::Duration;

use serde::Deserialize;

/// Location used when the client leaves the field empty.
pub const DEFAULT_LOCATION: &str = "Dhaka";
/// Currency the backend prices services in.
pub const DEFAULT_CURRENCY: &str = "BDT";
/// How long an assignment success indicator stays visible.
pub const DEFAULT_SUCCESS_INDICATOR_MS: u64 = 3000;

/// Checkout configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CheckoutConfig {
    /// Fallback service location.
    pub default_location: String,
    /// Display currency for totals.
    pub currency: String,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            default_location: DEFAULT_LOCATION.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

/// User feedback configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Success indicator lifetime in milliseconds.
    pub success_indicator_ms: u64,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            success_indicator_ms: DEFAULT_SUCCESS_INDICATOR_MS,
        }
    }
}

impl FeedbackConfig {
    pub fn success_indicator(&self) -> Duration {
        Duration::from_millis(self.success_indicator_ms)
    }
}
