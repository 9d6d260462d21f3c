use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::currency::CurrencyInfo;
use crate::models::rates::RateTable;

/// Source of exchange-rate tables (the rate fetch service).
///
/// Each API (Frankfurter, a mirror, a test double) implements this trait.
/// Swapping one out leaves the valuation code untouched.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait RateProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch the latest rates of every supported currency against
    /// `base_currency`. The returned table's base must be `base_currency`.
    async fn fetch_rates(&self, base_currency: &str) -> Result<RateTable, CoreError>;
}

/// Display names and symbols for currency pickers and labels.
pub trait CurrencyMetadata: Send + Sync {
    /// Returns `CoreError::CurrencyNotFound` for unknown codes.
    fn lookup(&self, currency_code: &str) -> Result<CurrencyInfo, CoreError>;
}
